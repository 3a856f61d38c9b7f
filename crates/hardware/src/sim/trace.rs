//! Memory Trace Records.
//!
//! Traces are plain text with one reference per line:
//!
//! ```text
//! I 0400d7d4,8
//!  M 0421c7f0,4
//!  L 04f6b868,8
//!  S 7ff0005c8,8
//! ```
//!
//! The operation is followed by a hexadecimal address and a decimal access
//! size. Data references are conventionally indented by one space;
//! instruction fetches (`I`) are not.

use std::fmt;
use std::str::FromStr;

use crate::common::TraceError;

/// Reference type of one trace record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Instruction fetch. Parsed but never replayed.
    Instruction,
    /// Data load.
    Load,
    /// Data store.
    Store,
    /// Read-modify-write: a load followed by a store to the same address.
    Modify,
}

impl Operation {
    /// Maps a trace operation code to an operation.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::UnknownOperation`] for anything but `I`, `L`, `S`, `M`.
    pub const fn from_code(code: char) -> Result<Self, TraceError> {
        match code {
            'I' => Ok(Self::Instruction),
            'L' => Ok(Self::Load),
            'S' => Ok(Self::Store),
            'M' => Ok(Self::Modify),
            other => Err(TraceError::UnknownOperation(other)),
        }
    }

    /// Trace operation code.
    pub const fn code(self) -> char {
        match self {
            Self::Instruction => 'I',
            Self::Load => 'L',
            Self::Store => 'S',
            Self::Modify => 'M',
        }
    }

    /// Number of cache accesses the record issues.
    pub const fn access_count(self) -> usize {
        match self {
            Self::Instruction => 0,
            Self::Load | Self::Store => 1,
            Self::Modify => 2,
        }
    }
}

/// One parsed trace line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Reference type.
    pub op: Operation,
    /// Referenced byte address.
    pub addr: u64,
    /// Access width in bytes; informational only.
    pub size: u32,
}

impl TraceRecord {
    /// Builds a record.
    pub const fn new(op: Operation, addr: u64, size: u32) -> Self {
        Self { op, addr, size }
    }
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:x},{}", self.op.code(), self.addr, self.size)
    }
}

impl FromStr for TraceRecord {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_line(s)?.ok_or(TraceError::MissingAddress)
    }
}

/// Parses one trace line.
///
/// Blank lines yield `Ok(None)`. Leading and trailing whitespace is ignored,
/// and the address may carry an optional `0x` prefix.
///
/// # Errors
///
/// Returns a [`TraceError`] naming the first field that failed to parse.
pub fn parse_line(line: &str) -> Result<Option<TraceRecord>, TraceError> {
    let line = line.trim();
    let mut chars = line.chars();
    let Some(code) = chars.next() else {
        return Ok(None);
    };
    let op = Operation::from_code(code)?;

    let rest = chars.as_str().trim_start();
    if rest.is_empty() {
        return Err(TraceError::MissingAddress);
    }
    let (addr_field, size_field) = rest.split_once(',').ok_or(TraceError::MissingSize)?;

    let addr_field = addr_field.trim();
    let digits = addr_field
        .strip_prefix("0x")
        .or_else(|| addr_field.strip_prefix("0X"))
        .unwrap_or(addr_field);
    if digits.is_empty() {
        return Err(TraceError::MissingAddress);
    }
    let addr = u64::from_str_radix(digits, 16)
        .map_err(|_| TraceError::InvalidAddress(addr_field.to_owned()))?;

    let size_field = size_field.trim();
    let size = size_field
        .parse::<u32>()
        .map_err(|_| TraceError::InvalidSize(size_field.to_owned()))?;

    Ok(Some(TraceRecord::new(op, addr, size)))
}

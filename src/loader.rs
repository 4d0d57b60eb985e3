// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Loading program tapes from text.
//!
//! Programs travel as comma-separated signed decimal integers. The functions
//! here return an owned tape for the caller to hand to
//! [Machine::new](crate::Machine::new); nothing is cached or shared between
//! loads, so every run starts from its own copy.

use std::error::Error;
use std::fmt::{self, Display};
use std::fs::read_to_string;
use std::io;
use std::num::ParseIntError;
use std::path::Path;

/// An error encountered while loading a program
#[derive(Debug)]
pub enum LoadError {
    /// A cell was not a signed decimal integer
    BadCell {
        /// Zero-based position of the offending cell
        index: usize,
        /// The underlying parse failure
        source: ParseIntError,
    },
    /// The program file could not be read
    Io(io::Error),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::BadCell { index, source } => {
                write!(f, "cell {index} is not a valid integer: {source}")
            }
            LoadError::Io(e) => write!(f, "could not read program: {e}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::BadCell { source, .. } => Some(source),
            LoadError::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Parse a comma-separated program into an owned tape.
///
/// Whitespace around cells (including a trailing newline) is ignored.
pub fn parse_program(text: &str) -> Result<Vec<i64>, LoadError> {
    text.trim()
        .split(',')
        .map(str::trim)
        .enumerate()
        .map(|(index, cell)| {
            cell.parse()
                .map_err(|source| LoadError::BadCell { index, source })
        })
        .collect()
}

/// Read and parse the program file at `path`.
pub fn read_program(path: impl AsRef<Path>) -> Result<Vec<i64>, LoadError> {
    parse_program(&read_to_string(path)?)
}

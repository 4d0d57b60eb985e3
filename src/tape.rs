// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! The machine's linear memory.

use std::ops::{Index, IndexMut};

use crate::MachineError;

/// The machine's linear integer memory, doubling as code and data.
///
/// A tape is created once from the initial program and never grows: every
/// address a running program touches must already lie within `[0, len)`, and
/// anything outside that range is a [MachineError::AddressOutOfRange].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape(Vec<i64>);

impl Tape {
    pub(crate) fn new(cells: Vec<i64>) -> Self {
        Self(cells)
    }

    /// The number of cells on the tape.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the tape has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read the cell at `address`.
    pub fn read(&self, address: usize) -> Result<i64, MachineError> {
        self.0
            .get(address)
            .copied()
            .ok_or(MachineError::AddressOutOfRange(address as i64))
    }

    /// Read the cell a raw `i64` operand points at. Negative operands are
    /// out of range by definition.
    pub fn read_raw(&self, address: i64) -> Result<i64, MachineError> {
        self.read(self.address(address)?)
    }

    /// Write `value` to the cell at `address`.
    pub fn write(&mut self, address: usize, value: i64) -> Result<(), MachineError> {
        match self.0.get_mut(address) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(MachineError::AddressOutOfRange(address as i64)),
        }
    }

    /// Turn a raw operand into an in-range address.
    pub(crate) fn address(&self, raw: i64) -> Result<usize, MachineError> {
        match usize::try_from(raw) {
            Ok(address) if address < self.0.len() => Ok(address),
            _ => Err(MachineError::AddressOutOfRange(raw)),
        }
    }

    /// A view of every cell in order.
    pub fn cells(&self) -> &[i64] {
        &self.0
    }
}

impl Index<usize> for Tape {
    type Output = i64;

    fn index(&self, address: usize) -> &i64 {
        &self.0[address]
    }
}

impl IndexMut<usize> for Tape {
    fn index_mut(&mut self, address: usize) -> &mut i64 {
        &mut self.0[address]
    }
}

impl FromIterator<i64> for Tape {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

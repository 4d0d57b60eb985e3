// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Decoding tape cells into fully resolved instructions.

use std::fmt::{self, Display};

use crate::{Machine, MachineError};

/// Per-operand addressing scheme.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParamMode {
    /// The operand is a tape address; it resolves to the cell at that address.
    Position = 0,
    /// The operand is used literally.
    Immediate = 1,
}

impl ParamMode {
    /// Decode a single mode digit.
    ///
    /// Every nonzero digit behaves as immediate. The decoder this preserves
    /// tested the digit's truthiness rather than matching on it, so `2..=9`
    /// never dereference.
    fn from_digit(digit: i64) -> Self {
        if digit == 0 {
            ParamMode::Position
        } else {
            ParamMode::Immediate
        }
    }
}

/// The semantic operation selector of an instruction.
///
/// The opcode is the **ones digit** of the raw instruction value. That is not
/// the conventional two-digit opcode field; it happens to decode the whole
/// opcode set correctly only because the halt code's two digits are both 9.
/// The accidental-looking behavior is deliberate here, preserved from the
/// machine this one reimplements.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Opcode {
    /// `tape[dest] = a + b`
    Add = 1,
    /// `tape[dest] = a * b`
    Mul = 2,
    /// Store the next input value at a raw tape address
    Save = 3,
    /// Append a value to the output log
    Print = 4,
    /// Jump if the first operand is nonzero
    Jnz = 5,
    /// Jump if the first operand is zero
    Jz = 6,
    /// `tape[dest] = 1` if `a < b`, else `0`
    Lt = 7,
    /// `tape[dest] = 1` if `a == b`, else `0`
    Eq = 8,
    /// Stop execution by moving the pointer past the end of the tape
    Halt = 9,
}

impl Opcode {
    /// Decode the ones digit of a raw instruction value.
    fn from_instruction(raw: i64) -> Result<Self, MachineError> {
        Ok(match raw % 10 {
            1 => Opcode::Add,
            2 => Opcode::Mul,
            3 => Opcode::Save,
            4 => Opcode::Print,
            5 => Opcode::Jnz,
            6 => Opcode::Jz,
            7 => Opcode::Lt,
            8 => Opcode::Eq,
            9 => Opcode::Halt,
            _ => return Err(MachineError::InvalidOpcode(raw)),
        })
    }
}

impl Display for Opcode {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::Add => write!(fmt, "ADD"),
            Opcode::Mul => write!(fmt, "MUL"),
            Opcode::Save => write!(fmt, "SAVE"),
            Opcode::Print => write!(fmt, "PRINT"),
            Opcode::Jnz => write!(fmt, "JNZ"),
            Opcode::Jz => write!(fmt, "JZ"),
            Opcode::Lt => write!(fmt, "LT"),
            Opcode::Eq => write!(fmt, "EQ"),
            Opcode::Halt => write!(fmt, "HALT"),
        }
    }
}

/// A decoded, ephemeral instruction.
///
/// Operand fields are filled only for the operations that use them, and
/// `arg1`/`arg2` have already been resolved according to their parameter
/// modes. Two exceptions to resolution:
///
/// - `write_index` is never mode-resolved; writes always address their
///   destination positionally.
/// - [`Save`](Opcode::Save)'s `arg1` is a raw destination address for the
///   incoming input value, not a value to dereference.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// First resolved operand (raw address for [`Save`](Opcode::Save)).
    pub arg1: Option<i64>,
    /// Second resolved operand.
    pub arg2: Option<i64>,
    /// Raw, always-positional destination address.
    pub write_index: Option<usize>,
}

impl Machine {
    /// Decode the instruction under the pointer, without mutating anything.
    ///
    /// The raw value's ones digit selects the opcode; its hundreds and
    /// thousands digits are the parameter modes for operands 1 and 2 (missing
    /// digits default to position mode). Only the cells the opcode actually
    /// uses are read, and every raw or resolved address is checked against
    /// the tape bounds.
    ///
    /// # Errors
    ///
    /// [MachineError::InvalidOpcode] if the ones digit is not in `1..=9`,
    /// [MachineError::AddressOutOfRange] if any operand read or address falls
    /// off the tape.
    pub fn decode(&self) -> Result<Instruction, MachineError> {
        let raw = self.tape().read(self.pointer())?;
        let opcode = Opcode::from_instruction(raw)?;
        let mode1 = ParamMode::from_digit((raw / 100) % 10);
        let mode2 = ParamMode::from_digit((raw / 1000) % 10);

        Ok(match opcode {
            Opcode::Add | Opcode::Mul | Opcode::Lt | Opcode::Eq => Instruction {
                opcode,
                arg1: Some(self.operand(1, mode1)?),
                arg2: Some(self.operand(2, mode2)?),
                write_index: Some(self.write_operand(3)?),
            },
            Opcode::Jnz | Opcode::Jz => Instruction {
                opcode,
                arg1: Some(self.operand(1, mode1)?),
                arg2: Some(self.operand(2, mode2)?),
                write_index: None,
            },
            // SAVE's operand is the destination of the input value, so it is
            // passed through raw no matter what its mode digit says
            Opcode::Save => Instruction {
                opcode,
                arg1: Some(self.write_operand(1)? as i64),
                arg2: None,
                write_index: None,
            },
            Opcode::Print => Instruction {
                opcode,
                arg1: Some(self.operand(1, mode1)?),
                arg2: None,
                write_index: None,
            },
            Opcode::Halt => Instruction {
                opcode,
                arg1: None,
                arg2: None,
                write_index: None,
            },
        })
    }

    /// Resolve the operand `slot` cells past the pointer according to `mode`.
    fn operand(&self, slot: usize, mode: ParamMode) -> Result<i64, MachineError> {
        let raw = self.tape().read(self.pointer() + slot)?;
        match mode {
            ParamMode::Position => self.tape().read_raw(raw),
            ParamMode::Immediate => Ok(raw),
        }
    }

    /// Read the raw destination address `slot` cells past the pointer.
    fn write_operand(&self, slot: usize) -> Result<usize, MachineError> {
        let raw = self.tape().read(self.pointer() + slot)?;
        self.tape().address(raw)
    }
}

// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD
#![warn(missing_docs)]

//! Library providing a fixed-tape intcode machine.
//!
//! The machine interprets a tape of signed integers as instructions with
//! per-operand addressing modes, conditional control flow, and in-memory
//! input/output channels. A run is fully synchronous: the [Machine] owns its
//! tape, consumes a pre-supplied input sequence, and executes to completion
//! or failure within a single call.
//!
//! # Example
//!
//! ```rust
//! use tapeway::prelude::*;
//!
//! // compare the single input value against 8, print the verdict
//! let program = vec![3, 9, 8, 9, 10, 9, 4, 9, 99, -1, 8];
//!
//! assert_eq!(execute(program.clone(), [8]), Ok(vec![1]));
//! assert_eq!(execute(program, [5]), Ok(vec![0]));
//! ```
//!
//! For finer control, drive a [Machine] directly:
//!
//! ```rust
//! use tapeway::prelude::*;
//!
//! let mut machine = Machine::new([1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50], []);
//! machine.run().unwrap();
//! assert_eq!(machine[0], 3500);
//! ```
//!
//! The tape never grows, and every address a program touches is checked
//! against it, so a stray program fails with a [MachineError] instead of
//! reading garbage. The [search] module builds the "try a configuration,
//! skip it if the machine rejects it" harness on top of that.

use std::error::Error;
use std::fmt::{self, Display};
use std::ops::{Index, IndexMut};

mod decode;
mod exec;
pub mod loader;
pub mod search;
mod tape;

pub use decode::{Instruction, Opcode, ParamMode};
pub use tape::Tape;

/// A small module that re-exports items needed when working with the machine
pub mod prelude {
    pub use crate::{Machine, MachineError, State, execute};
}

/// The run state of a machine.
///
/// A machine starts [Running](State::Running) and stays there until the
/// pointer moves past the end of the tape, either by an explicit `HALT` or by
/// walking or jumping off the end; the driver does not distinguish the two.
/// The third terminal condition, a failed run, is an `Err` carrying a
/// [MachineError] rather than a state of its own.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
    /// There are more instructions to execute
    Running,
    /// The pointer is past the end of the tape; execution is over
    Halted,
}

/// An error that aborted a run.
///
/// All three are fatal to the run that raised them: the machine surfaces the
/// error and performs no retries. Output appended before the failure stays in
/// the machine, though callers probing many candidate programs should discard
/// it rather than partially trust it (see [crate::search]).
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum MachineError {
    /// The ones digit of the decoded instruction was not in `1..=9`.
    /// Carries the full raw instruction value.
    InvalidOpcode(i64),
    /// A raw or resolved address fell outside the tape
    AddressOutOfRange(i64),
    /// A `SAVE` instruction found no remaining input
    InputExhausted,
}

impl Display for MachineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineError::InvalidOpcode(n) => {
                write!(
                    f,
                    "invalid opcode in instruction {n} - please double check your program"
                )
            }
            MachineError::AddressOutOfRange(i) => {
                write!(f, "address {i} is outside the tape")
            }
            MachineError::InputExhausted => {
                write!(f, "SAVE instruction found no remaining input")
            }
        }
    }
}

impl Error for MachineError {}

/// One stored-program machine, exclusively owning its tape for the duration
/// of a run.
///
/// Because the tape is mutated in place, a machine is single-use: re-running
/// the same program requires constructing a fresh machine from a clone of the
/// initial tape. [Machine::new] takes its tape by value to make that
/// explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    tape: Tape,
    pointer: usize,
    input: Vec<i64>,
    cursor: usize,
    output: Vec<i64>,
}

impl Machine {
    /// Create a machine from an initial tape and the full input sequence its
    /// `SAVE` instructions will consume, in order.
    pub fn new(
        tape: impl IntoIterator<Item = i64>,
        input: impl IntoIterator<Item = i64>,
    ) -> Self {
        Self {
            tape: tape.into_iter().collect(),
            pointer: 0,
            input: input.into_iter().collect(),
            cursor: 0,
            output: Vec::new(),
        }
    }

    /// The machine's memory.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub(crate) fn tape_mut(&mut self) -> &mut Tape {
        &mut self.tape
    }

    /// Index of the next instruction to decode.
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// The current run state; see [State].
    pub fn state(&self) -> State {
        if self.pointer < self.tape.len() {
            State::Running
        } else {
            State::Halted
        }
    }

    /// Everything `PRINT` instructions have appended so far, in order.
    pub fn output(&self) -> &[i64] {
        &self.output
    }

    /// Discard the machine, keeping its output log.
    pub fn into_output(self) -> Vec<i64> {
        self.output
    }

    /// Read the cell at `address`
    #[doc(alias = "peek")]
    pub fn mem_get(&self, address: usize) -> Result<i64, MachineError> {
        self.tape.read(address)
    }

    /// Manually overwrite the cell at `address`
    #[doc(alias("poke", "write"))]
    pub fn mem_override(&mut self, address: usize, value: i64) -> Result<(), MachineError> {
        self.tape.write(address, value)
    }

    /// Decode and execute the instruction under the pointer.
    ///
    /// Does nothing if the machine has already halted. On failure the machine
    /// is left as the failing instruction found it, apart from output already
    /// appended by earlier instructions.
    pub fn step(&mut self) -> Result<State, MachineError> {
        if self.state() == State::Halted {
            return Ok(State::Halted);
        }
        let instruction = self.decode()?;
        self.dispatch(instruction)
    }

    /// Run until the machine halts or fails.
    ///
    /// # Errors
    ///
    /// Any [MachineError] an instruction raises; the error is surfaced
    /// unchanged, with no internal recovery.
    pub fn run(&mut self) -> Result<State, MachineError> {
        while self.step()? == State::Running {}
        Ok(State::Halted)
    }

    pub(crate) fn advance(&mut self, width: usize) {
        self.pointer += width;
    }

    pub(crate) fn jump_to(&mut self, target: usize) {
        self.pointer = target;
    }

    /// `HALT`: park the pointer past the end of the tape.
    pub(crate) fn halt(&mut self) -> State {
        self.pointer = self.tape.len();
        State::Halted
    }

    /// Consume the next input value, advancing the read cursor.
    pub(crate) fn take_input(&mut self) -> Result<i64, MachineError> {
        let value = self
            .input
            .get(self.cursor)
            .copied()
            .ok_or(MachineError::InputExhausted)?;
        self.cursor += 1;
        Ok(value)
    }

    pub(crate) fn push_output(&mut self, value: i64) {
        self.output.push(value);
    }
}

impl Index<usize> for Machine {
    type Output = i64;

    fn index(&self, address: usize) -> &i64 {
        self.tape.index(address)
    }
}

impl IndexMut<usize> for Machine {
    fn index_mut(&mut self, address: usize) -> &mut i64 {
        self.tape.index_mut(address)
    }
}

/// Run `tape` against `input` in one call, returning the machine's output.
///
/// This is the whole machine as a function: callers that also need the final
/// tape (say, to read back a result register at address 0) should drive a
/// [Machine] instead.
///
/// # Errors
///
/// Any [MachineError] the run raises. Output produced before the failure is
/// lost with the machine; use [Machine::run] to keep it.
pub fn execute(
    tape: impl IntoIterator<Item = i64>,
    input: impl IntoIterator<Item = i64>,
) -> Result<Vec<i64>, MachineError> {
    let mut machine = Machine::new(tape, input);
    machine.run()?;
    Ok(machine.into_output())
}

// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! One handler per opcode, plus the helpers the handlers share.

use crate::decode::{Instruction, Opcode};
use crate::{Machine, MachineError, State};

/// Pull the operand fields an arity-3 handler relies on out of an instruction.
///
/// The decoder fills all three fields for every arity-3 opcode, so a miss here
/// is a decoder bug, not a program error.
macro_rules! three_operands {
    ($instruction: expr) => {{
        let Instruction {
            arg1: Some(a),
            arg2: Some(b),
            write_index: Some(dest),
            ..
        } = $instruction
        else {
            unreachable!("decoder fills all fields of {}", $instruction.opcode)
        };
        (a, b, dest)
    }};
}

impl Machine {
    /// Execute one already-decoded instruction, mutating tape, pointer,
    /// input cursor, and output log as the opcode demands.
    pub(crate) fn dispatch(&mut self, instruction: Instruction) -> Result<State, MachineError> {
        match instruction.opcode {
            Opcode::Add => self.binary_op(instruction, |a, b| a + b),
            Opcode::Mul => self.binary_op(instruction, |a, b| a * b),
            Opcode::Save => self.save(instruction),
            Opcode::Print => self.print(instruction),
            Opcode::Jnz => self.jump(instruction, |condition| condition != 0),
            Opcode::Jz => self.jump(instruction, |condition| condition == 0),
            Opcode::Lt => self.binary_op(instruction, |a, b| (a < b) as i64),
            Opcode::Eq => self.binary_op(instruction, |a, b| (a == b) as i64),
            Opcode::Halt => Ok(self.halt()),
        }
    }

    /// Common logic of the four instructions that combine two operands into a
    /// value written at `write_index`. Comparisons write exactly 0 or 1,
    /// never an operand value.
    fn binary_op(
        &mut self,
        instruction: Instruction,
        op: impl Fn(i64, i64) -> i64,
    ) -> Result<State, MachineError> {
        let (a, b, dest) = three_operands!(instruction);
        self.tape_mut().write(dest, op(a, b))?;
        self.advance(4);
        Ok(State::Running)
    }

    /// `SAVE`: store the next input value at the raw address in `arg1`.
    fn save(&mut self, instruction: Instruction) -> Result<State, MachineError> {
        let Some(dest) = instruction.arg1 else {
            unreachable!("decoder fills arg1 for SAVE")
        };
        let dest = self.tape().address(dest)?;
        let value = self.take_input()?;
        self.tape_mut().write(dest, value)?;
        self.advance(2);
        Ok(State::Running)
    }

    /// `PRINT`: append `arg1` to the output log.
    fn print(&mut self, instruction: Instruction) -> Result<State, MachineError> {
        let Some(value) = instruction.arg1 else {
            unreachable!("decoder fills arg1 for PRINT")
        };
        self.push_output(value);
        self.advance(2);
        Ok(State::Running)
    }

    /// Common logic of the two conditional jumps: either move the pointer to
    /// `arg2` or advance past the instruction, never both.
    ///
    /// A target at or past the end of the tape ends the run the same way
    /// running off the end does; a negative target is an address error.
    fn jump(
        &mut self,
        instruction: Instruction,
        condition: impl Fn(i64) -> bool,
    ) -> Result<State, MachineError> {
        let (Some(tested), Some(target)) = (instruction.arg1, instruction.arg2) else {
            unreachable!("decoder fills both operands of {}", instruction.opcode)
        };
        if condition(tested) {
            let target =
                usize::try_from(target).map_err(|_| MachineError::AddressOutOfRange(target))?;
            self.jump_to(target);
        } else {
            self.advance(3);
        }
        Ok(State::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::ParamMode;

    fn machine(tape: &[i64], input: &[i64]) -> Machine {
        Machine::new(tape.iter().copied(), input.iter().copied())
    }

    /// Decode and dispatch a single instruction.
    fn step_once(machine: &mut Machine) -> Result<State, MachineError> {
        let instruction = machine.decode()?;
        machine.dispatch(instruction)
    }

    #[test]
    fn add_position_mode() {
        let mut m = machine(&[1, 0, 2, 1], &[]);
        step_once(&mut m).unwrap();
        assert_eq!(m.tape().cells(), &[1, 3, 2, 1]);
        assert_eq!(m.pointer(), 4);
    }

    #[test]
    fn add_immediate_mode() {
        let mut m = machine(&[1101, 0, 2, 1], &[]);
        step_once(&mut m).unwrap();
        assert_eq!(m.tape().cells(), &[1101, 2, 2, 1]);
        assert_eq!(m.pointer(), 4);
    }

    #[test]
    fn mul_position_mode() {
        let mut m = machine(&[2, 0, 2, 1], &[]);
        step_once(&mut m).unwrap();
        assert_eq!(m.tape().cells(), &[2, 4, 2, 1]);
        assert_eq!(m.pointer(), 4);
    }

    #[test]
    fn mul_immediate_mode() {
        let mut m = machine(&[1102, 3, 2, 1], &[]);
        step_once(&mut m).unwrap();
        assert_eq!(m.tape().cells(), &[1102, 6, 2, 1]);
        assert_eq!(m.pointer(), 4);
    }

    #[test]
    fn save_consumes_input_in_order() {
        let mut m = machine(&[3, 0, 3, 1, 99], &[4, 7]);
        step_once(&mut m).unwrap();
        assert_eq!(m.tape().cells(), &[4, 0, 3, 1, 99]);
        assert_eq!(m.pointer(), 2);
        step_once(&mut m).unwrap();
        assert_eq!(m.tape().cells(), &[4, 7, 3, 1, 99]);
        assert_eq!(m.pointer(), 4);
    }

    #[test]
    fn save_without_input_is_fatal() {
        let mut m = machine(&[3, 0, 99], &[]);
        assert_eq!(step_once(&mut m), Err(MachineError::InputExhausted));
    }

    #[test]
    fn print_logs_and_advances_by_two() {
        let mut m = machine(&[4, 3, 2, 1, 3, 3], &[]);
        step_once(&mut m).unwrap();
        assert_eq!(m.output(), &[1]);
        assert_eq!(m.pointer(), 2);
        assert_eq!(m.tape().cells(), &[4, 3, 2, 1, 3, 3]);
    }

    #[test]
    fn jnz_jumps_or_advances_by_three() {
        // condition nonzero: pointer moves to the target
        let mut m = machine(&[1105, 9, 12, 6], &[]);
        step_once(&mut m).unwrap();
        assert_eq!(m.pointer(), 12);
        // condition zero: pointer advances past the instruction
        let mut m = machine(&[1105, 0, 12, 6], &[]);
        step_once(&mut m).unwrap();
        assert_eq!(m.pointer(), 3);
    }

    #[test]
    fn jz_jumps_or_advances_by_three() {
        let mut m = machine(&[1106, 0, 12, 6], &[]);
        step_once(&mut m).unwrap();
        assert_eq!(m.pointer(), 12);
        let mut m = machine(&[1106, 1, 12, 6], &[]);
        step_once(&mut m).unwrap();
        assert_eq!(m.pointer(), 3);
    }

    #[test]
    fn jump_to_negative_target_is_an_address_error() {
        let mut m = machine(&[1105, 1, -4, 99], &[]);
        assert_eq!(
            step_once(&mut m),
            Err(MachineError::AddressOutOfRange(-4))
        );
    }

    #[test]
    fn comparisons_write_only_zero_or_one() {
        let mut m = machine(&[1107, 0, 9, 1], &[]);
        step_once(&mut m).unwrap();
        assert_eq!(m.tape().cells(), &[1107, 1, 9, 1]);
        let mut m = machine(&[1107, 6, 1, 3], &[]);
        step_once(&mut m).unwrap();
        assert_eq!(m.tape().cells(), &[1107, 6, 1, 0]);
        let mut m = machine(&[1108, 0, 0, 1], &[]);
        step_once(&mut m).unwrap();
        assert_eq!(m.tape().cells(), &[1108, 1, 0, 1]);
        let mut m = machine(&[1108, 6, 1, 3], &[]);
        step_once(&mut m).unwrap();
        assert_eq!(m.tape().cells(), &[1108, 6, 1, 0]);
    }

    #[test]
    fn halt_moves_the_pointer_past_the_end() {
        let mut m = machine(&[99, 0, 0, 0], &[]);
        assert_eq!(step_once(&mut m), Ok(State::Halted));
        assert_eq!(m.pointer(), 4);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// Build an arity-3 instruction value with the given ones digit and
        /// mode digits for its two value operands.
        fn op3_int(ones: i64, mode1: ParamMode, mode2: ParamMode) -> i64 {
            ones + 100 * mode1 as i64 + 1000 * mode2 as i64
        }

        fn any_mode() -> impl Strategy<Value = ParamMode> {
            prop_oneof![Just(ParamMode::Position), Just(ParamMode::Immediate)]
        }

        proptest! {
            /// Arithmetic and comparison opcodes advance by exactly 4, for
            /// every combination of addressing modes.
            #[test]
            fn arity3_advances_by_four(
                ones in prop_oneof![Just(1i64), Just(2), Just(7), Just(8)],
                mode1 in any_mode(),
                mode2 in any_mode(),
                a in -100i64..100,
                b in -100i64..100,
            ) {
                // operands in position mode index cell 5; the write always
                // lands in cell 4
                let raw = op3_int(ones, mode1, mode2);
                let cell = |mode, value| match mode {
                    ParamMode::Position => 5,
                    ParamMode::Immediate => value,
                };
                let tape = [raw, cell(mode1, a), cell(mode2, b), 4, 0, 7];
                let mut m = machine(&tape, &[]);
                step_once(&mut m).unwrap();
                prop_assert_eq!(m.pointer(), 4);
            }

            /// LT and EQ write exactly 0 or 1, never an operand value.
            #[test]
            fn comparisons_write_flags(
                ones in prop_oneof![Just(7i64), Just(8)],
                a in -100i64..100,
                b in -100i64..100,
            ) {
                let tape = [1100 + ones, a, b, 4, -1];
                let mut m = machine(&tape, &[]);
                step_once(&mut m).unwrap();
                prop_assert!(matches!(m.tape().read(4), Ok(0 | 1)));
            }

            /// Jumps either land on the target or advance by exactly 3.
            #[test]
            fn jumps_never_split_the_difference(
                ones in prop_oneof![Just(5i64), Just(6)],
                tested in -10i64..10,
                target in 0i64..64,
            ) {
                let tape = [1100 + ones, tested, target, 99];
                let mut m = machine(&tape, &[]);
                step_once(&mut m).unwrap();
                let jumped = m.pointer() == target as usize;
                let advanced = m.pointer() == 3;
                prop_assert!(jumped ^ advanced || target == 3);
            }
        }
    }
}

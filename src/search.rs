// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Exploratory search over variants of a base program.
//!
//! The classic caller pattern for this machine is a brute-force harness: try
//! many starting configurations of one program, treat any machine failure as
//! "this configuration is invalid, move on", and stop at the first
//! configuration whose result matches a target. Each attempt gets its own
//! machine built from a fresh copy of the base tape, so a rejected attempt
//! cannot leak mutated state into the next one.
//!
//! Rather than intercepting failures generically, every attempt produces an
//! explicit [Attempt] value; only the machine's own defined errors are folded
//! into [Attempt::Rejected].
//!
//! # Example
//!
//! ```rust
//! use tapeway::search::{Attempt, run_patched};
//!
//! // cell 0 becomes the sum of the cells the patched addresses point at
//! let base = [1, 0, 0, 0, 99];
//! match run_patched(&base, &[(1, 4), (2, 4)], []) {
//!     Attempt::Completed { result, .. } => assert_eq!(result, 99 + 99),
//!     Attempt::Rejected(e) => panic!("machine rejected the patch: {e}"),
//! }
//! ```

use std::iter::empty;

use itertools::iproduct;

use crate::{Machine, MachineError, State};

/// The outcome of one search attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// The machine halted normally.
    Completed {
        /// Everything the run printed, in order
        output: Vec<i64>,
        /// The final value of cell 0, the machine's result register
        result: i64,
    },
    /// The machine failed; the attempt's partial output is discarded rather
    /// than partially trusted.
    Rejected(MachineError),
}

impl Attempt {
    /// The result register of a completed attempt.
    pub fn result(&self) -> Option<i64> {
        match self {
            Attempt::Completed { result, .. } => Some(*result),
            Attempt::Rejected(_) => None,
        }
    }
}

/// Run a fresh copy of `base` with `patches` written over it first.
///
/// Patches are `(address, value)` pairs applied before execution; a patch
/// outside the tape rejects the attempt the same way a failing run does.
pub fn run_patched(
    base: &[i64],
    patches: &[(usize, i64)],
    input: impl IntoIterator<Item = i64>,
) -> Attempt {
    let mut machine = Machine::new(base.iter().copied(), input);
    for &(address, value) in patches {
        if let Err(e) = machine.mem_override(address, value) {
            return Attempt::Rejected(e);
        }
    }
    match machine.run() {
        Ok(State::Halted) => match machine.mem_get(0) {
            Ok(result) => Attempt::Completed {
                result,
                output: machine.into_output(),
            },
            Err(e) => Attempt::Rejected(e),
        },
        Ok(State::Running) => unreachable!("run only returns Halted on success"),
        Err(e) => Attempt::Rejected(e),
    }
}

/// Brute-force the `0..=99` noun/verb grid, returning the first pair whose
/// completed run leaves `target` in cell 0.
///
/// The noun is written to cell 1 and the verb to cell 2 before each attempt,
/// and rejected attempts are skipped, exactly as the exploratory search this
/// machine was originally built for does.
pub fn find_noun_verb(base: &[i64], target: i64) -> Option<(i64, i64)> {
    iproduct!(0..=99i64, 0..=99i64).find(|&(noun, verb)| {
        run_patched(base, &[(1, noun), (2, verb)], empty()).result() == Some(target)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // add cell 1 to cell 2, store in cell 0
    const BASE: [i64; 6] = [1, 0, 0, 0, 99, 0];

    #[test]
    fn patched_attempts_run_on_fresh_copies() {
        let first = run_patched(&BASE, &[(1, 4), (2, 5)], empty());
        let second = run_patched(&BASE, &[(1, 4), (2, 5)], empty());
        assert_eq!(first, second);
        assert_eq!(first.result(), Some(99 + 0)); // tape[4] + tape[5]
    }

    #[test]
    fn out_of_range_patch_is_rejected() {
        assert_eq!(
            run_patched(&BASE, &[(17, 0)], empty()),
            Attempt::Rejected(MachineError::AddressOutOfRange(17))
        );
    }

    #[test]
    fn finds_a_known_pair_past_rejections() {
        // tape[0] = tape[noun] + tape[verb]. Only noun=4, verb=4 sums to
        // 198, and the grid walks through plenty of out-of-range (hence
        // rejected) configurations before reaching it.
        let found = find_noun_verb(&BASE, 99 + 99);
        assert_eq!(found, Some((4, 4)));
    }

    #[test]
    fn rejections_do_not_abort_the_search() {
        // no configuration of BASE produces a negative result, so the search
        // visits the whole grid, rejections included, and comes back empty
        assert_eq!(find_noun_verb(&BASE, -1), None);
    }
}

//! Read-only hooks into the round pipeline.

use log::{debug, log_enabled, trace, Level};

use crate::block::Block;
use crate::key::RoundKeys;

/// A single transformation inside a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// Byte-wise S-box substitution.
    SubBytes,
    /// Cyclic row rotation.
    ShiftRows,
    /// Column mixing over GF(2^8).
    MixColumns,
    /// XOR with the round key.
    AddRoundKey,
}

impl Step {
    /// Conventional FIPS-197 name of the step.
    pub fn name(self) -> &'static str {
        match self {
            Step::SubBytes => "SubBytes",
            Step::ShiftRows => "ShiftRows",
            Step::MixColumns => "MixColumns",
            Step::AddRoundKey => "AddRoundKey",
        }
    }
}

/// Receives intermediate values while a block is encrypted.
///
/// Every method has an empty default, so implementors pick what they need.
/// Values are only ever lent out immutably.
pub trait RoundObserver {
    /// Called once, before the initial round, with the schedule in use.
    fn on_key_schedule(&mut self, _round_keys: &RoundKeys) {}

    /// Called after each step of `round`.
    fn on_step(&mut self, _round: usize, _step: Step, _state: &Block) {}

    /// Called with the state at the end of `round` (0..=10).
    fn on_round(&mut self, _round: usize, _state: &Block) {}
}

impl RoundObserver for () {}

impl<O: RoundObserver + ?Sized> RoundObserver for &mut O {
    fn on_key_schedule(&mut self, round_keys: &RoundKeys) {
        (**self).on_key_schedule(round_keys);
    }

    fn on_step(&mut self, round: usize, step: Step, state: &Block) {
        (**self).on_step(round, step, state);
    }

    fn on_round(&mut self, round: usize, state: &Block) {
        (**self).on_round(round, state);
    }
}

/// Forwards intermediate values to the `log` facade.
///
/// Round states go out at `debug`, individual steps and the schedule at
/// `trace`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl RoundObserver for LogObserver {
    fn on_key_schedule(&mut self, round_keys: &RoundKeys) {
        if log_enabled!(Level::Trace) {
            for (round, key) in round_keys.iter().enumerate() {
                trace!("round key {round}: {}", HexBlock(key));
            }
        }
    }

    fn on_step(&mut self, round: usize, step: Step, state: &Block) {
        trace!("round {round} {}: {}", step.name(), HexBlock(state));
    }

    fn on_round(&mut self, round: usize, state: &Block) {
        debug!("state after round {round}: {}", HexBlock(state));
    }
}

/// Collects the state at the end of every round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordingObserver {
    /// Schedule reported at the start of the run.
    pub schedule: Option<RoundKeys>,
    /// End-of-round states, indexed by round.
    pub rounds: Vec<Block>,
    /// Number of step callbacks seen.
    pub steps: usize,
}

impl RoundObserver for RecordingObserver {
    fn on_key_schedule(&mut self, round_keys: &RoundKeys) {
        self.schedule = Some(*round_keys);
    }

    fn on_step(&mut self, _round: usize, _step: Step, _state: &Block) {
        self.steps += 1;
    }

    fn on_round(&mut self, _round: usize, state: &Block) {
        self.rounds.push(*state);
    }
}

struct HexBlock<'a>(&'a Block);

impl core::fmt::Display for HexBlock<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

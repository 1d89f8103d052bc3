//! Per-trial Echo state: five substat slots plus cumulative exp and tuner spend.

use crate::echo::catalog::SubStat;
use crate::echo::rng::Rng;
use crate::echo::sampler::{sample_kind, sample_value};

pub const MAX_SLOTS: usize = 5;

/// Exp paid to reach the level that unlocks slot `i`.
pub const EXP_COST_TABLE: [u64; MAX_SLOTS] = [4400, 12100, 23100, 39500, 63500];

/// Tuners spent per unlocked slot.
pub const TUNER_COST: u64 = 10;

#[derive(Debug, Clone, Default)]
pub struct Echo {
    kinds: [SubStat; MAX_SLOTS],
    values: [f32; MAX_SLOTS],
    unlocked: usize,
    exp_consumed: u64,
    tuners_consumed: u64,
}

impl Echo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return to the freshly-created state. Must run before every trial.
    pub fn reset(&mut self) {
        self.kinds = [SubStat::None; MAX_SLOTS];
        self.values = [0.0; MAX_SLOTS];
        self.unlocked = 0;
        self.exp_consumed = 0;
        self.tuners_consumed = 0;
    }

    /// Level up to the next tuning threshold and unlock one substat.
    /// At most [`MAX_SLOTS`] tunes are allowed between resets.
    pub fn tune(&mut self, rng: &mut Rng) {
        self.level_up();
        self.unlock_next_slot(rng);
    }

    fn level_up(&mut self) {
        debug_assert!(
            self.unlocked < MAX_SLOTS,
            "tuned a full echo ({} slots unlocked)",
            self.unlocked
        );
        self.exp_consumed += EXP_COST_TABLE[self.unlocked];
    }

    fn unlock_next_slot(&mut self, rng: &mut Rng) {
        let kind = sample_kind(&self.kinds[..self.unlocked], rng);
        let value = sample_value(kind, rng);
        self.kinds[self.unlocked] = kind;
        self.values[self.unlocked] = value;
        self.tuners_consumed += TUNER_COST;
        self.unlocked += 1;
    }

    /// True if an unlocked slot holds `kind` with a value of at least `min_value`.
    #[inline]
    pub fn has_stat(&self, kind: SubStat, min_value: f32) -> bool {
        self.substats()
            .any(|(slot_kind, value)| slot_kind == kind && value >= min_value)
    }

    /// True if any unlocked slot satisfies any of the `(kind, min_value)` requirements.
    pub fn has_any_stat(&self, requirements: &[(SubStat, f32)]) -> bool {
        requirements
            .iter()
            .any(|&(kind, min_value)| self.has_stat(kind, min_value))
    }

    /// Unlocked substats in slot order.
    pub fn substats(&self) -> impl Iterator<Item = (SubStat, f32)> + '_ {
        self.kinds[..self.unlocked]
            .iter()
            .copied()
            .zip(self.values[..self.unlocked].iter().copied())
    }

    pub fn unlocked(&self) -> usize {
        self.unlocked
    }

    pub fn is_full(&self) -> bool {
        self.unlocked == MAX_SLOTS
    }

    pub fn exp_consumed(&self) -> u64 {
        self.exp_consumed
    }

    pub fn tuners_consumed(&self) -> u64 {
        self.tuners_consumed
    }
}

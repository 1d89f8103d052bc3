//! One trial: reset, tune through the gates, and fold the outcome into local statistics.

use serde::Serialize;

use crate::echo::{Echo, Rng};
use crate::simulation::strategy::{evaluate, Gate};

/// Percent of exp recovered from an abandoned echo.
pub const EXP_REFUND_PERCENT: u64 = 25;
/// Percent of tuners recovered from an abandoned echo.
pub const TUNER_REFUND_PERCENT: u64 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialOutcome {
    Kept,
    Aborted(Gate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ResourceTotals {
    pub exp: u64,
    pub tuners: u64,
}

impl ResourceTotals {
    pub fn add(&mut self, exp: u64, tuners: u64) {
        self.exp += exp;
        self.tuners += tuners;
    }
}

/// Statistics owned by a single batch. Never shared while trials run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimStats {
    pub trials: u64,
    pub success_count: u64,
    pub kept: ResourceTotals,
    pub abandoned: ResourceTotals,
    pub aborted_at: [u64; 4],
}

impl SimStats {
    pub fn merge(&mut self, other: &SimStats) {
        self.trials += other.trials;
        self.success_count += other.success_count;
        self.kept.add(other.kept.exp, other.kept.tuners);
        self.abandoned.add(other.abandoned.exp, other.abandoned.tuners);
        for (total, count) in self.aborted_at.iter_mut().zip(other.aborted_at) {
            *total += count;
        }
    }
}

/// Resources charged for an abandoned echo, truncated toward zero.
pub fn partial_refund(exp: u64, tuners: u64) -> (u64, u64) {
    (
        exp * EXP_REFUND_PERCENT / 100,
        tuners * TUNER_REFUND_PERCENT / 100,
    )
}

/// Run the strategy on a freshly reset echo.
pub fn run_trial(echo: &mut Echo, rng: &mut Rng) -> TrialOutcome {
    echo.reset();
    for gate in Gate::ALL {
        for _ in 0..gate.tunes() {
            echo.tune(rng);
        }
        if !gate.passes(evaluate(echo)) {
            return TrialOutcome::Aborted(gate);
        }
    }
    TrialOutcome::Kept
}

pub fn record_outcome(stats: &mut SimStats, echo: &Echo, outcome: TrialOutcome) {
    stats.trials += 1;
    match outcome {
        TrialOutcome::Kept => {
            stats.success_count += 1;
            stats.kept.add(echo.exp_consumed(), echo.tuners_consumed());
        }
        TrialOutcome::Aborted(gate) => {
            let (exp, tuners) = partial_refund(echo.exp_consumed(), echo.tuners_consumed());
            stats.abandoned.add(exp, tuners);
            stats.aborted_at[gate.index()] += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::echo::EXP_COST_TABLE;

    #[test]
    fn partial_refund_truncates() {
        assert_eq!(partial_refund(100, 100), (25, 70));
        assert_eq!(partial_refund(4400, 10), (1100, 7));
        assert_eq!(partial_refund(3, 1), (0, 0));
    }

    #[test]
    fn outcome_matches_unlocked_slots() {
        let mut rng = Rng::new(2024);
        let mut echo = Echo::new();
        for _ in 0..2_000 {
            match run_trial(&mut echo, &mut rng) {
                TrialOutcome::Kept => assert!(echo.is_full()),
                TrialOutcome::Aborted(gate) => {
                    assert_eq!(echo.unlocked(), gate.unlocked_at());
                    let expected: u64 = EXP_COST_TABLE[..gate.unlocked_at()].iter().sum();
                    assert_eq!(echo.exp_consumed(), expected);
                }
            }
        }
    }

    #[test]
    fn aborted_trial_lands_in_abandoned_bucket() {
        let mut stats = SimStats::default();
        let mut echo = Echo::new();
        let mut rng = Rng::new(1);
        echo.tune(&mut rng);

        record_outcome(&mut stats, &echo, TrialOutcome::Aborted(Gate::First));

        assert_eq!(stats.trials, 1);
        assert_eq!(stats.success_count, 0);
        assert_eq!(stats.kept, ResourceTotals::default());
        assert_eq!(stats.abandoned, ResourceTotals { exp: 1100, tuners: 7 });
        assert_eq!(stats.aborted_at, [1, 0, 0, 0]);
    }

    #[test]
    fn kept_trial_records_full_totals() {
        let mut stats = SimStats::default();
        let mut echo = Echo::new();
        let mut rng = Rng::new(1);
        for _ in 0..5 {
            echo.tune(&mut rng);
        }

        record_outcome(&mut stats, &echo, TrialOutcome::Kept);

        assert_eq!(stats.success_count, 1);
        assert_eq!(stats.kept, ResourceTotals { exp: 142_600, tuners: 50 });
    }

    #[test]
    fn merge_sums_every_field() {
        let mut a = SimStats {
            trials: 3,
            success_count: 1,
            kept: ResourceTotals { exp: 10, tuners: 1 },
            abandoned: ResourceTotals { exp: 5, tuners: 2 },
            aborted_at: [1, 1, 0, 0],
        };
        let b = SimStats {
            trials: 2,
            success_count: 0,
            kept: ResourceTotals::default(),
            abandoned: ResourceTotals { exp: 7, tuners: 3 },
            aborted_at: [0, 0, 1, 1],
        };
        a.merge(&b);
        assert_eq!(a.trials, 5);
        assert_eq!(a.abandoned, ResourceTotals { exp: 12, tuners: 5 });
        assert_eq!(a.aborted_at, [1, 1, 1, 1]);
    }
}

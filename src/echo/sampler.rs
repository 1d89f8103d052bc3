//! Random draws for substat kinds and values.

use crate::echo::catalog::{SubStat, ROLL_RANGE};
use crate::echo::rng::Rng;

/// Index of the bucket a roll in `[0, ROLL_RANGE)` falls into.
/// Falls back to the last bucket if the table does not cover the roll.
#[inline]
pub fn bucket_for_roll(cdf: &[u32], roll: u32) -> usize {
    cdf.iter()
        .position(|&bound| roll < bound)
        .unwrap_or(cdf.len().saturating_sub(1))
}

/// Roll a magnitude for `kind` from its weighted value table. Consumes one draw.
#[inline]
pub fn sample_value(kind: SubStat, rng: &mut Rng) -> f32 {
    let roll = rng.below(ROLL_RANGE);
    let values = kind.values();
    debug_assert!(!values.is_empty(), "cannot roll a value for {kind:?}");
    values[bucket_for_roll(kind.group().cdf(), roll)]
}

/// Roll a kind not already present in `existing` (the occupied slots).
/// Rejection sampling: at most 5 of 13 kinds are ever excluded.
#[inline]
pub fn sample_kind(existing: &[SubStat], rng: &mut Rng) -> SubStat {
    debug_assert!(existing.len() < SubStat::ALL.len());
    loop {
        let candidate = SubStat::ALL[rng.below(SubStat::ALL.len() as u32) as usize];
        if !existing.contains(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_maps_to_first_bucket_above_it() {
        let cdf = [700, 5900, 9700, 10_000];
        assert_eq!(bucket_for_roll(&cdf, 0), 0);
        assert_eq!(bucket_for_roll(&cdf, 699), 0);
        assert_eq!(bucket_for_roll(&cdf, 700), 1);
        assert_eq!(bucket_for_roll(&cdf, 9699), 2);
        assert_eq!(bucket_for_roll(&cdf, 9999), 3);
    }

    #[test]
    fn roll_past_table_falls_back_to_last_bucket() {
        assert_eq!(bucket_for_roll(&[100, 200], 500), 1);
    }

    #[test]
    fn sample_kind_skips_existing() {
        let mut rng = Rng::new(3);
        let existing = [
            SubStat::Atk,
            SubStat::Hp,
            SubStat::Def,
            SubStat::CritRate,
            SubStat::CritDamage,
        ];
        for _ in 0..10_000 {
            let kind = sample_kind(&existing, &mut rng);
            assert!(!existing.contains(&kind));
            assert_ne!(kind, SubStat::None);
        }
    }

    #[test]
    fn sample_kind_with_nothing_excluded_reaches_every_kind() {
        let mut rng = Rng::new(11);
        let mut seen = [false; 13];
        for _ in 0..10_000 {
            let kind = sample_kind(&[], &mut rng);
            let index = SubStat::ALL.iter().position(|&k| k == kind).expect("rollable kind");
            seen[index] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}

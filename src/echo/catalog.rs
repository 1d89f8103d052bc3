//! Substat catalog: every rollable kind, its value table and its probability group.
//!
//! Probabilities are stored as cumulative tables over [`ROLL_RANGE`] (10000 = 100.00%),
//! so a uniform roll maps to the first bucket whose upper bound exceeds it.
//! Everything here is `const` data shared by all workers without synchronization.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Width of the integer roll space: two decimal digits of percentage.
pub const ROLL_RANGE: u32 = 10_000;

/// 7%, 52%, 38%, 3%
const CDF_FLAT_ATK: [u32; 4] = [700, 5900, 9700, 10_000];
/// 14%, 45%, 38%, 3%
const CDF_FLAT_DEF: [u32; 4] = [1400, 5900, 9700, 10_000];
/// 6.5%, 7.5%, 20.0%, 25.0%, 17.0%, 15.0%, 6.0%, 3.0%
const CDF_STANDARD: [u32; 8] = [650, 1400, 3400, 5900, 7600, 9100, 9700, 10_000];
/// 23.6%, 23.6%, 23.6%, 8.0%, 8.0%, 8.0%, 2.6%, 2.6%
const CDF_CRIT: [u32; 8] = [2360, 4720, 7080, 7880, 8680, 9480, 9740, 10_000];

const VALUES_ATK: [f32; 4] = [30.0, 40.0, 50.0, 60.0];
const VALUES_DEF: [f32; 4] = [40.0, 50.0, 60.0, 70.0];
const VALUES_HP: [f32; 8] = [320.0, 360.0, 390.0, 430.0, 470.0, 510.0, 540.0, 580.0];
const VALUES_STANDARD_PERCENT: [f32; 8] = [6.4, 7.1, 7.9, 8.6, 9.4, 10.1, 10.9, 11.6];
const VALUES_DEF_PERCENT: [f32; 8] = [8.1, 9.0, 10.0, 10.9, 11.8, 12.8, 13.8, 14.7];
const VALUES_ENERGY_REGEN: [f32; 8] = [6.8, 7.6, 8.4, 9.2, 10.0, 10.8, 11.6, 12.4];
const VALUES_CRIT_RATE: [f32; 8] = [6.3, 6.9, 7.5, 8.1, 8.7, 9.3, 9.9, 10.5];
const VALUES_CRIT_DAMAGE: [f32; 8] = [12.6, 13.8, 15.0, 16.2, 17.4, 18.6, 19.8, 21.0];

/// Weight table shared by one or more substat kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityGroup {
    FlatAtk,
    FlatDef,
    Standard,
    Crit,
}

impl ProbabilityGroup {
    pub const ALL: [ProbabilityGroup; 4] = [
        ProbabilityGroup::FlatAtk,
        ProbabilityGroup::FlatDef,
        ProbabilityGroup::Standard,
        ProbabilityGroup::Crit,
    ];

    /// Cumulative upper bounds; `cdf()[i]` closes the interval mapped to value index `i`.
    pub const fn cdf(self) -> &'static [u32] {
        match self {
            Self::FlatAtk => &CDF_FLAT_ATK,
            Self::FlatDef => &CDF_FLAT_DEF,
            Self::Standard => &CDF_STANDARD,
            Self::Crit => &CDF_CRIT,
        }
    }

    /// Per-bucket weight in roll units (out of [`ROLL_RANGE`]).
    pub fn weights(self) -> Vec<u32> {
        let mut previous = 0;
        self.cdf()
            .iter()
            .map(|&bound| {
                let weight = bound.saturating_sub(previous);
                previous = bound;
                weight
            })
            .collect()
    }
}

/// Substat kind. `None` marks an empty slot and is never rolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubStat {
    #[default]
    None,
    Atk,
    Hp,
    Def,
    AtkPercent,
    HpPercent,
    DefPercent,
    EnergyRegen,
    CritRate,
    CritDamage,
    BasicAttackBonus,
    HeavyAttackBonus,
    ResonanceSkillBonus,
    ResonanceLiberationBonus,
}

impl SubStat {
    /// Every rollable kind, in catalog order.
    pub const ALL: [SubStat; 13] = [
        SubStat::Atk,
        SubStat::Hp,
        SubStat::Def,
        SubStat::AtkPercent,
        SubStat::HpPercent,
        SubStat::DefPercent,
        SubStat::EnergyRegen,
        SubStat::CritRate,
        SubStat::CritDamage,
        SubStat::BasicAttackBonus,
        SubStat::HeavyAttackBonus,
        SubStat::ResonanceSkillBonus,
        SubStat::ResonanceLiberationBonus,
    ];

    pub const fn group(self) -> ProbabilityGroup {
        match self {
            Self::Atk => ProbabilityGroup::FlatAtk,
            Self::Def => ProbabilityGroup::FlatDef,
            Self::CritRate | Self::CritDamage => ProbabilityGroup::Crit,
            _ => ProbabilityGroup::Standard,
        }
    }

    /// Candidate magnitudes, weakest first. Empty for `None`.
    pub const fn values(self) -> &'static [f32] {
        match self {
            Self::None => &[],
            Self::Atk => &VALUES_ATK,
            Self::Def => &VALUES_DEF,
            Self::Hp => &VALUES_HP,
            Self::AtkPercent
            | Self::HpPercent
            | Self::BasicAttackBonus
            | Self::HeavyAttackBonus
            | Self::ResonanceSkillBonus
            | Self::ResonanceLiberationBonus => &VALUES_STANDARD_PERCENT,
            Self::DefPercent => &VALUES_DEF_PERCENT,
            Self::EnergyRegen => &VALUES_ENERGY_REGEN,
            Self::CritRate => &VALUES_CRIT_RATE,
            Self::CritDamage => &VALUES_CRIT_DAMAGE,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "-",
            Self::Atk => "ATK",
            Self::Hp => "HP",
            Self::Def => "DEF",
            Self::AtkPercent => "ATK%",
            Self::HpPercent => "HP%",
            Self::DefPercent => "DEF%",
            Self::EnergyRegen => "Energy Regen",
            Self::CritRate => "Crit. Rate",
            Self::CritDamage => "Crit. DMG",
            Self::BasicAttackBonus => "Basic Attack DMG Bonus",
            Self::HeavyAttackBonus => "Heavy Attack DMG Bonus",
            Self::ResonanceSkillBonus => "Resonance Skill DMG Bonus",
            Self::ResonanceLiberationBonus => "Resonance Liberation DMG Bonus",
        }
    }
}

impl fmt::Display for SubStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("probability group {group:?} ends at {last}, expected 10000")]
    IncompleteDistribution { group: ProbabilityGroup, last: u32 },
    #[error("probability group {group:?} decreases at index {index}")]
    DecreasingDistribution { group: ProbabilityGroup, index: usize },
    #[error("{kind} has {values} values but its probability group has {buckets} buckets")]
    TableLengthMismatch {
        kind: SubStat,
        values: usize,
        buckets: usize,
    },
    #[error("{kind} values are not ordered weakest to strongest at index {index}")]
    UnorderedValues { kind: SubStat, index: usize },
}

/// Check the catalog's data integrity. Runs once before a simulation starts.
pub fn validate_catalog() -> Result<(), CatalogError> {
    for group in ProbabilityGroup::ALL {
        validate_group(group, group.cdf())?;
    }
    for kind in SubStat::ALL {
        validate_kind(kind, kind.values(), kind.group().cdf().len())?;
    }
    Ok(())
}

/// `cdf` must be non-decreasing and end at [`ROLL_RANGE`].
pub fn validate_group(group: ProbabilityGroup, cdf: &[u32]) -> Result<(), CatalogError> {
    if let Some(index) = cdf.windows(2).position(|pair| pair[1] < pair[0]) {
        return Err(CatalogError::DecreasingDistribution {
            group,
            index: index + 1,
        });
    }
    let last = cdf.last().copied().unwrap_or(0);
    if last != ROLL_RANGE {
        return Err(CatalogError::IncompleteDistribution { group, last });
    }
    Ok(())
}

/// `values` must have one entry per bucket and be strictly increasing.
pub fn validate_kind(kind: SubStat, values: &[f32], buckets: usize) -> Result<(), CatalogError> {
    if values.len() != buckets {
        return Err(CatalogError::TableLengthMismatch {
            kind,
            values: values.len(),
            buckets,
        });
    }
    if let Some(index) = values.windows(2).position(|pair| pair[1] <= pair[0]) {
        return Err(CatalogError::UnorderedValues {
            kind,
            index: index + 1,
        });
    }
    Ok(())
}

/// Serializable view of one catalog entry, used by the `catalog` command.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub kind: SubStat,
    pub label: &'static str,
    pub group: ProbabilityGroup,
    pub values: &'static [f32],
    pub weights: Vec<u32>,
}

pub fn catalog_entries() -> Vec<CatalogEntry> {
    SubStat::ALL
        .iter()
        .map(|&kind| CatalogEntry {
            kind,
            label: kind.label(),
            group: kind.group(),
            values: kind.values(),
            weights: kind.group().weights(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_catalog_is_valid() {
        assert_eq!(validate_catalog(), Ok(()));
    }

    #[test]
    fn group_ending_short_of_roll_range_is_incomplete() {
        assert_eq!(
            validate_group(ProbabilityGroup::FlatAtk, &[700, 5900, 9700, 9999]),
            Err(CatalogError::IncompleteDistribution {
                group: ProbabilityGroup::FlatAtk,
                last: 9999
            })
        );
        assert_eq!(
            validate_group(ProbabilityGroup::Crit, &[]),
            Err(CatalogError::IncompleteDistribution {
                group: ProbabilityGroup::Crit,
                last: 0
            })
        );
    }

    #[test]
    fn group_with_decreasing_bound_is_rejected() {
        assert_eq!(
            validate_group(ProbabilityGroup::Standard, &[650, 1400, 1300, 10_000]),
            Err(CatalogError::DecreasingDistribution {
                group: ProbabilityGroup::Standard,
                index: 2
            })
        );
    }

    #[test]
    fn kind_with_wrong_value_count_is_rejected() {
        assert_eq!(
            validate_kind(SubStat::Atk, &[30.0, 40.0, 50.0], 4),
            Err(CatalogError::TableLengthMismatch {
                kind: SubStat::Atk,
                values: 3,
                buckets: 4
            })
        );
    }

    #[test]
    fn kind_with_repeated_value_is_unordered() {
        assert_eq!(
            validate_kind(SubStat::CritRate, &[6.3, 6.9, 6.9, 8.1], 4),
            Err(CatalogError::UnorderedValues {
                kind: SubStat::CritRate,
                index: 2
            })
        );
        assert_eq!(validate_kind(SubStat::Def, &[40.0, 50.0, 60.0, 70.0], 4), Ok(()));
    }

    #[test]
    fn catalog_errors_name_the_offending_table() {
        let err = CatalogError::TableLengthMismatch {
            kind: SubStat::EnergyRegen,
            values: 7,
            buckets: 8,
        };
        assert_eq!(
            err.to_string(),
            "Energy Regen has 7 values but its probability group has 8 buckets"
        );
    }

    #[test]
    fn all_excludes_empty_placeholder() {
        assert_eq!(SubStat::ALL.len(), 13);
        assert!(!SubStat::ALL.contains(&SubStat::None));
    }

    #[test]
    fn weights_sum_to_roll_range() {
        for group in ProbabilityGroup::ALL {
            assert_eq!(group.weights().iter().sum::<u32>(), ROLL_RANGE, "{group:?}");
        }
    }

    #[test]
    fn crit_kinds_use_crit_group() {
        assert_eq!(SubStat::CritRate.group(), ProbabilityGroup::Crit);
        assert_eq!(SubStat::CritDamage.group(), ProbabilityGroup::Crit);
        assert_eq!(SubStat::Hp.group(), ProbabilityGroup::Standard);
        assert_eq!(SubStat::Atk.values().len(), 4);
    }

    #[test]
    fn catalog_entries_serialize_with_snake_case_kinds() {
        let json = serde_json::to_value(catalog_entries()).expect("catalog should serialize");
        assert_eq!(json[0]["kind"], "atk");
        assert_eq!(json[7]["group"], "crit");
        assert_eq!(json[0]["weights"][1], 5200);
    }
}

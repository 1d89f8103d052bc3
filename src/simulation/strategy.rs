//! Keep-or-abandon policy evaluated at four tuning checkpoints.

use serde::Serialize;

use crate::echo::{Echo, SubStat};

pub const CRIT_RATE_MIN: f32 = 6.9;
pub const CRIT_DAMAGE_MIN: f32 = 13.8;
pub const ATK_PERCENT_MIN: f32 = 7.9;
pub const LIBERATION_BONUS_MIN: f32 = 7.9;
pub const ENERGY_REGEN_MIN: f32 = 8.4;
pub const FLAT_ATK_MIN: f32 = 40.0;

/// Counts of useful substats. Each tier includes the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub crit: u32,
    pub good: u32,
    pub okay: u32,
}

/// Recount the echo's unlocked substats from scratch.
pub fn evaluate(echo: &Echo) -> Tally {
    let crit = u32::from(echo.has_stat(SubStat::CritRate, CRIT_RATE_MIN))
        + u32::from(echo.has_stat(SubStat::CritDamage, CRIT_DAMAGE_MIN));

    let good = crit
        + u32::from(echo.has_stat(SubStat::AtkPercent, ATK_PERCENT_MIN))
        + u32::from(echo.has_stat(SubStat::ResonanceLiberationBonus, LIBERATION_BONUS_MIN))
        + u32::from(echo.has_stat(SubStat::EnergyRegen, ENERGY_REGEN_MIN));

    let okay = good + u32::from(echo.has_stat(SubStat::Atk, FLAT_ATK_MIN));

    Tally { crit, good, okay }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Gate {
    First,
    Second,
    Third,
    Final,
}

impl Gate {
    pub const ALL: [Gate; 4] = [Gate::First, Gate::Second, Gate::Third, Gate::Final];

    /// Tunes performed immediately before this gate is checked.
    pub const fn tunes(self) -> usize {
        match self {
            Self::Second => 2,
            Self::First | Self::Third | Self::Final => 1,
        }
    }

    /// Slots unlocked once this gate is reached.
    pub const fn unlocked_at(self) -> usize {
        match self {
            Self::First => 1,
            Self::Second => 3,
            Self::Third => 4,
            Self::Final => 5,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Third => 2,
            Self::Final => 3,
        }
    }

    pub fn passes(self, tally: Tally) -> bool {
        match self {
            Self::First => tally.good >= 1,
            Self::Second => tally.crit >= 1,
            Self::Third => tally.okay >= 3,
            Self::Final => tally.crit >= 2 && tally.good >= 3 && tally.okay >= 4,
        }
    }
}

pub mod catalog;
pub mod item;
pub mod rng;
pub mod sampler;

pub use catalog::{
    catalog_entries, validate_catalog, validate_group, validate_kind, CatalogEntry, CatalogError,
    ProbabilityGroup, SubStat, ROLL_RANGE,
};
pub use item::{Echo, EXP_COST_TABLE, MAX_SLOTS, TUNER_COST};
pub use rng::Rng;
pub use sampler::{bucket_for_roll, sample_kind, sample_value};

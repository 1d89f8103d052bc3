pub mod monte_carlo;
pub mod report;
pub mod strategy;
pub mod trial;

pub use monte_carlo::{
    entropy_seed, run_batch, run_simulation, run_simulation_sequential, SimulationError,
    SimulationResult, BATCH_SIZE,
};
pub use report::{CostBreakdown, GateDropoff, Report};
pub use strategy::{evaluate, Gate, Tally};
pub use trial::{
    partial_refund, record_outcome, run_trial, ResourceTotals, SimStats, TrialOutcome,
};

pub mod models;
pub mod replay;
pub mod report;
pub mod tally;
pub mod validation;

pub use models::*;
pub use replay::{Replay, ReplaySpeed, Standing, CLUSTER_EPSILON_MS};
pub use tally::{
    CandidateTally, DepartmentBreakdown, DepartmentDomination, DepartmentSlice, ElectionSummary,
    LeaderStats, Tally,
};
pub use validation::*;

#[cfg(test)]
mod tests;

pub mod catchers;
pub mod cors;
pub mod error;
pub mod queries;
pub mod routes;
pub mod seed;
pub mod session;
pub mod store;
pub mod utils;

pub use shared::models::*;
pub use shared::{replay::Replay, tally::Tally};

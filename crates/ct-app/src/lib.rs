//! Application service layer for cargotrim.
//!
//! Shared by the CLI and any other front end: settings, the optimizer seam,
//! the three-tier result resolution pipeline and flight listing.

pub mod balance;
pub mod baseline;
pub mod canonical;
pub mod config;
pub mod distribution;
pub mod error;
pub mod estimate;
pub mod flight_service;
pub mod live;
pub mod metrics;
pub mod optimizer;
pub mod precomputed;
pub mod progress;
pub mod resolve_service;

// Re-export key types for convenience
pub use config::{Assumptions, SafetyLimits, Settings};
pub use error::{AppError, AppResult};
pub use flight_service::{FlightSummary, list_flight_summaries};
pub use optimizer::{
    CommandOptimizer, ItemAssignment, Optimizer, OptimizerError, SolveInputs, SolveOutcome,
    SolvedContainer, UnavailableOptimizer, solve_with_deadline,
};
pub use progress::{ResolveEvent, ResolveStage};
pub use resolve_service::{ResolveRequest, Resolver};

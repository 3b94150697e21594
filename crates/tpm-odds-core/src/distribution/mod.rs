//! Implied policy-rate distributions per monetary policy meeting.

pub mod analysis;
pub mod binomial;
pub mod grid;
pub mod heuristic;
pub mod matrix;

pub use analysis::{
    analyze_binomial, analyze_heuristic, analyze_implied_path, BinomialInput, DistributionModel,
    HeuristicInput, ImpliedPathInput, ImpliedPathOutput,
};
pub use binomial::{binomial_distribution, binomial_distribution_unrounded, run_binomial, BinomialOutput};
pub use grid::{DistributionConfig, ImpliedRateLookup};
pub use heuristic::{heuristic_distribution, heuristic_distribution_unrounded, ImpliedRateObservation};
pub use matrix::{ProbabilityMatrix, SkipReason, SkippedMeeting};

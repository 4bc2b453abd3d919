// Module declarations
pub mod aggregate;
pub mod assignment;
pub mod decision;
pub mod persist;
pub mod retrieval;
pub mod scoring;
pub mod types;

pub use types::*;

pub use aggregate::{normalize_and_filter, passes_floor, CandidateStats};
pub use assignment::StoryResolver;
pub use decision::{best_candidate, combined_score, decide};
pub use persist::persist_decision;
pub use retrieval::retrieve_candidates;
pub use scoring::{score_candidates, Scorers};

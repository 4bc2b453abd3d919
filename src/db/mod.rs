// Re-export the Database struct and other public items
pub mod article;
pub mod cluster;
pub mod core;
mod schema;

// Re-export Database and the row types
pub use self::article::{CandidateArticle, StoredArticle};
pub use self::cluster::{ClusterOverview, StoredCluster};
pub use self::core::Database;

pub mod clustering;
pub mod config;
pub mod db;
pub mod environment;
pub mod error;
pub mod logging;
pub mod text;

pub const TARGET_DB: &str = "db_query";
pub const TARGET_CLUSTERING: &str = "clustering";
pub const TARGET_TEXT: &str = "text";

pub use clustering::{DecisionResult, IncomingArticle, StoryResolver};
pub use config::ResolveOptions;
pub use db::Database;
pub use error::ResolveError;

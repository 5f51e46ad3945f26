pub mod config;
pub mod matcher;
pub mod reference;
pub mod table;
pub mod taxonomy_table;

pub use config::{Config, MatchLevel};
pub use matcher::Matcher;

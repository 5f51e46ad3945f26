pub mod config;
pub mod curate;
pub mod normalize;

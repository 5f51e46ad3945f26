pub mod taxonomy;

pub use taxonomy::{MatchRank, RankLetter};

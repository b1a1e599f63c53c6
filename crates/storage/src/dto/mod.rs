pub mod common;
pub mod leaderboard;
pub mod prediction;
pub mod profile;
pub mod program;

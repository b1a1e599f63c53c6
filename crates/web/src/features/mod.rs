pub mod leaderboard;
pub mod predictions;
pub mod profiles;
pub mod programs;
pub mod scoring;

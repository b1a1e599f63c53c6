pub mod leaderboard;
pub mod rescoring;
pub mod schedule;
pub mod scoring;
pub mod submission;

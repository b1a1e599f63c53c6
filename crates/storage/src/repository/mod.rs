pub mod prediction;
pub mod profile;
pub mod program;
pub mod store;

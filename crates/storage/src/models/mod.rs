pub mod prediction;
pub mod profile;
pub mod program;
pub mod scoring_record;

pub use prediction::Prediction;
pub use profile::Profile;
pub use program::Program;
pub use scoring_record::ScoringRecord;

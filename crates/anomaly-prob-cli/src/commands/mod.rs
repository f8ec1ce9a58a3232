//! CLI command implementations

pub mod fit;
pub mod score;
pub mod simulate;

//! Domain extractors.
//!
//! - `acteurs` - legislators, their mandates and referenced organs
//! - `votes` - roll-call votes with group and individual breakdowns

pub mod acteurs;
pub mod votes;

pub use acteurs::ActeursExtractor;
pub use votes::VotesExtractor;

//! Directional crossing counts derived from tracked centroids.

mod band;
mod counter;
mod line;
mod policy;
mod side;

pub use band::BandPolicy;
pub use counter::CrossingCounter;
pub use line::LinePolicy;
pub use policy::{CountSnapshot, CountingPolicy, CrossingPolicy, Tally};
pub use side::Side;

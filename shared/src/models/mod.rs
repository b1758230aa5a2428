//! Domain models for crop phenology

mod crop;
mod summary;
mod weather;

pub use crop::*;
pub use summary::*;
pub use weather::*;

//! Shared types and models for cropstage
//!
//! Growing Degree Day (GDD) accumulation and phenological stage
//! classification, shared between the command line tool, the WASM module
//! and other components of the system.

pub mod crops;
pub mod error;
pub mod gdd;
pub mod historical;
pub mod models;
pub mod season;
pub mod types;
pub mod validation;

pub use crops::*;
pub use error::*;
pub use gdd::*;
pub use historical::*;
pub use models::*;
pub use season::*;
pub use types::*;
pub use validation::*;

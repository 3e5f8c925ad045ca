//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem)
//! but are themselves concrete structs, not traits.

mod extraction;
mod source;

pub use extraction::{Extraction, ExtractionRequest, ExtractionService};
pub use source::{SourceLoader, SOURCE_EXTENSION};

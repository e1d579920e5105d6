//! Core business logic abstractions

pub mod config;
pub mod deadline;
pub mod error;
pub mod log;
pub mod quote;
pub mod store;

// Re-export main types for cleaner imports
pub use error::{QuoteError, QuoteResult, Stage};
pub use quote::{Quote, QuoteProvider, QuoteRecord};
pub use store::QuoteStore;

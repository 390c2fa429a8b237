//! Core types and service wiring for the binday bin-collection lookup.

/// Domain models shared by the provider and the front-ends.
pub mod model;
/// Traits describing the provider interface and its error taxonomy.
pub mod ports;
/// Plain text and JSON renderings of a lookup result.
pub mod render;
/// High-level service facade used by clients.
pub mod service;
/// Per-lookup debug trace.
pub mod trace;

pub use model::*;
pub use ports::*;
pub use render::*;
pub use service::*;
pub use trace::*;

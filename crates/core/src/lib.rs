//! hinterzimmer-core – Gemeinsame Typen und Fehlertypen
//!
//! Dieses Crate stellt die fundamentalen Bausteine bereit, die von allen
//! anderen Hinterzimmer-Crates gemeinsam genutzt werden.

pub mod error;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::{HinterzimmerError, Result};
pub use types::{AdminId, RaumId, SitzungsId};

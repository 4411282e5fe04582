//! hinterzimmer-rooms – Raum-Verwaltung und Zutrittskontrolle
//!
//! Dieses Crate implementiert:
//! - SessionRegistry: prozessweite Mitglieder-Tabelle mit
//!   Nickname-Eindeutigkeit pro Raum und Geraete-Bindung an hoechstens
//!   einen Raum
//! - RaumStore-Trait + In-Memory-Implementierung (Persistenz liegt
//!   ausserhalb dieses Crates)
//! - RaumService: Raum-Erstellung (Admin) und Raum-Zutritt (PIN-Pruefung,
//!   Sitzungsschluessel-Entpackung, Credential-Ausstellung, Registrierung)

pub mod error;
pub mod registry;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

// Bequeme Re-Exporte
pub use error::{RaumError, RaumResult};
pub use registry::SessionRegistry;
pub use service::{RaumService, ZutrittGewaehrt};
pub use store::{MemoryRaumStore, RaumStore};
pub use types::{
    geraete_abdruck_berechnen, nickname_bereinigen, nickname_hash_berechnen, NeuerRaum,
    OeffentlicheSitzung, Raum, RaumSitzung, RaumTyp,
};

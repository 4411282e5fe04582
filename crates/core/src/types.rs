//! Gemeinsame Identifikationstypen fuer Hinterzimmer
//!
//! Alle IDs verwenden das Newtype-Pattern um Verwechslungen zwischen
//! verschiedenen ID-Arten zur Compilezeit auszuschliessen.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Eindeutige Raum-ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RaumId(pub Uuid);

impl RaumId {
    /// Erstellt eine neue zufaellige RaumId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for RaumId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RaumId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Eindeutige Sitzungs-ID (eine aktive Raum-Mitgliedschaft)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SitzungsId(pub Uuid);

impl SitzungsId {
    /// Erstellt eine neue zufaellige SitzungsId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for SitzungsId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SitzungsId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Eindeutige Admin-Konto-ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdminId(pub Uuid);

impl AdminId {
    /// Erstellt eine neue zufaellige AdminId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for AdminId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AdminId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "admin:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raum_id_eindeutig() {
        let a = RaumId::new();
        let b = RaumId::new();
        assert_ne!(a, b, "Zwei neue RaumIds muessen verschieden sein");
    }

    #[test]
    fn sitzungs_id_eindeutig() {
        let a = SitzungsId::new();
        let b = SitzungsId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn admin_id_display() {
        let id = AdminId(Uuid::nil());
        assert!(id.to_string().starts_with("admin:"));
    }

    #[test]
    fn ids_sind_serde_kompatibel() {
        let id = RaumId::new();
        let json = serde_json::to_string(&id).unwrap();
        let id2: RaumId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, id2);
    }
}

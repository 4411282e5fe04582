//! Fehlertypen fuer Hinterzimmer
//!
//! Zentraler Fehler-Enum der alle moeglichen Fehlerzustaende abdeckt.
//! Untermodule definieren eigene Fehler und konvertieren via `#[from]`.

use thiserror::Error;

/// Globaler Result-Alias fuer Hinterzimmer
pub type Result<T> = std::result::Result<T, HinterzimmerError>;

/// Alle moeglichen Fehler im Hinterzimmer-System
#[derive(Debug, Error)]
pub enum HinterzimmerError {
    // --- Authentifizierung & Autorisierung ---
    #[error("Authentifizierung fehlgeschlagen: {0}")]
    Authentifizierung(String),

    #[error("Zugriff verweigert: {0}")]
    ZugriffVerweigert(String),

    // --- Ressourcen ---
    #[error("Raum nicht gefunden: {0}")]
    RaumNichtGefunden(String),

    #[error("Sitzung nicht gefunden: {0}")]
    SitzungNichtGefunden(String),

    // --- Inhaltspruefung ---
    #[error("Datei abgelehnt: {0}")]
    DateiAbgelehnt(String),

    #[error("Zeitlimit ueberschritten: {0}")]
    Zeitlimit(String),

    // --- Konfiguration ---
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl HinterzimmerError {
    /// Erstellt einen internen Fehler aus einer beliebigen Nachricht
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Gibt true zurueck wenn der Fehler eine Anfrage terminal ablehnt
    ///
    /// Terminale Fehler werden dem Aufrufer als Ablehnung gemeldet und
    /// niemals automatisch wiederholt.
    pub fn ist_terminal(&self) -> bool {
        !matches!(self, Self::Zeitlimit(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fehler_anzeige() {
        let e = HinterzimmerError::Authentifizierung("PIN falsch".into());
        assert_eq!(e.to_string(), "Authentifizierung fehlgeschlagen: PIN falsch");
    }

    #[test]
    fn terminal_erkennung() {
        assert!(HinterzimmerError::ZugriffVerweigert("test".into()).ist_terminal());
        assert!(!HinterzimmerError::Zeitlimit("test".into()).ist_terminal());
    }
}

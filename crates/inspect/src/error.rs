//! Fehlertypen fuer die Inhaltspruefung

use thiserror::Error;

/// Fehler bei Dateityp-Pruefung und Steganografie-Analyse
#[derive(Debug, Error)]
pub enum InspectError {
    // --- Typ-Schicht ---
    #[error("Dateityp nicht unterstuetzt: {0}")]
    DateitypNichtUnterstuetzt(String),

    #[error("Signatur und deklarierter Typ stimmen nicht ueberein: deklariert={deklariert}, erkannt={erkannt}")]
    SignaturErweiterungKonflikt { deklariert: String, erkannt: String },

    #[error("Datei zu gross: {groesse} Bytes (Maximum {max})")]
    DateiZuGross { groesse: usize, max: usize },

    // --- Steg-Schicht ---
    /// Analyse hat das Zeitlimit ueberschritten. Bedeutet "nicht pruefbar",
    /// nicht "sauber" – der Aufrufer darf das niemals als Freigabe werten.
    #[error("Steganografie-Analyse hat das Zeitlimit ueberschritten")]
    AnalyseZeitueberschreitung,

    #[error("Steganografie-Analyse fehlgeschlagen: {0}")]
    AnalyseIo(String),

    #[error("Datei wegen Steganografie-Verdacht abgelehnt (Score {score:.2})")]
    SteganografieVerdacht { score: f64 },
}

pub type InspectResult<T> = Result<T, InspectError>;

//! Fehlertypen fuer die Raum-Verwaltung

use thiserror::Error;

/// Alle moeglichen Fehler in der Raum-Verwaltung
#[derive(Debug, Error)]
pub enum RaumError {
    // --- Registry ---
    #[error("Nickname bereits im Raum vergeben: {0}")]
    NicknameVergeben(String),

    #[error("Geraet ist bereits an einen anderen Raum gebunden")]
    GeraetBereitsGebunden,

    // --- Zutritt ---
    #[error("Raum nicht gefunden oder inaktiv: {0}")]
    RaumNichtGefunden(String),

    #[error("PIN falsch")]
    PinFalsch,

    #[error("Nickname zu kurz: mindestens {mindestens} Zeichen")]
    NicknameZuKurz { mindestens: usize },

    // --- Erstellung ---
    #[error("PIN zu kurz: mindestens {mindestens} Zeichen")]
    PinZuKurz { mindestens: usize },

    // --- Unterbau ---
    #[error("Kryptografie-Fehler: {0}")]
    Crypto(#[from] hinterzimmer_crypto::CryptoError),

    #[error("Credential-Fehler: {0}")]
    Auth(#[from] hinterzimmer_auth::AuthError),

    #[error("Interner Fehler: {0}")]
    Intern(String),
}

/// Result-Alias fuer die Raum-Verwaltung
pub type RaumResult<T> = Result<T, RaumError>;

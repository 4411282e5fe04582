//! Fehlertypen fuer den Auth-Service

use thiserror::Error;

/// Alle moeglichen Fehler im Auth-Service
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Credentials ---
    #[error("Credential fehlerhaft: {0}")]
    TokenFehlerhaft(String),

    #[error("Credential-Signatur ungueltig")]
    SignaturUngueltig,

    #[error("Credential abgelaufen")]
    TokenAbgelaufen,

    #[error("Credential hat nicht den benoetigten Scope: {0}")]
    ScopeFehlend(String),

    // --- Anmeldung ---
    #[error("Benutzername oder Passwort falsch")]
    UngueltigeAnmeldedaten,

    #[error("Zweiter Faktor ungueltig")]
    ZweiterFaktorUngueltig,

    // --- Krypto ---
    #[error("Kryptografie-Fehler: {0}")]
    Crypto(#[from] hinterzimmer_crypto::CryptoError),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }
}

/// Result-Alias fuer den Auth-Service
pub type AuthResult<T> = Result<T, AuthError>;

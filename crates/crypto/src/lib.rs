//! hinterzimmer-crypto – Schluesselverwahrung (CredentialVault)
//!
//! Dieses Crate implementiert:
//! - Schnelle Schluessel-Ableitung aus dem Server-Geheimnis (SHA-256)
//! - Authentifizierte Verschluesselung mit AES-256-GCM
//! - Passwort-/PIN-Hashing mit PBKDF2-HMAC-SHA256
//! - Erzeugung und Verwahrung von Raum-Sitzungsschluesseln
//!
//! Alle Operationen sind zustandslos und ohne Koordination von beliebig
//! vielen nebenlaeufigen Aufrufern nutzbar.

pub mod error;
pub mod passwort;
pub mod schluessel;
pub mod types;
pub mod verschluesselung;

// Bequeme Re-Exporte
pub use error::{CryptoError, CryptoResult};
pub use passwort::{geheimnis_hashen, geheimnis_hashen_mit, geheimnis_verifizieren};
pub use schluessel::{schluessel_ableiten, session_schluessel_generieren};
pub use types::{EncryptedBlob, PasswortRecord};
pub use verschluesselung::{entschluesseln, verschluesseln};

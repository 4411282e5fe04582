//! hinterzimmer-auth – Credential- und Zwei-Faktor-Dienste
//!
//! Dieses Crate implementiert:
//! - Kompakte signierte Sitzungs-Credentials (HMAC-SHA256, selbsttragend,
//!   zeitlich begrenzt; keine serverseitige Speicherung, kein Widerruf)
//! - TOTP-Verifikation (RFC 6238) fuer Admin-Vorgaenge
//! - AdminService (Konto-Bootstrap, Login mit Passwort + zweitem Faktor)

pub mod admin;
pub mod error;
pub mod token;
pub mod totp;

// Bequeme Re-Exporte
pub use admin::{AdminKonto, AdminService, AdminStore, AngemeldeterAdmin};
pub use error::{AuthError, AuthResult};
pub use token::{scope_pruefen, token_signieren, token_verifizieren, Claims};
pub use totp::{totp_generieren, totp_verifizieren, totp_verifizieren_zu};

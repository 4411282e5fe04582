//! Typen der Raum-Verwaltung

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use hinterzimmer_core::{AdminId, RaumId, SitzungsId};
use hinterzimmer_crypto::{EncryptedBlob, PasswortRecord};

/// Raum-Art: reiner Text-Chat oder Chat mit Datei-Uploads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaumTyp {
    Text,
    Multimedia,
}

/// Ein angelegter Raum
#[derive(Debug, Clone)]
pub struct Raum {
    pub id: RaumId,
    /// Raum-ID verschluesselt unter dem Server-Geheimnis (fuer Einladungen)
    pub verschluesselte_id: EncryptedBlob,
    /// PBKDF2-Record des Raum-PINs
    pub pin_record: PasswortRecord,
    pub typ: RaumTyp,
    /// Maximale Upload-Groesse in Megabyte
    pub max_datei_mb: u32,
    pub erstellt_von: AdminId,
    pub erstellt_am: DateTime<Utc>,
    pub aktiv: bool,
    /// Verwahrter Sitzungsschluessel; wird nur transient beim Zutritt
    /// entpackt und niemals unverschluesselt gespeichert
    pub sitzungsschluessel: EncryptedBlob,
}

/// Eingabe zum Anlegen eines Raums
#[derive(Debug, Clone)]
pub struct NeuerRaum {
    pub typ: RaumTyp,
    pub pin: String,
    pub max_datei_mb: u32,
}

/// Eine aktive Raum-Mitgliedschaft
#[derive(Debug, Clone)]
pub struct RaumSitzung {
    pub id: SitzungsId,
    pub nickname_normalisiert: String,
    /// SHA-256 (Base64) des bereinigten Nicknames; die oeffentliche Kennung
    pub nickname_hash: String,
    /// Geraete-Abdruck; verlaesst die Registry nie
    pub geraete_abdruck: String,
    pub verbunden_am: DateTime<Utc>,
}

/// Oeffentliche Projektion einer Mitgliedschaft
///
/// Enthaelt bewusst keinen Geraete-Abdruck.
#[derive(Debug, Clone, Serialize)]
pub struct OeffentlicheSitzung {
    #[serde(rename = "nicknameHash")]
    pub nickname_hash: String,
    #[serde(rename = "connectedAt")]
    pub verbunden_am: DateTime<Utc>,
}

/// Bereinigt einen Nickname: trimmt und kollabiert Leerraum
pub fn nickname_bereinigen(nickname: &str) -> String {
    nickname.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Oeffentliche Kennung eines Nicknames: SHA-256, Base64
pub fn nickname_hash_berechnen(nickname: &str) -> String {
    let digest = Sha256::digest(nickname.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(digest)
}

/// Geraete-Abdruck aus Verbindungsmerkmalen: SHA-256 von `ip:agent`, hex
pub fn geraete_abdruck_berechnen(ip: &str, user_agent: &str) -> String {
    let digest = Sha256::digest(format!("{ip}:{user_agent}").as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nickname_bereinigung_kollabiert_leerraum() {
        assert_eq!(nickname_bereinigen("  Anna  Lena \t"), "Anna Lena");
        assert_eq!(nickname_bereinigen("Bob"), "Bob");
        assert_eq!(nickname_bereinigen("   "), "");
    }

    #[test]
    fn nickname_hash_ist_deterministisch() {
        let a = nickname_hash_berechnen("Anna");
        let b = nickname_hash_berechnen("Anna");
        assert_eq!(a, b);
        assert_ne!(a, nickname_hash_berechnen("anna"));
    }

    #[test]
    fn geraete_abdruck_ist_hex() {
        let abdruck = geraete_abdruck_berechnen("203.0.113.7", "Mozilla/5.0");
        assert_eq!(abdruck.len(), 64);
        assert!(abdruck.chars().all(|c| c.is_ascii_hexdigit()));

        let anderer = geraete_abdruck_berechnen("203.0.113.8", "Mozilla/5.0");
        assert_ne!(abdruck, anderer);
    }

    #[test]
    fn raum_typ_serde() {
        assert_eq!(serde_json::to_string(&RaumTyp::Text).unwrap(), "\"text\"");
        assert_eq!(
            serde_json::from_str::<RaumTyp>("\"multimedia\"").unwrap(),
            RaumTyp::Multimedia
        );
    }
}

//! Gemeinsame Typen der Schluesselverwahrung

use serde::{Deserialize, Serialize};

/// Ergebnis einer authentifizierten Verschluesselung
///
/// Alle Felder sind Base64-kodiert:
/// - `iv`: 12 Bytes, pro Aufruf frisch zufaellig
/// - `content`: Ciphertext
/// - `auth_tag`: 16 Bytes GCM-Tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedBlob {
    pub iv: String,
    pub content: String,
    #[serde(rename = "authTag")]
    pub auth_tag: String,
}

/// Gespeicherter Passwort-/PIN-Hash
///
/// Entsteht via PBKDF2-HMAC-SHA256 (32 Bytes Ausgabe). Bei Rotation wird
/// ein neuer Record berechnet, niemals ein bestehender veraendert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswortRecord {
    /// Base64 des 32-Byte-Hashes
    pub hash: String,
    /// Base64 des Salts (16 zufaellige Bytes wenn generiert)
    pub salt: String,
    /// Verwendete PBKDF2-Iterationen
    #[serde(rename = "iterations")]
    pub iterationen: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_serde_feldnamen() {
        let blob = EncryptedBlob {
            iv: "aXY=".into(),
            content: "Y3Q=".into(),
            auth_tag: "dGFn".into(),
        };
        let json = serde_json::to_string(&blob).unwrap();
        assert!(json.contains("\"authTag\""), "Feldname muss authTag lauten");
        assert!(!json.contains("auth_tag"));
    }

    #[test]
    fn record_serde_feldnamen() {
        let record = PasswortRecord {
            hash: "aGFzaA==".into(),
            salt: "c2FsdA==".into(),
            iterationen: 120_000,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"iterations\":120000"));
    }
}

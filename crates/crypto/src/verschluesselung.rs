//! Authentifizierte Verschluesselung mit AES-256-GCM
//!
//! ## Blob-Format
//! ```text
//! iv      = Base64(12 Zufallsbytes, pro Aufruf frisch)
//! content = Base64(Ciphertext)
//! authTag = Base64(16 Bytes GCM-Tag)
//! ```
//!
//! Zwei Aufrufe mit identischem Klartext und Geheimnis liefern verschiedene
//! IVs und Ciphertexte (probabilistische Verschluesselung).

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{CryptoError, CryptoResult};
use crate::schluessel::schluessel_ableiten;
use crate::types::EncryptedBlob;

/// IV-Laenge in Bytes (96 Bit, GCM-Standard)
const IV_LAENGE: usize = 12;

/// Tag-Laenge in Bytes (128 Bit)
const TAG_LAENGE: usize = 16;

/// Verschluesselt einen Klartext unter dem abgeleiteten Server-Schluessel
pub fn verschluesseln(klartext: &str, geheimnis: &str) -> CryptoResult<EncryptedBlob> {
    let schluessel = schluessel_ableiten(geheimnis)?;

    let mut iv = [0u8; IV_LAENGE];
    OsRng.fill_bytes(&mut iv);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&schluessel));
    let versiegelt = cipher
        .encrypt(Nonce::from_slice(&iv), klartext.as_bytes())
        .map_err(|e| CryptoError::Verschluesselung(e.to_string()))?;

    // aes-gcm haengt den Tag an den Ciphertext an; Blob fuehrt beide getrennt
    let (content, auth_tag) = versiegelt.split_at(versiegelt.len() - TAG_LAENGE);

    let b64 = &base64::engine::general_purpose::STANDARD;
    Ok(EncryptedBlob {
        iv: b64.encode(iv),
        content: b64.encode(content),
        auth_tag: b64.encode(auth_tag),
    })
}

/// Entschluesselt einen Blob unter dem abgeleiteten Server-Schluessel
///
/// Schlaegt mit [`CryptoError::AuthentifizierungFehlgeschlagen`] fehl wenn
/// der Tag nicht verifiziert oder `iv`/`content`/`authTag` fehlerhaft bzw.
/// manipuliert sind. Teilentschluesselte Daten verlassen die Funktion nie.
pub fn entschluesseln(blob: &EncryptedBlob, geheimnis: &str) -> CryptoResult<String> {
    let schluessel = schluessel_ableiten(geheimnis)?;

    let b64 = &base64::engine::general_purpose::STANDARD;
    let iv = b64
        .decode(&blob.iv)
        .map_err(|_| CryptoError::AuthentifizierungFehlgeschlagen)?;
    let content = b64
        .decode(&blob.content)
        .map_err(|_| CryptoError::AuthentifizierungFehlgeschlagen)?;
    let auth_tag = b64
        .decode(&blob.auth_tag)
        .map_err(|_| CryptoError::AuthentifizierungFehlgeschlagen)?;

    if iv.len() != IV_LAENGE || auth_tag.len() != TAG_LAENGE {
        return Err(CryptoError::AuthentifizierungFehlgeschlagen);
    }

    let mut versiegelt = content;
    versiegelt.extend_from_slice(&auth_tag);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&schluessel));
    let klartext = cipher
        .decrypt(Nonce::from_slice(&iv), versiegelt.as_ref())
        .map_err(|_| CryptoError::AuthentifizierungFehlgeschlagen)?;

    String::from_utf8(klartext)
        .map_err(|_| CryptoError::UngueltigeDaten("Klartext ist kein UTF-8".into()))
}

//! Schnelle Schluessel-Ableitung und Sitzungsschluessel-Erzeugung
//!
//! Die Ableitung aus dem Server-Geheimnis ist ein einzelner SHA-256-Durchlauf
//! (bewusst schnell, im Gegensatz zum Passwort-Hashing in [`crate::passwort`]).

use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::{CryptoError, CryptoResult};
use crate::types::EncryptedBlob;
use crate::verschluesselung::verschluesseln;

/// Mindestlaenge des Server-Geheimnisses in Zeichen
pub const MIN_GEHEIMNIS_LAENGE: usize = 32;

/// Laenge eines Sitzungsschluessels in Bytes (256 Bit)
pub const SITZUNGSSCHLUESSEL_LAENGE: usize = 32;

/// Leitet den 256-Bit-Verschluesselungsschluessel aus dem Server-Geheimnis ab
///
/// Geheimnisse unter [`MIN_GEHEIMNIS_LAENGE`] Zeichen werden abgelehnt.
pub fn schluessel_ableiten(geheimnis: &str) -> CryptoResult<[u8; 32]> {
    let laenge = geheimnis.chars().count();
    if laenge < MIN_GEHEIMNIS_LAENGE {
        return Err(CryptoError::SchwachesSchluesselmaterial {
            mindestens: MIN_GEHEIMNIS_LAENGE,
            erhalten: laenge,
        });
    }
    let digest = Sha256::digest(geheimnis.as_bytes());
    Ok(digest.into())
}

/// Erzeugt einen frischen Raum-Sitzungsschluessel und verwahrt ihn sofort
///
/// Der Klartext-Schluessel (32 Zufallsbytes, Base64) existiert nur innerhalb
/// dieser Funktion; zurueckgegeben wird ausschliesslich der verschluesselte
/// Blob. Entpackt wird er transient beim Raum-Zutritt via
/// [`crate::entschluesseln`].
pub fn session_schluessel_generieren(geheimnis: &str) -> CryptoResult<EncryptedBlob> {
    let mut bytes = [0u8; SITZUNGSSCHLUESSEL_LAENGE];
    OsRng.fill_bytes(&mut bytes);
    let klartext = base64::engine::general_purpose::STANDARD.encode(bytes);
    let blob = verschluesseln(&klartext, geheimnis)?;
    tracing::debug!("Sitzungsschluessel erzeugt und verwahrt");
    Ok(blob)
}

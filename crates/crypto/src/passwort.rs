//! Passwort- und PIN-Hashing mit PBKDF2-HMAC-SHA256
//!
//! 120.000 Iterationen, 32 Bytes Ausgabe. Die Verifikation vergleicht in
//! konstanter Zeit, damit PIN-Pruefungen keinen Timing-Seitenkanal oeffnen.

use std::num::NonZeroU32;

use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use ring::pbkdf2;

use crate::error::{CryptoError, CryptoResult};
use crate::types::PasswortRecord;

/// Standard-Iterationszahl fuer PBKDF2
pub const PBKDF2_ITERATIONEN: u32 = 120_000;

/// Salt-Laenge in Bytes
const SALT_LAENGE: usize = 16;

/// Hash-Ausgabelaenge in Bytes (256 Bit)
const HASH_LAENGE: usize = 32;

/// Hasht ein Geheimnis mit frischem Zufalls-Salt und Standard-Iterationen
pub fn geheimnis_hashen(geheimnis: &str) -> CryptoResult<PasswortRecord> {
    let mut salt = [0u8; SALT_LAENGE];
    OsRng.fill_bytes(&mut salt);
    let salt_b64 = base64::engine::general_purpose::STANDARD.encode(salt);
    geheimnis_hashen_mit(geheimnis, &salt_b64, PBKDF2_ITERATIONEN)
}

/// Hasht ein Geheimnis mit vorgegebenem Salt und Iterationszahl
///
/// Gleiche `(geheimnis, salt, iterationen)` ergeben immer denselben Hash;
/// darauf stuetzt sich die Verifikation.
pub fn geheimnis_hashen_mit(
    geheimnis: &str,
    salt_b64: &str,
    iterationen: u32,
) -> CryptoResult<PasswortRecord> {
    let iterationen_nz = NonZeroU32::new(iterationen)
        .ok_or_else(|| CryptoError::UngueltigeDaten("Iterationszahl 0".into()))?;
    let salt = base64::engine::general_purpose::STANDARD
        .decode(salt_b64)
        .map_err(|e| CryptoError::UngueltigeDaten(format!("Salt kein Base64: {e}")))?;

    let mut hash = [0u8; HASH_LAENGE];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterationen_nz,
        &salt,
        geheimnis.as_bytes(),
        &mut hash,
    );

    Ok(PasswortRecord {
        hash: base64::engine::general_purpose::STANDARD.encode(hash),
        salt: salt_b64.to_string(),
        iterationen,
    })
}

/// Verifiziert ein Geheimnis gegen einen gespeicherten Record
///
/// Rechnet den Hash mit gespeichertem Salt und Iterationszahl nach und
/// vergleicht in konstanter Zeit. Laengen-Differenzen zaehlen als
/// Nicht-Uebereinstimmung, nicht als Fehler.
pub fn geheimnis_verifizieren(geheimnis: &str, record: &PasswortRecord) -> CryptoResult<bool> {
    let nachgerechnet = geheimnis_hashen_mit(geheimnis, &record.salt, record.iterationen)?;

    let erwartet = base64::engine::general_purpose::STANDARD
        .decode(&record.hash)
        .map_err(|e| CryptoError::UngueltigeDaten(format!("Hash kein Base64: {e}")))?;
    let berechnet = base64::engine::general_purpose::STANDARD
        .decode(&nachgerechnet.hash)
        .map_err(|e| CryptoError::UngueltigeDaten(format!("Hash kein Base64: {e}")))?;

    Ok(ring::constant_time::verify_slices_are_equal(&berechnet, &erwartet).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashen_und_verifizieren() {
        let record = geheimnis_hashen("raum-pin-4711").unwrap();
        assert_eq!(record.iterationen, PBKDF2_ITERATIONEN);

        let korrekt = geheimnis_verifizieren("raum-pin-4711", &record).unwrap();
        assert!(korrekt, "Korrektes Geheimnis muss verifiziert werden");
    }

    #[test]
    fn falsches_geheimnis_wird_abgelehnt() {
        let record = geheimnis_hashen("raum-pin-4711").unwrap();
        let korrekt = geheimnis_verifizieren("raum-pin-4711x", &record).unwrap();
        assert!(!korrekt, "Falsches Geheimnis muss abgelehnt werden");
    }

    #[test]
    fn gleiche_geheimnisse_unterschiedliche_records() {
        let a = geheimnis_hashen("gleiches-geheimnis").unwrap();
        let b = geheimnis_hashen("gleiches-geheimnis").unwrap();
        assert_ne!(a.salt, b.salt, "Salts muessen zufaellig sein");
        assert_ne!(a.hash, b.hash, "Verschiedene Salts ergeben verschiedene Hashes");
    }

    #[test]
    fn gleiches_salt_ist_deterministisch() {
        let a = geheimnis_hashen("geheimnis").unwrap();
        let b = geheimnis_hashen_mit("geheimnis", &a.salt, a.iterationen).unwrap();
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn manipulierter_hash_wird_abgelehnt() {
        let mut record = geheimnis_hashen("geheimnis").unwrap();
        record.hash = base64::engine::general_purpose::STANDARD.encode([0u8; 32]);
        assert!(!geheimnis_verifizieren("geheimnis", &record).unwrap());
    }

    #[test]
    fn abweichende_hash_laenge_ist_keine_uebereinstimmung() {
        let mut record = geheimnis_hashen("geheimnis").unwrap();
        record.hash = base64::engine::general_purpose::STANDARD.encode([0u8; 16]);
        assert!(!geheimnis_verifizieren("geheimnis", &record).unwrap());
    }

    #[test]
    fn null_iterationen_sind_fehler() {
        let ergebnis = geheimnis_hashen_mit("geheimnis", "c2FsdA==", 0);
        assert!(matches!(ergebnis, Err(CryptoError::UngueltigeDaten(_))));
    }

    #[test]
    fn ungueltiges_salt_ist_fehler() {
        let ergebnis = geheimnis_hashen_mit("geheimnis", "kein base64 !!!", 1000);
        assert!(matches!(ergebnis, Err(CryptoError::UngueltigeDaten(_))));
    }
}

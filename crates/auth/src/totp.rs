//! TOTP-Verifikation (RFC 6238) fuer den zweiten Faktor
//!
//! HOTP-SHA1 mit 30-Sekunden-Zeitschritt, 6 Ziffern, geprueft gegen die
//! Fenster {-1, 0, +1} (toleriert ±30 s Uhrendrift).
//!
//! Ein leeres konfiguriertes Geheimnis bedeutet: 2FA ist nicht eingerichtet
//! und die Verifikation gilt als bestanden. Das ist ein absichtlicher,
//! dokumentierter Bypass (per `totp_optional`-Politik abschaltbar, siehe
//! Server-Konfiguration) und darf nicht stillschweigend "repariert" werden.

use base64::Engine;
use ring::hmac;

use crate::error::{AuthError, AuthResult};

/// TOTP-Zeitschritt in Sekunden
const ZEITSCHRITT: i64 = 30;

/// Gepruefte Fenster-Offsets (aktuell, -30 s, +30 s)
const FENSTER: [i64; 3] = [0, -1, 1];

/// Verifiziert einen TOTP-Code gegen das Base64-kodierte Geheimnis
///
/// Dekodier- oder Formatfehler im Geheimnis ergeben `false` (fail closed);
/// es entkommt niemals ein Fehler an den Aufrufer.
pub fn totp_verifizieren(code: &str, geheimnis_b64: &str) -> bool {
    totp_verifizieren_zu(code, geheimnis_b64, chrono::Utc::now().timestamp())
}

/// Wie [`totp_verifizieren`], aber mit injizierbarer Zeit (fuer Tests)
pub fn totp_verifizieren_zu(code: &str, geheimnis_b64: &str, unix_sekunden: i64) -> bool {
    // 2FA optional wenn kein Geheimnis konfiguriert ist
    if geheimnis_b64.is_empty() {
        return true;
    }

    let bereinigt = code.trim();
    if bereinigt.is_empty() {
        return false;
    }

    FENSTER.iter().any(|fenster| {
        matches!(
            totp_generieren(geheimnis_b64, *fenster, unix_sekunden),
            Ok(erwartet) if erwartet == bereinigt
        )
    })
}

/// Berechnet den 6-stelligen Code fuer ein Fenster
///
/// `zaehler = floor(unix/30) + fenster`, als 8-Byte-Big-Endian kodiert,
/// HMAC-SHA1 unter dem dekodierten Geheimnis, danach dynamische Truncation
/// nach RFC 4226.
pub fn totp_generieren(geheimnis_b64: &str, fenster: i64, unix_sekunden: i64) -> AuthResult<String> {
    let schluessel = base64::engine::general_purpose::STANDARD
        .decode(geheimnis_b64)
        .map_err(|e| AuthError::TokenFehlerhaft(format!("TOTP-Geheimnis kein Base64: {e}")))?;

    let zaehler = unix_sekunden / ZEITSCHRITT + fenster;
    let puffer = zaehler.to_be_bytes();

    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, &schluessel);
    let tag = hmac::sign(&key, &puffer);
    let mac = tag.as_ref();

    // Dynamische Truncation: unteres Nibble des letzten Bytes als Offset,
    // 4 Bytes ab Offset, Vorzeichenbit maskiert
    let offset = (mac[mac.len() - 1] & 0x0f) as usize;
    let code = ((mac[offset] as u32 & 0x7f) << 24)
        | ((mac[offset + 1] as u32) << 16)
        | ((mac[offset + 2] as u32) << 8)
        | (mac[offset + 3] as u32);

    Ok(format!("{:06}", code % 1_000_000))
}

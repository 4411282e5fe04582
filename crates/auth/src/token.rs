//! Kompakte signierte Sitzungs-Credentials
//!
//! ## Format
//! ```text
//! base64url(JSON(header)) "." base64url(JSON(payload)) "." base64url(HMAC-SHA256)
//! ```
//!
//! Header ist fix `{"alg":"HS256","typ":"JWT"}`. Das Payload ist eine freie
//! Claim-Map plus Pflichtfeld `exp` (Unix-Sekunden). Ein Credential ist nach
//! Ausstellung unveraenderlich und selbsttragend: Gueltigkeit ergibt sich
//! allein aus Signatur und `exp`, es gibt keine Widerrufsliste. Kurze
//! Laufzeiten (Groessenordnung eine Stunde) begrenzen den Schaden geleakter
//! Credentials.

use base64::Engine;
use chrono::Utc;
use ring::hmac;
use serde::Serialize;

use crate::error::{AuthError, AuthResult};

/// Claim-Map eines Credentials
pub type Claims = serde_json::Map<String, serde_json::Value>;

/// Fixer Credential-Header
#[derive(Debug, Serialize)]
struct TokenHeader {
    alg: &'static str,
    typ: &'static str,
}

const HEADER: TokenHeader = TokenHeader {
    alg: "HS256",
    typ: "JWT",
};

/// Signiert eine Claim-Map und stellt ein Credential aus
///
/// Setzt `exp = jetzt + ttl_sekunden` im Payload. Pro Anmeldung wird ein
/// frisches Credential ausgestellt.
pub fn token_signieren(claims: &Claims, geheimnis: &str, ttl_sekunden: i64) -> AuthResult<String> {
    let exp = Utc::now().timestamp() + ttl_sekunden;

    let mut payload = claims.clone();
    payload.insert("exp".into(), serde_json::json!(exp));

    let b64 = &base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header_kodiert = b64.encode(
        serde_json::to_vec(&HEADER).map_err(|e| AuthError::intern(e.to_string()))?,
    );
    let payload_kodiert = b64.encode(
        serde_json::to_vec(&payload).map_err(|e| AuthError::intern(e.to_string()))?,
    );

    let inhalt = format!("{header_kodiert}.{payload_kodiert}");
    let signatur = signatur_berechnen(&inhalt, geheimnis);

    Ok(format!("{inhalt}.{signatur}"))
}

/// Verifiziert ein Credential und gibt die Claim-Map zurueck
///
/// Die Claims werden unveraendert zurueckgegeben; semantische Felder wie
/// `scope` muss der Aufrufer selbst pruefen (siehe [`scope_pruefen`]).
pub fn token_verifizieren(token: &str, geheimnis: &str) -> AuthResult<Claims> {
    let teile: Vec<&str> = token.split('.').collect();
    if teile.len() != 3 || teile.iter().any(|t| t.is_empty()) {
        return Err(AuthError::TokenFehlerhaft(
            "erwartet genau drei nicht-leere Segmente".into(),
        ));
    }

    let inhalt = format!("{}.{}", teile[0], teile[1]);
    let erwartet = signatur_berechnen(&inhalt, geheimnis);

    // Vergleich der kodierten Signaturen in konstanter Zeit;
    // Laengen-Differenz zaehlt als Nicht-Uebereinstimmung
    if ring::constant_time::verify_slices_are_equal(teile[2].as_bytes(), erwartet.as_bytes())
        .is_err()
    {
        return Err(AuthError::SignaturUngueltig);
    }

    let payload_roh = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(teile[1])
        .map_err(|e| AuthError::TokenFehlerhaft(format!("Payload kein Base64url: {e}")))?;
    let payload: serde_json::Value = serde_json::from_slice(&payload_roh)
        .map_err(|e| AuthError::TokenFehlerhaft(format!("Payload kein JSON: {e}")))?;
    let claims = match payload {
        serde_json::Value::Object(map) => map,
        _ => {
            return Err(AuthError::TokenFehlerhaft(
                "Payload ist kein JSON-Objekt".into(),
            ))
        }
    };

    if let Some(exp) = claims.get("exp").and_then(|v| v.as_i64()) {
        if exp < Utc::now().timestamp() {
            return Err(AuthError::TokenAbgelaufen);
        }
    }

    Ok(claims)
}

/// Prueft das `scope`-Claim eines verifizierten Credentials
pub fn scope_pruefen(claims: &Claims, erwartet: &str) -> AuthResult<()> {
    match claims.get("scope").and_then(|v| v.as_str()) {
        Some(scope) if scope == erwartet => Ok(()),
        _ => Err(AuthError::ScopeFehlend(erwartet.to_string())),
    }
}

fn signatur_berechnen(inhalt: &str, geheimnis: &str) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, geheimnis.as_bytes());
    let tag = hmac::sign(&key, inhalt.as_bytes());
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(tag.as_ref())
}

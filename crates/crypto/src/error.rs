//! Fehlertypen fuer die Schluesselverwahrung

use thiserror::Error;

/// Fehler in der Schluesselverwahrung
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Das Server-Geheimnis ist zu kurz fuer die Schluessel-Ableitung
    #[error("Schluesselmaterial zu schwach: mindestens {mindestens} Zeichen erforderlich, erhalten {erhalten}")]
    SchwachesSchluesselmaterial { mindestens: usize, erhalten: usize },

    /// Tag-Pruefung fehlgeschlagen oder Blob-Bestandteile fehlerhaft.
    /// Es werden niemals teilentschluesselte Daten zurueckgegeben.
    #[error("Authentifizierung der verschluesselten Daten fehlgeschlagen")]
    AuthentifizierungFehlgeschlagen,

    #[error("Verschluesselung fehlgeschlagen: {0}")]
    Verschluesselung(String),

    #[error("Ungueltige Daten: {0}")]
    UngueltigeDaten(String),

    #[error("Base64-Dekodierung fehlgeschlagen: {0}")]
    Base64(#[from] base64::DecodeError),
}

pub type CryptoResult<T> = Result<T, CryptoError>;

//! Dateityp-Erkennung ueber Magic Numbers
//!
//! Verhindert, dass eine umbenannte Datei (z.B. `.zip` als `.png`) ihren
//! wahren Typ verschleiert: gezaehlt wird nur, was die Byte-Signatur sagt,
//! nie die deklarierte Erweiterung.

use serde::Serialize;

/// Ein erkannter Dateityp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateiTyp {
    pub mime: &'static str,
    #[serde(rename = "ext")]
    pub erweiterung: &'static str,
}

/// Ergebnis des Vergleichs deklarierter Typ vs. Byte-Signatur
#[derive(Debug, Clone, Serialize)]
pub struct TypVerdict {
    #[serde(rename = "declaredMime")]
    pub deklariert: String,
    #[serde(rename = "detectedMime")]
    pub erkannt: Option<String>,
    #[serde(rename = "matches")]
    pub stimmt_ueberein: bool,
}

struct MagicEintrag {
    typ: DateiTyp,
    signaturen: &'static [&'static [u8]],
}

/// Bekannte Signaturen in fester Prioritaetsreihenfolge (erster Treffer zaehlt)
const MAGIC_TABELLE: &[MagicEintrag] = &[
    MagicEintrag {
        typ: DateiTyp { mime: "image/png", erweiterung: "png" },
        signaturen: &[&[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a]],
    },
    MagicEintrag {
        typ: DateiTyp { mime: "image/jpeg", erweiterung: "jpg" },
        // SOI + APP-Marker-Varianten
        signaturen: &[
            &[0xff, 0xd8, 0xff, 0xe0],
            &[0xff, 0xd8, 0xff, 0xe1],
            &[0xff, 0xd8, 0xff, 0xe2],
            &[0xff, 0xd8, 0xff, 0xe3],
            &[0xff, 0xd8, 0xff, 0xe8],
        ],
    },
    MagicEintrag {
        typ: DateiTyp { mime: "image/gif", erweiterung: "gif" },
        signaturen: &[b"GIF87a", b"GIF89a"],
    },
    MagicEintrag {
        typ: DateiTyp { mime: "application/pdf", erweiterung: "pdf" },
        signaturen: &[b"%PDF"],
    },
    MagicEintrag {
        typ: DateiTyp { mime: "application/zip", erweiterung: "zip" },
        // lokaler Header, zentrales Verzeichnis, leeres Archiv
        signaturen: &[
            &[0x50, 0x4b, 0x03, 0x04],
            &[0x50, 0x4b, 0x05, 0x06],
            &[0x50, 0x4b, 0x07, 0x08],
        ],
    },
    MagicEintrag {
        typ: DateiTyp { mime: "image/bmp", erweiterung: "bmp" },
        signaturen: &[b"BM"],
    },
];

/// Umfang der Text-Heuristik in Bytes
const TEXT_FENSTER: usize = 256;

/// Mindestanteil druckbarer Zeichen fuer die Text-Klassifikation
const TEXT_SCHWELLE: f64 = 0.9;

/// Erkennt den Dateityp aus den ersten Bytes
///
/// 1. Vergleich gegen die Signatur-Tabelle (Offset 0, fester Vorrang)
/// 2. Text-Heuristik ueber die ersten 256 Bytes
/// 3. `None` fuer unbekannte Binaerdaten und leere Eingaben
pub fn dateityp_erkennen(daten: &[u8]) -> Option<DateiTyp> {
    if daten.is_empty() {
        return None;
    }

    for eintrag in MAGIC_TABELLE {
        for signatur in eintrag.signaturen {
            if daten.starts_with(signatur) {
                return Some(eintrag.typ);
            }
        }
    }

    if sieht_wie_text_aus(daten) {
        return Some(DateiTyp { mime: "text/plain", erweiterung: "txt" });
    }

    None
}

/// Vergleicht den deklarierten MIME-Typ mit der Byte-Signatur
pub fn typ_vergleichen(daten: &[u8], deklariert: &str) -> TypVerdict {
    let erkannt = dateityp_erkennen(daten);
    TypVerdict {
        deklariert: deklariert.to_string(),
        erkannt: erkannt.map(|t| t.mime.to_string()),
        stimmt_ueberein: erkannt.map(|t| t.mime == deklariert).unwrap_or(false),
    }
}

/// Heuristik fuer Klartext-Dateien
///
/// Ein NUL-Byte disqualifiziert sofort; sonst zaehlt der Anteil von
/// Tab/LF/CR und druckbarem ASCII (0x20–0x7E) im Fenster.
fn sieht_wie_text_aus(daten: &[u8]) -> bool {
    let fenster = &daten[..daten.len().min(TEXT_FENSTER)];
    let mut druckbar = 0usize;

    for &byte in fenster {
        if byte == 0 {
            return false;
        }
        if byte == 9 || byte == 10 || byte == 13 || (0x20..=0x7e).contains(&byte) {
            druckbar += 1;
        }
    }

    druckbar as f64 / fenster.len().max(1) as f64 > TEXT_SCHWELLE
}

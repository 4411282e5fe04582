//! Container-Ende-Erkennung und Tail-Klassifikation
//!
//! Das primaere Steganografie-Signal sind Bytes hinter dem strukturellen
//! Bildende ("Tail"). Jedes Tail-Byte zaehlt: gaengige Werkzeuge haengen
//! ihre Nutzlast schlicht hinter den Container.

use serde::Serialize;

use crate::entropie::shannon_entropie;

/// Suchfenster am Puffer-Ende fuer JPEG-Endmarker und GIF-Trailer
const END_SUCHFENSTER: usize = 10_000;

/// Stichprobengroesse fuer die Tail-Entropie
const TAIL_STICHPROBE: usize = 1000;

/// Ab dieser Tail-Laenge entscheidet die Entropie-Stufe
const KURZER_TAIL: usize = 50;

/// Entropie-Schwelle fuer die 0.85-Stufe
const TAIL_ENTROPIE_SCHWELLE: f64 = 7.5;

/// Archiv-Signaturen, deren Fund im Tail sofort als sicher gilt
const ZIP_SIGNATUR: &[u8] = &[0x50, 0x4b, 0x03, 0x04];
const GZIP_SIGNATUR: &[u8] = &[0x1f, 0x8b];
const RAR_SIGNATUR: &[u8] = b"Rar!";
const SIEBEN_ZIP_SIGNATUR: &[u8] = &[0x37, 0x7a, 0xbc, 0xaf];

/// Vertrauensstufe eines Analyse-Ergebnisses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrustLevel {
    #[serde(rename = "CLEAN")]
    Clean,
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "DEFINITE")]
    Definite,
}

/// Gesamturteil der Steganografie-Analyse
#[derive(Debug, Clone, Serialize)]
pub struct StegVerdict {
    #[serde(rename = "entropy")]
    pub entropie: f64,
    #[serde(rename = "compressionScore")]
    pub kompressions_score: usize,
    #[serde(rename = "tailLength")]
    pub tail_laenge: usize,
    #[serde(rename = "trustLevel")]
    pub trust_level: TrustLevel,
    pub score: f64,
    #[serde(rename = "suspicious")]
    pub verdaechtig: bool,
    #[serde(rename = "findings")]
    pub befunde: Vec<String>,
}

/// Ergebnis der reinen Muster-Analyse (vor der Freigabe-Entscheidung)
#[derive(Debug, Clone)]
pub struct MusterAnalyse {
    pub score: f64,
    pub trust_level: TrustLevel,
    pub tail_laenge: usize,
    pub befunde: Vec<String>,
}

/// Gefundenes Container-Ende
#[derive(Debug, Clone, Copy)]
struct ContainerEnde {
    format: &'static str,
    /// Offset des ersten Bytes hinter dem Ende-Marker
    offset: usize,
}

/// Sucht das Container-Ende
///
/// Prioritaet bei mehreren Funden: ein GIF-Trailer-Byte im Endfenster
/// uebersteuert einen PNG-IEND, dieser wiederum einen JPEG-Endmarker
/// (Referenzverhalten, kein striktes "rechtester Marker ueber alle
/// Familien").
fn container_ende_suchen(daten: &[u8]) -> Option<ContainerEnde> {
    let mut ende = None;

    // JPEG: letztes 0xFF 0xD9 innerhalb der finalen 10.000 Bytes
    if daten.len() >= 2 {
        let start = daten.len().saturating_sub(END_SUCHFENSTER);
        for i in start..daten.len() - 1 {
            if daten[i] == 0xff && daten[i + 1] == 0xd9 {
                ende = Some(ContainerEnde { format: "JPEG", offset: i + 2 });
            }
        }
    }

    // PNG: letztes Vorkommen der IEND-Signatur im gesamten Puffer
    if let Some(idx) = letztes_vorkommen(daten, b"IEND") {
        if idx > 0 {
            ende = Some(ContainerEnde { format: "PNG", offset: idx + 4 });
        }
    }

    // GIF: letztes Trailer-Byte 0x3B innerhalb der finalen 10.000 Bytes
    if daten.len() >= 2 {
        let start = daten.len().saturating_sub(END_SUCHFENSTER);
        for i in start..daten.len() - 1 {
            if daten[i] == 0x3b {
                ende = Some(ContainerEnde { format: "GIF", offset: i + 1 });
            }
        }
    }

    ende
}

/// Klassifiziert die Bytes hinter dem Container-Ende
pub fn muster_analysieren(daten: &[u8]) -> MusterAnalyse {
    let mut befunde = Vec::new();

    let ende = match container_ende_suchen(daten) {
        Some(ende) if ende.offset > 0 && ende.offset < daten.len() => ende,
        _ => {
            befunde.push("Kein Tail hinter dem Container-Ende".to_string());
            return MusterAnalyse {
                score: 0.0,
                trust_level: TrustLevel::Clean,
                tail_laenge: 0,
                befunde,
            };
        }
    };

    let tail = &daten[ende.offset..];
    befunde.push(format!(
        "Container-Ende: {} bei Offset {}",
        ende.format, ende.offset
    ));
    befunde.push(format!("Tail-Daten gefunden: {} Bytes", tail.len()));

    // Archiv-Signaturen im Tail: sicherer Befund, strikte Prioritaet
    for (name, signatur) in [
        ("ZIP", ZIP_SIGNATUR),
        ("GZIP", GZIP_SIGNATUR),
        ("RAR", RAR_SIGNATUR),
        ("7-Zip", SIEBEN_ZIP_SIGNATUR),
    ] {
        if enthaelt(tail, signatur) {
            befunde.push(format!("{name}-Signatur im Tail"));
            return MusterAnalyse {
                score: 0.99,
                trust_level: TrustLevel::Definite,
                tail_laenge: tail.len(),
                befunde,
            };
        }
    }

    let score = if tail.len() > KURZER_TAIL {
        let stichprobe = &tail[..tail.len().min(TAIL_STICHPROBE)];
        let tail_entropie = shannon_entropie(stichprobe);
        if tail_entropie > TAIL_ENTROPIE_SCHWELLE {
            befunde.push(format!(
                "Hohe Tail-Entropie ({tail_entropie:.2}): vermutlich komprimierte Nutzlast"
            ));
            0.85
        } else {
            befunde.push("Langer Tail ohne Archiv-Signatur".to_string());
            0.70
        }
    } else {
        befunde.push("Auch ein kurzer Tail gilt als verdaechtig".to_string());
        0.75
    };

    MusterAnalyse {
        score,
        trust_level: TrustLevel::High,
        tail_laenge: tail.len(),
        befunde,
    }
}

fn enthaelt(daten: &[u8], signatur: &[u8]) -> bool {
    daten.windows(signatur.len()).any(|fenster| fenster == signatur)
}

fn letztes_vorkommen(daten: &[u8], signatur: &[u8]) -> Option<usize> {
    if daten.len() < signatur.len() {
        return None;
    }
    (0..=daten.len() - signatur.len()).rev().find(|&i| &daten[i..i + signatur.len()] == signatur)
}

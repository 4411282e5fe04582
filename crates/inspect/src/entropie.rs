//! Shannon-Entropie ueber das Byte-Histogramm
//!
//! `H = -Σ p_i · log2(p_i)` ueber das 256-Symbol-Alphabet. Maximal 8.0;
//! komprimierte oder verschluesselte Daten liegen typischerweise ueber 7.8.

/// Chunk-Groesse fuer den Kompressions-Score
const CHUNK_GROESSE: usize = 1024;

/// Analysierter Praefix fuer den Kompressions-Score
const ANALYSE_FENSTER: usize = 100_000;

/// Entropie-Schwelle ab der ein Chunk als komprimiert gilt
const CHUNK_SCHWELLE: f64 = 7.8;

/// Berechnet die Shannon-Entropie ueber den gesamten Puffer
pub fn shannon_entropie(daten: &[u8]) -> f64 {
    if daten.is_empty() {
        return 0.0;
    }

    let mut haeufigkeit = [0usize; 256];
    for &byte in daten {
        haeufigkeit[byte as usize] += 1;
    }

    let groesse = daten.len() as f64;
    let mut entropie = 0.0;
    for anzahl in haeufigkeit {
        if anzahl == 0 {
            continue;
        }
        let p = anzahl as f64 / groesse;
        entropie -= p * p.log2();
    }
    entropie
}

/// Zaehlt Hochentropie-Chunks im Praefix des Puffers
///
/// 1-KiB-Chunks ueber die ersten 100 KB; jeder Chunk mit Entropie ueber 7.8
/// erhoeht den Score um eins.
pub fn kompressions_score(daten: &[u8]) -> usize {
    let fenster = &daten[..daten.len().min(ANALYSE_FENSTER)];
    fenster
        .chunks(CHUNK_GROESSE)
        .filter(|chunk| shannon_entropie(chunk) > CHUNK_SCHWELLE)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leerer_puffer_hat_entropie_null() {
        assert_eq!(shannon_entropie(&[]), 0.0);
    }

    #[test]
    fn konstanter_puffer_hat_entropie_null() {
        let daten = vec![0x41u8; 4096];
        assert_eq!(shannon_entropie(&daten), 0.0);
    }

    #[test]
    fn gleichverteilung_hat_entropie_acht() {
        let daten: Vec<u8> = (0..4096).map(|i| (i % 256) as u8).collect();
        let h = shannon_entropie(&daten);
        assert!((h - 8.0).abs() < 1e-9, "Entropie war {h}");
    }

    #[test]
    fn zwei_symbole_haben_entropie_eins() {
        let daten: Vec<u8> = (0..1024).map(|i| (i % 2) as u8).collect();
        let h = shannon_entropie(&daten);
        assert!((h - 1.0).abs() < 1e-9, "Entropie war {h}");
    }

    #[test]
    fn kompressions_score_zaehlt_hochentropie_chunks() {
        // 2 KiB Gleichverteilung: beide Chunks ueber der Schwelle
        let daten: Vec<u8> = (0..2048).map(|i| (i % 256) as u8).collect();
        assert_eq!(kompressions_score(&daten), 2);

        // Konstante Daten: kein Chunk ueber der Schwelle
        let flach = vec![0u8; 2048];
        assert_eq!(kompressions_score(&flach), 0);
    }

    #[test]
    fn kompressions_score_begrenzt_auf_analysefenster() {
        // 200 KB Gleichverteilung, gezaehlt werden nur die ersten 100 KB
        let daten: Vec<u8> = (0..200_000).map(|i| (i % 256) as u8).collect();
        let erwartet = 100_000usize.div_ceil(1024);
        assert_eq!(kompressions_score(&daten), erwartet);
    }
}

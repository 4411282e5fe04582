//! Steganografie-Analyse-Engine
//!
//! Jede Datei wird in einem eigenen, zeitbegrenzten Task analysiert. Die
//! Anzahl gleichzeitiger Analysen ist ueber eine Semaphore begrenzt, damit
//! Upload-Schuebe den Server nicht fluten. Bei Zeitueberschreitung ist das
//! Ergebnis ein expliziter Fehler: "nicht pruefbar" ist strikt von "sauber"
//! und von "verdaechtig" unterschieden, und es gibt keine automatischen
//! Wiederholungen.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::deep_scan::TiefenScan;
use crate::entropie::{kompressions_score, shannon_entropie};
use crate::error::{InspectError, InspectResult};
use crate::steg::{muster_analysieren, MusterAnalyse, StegVerdict, TrustLevel};

/// Standard-Zeitlimit pro Analyse
pub const STANDARD_ZEITLIMIT: Duration = Duration::from_secs(10);

/// Standard-Obergrenze gleichzeitiger Analysen
pub const STANDARD_MAX_PARALLEL: usize = 4;

/// Score-Grenzen der Freigabe-Entscheidung
const DEFINITIV_SCHWELLE: f64 = 0.85;
const VERDACHT_SCHWELLE: f64 = 0.70;
const BESTAETIGUNG_SCHWELLE: f64 = 0.50;

/// Zwischenergebnis der reinen Byte-Analyse
struct RohAnalyse {
    entropie: f64,
    kompressions_score: usize,
    muster: MusterAnalyse,
}

/// Einstellungen der Analyse-Engine
#[derive(Debug, Clone)]
pub struct EngineKonfiguration {
    /// Obergrenze gleichzeitiger Analysen
    pub max_parallel: usize,
    /// Hartes Zeitlimit pro Analyse
    pub zeitlimit: Duration,
    /// Politik-Schalter: Scores in (0.50, 0.70] ohne Tiefenscan-Bestaetigung
    /// als unverdaechtig werten (Referenzverhalten). Auf `false` gesetzt
    /// lehnen diese Stufen ohne Bestaetigung ab.
    pub schwache_stufe_zulassen: bool,
}

impl Default for EngineKonfiguration {
    fn default() -> Self {
        Self {
            max_parallel: STANDARD_MAX_PARALLEL,
            zeitlimit: STANDARD_ZEITLIMIT,
            schwache_stufe_zulassen: true,
        }
    }
}

/// Engine fuer isolierte, zeitbegrenzte Steganografie-Analysen
pub struct StegAnalyseEngine {
    scanner: Arc<dyn TiefenScan>,
    begrenzung: Arc<Semaphore>,
    konfiguration: EngineKonfiguration,
}

impl StegAnalyseEngine {
    /// Erstellt eine neue Engine
    pub fn neu(scanner: Arc<dyn TiefenScan>, konfiguration: EngineKonfiguration) -> Arc<Self> {
        Arc::new(Self {
            scanner,
            begrenzung: Arc::new(Semaphore::new(konfiguration.max_parallel.max(1))),
            konfiguration,
        })
    }

    /// Analysiert eine Datei und faellt die Freigabe-Entscheidung
    ///
    /// Pipeline: Entropie + Kompressions-Score, Container-Ende-Erkennung,
    /// Tail-Klassifikation, dann die Score-gestaffelte Entscheidung mit
    /// optionaler Tiefenscan-Bestaetigung.
    pub async fn analysieren(&self, daten: Vec<u8>) -> InspectResult<StegVerdict> {
        let _erlaubnis = self
            .begrenzung
            .acquire()
            .await
            .map_err(|e| InspectError::AnalyseIo(e.to_string()))?;

        let task = tokio::task::spawn_blocking(move || {
            let roh = RohAnalyse {
                entropie: shannon_entropie(&daten),
                kompressions_score: kompressions_score(&daten),
                muster: muster_analysieren(&daten),
            };
            (roh, daten)
        });

        let (roh, daten) = match tokio::time::timeout(self.konfiguration.zeitlimit, task).await {
            // Der blockierende Task laeuft nach dem Timeout ins Leere;
            // sein Ergebnis wird verworfen
            Err(_) => {
                tracing::warn!(
                    zeitlimit_ms = self.konfiguration.zeitlimit.as_millis() as u64,
                    "Steganografie-Analyse abgebrochen"
                );
                return Err(InspectError::AnalyseZeitueberschreitung);
            }
            Ok(Err(e)) => return Err(InspectError::AnalyseIo(e.to_string())),
            Ok(Ok(ergebnis)) => ergebnis,
        };

        self.entscheiden(roh, &daten).await
    }

    /// Score-gestaffelte Freigabe-Entscheidung
    ///
    /// - Score > 0.85: verdaechtig; zusaetzlich Best-Effort-Tiefenscan fuer
    ///   Zusatzbefunde (nicht blockierend wenn der Dienst fehlt)
    /// - 0.70 < Score <= 0.85: verdaechtig ohne weitere Bestaetigung
    /// - 0.50 < Score <= 0.70: verdaechtig nur wenn der Tiefenscan
    ///   unabhaengig bestaetigt; ohne oder mit fehlgeschlagener
    ///   Bestaetigung gilt die Datei als nicht verdaechtig
    /// - Score <= 0.50: nicht verdaechtig
    async fn entscheiden(&self, roh: RohAnalyse, daten: &[u8]) -> InspectResult<StegVerdict> {
        let MusterAnalyse {
            score,
            trust_level,
            tail_laenge,
            mut befunde,
        } = roh.muster;

        let verdaechtig = if score > DEFINITIV_SCHWELLE {
            match self.scanner.pruefen(daten).await {
                Ok(befund) => befunde.extend(befund.befunde),
                Err(e) => {
                    tracing::warn!(%e, "Tiefenscan fuer Zusatzbefunde nicht verfuegbar");
                }
            }
            true
        } else if score > VERDACHT_SCHWELLE {
            true
        } else if score > BESTAETIGUNG_SCHWELLE {
            if !self.konfiguration.schwache_stufe_zulassen {
                befunde.push("Politik: schwache Stufe lehnt ohne Bestaetigung ab".to_string());
                true
            } else {
                match self.scanner.pruefen(daten).await {
                    Ok(befund) => {
                        befunde.extend(befund.befunde);
                        befund.verdaechtig
                    }
                    Err(e) => {
                        tracing::warn!(%e, "Tiefenscan nicht verfuegbar, keine Bestaetigung");
                        befunde.push("Tiefenscan nicht verfuegbar: keine Bestaetigung".to_string());
                        false
                    }
                }
            }
        } else {
            false
        };

        let verdict = StegVerdict {
            entropie: roh.entropie,
            kompressions_score: roh.kompressions_score,
            tail_laenge,
            trust_level,
            score,
            verdaechtig,
            befunde,
        };

        tracing::debug!(
            score = verdict.score,
            verdaechtig = verdict.verdaechtig,
            tail_laenge = verdict.tail_laenge,
            "Steganografie-Analyse abgeschlossen"
        );

        Ok(verdict)
    }
}

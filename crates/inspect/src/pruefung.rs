//! Upload-Freigabe
//!
//! Orchestriert die Inhaltspruefung eines Uploads in fester Reihenfolge:
//! deklarierter Typ in der Freigabeliste, Groessen-Limit, Byte-Signatur
//! vorhanden und freigegeben, Signatur gleich deklariertem Typ, zuletzt die
//! Steganografie-Analyse. Jede Ablehnung wird mit Grund auditiert.

use std::sync::Arc;

use hinterzimmer_observability::AuditLog;

use crate::engine::StegAnalyseEngine;
use crate::error::{InspectError, InspectResult};
use crate::file_type::{typ_vergleichen, TypVerdict};
use crate::steg::StegVerdict;

/// Richtlinie fuer die Upload-Freigabe
#[derive(Debug, Clone)]
pub struct UploadRichtlinie {
    /// Zugelassene deklarierte und erkannte MIME-Typen
    pub erlaubte_mime_typen: Vec<String>,
    /// Maximale Dateigroesse in Bytes
    pub max_groesse_bytes: usize,
    /// Politik-Schalter: interne Analyse-Fehler (nicht Zeitueberschreitungen)
    /// als Freigabe werten (Referenzverhalten). Zeitueberschreitungen lehnen
    /// unabhaengig von diesem Schalter immer ab.
    pub analyse_fehler_zulassen: bool,
}

impl Default for UploadRichtlinie {
    fn default() -> Self {
        Self {
            erlaubte_mime_typen: vec![
                "image/png".into(),
                "image/jpeg".into(),
                "image/gif".into(),
                "application/pdf".into(),
                "text/plain".into(),
                "application/zip".into(),
            ],
            max_groesse_bytes: 15 * 1024 * 1024,
            analyse_fehler_zulassen: true,
        }
    }
}

/// Freigegebener Upload mit beiden Urteilen
#[derive(Debug)]
pub struct DateiFreigabe {
    pub typ: TypVerdict,
    pub steg: StegVerdict,
}

/// Upload-Pruefdienst
pub struct UploadPruefung {
    engine: Arc<StegAnalyseEngine>,
    richtlinie: UploadRichtlinie,
    audit: Arc<AuditLog>,
}

impl UploadPruefung {
    /// Erstellt einen neuen Pruefdienst
    pub fn neu(
        engine: Arc<StegAnalyseEngine>,
        richtlinie: UploadRichtlinie,
        audit: Arc<AuditLog>,
    ) -> Arc<Self> {
        Arc::new(Self {
            engine,
            richtlinie,
            audit,
        })
    }

    /// Prueft einen Upload und gibt ihn frei oder lehnt ihn ab
    ///
    /// `akteur` und `raum_id` fliessen nur ins Audit-Log ein.
    pub async fn pruefen(
        &self,
        daten: Vec<u8>,
        deklarierter_mime: &str,
        akteur: &str,
        raum_id: &str,
    ) -> InspectResult<DateiFreigabe> {
        if !self.ist_erlaubt(deklarierter_mime) {
            self.ablehnung_erfassen(akteur, raum_id, "declared_type_not_allowed", deklarierter_mime)
                .await;
            return Err(InspectError::DateitypNichtUnterstuetzt(
                deklarierter_mime.to_string(),
            ));
        }

        if daten.len() > self.richtlinie.max_groesse_bytes {
            self.ablehnung_erfassen(akteur, raum_id, "file_too_large", deklarierter_mime)
                .await;
            return Err(InspectError::DateiZuGross {
                groesse: daten.len(),
                max: self.richtlinie.max_groesse_bytes,
            });
        }

        let typ = typ_vergleichen(&daten, deklarierter_mime);
        let erkannt = match &typ.erkannt {
            Some(mime) if self.ist_erlaubt(mime) => mime.clone(),
            Some(mime) => {
                self.ablehnung_erfassen(akteur, raum_id, "detected_type_not_allowed", mime)
                    .await;
                return Err(InspectError::DateitypNichtUnterstuetzt(mime.clone()));
            }
            None => {
                self.ablehnung_erfassen(akteur, raum_id, "unknown_type", deklarierter_mime)
                    .await;
                return Err(InspectError::DateitypNichtUnterstuetzt("unbekannt".into()));
            }
        };

        if !typ.stimmt_ueberein {
            self.audit
                .erfassen(
                    "file_rejected",
                    akteur,
                    serde_json::json!({
                        "roomId": raum_id,
                        "reason": "signature_mismatch",
                        "reportedMime": deklarierter_mime,
                        "detectedMime": erkannt,
                    }),
                )
                .await;
            return Err(InspectError::SignaturErweiterungKonflikt {
                deklariert: deklarierter_mime.to_string(),
                erkannt,
            });
        }

        let steg = match self.engine.analysieren(daten).await {
            Ok(verdict) => verdict,
            Err(InspectError::AnalyseZeitueberschreitung) => {
                // "Nicht pruefbar" lehnt immer ab, unabhaengig von der Politik
                self.ablehnung_erfassen(akteur, raum_id, "analysis_timeout", deklarierter_mime)
                    .await;
                return Err(InspectError::AnalyseZeitueberschreitung);
            }
            Err(e) => {
                if self.richtlinie.analyse_fehler_zulassen {
                    tracing::warn!(%e, "Analyse-Fehler, Politik laesst Upload zu");
                    self.audit
                        .erfassen(
                            "file_scan_error",
                            akteur,
                            serde_json::json!({
                                "roomId": raum_id,
                                "error": e.to_string(),
                                "policy": "allowed_on_error",
                            }),
                        )
                        .await;
                    StegVerdict {
                        entropie: 0.0,
                        kompressions_score: 0,
                        tail_laenge: 0,
                        trust_level: crate::steg::TrustLevel::Clean,
                        score: 0.0,
                        verdaechtig: false,
                        befunde: vec![format!("Analyse-Fehler: {e}")],
                    }
                } else {
                    self.ablehnung_erfassen(akteur, raum_id, "analysis_error", deklarierter_mime)
                        .await;
                    return Err(e);
                }
            }
        };

        if steg.verdaechtig {
            self.audit
                .erfassen(
                    "file_rejected",
                    akteur,
                    serde_json::json!({
                        "roomId": raum_id,
                        "reason": "steganography_suspected",
                        "score": steg.score,
                        "entropy": steg.entropie,
                    }),
                )
                .await;
            return Err(InspectError::SteganografieVerdacht { score: steg.score });
        }

        self.audit
            .erfassen(
                "file_accepted",
                akteur,
                serde_json::json!({
                    "roomId": raum_id,
                    "mimetype": deklarierter_mime,
                    "entropy": steg.entropie,
                }),
            )
            .await;

        Ok(DateiFreigabe { typ, steg })
    }

    fn ist_erlaubt(&self, mime: &str) -> bool {
        self.richtlinie
            .erlaubte_mime_typen
            .iter()
            .any(|erlaubt| erlaubt == mime)
    }

    async fn ablehnung_erfassen(&self, akteur: &str, raum_id: &str, grund: &str, mime: &str) {
        self.audit
            .erfassen(
                "file_rejected",
                akteur,
                serde_json::json!({
                    "roomId": raum_id,
                    "reason": grund,
                    "mimetype": mime,
                }),
            )
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deep_scan::KeinTiefenScan;
    use crate::engine::EngineKonfiguration;
    use hinterzimmer_observability::SpeicherSenke;

    fn dienst() -> (Arc<UploadPruefung>, Arc<SpeicherSenke>) {
        let senke = SpeicherSenke::neu();
        let audit = AuditLog::neu("audit-geheimnis", senke.clone());
        let engine =
            StegAnalyseEngine::neu(Arc::new(KeinTiefenScan), EngineKonfiguration::default());
        let pruefung = UploadPruefung::neu(engine, UploadRichtlinie::default(), audit);
        (pruefung, senke)
    }

    fn sauberes_jpeg() -> Vec<u8> {
        let mut daten = vec![0xff, 0xd8, 0xff, 0xe0];
        daten.extend_from_slice(&[0x41u8; 256]);
        daten.extend_from_slice(&[0xff, 0xd9]);
        daten
    }

    #[tokio::test]
    async fn sauberes_jpeg_wird_freigegeben() {
        let (pruefung, senke) = dienst();
        let freigabe = pruefung
            .pruefen(sauberes_jpeg(), "image/jpeg", "nutzer", "raum-1")
            .await
            .unwrap();

        assert!(freigabe.typ.stimmt_ueberein);
        assert!(!freigabe.steg.verdaechtig);

        let eintraege = senke.eintraege().await;
        assert!(eintraege.iter().any(|e| e.aktion == "file_accepted"));
    }

    #[tokio::test]
    async fn nicht_freigegebener_typ_wird_abgelehnt() {
        let (pruefung, _senke) = dienst();
        let ergebnis = pruefung
            .pruefen(sauberes_jpeg(), "video/mp4", "nutzer", "raum-1")
            .await;
        assert!(matches!(
            ergebnis,
            Err(InspectError::DateitypNichtUnterstuetzt(_))
        ));
    }

    #[tokio::test]
    async fn signatur_konflikt_wird_abgelehnt() {
        let (pruefung, senke) = dienst();
        // ZIP-Bytes als PNG deklariert
        let mut daten = vec![0x50, 0x4b, 0x03, 0x04];
        daten.extend_from_slice(&[0u8; 64]);

        let ergebnis = pruefung.pruefen(daten, "image/png", "nutzer", "raum-1").await;
        assert!(matches!(
            ergebnis,
            Err(InspectError::SignaturErweiterungKonflikt { .. })
        ));

        let eintraege = senke.eintraege().await;
        assert!(eintraege
            .iter()
            .any(|e| e.metadaten["reason"] == "signature_mismatch"));
    }

    #[tokio::test]
    async fn unbekannte_binaerdaten_werden_abgelehnt() {
        let (pruefung, _senke) = dienst();
        let daten: Vec<u8> = (0..256).map(|i| (i % 7) as u8).collect();
        let ergebnis = pruefung
            .pruefen(daten, "image/png", "nutzer", "raum-1")
            .await;
        assert!(matches!(
            ergebnis,
            Err(InspectError::DateitypNichtUnterstuetzt(_))
        ));
    }

    #[tokio::test]
    async fn zu_grosse_datei_wird_abgelehnt() {
        let senke = SpeicherSenke::neu();
        let audit = AuditLog::neu("audit-geheimnis", senke.clone());
        let engine =
            StegAnalyseEngine::neu(Arc::new(KeinTiefenScan), EngineKonfiguration::default());
        let richtlinie = UploadRichtlinie {
            max_groesse_bytes: 128,
            ..Default::default()
        };
        let pruefung = UploadPruefung::neu(engine, richtlinie, audit);

        let ergebnis = pruefung
            .pruefen(sauberes_jpeg(), "image/jpeg", "nutzer", "raum-1")
            .await;
        assert!(matches!(ergebnis, Err(InspectError::DateiZuGross { .. })));
    }

    #[tokio::test]
    async fn steganografie_verdacht_wird_abgelehnt() {
        let (pruefung, senke) = dienst();
        let mut daten = sauberes_jpeg();
        daten.extend_from_slice(&[0x50, 0x4b, 0x03, 0x04]);

        let ergebnis = pruefung
            .pruefen(daten, "image/jpeg", "nutzer", "raum-1")
            .await;
        assert!(matches!(
            ergebnis,
            Err(InspectError::SteganografieVerdacht { score }) if score > 0.9
        ));

        let eintraege = senke.eintraege().await;
        assert!(eintraege
            .iter()
            .any(|e| e.metadaten["reason"] == "steganography_suspected"));
    }
}

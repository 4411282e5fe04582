//! Signiertes Audit-Log
//!
//! Jeder sicherheitsrelevante Vorgang (Admin-Login, Raum-Erstellung,
//! Raum-Zutritt, Datei-Freigabe/-Ablehnung) wird als Eintrag erfasst, dessen
//! kanonische JSON-Form mit HMAC-SHA256 unter einem eigenen Audit-Geheimnis
//! signiert wird. Die Senke ist austauschbar; Persistenz liegt ausserhalb
//! dieses Crates.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use ring::hmac;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Ein signierter Audit-Eintrag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEintrag {
    /// Vorgangsname, z.B. "admin_login_failed"
    pub aktion: String,
    /// Ausloesender Akteur (Benutzername oder "anonymous")
    pub akteur: String,
    /// Freie Zusatzdaten; duerfen keine Geheimnisse enthalten
    pub metadaten: serde_json::Value,
    /// Unix-Zeitstempel in Millisekunden
    pub zeitstempel: i64,
    /// Base64 der HMAC-SHA256-Signatur ueber die kanonische JSON-Form
    pub signatur: String,
}

/// Senke fuer Audit-Eintraege
///
/// Die produktive Senke persistiert; fuer Tests und den Standalone-Betrieb
/// gibt es die [`SpeicherSenke`].
#[async_trait]
pub trait AuditSenke: Send + Sync {
    async fn schreiben(&self, eintrag: AuditEintrag) -> anyhow::Result<()>;
}

/// In-Memory-Senke (haelt alle Eintraege im Speicher)
#[derive(Debug, Default)]
pub struct SpeicherSenke {
    eintraege: RwLock<Vec<AuditEintrag>>,
}

impl SpeicherSenke {
    pub fn neu() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Gibt eine Kopie aller bisher erfassten Eintraege zurueck
    pub async fn eintraege(&self) -> Vec<AuditEintrag> {
        self.eintraege.read().await.clone()
    }
}

#[async_trait]
impl AuditSenke for SpeicherSenke {
    async fn schreiben(&self, eintrag: AuditEintrag) -> anyhow::Result<()> {
        self.eintraege.write().await.push(eintrag);
        Ok(())
    }
}

/// Audit-Log mit Signatur unter einem dedizierten Geheimnis
pub struct AuditLog {
    geheimnis: String,
    senke: Arc<dyn AuditSenke>,
}

impl AuditLog {
    /// Erstellt ein neues Audit-Log
    pub fn neu(geheimnis: impl Into<String>, senke: Arc<dyn AuditSenke>) -> Arc<Self> {
        Arc::new(Self {
            geheimnis: geheimnis.into(),
            senke,
        })
    }

    /// Erfasst einen Vorgang
    ///
    /// Senken-Fehler werden geloggt und niemals an den ausloesenden Vorgang
    /// weitergereicht.
    pub async fn erfassen(&self, aktion: &str, akteur: &str, metadaten: serde_json::Value) {
        let zeitstempel = chrono::Utc::now().timestamp_millis();
        let signatur = self.signatur_berechnen(aktion, akteur, &metadaten, zeitstempel);

        let eintrag = AuditEintrag {
            aktion: aktion.to_string(),
            akteur: akteur.to_string(),
            metadaten,
            zeitstempel,
            signatur,
        };

        if let Err(e) = self.senke.schreiben(eintrag).await {
            tracing::error!(%e, aktion = aktion, "Audit-Eintrag konnte nicht geschrieben werden");
        }
    }

    /// Prueft die Signatur eines Eintrags
    pub fn verifizieren(&self, eintrag: &AuditEintrag) -> bool {
        let erwartet = self.signatur_berechnen(
            &eintrag.aktion,
            &eintrag.akteur,
            &eintrag.metadaten,
            eintrag.zeitstempel,
        );
        ring::constant_time::verify_slices_are_equal(
            erwartet.as_bytes(),
            eintrag.signatur.as_bytes(),
        )
        .is_ok()
    }

    fn signatur_berechnen(
        &self,
        aktion: &str,
        akteur: &str,
        metadaten: &serde_json::Value,
        zeitstempel: i64,
    ) -> String {
        let kanonisch = serde_json::json!({
            "action": aktion,
            "actor": akteur,
            "metadata": metadaten,
            "timestamp": zeitstempel,
        });
        let payload = kanonisch.to_string();

        let key = hmac::Key::new(hmac::HMAC_SHA256, self.geheimnis.as_bytes());
        let tag = hmac::sign(&key, payload.as_bytes());
        base64::engine::general_purpose::STANDARD.encode(tag.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn eintrag_erfassen_und_verifizieren() {
        let senke = SpeicherSenke::neu();
        let log = AuditLog::neu("audit-geheimnis", senke.clone());

        log.erfassen(
            "room_created",
            "admin",
            serde_json::json!({ "roomId": "abc" }),
        )
        .await;

        let eintraege = senke.eintraege().await;
        assert_eq!(eintraege.len(), 1);
        assert_eq!(eintraege[0].aktion, "room_created");
        assert!(log.verifizieren(&eintraege[0]), "Signatur muss stimmen");
    }

    #[tokio::test]
    async fn manipulierter_eintrag_faellt_auf() {
        let senke = SpeicherSenke::neu();
        let log = AuditLog::neu("audit-geheimnis", senke.clone());

        log.erfassen("admin_login_success", "admin", serde_json::json!({}))
            .await;

        let mut eintrag = senke.eintraege().await.remove(0);
        eintrag.akteur = "angreifer".into();
        assert!(!log.verifizieren(&eintrag));
    }

    #[tokio::test]
    async fn falsches_geheimnis_verifiziert_nicht() {
        let senke = SpeicherSenke::neu();
        let log = AuditLog::neu("audit-geheimnis", senke.clone());
        log.erfassen("file_rejected", "nutzer", serde_json::json!({}))
            .await;

        let anderes_log = AuditLog::neu("anderes-geheimnis", senke.clone());
        let eintrag = senke.eintraege().await.remove(0);
        assert!(!anderes_log.verifizieren(&eintrag));
    }
}

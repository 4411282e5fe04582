//! Admin-Konto und Admin-Login
//!
//! Beim Server-Start wird das Admin-Konto aus der Konfiguration angelegt
//! bzw. sein Passwort-Record neu berechnet. Der Login prueft Passwort
//! (PBKDF2-Record) und zweiten Faktor (TOTP) und stellt ein kurzlebiges
//! `scope: "admin"`-Credential aus.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use hinterzimmer_core::AdminId;
use hinterzimmer_crypto::{geheimnis_hashen, geheimnis_verifizieren, PasswortRecord};
use hinterzimmer_observability::AuditLog;

use crate::error::{AuthError, AuthResult};
use crate::token::{token_signieren, Claims};
use crate::totp::totp_verifizieren;

/// Laufzeit eines Admin-Credentials in Sekunden
pub const ADMIN_TOKEN_TTL_SEKUNDEN: i64 = 3600;

/// Ein Admin-Konto
#[derive(Debug, Clone)]
pub struct AdminKonto {
    pub id: AdminId,
    pub username: String,
    pub passwort_record: PasswortRecord,
    /// Base64-kodiertes TOTP-Geheimnis; leer = 2FA nicht eingerichtet
    pub totp_geheimnis: String,
    pub erstellt_am: DateTime<Utc>,
    pub letzter_login: Option<DateTime<Utc>>,
}

/// In-Memory Admin-Store (username -> Konto)
#[derive(Debug, Default)]
pub struct AdminStore {
    konten: RwLock<HashMap<String, AdminKonto>>,
}

impl AdminStore {
    pub fn neu() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn get(&self, username: &str) -> Option<AdminKonto> {
        self.konten.read().await.get(username).cloned()
    }

    async fn einsetzen(&self, konto: AdminKonto) {
        self.konten
            .write()
            .await
            .insert(konto.username.clone(), konto);
    }

    async fn login_vermerken(&self, username: &str) {
        if let Some(konto) = self.konten.write().await.get_mut(username) {
            konto.letzter_login = Some(Utc::now());
        }
    }
}

/// Ergebnis eines erfolgreichen Admin-Logins
#[derive(Debug)]
pub struct AngemeldeterAdmin {
    pub token: String,
    pub laeuft_ab_sekunden: i64,
}

/// AdminService – Konto-Bootstrap und Login
pub struct AdminService {
    store: Arc<AdminStore>,
    token_geheimnis: String,
    audit: Arc<AuditLog>,
    /// Politik-Schalter: leeres TOTP-Geheimnis laesst den zweiten Faktor
    /// bestehen (Referenzverhalten). Auf `false` gesetzt schlaegt der Login
    /// ohne eingerichtetes TOTP fehl.
    totp_optional: bool,
}

impl AdminService {
    /// Erstellt einen neuen AdminService
    pub fn neu(
        store: Arc<AdminStore>,
        token_geheimnis: impl Into<String>,
        audit: Arc<AuditLog>,
        totp_optional: bool,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            token_geheimnis: token_geheimnis.into(),
            audit,
            totp_optional,
        })
    }

    /// Legt das Admin-Konto an oder aktualisiert es (Server-Start)
    ///
    /// Der Passwort-Record wird immer neu berechnet. Ein leeres neues
    /// TOTP-Geheimnis laesst ein bereits hinterlegtes bestehen.
    pub async fn konto_sicherstellen(
        &self,
        username: &str,
        passwort: &str,
        totp_geheimnis: &str,
    ) -> AuthResult<AdminKonto> {
        let username = username.trim().to_string();
        let record = geheimnis_hashen(passwort)?;

        let konto = match self.store.get(&username).await {
            Some(mut bestehend) => {
                bestehend.passwort_record = record;
                if !totp_geheimnis.is_empty() {
                    bestehend.totp_geheimnis = totp_geheimnis.to_string();
                }
                bestehend
            }
            None => {
                let konto = AdminKonto {
                    id: AdminId::new(),
                    username: username.clone(),
                    passwort_record: record,
                    totp_geheimnis: totp_geheimnis.to_string(),
                    erstellt_am: Utc::now(),
                    letzter_login: None,
                };
                self.audit
                    .erfassen("admin_created", &username, serde_json::json!({ "by": "system" }))
                    .await;
                konto
            }
        };

        self.store.einsetzen(konto.clone()).await;
        tracing::info!(username = %konto.username, "Admin-Konto bereitgestellt");
        Ok(konto)
    }

    /// Meldet einen Admin an (Passwort + zweiter Faktor)
    pub async fn anmelden(
        &self,
        username: &str,
        passwort: &str,
        totp_code: &str,
    ) -> AuthResult<AngemeldeterAdmin> {
        let konto = match self.store.get(username.trim()).await {
            Some(konto) => konto,
            None => {
                self.audit
                    .erfassen(
                        "admin_login_failed",
                        username,
                        serde_json::json!({ "reason": "not_found" }),
                    )
                    .await;
                return Err(AuthError::UngueltigeAnmeldedaten);
            }
        };

        let passwort_korrekt = geheimnis_verifizieren(passwort, &konto.passwort_record)?;
        if !passwort_korrekt {
            self.audit
                .erfassen(
                    "admin_login_failed",
                    username,
                    serde_json::json!({ "reason": "invalid_password" }),
                )
                .await;
            return Err(AuthError::UngueltigeAnmeldedaten);
        }

        let totp_bestanden = if konto.totp_geheimnis.is_empty() && !self.totp_optional {
            false
        } else {
            totp_verifizieren(totp_code, &konto.totp_geheimnis)
        };
        if !totp_bestanden {
            self.audit
                .erfassen(
                    "admin_login_failed",
                    username,
                    serde_json::json!({ "reason": "invalid_totp" }),
                )
                .await;
            return Err(AuthError::ZweiterFaktorUngueltig);
        }

        self.store.login_vermerken(&konto.username).await;

        let mut claims = Claims::new();
        claims.insert("sub".into(), serde_json::json!(konto.id.inner()));
        claims.insert("username".into(), serde_json::json!(konto.username));
        claims.insert("scope".into(), serde_json::json!("admin"));
        let token = token_signieren(&claims, &self.token_geheimnis, ADMIN_TOKEN_TTL_SEKUNDEN)?;

        self.audit
            .erfassen(
                "admin_login_success",
                &konto.username,
                serde_json::json!({ "adminId": konto.id.inner() }),
            )
            .await;
        tracing::info!(username = %konto.username, "Admin angemeldet");

        Ok(AngemeldeterAdmin {
            token,
            laeuft_ab_sekunden: ADMIN_TOKEN_TTL_SEKUNDEN,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{scope_pruefen, token_verifizieren};
    use crate::totp::totp_generieren;
    use hinterzimmer_observability::SpeicherSenke;

    const TOKEN_GEHEIMNIS: &str = "token-geheimnis-fuer-admin-tests";
    const TOTP_GEHEIMNIS: &str = "YWRtaW4tdG90cC1nZWhlaW1uaXM="; // "admin-totp-geheimnis"

    fn service(totp_optional: bool) -> (Arc<AdminService>, Arc<SpeicherSenke>) {
        let senke = SpeicherSenke::neu();
        let audit = AuditLog::neu("audit-geheimnis", senke.clone());
        let service = AdminService::neu(AdminStore::neu(), TOKEN_GEHEIMNIS, audit, totp_optional);
        (service, senke)
    }

    #[tokio::test]
    async fn login_ohne_totp_geheimnis_bestanden() {
        let (service, _senke) = service(true);
        service
            .konto_sicherstellen("admin", "Admin#1234", "")
            .await
            .unwrap();

        let angemeldet = service.anmelden("admin", "Admin#1234", "").await.unwrap();
        let claims = token_verifizieren(&angemeldet.token, TOKEN_GEHEIMNIS).unwrap();
        assert!(scope_pruefen(&claims, "admin").is_ok());
        assert_eq!(angemeldet.laeuft_ab_sekunden, 3600);
    }

    #[tokio::test]
    async fn login_mit_totp() {
        let (service, _senke) = service(true);
        service
            .konto_sicherstellen("admin", "Admin#1234", TOTP_GEHEIMNIS)
            .await
            .unwrap();

        let code =
            totp_generieren(TOTP_GEHEIMNIS, 0, chrono::Utc::now().timestamp()).unwrap();
        let ergebnis = service.anmelden("admin", "Admin#1234", &code).await;
        assert!(ergebnis.is_ok());
    }

    #[tokio::test]
    async fn falsches_passwort_wird_auditiert() {
        let (service, senke) = service(true);
        service
            .konto_sicherstellen("admin", "Admin#1234", "")
            .await
            .unwrap();

        let ergebnis = service.anmelden("admin", "falsch", "").await;
        assert!(matches!(ergebnis, Err(AuthError::UngueltigeAnmeldedaten)));

        let eintraege = senke.eintraege().await;
        assert!(eintraege
            .iter()
            .any(|e| e.aktion == "admin_login_failed"
                && e.metadaten["reason"] == "invalid_password"));
    }

    #[tokio::test]
    async fn unbekannter_admin_wird_abgelehnt() {
        let (service, senke) = service(true);
        let ergebnis = service.anmelden("niemand", "egal", "").await;
        assert!(matches!(ergebnis, Err(AuthError::UngueltigeAnmeldedaten)));

        let eintraege = senke.eintraege().await;
        assert!(eintraege
            .iter()
            .any(|e| e.metadaten["reason"] == "not_found"));
    }

    #[tokio::test]
    async fn falscher_totp_code_wird_abgelehnt() {
        let (service, _senke) = service(true);
        service
            .konto_sicherstellen("admin", "Admin#1234", TOTP_GEHEIMNIS)
            .await
            .unwrap();

        let ergebnis = service.anmelden("admin", "Admin#1234", "000000").await;
        // 1:1e6-Restrisiko dass der echte Code zufaellig 000000 ist
        if let Err(e) = ergebnis {
            assert!(matches!(e, AuthError::ZweiterFaktorUngueltig));
        }
    }

    #[tokio::test]
    async fn totp_pflicht_politik_schliesst_bypass() {
        let (service, _senke) = service(false);
        service
            .konto_sicherstellen("admin", "Admin#1234", "")
            .await
            .unwrap();

        let ergebnis = service.anmelden("admin", "Admin#1234", "").await;
        assert!(matches!(ergebnis, Err(AuthError::ZweiterFaktorUngueltig)));
    }

    #[tokio::test]
    async fn bootstrap_behaelt_totp_geheimnis() {
        let (service, _senke) = service(true);
        service
            .konto_sicherstellen("admin", "Admin#1234", TOTP_GEHEIMNIS)
            .await
            .unwrap();
        // Zweiter Start ohne konfiguriertes TOTP-Geheimnis
        let konto = service
            .konto_sicherstellen("admin", "Neues#Passwort1", "")
            .await
            .unwrap();
        assert_eq!(konto.totp_geheimnis, TOTP_GEHEIMNIS);
    }
}

//! RaumService – Raum-Erstellung und Zutrittskontrolle
//!
//! Der Zutritt folgt dem Kontrollfluss: PIN-Record pruefen, verwahrten
//! Sitzungsschluessel transient entpacken, Credential ausstellen, Sitzung
//! in der Registry eintragen. Jeder Schritt ist terminal: eine Ablehnung
//! wird dem Aufrufer gemeldet und niemals automatisch wiederholt.

use std::sync::Arc;

use chrono::Utc;

use hinterzimmer_auth::token::{token_signieren, Claims};
use hinterzimmer_core::{AdminId, RaumId, SitzungsId};
use hinterzimmer_crypto::{
    entschluesseln, geheimnis_hashen, geheimnis_verifizieren, session_schluessel_generieren,
    verschluesseln,
};
use hinterzimmer_observability::AuditLog;

use crate::error::{RaumError, RaumResult};
use crate::registry::SessionRegistry;
use crate::store::RaumStore;
use crate::types::{
    geraete_abdruck_berechnen, nickname_bereinigen, nickname_hash_berechnen, NeuerRaum,
    OeffentlicheSitzung, Raum, RaumTyp,
};

/// Laufzeit eines Raum-Credentials in Sekunden
pub const RAUM_TOKEN_TTL_SEKUNDEN: i64 = 3600;

/// Mindestlaenge des Raum-PINs in Zeichen
const PIN_MINDESTLAENGE: usize = 4;

/// Mindestlaenge eines Nicknames in Zeichen (nach Bereinigung)
const NICKNAME_MINDESTLAENGE: usize = 3;

/// Ergebnis eines gewaehrten Raum-Zutritts
#[derive(Debug)]
pub struct ZutrittGewaehrt {
    /// Signiertes `scope: "user"`-Credential
    pub sitzungs_token: String,
    /// Transient entpackter Sitzungsschluessel (Base64) zur einmaligen
    /// Auslieferung an den Client
    pub sitzungsschluessel: String,
    pub sitzungs_id: SitzungsId,
    pub raum_id: RaumId,
    pub raum_typ: RaumTyp,
    pub max_datei_mb: u32,
    pub nickname_hash: String,
    pub anzeige_name: String,
}

/// RaumService – zentraler Einstiegspunkt fuer Raum-Vorgaenge
pub struct RaumService<S: RaumStore> {
    store: Arc<S>,
    registry: Arc<SessionRegistry>,
    audit: Arc<AuditLog>,
    crypto_geheimnis: String,
    token_geheimnis: String,
}

impl<S: RaumStore> RaumService<S> {
    /// Erstellt einen neuen RaumService
    pub fn neu(
        store: Arc<S>,
        registry: Arc<SessionRegistry>,
        audit: Arc<AuditLog>,
        crypto_geheimnis: impl Into<String>,
        token_geheimnis: impl Into<String>,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            registry,
            audit,
            crypto_geheimnis: crypto_geheimnis.into(),
            token_geheimnis: token_geheimnis.into(),
        })
    }

    /// Legt einen neuen Raum an (Admin-Vorgang)
    ///
    /// Der PIN wird als PBKDF2-Record abgelegt, die Raum-ID verschluesselt,
    /// der Sitzungsschluessel erzeugt und sofort verwahrt.
    pub async fn raum_erstellen(
        &self,
        eingabe: NeuerRaum,
        erstellt_von: AdminId,
        akteur: &str,
    ) -> RaumResult<Raum> {
        if eingabe.pin.chars().count() < PIN_MINDESTLAENGE {
            return Err(RaumError::PinZuKurz {
                mindestens: PIN_MINDESTLAENGE,
            });
        }

        let raum_id = RaumId::new();
        let raum = Raum {
            id: raum_id,
            verschluesselte_id: verschluesseln(&raum_id.to_string(), &self.crypto_geheimnis)?,
            pin_record: geheimnis_hashen(&eingabe.pin)?,
            typ: eingabe.typ,
            max_datei_mb: eingabe.max_datei_mb,
            erstellt_von,
            erstellt_am: Utc::now(),
            aktiv: true,
            sitzungsschluessel: session_schluessel_generieren(&self.crypto_geheimnis)?,
        };

        self.store
            .anlegen(raum.clone())
            .await
            .map_err(|e| RaumError::Intern(e.to_string()))?;

        self.audit
            .erfassen(
                "room_created",
                akteur,
                serde_json::json!({
                    "roomId": raum_id.inner(),
                    "type": raum.typ,
                    "maxFileSizeMB": raum.max_datei_mb,
                }),
            )
            .await;
        tracing::info!(%raum_id, typ = ?raum.typ, "Raum angelegt");

        Ok(raum)
    }

    /// Gewaehrt Zutritt zu einem Raum
    pub async fn zutritt(
        &self,
        raum_id: RaumId,
        pin: &str,
        nickname: &str,
        ip: &str,
        user_agent: &str,
    ) -> RaumResult<ZutrittGewaehrt> {
        let bereinigt = nickname_bereinigen(nickname);
        if bereinigt.chars().count() < NICKNAME_MINDESTLAENGE {
            return Err(RaumError::NicknameZuKurz {
                mindestens: NICKNAME_MINDESTLAENGE,
            });
        }

        let raum = self
            .store
            .get(raum_id)
            .await
            .map_err(|e| RaumError::Intern(e.to_string()))?
            .filter(|raum| raum.aktiv)
            .ok_or_else(|| RaumError::RaumNichtGefunden(raum_id.to_string()))?;

        let pin_korrekt = geheimnis_verifizieren(pin, &raum.pin_record)?;
        if !pin_korrekt {
            self.audit
                .erfassen(
                    "room_access_denied",
                    "anonymous",
                    serde_json::json!({ "roomId": raum_id.inner(), "reason": "invalid_pin" }),
                )
                .await;
            return Err(RaumError::PinFalsch);
        }

        let geraete_abdruck = geraete_abdruck_berechnen(ip, user_agent);
        let nickname_hash = nickname_hash_berechnen(&bereinigt);

        let sitzungs_id = self
            .registry
            .registrieren(raum_id, &bereinigt, &nickname_hash, &geraete_abdruck)
            .await?;

        let mut claims = Claims::new();
        claims.insert("sub".into(), serde_json::json!(sitzungs_id.inner()));
        claims.insert("roomId".into(), serde_json::json!(raum_id.inner()));
        claims.insert("nicknameHash".into(), serde_json::json!(nickname_hash));
        claims.insert("displayName".into(), serde_json::json!(bereinigt));
        claims.insert("scope".into(), serde_json::json!("user"));
        let sitzungs_token =
            token_signieren(&claims, &self.token_geheimnis, RAUM_TOKEN_TTL_SEKUNDEN)?;

        // Sitzungsschluessel transient entpacken; er wird genau einmal an
        // den authentifizierten Client ausgeliefert
        let sitzungsschluessel = entschluesseln(&raum.sitzungsschluessel, &self.crypto_geheimnis)?;

        self.audit
            .erfassen(
                "room_access_granted",
                &bereinigt,
                serde_json::json!({
                    "roomId": raum_id.inner(),
                    "nicknameHash": nickname_hash,
                }),
            )
            .await;
        tracing::info!(%raum_id, %sitzungs_id, "Raum-Zutritt gewaehrt");

        Ok(ZutrittGewaehrt {
            sitzungs_token,
            sitzungsschluessel,
            sitzungs_id,
            raum_id,
            raum_typ: raum.typ,
            max_datei_mb: raum.max_datei_mb,
            nickname_hash,
            anzeige_name: bereinigt,
        })
    }

    /// Verlaesst einen Raum (Trennung oder explizites Verlassen)
    pub async fn verlassen(&self, raum_id: RaumId, sitzungs_id: SitzungsId) {
        self.registry.abmelden(raum_id, sitzungs_id).await;
    }

    /// Oeffentliche Mitgliederliste eines Raums
    pub async fn nutzer_liste(&self, raum_id: RaumId) -> Vec<OeffentlicheSitzung> {
        self.registry.oeffentliche_liste(raum_id).await
    }
}

//! SessionRegistry – prozessweite Mitglieder-Tabelle
//!
//! Invarianten:
//! - Innerhalb eines Raums ist der normalisierte Nickname unter aktiven
//!   Sitzungen eindeutig
//! - Ein Geraete-Abdruck ist zu jedem Zeitpunkt an hoechstens einen Raum
//!   gebunden
//!
//! Beide Tabellen liegen hinter einem einzigen Schreib-Lock: Pruefung und
//! Eintrag einer Registrierung sind eine unteilbare Operation, zwei
//! gleichzeitige Registrierungen desselben Nicknames koennen also nicht
//! beide die Eindeutigkeitspruefung passieren.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use hinterzimmer_core::{RaumId, SitzungsId};

use crate::error::{RaumError, RaumResult};
use crate::types::{nickname_bereinigen, OeffentlicheSitzung, RaumSitzung};

#[derive(Debug, Default)]
struct RegistryZustand {
    /// Raum -> aktive Sitzungen
    raeume: HashMap<RaumId, HashMap<SitzungsId, RaumSitzung>>,
    /// Geraete-Abdruck -> gebundener Raum
    geraete: HashMap<String, RaumId>,
}

/// Prozessweite Mitglieder-Registry
#[derive(Debug, Default)]
pub struct SessionRegistry {
    zustand: RwLock<RegistryZustand>,
}

impl SessionRegistry {
    /// Erstellt eine neue leere Registry
    pub fn neu() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registriert eine neue Mitgliedschaft
    ///
    /// Eine bestehende Sitzung desselben Geraets im selben Raum wird zuvor
    /// entfernt (idempotenter Reconnect). Schlaegt fehl wenn der Nickname im
    /// Raum vergeben ist oder das Geraet an einen anderen Raum gebunden ist.
    pub async fn registrieren(
        &self,
        raum_id: RaumId,
        nickname: &str,
        nickname_hash: &str,
        geraete_abdruck: &str,
    ) -> RaumResult<SitzungsId> {
        let normalisiert = nickname_bereinigen(nickname).to_lowercase();

        let mut zustand = self.zustand.write().await;
        let sitzungen = zustand.raeume.entry(raum_id).or_default();

        // Idempotenter Reconnect: alte Sitzungen dieses Geraets raeumen
        sitzungen.retain(|_, sitzung| sitzung.geraete_abdruck != geraete_abdruck);

        if sitzungen
            .values()
            .any(|sitzung| sitzung.nickname_normalisiert == normalisiert)
        {
            return Err(RaumError::NicknameVergeben(normalisiert));
        }

        if let Some(gebundener_raum) = zustand.geraete.get(geraete_abdruck) {
            if *gebundener_raum != raum_id {
                return Err(RaumError::GeraetBereitsGebunden);
            }
        }

        let sitzungs_id = SitzungsId::new();
        let sitzung = RaumSitzung {
            id: sitzungs_id,
            nickname_normalisiert: normalisiert,
            nickname_hash: nickname_hash.to_string(),
            geraete_abdruck: geraete_abdruck.to_string(),
            verbunden_am: Utc::now(),
        };

        zustand
            .raeume
            .entry(raum_id)
            .or_default()
            .insert(sitzungs_id, sitzung);
        zustand.geraete.insert(geraete_abdruck.to_string(), raum_id);

        tracing::debug!(%raum_id, %sitzungs_id, "Mitgliedschaft registriert");
        Ok(sitzungs_id)
    }

    /// Entfernt eine Mitgliedschaft
    ///
    /// Die Geraete-Bindung wird nur geloest wenn im selben Raum keine
    /// weitere Sitzung dieses Geraets verbleibt; eine theoretisch in einem
    /// zweiten Raum aktive Sitzung wird nicht gegengeprueft.
    pub async fn abmelden(&self, raum_id: RaumId, sitzungs_id: SitzungsId) {
        let mut zustand = self.zustand.write().await;

        let Some(sitzungen) = zustand.raeume.get_mut(&raum_id) else {
            return;
        };
        let entfernte = sitzungen.remove(&sitzungs_id);

        if let Some(sitzung) = entfernte {
            let noch_aktiv = sitzungen
                .values()
                .any(|s| s.geraete_abdruck == sitzung.geraete_abdruck);
            if !noch_aktiv {
                zustand.geraete.remove(&sitzung.geraete_abdruck);
            }
        }

        if zustand
            .raeume
            .get(&raum_id)
            .is_some_and(|sitzungen| sitzungen.is_empty())
        {
            zustand.raeume.remove(&raum_id);
        }

        tracing::debug!(%raum_id, %sitzungs_id, "Mitgliedschaft entfernt");
    }

    /// Oeffentliche Mitgliederliste eines Raums
    ///
    /// Projiziert nur oeffentlich unbedenkliche Felder; der Geraete-Abdruck
    /// bleibt intern.
    pub async fn oeffentliche_liste(&self, raum_id: RaumId) -> Vec<OeffentlicheSitzung> {
        let zustand = self.zustand.read().await;
        zustand
            .raeume
            .get(&raum_id)
            .map(|sitzungen| {
                sitzungen
                    .values()
                    .map(|s| OeffentlicheSitzung {
                        nickname_hash: s.nickname_hash.clone(),
                        verbunden_am: s.verbunden_am,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Prueft ob eine Sitzung in einem Raum aktiv ist
    pub async fn sitzung_vorhanden(&self, raum_id: RaumId, sitzungs_id: SitzungsId) -> bool {
        let zustand = self.zustand.read().await;
        zustand
            .raeume
            .get(&raum_id)
            .is_some_and(|sitzungen| sitzungen.contains_key(&sitzungs_id))
    }

    /// Anzahl aktiver Sitzungen in einem Raum
    pub async fn anzahl_sitzungen(&self, raum_id: RaumId) -> usize {
        let zustand = self.zustand.read().await;
        zustand
            .raeume
            .get(&raum_id)
            .map(|sitzungen| sitzungen.len())
            .unwrap_or(0)
    }
}

//! hinterzimmer-server – Bibliotheks-Root
//!
//! Verdrahtet die Dienste des Vertrauens- und Inhaltspruefungs-Kerns und
//! stellt den oeffentlichen Einstiegspunkt fuer Integrationstests bereit.
//! Die HTTP/WebSocket-Transportschicht ist ein externer Kollaborateur und
//! hier nur als Platzhalter vertreten.

pub mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use hinterzimmer_auth::{AdminService, AdminStore};
use hinterzimmer_inspect::{
    EngineKonfiguration, KeinTiefenScan, StegAnalyseEngine, UploadPruefung, UploadRichtlinie,
};
use hinterzimmer_observability::{AuditLog, SpeicherSenke};
use hinterzimmer_rooms::{MemoryRaumStore, RaumService, SessionRegistry};

use config::HinterzimmerConfig;

/// Gebuendelte Kern-Dienste des Servers
pub struct Dienste {
    pub audit: Arc<AuditLog>,
    pub audit_senke: Arc<SpeicherSenke>,
    pub admin: Arc<AdminService>,
    pub raeume: Arc<RaumService<MemoryRaumStore>>,
    pub registry: Arc<SessionRegistry>,
    pub uploads: Arc<UploadPruefung>,
}

/// Baut alle Kern-Dienste aus der Konfiguration auf
pub fn dienste_aufbauen(config: &HinterzimmerConfig) -> Result<Dienste> {
    config.pruefen()?;

    let audit_senke = SpeicherSenke::neu();
    let audit = AuditLog::neu(
        config.geheimnisse.audit_geheimnis.clone(),
        audit_senke.clone(),
    );

    let admin = AdminService::neu(
        AdminStore::neu(),
        config.geheimnisse.token_geheimnis.clone(),
        audit.clone(),
        config.politik.totp_optional,
    );

    let registry = SessionRegistry::neu();
    let raeume = RaumService::neu(
        MemoryRaumStore::neu(),
        registry.clone(),
        audit.clone(),
        config.geheimnisse.crypto_geheimnis.clone(),
        config.geheimnisse.token_geheimnis.clone(),
    );

    let engine = StegAnalyseEngine::neu(
        Arc::new(KeinTiefenScan),
        EngineKonfiguration {
            max_parallel: config.steg.max_parallel,
            zeitlimit: Duration::from_secs(config.steg.zeitlimit_sekunden),
            schwache_stufe_zulassen: config.politik.schwache_stufe_zulassen,
        },
    );
    let uploads = UploadPruefung::neu(
        engine,
        UploadRichtlinie {
            erlaubte_mime_typen: config.uploads.erlaubte_mime_typen.clone(),
            max_groesse_bytes: config.upload_max_bytes(),
            analyse_fehler_zulassen: config.politik.analyse_fehler_zulassen,
        },
        audit.clone(),
    );

    Ok(Dienste {
        audit,
        audit_senke,
        admin,
        raeume,
        registry,
        uploads,
    })
}

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: HinterzimmerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: HinterzimmerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Kern-Dienste aufbauen
    /// 2. Admin-Konto bereitstellen
    /// 3. Transportschicht starten (externer Kollaborateur, Platzhalter)
    /// 4. Auf Ctrl-C / SIGTERM warten
    pub async fn starten(self) -> Result<()> {
        tracing::info!(
            server_name = %self.config.server.name,
            "Server startet"
        );

        let dienste = dienste_aufbauen(&self.config)?;

        dienste
            .admin
            .konto_sicherstellen(
                &self.config.geheimnisse.admin_username,
                &self.config.geheimnisse.admin_passwort,
                &self.config.geheimnisse.admin_totp_geheimnis,
            )
            .await?;

        tracing::info!(
            max_parallel = self.config.steg.max_parallel,
            zeitlimit_s = self.config.steg.zeitlimit_sekunden,
            "Steganografie-Analyse bereit"
        );

        tracing::info!("Transportschicht bereit (Platzhalter)");

        tracing::info!("Server laeuft. Warte auf Shutdown-Signal (Ctrl-C)...");
        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutdown-Signal empfangen, Server wird beendet");

        Ok(())
    }
}

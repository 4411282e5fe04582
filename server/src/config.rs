//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! Standardwerte, sodass der Server ohne Konfigurationsdatei lauffaehig
//! ist; die Geheimnisse der Standardkonfiguration sind ausschliesslich
//! fuer Entwicklung und Tests gedacht.

use serde::{Deserialize, Serialize};

use hinterzimmer_core::HinterzimmerError;

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HinterzimmerConfig {
    /// Allgemeine Server-Einstellungen
    pub server: ServerEinstellungen,
    /// Geheimnisse (Verschluesselung, Token-Signatur, Audit, Admin-Konto)
    pub geheimnisse: GeheimnisEinstellungen,
    /// Upload-Einstellungen
    pub uploads: UploadEinstellungen,
    /// Steganografie-Analyse
    pub steg: StegEinstellungen,
    /// Benannte Fail-Open-Politik-Schalter
    pub politik: PolitikEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Allgemeine Server-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename des Servers
    pub name: String,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "Hinterzimmer Server".into(),
        }
    }
}

/// Geheimnisse
///
/// Das Crypto-Geheimnis muss mindestens 32 Zeichen lang sein (siehe
/// Schluessel-Ableitung). Ein leeres Admin-TOTP-Geheimnis bedeutet: 2FA ist
/// nicht eingerichtet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeheimnisEinstellungen {
    pub crypto_geheimnis: String,
    pub token_geheimnis: String,
    pub audit_geheimnis: String,
    pub admin_username: String,
    pub admin_passwort: String,
    pub admin_totp_geheimnis: String,
}

impl Default for GeheimnisEinstellungen {
    fn default() -> Self {
        Self {
            crypto_geheimnis: "entwicklungs-geheimnis-bitte-ersetzen-0000".into(),
            token_geheimnis: "entwicklungs-token-geheimnis-bitte-ersetzen".into(),
            audit_geheimnis: "entwicklungs-audit-geheimnis-bitte-ersetzen".into(),
            admin_username: "admin".into(),
            admin_passwort: "Admin#1234".into(),
            admin_totp_geheimnis: String::new(),
        }
    }
}

/// Upload-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadEinstellungen {
    /// Globale Obergrenze in Megabyte
    pub max_groesse_mb: u32,
    /// Zugelassene MIME-Typen
    pub erlaubte_mime_typen: Vec<String>,
}

impl Default for UploadEinstellungen {
    fn default() -> Self {
        Self {
            max_groesse_mb: 15,
            erlaubte_mime_typen: vec![
                "image/png".into(),
                "image/jpeg".into(),
                "image/gif".into(),
                "application/pdf".into(),
                "text/plain".into(),
                "application/zip".into(),
            ],
        }
    }
}

/// Einstellungen der Steganografie-Analyse
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StegEinstellungen {
    /// Hartes Zeitlimit pro Analyse in Sekunden
    pub zeitlimit_sekunden: u64,
    /// Obergrenze gleichzeitiger Analysen
    pub max_parallel: usize,
}

impl Default for StegEinstellungen {
    fn default() -> Self {
        Self {
            zeitlimit_sekunden: 10,
            max_parallel: 4,
        }
    }
}

/// Benannte Fail-Open-Politik-Schalter
///
/// Die Standardwerte entsprechen dem Referenzverhalten; jeder Schalter ist
/// einzeln auf fail-closed umstellbar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolitikEinstellungen {
    /// Interne Analyse-Fehler als Freigabe werten
    /// (Zeitueberschreitungen lehnen immer ab)
    pub analyse_fehler_zulassen: bool,
    /// Verdachts-Scores in (0.50, 0.70] ohne Bestaetigung zulassen
    pub schwache_stufe_zulassen: bool,
    /// Leeres Admin-TOTP-Geheimnis laesst den zweiten Faktor bestehen
    pub totp_optional: bool,
}

impl Default for PolitikEinstellungen {
    fn default() -> Self {
        Self {
            analyse_fehler_zulassen: true,
            schwache_stufe_zulassen: true,
            totp_optional: true,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl HinterzimmerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        let config = match std::fs::read_to_string(pfad) {
            Ok(inhalt) => toml::from_str(&inhalt)
                .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Self::default()
            }
            Err(e) => anyhow::bail!("Konfigurationsdatei '{pfad}' nicht lesbar: {e}"),
        };

        config.pruefen()?;
        Ok(config)
    }

    /// Prueft die Konfiguration auf offensichtliche Fehler
    pub fn pruefen(&self) -> Result<(), HinterzimmerError> {
        if self.geheimnisse.crypto_geheimnis.chars().count() < 32 {
            return Err(HinterzimmerError::Konfiguration(
                "crypto_geheimnis muss mindestens 32 Zeichen lang sein".into(),
            ));
        }
        if self.geheimnisse.token_geheimnis.is_empty() {
            return Err(HinterzimmerError::Konfiguration(
                "token_geheimnis darf nicht leer sein".into(),
            ));
        }
        if self.geheimnisse.audit_geheimnis.is_empty() {
            return Err(HinterzimmerError::Konfiguration(
                "audit_geheimnis darf nicht leer sein".into(),
            ));
        }
        if self.steg.zeitlimit_sekunden == 0 {
            return Err(HinterzimmerError::Konfiguration(
                "steg.zeitlimit_sekunden muss groesser 0 sein".into(),
            ));
        }
        Ok(())
    }

    /// Upload-Obergrenze in Bytes
    pub fn upload_max_bytes(&self) -> usize {
        self.uploads.max_groesse_mb as usize * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_ist_valide() {
        let cfg = HinterzimmerConfig::default();
        assert!(cfg.pruefen().is_ok());
        assert_eq!(cfg.uploads.max_groesse_mb, 15);
        assert_eq!(cfg.steg.zeitlimit_sekunden, 10);
        assert!(cfg.politik.totp_optional);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn upload_max_bytes_rechnet_um() {
        let cfg = HinterzimmerConfig::default();
        assert_eq!(cfg.upload_max_bytes(), 15 * 1024 * 1024);
    }

    #[test]
    fn kurzes_crypto_geheimnis_faellt_durch() {
        let mut cfg = HinterzimmerConfig::default();
        cfg.geheimnisse.crypto_geheimnis = "zu-kurz".into();
        assert!(cfg.pruefen().is_err());
    }

    #[test]
    fn config_aus_toml_string() {
        let toml = r#"
            [server]
            name = "Mein Hinterzimmer"

            [steg]
            zeitlimit_sekunden = 5
            max_parallel = 2

            [politik]
            schwache_stufe_zulassen = false
        "#;
        let cfg: HinterzimmerConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.server.name, "Mein Hinterzimmer");
        assert_eq!(cfg.steg.zeitlimit_sekunden, 5);
        assert!(!cfg.politik.schwache_stufe_zulassen);
        // Nicht angegebene Felder behalten Standardwerte
        assert_eq!(cfg.uploads.max_groesse_mb, 15);
        assert!(cfg.politik.analyse_fehler_zulassen);
    }
}

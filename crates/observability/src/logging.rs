//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Konfigurationsdatei, ueberschreibbar per Umgebung:
//! - `HZ_LOG_LEVEL`: Log-Level (trace/debug/info/warn/error)
//! - `HZ_LOG_FORMAT`: Format (text/json)
//!
//! Kein Log-Statement im gesamten System darf Geheimnisse, Hash-Eingaben
//! oder Schluesselmaterial enthalten.

use tracing_subscriber::{fmt, EnvFilter};

use hinterzimmer_core::HinterzimmerError;

/// Initialisiert das Logging-System
///
/// `level` und `format` stammen aus der Konfiguration; `HZ_LOG_LEVEL` und
/// `HZ_LOG_FORMAT` aus der Umgebung haben Vorrang.
pub fn logging_initialisieren(level: &str, format: &str) -> Result<(), HinterzimmerError> {
    log_konfiguration_pruefen(level, format)?;

    let filter = EnvFilter::try_from_env("HZ_LOG_LEVEL")
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let format_effektiv =
        std::env::var("HZ_LOG_FORMAT").unwrap_or_else(|_| format.to_string());

    match format_effektiv.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_current_span(true)
                .init();
        }
        _ => {
            fmt().with_env_filter(filter).with_target(true).init();
        }
    }

    Ok(())
}

/// Prueft Level- und Format-Angabe aus der Konfiguration
pub fn log_konfiguration_pruefen(level: &str, format: &str) -> Result<(), HinterzimmerError> {
    if !matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
        return Err(HinterzimmerError::Konfiguration(format!(
            "Unbekanntes Log-Level '{level}'"
        )));
    }
    if !matches!(format, "text" | "json") {
        return Err(HinterzimmerError::Konfiguration(format!(
            "Unbekanntes Log-Format '{format}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gueltige_konfiguration() {
        assert!(log_konfiguration_pruefen("info", "text").is_ok());
        assert!(log_konfiguration_pruefen("debug", "json").is_ok());
        assert!(log_konfiguration_pruefen("trace", "text").is_ok());
    }

    #[test]
    fn ungueltiges_level_wird_abgelehnt() {
        assert!(log_konfiguration_pruefen("verbose", "text").is_err());
        assert!(log_konfiguration_pruefen("INFO", "text").is_err());
        assert!(log_konfiguration_pruefen("", "text").is_err());
    }

    #[test]
    fn ungueltiges_format_wird_abgelehnt() {
        assert!(log_konfiguration_pruefen("info", "xml").is_err());
        assert!(log_konfiguration_pruefen("info", "JSON").is_err());
    }
}

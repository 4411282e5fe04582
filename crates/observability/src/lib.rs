//! hinterzimmer-observability – Logging und Audit
//!
//! Dieses Crate implementiert:
//! - Structured-Logging-Setup via tracing-subscriber (Text oder JSON)
//! - Signiertes Audit-Log: jeder sicherheitsrelevante Vorgang wird als
//!   HMAC-SHA256-signierter Eintrag an eine austauschbare Senke gegeben
//!
//! Audit-Fehler werden geloggt, brechen aber nie den ausloesenden Vorgang ab.

pub mod audit;
pub mod logging;

// Bequeme Re-Exporte
pub use audit::{AuditEintrag, AuditLog, AuditSenke, SpeicherSenke};
pub use logging::logging_initialisieren;

//! hinterzimmer-inspect – Inhaltspruefung fuer Datei-Uploads
//!
//! Dieses Crate implementiert:
//! - Dateityp-Erkennung ueber Magic-Number-Signaturen plus Text-Heuristik
//! - Steganografie-Analyse: Shannon-Entropie, Container-Ende-Erkennung und
//!   Klassifikation der Bytes hinter dem Bildende ("Tail")
//! - Eine isolierte, zeitbegrenzte Analyse-Engine mit begrenzter Parallelitaet
//! - Die Upload-Freigabe, die beide Pruefungen orchestriert
//!
//! Gezielt erkannt werden Tail-Daten- und Hochentropie-Muster; eine
//! vollstaendige Codec-Analyse oder die Erkennung jeder denkbaren
//! Steganografie-Technik ist ausdruecklich nicht das Ziel.

pub mod deep_scan;
pub mod engine;
pub mod entropie;
pub mod error;
pub mod file_type;
pub mod pruefung;
pub mod steg;

// Bequeme Re-Exporte
pub use deep_scan::{KeinTiefenScan, TiefenScan, TiefenScanBefund};
pub use engine::{EngineKonfiguration, StegAnalyseEngine};
pub use error::{InspectError, InspectResult};
pub use file_type::{dateityp_erkennen, typ_vergleichen, DateiTyp, TypVerdict};
pub use pruefung::{DateiFreigabe, UploadPruefung, UploadRichtlinie};
pub use steg::{StegVerdict, TrustLevel};

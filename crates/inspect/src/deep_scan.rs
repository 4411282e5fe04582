//! Anbindung eines externen Tiefenscan-Dienstes
//!
//! Der Tiefenscan ist ein Best-Effort-Kollaborateur: er liefert
//! Zweitmeinungen fuer mittlere Verdachtsstufen und Zusatzbefunde fuer
//! eindeutige Faelle. Ist er nicht erreichbar, laeuft die Analyse ohne
//! Bestaetigung weiter (siehe Freigabe-Entscheidung in [`crate::engine`]).

use async_trait::async_trait;

/// Befund eines Tiefenscans
#[derive(Debug, Clone)]
pub struct TiefenScanBefund {
    pub verdaechtig: bool,
    pub befunde: Vec<String>,
}

/// Externer Tiefenscan-Dienst
#[async_trait]
pub trait TiefenScan: Send + Sync {
    /// Prueft die Rohdaten; Fehler bedeuten "keine Aussage", nie "sauber"
    async fn pruefen(&self, daten: &[u8]) -> anyhow::Result<TiefenScanBefund>;
}

/// Platzhalter wenn kein Tiefenscan-Dienst konfiguriert ist
///
/// Liefert immer einen Fehler; die Engine wertet das als fehlende
/// Bestaetigung.
pub struct KeinTiefenScan;

#[async_trait]
impl TiefenScan for KeinTiefenScan {
    async fn pruefen(&self, _daten: &[u8]) -> anyhow::Result<TiefenScanBefund> {
        anyhow::bail!("kein Tiefenscan-Dienst konfiguriert")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn platzhalter_liefert_fehler() {
        let scanner = KeinTiefenScan;
        assert!(scanner.pruefen(&[1, 2, 3]).await.is_err());
    }
}

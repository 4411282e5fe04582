//! RaumStore – Ablage angelegter Raeume
//!
//! Persistenz ist ein externer Kollaborateur; dieses Crate definiert nur die
//! Schnittstelle und eine In-Memory-Implementierung fuer Tests und den
//! Standalone-Betrieb.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use hinterzimmer_core::RaumId;

use crate::types::Raum;

/// Ablage fuer Raeume
#[async_trait]
pub trait RaumStore: Send + Sync {
    async fn anlegen(&self, raum: Raum) -> anyhow::Result<()>;
    async fn get(&self, raum_id: RaumId) -> anyhow::Result<Option<Raum>>;
    async fn aktiv_setzen(&self, raum_id: RaumId, aktiv: bool) -> anyhow::Result<()>;
    async fn liste(&self) -> anyhow::Result<Vec<Raum>>;
}

/// In-Memory-Implementierung des RaumStores
#[derive(Debug, Default)]
pub struct MemoryRaumStore {
    raeume: RwLock<HashMap<RaumId, Raum>>,
}

impl MemoryRaumStore {
    pub fn neu() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl RaumStore for MemoryRaumStore {
    async fn anlegen(&self, raum: Raum) -> anyhow::Result<()> {
        self.raeume.write().await.insert(raum.id, raum);
        Ok(())
    }

    async fn get(&self, raum_id: RaumId) -> anyhow::Result<Option<Raum>> {
        Ok(self.raeume.read().await.get(&raum_id).cloned())
    }

    async fn aktiv_setzen(&self, raum_id: RaumId, aktiv: bool) -> anyhow::Result<()> {
        match self.raeume.write().await.get_mut(&raum_id) {
            Some(raum) => {
                raum.aktiv = aktiv;
                Ok(())
            }
            None => anyhow::bail!("Raum {raum_id} nicht gefunden"),
        }
    }

    async fn liste(&self) -> anyhow::Result<Vec<Raum>> {
        Ok(self.raeume.read().await.values().cloned().collect())
    }
}

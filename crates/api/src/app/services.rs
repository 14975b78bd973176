use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::Context;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use tokio::sync::broadcast;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

use inventrobil_events::Event;
use inventrobil_infra::{
    FileKeyValueStore, InMemoryKeyValueStore, InventoryStore, KeyValueStore, StoreOptions,
};
use inventrobil_inventory::InventoryEvent;

use crate::config::{AppConfig, StorageBackend};

/// Storage backend chosen at startup.
pub type DynStorage = Box<dyn KeyValueStore>;

/// The process-wide inventory store, shared by every handler.
pub struct AppServices {
    store: Mutex<InventoryStore<DynStorage>>,
    realtime_tx: broadcast::Sender<InventoryEvent>,
}

impl AppServices {
    /// Wrap `store` and start forwarding its change events to realtime subscribers.
    pub fn new(store: InventoryStore<DynStorage>) -> Self {
        let (realtime_tx, _) = broadcast::channel(256);

        // Bus -> broadcast bridge. Ends once the store (and with it the bus) is dropped.
        let sub = store.subscribe();
        let tx = realtime_tx.clone();
        let spawned = std::thread::Builder::new()
            .name("inventory-events".to_string())
            .spawn(move || {
                while let Ok(event) = sub.recv() {
                    // Lossy: no receivers simply means nobody is listening.
                    let _ = tx.send(event);
                }
                tracing::debug!("inventory event bridge stopped");
            });
        if let Err(err) = spawned {
            tracing::warn!(error = %err, "failed to start event bridge; /api/stream will stay silent");
        }

        Self {
            store: Mutex::new(store),
            realtime_tx,
        }
    }

    /// Exclusive access to the store for the duration of one request.
    pub fn store(&self) -> MutexGuard<'_, InventoryStore<DynStorage>> {
        // Store operations never leave state half-applied, so a poisoned lock is still usable.
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn realtime_tx(&self) -> &broadcast::Sender<InventoryEvent> {
        &self.realtime_tx
    }
}

pub fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let storage: DynStorage = match config.storage {
        StorageBackend::File => {
            let files = FileKeyValueStore::open(&config.data_dir).with_context(|| {
                format!("failed to open data directory {}", config.data_dir.display())
            })?;
            tracing::info!(dir = %files.dir().display(), "using file storage");
            Box::new(files)
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; inventory will not survive a restart");
            Box::new(InMemoryKeyValueStore::new())
        }
    };

    let options = StoreOptions::default().with_numeric_policy(config.numeric_policy);
    Ok(AppServices::new(InventoryStore::open(storage, options)))
}

pub fn inventory_sse_stream(
    services: Arc<AppServices>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.realtime_tx().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(event) => {
            let data = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default().event(event.event_type()).data(data)))
        }
        // Lagged receivers skip what they missed.
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

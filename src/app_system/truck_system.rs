use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::actor_framework::{Entity, ResourceActor};
use crate::clients::{StaffClient, StoreClient, TruckClient};
use crate::config::AppConfig;
use crate::domain::{AdminUser, Truck};
use crate::notifier::Notifier;
use crate::persistence::{keys, DirectoryStore, Persistence};
use crate::schedule::ScheduleBook;
use crate::store::StoreService;

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Actor task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

fn prefixed_id(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    move || format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Spawns a resource actor seeded from `key` that writes the whole collection
/// back after every mutation, sorted by id.
fn spawn_collection<T>(
    persistence: &Persistence,
    key: &'static str,
    buffer_size: usize,
    prefix: &'static str,
) -> (crate::actor_framework::ResourceClient<T>, JoinHandle<()>)
where
    T: Entity<Id = String> + Serialize + serde::de::DeserializeOwned,
{
    let items: Vec<T> = persistence.load(key).unwrap_or_default();
    let sink = persistence.clone();
    let (actor, client) = ResourceActor::<T>::new(buffer_size, prefixed_id(prefix));
    let actor = actor.with_items(items).with_snapshot_sink(move |items: &[T]| {
        let mut sorted: Vec<&T> = items.iter().collect();
        sorted.sort_by(|a, b| a.id().cmp(b.id()));
        sink.save(key, &sorted);
    });
    (client, tokio::spawn(actor.run()))
}

/// Starts every actor and hands out their clients.
pub struct TruckSystem {
    pub store: StoreClient,
    pub staff: StaffClient,
    pub trucks: TruckClient,
    pub schedule: ScheduleBook,
    handles: Vec<JoinHandle<()>>,
}

impl TruckSystem {
    /// Storage is the configured data directory, or memory when none is set.
    #[instrument(name = "truck_system", skip_all)]
    pub fn new(config: &AppConfig, notifier: Arc<dyn Notifier>) -> Self {
        let persistence = match &config.data_dir {
            Some(dir) => {
                info!(data_dir = %dir.display(), "Using directory storage");
                Persistence::new(Arc::new(DirectoryStore::new(dir.clone())))
            }
            None => {
                info!("No data directory, state is kept in memory");
                Persistence::in_memory()
            }
        };
        Self::with_persistence(config, persistence, notifier)
    }

    pub fn with_persistence(config: &AppConfig, persistence: Persistence, notifier: Arc<dyn Notifier>) -> Self {
        let (store_service, store) = StoreService::new(
            config.buffer_size,
            persistence.clone(),
            notifier,
            config.transition_delays(),
        );
        let store_handle = tokio::spawn(store_service.run());

        let (staff_inner, staff_handle) =
            spawn_collection::<AdminUser>(&persistence, keys::USERS, config.buffer_size, "U");
        let (truck_inner, truck_handle) =
            spawn_collection::<Truck>(&persistence, keys::TRUCKS, config.buffer_size, "T");

        Self {
            store,
            staff: StaffClient::new(staff_inner),
            trucks: TruckClient::new(truck_inner),
            schedule: ScheduleBook::new(persistence),
            handles: vec![store_handle, staff_handle, truck_handle],
        }
    }

    /// Stops the store explicitly and the resource actors by closing their
    /// channels. Pending status transitions are dropped.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        if let Err(e) = self.store.shutdown().await {
            error!(error = %e, "Store did not acknowledge shutdown");
        }

        drop(self.store);
        drop(self.staff);
        drop(self.trucks);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(e.into());
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{search_trucks, Truck};
use crate::truck_actor::{TruckAction, TruckActionResult, TruckError};

/// Client for interacting with the truck actor.
#[derive(Clone)]
pub struct TruckClient {
    inner: ResourceClient<Truck>,
}

impl_basic_client!(TruckClient, Truck, TruckError, truck);

impl TruckClient {
    /// Returns the new value of the active flag.
    #[instrument(skip(self))]
    pub async fn toggle_active(&self, id: String) -> Result<bool, TruckError> {
        debug!("Sending request");
        match self.inner.perform_action(id, TruckAction::ToggleActive).await {
            Ok(TruckActionResult::ToggleActive(active)) => Ok(active),
            Ok(_) => Err(TruckError::ActorCommunicationError("Unexpected result".to_string())),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    pub async fn set_active(&self, id: String, active: bool) -> Result<(), TruckError> {
        debug!("Sending request");
        match self.inner.perform_action(id, TruckAction::SetActive(active)).await {
            Ok(TruckActionResult::SetActive(_)) => Ok(()),
            Ok(_) => Err(TruckError::ActorCommunicationError("Unexpected result".to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Case-insensitive search, sorted by name.
    #[instrument(skip(self))]
    pub async fn search_trucks(&self, query: String) -> Result<Vec<Truck>, TruckError> {
        let trucks = self.list_trucks().await?;
        Ok(search_trucks(&trucks, &query))
    }
}

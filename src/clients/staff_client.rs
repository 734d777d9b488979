use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{search_users, AdminUser, Role};
use crate::staff_actor::{StaffAction, StaffActionResult, StaffError};

/// Client for interacting with the staff actor.
#[derive(Clone)]
pub struct StaffClient {
    inner: ResourceClient<AdminUser>,
}

impl_basic_client!(StaffClient, AdminUser, StaffError, user);

impl StaffClient {
    /// Returns the role held before the change.
    #[instrument(skip(self))]
    pub async fn set_role(&self, id: String, role: Role) -> Result<Role, StaffError> {
        debug!("Sending request");
        match self.inner.perform_action(id, StaffAction::SetRole(role)).await {
            Ok(StaffActionResult::SetRole(previous)) => Ok(previous),
            Err(e) => Err(e.into()),
        }
    }

    /// Case-insensitive search, sorted by name.
    #[instrument(skip(self))]
    pub async fn search_users(&self, query: String) -> Result<Vec<AdminUser>, StaffError> {
        let users = self.list_users().await?;
        Ok(search_users(&users, &query))
    }
}

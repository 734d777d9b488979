use super::actions::{StaffAction, StaffActionResult};
use crate::actor_framework::Entity;
use crate::domain::{AdminUser, UserCreate, UserPatch};

impl Entity for AdminUser {
    type Id = String;
    type CreateParams = UserCreate;
    type Patch = UserPatch;
    type Action = StaffAction;
    type ActionResult = StaffActionResult;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new account. A blank name is rejected.
    fn from_create_params(id: String, params: UserCreate) -> Result<Self, String> {
        let name = params.name.trim();
        if name.is_empty() {
            return Err("name required".to_string());
        }
        Ok(Self {
            id,
            name: name.to_string(),
            phone: params.phone,
            email: params.email,
            role: params.role,
        })
    }

    /// # Fields Updated
    /// - `name`: must stay non-blank
    /// - `phone`, `email`: `Some(None)` clears the field
    /// - `role`
    fn on_update(&mut self, patch: UserPatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            let name = name.trim();
            if name.is_empty() {
                return Err("name required".to_string());
            }
            self.name = name.to_string();
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: StaffAction) -> Result<StaffActionResult, String> {
        match action {
            StaffAction::SetRole(role) => {
                let previous = std::mem::replace(&mut self.role, role);
                Ok(StaffActionResult::SetRole(previous))
            }
        }
    }
}

use super::actions::{TruckAction, TruckActionResult};
use crate::actor_framework::Entity;
use crate::domain::{Truck, TruckCreate, TruckPatch};

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl Entity for Truck {
    type Id = String;
    type CreateParams = TruckCreate;
    type Patch = TruckPatch;
    type Action = TruckAction;
    type ActionResult = TruckActionResult;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new Truck. Non-finite coordinates are dropped.
    fn from_create_params(id: String, params: TruckCreate) -> Result<Self, String> {
        let name = params.name.trim();
        if name.is_empty() {
            return Err("name required".to_string());
        }
        Ok(Self {
            id,
            name: name.to_string(),
            city: params.city,
            active: params.active,
            note: params.note,
            lat: finite(params.lat),
            lng: finite(params.lng),
        })
    }

    fn on_update(&mut self, patch: TruckPatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            let name = name.trim();
            if name.is_empty() {
                return Err("name required".to_string());
            }
            self.name = name.to_string();
        }
        if let Some(city) = patch.city {
            self.city = city;
        }
        if let Some(note) = patch.note {
            self.note = note;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        if let Some(lat) = patch.lat {
            self.lat = finite(lat);
        }
        if let Some(lng) = patch.lng {
            self.lng = finite(lng);
        }
        Ok(())
    }

    fn handle_action(&mut self, action: TruckAction) -> Result<TruckActionResult, String> {
        match action {
            TruckAction::ToggleActive => {
                self.active = !self.active;
                Ok(TruckActionResult::ToggleActive(self.active))
            }
            TruckAction::SetActive(active) => {
                self.active = active;
                Ok(TruckActionResult::SetActive(active))
            }
        }
    }
}

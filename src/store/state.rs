use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::{default_menu, Cart, CartItem, Order, Product};
use crate::persistence::{keys, Persistence};

/// Current layout of the persisted state document.
pub const SCHEMA_VERSION: u32 = 2;

/// Everything the store owns. Serialized in full after each mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub city: Option<String>,
    /// Chosen pickup time.
    pub slot: Option<DateTime<Utc>>,
    pub cart: Cart,
    /// Newest first.
    pub orders: Vec<Order>,
    pub products: Vec<Product>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            city: None,
            slot: None,
            cart: Cart::default(),
            orders: Vec::new(),
            products: default_menu(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    schema_version: u32,
    state: &'a AppState,
}

impl AppState {
    pub fn cart_count(&self) -> i64 {
        self.cart.count()
    }

    pub fn cart_total(&self) -> f64 {
        self.cart.total()
    }

    pub fn order(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn order_mut(&mut self, id: &str) -> Option<&mut Order> {
        self.orders.iter_mut().find(|o| o.id == id)
    }

    /// Loads the persisted state, or a fresh state with the default menu.
    pub fn load(persistence: &Persistence) -> Self {
        match persistence.load_value(keys::APP_STATE) {
            Some(value) => Self::migrate(value),
            None => {
                debug!("No persisted state, starting fresh");
                Self::default()
            }
        }
    }

    pub fn save(&self, persistence: &Persistence) {
        let envelope = Envelope { schema_version: SCHEMA_VERSION, state: self };
        persistence.save(keys::APP_STATE, &envelope);
    }

    /// Rebuilds state from any known document layout.
    ///
    /// Version 1 documents are the bare state object (no products, French
    /// status labels). Fields are decoded one by one: a missing or malformed
    /// field takes its default and a malformed order or cart line is dropped.
    pub fn migrate(value: Value) -> Self {
        let (version, mut body) = split_envelope(value);
        if version > SCHEMA_VERSION {
            warn!(version, "Persisted state is newer than this build, reading what is understood");
        }

        let city = take_field::<String>(&mut body, "city").filter(|c| !c.is_empty());
        let slot = take_field::<DateTime<Utc>>(&mut body, "slot");
        let cart = Cart::from_items(take_list::<CartItem>(&mut body, "cart").unwrap_or_default());
        let orders = take_list::<Order>(&mut body, "orders").unwrap_or_default();
        let products = take_list::<Product>(&mut body, "products").unwrap_or_else(default_menu);

        if version < SCHEMA_VERSION {
            info!(from = version, to = SCHEMA_VERSION, orders = orders.len(), "Migrated persisted state");
        }
        Self { city, slot, cart, orders, products }
    }
}

fn split_envelope(value: Value) -> (u32, Value) {
    match value {
        Value::Object(mut map) if map.contains_key("schemaVersion") && map.contains_key("state") => {
            let version = map
                .get("schemaVersion")
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(1);
            let state = map.remove("state").unwrap_or(Value::Null);
            (version, state)
        }
        other => (1, other),
    }
}

fn take_field<T: DeserializeOwned>(body: &mut Value, field: &str) -> Option<T> {
    let raw = body.get_mut(field)?.take();
    if raw.is_null() {
        return None;
    }
    match serde_json::from_value(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(field, error = %e, "Dropping malformed field");
            None
        }
    }
}

/// `None` when the field is absent or not an array.
fn take_list<T: DeserializeOwned>(body: &mut Value, field: &str) -> Option<Vec<T>> {
    let Value::Array(entries) = body.get_mut(field)?.take() else {
        warn!(field, "Expected a list, ignoring");
        return None;
    };
    let total = entries.len();
    let items: Vec<T> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();
    if items.len() < total {
        warn!(field, dropped = total - items.len(), "Dropped malformed entries");
    }
    Some(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderStatus;
    use serde_json::json;

    #[test]
    fn test_fresh_state_has_default_menu() {
        let state = AppState::load(&Persistence::in_memory());
        assert_eq!(state.products, default_menu());
        assert!(state.orders.is_empty());
        assert!(state.cart.is_empty());
    }

    #[test]
    fn test_saved_state_reloads_identically() {
        let persistence = Persistence::in_memory();
        let mut state = AppState::default();
        state.city = Some("Tavel".into());
        state.cart.add(Product::new("p-cola", "Cola", 2.5), 2);
        state.save(&persistence);

        let raw = persistence.load_value(keys::APP_STATE).unwrap();
        assert_eq!(raw["schemaVersion"], json!(SCHEMA_VERSION));
        assert_eq!(AppState::load(&persistence), state);
    }

    #[test]
    fn test_legacy_document_is_migrated() {
        let legacy = json!({
            "city": "Orange",
            "slot": "2026-10-12T10:15:00.000Z",
            "cart": [
                {"product": {"id": "p1", "title": "Burger", "price": 9.5}, "qty": 1},
                {"product": {"id": "p2"}, "qty": "two"}
            ],
            "orders": [
                {"id": "C123", "items": [], "total": 12.0, "date": "2026-10-11T12:00:00.000Z", "status": "Prête", "city": "Orange"},
                {"id": "C999", "status": "Bientôt"}
            ]
        });
        let state = AppState::migrate(legacy);

        assert_eq!(state.city.as_deref(), Some("Orange"));
        assert_eq!(state.slot.unwrap().to_rfc3339(), "2026-10-12T10:15:00+00:00");
        assert_eq!(state.cart.items().len(), 1);
        assert_eq!(state.orders.len(), 1);
        assert_eq!(state.orders[0].status, OrderStatus::Ready);
        assert_eq!(state.products, default_menu());
    }

    #[test]
    fn test_garbage_fields_take_defaults() {
        let state = AppState::migrate(json!({"city": 42, "slot": "midi", "cart": {}, "orders": null}));
        assert_eq!(state.city, None);
        assert_eq!(state.slot, None);
        assert!(state.cart.is_empty());
        assert!(state.orders.is_empty());

        assert_eq!(AppState::migrate(json!("nonsense")), AppState::default());
    }

    #[test]
    fn test_empty_product_list_is_kept() {
        let state = AppState::migrate(json!({"schemaVersion": 2, "state": {"products": []}}));
        assert!(state.products.is_empty());
    }
}

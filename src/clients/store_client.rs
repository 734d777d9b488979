use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, instrument};

use crate::domain::{Order, OrderStatus, Product, ProductCreate, ProductPatch};
use crate::store::{AppState, StoreError, StoreEvent, StoreRequest};

/// Client for the store service. Cheap to clone; every clone talks to the same store.
#[derive(Clone)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
    events: broadcast::Sender<StoreEvent>,
}

impl StoreClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>, events: broadcast::Sender<StoreEvent>) -> Self {
        Self { sender, events }
    }

    /// Change notifications, starting from the next change.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), StoreError> {
        debug!("Sending shutdown request");
        self.sender
            .send(StoreRequest::Shutdown)
            .await
            .map_err(|e| StoreError::ActorCommunicationError(e.to_string()))
    }
}

client_method!(StoreClient => fn snapshot() -> AppState as StoreRequest::GetSnapshot, Error = StoreError);
client_method!(StoreClient => fn set_city(city: Option<String>) -> () as StoreRequest::SetCity, Error = StoreError);
client_method!(StoreClient => fn set_slot(slot: Option<DateTime<Utc>>) -> () as StoreRequest::SetSlot, Error = StoreError);
client_method!(StoreClient => fn add_to_cart(product: Product, qty: i32) -> () as StoreRequest::AddToCart, Error = StoreError);
client_method!(StoreClient => fn set_qty(product_id: String, qty: i32) -> () as StoreRequest::SetQty, Error = StoreError);
client_method!(StoreClient => fn remove_from_cart(product_id: String) -> () as StoreRequest::RemoveFromCart, Error = StoreError);
client_method!(StoreClient => fn clear_cart() -> () as StoreRequest::ClearCart, Error = StoreError);
client_method!(StoreClient => fn place_order() -> Option<String> as StoreRequest::PlaceOrder, Error = StoreError);
client_method!(StoreClient => fn get_order(id: String) -> Option<Order> as StoreRequest::GetOrder, Error = StoreError);
client_method!(StoreClient => fn list_orders(status: Option<OrderStatus>) -> Vec<Order> as StoreRequest::ListOrders, Error = StoreError);
client_method!(StoreClient => fn update_order_status(id: String, status: OrderStatus) -> Order as StoreRequest::UpdateOrderStatus, Error = StoreError);
client_method!(StoreClient => fn remove_order(id: String) -> () as StoreRequest::RemoveOrder, Error = StoreError);
client_method!(StoreClient => fn add_product(product: ProductCreate) -> String as StoreRequest::AddProduct, Error = StoreError);
client_method!(StoreClient => fn update_product(id: String, patch: ProductPatch) -> Product as StoreRequest::UpdateProduct, Error = StoreError);
client_method!(StoreClient => fn remove_product(id: String) -> () as StoreRequest::RemoveProduct, Error = StoreError);
client_method!(StoreClient => fn list_products() -> Vec<Product> as StoreRequest::ListProducts, Error = StoreError);

// Test-only inspection of the deadline queue
#[cfg(test)]
client_method!(StoreClient => fn pending_transitions() -> usize as StoreRequest::GetPendingTransitions, Error = StoreError);

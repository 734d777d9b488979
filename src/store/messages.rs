use chrono::{DateTime, Utc};
use tokio::sync::oneshot;

use super::{AppState, StoreError};
use crate::domain::{Order, OrderStatus, Product, ProductCreate, ProductPatch};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Requests handled by the store service. Each variant carries its parameters
/// and a oneshot channel for the response.
#[derive(Debug)]
pub enum StoreRequest {
    GetSnapshot {
        respond_to: ServiceResponse<AppState, StoreError>,
    },
    SetCity {
        city: Option<String>,
        respond_to: ServiceResponse<(), StoreError>,
    },
    SetSlot {
        slot: Option<DateTime<Utc>>,
        respond_to: ServiceResponse<(), StoreError>,
    },
    AddToCart {
        product: Product,
        qty: i32,
        respond_to: ServiceResponse<(), StoreError>,
    },
    SetQty {
        product_id: String,
        qty: i32,
        respond_to: ServiceResponse<(), StoreError>,
    },
    RemoveFromCart {
        product_id: String,
        respond_to: ServiceResponse<(), StoreError>,
    },
    ClearCart {
        respond_to: ServiceResponse<(), StoreError>,
    },
    PlaceOrder {
        respond_to: ServiceResponse<Option<String>, StoreError>,
    },
    GetOrder {
        id: String,
        respond_to: ServiceResponse<Option<Order>, StoreError>,
    },
    ListOrders {
        status: Option<OrderStatus>,
        respond_to: ServiceResponse<Vec<Order>, StoreError>,
    },
    UpdateOrderStatus {
        id: String,
        status: OrderStatus,
        respond_to: ServiceResponse<Order, StoreError>,
    },
    RemoveOrder {
        id: String,
        respond_to: ServiceResponse<(), StoreError>,
    },
    AddProduct {
        product: ProductCreate,
        respond_to: ServiceResponse<String, StoreError>,
    },
    UpdateProduct {
        id: String,
        patch: ProductPatch,
        respond_to: ServiceResponse<Product, StoreError>,
    },
    RemoveProduct {
        id: String,
        respond_to: ServiceResponse<(), StoreError>,
    },
    ListProducts {
        respond_to: ServiceResponse<Vec<Product>, StoreError>,
    },
    Shutdown,
    #[cfg(test)]
    GetPendingTransitions {
        respond_to: ServiceResponse<usize, StoreError>,
    },
}

/// Broadcast to subscribers after the state changed.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    SelectionChanged,
    CartChanged,
    OrderPlaced { order_id: String },
    OrderStatusChanged { order_id: String, status: OrderStatus },
    OrderRemoved { order_id: String },
    CatalogChanged,
}

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::messages::{ServiceResponse, StoreEvent, StoreRequest};
use super::scheduler::StatusScheduler;
use super::{AppState, StoreError};
use crate::clients::StoreClient;
use crate::domain::{orders_by_status, Order, OrderStatus, Product, ProductCreate, ProductPatch};
use crate::notifier::Notifier;
use crate::persistence::Persistence;

const EVENT_CAPACITY: usize = 64;

/// Delays of the simulated status progression, counted from order placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionDelays {
    pub accept: Duration,
    pub ready: Duration,
}

impl TransitionDelays {
    /// Delay from placement to `status`, for the statuses reached by simulation.
    pub fn delay_to(&self, status: OrderStatus) -> Option<Duration> {
        match status {
            OrderStatus::Accepted => Some(self.accept),
            OrderStatus::Ready => Some(self.ready),
            OrderStatus::Pending | OrderStatus::Completed => None,
        }
    }
}

impl Default for TransitionDelays {
    fn default() -> Self {
        Self {
            accept: Duration::from_millis(4000),
            ready: Duration::from_millis(9000),
        }
    }
}

fn placed_notice() -> (&'static str, &'static str) {
    ("Commande envoyée", "Nous vous confirmerons bientôt.")
}

fn transition_notice(status: OrderStatus) -> Option<(&'static str, &'static str)> {
    match status {
        OrderStatus::Accepted => Some(("Commande acceptée", "Votre commande est en préparation.")),
        OrderStatus::Ready => Some(("Commande prête", "Votre commande est prête au food truck.")),
        OrderStatus::Pending | OrderStatus::Completed => None,
    }
}

/// Owner of the customer session and order history.
///
/// Requests are handled one at a time. Simulated status transitions live in a
/// deadline queue polled by the same loop, so they never race with requests.
pub struct StoreService {
    receiver: mpsc::Receiver<StoreRequest>,
    state: AppState,
    persistence: Persistence,
    notifier: Arc<dyn Notifier>,
    events: broadcast::Sender<StoreEvent>,
    scheduler: StatusScheduler,
    delays: TransitionDelays,
}

impl StoreService {
    pub fn new(
        buffer_size: usize,
        persistence: Persistence,
        notifier: Arc<dyn Notifier>,
        delays: TransitionDelays,
    ) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let service = Self {
            receiver,
            state: AppState::load(&persistence),
            persistence,
            notifier,
            events: events.clone(),
            scheduler: StatusScheduler::default(),
            delays,
        };
        let client = StoreClient::new(sender, events);
        (service, client)
    }

    /// Main actor loop. Waits for the next request or the next due transition,
    /// whichever comes first.
    #[instrument(name = "store_service", skip(self))]
    pub async fn run(mut self) {
        info!(
            orders = self.state.orders.len(),
            products = self.state.products.len(),
            "StoreService starting"
        );

        loop {
            let deadline = self.scheduler.next_deadline();
            tokio::select! {
                msg = self.receiver.recv() => {
                    let Some(msg) = msg else { break };
                    if let StoreRequest::Shutdown = msg {
                        info!("StoreService shutting down");
                        break;
                    }
                    self.handle(msg);
                }
                _ = wait_until(deadline) => self.fire_due_transitions(),
            }
        }

        if !self.scheduler.is_empty() {
            debug!(dropped = self.scheduler.len(), "Pending transitions dropped");
        }
        info!("StoreService stopped");
    }

    fn handle(&mut self, msg: StoreRequest) {
        match msg {
            StoreRequest::GetSnapshot { respond_to } => {
                let _ = respond_to.send(Ok(self.state.clone()));
            }
            StoreRequest::SetCity { city, respond_to } => self.handle_set_city(city, respond_to),
            StoreRequest::SetSlot { slot, respond_to } => self.handle_set_slot(slot, respond_to),
            StoreRequest::AddToCart { product, qty, respond_to } => {
                self.handle_add_to_cart(product, qty, respond_to)
            }
            StoreRequest::SetQty { product_id, qty, respond_to } => {
                self.handle_set_qty(product_id, qty, respond_to)
            }
            StoreRequest::RemoveFromCart { product_id, respond_to } => {
                self.handle_remove_from_cart(product_id, respond_to)
            }
            StoreRequest::ClearCart { respond_to } => self.handle_clear_cart(respond_to),
            StoreRequest::PlaceOrder { respond_to } => self.handle_place_order(respond_to),
            StoreRequest::GetOrder { id, respond_to } => {
                let _ = respond_to.send(Ok(self.state.order(&id).cloned()));
            }
            StoreRequest::ListOrders { status, respond_to } => {
                let orders = orders_by_status(&self.state.orders, status).into_iter().cloned().collect();
                let _ = respond_to.send(Ok(orders));
            }
            StoreRequest::UpdateOrderStatus { id, status, respond_to } => {
                self.handle_update_order_status(id, status, respond_to)
            }
            StoreRequest::RemoveOrder { id, respond_to } => self.handle_remove_order(id, respond_to),
            StoreRequest::AddProduct { product, respond_to } => self.handle_add_product(product, respond_to),
            StoreRequest::UpdateProduct { id, patch, respond_to } => {
                self.handle_update_product(id, patch, respond_to)
            }
            StoreRequest::RemoveProduct { id, respond_to } => self.handle_remove_product(id, respond_to),
            StoreRequest::ListProducts { respond_to } => {
                let _ = respond_to.send(Ok(self.state.products.clone()));
            }
            StoreRequest::Shutdown => {}
            #[cfg(test)]
            StoreRequest::GetPendingTransitions { respond_to } => {
                let _ = respond_to.send(Ok(self.scheduler.len()));
            }
        }
    }

    /// Persists the state and tells subscribers what changed.
    fn commit(&self, event: StoreEvent) {
        self.state.save(&self.persistence);
        let _ = self.events.send(event);
    }

    #[instrument(skip(self, respond_to))]
    fn handle_set_city(&mut self, city: Option<String>, respond_to: ServiceResponse<(), StoreError>) {
        self.state.city = city;
        self.commit(StoreEvent::SelectionChanged);
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_set_slot(&mut self, slot: Option<DateTime<Utc>>, respond_to: ServiceResponse<(), StoreError>) {
        self.state.slot = slot;
        self.commit(StoreEvent::SelectionChanged);
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(fields(product_id = %product.id), skip(self, product, respond_to))]
    fn handle_add_to_cart(&mut self, product: Product, qty: i32, respond_to: ServiceResponse<(), StoreError>) {
        self.state.cart.add(product, qty);
        debug!(cart_count = self.state.cart_count(), "Cart updated");
        self.commit(StoreEvent::CartChanged);
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_set_qty(&mut self, product_id: String, qty: i32, respond_to: ServiceResponse<(), StoreError>) {
        self.state.cart.set_qty(&product_id, qty);
        self.commit(StoreEvent::CartChanged);
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_remove_from_cart(&mut self, product_id: String, respond_to: ServiceResponse<(), StoreError>) {
        self.state.cart.remove(&product_id);
        self.commit(StoreEvent::CartChanged);
        let _ = respond_to.send(Ok(()));
    }

    /// Empties the cart and forgets the slot; the city is kept.
    #[instrument(skip(self, respond_to))]
    fn handle_clear_cart(&mut self, respond_to: ServiceResponse<(), StoreError>) {
        self.state.cart.clear();
        self.state.slot = None;
        self.commit(StoreEvent::CartChanged);
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_place_order(&mut self, respond_to: ServiceResponse<Option<String>, StoreError>) {
        if self.state.cart.is_empty() {
            debug!("Cart is empty, nothing to place");
            let _ = respond_to.send(Ok(None));
            return;
        }

        let id = format!("C-{}", Uuid::new_v4().simple());
        let order = Order::place(
            id.clone(),
            self.state.cart.take(),
            self.state.city.clone(),
            self.state.slot.take(),
            Utc::now(),
        );
        info!(order_id = %id, total = order.total, city = ?order.city, "Order placed");
        self.state.orders.insert(0, order);

        let placed_at = Instant::now();
        let mut status = OrderStatus::Pending;
        while let Some(next) = status.next_simulated() {
            if let Some(delay) = self.delays.delay_to(next) {
                self.scheduler.schedule(placed_at + delay, id.clone(), next);
            }
            status = next;
        }

        self.commit(StoreEvent::OrderPlaced { order_id: id.clone() });
        let (title, body) = placed_notice();
        self.notifier.notify(title, Some(body));
        let _ = respond_to.send(Ok(Some(id)));
    }

    /// Admin override: any status may be set, in any direction.
    #[instrument(skip(self, respond_to))]
    fn handle_update_order_status(
        &mut self,
        id: String,
        status: OrderStatus,
        respond_to: ServiceResponse<Order, StoreError>,
    ) {
        let Some(order) = self.state.order_mut(&id) else {
            error!("Order not found for status update");
            let _ = respond_to.send(Err(StoreError::OrderNotFound(id)));
            return;
        };
        order.status = status;
        let updated = order.clone();
        info!("Order status set");
        self.commit(StoreEvent::OrderStatusChanged { order_id: id, status });
        let _ = respond_to.send(Ok(updated));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_remove_order(&mut self, id: String, respond_to: ServiceResponse<(), StoreError>) {
        let before = self.state.orders.len();
        self.state.orders.retain(|o| o.id != id);
        if self.state.orders.len() == before {
            error!("Order not found for removal");
            let _ = respond_to.send(Err(StoreError::OrderNotFound(id)));
            return;
        }
        let cancelled = self.scheduler.cancel_order(&id);
        info!(cancelled, "Order removed");
        self.commit(StoreEvent::OrderRemoved { order_id: id });
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(fields(title = %params.title), skip(self, params, respond_to))]
    fn handle_add_product(&mut self, params: ProductCreate, respond_to: ServiceResponse<String, StoreError>) {
        if params.title.trim().is_empty() {
            let _ = respond_to.send(Err(StoreError::InvalidProduct("title required".into())));
            return;
        }
        if !is_valid_price(params.price) {
            let _ = respond_to.send(Err(StoreError::InvalidProduct(format!("price {}", params.price))));
            return;
        }
        let id = format!("P-{}", Uuid::new_v4().simple());
        self.state.products.push(Product {
            id: id.clone(),
            title: params.title,
            price: params.price,
            desc: params.desc,
            category: params.category,
        });
        info!(product_id = %id, "Product added");
        self.commit(StoreEvent::CatalogChanged);
        let _ = respond_to.send(Ok(id));
    }

    #[instrument(skip(self, patch, respond_to))]
    fn handle_update_product(
        &mut self,
        id: String,
        patch: ProductPatch,
        respond_to: ServiceResponse<Product, StoreError>,
    ) {
        if patch.price.is_some_and(|p| !is_valid_price(p)) {
            let _ = respond_to.send(Err(StoreError::InvalidProduct(format!("price {:?}", patch.price))));
            return;
        }
        let Some(product) = self.state.products.iter_mut().find(|p| p.id == id) else {
            let _ = respond_to.send(Err(StoreError::ProductNotFound(id)));
            return;
        };
        patch.apply(product);
        let updated = product.clone();
        info!("Product updated");
        self.commit(StoreEvent::CatalogChanged);
        let _ = respond_to.send(Ok(updated));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_remove_product(&mut self, id: String, respond_to: ServiceResponse<(), StoreError>) {
        let before = self.state.products.len();
        self.state.products.retain(|p| p.id != id);
        if self.state.products.len() == before {
            let _ = respond_to.send(Err(StoreError::ProductNotFound(id)));
            return;
        }
        info!("Product removed");
        self.commit(StoreEvent::CatalogChanged);
        let _ = respond_to.send(Ok(()));
    }

    /// Applies every transition that is due. A transition only moves an order
    /// forward, and one for a removed order is ignored.
    fn fire_due_transitions(&mut self) {
        for transition in self.scheduler.pop_due(Instant::now()) {
            let Some(order) = self.state.order_mut(&transition.order_id) else {
                warn!(order_id = %transition.order_id, to = %transition.to, "Transition for unknown order ignored");
                continue;
            };
            if order.status >= transition.to {
                debug!(order_id = %order.id, status = %order.status, to = %transition.to, "Order already past transition");
                continue;
            }
            order.status = transition.to;
            info!(order_id = %transition.order_id, status = %transition.to, "Order progressed");
            self.commit(StoreEvent::OrderStatusChanged {
                order_id: transition.order_id,
                status: transition.to,
            });
            if let Some((title, body)) = transition_notice(transition.to) {
                self.notifier.notify(title, Some(body));
            }
        }
    }
}

fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::default_menu;
    use crate::notifier::RecordingNotifier;
    use crate::persistence::keys;

    fn spawn_store() -> (StoreClient, Arc<RecordingNotifier>, Persistence) {
        let persistence = Persistence::in_memory();
        let notifier = Arc::new(RecordingNotifier::default());
        let (service, client) =
            StoreService::new(16, persistence.clone(), notifier.clone(), TransitionDelays::default());
        tokio::spawn(service.run());
        (client, notifier, persistence)
    }

    fn burger() -> Product {
        default_menu().remove(0)
    }

    #[tokio::test(start_paused = true)]
    async fn test_cart_quantity_overflow_keeps_store_alive() {
        let (client, _, _) = spawn_store();
        client.add_to_cart(burger(), i32::MAX).await.unwrap();
        client.add_to_cart(burger(), 1).await.unwrap();

        let state = client.snapshot().await.unwrap();
        assert_eq!(state.cart.items()[0].qty, i32::MAX);
        assert_eq!(state.cart_count(), i64::from(i32::MAX));
    }

    #[test]
    fn test_delays_follow_simulated_statuses() {
        let delays = TransitionDelays::default();
        assert_eq!(delays.delay_to(OrderStatus::Accepted), Some(Duration::from_millis(4000)));
        assert_eq!(delays.delay_to(OrderStatus::Ready), Some(Duration::from_millis(9000)));
        assert_eq!(delays.delay_to(OrderStatus::Completed), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_place_order_on_empty_cart_is_noop() {
        let (client, notifier, _) = spawn_store();
        assert_eq!(client.place_order().await.unwrap(), None);
        assert!(client.list_orders(None).await.unwrap().is_empty());
        assert_eq!(client.pending_transitions().await.unwrap(), 0);
        assert!(notifier.titles().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_place_order_snapshots_cart() {
        let (client, notifier, _) = spawn_store();
        client.set_city(Some("Orange".into())).await.unwrap();
        client.set_slot(Some(Utc::now())).await.unwrap();
        client.add_to_cart(burger(), 2).await.unwrap();
        client.add_to_cart(burger(), 3).await.unwrap();

        let before = client.snapshot().await.unwrap();
        assert_eq!(before.cart_count(), 5);
        let expected_total = before.cart_total();

        let id = client.place_order().await.unwrap().unwrap();
        let after = client.snapshot().await.unwrap();
        assert!(after.cart.is_empty());
        assert_eq!(after.slot, None);
        assert_eq!(after.city.as_deref(), Some("Orange"));
        assert_eq!(after.orders.len(), 1);

        let order = &after.orders[0];
        assert_eq!(order.id, id);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, expected_total);
        assert_eq!(order.city.as_deref(), Some("Orange"));
        assert!(order.slot.is_some());
        assert_eq!(notifier.titles(), vec!["Commande envoyée"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_progression() {
        let (client, notifier, _) = spawn_store();
        client.add_to_cart(burger(), 1).await.unwrap();
        let id = client.place_order().await.unwrap().unwrap();

        tokio::time::sleep(Duration::from_millis(3900)).await;
        assert_eq!(client.get_order(id.clone()).await.unwrap().unwrap().status, OrderStatus::Pending);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(client.get_order(id.clone()).await.unwrap().unwrap().status, OrderStatus::Accepted);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(client.get_order(id.clone()).await.unwrap().unwrap().status, OrderStatus::Ready);
        assert_eq!(client.pending_transitions().await.unwrap(), 0);
        assert_eq!(notifier.titles(), vec!["Commande envoyée", "Commande acceptée", "Commande prête"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_removed_order_cancels_transitions() {
        let (client, notifier, _) = spawn_store();
        client.add_to_cart(burger(), 1).await.unwrap();
        let id = client.place_order().await.unwrap().unwrap();
        assert_eq!(client.pending_transitions().await.unwrap(), 2);

        client.remove_order(id.clone()).await.unwrap();
        assert_eq!(client.pending_transitions().await.unwrap(), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(client.get_order(id.clone()).await.unwrap().is_none());
        assert_eq!(notifier.titles(), vec!["Commande envoyée"]);
        assert_eq!(client.remove_order(id.clone()).await, Err(StoreError::OrderNotFound(id)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulation_never_moves_order_backwards() {
        let (client, notifier, _) = spawn_store();
        client.add_to_cart(burger(), 1).await.unwrap();
        let id = client.place_order().await.unwrap().unwrap();

        client.update_order_status(id.clone(), OrderStatus::Completed).await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(client.get_order(id).await.unwrap().unwrap().status, OrderStatus::Completed);
        assert_eq!(notifier.titles(), vec!["Commande envoyée"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cart_operations() {
        let (client, _, _) = spawn_store();
        let cola = default_menu().into_iter().find(|p| p.id == "p-cola").unwrap();
        client.set_city(Some("Tavel".into())).await.unwrap();
        client.set_slot(Some(Utc::now())).await.unwrap();
        client.add_to_cart(burger(), 2).await.unwrap();
        client.add_to_cart(cola.clone(), 1).await.unwrap();

        client.set_qty("p-classic".into(), 0).await.unwrap();
        let state = client.snapshot().await.unwrap();
        assert_eq!(state.cart.items().len(), 1);
        assert_eq!(state.cart_total(), 2.5);

        client.remove_from_cart("p-cola".into()).await.unwrap();
        client.add_to_cart(cola, 4).await.unwrap();
        client.clear_cart().await.unwrap();
        let state = client.snapshot().await.unwrap();
        assert!(state.cart.is_empty());
        assert_eq!(state.slot, None);
        assert_eq!(state.city.as_deref(), Some("Tavel"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_catalog_admin() {
        let (client, _, _) = spawn_store();
        let invalid = ProductCreate { title: "Frites".into(), price: f64::NAN, desc: None, category: None };
        assert!(matches!(client.add_product(invalid).await, Err(StoreError::InvalidProduct(_))));

        let params = ProductCreate { title: "Frites".into(), price: 3.0, desc: None, category: Some("Autres".into()) };
        let id = client.add_product(params).await.unwrap();
        let patch = ProductPatch { price: Some(3.5), ..Default::default() };
        let updated = client.update_product(id.clone(), patch).await.unwrap();
        assert_eq!(updated.price, 3.5);
        assert_eq!(client.list_products().await.unwrap().len(), default_menu().len() + 1);

        client.remove_product(id.clone()).await.unwrap();
        assert_eq!(client.remove_product(id.clone()).await, Err(StoreError::ProductNotFound(id)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_product_edit_leaves_order_snapshot_alone() {
        let (client, _, _) = spawn_store();
        client.add_to_cart(burger(), 1).await.unwrap();
        let id = client.place_order().await.unwrap().unwrap();

        let patch = ProductPatch { price: Some(99.0), ..Default::default() };
        client.update_product("p-classic".into(), patch).await.unwrap();

        let order = client.get_order(id).await.unwrap().unwrap();
        assert_eq!(order.items[0].product.price, 9.5);
        assert_eq!(order.total, 9.5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_survives_restart_without_timers() {
        let (client, _, persistence) = spawn_store();
        client.add_to_cart(burger(), 1).await.unwrap();
        let id = client.place_order().await.unwrap().unwrap();
        client.shutdown().await.unwrap();
        assert!(persistence.load_value(keys::APP_STATE).is_some());

        let notifier = Arc::new(RecordingNotifier::default());
        let (service, client) = StoreService::new(16, persistence, notifier, TransitionDelays::default());
        tokio::spawn(service.run());

        let order = client.get_order(id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(client.pending_transitions().await.unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_changes() {
        let (client, _, _) = spawn_store();
        let mut events = client.subscribe();

        client.add_to_cart(burger(), 1).await.unwrap();
        let id = client.place_order().await.unwrap().unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(events.recv().await.unwrap(), StoreEvent::CartChanged);
        assert_eq!(events.recv().await.unwrap(), StoreEvent::OrderPlaced { order_id: id.clone() });
        assert_eq!(
            events.recv().await.unwrap(),
            StoreEvent::OrderStatusChanged { order_id: id, status: OrderStatus::Accepted }
        );
    }
}

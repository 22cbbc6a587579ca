use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, instrument};
use uuid::Uuid;

use models::order::{self, CreateOrderInput, Order};

use crate::errors::ServiceError;
use crate::observability::ORDERS_CREATED_TOTAL;
use crate::storage::record_store::RecordStore;

pub const ORDER_ID_PREFIX: &str = "ORDER-";

pub fn new_order_id() -> String {
    format!("{ORDER_ID_PREFIX}{}", Uuid::new_v4())
}

/// Order placement and lookup over the orders collection.
/// `userId` is stored as given; it is not checked against the users collection.
pub struct OrderService {
    store: RecordStore,
    write_lock: Mutex<()>,
}

impl OrderService {
    pub fn new(store: RecordStore) -> Self {
        Self { store, write_lock: Mutex::new(()) }
    }

    #[instrument(skip(self, input), fields(user_id = ?input.user_id, items = input.items.len()))]
    pub async fn create(&self, input: CreateOrderInput) -> Result<Order, ServiceError> {
        input.validate()?;
        let order = input.into_order(new_order_id(), Utc::now())?;

        let _guard = self.write_lock.lock().await;
        let mut orders = self.store.load::<Order>().await;
        orders.records.push(order.clone());
        self.store.save(&orders).await?;

        ORDERS_CREATED_TOTAL.inc();
        info!(order_id = %order.id, user_id = %order.user_id, total = order.total, "order_created");
        Ok(order)
    }

    /// Orders newest first, optionally only those of `user_id`.
    pub async fn list(&self, user_id: Option<&str>) -> Vec<Order> {
        let orders = self.store.read_all::<Order>().await;
        order::select_for_user(orders, user_id)
    }

    pub async fn get(&self, id: &str) -> Result<Order, ServiceError> {
        let orders = self.store.read_all::<Order>().await;
        orders
            .into_iter()
            .find(|o| o.id == id)
            .ok_or_else(|| ServiceError::not_found("order"))
    }
}

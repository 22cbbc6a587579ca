use std::sync::Arc;

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use models::order::{self, CreateOrderInput, Order};
use models::user::{self, RegisterUserInput, User};

use configs::ClientConfig;

use crate::errors::ClientError;
use crate::local::{FileKvStore, KeyValueStore};
use crate::policy::{ResolutionPolicy, Tier};
use crate::remote::{HttpBackend, RemoteBackend};

const USERS_KEY: &str = "users";
const ORDERS_KEY: &str = "orders";

/// A value together with the tier that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub tier: Tier,
}

impl<T> Resolved<T> {
    fn new(value: T, tier: Tier) -> Self {
        Self { value, tier }
    }
}

fn local_id(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}_{}", Utc::now().timestamp_millis(), &suffix[..8])
}

/// Client-side copy of users and orders with remote-then-local resolution.
pub struct OrderMirror {
    remote: Arc<dyn RemoteBackend>,
    kv: Arc<dyn KeyValueStore>,
    policy: ResolutionPolicy,
    users: RwLock<Vec<User>>,
    orders: RwLock<Vec<Order>>,
}

async fn load_collection<T: DeserializeOwned>(kv: &dyn KeyValueStore, key: &str) -> Vec<T> {
    let Some(raw) = kv.get_item(key).await else {
        return Vec::new();
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(key, error = %e, "local collection unreadable, starting empty");
        Vec::new()
    })
}

async fn save_collection<T: Serialize>(kv: &dyn KeyValueStore, key: &str, records: &[T]) -> Result<(), ClientError> {
    let raw = serde_json::to_string(records)?;
    kv.set_item(key, raw).await
}

impl OrderMirror {
    /// Build a mirror and load the local copies of both collections.
    pub async fn load(
        remote: Arc<dyn RemoteBackend>,
        kv: Arc<dyn KeyValueStore>,
        policy: ResolutionPolicy,
    ) -> Self {
        let users = load_collection::<User>(kv.as_ref(), USERS_KEY).await;
        let orders = load_collection::<Order>(kv.as_ref(), ORDERS_KEY).await;
        debug!(users = users.len(), orders = orders.len(), "local mirror loaded");
        Self {
            remote,
            kv,
            policy,
            users: RwLock::new(users),
            orders: RwLock::new(orders),
        }
    }

    /// HTTP backend at `backend_url`, file store at `local_store_path`, tiers from `use_backend`.
    pub async fn from_config(cfg: &ClientConfig) -> Result<Self, ClientError> {
        let remote = Arc::new(HttpBackend::from_config(cfg)?);
        let kv = Arc::new(FileKvStore::from_config(cfg).await?);
        Ok(Self::load(remote, kv, ResolutionPolicy::from_config(cfg)).await)
    }

    pub fn policy(&self) -> &ResolutionPolicy {
        &self.policy
    }

    /// Snapshot of the local user copy.
    pub async fn local_users(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    /// Snapshot of the local order copy, in insertion order.
    pub async fn local_orders(&self) -> Vec<Order> {
        self.orders.read().await.clone()
    }

    fn remote_failed(op: &'static str, e: &ClientError) {
        debug!(op, error = %e, "remote tier failed, trying next tier");
    }

    pub async fn register_user(&self, input: RegisterUserInput) -> Result<Resolved<User>, ClientError> {
        for tier in self.policy.tiers() {
            match tier {
                Tier::Remote => match self.remote.register_user(&input).await {
                    Ok(user) => {
                        if self.policy.caches_remote_creates() {
                            self.cache_user(user.clone()).await?;
                        }
                        return Ok(Resolved::new(user, Tier::Remote));
                    }
                    Err(e) => Self::remote_failed("register_user", &e),
                },
                Tier::Local => {
                    let user = self.register_local(input).await?;
                    return Ok(Resolved::new(user, Tier::Local));
                }
            }
        }
        Err(ClientError::Unresolved("register_user"))
    }

    pub async fn list_users(&self) -> Result<Resolved<Vec<User>>, ClientError> {
        for tier in self.policy.tiers() {
            match tier {
                Tier::Remote => match self.remote.list_users().await {
                    Ok(users) => return Ok(Resolved::new(users, Tier::Remote)),
                    Err(e) => Self::remote_failed("list_users", &e),
                },
                Tier::Local => return Ok(Resolved::new(self.local_users().await, Tier::Local)),
            }
        }
        Err(ClientError::Unresolved("list_users"))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Resolved<Option<User>>, ClientError> {
        let listed = self.list_users().await?;
        let found = user::find_by_email(&listed.value, email).cloned();
        Ok(Resolved::new(found, listed.tier))
    }

    pub async fn create_order(&self, input: CreateOrderInput) -> Result<Resolved<Order>, ClientError> {
        for tier in self.policy.tiers() {
            match tier {
                Tier::Remote => match self.remote.create_order(&input).await {
                    Ok(order) => {
                        if self.policy.caches_remote_creates() {
                            self.cache_order(order.clone()).await?;
                        }
                        return Ok(Resolved::new(order, Tier::Remote));
                    }
                    Err(e) => Self::remote_failed("create_order", &e),
                },
                Tier::Local => {
                    let order = self.create_local(input).await?;
                    return Ok(Resolved::new(order, Tier::Local));
                }
            }
        }
        Err(ClientError::Unresolved("create_order"))
    }

    /// Orders of `user_id`, newest first.
    pub async fn orders_for_user(&self, user_id: &str) -> Result<Resolved<Vec<Order>>, ClientError> {
        for tier in self.policy.tiers() {
            match tier {
                Tier::Remote => match self.remote.orders_for_user(user_id).await {
                    Ok(orders) => return Ok(Resolved::new(orders, Tier::Remote)),
                    Err(e) => Self::remote_failed("orders_for_user", &e),
                },
                Tier::Local => {
                    let selected = order::select_for_user(self.local_orders().await, Some(user_id));
                    return Ok(Resolved::new(selected, Tier::Local));
                }
            }
        }
        Err(ClientError::Unresolved("orders_for_user"))
    }

    /// A remote 404 is a failed tier like any other non-success, so the local copy is consulted.
    pub async fn get_order(&self, id: &str) -> Result<Resolved<Option<Order>>, ClientError> {
        for tier in self.policy.tiers() {
            match tier {
                Tier::Remote => match self.remote.get_order(id).await {
                    Ok(order) => return Ok(Resolved::new(Some(order), Tier::Remote)),
                    Err(e) => Self::remote_failed("get_order", &e),
                },
                Tier::Local => {
                    let found = self.orders.read().await.iter().find(|o| o.id == id).cloned();
                    return Ok(Resolved::new(found, Tier::Local));
                }
            }
        }
        Err(ClientError::Unresolved("get_order"))
    }

    async fn register_local(&self, input: RegisterUserInput) -> Result<User, ClientError> {
        let mut users = self.users.write().await;
        let (user, outcome) = user::upsert_by_email(&mut users, input, || local_id("user"), Utc::now())?;
        save_collection(self.kv.as_ref(), USERS_KEY, users.as_slice()).await?;
        debug!(user_id = %user.id, ?outcome, "user stored locally");
        Ok(user)
    }

    async fn create_local(&self, input: CreateOrderInput) -> Result<Order, ClientError> {
        let order = input.into_order(local_id("order"), Utc::now())?;
        let mut orders = self.orders.write().await;
        orders.push(order.clone());
        save_collection(self.kv.as_ref(), ORDERS_KEY, orders.as_slice()).await?;
        debug!(order_id = %order.id, "order stored locally");
        Ok(order)
    }

    // A re-registration returns the same remote user, so replace rather than duplicate.
    async fn cache_user(&self, user: User) -> Result<(), ClientError> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user,
            None => users.push(user),
        }
        save_collection(self.kv.as_ref(), USERS_KEY, users.as_slice()).await
    }

    async fn cache_order(&self, order: Order) -> Result<(), ClientError> {
        let mut orders = self.orders.write().await;
        if orders.iter().any(|o| o.id == order.id) {
            return Ok(());
        }
        orders.push(order);
        save_collection(self.kv.as_ref(), ORDERS_KEY, orders.as_slice()).await
    }
}

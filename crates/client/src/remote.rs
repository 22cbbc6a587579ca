use std::time::Duration;

use async_trait::async_trait;
use configs::ClientConfig;
use models::{CreateOrderInput, Order, RegisterUserInput, User};
use reqwest::{Client, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize};

use crate::errors::ClientError;

/// The remote tier: the storefront backend's REST API.
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    async fn register_user(&self, input: &RegisterUserInput) -> Result<User, ClientError>;
    async fn list_users(&self) -> Result<Vec<User>, ClientError>;
    async fn create_order(&self, input: &CreateOrderInput) -> Result<Order, ClientError>;
    async fn orders_for_user(&self, user_id: &str) -> Result<Vec<Order>, ClientError>;
    async fn get_order(&self, id: &str) -> Result<Order, ClientError>;
}

#[derive(Deserialize)]
struct UserSaved {
    success: bool,
    user: User,
}

#[derive(Deserialize)]
struct UserList {
    users: Vec<User>,
}

#[derive(Deserialize)]
struct OrderSaved {
    success: bool,
    order: Order,
}

#[derive(Deserialize)]
struct OrderList {
    orders: Vec<Order>,
}

#[derive(Deserialize)]
struct OrderBody {
    order: Order,
}

/// [`RemoteBackend`] over HTTP/JSON with `reqwest`.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Remote(e.to_string()))?;
        let base_url = base_url.into();
        let base_url = Url::parse(&base_url)
            .map_err(|e| ClientError::Remote(format!("invalid backend url {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Remote(format!("invalid backend url {base_url}")));
        }
        Ok(Self { client, base_url })
    }

    pub fn from_config(cfg: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(cfg.backend_url.clone(), Duration::from_secs(cfg.request_timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// `base_url` plus `segments`, each percent-encoded as a single path segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let resp = request.send().await.map_err(|e| ClientError::Remote(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Remote(format!("HTTP {status}")));
        }
        resp.json::<T>().await.map_err(|e| ClientError::Remote(e.to_string()))
    }
}

#[async_trait]
impl RemoteBackend for HttpBackend {
    async fn register_user(&self, input: &RegisterUserInput) -> Result<User, ClientError> {
        let saved: UserSaved = Self::fetch(self.client.post(self.url(&["api", "users"])).json(input)).await?;
        if !saved.success {
            return Err(ClientError::Remote("registration not acknowledged".into()));
        }
        Ok(saved.user)
    }

    async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        let list: UserList = Self::fetch(self.client.get(self.url(&["api", "users"]))).await?;
        Ok(list.users)
    }

    async fn create_order(&self, input: &CreateOrderInput) -> Result<Order, ClientError> {
        let saved: OrderSaved = Self::fetch(self.client.post(self.url(&["api", "orders"])).json(input)).await?;
        if !saved.success {
            return Err(ClientError::Remote("order not acknowledged".into()));
        }
        Ok(saved.order)
    }

    async fn orders_for_user(&self, user_id: &str) -> Result<Vec<Order>, ClientError> {
        let request = self.client.get(self.url(&["api", "orders"])).query(&[("userId", user_id)]);
        let list: OrderList = Self::fetch(request).await?;
        Ok(list.orders)
    }

    async fn get_order(&self, id: &str) -> Result<Order, ClientError> {
        let body: OrderBody = Self::fetch(self.client.get(self.url(&["api", "orders", id]))).await?;
        Ok(body.order)
    }
}

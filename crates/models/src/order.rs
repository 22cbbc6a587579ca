use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::ModelError;

pub const DEFAULT_PAYMENT_STATUS: &str = "pending";

/// One cart line, kept exactly as the caller sent it. Storefront carts carry
/// `price` and `quantity` next to product fields (id, name, image, size...),
/// but nothing here interprets or enforces them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItem(Value);

impl LineItem {
    pub fn new(price: f64, quantity: u32) -> Self {
        Self(json!({ "price": price, "quantity": quantity }))
    }

    /// Add a product field. No-op for lines that are not JSON objects.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        if let Value::Object(fields) = &mut self.0 {
            fields.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for LineItem {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A placed order. Amounts are stored exactly as the caller supplied them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub shipping_cost: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_payment_status")]
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
}

fn default_payment_status() -> String {
    DEFAULT_PAYMENT_STATUS.to_string()
}

/// Body of an order creation request. `userId` and a non-empty `items` are required.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub shipping_cost: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
}

impl CreateOrderInput {
    pub fn new(user_id: impl Into<String>, items: Vec<LineItem>) -> Self {
        Self { user_id: Some(user_id.into()), items, ..Default::default() }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        let has_user = self.user_id.as_deref().is_some_and(|u| !u.trim().is_empty());
        if !has_user {
            return Err(ModelError::Validation("userId is required".into()));
        }
        if self.items.is_empty() {
            return Err(ModelError::Validation("items are required".into()));
        }
        Ok(())
    }

    pub fn into_order(self, id: String, created_at: DateTime<Utc>) -> Result<Order, ModelError> {
        self.validate()?;
        Ok(Order {
            id,
            user_id: self.user_id.unwrap_or_default().trim().to_string(),
            items: self.items,
            subtotal: self.subtotal,
            discount: self.discount,
            shipping_cost: self.shipping_cost,
            total: self.total,
            shipping_address: self.shipping_address,
            notes: self.notes,
            payment_status: self.payment_status.unwrap_or_else(default_payment_status),
            created_at,
        })
    }
}

/// Most recent first. The sort is stable, so equal timestamps keep insertion order.
pub fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Orders for `user_id` (all orders when `None`), newest first.
pub fn select_for_user(orders: Vec<Order>, user_id: Option<&str>) -> Vec<Order> {
    let mut selected: Vec<Order> = match user_id {
        Some(uid) => orders.into_iter().filter(|o| o.user_id == uid).collect(),
        None => orders,
    };
    sort_newest_first(&mut selected);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn order(id: &str, user: &str, at: DateTime<Utc>) -> Order {
        CreateOrderInput::new(user, vec![LineItem::new(10.0, 1)])
            .into_order(id.into(), at)
            .unwrap()
    }

    #[test]
    fn validation_rejects_missing_user_and_items() {
        let missing_user = CreateOrderInput { items: vec![LineItem::new(1.0, 1)], ..Default::default() };
        assert!(missing_user.validate().is_err());
        assert!(CreateOrderInput::new("  ", vec![LineItem::new(1.0, 1)]).validate().is_err());
        assert!(CreateOrderInput::new("u1", vec![]).validate().is_err());
        assert!(CreateOrderInput::new("u1", vec![LineItem::new(1.0, 1)]).validate().is_ok());
    }

    #[test]
    fn defaults_when_fields_absent() {
        let input: CreateOrderInput =
            serde_json::from_str(r#"{"userId":"u1","items":[{"price":5,"quantity":2,"name":"Shirt"}]}"#).unwrap();
        let order = input.into_order("ORDER-1".into(), Utc::now()).unwrap();
        assert_eq!(order.payment_status, "pending");
        assert_eq!(order.total, 0.0);
        assert_eq!(order.items[0].get("name"), Some(&json!("Shirt")));
        assert_eq!(order.items[0].get("quantity"), Some(&json!(2)));

        let missing_items: CreateOrderInput = serde_json::from_str(r#"{"userId":"u1"}"#).unwrap();
        assert!(missing_items.validate().is_err());
    }

    #[test]
    fn line_items_are_stored_verbatim() {
        let body = r#"{"userId":"u1","items":[{"sku":"X1"},{"price":"25000","quantity":1.5},"gift card"]}"#;
        let input: CreateOrderInput = serde_json::from_str(body).unwrap();
        let order = input.into_order("ORDER-1".into(), Utc::now()).unwrap();
        let items = serde_json::to_value(&order.items).unwrap();
        assert_eq!(items, json!([{"sku":"X1"},{"price":"25000","quantity":1.5},"gift card"]));
    }

    #[test]
    fn newest_first_is_stable() {
        let t0 = Utc::now();
        let orders = vec![
            order("a", "u1", t0),
            order("b", "u2", t0 + Duration::seconds(5)),
            order("c", "u1", t0 + Duration::seconds(5)),
            order("d", "u1", t0),
        ];
        let ids: Vec<_> = select_for_user(orders.clone(), None).into_iter().map(|o| o.id).collect();
        assert_eq!(ids, ["b", "c", "a", "d"]);
        let ids: Vec<_> = select_for_user(orders, Some("u1")).into_iter().map(|o| o.id).collect();
        assert_eq!(ids, ["c", "a", "d"]);
    }
}

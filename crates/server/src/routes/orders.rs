use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use models::{CreateOrderInput, Order};

use crate::errors::ApiError;
use crate::routes::ServerState;

#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderSaved {
    pub success: bool,
    pub order: Order,
}

#[derive(Debug, Serialize)]
pub struct OrderList {
    pub orders: Vec<Order>,
}

#[derive(Debug, Serialize)]
pub struct OrderBody {
    pub order: Order,
}

#[utoipa::path(post, path = "/api/orders", tag = "orders", request_body = crate::openapi::CreateOrderDoc, responses((status = 200, description = "Order stored", body = crate::openapi::OrderSavedDoc), (status = 400, description = "userId missing or items empty")))]
pub async fn create_order(
    State(state): State<ServerState>,
    payload: Result<Json<CreateOrderInput>, JsonRejection>,
) -> Result<Json<OrderSaved>, ApiError> {
    let Json(input) = payload?;
    let order = state.orders.create(input).await?;
    Ok(Json(OrderSaved { success: true, order }))
}

/// Orders newest first. An empty `userId` means no filter.
#[utoipa::path(get, path = "/api/orders", tag = "orders", params(("userId" = Option<String>, Query, description = "Only orders of this user")), responses((status = 200, description = "Orders, newest first", body = crate::openapi::OrderListDoc)))]
pub async fn list_orders(
    State(state): State<ServerState>,
    Query(q): Query<ListOrdersQuery>,
) -> Json<OrderList> {
    let user_id = q.user_id.as_deref().filter(|u| !u.is_empty());
    Json(OrderList { orders: state.orders.list(user_id).await })
}

#[utoipa::path(get, path = "/api/orders/{id}", tag = "orders", params(("id" = String, Path, description = "Order id")), responses((status = 200, description = "Found", body = crate::openapi::OrderBodyDoc), (status = 404, description = "Unknown id")))]
pub async fn get_order(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<OrderBody>, ApiError> {
    let order = state.orders.get(&id).await?;
    Ok(Json(OrderBody { order }))
}

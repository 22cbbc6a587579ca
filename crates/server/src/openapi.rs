use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthDoc { pub status: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDoc {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub created_at: String,
}

#[derive(Serialize, ToSchema)]
pub struct RegisterUserDoc {
    pub name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct UserSavedDoc { pub success: bool, pub user: UserDoc }

#[derive(Serialize, ToSchema)]
pub struct UserListDoc { pub users: Vec<UserDoc> }

#[derive(Serialize, ToSchema)]
pub struct UserBodyDoc { pub user: UserDoc }

/// Cart line, stored verbatim. Carts usually send `price` and `quantity` plus product fields.
#[derive(Serialize, ToSchema)]
pub struct LineItemDoc { pub price: Option<f64>, pub quantity: Option<f64> }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDoc {
    pub id: String,
    pub user_id: String,
    pub items: Vec<LineItemDoc>,
    pub subtotal: f64,
    pub discount: f64,
    pub shipping_cost: f64,
    pub total: f64,
    pub shipping_address: String,
    pub notes: String,
    pub payment_status: String,
    pub created_at: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderDoc {
    pub user_id: String,
    pub items: Vec<LineItemDoc>,
    pub subtotal: Option<f64>,
    pub discount: Option<f64>,
    pub shipping_cost: Option<f64>,
    pub total: Option<f64>,
    pub shipping_address: Option<String>,
    pub notes: Option<String>,
    pub payment_status: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct OrderSavedDoc { pub success: bool, pub order: OrderDoc }

#[derive(Serialize, ToSchema)]
pub struct OrderListDoc { pub orders: Vec<OrderDoc> }

#[derive(Serialize, ToSchema)]
pub struct OrderBodyDoc { pub order: OrderDoc }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::register_user,
        crate::routes::users::list_users,
        crate::routes::users::get_user,
        crate::routes::orders::create_order,
        crate::routes::orders::list_orders,
        crate::routes::orders::get_order,
    ),
    components(
        schemas(
            HealthDoc,
            UserDoc,
            RegisterUserDoc,
            UserSavedDoc,
            UserListDoc,
            UserBodyDoc,
            LineItemDoc,
            OrderDoc,
            CreateOrderDoc,
            OrderSavedDoc,
            OrderListDoc,
            OrderBodyDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "users"),
        (name = "orders")
    )
)]
pub struct ApiDoc;

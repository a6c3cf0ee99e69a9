use axum::{
    Router,
    routing::{get, post, put},
};

pub mod auth;
pub mod orders;
pub mod products;
pub mod system;
pub mod users;

/// Routes that require no credential: health, registration/login, and
/// catalog reads.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/products", get(products::list_products))
        .route("/products/:id", get(products::get_product))
}

/// Routes that require a verified bearer token.
pub fn protected_router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/orders", post(orders::create_order).get(orders::list_orders))
        .route("/orders/:id", put(orders::update_order_status))
        .route("/products", post(products::create_product))
        .route(
            "/products/:id",
            put(products::update_product).delete(products::delete_product),
        )
        .route("/users", get(users::list_accounts))
        .route("/users/:id", get(users::get_profile).patch(users::update_profile))
        .route("/users/:id/password", post(users::change_password))
        .route("/users/:id/cart", post(users::add_to_cart))
}

#[tokio::main]
async fn main() {
    storefront_observability::init();

    let config = storefront_api::app::AppConfig::from_env();
    let bind_addr = config.bind_addr.clone();

    let app = storefront_api::app::build_app(config).await;

    let listener = tokio::net::TcpListener::bind(bind_addr.as_str())
        .await
        .expect("failed to bind listen address");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}

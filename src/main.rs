use axum::{middleware, routing::get, routing::post, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use warehouse_gate::auth::Role;
use warehouse_gate::handlers;
use warehouse_gate::middleware::{
    authenticate, authorize_roles, require_admin, require_picker, require_supervisor,
};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up JWT_SECRET, APP_ENV, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = warehouse_gate::config::config();
    tracing::info!("Starting warehouse gate in {:?} mode", config.environment);

    if let Err(e) = config.validate() {
        tracing::error!("configuration invalid: {}", e);
        std::process::exit(1);
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("GATE_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("warehouse gate listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/refresh", post(handlers::auth::refresh_post))
        // Protected API
        .merge(auth_routes())
        .merge(access_routes())
        .merge(admin_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router {
    use handlers::auth;

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami_get))
        .route(
            "/api/auth/role",
            post(auth::role_post).delete(auth::role_delete),
        )
        .layer(middleware::from_fn(authenticate))
}

fn access_routes() -> Router {
    use handlers::access;

    Router::new()
        .route(
            "/api/access/admin",
            get(access::admin_get).route_layer(middleware::from_fn(require_admin)),
        )
        .route(
            "/api/access/supervisor",
            get(access::supervisor_get).route_layer(middleware::from_fn(require_supervisor)),
        )
        .route(
            "/api/access/picker",
            get(access::picker_get).route_layer(middleware::from_fn(require_picker)),
        )
        .route("/api/access/check", post(access::check_post))
        // Allow-list guard over the whole probe group: any warehouse role
        // may ask, the per-route guards above narrow further
        .route_layer(middleware::from_fn(|req, next| {
            authorize_roles(
                &[Role::Admin, Role::Supervisor, Role::Picker, Role::Receiver],
                req,
                next,
            )
        }))
        .layer(middleware::from_fn(authenticate))
}

fn admin_routes() -> Router {
    use handlers::admin;

    Router::new()
        .route("/api/admin/tokens", post(admin::tokens_post))
        .route_layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn(authenticate))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Warehouse Gate",
            "version": version,
            "description": "Authentication and role-resolution gate for the warehouse operations backend",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "refresh": "/auth/refresh (public - token exchange)",
                "auth": "/api/auth/* (protected - identity and role switching)",
                "access": "/api/access/* (protected - role probes)",
                "admin": "/api/admin/* (protected - admin only)",
            }
        }
    }))
}

async fn health() -> axum::response::Json<Value> {
    let now = chrono::Utc::now();

    // No backing store in this service: token verification is pure
    // computation, so liveness is the only signal
    axum::response::Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": now,
        }
    }))
}

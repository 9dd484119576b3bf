//! Route table.

use crate::handlers;
use crate::middleware::auth::{Guard, enforce_access};
use crate::state::AppState;
use axum::{
    Router,
    extract::State,
    middleware,
    routing::{MethodRouter, get, post},
};
use healthdesk_core::{HttpMethod, OperationDescriptor};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the router: login, liveness, and one guarded route per operation.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/api/login", post(handlers::login));

    for descriptor in state.operations.iter() {
        router = router.route(&descriptor.path, operation_route(&state, descriptor));
    }

    let router = if state.config.server.cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

fn operation_route(state: &AppState, descriptor: &OperationDescriptor) -> MethodRouter<AppState> {
    let descriptor = Arc::new(descriptor.clone());
    let guard = Guard::new(descriptor.access.clone(), state.users.clone());

    let handler = {
        let descriptor = descriptor.clone();
        move |State(state): State<AppState>| {
            let descriptor = descriptor.clone();
            async move { handlers::run_operation(&state, &descriptor).await }
        }
    };

    let route = match descriptor.method {
        HttpMethod::Get => get(handler),
        HttpMethod::Post => post(handler),
    };

    route.route_layer(middleware::from_fn_with_state(guard, enforce_access))
}

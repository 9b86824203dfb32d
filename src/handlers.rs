use axum::{
    Extension, Json,
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::{AppState, models::NavigationRequest, models::RouteManifestEntry};

/// navigate
///
/// The single view-dispatch handler behind every registered route. By the
/// time it runs, the navigation guard has already vetted the request; this
/// handler resolves the path in the registry, loads the route's view (first
/// navigation pays the factory cost, later ones hit the memoized view) and
/// renders it.
///
/// The `NavigationRequest` normally arrives via request extensions from the
/// guard. A fresh one is minted if the handler is somehow reached without the
/// guard layer, so rendering never depends on middleware ordering.
pub async fn navigate(
    State(state): State<AppState>,
    uri: Uri,
    nav: Option<Extension<NavigationRequest>>,
) -> Response {
    let Some(route) = state.registry.resolve(uri.path()) else {
        // Unreachable through the router (only registered paths dispatch
        // here); kept as a guardrail for manual handler invocation.
        return StatusCode::NOT_FOUND.into_response();
    };

    let nav = match nav {
        Some(Extension(nav)) => nav,
        None => {
            let full_path = uri
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| uri.path().to_string());
            NavigationRequest::new(full_path, None)
        }
    };

    let view = route.leaf().loader.resolve().await;
    tracing::debug!(nav_id = %nav.id, view = view.name(), "rendering view");
    view.render(&nav).await.into_response()
}

/// route_manifest
///
/// [Public Route] `GET /routes` — lists the route table as JSON: full path,
/// route name, and whether the navigation guard protects it. Lets operators
/// and frontend tooling confirm the deployed table without reading the code.
pub async fn route_manifest(State(state): State<AppState>) -> Json<Vec<RouteManifestEntry>> {
    Json(state.registry.manifest())
}

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    models::NavigationRequest,
    registry::ResolvedRoute,
    storage::{TOKEN_STORAGE_KEY, TokenStore},
};

/// GuardDecision
///
/// The navigation guard's verdict on a single attempt. There is no error
/// variant: the only failure mode the guard knows is "token absent", and its
/// answer to that is a redirect, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the navigation commit to its target.
    Proceed,
    /// Bounce the navigation to the login route, remembering where it was
    /// headed so the login flow can send it back.
    RedirectToLogin {
        /// The original target, path plus query string.
        redirect: String,
    },
}

/// decide
///
/// The guard's decision function. Pure and synchronous: one optional storage
/// read, no retry, no suspension.
///
/// Public routes (no protection flag anywhere in the matched chain) proceed
/// without the storage ever being consulted. Protected routes proceed when a
/// non-empty token is stored under `user_jwt_token`; an empty stored string
/// counts as absent. Token validity, expiry and signature are deliberately
/// not inspected here — presence alone gates access.
pub fn decide(
    route: &ResolvedRoute,
    nav: &NavigationRequest,
    tokens: &dyn TokenStore,
) -> GuardDecision {
    if !route.requires_auth() {
        return GuardDecision::Proceed;
    }

    match tokens.get(TOKEN_STORAGE_KEY) {
        Some(token) if !token.is_empty() => GuardDecision::Proceed,
        _ => GuardDecision::RedirectToLogin {
            redirect: nav.to.clone(),
        },
    }
}

/// guard_middleware
///
/// Intercepts every navigation before it commits. Mints the ephemeral
/// `NavigationRequest`, asks `decide` for a verdict, and either forwards the
/// request to the matched view (stashing the navigation record in request
/// extensions for the handler) or answers with a 307 to
/// `<login_path>?redirect=<urlencoded target>`.
///
/// Paths the registry does not know are passed through untouched; the router
/// never dispatches them here, but the fallthrough keeps the middleware
/// honest if it is ever layered more broadly.
pub async fn guard_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let full_path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());

    let Some(route) = state.registry.resolve(&path) else {
        return next.run(request).await;
    };

    let from = request
        .headers()
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let nav = NavigationRequest::new(full_path, from);

    match decide(route, &nav, state.tokens.as_ref()) {
        GuardDecision::Proceed => {
            tracing::debug!(
                nav_id = %nav.id,
                route = route.name(),
                to = %nav.to,
                "navigation allowed"
            );
            request.extensions_mut().insert(nav);
            next.run(request).await
        }
        GuardDecision::RedirectToLogin { redirect } => {
            tracing::info!(
                nav_id = %nav.id,
                route = route.name(),
                to = %redirect,
                "unauthenticated navigation, redirecting to login"
            );
            Redirect::temporary(&login_location(&state.config.login_path, &redirect))
                .into_response()
        }
    }
}

/// Builds the login URL carrying the original destination as the `redirect`
/// query parameter, percent-encoded.
pub fn login_location(login_path: &str, redirect: &str) -> String {
    match serde_urlencoded::to_string([("redirect", redirect)]) {
        Ok(query) => format!("{login_path}?{query}"),
        // Encoding a single string pair cannot fail in practice; fall back to
        // the bare login path rather than dropping the navigation.
        Err(_) => login_path.to_string(),
    }
}

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Html;
use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::models::NavigationRequest;

/// View
///
/// The contract every routed view fulfils. Views are opaque to the routing
/// layer: the registry only knows how to load one lazily and ask it to render
/// the navigation it was reached by.
#[async_trait]
pub trait View: Send + Sync {
    /// Stable identifier, matching the owning route entry's name.
    fn name(&self) -> &'static str;

    /// Produces the page body for a navigation that the guard let through.
    async fn render(&self, nav: &NavigationRequest) -> Html<String>;
}

type ViewFactory = Arc<dyn Fn() -> Arc<dyn View> + Send + Sync>;

/// ViewLoader
///
/// Deferred reference to a view. The factory is *not* run when the route
/// table is declared; it runs on the first navigation that reaches the route,
/// and the produced view is memoized for every navigation after that.
///
/// Clones share the memoization cell, so a loader cloned into a resolved
/// route chain still loads at most once process-wide.
#[derive(Clone)]
pub struct ViewLoader {
    factory: ViewFactory,
    cell: Arc<OnceCell<Arc<dyn View>>>,
}

impl ViewLoader {
    pub fn new<V, F>(factory: F) -> Self
    where
        V: View + 'static,
        F: Fn() -> V + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(move || Arc::new(factory()) as Arc<dyn View>),
            cell: Arc::new(OnceCell::new()),
        }
    }

    /// Resolves the view, running the factory exactly once across all clones.
    pub async fn resolve(&self) -> Arc<dyn View> {
        self.cell
            .get_or_init(|| async { (self.factory)() })
            .await
            .clone()
    }

    /// Whether the factory has already run. Observability hook for tests
    /// asserting laziness; never consulted on the navigation path.
    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}

impl fmt::Debug for ViewLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewLoader")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

// --- Concrete Views ---

/// HomeView
///
/// The public landing page at `/`.
pub struct HomeView;

#[async_trait]
impl View for HomeView {
    fn name(&self) -> &'static str {
        "home"
    }

    async fn render(&self, _nav: &NavigationRequest) -> Html<String> {
        Html(
            "<!doctype html><html><head><title>PAC Portal</title></head>\
             <body><h1>PAC Portal</h1>\
             <p><a href=\"/login\">Sign in</a> or go to your \
             <a href=\"/app/dashboard\">dashboard</a>.</p></body></html>"
                .to_string(),
        )
    }
}

/// Query parameters the login view understands. `redirect` is the path the
/// guard attached when it bounced an unauthenticated navigation here.
#[derive(Debug, Deserialize)]
struct LoginQuery {
    redirect: Option<String>,
}

/// LoginView
///
/// The public sign-in page at `/login`. When reached via a guard redirect it
/// consumes the `redirect` query parameter and surfaces the intended
/// destination, so the external login flow can send the user back there after
/// it has stored a token.
pub struct LoginView;

impl LoginView {
    fn redirect_target(nav: &NavigationRequest) -> Option<String> {
        let (_, query) = nav.to.split_once('?')?;
        serde_urlencoded::from_str::<LoginQuery>(query)
            .ok()
            .and_then(|q| q.redirect)
    }
}

#[async_trait]
impl View for LoginView {
    fn name(&self) -> &'static str {
        "login"
    }

    async fn render(&self, nav: &NavigationRequest) -> Html<String> {
        let destination = Self::redirect_target(nav);
        let notice = match &destination {
            Some(target) => format!(
                "<p>Sign in to continue to <code>{}</code>.</p>",
                target.replace('<', "&lt;").replace('>', "&gt;")
            ),
            None => "<p>Sign in to your account.</p>".to_string(),
        };

        Html(format!(
            "<!doctype html><html><head><title>Sign in</title></head>\
             <body><h1>Sign in</h1>{notice}\
             <form method=\"post\" action=\"/auth/session\">\
             <input type=\"email\" name=\"email\" placeholder=\"Email\">\
             <input type=\"password\" name=\"password\" placeholder=\"Password\">\
             <button type=\"submit\">Sign in</button></form></body></html>"
        ))
    }
}

/// DashboardView
///
/// The protected page at `/app/dashboard`. Reached only after the guard has
/// confirmed a token is present; the token itself is never shown or decoded
/// here.
pub struct DashboardView;

#[async_trait]
impl View for DashboardView {
    fn name(&self) -> &'static str {
        "dashboard"
    }

    async fn render(&self, nav: &NavigationRequest) -> Html<String> {
        Html(format!(
            "<!doctype html><html><head><title>Dashboard</title></head>\
             <body><h1>Dashboard</h1>\
             <p>Navigation {} arrived at <code>{}</code>.</p></body></html>",
            nav.id, nav.to
        ))
    }
}

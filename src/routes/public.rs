use crate::registry::RouteEntry;
use crate::views::{HomeView, LoginView, ViewLoader};

/// Public Route Declarations
///
/// Entries accessible to any client, authenticated or not. The navigation
/// guard proceeds on these without ever consulting the token store.
pub fn public_routes() -> Vec<RouteEntry> {
    vec![
        // GET /
        // The landing page.
        RouteEntry::new("/", "home", ViewLoader::new(|| HomeView)),
        // GET /login
        // The sign-in page. Also the guard's redirect target: it consumes
        // the `redirect` query parameter to send the user back to the route
        // they originally asked for once the external login flow has stored
        // a token.
        RouteEntry::new("/login", "login", ViewLoader::new(|| LoginView)),
    ]
}

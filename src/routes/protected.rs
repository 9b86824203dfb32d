use crate::registry::RouteEntry;
use crate::views::{DashboardView, ViewLoader};

/// Protected Route Declarations
///
/// Entries carrying the `requires_auth` flag. Navigations here only commit
/// when a token is present under `user_jwt_token`; otherwise the guard
/// redirects to `/login` with the intended destination in the `redirect`
/// query parameter.
///
/// Note the flag gates on token *presence* only. Validity, expiry and
/// signature checks belong to the API layer behind the dashboard, not to the
/// navigation guard.
pub fn protected_routes() -> Vec<RouteEntry> {
    vec![
        // GET /app/dashboard
        // The signed-in user's dashboard.
        RouteEntry::new(
            "/app/dashboard",
            "dashboard",
            ViewLoader::new(|| DashboardView),
        )
        .requires_auth(),
    ]
}

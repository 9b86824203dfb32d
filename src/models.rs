use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RouteMeta
///
/// Arbitrary metadata attached to a route entry. The only field the gateway
/// acts on today is `requires_auth`, which marks a route (and, through chain
/// matching, all of its descendants) as protected by the navigation guard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMeta {
    /// When true, the navigation guard demands a stored auth token before
    /// letting a navigation through to this route.
    #[serde(default)]
    pub requires_auth: bool,
}

/// NavigationRequest
///
/// The ephemeral record of a single navigation attempt. One is minted per
/// incoming navigation, handed to the guard and then to the view handler,
/// and discarded once the response is produced. The `id` correlates guard
/// decisions with view renders in the structured logs.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationRequest {
    /// Correlation id for this attempt.
    pub id: Uuid,
    /// Target of the navigation: path plus query string, exactly as requested.
    /// This is the value a guard redirect carries back as `redirect=...`.
    pub to: String,
    /// Originating location, when the client disclosed one (Referer header).
    pub from: Option<String>,
    /// Wall-clock instant the attempt was observed.
    pub issued_at: DateTime<Utc>,
}

impl NavigationRequest {
    pub fn new(to: impl Into<String>, from: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            to: to.into(),
            from,
            issued_at: Utc::now(),
        }
    }
}

/// RouteManifestEntry
///
/// One row of the `GET /routes` manifest: the externally observable facts
/// about a registered route. View loaders are deliberately absent — whether a
/// view has been loaded yet is not part of the public contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteManifestEntry {
    pub path: String,
    pub name: String,
    pub requires_auth: bool,
}

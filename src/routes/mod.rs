/// Route Table Index
///
/// Declares the gateway's static route table, split by access level so the
/// protection boundary is visible in the module structure itself. The
/// modules contribute `RouteEntry` declarations; `RouteRegistry` flattening,
/// uniqueness checking and guard enforcement all happen downstream of here.

/// Routes any client may navigate to, token or not.
pub mod public;

/// Routes flagged `requires_auth`; the navigation guard bounces token-less
/// navigations to the login route.
pub mod protected;

use crate::registry::RouteEntry;

/// route_table
///
/// The complete declared table, public entries first. Declaration order is
/// preserved through flattening and into the `/routes` manifest.
pub fn route_table() -> Vec<RouteEntry> {
    let mut table = public::public_routes();
    table.extend(protected::protected_routes());
    table
}

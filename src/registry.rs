use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::models::{RouteManifestEntry, RouteMeta};
use crate::views::ViewLoader;

/// RegistryError
///
/// Construction-time failures of the route table. These are programmer
/// errors in the static route declarations, so the application surfaces them
/// fail-fast at startup rather than at navigation time.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two entries flattened to the same full path. The table invariant is
    /// that each path maps to exactly one route.
    #[error("duplicate route path: {0}")]
    DuplicatePath(String),

    /// A top-level path (or the base prefix) did not start with '/'.
    #[error("route path must be rooted with '/': {0}")]
    UnrootedPath(String),
}

/// RouteEntry
///
/// One declared route: a path, a stable name, a deferred reference to the
/// view that serves it, optional metadata, and optional nested children.
/// Child paths are joined onto the parent's full path (a leading '/' on the
/// child is optional); a child always inherits the parent's position in the
/// matched chain, and with it the parent's meta.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub path: String,
    pub name: String,
    pub loader: ViewLoader,
    pub meta: RouteMeta,
    pub children: Vec<RouteEntry>,
}

impl RouteEntry {
    pub fn new(path: impl Into<String>, name: impl Into<String>, loader: ViewLoader) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            loader,
            meta: RouteMeta::default(),
            children: Vec::new(),
        }
    }

    /// Marks this entry (and, through chain matching, its descendants) as
    /// requiring an auth token.
    pub fn requires_auth(mut self) -> Self {
        self.meta.requires_auth = true;
        self
    }

    pub fn with_meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_children(mut self, children: Vec<RouteEntry>) -> Self {
        self.children = children;
        self
    }
}

/// ResolvedRoute
///
/// The outcome of matching a path against the registry: the route's full
/// path plus the matched chain of entries from outermost ancestor to leaf.
/// The chain is what the navigation guard inspects — a protection flag on
/// any link protects the whole subtree.
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    full_path: String,
    chain: Vec<Arc<RouteEntry>>,
}

impl ResolvedRoute {
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// The terminal entry of the chain. The chain always has at least one
    /// link, established at registry construction.
    pub fn leaf(&self) -> &Arc<RouteEntry> {
        self.chain
            .last()
            .unwrap_or_else(|| unreachable!("resolved route has an empty chain"))
    }

    pub fn chain(&self) -> &[Arc<RouteEntry>] {
        &self.chain
    }

    pub fn name(&self) -> &str {
        &self.leaf().name
    }

    /// True when any entry in the matched chain carries the protection flag.
    pub fn requires_auth(&self) -> bool {
        self.chain.iter().any(|entry| entry.meta.requires_auth)
    }
}

/// RouteRegistry
///
/// The flattened, indexed route table. Declared entries (possibly nested)
/// are expanded into one record per entry, keyed by full path. Path
/// uniqueness is enforced here, once, at construction.
#[derive(Debug)]
pub struct RouteRegistry {
    records: Vec<ResolvedRoute>,
    index: HashMap<String, usize>,
}

impl RouteRegistry {
    /// Builds a registry rooted at `/`.
    pub fn from_entries(entries: Vec<RouteEntry>) -> Result<Self, RegistryError> {
        Self::with_base("", entries)
    }

    /// Builds a registry whose paths are all prefixed with `base` (the
    /// deployment base path). An empty base or `/` means no prefix.
    pub fn with_base(base: &str, entries: Vec<RouteEntry>) -> Result<Self, RegistryError> {
        let base = normalize_base(base)?;

        let mut registry = Self {
            records: Vec::new(),
            index: HashMap::new(),
        };
        for entry in entries {
            if !entry.path.starts_with('/') {
                return Err(RegistryError::UnrootedPath(entry.path));
            }
            registry.flatten(entry, &base, &[])?;
        }
        Ok(registry)
    }

    fn flatten(
        &mut self,
        mut entry: RouteEntry,
        parent_path: &str,
        parent_chain: &[Arc<RouteEntry>],
    ) -> Result<(), RegistryError> {
        let children = std::mem::take(&mut entry.children);
        let full_path = join_paths(parent_path, &entry.path);

        let entry = Arc::new(entry);
        let mut chain = parent_chain.to_vec();
        chain.push(entry);

        if self.index.contains_key(&full_path) {
            return Err(RegistryError::DuplicatePath(full_path));
        }
        self.index.insert(full_path.clone(), self.records.len());
        self.records.push(ResolvedRoute {
            full_path: full_path.clone(),
            chain: chain.clone(),
        });

        for child in children {
            self.flatten(child, &full_path, &chain)?;
        }
        Ok(())
    }

    /// Resolves a request path (no query string) to zero or one routes.
    pub fn resolve(&self, path: &str) -> Option<&ResolvedRoute> {
        self.index.get(path).map(|&i| &self.records[i])
    }

    /// Records in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedRoute> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The externally observable description of the table, in declaration
    /// order. Serves `GET /routes`.
    pub fn manifest(&self) -> Vec<RouteManifestEntry> {
        self.records
            .iter()
            .map(|record| RouteManifestEntry {
                path: record.full_path.clone(),
                name: record.name().to_string(),
                requires_auth: record.requires_auth(),
            })
            .collect()
    }
}

/// Normalizes a base prefix: empty and "/" both mean "no prefix"; anything
/// else must be rooted and is kept without a trailing slash.
fn normalize_base(base: &str) -> Result<String, RegistryError> {
    let trimmed = base.trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if !trimmed.starts_with('/') {
        return Err(RegistryError::UnrootedPath(base.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Joins a parent full path with a declared segment. Rooted segments are
/// appended to the parent as-is (collapsing the parent's trailing slash);
/// relative segments get a separating slash.
fn join_paths(parent: &str, segment: &str) -> String {
    let parent = parent.trim_end_matches('/');
    if segment.starts_with('/') {
        format!("{parent}{segment}")
    } else {
        format!("{parent}/{segment}")
    }
}

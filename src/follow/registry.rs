//! Resolver registry - maps view kinds to the function that locates an item's source

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use super::error::ResolveError;
use super::session::Session;
use crate::host::{Host, Location, ViewKind};

/// Maps "the item under the cursor of an output view" to a source location
///
/// `at` is the output view and its cursor. On success the resolver returns
/// the referenced location in the source view. A resolver may move focus or
/// cursors before failing; the engine restores focus afterwards.
pub trait Resolver {
    fn resolve(&self, host: &mut dyn Host, at: Location) -> Result<Location, ResolveError>;
}

impl<F> Resolver for F
where
    F: Fn(&mut dyn Host, Location) -> Result<Location, ResolveError>,
{
    fn resolve(&self, host: &mut dyn Host, at: Location) -> Result<Location, ResolveError> {
        self(host, at)
    }
}

/// Shared handle to a resolver
pub type ResolverRef = Arc<dyn Resolver>;

/// Named resolvers a host offers for use from configuration
pub type ResolverCatalog = HashMap<String, ResolverRef>;

/// Kind -> resolver mapping shared by all sessions
#[derive(Default, Clone)]
pub struct ResolverRegistry {
    resolvers: HashMap<ViewKind, ResolverRef>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `kind` with `resolver`, replacing any earlier entry
    pub fn register(&mut self, kind: impl Into<ViewKind>, resolver: ResolverRef) {
        let kind = kind.into();
        if self.resolvers.insert(kind.clone(), resolver).is_some() {
            tracing::debug!("Replaced resolver for kind '{}'", kind);
        } else {
            tracing::debug!("Registered resolver for kind '{}'", kind);
        }
    }

    /// Remove the entry for `kind`, returning it
    pub fn unregister(&mut self, kind: &ViewKind) -> Option<ResolverRef> {
        self.resolvers.remove(kind)
    }

    pub fn lookup(&self, kind: &ViewKind) -> Option<ResolverRef> {
        self.resolvers.get(kind).cloned()
    }

    /// The session's override if it has one, else the entry for its kind
    pub fn resolver_for(&self, session: &Session) -> Option<ResolverRef> {
        if let Some(resolver) = session.resolver_override() {
            return Some(resolver.clone());
        }
        session.kind().and_then(|kind| self.lookup(kind))
    }

    pub fn contains(&self, kind: &ViewKind) -> bool {
        self.resolvers.contains_key(kind)
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<ViewKind> {
        let mut kinds: Vec<ViewKind> = self.resolvers.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// Register every `kind -> name` pair whose name exists in `catalog`
    ///
    /// Returns the names that could not be found.
    pub fn bind_named(
        &mut self,
        mapping: &BTreeMap<ViewKind, String>,
        catalog: &ResolverCatalog,
    ) -> Vec<String> {
        let mut unknown = Vec::new();
        for (kind, name) in mapping {
            match catalog.get(name) {
                Some(resolver) => self.register(kind.clone(), resolver.clone()),
                None => {
                    tracing::warn!("Unknown resolver '{}' configured for kind '{}'", name, kind);
                    unknown.push(name.clone());
                }
            }
        }
        unknown
    }
}

impl fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

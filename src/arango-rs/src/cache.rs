//! Name-keyed caches of resource proxies.
//!
//! Each top-level handle owns one [`IdentityCache`] per resource kind it
//! hands out (databases on the client, collections and graphs on a
//! database). A lookup that misses triggers exactly one full refresh from
//! the server before giving up with [`ArangoError::NotFound`].

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::connection::Connection;
use crate::error::{ArangoError, ResourceKind, Result};

/// Authoritative list of names plus a way to build a proxy for one name.
///
/// Building a proxy never performs I/O.
#[async_trait]
pub trait NameSource: Send + Sync {
    type Proxy;

    fn kind(&self) -> ResourceKind;

    async fn list_names(&self) -> Result<Vec<String>>;

    fn make_proxy(&self, name: &str) -> Self::Proxy;
}

/// Names added and removed by one refresh
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheDelta {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
}

impl CacheDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug)]
pub struct IdentityCache<P> {
    entries: HashMap<String, P>,
}

impl<P> Default for IdentityCache<P> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<P> IdentityCache<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&P> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached names in sorted order.
    pub fn names(&self) -> BTreeSet<String> {
        self.entries.keys().cloned().collect()
    }

    /// Drops entries missing from `authoritative` and adds proxies for new
    /// names. Existing entries are left untouched.
    pub fn reconcile<F>(&mut self, authoritative: &[String], mut make_proxy: F) -> CacheDelta
    where
        F: FnMut(&str) -> P,
    {
        let wanted: BTreeSet<&str> = authoritative.iter().map(String::as_str).collect();
        let mut delta = CacheDelta::default();

        self.entries.retain(|name, _| {
            let keep = wanted.contains(name.as_str());
            if !keep {
                delta.removed.insert(name.clone());
            }
            keep
        });

        for name in wanted {
            if !self.entries.contains_key(name) {
                self.entries.insert(name.to_string(), make_proxy(name));
                delta.added.insert(name.to_string());
            }
        }
        delta
    }

    /// Re-reads the authoritative name set (one request) and reconciles.
    pub async fn refresh<S>(&mut self, source: &S) -> Result<CacheDelta>
    where
        S: NameSource<Proxy = P> + ?Sized,
    {
        let names = source.list_names().await?;
        let delta = self.reconcile(&names, |name| source.make_proxy(name));
        info!(
            kind = %source.kind(),
            added = delta.added.len(),
            removed = delta.removed.len(),
            cached = self.entries.len(),
            "Refreshed identity cache"
        );
        Ok(delta)
    }

    /// Returns the cached proxy for `name`, refreshing once on a miss.
    pub async fn resolve<S>(&mut self, source: &S, name: &str) -> Result<&mut P>
    where
        S: NameSource<Proxy = P> + ?Sized,
    {
        if !self.entries.contains_key(name) {
            self.refresh(source).await?;
        }
        self.entries
            .get_mut(name)
            .ok_or_else(|| ArangoError::not_found(source.kind(), name))
    }

    /// Removes one entry, e.g. after the resource was deleted through this handle.
    pub fn evict(&mut self, name: &str) -> Option<P> {
        self.entries.remove(name)
    }
}

/// Databases visible on the server, read from `GET /database` on `_system`
pub struct DatabaseNames {
    pub(crate) conn: Arc<Connection>,
}

/// Collections of one database, read from `GET /collection`
pub struct CollectionNames {
    pub(crate) conn: Arc<Connection>,
    pub(crate) database: String,
}

/// Graphs of one database, read from `GET /gharial`
pub struct GraphNames {
    pub(crate) conn: Arc<Connection>,
    pub(crate) database: String,
}

#[async_trait]
impl NameSource for DatabaseNames {
    type Proxy = crate::database::Database;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Database
    }

    async fn list_names(&self) -> Result<Vec<String>> {
        crate::database::list_all_databases(&self.conn).await
    }

    fn make_proxy(&self, name: &str) -> Self::Proxy {
        crate::database::Database::new(self.conn.clone(), name)
    }
}

#[async_trait]
impl NameSource for CollectionNames {
    type Proxy = crate::collection::Collection;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Collection
    }

    async fn list_names(&self) -> Result<Vec<String>> {
        let list = crate::database::list_collections(&self.conn, &self.database).await?;
        Ok(list.all)
    }

    fn make_proxy(&self, name: &str) -> Self::Proxy {
        crate::collection::Collection::new(self.conn.clone(), &self.database, name)
    }
}

#[async_trait]
impl NameSource for GraphNames {
    type Proxy = crate::graph::Graph;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Graph
    }

    async fn list_names(&self) -> Result<Vec<String>> {
        crate::database::list_graphs(&self.conn, &self.database).await
    }

    fn make_proxy(&self, name: &str) -> Self::Proxy {
        crate::graph::Graph::new(self.conn.clone(), &self.database, name)
    }
}

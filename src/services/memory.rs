//! In-memory collaborator implementations.
//!
//! Used for local runs and as substitutable fakes in tests. Both stores are
//! safe to share across tasks.

use crate::services::errors::{ServiceError, ServiceResult};
use crate::services::traits::{ObjectPage, ObjectStore, ParameterStore};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};

const PARAMETER_SERVICE: &str = "parameter_store";
const OBJECT_SERVICE: &str = "object_store";

/// Default number of keys returned per listing page
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Parameter store backed by a concurrent map.
///
/// Each key is replaced atomically, so a reader sees either the previous or
/// the new value.
#[derive(Debug, Default)]
pub struct InMemoryParameterStore {
    values: DashMap<String, String>,
}

impl InMemoryParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.values.insert(name.into(), value.into());
        store
    }

    /// Current value without going through the async interface
    pub fn value(&self, name: &str) -> Option<String> {
        self.values.get(name).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[async_trait]
impl ParameterStore for InMemoryParameterStore {
    async fn get_parameter(&self, name: &str) -> ServiceResult<Option<String>> {
        Ok(self.value(name))
    }

    async fn put_parameter(&self, name: &str, value: &str) -> ServiceResult<()> {
        if name.is_empty() {
            return Err(ServiceError::rejected(
                PARAMETER_SERVICE,
                "parameter name must not be empty",
            ));
        }
        self.values.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

/// Object store holding bucket contents in ordered maps.
///
/// Listings are lexicographic and paginated; the continuation token is the
/// last key of the previous page.
#[derive(Debug)]
pub struct InMemoryObjectStore {
    buckets: RwLock<BTreeMap<String, BTreeMap<String, String>>>,
    page_size: usize,
    list_calls: AtomicUsize,
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            buckets: RwLock::new(BTreeMap::new()),
            page_size: page_size.max(1),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn put_object(&self, bucket: &str, key: &str, body: impl Into<String>) {
        self.buckets
            .write()
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), body.into());
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.buckets
            .read()
            .get(bucket)
            .is_some_and(|objects| objects.contains_key(key))
    }

    pub fn body(&self, bucket: &str, key: &str) -> Option<String> {
        self.buckets
            .read()
            .get(bucket)
            .and_then(|objects| objects.get(key).cloned())
    }

    /// All keys in a bucket, in order
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.buckets
            .read()
            .get(bucket)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of `list_objects` calls served so far
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> ServiceResult<ObjectPage> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);

        let buckets = self.buckets.read();
        let Some(objects) = buckets.get(bucket) else {
            return Ok(ObjectPage::default());
        };

        let lower = match continuation_token {
            Some(token) => Bound::Excluded(token),
            None => Bound::Included(prefix.to_string()),
        };

        let mut matching = objects
            .range((lower, Bound::Unbounded))
            .map(|(key, _)| key)
            .skip_while(|key| !key.starts_with(prefix))
            .take_while(|key| key.starts_with(prefix));

        let keys: Vec<String> = matching.by_ref().take(self.page_size).cloned().collect();
        let has_more = matching.next().is_some();

        let next_continuation_token = if has_more { keys.last().cloned() } else { None };

        Ok(ObjectPage {
            keys,
            next_continuation_token,
        })
    }

    async fn copy_object(
        &self,
        bucket: &str,
        source_key: &str,
        destination_key: &str,
    ) -> ServiceResult<()> {
        let mut buckets = self.buckets.write();
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| ServiceError::not_found(OBJECT_SERVICE, bucket))?;

        let body = objects
            .get(source_key)
            .cloned()
            .ok_or_else(|| ServiceError::not_found(OBJECT_SERVICE, source_key))?;

        objects.insert(destination_key.to_string(), body);
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> ServiceResult<()> {
        // Deleting a missing key succeeds, matching object-store semantics.
        if let Some(objects) = self.buckets.write().get_mut(bucket) {
            objects.remove(key);
        }
        Ok(())
    }
}

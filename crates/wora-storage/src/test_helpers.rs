//! In-memory object store for tests

use crate::keys;
use crate::traits::{ObjectStore, ObjectSummary, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct MockObject {
    data: Vec<u8>,
    content_type: String,
}

/// Mock storage implementation that stores objects in memory
///
/// Writes and deletes can be made to fail for keys containing a given pattern,
/// and listing can be made to fail entirely.
#[derive(Clone)]
pub struct MockStorage {
    objects: Arc<Mutex<BTreeMap<String, MockObject>>>,
    put_log: Arc<Mutex<Vec<String>>>,
    fail_put: Arc<Mutex<Option<String>>>,
    fail_put_after: Arc<Mutex<Option<usize>>>,
    fail_delete: Arc<Mutex<Option<String>>>,
    fail_list: Arc<Mutex<bool>>,
    base_url: String,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::with_base_url("https://cdn.example.com")
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            objects: Arc::new(Mutex::new(BTreeMap::new())),
            put_log: Arc::new(Mutex::new(Vec::new())),
            fail_put: Arc::new(Mutex::new(None)),
            fail_put_after: Arc::new(Mutex::new(None)),
            fail_delete: Arc::new(Mutex::new(None)),
            fail_list: Arc::new(Mutex::new(false)),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Set an object directly, bypassing failure injection
    pub fn set_file(&self, key: &str, data: Vec<u8>) {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            MockObject {
                data,
                content_type: "application/octet-stream".to_string(),
            },
        );
    }

    /// Check if an object exists
    pub fn has_file(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    /// Get object data (for test assertions)
    pub fn get_file(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).map(|o| o.data.clone())
    }

    /// Content type recorded for an object
    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|o| o.content_type.clone())
    }

    /// All stored keys in lexical order
    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    /// Keys passed to successful `put_object` calls, in call order
    pub fn put_log(&self) -> Vec<String> {
        self.put_log.lock().unwrap().clone()
    }

    /// Make `put_object` fail for keys containing `pattern`
    pub fn fail_puts_matching(&self, pattern: &str) {
        *self.fail_put.lock().unwrap() = Some(pattern.to_string());
    }

    /// Let the first `count` writes succeed and fail every later one
    pub fn fail_puts_after(&self, count: usize) {
        *self.fail_put_after.lock().unwrap() = Some(count);
    }

    /// Make `delete_object` fail for keys containing `pattern`
    pub fn fail_deletes_matching(&self, pattern: &str) {
        *self.fail_delete.lock().unwrap() = Some(pattern.to_string());
    }

    /// Make `list_objects` fail
    pub fn fail_listing(&self) {
        *self.fail_list.lock().unwrap() = true;
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(pattern: &Mutex<Option<String>>, key: &str) -> bool {
    pattern
        .lock()
        .unwrap()
        .as_deref()
        .is_some_and(|p| key.contains(p))
}

#[async_trait]
impl ObjectStore for MockStorage {
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        keys::validate_key(key)?;
        let budget_spent = self
            .fail_put_after
            .lock()
            .unwrap()
            .is_some_and(|count| self.put_log.lock().unwrap().len() >= count);
        if budget_spent || matches(&self.fail_put, key) {
            return Err(StorageError::UploadFailed(format!(
                "injected failure for {}",
                key
            )));
        }

        self.objects.lock().unwrap().insert(
            key.to_string(),
            MockObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        self.put_log.lock().unwrap().push(key.to_string());
        Ok(self.public_url(key))
    }

    async fn delete_object(&self, key: &str) -> StorageResult<()> {
        keys::validate_key(key)?;
        if matches(&self.fail_delete, key) {
            return Err(StorageError::DeleteFailed(format!(
                "injected failure for {}",
                key
            )));
        }

        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    async fn list_objects(&self) -> StorageResult<Vec<ObjectSummary>> {
        if *self.fail_list.lock().unwrap() {
            return Err(StorageError::ListFailed("injected failure".to_string()));
        }

        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .map(|(key, object)| ObjectSummary {
                key: key.clone(),
                size: object.data.len() as u64,
            })
            .collect())
    }

    fn public_base_url(&self) -> &str {
        &self.base_url
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

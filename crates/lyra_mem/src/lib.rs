//! An in-memory content platform.
//!
//! Implements the Lyra platform traits entirely in process. Uploaded bytes
//! are hashed and measured, then dropped; the platform keeps metadata only.
//! Intended for tests, demos and embedded dry-runs.

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use chrono::Utc;
use lyra_core::prelude::*;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

#[derive(Default)]
struct State {
    next_id: u64,
    roles: Vec<Role>,
    permissions: Vec<Permission>,
    files: Vec<Asset>,
    records: Vec<Record>,
    flags: Vec<(String, String, bool)>,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone)]
pub struct MemPlatform {
    inner: Arc<Mutex<State>>,
}

impl MemPlatform {
    /// A fresh platform with the built-in public and authenticated roles.
    pub fn new() -> Self {
        let mut state = State::default();
        let public_id = state.next_id();
        state.roles.push(Role {
            id: public_id,
            name: "Public".to_string(),
            description: Some("Default role given to unauthenticated users.".to_string()),
            role_type: "public".to_string(),
        });
        let authenticated_id = state.next_id();
        state.roles.push(Role {
            id: authenticated_id,
            name: "Authenticated".to_string(),
            description: Some("Default role given to authenticated users.".to_string()),
            role_type: "authenticated".to_string(),
        });

        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // Lock poisoning only happens after a panic in this module.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// How many stored assets carry this logical name.
    pub fn files_named(&self, name: &str) -> usize {
        self.lock().files.iter().filter(|f| f.name == name).count()
    }

    pub fn record_count(&self, content_type: &str) -> usize {
        self.lock()
            .records
            .iter()
            .filter(|r| r.content_type == content_type)
            .count()
    }

    pub fn permission_count(&self) -> usize {
        self.lock().permissions.len()
    }

    /// A JSON dump of the whole platform state, for demo output.
    pub fn snapshot(&self) -> Value {
        let state = self.lock();
        json!({
            "roles": state.roles,
            "permissions": state.permissions,
            "files": state.files,
            "records": state.records,
        })
    }
}

impl Default for MemPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentPlatform for MemPlatform {
    async fn find_role(&self, role_type: &str) -> Result<Role, PlatformError> {
        self.lock()
            .roles
            .iter()
            .find(|role| role.role_type == role_type)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound(format!("role: {role_type}")))
    }

    async fn create_permission(&self, action: &str, role: u64) -> Result<Permission, PlatformError> {
        let mut state = self.lock();
        let permission = Permission {
            id: state.next_id(),
            action: action.to_string(),
            role,
        };
        state.permissions.push(permission.clone());
        Ok(permission)
    }

    async fn find_permissions(&self, role: u64) -> Result<Vec<Permission>, PlatformError> {
        Ok(self
            .lock()
            .permissions
            .iter()
            .filter(|permission| permission.role == role)
            .cloned()
            .collect())
    }

    async fn find_file(&self, name: &str) -> Result<Option<Asset>, PlatformError> {
        Ok(self
            .lock()
            .files
            .iter()
            .find(|file| file.name == name)
            .cloned())
    }

    async fn upload_file(&self, data: Bytes, info: FileInfo) -> Result<Asset, PlatformError> {
        let hash = hex::encode(Sha256::digest(&data));
        let mut state = self.lock();
        let asset = Asset {
            id: state.next_id(),
            url: format!("/uploads/{}_{}.{}", info.name, &hash[..8], info.ext),
            name: info.name,
            alternative_text: info.alternative_text,
            caption: info.caption,
            ext: info.ext,
            mime: info.mime,
            size: data.len() as u64,
            hash,
        };
        state.files.push(asset.clone());
        Ok(asset)
    }

    async fn create_record(&self, content_type: &str, data: Value) -> Result<Record, PlatformError> {
        let mut state = self.lock();
        let record = Record {
            id: state.next_id(),
            content_type: content_type.to_string(),
            data,
            created_at: Utc::now(),
        };
        state.records.push(record.clone());
        Ok(record)
    }

    async fn find_records(&self, content_type: &str) -> Result<Vec<Record>, PlatformError> {
        Ok(self
            .lock()
            .records
            .iter()
            .filter(|record| record.content_type == content_type)
            .cloned()
            .collect())
    }

    async fn find_record(&self, content_type: &str, id: u64) -> Result<Option<Record>, PlatformError> {
        Ok(self
            .lock()
            .records
            .iter()
            .find(|record| record.content_type == content_type && record.id == id)
            .cloned())
    }
}

impl SettingsStore for MemPlatform {
    async fn get_flag(&self, namespace: &str, key: &str) -> Result<Option<bool>, PlatformError> {
        Ok(self
            .lock()
            .flags
            .iter()
            .find(|(ns, k, _)| ns == namespace && k == key)
            .map(|(_, _, value)| *value))
    }

    async fn set_flag(&self, namespace: &str, key: &str, value: bool) -> Result<(), PlatformError> {
        let mut state = self.lock();
        if let Some(flag) = state
            .flags
            .iter_mut()
            .find(|(ns, k, _)| ns == namespace && k == key)
        {
            flag.2 = value;
        } else {
            state
                .flags
                .push((namespace.to_string(), key.to_string(), value));
        }
        Ok(())
    }
}

use crate::content::*;
use crate::error::*;

use bytes::Bytes;
use serde_json::Value;

/// The content platform the seed pipeline writes into.
///
/// Everything behind this trait is external mutable state (roles, media
/// library, record storage); the pipeline itself stays pure and can be
/// exercised against an in-memory implementation.
pub trait ContentPlatform: Send + Sync + 'static + Clone {
    fn find_role(
        &self,
        role_type: &str,
    ) -> impl Future<Output = Result<Role, PlatformError>> + Send;

    fn create_permission(
        &self,
        action: &str,
        role: u64,
    ) -> impl Future<Output = Result<Permission, PlatformError>> + Send;

    fn find_permissions(
        &self,
        role: u64,
    ) -> impl Future<Output = Result<Vec<Permission>, PlatformError>> + Send;

    /// Look up a stored asset by its logical name.
    fn find_file(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Asset>, PlatformError>> + Send;

    fn upload_file(
        &self,
        data: Bytes,
        info: FileInfo,
    ) -> impl Future<Output = Result<Asset, PlatformError>> + Send;

    fn create_record(
        &self,
        content_type: &str,
        data: Value,
    ) -> impl Future<Output = Result<Record, PlatformError>> + Send;

    fn find_records(
        &self,
        content_type: &str,
    ) -> impl Future<Output = Result<Vec<Record>, PlatformError>> + Send;

    fn find_record(
        &self,
        content_type: &str,
        id: u64,
    ) -> impl Future<Output = Result<Option<Record>, PlatformError>> + Send;
}

/// Persisted key/value flags, namespaced. Backs the seed pipeline's
/// first-run gate.
pub trait SettingsStore: Send + Sync + 'static + Clone {
    fn get_flag(
        &self,
        namespace: &str,
        key: &str,
    ) -> impl Future<Output = Result<Option<bool>, PlatformError>> + Send;

    fn set_flag(
        &self,
        namespace: &str,
        key: &str,
        value: bool,
    ) -> impl Future<Output = Result<(), PlatformError>> + Send;
}

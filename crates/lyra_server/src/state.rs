use lyra_core::traits::{ContentPlatform, SettingsStore};

#[derive(Clone)]
pub struct AppState<P: ContentPlatform + SettingsStore> {
    pub platform: P,
    pub admin_token: Option<String>,
}

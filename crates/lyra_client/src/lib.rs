//! An HTTP implementation of the Lyra platform traits, speaking the
//! `lyra_server` API. Lets the seed pipeline run against a remote platform.

use bytes::Bytes;
use lyra_core::prelude::*;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone)]
pub struct HttpPlatform {
    base_url: String,
    client: Client,
    token: Option<String>,
}

#[derive(Serialize)]
struct CreatePermissionRequest<'a> {
    action: &'a str,
    role: u64,
}

#[derive(Serialize, Deserialize)]
struct FlagValue {
    value: Option<bool>,
}

fn net_err(error: reqwest::Error) -> PlatformError {
    PlatformError::Generic(format!("network error: {error}"))
}

impl HttpPlatform {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: Client::new(),
            token,
        }
    }

    fn auth_request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.token {
            builder.header("Authorization", format!("Bearer {token}"))
        } else {
            builder
        }
    }

    async fn check(response: Response) -> Result<Response, PlatformError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        Err(PlatformError::Generic(format!(
            "server returned {status}: {text}"
        )))
    }

    async fn json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, PlatformError> {
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|error| PlatformError::Generic(format!("failed to parse response: {error}")))
    }
}

impl ContentPlatform for HttpPlatform {
    async fn find_role(&self, role_type: &str) -> Result<Role, PlatformError> {
        let url = format!("{}/roles/{role_type}", self.base_url);
        let response = self
            .auth_request(self.client.get(&url))
            .send()
            .await
            .map_err(net_err)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(PlatformError::NotFound(format!("role: {role_type}")));
        }
        Self::json(response).await
    }

    async fn create_permission(&self, action: &str, role: u64) -> Result<Permission, PlatformError> {
        let url = format!("{}/permissions", self.base_url);
        let response = self
            .auth_request(self.client.post(&url))
            .json(&CreatePermissionRequest { action, role })
            .send()
            .await
            .map_err(net_err)?;
        Self::json(response).await
    }

    async fn find_permissions(&self, role: u64) -> Result<Vec<Permission>, PlatformError> {
        let url = format!("{}/roles/{role}/permissions", self.base_url);
        let response = self
            .auth_request(self.client.get(&url))
            .send()
            .await
            .map_err(net_err)?;
        Self::json(response).await
    }

    async fn find_file(&self, name: &str) -> Result<Option<Asset>, PlatformError> {
        let url = format!("{}/files/{name}", self.base_url);
        let response = self
            .auth_request(self.client.get(&url))
            .send()
            .await
            .map_err(net_err)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(Self::json(response).await?))
    }

    async fn upload_file(&self, data: Bytes, info: FileInfo) -> Result<Asset, PlatformError> {
        let url = format!("{}/files/{}", self.base_url, info.name);

        let mut query: Vec<(&str, &str)> = vec![("ext", info.ext.as_str())];
        if let Some(alt) = &info.alternative_text {
            query.push(("alt", alt));
        }
        if let Some(caption) = &info.caption {
            query.push(("caption", caption));
        }

        let response = self
            .auth_request(self.client.post(&url))
            .query(&query)
            .header("Content-Type", info.mime.clone())
            .body(data)
            .send()
            .await
            .map_err(net_err)?;
        Self::json(response).await
    }

    async fn create_record(&self, content_type: &str, data: Value) -> Result<Record, PlatformError> {
        let url = format!("{}/content/{content_type}", self.base_url);
        let response = self
            .auth_request(self.client.post(&url))
            .json(&data)
            .send()
            .await
            .map_err(net_err)?;
        Self::json(response).await
    }

    async fn find_records(&self, content_type: &str) -> Result<Vec<Record>, PlatformError> {
        let url = format!("{}/content/{content_type}", self.base_url);
        let response = self
            .auth_request(self.client.get(&url))
            .send()
            .await
            .map_err(net_err)?;
        Self::json(response).await
    }

    async fn find_record(
        &self,
        content_type: &str,
        id: u64,
    ) -> Result<Option<Record>, PlatformError> {
        let url = format!("{}/content/{content_type}/{id}", self.base_url);
        let response = self
            .auth_request(self.client.get(&url))
            .send()
            .await
            .map_err(net_err)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(Self::json(response).await?))
    }
}

impl SettingsStore for HttpPlatform {
    async fn get_flag(&self, namespace: &str, key: &str) -> Result<Option<bool>, PlatformError> {
        let url = format!("{}/settings/{namespace}/{key}", self.base_url);
        let response = self
            .auth_request(self.client.get(&url))
            .send()
            .await
            .map_err(net_err)?;
        let flag: FlagValue = Self::json(response).await?;
        Ok(flag.value)
    }

    async fn set_flag(&self, namespace: &str, key: &str, value: bool) -> Result<(), PlatformError> {
        let url = format!("{}/settings/{namespace}/{key}", self.base_url);
        let response = self
            .auth_request(self.client.put(&url))
            .json(&FlagValue { value: Some(value) })
            .send()
            .await
            .map_err(net_err)?;
        Self::check(response).await?;
        Ok(())
    }
}

//! Media resolution: look up a stored asset by logical name, upload on miss.

use std::path::PathBuf;

use bytes::Bytes;
use lyra_core::prelude::*;

use crate::SeedError;

/// The library lookup key and upload name: the file name up to its first dot.
fn logical_name(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

fn extension(file_name: &str) -> &str {
    file_name.rsplit('.').next().unwrap_or("")
}

#[derive(Clone)]
pub struct MediaResolver<P> {
    platform: P,
    uploads_dir: PathBuf,
}

impl<P: ContentPlatform> MediaResolver<P> {
    pub fn new(platform: P, uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            uploads_dir: uploads_dir.into(),
        }
    }

    /// Resolve file names against the media library.
    ///
    /// Names are checked one at a time; a hit reuses the stored asset, a miss
    /// uploads the file from the uploads directory. Exactly one input name
    /// yields a single asset; otherwise the result lists existing matches
    /// first and newly uploaded files after them — callers passing several
    /// names must not assume input order is preserved.
    pub async fn resolve<I, S>(&self, file_names: I) -> Result<MediaRef, SeedError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut existing = Vec::new();
        let mut uploaded = Vec::new();

        for file_name in file_names {
            let file_name = file_name.as_ref();
            match self.platform.find_file(logical_name(file_name)).await? {
                Some(found) => existing.push(found),
                None => uploaded.push(self.upload(file_name).await?),
            }
        }

        let mut all = existing;
        all.append(&mut uploaded);
        Ok(if all.len() == 1 {
            MediaRef::Asset(Box::new(all.remove(0)))
        } else {
            MediaRef::Assets(all)
        })
    }

    pub async fn resolve_one(&self, file_name: &str) -> Result<MediaRef, SeedError> {
        self.resolve([file_name]).await
    }

    /// Resolve a media slot in place when it still holds raw file names.
    pub async fn resolve_slot(&self, slot: &mut MediaRef) -> Result<(), SeedError> {
        let names = slot.names();
        if !names.is_empty() {
            *slot = self.resolve(&names).await?;
        }
        Ok(())
    }

    async fn upload(&self, file_name: &str) -> Result<Asset, SeedError> {
        let path = self.uploads_dir.join(file_name);
        let data = Bytes::from(tokio::fs::read(&path).await?);
        let mime = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .to_string();

        let name = logical_name(file_name).to_string();
        let info = FileInfo {
            alternative_text: Some(format!(
                "An image uploaded to the media library called {name}"
            )),
            caption: Some(name.clone()),
            name,
            ext: extension(file_name).to_string(),
            mime,
        };

        Ok(self.platform.upload_file(data, info).await?)
    }
}

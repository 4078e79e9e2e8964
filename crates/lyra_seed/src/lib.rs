//! The one-shot seed-import pipeline.
//!
//! Reads a JSON fixture plus a directory of upload files, resolves file-name
//! placeholders into stored media assets, and creates published records in a
//! [`ContentPlatform`](lyra_core::traits::ContentPlatform). A persisted
//! first-run flag makes the whole import run at most once per deployment.

pub mod blocks;
pub mod fixture;
mod importers;
pub mod media;
pub mod pipeline;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("platform error: {0}")]
    Platform(#[from] lyra_core::error::PlatformError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("fixture error: {0}")]
    Fixture(#[from] serde_json::Error),
}

pub mod prelude {
    pub use crate::SeedError;
    pub use crate::blocks::update_blocks;
    pub use crate::fixture::Fixture;
    pub use crate::media::MediaResolver;
    pub use crate::pipeline::{DEFAULT_PUBLIC_READ, SeedOutcome, Seeder};
}

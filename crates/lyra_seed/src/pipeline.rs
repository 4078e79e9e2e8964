//! The orchestrator: first-run gate, public permissions, importer ordering.

use std::path::PathBuf;

use futures::future;
use lyra_core::prelude::*;
use serde_json::Value;
use tracing::{error, info};

use crate::SeedError;
use crate::fixture::Fixture;
use crate::media::MediaResolver;

pub const SETUP_NAMESPACE: &str = "setup";
pub const INIT_FLAG_KEY: &str = "init_has_run";

const READ_ACTIONS: &[&str] = &["find", "find-one"];

/// Content types exposed to unauthenticated reads, with the actions granted.
pub const DEFAULT_PUBLIC_READ: &[(&str, &[&str])] = &[
    ("blog", READ_ACTIONS),
    ("article", READ_ACTIONS),
    ("category", READ_ACTIONS),
    ("author", READ_ACTIONS),
    ("global", READ_ACTIONS),
    ("about", READ_ACTIONS),
    ("contact", READ_ACTIONS),
    ("career-page", READ_ACTIONS),
    ("pricing", READ_ACTIONS),
    ("faq", READ_ACTIONS),
    ("home-page", READ_ACTIONS),
    ("home-feature", READ_ACTIONS),
    ("job-opening", READ_ACTIONS),
    ("policy-page", READ_ACTIONS),
    ("product", READ_ACTIONS),
    ("testimonial", READ_ACTIONS),
];

/// How a seeding run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// First run; the fixture was imported.
    Imported,
    /// The first-run flag was already set; nothing was written.
    AlreadyImported,
    /// The import started but did not finish; partial data remains.
    Failed,
}

pub struct Seeder<P> {
    pub(crate) platform: P,
    pub(crate) resolver: MediaResolver<P>,
    pub(crate) fixture: Fixture,
}

impl<P: ContentPlatform + SettingsStore> Seeder<P> {
    pub fn new(platform: P, fixture: Fixture, uploads_dir: impl Into<PathBuf>) -> Self {
        let resolver = MediaResolver::new(platform.clone(), uploads_dir);
        Self {
            platform,
            resolver,
            fixture,
        }
    }

    /// Run the one-shot import.
    ///
    /// A pipeline failure is logged and reported as [`SeedOutcome::Failed`]
    /// rather than an `Err`; only a failing first-run gate escapes as an
    /// error.
    pub async fn run(&self) -> Result<SeedOutcome, SeedError> {
        if !self.is_first_run().await? {
            info!("seed data has already been imported; clear the settings store to reimport");
            return Ok(SeedOutcome::AlreadyImported);
        }

        info!("importing seed data");
        match self.import_seed_data().await {
            Ok(()) => {
                info!("seed data imported");
                Ok(SeedOutcome::Imported)
            }
            Err(error) => {
                error!(%error, "could not import seed data");
                Ok(SeedOutcome::Failed)
            }
        }
    }

    /// The flag is set as a side effect of checking it, so an aborted import
    /// still blocks the next attempt until the settings store is cleared
    /// externally.
    async fn is_first_run(&self) -> Result<bool, SeedError> {
        let has_run = self
            .platform
            .get_flag(SETUP_NAMESPACE, INIT_FLAG_KEY)
            .await?
            .unwrap_or(false);
        self.platform
            .set_flag(SETUP_NAMESPACE, INIT_FLAG_KEY, true)
            .await?;
        Ok(!has_run)
    }

    /// Grant public read access, then run the importers in dependency order:
    /// referenced types (categories, authors) before the types referencing
    /// them. The order is assumed, not verified.
    async fn import_seed_data(&self) -> Result<(), SeedError> {
        self.set_public_permissions(DEFAULT_PUBLIC_READ).await?;

        self.import_categories().await?;
        self.import_authors().await?;
        self.import_blogs().await?;
        self.import_articles().await?;
        self.import_global().await?;
        self.import_about().await?;
        self.import_career_page().await?;
        self.import_contact().await?;
        self.import_contact_forms().await?;
        self.import_pricing().await?;
        self.import_faq().await?;
        self.import_home_page().await?;
        self.import_home_features().await?;
        self.import_testimonials().await?;
        self.import_policy_page().await?;
        self.import_job_openings().await?;
        self.import_job_applications().await?;
        self.import_products().await?;

        Ok(())
    }

    async fn set_public_permissions(&self, grants: &[(&str, &[&str])]) -> Result<(), SeedError> {
        let public_role = self.platform.find_role("public").await?;

        let actions: Vec<String> = grants
            .iter()
            .flat_map(|(content_type, actions)| {
                actions
                    .iter()
                    .map(move |action| format!("{content_type}.{action}"))
            })
            .collect();

        // All grants fire together; the first rejection fails the batch, and
        // grants already issued stay behind.
        future::try_join_all(
            actions
                .iter()
                .map(|action| self.platform.create_permission(action, public_role.id)),
        )
        .await?;

        Ok(())
    }

    /// Persist one entry. Failures are logged with their payload and
    /// swallowed so one bad record does not stop the run.
    pub(crate) async fn create_entry(&self, content_type: &str, entry: Value) {
        if let Err(error) = self
            .platform
            .create_record(content_type, entry.clone())
            .await
        {
            error!(content_type, %error, entry = %entry, "failed to create entry");
        }
    }
}

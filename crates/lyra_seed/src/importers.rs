//! One importer per content type. Each resolves the dataset's media
//! references, stamps a publication timestamp where the type is published,
//! and hands the merged entry to the platform.

use chrono::Utc;
use futures::future;
use lyra_core::prelude::*;
use serde_json::{Value, json};

use crate::SeedError;
use crate::blocks::update_blocks;
use crate::fixture::{FAVICON_FILE, SHARE_IMAGE_FILE};
use crate::pipeline::Seeder;

/// Stamp a publication timestamp so the entry is not a draft.
fn published(mut value: Value) -> Value {
    if let Some(map) = value.as_object_mut() {
        map.insert("publishedAt".to_string(), json!(Utc::now()));
    }
    value
}

impl<P: ContentPlatform + SettingsStore> Seeder<P> {
    pub(crate) async fn import_categories(&self) -> Result<(), SeedError> {
        for category in &self.fixture.categories {
            self.create_entry("category", category.clone()).await;
        }
        Ok(())
    }

    pub(crate) async fn import_authors(&self) -> Result<(), SeedError> {
        for author in &self.fixture.authors {
            let mut entry = author.clone();
            self.resolver.resolve_slot(&mut entry.avatar).await?;
            self.create_entry("author", serde_json::to_value(&entry)?)
                .await;
        }
        Ok(())
    }

    pub(crate) async fn import_blogs(&self) -> Result<(), SeedError> {
        for blog in &self.fixture.blogs {
            let mut entry = blog.clone();
            if let Some(content) = entry.content.take() {
                entry.content = Some(update_blocks(&self.resolver, &content).await?);
            }
            if let Some(cover) = entry.cover_image.as_mut() {
                self.resolver.resolve_slot(cover).await?;
            }
            self.create_entry("blog", published(serde_json::to_value(&entry)?))
                .await;
        }
        Ok(())
    }

    pub(crate) async fn import_articles(&self) -> Result<(), SeedError> {
        for article in &self.fixture.articles {
            let mut entry = article.clone();
            // The cover is not authored in the fixture; it is the upload
            // named after the slug.
            entry.cover = Some(
                self.resolver
                    .resolve_one(&format!("{}.jpg", entry.slug))
                    .await?,
            );
            entry.blocks = update_blocks(&self.resolver, &article.blocks).await?;
            self.create_entry("article", published(serde_json::to_value(&entry)?))
                .await;
        }
        Ok(())
    }

    pub(crate) async fn import_global(&self) -> Result<(), SeedError> {
        let Some(global) = &self.fixture.global else {
            return Ok(());
        };

        let mut entry = global.clone();
        entry.favicon = Some(self.resolver.resolve_one(FAVICON_FILE).await?);
        let share_image = self.resolver.resolve_one(SHARE_IMAGE_FILE).await?;
        entry
            .default_seo
            .insert("shareImage".to_string(), serde_json::to_value(&share_image)?);
        self.create_entry("global", published(serde_json::to_value(&entry)?))
            .await;
        Ok(())
    }

    pub(crate) async fn import_about(&self) -> Result<(), SeedError> {
        let Some(about) = &self.fixture.about else {
            return Ok(());
        };

        let mut entry = about.clone();
        entry.blocks = update_blocks(&self.resolver, &about.blocks).await?;
        self.create_entry("about", published(serde_json::to_value(&entry)?))
            .await;
        Ok(())
    }

    pub(crate) async fn import_career_page(&self) -> Result<(), SeedError> {
        let Some(career) = &self.fixture.career_page else {
            return Ok(());
        };

        let mut entry = career.clone();
        self.resolver.resolve_slot(&mut entry.hero_image).await?;

        let cards = std::mem::take(&mut entry.culture_cards);
        entry.culture_cards = future::try_join_all(cards.into_iter().map(|mut card| async move {
            self.resolver.resolve_slot(&mut card.image).await?;
            Ok::<_, SeedError>(card)
        }))
        .await?;

        self.create_entry("career-page", serde_json::to_value(&entry)?)
            .await;
        Ok(())
    }

    pub(crate) async fn import_contact(&self) -> Result<(), SeedError> {
        let Some(contact) = &self.fixture.contact else {
            return Ok(());
        };
        self.create_entry("contact", published(contact.clone()))
            .await;
        Ok(())
    }

    pub(crate) async fn import_contact_forms(&self) -> Result<(), SeedError> {
        for form in &self.fixture.contact_forms {
            self.create_entry("contact-form", form.clone()).await;
        }
        Ok(())
    }

    pub(crate) async fn import_pricing(&self) -> Result<(), SeedError> {
        let Some(pricing) = &self.fixture.pricing else {
            return Ok(());
        };
        self.create_entry("pricing", published(pricing.clone()))
            .await;
        Ok(())
    }

    pub(crate) async fn import_faq(&self) -> Result<(), SeedError> {
        let Some(faq) = &self.fixture.faq else {
            return Ok(());
        };
        self.create_entry("faq", published(faq.clone())).await;
        Ok(())
    }

    pub(crate) async fn import_home_page(&self) -> Result<(), SeedError> {
        let Some(home) = &self.fixture.home_page else {
            return Ok(());
        };

        let mut entry = home.clone();

        if let Some(image) = entry.hero.as_mut().and_then(|h| h.hero_image.as_mut()) {
            self.resolver.resolve_slot(image).await?;
        }

        let services = std::mem::take(&mut entry.services);
        entry.services = future::try_join_all(services.into_iter().map(|mut service| async move {
            self.resolver.resolve_slot(&mut service.image).await?;
            Ok::<_, SeedError>(service)
        }))
        .await?;

        if let Some(featured) = entry.featured.as_mut() {
            self.resolver
                .resolve_slot(&mut featured.left_card.image)
                .await?;
            self.resolver
                .resolve_slot(&mut featured.right_card.image)
                .await?;
        }

        self.create_entry("home-page", published(serde_json::to_value(&entry)?))
            .await;
        Ok(())
    }

    pub(crate) async fn import_home_features(&self) -> Result<(), SeedError> {
        for feature in &self.fixture.home_features {
            let mut entry = feature.clone();
            self.resolver.resolve_slot(&mut entry.image).await?;
            self.create_entry("home-feature", serde_json::to_value(&entry)?)
                .await;
        }
        Ok(())
    }

    pub(crate) async fn import_testimonials(&self) -> Result<(), SeedError> {
        for testimonial in &self.fixture.testimonials {
            let mut entry = testimonial.clone();
            self.resolver.resolve_slot(&mut entry.image).await?;
            self.create_entry("testimonial", serde_json::to_value(&entry)?)
                .await;
        }
        Ok(())
    }

    pub(crate) async fn import_policy_page(&self) -> Result<(), SeedError> {
        let Some(policy) = &self.fixture.policy_page else {
            return Ok(());
        };
        self.create_entry("policy-page", policy.clone()).await;
        Ok(())
    }

    pub(crate) async fn import_job_openings(&self) -> Result<(), SeedError> {
        for opening in &self.fixture.job_openings {
            self.create_entry("job-opening", opening.clone()).await;
        }
        Ok(())
    }

    pub(crate) async fn import_job_applications(&self) -> Result<(), SeedError> {
        for application in &self.fixture.job_applications {
            let mut entry = application.clone();
            self.resolver.resolve_slot(&mut entry.resume).await?;
            self.create_entry("job-application", serde_json::to_value(&entry)?)
                .await;
        }
        Ok(())
    }

    pub(crate) async fn import_products(&self) -> Result<(), SeedError> {
        for product in &self.fixture.products {
            let mut entry = product.clone();
            self.resolver.resolve_slot(&mut entry.thumbnail).await?;

            // An empty image list is dropped rather than resolved to nothing.
            if let Some(images) = entry.images.take() {
                if !images.names().is_empty() {
                    let mut images = images;
                    self.resolver.resolve_slot(&mut images).await?;
                    entry.images = Some(images);
                }
            }

            self.create_entry("product", published(serde_json::to_value(&entry)?))
                .await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::Fixture;
    use crate::pipeline::SeedOutcome;
    use lyra_mem::MemPlatform;
    use serde_json::json;
    use tempfile::TempDir;

    fn uploads(files: &[&str]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in files {
            std::fs::write(dir.path().join(name), b"pixels").unwrap();
        }
        dir
    }

    async fn seed(fixture: Value, files: &[&str]) -> MemPlatform {
        let dir = uploads(files);
        let platform = MemPlatform::new();
        let fixture: Fixture = serde_json::from_value(fixture).unwrap();
        let seeder = Seeder::new(platform.clone(), fixture, dir.path());
        assert_eq!(seeder.run().await.unwrap(), SeedOutcome::Imported);
        platform
    }

    #[tokio::test]
    async fn global_nests_the_share_image_into_seo_defaults() {
        let platform = seed(
            json!({"global": {"siteName": "Lyra", "defaultSeo": {"metaTitle": "Lyra"}}}),
            &["favicon.png", "default-image.png"],
        )
        .await;

        let global = &platform.find_records("global").await.unwrap()[0];
        assert_eq!(global.data["favicon"]["name"], json!("favicon"));
        assert_eq!(global.data["defaultSeo"]["metaTitle"], json!("Lyra"));
        assert_eq!(
            global.data["defaultSeo"]["shareImage"]["name"],
            json!("default-image")
        );
        assert!(global.data["publishedAt"].is_string());
    }

    #[tokio::test]
    async fn career_page_resolves_hero_and_culture_cards() {
        let platform = seed(
            json!({"careerPage": {
                "heroImage": "careers-hero.jpg",
                "cultureCards": [
                    {"title": "Craft", "image": "craft.jpg"},
                    {"title": "Care", "image": "care.jpg"}
                ]
            }}),
            &["careers-hero.jpg", "craft.jpg", "care.jpg"],
        )
        .await;

        let career = &platform.find_records("career-page").await.unwrap()[0];
        assert_eq!(career.data["heroImage"]["name"], json!("careers-hero"));
        assert_eq!(career.data["cultureCards"][1]["image"]["name"], json!("care"));
        // This type stays unpublished.
        assert!(career.data.get("publishedAt").is_none());
    }

    #[tokio::test]
    async fn home_page_resolves_hero_services_and_featured_cards() {
        let platform = seed(
            json!({"homePage": {
                "hero": {"title": "Shine", "heroImage": "home-hero.jpg"},
                "services": [{"title": "Windows", "image": "windows.jpg"}],
                "featured": {
                    "leftCard": {"title": "Sprayer", "image": "sprayer.jpg"},
                    "rightCard": {"title": "Cloth", "image": "cloth.jpg"}
                }
            }}),
            &["home-hero.jpg", "windows.jpg", "sprayer.jpg", "cloth.jpg"],
        )
        .await;

        let home = &platform.find_records("home-page").await.unwrap()[0];
        assert_eq!(home.data["hero"]["heroImage"]["name"], json!("home-hero"));
        assert_eq!(home.data["hero"]["title"], json!("Shine"));
        assert_eq!(home.data["services"][0]["image"]["name"], json!("windows"));
        assert_eq!(home.data["featured"]["leftCard"]["image"]["name"], json!("sprayer"));
        assert_eq!(home.data["featured"]["rightCard"]["image"]["name"], json!("cloth"));
    }

    #[tokio::test]
    async fn products_resolve_thumbnail_and_image_list() {
        let platform = seed(
            json!({"products": [
                {"name": "Sprayer", "thumbnail": "sprayer.jpg",
                 "images": ["sprayer-side.jpg", "sprayer-top.jpg"]},
                {"name": "Cloth", "thumbnail": "cloth.jpg", "images": []}
            ]}),
            &["sprayer.jpg", "sprayer-side.jpg", "sprayer-top.jpg", "cloth.jpg"],
        )
        .await;

        let products = platform.find_records("product").await.unwrap();
        assert_eq!(products[0].data["images"].as_array().unwrap().len(), 2);
        assert!(products[0].data["thumbnail"].is_object());
        // The empty list was dropped, not resolved to [].
        assert!(products[1].data.get("images").is_none());
    }

    #[tokio::test]
    async fn blogs_rewrite_content_and_cover_when_present() {
        let platform = seed(
            json!({"blogs": [
                {"title": "Suds", "content": [{"component": "image", "image": "suds.jpg"}],
                 "coverImage": "suds-cover.jpg"},
                {"title": "Bare"}
            ]}),
            &["suds.jpg", "suds-cover.jpg"],
        )
        .await;

        let blogs = platform.find_records("blog").await.unwrap();
        assert!(blogs[0].data["coverImage"].is_object());
        assert!(blogs[0].data["content"][0]["image"].is_object());
        assert!(blogs[1].data.get("coverImage").is_none());
        assert!(blogs[1].data["publishedAt"].is_string());
    }

    #[tokio::test]
    async fn pass_through_types_keep_their_shape() {
        let platform = seed(
            json!({
                "contactForms": [{"email": "a@example.com"}, {"email": "b@example.com"}],
                "jobOpenings": [{"title": "Cleaner", "location": "Remote"}],
                "policyPage": {"title": "Privacy"}
            }),
            &[],
        )
        .await;

        assert_eq!(platform.record_count("contact-form"), 2);
        let opening = &platform.find_records("job-opening").await.unwrap()[0];
        assert_eq!(
            opening.data,
            json!({"title": "Cleaner", "location": "Remote"})
        );
        // Pass-through types are not stamped.
        assert!(opening.data.get("publishedAt").is_none());
    }
}

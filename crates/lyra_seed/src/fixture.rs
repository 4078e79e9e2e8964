//! The seed fixture: one JSON document carrying a named dataset per content
//! type, plus an uploads directory holding the referenced binary files.
//!
//! Only the fields the pipeline has to touch are modeled; everything else a
//! dataset carries rides along in a flattened remainder map and reaches the
//! platform untouched.

use std::path::Path;

use lyra_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::SeedError;
use crate::blocks::block_file_names;

/// Favicon uploaded for the global settings entry.
pub const FAVICON_FILE: &str = "favicon.png";
/// Fallback share image uploaded for the global SEO defaults.
pub const SHARE_IMAGE_FILE: &str = "default-image.png";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fixture {
    pub categories: Vec<Value>,
    pub authors: Vec<Author>,
    pub blogs: Vec<Blog>,
    pub articles: Vec<Article>,
    pub global: Option<Global>,
    pub about: Option<About>,
    pub career_page: Option<CareerPage>,
    pub contact: Option<Value>,
    pub contact_forms: Vec<Value>,
    pub pricing: Option<Value>,
    pub faq: Option<Value>,
    pub home_page: Option<HomePage>,
    pub home_features: Vec<HomeFeature>,
    pub testimonials: Vec<Testimonial>,
    pub policy_page: Option<Value>,
    pub job_openings: Vec<Value>,
    pub job_applications: Vec<JobApplication>,
    pub products: Vec<Product>,
}

impl Fixture {
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let raw = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&raw)?)
    }

    /// Every file name the import pipeline would try to resolve, deduplicated
    /// and sorted. Drives the CLI preflight check.
    pub fn referenced_files(&self) -> Vec<String> {
        let mut files: Vec<String> = Vec::new();

        for author in &self.authors {
            files.extend(author.avatar.names());
        }
        for blog in &self.blogs {
            if let Some(content) = &blog.content {
                files.extend(block_file_names(content));
            }
            if let Some(cover) = &blog.cover_image {
                files.extend(cover.names());
            }
        }
        for article in &self.articles {
            files.push(format!("{}.jpg", article.slug));
            files.extend(block_file_names(&article.blocks));
        }
        if self.global.is_some() {
            files.push(FAVICON_FILE.to_string());
            files.push(SHARE_IMAGE_FILE.to_string());
        }
        if let Some(about) = &self.about {
            files.extend(block_file_names(&about.blocks));
        }
        if let Some(career) = &self.career_page {
            files.extend(career.hero_image.names());
            for card in &career.culture_cards {
                files.extend(card.image.names());
            }
        }
        if let Some(home) = &self.home_page {
            if let Some(image) = home.hero.as_ref().and_then(|h| h.hero_image.as_ref()) {
                files.extend(image.names());
            }
            for service in &home.services {
                files.extend(service.image.names());
            }
            if let Some(featured) = &home.featured {
                files.extend(featured.left_card.image.names());
                files.extend(featured.right_card.image.names());
            }
        }
        for feature in &self.home_features {
            files.extend(feature.image.names());
        }
        for testimonial in &self.testimonials {
            files.extend(testimonial.image.names());
        }
        for application in &self.job_applications {
            files.extend(application.resume.names());
        }
        for product in &self.products {
            files.extend(product.thumbnail.names());
            if let Some(images) = &product.images {
                files.extend(images.names());
            }
        }

        files.sort();
        files.dedup();
        files
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub avatar: MediaRef,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Block>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<MediaRef>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub slug: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
    /// Derived from the slug by the importer; never authored in the fixture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<MediaRef>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Global {
    #[serde(default)]
    pub default_seo: Map<String, Value>,
    /// Set by the importer from [`FAVICON_FILE`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<MediaRef>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerPage {
    pub hero_image: MediaRef,
    #[serde(default)]
    pub culture_cards: Vec<CultureCard>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CultureCard {
    pub image: MediaRef,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<Hero>,
    #[serde(default)]
    pub services: Vec<ServiceCard>,
    /// The two featured-product cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<FeaturedCards>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<MediaRef>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCard {
    pub image: MediaRef,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedCards {
    pub left_card: FeatureCard,
    pub right_card: FeatureCard,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureCard {
    pub image: MediaRef,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeFeature {
    pub image: MediaRef,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub image: MediaRef,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub resume: MediaRef,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub thumbnail: MediaRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<MediaRef>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

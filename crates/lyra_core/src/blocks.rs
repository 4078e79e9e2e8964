//! Content blocks: the tagged units of rich content inside a record body.
//!
//! Blocks are discriminated by their `component` field. Dispatch is explicit:
//! [`Block`] deserializes by inspecting the discriminator and picking the
//! matching [`KnownBlock`] case, and anything unrecognized lands in
//! [`Block::Unknown`] and round-trips untouched, so fixtures may carry block
//! types the pipeline knows nothing about.
//!
//! The discriminator itself stays inside each block's `rest` map, which keeps
//! serialization a plain pass-through of the original shape.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::content::MediaRef;

/// JSON key carrying the block discriminator.
pub const COMPONENT_KEY: &str = "component";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Block {
    Known(KnownBlock),
    Unknown(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KnownBlock {
    Media(MediaBlock),
    Hero(HeroBlock),
    StorySection(StorySectionBlock),
    Manifesto(ManifestoBlock),
    Mission(MissionBlock),
    Slider(SliderBlock),
    Image(ImageBlock),
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let component = value
            .get(COMPONENT_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default();

        let known = match component {
            "media" => serde_json::from_value(value.clone()).map(KnownBlock::Media),
            "hero" => serde_json::from_value(value.clone()).map(KnownBlock::Hero),
            "story-section" => serde_json::from_value(value.clone()).map(KnownBlock::StorySection),
            "manifesto" => serde_json::from_value(value.clone()).map(KnownBlock::Manifesto),
            "mission" => serde_json::from_value(value.clone()).map(KnownBlock::Mission),
            "slider" => serde_json::from_value(value.clone()).map(KnownBlock::Slider),
            "image" => serde_json::from_value(value.clone()).map(KnownBlock::Image),
            _ => return Ok(Block::Unknown(value)),
        };

        // A known discriminator with an unexpected shape passes through as-is.
        Ok(match known {
            Ok(block) => Block::Known(block),
            Err(_) => Block::Unknown(value),
        })
    }
}

/// A single embedded media file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaBlock {
    pub file: MediaRef,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Full-width hero section with a background image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroBlock {
    #[serde(rename = "backgroundImage")]
    pub background_image: MediaRef,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Alternating text/image rows; each item carries its own image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorySectionBlock {
    pub items: Vec<StoryItem>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryItem {
    pub image: MediaRef,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestoBlock {
    pub image: MediaRef,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionBlock {
    pub image: MediaRef,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// A gallery of several media files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderBlock {
    pub files: MediaRef,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// An inline illustration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub image: MediaRef,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dispatches_on_component() {
        let raw = json!({
            "component": "media",
            "file": "beach.jpg",
            "caption": "A beach"
        });

        let block: Block = serde_json::from_value(raw.clone()).unwrap();
        match &block {
            Block::Known(KnownBlock::Media(media)) => {
                assert_eq!(media.file, MediaRef::Name("beach.jpg".to_string()));
                assert_eq!(media.rest["caption"], json!("A beach"));
            }
            other => panic!("expected a media block, got {other:?}"),
        }

        // The discriminator survives a round trip via the rest map.
        assert_eq!(serde_json::to_value(&block).unwrap(), raw);
    }

    #[test]
    fn slider_holds_a_name_list() {
        let block: Block = serde_json::from_value(json!({
            "component": "slider",
            "files": ["one.jpg", "two.jpg"]
        }))
        .unwrap();

        match block {
            Block::Known(KnownBlock::Slider(slider)) => {
                assert_eq!(slider.files.names(), vec!["one.jpg", "two.jpg"]);
            }
            other => panic!("expected a slider block, got {other:?}"),
        }
    }

    #[test]
    fn unknown_component_round_trips() {
        let raw = json!({
            "component": "quote",
            "body": "We clean, you relax.",
            "attribution": "A happy customer"
        });

        let block: Block = serde_json::from_value(raw.clone()).unwrap();
        assert!(matches!(block, Block::Unknown(_)));
        assert_eq!(serde_json::to_value(&block).unwrap(), raw);
    }

    #[test]
    fn known_component_with_unexpected_shape_passes_through() {
        let raw = json!({
            "component": "media",
            "src": 42
        });

        let block: Block = serde_json::from_value(raw.clone()).unwrap();
        assert!(matches!(block, Block::Unknown(_)));
        assert_eq!(serde_json::to_value(&block).unwrap(), raw);
    }
}

//! Block rewriting: replace file-name placeholders inside content blocks
//! with resolved media references.

use futures::future;
use lyra_core::prelude::*;

use crate::SeedError;
use crate::media::MediaResolver;

/// Rewrite a block sequence, resolving every media placeholder.
///
/// Blocks with an unrecognized discriminator pass through unchanged. The
/// input is never mutated; the result is a fresh sequence.
pub async fn update_blocks<P: ContentPlatform>(
    resolver: &MediaResolver<P>,
    blocks: &[Block],
) -> Result<Vec<Block>, SeedError> {
    let mut updated = Vec::with_capacity(blocks.len());
    for block in blocks {
        updated.push(update_block(resolver, block).await?);
    }
    Ok(updated)
}

async fn update_block<P: ContentPlatform>(
    resolver: &MediaResolver<P>,
    block: &Block,
) -> Result<Block, SeedError> {
    let Block::Known(known) = block else {
        return Ok(block.clone());
    };

    let updated = match known {
        KnownBlock::Media(media) => {
            let mut copy = media.clone();
            resolver.resolve_slot(&mut copy.file).await?;
            KnownBlock::Media(copy)
        }
        KnownBlock::Hero(hero) => {
            let mut copy = hero.clone();
            resolver.resolve_slot(&mut copy.background_image).await?;
            KnownBlock::Hero(copy)
        }
        KnownBlock::StorySection(section) => {
            let mut copy = section.clone();
            let items = std::mem::take(&mut copy.items);
            copy.items = future::try_join_all(items.into_iter().map(|mut item| async move {
                resolver.resolve_slot(&mut item.image).await?;
                Ok::<_, SeedError>(item)
            }))
            .await?;
            KnownBlock::StorySection(copy)
        }
        KnownBlock::Manifesto(manifesto) => {
            let mut copy = manifesto.clone();
            resolver.resolve_slot(&mut copy.image).await?;
            KnownBlock::Manifesto(copy)
        }
        KnownBlock::Mission(mission) => {
            let mut copy = mission.clone();
            resolver.resolve_slot(&mut copy.image).await?;
            KnownBlock::Mission(copy)
        }
        KnownBlock::Slider(slider) => {
            let mut copy = slider.clone();
            resolver.resolve_slot(&mut copy.files).await?;
            KnownBlock::Slider(copy)
        }
        KnownBlock::Image(image) => {
            let mut copy = image.clone();
            resolver.resolve_slot(&mut copy.image).await?;
            KnownBlock::Image(copy)
        }
    };

    Ok(Block::Known(updated))
}

/// File names a block rewrite would resolve. Used for preflight checks.
pub fn block_file_names(blocks: &[Block]) -> Vec<String> {
    let mut names = Vec::new();
    for block in blocks {
        let Block::Known(known) = block else { continue };
        match known {
            KnownBlock::Media(b) => names.extend(b.file.names()),
            KnownBlock::Hero(b) => names.extend(b.background_image.names()),
            KnownBlock::StorySection(b) => {
                for item in &b.items {
                    names.extend(item.image.names());
                }
            }
            KnownBlock::Manifesto(b) => names.extend(b.image.names()),
            KnownBlock::Mission(b) => names.extend(b.image.names()),
            KnownBlock::Slider(b) => names.extend(b.files.names()),
            KnownBlock::Image(b) => names.extend(b.image.names()),
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn parse_blocks(raw: serde_json::Value) -> Vec<Block> {
        serde_json::from_value(raw).unwrap()
    }

    #[tokio::test]
    async fn unknown_blocks_pass_through_unchanged() {
        let dir = uploads(&[]);
        let resolver = MediaResolver::new(MemPlatform::new(), dir.path());
        let blocks = parse_blocks(json!([
            {"component": "quote", "body": "We clean, you relax."},
            {"component": "rich-text", "body": "# Hello"}
        ]));

        let updated = update_blocks(&resolver, &blocks).await.unwrap();
        assert_eq!(updated, blocks);
    }

    #[tokio::test]
    async fn media_and_image_fields_are_resolved() {
        let dir = uploads(&["droplet.jpg", "team.png"]);
        let resolver = MediaResolver::new(MemPlatform::new(), dir.path());
        let blocks = parse_blocks(json!([
            {"component": "media", "file": "droplet.jpg"},
            {"component": "image", "image": "team.png", "alt": "The team"}
        ]));

        let updated = update_blocks(&resolver, &blocks).await.unwrap();

        let Block::Known(KnownBlock::Media(media)) = &updated[0] else {
            panic!("expected a media block");
        };
        assert!(media.file.is_resolved());

        let Block::Known(KnownBlock::Image(image)) = &updated[1] else {
            panic!("expected an image block");
        };
        assert!(image.image.is_resolved());
        assert_eq!(image.rest["alt"], json!("The team"));
    }

    #[tokio::test]
    async fn story_items_are_each_resolved() {
        let dir = uploads(&["one.jpg", "two.jpg"]);
        let resolver = MediaResolver::new(MemPlatform::new(), dir.path());
        let blocks = parse_blocks(json!([{
            "component": "story-section",
            "items": [
                {"eyebrow": "Then", "image": "one.jpg"},
                {"eyebrow": "Now", "image": "two.jpg"}
            ]
        }]));

        let updated = update_blocks(&resolver, &blocks).await.unwrap();
        let Block::Known(KnownBlock::StorySection(section)) = &updated[0] else {
            panic!("expected a story section");
        };
        assert!(section.items.iter().all(|item| item.image.is_resolved()));
        assert_eq!(section.items[0].rest["eyebrow"], json!("Then"));
    }

    #[tokio::test]
    async fn slider_resolves_its_whole_file_list() {
        let dir = uploads(&["one.jpg", "two.jpg"]);
        let resolver = MediaResolver::new(MemPlatform::new(), dir.path());
        let blocks = parse_blocks(json!([{
            "component": "slider",
            "files": ["one.jpg", "two.jpg"]
        }]));

        let updated = update_blocks(&resolver, &blocks).await.unwrap();
        let Block::Known(KnownBlock::Slider(slider)) = &updated[0] else {
            panic!("expected a slider block");
        };
        let MediaRef::Assets(assets) = &slider.files else {
            panic!("expected an asset list");
        };
        assert_eq!(assets.len(), 2);
    }

    #[tokio::test]
    async fn input_blocks_are_not_mutated() {
        let dir = uploads(&["droplet.jpg"]);
        let resolver = MediaResolver::new(MemPlatform::new(), dir.path());
        let blocks = parse_blocks(json!([{"component": "media", "file": "droplet.jpg"}]));
        let before = blocks.clone();

        let updated = update_blocks(&resolver, &blocks).await.unwrap();

        assert_eq!(blocks, before);
        assert_ne!(updated[0], blocks[0]);
    }

    #[test]
    fn file_name_listing_covers_nested_items() {
        let blocks = parse_blocks(json!([
            {"component": "media", "file": "a.jpg"},
            {"component": "story-section", "items": [{"image": "b.jpg"}]},
            {"component": "slider", "files": ["c.jpg", "d.jpg"]},
            {"component": "quote", "body": "no media here"}
        ]));

        assert_eq!(block_file_names(&blocks), ["a.jpg", "b.jpg", "c.jpg", "d.jpg"]);
    }
}

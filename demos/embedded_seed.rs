//! Seed an in-memory platform from a small fixture, then dump the resulting
//! platform state as JSON.
//!
//! Run with: `cargo run --example embedded_seed --features "seed mem"`

use lyra::prelude::*;
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Stand-in upload files for the fixture's references.
    let dir = tempfile::tempdir()?;
    for name in ["sarah.jpg", "droplet.jpg", "droplet-macro.jpg"] {
        std::fs::write(dir.path().join(name), b"not really an image")?;
    }

    let fixture: Fixture = serde_json::from_value(json!({
        "categories": [{"name": "news", "slug": "news"}],
        "authors": [{"name": "Sarah Baker", "email": "sarah@example.com", "avatar": "sarah.jpg"}],
        "articles": [{
            "title": "What's inside a droplet",
            "slug": "droplet",
            "blocks": [
                {"component": "media", "file": "droplet-macro.jpg"},
                {"component": "quote", "body": "Mostly water."}
            ]
        }]
    }))?;

    let platform = MemPlatform::new();
    let seeder = Seeder::new(platform.clone(), fixture, dir.path());

    match seeder.run().await? {
        SeedOutcome::Imported => println!("✅ Imported."),
        outcome => println!("Nothing imported: {outcome:?}"),
    }

    println!("{}", serde_json::to_string_pretty(&platform.snapshot())?);
    Ok(())
}

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lyra_client::HttpPlatform;
use lyra_seed::prelude::*;
use rand::Rng;
use rand::distr::Alphanumeric;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "lyra")]
#[command(about = "CLI for the Lyra content platform toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Platform URL
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[arg(short, long, env = "LYRA_TOKEN")]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the one-shot fixture import against the platform
    Seed {
        /// Directory containing data.json and an uploads/ subdirectory
        #[arg(long, default_value = "data")]
        data: PathBuf,
    },
    /// Compare the uploads directory against the fixture's file references
    Check {
        #[arg(long, default_value = "data")]
        data: PathBuf,
    },
    /// Generate a random admin token
    GenerateToken,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Seed { data } => {
            let fixture_path = data.join("data.json");
            let fixture = Fixture::from_path(&fixture_path)
                .await
                .with_context(|| format!("failed to load fixture from {fixture_path:?}"))?;

            let platform = HttpPlatform::new(cli.url.clone(), cli.token.clone());
            let seeder = Seeder::new(platform, fixture, data.join("uploads"));

            match seeder.run().await? {
                SeedOutcome::Imported => println!("✅ Seed data imported."),
                SeedOutcome::AlreadyImported => println!(
                    "Seed data has already been imported. We cannot reimport unless you clear the platform first."
                ),
                SeedOutcome::Failed => {
                    println!("⚠️ Could not import seed data; see the log output above.")
                }
            }
        }
        Commands::Check { data } => {
            let fixture = Fixture::from_path(data.join("data.json")).await?;
            let referenced: BTreeSet<String> = fixture.referenced_files().into_iter().collect();

            let uploads = data.join("uploads");
            let mut present = BTreeSet::new();
            for entry in WalkDir::new(&uploads) {
                let entry = entry?;
                if entry.file_type().is_dir() {
                    continue;
                }
                present.insert(entry.file_name().to_string_lossy().to_string());
            }

            for name in present.difference(&referenced) {
                println!("unreferenced: {name}");
            }
            let missing: Vec<&String> = referenced.difference(&present).collect();
            for name in &missing {
                println!("missing: {name}");
            }

            if missing.is_empty() {
                println!("✅ All {} referenced files are present.", referenced.len());
            } else {
                anyhow::bail!("{} referenced file(s) missing from {uploads:?}", missing.len());
            }
        }
        Commands::GenerateToken => {
            let token: String = rand::rng()
                .sample_iter(&Alphanumeric)
                .take(48)
                .map(char::from)
                .collect();

            println!("🔑 Generated admin token:");
            println!("\n    {}\n", token);
            println!("Set it on your server and hand it to the CLI:");
            println!("set LYRA_TOKEN=\"{}\"", token);
        }
    }

    Ok(())
}

//! Seed, clear or inspect a Hireboard document store.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, bail};
use hireboard::config::StoreSettings;
use hireboard::domain::DocumentAccess;
use hireboard::domain::ports::CollectionName;
use hireboard::outbound::firestore::FirestoreDocumentStore;
use hireboard::outbound::password::Argon2CredentialHasher;
use hireboard::outbound::persistence::{
    DocumentCatalogueRepository, DocumentJobPostingRepository, DocumentUserRepository,
};
use hireboard::seeding::{SampleDataSeeder, SeedTargets};
use mockable::DefaultClock;
use sample_data::SampleDataset;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `hireboard-seed` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "hireboard-seed",
    about = "Seed, clear or inspect a Hireboard document store",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write sample categories, accounts and job postings.
    Seed {
        /// Dataset file; the bundled dataset is used when omitted.
        #[arg(long, value_name = "path")]
        dataset: Option<PathBuf>,
    },
    /// Delete every document of the named collections.
    Clear {
        /// Collection to clear; repeat for several.
        #[arg(long = "collection", value_name = "name", required = true)]
        collections: Vec<CollectionName>,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Print every account without credentials.
    ListUsers,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let seeder = build_seeder()?;

    match args.command {
        Command::Seed { dataset } => {
            let dataset = match dataset {
                Some(path) => SampleDataset::from_file(&path)
                    .wrap_err_with(|| format!("load dataset {}", path.display()))?,
                None => SampleDataset::embedded().wrap_err("load bundled dataset")?,
            };
            let outcome = seeder.seed(&dataset).await.wrap_err("seed store")?;
            println!(
                "categories created={} skipped={}",
                outcome.categories_created, outcome.categories_skipped
            );
            println!(
                "users created={} skipped={}",
                outcome.users_created, outcome.users_skipped
            );
            println!(
                "job postings created={} skipped={}",
                outcome.postings_created, outcome.postings_skipped
            );
        }
        Command::Clear { collections, yes } => {
            if !yes {
                bail!("refusing to clear without --yes");
            }
            let removed = seeder
                .clear(&collections)
                .await
                .wrap_err("clear collections")?;
            println!("removed={removed}");
        }
        Command::ListUsers => {
            for user in seeder.list_users().await.wrap_err("list users")? {
                let id = user.id.as_ref().map_or("-", |id| id.as_str());
                println!(
                    "{id}\t{}\t{}\t{}",
                    user.email,
                    user.user_type.as_str(),
                    user.name
                );
            }
        }
    }
    Ok(())
}

fn build_seeder() -> Result<SampleDataSeeder> {
    let config = StoreSettings::from_env()?.firestore_config()?;
    let store = FirestoreDocumentStore::new(config).wrap_err("build Firestore client")?;
    let clock = Arc::new(DefaultClock);
    let access = DocumentAccess::new(Arc::new(store), clock.clone());
    let targets = SeedTargets {
        users: Arc::new(DocumentUserRepository::new(access.clone())),
        postings: Arc::new(DocumentJobPostingRepository::new(access.clone())),
        catalogue: Arc::new(DocumentCatalogueRepository::new(access.clone())),
        access,
    };
    Ok(SampleDataSeeder::new(
        targets,
        Arc::new(Argon2CredentialHasher),
        clock,
    ))
}

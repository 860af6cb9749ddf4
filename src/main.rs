//! CLI entry point for the sitedata tool.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use sitedata_core::{
    CollectionClient, Collections, MediaError, MediaProxy, MediaSigner, RecordData, Sheet, SiteConfig,
    build_http_client,
};
use tracing::{debug, info};

mod cli;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let config = SiteConfig::from_env().context("failed to load configuration")?;
    let http = build_http_client().context("failed to build HTTP client")?;

    match args.command {
        Command::List { collection, strict } => {
            let collections = Collections::new(&http, &config);
            match Sheet::from(collection) {
                Sheet::Blog => list(&collections.blog, strict).await,
                Sheet::Events => list(&collections.events, strict).await,
                Sheet::Brochures => list(&collections.brochures, strict).await,
                Sheet::Subscribers => list(&collections.subscribers, strict).await,
                Sheet::Popups => list(&collections.popups, strict).await,
                Sheet::Applications => list(&collections.applications, strict).await,
                Sheet::CourseOfferings => list(&collections.course_offerings, strict).await,
            }
        }
        Command::Get { collection, id } => {
            let collections = Collections::new(&http, &config);
            match Sheet::from(collection) {
                Sheet::Blog => get(&collections.blog, &id).await,
                Sheet::Events => get(&collections.events, &id).await,
                Sheet::Brochures => get(&collections.brochures, &id).await,
                Sheet::Subscribers => get(&collections.subscribers, &id).await,
                Sheet::Popups => get(&collections.popups, &id).await,
                Sheet::Applications => get(&collections.applications, &id).await,
                Sheet::CourseOfferings => get(&collections.course_offerings, &id).await,
            }
        }
        Command::Setup { collection } => {
            let collections = Collections::new(&http, &config);
            match collection {
                Some(collection) => {
                    let sheet = Sheet::from(collection);
                    collections
                        .setup(sheet)
                        .await
                        .with_context(|| format!("failed to provision {sheet}"))?;
                    info!(%sheet, "sheet provisioned");
                }
                None => collections
                    .setup_all()
                    .await
                    .context("failed to provision sheets")?,
            }
            Ok(())
        }
        Command::Download { url, name, output } => {
            let proxy = MediaProxy::new(http, config.media.map(MediaSigner::new));
            download(&proxy, &url, &name, &output).await
        }
        Command::SignUpload { folder, kind } => {
            let Some(media) = config.media else {
                return Err(MediaError::NotConfigured.into());
            };
            let upload = MediaSigner::new(media).upload_signature(&folder, kind.into());
            print_json(&upload)
        }
    }
}

async fn list<T: RecordData>(client: &CollectionClient<T>, strict: bool) -> Result<()> {
    let records = if strict {
        client
            .try_get_all()
            .await
            .with_context(|| format!("failed to list {}", client.sheet()))?
    } else {
        client.get_all().await
    };
    info!(sheet = %client.sheet(), count = records.len(), "listed records");
    print_json(&records)
}

async fn get<T: RecordData>(client: &CollectionClient<T>, id: &str) -> Result<()> {
    let record = client.get_by_id(id).await;
    print_json(&record)
}

async fn download(proxy: &MediaProxy, url: &str, name: &str, output: &Path) -> Result<()> {
    let download = proxy
        .fetch(url, name)
        .await
        .with_context(|| format!("failed to fetch {url}"))?;
    let path = output.join(&download.filename);
    let signed = download.signed_fallback;

    let mut file = tokio::fs::File::create(&path)
        .await
        .with_context(|| format!("failed to create {}", path.display()))?;
    let bytes = download
        .write_to(&mut file)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(path = %path.display(), bytes, signed, "download complete");
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

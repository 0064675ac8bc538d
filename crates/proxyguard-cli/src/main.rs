//! proxyguard CLI - build a provider HTTP client and report how it connects
//!
//! Runs the client factory on credentials and metadata given on the command
//! line, prints the resolved policy and route, and optionally sends one GET
//! through the resulting client.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use url::Url;

use proxyguard_client::ClientFactory;
use proxyguard_common::{CredentialSettings, ProviderMetadata, TransportOptions, TransportPolicy};

mod display;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Provider name used in diagnostics and errors
    #[arg(long, default_value = "default")]
    provider: String,

    /// Credential entry as KEY=VALUE (repeatable), e.g. socks5_proxy=127.0.0.1:1080
    #[arg(long = "credential", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    credentials: Vec<(String, String)>,

    /// Provider metadata document as inline JSON
    #[arg(long, conflicts_with = "metadata_file")]
    metadata: Option<String>,

    /// Path to a provider metadata document
    #[arg(long)]
    metadata_file: Option<PathBuf>,

    /// Path to a TOML file overriding transport pool and timeout defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Send a GET to this URL through the built client
    #[arg(long)]
    url: Option<Url>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))
}

fn load_options(path: &Path) -> Result<TransportOptions> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

fn load_metadata(args: &Args) -> Result<ProviderMetadata> {
    if let Some(inline) = &args.metadata {
        return Ok(ProviderMetadata::from(inline.as_str()));
    }
    if let Some(path) = &args.metadata_file {
        let raw = std::fs::read(path)
            .with_context(|| format!("failed to read metadata file {}", path.display()))?;
        return Ok(ProviderMetadata::new(raw));
    }
    Ok(ProviderMetadata::empty())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    run(Args::parse()).await
}

/// Builds the client described by `args` and reports the outcome.
///
/// Factory refusals map to [`ExitCode::FAILURE`]; I/O and request failures are
/// returned as errors.
async fn run(args: Args) -> Result<ExitCode> {
    let options = match &args.config {
        Some(path) => load_options(path)?,
        None => TransportOptions::default(),
    };
    debug!("Transport options: {options:?}");

    let credentials: CredentialSettings = args.credentials.iter().cloned().collect();
    let metadata = load_metadata(&args)?;

    display::display_policy(&TransportPolicy::resolve(&credentials, &metadata));

    let factory = ClientFactory::new().with_options(options);
    let client = match factory.build(args.provider.as_str(), &credentials, &metadata) {
        Ok(client) => client,
        Err(err) => {
            display::display_error(&err);
            return Ok(ExitCode::FAILURE);
        }
    };
    display::display_client(&client);

    if let Some(url) = args.url {
        let response = client
            .get(url.clone())
            .await
            .with_context(|| format!("GET {url} failed"))?;
        println!("GET {url} -> {}", response.status());
    }

    Ok(ExitCode::SUCCESS)
}

//! Translate text with the saved settings.
//!
//! Usage:
//!   highlight-translator "Text to translate"
//!   echo "Text to translate" | highlight-translator
//!
//! Settings come from SETTINGS_FILE (see the `settings` binary), with
//! environment overrides. When RELAY_URL is set the relay is tried first.
//! A missing key for the selected provider is asked for on the terminal
//! and saved.

use anyhow::{Context, Result};
use highlight_translator::config::Config;
use highlight_translator::relay::HttpRelay;
use highlight_translator::settings::prompt_for_api_key;
use highlight_translator::{translate_label, ProviderRouter, RelayBridge};
use std::io::{IsTerminal, Read};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging (stderr, so stdout carries only the translation)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("highlight_translator=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    let text = read_input()?;
    let text = text.trim();
    if text.is_empty() {
        anyhow::bail!("Nothing to translate.");
    }

    let store = config.settings_store();
    let stored = store.load().context("Failed to load settings")?;
    let mut effective = config.apply_overrides(stored);

    // Ask for a missing key when someone is at the terminal.
    let provider = effective.provider;
    if effective.api_key(provider).is_none() && std::io::stdin().is_terminal() {
        let mut input = std::io::stdin().lock();
        let mut output = std::io::stderr();
        if let Some(saved) = prompt_for_api_key(&store, provider, &mut input, &mut output)? {
            effective = config.apply_overrides(saved);
        }
    }
    let settings = effective.resolve()?;

    let client = reqwest::Client::new();
    let router = ProviderRouter::new(client.clone(), config.endpoints());
    let bridge = match &config.relay_url {
        Some(url) => {
            info!("Using relay at {}", url);
            let relay = HttpRelay::new(client, url.clone(), config.relay_secret.clone());
            RelayBridge::with_relay(router, Arc::new(relay))
        }
        None => RelayBridge::direct(router),
    };

    info!(
        "{} via {}",
        translate_label(&settings.target_language),
        settings.provider
    );

    match bridge.translate(text, &settings).await {
        Ok(translated) => {
            println!("{}", translated);
            Ok(())
        }
        Err(e) => {
            error!("Translation failed: {}", e);
            Err(e.into())
        }
    }
}

/// Text from the arguments, or stdin when there are none.
fn read_input() -> Result<String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        return Ok(args.join(" "));
    }

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read text from stdin")?;
    Ok(input)
}

//! Settings binary - view and change the saved translation settings
//!
//! Usage:
//!   cargo run --bin settings -- show
//!   cargo run --bin settings -- provider openai
//!   cargo run --bin settings -- key sk-...          # key for the selected provider
//!   cargo run --bin settings -- delete-key
//!   cargo run --bin settings -- language fr
//!   cargo run --bin settings -- model gpt-4o        # or: model --clear
//!   cargo run --bin settings -- prompt "Translate to {language}:"   # or: prompt --clear
//!
//! The file location comes from SETTINGS_FILE (defaults to translator-settings.json).

use anyhow::{bail, Context, Result};
use highlight_translator::config::Config;
use highlight_translator::prompt::has_placeholder;
use highlight_translator::security::mask_key;
use highlight_translator::settings::StoredSettings;
use highlight_translator::{translate_label, Provider};
use tracing::warn;

const USAGE: &str = "usage: settings <show | provider <gemini|openai|openrouter> | key <value> | \
delete-key | language <lang> | model <id|--clear> | prompt <template|--clear>>";

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("highlight_translator=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let store = config.settings_store();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("show");
    let value = args.get(1..).map(|rest| rest.join(" ")).unwrap_or_default();

    let settings = match command {
        "show" => store.load().context("Failed to load settings")?,
        "provider" => {
            let provider: Provider = value.parse()?;
            store.set_provider(provider)?
        }
        "key" => {
            let provider = store.load()?.provider;
            store.set_api_key(provider, &value)?
        }
        "delete-key" => {
            let provider = store.load()?.provider;
            store.delete_api_key(provider)?
        }
        "language" => {
            if value.trim().is_empty() {
                bail!("{}", USAGE);
            }
            store.set_target_language(&value)?
        }
        "model" => store.set_model(clearable(&value))?,
        "prompt" => {
            if let Some(template) = clearable(&value) {
                if !has_placeholder(template) {
                    warn!("Prompt template has no {{language}} placeholder; it will be sent as-is");
                }
            }
            store.set_prompt_template(clearable(&value))?
        }
        _ => bail!("{}", USAGE),
    };

    print_settings(store.path().display(), &settings);
    Ok(())
}

/// `--clear` (or nothing) clears the value.
fn clearable(value: &str) -> Option<&str> {
    match value.trim() {
        "" | "--clear" => None,
        v => Some(v),
    }
}

fn print_settings(path: impl std::fmt::Display, settings: &StoredSettings) {
    println!("Settings file: {}", path);
    println!("Provider:      {}", settings.provider);
    println!(
        "Language:      {} ({})",
        settings.target_language,
        translate_label(&settings.target_language)
    );
    println!(
        "Model:         {}",
        settings
            .model
            .as_deref()
            .unwrap_or(settings.provider.default_model())
    );
    println!(
        "Prompt:        {}",
        settings.prompt_template.as_deref().unwrap_or("(default)")
    );
    for provider in Provider::ALL {
        let key = settings
            .api_key(provider)
            .map(mask_key)
            .unwrap_or_else(|| "(not set)".to_string());
        println!("{:<15}{}", format!("{} key:", provider.display_name()), key);
    }
}

use anyhow::{Context, Result};
use console::{Emoji, style};
use std::fs;

use crate::cli::render;
use crate::config::{Config, GeminiConfig};

static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
static KEY: Emoji<'_, '_> = Emoji("🔑 ", "");

pub async fn run(force: bool) -> Result<()> {
    render::header("MediBot - Initialization");

    let config_dir = Config::config_dir()?;
    let config_path = config_dir.join("config.toml");

    // Check if config already exists
    if config_path.exists() && !force {
        println!(
            "{}Configuration already exists at {}",
            WARN,
            style(config_path.display()).cyan()
        );
        println!("  Use {} to overwrite", style("--force").yellow());
        return Ok(());
    }

    fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

    let spinner = render::spinner(&GEAR, "Creating configuration...");

    let default_config = Config {
        gemini: GeminiConfig {
            api_key: "${GEMINI_API_KEY}".to_string(),
            base_url: None,
        },
        ..Config::default()
    };

    let config_content = toml::to_string_pretty(&default_config)?;
    fs::write(&config_path, config_content).context("Failed to write config file")?;
    spinner.finish_and_clear();

    println!(
        "{}Created configuration at {}",
        CHECK,
        style(config_path.display()).cyan()
    );

    println!();
    println!("{}", style("━".repeat(50)).dim());
    println!();
    println!("{}Next steps:", ROCKET);
    println!();
    println!("  {}Provide your Gemini API key:", KEY);
    println!("    {} export GEMINI_API_KEY=your-key", style("$").dim());
    println!("    or edit {}", style(config_path.display()).cyan());
    println!();
    println!("  {}Chat with a document:", ROCKET);
    println!("    {} medibot chat ./report.pdf", style("$").dim());
    println!();

    Ok(())
}

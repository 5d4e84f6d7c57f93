//! knowmore CLI - render and replay streaming chat messages

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use knowmore_core::interaction::MessageInteraction;
use knowmore_core::{Config, Message, ViewModelBuilder};

mod pretty;
mod replay;

#[derive(Debug, Parser)]
#[command(
    name = "knowmore",
    author,
    version,
    about = "Render streaming assistant messages as view models",
    propagate_version = true
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render one message or a list of messages from a JSON file
    Render {
        /// JSON file holding a message object or an array of messages
        file: PathBuf,

        /// Print view models as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        interaction: InteractionArgs,
    },

    /// Replay a recorded data stream, one frame per applied line
    Replay {
        /// Stream file, or - for stdin
        input: String,

        /// Pause between frames in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Only print the final view
        #[arg(long)]
        final_only: bool,

        /// Print the final view model as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        interaction: InteractionArgs,
    },

    /// Show the effective configuration
    Config {
        /// Print the config file path instead
        #[arg(long)]
        path: bool,
    },
}

/// Actions applied to each rendered assistant message before it is printed.
#[derive(Debug, Clone, Args)]
struct InteractionArgs {
    /// Mark the message as helpful
    #[arg(long, conflicts_with = "dislike")]
    like: bool,

    /// Mark the message as not helpful
    #[arg(long)]
    dislike: bool,

    /// Record a copy of the message text
    #[arg(long)]
    copy: bool,
}

impl InteractionArgs {
    fn apply(&self, interaction: &mut MessageInteraction, now: Instant) {
        if self.like {
            interaction.like();
        } else if self.dislike {
            interaction.dislike();
        }
        if self.copy {
            interaction.record_copy(now);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging on stderr so rendered output stays on stdout
    let level = match cli.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.unwrap_or_else(Config::default_config_path);
    let config = load_config(&config_path)?;
    let builder = ViewModelBuilder::from_config(&config);

    match cli.command {
        Command::Render {
            file,
            json,
            interaction,
        } => cmd_render(&builder, &config, &file, json, &interaction),
        Command::Replay {
            input,
            delay_ms,
            final_only,
            json,
            interaction,
        } => {
            let options = replay::ReplayOptions::from_config(&config, delay_ms, final_only);
            cmd_replay(&builder, &config, &input, &options, json, &interaction).await
        }
        Command::Config { path } => cmd_config(&config, &config_path, path),
    }
}

fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))
    } else {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        let mut config = Config::default();
        config.apply_env_overrides()?;
        Ok(config)
    }
}

/// Parse a file holding either one message or an array of messages.
fn read_messages(path: &Path) -> Result<Vec<Message>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    let messages = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };
    Ok(messages)
}

fn cmd_render(
    builder: &ViewModelBuilder,
    config: &Config,
    file: &Path,
    json: bool,
    actions: &InteractionArgs,
) -> Result<()> {
    let messages = read_messages(file)?;
    let views = builder.build_all(&messages);

    if json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    if views.is_empty() {
        println!("No messages found.");
        return Ok(());
    }

    let now = Instant::now();
    for view in &views {
        let mut interaction =
            MessageInteraction::new(view.message_id.clone(), config.copy_feedback());
        actions.apply(&mut interaction, now);
        pretty::print_view(view, &config.render, Some(&interaction));
    }
    Ok(())
}

async fn cmd_replay(
    builder: &ViewModelBuilder,
    config: &Config,
    input: &str,
    options: &replay::ReplayOptions,
    json: bool,
    actions: &InteractionArgs,
) -> Result<()> {
    let mut outcome = replay::replay_input(input, builder, options).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.view)?);
    } else {
        if options.print_frames {
            println!();
        }
        actions.apply(&mut outcome.interaction, Instant::now());
        pretty::print_view(&outcome.view, &config.render, Some(&outcome.interaction));
    }

    let acc = &outcome.accumulator;
    if let Some(error) = acc.error() {
        tracing::warn!(error, "Stream ended with an error");
    }
    if !acc.is_finished() {
        tracing::info!("Stream ended without a finish marker");
    }
    tracing::debug!(
        frames = outcome.frames,
        skipped = outcome.skipped_lines,
        finish_reason = acc.finish_reason().unwrap_or("-"),
        "Replay complete"
    );
    Ok(())
}

fn cmd_config(config: &Config, config_path: &Path, path_only: bool) -> Result<()> {
    if path_only {
        println!("{}", config_path.display());
        return Ok(());
    }
    let rendered = toml::to_string_pretty(config).context("Failed to serialize config")?;
    print!("{rendered}");
    Ok(())
}

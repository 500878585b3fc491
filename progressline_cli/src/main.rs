use anyhow::{Context, Result};
use chrono::{Local, TimeDelta};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use std::thread;
use std::time::{Duration, Instant};

use progressline_cli::config::{AppConfig, ConfigManager, get_config};
use progressline_cli::presets::{Preset, PresetOptions};
use progressline_cli::terminal;
use progressline_core::error::ValidationError;
use progressline_core::{ExtraData, ProgressBarBuilder, ProgressSnapshot, render_line};

#[derive(Parser)]
#[command(name = "progressline")]
#[command(author, version, about = "Single-line progress bars built from widgets", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive a bar through a simulated transfer on stderr
    Demo(DemoArgs),

    /// Render a single line for the given progress state
    Render(RenderArgs),

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
struct DemoArgs {
    /// Maximum value (defaults to demo.max_value)
    #[arg(long)]
    max: Option<f64>,

    /// Widget layout (defaults to display.preset)
    #[arg(short, long, value_enum)]
    preset: Option<Preset>,

    /// Delay between updates in milliseconds (defaults to demo.delay_ms)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Line width (defaults to display.width, then the terminal)
    #[arg(short, long)]
    width: Option<usize>,

    /// Number of updates
    #[arg(long, default_value_t = 50)]
    steps: u32,
}

#[derive(Args)]
struct RenderArgs {
    /// Current value
    #[arg(long, allow_hyphen_values = true)]
    value: f64,

    /// Minimum value
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    min: f64,

    /// Maximum value; omit for open-ended progress
    #[arg(long, allow_hyphen_values = true)]
    max: Option<f64>,

    /// Seconds since start
    #[arg(long, default_value_t = 0.0)]
    elapsed: f64,

    /// Number of updates so far
    #[arg(long, default_value_t = 0)]
    updates: u64,

    /// Render the bar as finished
    #[arg(long)]
    finished: bool,

    /// Line width (defaults to display.width, then the terminal)
    #[arg(short, long)]
    width: Option<usize>,

    /// Widget layout (defaults to display.preset)
    #[arg(short, long, value_enum)]
    preset: Option<Preset>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., display.width)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., display.width)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration values
    List,

    /// Print the configuration file path
    Path,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("progressline_core", log::LevelFilter::Debug)
            .filter_module("progressline_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if !terminal::supports_ansi() {
        colored::control::set_override(false);
    }

    let config = get_config().context("Failed to load configuration")?;

    match cli.command {
        Commands::Demo(args) => demo_command(&config, args)?,
        Commands::Render(args) => render_command(&config, args)?,
        Commands::Config { command } => config_command(command)?,
        Commands::Completions { shell } => generate_completions(shell),
    }

    Ok(())
}

fn preset_options(config: &AppConfig) -> PresetOptions {
    PresetOptions {
        marker: config.display.marker.clone(),
        fill: config.display.fill.clone(),
        samples: config.samples.window,
    }
}

fn resolve_width(config: &AppConfig, explicit: Option<usize>) -> usize {
    let configured = Some(config.display.width).filter(|&width| width > 0);
    terminal::line_width(explicit.or(configured))
}

fn render_command(config: &AppConfig, args: RenderArgs) -> Result<()> {
    if let Some(max) = args.max
        && max < args.min
    {
        return Err(ValidationError::invalid_range(args.min, max).into());
    }
    if args.value.is_nan() || args.value < args.min || args.max.is_some_and(|max| args.value > max)
    {
        return Err(ValidationError::out_of_range(args.value, args.min, args.max).into());
    }
    if !(args.elapsed.is_finite() && args.elapsed >= 0.0) {
        anyhow::bail!("--elapsed must be a non-negative number of seconds");
    }

    let preset = args.preset.unwrap_or(config.display.preset);
    let width = resolve_width(config, args.width);
    log::debug!("Rendering preset {preset} at width {width}");

    let now = Local::now();
    let Some(start) = TimeDelta::try_milliseconds((args.elapsed * 1000.0).round() as i64)
        .and_then(|elapsed| now.checked_sub_signed(elapsed))
    else {
        anyhow::bail!("--elapsed is out of range");
    };
    let mut snapshot = ProgressSnapshot::new(args.value, args.min, args.max)
        .with_updates(args.updates)
        .with_times(start, now);
    if args.finished {
        snapshot = snapshot.with_end_time(now);
    }

    let widgets = preset
        .widgets(&preset_options(config), args.max.is_some())
        .context("Invalid display configuration")?;
    let line = render_line(&widgets, width, &snapshot, &mut ExtraData::new())
        .context("Failed to render progress line")?;

    match args.format {
        OutputFormat::Text => println!("{line}"),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "line": line,
                "width": width,
                "preset": preset,
                "snapshot": snapshot,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

/// Cumulative progress for `steps` updates, with periodic slow stretches so
/// adaptive widgets have something to adapt to
fn demo_values(max: f64, steps: u32) -> Vec<f64> {
    let weights: Vec<f64> = (0..steps)
        .map(|step| if step % 10 < 3 { 0.25 } else { 1.0 })
        .collect();
    let total: f64 = weights.iter().sum();

    let mut done = 0.0;
    weights
        .iter()
        .map(|weight| {
            done += weight;
            (max * done / total).min(max)
        })
        .collect()
}

fn demo_command(config: &AppConfig, args: DemoArgs) -> Result<()> {
    let preset = args.preset.unwrap_or(config.display.preset);
    let max = args.max.unwrap_or(config.demo.max_value);
    let delay = Duration::from_millis(args.delay_ms.unwrap_or(config.demo.delay_ms));
    let width = resolve_width(config, args.width);
    let has_max = !preset.is_open_ended();

    if !(max.is_finite() && max > 0.0) {
        anyhow::bail!("--max must be greater than 0");
    }

    let widgets = preset
        .widgets(&preset_options(config), has_max)
        .context("Invalid display configuration")?;
    let mut builder = ProgressBarBuilder::new().widgets(widgets).width(width);
    if has_max {
        builder = builder.max_value(max);
    }
    let mut bar = builder
        .build(std::io::stderr())
        .context("Failed to create progress bar")?;

    log::debug!("Running {preset} demo: max {max}, {} steps, {delay:?} delay", args.steps);
    let started = Instant::now();

    bar.start()?;
    for value in demo_values(max, args.steps) {
        thread::sleep(delay);
        bar.update(value)?;
    }
    bar.finish()?;

    eprintln!(
        "{} {} updates in {:.2}s",
        "✓ Complete:".green(),
        args.steps,
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

fn config_command(command: ConfigCommand) -> Result<()> {
    let mut manager = ConfigManager::new();

    match command {
        ConfigCommand::Get { key } => match manager.get(&key) {
            Ok(value) => {
                println!("{value}");
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {e}").red());
                std::process::exit(1);
            }
        },
        ConfigCommand::Set { key, value } => match manager.set(&key, &value) {
            Ok(()) => {
                eprintln!("{}", format!("Set {key} = {value}").green());
                eprintln!(
                    "Configuration saved to: {}",
                    manager.get_config_path().display()
                );
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {e:#}").red());
                std::process::exit(1);
            }
        },
        ConfigCommand::List => {
            let items = manager.list()?;
            eprintln!("{}", "Configuration:".bold().blue());
            eprintln!("Config file: {}", manager.get_config_path().display());

            let mut current_section = "";
            for (key, value) in &items {
                let (section, name) = key.split_once('.').unwrap_or(("general", key.as_str()));
                if section != current_section {
                    println!("[{section}]");
                    current_section = section;
                }
                println!("  {} = {}", name.cyan(), value);
            }
        }
        ConfigCommand::Path => {
            println!("{}", manager.get_config_path().display());
        }
    }

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_values_end_at_max() {
        let values = demo_values(100.0, 25);

        assert_eq!(values.len(), 25);
        assert_eq!(values.last().copied(), Some(100.0));
        assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }
}

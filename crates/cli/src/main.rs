#![deny(unsafe_code)]
//! CLI binary for neural-flow.
//!
//! Subcommands:
//! - `render <preset>`: tick a preset N frames offline and write a PNG
//! - `replay <seed.json>`: re-render a saved seed
//! - `list`: print available presets and override keys

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use neural_flow_core::{FieldConfig, Seed, Srgb};
use neural_flow_engines::{snapshot, Preset};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "neural-flow", about = "Animated point-field renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log debug output (RUST_LOG still takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tick a preset for N frames and write the last one as a PNG.
    Render {
        /// Preset name (e.g. "neuron-background").
        preset: String,

        /// Surface width in pixels.
        #[arg(short = 'W', long, default_value_t = 1280)]
        width: u32,

        /// Surface height in pixels.
        #[arg(short = 'H', long, default_value_t = 720)]
        height: u32,

        /// Viewport width used for point-count breakpoints (defaults to width).
        #[arg(long)]
        viewport_width: Option<u32>,

        /// Number of frames to tick.
        #[arg(short, long, default_value_t = 60)]
        frames: u32,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Config overrides as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Opaque background color behind the field.
        #[arg(long, default_value = "#000000")]
        background: String,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Also save the render description as JSON for `replay`.
        #[arg(long)]
        save_seed: Option<PathBuf>,
    },
    /// Re-render a seed file written by `render --save-seed`.
    Replay {
        /// Path to the seed JSON.
        seed_file: PathBuf,

        /// Opaque background color behind the field.
        #[arg(long, default_value = "#000000")]
        background: String,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,
    },
    /// List available presets.
    List,
}

fn parse_params(raw: &str) -> Result<serde_json::Value, CliError> {
    let params: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    if !params.is_object() {
        return Err(CliError::Input("--params must be a JSON object".into()));
    }
    Ok(params)
}

fn parse_background(raw: &str) -> Result<Srgb, CliError> {
    Srgb::from_hex(raw).map_err(|e| CliError::Input(format!("invalid --background: {e}")))
}

fn read_seed(path: &Path) -> Result<Seed, CliError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("reading {}: {e}", path.display())))?;
    let seed: Seed = serde_json::from_str(&text)?;
    Ok(seed)
}

fn write_seed(seed: &Seed, path: &Path) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(seed)?;
    fs::write(path, text).map_err(|e| CliError::Io(format!("writing {}: {e}", path.display())))
}

fn render_seed(seed: &Seed, background: Srgb, output: &Path) -> Result<(), CliError> {
    let surface = neural_flow_engines::render(seed)?;
    snapshot::write_png(&surface, background, output)?;
    Ok(())
}

fn report(seed: &Seed, output: &Path, json: bool) -> Result<(), CliError> {
    if json {
        let info = serde_json::json!({
            "preset": seed.preset,
            "width": seed.width,
            "height": seed.height,
            "viewport_width": seed.viewport_width(),
            "frames": seed.frames,
            "seed": seed.seed,
            "output": output.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!(
            "rendered {} ({}x{}, {} frames, seed {}) -> {}",
            seed.preset,
            seed.width,
            seed.height,
            seed.frames,
            seed.seed,
            output.display()
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let presets = Preset::list_presets();
            if cli.json {
                let list: Vec<_> = presets
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "name": p.name,
                            "description": p.description,
                            "surface_id": p.surface_id,
                            "start_delay_ms": p.start_delay_ms,
                            "params": p.config.to_params(),
                        })
                    })
                    .collect();
                let info = serde_json::json!({
                    "presets": list,
                    "param_schema": FieldConfig::param_schema(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Presets:");
                for p in presets {
                    println!("  {:<18} {}", p.name, p.description);
                }
            }
        }
        Command::Render {
            preset,
            width,
            height,
            viewport_width,
            frames,
            seed,
            params,
            background,
            output,
            save_seed,
        } => {
            let background = parse_background(&background)?;
            let mut desc = Seed::new(&preset, width, height, seed);
            desc.viewport_width = viewport_width;
            desc.params = parse_params(&params)?;
            desc.frames = frames;

            render_seed(&desc, background, &output)?;
            if let Some(path) = save_seed {
                write_seed(&desc, &path)?;
                log::info!("saved seed to {}", path.display());
            }
            report(&desc, &output, cli.json)?;
        }
        Command::Replay {
            seed_file,
            background,
            output,
        } => {
            let background = parse_background(&background)?;
            let desc = read_seed(&seed_file)?;
            render_seed(&desc, background, &output)?;
            report(&desc, &output, cli.json)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        log::debug!("command failed: {e:?}");
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

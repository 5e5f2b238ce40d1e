use clap::{Parser, Subcommand};
use picpress::{config, output, pipeline};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "picpress")]
#[command(about = "Incremental photo optimizer producing hash-tracked WebP derivatives")]
#[command(long_about = "\
Incremental photo optimizer producing hash-tracked WebP derivatives

Point it at a directory of original photos and it maintains a parallel
directory of web-ready derivatives plus a manifest recording what was
done. Runs are incremental: a photo is reprocessed only when its content
hash changes, its derivative is missing, or it has never been seen.

Layout:

  originals/                   # Source photos (flat; jpg/png/tiff/webp)
  optimized/
  ├── manifest.json            # filename → {hash, optimized_path, date_taken, ...}
  ├── dawn.webp                # One derivative per source photo
  └── dusk.webp
  user_metadata.json           # Optional per-photo metadata corrections

Each derivative is orientation-corrected from EXIF, downscaled so its
longer edge fits the configured bound, and encoded as lossy WebP. The
capture timestamp (EXIF DateTimeOriginal) is recorded in the manifest.
Entries in user_metadata.json are overlaid onto manifest entries on
every run without forcing a reprocess.

Run 'picpress gen-config' to write a documented picpress.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = "picpress.toml", global = true)]
    config: PathBuf,

    /// Source directory with original photos (overrides config)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Output directory for derivatives and the manifest (overrides config)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transcode changed photos and rewrite the manifest
    Run {
        /// Reprocess every photo, ignoring the manifest
        #[arg(long)]
        force: bool,
    },
    /// Show what a run would do, without writing anything
    Status,
    /// Write a stock picpress.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run { force } => {
            let config = load_effective_config(&cli)?;
            init_thread_pool(&config.processing);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_run_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let summary = pipeline::run(&config, force, Some(tx))?;
            printer.join().unwrap();
            if summary.transcoded > 0 || !summary.failures.is_empty() {
                println!();
            }
            output::print_run_summary(&summary);
        }
        Command::Status => {
            let config = load_effective_config(&cli)?;
            let plan = pipeline::plan(&config)?;
            output::print_plan_output(&plan);
        }
        Command::GenConfig => {
            if cli.config.exists() {
                return Err(
                    format!("refusing to overwrite existing {}", cli.config.display()).into(),
                );
            }
            std::fs::write(&cli.config, config::stock_config_toml())?;
            println!("Wrote {}", cli.config.display());
        }
    }

    Ok(())
}

/// Load config and apply CLI directory overrides on top.
fn load_effective_config(cli: &Cli) -> Result<config::PipelineConfig, config::ConfigError> {
    let mut config = config::load_config(&cli.config)?;
    if let Some(source) = &cli.source {
        config.source_dir = source.to_string_lossy().into_owned();
    }
    if let Some(output) = &cli.output {
        config.output_dir = output.to_string_lossy().into_owned();
    }
    Ok(config)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let workers = config::effective_workers(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()
        .ok();
}

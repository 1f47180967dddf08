use clap::{Parser, Subcommand};
use normal_remap::config::{self, ConvertConfig};
use normal_remap::reconstruct::ReconstructionMode;
use normal_remap::{convert, output};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("NORMAL_REMAP_ON_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("NORMAL_REMAP_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "normal-remap")]
#[command(about = "Convert alpha/green normal maps to RGB normal maps")]
#[command(long_about = "\
Convert alpha/green normal maps to RGB normal maps

Scans one directory (not recursive) for textures whose name ends in
\"normal\" before the extension, e.g. wall_normal.dds. Each one that has
usable transparency is rewritten in place:

  R <- A          (X component)
  G <- G          (Y component)
  B <- computed   (Z component, from X and Y)

Files that cannot be read or converted are reported and left untouched.
Only a directory that cannot be listed or an invalid config fails the run.

Run 'normal-remap gen-config' to generate a documented config file.")]
#[command(version = version_string())]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Texture directory (defaults to the current directory)
    dir: Option<PathBuf>,

    /// TOML config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Source texture extension, case-sensitive (dds, png, tga)
    #[arg(long)]
    extension: Option<String>,

    /// Required end of the file name before the extension
    #[arg(long)]
    suffix: Option<String>,

    /// Blue-channel reconstruction convention
    #[arg(long, value_enum)]
    mode: Option<ReconstructionMode>,

    /// Write <stem><SUFFIX>.<ext> next to each source instead of replacing it
    #[arg(long)]
    output_suffix: Option<String>,

    /// Report what would be converted without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Maximum threads for per-pixel work
    #[arg(long)]
    threads: Option<usize>,

    /// Print events and the summary as JSON lines
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::GenConfig) = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    init_thread_pool(&config.processing);

    let dir = match &cli.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };

    let json = cli.json;
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            if json {
                if let Ok(line) = serde_json::to_string(&event) {
                    println!("{}", line);
                }
            } else {
                output::print_convert_event(&event);
            }
        }
    });
    let result = convert::convert_directory(&dir, &config, Some(tx));
    printer.join().map_err(|_| "output printer thread panicked")?;
    let summary = result?;

    if json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        output::print_summary(&summary, config.dry_run);
    }

    Ok(())
}

/// Stock defaults, then the `--config` file, then flags.
fn resolve_config(cli: &Cli) -> Result<ConvertConfig, config::ConfigError> {
    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ConvertConfig::default(),
    };
    if let Some(extension) = &cli.extension {
        config.extension = extension.clone();
    }
    if let Some(suffix) = &cli.suffix {
        config.suffix = suffix.clone();
    }
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(output_suffix) = &cli.output_suffix {
        config.output_suffix = Some(output_suffix.clone());
    }
    if cli.dry_run {
        config.dry_run = true;
    }
    if let Some(threads) = cli.threads {
        config.processing.max_threads = Some(threads);
    }
    config.validate()?;
    Ok(config)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;
use structopt::StructOpt;
use ve_uvflip::{Layout, MetaOverrides};

// Cli arguments
#[derive(StructOpt, Debug)]
#[structopt(name = "ve_uvflip")]
struct CliArgs {
    /// Specify the model to flip in place
    #[structopt(parse(from_os_str), default_value = "backpack.obj")]
    input: PathBuf,
    /// How flipped texture coordinates are put back together; overrides the meta file
    #[structopt(short = "l", long = "layout", possible_values = &["columns", "fields"])]
    layout: Option<Layout>,
    /// Truncate and rewrite the model directly instead of replacing it with a temporary file
    #[structopt(long = "no-atomic")]
    no_atomic: bool,
    /// Output debug info
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
}

/// Happens during setup
#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("Input file does not exist: {0}")]
    InputFileNonExistant(String),
}

fn main() -> Result<()> {
    let args = CliArgs::from_args();

    if !args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    } else {
        env_logger::Builder::new()
            .filter(None, log::LevelFilter::Debug)
            .init();
    }

    prepare(args)
}

fn prepare(args: CliArgs) -> Result<()> {
    let input_path = args.input.as_path();
    if !input_path.is_file() {
        return Err(CliError::InputFileNonExistant(input_path.display().to_string()).into());
    }

    // check extension
    match input_path.extension().and_then(|x| x.to_str()) {
        Some(extension) if extension.eq_ignore_ascii_case("obj") => {}
        _ => warn!(
            "File \"{}\" has no `.obj` extension, flipping it anyway.",
            input_path.display()
        ),
    }

    let overrides = MetaOverrides {
        layout: args.layout,
        atomic_write: args.no_atomic.then_some(false),
    };

    let report = ve_uvflip::process(input_path, &overrides)
        .with_context(|| format!("Could not flip texture coordinates of {}", input_path.display()))?;
    info!("Done: {} texture coordinates flipped", report.flipped);

    Ok(())
}

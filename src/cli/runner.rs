use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use xrenhance::api::{BatchOptions, FileOutcome, process_dataset, process_image_to_path};
use xrenhance::{EnhanceParams, TargetSize};

use super::args::CliArgs;
use super::errors::AppError;

const OUTPUT_SUFFIX: &str = "_Enhanced";

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn parse_size(arg: &'static str, value: &str) -> Result<TargetSize, AppError> {
    value.parse::<TargetSize>().map_err(|_| AppError::InvalidSize {
        arg,
        value: value.to_string(),
    })
}

/// Config file first (or defaults), then explicit flags on top.
fn build_params(args: &CliArgs) -> Result<EnhanceParams, AppError> {
    let mut params = match &args.config {
        Some(path) => {
            info!("Loading parameters from {:?}", path);
            EnhanceParams::from_json_file(path)?
        }
        None => EnhanceParams::default(),
    };

    if let Some(size) = &args.size {
        params.size = parse_size("size", size)?;
    }
    if let Some(tiles) = &args.tiles {
        params.tiles = parse_size("tiles", tiles)?;
    }
    if let Some(alg) = args.resize_alg {
        params.resize = alg;
    }
    if let Some(clip) = args.clip_limit {
        params.clip_limit = clip;
    }
    if let Some(quality) = args.quality {
        params.jpeg_quality = quality;
    }

    params.validate()?;
    Ok(params)
}

/// `<input_dir>` with the suffix appended to its last component.
fn default_output_dir(input_dir: &Path) -> PathBuf {
    let mut name: OsString = input_dir.components().as_path().as_os_str().to_os_string();
    name.push(OUTPUT_SUFFIX);
    PathBuf::from(name)
}

fn run_single(
    input: &Path,
    output: Option<PathBuf>,
    params: &EnhanceParams,
    stages_dir: Option<&Path>,
) -> Result<(), AppError> {
    let output = output.ok_or(AppError::MissingArgument {
        arg: "--output".to_string(),
    })?;

    match process_image_to_path(input, &output, params, stages_dir)? {
        FileOutcome::Written { output } => {
            info!("Successfully processed: {:?} -> {:?}", input, output);
            Ok(())
        }
        FileOutcome::Skipped { .. } | FileOutcome::Failed { .. } => Err(AppError::Unreadable {
            path: input.to_path_buf(),
        }),
    }
}

fn run_batch(args: CliArgs, params: &EnhanceParams) -> Result<(), AppError> {
    let output_dir = args
        .output_dir
        .unwrap_or_else(|| default_output_dir(&args.input_dir));

    if !args.input_dir.is_dir() {
        warn!("Input directory {:?} does not exist", args.input_dir);
    }

    let options = BatchOptions {
        categories: args.categories,
        stages_dir: args.stages_dir,
    };
    let report = process_dataset(&args.input_dir, &output_dir, params, &options)?;

    for category in &report.categories {
        info!(
            "{}: {:?} found={} written={} skipped={} failed={}",
            category.category,
            category.status,
            category.found,
            category.written,
            category.skipped,
            category.failed
        );
    }

    if let Some(path) = &args.report {
        report.to_json_file(path)?;
        info!("Report written to {:?}", path);
    }
    Ok(())
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(args.log);

    let params = build_params(&args)?;
    info!(
        "Parameters: size={} resize={} clip_limit={} tiles={}",
        params.size, params.resize, params.clip_limit, params.tiles
    );

    if let Some(input) = args.input.clone() {
        run_single(&input, args.output.clone(), &params, args.stages_dir.as_deref())?;
    } else {
        run_batch(args, &params)?;
    }

    Ok(())
}

use clap::Parser;
use std::path::PathBuf;

use xrenhance::{Category, ResizeAlgorithm};

#[derive(Parser)]
#[command(name = "xrenhance", version, about = "XRENHANCE CLI")]
pub struct CliArgs {
    /// Input image (single file mode)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output filename (single file mode); the extension selects JPEG or PNG
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Dataset root containing the category folders (batch mode)
    #[arg(long, default_value = "Lung X-Ray Image")]
    pub input_dir: PathBuf,

    /// Output root for batch mode. Defaults to the input directory with "_Enhanced" appended
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Only process these categories (repeatable). Defaults to all three
    #[arg(long = "category", value_enum)]
    pub categories: Vec<Category>,

    /// JSON file with enhancement parameters; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Target size: N for a square or WxH (default 256)
    #[arg(long)]
    pub size: Option<String>,

    /// Resize algorithm (area, bilinear, lanczos3). Defaults to area
    #[arg(long, value_enum)]
    pub resize_alg: Option<ResizeAlgorithm>,

    /// CLAHE clip limit; 0 disables clipping (default 2.0)
    #[arg(long)]
    pub clip_limit: Option<f64>,

    /// CLAHE tile grid: N or WxH (default 8)
    #[arg(long)]
    pub tiles: Option<String>,

    /// JPEG quality for .jpg/.jpeg outputs, 1-100 (default 95)
    #[arg(long)]
    pub quality: Option<u8>,

    /// Also write every intermediate stage as PNG into this directory
    #[arg(long)]
    pub stages_dir: Option<PathBuf>,

    /// Write the batch report as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}

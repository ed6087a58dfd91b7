#![doc = r#"
XRENHANCE: batch enhancement of chest X-ray images.

Every image goes through the same fixed, deterministic sequence of classical
image-processing steps:

1. decode to 8-bit RGB (format sniffed from content, EXIF orientation applied)
2. luminance-weighted grayscale conversion
3. resize to the target size (area averaging by default, 256x256)
4. 3x3 Gaussian denoise
5. CLAHE contrast enhancement (clip limit 2.0, 8x8 tiles)
6. sharpening with the `[[0,-1,0],[-1,5,-1],[0,-1,0]]` kernel

The batch runner walks the `Normal`, `Viral Pneumonia` and `Lung_Opacity` folders of a
dataset root and writes each final image under the same category and filename in an
output root. Unreadable files are skipped, per-file errors are logged and tallied, and
the batch always runs to completion.

Quick start: enhance one image in memory
----------------------------------------
```rust,no_run
use std::path::Path;
use xrenhance::{enhance_file, EnhanceParams};

fn main() -> xrenhance::Result<()> {
    let params = EnhanceParams::default();
    if let Some(stages) = enhance_file(Path::new("/data/Normal/0001.png"), &params)? {
        let (rows, cols) = stages.final_image().dim();
        println!("final stage is {cols}x{rows}");
    }
    Ok(())
}
```

Batch helpers
-------------
```rust,no_run
use std::path::Path;
use xrenhance::{process_dataset, BatchOptions, EnhanceParams};

fn main() -> xrenhance::Result<()> {
    let report = process_dataset(
        Path::new("Lung X-Ray Image"),
        Path::new("Lung X-Ray Image_Enhanced"),
        &EnhanceParams::default(),
        &BatchOptions::default(),
    )?;

    println!(
        "written={} skipped={} failed={}",
        report.written(),
        report.skipped(),
        report.failed()
    );
    Ok(())
}
```

Useful modules
--------------
- [`api`]: single-file and batch entry points.
- [`core`]: the individual pipeline stages and save helpers.
- [`types`]: `Category`, `Stage`, `TargetSize`, `ResizeAlgorithm` and image aliases.
- [`io`]: image decoding and JPEG/PNG writers.
- [`error`]: crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use crate::core::params::EnhanceParams;
pub use crate::core::processing::pipeline::PipelineStages;
pub use error::{Error, Result};
pub use types::{Category, ColorImage, GrayImage, ResizeAlgorithm, Stage, TargetSize};

// Pipeline stages
pub use crate::core::processing::clahe::clahe;
pub use crate::core::processing::filters::{gaussian_blur_3x3, sharpen};
pub use crate::core::processing::ops::to_grayscale;
pub use crate::core::processing::pipeline::{enhance, enhance_file};
pub use crate::core::processing::resize::resize_gray;
pub use crate::core::processing::save::{persist_final, save_gray_image, save_stages};
pub use io::read_color_image;

// High-level API re-exports
pub use api::{
    BatchOptions, BatchReport, CategoryReport, CategoryStatus, FileOutcome, list_category_images,
    process_category, process_dataset, process_file, process_image_to_path,
};

use std::fs;
use std::path::Path;

use image::{ColorType, ImageFormat, Rgb, RgbImage};
use xrenhance::{
    BatchOptions, Category, CategoryStatus, EnhanceParams, FileOutcome, process_dataset,
    process_image_to_path,
};

fn checkerboard(side: u32, cell: u32) -> RgbImage {
    RgbImage::from_fn(side, side, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            Rgb([230, 225, 220])
        } else {
            Rgb([25, 30, 35])
        }
    })
}

fn write_image(path: &Path, side: u32, format: ImageFormat) {
    checkerboard(side, 16).save_with_format(path, format).unwrap();
}

#[test]
fn mirrors_valid_images_and_skips_corrupt_ones() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let normal = input.path().join("Normal");
    fs::create_dir(&normal).unwrap();
    write_image(&normal.join("a.jpg"), 512, ImageFormat::Jpeg);
    write_image(&normal.join("b.png"), 300, ImageFormat::Png);
    write_image(&normal.join("c.jpeg"), 128, ImageFormat::Jpeg);
    fs::write(normal.join("broken.png"), b"not an image").unwrap();
    fs::write(normal.join("empty.jpg"), b"").unwrap();

    let report = process_dataset(
        input.path(),
        output.path(),
        &EnhanceParams::default(),
        &BatchOptions::default(),
    )
    .unwrap();

    let normal_report = report.category(Category::Normal).unwrap();
    assert_eq!(normal_report.status, CategoryStatus::Processed);
    assert_eq!(normal_report.found, 5);
    assert_eq!(normal_report.written, 3);
    assert_eq!(normal_report.skipped, 2);
    assert_eq!(normal_report.failed, 0);

    let out_dir = output.path().join("Normal");
    let mut written: Vec<String> = fs::read_dir(&out_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(written, ["a.jpg", "b.png", "c.jpeg"]);

    for name in &written {
        let img = image::open(out_dir.join(name)).unwrap();
        assert_eq!(img.color(), ColorType::L8);
        assert_eq!((img.width(), img.height()), (256, 256));
    }
}

#[test]
fn missing_categories_are_skipped_without_output_folders() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let opacity = input.path().join("Lung_Opacity");
    fs::create_dir(&opacity).unwrap();
    write_image(&opacity.join("x.png"), 64, ImageFormat::Png);

    let report = process_dataset(
        input.path(),
        output.path(),
        &EnhanceParams::default(),
        &BatchOptions::default(),
    )
    .unwrap();

    assert_eq!(report.categories.len(), 3);
    assert_eq!(
        report.category(Category::Normal).unwrap().status,
        CategoryStatus::Missing
    );
    assert_eq!(
        report.category(Category::ViralPneumonia).unwrap().status,
        CategoryStatus::Missing
    );
    assert!(!output.path().join("Normal").exists());
    assert!(!output.path().join("Viral Pneumonia").exists());
    assert!(output.path().join("Lung_Opacity").join("x.png").is_file());
    assert_eq!(report.written(), 1);
}

#[test]
fn nested_folders_and_other_extensions_are_ignored() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let viral = input.path().join("Viral Pneumonia");
    fs::create_dir_all(viral.join("extra")).unwrap();
    write_image(&viral.join("keep.png"), 64, ImageFormat::Png);
    write_image(&viral.join("extra").join("deep.png"), 64, ImageFormat::Png);
    write_image(&viral.join("UPPER.PNG"), 64, ImageFormat::Png);
    write_image(&viral.join("scan.bmp.txt"), 64, ImageFormat::Png);

    let report = process_dataset(
        input.path(),
        output.path(),
        &EnhanceParams::default(),
        &BatchOptions::default(),
    )
    .unwrap();

    assert_eq!(report.category(Category::ViralPneumonia).unwrap().found, 1);
    let out_dir = output.path().join("Viral Pneumonia");
    assert!(out_dir.join("keep.png").is_file());
    assert!(!out_dir.join("UPPER.PNG").exists());
    assert!(!out_dir.join("extra").exists());
}

#[test]
fn rerun_overwrites_with_identical_output() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let normal = input.path().join("Normal");
    fs::create_dir(&normal).unwrap();
    write_image(&normal.join("scan.png"), 512, ImageFormat::Png);

    let params = EnhanceParams::default();
    let options = BatchOptions::default();
    process_dataset(input.path(), output.path(), &params, &options).unwrap();
    let first = fs::read(output.path().join("Normal").join("scan.png")).unwrap();
    process_dataset(input.path(), output.path(), &params, &options).unwrap();
    let second = fs::read(output.path().join("Normal").join("scan.png")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn category_filter_and_stage_dump() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let stages = tempfile::tempdir().unwrap();

    for category in Category::ALL {
        let dir = input.path().join(category.folder_name());
        fs::create_dir(&dir).unwrap();
        write_image(&dir.join("s.png"), 64, ImageFormat::Png);
    }

    let options = BatchOptions {
        categories: vec![Category::Normal],
        stages_dir: Some(stages.path().to_path_buf()),
    };
    let report =
        process_dataset(input.path(), output.path(), &EnhanceParams::default(), &options).unwrap();

    assert_eq!(report.categories.len(), 1);
    assert!(!output.path().join("Lung_Opacity").exists());
    let dumped = fs::read_dir(stages.path().join("Normal")).unwrap().count();
    assert_eq!(dumped, 5);
}

#[test]
fn report_serializes_to_json() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let report = process_dataset(
        input.path(),
        output.path(),
        &EnhanceParams::default(),
        &BatchOptions::default(),
    )
    .unwrap();

    let path = output.path().join("report.json");
    report.to_json_file(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["categories"].as_array().unwrap().len(), 3);
    assert_eq!(json["categories"][0]["status"], "missing");
}

#[test]
fn single_file_mode_creates_parent_and_writes() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.jpg");
    write_image(&input, 512, ImageFormat::Jpeg);
    let output = dir.path().join("nested").join("out.png");

    let outcome =
        process_image_to_path(&input, &output, &EnhanceParams::default(), None).unwrap();
    assert!(matches!(outcome, FileOutcome::Written { .. }));
    let img = image::open(&output).unwrap();
    assert_eq!(img.color(), ColorType::L8);
    assert_eq!((img.width(), img.height()), (256, 256));
}

#[test]
fn blocked_output_folder_fails_only_that_category() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    for category in [Category::Normal, Category::ViralPneumonia] {
        let dir = input.path().join(category.folder_name());
        fs::create_dir(&dir).unwrap();
        write_image(&dir.join("s.png"), 64, ImageFormat::Png);
    }
    // a regular file where the Normal output folder should be created
    fs::write(output.path().join("Normal"), b"occupied").unwrap();

    let report = process_dataset(
        input.path(),
        output.path(),
        &EnhanceParams::default(),
        &BatchOptions::default(),
    )
    .unwrap();

    let normal = report.category(Category::Normal).unwrap();
    assert_eq!(normal.status, CategoryStatus::Failed);
    assert!(normal.error.is_some());
    assert_eq!(normal.written, 0);

    let viral = report.category(Category::ViralPneumonia).unwrap();
    assert_eq!(viral.status, CategoryStatus::Processed);
    assert_eq!(viral.written, 1);
    assert!(output.path().join("Viral Pneumonia").join("s.png").is_file());
    assert_eq!(report.written(), 1);
}

#[test]
fn output_root_that_is_a_file_fails_every_present_category() {
    let input = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();

    let opacity = input.path().join("Lung_Opacity");
    fs::create_dir(&opacity).unwrap();
    write_image(&opacity.join("x.png"), 64, ImageFormat::Png);
    let output_root = scratch.path().join("not-a-dir");
    fs::write(&output_root, b"occupied").unwrap();

    let report = process_dataset(
        input.path(),
        &output_root,
        &EnhanceParams::default(),
        &BatchOptions::default(),
    )
    .unwrap();

    let opacity_report = report.category(Category::LungOpacity).unwrap();
    assert_eq!(opacity_report.status, CategoryStatus::Failed);
    assert!(opacity_report.error.is_some());
    assert_eq!(
        report.category(Category::Normal).unwrap().status,
        CategoryStatus::Missing
    );
    assert_eq!(report.written(), 0);
    assert!(output_root.is_file());
}

#[test]
fn write_failure_is_tallied_and_siblings_still_written() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let normal = input.path().join("Normal");
    fs::create_dir(&normal).unwrap();
    for name in ["a.png", "b.png", "c.png"] {
        write_image(&normal.join(name), 64, ImageFormat::Png);
    }
    // the output path for b.png is taken by a directory
    fs::create_dir_all(output.path().join("Normal").join("b.png")).unwrap();

    let report = process_dataset(
        input.path(),
        output.path(),
        &EnhanceParams::default(),
        &BatchOptions::default(),
    )
    .unwrap();

    let normal_report = report.category(Category::Normal).unwrap();
    assert_eq!(normal_report.status, CategoryStatus::Processed);
    assert_eq!(normal_report.found, 3);
    assert_eq!(normal_report.written, 2);
    assert_eq!(normal_report.failed, 1);
    let out_dir = output.path().join("Normal");
    assert!(out_dir.join("a.png").is_file());
    assert!(out_dir.join("b.png").is_dir());
    assert!(out_dir.join("c.png").is_file());
}

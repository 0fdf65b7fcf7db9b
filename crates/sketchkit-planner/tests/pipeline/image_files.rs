use image::{Rgba, RgbaImage};
use sketchkit_core::Point;
use sketchkit_planner::{Bitmap, ImageBitmap, InstructionAssembler, PlannerConfig};
use tempfile::tempdir;

fn drawing() -> RgbaImage {
    let mut img = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
    for x in 2..6 {
        img.put_pixel(x, 4, Rgba([10, 10, 10, 255]));
    }
    img
}

#[test]
fn test_plan_png_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("line.png");
    drawing().save(&path).unwrap();

    let instruction = InstructionAssembler::new(PlannerConfig {
        min_region_size: 4,
        ..PlannerConfig::default()
    })
    .plan_image_file(&path)
    .unwrap();

    assert_eq!(instruction.regions.len(), 1);
    assert_eq!(instruction.end_point(), *instruction.path.last().unwrap());
    assert_eq!(
        instruction.bounding_box(),
        Some((Point::new(2, 4), Point::new(5, 4)))
    );
}

#[test]
fn test_loaded_bitmap_thresholds() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("line.png");
    drawing().save(&path).unwrap();

    let bitmap = ImageBitmap::from_file(&path, 0.5).unwrap();
    assert_eq!((bitmap.width(), bitmap.height()), (8, 8));
    assert!(bitmap.is_foreground(3, 4));
    assert!(!bitmap.is_foreground(3, 3));
}

#[test]
fn test_invalid_threshold_rejected_before_loading() {
    let assembler = InstructionAssembler::new(PlannerConfig {
        luminosity_threshold: -0.1,
        ..PlannerConfig::default()
    });
    assert!(assembler.plan_image_file("missing.png").is_err());
}

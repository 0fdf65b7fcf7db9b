use sketchkit_core::Point;
use sketchkit_planner::{
    build_tour, connect, vectorize, InstructionAssembler, PixelMask, PlannerConfig, RegionFinder,
};

fn points(raw: &[(i64, i64)]) -> Vec<Point> {
    raw.iter().copied().map(Point::from).collect()
}

#[test]
fn test_full_three_by_three_is_one_region() {
    let mask = PixelMask::from_rows(&["###", "###", "###"]);
    let regions = RegionFinder::new(1).find_regions(&mask);
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].len(), 9);
}

#[test]
fn test_opposite_corners_tour_distance() {
    let mask = PixelMask::from_pixels(6, 6, [(0, 0), (5, 5)]);
    let regions = RegionFinder::new(1).find_regions(&mask);
    assert_eq!(regions.len(), 2);

    let tour = build_tour(&regions);
    assert_eq!(tour.total_distance(), 10);
    assert_eq!(tour.order(), &[0, 1]);
}

#[test]
fn test_l_shaped_connector() {
    assert_eq!(
        connect(Point::new(0, 0), Point::new(3, 2)),
        points(&[(0, 0), (1, 0), (2, 0), (3, 0), (3, 1), (3, 2)])
    );
}

#[test]
fn test_vectorize_two_runs() {
    let path = points(&[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)]);
    assert_eq!(vectorize(&path), points(&[(2, 0), (0, 2)]));
}

#[test]
fn test_shapes_drawn_as_one_stroke() {
    let mask = PixelMask::from_rows(&[
        "..........",
        ".####.....",
        ".#..#.....",
        ".####.....",
        "..........",
        "......###.",
        "......###.",
        "......###.",
    ]);
    let instruction = InstructionAssembler::new(PlannerConfig {
        min_region_size: 5,
        ..PlannerConfig::default()
    })
    .assemble(&mask);

    assert_eq!(instruction.regions.len(), 2);
    assert_eq!(instruction.path[0], Point::new(0, 0));
    for w in instruction.path.windows(2) {
        assert!(w[0].is_adjacent(&w[1]));
    }
    for region in &instruction.regions {
        for p in region.pixels() {
            assert!(instruction.path.contains(p), "{} not drawn", p);
        }
    }
    let total: Point = instruction.vectors.iter().copied().sum();
    assert_eq!(Some(&total), instruction.path.last());
}

#[test]
fn test_noise_below_minimum_is_not_drawn() {
    let mask = PixelMask::from_rows(&["#.........", "..........", "....######"]);
    let instruction = InstructionAssembler::new(PlannerConfig {
        min_region_size: 3,
        ..PlannerConfig::default()
    })
    .assemble(&mask);

    assert_eq!(instruction.regions.len(), 1);
    // (0, 0) is still the origin, so it appears on the connector even though
    // the single-pixel region was dropped.
    assert_eq!(instruction.connectors[0].first(), Some(&Point::new(0, 0)));
    assert_eq!(instruction.connectors[0].last(), Some(&Point::new(4, 2)));
}

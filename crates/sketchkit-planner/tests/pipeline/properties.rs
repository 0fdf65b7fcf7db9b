use proptest::prelude::*;
use sketchkit_core::Point;
use sketchkit_planner::{
    connect, get_plotter_instructions, trace, vectorize, Bitmap, InstructionAssembler, PixelMask,
    PlannerConfig, RegionFinder,
};
use std::collections::HashSet;

fn mask_strategy() -> impl Strategy<Value = PixelMask> {
    (1u32..12, 1u32..12).prop_flat_map(|(w, h)| {
        proptest::collection::vec(any::<bool>(), (w * h) as usize).prop_map(move |cells| {
            let pixels = cells
                .into_iter()
                .enumerate()
                .filter(|(_, on)| *on)
                .map(|(i, _)| (i as u32 % w, i as u32 / w));
            PixelMask::from_pixels(w, h, pixels)
        })
    })
}

fn dense_mask_strategy() -> impl Strategy<Value = PixelMask> {
    (8u32..32, 8u32..32, 40u32..90).prop_flat_map(|(w, h, density)| {
        proptest::collection::vec(0u32..100, (w * h) as usize).prop_map(move |cells| {
            let pixels = cells
                .into_iter()
                .enumerate()
                .filter(|(_, roll)| *roll < density)
                .map(|(i, _)| (i as u32 % w, i as u32 / w));
            PixelMask::from_pixels(w, h, pixels)
        })
    })
}

fn point_strategy() -> impl Strategy<Value = Point> {
    (-50i64..50, -50i64..50).prop_map(|(x, y)| Point::new(x, y))
}

proptest! {
    #[test]
    fn prop_regions_are_disjoint_and_large_enough(mask in mask_strategy(), min in 1usize..5) {
        let regions = RegionFinder::new(min).find_regions(&mask);
        let mut seen = HashSet::new();
        for region in &regions {
            prop_assert!(region.len() >= min);
            for p in region.pixels() {
                prop_assert!(mask.is_foreground(p.x as u32, p.y as u32));
                prop_assert!(seen.insert(*p), "pixel {} in two regions", p);
            }
            for p in region.outline() {
                prop_assert!(region.contains(p));
                prop_assert!(p.neighbors().any(|n| !region.contains(&n)));
            }
        }
    }

    #[test]
    fn prop_min_one_keeps_every_foreground_pixel(mask in mask_strategy()) {
        let regions = RegionFinder::new(1).find_regions(&mask);
        let total: usize = regions.iter().map(|r| r.len()).sum();
        prop_assert_eq!(total, mask.count());
    }

    #[test]
    fn prop_connector_shape(a in point_strategy(), b in point_strategy()) {
        let path = connect(a, b);
        prop_assert_eq!(path.first(), Some(&a));
        prop_assert_eq!(path.last(), Some(&b));
        prop_assert_eq!(path.len() as u64, a.manhattan_distance(&b) + 1);
        for w in path.windows(2) {
            prop_assert_eq!(w[0].manhattan_distance(&w[1]), 1);
        }
    }

    #[test]
    fn prop_vector_sum_matches_displacement(path in proptest::collection::vec(point_strategy(), 0..40)) {
        let total: Point = vectorize(&path).into_iter().sum();
        let expected = match (path.first(), path.last()) {
            (Some(first), Some(last)) => *last - *first,
            _ => Point::new(0, 0),
        };
        prop_assert_eq!(total, expected);
    }

    #[test]
    fn prop_trace_is_contiguous_and_covers(mask in mask_strategy()) {
        for region in RegionFinder::new(1).find_regions(&mask) {
            let pixels: HashSet<Point> = region.pixels().iter().copied().collect();
            let path = trace(&pixels, region.pixels()[0]);
            for w in path.windows(2) {
                prop_assert!(w[0].is_adjacent(&w[1]));
            }
            let covered: HashSet<Point> = path.into_iter().collect();
            prop_assert_eq!(covered, pixels);
        }
    }

    #[test]
    fn prop_instruction_draws_every_region(mask in mask_strategy()) {
        let instruction = InstructionAssembler::new(PlannerConfig {
            min_region_size: 1,
            ..PlannerConfig::default()
        })
        .assemble(&mask);

        let drawn: HashSet<Point> = instruction.path.iter().copied().collect();
        for region in &instruction.regions {
            for p in region.pixels() {
                prop_assert!(drawn.contains(p));
            }
        }
        let total: Point = instruction.vectors.iter().copied().sum();
        prop_assert_eq!(total, instruction.path.last().copied().unwrap_or_default());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn prop_trace_covers_dense_regions(mask in dense_mask_strategy()) {
        for region in RegionFinder::new(1).find_regions(&mask) {
            let pixels: HashSet<Point> = region.pixels().iter().copied().collect();
            let path = trace(&pixels, region.pixels()[0]);
            for w in path.windows(2) {
                prop_assert!(w[0].is_adjacent(&w[1]));
            }
            let covered: HashSet<Point> = path.into_iter().collect();
            prop_assert_eq!(covered.len(), pixels.len(), "region of {} pixels", pixels.len());
        }
    }
}

#[test]
fn test_default_min_region_size_drops_specks() {
    let mask = PixelMask::from_rows(&["##.....", ".......", "...####", "...####", "...####"]);
    let instruction = get_plotter_instructions(&mask);
    assert_eq!(instruction.regions.len(), 1);
    assert_eq!(instruction.regions[0].len(), 12);
}

//! Instruction assembly
//!
//! Runs the whole planning pipeline for one image:
//!
//! 1. segment the bitmap into regions
//! 2. order the regions with a greedy tour
//! 3. bridge consecutive regions with L-shaped connectors
//! 4. bridge the origin to the pixel nearest to it
//! 5. trace the union from the origin as one continuous path
//! 6. compress the path into translation vectors

use crate::bitmap::{Bitmap, ImageBitmap, DEFAULT_LUMINOSITY_THRESHOLD};
use crate::connector::connect;
use crate::error::{PlannerError, PlannerResult};
use crate::region::{Region, RegionFinder, DEFAULT_MIN_REGION_SIZE};
use crate::tour::build_tour;
use crate::vectorizer::vectorize;
use crate::walker::trace;
use serde::{Deserialize, Serialize};
use sketchkit_core::{Point, Vector, ORIGIN};
use std::collections::HashSet;
use std::path::Path;

/// Planning knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Regions with fewer pixels are dropped as noise
    pub min_region_size: usize,
    /// Pixels with luminosity strictly below this are foreground
    pub luminosity_threshold: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_region_size: DEFAULT_MIN_REGION_SIZE,
            luminosity_threshold: DEFAULT_LUMINOSITY_THRESHOLD,
        }
    }
}

impl PlannerConfig {
    /// Validate parameters
    pub fn validate(&self) -> PlannerResult<()> {
        if self.min_region_size == 0 {
            return Err(PlannerError::InvalidParameter {
                name: "min_region_size".to_string(),
                reason: "must be >= 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.luminosity_threshold) {
            return Err(PlannerError::InvalidParameter {
                name: "luminosity_threshold".to_string(),
                reason: format!("must be within 0..=1, got {}", self.luminosity_threshold),
            });
        }
        Ok(())
    }
}

/// Everything planned for one image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlotterInstruction {
    /// Relative moves, starting from the origin
    pub vectors: Vec<Vector>,
    /// Absolute pixel path the vectors were compressed from
    pub path: Vec<Point>,
    /// Kept regions, in discovery order
    pub regions: Vec<Region>,
    /// Region indices in visiting order
    pub tour: Vec<usize>,
    /// Bridges: the origin connector first, then one per tour hop
    pub connectors: Vec<Vec<Point>>,
}

impl PlotterInstruction {
    /// True when there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Outline of every region, in region order
    pub fn outlines(&self) -> impl Iterator<Item = &[Point]> + '_ {
        self.regions.iter().map(Region::outline)
    }

    /// `(min, max)` corners over all outline pixels
    pub fn bounding_box(&self) -> Option<(Point, Point)> {
        let mut pixels = self.outlines().flatten();
        let first = *pixels.next()?;
        Some(pixels.fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        }))
    }

    /// Where the stylus stops after the last vector
    pub fn end_point(&self) -> Point {
        self.vectors.iter().copied().sum::<Point>() + ORIGIN
    }
}

/// Plans images into [`PlotterInstruction`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct InstructionAssembler {
    config: PlannerConfig,
}

impl InstructionAssembler {
    /// Create an assembler with the given knobs
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Planning knobs in use
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Decode an image file and plan it
    pub fn plan_image_file<P: AsRef<Path>>(&self, path: P) -> PlannerResult<PlotterInstruction> {
        self.config.validate()?;
        let bitmap = ImageBitmap::from_file(path, self.config.luminosity_threshold)?;
        Ok(self.assemble(&bitmap))
    }

    /// Plan a bitmap
    pub fn assemble<B: Bitmap + ?Sized>(&self, bitmap: &B) -> PlotterInstruction {
        let regions = RegionFinder::new(self.config.min_region_size).find_regions(bitmap);
        if regions.is_empty() {
            tracing::info!("No regions found, nothing to draw");
            return PlotterInstruction::default();
        }

        let tour = build_tour(&regions);
        let mut union: HashSet<Point> = regions
            .iter()
            .flat_map(|r| r.pixels().iter().copied())
            .collect();

        let mut hops = Vec::with_capacity(tour.len().saturating_sub(1));
        for (from, to) in tour.edges() {
            if let Some((a, b)) = regions[from].nearest_connecting_points(&regions[to]) {
                hops.push(connect(a, b));
            }
        }
        union.extend(hops.iter().flatten().copied());

        // Nearest to the origin, ties broken by coordinate order.
        let entry = union
            .iter()
            .copied()
            .min_by_key(|p| (p.manhattan_distance(&ORIGIN), *p))
            .unwrap_or(ORIGIN);
        let origin_connector = connect(ORIGIN, entry);
        union.extend(origin_connector.iter().copied());

        let path = trace(&union, ORIGIN);
        let vectors = vectorize(&path);

        let mut connectors = Vec::with_capacity(hops.len() + 1);
        connectors.push(origin_connector);
        connectors.extend(hops);

        tracing::info!(
            "Planned {} regions: {} path pixels, {} vectors, tour distance {}",
            regions.len(),
            path.len(),
            vectors.len(),
            tour.total_distance()
        );

        PlotterInstruction {
            vectors,
            path,
            regions,
            tour: tour.order().to_vec(),
            connectors,
        }
    }
}

/// Plan a bitmap with the default [`PlannerConfig`]
pub fn get_plotter_instructions<B: Bitmap + ?Sized>(bitmap: &B) -> PlotterInstruction {
    InstructionAssembler::default().assemble(bitmap)
}

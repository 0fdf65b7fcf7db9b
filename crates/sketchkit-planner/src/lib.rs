//! # SketchKit Planner
//!
//! Turns a raster image into a single continuous stylus path for a two-knob
//! drawing toy, and compresses that path into relative moves.
//!
//! ## Pipeline
//!
//! - **Bitmap**: foreground test on a decoded image or an explicit mask
//! - **Regions**: flood-fill segmentation with outline extraction
//! - **Tour**: greedy nearest-neighbour visiting order
//! - **Connectors**: L-shaped bridges between regions
//! - **Walker**: continuous depth-first trace with shortest-path backtracking
//! - **Vectorizer**: direction-run compression
//! - **Instruction**: orchestration into a [`PlotterInstruction`]

pub mod bitmap;
pub mod connector;
pub mod error;
pub mod instruction;
pub mod region;
pub mod tour;
pub mod vectorizer;
pub mod walker;

pub use bitmap::{Bitmap, ImageBitmap, PixelMask, DEFAULT_LUMINOSITY_THRESHOLD};
pub use connector::connect;
pub use error::{PlannerError, PlannerResult};
pub use instruction::{get_plotter_instructions, InstructionAssembler, PlannerConfig, PlotterInstruction};
pub use region::{Region, RegionFinder, DEFAULT_MIN_REGION_SIZE};
pub use tour::{build_tour, build_tour_with, Tour};
pub use vectorizer::vectorize;
pub use walker::trace;

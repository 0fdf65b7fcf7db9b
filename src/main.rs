use anyhow::{Context, Result};
use clap::Parser;
use sketchkit::{
    init_logging, FileSettingsStore, MotionQueueConfig, NullPinController, PinController,
    PlannerConfig, PlotterInstruction, Sketchbot,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Plan an image into stylus moves and draw it on the plotter
#[derive(Parser, Debug)]
#[command(name = "sketchkit", version, about)]
struct Cli {
    /// Image file to draw (PNG, JPEG, BMP, ...)
    image: PathBuf,

    /// Only plan the image and print a summary; the motors never move
    #[arg(long)]
    plan_only: bool,

    /// Drive real GPIO lines instead of the null pin controller
    #[arg(long)]
    hardware: bool,

    /// Directory holding hardwareSettings.json and configSettings.json
    #[arg(long, value_name = "DIR")]
    settings_dir: Option<PathBuf>,

    /// Regions with fewer pixels are ignored
    #[arg(long, default_value_t = 10)]
    min_region_size: usize,

    /// Pixels darker than this luminosity (0..1) are drawn
    #[arg(long, default_value_t = 0.5)]
    threshold: f64,

    /// Re-home against the end stops before drawing
    #[arg(long)]
    reset_first: bool,
}

fn open_pins(hardware: bool) -> Result<Arc<dyn PinController>> {
    if hardware {
        gpio_pins()
    } else {
        Ok(Arc::new(NullPinController::new()))
    }
}

#[cfg(feature = "hardware")]
fn gpio_pins() -> Result<Arc<dyn PinController>> {
    let pins = sketchkit::GpiodPinController::open_default().context("Failed to open GPIO chip")?;
    Ok(Arc::new(pins))
}

#[cfg(not(feature = "hardware"))]
fn gpio_pins() -> Result<Arc<dyn PinController>> {
    anyhow::bail!("built without the `hardware` feature; rebuild with --features hardware")
}

fn print_summary(instruction: &PlotterInstruction) {
    println!("regions:    {}", instruction.regions.len());
    println!("path:       {} pixels", instruction.path.len());
    println!("vectors:    {}", instruction.vectors.len());
    match instruction.bounding_box() {
        Some((min, max)) => println!("bounds:     {} .. {}", min, max),
        None => println!("bounds:     (empty)"),
    }
    println!("end point:  {}", instruction.end_point());
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let store = match &cli.settings_dir {
        Some(dir) => FileSettingsStore::in_directory(dir),
        None => FileSettingsStore::in_config_dir().context("Failed to locate settings directory")?,
    };
    tracing::info!(
        "Using settings {} and {}",
        store.hardware_path().display(),
        store.config_path().display()
    );

    let planner = PlannerConfig {
        min_region_size: cli.min_region_size,
        luminosity_threshold: cli.threshold,
    };
    let pins = open_pins(cli.hardware && !cli.plan_only)?;
    let bot = Sketchbot::with_config(Arc::new(store), pins, planner, MotionQueueConfig::default());

    let instruction = bot
        .plan_image(&cli.image)
        .with_context(|| format!("Failed to plan {}", cli.image.display()))?;
    print_summary(&instruction);

    if cli.plan_only || instruction.is_empty() {
        bot.shutdown();
        return Ok(());
    }

    if cli.reset_first {
        bot.reset()?;
    }
    bot.queue_instruction(&instruction)?;

    while bot.is_job_active() || bot.pending_jobs() > 0 {
        std::thread::sleep(Duration::from_millis(100));
    }
    tracing::info!("Drawing finished at {}", bot.plotter().lock().position());

    bot.shutdown();
    Ok(())
}

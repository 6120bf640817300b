use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use image::{DynamicImage, ImageReader};
use url::Url;

use carspot::detection::continuous::{ContinuousDetection, FrameSource};
use carspot::detection::normalize::RawImage;
use carspot::detection::specs::SpecResolver;
use carspot::{CatalogEntry, DetectedCar, DetectionConfig, DetectionError, DetectionPipeline};

#[derive(Parser)]
#[command(name = "carspot")]
#[command(about = "Detect a competitor vehicle from a photo and look up its specs")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Base URL of the recognition service (falls back to CARSPOT_API_URL)
    #[arg(long, value_name = "URL")]
    api_base: Option<Url>,

    /// Stabilization delay before the first request, in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Resolve a full spec record when the detection has no exact catalog hit
    #[arg(long)]
    resolve_specs: bool,

    /// Re-run detection on the input at a fixed interval until Ctrl-C
    #[arg(long)]
    continuous: bool,

    /// Interval between continuous cycles, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 3000)]
    interval_ms: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Re-reads the input file each cycle, standing in for a camera stream.
struct FileFrameSource {
    path: PathBuf,
}

impl FrameSource for FileFrameSource {
    fn next_frame(&mut self) -> anyhow::Result<DynamicImage> {
        let img = ImageReader::open(&self.path)?
            .decode()
            .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
        Ok(img)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let mut config = DetectionConfig::default();
    let api_base = args.api_base.or_else(|| {
        std::env::var("CARSPOT_API_URL")
            .ok()
            .and_then(|value| Url::parse(&value).ok())
    });
    if let Some(api_base) = api_base {
        config = config.with_api_base(api_base);
    }
    if let Some(delay) = args.delay_ms {
        config = config
            .with_upload_delay(Duration::from_millis(delay))
            .with_capture_delay(Duration::from_millis(delay));
    }
    if args.continuous {
        config = config.with_continuous_interval(Duration::from_millis(args.interval_ms));
    }

    let pipeline = DetectionPipeline::new(config)?;

    // Best-effort probe; a failure is logged, never fatal.
    pipeline.client().health_check().await;

    if args.continuous {
        return run_continuous(Arc::new(pipeline), args.image_path, args.resolve_specs).await;
    }

    let data = std::fs::read(&args.image_path)
        .with_context(|| format!("Failed to read {}", args.image_path.display()))?;
    let input = RawImage::from_bytes(data).with_file_name(args.image_path.display().to_string());

    match pipeline.detect_upload(&input).await {
        Ok(car) => {
            print_result(&pipeline, &car, args.resolve_specs);
            Ok(())
        }
        Err(err) => {
            let message = match &err {
                DetectionError::Conversion(_) => "Could not process the image",
                DetectionError::Unreachable { .. } => {
                    "Recognition service unreachable - is it running?"
                }
                DetectionError::NoDetection { .. } => "No vehicle recognized - retake the photo",
                DetectionError::Thumbnail(_) => "Could not store the captured frame",
            };
            Err(anyhow::Error::new(err).context(message))
        }
    }
}

async fn run_continuous(
    pipeline: Arc<DetectionPipeline>,
    path: PathBuf,
    resolve_specs: bool,
) -> anyhow::Result<()> {
    let source = FileFrameSource { path };
    let mut detection = ContinuousDetection::spawn(pipeline.clone(), source);

    println!("Continuous detection started, press Ctrl-C to stop.");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("\nStopping after the current cycle...");
                detection.handle.stop();
            }
            result = detection.results.recv() => {
                match result {
                    Some(Ok(car)) => print_result(&pipeline, &car, resolve_specs),
                    Some(Err(err)) => println!("Cycle failed: {}", err),
                    None => break,
                }
            }
        }
    }

    Ok(())
}

fn print_result(pipeline: &DetectionPipeline, car: &DetectedCar, resolve_specs: bool) {
    println!("\n=== Detection Result ===");
    println!("Make:       {}", car.make);
    println!("Model:      {}", car.model);
    if !car.year.is_empty() {
        println!("Year:       {}", car.year);
    }
    println!("Confidence: {}%", car.confidence);
    if let Some(thumbnail) = &car.thumbnail {
        println!("Thumbnail:  {}", thumbnail.display());
    }

    if !car.specs.is_empty() {
        println!("\nSpecs (catalog):");
        if let Some(horsepower) = car.specs.horsepower {
            println!("  Horsepower:   {} hp", horsepower);
        }
        if let Some(acceleration) = car.specs.acceleration {
            println!("  0-60:         {:.1} s", acceleration);
        }
        if let Some(mpg) = car.specs.mpg {
            println!("  Combined MPG: {}", mpg);
        }
        if let Some(fuel_type) = &car.specs.fuel_type {
            println!("  Fuel:         {}", fuel_type);
        }
        if let Some(seating) = car.specs.seating {
            println!("  Seating:      {}", seating);
        }
        if let Some(cargo) = car.specs.cargo {
            println!("  Cargo:        {:.1} cu ft", cargo);
        }
    } else if resolve_specs {
        let resolver = SpecResolver::new(pipeline.catalog());
        let record = resolver.resolve(&car.make, &car.model);
        println!("\nSpecs (resolved, estimates):");
        print_record(&record);
    } else {
        println!("\nSpecs:      (no exact catalog match)");
    }
}

fn print_record(record: &CatalogEntry) {
    println!("  Horsepower:   {} hp", record.horsepower);
    println!("  0-60:         {:.1} s", record.acceleration);
    println!("  Combined MPG: {}", record.mpg_combined);
    println!("  MSRP:         ${}", record.msrp);
    println!("  Seating:      {}", record.seating);
    if let Some(cargo) = record.cargo_volume {
        println!("  Cargo:        {:.1} cu ft", cargo);
    }
    if let Some(trunk) = record.trunk_volume {
        println!("  Trunk:        {:.1} cu ft", trunk);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "carspot=debug" } else { "carspot=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

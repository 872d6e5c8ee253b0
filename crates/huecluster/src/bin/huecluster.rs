use clap::Parser;
use huecluster::{Config, DEFAULT_ITERATIONS, DEFAULT_K, DEFAULT_SIZE, KMeans, image_io, render, rng};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

/// Quantize an image to k colors with k-means in RGB space.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Image to quantize
    input: PathBuf,

    /// Folder the resized image, swatches and colour map are written to
    #[arg(short, long, default_value = "huecluster_out")]
    out_dir: PathBuf,

    /// Number of clusters
    #[arg(short, default_value_t = DEFAULT_K)]
    k: usize,

    /// Side of the square the image is resized to
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: u32,

    /// Number of assign/update rounds
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,

    /// Seed of the random centroid initialization
    #[arg(long, default_value_t = rng::RANDOM_SEED)]
    seed: u64,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Config {
            size: args.size,
            k: args.k,
            iterations: args.iterations,
            seed: args.seed,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args = Args::parse();
    let config = Config::from(&args);

    info!("Input image: {}", args.input.display());
    info!(
        "k={}, size={}, iterations={}, seed={}",
        config.k, config.size, config.iterations, config.seed
    );

    let t = Instant::now();
    let grid = image_io::load(&args.input, config.size)?;

    let mut rng = rng::with_seed(config.seed);
    let mut kmeans = KMeans::new(&grid).with_iterations(config.iterations);
    let centroids = kmeans.run(&mut rng, config.k)?;
    let segmented = kmeans.render_segmented_grid()?;
    info!("Clustered in {:?}", t.elapsed());

    std::fs::create_dir_all(&args.out_dir)?;

    render::to_image(&grid).save(args.out_dir.join("resized.png"))?;
    for (i, &centroid) in centroids.iter().enumerate() {
        render::swatch(centroid, render::SWATCH_SIZE)
            .save(args.out_dir.join(format!("centroid_{i}.png")))?;
    }
    render::to_image(&segmented).save(args.out_dir.join("segmented.png"))?;
    render::comparison(&grid, &centroids, &segmented)
        .save(args.out_dir.join("comparison.png"))?;
    info!("Output saved to {}", args.out_dir.display());

    for centroid in &centroids {
        println!("{} {} {}", centroid.r, centroid.g, centroid.b);
    }

    Ok(())
}

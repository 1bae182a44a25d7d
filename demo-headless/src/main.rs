use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use stud_map_core::{
    Anchor, DebugRenderer, GridConfig, HeightField, HeightFieldScene, SamplingVolume, Structure,
    StudMapAnalyser, StudMapError, SurfaceKind, Vec3,
};
use tracing::{error, info};

/// Stud map demo: samples a generated city block and exports the brick map
#[derive(Parser, Debug)]
#[command(name = "stud-map-demo")]
#[command(about = "Generate a Lego stud map of a procedural city block", long_about = None)]
struct Args {
    /// Cells along the map's X axis
    #[arg(short = 'x', long, default_value_t = 100)]
    width: usize,

    /// Cells along the map's Z axis
    #[arg(short = 'z', long, default_value_t = 100)]
    depth: usize,

    /// Cell edge length in world units
    #[arg(short, long, default_value_t = 1.0)]
    scale: f32,

    /// Height of the sampling volume (probe length)
    #[arg(long, default_value_t = 10.0)]
    max_height: f32,

    /// Rotation of the sampling area about the up axis, in degrees
    #[arg(long, default_value_t = 0.0)]
    yaw: f32,

    /// Measure heights from the lowest surface instead of the volume floor
    #[arg(short, long)]
    flatten_ground: bool,

    /// Number of buildings to scatter over the block
    #[arg(short, long, default_value_t = 12)]
    buildings: u32,

    /// Seed for the generated scene
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Spread the sweep over all cores
    #[arg(short, long)]
    parallel: bool,

    /// Directory the map is written to
    #[arg(short, long, default_value = "maps")]
    out_dir: PathBuf,

    /// File name of the exported map, without extension
    #[arg(short, long, default_value = "stud_map")]
    name: String,
}

/// Prints the sampling volume instead of drawing it
struct ConsoleRenderer;

impl DebugRenderer for ConsoleRenderer {
    fn draw_volume(&mut self, volume: &SamplingVolume) {
        println!(
            "Sampling volume: centre ({:.1}, {:.1}, {:.1}), size {:.1} x {:.1} x {:.1}",
            volume.center.x, volume.center.y, volume.center.z, volume.size.x, volume.size.y, volume.size.z
        );
    }
}

/// Sampling area described by the command line, checked before any scene is built
fn grid_config(args: &Args) -> Result<GridConfig, StudMapError> {
    let config = GridConfig {
        width: args.width,
        depth: args.depth,
        scale: args.scale,
        max_height: args.max_height,
        anchor: Anchor::new(Vec3::new(0.0, args.max_height, 0.0), args.yaw.to_radians()),
        flatten_ground: args.flatten_ground,
        ..GridConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Rolling ground with buildings of random footprint and height
fn city_block(config: &GridConfig, buildings: u32, rng: &mut StdRng) -> HeightFieldScene {
    let extent_x = config.width as f32 * config.scale;
    let extent_z = config.depth as f32 * config.scale;

    let n = 16;
    let heightmap: Vec<f32> = (0..n * n).map(|_| rng.random_range(0.0..1.0)).collect();
    let ground_relief = (config.max_height * 0.1).min(1.5);
    let terrain = HeightField::from_heightmap(extent_x, extent_z, &heightmap, n, n, ground_relief, 0.0)
        .with_origin(-extent_x / 2.0, -extent_z / 2.0);

    let mut structures = Vec::with_capacity(buildings as usize);
    for _ in 0..buildings {
        let cx = rng.random_range(-extent_x / 2.0..=extent_x / 2.0);
        let cz = rng.random_range(-extent_z / 2.0..=extent_z / 2.0);
        let size_x = rng.random_range(0.05f32..=0.2) * extent_x;
        let size_z = rng.random_range(0.05f32..=0.2) * extent_z;
        let base = terrain.elevation_at(cx, cz);
        let height = rng.random_range(0.2f32..=0.85) * config.max_height;
        structures.push(Structure::building(cx, cz, size_x, size_z, base, height));
    }

    let mut scene = HeightFieldScene::new(terrain);
    for structure in structures {
        scene.add_structure(structure);
    }
    scene
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    println!("=== Stud Map Demo ===\n");

    let config = match grid_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid sampling area: {e}");
            std::process::exit(2);
        }
    };

    let mut rng = StdRng::seed_from_u64(args.seed);
    let scene = city_block(&config, args.buildings, &mut rng);
    println!(
        "Generated city block with {} buildings (seed {})",
        scene.structures().len(),
        args.seed
    );

    let analyser = match StudMapAnalyser::new(config, scene) {
        Ok(analyser) => analyser,
        Err(e) => {
            error!("Invalid sampling area: {e}");
            std::process::exit(2);
        }
    };
    analyser.draw_debug(&mut ConsoleRenderer);

    let result = if args.parallel {
        analyser.compute_parallel()
    } else {
        analyser.compute()
    };
    let map = match result {
        Ok(map) => map,
        Err(e) => {
            error!("Sampling failed: {e}");
            std::process::exit(1);
        }
    };

    println!("\nKind     | Cells | Bricks");
    println!("---------|-------|-------");
    for kind in SurfaceKind::ALL {
        println!(
            "{:8} | {:5} | {:6}",
            kind.name(),
            map.count_of(kind),
            map.units_of(kind)
        );
    }
    println!("\nTotal bricks: {}", map.total_unit_count);
    println!("Tallest column: {} bricks", map.max_units());

    match map.export_to(&args.out_dir, &args.name) {
        Ok(path) => info!("Exported stud map to {}", path.display()),
        Err(e) => {
            error!("Export failed: {e}");
            std::process::exit(1);
        }
    }
}

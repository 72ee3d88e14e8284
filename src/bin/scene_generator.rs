use clap::{Parser, Subcommand};
use std::path::Path;
use ttc_fusion::config::FusionConfig;
use ttc_fusion::io::{object_from_json, object_to_json};
use ttc_fusion::projection::{Calibration, Projector};
use ttc_fusion::synthetic::{SceneConfig, generate_frame_pair};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic frame pair with a closing lead vehicle
    Generate {
        /// Output directory
        #[arg(short, long)]
        output: String,

        /// Scene configuration JSON
        #[arg(short, long)]
        scene_config: Option<String>,

        /// Random seed, overrides the scene config
        #[arg(long)]
        seed: Option<u64>,

        /// Closing speed in m/s, overrides the scene config
        #[arg(long)]
        closing_speed: Option<f64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Commands::Generate {
            output,
            scene_config,
            seed,
            closing_speed,
        } => {
            let mut scene: SceneConfig = match scene_config {
                Some(path) => object_from_json(&path)?,
                None => SceneConfig::default(),
            };
            if let Some(seed) = seed {
                scene.seed = seed;
            }
            if let Some(speed) = closing_speed {
                scene.closing_speed = speed;
            }
            generate_scene(&output, &scene)?;
        }
    }

    Ok(())
}

fn generate_scene(output_dir: &str, scene: &SceneConfig) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(output_dir)?;
    let out = |name: &str| Path::new(output_dir).join(name).to_string_lossy().to_string();

    let calibration = Calibration::kitti_default();
    let pair = generate_frame_pair(scene, &Projector::new(&calibration))?;
    let config = FusionConfig {
        frame_rate: scene.frame_rate,
        ..Default::default()
    };

    object_to_json(&out("frame_pair.json"), &pair)?;
    object_to_json(&out("calibration.json"), &calibration)?;
    object_to_json(&out("config.json"), &config)?;
    object_to_json(&out("scene.json"), scene)?;

    println!(
        "Generated frame pair in {} (expected ttc {:.3} s)",
        output_dir,
        scene.expected_ttc()
    );
    Ok(())
}

use clap::Parser;
use std::time::Instant;
use ttc_fusion::config::FusionConfig;
use ttc_fusion::io::{object_from_json, object_to_json, report_to_string, write_report};
use ttc_fusion::projection::Calibration;
use ttc_fusion::types::FramePair;
use ttc_fusion::TtcPipeline;

#[derive(Parser)]
#[command(version, about, author)]
struct TtcCli {
    /// path to a frame pair json
    frame_pair: String,

    /// fusion config json, defaults are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// calibration json, KITTI cam00 when omitted
    #[arg(long)]
    calibration: Option<String>,

    /// write the full report as json
    #[arg(short, long)]
    report: Option<String>,

    /// write a text summary
    #[arg(short, long)]
    summary: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = TtcCli::parse();

    let config: FusionConfig = match &cli.config {
        Some(path) => object_from_json(path)?,
        None => FusionConfig::default(),
    };
    let calibration: Calibration = match &cli.calibration {
        Some(path) => object_from_json(path)?,
        None => Calibration::kitti_default(),
    };
    let mut pair: FramePair = object_from_json(&cli.frame_pair)?;

    let pipeline = TtcPipeline::new(config, &calibration)?;
    let now = Instant::now();
    let report = pipeline.process(&mut pair)?;
    log::info!("processing took {:.6} sec", now.elapsed().as_secs_f64());

    print!("{}", report_to_string(&report));
    if let Some(path) = &cli.report {
        object_to_json(path, &report)?;
    }
    if let Some(path) = &cli.summary {
        write_report(path, &report)?;
    }
    Ok(())
}

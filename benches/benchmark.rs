use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ttc_fusion::clustering::cluster_range_points;
use ttc_fusion::config::FusionConfig;
use ttc_fusion::matching::match_regions;
use ttc_fusion::projection::{Calibration, Projector};
use ttc_fusion::synthetic::{SceneConfig, generate_frame_pair};
use ttc_fusion::ttc::compute_ttc_camera;
use ttc_fusion::TtcPipeline;

fn scene() -> SceneConfig {
    SceneConfig {
        lidar_points: 2000,
        keypoints: 300,
        ..Default::default()
    }
}

fn bench_cluster_range_points(c: &mut Criterion) {
    let projector = Projector::new(&Calibration::kitti_default());
    let pair = generate_frame_pair(&scene(), &projector).unwrap();

    c.bench_function("cluster_range_points", |b| {
        b.iter(|| {
            let mut regions = pair.curr.regions.clone();
            cluster_range_points(&mut regions, black_box(&pair.curr.range_points), 0.1, &projector)
        })
    });
}

fn bench_match_regions(c: &mut Criterion) {
    let projector = Projector::new(&Calibration::kitti_default());
    let pair = generate_frame_pair(&scene(), &projector).unwrap();

    c.bench_function("match_regions", |b| {
        b.iter(|| {
            match_regions(
                black_box(&pair.matches),
                &pair.prev.keypoints,
                &pair.curr.keypoints,
                &pair.prev.regions,
                &pair.curr.regions,
            )
        })
    });
}

fn bench_camera_ttc(c: &mut Criterion) {
    let projector = Projector::new(&Calibration::kitti_default());
    let pair = generate_frame_pair(&scene(), &projector).unwrap();

    c.bench_function("compute_ttc_camera", |b| {
        b.iter(|| {
            compute_ttc_camera(
                &pair.prev.keypoints,
                &pair.curr.keypoints,
                black_box(&pair.matches),
                10.0,
                100.0,
            )
        })
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let calibration = Calibration::kitti_default();
    let pair = generate_frame_pair(&scene(), &Projector::new(&calibration)).unwrap();
    let pipeline = TtcPipeline::new(FusionConfig::default(), &calibration).unwrap();

    c.bench_function("process_frame_pair", |b| {
        b.iter(|| {
            let mut pair = pair.clone();
            pipeline.process(black_box(&mut pair))
        })
    });
}

criterion_group!(
    benches,
    bench_cluster_range_points,
    bench_match_regions,
    bench_camera_ttc,
    bench_pipeline
);
criterion_main!(benches);

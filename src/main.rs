use anyhow::Result;
use tracing::info;

use semantic_mapper::config::MapperConfig;
use semantic_mapper::io::Recording;
use semantic_mapper::map::voxel::downsampled;
use semantic_mapper::mapping::Mapper;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("semantic_mapper=info".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let recording_path = args
        .next()
        .unwrap_or_else(|| "data/recording".to_string());

    let config = match args.next() {
        Some(path) => {
            info!("Loading configuration from {}", path);
            MapperConfig::load(&path)?
        }
        None => MapperConfig::default(),
    };

    info!("Loading recording from {}", recording_path);
    let recording = Recording::open(&recording_path)?;
    info!(
        "Loaded {} frames on a {}x{} grid",
        recording.len(),
        recording.width,
        recording.height
    );

    let mut mapper = Mapper::new(&config);
    let mut total_ms = 0.0;

    for frame in recording.frames() {
        let frame = frame?;
        let summary = mapper.process_frame(frame.robot_to_world, &frame.detections, &frame.points);
        total_ms += summary.timing.total_ms;
    }

    let global = mapper.global_map();
    info!(
        "Done! Processed {} frames: {} objects, {} points ({:.2} ms mapping)",
        mapper.frame_count(),
        global.len(),
        global.total_points(),
        total_ms
    );

    for (id, object) in global.iter() {
        let c = &object.centroid;
        let (lo, hi) = (object.min(), object.max());
        info!(
            "{} {:<12} centroid [{:.2}, {:.2}, {:.2}] box [{:.2}, {:.2}, {:.2}]..[{:.2}, {:.2}, {:.2}] {} points",
            id,
            object.label,
            c.x,
            c.y,
            c.z,
            lo.x,
            lo.y,
            lo.z,
            hi.x,
            hi.y,
            hi.z,
            object.num_points()
        );

        if let Some(voxel_size) = config.voxel_size {
            let thin = downsampled(object, voxel_size);
            info!(
                "{} voxelized at {:.3} m: {} -> {} points",
                id,
                voxel_size,
                object.num_points(),
                thin.num_points()
            );
        }
    }

    Ok(())
}

//! This example runs the attention engine headlessly on a small barchart-like
//! scene, sweeping a synthetic focus point across the marks and printing the
//! collected attention at the end.
//!
//! ```sh
//! cargo run --example headless -- --frames 600
//! ```
//!
//! To view more options, run with `--help`:
//!
//! ```sh
//! cargo run --example headless -- --help
//! ```

use clap::Parser;
use glam::*;

use wgpu_attention_viewer as av;

/// The command line arguments.
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "\
    A headless demo of GPU-picking visual attention tracking.\n\
    \n\
    Sweeps a synthetic focus point over a barchart scene and reports the\n\
    attention each bar accumulated.\n\
    "
)]
struct Args {
    /// The number of simulated frames.
    #[arg(short, long, default_value_t = 600)]
    frames: u32,

    /// The simulated frame time in milliseconds.
    #[arg(long, default_value_t = 16.0)]
    dt_ms: f32,

    /// The side length of the square viewport in pixels.
    #[arg(long, default_value_t = 512)]
    viewport: u32,

    /// The side length of the area pick window, must be odd.
    #[arg(long, default_value_t = 61)]
    area_pick_size: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    pollster::block_on(run(args))
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    log::debug!("Creating wgpu instance");
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

    log::debug!("Requesting adapter");
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions::default())
        .await
        .ok_or("no suitable GPU adapter found")?;

    log::debug!("Requesting device");
    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_limits: adapter.limits(),
                ..Default::default()
            },
            None,
        )
        .await?;

    // Five bars along x, plus a scatter point floating above the middle one.
    let bar_color = av::Rgb8::from_hex("#4488CC")?;
    let mut set = av::MarkSet::new();
    for i in 0..5u8 {
        let x = (i as f32 - 2.0) * 2.5;
        let height = 1.0 + i as f32 * 0.5;
        set.register(av::Mark::cuboid(
            i + 1,
            bar_color,
            Vec3::new(x, height * 0.5, 10.0),
            Vec3::new(1.0, height * 0.5, 1.0),
        ))?;
    }
    set.register(av::Mark::sphere(
        6,
        av::Rgb8::from_hex("#CC8844")?,
        Vec3::new(0.0, 4.0, 10.0),
        0.8,
        16,
        12,
    ))?;

    let viewport = UVec2::splat(args.viewport);
    let params = av::EngineParams {
        area_pick_size: args.area_pick_size,
        live_update: true,
        flags: av::FeedbackFlags::ALLOW_EMPHASIS | av::FeedbackFlags::ALLOW_DEEMPHASIS,
        ..av::EngineParams::default()
    };

    log::debug!("Creating attention engine");
    let mut engine = av::Engine::new(
        &device,
        wgpu::TextureFormat::Rgba8Unorm,
        set,
        viewport,
        params,
    )?;
    engine.camera.pos = Vec3::new(0.0, 2.0, 0.0);

    engine.start();

    for frame in 0..args.frames {
        // The focus sweeps left to right and back, dwelling near the middle.
        let t = frame as f32 / args.frames.max(1) as f32;
        let sweep = (t * std::f32::consts::TAU).sin();
        let focus = IVec2::new(
            (viewport.x as f32 * (0.5 + 0.35 * sweep)) as i32,
            (viewport.y as f32 * 0.45) as i32,
        );

        let report = engine.update(&device, &queue, args.dt_ms, focus).await?;
        for (id, state) in &report.transitions {
            log::info!("Mark {id} entered {state:?}");
        }
    }

    engine.show_results(&queue);

    let visibility = engine.visibility_report(&device, &queue).await?;

    println!("attention after {} frames:", args.frames);
    for attention in engine.attention().iter() {
        let peak = attention.faces.iter().copied().max().unwrap_or(0);
        println!(
            "  mark {:>2}: cumulative {:>4}, level {:>3}, state {:?}, peak face count {}{}",
            attention.id,
            attention.cumulative,
            attention.level,
            attention.state,
            peak,
            if visibility.occluded.contains(&attention.id) {
                " (occluded)"
            } else {
                ""
            },
        );
    }

    Ok(())
}

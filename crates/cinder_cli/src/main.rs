//! Cinder - CPU path tracer.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};

use cinder_core::PpmWriter;
use cinder_render::{render, BvhNode, Camera};

mod scenes;

use scenes::SceneName;

/// Log levels usable as a clap value
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments
#[derive(Parser)]
#[command(name = "cinder")]
#[command(about = "An offline Monte Carlo path tracer")]
struct Args {
    /// Scene to render
    #[arg(long, value_enum, default_value = "cornell-box")]
    scene: SceneName,

    /// Override the scene's image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Override the scene's image height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Override the scene's samples per pixel
    #[arg(long, short = 's')]
    samples: Option<u32>,

    /// Override the scene's maximum bounce depth
    #[arg(long)]
    depth: Option<u32>,

    /// Input asset for scenes that load one (earth texture, model OBJ)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output file path (binary PPM)
    #[arg(short, long, default_value = "output.ppm")]
    output: String,

    /// Set the logging level
    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.clone().into())
        .init();

    let mut scene = scenes::build(args.scene, args.input.as_deref())?;
    if let Some(width) = args.width {
        scene.width = width;
    }
    if let Some(height) = args.height {
        scene.height = height;
    }
    if let Some(samples) = args.samples {
        scene.options.num_samples = samples;
    }
    if let Some(depth) = args.depth {
        scene.options.max_depth = depth;
    }

    info!(
        "scene {:?}: {} objects, {}x{}, {} samples per pixel",
        args.scene,
        scene.world.len(),
        scene.width,
        scene.height,
        scene.options.num_samples
    );

    let root = BvhNode::new(scene.world);
    let camera = Camera::new(&scene.options, scene.width, scene.height);
    let framebuffer = render(&camera, &root);

    let mut ppm = PpmWriter::create(&args.output, framebuffer.width, framebuffer.height)
        .with_context(|| format!("failed to open {}", args.output))?;
    for pixel in framebuffer.pixels() {
        ppm.write_color(*pixel)?;
    }
    ppm.finish()?;

    info!("wrote {}", args.output);
    Ok(())
}

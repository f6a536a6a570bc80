use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use heightview::gfx::rendering::ShadingMode;
use heightview::{HeightviewApp, ViewerConfig};

#[derive(Parser, Debug)]
#[command(name = "heightview")]
#[command(about = "Interactive viewer for heightmap images and raw Float32 grids")]
struct Args {
    /// Heightmap to open on startup (`.bsq` raw grid or any common image format)
    path: Option<PathBuf>,

    /// Window width in logical pixels
    #[arg(long, default_value_t = 1200)]
    width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Present frames as fast as possible
    #[arg(long)]
    no_vsync: bool,

    /// Initial vertical exaggeration in percent
    #[arg(long, default_value_t = 100.0)]
    height_percent: f32,

    /// Initial shading mode
    #[arg(long, value_enum, default_value_t = Mode::Phong)]
    mode: Mode,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Phong,
    Normal,
}

impl From<Mode> for ShadingMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Phong => ShadingMode::PhongLit,
            Mode::Normal => ShadingMode::NormalVisualization,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("heightview=info"))
        .init();

    let args = Args::parse();
    let config = ViewerConfig::default()
        .with_window_size(args.width, args.height)
        .with_vsync(!args.no_vsync)
        .with_height_percent(args.height_percent)
        .with_shading_mode(args.mode.into())
        .with_initial_file(args.path);

    let app = HeightviewApp::new(config).context("Failed to create the event loop")?;
    app.run().context("Heightmap viewer exited with an error")?;
    Ok(())
}

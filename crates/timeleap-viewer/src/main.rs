mod app;
mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use winit::dpi::LogicalSize;

use timeleap_compare::{SiteCatalog, SiteError, ViewConfig};
use timeleap_engine::device::GpuInit;
use timeleap_engine::logging::{init_logging, LoggingConfig};
use timeleap_engine::window::{Runtime, RuntimeConfig};

use crate::app::ViewerApp;
use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(match &cli.log {
        Some(filter) => LoggingConfig::with_filter(filter.clone()),
        None => LoggingConfig::default(),
    });

    let catalog = match &cli.sites {
        Some(path) => SiteCatalog::load(path)
            .with_context(|| format!("loading sites from {}", path.display()))?,
        None => SiteCatalog::builtin().context("built-in site catalog")?,
    };
    let start = match &cli.site {
        Some(id) => catalog.index_of(id).ok_or_else(|| SiteError::NotFound(id.clone()))?,
        None => 0,
    };

    let config = ViewConfig::default().with_band_height(cli.band_height);
    let app = ViewerApp::new(config, catalog, start, load_font());

    let gpu_init = GpuInit {
        present_mode: if cli.no_vsync {
            wgpu::PresentMode::AutoNoVsync
        } else {
            wgpu::PresentMode::Fifo
        },
        ..GpuInit::default()
    };
    let runtime = RuntimeConfig {
        title: "TimeLeap".to_string(),
        initial_size: LogicalSize::new(cli.width, cli.height),
    };

    Runtime::run(runtime, gpu_init, app)
}

fn load_font() -> Vec<u8> {
    [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
    .unwrap_or_default()
}

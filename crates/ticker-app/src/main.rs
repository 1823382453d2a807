//! Animated BTC/USDT price ticker rendered with SDF text and a thick-line graph.

mod app;
mod assets;
mod config;
mod price;
mod scene;

use std::process::ExitCode;

use anyhow::{Context, Result};

use ticker_engine::device::GpuInit;
use ticker_engine::logging::{LoggingConfig, init_logging};
use ticker_engine::window::Runtime;

use crate::app::TickerApp;
use crate::assets::load_assets;
use crate::config::TickerConfig;
use crate::scene::TickerScene;

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = TickerConfig::from_env()?;
    let assets = load_assets(&config.assets).context("cannot start without font assets")?;

    let scene = TickerScene::new(&config, assets.metrics, config.window.aspect_ratio());
    let app = TickerApp::new(scene, assets.atlas, config.window.clear_color());

    // Colors are authored for a non-sRGB target.
    let gpu_init = GpuInit {
        prefer_srgb: false,
        ..GpuInit::default()
    };

    log::info!("starting ticker");
    Runtime::run(config.window.runtime_config(), gpu_init, app)
}

// NES Frontend - Main Entry Point
//
// Loads the configuration, fetches the ROM catalog and runs the window.

use clap::Parser;
use nes_frontend::catalog::{DirectoryFetcher, RomCatalogLoader};
use nes_frontend::display::{run_frontend, PixelsSurface, WindowConfig};
use nes_frontend::emulator::{config::CONFIG_FILE, Emulator, FrontendConfig};
use nes_frontend::machine::ReferenceCore;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "nes-frontend")]
#[command(about = "Run program images from a ROM catalog", long_about = None)]
struct Args {
    /// Configuration file
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Directory containing roms/index.json (overrides the configuration)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Initial window scale (overrides the configuration)
    #[arg(long)]
    scale: Option<u32>,

    /// Catalog entry to load once the catalog arrives
    #[arg(long)]
    rom: Option<String>,

    /// Print the catalog and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = FrontendConfig::load_or_default(&args.config);

    let root = args.root.unwrap_or_else(|| config.catalog.root.clone());
    let loader = RomCatalogLoader::new(Arc::new(DirectoryFetcher::new(&root)));
    log::info!("Catalog root: {}", root.display());

    if args.list {
        let entries = loader.fetch_catalog()?;
        for entry in entries {
            println!("{:<32} {}", entry.name, entry.file);
        }
        return Ok(());
    }

    let window_config = WindowConfig::new()
        .with_scale(args.scale.unwrap_or(config.video.scale))
        .with_vsync(config.video.vsync);

    let mut emulator: Emulator<PixelsSurface> =
        Emulator::new(Box::new(ReferenceCore::new()), &config);
    if let Some(name) = args.rom {
        emulator.request_autoload(name);
    }

    run_frontend(window_config, emulator, loader)?;

    log::info!("Window closed");
    Ok(())
}

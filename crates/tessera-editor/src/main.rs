//! Click-to-paint tile editor.
//!
//! The left panel shows the sprite sheet; clicking a tile selects it.
//! Clicking a map cell paints the selection there, or clears the cell if it
//! already holds that tile. Arrow keys or WASD pan, Home recenters, Escape quits.

mod editor;
mod layout;
mod paint;
mod palette;

use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Parser;

use tessera_engine::assets::{FsLoader, ImageCache};
use tessera_engine::device::GpuInit;
use tessera_engine::logging::{init_logging, LoggingConfig};
use tessera_engine::tilemap::{SpriteFilter, TileMapConfig};
use tessera_engine::window::{Runtime, RuntimeConfig};

use editor::{EditorApp, EditorSettings, MapSource};

#[derive(Parser, Debug)]
#[command(name = "tessera-editor", about = "Paint sprite sheet tiles into a tile map")]
struct Args {
    /// Directory image sources are resolved against
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Sprite sheet image
    #[arg(long, default_value = "tiles.png")]
    sheet: String,

    /// Tile map image to edit; starts from a blank map when omitted
    #[arg(long)]
    map: Option<String>,

    /// Blank map width in cells
    #[arg(long, default_value_t = 64)]
    width: u32,

    /// Blank map height in cells
    #[arg(long, default_value_t = 48)]
    height: u32,

    /// Sprite cell size in sheet pixels
    #[arg(long, default_value_t = 16)]
    tile_size: u32,

    /// Screen pixels per sheet pixel
    #[arg(long, default_value_t = 2.0)]
    scale: f32,

    /// Filter sprites linearly instead of nearest-neighbor
    #[arg(long)]
    linear: bool,

    /// Wrap the map around its edges
    #[arg(long)]
    repeat: bool,

    /// Log filter, e.g. "debug" or "tessera_engine=trace"
    #[arg(long)]
    log: Option<String>,
}

impl Args {
    fn settings(&self) -> Result<EditorSettings> {
        ensure!(self.tile_size > 0, "--tile-size must be positive");
        ensure!(
            self.scale.is_finite() && self.scale > 0.0,
            "--scale must be a positive number, got {}",
            self.scale
        );

        let map = match &self.map {
            Some(source) => MapSource::Image(source.clone()),
            None => {
                ensure!(self.width > 0 && self.height > 0, "blank map must have cells");
                MapSource::Blank { width: self.width, height: self.height }
            }
        };

        Ok(EditorSettings {
            sheet: self.sheet.clone(),
            map,
            config: TileMapConfig {
                tile_size: self.tile_size,
                scale: self.scale,
                filter: if self.linear { SpriteFilter::Linear } else { SpriteFilter::Nearest },
                repeat: self.repeat,
            },
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LoggingConfig { env_filter: args.log.clone(), ..Default::default() });

    let settings = args.settings()?;
    log::info!("editing {:?} with sheet `{}`", settings.map, settings.sheet);

    let images = ImageCache::new(FsLoader::new(&args.assets));
    let app = EditorApp::new(images, &settings);

    Runtime::run(
        RuntimeConfig { title: "tessera editor".to_string(), ..Default::default() },
        GpuInit::default(),
        app,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_blank_map() {
        let args = Args::parse_from(["tessera-editor"]);
        let settings = args.settings().unwrap();
        assert!(matches!(settings.map, MapSource::Blank { width: 64, height: 48 }));
        assert_eq!(settings.config.tile_size, 16);
        assert_eq!(settings.config.scale, 2.0);
        assert_eq!(settings.config.filter, SpriteFilter::Nearest);
        assert!(!settings.config.repeat);
    }

    #[test]
    fn map_image_and_flags() {
        let args = Args::parse_from([
            "tessera-editor",
            "--map",
            "level1.png",
            "--linear",
            "--repeat",
        ]);
        let settings = args.settings().unwrap();
        assert!(matches!(settings.map, MapSource::Image(ref s) if s == "level1.png"));
        assert_eq!(settings.config.filter, SpriteFilter::Linear);
        assert!(settings.config.repeat);
    }

    #[test]
    fn bad_scale_is_rejected() {
        let args = Args::parse_from(["tessera-editor", "--scale", "0"]);
        assert!(args.settings().is_err());
    }

    #[test]
    fn zero_tile_size_is_rejected() {
        let args = Args::parse_from(["tessera-editor", "--tile-size", "0"]);
        assert!(args.settings().is_err());
    }
}

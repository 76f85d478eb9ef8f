use std::fs;
use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};
use egui::Color32;
use serde::Deserialize;

use crate::pixel::{GridSize, Rgb};

const CONFIG_FILE_NAME: &str = "tofucat.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Side length of the drawing canvas in screen points.
    pub display_size: u32,
    pub default_grid_size: u32,
    pub grid_stroke: [u8; 3],
    pub default_brush: [u8; 3],
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            display_size: 512,
            default_grid_size: 16,
            grid_stroke: [0xDD, 0xDD, 0xDD],
            default_brush: [0x32, 0xA8, 0x52],
        }
    }
}

impl EditorConfig {
    pub const fn display_size(&self) -> u32 {
        if self.display_size < 128 {
            128
        } else if self.display_size > 2048 {
            2048
        } else {
            self.display_size
        }
    }

    pub fn grid_size(&self) -> GridSize {
        GridSize::clamped(self.default_grid_size)
    }

    pub const fn grid_stroke(&self) -> Rgb {
        Rgb::from_array(self.grid_stroke)
    }

    pub const fn brush_color32(&self) -> Color32 {
        let [r, g, b] = self.default_brush;
        Color32::from_rgb(r, g, b)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MixerConfig {
    pub download_name: String,
    /// Image shown on the mixer page before anything is uploaded.
    pub placeholder_image: Option<PathBuf>,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            download_name: "tofucat-masterpiece.png".to_string(),
            placeholder_image: Some(PathBuf::from("tofucat.png")),
        }
    }
}

impl MixerConfig {
    pub fn download_name(&self) -> &str {
        let trimmed = self.download_name.trim();
        if trimmed.is_empty() {
            "tofucat-masterpiece.png"
        } else {
            trimmed
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub editor: EditorConfig,
    pub mixer: MixerConfig,
    pub image_limits: ImageLimits,
}

impl AppConfig {
    pub fn load() -> Self {
        for path in Self::candidate_paths() {
            if let Ok(contents) = fs::read_to_string(&path) {
                match Self::parse(&contents) {
                    Ok(cfg) => {
                        log::info!("Loaded config from {}", path.display());
                        return cfg;
                    }
                    Err(err) => {
                        log::warn!("Failed to parse config {}: {err}", path.display());
                    }
                }
            }
        }
        log::debug!("No config file found, using defaults");
        Self::default()
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<Self>(contents)
    }

    pub fn effective_image_limits(&self) -> ImageLimits {
        self.image_limits.sanitized()
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(exe_path) = std::env::current_exe()
            && let Some(dir) = exe_path.parent()
        {
            paths.push(dir.join(CONFIG_FILE_NAME));
        }

        if let Some(proj_dirs) = ProjectDirs::from("dev", "TofuCat", "TofuCat") {
            paths.push(proj_dirs.config_dir().join(CONFIG_FILE_NAME));
        }

        if let Some(base_dirs) = BaseDirs::new() {
            paths.push(base_dirs.config_dir().join("tofucat").join(CONFIG_FILE_NAME));
        }

        paths
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageLimits {
    pub image_dim: u32,
    pub total_pixels: u64,
    pub alloc_bytes: u64,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            image_dim: 12_000,
            total_pixels: 80_000_000,       // ~80 MP
            alloc_bytes: 512 * 1024 * 1024, // 512 MiB
        }
    }
}

impl ImageLimits {
    pub fn sanitized(&self) -> Self {
        let dim = self.image_dim.clamp(64, 100_000);
        let pixels = self.total_pixels.clamp(1_000_000, 5_000_000_000); // 1 MP .. 5 GP
        let alloc = self
            .alloc_bytes
            .clamp(8 * 1024 * 1024, 8 * 1024 * 1024 * 1024); // 8 MiB .. 8 GiB
        Self {
            image_dim: dim,
            total_pixels: pixels,
            alloc_bytes: alloc,
        }
    }
}

use std::collections::HashMap;
use std::path::Path;

use crate::post::Platform;
use crate::ConfigError;

/// Maps a platform to its display color.
pub trait ColorLookup {
    fn color_for(&self, platform: Platform) -> Option<&str>;
}

/// Platform color palette, keyed by platform display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: HashMap<Platform, String>,
}

impl Palette {
    #[must_use]
    pub fn new(colors: HashMap<Platform, String>) -> Self {
        Self { colors }
    }
}

impl ColorLookup for Palette {
    fn color_for(&self, platform: Platform) -> Option<&str> {
        self.colors.get(&platform).map(String::as_str)
    }
}

/// Load the palette file (YAML, or JSON since YAML is a superset).
///
/// Entries naming platforms this build does not know are ignored.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed.
pub fn load_palette(path: &Path) -> Result<Palette, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PaletteFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_palette(&content)
}

fn parse_palette(content: &str) -> Result<Palette, ConfigError> {
    let raw: HashMap<String, String> = serde_yaml::from_str(content)?;
    let mut colors = HashMap::new();
    for (name, color) in raw {
        match name.parse::<Platform>() {
            Ok(platform) => {
                colors.insert(platform, color);
            }
            Err(_) => tracing::debug!(platform = %name, "ignoring palette entry"),
        }
    }
    Ok(Palette::new(colors))
}

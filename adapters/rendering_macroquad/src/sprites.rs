use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use colony_core::Rect;
use colony_rendering::Color;
use macroquad::{
    math::{Rect as MacroquadRect, Vec2 as MacroquadVec2},
    texture::{self, DrawTextureParams, FilterMode, Texture2D},
};

use crate::to_macroquad_color;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Sampling applied when the atlas is scaled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Filter {
    /// Keeps pixel edges crisp.
    #[default]
    Nearest,
    /// Blends neighbouring texels.
    Linear,
}

impl Filter {
    fn to_macroquad(self) -> FilterMode {
        match self {
            Self::Nearest => FilterMode::Nearest,
            Self::Linear => FilterMode::Linear,
        }
    }
}

/// Texture every sprite rectangle is cut from.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    texture: Texture2D,
}

impl SpriteAtlas {
    /// Loads the atlas named by the manifest at `path`.
    ///
    /// A missing or broken manifest or atlas is logged and yields `None`;
    /// sprites are then drawn as placeholder quads.
    pub(crate) fn load_or_placeholders(path: impl AsRef<Path>) -> Option<Self> {
        Self::with_loader_or_placeholders(path, default_loader)
    }

    /// Returns the default manifest path relative to the working directory.
    #[must_use]
    pub(crate) fn default_manifest_path() -> PathBuf {
        PathBuf::from("assets/manifest.toml")
    }

    /// Draws the atlas region `source` scaled into `dest`.
    pub(crate) fn draw(&self, source: Rect, dest: Rect, tint: Color) {
        let params = DrawTextureParams {
            source: Some(MacroquadRect::new(
                source.x,
                source.y,
                source.width,
                source.height,
            )),
            dest_size: Some(MacroquadVec2::new(dest.width, dest.height)),
            ..DrawTextureParams::default()
        };

        texture::draw_texture_ex(
            self.texture,
            dest.x,
            dest.y,
            to_macroquad_color(tint),
            params,
        );
    }

    fn with_loader_or_placeholders(
        path: impl AsRef<Path>,
        loader: impl FnMut(&AtlasEntry) -> Result<Texture2D>,
    ) -> Option<Self> {
        match Self::from_manifest_with_loader(path, loader) {
            Ok(atlas) => Some(atlas),
            Err(error) => {
                log::warn!("{error:#}; drawing placeholder sprites");
                None
            }
        }
    }

    fn from_manifest_with_loader(
        path: impl AsRef<Path>,
        mut loader: impl FnMut(&AtlasEntry) -> Result<Texture2D>,
    ) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read sprite manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let entry = parse_manifest(&contents, &base)?;
        Self::from_entry(entry, &mut loader)
    }

    fn from_entry(
        entry: AtlasEntry,
        loader: &mut impl FnMut(&AtlasEntry) -> Result<Texture2D>,
    ) -> Result<Self> {
        let texture = loader(&entry)
            .with_context(|| format!("failed to load sprite atlas from {}", entry.path.display()))?;
        log::debug!("loaded sprite atlas from {}", entry.path.display());
        Ok(Self { texture })
    }
}

fn default_loader(entry: &AtlasEntry) -> Result<Texture2D> {
    let bytes = fs::read(&entry.path)
        .with_context(|| format!("failed to read sprite atlas at {}", entry.path.display()))?;
    let texture = Texture2D::from_file_with_format(&bytes, None);
    texture.set_filter(entry.filter.to_macroquad());
    Ok(texture)
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    version: u32,
    atlas: String,
    #[serde(default)]
    filter: Filter,
}

#[derive(Clone, Debug, PartialEq)]
struct AtlasEntry {
    path: PathBuf,
    filter: Filter,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<AtlasEntry> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sprite manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }
    if manifest.atlas.trim().is_empty() {
        bail!("sprite manifest names an empty atlas path");
    }

    Ok(AtlasEntry {
        path: base_path.join(manifest.atlas),
        filter: manifest.filter,
    })
}

//! Font discovery and loading.
//!
//! Report titles, table cells and chart labels contain Hangul, so the built-in PDF fonts are not
//! usable.  A single TrueType font is loaded once, parsed for both `genpdf` (PDF text layer) and
//! `rusttype` (chart rasterization), and shared read-only afterwards.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use genpdf::fonts::{FontData, FontFamily};
use log::{info, warn};

use crate::error::FontLoadError;

/// Name of the bundled font.
pub const DEFAULT_FONT_NAME: &str = "NotoSansKR";

/// File name looked up in every font directory.
pub const DEFAULT_FONT_FILE: &str = "NotoSansKR-Regular.ttf";

/// Environment variable pointing at a font file.
pub const FONT_FILE_ENV: &str = "ATTENDANCE_REPORT_FONT";

/// Environment variable pointing at a directory containing [`DEFAULT_FONT_FILE`].
pub const FONTS_DIR_ENV: &str = "ATTENDANCE_REPORT_FONTS_DIR";

const SYSTEM_FALLBACK_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/noto/NotoSansKR-Regular.ttf",
    "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
    "/usr/share/fonts/nanum/NanumGothic.ttf",
    "/usr/share/fonts/naver-nanum/NanumGothic.ttf",
    "/Library/Fonts/NanumGothic.ttf",
];

/// A parsed font usable for both the PDF text layer and chart rasterization.
///
/// The file is read and parsed once.  Cloning a `ReportFont` shares the parsed data; every
/// [`family`](Self::family) call copies the font bytes for one `genpdf` document.
#[derive(Clone)]
pub struct ReportFont {
    name: String,
    pdf: Arc<FontData>,
    raster: rusttype::Font<'static>,
}

impl ReportFont {
    /// Parses `bytes` as a TrueType font.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, FontLoadError> {
        let name = name.into();
        let raster = rusttype::Font::try_from_vec(bytes.clone()).ok_or_else(|| {
            FontLoadError::with_source(
                format!("Font '{}' could not be parsed for rasterization", name),
                io::Error::new(io::ErrorKind::InvalidData, "unsupported font data"),
            )
        })?;
        let pdf = FontData::new(bytes, None).map_err(|err| {
            FontLoadError::with_source(
                format!("Font '{}' could not be embedded: {}", name, err),
                io::Error::new(io::ErrorKind::InvalidData, err.to_string()),
            )
        })?;

        Ok(Self {
            name,
            pdf: Arc::new(pdf),
            raster,
        })
    }

    /// Reads and parses the font at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FontLoadError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|err| {
            FontLoadError::with_source(
                format!("Failed to read font file {}: {}", path.display(), err),
                err,
            )
        })?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_FONT_NAME.to_owned());
        Self::from_bytes(name, bytes)
    }

    /// Font name, derived from the file name when loaded from disk.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Font family for `genpdf`; all four styles share the same face.
    ///
    /// `genpdf` embeds each style separately, so the rendered PDF carries the face four times
    /// until [`crate::postprocess::dedup_font_files`] merges the copies.
    pub fn family(&self) -> FontFamily<FontData> {
        let face = FontData::clone(&self.pdf);
        FontFamily {
            regular: face.clone(),
            bold: face.clone(),
            italic: face.clone(),
            bold_italic: face,
        }
    }

    /// Font used for chart text.
    pub fn raster(&self) -> &rusttype::Font<'static> {
        &self.raster
    }
}

impl fmt::Debug for ReportFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportFont").field("name", &self.name).finish()
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn bundled_font_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env_path(FONT_FILE_ENV) {
        candidates.push(path);
    }

    if let Some(dir) = env_path(FONTS_DIR_ENV) {
        candidates.push(dir.join(DEFAULT_FONT_FILE));
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            candidates.push(bin_dir.join("assets/fonts").join(DEFAULT_FONT_FILE));
        }
    }

    let manifest_candidate = bundled_fonts_source_dir().join(DEFAULT_FONT_FILE);
    if !candidates.contains(&manifest_candidate) {
        candidates.push(manifest_candidate);
    }

    candidates
}

fn system_font_candidates() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = SYSTEM_FALLBACK_FONTS.iter().map(PathBuf::from).collect();
    for var in ["WINDIR", "SystemRoot"] {
        if let Some(root) = env_path(var) {
            candidates.push(root.join("Fonts").join("malgun.ttf"));
        }
    }
    candidates
}

/// Directory holding the fonts shipped with the crate sources.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

/// Returns the first existing font file, preferring bundled locations over system fonts.
pub fn resolve_font_path() -> Result<PathBuf, FontLoadError> {
    let bundled = bundled_font_candidates();
    if let Some(path) = bundled.iter().find(|path| path.is_file()) {
        return Ok(path.clone());
    }

    let system = system_font_candidates();
    if let Some(path) = system.iter().find(|path| path.is_file()) {
        warn!(
            "Bundled font {} not found; falling back to system font {}",
            DEFAULT_FONT_FILE,
            path.display()
        );
        return Ok(path.clone());
    }

    let checked = bundled
        .iter()
        .chain(system.iter())
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");

    Err(FontLoadError::with_source(
        format!(
            "Unable to locate a Hangul font. Checked: {}. See assets/fonts/README.md or set {} / {}.",
            checked, FONT_FILE_ENV, FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "report font not found"),
    ))
}

/// Locates and loads the report font.
pub fn load_default_font() -> Result<ReportFont, FontLoadError> {
    let path = resolve_font_path()?;
    let font = ReportFont::from_path(&path)?;
    info!("Loaded report font '{}' from {}", font.name(), path.display());
    Ok(font)
}

/// Indicates whether a usable font file can be located.
pub fn default_font_available() -> bool {
    resolve_font_path().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = ReportFont::from_bytes("broken", vec![0, 1, 2, 3]).unwrap_err();
        assert!(err.to_string().contains("broken"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn missing_file_reports_not_found() {
        let err = ReportFont::from_path("/__attendance_report_missing__/font.ttf").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn manifest_directory_is_always_searched() {
        let manifest = bundled_fonts_source_dir().join(DEFAULT_FONT_FILE);
        assert!(bundled_font_candidates().contains(&manifest));
    }
}

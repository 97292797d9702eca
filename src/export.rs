use std::path::Path;

use resvg::usvg;
use tiny_skia::{Pixmap, Transform};

use crate::error::{Error, Result};

/// Directory searched for bundled fonts next to the working directory
const LOCAL_FONT_DIR: &str = "fonts";

/// Output formats chosen from the output file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Png,
    Pdf,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "pdf" => Ok(Self::Pdf),
            _ => Err(Error::UnsupportedFormat(ext)),
        }
    }
}

pub fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(Error::InvalidScale(scale));
    }

    let mut opts = usvg::Options::default();
    {
        let fontdb = opts.fontdb_mut();
        fontdb.load_system_fonts();

        let local_fonts = Path::new(LOCAL_FONT_DIR);
        if local_fonts.is_dir() {
            fontdb.load_fonts_dir(local_fonts);
        }

        let sans = preferred_sans_family(fontdb.faces().flat_map(|f| &f.families));
        if let Some(family) = sans {
            fontdb.set_sans_serif_family(family);
        }
    }

    let tree = usvg::Tree::from_str(svg, &opts)
        .map_err(|e| Error::Export(format!("Failed to parse SVG: {}", e)))?;

    let width = (tree.size().width() * scale).ceil() as u32;
    let height = (tree.size().height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| Error::Export("Failed to create pixmap".to_string()))?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| Error::Export(format!("Failed to encode PNG: {}", e)))
}

pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    use svg2pdf::usvg::fontdb;

    let mut fontdb = fontdb::Database::new();
    fontdb.load_system_fonts();

    let local_fonts = Path::new(LOCAL_FONT_DIR);
    if local_fonts.is_dir() {
        fontdb.load_fonts_dir(local_fonts);
    }

    let sans = preferred_sans_family(fontdb.faces().flat_map(|f| &f.families));
    if let Some(family) = sans {
        fontdb.set_sans_serif_family(family);
    }

    let opts = svg2pdf::usvg::Options {
        fontdb: std::sync::Arc::new(fontdb),
        ..Default::default()
    };

    let tree = svg2pdf::usvg::Tree::from_str(svg, &opts)
        .map_err(|e| Error::Export(format!("Failed to parse SVG: {}", e)))?;

    // Labels are outlined so the PDF does not depend on embedded fonts
    let options = svg2pdf::ConversionOptions {
        embed_text: false,
        ..Default::default()
    };

    svg2pdf::to_pdf(&tree, options, svg2pdf::PageOptions::default())
        .map_err(|e| Error::Export(format!("Failed to convert SVG to PDF: {}", e)))
}

/// First family with "sans" in its name, else the first family found
fn preferred_sans_family<'a, L>(families: impl Iterator<Item = &'a (String, L)>) -> Option<String>
where
    L: 'a,
{
    let mut first: Option<&String> = None;
    for (family, _) in families {
        if family.to_ascii_lowercase().contains("sans") {
            return Some(family.clone());
        }
        first.get_or_insert(family);
    }
    first.cloned()
}

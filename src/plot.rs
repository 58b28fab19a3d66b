// Horizontal bar chart of the most significant terms.
//
// Bars are drawn as SVG. PNG output rasterizes that SVG with resvg and
// PDF output converts the same parsed tree with svg2pdf.

use crate::error::{EnrichrError, Result};
use crate::table::{EnrichedTerm, ResultTable};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use svg::node::element::{Line, Rectangle, Text};
use svg::Document;

/// Nominal SVG resolution used to turn figure inches into pixels.
const SVG_DPI: f32 = 96.0;
/// Raster resolution for PNG output.
const PNG_DPI: f32 = 300.0;

const BAR_COLOR: &str = "#e0474c";
const AXIS_COLOR: &str = "#374151";
const FONT: &str = "Arial, Helvetica, sans-serif";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Svg,
    Png,
    Pdf,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
            ImageFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = EnrichrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(ImageFormat::Svg),
            "png" => Ok(ImageFormat::Png),
            "pdf" => Ok(ImageFormat::Pdf),
            other => Err(EnrichrError::plot(format!(
                "unsupported image format '{}', expected svg, png or pdf",
                other
            ))),
        }
    }
}

/// Figure size in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigSize {
    pub width: f32,
    pub height: f32,
}

impl Default for FigSize {
    fn default() -> Self {
        Self {
            width: 8.0,
            height: 6.0,
        }
    }
}

impl FromStr for FigSize {
    type Err = EnrichrError;

    /// Parse `W,H` (or `WxH`) in inches.
    fn from_str(s: &str) -> Result<Self> {
        let bad = || EnrichrError::plot(format!("figure size must look like 8,6, got '{}'", s));
        let (w, h) = s.split_once([',', 'x']).ok_or_else(bad)?;
        let width: f32 = w.trim().parse().map_err(|_| bad())?;
        let height: f32 = h.trim().parse().map_err(|_| bad())?;
        if width <= 0.0 || height <= 0.0 {
            return Err(bad());
        }
        Ok(Self { width, height })
    }
}

/// Build the chart for terms passing `cutoff`, or `None` when no term does.
pub fn barplot(
    table: &ResultTable,
    cutoff: f64,
    top_term: usize,
    figsize: FigSize,
    title: &str,
) -> Result<Option<Document>> {
    let terms = table.significant_terms(cutoff, top_term)?;
    if terms.is_empty() {
        return Ok(None);
    }
    Ok(Some(draw_bars(&terms, figsize, title)))
}

fn draw_bars(terms: &[EnrichedTerm], figsize: FigSize, title: &str) -> Document {
    let width = figsize.width * SVG_DPI;
    let height = figsize.height * SVG_DPI;
    let left = width * 0.45;
    let right = width - 24.0;
    let top = 48.0;
    let bottom = height - 56.0;

    let scores: Vec<f32> = terms
        .iter()
        .map(|t| neg_log10(t.adjusted_p_value))
        .collect();
    let max_score = scores.iter().copied().fold(0.0_f32, f32::max).max(1e-6);
    let slot = (bottom - top) / terms.len() as f32;
    let bar_height = slot * 0.7;
    let font_size = (slot * 0.35).clamp(8.0, 14.0);

    let mut doc = Document::new()
        .set("viewBox", (0, 0, width, height))
        .set("width", width)
        .set("height", height)
        .add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", width)
                .set("height", height)
                .set("fill", "#ffffff"),
        )
        .add(
            Text::new(title)
                .set("x", (left + right) / 2.0)
                .set("y", top - 18.0)
                .set("text-anchor", "middle")
                .set("font-family", FONT)
                .set("font-size", 16)
                .set("fill", AXIS_COLOR),
        );

    // Most significant term on top.
    for (i, (term, score)) in terms.iter().zip(&scores).enumerate() {
        let y = top + slot * i as f32 + (slot - bar_height) / 2.0;
        let bar_width = (right - left) * score / max_score;
        doc = doc
            .add(
                Rectangle::new()
                    .set("x", left)
                    .set("y", y)
                    .set("width", bar_width)
                    .set("height", bar_height)
                    .set("fill", BAR_COLOR),
            )
            .add(
                Text::new(term.term.as_str())
                    .set("x", left - 8.0)
                    .set("y", y + bar_height / 2.0 + font_size / 3.0)
                    .set("text-anchor", "end")
                    .set("font-family", FONT)
                    .set("font-size", font_size)
                    .set("fill", AXIS_COLOR),
            );
    }

    doc.add(
        Line::new()
            .set("x1", left)
            .set("y1", top)
            .set("x2", left)
            .set("y2", bottom)
            .set("stroke", AXIS_COLOR)
            .set("stroke-width", 1),
    )
    .add(
        Line::new()
            .set("x1", left)
            .set("y1", bottom)
            .set("x2", right)
            .set("y2", bottom)
            .set("stroke", AXIS_COLOR)
            .set("stroke-width", 1),
    )
    .add(
        Text::new(format!("0 - {:.2}", max_score))
            .set("x", right)
            .set("y", bottom + 18.0)
            .set("text-anchor", "end")
            .set("font-family", FONT)
            .set("font-size", 11)
            .set("fill", AXIS_COLOR),
    )
    .add(
        Text::new("-log10(Adjusted P-value)")
            .set("x", (left + right) / 2.0)
            .set("y", bottom + 40.0)
            .set("text-anchor", "middle")
            .set("font-family", FONT)
            .set("font-size", 13)
            .set("fill", AXIS_COLOR),
    )
}

fn neg_log10(p: f64) -> f32 {
    // p == 0 would be infinite; clamp to the smallest positive double.
    (-p.max(f64::MIN_POSITIVE).log10()) as f32
}

/// Write `doc` to `path` in `format`.
pub fn save_chart(doc: &Document, format: ImageFormat, path: &Path) -> Result<()> {
    match format {
        ImageFormat::Svg => svg::save(path, doc).map_err(|e| EnrichrError::io(path, e)),
        ImageFormat::Png => render_png(&parse_tree(doc)?, path),
        ImageFormat::Pdf => render_pdf(&parse_tree(doc)?, path),
    }
}

fn parse_tree(doc: &Document) -> Result<resvg::usvg::Tree> {
    let mut opt = resvg::usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    resvg::usvg::Tree::from_str(&doc.to_string(), &opt)
        .map_err(|e| EnrichrError::plot(e.to_string()))
}

/// PDF pages keep the figure size in inches.
fn render_pdf(tree: &resvg::usvg::Tree, path: &Path) -> Result<()> {
    let pdf = svg2pdf::to_pdf(
        tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions { dpi: SVG_DPI },
    )
    .map_err(|e| EnrichrError::plot(e.to_string()))?;
    std::fs::write(path, pdf).map_err(|e| EnrichrError::io(path, e))
}

fn render_png(tree: &resvg::usvg::Tree, path: &Path) -> Result<()> {

    let scale = PNG_DPI / SVG_DPI;
    let size = tree
        .size()
        .to_int_size()
        .scale_by(scale)
        .ok_or_else(|| EnrichrError::plot("figure size is too small to rasterize"))?;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| EnrichrError::plot("could not allocate image buffer"))?;
    resvg::render(
        tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    pixmap
        .save_png(path)
        .map_err(|e| EnrichrError::plot(format!("{}: {}", path.display(), e)))
}

//! Output sinks
//!
//! A sink turns a finished [`Grid`] into one artifact named after the
//! transform. [`HtmlSink`] writes a standalone HTML page of SVG panels,
//! [`JsonSink`] writes the panel descriptors themselves.

mod html;
mod json;
pub mod svg;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::grid::Grid;

pub use html::HtmlSink;
pub use json::JsonSink;
pub use svg::render_panel_svg;

/// Consumer of composed grids
pub trait OutputSink {
    /// Persist `grid` under `name` and return where it went
    fn emit(&self, name: &str, grid: &Grid) -> Result<PathBuf>;
}

/// Size and reduction limits of rendered panels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelStyle {
    pub width: u32,
    pub height: u32,
    pub caption_size: u32,
    pub line_width: u32,
    /// Curves longer than this are min/max decimated before drawing
    pub max_curve_points: usize,
    /// Heatmaps are block-max reduced to at most (columns, rows) cells
    pub max_heatmap_cells: (usize, usize),
}

impl Default for PanelStyle {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
            caption_size: 16,
            line_width: 1,
            max_curve_points: 4000,
            max_heatmap_cells: (240, 160),
        }
    }
}

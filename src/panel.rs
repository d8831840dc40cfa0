//! Declarative panel descriptions
//!
//! A [`PanelDescriptor`] is the complete, renderer-independent description of
//! one plot: title, axes and a single payload. Transforms return them,
//! the grid compositor arranges them, and an output sink draws them.

use serde::{Deserialize, Serialize};

/// Axis scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AxisScale {
    #[default]
    Linear,
    Log,
}

/// One panel axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub label: String,
    /// Explicit display range; derived from the data when `None`
    pub range: Option<(f64, f64)>,
    pub scale: AxisScale,
}

impl Axis {
    pub fn linear(label: &str) -> Self {
        Self {
            label: label.to_string(),
            range: None,
            scale: AxisScale::Linear,
        }
    }

    pub fn log(label: &str) -> Self {
        Self {
            label: label.to_string(),
            range: None,
            scale: AxisScale::Log,
        }
    }

    pub fn with_range(mut self, low: f64, high: f64) -> Self {
        self.range = Some((low, high));
        self
    }
}

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const FIREBRICK: Rgb = Rgb(178, 34, 34);
    pub const NAVY: Rgb = Rgb(0, 0, 128);
    pub const STEEL_BLUE: Rgb = Rgb(31, 119, 180);
}

/// A 1-D curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub color: Rgb,
    pub alpha: f64,
}

/// A 2-D intensity field on a rectilinear grid
///
/// `values[row][col]` sits at `(x[col], y[row])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub values: Vec<Vec<f64>>,
    /// Colour-scale minimum; lower values saturate to the first colour
    pub color_floor: f64,
}

impl Heatmap {
    /// Largest finite value in the field
    pub fn max_value(&self) -> Option<f64> {
        self.values
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }
}

/// Renderable payload of a panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PanelPayload {
    Heatmap(Heatmap),
    Curves { curves: Vec<Curve> },
}

/// Payload kind, used to check that a grid is structurally uniform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Heatmap,
    Curves(usize),
}

/// Complete description of one panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelDescriptor {
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub payload: PanelPayload,
}

impl PanelDescriptor {
    pub fn heatmap(title: String, x_axis: Axis, y_axis: Axis, heatmap: Heatmap) -> Self {
        Self {
            title,
            x_axis,
            y_axis,
            payload: PanelPayload::Heatmap(heatmap),
        }
    }

    pub fn curves(title: String, x_axis: Axis, y_axis: Axis, curves: Vec<Curve>) -> Self {
        Self {
            title,
            x_axis,
            y_axis,
            payload: PanelPayload::Curves { curves },
        }
    }

    pub fn as_heatmap(&self) -> Option<&Heatmap> {
        match &self.payload {
            PanelPayload::Heatmap(h) => Some(h),
            PanelPayload::Curves { .. } => None,
        }
    }

    pub fn as_curves(&self) -> Option<&[Curve]> {
        match &self.payload {
            PanelPayload::Curves { curves } => Some(curves),
            PanelPayload::Heatmap(_) => None,
        }
    }

    pub fn payload_kind(&self) -> PayloadKind {
        match &self.payload {
            PanelPayload::Heatmap(_) => PayloadKind::Heatmap,
            PanelPayload::Curves { curves } => PayloadKind::Curves(curves.len()),
        }
    }

    /// True when both panels have the same axis kinds and payload kind
    pub fn same_layout(&self, other: &PanelDescriptor) -> bool {
        self.x_axis.label == other.x_axis.label
            && self.x_axis.scale == other.x_axis.scale
            && self.y_axis.label == other.y_axis.label
            && self.y_axis.scale == other.y_axis.scale
            && self.payload_kind() == other.payload_kind()
    }
}

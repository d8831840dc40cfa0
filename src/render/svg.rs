//! SVG panel rendering with plotters
//!
//! Draws one [`PanelDescriptor`] into an SVG string. Heatmaps and long
//! curves are reduced for drawing only; the descriptor is never modified.

use plotters::coord::Shift;
use plotters::prelude::*;

use super::PanelStyle;
use crate::error::Result;
use crate::panel::{Axis, AxisScale, Curve, Heatmap, PanelDescriptor, PanelPayload};

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Bokeh's Magma11 palette, dark to light
const MAGMA_11: [RGBColor; 11] = [
    RGBColor(0x00, 0x00, 0x03),
    RGBColor(0x14, 0x0D, 0x35),
    RGBColor(0x3B, 0x0F, 0x6F),
    RGBColor(0x63, 0x19, 0x7F),
    RGBColor(0x8C, 0x29, 0x80),
    RGBColor(0xB6, 0x36, 0x79),
    RGBColor(0xDD, 0x49, 0x68),
    RGBColor(0xF6, 0x6E, 0x5B),
    RGBColor(0xFD, 0x9F, 0x6C),
    RGBColor(0xFD, 0xCD, 0x90),
    RGBColor(0xFB, 0xFC, 0xBF),
];

/// Render a panel to a standalone SVG document
pub fn render_panel_svg(panel: &PanelDescriptor, style: &PanelStyle) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (style.width, style.height)).into_drawing_area();
        root.fill(&WHITE)?;
        match &panel.payload {
            PanelPayload::Heatmap(heatmap) => draw_heatmap(&root, panel, heatmap, style)?,
            PanelPayload::Curves { curves } => draw_curves(&root, panel, curves, style)?,
        }
        root.present()?;
    }
    Ok(svg)
}

fn draw_heatmap(
    root: &Area<'_>,
    panel: &PanelDescriptor,
    heatmap: &Heatmap,
    style: &PanelStyle,
) -> Result<()> {
    let x_bounds = axis_bounds(&panel.x_axis, heatmap.x.iter().copied(), false);
    let y_bounds = axis_bounds(&panel.y_axis, heatmap.y.iter().copied(), false);

    let mut chart = ChartBuilder::on(root)
        .caption(&panel.title, ("sans-serif", style.caption_size))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d(x_bounds.0..x_bounds.1, y_bounds.0..y_bounds.1)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(panel.x_axis.label.as_str())
        .y_desc(panel.y_axis.label.as_str())
        .draw()?;

    let low = heatmap.color_floor;
    let high = heatmap
        .max_value()
        .filter(|h| *h > low)
        .unwrap_or(low + 1.0);

    let cells = heatmap_cells(heatmap, x_bounds, y_bounds, style.max_heatmap_cells);
    chart.draw_series(cells.into_iter().map(|cell| {
        Rectangle::new(
            [(cell.x0, cell.y0), (cell.x1, cell.y1)],
            magma(cell.value, low, high).filled(),
        )
    }))?;

    Ok(())
}

fn draw_curves(
    root: &Area<'_>,
    panel: &PanelDescriptor,
    curves: &[Curve],
    style: &PanelStyle,
) -> Result<()> {
    let log_x = panel.x_axis.scale == AxisScale::Log;
    let project = |x: f64| if log_x { x.log10() } else { x };

    let series: Vec<(Vec<(f64, f64)>, &Curve)> = curves
        .iter()
        .map(|curve| {
            let points: Vec<(f64, f64)> = curve
                .x
                .iter()
                .zip(&curve.y)
                .filter(|(x, y)| x.is_finite() && y.is_finite() && (!log_x || **x > 0.0))
                .map(|(&x, &y)| (project(x), y))
                .collect();
            (decimate(&points, style.max_curve_points), curve)
        })
        .collect();

    let projected_axis = Axis {
        range: panel.x_axis.range.map(|(lo, hi)| (project(lo), project(hi))),
        ..panel.x_axis.clone()
    };
    let x_bounds = axis_bounds(
        &projected_axis,
        series.iter().flat_map(|(p, _)| p.iter().map(|pt| pt.0)),
        false,
    );
    let y_bounds = axis_bounds(
        &panel.y_axis,
        series.iter().flat_map(|(p, _)| p.iter().map(|pt| pt.1)),
        true,
    );

    let mut chart = ChartBuilder::on(root)
        .caption(&panel.title, ("sans-serif", style.caption_size))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d(x_bounds.0..x_bounds.1, y_bounds.0..y_bounds.1)?;

    let log_formatter = |v: &f64| format_tick(10f64.powf(*v));
    let mut mesh = chart.configure_mesh();
    mesh.x_desc(panel.x_axis.label.as_str())
        .y_desc(panel.y_axis.label.as_str());
    if log_x {
        mesh.x_label_formatter(&log_formatter);
    }
    mesh.draw()?;

    for (points, curve) in series {
        let color = RGBColor(curve.color.0, curve.color.1, curve.color.2).mix(curve.alpha);
        chart.draw_series(LineSeries::new(points, color.stroke_width(style.line_width)))?;
    }

    Ok(())
}

/// Display bounds: a valid explicit range wins, else the data extent
fn axis_bounds(axis: &Axis, data: impl Iterator<Item = f64>, pad: bool) -> (f64, f64) {
    if let Some((lo, hi)) = axis.range {
        if lo.is_finite() && hi.is_finite() && lo < hi {
            return (lo, hi);
        }
    }

    let extent = data
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| {
            Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
        });
    match extent {
        Some((lo, hi)) if lo < hi => {
            let margin = if pad { 0.05 * (hi - lo) } else { 0.0 };
            (lo - margin, hi + margin)
        }
        Some((v, _)) => (v - 1.0, v + 1.0),
        None => (0.0, 1.0),
    }
}

fn format_tick(hz: f64) -> String {
    if hz >= 1000.0 {
        format!("{:.0}k", hz / 1000.0)
    } else {
        format!("{:.0}", hz)
    }
}

/// Linear colour mapper over Magma11; values below `low` take the first colour
fn magma(value: f64, low: f64, high: f64) -> RGBColor {
    if value.is_nan() {
        return MAGMA_11[0];
    }
    let t = ((value - low) / (high - low)).clamp(0.0, 1.0);
    MAGMA_11[((t * MAGMA_11.len() as f64) as usize).min(MAGMA_11.len() - 1)]
}

/// Min/max-per-bucket reduction that keeps peaks visible
pub(crate) fn decimate(points: &[(f64, f64)], max_points: usize) -> Vec<(f64, f64)> {
    if max_points < 2 || points.len() <= max_points {
        return points.to_vec();
    }
    let bucket = points.len().div_ceil(max_points / 2);
    let mut out = Vec::with_capacity(max_points);
    for chunk in points.chunks(bucket) {
        let mut lo = 0;
        let mut hi = 0;
        for (i, p) in chunk.iter().enumerate() {
            if p.1 < chunk[lo].1 {
                lo = i;
            }
            if p.1 > chunk[hi].1 {
                hi = i;
            }
        }
        let (first, second) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        out.push(chunk[first]);
        if second != first {
            out.push(chunk[second]);
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    value: f64,
}

/// Block-max reduction of the field to at most `max_cells` columns x rows,
/// spread evenly over the display bounds
fn heatmap_cells(
    heatmap: &Heatmap,
    x_bounds: (f64, f64),
    y_bounds: (f64, f64),
    max_cells: (usize, usize),
) -> Vec<Cell> {
    let nx = heatmap.x.len();
    let ny = heatmap.y.len();
    if nx == 0 || ny == 0 || heatmap.values.len() < ny {
        return Vec::new();
    }

    let sx = nx.div_ceil(max_cells.0.max(1));
    let sy = ny.div_ceil(max_cells.1.max(1));
    let bx = nx.div_ceil(sx);
    let by = ny.div_ceil(sy);
    let width = (x_bounds.1 - x_bounds.0) / bx as f64;
    let height = (y_bounds.1 - y_bounds.0) / by as f64;

    let mut cells = Vec::with_capacity(bx * by);
    for row in 0..by {
        for col in 0..bx {
            let value = heatmap.values[row * sy..((row + 1) * sy).min(ny)]
                .iter()
                .flat_map(|r| r.iter().skip(col * sx).take(sx))
                .fold(f64::NEG_INFINITY, |m, &v| m.max(v));
            cells.push(Cell {
                x0: x_bounds.0 + col as f64 * width,
                x1: x_bounds.0 + (col + 1) as f64 * width,
                y0: y_bounds.0 + row as f64 * height,
                y1: y_bounds.0 + (row + 1) as f64 * height,
                value,
            });
        }
    }
    cells
}

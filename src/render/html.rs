//! Standalone HTML grid pages

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info, warn};

use super::svg::render_panel_svg;
use super::{OutputSink, PanelStyle};
use crate::error::Result;
use crate::grid::Grid;

/// Writes `<out_dir>/<name>.html`, one table cell per panel
#[derive(Debug, Clone)]
pub struct HtmlSink {
    out_dir: PathBuf,
    style: PanelStyle,
    open: bool,
}

impl HtmlSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            style: PanelStyle::default(),
            open: false,
        }
    }

    pub fn with_style(mut self, style: PanelStyle) -> Self {
        self.style = style;
        self
    }

    /// Open each written page in the platform viewer
    pub fn with_open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    /// Build the page without touching the filesystem
    pub fn render(&self, name: &str, grid: &Grid) -> Result<String> {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape(name)));
        html.push_str(
            "<style>\nbody { font-family: sans-serif; margin: 16px; }\n\
             table { border-collapse: collapse; }\n\
             td { padding: 4px; vertical-align: top; }\n\
             footer { color: #777; font-size: 12px; margin-top: 12px; }\n</style>\n",
        );
        html.push_str("</head>\n<body>\n");
        html.push_str(&format!("<h2>{}</h2>\n<table>\n", escape(name)));

        for row in &grid.rows {
            html.push_str("<tr>\n");
            for panel in row {
                debug!("Rendering panel '{}'", panel.title);
                let svg = render_panel_svg(panel, &self.style)?;
                html.push_str(&format!("<td title=\"{}\">\n", escape(&panel.title)));
                html.push_str(&svg);
                html.push_str("\n</td>\n");
            }
            html.push_str("</tr>\n");
        }

        html.push_str("</table>\n");
        html.push_str(&format!(
            "<footer>{} panels, generated {} by {} v{}</footer>\n",
            grid.num_panels(),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
        ));
        html.push_str("</body>\n</html>\n");
        Ok(html)
    }
}

impl OutputSink for HtmlSink {
    fn emit(&self, name: &str, grid: &Grid) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)?;
        let html = self.render(name, grid)?;
        let path = self.out_dir.join(format!("{name}.html"));
        fs::write(&path, html)?;
        info!("Saved {}", path.display());

        if self.open {
            open_in_viewer(&path);
        }
        Ok(path)
    }
}

/// Best effort; a missing viewer is not an error
fn open_in_viewer(path: &Path) {
    let spawned = if cfg!(target_os = "macos") {
        Command::new("open").arg(path).spawn()
    } else if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", ""]).arg(path).spawn()
    } else {
        Command::new("xdg-open").arg(path).spawn()
    };

    match spawned {
        Ok(_) => debug!("Opened {}", path.display()),
        Err(e) => warn!("Could not open {}: {}", path.display(), e),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{Axis, Curve, PanelDescriptor, Rgb};
    use tempfile::TempDir;

    fn grid(n: usize) -> Grid {
        let panels = (0..n)
            .map(|i| {
                PanelDescriptor::curves(
                    format!("model<{i}> 48000"),
                    Axis::linear("Sample"),
                    Axis::linear("Output"),
                    vec![Curve {
                        label: "output".to_string(),
                        x: vec![0.0, 1.0, 2.0],
                        y: vec![0.0, 0.5, 1.0],
                        color: Rgb::NAVY,
                        alpha: 0.9,
                    }],
                )
            })
            .collect();
        Grid::layout(panels, 2).unwrap()
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_render_rows_without_padding() {
        let html = HtmlSink::new("unused").render("time_response", &grid(3)).unwrap();
        assert_eq!(html.matches("<tr>").count(), 2);
        assert_eq!(html.matches("<td ").count(), 3);
        assert!(html.contains("model&lt;2&gt; 48000"));
    }

    #[test]
    fn test_style_sets_panel_size() {
        let style = PanelStyle {
            width: 300,
            height: 200,
            ..PanelStyle::default()
        };
        let html = HtmlSink::new("unused")
            .with_style(style)
            .render("time_response", &grid(1))
            .unwrap();
        assert!(html.contains("width=\"300\""));
        assert!(html.contains("height=\"200\""));
    }

    #[test]
    fn test_emit_writes_named_file() {
        let dir = TempDir::new().unwrap();
        let sink = HtmlSink::new(dir.path().join("plots"));
        let path = sink.emit("spectrogram", &grid(1)).unwrap();
        assert_eq!(path, dir.path().join("plots").join("spectrogram.html"));
        let text = fs::read_to_string(path).unwrap();
        assert!(text.starts_with("<!DOCTYPE html>"));
    }
}

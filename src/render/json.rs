//! Machine-readable grid dumps

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use log::info;
use serde::Serialize;

use super::OutputSink;
use crate::error::Result;
use crate::grid::Grid;

#[derive(Serialize)]
struct GridDocument<'a> {
    name: &'a str,
    generated_at: String,
    version: &'static str,
    grid: &'a Grid,
}

/// Writes `<out_dir>/<name>.json` holding the panel descriptors
#[derive(Debug, Clone)]
pub struct JsonSink {
    out_dir: PathBuf,
}

impl JsonSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }
}

impl OutputSink for JsonSink {
    fn emit(&self, name: &str, grid: &Grid) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(format!("{name}.json"));

        let document = GridDocument {
            name,
            generated_at: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
            grid,
        };
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, &document)?;
        writer.flush()?;

        info!("Saved {}", path.display());
        Ok(path)
    }
}

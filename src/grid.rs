//! Grid compositor
//!
//! Applies one transform to every model output and lays the resulting panels
//! out row-major in a fixed number of columns.

use std::path::PathBuf;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::analysis::Transform;
use crate::error::{CompareError, Result};
use crate::panel::PanelDescriptor;
use crate::render::OutputSink;
use crate::runner::ModelResult;
use crate::signal::{Signal, TimeBase};

/// Default number of grid columns
pub const DEFAULT_NUM_COLS: usize = 2;

/// Panels arranged in rows of at most `num_cols`
///
/// Rows fill left-to-right, top-to-bottom in input order. The last row may
/// be shorter and is never padded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub num_cols: usize,
    pub rows: Vec<Vec<PanelDescriptor>>,
}

impl Grid {
    /// Lay panels out row-major
    pub fn layout(panels: Vec<PanelDescriptor>, num_cols: usize) -> Result<Self> {
        if num_cols == 0 {
            return Err(CompareError::invalid("num_cols", "must be at least 1"));
        }

        let mut rows = Vec::with_capacity(panels.len().div_ceil(num_cols));
        let mut row = Vec::with_capacity(num_cols);
        for panel in panels {
            row.push(panel);
            if row.len() == num_cols {
                rows.push(std::mem::replace(&mut row, Vec::with_capacity(num_cols)));
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }

        Ok(Self { num_cols, rows })
    }

    /// Row lengths
    pub fn shape(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.len()).collect()
    }

    pub fn num_panels(&self) -> usize {
        self.rows.iter().map(|r| r.len()).sum()
    }

    /// Panel `k` in row-major order
    pub fn panel(&self, k: usize) -> Option<&PanelDescriptor> {
        self.rows
            .get(k.checked_div(self.num_cols)?)?
            .get(k % self.num_cols)
    }

    /// Panels in row-major order
    pub fn panels(&self) -> impl Iterator<Item = &PanelDescriptor> {
        self.rows.iter().flatten()
    }
}

/// Builds comparison grids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCompositor {
    num_cols: usize,
}

impl Default for GridCompositor {
    fn default() -> Self {
        Self {
            num_cols: DEFAULT_NUM_COLS,
        }
    }
}

impl GridCompositor {
    pub fn new(num_cols: usize) -> Result<Self> {
        if num_cols == 0 {
            return Err(CompareError::invalid("num_cols", "must be at least 1"));
        }
        Ok(Self { num_cols })
    }

    /// Apply `transform` to every output, zipped with `names` by position
    pub fn compose<O: AsRef<[f64]>, S: AsRef<str>>(
        &self,
        transform: Transform,
        sample_rate: f64,
        time: &TimeBase,
        stimulus: &Signal,
        outputs: &[O],
        names: &[S],
    ) -> Result<Grid> {
        if names.len() != outputs.len() {
            return Err(CompareError::LengthMismatch {
                names: names.len(),
                outputs: outputs.len(),
            });
        }
        if outputs.is_empty() {
            return Err(CompareError::EmptyModelList);
        }

        let panels = outputs
            .iter()
            .zip(names)
            .map(|(output, name)| {
                debug!("Applying {} to '{}'", transform, name.as_ref());
                transform.apply(
                    name.as_ref(),
                    time,
                    stimulus.as_slice(),
                    output.as_ref(),
                    sample_rate,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Grid::layout(panels, self.num_cols)
    }

    /// Compose directly from runner results
    pub fn compose_results(
        &self,
        transform: Transform,
        sample_rate: f64,
        time: &TimeBase,
        stimulus: &Signal,
        results: &[ModelResult],
    ) -> Result<Grid> {
        let outputs: Vec<&[f64]> = results.iter().map(|r| r.output.as_slice()).collect();
        let names: Vec<&str> = results.iter().map(|r| r.model_name.as_str()).collect();
        self.compose(transform, sample_rate, time, stimulus, &outputs, &names)
    }

    /// Compose and hand the grid to `sink` under the transform's name
    #[allow(clippy::too_many_arguments)]
    pub fn compose_and_emit<O: AsRef<[f64]>, S: AsRef<str>>(
        &self,
        transform: Transform,
        sample_rate: f64,
        time: &TimeBase,
        stimulus: &Signal,
        outputs: &[O],
        names: &[S],
        sink: &dyn OutputSink,
    ) -> Result<PathBuf> {
        let grid = self.compose(transform, sample_rate, time, stimulus, outputs, names)?;
        let path = sink.emit(transform.name(), &grid)?;
        info!(
            "Wrote {} panels for {} to {}",
            grid.num_panels(),
            transform,
            path.display()
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::Axis;
    use pretty_assertions::assert_eq;

    fn dummy(title: &str) -> PanelDescriptor {
        PanelDescriptor::curves(
            title.to_string(),
            Axis::linear("x"),
            Axis::linear("y"),
            Vec::new(),
        )
    }

    #[test]
    fn test_layout_partial_last_row() {
        let panels = (0..5).map(|i| dummy(&i.to_string())).collect();
        let grid = Grid::layout(panels, 2).unwrap();
        assert_eq!(grid.shape(), vec![2, 2, 1]);
        assert_eq!(grid.panel(4).unwrap().title, "4");
        assert!(grid.panel(5).is_none());
    }

    #[test]
    fn test_layout_three_columns() {
        let panels = (0..7).map(|i| dummy(&i.to_string())).collect();
        let grid = Grid::layout(panels, 3).unwrap();
        assert_eq!(grid.shape(), vec![3, 3, 1]);
        let titles: Vec<&str> = grid.panels().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["0", "1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_zero_columns_rejected() {
        assert!(Grid::layout(Vec::new(), 0).is_err());
        assert!(GridCompositor::new(0).is_err());
    }

    #[test]
    fn test_compose_length_mismatch() {
        let time = TimeBase::new(4, 1000.0).unwrap();
        let stimulus = Signal::new(vec![0.0; 4], 1000.0);
        let outputs = vec![stimulus.clone()];
        let err = GridCompositor::default()
            .compose(
                Transform::TimeResponse,
                1000.0,
                &time,
                &stimulus,
                &outputs,
                &["a", "b"],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            CompareError::LengthMismatch {
                names: 2,
                outputs: 1
            }
        ));
    }

    #[test]
    fn test_compose_empty_rejected() {
        let time = TimeBase::new(4, 1000.0).unwrap();
        let stimulus = Signal::new(vec![0.0; 4], 1000.0);
        let outputs: [Signal; 0] = [];
        let names: [&str; 0] = [];
        let err = GridCompositor::default()
            .compose(Transform::TimeResponse, 1000.0, &time, &stimulus, &outputs, &names)
            .unwrap_err();
        assert!(matches!(err, CompareError::EmptyModelList));
    }

    #[test]
    fn test_compose_results_matches_compose() {
        let time = TimeBase::new(64, 1000.0).unwrap();
        let stimulus = Signal::new((0..64).map(|i| (i as f64 * 0.3).sin()).collect(), 1000.0);
        let doubled = Signal::new(stimulus.samples.iter().map(|v| 2.0 * v).collect(), 1000.0);
        let results = vec![
            ModelResult {
                model_name: "copy".to_string(),
                output: stimulus.clone(),
            },
            ModelResult {
                model_name: "double".to_string(),
                output: doubled.clone(),
            },
        ];
        let compositor = GridCompositor::default();

        let from_results = compositor
            .compose_results(Transform::TimeResponse, 1000.0, &time, &stimulus, &results)
            .unwrap();
        let from_slices = compositor
            .compose(
                Transform::TimeResponse,
                1000.0,
                &time,
                &stimulus,
                &[stimulus.as_slice(), doubled.as_slice()],
                &["copy", "double"],
            )
            .unwrap();

        assert_eq!(from_results, from_slices);
        assert_eq!(from_results.panel(1).unwrap().title, "double 1000");
    }
}

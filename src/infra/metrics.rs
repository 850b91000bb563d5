// ============================================================
// Layer 6 — Batch Metrics Logger
// ============================================================
// Records one CSV row per prepared batch.
//
// Metrics recorded per batch:
//   - batch:          the batch number (1, 2, 3, ...)
//   - batch_size:     pairs in the batch
//   - max_input_len:  rows of the padded input matrix
//   - max_target_len: rows of the padded target matrix
//   - input_tokens:   real input tokens (sum of lengths)
//   - target_tokens:  real target tokens (true mask entries)
//   - padding_ratio:  share of PAD cells across both matrices
//
// Output file: <out_dir>/batch_metrics.csv
//
// Example CSV output:
//   batch,batch_size,max_input_len,max_target_len,input_tokens,target_tokens,padding_ratio
//   1,64,10,10,412,398,0.367188
//
// A high padding_ratio means many short sentences share a batch
// with a long one.

use anyhow::Result;
use burn::prelude::*;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

use crate::data::batcher::PairBatch;

/// One row of metrics data for a single batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMetrics {
    pub batch:          usize,
    pub batch_size:     usize,
    pub max_input_len:  usize,
    pub max_target_len: usize,
    pub input_tokens:   usize,
    pub target_tokens:  usize,
    pub padding_ratio:  f64,
}

impl BatchMetrics {
    /// Measure a tensor batch.
    pub fn from_batch<B: Backend>(batch: usize, pair_batch: &PairBatch<B>) -> Self {
        let [max_input_len, batch_size] = pair_batch.input.dims();
        let [max_target_len, _]         = pair_batch.target.dims();

        let input_tokens = pair_batch
            .lengths
            .clone()
            .sum()
            .into_scalar()
            .elem::<i64>() as usize;
        let target_tokens = pair_batch
            .mask
            .clone()
            .int()
            .sum()
            .into_scalar()
            .elem::<i64>() as usize;

        let cells = (max_input_len + max_target_len) * batch_size;
        let padding_ratio = if cells == 0 {
            0.0
        } else {
            1.0 - (input_tokens + target_tokens) as f64 / cells as f64
        };

        Self {
            batch,
            batch_size,
            max_input_len,
            max_target_len,
            input_tokens,
            target_tokens,
            padding_ratio,
        }
    }
}

/// Logs batch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    /// Full path to the CSV file
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("batch_metrics.csv");

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(
                f,
                "batch,batch_size,max_input_len,max_target_len,input_tokens,target_tokens,padding_ratio"
            )?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one batch's metrics as a new row in the CSV.
    pub fn log(&self, m: &BatchMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(
            f,
            "{},{},{},{},{},{},{:.6}",
            m.batch,
            m.batch_size,
            m.max_input_len,
            m.max_target_len,
            m.input_tokens,
            m.target_tokens,
            m.padding_ratio,
        )?;

        tracing::debug!(
            "Batch {}: {} pairs, padding {:.2}%",
            m.batch,
            m.batch_size,
            m.padding_ratio * 100.0,
        );

        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

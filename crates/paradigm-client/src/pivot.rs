//! Legacy result reshaping.
//!
//! The legacy service returns a sparse `[sample, probe, value]` list. This
//! module turns it into a dense probe x sample table and renders it as TSV.
//!
//! Invariants of [`PivotedMatrix`]:
//! - columns are the distinct samples, sorted;
//! - rows are the distinct probes, sorted;
//! - every row has exactly one value per column, NaN where unobserved.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde_json::Value;

use crate::error::{ParadigmError, ParadigmResult};

/// One observation from the legacy result payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Triple {
    pub sample: String,
    pub probe: String,
    pub value: f64,
}

impl Triple {
    pub fn new(sample: impl Into<String>, probe: impl Into<String>, value: f64) -> Self {
        Self {
            sample: sample.into(),
            probe: probe.into(),
            value,
        }
    }
}

/// Decode the `result` payload of a finished legacy run.
///
/// A `null` value is read as NaN.
pub fn parse_triples(payload: Value) -> ParadigmResult<Vec<Triple>> {
    let raw: Vec<(String, String, Option<f64>)> =
        serde_json::from_value(payload).map_err(|e| ParadigmError::MalformedResult {
            message: format!("expected a list of [sample, probe, value]: {}", e),
        })?;

    Ok(raw
        .into_iter()
        .map(|(sample, probe, value)| Triple {
            sample,
            probe,
            value: value.unwrap_or(f64::NAN),
        })
        .collect())
}

/// Dense probe x sample matrix.
#[derive(Debug, Clone, Default)]
pub struct PivotedMatrix {
    samples: Vec<String>,
    rows: Vec<(String, Vec<f64>)>,
}

impl PivotedMatrix {
    /// Build from triples in any order. For a repeated (sample, probe) pair
    /// the last value wins.
    pub fn from_triples<I>(triples: I) -> Self
    where
        I: IntoIterator<Item = Triple>,
    {
        let mut samples = BTreeSet::new();
        let mut cells: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();

        for t in triples {
            samples.insert(t.sample.clone());
            cells.entry(t.probe).or_default().insert(t.sample, t.value);
        }

        let samples: Vec<String> = samples.into_iter().collect();
        let rows = cells
            .into_iter()
            .map(|(probe, by_sample)| {
                let values = samples
                    .iter()
                    .map(|s| by_sample.get(s).copied().unwrap_or(f64::NAN))
                    .collect();
                (probe, values)
            })
            .collect();

        Self { samples, rows }
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn probes(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(p, _)| p.as_str())
    }

    pub fn row(&self, probe: &str) -> Option<&[f64]> {
        self.rows
            .iter()
            .find(|(p, _)| p == probe)
            .map(|(_, v)| v.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header `probe` + samples, then one line per probe.
    pub fn write_tsv<W: Write>(&self, mut out: W) -> io::Result<()> {
        let mut header = String::from("probe");
        for sample in &self.samples {
            header.push('\t');
            header.push_str(sample);
        }
        writeln!(out, "{}", header)?;

        for (probe, values) in &self.rows {
            let mut line = sanitize_probe(probe);
            for v in values {
                line.push('\t');
                line.push_str(&format_value(*v));
            }
            writeln!(out, "{}", line)?;
        }
        out.flush()
    }

    pub fn to_tsv_string(&self) -> String {
        let mut buf = Vec::new();
        // Vec<u8> writes are infallible
        let _ = self.write_tsv(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    pub fn write_tsv_file(&self, path: &Path) -> ParadigmResult<()> {
        let file = std::fs::File::create(path).map_err(|e| ParadigmError::io(path, e))?;
        self.write_tsv(BufWriter::new(file))
            .map_err(|e| ParadigmError::io(path, e))
    }
}

/// Drop every non-ASCII character.
pub fn sanitize_probe(probe: &str) -> String {
    probe.chars().filter(char::is_ascii).collect()
}

/// Six decimals, `nan` for missing, `inf` / `-inf` for infinities.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{:.6}", value)
    }
}

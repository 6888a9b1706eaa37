use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Error, Write};
use std::path::Path;

/// Output format for a dumped session trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFormat {
    Csv,
    Tsv,
    Json,
}

/// One tick of a control session, as sent to observers and recorded into
/// the trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub frames_seen: u64,
    /// Winning label for this frame.
    pub label: String,
    /// Confidence of the winning label, in [0, 1].
    pub confidence: f64,
    /// Vote weight per label represented among the neighbors. Only in the
    /// JSON trace; the delimited formats keep one row per tick.
    pub confidence_by_label: BTreeMap<String, f64>,
    pub cursor_x: f64,
    pub cursor_y: f64,
    /// Present when the session tracks focus zoom.
    pub zoom: Option<f64>,
    /// CPU seconds since the session started.
    pub seconds: f64,
    /// Estimated model size at this tick.
    pub model_bytes: usize,
}

/// Every tick report of one session run, dumpable to a file as CSV, TSV,
/// or JSON.
#[derive(Debug, Default)]
pub struct SessionTrace {
    reports: Vec<TickReport>,
}

impl SessionTrace {
    pub fn push(&mut self, report: TickReport) {
        self.reports.push(report);
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn reports(&self) -> &[TickReport] {
        &self.reports
    }

    pub fn last(&self) -> Option<&TickReport> {
        self.reports.last()
    }

    pub fn export(&self, path: &Path, format: TraceFormat) -> Result<(), Error> {
        match format {
            TraceFormat::Csv => self.write_delimited(path, ','),
            TraceFormat::Tsv => self.write_delimited(path, '\t'),
            TraceFormat::Json => {
                let writer = BufWriter::new(File::create(path)?);
                serde_json::to_writer_pretty(writer, &self.reports).map_err(Error::from)
            }
        }
    }

    fn write_delimited(&self, path: &Path, sep: char) -> Result<(), Error> {
        let mut writer = BufWriter::new(File::create(path)?);

        let header = [
            "frames_seen",
            "label",
            "confidence",
            "cursor_x",
            "cursor_y",
            "zoom",
            "seconds",
            "model_bytes",
        ];
        writeln!(writer, "{}", header.join(&sep.to_string()))?;

        for r in &self.reports {
            let zoom = r.zoom.map(|z| format!("{z:.6}")).unwrap_or_default();
            writeln!(
                writer,
                "{1}{0}{2}{0}{3:.6}{0}{4:.2}{0}{5:.2}{0}{6}{0}{7:.6}{0}{8}",
                sep,
                r.frames_seen,
                r.label,
                r.confidence,
                r.cursor_x,
                r.cursor_y,
                zoom,
                r.seconds,
                r.model_bytes,
            )?;
        }
        writer.flush()
    }
}

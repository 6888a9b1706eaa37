use crate::core::FeatureVector;
use crate::streams::csv::parser::{is_comment_or_empty, parse_frame_line};
use crate::streams::source::FeatureSource;
use std::fs::File;
use std::io::{BufRead, BufReader, Error};
use std::path::PathBuf;

/// Feature frames read from a text file, one comma-separated vector per
/// line. `#`-comment and blank lines are skipped; a malformed data line is
/// reported on stderr and skipped, since frames arrive continuously and one
/// bad line should not end a session.
#[derive(Debug)]
pub struct CsvFrameSource {
    path: PathBuf,
    reader: BufReader<File>,
    next_line: Option<String>,
    dimensions: Option<usize>,
    finished: bool,
}

impl CsvFrameSource {
    pub fn new(path: PathBuf) -> Result<Self, Error> {
        let file = File::open(&path)?;
        let reader = BufReader::new(file);

        let mut source = CsvFrameSource {
            path,
            reader,
            next_line: None,
            dimensions: None,
            finished: false,
        };
        source.fill_next_line()?;

        // The first data line fixes the dimensionality; a file that opens
        // with garbage is refused outright.
        if let Some(line) = &source.next_line {
            source.dimensions = Some(parse_frame_line(line)?.len());
        }
        Ok(source)
    }

    fn fill_next_line(&mut self) -> Result<(), Error> {
        if self.finished {
            self.next_line = None;
            return Ok(());
        }
        let mut line = String::new();
        loop {
            line.clear();
            let n = self.reader.read_line(&mut line)?;
            if n == 0 {
                self.finished = true;
                self.next_line = None;
                return Ok(());
            }
            if !is_comment_or_empty(&line) {
                self.next_line = Some(line.trim().to_string());
                return Ok(());
            }
        }
    }
}

impl FeatureSource for CsvFrameSource {
    fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    fn has_more_frames(&self) -> bool {
        self.next_line.is_some()
    }

    fn next_frame(&mut self) -> Option<FeatureVector> {
        let line = self.next_line.take()?;
        if self.fill_next_line().is_err() {
            self.finished = true;
        }

        match parse_frame_line(&line) {
            Ok(frame) => Some(frame),
            Err(e) => {
                eprintln!("skipping invalid frame line '{line}': {e}");
                self.next_frame()
            }
        }
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.reader = BufReader::new(File::open(&self.path)?);
        self.finished = false;
        self.next_line = None;
        self.fill_next_line()
    }
}

use crate::core::FeatureVector;
use crate::streams::csv::parser::{is_comment_or_empty, parse_example_line};
use std::fs::File;
use std::io::{BufRead, BufReader, Error, ErrorKind};
use std::path::Path;

/// Reads a labelled example file: one `label,v1,v2,...` per line, with
/// `#`-comment and blank lines ignored. Training input is authored, not
/// live, so a malformed line fails the whole read instead of being skipped.
pub fn read_examples<P: AsRef<Path>>(path: P) -> Result<Vec<(String, FeatureVector)>, Error> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);

    let mut examples = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if is_comment_or_empty(&line) {
            continue;
        }
        let (label, vector) = parse_example_line(&line).map_err(|e| {
            Error::new(
                ErrorKind::InvalidData,
                format!("line {}: {e}", number + 1),
            )
        })?;
        examples.push((label, vector));
    }
    Ok(examples)
}

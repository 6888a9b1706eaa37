use crate::core::FeatureVector;
use std::io::{Error, ErrorKind};

pub(super) fn is_comment_or_empty(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || t.starts_with('#')
}

/// Parses one frame line: comma-separated numeric values.
pub(super) fn parse_frame_line(line: &str) -> Result<FeatureVector, Error> {
    let mut values = Vec::new();
    for (idx, raw) in line.split(',').enumerate() {
        let raw = raw.trim();
        let v: f64 = raw.parse().map_err(|_| {
            Error::new(
                ErrorKind::InvalidData,
                format!("invalid numeric value '{raw}' at column #{idx}"),
            )
        })?;
        values.push(v);
    }
    Ok(FeatureVector::new(values))
}

/// Parses one labelled example line: `label,v1,v2,...`.
pub(super) fn parse_example_line(line: &str) -> Result<(String, FeatureVector), Error> {
    let Some((label, rest)) = line.split_once(',') else {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!("expected 'label,v1,...' but found '{}'", line.trim()),
        ));
    };

    let label = label.trim();
    if label.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidData,
            "example line has an empty label",
        ));
    }

    let vector = parse_frame_line(rest)?;
    Ok((label.to_string(), vector))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_blanks_are_recognized() {
        assert!(is_comment_or_empty(""));
        assert!(is_comment_or_empty("   "));
        assert!(is_comment_or_empty("# a comment"));
        assert!(!is_comment_or_empty("1.0,2.0"));
    }

    #[test]
    fn frame_line_parses_into_vector() {
        let frame = parse_frame_line(" 1.0, -2.5 ,3 ").unwrap();
        assert_eq!(frame.values(), &[1.0, -2.5, 3.0]);
    }

    #[test]
    fn frame_line_with_garbage_is_invalid_data() {
        let err = parse_frame_line("1.0,banana,3.0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(err.to_string().contains("banana"));
    }

    #[test]
    fn example_line_splits_label_from_vector() {
        let (label, vector) = parse_example_line("Left,0.0,0.5").unwrap();
        assert_eq!(label, "Left");
        assert_eq!(vector.values(), &[0.0, 0.5]);
    }

    #[test]
    fn example_line_without_values_is_invalid_data() {
        let err = parse_example_line("just-a-label").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn example_line_with_empty_label_is_invalid_data() {
        let err = parse_example_line(" ,1.0,2.0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}

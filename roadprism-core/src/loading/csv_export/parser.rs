use std::fs::File;
use std::path::Path;

use log::warn;

pub fn deserialize_csv_file<T>(path: &Path) -> Result<Vec<T>, std::io::Error>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;

    let mut skipped = 0usize;
    let rows = csv::Reader::from_reader(file)
        .deserialize()
        .filter_map(|row| {
            if row.is_err() {
                skipped += 1;
            }
            row.ok()
        })
        .collect::<Vec<T>>();

    if skipped > 0 {
        warn!("Skipped {skipped} malformed rows in '{}'", path.display());
    }
    Ok(rows)
}

/// Parses a finite, non-negative number, empty fields are `None`
pub(super) fn parse_non_negative(field: &str) -> Option<f64> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

/// Parses a speed that may be a single value or a list of values, keeping the highest
pub(super) fn parse_speed(field: &str) -> Option<f64> {
    field
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .filter_map(|part| parse_non_negative(part.trim().trim_matches(|c: char| c == '\'' || c == '"')))
        .reduce(f64::max)
}

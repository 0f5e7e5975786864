use std::fs;
use std::path::Path;

use utils::error::{Error, Result};

/// Expand list options into their entries.
///
/// A value naming an existing file is read one entry per line; otherwise it
/// is split on commas. Entries are trimmed (surrounding quotes included) and
/// blank ones dropped.
pub fn parse_input_list(values: &[String]) -> Result<Vec<String>> {
    let mut entries = Vec::new();
    for value in values {
        entries.extend(parse_input(value)?);
    }
    Ok(entries)
}

fn parse_input(value: &str) -> Result<Vec<String>> {
    let value = clean(value);
    if value.is_empty() {
        return Ok(Vec::new());
    }

    let path = Path::new(value);
    if path.is_file() {
        let contents = fs::read_to_string(path).map_err(|source| Error::InputUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(collect(contents.lines()));
    }

    Ok(collect(value.split(',')))
}

fn collect<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items.map(clean).filter(|s| !s.is_empty()).map(String::from).collect()
}

fn clean(value: &str) -> &str {
    value.trim().trim_matches('"').trim()
}

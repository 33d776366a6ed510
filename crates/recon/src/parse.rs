//! Record parser: export listing lines → [`EntityGroups`].
//!
//! Lines look like `{owner}/{item id}/{version}/{filename}` where the
//! filename may contain `/`. Some exports carry more than one leading
//! segment before the item id; [`PathLayout::leading`] says how many.

use std::io::BufRead;

use crate::error::{ParseError, ParseReason, ReconError};
use crate::model::{EntityGroups, OwnerKey, PathRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathLayout {
    /// Number of segments before the item id.
    pub leading: usize,
}

impl Default for PathLayout {
    fn default() -> Self {
        Self { leading: 1 }
    }
}

impl PathLayout {
    pub fn new(leading: usize) -> Self {
        Self { leading }
    }

    /// Leading segments + item id + version + at least one filename segment.
    pub fn min_segments(&self) -> usize {
        self.leading + 3
    }
}

/// Split one line into a [`PathRecord`]. `line_number` is 1-based.
pub fn parse_line(line: &str, line_number: usize, layout: PathLayout) -> Result<PathRecord, ParseError> {
    let fail = |reason| ParseError { line_number, line: line.to_string(), reason };

    let parts: Vec<&str> = line.split('/').collect();
    if parts.len() < layout.min_segments() {
        return Err(fail(ParseReason::TooFewSegments {
            expected: layout.min_segments(),
            found: parts.len(),
        }));
    }

    let entity_id = parts[layout.leading];
    let version = parts[layout.leading + 1];
    if entity_id.is_empty() {
        return Err(fail(ParseReason::EmptyEntityId));
    }
    if version.is_empty() {
        return Err(fail(ParseReason::EmptyVersion));
    }

    let split = layout.leading + 2;
    let mangled_filename = parts[split..].join("/");
    if mangled_filename.is_empty() {
        return Err(fail(ParseReason::EmptyFilename));
    }

    Ok(PathRecord {
        line: line.to_string(),
        owner: OwnerKey::new(entity_id, version),
        directory_prefix: parts[..split].join("/"),
        mangled_filename,
    })
}

/// Read every line and group the records by owner key.
///
/// Stops at the first malformed line. Blank lines are skipped.
pub fn parse_lines<R: BufRead>(reader: R, layout: PathLayout) -> Result<EntityGroups, ReconError> {
    let mut groups = EntityGroups::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| ReconError::Io(e.to_string()))?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if line.trim().is_empty() {
            continue;
        }
        groups.push(parse_line(line, i + 1, layout)?);
    }

    log::debug!(
        "parsed {} records into {} items",
        groups.record_count(),
        groups.len()
    );
    Ok(groups)
}

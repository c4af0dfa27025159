use crate::extraction::Table;

/// Reconstruct tables from pdftotext -layout output.
///
/// pdftotext -layout preserves column alignment using spaces. A run of
/// consecutive lines that each split into at least `MIN_CELLS` gap-separated
/// segments is taken as one table; a blank or single-segment line ends it.
///
/// The resulting grid has no merged or empty cells, so it only roughly
/// follows the ruled geometry of the printed notice.
pub fn tables_from_layout(text: &str) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut current: Table = Vec::new();

    for line in text.lines() {
        let segments = split_by_whitespace_gaps(line);
        if segments.len() >= MIN_CELLS {
            current.push(
                segments
                    .into_iter()
                    .map(|s| Some(s.trim().to_string()))
                    .collect(),
            );
        } else if !current.is_empty() {
            tables.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        tables.push(current);
    }

    tables
}

const MIN_CELLS: usize = 3;

/// Split a line by gaps of 2+ whitespace characters.
pub fn split_by_whitespace_gaps(line: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = None;
    let mut gap_start = 0;
    let mut space_count = 0;

    for (i, c) in line.char_indices() {
        if c.is_whitespace() {
            if space_count == 0 {
                gap_start = i;
            }
            space_count += 1;
            if space_count == 2 {
                if let Some(s) = start.take() {
                    segments.push(&line[s..gap_start]);
                }
            }
        } else {
            if start.is_none() {
                start = Some(i);
            }
            space_count = 0;
        }
    }

    if let Some(s) = start {
        segments.push(line[s..].trim_end());
    }

    segments
}

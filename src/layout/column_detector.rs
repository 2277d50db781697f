//! Column clustering of a page's lines.
//!
//! Lines are clustered around representative lines by horizontal order. The
//! representative of a growing column is re-selected as its "middle meaningful"
//! line, so a page header spanning every column cannot pull unrelated columns
//! together.

use crate::geometry::horizontal_order;
use crate::layout::text_line::TextLine;
use crate::utils::safe_float_cmp;

/// Stable sort putting meaningful lines first.
pub fn sort_by_meaningfulness(lines: &mut [TextLine]) {
    lines.sort_by_key(|line| !line.meaningful);
}

/// Reading order inside a column: by baseline, ties broken by x.
pub fn sort_column(column: &mut [TextLine]) {
    column.sort_by(|a, b| safe_float_cmp(a.y, b.y).then_with(|| safe_float_cmp(a.x, b.x)));
}

/// Partition lines into columns.
///
/// Every line is marked pending on entry. The first pending line seeds a
/// column; each later pending line whose horizontal order relative to the
/// current representative is near (`|order| < 2`) joins it. After each join
/// the representative becomes the column's line at index
/// `meaningful_count / 2`. Columns are sorted vertically and returned
/// left-to-right by the x of their first line.
///
/// Lines should already be sorted with [`sort_by_meaningfulness`].
pub fn fill_columns(lines: Vec<TextLine>) -> Vec<Vec<TextLine>> {
    let mut lines = lines;
    for line in lines.iter_mut() {
        line.pending = true;
    }

    let mut members: Vec<Vec<usize>> = Vec::new();
    for seed in 0..lines.len() {
        if !lines[seed].pending {
            continue;
        }

        let mut column = vec![seed];
        lines[seed].pending = false;
        let mut meaningful_count = usize::from(lines[seed].meaningful);
        let mut representative = seed;
        log::debug!("column seed: {}", lines[seed]);

        for candidate in 0..lines.len() {
            if !lines[candidate].pending {
                continue;
            }
            let order = horizontal_order(
                &lines[representative].h_extent(),
                &lines[candidate].h_extent(),
                false,
            );
            if order.is_near() {
                log::trace!("  member ({:?}): {}", order, lines[candidate]);
                column.push(candidate);
                lines[candidate].pending = false;
                if lines[candidate].meaningful {
                    meaningful_count += 1;
                }
                representative = column[meaningful_count / 2];
            }
        }

        members.push(column);
    }

    let mut slots: Vec<Option<TextLine>> = lines.into_iter().map(Some).collect();
    let mut columns: Vec<Vec<TextLine>> = members
        .iter()
        .map(|indices| {
            let mut column: Vec<TextLine> =
                indices.iter().filter_map(|&i| slots[i].take()).collect();
            sort_column(&mut column);
            column
        })
        .collect();

    columns.sort_by(|a, b| match (a.first(), b.first()) {
        (Some(a), Some(b)) => safe_float_cmp(a.x, b.x),
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, None) => std::cmp::Ordering::Equal,
    });

    log::debug!("{} columns", columns.len());
    columns
}

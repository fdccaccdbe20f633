//! Chooses the largest usable font size for a block of lines inside a label
//! cell, splitting an oversized first line in two when no candidate size can
//! contain it.

use crate::units::Pt;

/// The outcome of fitting a block of text into a cell: the chosen font size
/// and the final list of lines (the first line may have been split in two).
#[derive(Debug, Clone, PartialEq)]
pub struct FittedBlock {
    pub size: Pt,
    pub lines: Vec<String>,
}

/// Fit `lines` into a cell of `cell_width` by `cell_height` with `padding`
/// inside each edge, trying `sizes` in order of preference. `measure` reports
/// the rendered width of a piece of text at a given size.
///
/// If the first line is too wide at every candidate size it is split once at
/// the space nearest its midpoint; the two halves are not re-measured. If no
/// candidate size fits the whole block, the size that exactly fills the cell
/// height is used and over-wide lines are left to overflow: content is never
/// dropped to satisfy the cell.
pub fn fit_block(
    mut lines: Vec<String>,
    cell_width: Pt,
    cell_height: Pt,
    padding: Pt,
    sizes: &[Pt],
    measure: impl Fn(&str, Pt) -> Pt,
) -> FittedBlock {
    if lines.is_empty() {
        return FittedBlock {
            size: sizes.first().copied().unwrap_or(Pt(0.0)),
            lines,
        };
    }

    let avail_width = cell_width - padding * 2.0;
    let avail_height = cell_height - padding * 2.0;

    // the first line (the recipient's name) gets a chance on its own: when it
    // is too wide at every size, break it at the space nearest its midpoint
    let first_fits = sizes
        .iter()
        .any(|&size| measure(&lines[0], size) <= avail_width);
    if !first_fits {
        if let Some(at) = split_point(&lines[0]) {
            let chars: Vec<char> = lines[0].chars().collect();
            let left: String = chars[..at].iter().collect();
            let right: String = chars[at + 1..].iter().collect();
            lines[0] = left;
            lines.insert(1, right);
        }
    }

    let mut chosen = None;
    'candidates: for &size in sizes {
        if size * lines.len() as f32 > avail_height {
            continue;
        }
        for line in lines.iter() {
            if measure(line, size) > avail_width {
                continue 'candidates;
            }
        }
        chosen = Some(size);
        break;
    }

    let size = chosen
        .unwrap_or_else(|| Pt((avail_height.0 / lines.len() as f32).floor()));

    FittedBlock { size, lines }
}

/// The index of the space nearest the midpoint of `line`, scanning outward
/// symmetrically from the center. At equal distance the right-hand space
/// wins, so ties break later in the string. Returns [None] when the line has
/// no usable space; the scan never leaves the line.
fn split_point(line: &str) -> Option<usize> {
    let chars: Vec<char> = line.chars().collect();
    let center = chars.len() / 2;
    for offset in 0..=center {
        if center + offset < chars.len() && chars[center + offset] == ' ' {
            return Some(center + offset);
        }
        if chars[center - offset] == ' ' {
            return Some(center - offset);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // half an em per character, like a monospaced face
    fn measure(text: &str, size: Pt) -> Pt {
        Pt(text.chars().count() as f32 * size.0 * 0.5)
    }

    fn fit(lines: &[&str], cell_width: f32, cell_height: f32) -> FittedBlock {
        fit_block(
            lines.iter().map(|line| line.to_string()).collect(),
            Pt(cell_width),
            Pt(cell_height),
            Pt(4.0),
            &[Pt(16.0), Pt(14.0), Pt(12.0)],
            measure,
        )
    }

    #[test]
    fn short_block_takes_the_largest_size() {
        let block = fit(&["J Doe", "1 Main St"], 189.0, 72.0);
        assert_eq!(block.size, Pt(16.0));
        assert_eq!(block.lines, vec!["J Doe", "1 Main St"]);
    }

    #[test]
    fn a_long_line_shrinks_the_whole_block() {
        // 28 chars: 224 wide at 16pt, 196 at 14pt, 168 at 12pt; only 12pt
        // fits the 181pt of usable width
        let block = fit(&["A name that fits fine", "a street that is rather long"], 189.0, 72.0);
        assert_eq!(block.size, Pt(12.0));
    }

    #[test]
    fn oversized_first_line_splits_at_the_space_nearest_the_middle() {
        // 30 chars never fits 181pt of width, so the name splits; the space
        // after "Bartholomew" (4 left of center) beats the one after
        // "Archibald" (6 right of it)
        let block = fit(&["Bartholomew Archibald Longname", "1 Main St"], 189.0, 72.0);
        assert_eq!(
            block.lines,
            vec!["Bartholomew", "Archibald Longname", "1 Main St"]
        );
        assert_eq!(block.size, Pt(16.0));
    }

    #[test]
    fn tied_spaces_split_after_the_center() {
        assert_eq!(split_point("AB CDE FG"), Some(6));
        assert_eq!(split_point("A B"), Some(1));
    }

    #[test]
    fn nearest_space_wins_when_distances_differ() {
        assert_eq!(split_point("AB CD EF"), Some(5));
        assert_eq!(split_point("A BB"), Some(1));
    }

    #[test]
    fn a_spaceless_line_is_left_unsplit() {
        assert_eq!(split_point("Antidisestablishmentarianism"), None);
        let block = fit(&["Antidisestablishmentarianism"], 100.0, 72.0);
        assert_eq!(block.lines, vec!["Antidisestablishmentarianism"]);
        // nothing fit: the block degrades to the height-filling fallback size
        assert_eq!(block.size, Pt(64.0));
    }

    #[test]
    fn too_many_lines_fall_back_to_the_height_quotient() {
        let lines: Vec<&str> = std::iter::repeat("x").take(10).collect();
        let block = fit(&lines, 189.0, 72.0);
        // floor((72 - 8) / 10)
        assert_eq!(block.size, Pt(6.0));
    }

    #[test]
    fn the_split_halves_are_not_remeasured() {
        // "Archibald Longname" is still 108pt wide at 12pt, far over the
        // 92pt of usable width; the split happens exactly once and the
        // degraded height-filling size applies
        let block = fit(&["Bartholomew Archibald Longname"], 100.0, 40.0);
        assert_eq!(
            block.lines,
            vec!["Bartholomew", "Archibald Longname"]
        );
        assert_eq!(block.size, Pt(16.0));
    }
}

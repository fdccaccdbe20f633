use crate::spec::LabelSpec;
use crate::units::Pt;

/// Maps a sequential cell index to its origin on the sheet.
///
/// Coordinates are top-down: `y` grows from the sheet's top margin towards
/// the bottom of the page. Flipping into PDF's bottom-up space is the sheet
/// writer's concern, not the grid's.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelGrid {
    across: usize,
    down: usize,
    cell_width: Pt,
    cell_height: Pt,
    gap_left: Pt,
    gap_top: Pt,
    margin_left: Pt,
    margin_top: Pt,
}

impl LabelGrid {
    pub fn new(spec: &LabelSpec) -> LabelGrid {
        LabelGrid {
            across: spec.across,
            down: spec.down,
            cell_width: spec.cell_width,
            cell_height: spec.cell_height,
            gap_left: spec.gap_left,
            gap_top: spec.gap_top,
            margin_left: spec.margin_left,
            margin_top: spec.margin_top,
        }
    }

    pub fn cells_per_page(&self) -> usize {
        self.across * self.down
    }

    /// The top-left corner of cell `index`, counting left-to-right then
    /// top-to-bottom. `index` must be within one page.
    pub fn position(&self, index: usize) -> (Pt, Pt) {
        debug_assert!(index < self.cells_per_page());
        let column = index % self.across;
        let row = index / self.across;
        let x = self.margin_left + (self.cell_width + self.gap_left) * column as f32;
        let y = self.margin_top + (self.cell_height + self.gap_top) * row as f32;
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> LabelGrid {
        LabelGrid::new(&LabelSpec {
            brand: "Avery".into(),
            number: "5160".into(),
            across: 3,
            down: 10,
            cell_width: Pt(189.0),
            cell_height: Pt(72.0),
            gap_left: Pt(10.0),
            gap_top: Pt(2.0),
            paper_width: Pt(612.0),
            paper_height: Pt(792.0),
            margin_left: Pt(13.5),
            margin_top: Pt(36.0),
        })
    }

    #[test]
    fn indices_walk_left_to_right_then_down() {
        let grid = grid();
        let (x0, y0) = grid.position(0);
        let (x1, y1) = grid.position(1);
        let (x2, y2) = grid.position(2);
        let (x3, y3) = grid.position(3);

        assert_eq!((x0, y0), (Pt(13.5), Pt(36.0)));
        assert_eq!((x1, y1), (Pt(13.5 + 199.0), Pt(36.0)));
        assert_eq!((x2, y2), (Pt(13.5 + 398.0), Pt(36.0)));
        // index 3 wraps back to column 0 on the second row
        assert_eq!((x3, y3), (Pt(13.5), Pt(36.0 + 74.0)));
    }

    #[test]
    fn last_cell_of_the_page() {
        let grid = grid();
        let (x, y) = grid.position(29);
        assert_eq!(x, Pt(13.5 + 398.0));
        assert_eq!(y, Pt(36.0 + 9.0 * 74.0));
    }
}

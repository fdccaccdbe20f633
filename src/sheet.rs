use crate::document::Document;
use crate::fit::fit_block;
use crate::font::LabelFont;
use crate::grid::LabelGrid;
use crate::info::Info;
use crate::page::{Page, RectLayout, SpanFont, SpanLayout};
use crate::rect::Rect;
use crate::spec::LabelSpec;
use crate::units::Pt;
use crate::LabelError;
use id_arena::Id;
use std::io::Write;

/// What a finished run produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub labels: usize,
    pub pages: usize,
}

/// Fills sheets of labels cell by cell, breaking to a new page every
/// `across * down` labels and flushing the final partial page on
/// [LabelSheet::finish].
pub struct LabelSheet {
    doc: Document,
    spec: LabelSpec,
    grid: LabelGrid,
    font: Id<LabelFont>,
    sizes: Vec<Pt>,
    padding: Pt,
    draw_boxes: bool,
    page: Page,
    slot: usize,
    placed: usize,
}

impl LabelSheet {
    pub fn new(
        spec: LabelSpec,
        font: LabelFont,
        sizes: Vec<Pt>,
        padding: Pt,
        draw_boxes: bool,
    ) -> LabelSheet {
        let mut doc = Document::default();
        let mut info = Info::new();
        info.title(format!("{} {} labels", spec.brand, spec.number));
        info.producer(concat!("label-gen ", env!("CARGO_PKG_VERSION")));
        doc.set_info(info);
        let font = doc.add_font(font);

        let grid = LabelGrid::new(&spec);
        let page = Page::new(spec.paper_width, spec.paper_height);

        LabelSheet {
            doc,
            spec,
            grid,
            font,
            sizes,
            padding,
            draw_boxes,
            page,
            slot: 0,
            placed: 0,
        }
    }

    /// Place one formatted address in the next free cell, breaking to a new
    /// page when the sheet is full
    pub fn place(&mut self, lines: Vec<String>) {
        let font = &self.doc.fonts[self.font];
        let block = fit_block(
            lines,
            self.spec.cell_width,
            self.spec.cell_height,
            self.padding,
            &self.sizes,
            |text, size| font.text_width(text, size),
        );

        // grid coordinates are top-down; PDF pages are bottom-up
        let (x, y) = self.grid.position(self.slot);
        let size = block.size;
        for (i, line) in block.lines.into_iter().enumerate() {
            let baseline =
                self.spec.paper_height - y - size * (i as f32 + 1.0) - self.padding / 2.0;
            self.page.add_span(SpanLayout {
                text: line,
                font: SpanFont {
                    id: self.font,
                    size,
                },
                coords: (x + self.padding, baseline),
            });
        }

        if self.draw_boxes {
            self.page.add_rect(RectLayout {
                rect: Rect {
                    x1: x,
                    y1: self.spec.paper_height - y - self.spec.cell_height,
                    x2: x + self.spec.cell_width,
                    y2: self.spec.paper_height - y,
                },
                filled: false,
            });
        }

        self.slot += 1;
        self.placed += 1;
        if self.slot == self.grid.cells_per_page() {
            self.break_page();
        }
    }

    fn break_page(&mut self) {
        let page = std::mem::replace(
            &mut self.page,
            Page::new(self.spec.paper_width, self.spec.paper_height),
        );
        self.doc.add_page(page);
        self.slot = 0;
    }

    /// Total labels placed so far
    pub fn labels_placed(&self) -> usize {
        self.placed
    }

    /// Pages flushed so far, not counting the one still being filled
    pub fn pages_emitted(&self) -> usize {
        self.doc.page_order.len()
    }

    /// Flush the final partial page if it holds any labels, then write the
    /// whole document out
    pub fn finish<W: Write>(mut self, w: W) -> Result<Summary, LabelError> {
        if self.slot > 0 {
            self.break_page();
        }
        let summary = Summary {
            labels: self.placed,
            pages: self.doc.page_order.len(),
        };
        self.doc.write(w)?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BuiltinFont;

    fn sheet() -> LabelSheet {
        // 2 across x 3 down: a page every six labels
        LabelSheet::new(
            LabelSpec {
                brand: "Avery".into(),
                number: "0000".into(),
                across: 2,
                down: 3,
                cell_width: Pt(189.0),
                cell_height: Pt(72.0),
                gap_left: Pt(10.0),
                gap_top: Pt(0.0),
                paper_width: Pt(612.0),
                paper_height: Pt(792.0),
                margin_left: Pt(13.5),
                margin_top: Pt(36.0),
            },
            LabelFont::Builtin(BuiltinFont {
                name: "Times-Roman",
            }),
            vec![Pt(16.0), Pt(14.0), Pt(12.0)],
            Pt(4.0),
            false,
        )
    }

    fn lines() -> Vec<String> {
        vec!["J Doe".to_string(), "1 Main St".to_string()]
    }

    #[test]
    fn a_page_breaks_after_every_full_sheet() {
        let mut sheet = sheet();
        for _ in 0..6 {
            sheet.place(lines());
        }
        assert_eq!(sheet.pages_emitted(), 1);

        sheet.place(lines());
        assert_eq!(sheet.pages_emitted(), 1);
        assert_eq!(sheet.labels_placed(), 7);

        let summary = sheet.finish(Vec::new()).unwrap();
        assert_eq!(summary.labels, 7);
        assert_eq!(summary.pages, 2);
    }

    #[test]
    fn an_exactly_full_run_emits_no_trailing_page() {
        let mut sheet = sheet();
        for _ in 0..12 {
            sheet.place(lines());
        }
        let summary = sheet.finish(Vec::new()).unwrap();
        assert_eq!(summary.labels, 12);
        assert_eq!(summary.pages, 2);
    }

    #[test]
    fn an_empty_run_writes_an_empty_document() {
        let summary = sheet().finish(Vec::new()).unwrap();
        assert_eq!(summary.labels, 0);
        assert_eq!(summary.pages, 0);
    }

    #[test]
    fn spans_land_inside_their_cell() {
        let mut sheet = sheet();
        sheet.place(lines());
        // two lines at 16pt, baselines stepping one size down from the top
        // of the first cell, inset by the padding
        match &sheet.page.contents[0] {
            crate::page::PageContents::Text(span) => {
                assert_eq!(span.coords.0, Pt(13.5 + 4.0));
                assert_eq!(span.coords.1, Pt(792.0 - 36.0 - 16.0 - 2.0));
                assert_eq!(span.font.size, Pt(16.0));
            }
            other => panic!("unexpected content: {other:?}"),
        }
        match &sheet.page.contents[1] {
            crate::page::PageContents::Text(span) => {
                assert_eq!(span.coords.1, Pt(792.0 - 36.0 - 32.0 - 2.0));
            }
            other => panic!("unexpected content: {other:?}"),
        }
    }

    #[test]
    fn the_box_outline_covers_the_cell() {
        let mut sheet = sheet();
        sheet.draw_boxes = true;
        sheet.place(lines());
        let rect = sheet
            .page
            .contents
            .iter()
            .find_map(|content| match content {
                crate::page::PageContents::Rect(layout) => Some(layout),
                _ => None,
            })
            .expect("an outline was drawn");
        assert!(!rect.filled);
        assert_eq!(rect.rect.x1, Pt(13.5));
        assert_eq!(rect.rect.y2, Pt(792.0 - 36.0));
        assert_eq!(rect.rect.width(), Pt(189.0));
        assert_eq!(rect.rect.height(), Pt(72.0));
    }

    #[test]
    fn finished_documents_start_with_a_pdf_header() {
        let mut sheet = sheet();
        sheet.place(lines());
        let mut out = Vec::new();
        let summary = sheet.finish(&mut out).unwrap();
        assert_eq!(summary.labels, 1);
        assert!(out.starts_with(b"%PDF-"));
    }
}

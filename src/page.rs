use crate::document::{ObjectReferences, RefType};
use crate::font::LabelFont;
use crate::rect::Rect;
use crate::units::Pt;
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Name, Pdf};
use std::io::Write;

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub id: Id<LabelFont>,
    pub size: Pt,
}

/// A single run of text positioned on a page. `coords` is the baseline
/// origin of the text in bottom-up page coordinates.
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub coords: (Pt, Pt),
}

/// A rectangle drawn on the page, stroked when `filled` is false
#[derive(Clone, PartialEq, Debug)]
pub struct RectLayout {
    pub rect: Rect,
    pub filled: bool,
}

#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Text(SpanLayout),
    Rect(RectLayout),
}

pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// The laid out content
    pub contents: Vec<PageContents>,
}

impl Page {
    pub fn new(width: Pt, height: Pt) -> Page {
        Page {
            media_box: Rect {
                x1: Pt(0.0),
                y1: Pt(0.0),
                x2: width,
                y2: height,
            },
            contents: Vec::default(),
        }
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        self.contents.push(PageContents::Text(span));
    }

    pub fn add_rect(&mut self, rect: RectLayout) {
        self.contents.push(PageContents::Rect(rect));
    }

    #[allow(clippy::write_with_newline)]
    fn render(&self, fonts: &Arena<LabelFont>) -> Result<Vec<u8>, std::io::Error> {
        let mut content: Vec<u8> = Vec::default();

        for page_content in self.contents.iter() {
            match page_content {
                PageContents::Text(span) => {
                    write!(&mut content, "q\n")?;
                    write!(
                        &mut content,
                        "/F{} {} Tf\n",
                        span.font.id.index(),
                        span.font.size.0
                    )?;
                    write!(&mut content, "BT\n")?;
                    write!(&mut content, "{} {} Td\n", span.coords.0 .0, span.coords.1 .0)?;
                    match &fonts[span.font.id] {
                        LabelFont::Embedded(font) => {
                            // Identity-H: glyph ids as a hex string
                            write!(&mut content, "<")?;
                            for ch in span.text.chars() {
                                let gid = font
                                    .glyph_id(ch)
                                    .or_else(|| font.glyph_id('\u{FFFD}'))
                                    .or_else(|| font.glyph_id('?'))
                                    .unwrap_or_default();
                                write!(&mut content, "{gid:04x}")?;
                            }
                            write!(&mut content, "> Tj\n")?;
                        }
                        LabelFont::Builtin(_) => {
                            // WinAnsi: a literal string, one byte per char
                            write!(&mut content, "(")?;
                            for ch in span.text.chars() {
                                match ch {
                                    '(' | ')' | '\\' => {
                                        content.push(b'\\');
                                        content.push(ch as u8);
                                    }
                                    ch if (ch as u32) <= 0xff => content.push(ch as u8),
                                    _ => content.push(b'?'),
                                }
                            }
                            write!(&mut content, ") Tj\n")?;
                        }
                    }
                    write!(&mut content, "ET\n")?;
                    write!(&mut content, "Q\n")?;
                }
                PageContents::Rect(layout) => {
                    write!(&mut content, "q\n")?;
                    write!(
                        &mut content,
                        "{} {} {} {} re\n",
                        layout.rect.x1.0,
                        layout.rect.y1.0,
                        layout.rect.width().0,
                        layout.rect.height().0
                    )?;
                    write!(&mut content, "{}\n", if layout.filled { "f" } else { "S" })?;
                    write!(&mut content, "Q\n")?;
                }
            }
        }

        Ok(content)
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        fonts: &Arena<LabelFont>,
        writer: &mut Pdf,
    ) -> Result<(), std::io::Error> {
        let id = refs
            .get(RefType::Page(page_index))
            .expect("page has a pre-generated ref");
        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.parent(refs.get(RefType::PageTree).expect("document has a page tree"));

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (font_id, _) in fonts.iter() {
            resource_fonts.pair(
                Name(format!("F{}", font_id.index()).as_bytes()),
                refs.get(RefType::Font(font_id.index()))
                    .expect("fonts are written before pages"),
            );
        }
        resource_fonts.finish();
        resources.finish();

        let content_id = refs.gen(RefType::ContentForPage(page_index));
        page.contents(content_id);
        page.finish();

        let rendered = self.render(fonts)?;
        writer.stream(content_id, rendered.as_slice());

        Ok(())
    }
}

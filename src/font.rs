use crate::{
    document::{ObjectReferences, RefType},
    LabelError, Pt,
};
use id_arena::Id;
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Str,
};
use std::collections::HashMap;
use std::path::Path;

/// The fourteen fonts every PDF reader provides without embedding.
pub const BUILTIN_FONTS: &[&str] = &[
    "Courier",
    "Courier-Bold",
    "Courier-BoldOblique",
    "Courier-Oblique",
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-BoldOblique",
    "Helvetica-Oblique",
    "Symbol",
    "Times-Bold",
    "Times-BoldItalic",
    "Times-Italic",
    "Times-Roman",
    "ZapfDingbats",
];

/// The font used to draw label text: either a TTF/OTF face embedded in its
/// entirety in the generated PDF, or one of the built-in base fonts.
///
/// Embedded faces measure text from their glyph advance tables. Built-in
/// fonts carry no metrics here, so their widths are estimated from an
/// average character width; label fitting degrades gracefully either way.
pub enum LabelFont {
    Embedded(EmbeddedFont),
    Builtin(BuiltinFont),
}

impl LabelFont {
    /// Calculate the width of a line of text at the given font size
    pub fn text_width(&self, text: &str, size: Pt) -> Pt {
        match self {
            LabelFont::Embedded(font) => font.text_width(text, size),
            LabelFont::Builtin(font) => font.text_width(text, size),
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, id: Id<LabelFont>, writer: &mut Pdf) {
        match self {
            LabelFont::Embedded(font) => font.write(refs, id.index(), writer),
            LabelFont::Builtin(font) => font.write(refs, id.index(), writer),
        }
    }
}

/// Resolve a font name the way the label printer expects: a name on the
/// built-in list is used as-is; anything else is treated as a font file next
/// to the working directory, trying recognized extensions in order. When
/// nothing loads, falls back to Times-Roman with a diagnostic.
pub fn load_font(name: &str) -> LabelFont {
    if let Some(builtin) = BUILTIN_FONTS.iter().find(|&&builtin| builtin == name) {
        return LabelFont::Builtin(BuiltinFont { name: builtin });
    }

    for ext in ["ttf", "ttc", "otf"] {
        let path = format!("{name}.{ext}");
        if !Path::new(&path).exists() {
            continue;
        }
        match std::fs::read(&path).map_err(LabelError::from).and_then(EmbeddedFont::load) {
            Ok(font) => return LabelFont::Embedded(font),
            Err(err) => log::warn!("could not load {path}: {err}"),
        }
    }

    log::warn!("Could not load {name}, falling back to 'Times-Roman'");
    LabelFont::Builtin(BuiltinFont {
        name: "Times-Roman",
    })
}

/// A parsed font face that will be embedded in its entirety in the generated
/// PDF, so large fonts may dramatically increase the size of the output.
pub struct EmbeddedFont {
    pub face: OwnedFace,
}

impl EmbeddedFont {
    /// Load a font from raw bytes, returning an error if the face could not
    /// be parsed
    pub fn load(bytes: Vec<u8>) -> Result<EmbeddedFont, LabelError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(EmbeddedFont { face })
    }

    /// The PostScript name of the face, falling back to its full name
    pub fn postscript_name(&self) -> Option<String> {
        let face = self.face.as_face_ref();
        face.names()
            .into_iter()
            .find(|name| {
                name.name_id == owned_ttf_parser::name_id::POST_SCRIPT_NAME && name.is_unicode()
            })
            .or_else(|| {
                face.names().into_iter().find(|name| {
                    name.name_id == owned_ttf_parser::name_id::FULL_NAME && name.is_unicode()
                })
            })
            .and_then(|name| name.to_string())
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face.as_face_ref().glyph_index(ch).map(|i| i.0)
    }

    /// Calculate the width of a line of text at the given size by summing
    /// glyph advances. Characters the face has no glyph for are skipped.
    pub fn text_width(&self, text: &str, size: Pt) -> Pt {
        let face = self.face.as_face_ref();
        let scaling = size.0 / face.units_per_em() as f32;
        Pt(text
            .chars()
            .filter_map(|ch| face.glyph_index(ch))
            .map(|gid| face.glyph_hor_advance(gid).unwrap_or_default() as f32 * scaling)
            .sum())
    }

    /// Glyph id to unicode char mapping, from the face's unicode cmap
    /// subtables, sorted by glyph id
    fn glyph_chars(&self) -> Vec<(u16, char)> {
        let mut map: HashMap<u16, char> = HashMap::new();
        if let Some(cmap) = self.face.as_face_ref().tables().cmap {
            for subtable in cmap.subtables.into_iter().filter(|table| table.is_unicode()) {
                subtable.codepoints(|codepoint: u32| {
                    if let Ok(ch) = char::try_from(codepoint) {
                        if let Some(index) =
                            subtable.glyph_index(codepoint).filter(|index| index.0 > 0)
                        {
                            map.entry(index.0).or_insert(ch);
                        }
                    }
                });
            }
        }
        let mut glyphs: Vec<(u16, char)> = map.into_iter().collect();
        glyphs.sort_by_key(|&(gid, _)| gid);
        glyphs
    }

    fn write_font_data(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) -> pdf_writer::Ref {
        let id = refs.gen(RefType::FontData(font_index));
        writer
            .stream(id, self.face.as_slice())
            .pair(Name(b"Length1"), self.face.as_slice().len() as i32);
        id
    }

    fn write_descriptor(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        advances: &[(u16, f32)],
        writer: &mut Pdf,
    ) -> pdf_writer::Ref {
        let font_data_id = self.write_font_data(refs, font_index, writer);
        let face = self.face.as_face_ref();
        let scaling = 1000.0 / face.units_per_em() as f32;

        let max_width = advances.iter().map(|&(_, w)| w).fold(0.0_f32, f32::max);
        let avg_width = if advances.is_empty() {
            0.0
        } else {
            advances.iter().map(|&(_, w)| w).sum::<f32>() / advances.len() as f32
        };

        let id = refs.gen(RefType::FontDescriptor(font_index));
        let mut descriptor = writer.font_descriptor(id);
        let name = self
            .postscript_name()
            .unwrap_or_else(|| format!("F{font_index}"));
        descriptor.name(Name(name.as_bytes()));

        let mut flags = FontFlags::empty();
        if face.is_monospaced() {
            flags.set(FontFlags::FIXED_PITCH, true);
        }
        if face.is_italic() {
            flags.set(FontFlags::ITALIC, true);
        }
        descriptor.flags(flags);

        let bbox = face.global_bounding_box();
        descriptor.bbox(pdf_writer::Rect {
            x1: bbox.x_min as f32 * scaling,
            y1: bbox.y_min as f32 * scaling,
            x2: bbox.x_max as f32 * scaling,
            y2: bbox.y_max as f32 * scaling,
        });
        descriptor.italic_angle(0.0);
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.cap_height(
            face.capital_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(1000.0),
        );
        descriptor.stem_v(80.0);
        descriptor.avg_width(avg_width);
        descriptor.max_width(max_width);
        descriptor.missing_width(avg_width);
        descriptor.font_file2(font_data_id);

        id
    }

    fn write_to_unicode(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        glyphs: &[(u16, char)],
        writer: &mut Pdf,
    ) -> pdf_writer::Ref {
        let id = refs.gen(RefType::ToUnicode(font_index));

        let mut map: String = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo\n\
             << /Registry (Adobe)\n\
             /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n\
             <0000> <FFFF>\n\
             endcodespacerange\n",
        );

        // bfchar blocks are limited to 100 entries apiece
        for block in glyphs.chunks(100) {
            map.push_str(&format!("{} beginbfchar\n", block.len()));
            for &(gid, ch) in block {
                map.push_str(&format!("<{gid:04x}> <{:04x}>\n", ch as u32));
            }
            map.push_str("endbfchar\n");
        }
        map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            map.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultCompression as u8,
        );
        let mut stream = writer.stream(id, compressed.as_slice());
        stream.filter(Filter::FlateDecode);

        id
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) {
        let face = self.face.as_face_ref();
        let scaling = 1000.0 / face.units_per_em() as f32;

        let glyphs = self.glyph_chars();
        let advances: Vec<(u16, f32)> = glyphs
            .iter()
            .filter_map(|&(gid, _)| {
                face.glyph_hor_advance(owned_ttf_parser::GlyphId(gid))
                    .map(|adv| (gid, adv as f32 * scaling))
            })
            .collect();

        let descriptor_id = self.write_descriptor(refs, font_index, &advances, writer);
        let to_unicode_id = self.write_to_unicode(refs, font_index, &glyphs, writer);

        let cid_id = refs.gen(RefType::CidFont(font_index));
        let mut cid_font = writer.cid_font(cid_id);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(descriptor_id);

        // widths, grouped into runs of consecutive glyph ids
        let mut widths = cid_font.widths();
        let mut run: Vec<f32> = Vec::new();
        let mut run_start: u16 = 0;
        let mut next_gid: u16 = 0;
        for (gid, width) in advances.iter().copied() {
            if run.is_empty() {
                run_start = gid;
            } else if gid != next_gid {
                widths.consecutive(run_start, std::mem::take(&mut run));
                run_start = gid;
            }
            run.push(width);
            next_gid = gid.wrapping_add(1);
        }
        if !run.is_empty() {
            widths.consecutive(run_start, run);
        }
        widths.finish();

        cid_font.default_width(1000.0);
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));
        cid_font.finish();

        let font_id = refs.gen(RefType::Font(font_index));
        let mut font = writer.type0_font(font_id);
        font.base_font(Name(format!("F{font_index}").as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_id);
        font.to_unicode(to_unicode_id);
    }
}

/// One of the base fonts every reader ships. Nothing is embedded; text is
/// drawn in WinAnsi encoding and widths are estimated.
pub struct BuiltinFont {
    pub name: &'static str,
}

impl BuiltinFont {
    /// Estimated width of a line of text at the given size. The base fonts
    /// ship without metric tables, so this uses an average character width
    /// as a fraction of the font size.
    pub fn text_width(&self, text: &str, size: Pt) -> Pt {
        Pt(text.chars().count() as f32 * size.0 * self.char_width_ratio())
    }

    fn char_width_ratio(&self) -> f32 {
        if self.name.starts_with("Courier") {
            0.6
        } else if self.name.starts_with("Helvetica") {
            0.52
        } else {
            0.5
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) {
        let font_id = refs.gen(RefType::Font(font_index));
        let mut font = writer.type1_font(font_id);
        font.base_font(Name(self.name.as_bytes()));
        // Symbol and ZapfDingbats carry their own encodings
        if self.name != "Symbol" && self.name != "ZapfDingbats" {
            font.encoding_predefined(Name(b"WinAnsiEncoding"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_widths_scale_with_size_and_length() {
        let font = BuiltinFont { name: "Times-Roman" };
        assert_eq!(font.text_width("abcd", Pt(10.0)), Pt(20.0));
        assert_eq!(font.text_width("abcd", Pt(20.0)), Pt(40.0));
        assert_eq!(font.text_width("", Pt(20.0)), Pt(0.0));
    }

    #[test]
    fn monospace_is_wider_than_serif() {
        let courier = BuiltinFont { name: "Courier" };
        let times = BuiltinFont { name: "Times-Roman" };
        assert!(courier.text_width("m", Pt(12.0)) > times.text_width("m", Pt(12.0)));
    }

    #[test]
    fn unknown_font_falls_back_to_times_roman() {
        match load_font("NoSuchFontAnywhere") {
            LabelFont::Builtin(font) => assert_eq!(font.name, "Times-Roman"),
            LabelFont::Embedded(_) => panic!("expected the builtin fallback"),
        }
    }

    #[test]
    fn builtin_names_resolve_directly() {
        match load_font("Helvetica-Bold") {
            LabelFont::Builtin(font) => assert_eq!(font.name, "Helvetica-Bold"),
            LabelFont::Embedded(_) => panic!("expected a builtin font"),
        }
    }
}

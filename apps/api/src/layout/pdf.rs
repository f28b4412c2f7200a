//! PDF serialization of a `DocumentLayout` with `lopdf`.
//!
//! Fonts:
//! - `/F1` Helvetica, `/F2` Helvetica-Bold: standard-14, WinAnsi encoded.
//! - `/F3` the embedded meaning font, when present: composite Type0 font with an
//!   Identity-H CIDFont whose CIDs are UTF-16 code units. `CIDToGIDMap` maps them
//!   to glyphs and an identity `ToUnicode` CMap keeps the text searchable.
//!
//! The whole document is built in memory; nothing is returned unless `save_to`
//! succeeds.

use std::collections::BTreeMap;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::layout::font_metrics::{BuiltinFont, EmbeddedFont, FontSet, PageConfig};
use crate::layout::paginator::{DocumentLayout, LineStyle, PlacedLine};
use crate::layout::ExportError;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";
const MEANING: &str = "F3";

const IDENTITY_TO_UNICODE: &[u8] = b"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
1 beginbfrange
<0000> <FFFF> <0000>
endbfrange
endcmap
CMapName currentdict /CMap defineresource pop
end
end";

/// Serializes `layout` into PDF bytes.
pub fn render_pdf(
    layout: &DocumentLayout,
    fonts: &FontSet,
    config: &PageConfig,
) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut font_dict = Dictionary::new();
    font_dict.set(REGULAR, doc.add_object(builtin_font(BuiltinFont::Helvetica)));
    font_dict.set(BOLD, doc.add_object(builtin_font(BuiltinFont::HelveticaBold)));
    if let Some(font) = &fonts.meaning_font {
        let used = meaning_chars(layout);
        font_dict.set(MEANING, add_embedded_font(&mut doc, font, &used));
    }
    let resources_id = doc.add_object(dictionary! { "Font" => font_dict });

    let mut kids = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let operations: Vec<Operation> = page
            .lines
            .iter()
            .flat_map(|line| line_operations(line, fonts, config))
            .collect();
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| ExportError::Render(format!("failed to encode page content: {e}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_count),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(config.page_width),
                Object::Real(config.page_height),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Producer" => Object::string_literal("LexiDaily"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExportError::Render(format!("failed to write PDF: {e}")))?;
    Ok(bytes)
}

fn builtin_font(font: BuiltinFont) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font_name(),
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Text-showing operations for one placed line.
fn line_operations(line: &PlacedLine, fonts: &FontSet, config: &PageConfig) -> Vec<Operation> {
    let (_, size) = line.style.face(fonts, config);
    let (font_name, text) = match line.style {
        LineStyle::Word => (BOLD, winansi_string(&line.text)),
        LineStyle::Meaning if fonts.meaning_font.is_some() => (MEANING, utf16_string(&line.text)),
        _ => (REGULAR, winansi_string(&line.text)),
    };
    let pdf_y = config.page_height - line.baseline;

    let mut ops = Vec::with_capacity(7);
    if line.style == LineStyle::Disclaimer {
        ops.push(Operation::new("g", vec![Object::Real(0.4)]));
    }
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(font_name.as_bytes().to_vec()), Object::Real(size)],
    ));
    ops.push(Operation::new(
        "Td",
        vec![Object::Real(line.x), Object::Real(pdf_y)],
    ));
    ops.push(Operation::new("Tj", vec![text]));
    ops.push(Operation::new("ET", vec![]));
    if line.style == LineStyle::Disclaimer {
        ops.push(Operation::new("g", vec![Object::Real(0.0)]));
    }
    ops
}

/// Literal string in WinAnsi encoding. Unmappable characters become `?`.
fn winansi_string(text: &str) -> Object {
    let bytes = text.chars().map(winansi_byte).collect::<Vec<u8>>();
    Object::String(bytes, StringFormat::Literal)
}

fn winansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
        '\u{2026}' => 0x85,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        _ => b'?',
    }
}

/// Hex string of UTF-16BE code units, one CID per BMP character.
fn utf16_string(text: &str) -> Object {
    let bytes = text
        .chars()
        .flat_map(|c| bmp_code(c).to_be_bytes())
        .collect::<Vec<u8>>();
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Characters outside the BMP have no CID here; they render as U+FFFD.
fn bmp_code(c: char) -> u16 {
    u16::try_from(c as u32).unwrap_or(0xFFFD)
}

fn meaning_chars(layout: &DocumentLayout) -> String {
    let mut chars: Vec<char> = layout
        .pages
        .iter()
        .flat_map(|p| p.lines.iter())
        .filter(|l| l.style == LineStyle::Meaning)
        .flat_map(|l| l.text.chars())
        .collect();
    chars.sort_unstable();
    chars.dedup();
    chars.into_iter().collect()
}

/// Adds the Type0 font, its CIDFont, descriptor, font file and maps.
/// Returns the Type0 font's object id.
fn add_embedded_font(doc: &mut Document, font: &EmbeddedFont, used: &str) -> ObjectId {
    let metrics = font.descriptor();

    let font_file = Stream::new(
        dictionary! { "Length1" => Object::Integer(font.data().len() as i64) },
        font.data().to_vec(),
    );
    let font_file_id = doc.add_object(font_file);

    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => font.name(),
        "Flags" => Object::Integer(4),
        "FontBBox" => metrics.bbox.iter().map(|v| Object::Integer(*v as i64)).collect::<Vec<_>>(),
        "ItalicAngle" => Object::Integer(0),
        "Ascent" => Object::Integer(metrics.ascent as i64),
        "Descent" => Object::Integer(metrics.descent as i64),
        "CapHeight" => Object::Integer(metrics.cap_height as i64),
        "StemV" => Object::Integer(80),
        "FontFile2" => font_file_id,
    });

    let cid_map_id = doc.add_object(Stream::new(dictionary! {}, font.cid_to_gid_map()));
    let to_unicode_id = doc.add_object(Stream::new(dictionary! {}, IDENTITY_TO_UNICODE.to_vec()));

    // Widths keyed by CID, only for characters the document uses.
    let widths: BTreeMap<u16, u16> = used
        .chars()
        .map(|c| (bmp_code(c), font.glyph(c).advance))
        .collect();
    let mut w_array = Vec::with_capacity(widths.len() * 2);
    for (cid, advance) in widths {
        w_array.push(Object::Integer(cid as i64));
        w_array.push(Object::Array(vec![Object::Integer(advance as i64)]));
    }

    let cid_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => font.name(),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => Object::Integer(0),
        },
        "FontDescriptor" => descriptor_id,
        "CIDToGIDMap" => cid_map_id,
        "DW" => Object::Integer(1000),
        "W" => w_array,
    });

    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => font.name(),
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(cid_font_id)],
        "ToUnicode" => to_unicode_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::default_page_config;
    use crate::layout::font_metrics::tests::fixture_fonts;
    use crate::layout::paginator::layout_document;
    use crate::models::word::WordDetail;

    fn records(n: usize) -> Vec<WordDetail> {
        (0..n)
            .map(|i| WordDetail {
                word: format!("word{i}"),
                sentence: "A sentence that uses the word in context.".to_string(),
                meaning: "क्षणिक".to_string(),
                pronunciation: "WURD".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let config = default_page_config();
        let fonts = FontSet::builtin_only("Hindi");
        let layout = layout_document(&records(3), "Today's Words", &fonts, &config).unwrap();

        let bytes = render_pdf(&layout, &fonts, &config).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert!(bytes.len() > 200);
    }

    #[test]
    fn test_rendered_page_count_matches_layout() {
        let config = default_page_config();
        let fonts = FontSet::builtin_only("Hindi");
        let layout = layout_document(&records(50), "Today's Words", &fonts, &config).unwrap();

        let bytes = render_pdf(&layout, &fonts, &config).unwrap();
        let parsed = Document::load_mem(&bytes).unwrap();

        assert_eq!(parsed.get_pages().len(), layout.pages.len());
    }

    #[test]
    fn test_winansi_maps_latin_and_replaces_other_scripts() {
        assert_eq!(winansi_byte('A'), b'A');
        assert_eq!(winansi_byte('é'), 0xE9);
        assert_eq!(winansi_byte('\u{2014}'), 0x97);
        assert_eq!(winansi_byte('क'), b'?');
    }

    #[test]
    fn test_utf16_string_encodes_code_units() {
        match utf16_string("aक") {
            Object::String(bytes, StringFormat::Hexadecimal) => {
                assert_eq!(bytes, vec![0x00, 0x61, 0x09, 0x15]);
            }
            other => panic!("unexpected object {other:?}"),
        }
    }

    #[test]
    fn test_bmp_code_replaces_astral_characters() {
        assert_eq!(bmp_code('😀'), 0xFFFD);
        assert_eq!(bmp_code('क'), 0x0915);
    }

    #[test]
    fn test_embedded_font_export_keeps_meanings_extractable() {
        let config = default_page_config();
        let fonts = fixture_fonts("Russian");
        let records: Vec<WordDetail> = records(50)
            .into_iter()
            .map(|r| WordDetail {
                meaning: "мимолетный".to_string(),
                ..r
            })
            .collect();
        let layout = layout_document(&records, "Today's Words", &fonts, &config).unwrap();
        assert!(!layout.font_fallback);

        let bytes = render_pdf(&layout, &fonts, &config).unwrap();
        let parsed = Document::load_mem(&bytes).unwrap();
        let pages: Vec<u32> = parsed.get_pages().keys().copied().collect();

        assert!(pages.len() > 1);
        assert_eq!(pages.len(), layout.pages.len());
        let text = parsed.extract_text(&pages[..1]).unwrap();
        assert!(text.contains("мимолетный"), "extracted text: {text}");
    }

    #[test]
    fn test_meaning_lines_use_embedded_font_when_loaded() {
        let config = default_page_config();
        let fonts = fixture_fonts("Russian");
        let line = PlacedLine {
            text: "Russian Meaning: мимолетный".to_string(),
            x: 56.7,
            baseline: 100.0,
            style: LineStyle::Meaning,
            record: Some(0),
        };

        let ops = line_operations(&line, &fonts, &config);
        let tf = ops.iter().find(|op| op.operator == "Tf").unwrap();
        match &tf.operands[0] {
            Object::Name(name) => assert_eq!(name.as_slice(), MEANING.as_bytes()),
            other => panic!("unexpected font operand {other:?}"),
        }
        let tj = ops.iter().find(|op| op.operator == "Tj").unwrap();
        assert!(matches!(tj.operands[0], Object::String(_, StringFormat::Hexadecimal)));
    }
}

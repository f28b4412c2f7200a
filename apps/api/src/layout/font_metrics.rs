//! Font metrics for PDF export.
//!
//! Builtin faces are the PDF standard-14 Helvetica pair, measured from static
//! AFM width tables (1/1000 em, ASCII 0x20..=0x7E, index = char - 32). Characters
//! outside the table fall back to `average_char_width`.
//!
//! The meaning field can use an embedded TrueType face loaded from disk; its
//! widths come from the font's own `hmtx` table via `ttf-parser`.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

const PT_PER_MM: f32 = 72.0 / 25.4;

/// Page geometry and type sizes, all in PDF points.
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub page_width: f32,
    pub page_height: f32,
    /// Same margin on all four sides.
    pub margin: f32,
    pub line_height: f32,
    pub title_size: f32,
    pub body_size: f32,
    pub disclaimer_size: f32,
}

impl PageConfig {
    /// Page width minus left and right margins; the wrap target.
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin * 2.0
    }

    /// Lowest baseline a block may reach without overflowing.
    pub fn bottom_limit(&self) -> f32 {
        self.page_height - self.margin
    }
}

/// A4 portrait, 20mm margins, 7mm lines, 18pt title over 12pt body.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        page_width: 210.0 * PT_PER_MM,
        page_height: 297.0 * PT_PER_MM,
        margin: 20.0 * PT_PER_MM,
        line_height: 7.0 * PT_PER_MM,
        title_size: 18.0,
        body_size: 12.0,
        disclaimer_size: 10.0,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Builtin faces
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
}

impl BuiltinFont {
    pub fn base_font_name(self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    fn table(self) -> &'static FontMetricTable {
        match self {
            BuiltinFont::Helvetica => &HELVETICA_TABLE,
            BuiltinFont::HelveticaBold => &HELVETICA_BOLD_TABLE,
        }
    }
}

/// Static character-width table in 1/1000 em.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [u16; 95],
    /// Fallback width for characters outside the table.
    pub average_char_width: u16,
}

impl FontMetricTable {
    /// Sum of character widths in 1/1000 em.
    pub fn measure_units(&self, s: &str) -> u32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32] as u32
                } else {
                    self.average_char_width as u32
                }
            })
            .sum()
    }
}

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp  !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0   1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :   ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A   B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N   O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [   \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a   b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n   o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {   |    }    ~
        334, 260, 334, 584,
    ],
    average_char_width: 556,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp  !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0   1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :   ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A   B    C    D    E    F    G    H    I    J    K    L    M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N   O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [   \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a   b    c    d    e    f    g    h    i    j    k    l    m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n   o    p    q    r    s    t    u    v    w    x    y    z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {   |    }    ~
        389, 280, 389, 584,
    ],
    average_char_width: 611,
};

// ────────────────────────────────────────────────────────────────────────────
// Embedded TrueType face
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font file: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a usable TrueType font: {0}")]
    Parse(String),
}

/// Glyph id and advance (1/1000 em) for one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMetric {
    pub glyph_id: u16,
    pub advance: u16,
}

/// Vertical metrics scaled to 1/1000 em, as the PDF font descriptor wants them.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorMetrics {
    pub ascent: i32,
    pub descent: i32,
    pub cap_height: i32,
    pub bbox: [i32; 4],
}

/// Number of code points addressable as CIDs (the BMP).
const BMP_SIZE: usize = 0x1_0000;

/// A TrueType font file held in memory for embedding.
///
/// The file is parsed once on load: the BMP cmap and the per-glyph advances are
/// kept so measuring text never touches the font tables again.
#[derive(Debug, Clone)]
pub struct EmbeddedFont {
    name: String,
    data: Arc<Vec<u8>>,
    descriptor: DescriptorMetrics,
    /// Glyph id per BMP code point; 0 is `.notdef`.
    glyph_ids: Arc<Vec<u16>>,
    /// Advance per glyph id, 1/1000 em.
    advances: Arc<Vec<u16>>,
}

impl EmbeddedFont {
    pub fn load(path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "EmbeddedFont".to_string());
        Self::from_bytes(&name, data)
    }

    pub fn from_bytes(name: &str, data: Vec<u8>) -> Result<Self, FontError> {
        let face =
            ttf_parser::Face::parse(&data, 0).map_err(|e| FontError::Parse(e.to_string()))?;
        let units_per_em = face.units_per_em().max(1) as i32;
        let scale = |v: i32| v * 1000 / units_per_em;
        let bbox = face.global_bounding_box();
        let descriptor = DescriptorMetrics {
            ascent: scale(face.ascender() as i32),
            descent: scale(face.descender() as i32),
            cap_height: scale(face.capital_height().unwrap_or(face.ascender()) as i32),
            bbox: [
                scale(bbox.x_min as i32),
                scale(bbox.y_min as i32),
                scale(bbox.x_max as i32),
                scale(bbox.y_max as i32),
            ],
        };

        let advances: Vec<u16> = (0..face.number_of_glyphs())
            .map(|id| {
                let advance = face.glyph_hor_advance(ttf_parser::GlyphId(id)).unwrap_or(0);
                scale(advance as i32).clamp(0, u16::MAX as i32) as u16
            })
            .collect();

        let mut glyph_ids = vec![0u16; BMP_SIZE];
        for (cid, slot) in glyph_ids.iter_mut().enumerate() {
            if let Some(glyph) = char::from_u32(cid as u32).and_then(|c| face.glyph_index(c)) {
                *slot = glyph.0;
            }
        }

        Ok(Self {
            name: pdf_safe_name(name),
            data: Arc::new(data),
            descriptor,
            glyph_ids: Arc::new(glyph_ids),
            advances: Arc::new(advances),
        })
    }

    /// PostScript-safe font name used as `BaseFont`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn descriptor(&self) -> DescriptorMetrics {
        self.descriptor
    }

    /// Glyph id and advance for one character. Characters outside the BMP are
    /// measured as U+FFFD; characters missing from the font map to glyph 0
    /// (`.notdef`).
    pub fn glyph(&self, c: char) -> GlyphMetric {
        let cid = u16::try_from(c as u32).unwrap_or(0xFFFD);
        let glyph_id = self.glyph_ids.get(cid as usize).copied().unwrap_or(0);
        GlyphMetric {
            glyph_id,
            advance: self.advances.get(glyph_id as usize).copied().unwrap_or(0),
        }
    }

    /// `CIDToGIDMap` stream body: two big-endian bytes per BMP code point, so a
    /// content stream can address glyphs by UTF-16 code unit.
    pub fn cid_to_gid_map(&self) -> Vec<u8> {
        self.glyph_ids
            .iter()
            .flat_map(|gid| gid.to_be_bytes())
            .collect()
    }
}

fn pdf_safe_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if cleaned.is_empty() {
        "EmbeddedFont".to_string()
    } else {
        cleaned
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Faces and font sets
// ────────────────────────────────────────────────────────────────────────────

/// The face a line is set in.
#[derive(Debug, Clone, Copy)]
pub enum Face<'a> {
    Builtin(BuiltinFont),
    Embedded(&'a EmbeddedFont),
}

impl Face<'_> {
    /// Rendered width of `s` in points at `size` pt.
    pub fn text_width(&self, s: &str, size: f32) -> f32 {
        let units = match self {
            Face::Builtin(font) => font.table().measure_units(s),
            Face::Embedded(font) => s.chars().map(|c| font.glyph(c).advance as u32).sum(),
        };
        units as f32 * size / 1000.0
    }
}

/// Fonts available to one export.
#[derive(Debug, Clone)]
pub struct FontSet {
    /// Language name used to label the meaning field, e.g. "Hindi".
    pub meaning_language: String,
    /// Face able to render the meaning language; `None` means fall back to
    /// Helvetica and print a disclaimer.
    pub meaning_font: Option<Arc<EmbeddedFont>>,
}

impl FontSet {
    pub fn builtin_only(meaning_language: impl Into<String>) -> Self {
        Self {
            meaning_language: meaning_language.into(),
            meaning_font: None,
        }
    }

    pub fn meaning_face(&self) -> Face<'_> {
        match &self.meaning_font {
            Some(font) => Face::Embedded(font),
            None => Face::Builtin(BuiltinFont::Helvetica),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

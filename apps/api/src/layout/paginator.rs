//! Document pagination. Places every line of an export before any PDF object
//! is built.
//!
//! Coordinates are top-down: `baseline` is the distance from the top edge of the
//! page, the way the cursor moves. `pdf.rs` flips them when drawing.
//!
//! # Page-break rule
//! A record's block (all wrapped lines plus one spacer line) is measured first.
//! If it would cross `PageConfig::bottom_limit` and the current page already
//! holds a record, a new page with a continuation title is started. A block
//! taller than a whole page is therefore drawn on the page where it starts and
//! overflows the bottom margin.

use crate::layout::font_metrics::{BuiltinFont, Face, FontSet, PageConfig};
use crate::layout::wrap::wrap_text;
use crate::layout::ExportError;
use crate::models::word::WordDetail;

// ────────────────────────────────────────────────────────────────────────────
// Layout output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStyle {
    Title,
    Disclaimer,
    Word,
    Body,
    Meaning,
}

impl LineStyle {
    /// Face and point size a line of this style is set in.
    pub fn face<'a>(self, fonts: &'a FontSet, config: &PageConfig) -> (Face<'a>, f32) {
        match self {
            LineStyle::Title => (Face::Builtin(BuiltinFont::Helvetica), config.title_size),
            LineStyle::Disclaimer => (
                Face::Builtin(BuiltinFont::Helvetica),
                config.disclaimer_size,
            ),
            LineStyle::Word => (Face::Builtin(BuiltinFont::HelveticaBold), config.body_size),
            LineStyle::Body => (Face::Builtin(BuiltinFont::Helvetica), config.body_size),
            LineStyle::Meaning => (fonts.meaning_face(), config.body_size),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub baseline: f32,
    pub style: LineStyle,
    /// Index of the record this line belongs to; `None` for titles and notes.
    pub record: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub lines: Vec<PlacedLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
    /// True when the meaning font was unavailable and Helvetica stood in.
    pub font_fallback: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Cursor state
// ────────────────────────────────────────────────────────────────────────────

/// Vertical cursor for one export pass. Only ever moves down, except when a new
/// page resets it to the top margin.
pub struct DocumentLayoutState<'a> {
    config: &'a PageConfig,
    fonts: &'a FontSet,
    cursor: f32,
    page_has_record: bool,
    pages: Vec<PageLayout>,
}

impl<'a> DocumentLayoutState<'a> {
    pub fn new(config: &'a PageConfig, fonts: &'a FontSet) -> Self {
        Self {
            config,
            fonts,
            cursor: config.margin,
            page_has_record: false,
            pages: vec![PageLayout::default()],
        }
    }

    fn wrap(&self, text: &str, style: LineStyle) -> Vec<String> {
        let (face, size) = style.face(self.fonts, self.config);
        wrap_text(text, face, size, self.config.content_width())
    }

    fn place(&mut self, text: String, x: f32, style: LineStyle, record: Option<usize>) {
        let line = PlacedLine {
            text,
            x,
            baseline: self.cursor,
            style,
            record,
        };
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(line);
        }
        self.cursor += self.config.line_height;
    }

    fn new_page(&mut self) {
        self.pages.push(PageLayout::default());
        self.cursor = self.config.margin;
        self.page_has_record = false;
    }

    /// Centered title, followed by one blank line.
    pub fn draw_title(&mut self, title: &str) {
        let (face, size) = LineStyle::Title.face(self.fonts, self.config);
        for line in self.wrap(title, LineStyle::Title) {
            let width = face.text_width(&line, size);
            let x = ((self.config.page_width - width) / 2.0).max(self.config.margin);
            self.place(line, x, LineStyle::Title, None);
        }
        self.cursor += self.config.line_height;
    }

    /// Note printed once when the meaning font is missing. Breaks onto a fresh
    /// untitled page line by line if it has to.
    pub fn draw_disclaimer(&mut self, language: &str) {
        let note = format!(
            "Note: a {language} font is not loaded. {language} characters may not display \
             correctly in this PDF."
        );
        for line in self.wrap(&note, LineStyle::Disclaimer) {
            if self.cursor + self.config.line_height > self.config.bottom_limit() {
                self.new_page();
            }
            self.place(line, self.config.margin, LineStyle::Disclaimer, None);
        }
        self.cursor += self.config.line_height;
    }

    /// Lays out one record, breaking the page first if the block would overflow.
    pub fn draw_record(&mut self, index: usize, record: &WordDetail, title: &str) {
        let block = self.record_block(record);
        let block_height = (block.len() + 1) as f32 * self.config.line_height;

        if self.cursor + block_height > self.config.bottom_limit() && self.page_has_record {
            self.new_page();
            self.draw_title(&format!("{title} (cont.)"));
        }

        for (text, style) in block {
            self.place(text, self.config.margin, style, Some(index));
        }
        self.cursor += self.config.line_height;
        self.page_has_record = true;
    }

    /// Wrapped lines of a record: word, sentence, pronunciation, meaning.
    fn record_block(&self, record: &WordDetail) -> Vec<(String, LineStyle)> {
        let fields = [
            (record.word.clone(), LineStyle::Word),
            (format!("Sentence: {}", record.sentence), LineStyle::Body),
            (
                format!("Pronunciation: {}", record.pronunciation),
                LineStyle::Body,
            ),
            (
                format!(
                    "{} Meaning: {}",
                    self.fonts.meaning_language, record.meaning
                ),
                LineStyle::Meaning,
            ),
        ];

        fields
            .into_iter()
            .flat_map(|(text, style)| {
                self.wrap(&text, style)
                    .into_iter()
                    .map(move |line| (line, style))
            })
            .collect()
    }

    pub fn finish(self) -> Vec<PageLayout> {
        self.pages
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Lays out `records` under `title`. Rejects an empty record list and page
/// geometry that leaves no room for text.
pub fn layout_document(
    records: &[WordDetail],
    title: &str,
    fonts: &FontSet,
    config: &PageConfig,
) -> Result<DocumentLayout, ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }
    if config.content_width() <= 0.0 || config.bottom_limit() <= config.margin {
        return Err(ExportError::Render(
            "page margins leave no room for text".to_string(),
        ));
    }

    let font_fallback = fonts.meaning_font.is_none();
    let mut state = DocumentLayoutState::new(config, fonts);

    state.draw_title(title);
    if font_fallback {
        state.draw_disclaimer(&fonts.meaning_language);
    }
    for (index, record) in records.iter().enumerate() {
        state.draw_record(index, record, title);
    }

    Ok(DocumentLayout {
        pages: state.finish(),
        font_fallback,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::default_page_config;

    fn record(word: &str) -> WordDetail {
        WordDetail {
            word: word.to_string(),
            sentence: format!("The meeting was {word}, and nobody could remember why it mattered."),
            meaning: "क्षणिक".to_string(),
            pronunciation: "i-FEM-er-uhl".to_string(),
        }
    }

    fn records(n: usize) -> Vec<WordDetail> {
        (0..n).map(|i| record(&format!("word{i}"))).collect()
    }

    fn fonts() -> FontSet {
        FontSet::builtin_only("Hindi")
    }

    fn first_lines(layout: &DocumentLayout) -> Vec<(usize, &PlacedLine)> {
        let mut seen = std::collections::HashSet::new();
        let mut firsts = Vec::new();
        for (page_index, page) in layout.pages.iter().enumerate() {
            for line in &page.lines {
                if let Some(r) = line.record {
                    if seen.insert(r) {
                        firsts.push((page_index, line));
                    }
                }
            }
        }
        firsts
    }

    #[test]
    fn test_empty_records_is_nothing_to_export() {
        let config = default_page_config();
        let result = layout_document(&[], "Today's Words", &fonts(), &config);
        assert!(matches!(result, Err(ExportError::Empty)));
    }

    #[test]
    fn test_degenerate_margins_are_a_render_error() {
        let mut config = default_page_config();
        config.margin = config.page_width;
        let result = layout_document(&records(1), "Today's Words", &fonts(), &config);
        assert!(matches!(result, Err(ExportError::Render(_))));
    }

    #[test]
    fn test_single_record_fits_one_page_with_centered_title() {
        let config = default_page_config();
        let layout = layout_document(&records(1), "Today's Words", &fonts(), &config).unwrap();

        assert_eq!(layout.pages.len(), 1);
        let title = &layout.pages[0].lines[0];
        assert_eq!(title.style, LineStyle::Title);
        assert_eq!(title.text, "Today's Words");
        assert!((title.baseline - config.margin).abs() < f32::EPSILON);
        assert!(title.x > config.margin, "short title should be centered");
    }

    #[test]
    fn test_record_fields_in_order_with_word_bold() {
        let config = default_page_config();
        let layout = layout_document(&records(1), "T", &fonts(), &config).unwrap();
        let lines: Vec<&PlacedLine> = layout.pages[0]
            .lines
            .iter()
            .filter(|l| l.record == Some(0))
            .collect();

        assert_eq!(lines[0].style, LineStyle::Word);
        assert_eq!(lines[0].text, "word0");
        assert!(lines[1].text.starts_with("Sentence: "));
        let pronunciation = lines.iter().position(|l| l.text.starts_with("Pronunciation: "));
        let meaning = lines.iter().position(|l| l.text.starts_with("Hindi Meaning: "));
        assert!(pronunciation < meaning);
        assert_eq!(lines.last().map(|l| l.style), Some(LineStyle::Meaning));
    }

    #[test]
    fn test_lines_advance_one_line_height_each() {
        let config = default_page_config();
        let layout = layout_document(&records(1), "T", &fonts(), &config).unwrap();
        let baselines: Vec<f32> = layout.pages[0]
            .lines
            .iter()
            .filter(|l| l.record.is_some())
            .map(|l| l.baseline)
            .collect();
        for pair in baselines.windows(2) {
            assert!((pair[1] - pair[0] - config.line_height).abs() < 0.001);
        }
    }

    #[test]
    fn test_fallback_disclaimer_appears_once() {
        let config = default_page_config();
        let layout = layout_document(&records(50), "T", &fonts(), &config).unwrap();

        assert!(layout.font_fallback);
        let disclaimer_pages: Vec<usize> = layout
            .pages
            .iter()
            .enumerate()
            .filter(|(_, p)| p.lines.iter().any(|l| l.style == LineStyle::Disclaimer))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(disclaimer_pages, vec![0]);
        assert!(layout.pages[0]
            .lines
            .iter()
            .any(|l| l.style == LineStyle::Disclaimer && l.text.contains("Hindi")));
    }

    #[test]
    fn test_fifty_records_paginate_with_continuation_titles() {
        let config = default_page_config();
        let layout = layout_document(&records(50), "Today's Words", &fonts(), &config).unwrap();

        assert!(layout.pages.len() > 1, "50 records must not fit on one page");
        for page in layout.pages.iter().skip(1) {
            let first = &page.lines[0];
            assert_eq!(first.style, LineStyle::Title);
            assert_eq!(first.text, "Today's Words (cont.)");
        }

        let firsts = first_lines(&layout);
        assert_eq!(firsts.len(), 50, "every record is drawn");
        for (_, line) in &firsts {
            assert!(
                line.baseline <= config.bottom_limit(),
                "record {:?} starts below the bottom margin",
                line.record
            );
        }
    }

    #[test]
    fn test_no_line_crosses_bottom_margin_for_normal_records() {
        let config = default_page_config();
        let layout = layout_document(&records(50), "T", &fonts(), &config).unwrap();
        for page in &layout.pages {
            for line in &page.lines {
                assert!(line.baseline <= config.bottom_limit());
            }
        }
    }

    #[test]
    fn test_records_keep_input_order_across_pages() {
        let config = default_page_config();
        let layout = layout_document(&records(30), "T", &fonts(), &config).unwrap();
        let order: Vec<usize> = first_lines(&layout)
            .into_iter()
            .filter_map(|(_, l)| l.record)
            .collect();
        assert_eq!(order, (0..30).collect::<Vec<_>>());
    }

    #[test]
    fn test_oversized_record_overflows_without_blank_page() {
        let config = default_page_config();
        let mut huge = record("enormous");
        huge.sentence = "word ".repeat(2_000);
        let layout = layout_document(&[huge], "T", &fonts(), &config).unwrap();

        assert_eq!(layout.pages.len(), 1, "a lone record never forces a break");
        let last = layout.pages[0].lines.last().unwrap();
        assert!(last.baseline > config.bottom_limit());
    }

    #[test]
    fn test_oversized_record_after_others_starts_fresh_page_once() {
        let config = default_page_config();
        let mut huge = record("enormous");
        huge.sentence = "word ".repeat(2_000);
        let layout =
            layout_document(&[record("small"), huge, record("after")], "T", &fonts(), &config)
                .unwrap();

        // small on page 1; huge breaks to page 2 and overflows; "after" breaks to page 3.
        assert_eq!(layout.pages.len(), 3);
        assert!(layout.pages.iter().all(|p| p.lines.iter().any(|l| l.record.is_some())));
    }
}

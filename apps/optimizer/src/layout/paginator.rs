//! Pagination/Rendering Engine.
//!
//! Turns a `ResumeDocument` plus its `PlacementModel` into a `PaintProgram`:
//! physical pages of positioned draw operations. Every vertical decision is a
//! function of the measurer and the fixed constants below, so the same input
//! always yields the same pages.
//!
//! # Breaking rules
//! - Overflow is `y + required > page_height - margin` (strict).
//! - Each atomic unit (paragraph, work item, bullet, dated pair) is checked
//!   before it is drawn and is never split between a check and a draw.
//! - A unit that does not fit below the cursor moves to a new page when it
//!   fits on an empty one. The page-1 header counts as content.
//! - A section title is checked together with the first unit of its body, and
//!   no break happens right after a title or on a page with nothing drawn.
//! - A unit that cannot be placed whole is drawn line by line, breaking
//!   between lines, so nothing is drawn below the bottom margin. A work item
//!   heading always keeps its first bullet line.

use tracing::debug;

use crate::layout::font_metrics::{FontFace, FontSpec, PageConfig};
use crate::layout::measure::TextMeasurer;
use crate::layout::paint::{export_file_name, DrawOp, PaintPage, PaintProgram};
use crate::layout::placement::PlacementModel;
use crate::models::section::{DatedPair, WorkItem};
use crate::models::{ResumeDocument, SectionContent, SectionKey};

const LINE_HEIGHT: f32 = 12.0;

const TITLE_TO_RULE: f32 = 10.0;
const RULE_TO_BODY: f32 = 15.0;
const TITLE_BLOCK: f32 = 35.0;
const SECTION_GAP: f32 = 15.0;
const RULE_WIDTH: f32 = 1.5;

const BULLET_INDENT: f32 = 10.0;
const BULLET_EXTRA: f32 = 4.0;
const ITEM_HEADING: f32 = 14.0;
const ITEM_SUBHEADING: f32 = 14.0;
const ITEM_GAP: f32 = 10.0;

const DATED_PAIR_REQUIRED: f32 = 38.0;
const DATED_PAIR_SUBTITLE: f32 = 14.0;
const DATED_PAIR_ADVANCE: f32 = 34.0;

const PICTURE_SIZE: f32 = 70.0;
const PICTURE_TEXT_OFFSET: f32 = 90.0;
const PICTURE_NAME_DY: f32 = 25.0;
const PICTURE_CONTACT_DY: f32 = 45.0;
const PICTURE_HEADER: f32 = 90.0;
const NAME_ADVANCE: f32 = 25.0;
const CONTACT_ADVANCE: f32 = 30.0;

const LIST_SEPARATOR: &str = "  •  ";
const CONTACT_SEPARATOR: &str = "  |  ";

const BODY: FontSpec = FontSpec::new(FontFace::Helvetica, 10.0);
const TITLE: FontSpec = FontSpec::new(FontFace::HelveticaBold, 14.0);
const HEADING: FontSpec = FontSpec::new(FontFace::HelveticaBold, 11.0);
const DATE: FontSpec = FontSpec::new(FontFace::Helvetica, 11.0);
const SUBHEADING: FontSpec = FontSpec::new(FontFace::HelveticaOblique, 10.0);
const NAME: FontSpec = FontSpec::new(FontFace::HelveticaBold, 22.0);
const NAME_WITH_PICTURE: FontSpec = FontSpec::new(FontFace::HelveticaBold, 24.0);
const CONTACT: FontSpec = FontSpec::new(FontFace::Helvetica, 10.0);

/// Lays out `document` in `placement` order onto physical pages.
pub fn paginate<M: TextMeasurer + ?Sized>(
    document: &ResumeDocument,
    placement: &PlacementModel,
    with_profile_image: bool,
    measurer: &M,
    config: &PageConfig,
) -> PaintProgram {
    let mut writer = PageWriter::new(measurer, config);
    writer.header(document, with_profile_image);

    let mut content_started = false;
    for (logical_page, keys) in placement.pages().iter().enumerate() {
        let sections: Vec<(SectionKey, SectionContent<'_>)> = keys
            .iter()
            .map(|key| (*key, document.section(*key)))
            .filter(|(_, content)| !content.is_empty())
            .collect();
        if sections.is_empty() {
            continue;
        }
        if content_started {
            writer.new_page();
        }
        content_started = true;

        debug!(logical_page, sections = sections.len(), "laying out logical page");
        for (key, content) in &sections {
            writer.section(*key, content);
        }
    }

    PaintProgram {
        page_width: config.page_width_pt,
        page_height: config.page_height_pt,
        pages: writer.pages,
        file_name: export_file_name(&document.contact_info.name),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page writer
// ────────────────────────────────────────────────────────────────────────────

struct PageWriter<'a, M: ?Sized> {
    measurer: &'a M,
    config: &'a PageConfig,
    pages: Vec<PaintPage>,
    y: f32,
    /// A section title or item heading was just drawn and no body line has
    /// followed yet.
    title_pending: bool,
}

impl<'a, M: TextMeasurer + ?Sized> PageWriter<'a, M> {
    fn new(measurer: &'a M, config: &'a PageConfig) -> Self {
        Self {
            measurer,
            config,
            pages: vec![PaintPage::default()],
            y: config.margin_pt,
            title_pending: false,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(PaintPage::default());
        self.y = self.config.margin_pt;
        self.title_pending = false;
    }

    fn fits(&self, required: f32) -> bool {
        self.y + required <= self.config.bottom()
    }

    fn page_blank(&self) -> bool {
        self.pages.last().map_or(true, |page| page.ops.is_empty())
    }

    /// Makes room for a block of `required` points, starting a new page when
    /// that helps. Returns false when the block cannot be drawn whole here.
    fn ensure_room(&mut self, required: f32) -> bool {
        if self.fits(required) {
            return true;
        }
        if self.title_pending || self.page_blank() || required > self.config.usable_height() {
            return false;
        }
        self.new_page();
        true
    }

    /// Breaks before a single line that would cross the bottom margin.
    fn ensure_line(&mut self, height: f32) {
        if !self.fits(height) && !self.page_blank() {
            self.new_page();
        }
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn text(&mut self, x: f32, y: f32, text: &str, font: FontSpec) {
        if text.is_empty() {
            return;
        }
        self.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            font,
        });
    }

    fn right_aligned(&mut self, y: f32, text: &str, font: FontSpec) {
        let x = self.config.page_width_pt - self.config.margin_pt - self.measurer.text_width(text, font);
        self.text(x, y, text, font);
    }

    fn centered(&mut self, y: f32, text: &str, font: FontSpec) {
        let x = (self.config.page_width_pt - self.measurer.text_width(text, font)) / 2.0;
        self.text(x, y, text, font);
    }

    /// Draws pre-wrapped lines as one unit needing `required` points.
    ///
    /// A unit that cannot be placed whole is checked line by line.
    fn lines(&mut self, lines: &[String], x: f32, font: FontSpec, required: f32) {
        if self.ensure_room(required) {
            for (i, line) in lines.iter().enumerate() {
                self.text(x, self.y + i as f32 * LINE_HEIGHT, line, font);
            }
            self.y += lines.len() as f32 * LINE_HEIGHT;
        } else {
            for line in lines {
                self.ensure_line(LINE_HEIGHT);
                self.text(x, self.y, line, font);
                self.y += LINE_HEIGHT;
            }
        }
        self.title_pending = false;
    }

    // ── header ──────────────────────────────────────────────────────────────

    fn header(&mut self, document: &ResumeDocument, with_profile_image: bool) {
        let name = document.contact_info.name.trim();
        let contact = document.contact_info.contact_line(CONTACT_SEPARATOR);
        let margin = self.config.margin_pt;

        if with_profile_image {
            self.push(DrawOp::Image {
                x: margin,
                y: self.y,
                width: PICTURE_SIZE,
                height: PICTURE_SIZE,
            });
            let x = margin + PICTURE_TEXT_OFFSET;
            self.text(x, self.y + PICTURE_NAME_DY, name, NAME_WITH_PICTURE);
            self.text(x, self.y + PICTURE_CONTACT_DY, &contact, CONTACT);
            self.y += PICTURE_HEADER;
        } else {
            self.centered(self.y, name, NAME);
            self.y += NAME_ADVANCE;
            self.centered(self.y, &contact, CONTACT);
            self.y += CONTACT_ADVANCE;
        }
    }

    // ── sections ────────────────────────────────────────────────────────────

    fn section(&mut self, key: SectionKey, content: &SectionContent<'_>) {
        let title = TITLE_TO_RULE + RULE_TO_BODY;
        let (whole, start) = self.first_unit_height(content);
        // A first unit that cannot share a fresh page with the title spills
        // anyway; only its opening lines have to stay with the title.
        let keep = if title + whole <= self.config.usable_height() { whole } else { start };
        self.ensure_room(TITLE_BLOCK.max(title + keep));

        let margin = self.config.margin_pt;
        self.text(margin, self.y, key.title(), TITLE);
        self.y += TITLE_TO_RULE;
        self.push(DrawOp::Rule {
            x1: margin,
            y1: self.y,
            x2: self.config.page_width_pt - margin,
            y2: self.y,
            width: RULE_WIDTH,
        });
        self.y += RULE_TO_BODY;
        self.title_pending = true;

        match content {
            SectionContent::Text(text) => self.paragraph(text),
            SectionContent::List(items) => self.paragraph(&items.join(LIST_SEPARATOR)),
            SectionContent::WorkItems(items) => {
                for item in items {
                    self.work_item(item);
                }
            }
            SectionContent::DatedPairs(pairs) => {
                for pair in pairs {
                    self.dated_pair(pair);
                }
            }
        }
        self.y += SECTION_GAP;
    }

    /// Height of the first body unit, whole and up to its first line.
    fn first_unit_height(&self, content: &SectionContent<'_>) -> (f32, f32) {
        match content {
            SectionContent::Text(text) => (self.paragraph_height(text), LINE_HEIGHT),
            SectionContent::List(items) => {
                (self.paragraph_height(&items.join(LIST_SEPARATOR)), LINE_HEIGHT)
            }
            SectionContent::WorkItems(items) => items.first().map_or((0.0, 0.0), |item| {
                (self.work_item_height(item), self.work_item_start_height(item))
            }),
            SectionContent::DatedPairs(_) => (DATED_PAIR_REQUIRED, DATED_PAIR_REQUIRED),
        }
    }

    fn paragraph_height(&self, text: &str) -> f32 {
        self.measurer
            .wrapped_height(text, BODY, self.config.content_width(), LINE_HEIGHT)
    }

    fn paragraph_lines(&self, text: &str) -> Vec<String> {
        self.measurer
            .split_to_size(text, BODY, self.config.content_width())
    }

    fn paragraph(&mut self, text: &str) {
        let lines = self.paragraph_lines(text);
        let required = lines.len() as f32 * LINE_HEIGHT;
        self.lines(&lines, self.config.margin_pt, BODY, required);
    }

    fn bullet_lines(&self, bullet: &str) -> Vec<String> {
        self.measurer.split_to_size(
            &format!("• {bullet}"),
            BODY,
            self.config.content_width() - BULLET_INDENT,
        )
    }

    fn bullet_height(&self, bullet: &str) -> f32 {
        self.measurer.wrapped_height(
            &format!("• {bullet}"),
            BODY,
            self.config.content_width() - BULLET_INDENT,
            LINE_HEIGHT,
        ) + BULLET_EXTRA
    }

    fn item_heading_height(item: &WorkItem<'_>) -> f32 {
        let subheading = if item.subheading.is_some() { ITEM_SUBHEADING } else { 0.0 };
        ITEM_HEADING + subheading
    }

    fn work_item_height(&self, item: &WorkItem<'_>) -> f32 {
        let bullets: f32 = item.bullets.iter().map(|b| self.bullet_height(b)).sum();
        Self::item_heading_height(item) + bullets + ITEM_GAP
    }

    /// Heading plus the first bullet line: the least a spilled item keeps together.
    fn work_item_start_height(&self, item: &WorkItem<'_>) -> f32 {
        let first_line = if item.bullets.is_empty() { 0.0 } else { LINE_HEIGHT };
        Self::item_heading_height(item) + first_line
    }

    fn work_item(&mut self, item: &WorkItem<'_>) {
        if !self.ensure_room(self.work_item_height(item)) {
            self.ensure_line(self.work_item_start_height(item));
        }

        let margin = self.config.margin_pt;
        self.text(margin, self.y, item.heading, HEADING);
        if let Some(dates) = item.dates {
            self.right_aligned(self.y, dates, DATE);
        }
        self.y += ITEM_HEADING;

        if let Some(subheading) = item.subheading {
            self.text(margin, self.y, subheading, SUBHEADING);
            self.y += ITEM_SUBHEADING;
        }
        self.title_pending = !item.bullets.is_empty();

        for bullet in item.bullets {
            let lines = self.bullet_lines(bullet);
            let required = lines.len() as f32 * LINE_HEIGHT + BULLET_EXTRA;
            self.lines(&lines, margin + BULLET_INDENT, BODY, required);
            self.y += BULLET_EXTRA - 2.0;
        }
        self.y += ITEM_GAP;
        self.title_pending = false;
    }

    fn dated_pair(&mut self, pair: &DatedPair<'_>) {
        self.ensure_room(DATED_PAIR_REQUIRED);

        let margin = self.config.margin_pt;
        self.text(margin, self.y, pair.title, HEADING);
        self.right_aligned(self.y, pair.date, DATE);
        self.text(margin, self.y + DATED_PAIR_SUBTITLE, pair.subtitle, SUBHEADING);
        self.y += DATED_PAIR_ADVANCE;
        self.title_pending = false;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

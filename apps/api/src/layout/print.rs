//! Print Renderer: lays the shared [`ResumeLayout`] out on fixed-size A4
//! pages and returns a document tree the PDF engine can draw verbatim.
//!
//! Coordinates are points with a top-left origin. Every section is broken into
//! blocks (title, entry row, text line, badge row) that never split; a block
//! that does not fit on the current page starts a new one, and a section title
//! always travels with its first block.

use serde::Serialize;
use tracing::debug;

use crate::layout::contract::{build_layout, EntryView, ResumeLayout, SectionKind, SectionView};
use crate::layout::font_metrics::{get_metrics, FontWeight};
use crate::models::resume::ResumeRecord;
use crate::templates::{palette, profile, Color, StyleProfile, TemplateId};

pub const A4_WIDTH_PT: f32 = 595.28;
pub const A4_HEIGHT_PT: f32 = 841.89;

/// Horizontal and vertical padding of both the header band and the content area.
const PADDING: f32 = 30.0;
/// Page padding kept free at the bottom of every page.
const PAGE_BOTTOM_PADDING: f32 = 20.0;
const SECTION_GAP: f32 = 20.0;
const LINE_HEIGHT: f32 = 1.2;
/// Baseline offset from the top of a line box, as a fraction of font size.
const ASCENT: f32 = 0.8;

const NAME_SIZE: f32 = 24.0;
const CONTACT_SIZE: f32 = 10.0;
const SECTION_TITLE_SIZE: f32 = 14.0;
const RULE_WIDTH: f32 = 2.0;
const POSITION_SIZE: f32 = 12.0;
const COMPANY_SIZE: f32 = 11.0;
const DEGREE_SIZE: f32 = 11.0;
const SCHOOL_SIZE: f32 = 10.0;
const BADGE_SIZE: f32 = 9.0;
const BADGE_PADDING: f32 = 4.0;
/// Gap between an entry's heading column and its pill.
const ROW_GAP: f32 = 12.0;
const DESCRIPTION_SIZE: f32 = 9.0;
const DESCRIPTION_LINE_HEIGHT: f32 = 1.4;
const SUMMARY_SIZE: f32 = 10.0;
const SUMMARY_LINE_HEIGHT: f32 = 1.5;
const SKILL_PADDING_X: f32 = 8.0;
const SKILL_PADDING_Y: f32 = 4.0;
const SKILL_GAP: f32 = 6.0;

// ────────────────────────────────────────────────────────────────────────────
// Document tree
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
    pub padding_pt: f32,
    pub bottom_padding_pt: f32,
}

impl PageGeometry {
    pub fn a4() -> Self {
        Self {
            width_pt: A4_WIDTH_PT,
            height_pt: A4_HEIGHT_PT,
            padding_pt: PADDING,
            bottom_padding_pt: PAGE_BOTTOM_PADDING,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width_pt - 2.0 * self.padding_pt
    }

    /// Lowest y a block may reach.
    fn content_bottom(&self) -> f32 {
        self.height_pt - self.padding_pt - self.bottom_padding_pt
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum PrintNode {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Color,
    },
    /// `y` is the text baseline.
    Text {
        x: f32,
        y: f32,
        text: String,
        size_pt: f32,
        weight: FontWeight,
        color: Color,
    },
}

impl PrintNode {
    fn shifted(mut self, dy: f32) -> Self {
        match &mut self {
            PrintNode::Rect { y, .. } | PrintNode::Text { y, .. } => *y += dy,
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "role", content = "kind", rename_all = "snake_case")]
pub enum SectionRole {
    Header,
    Content(SectionKind),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintSection {
    pub role: SectionRole,
    pub nodes: Vec<PrintNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintPage {
    pub sections: Vec<PrintSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintDocument {
    pub title: String,
    pub template: TemplateId,
    pub page: PageGeometry,
    pub pages: Vec<PrintPage>,
}

impl PrintDocument {
    /// Content sections in reading order; a section continued on the next page
    /// is reported once.
    pub fn section_kinds(&self) -> Vec<SectionKind> {
        let mut kinds: Vec<SectionKind> = Vec::new();
        for section in self.pages.iter().flat_map(|p| &p.sections) {
            if let SectionRole::Content(kind) = section.role {
                if kinds.last() != Some(&kind) {
                    kinds.push(kind);
                }
            }
        }
        kinds
    }

    #[cfg(test)]
    pub fn nodes(&self) -> impl Iterator<Item = &PrintNode> {
        self.pages
            .iter()
            .flat_map(|p| &p.sections)
            .flat_map(|s| &s.nodes)
    }

    /// Every text run in drawing order.
    #[cfg(test)]
    pub fn texts(&self) -> Vec<&str> {
        self.nodes()
            .filter_map(|n| match n {
                PrintNode::Text { text, .. } => Some(text.as_str()),
                PrintNode::Rect { .. } => None,
            })
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

pub fn render_print(record: &ResumeRecord, template: TemplateId) -> PrintDocument {
    render_layout(&build_layout(record), template)
}

pub fn render_layout(layout: &ResumeLayout, template: TemplateId) -> PrintDocument {
    let geometry = PageGeometry::a4();
    let style = profile(template);

    let header = header_block(layout, &geometry, &style);
    let mut composer = Composer::new(geometry, header);

    for section in &layout.sections {
        let kind = section.kind();
        let blocks = section_blocks(section, &geometry, &style);
        let title = title_block(kind, &geometry, &style);
        composer.place_section(kind, title, blocks);
    }

    let pages = composer.finish();
    debug!(
        %template,
        sections = ?layout.section_kinds(),
        pages = pages.len(),
        "Print layout composed"
    );

    PrintDocument {
        title: layout.header.name.clone(),
        template,
        page: geometry,
        pages,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Blocks
// ────────────────────────────────────────────────────────────────────────────

/// An unsplittable run of nodes positioned relative to its own top edge.
#[derive(Debug, Clone, Default)]
struct Block {
    height: f32,
    spacing_after: f32,
    nodes: Vec<PrintNode>,
}

impl Block {
    fn text(&mut self, x: f32, top: f32, text: &str, size: f32, weight: FontWeight, color: Color) {
        self.nodes.push(PrintNode::Text {
            x,
            y: top + size * ASCENT,
            text: text.to_string(),
            size_pt: size,
            weight,
            color,
        });
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Color) {
        self.nodes.push(PrintNode::Rect {
            x,
            y,
            width,
            height,
            fill,
        });
    }

    /// Wrapped lines stacked from `top`; returns the height consumed.
    #[allow(clippy::too_many_arguments)]
    fn paragraph(
        &mut self,
        x: f32,
        top: f32,
        width: f32,
        text: &str,
        size: f32,
        line_height: f32,
        weight: FontWeight,
        color: Color,
    ) -> f32 {
        let advance = size * line_height;
        let lines = get_metrics(weight).wrap(text, size, width);
        for (i, line) in lines.iter().enumerate() {
            self.text(x, top + i as f32 * advance, line, size, weight, color);
        }
        lines.len() as f32 * advance
    }
}

fn header_block(layout: &ResumeLayout, geometry: &PageGeometry, style: &StyleProfile) -> Block {
    let mut block = Block::default();
    let x = geometry.padding_pt;
    let width = geometry.content_width();

    // Background goes first so text paints over it; its height is patched below.
    block.rect(0.0, 0.0, geometry.width_pt, 0.0, style.header_background);

    let mut y = PADDING;
    y += block.paragraph(
        x,
        y,
        width,
        &layout.header.name,
        NAME_SIZE,
        LINE_HEIGHT,
        FontWeight::Bold,
        palette::WHITE,
    );
    y += 8.0;
    for line in &layout.header.contact_lines {
        y += block.paragraph(
            x,
            y,
            width,
            line,
            CONTACT_SIZE,
            LINE_HEIGHT,
            FontWeight::Regular,
            palette::WHITE,
        );
        y += 2.0;
    }
    y += PADDING;

    if let Some(PrintNode::Rect { height, .. }) = block.nodes.first_mut() {
        *height = y;
    }
    block.height = y;
    block.spacing_after = PADDING;
    block
}

fn title_block(kind: SectionKind, geometry: &PageGeometry, style: &StyleProfile) -> Block {
    let mut block = Block::default();
    let line = SECTION_TITLE_SIZE * LINE_HEIGHT;
    block.text(
        geometry.padding_pt,
        0.0,
        kind.title(),
        SECTION_TITLE_SIZE,
        FontWeight::Bold,
        palette::INK,
    );
    block.rect(
        geometry.padding_pt,
        line + 4.0,
        geometry.content_width(),
        RULE_WIDTH,
        style.accent_color,
    );
    block.height = line + 4.0 + RULE_WIDTH;
    block.spacing_after = 8.0;
    block
}

fn section_blocks(section: &SectionView, geometry: &PageGeometry, style: &StyleProfile) -> Vec<Block> {
    match section {
        SectionView::Summary(text) => text_line_blocks(
            text,
            geometry,
            SUMMARY_SIZE,
            SUMMARY_LINE_HEIGHT,
            palette::BODY,
        ),
        SectionView::Experience(entries) => entries
            .iter()
            .flat_map(|entry| experience_blocks(entry, geometry, style))
            .collect(),
        SectionView::Education(entries) => entries
            .iter()
            .map(|entry| education_block(entry, geometry, style))
            .collect(),
        SectionView::Skills(skills) => skill_rows(skills, geometry, style),
    }
}

/// One block per wrapped line so long paragraphs can flow across pages.
fn text_line_blocks(
    text: &str,
    geometry: &PageGeometry,
    size: f32,
    line_height: f32,
    color: Color,
) -> Vec<Block> {
    let advance = size * line_height;
    get_metrics(FontWeight::Regular)
        .wrap(text, size, geometry.content_width())
        .into_iter()
        .map(|line| {
            let mut block = Block {
                height: advance,
                ..Default::default()
            };
            block.text(
                geometry.padding_pt,
                0.0,
                &line,
                size,
                FontWeight::Regular,
                color,
            );
            block
        })
        .collect()
}

/// Widest pill an entry row allows; the heading keeps the other half.
fn max_badge_width(geometry: &PageGeometry) -> f32 {
    geometry.content_width() / 2.0 - ROW_GAP
}

/// Pill text cut to fit `max_width` once padding is added.
fn pill_text(text: &str, weight: FontWeight, size: f32, padding: f32, max_width: f32) -> (String, f32) {
    let metrics = get_metrics(weight);
    let text = metrics.truncate(text, size, max_width - 2.0 * padding);
    let width = (metrics.width_pt(&text, size) + 2.0 * padding).min(max_width);
    (text, width)
}

/// The grey pill holding a duration or year, right-aligned at `top`.
/// Returns `(pill_width, pill_height)`.
fn badge(block: &mut Block, geometry: &PageGeometry, top: f32, text: &str) -> (f32, f32) {
    let (text, width) = pill_text(
        text,
        FontWeight::Regular,
        BADGE_SIZE,
        BADGE_PADDING,
        max_badge_width(geometry),
    );
    let height = BADGE_SIZE * LINE_HEIGHT + 2.0 * BADGE_PADDING;
    let x = geometry.padding_pt + geometry.content_width() - width;
    block.rect(x, top, width, height, palette::PILL);
    block.text(
        x + BADGE_PADDING,
        top + BADGE_PADDING,
        &text,
        BADGE_SIZE,
        FontWeight::Regular,
        palette::MUTED,
    );
    (width, height)
}

fn experience_blocks(entry: &EntryView, geometry: &PageGeometry, style: &StyleProfile) -> Vec<Block> {
    let mut row = Block::default();
    let (pill_w, pill_h) = badge(&mut row, geometry, 0.0, &entry.badge);
    let left_width = geometry.content_width() - pill_w - ROW_GAP;

    let mut y = row.paragraph(
        geometry.padding_pt,
        0.0,
        left_width,
        &entry.heading,
        POSITION_SIZE,
        LINE_HEIGHT,
        FontWeight::Bold,
        palette::INK,
    );
    y += row.paragraph(
        geometry.padding_pt,
        y,
        left_width,
        &entry.subheading,
        COMPANY_SIZE,
        LINE_HEIGHT,
        FontWeight::Bold,
        style.accent_color,
    );
    y += 2.0;
    row.height = y.max(pill_h);
    row.spacing_after = 4.0;

    let mut blocks = vec![row];
    if let Some(detail) = &entry.detail {
        blocks.extend(text_line_blocks(
            detail,
            geometry,
            DESCRIPTION_SIZE,
            DESCRIPTION_LINE_HEIGHT,
            palette::BODY,
        ));
    }
    if let Some(last) = blocks.last_mut() {
        last.spacing_after = 12.0;
    }
    blocks
}

fn education_block(entry: &EntryView, geometry: &PageGeometry, style: &StyleProfile) -> Block {
    let mut left = Block::default();
    let (_, pill_w) = pill_text(
        &entry.badge,
        FontWeight::Regular,
        BADGE_SIZE,
        BADGE_PADDING,
        max_badge_width(geometry),
    );
    let pill_h = BADGE_SIZE * LINE_HEIGHT + 2.0 * BADGE_PADDING;
    let left_width = geometry.content_width() - pill_w - ROW_GAP;

    let mut y = left.paragraph(
        geometry.padding_pt,
        0.0,
        left_width,
        &entry.heading,
        DEGREE_SIZE,
        LINE_HEIGHT,
        FontWeight::Bold,
        palette::INK,
    );
    y += 2.0;
    y += left.paragraph(
        geometry.padding_pt,
        y,
        left_width,
        &entry.subheading,
        SCHOOL_SIZE,
        LINE_HEIGHT,
        FontWeight::Bold,
        style.accent_color,
    );

    // Row items are vertically centred against each other.
    let height = y.max(pill_h);
    let mut block = Block {
        height,
        spacing_after: 8.0,
        nodes: Vec::new(),
    };
    badge(&mut block, geometry, (height - pill_h) / 2.0, &entry.badge);
    let left_offset = (height - y) / 2.0;
    block
        .nodes
        .extend(left.nodes.into_iter().map(|n| n.shifted(left_offset)));
    block
}

/// Skill badges flow left to right and wrap; each visual row is one block.
fn skill_rows(skills: &[String], geometry: &PageGeometry, style: &StyleProfile) -> Vec<Block> {
    let height = BADGE_SIZE * LINE_HEIGHT + 2.0 * SKILL_PADDING_Y;
    let left = geometry.padding_pt;
    let right = left + geometry.content_width();

    let mut rows = Vec::new();
    let mut row = Block {
        height,
        spacing_after: SKILL_GAP,
        nodes: Vec::new(),
    };
    let mut x = left;

    for skill in skills {
        let (skill, width) = pill_text(
            skill,
            FontWeight::Bold,
            BADGE_SIZE,
            SKILL_PADDING_X,
            geometry.content_width(),
        );
        if x > left && x + width > right {
            rows.push(std::mem::replace(
                &mut row,
                Block {
                    height,
                    spacing_after: SKILL_GAP,
                    nodes: Vec::new(),
                },
            ));
            x = left;
        }
        row.rect(x, 0.0, width, height, style.skill_badge_background);
        row.text(
            x + SKILL_PADDING_X,
            SKILL_PADDING_Y,
            &skill,
            BADGE_SIZE,
            FontWeight::Bold,
            palette::WHITE,
        );
        x += width + SKILL_GAP;
    }
    if !row.nodes.is_empty() {
        rows.push(row);
    }
    if let Some(last) = rows.last_mut() {
        last.spacing_after = 0.0;
    }
    rows
}

// ────────────────────────────────────────────────────────────────────────────
// Pagination
// ────────────────────────────────────────────────────────────────────────────

struct Composer {
    geometry: PageGeometry,
    pages: Vec<PrintPage>,
    /// Top of the next block on the current page.
    y: f32,
}

impl Composer {
    fn new(geometry: PageGeometry, header: Block) -> Self {
        let y = header.height + header.spacing_after;
        Self {
            geometry,
            pages: vec![PrintPage {
                sections: vec![PrintSection {
                    role: SectionRole::Header,
                    nodes: header.nodes,
                }],
            }],
            y,
        }
    }

    fn page_top(&self) -> f32 {
        self.geometry.padding_pt
    }

    fn fits(&self, height: f32) -> bool {
        self.y + height <= self.geometry.content_bottom()
    }

    fn new_page(&mut self, kind: SectionKind) {
        self.pages.push(PrintPage {
            sections: vec![PrintSection {
                role: SectionRole::Content(kind),
                nodes: Vec::new(),
            }],
        });
        self.y = self.page_top();
    }

    fn push(&mut self, block: Block) {
        let dy = self.y;
        if let Some(section) = self.pages.last_mut().and_then(|p| p.sections.last_mut()) {
            section
                .nodes
                .extend(block.nodes.into_iter().map(|n| n.shifted(dy)));
        }
        self.y += block.height + block.spacing_after;
    }

    fn place_section(&mut self, kind: SectionKind, title: Block, blocks: Vec<Block>) {
        let lead = title.height + title.spacing_after + blocks.first().map_or(0.0, |b| b.height);
        if self.fits(lead) {
            if let Some(page) = self.pages.last_mut() {
                page.sections.push(PrintSection {
                    role: SectionRole::Content(kind),
                    nodes: Vec::new(),
                });
            }
        } else {
            self.new_page(kind);
        }
        self.push(title);

        for block in blocks {
            // An oversized block at the top of a fresh page is placed anyway.
            if !self.fits(block.height) && self.y > self.page_top() {
                self.new_page(kind);
            }
            self.push(block);
        }
        self.y += SECTION_GAP;
    }

    fn finish(self) -> Vec<PrintPage> {
        self.pages
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

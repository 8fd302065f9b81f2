//! Places report blocks on A4 pages.
//!
//! Coordinates are millimetres from the top-left corner of the page. A block
//! that would cross the bottom margin moves to a fresh page.

use charts::RasterImage;
use kpi_engine::KpiCard;

use crate::document::{Block, Report, Table};

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN_X: f32 = 14.0;
pub const MARGIN_TOP: f32 = 15.0;
pub const MARGIN_BOTTOM: f32 = 15.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN_X;

pub const CARD_COLUMNS: usize = 3;
pub const CARD_GAP: f32 = 5.0;
pub const CARD_HEIGHT: f32 = 26.0;
pub const ROW_HEIGHT: f32 = 7.0;
const LINE_HEIGHT: f32 = 5.0;
const MAX_CHART_HEIGHT: f32 = 110.0;

const TEXT: (u8, u8, u8) = (17, 24, 39);
const MUTED: (u8, u8, u8) = (75, 85, 99);
const RULE: (u8, u8, u8) = (209, 213, 219);
const CARD_FILL: (u8, u8, u8) = (249, 250, 251);
const HEADER_FILL: (u8, u8, u8) = (243, 244, 246);

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `y` is the text baseline.
    Text {
        x: f32,
        y: f32,
        size: f32,
        text: String,
        color: (u8, u8, u8),
        bold: bool,
    },
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        fill: Option<(u8, u8, u8)>,
        stroke: Option<(u8, u8, u8)>,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: (u8, u8, u8),
    },
    Image {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        image: RasterImage,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

struct Paginator {
    pages: Vec<Page>,
    cursor_y: f32,
}

impl Paginator {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            cursor_y: MARGIN_TOP,
        }
    }

    fn fits(&self, height: f32) -> bool {
        self.cursor_y + height <= PAGE_HEIGHT - MARGIN_BOTTOM
    }

    fn at_top(&self) -> bool {
        self.cursor_y <= MARGIN_TOP
    }

    /// Breaks the page unless `height` still fits. Returns true on a break.
    fn ensure(&mut self, height: f32) -> bool {
        if self.fits(height) || self.at_top() {
            return false;
        }
        self.new_page();
        true
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor_y = MARGIN_TOP;
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn text(&mut self, x: f32, dy: f32, size: f32, text: String, color: (u8, u8, u8), bold: bool) {
        let y = self.cursor_y + dy;
        self.push(DrawOp::Text {
            x,
            y,
            size,
            text,
            color,
            bold,
        });
    }

    fn rule(&mut self, dy: f32) {
        let y = self.cursor_y + dy;
        self.push(DrawOp::Line {
            x1: MARGIN_X,
            y1: y,
            x2: PAGE_WIDTH - MARGIN_X,
            y2: y,
            color: RULE,
        });
    }

    fn advance(&mut self, height: f32) {
        self.cursor_y += height;
    }
}

/// Greedy word wrap at `max_chars`; overlong words get a line of their own.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Shortens `text` to `max_chars`, marking the cut with `...`.
pub fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Approximate Helvetica capacity of a `width` mm box at `size` pt.
fn chars_for(width: f32, size: f32) -> usize {
    (width / (size * 0.19)).floor().max(1.0) as usize
}

pub fn card_width() -> f32 {
    (CONTENT_WIDTH - CARD_GAP * (CARD_COLUMNS as f32 - 1.0)) / CARD_COLUMNS as f32
}

fn layout_card(p: &mut Paginator, x: f32, card: &KpiCard) {
    let w = card_width();
    let y = p.cursor_y;
    p.push(DrawOp::Rect {
        x,
        y,
        w,
        h: CARD_HEIGHT,
        fill: Some(CARD_FILL),
        stroke: Some(RULE),
    });
    let inner = x + 3.0;
    p.text(inner, 6.0, 9.0, clip(&card.title, chars_for(w - 6.0, 9.0)), MUTED, true);
    p.text(inner, 14.0, 15.0, clip(&card.value, chars_for(w - 6.0, 15.0)), card.tone.rgb(), true);
    for (i, line) in wrap(&card.description, chars_for(w - 6.0, 7.0))
        .into_iter()
        .take(2)
        .enumerate()
    {
        p.text(inner, 19.5 + i as f32 * 3.5, 7.0, line, MUTED, false);
    }
}

fn layout_cards(p: &mut Paginator, cards: &[KpiCard]) {
    for row in cards.chunks(CARD_COLUMNS) {
        p.ensure(CARD_HEIGHT + CARD_GAP);
        for (i, card) in row.iter().enumerate() {
            let x = MARGIN_X + i as f32 * (card_width() + CARD_GAP);
            layout_card(p, x, card);
        }
        p.advance(CARD_HEIGHT + CARD_GAP);
    }
}

fn layout_chart(p: &mut Paginator, image: &RasterImage) {
    if image.width == 0 || image.height == 0 {
        return;
    }
    let aspect = image.height as f32 / image.width as f32;
    let mut w = CONTENT_WIDTH;
    let mut h = w * aspect;
    if h > MAX_CHART_HEIGHT {
        h = MAX_CHART_HEIGHT;
        w = h / aspect;
    }
    p.ensure(h + 6.0);
    let x = MARGIN_X + (CONTENT_WIDTH - w) / 2.0;
    let y = p.cursor_y;
    p.push(DrawOp::Image {
        x,
        y,
        w,
        h,
        image: image.clone(),
    });
    p.advance(h + 6.0);
}

fn table_header(p: &mut Paginator, table: &Table, col_w: f32) {
    p.push(DrawOp::Rect {
        x: MARGIN_X,
        y: p.cursor_y,
        w: CONTENT_WIDTH,
        h: ROW_HEIGHT,
        fill: Some(HEADER_FILL),
        stroke: Some(RULE),
    });
    for (i, header) in table.headers.iter().enumerate() {
        let x = MARGIN_X + 2.0 + i as f32 * col_w;
        p.text(x, 5.0, 9.0, clip(header, chars_for(col_w - 4.0, 9.0)), TEXT, true);
    }
    p.advance(ROW_HEIGHT);
}

fn layout_table(p: &mut Paginator, table: &Table) {
    let cols = table
        .headers
        .len()
        .max(table.rows.iter().map(Vec::len).max().unwrap_or(0))
        .max(1);
    let col_w = CONTENT_WIDTH / cols as f32;

    p.ensure(ROW_HEIGHT * 2.0);
    table_header(p, table, col_w);
    for row in &table.rows {
        if p.ensure(ROW_HEIGHT) {
            table_header(p, table, col_w);
        }
        for (i, cell) in row.iter().enumerate() {
            let x = MARGIN_X + 2.0 + i as f32 * col_w;
            p.text(x, 5.0, 9.0, clip(cell, chars_for(col_w - 4.0, 9.0)), TEXT, false);
        }
        p.rule(ROW_HEIGHT);
        p.advance(ROW_HEIGHT);
    }
    p.advance(4.0);
}

fn number_pages(pages: &mut [Page]) {
    let total = pages.len();
    for (i, page) in pages.iter_mut().enumerate() {
        page.ops.push(DrawOp::Text {
            x: PAGE_WIDTH / 2.0 - 8.0,
            y: PAGE_HEIGHT - 7.0,
            size: 8.0,
            text: format!("Page {} of {}", i + 1, total),
            color: MUTED,
            bold: false,
        });
    }
}

/// Lays out every block of `report`, breaking pages as needed.
pub fn layout(report: &Report) -> Vec<Page> {
    let mut p = Paginator::new();
    for block in &report.blocks {
        match block {
            Block::Header { title, subtitle } => {
                p.ensure(22.0);
                p.text(MARGIN_X, 7.0, 18.0, title.clone(), TEXT, true);
                p.text(MARGIN_X, 13.0, 10.0, subtitle.clone(), MUTED, false);
                p.rule(16.0);
                p.advance(22.0);
            }
            Block::Section(title) => {
                p.ensure(12.0);
                p.text(MARGIN_X, 6.0, 13.0, title.clone(), TEXT, true);
                p.rule(8.0);
                p.advance(12.0);
            }
            Block::Paragraph(text) => {
                for line in wrap(text, chars_for(CONTENT_WIDTH, 10.0)) {
                    p.ensure(LINE_HEIGHT);
                    p.text(MARGIN_X, 4.0, 10.0, line, TEXT, false);
                    p.advance(LINE_HEIGHT);
                }
                p.advance(2.0);
            }
            Block::Cards(cards) => layout_cards(&mut p, cards),
            Block::Chart { image, .. } => layout_chart(&mut p, image),
            Block::Table(table) => layout_table(&mut p, table),
            Block::PageBreak => {
                if !p.at_top() {
                    p.new_page();
                }
            }
        }
    }
    let mut pages = p.pages;
    number_pages(&mut pages);
    pages
}

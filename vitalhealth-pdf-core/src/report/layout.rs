//! Page geometry and the layout canvas.
//!
//! The canvas tracks drawing state the way a PDF content stream does (fill
//! colour, font) but records positioned elements instead of operators, so a
//! finished [`ReportLayout`] can be inspected before it is painted.

use crate::graphics::Color;
use crate::text::{measure_text, wrap_lines, Font};

/// Fixed report geometry in points, origin at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    /// Left margin of paragraphs; the right margin is the same
    pub margin: f64,
    /// Left edge of bullet lines
    pub bullet_x: f64,
    pub logo_width: f64,
    pub logo_height: f64,
    /// Distance from the top edge to the logo's bottom edge
    pub logo_top_offset: f64,
    pub title_top_offset: f64,
    pub subtitle_top_offset: f64,
    pub identity_top_offset: f64,
    /// Distance from the top edge to the first section title
    pub body_top_offset: f64,
    /// Distance from the top edge to the cursor after a page break
    pub continuation_top_offset: f64,
    pub title_size: f64,
    pub section_title_size: f64,
    pub body_size: f64,
    pub footer_size: f64,
    /// Cursor drop after a section title
    pub section_title_advance: f64,
    pub leading: f64,
    /// Extra space after a section body
    pub paragraph_gap: f64,
    /// Extra space between habits and supplements
    pub plan_gap: f64,
    /// A cursor below this value before the plan starts a new page
    pub overflow_threshold: f64,
    pub footer_attribution_y: f64,
    pub footer_disclaimer_y: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageGeometry {
    pub fn a4() -> Self {
        Self {
            width: 595.0,
            height: 842.0,
            margin: 40.0,
            bullet_x: 55.0,
            logo_width: 180.0,
            logo_height: 60.0,
            logo_top_offset: 120.0,
            title_top_offset: 140.0,
            subtitle_top_offset: 158.0,
            identity_top_offset: 185.0,
            body_top_offset: 210.0,
            continuation_top_offset: 60.0,
            title_size: 16.0,
            section_title_size: 12.0,
            body_size: 11.0,
            footer_size: 8.0,
            section_title_advance: 16.0,
            leading: 14.0,
            paragraph_gap: 4.0,
            plan_gap: 6.0,
            overflow_threshold: 140.0,
            footer_attribution_y: 28.0,
            footer_disclaimer_y: 16.0,
        }
    }

    pub fn paragraph_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    pub fn bullet_width(&self) -> f64 {
        self.width - self.bullet_x - self.margin
    }

    /// Bottom-left corner of the logo box, centred horizontally.
    pub fn logo_origin(&self) -> (f64, f64) {
        (
            (self.width - self.logo_width) / 2.0,
            self.height - self.logo_top_offset,
        )
    }

    pub fn from_top(&self, offset: f64) -> f64 {
        self.height - offset
    }
}

/// A single line of text at a fixed position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f64,
    pub y: f64,
    pub font: Font,
    pub size: f64,
    pub color: Color,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Full-page rectangle
    Background(Color),
    /// The report logo scaled into this box
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Text(TextRun),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub elements: Vec<Element>,
}

impl PageLayout {
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(|element| match element {
            Element::Text(run) => Some(run),
            _ => None,
        })
    }

    pub fn lines(&self) -> Vec<&str> {
        self.text_runs().map(|run| run.text.as_str()).collect()
    }

    pub fn find_text(&self, text: &str) -> Option<&TextRun> {
        self.text_runs().find(|run| run.text == text)
    }

    pub fn has_image(&self) -> bool {
        self.elements
            .iter()
            .any(|element| matches!(element, Element::Image { .. }))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportLayout {
    pub pages: Vec<PageLayout>,
}

impl ReportLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Text repeated at the bottom of every page.
#[derive(Debug, Clone, PartialEq)]
pub struct Footer {
    pub font: Font,
    pub size: f64,
    pub color: Color,
    /// `(baseline y, text)`, each centred horizontally
    pub lines: Vec<(f64, String)>,
}

/// Records drawing calls page by page.
///
/// Each page starts with the background rectangle and receives the footer
/// when it is finished.
#[derive(Debug)]
pub struct LayoutCanvas {
    geometry: PageGeometry,
    background: Color,
    footer: Footer,
    pages: Vec<PageLayout>,
    current: PageLayout,
    font: Font,
    font_size: f64,
    fill_color: Color,
}

impl LayoutCanvas {
    pub fn new(geometry: PageGeometry, background: Color, footer: Footer) -> Self {
        let mut canvas = Self {
            geometry,
            background,
            footer,
            pages: Vec::new(),
            current: PageLayout::default(),
            font: Font::Helvetica,
            font_size: geometry.body_size,
            fill_color: Color::black(),
        };
        canvas.begin_page();
        canvas
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn set_font(&mut self, font: Font, size: f64) -> &mut Self {
        self.font = font;
        self.font_size = size;
        self
    }

    pub fn set_fill_color(&mut self, color: Color) -> &mut Self {
        self.fill_color = color;
        self
    }

    pub fn draw_string(&mut self, x: f64, y: f64, text: &str) {
        self.current.elements.push(Element::Text(TextRun {
            x,
            y,
            font: self.font,
            size: self.font_size,
            color: self.fill_color,
            text: text.to_string(),
        }));
    }

    /// Draws `text` centred on the page's vertical axis.
    pub fn draw_centred(&mut self, y: f64, text: &str) {
        let width = measure_text(text, self.font, self.font_size);
        self.draw_string((self.geometry.width - width) / 2.0, y, text);
    }

    pub fn draw_image(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.current.elements.push(Element::Image {
            x,
            y,
            width,
            height,
        });
    }

    /// Wraps `text` to `max_width` in the current font and draws one line
    /// per `leading`, starting at `y`. Returns the cursor below the last
    /// line; empty text leaves it unchanged.
    pub fn draw_wrapped(&mut self, text: &str, x: f64, y: f64, max_width: f64, leading: f64) -> f64 {
        let mut y = y;
        for line in wrap_lines(text, max_width, self.font, self.font_size) {
            self.draw_string(x, y, &line);
            y -= leading;
        }
        y
    }

    /// Finishes the current page and starts a fresh one.
    pub fn show_page(&mut self) {
        self.finish_page();
        self.begin_page();
    }

    pub fn finish(mut self) -> ReportLayout {
        self.finish_page();
        ReportLayout { pages: self.pages }
    }

    fn begin_page(&mut self) {
        self.current
            .elements
            .push(Element::Background(self.background));
    }

    fn finish_page(&mut self) {
        let footer = &self.footer;
        for (y, text) in &footer.lines {
            let width = measure_text(text, footer.font, footer.size);
            self.current.elements.push(Element::Text(TextRun {
                x: (self.geometry.width - width) / 2.0,
                y: *y,
                font: footer.font,
                size: footer.size,
                color: footer.color,
                text: text.clone(),
            }));
        }
        self.pages.push(std::mem::take(&mut self.current));
    }
}

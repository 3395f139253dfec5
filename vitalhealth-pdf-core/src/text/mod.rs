mod encoding;
mod font;
mod metrics;
mod wrap;

pub use encoding::encode_win_ansi;
pub use font::Font;
pub use metrics::measure_text;
pub use wrap::wrap_lines;

use crate::graphics::Color;

/// Accumulates text-showing operators for one page.
///
/// Every `write` emits a self-contained `BT ... ET` block carrying the
/// current font, fill colour and position.
#[derive(Clone, Debug)]
pub struct TextContext {
    operations: String,
    current_font: Font,
    font_size: f64,
    fill_color: Color,
    position: (f64, f64),
}

impl Default for TextContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TextContext {
    pub fn new() -> Self {
        Self {
            operations: String::new(),
            current_font: Font::Helvetica,
            font_size: 12.0,
            fill_color: Color::black(),
            position: (0.0, 0.0),
        }
    }

    pub fn set_font(&mut self, font: Font, size: f64) -> &mut Self {
        self.current_font = font;
        self.font_size = size;
        self
    }

    pub fn set_fill_color(&mut self, color: Color) -> &mut Self {
        self.fill_color = color;
        self
    }

    pub fn at(&mut self, x: f64, y: f64) -> &mut Self {
        self.position = (x, y);
        self
    }

    pub fn write(&mut self, text: &str) -> &mut Self {
        let (x, y) = self.position;

        self.operations.push_str("BT\n");
        self.operations
            .push_str(&format!("{}\n", self.fill_color.fill_operator()));
        self.operations.push_str(&format!(
            "/{} {} Tf\n",
            self.current_font.pdf_name(),
            self.font_size
        ));
        self.operations.push_str(&format!("{x:.2} {y:.2} Td\n"));

        self.operations.push('(');
        for byte in encode_win_ansi(text) {
            match byte {
                b'(' => self.operations.push_str("\\("),
                b')' => self.operations.push_str("\\)"),
                b'\\' => self.operations.push_str("\\\\"),
                b'\n' => self.operations.push_str("\\n"),
                b'\r' => self.operations.push_str("\\r"),
                b'\t' => self.operations.push_str("\\t"),
                0x20..=0x7E => self.operations.push(byte as char),
                _ => self.operations.push_str(&format!("\\{byte:03o}")),
            }
        }
        self.operations.push_str(") Tj\n");

        self.operations.push_str("ET\n");
        self
    }

    pub fn operations(&self) -> &str {
        &self.operations
    }

    pub(crate) fn generate_operations(&self) -> Vec<u8> {
        self.operations.as_bytes().to_vec()
    }
}

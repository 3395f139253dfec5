use crate::error::{PdfError, Result};
use crate::graphics::{GraphicsContext, Image};
use crate::text::TextContext;
use std::collections::BTreeMap;

/// A single page in a PDF document.
///
/// Pages have a size (width and height in points) and hold graphics, text
/// and named images. Graphics are painted before text.
///
/// # Example
///
/// ```rust
/// use vitalhealth_pdf::{Color, Font, Page};
///
/// let mut page = Page::a4();
///
/// page.graphics()
///     .set_fill_color(Color::from_hex("#F5F1E8")?)
///     .rect(0.0, 0.0, 595.0, 842.0)
///     .fill();
///
/// page.text()
///     .set_font(Font::Helvetica, 11.0)
///     .at(40.0, 632.0)
///     .write("Estado general");
/// # Ok::<(), vitalhealth_pdf::PdfError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Page {
    width: f64,
    height: f64,
    graphics_context: GraphicsContext,
    text_context: TextContext,
    images: BTreeMap<String, Image>,
}

impl Page {
    /// Creates a new page with the specified width and height in points.
    ///
    /// Points are 1/72 of an inch.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            graphics_context: GraphicsContext::new(),
            text_context: TextContext::new(),
            images: BTreeMap::new(),
        }
    }

    /// Creates a new A4 page (595 x 842 points).
    pub fn a4() -> Self {
        Self::new(595.0, 842.0)
    }

    /// Returns a mutable reference to the graphics context for drawing shapes.
    pub fn graphics(&mut self) -> &mut GraphicsContext {
        &mut self.graphics_context
    }

    /// Returns a mutable reference to the text context for adding text.
    pub fn text(&mut self) -> &mut TextContext {
        &mut self.text_context
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn add_image(&mut self, name: impl Into<String>, image: Image) {
        self.images.insert(name.into(), image);
    }

    pub fn draw_image(&mut self, name: &str, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        if self.images.contains_key(name) {
            self.graphics_context.draw_image(name, x, y, width, height);
            Ok(())
        } else {
            Err(PdfError::InvalidReference(format!(
                "Image '{name}' not found"
            )))
        }
    }

    pub fn images(&self) -> &BTreeMap<String, Image> {
        &self.images
    }

    pub(crate) fn generate_content(&self) -> Vec<u8> {
        let mut content = self.graphics_context.generate_operations();
        content.extend_from_slice(&self.text_context.generate_operations());
        content
    }
}

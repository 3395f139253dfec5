mod color;
mod image;

pub use color::Color;
pub use image::{ColorSpace as ImageColorSpace, Image, ImageFormat};

/// Accumulates path-painting and XObject operators for one page.
#[derive(Clone, Debug)]
pub struct GraphicsContext {
    operations: String,
    fill_color: Color,
}

impl Default for GraphicsContext {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsContext {
    pub fn new() -> Self {
        Self {
            operations: String::new(),
            fill_color: Color::black(),
        }
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.operations
            .push_str(&format!("{x:.2} {y:.2} {width:.2} {height:.2} re\n"));
        self
    }

    pub fn fill(&mut self) -> &mut Self {
        self.operations
            .push_str(&format!("{}\n", self.fill_color.fill_operator()));
        self.operations.push_str("f\n");
        self
    }

    pub fn set_fill_color(&mut self, color: Color) -> &mut Self {
        self.fill_color = color;
        self
    }

    pub fn save_state(&mut self) -> &mut Self {
        self.operations.push_str("q\n");
        self
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.operations.push_str("Q\n");
        self
    }

    /// Paints the named image XObject scaled into the given box.
    pub fn draw_image(
        &mut self,
        image_name: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> &mut Self {
        self.save_state();
        self.operations.push_str(&format!(
            "{width:.2} 0 0 {height:.2} {x:.2} {y:.2} cm\n"
        ));
        self.operations.push_str(&format!("/{image_name} Do\n"));
        self.restore_state()
    }

    pub fn operations(&self) -> &str {
        &self.operations
    }

    pub(crate) fn generate_operations(&self) -> Vec<u8> {
        self.operations.as_bytes().to_vec()
    }
}

/// Standard Type 1 fonts used by the report.
///
/// Standard fonts are available in every PDF reader and are never embedded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Font {
    /// Helvetica (sans-serif)
    #[default]
    Helvetica,
    /// Helvetica Bold
    HelveticaBold,
}

impl Font {
    /// PostScript name, also used as the font resource key in content streams.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    pub fn all() -> [Font; 2] {
        [Font::Helvetica, Font::HelveticaBold]
    }

    pub fn is_bold(&self) -> bool {
        matches!(self, Font::HelveticaBold)
    }
}

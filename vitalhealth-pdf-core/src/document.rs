use crate::error::Result;
use crate::page::Page;
use crate::writer::PdfWriter;
use chrono::{DateTime, Utc};

/// A PDF document that can contain multiple pages and metadata.
///
/// # Example
///
/// ```rust
/// use vitalhealth_pdf::{Document, Page};
///
/// let mut doc = Document::new();
/// doc.set_title("Informe");
/// doc.add_page(Page::a4());
///
/// let bytes = doc.to_bytes()?;
/// assert!(bytes.starts_with(b"%PDF-"));
/// # Ok::<(), vitalhealth_pdf::PdfError>(())
/// ```
#[derive(Debug, Default)]
pub struct Document {
    pub(crate) pages: Vec<Page>,
    pub(crate) metadata: DocumentMetadata,
}

/// Metadata for a PDF document.
#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Software that created the original document
    pub creator: Option<String>,
    /// Software that produced the PDF
    pub producer: Option<String>,
    /// Date and time the document was created
    pub creation_date: Option<DateTime<Utc>>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            subject: None,
            creator: Some("vitalhealth_pdf".to_string()),
            producer: Some(format!("vitalhealth_pdf v{}", env!("CARGO_PKG_VERSION"))),
            creation_date: Some(Utc::now()),
        }
    }
}

impl Document {
    /// Creates a new empty PDF document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Sets the document title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.metadata.title = Some(title.into());
    }

    /// Sets the document author.
    pub fn set_author(&mut self, author: impl Into<String>) {
        self.metadata.author = Some(author.into());
    }

    /// Sets the document subject.
    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.metadata.subject = Some(subject.into());
    }

    /// Sets the document creator (software that created the original document).
    pub fn set_creator(&mut self, creator: impl Into<String>) {
        self.metadata.creator = Some(creator.into());
    }

    /// Sets the document creation date.
    pub fn set_creation_date(&mut self, date: DateTime<Utc>) {
        self.metadata.creation_date = Some(date);
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Gets the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Saves the document to a file.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let mut writer = PdfWriter::new(path)?;
        writer.write_document(self)
    }

    /// Writes the document to a buffer.
    pub fn write(&self, buffer: &mut Vec<u8>) -> Result<()> {
        let mut writer = PdfWriter::new_with_writer(buffer);
        writer.write_document(self)
    }

    /// Serialises the whole document in memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(&mut buffer)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert_eq!(doc.page_count(), 0);
        assert!(doc.metadata().title.is_none());
        assert!(doc.metadata().creation_date.is_some());
    }

    #[test]
    fn test_add_pages() {
        let mut doc = Document::new();
        doc.add_page(Page::a4());
        doc.add_page(Page::a4());
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages().len(), 2);
    }

    #[test]
    fn test_metadata_setters() {
        let mut doc = Document::new();
        doc.set_title("Informe");
        doc.set_author("Distribuidor");
        doc.set_subject("Paciente");
        doc.set_creator("Servicio");

        let metadata = doc.metadata();
        assert_eq!(metadata.title.as_deref(), Some("Informe"));
        assert_eq!(metadata.author.as_deref(), Some("Distribuidor"));
        assert_eq!(metadata.subject.as_deref(), Some("Paciente"));
        assert_eq!(metadata.creator.as_deref(), Some("Servicio"));
    }

    #[test]
    fn test_to_bytes_has_pdf_header() {
        let mut doc = Document::new();
        doc.add_page(Page::a4());
        let bytes = doc.to_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(bytes.ends_with(b"%%EOF\n"));
    }
}

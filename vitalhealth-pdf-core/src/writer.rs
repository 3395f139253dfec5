use crate::document::Document;
use crate::error::Result;
use crate::objects::{Dictionary, Object, ObjectId, Stream};
use crate::page::Page;
use crate::text::Font;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Serialises a [`Document`] as a classic (non-incremental) PDF 1.7 file.
///
/// Object numbers are handed out sequentially as objects are written.
pub struct PdfWriter<W: Write> {
    writer: W,
    xref_positions: BTreeMap<u32, u64>,
    current_position: u64,
    next_object_number: u32,
}

impl<W: Write> PdfWriter<W> {
    pub fn new_with_writer(writer: W) -> Self {
        Self {
            writer,
            xref_positions: BTreeMap::new(),
            current_position: 0,
            next_object_number: 1,
        }
    }

    pub fn write_document(&mut self, document: &Document) -> Result<()> {
        self.write_header()?;

        let catalog_id = self.allocate_id();
        let pages_id = self.allocate_id();

        let fonts = self.write_fonts()?;
        let page_ids = document
            .pages
            .iter()
            .map(|page| self.write_page(pages_id, &fonts, page))
            .collect::<Result<Vec<_>>>()?;

        self.write_page_tree(pages_id, &page_ids)?;
        self.write_catalog(catalog_id, pages_id)?;
        let info_id = self.write_info(document)?;

        let xref_position = self.current_position;
        self.write_xref()?;
        self.write_trailer(catalog_id, info_id, xref_position)?;

        self.writer.flush()?;
        Ok(())
    }

    fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next_object_number, 0);
        self.next_object_number += 1;
        id
    }

    fn write_header(&mut self) -> Result<()> {
        self.write_bytes(b"%PDF-1.7\n")?;
        // Binary comment to ensure file is treated as binary
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])?;
        Ok(())
    }

    fn write_catalog(&mut self, catalog_id: ObjectId, pages_id: ObjectId) -> Result<()> {
        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::name("Catalog"));
        catalog.set("Pages", pages_id);

        self.write_object(catalog_id, Object::Dictionary(catalog))
    }

    fn write_fonts(&mut self) -> Result<BTreeMap<&'static str, ObjectId>> {
        let mut fonts = BTreeMap::new();
        for font in Font::all() {
            let font_id = self.allocate_id();
            let mut font_dict = Dictionary::new();
            font_dict.set("Type", Object::name("Font"));
            font_dict.set("Subtype", Object::name("Type1"));
            font_dict.set("BaseFont", Object::name(font.pdf_name()));
            font_dict.set("Encoding", Object::name("WinAnsiEncoding"));

            self.write_object(font_id, Object::Dictionary(font_dict))?;
            fonts.insert(font.pdf_name(), font_id);
        }
        Ok(fonts)
    }

    fn write_page_tree(&mut self, pages_id: ObjectId, page_ids: &[ObjectId]) -> Result<()> {
        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::name("Pages"));
        pages_dict.set("Count", page_ids.len() as i64);
        pages_dict.set(
            "Kids",
            page_ids
                .iter()
                .map(|id| Object::Reference(*id))
                .collect::<Vec<_>>(),
        );

        self.write_object(pages_id, Object::Dictionary(pages_dict))
    }

    fn write_page(
        &mut self,
        parent_id: ObjectId,
        fonts: &BTreeMap<&'static str, ObjectId>,
        page: &Page,
    ) -> Result<ObjectId> {
        let mut resources = Dictionary::new();

        let mut font_dict = Dictionary::new();
        for (name, id) in fonts {
            font_dict.set(*name, *id);
        }
        resources.set("Font", font_dict);

        if !page.images().is_empty() {
            let mut xobject_dict = Dictionary::new();
            for (name, image) in page.images() {
                let (mut image_stream, mask_stream) = image.to_pdf_streams()?;

                if let Some(mask_stream) = mask_stream {
                    let mask_id = self.allocate_id();
                    self.write_object(mask_id, mask_stream.into_object())?;
                    image_stream.dictionary_mut().set("SMask", mask_id);
                }

                let image_id = self.allocate_id();
                self.write_object(image_id, image_stream.into_object())?;
                xobject_dict.set(name.as_str(), image_id);
            }
            resources.set("XObject", xobject_dict);
        }

        let content_id = self.allocate_id();
        self.write_page_content(content_id, page)?;

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::name("Page"));
        page_dict.set("Parent", parent_id);
        page_dict.set(
            "MediaBox",
            vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(page.width()),
                Object::Real(page.height()),
            ],
        );
        page_dict.set("Contents", content_id);
        page_dict.set("Resources", resources);

        let page_id = self.allocate_id();
        self.write_object(page_id, Object::Dictionary(page_dict))?;
        Ok(page_id)
    }

    fn write_page_content(&mut self, content_id: ObjectId, page: &Page) -> Result<()> {
        #[allow(unused_mut)]
        let mut stream = Stream::new(page.generate_content());

        #[cfg(feature = "compression")]
        stream.compress_flate()?;

        self.write_object(content_id, stream.into_object())
    }

    fn write_info(&mut self, document: &Document) -> Result<ObjectId> {
        let info_id = self.allocate_id();
        let metadata = &document.metadata;
        let mut info_dict = Dictionary::new();

        let text_entries = [
            ("Title", &metadata.title),
            ("Author", &metadata.author),
            ("Subject", &metadata.subject),
            ("Creator", &metadata.creator),
            ("Producer", &metadata.producer),
        ];
        for (key, value) in text_entries {
            if let Some(value) = value {
                info_dict.set(key, Object::String(value.clone()));
            }
        }

        if let Some(creation_date) = metadata.creation_date {
            info_dict.set("CreationDate", Object::String(format_pdf_date(creation_date)));
        }

        self.write_object(info_id, Object::Dictionary(info_dict))?;
        Ok(info_id)
    }
}

impl PdfWriter<BufWriter<std::fs::File>> {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new_with_writer(BufWriter::new(file)))
    }
}

impl<W: Write> PdfWriter<W> {
    fn write_object(&mut self, id: ObjectId, object: Object) -> Result<()> {
        self.xref_positions.insert(id.number(), self.current_position);

        let header = format!("{} {} obj\n", id.number(), id.generation());
        self.write_bytes(header.as_bytes())?;

        self.write_object_value(&object)?;

        self.write_bytes(b"\nendobj\n")?;
        Ok(())
    }

    fn write_object_value(&mut self, object: &Object) -> Result<()> {
        match object {
            Object::Null => self.write_bytes(b"null")?,
            Object::Boolean(b) => self.write_bytes(if *b { b"true" } else { b"false" })?,
            Object::Integer(i) => self.write_bytes(i.to_string().as_bytes())?,
            Object::Real(f) => self.write_bytes(format_real(*f).as_bytes())?,
            Object::String(s) => self.write_text_string(s)?,
            Object::Name(n) => {
                self.write_bytes(b"/")?;
                self.write_bytes(n.as_bytes())?;
            }
            Object::Array(arr) => {
                self.write_bytes(b"[")?;
                for (i, obj) in arr.iter().enumerate() {
                    if i > 0 {
                        self.write_bytes(b" ")?;
                    }
                    self.write_object_value(obj)?;
                }
                self.write_bytes(b"]")?;
            }
            Object::Dictionary(dict) => {
                self.write_bytes(b"<<")?;
                for (key, value) in dict.entries() {
                    self.write_bytes(b"\n/")?;
                    self.write_bytes(key.as_bytes())?;
                    self.write_bytes(b" ")?;
                    self.write_object_value(value)?;
                }
                self.write_bytes(b"\n>>")?;
            }
            Object::Stream(dict, data) => {
                self.write_object_value(&Object::Dictionary(dict.clone()))?;
                self.write_bytes(b"\nstream\n")?;
                self.write_bytes(data)?;
                self.write_bytes(b"\nendstream")?;
            }
            Object::Reference(id) => {
                let ref_str = format!("{} {} R", id.number(), id.generation());
                self.write_bytes(ref_str.as_bytes())?;
            }
        }
        Ok(())
    }

    /// ASCII text goes out as an escaped literal string; anything else as a
    /// UTF-16BE hex string with byte order mark.
    fn write_text_string(&mut self, text: &str) -> Result<()> {
        if text.is_ascii() {
            let mut literal = String::with_capacity(text.len() + 2);
            literal.push('(');
            for ch in text.chars() {
                match ch {
                    '(' | ')' | '\\' => {
                        literal.push('\\');
                        literal.push(ch);
                    }
                    '\n' => literal.push_str("\\n"),
                    '\r' => literal.push_str("\\r"),
                    _ => literal.push(ch),
                }
            }
            literal.push(')');
            self.write_bytes(literal.as_bytes())
        } else {
            let mut hex = String::from("<FEFF");
            for unit in text.encode_utf16() {
                hex.push_str(&format!("{unit:04X}"));
            }
            hex.push('>');
            self.write_bytes(hex.as_bytes())
        }
    }

    fn write_xref(&mut self) -> Result<()> {
        self.write_bytes(b"xref\n")?;

        let max_obj_num = self.xref_positions.keys().max().copied().unwrap_or(0);

        self.write_bytes(format!("0 {}\n", max_obj_num + 1).as_bytes())?;
        self.write_bytes(b"0000000000 65535 f \n")?;

        // Gaps become free entries
        for obj_num in 1..=max_obj_num {
            let entry = match self.xref_positions.get(&obj_num) {
                Some(position) => format!("{position:010} 00000 n \n"),
                None => "0000000000 00000 f \n".to_string(),
            };
            self.write_bytes(entry.as_bytes())?;
        }

        Ok(())
    }

    fn write_trailer(
        &mut self,
        catalog_id: ObjectId,
        info_id: ObjectId,
        xref_position: u64,
    ) -> Result<()> {
        let max_obj_num = self.xref_positions.keys().max().copied().unwrap_or(0);

        let mut trailer = Dictionary::new();
        trailer.set("Size", (max_obj_num + 1) as i64);
        trailer.set("Root", catalog_id);
        trailer.set("Info", info_id);

        self.write_bytes(b"trailer\n")?;
        self.write_object_value(&Object::Dictionary(trailer))?;
        self.write_bytes(b"\nstartxref\n")?;
        self.write_bytes(xref_position.to_string().as_bytes())?;
        self.write_bytes(b"\n%%EOF\n")?;

        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.current_position += data.len() as u64;
        Ok(())
    }
}

fn format_real(value: f64) -> String {
    let formatted = format!("{value:.6}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Format a DateTime as a PDF date string (D:YYYYMMDDHHmmSSOHH'mm)
fn format_pdf_date(date: DateTime<Utc>) -> String {
    let formatted = date.format("D:%Y%m%d%H%M%S");
    format!("{formatted}+00'00")
}

//! Image support for PDF generation
//!
//! JPEG data is embedded as-is (DCTDecode). With the `external-images`
//! feature, any other raster format the `image` crate understands (PNG in
//! practice) is decoded to 8-bit RGB with an optional alpha soft mask.

use crate::objects::{Dictionary, Object, Stream};
use crate::{PdfError, Result};

/// Represents an image that can be embedded in a PDF
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Encoded (JPEG) or raw pixel data
    data: Vec<u8>,
    /// Image format
    format: ImageFormat,
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Color space
    color_space: ColorSpace,
    /// Bits per component
    bits_per_component: u8,
    /// 8-bit alpha channel, one byte per pixel
    soft_mask: Option<Vec<u8>>,
}

/// How the image data is stored
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageFormat {
    /// JPEG stream passed through untouched
    Jpeg,
    /// Decoded samples
    Raw,
}

/// Color spaces for images
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorSpace {
    /// Grayscale
    DeviceGray,
    /// RGB color
    DeviceRGB,
    /// CMYK color
    DeviceCMYK,
}

impl ColorSpace {
    fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceCMYK => "DeviceCMYK",
        }
    }
}

impl Image {
    /// Create an image from JPEG data
    pub fn from_jpeg_data(data: Vec<u8>) -> Result<Self> {
        let (width, height, color_space, bits_per_component) = parse_jpeg_header(&data)?;

        Ok(Image {
            data,
            format: ImageFormat::Jpeg,
            width,
            height,
            color_space,
            bits_per_component,
            soft_mask: None,
        })
    }

    /// Decode a PNG (or any other format known to the `image` crate).
    #[cfg(feature = "external-images")]
    pub fn from_encoded_data(data: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(data)
            .map_err(|e| PdfError::InvalidImage(e.to_string()))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(PdfError::InvalidImage("Image has no pixels".to_string()));
        }

        let pixel_count = (width as usize) * (height as usize);
        let mut rgb = Vec::with_capacity(pixel_count * 3);
        let mut alpha = Vec::with_capacity(pixel_count);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            rgb.extend_from_slice(&[r, g, b]);
            alpha.push(a);
        }
        let soft_mask = if alpha.iter().all(|&a| a == u8::MAX) {
            None
        } else {
            Some(alpha)
        };

        Ok(Image {
            data: rgb,
            format: ImageFormat::Raw,
            width,
            height,
            color_space: ColorSpace::DeviceRGB,
            bits_per_component: 8,
            soft_mask,
        })
    }

    /// Build an image from bytes of unknown format: JPEG is detected by its
    /// SOI marker, anything else goes through the decoder.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.starts_with(&[0xFF, 0xD8]) {
            return Self::from_jpeg_data(data);
        }

        #[cfg(feature = "external-images")]
        {
            Self::from_encoded_data(&data)
        }

        #[cfg(not(feature = "external-images"))]
        {
            Err(PdfError::InvalidImage(
                "Only JPEG images are supported without the external-images feature".to_string(),
            ))
        }
    }

    /// Get image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get image height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn has_soft_mask(&self) -> bool {
        self.soft_mask.is_some()
    }

    /// Builds the image XObject stream and, when the image carries alpha,
    /// its soft mask. The caller links the two through `/SMask`.
    pub fn to_pdf_streams(&self) -> Result<(Stream, Option<Stream>)> {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::name("XObject"));
        dict.set("Subtype", Object::name("Image"));
        dict.set("Width", self.width);
        dict.set("Height", self.height);
        dict.set("ColorSpace", Object::name(self.color_space.pdf_name()));
        dict.set("BitsPerComponent", self.bits_per_component as i64);

        let image_stream = match self.format {
            ImageFormat::Jpeg => {
                let mut stream = Stream::with_dictionary(dict, self.data.clone());
                stream.set_filter("DCTDecode");
                stream
            }
            ImageFormat::Raw => raw_stream(dict, self.data.clone())?,
        };

        let mask_stream = match &self.soft_mask {
            Some(alpha) => {
                let mut mask = Dictionary::new();
                mask.set("Type", Object::name("XObject"));
                mask.set("Subtype", Object::name("Image"));
                mask.set("Width", self.width);
                mask.set("Height", self.height);
                mask.set("ColorSpace", Object::name("DeviceGray"));
                mask.set("BitsPerComponent", 8i64);
                Some(raw_stream(mask, alpha.clone())?)
            }
            None => None,
        };

        Ok((image_stream, mask_stream))
    }
}

#[cfg(feature = "compression")]
fn raw_stream(dict: Dictionary, data: Vec<u8>) -> Result<Stream> {
    let mut stream = Stream::with_dictionary(dict, data);
    stream.compress_flate()?;
    Ok(stream)
}

#[cfg(not(feature = "compression"))]
fn raw_stream(dict: Dictionary, data: Vec<u8>) -> Result<Stream> {
    Ok(Stream::with_dictionary(dict, data))
}

/// Parse JPEG header to extract image information
fn parse_jpeg_header(data: &[u8]) -> Result<(u32, u32, ColorSpace, u8)> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(PdfError::InvalidImage("Not a valid JPEG file".to_string()));
    }

    let mut pos = 2;
    let mut width = 0;
    let mut height = 0;
    let mut components = 0;
    let mut precision = 8;

    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            return Err(PdfError::InvalidImage("Invalid JPEG marker".to_string()));
        }

        let marker = data[pos + 1];
        pos += 2;

        // Fill bytes
        if marker == 0xFF {
            pos -= 1;
            continue;
        }

        // SOF markers, excluding DHT (C4), JPG (C8) and DAC (CC)
        if (0xC0..=0xCF).contains(&marker) && marker != 0xC4 && marker != 0xC8 && marker != 0xCC
        {
            if pos + 7 >= data.len() {
                return Err(PdfError::InvalidImage("Truncated JPEG file".to_string()));
            }

            precision = data[pos + 2];
            height = ((data[pos + 3] as u32) << 8) | (data[pos + 4] as u32);
            width = ((data[pos + 5] as u32) << 8) | (data[pos + 6] as u32);
            components = data[pos + 7];
            break;
        } else if marker == 0xD9 {
            break;
        } else if marker == 0xD8 || marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            // Standalone markers carry no length
            continue;
        } else {
            if pos + 1 >= data.len() {
                return Err(PdfError::InvalidImage("Truncated JPEG file".to_string()));
            }
            let length = ((data[pos] as usize) << 8) | (data[pos + 1] as usize);
            pos += length;
        }
    }

    if width == 0 || height == 0 {
        return Err(PdfError::InvalidImage(
            "Could not find image dimensions".to_string(),
        ));
    }

    let color_space = match components {
        1 => ColorSpace::DeviceGray,
        3 => ColorSpace::DeviceRGB,
        4 => ColorSpace::DeviceCMYK,
        _ => {
            return Err(PdfError::InvalidImage(format!(
                "Unsupported number of components: {components}"
            )))
        }
    };

    Ok((width, height, color_space, precision))
}

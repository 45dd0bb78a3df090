//! Raster canvas helpers and PDF image objects

use crate::{CoreError, Result};
use image::imageops::FilterType;
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use lopdf::{Dictionary, Stream};
use std::io::{Cursor, Write};

impl From<image::ImageError> for CoreError {
    fn from(err: image::ImageError) -> Self {
        CoreError::ImageError(err.to_string())
    }
}

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);

/// Create a white RGB canvas
pub fn blank_canvas(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, WHITE)
}

/// Fill a `width` x `height` rectangle whose top-left corner is (`x`, `y`)
///
/// The rectangle is clipped to the canvas; empty rectangles draw nothing.
pub fn fill_rect(canvas: &mut RgbImage, x: i32, y: i32, width: u32, height: u32, color: Rgb<u8>) {
    if width == 0 || height == 0 {
        return;
    }
    draw_filled_rect_mut(canvas, Rect::at(x, y).of_size(width, height), color);
}

/// Scale an image to `width`, keeping its aspect ratio (Lanczos resampling)
pub fn scale_to_width(image: RgbImage, width: u32) -> RgbImage {
    if image.width() == width || image.width() == 0 || width == 0 {
        return image;
    }
    let aspect = f64::from(image.height()) / f64::from(image.width());
    let height = ((f64::from(width) * aspect) as u32).max(1);
    image::imageops::resize(&image, width, height, FilterType::Lanczos3)
}

/// Encode an RGB image as PNG bytes
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Image XObject for PDF embedding
#[derive(Debug, Clone)]
pub struct ImageXObject {
    /// Image width
    pub width: u32,
    /// Image height
    pub height: u32,
    /// Color space ("DeviceRGB")
    pub color_space: String,
    /// Bits per component
    pub bits_per_component: u8,
    /// PDF filter ("FlateDecode")
    pub filter: String,
    /// Compressed sample data
    pub data: Vec<u8>,
}

impl ImageXObject {
    /// Create an XObject from decoded RGB samples
    pub fn from_rgb(image: &RgbImage) -> Result<Self> {
        let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(image.as_raw())?;
        let data = encoder.finish()?;

        Ok(Self {
            width: image.width(),
            height: image.height(),
            color_space: "DeviceRGB".to_string(),
            bits_per_component: 8,
            filter: "FlateDecode".to_string(),
            data,
        })
    }

    /// Convert to lopdf Stream object
    pub fn to_pdf_stream(&self) -> Stream {
        let mut dict = Dictionary::new();

        dict.set("Type", lopdf::Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", lopdf::Object::Name(b"Image".to_vec()));
        dict.set("Width", i64::from(self.width));
        dict.set("Height", i64::from(self.height));
        dict.set(
            "ColorSpace",
            lopdf::Object::Name(self.color_space.as_bytes().to_vec()),
        );
        dict.set("BitsPerComponent", i64::from(self.bits_per_component));
        dict.set(
            "Filter",
            lopdf::Object::Name(self.filter.as_bytes().to_vec()),
        );
        dict.set("Length", self.data.len() as i64);

        Stream::new(dict, self.data.clone())
    }
}

/// Generate operators to draw image at position
///
/// # Arguments
/// * `image_name` - Image resource name (e.g., "Im1")
/// * `x` - X coordinate in points
/// * `y` - Y coordinate in points (from bottom, PDF coordinates)
/// * `width` - Image width in points
/// * `height` - Image height in points
pub fn generate_image_operators(
    image_name: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Vec<u8> {
    format!("q\n{width} 0 0 {height} {x} {y} cm\n/{image_name} Do\nQ\n").into_bytes()
}

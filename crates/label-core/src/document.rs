//! Multi-page PDF assembly from rendered label images

use crate::raster::{blank_canvas, generate_image_operators, ImageXObject, BLACK};
use crate::{Result, TextRasterizer};
use image::RgbImage;
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;

/// Text of the page written when a bundle holds no labels
pub const PLACEHOLDER_TEXT: &str = "No labels generated from input.";

const PLACEHOLDER_WIDTH: u32 = 1000;
const PLACEHOLDER_HEIGHT: u32 = 300;
const PLACEHOLDER_TEXT_SIZE: f32 = 36.0;

/// PDF document holding one full-page image per label
///
/// Each page is exactly as large as its image, one point per pixel.
pub struct LabelDocument {
    inner: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl LabelDocument {
    /// Create an empty document
    pub fn new() -> Self {
        let mut inner = Document::with_version("1.5");
        let pages_id = inner.new_object_id();
        Self {
            inner,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Number of pages added so far
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Append a page showing `image` at full size
    pub fn add_image_page(&mut self, image: &RgbImage) -> Result<()> {
        let (width, height) = (image.width(), image.height());
        let xobject = ImageXObject::from_rgb(image)?;
        let image_id = self.inner.add_object(xobject.to_pdf_stream());

        let operators = generate_image_operators("Im1", 0.0, 0.0, f64::from(width), f64::from(height));
        let content_id = self
            .inner
            .add_object(Stream::new(dictionary! {}, operators));

        let page_id = self.inner.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(i64::from(width)),
                Object::Integer(i64::from(height)),
            ],
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im1" => image_id,
                },
            },
            "Contents" => content_id,
        });
        self.kids.push(page_id.into());

        log::debug!("added PDF page {} ({}x{})", self.kids.len(), width, height);
        Ok(())
    }

    /// Finish the page tree and serialize the document
    pub fn to_bytes(mut self) -> Result<Vec<u8>> {
        self.finish();
        let mut buffer = Vec::new();
        self.inner.save_to(&mut buffer)?;
        Ok(buffer)
    }

    /// Finish the page tree and write the document to `path`
    pub fn save<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn finish(&mut self) {
        let count = self.kids.len() as i64;
        self.inner.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => std::mem::take(&mut self.kids),
                "Count" => count,
            }),
        );
        let catalog_id = self.inner.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.inner.trailer.set("Root", catalog_id);
        self.inner.compress();
    }
}

impl Default for LabelDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Build one PDF with a page per image, in order
///
/// An empty image list still produces a valid single-page document that
/// shows [`PLACEHOLDER_TEXT`].
pub fn write_bundle(images: &[RgbImage], rasterizer: &dyn TextRasterizer) -> Result<Vec<u8>> {
    let mut doc = LabelDocument::new();

    if images.is_empty() {
        log::info!("no labels to bundle; writing placeholder page");
        doc.add_image_page(&placeholder_page(rasterizer))?;
    } else {
        for image in images {
            doc.add_image_page(image)?;
        }
    }
    log::debug!("bundle has {} page(s)", doc.page_count());

    doc.to_bytes()
}

fn placeholder_page(rasterizer: &dyn TextRasterizer) -> RgbImage {
    let mut canvas = blank_canvas(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT);
    rasterizer.draw(
        &mut canvas,
        PLACEHOLDER_TEXT,
        20,
        120,
        PLACEHOLDER_TEXT_SIZE,
        BLACK,
    );
    canvas
}

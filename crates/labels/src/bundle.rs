//! Bundle assembly: PNG files, one multi-page PDF and a ZIP of the PNGs

use crate::{
    extract_records, render, LabelConfig, LabelOptions, LabelRecord, Result, SourceFormat,
    Variant, UNKNOWN_SIZE,
};
use image::RgbImage;
use label_core::{encode_png, write_bundle, CoreError, TextRasterizer};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const PNG_DIR: &str = "png";
pub const PDF_NAME: &str = "labels_bundle.pdf";
pub const ZIP_NAME: &str = "labels_png.zip";

/// Files produced by one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleOutput {
    /// One PNG per label, in bundle order
    pub png_paths: Vec<PathBuf>,
    pub pdf_path: PathBuf,
    pub zip_path: PathBuf,
    /// Records extracted from the input, duplicates included
    pub record_count: usize,
}

/// File name (without extension) of a record's label
///
/// Path separators become `-` and spaces become `_`.
pub fn file_stem(record: &LabelRecord, variant: Variant) -> String {
    let sku = record.sku.trim();
    let stem = match variant {
        Variant::AltSku => {
            let size = record.size.as_deref().unwrap_or(UNKNOWN_SIZE).trim();
            format!("{sku}_{size}")
        }
        Variant::Standard | Variant::HotMarket => sku.to_string(),
    };

    let stem: String = stem
        .chars()
        .map(|c| match c {
            '/' | '\\' => '-',
            ' ' => '_',
            c => c,
        })
        .collect();

    if stem.is_empty() {
        format!("row-{}", record.row)
    } else {
        stem
    }
}

/// Extract, render and package every record of `input` into `out_dir`
///
/// The variant follows from `format` and `options.hot_market`. A record that
/// fails to render aborts the run before any file is written.
pub fn generate_labels_bundle<P, Q>(
    input: P,
    format: SourceFormat,
    options: &LabelOptions,
    out_dir: Q,
    config: &LabelConfig,
    rasterizer: &dyn TextRasterizer,
) -> Result<BundleOutput>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let records = extract_records(input, format)?;
    let variant = Variant::select(format, options.hot_market);
    bundle_records(&records, variant, options, out_dir, config, rasterizer)
}

/// Render `records` with one variant and package them into `out_dir`
pub fn bundle_records<Q: AsRef<Path>>(
    records: &[LabelRecord],
    variant: Variant,
    options: &LabelOptions,
    out_dir: Q,
    config: &LabelConfig,
    rasterizer: &dyn TextRasterizer,
) -> Result<BundleOutput> {
    let labels = render_all(records, variant, options, config, rasterizer)?;

    let out_dir = out_dir.as_ref();
    let png_dir = out_dir.join(PNG_DIR);
    fs::create_dir_all(&png_dir)?;

    let mut png_paths = Vec::with_capacity(labels.len());
    for (stem, image) in labels {
        let path = png_dir.join(format!("{stem}.png"));
        fs::write(&path, encode_png(&image)?)?;
        png_paths.push(path);
    }

    let pdf_path = out_dir.join(PDF_NAME);
    fs::write(&pdf_path, assemble_bundle(&png_paths, rasterizer)?)?;

    let zip_path = out_dir.join(ZIP_NAME);
    write_zip(&png_paths, &zip_path)?;

    log::info!(
        "bundled {} labels from {} records into {}",
        png_paths.len(),
        records.len(),
        out_dir.display()
    );

    Ok(BundleOutput {
        png_paths,
        pdf_path,
        zip_path,
        record_count: records.len(),
    })
}

/// Render every record, keeping one label per file stem
///
/// A repeated stem replaces the earlier label and moves to the end.
fn render_all(
    records: &[LabelRecord],
    variant: Variant,
    options: &LabelOptions,
    config: &LabelConfig,
    rasterizer: &dyn TextRasterizer,
) -> Result<Vec<(String, RgbImage)>> {
    let mut labels: Vec<(String, RgbImage)> = Vec::with_capacity(records.len());

    for record in records {
        let image = render(record, variant, options, config, rasterizer)?;
        let stem = file_stem(record, variant);

        if let Some(pos) = labels.iter().position(|(s, _)| *s == stem) {
            log::warn!("row {}: label '{stem}' replaces an earlier one", record.row);
            labels.remove(pos);
        }
        labels.push((stem, image));
    }

    Ok(labels)
}

/// Build one PDF from label images on disk, one page per file in order
///
/// Images are converted to RGB. No paths gives a single placeholder page.
pub fn assemble_bundle<P: AsRef<Path>>(
    paths: &[P],
    rasterizer: &dyn TextRasterizer,
) -> Result<Vec<u8>> {
    let images = paths
        .iter()
        .map(|p| {
            image::open(p.as_ref())
                .map(|img| img.to_rgb8())
                .map_err(CoreError::from)
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(write_bundle(&images, rasterizer)?)
}

/// Pack PNG files into a deflate ZIP under their file names
fn write_zip(paths: &[PathBuf], zip_path: &Path) -> Result<()> {
    let mut zip = ZipWriter::new(File::create(zip_path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in paths {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        zip.start_file(name, options)?;
        zip.write_all(&fs::read(path)?)?;
    }

    zip.finish()?;
    Ok(())
}

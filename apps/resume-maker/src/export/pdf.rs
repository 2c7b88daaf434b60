//! PDF assembly with `lopdf`.
//!
//! Each page band of the bitmap is embedded as its own DCT (JPEG) image
//! XObject, which keeps every image inside JPEG's 65535 px limit however long
//! the resume grows. No Info dictionary or timestamps are written, so
//! identical input gives identical bytes.

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

use crate::export::paginate::{PagePlan, PAGE_HEIGHT_PT, PAGE_WIDTH_PT};
use crate::export::ExportError;

const JPEG_QUALITY: u8 = 92;
const IMAGE_NAME: &str = "Im0";

fn encode_jpeg(bitmap: &RgbImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY).encode_image(bitmap)?;
    Ok(bytes)
}

/// Builds the PDF: one A4 page per slice of `plan`, each showing its band of `bitmap`.
pub fn assemble(bitmap: &RgbImage, plan: &PagePlan) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::with_capacity(plan.pages.len());
    for slice in &plan.pages {
        let band = imageops::crop_imm(bitmap, 0, slice.top, bitmap.width(), slice.height).to_image();
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => band.width() as i64,
                "Height" => band.height() as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            encode_jpeg(&band)?,
        ));

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        PAGE_WIDTH_PT.into(),
                        0.into(),
                        0.into(),
                        slice.placed_height.into(),
                        0.into(),
                        (PAGE_HEIGHT_PT - slice.placed_height).into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content
            .encode()
            .map_err(|e| ExportError::Pdf(format!("content stream: {e}")))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH_PT.into(), PAGE_HEIGHT_PT.into()],
            "Resources" => dictionary! {
                "XObject" => dictionary! { IMAGE_NAME => image_id },
            },
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| ExportError::Pdf(format!("write: {e}")))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::paginate::plan;
    use image::Rgb;

    #[test]
    fn test_assembled_pdf_has_planned_pages() {
        let bitmap = RgbImage::from_pixel(40, 150, Rgb([255, 255, 255]));
        let plan = plan(40, 150);
        assert_eq!(plan.page_count(), 3);
        let bytes = assemble(&bitmap, &plan).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let reloaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 3);
    }

    #[test]
    fn test_bitmap_taller_than_jpeg_limit_exports() {
        let bitmap = RgbImage::from_pixel(120, 70_000, Rgb([255, 255, 255]));
        let plan = plan(120, 70_000);
        assert!(plan.page_count() > 30);

        let bytes = assemble(&bitmap, &plan).unwrap();
        let reloaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), plan.page_count());
    }

    #[test]
    fn test_bands_are_encoded_as_jpeg() {
        let band = RgbImage::from_pixel(20, 20, Rgb([30, 41, 59]));
        let jpeg = encode_jpeg(&band).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_assembly_is_reproducible() {
        let bitmap = RgbImage::from_pixel(20, 20, Rgb([30, 41, 59]));
        let plan = plan(20, 20);
        let a = assemble(&bitmap, &plan).unwrap();
        let b = assemble(&bitmap, &plan).unwrap();
        assert_eq!(a, b);
    }
}

//! Image pipeline: resize uploaded property photos into fixed variants and
//! push them to object storage.
//!
//! Every source image yields three variants (thumb, medium, large),
//! cover-cropped to their target box and re-encoded as JPEG. Keys are
//! namespaced by property and a millisecond timestamp so repeated uploads
//! never collide.

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

use crate::store::{ObjectStore, StorageError};

/// JPEG quality used for every re-encode.
const JPEG_QUALITY: u8 = 85;

/// One target output size.
#[derive(Debug, Clone, Copy)]
pub struct Variant {
    pub width: u32,
    pub height: u32,
    pub suffix: &'static str,
}

/// The three variants generated per property image.
pub const VARIANTS: [Variant; 3] = [
    Variant {
        width: 300,
        height: 300,
        suffix: "thumb",
    },
    Variant {
        width: 800,
        height: 600,
        suffix: "medium",
    },
    Variant {
        width: 1920,
        height: 1080,
        suffix: "large",
    },
];

/// Bounding box for single-image uploads (fit-inside, no crop).
const SINGLE_MAX: (u32, u32) = (1920, 1080);

fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>, StorageError> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    // JPEG has no alpha channel; flatten first.
    img.to_rgb8().write_with_encoder(encoder)?;
    Ok(buf)
}

/// Cover-crop a source image to a variant's box and re-encode it.
pub fn encode_variant(source: &DynamicImage, variant: Variant) -> Result<Vec<u8>, StorageError> {
    let resized = source.resize_to_fill(
        variant.width,
        variant.height,
        image::imageops::FilterType::Lanczos3,
    );
    encode_jpeg(&resized)
}

/// Fit a source image inside the single-upload bounding box without
/// enlarging it, and re-encode.
pub fn encode_single(source: &DynamicImage) -> Result<Vec<u8>, StorageError> {
    let (max_w, max_h) = SINGLE_MAX;
    let resized = if source.width() > max_w || source.height() > max_h {
        source.resize(max_w, max_h, image::imageops::FilterType::Lanczos3)
    } else {
        source.clone()
    };
    encode_jpeg(&resized)
}

/// Object key for one variant of a property image.
pub fn property_image_key(property_id: &str, stamp_millis: i64, suffix: &str) -> String {
    format!("properties/{property_id}/{stamp_millis}-{suffix}.jpg")
}

/// Object key for a chat attachment, namespaced by conversation.
pub fn message_file_key(conversation_id: &str, stamp_millis: i64, file_name: &str) -> String {
    let sanitized = sanitize_file_name(file_name);
    format!("conversations/{conversation_id}/{stamp_millis}-{sanitized}")
}

/// Replace anything outside `[A-Za-z0-9.-]` with underscores so uploaded
/// names cannot escape their prefix or break URLs.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Run the full pipeline for one property photo: decode once, produce all
/// three variants, upload each.
///
/// All-or-nothing per source image: the first failing variant aborts and
/// surfaces as a storage error, so a property never ends up with a partial
/// variant set.
pub async fn upload_property_image(
    store: &ObjectStore,
    property_id: &str,
    bytes: &[u8],
) -> Result<Vec<String>, StorageError> {
    let source = image::load_from_memory(bytes)?;
    let stamp = epoch_millis();

    let mut urls = Vec::with_capacity(VARIANTS.len());
    for variant in VARIANTS {
        let encoded = encode_variant(&source, variant)?;
        let key = property_image_key(property_id, stamp, variant.suffix);
        let url = store.upload(&key, encoded, "image/jpeg").await?;
        urls.push(url);
    }
    Ok(urls)
}

/// Single-image path used by the generic upload endpoint: one fit-inside
/// re-encode under an arbitrary folder.
pub async fn upload_single(
    store: &ObjectStore,
    folder: &str,
    bytes: &[u8],
) -> Result<String, StorageError> {
    let source = image::load_from_memory(bytes)?;
    let encoded = encode_single(&source)?;
    let key = format!("{}/{}.jpg", folder.trim_matches('/'), epoch_millis());
    store.upload(&key, encoded, "image/jpeg").await
}

fn epoch_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            width,
            height,
            image::Rgb([120, 40, 200]),
        ))
    }

    #[test]
    fn variant_is_exactly_cover_cropped() {
        let src = test_image(1000, 400);
        for variant in VARIANTS {
            let bytes = encode_variant(&src, variant).expect("encode should succeed");
            let decoded = image::load_from_memory(&bytes).expect("decode should succeed");
            assert_eq!((decoded.width(), decoded.height()), (variant.width, variant.height));
        }
    }

    #[test]
    fn single_never_enlarges() {
        let src = test_image(640, 480);
        let bytes = encode_single(&src).expect("encode should succeed");
        let decoded = image::load_from_memory(&bytes).expect("decode should succeed");
        assert_eq!((decoded.width(), decoded.height()), (640, 480));
    }

    #[test]
    fn single_shrinks_oversized_input() {
        let src = test_image(4000, 3000);
        let bytes = encode_single(&src).expect("encode should succeed");
        let decoded = image::load_from_memory(&bytes).expect("decode should succeed");
        assert!(decoded.width() <= 1920 && decoded.height() <= 1080);
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(sanitize_file_name("../étage 2/plan.pdf"), "..__tage_2_plan.pdf");
        assert_eq!(sanitize_file_name("photo.jpg"), "photo.jpg");
        assert_eq!(sanitize_file_name("a b/c"), "a_b_c");
    }

    #[test]
    fn property_keys_carry_stamp_and_suffix() {
        let key = property_image_key("prop-1", 1700000000000, "thumb");
        assert_eq!(key, "properties/prop-1/1700000000000-thumb.jpg");
    }
}

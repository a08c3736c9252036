//! Document assembler: page bands + link annotations + metadata -> PDF bytes.
//!
//! Each page slice becomes one PDF page: the matching band is cropped out
//! of the capture raster, JPEG-encoded, embedded as an Image XObject with
//! a `DCTDecode` filter, and drawn top-anchored at full page width. The
//! overflow slice (when the page ceiling was hit) is taller than the page;
//! its band simply extends past the bottom of the page box and the viewer
//! clips it.
//!
//! Surviving link regions become `/Annots` entries on their resolved
//! pages. The remapper works in top-left page coordinates; PDF rectangles
//! are bottom-left origin, so the y axis is flipped here and only here.
//!
//! ## Why JPEG bands?
//! PDF has no native PNG path: pixels either go in raw (then get
//! flate-compressed) or as a JPEG stream the viewer decodes directly.
//! A rendered résumé is photographic-ish continuous tone (anti-aliased
//! text on white); JPEG at quality 90 is visually clean at a fraction of
//! the raw size, and keeps five-page artifacts comfortably mailable.

use crate::config::CaptureConfig;
use crate::error::CaptureError;
use crate::host::RasterImage;
use crate::output::ArtifactMetadata;
use crate::pipeline::links::LinkRegion;
use crate::pipeline::paginate::{PageSlice, ScaleMap};
use image::codecs::jpeg::JpegEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Producer string written into every artifact.
const PRODUCER: &str = concat!("cv2pdf ", env!("CARGO_PKG_VERSION"));

/// Application name recorded as the PDF creator.
const CREATOR: &str = "CV Builder";

/// Fixed filename suffix; the part before it is the sanitized user name.
const FILE_SUFFIX: &str = "_ATS_CV.pdf";

/// Stem used when the display name sanitizes away to nothing.
const FALLBACK_STEM: &str = "CV";

/// Build the final PDF byte stream.
pub fn assemble_pdf(
    raster: &RasterImage,
    scale: &ScaleMap,
    slices: &[PageSlice],
    links: &[LinkRegion],
    config: &CaptureConfig,
) -> Result<Vec<u8>, CaptureError> {
    let meta = build_metadata(&config.display_name);
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::with_capacity(slices.len());

    for slice in slices {
        let band = crop_band(raster, scale, slice);
        let image_id = doc.add_object(jpeg_xobject(&band, config.jpeg_quality)?);

        let content_id = doc.add_object(band_content(scale, slice)?);

        let annots: Vec<Object> = links
            .iter()
            .filter(|region| region.page == slice.index)
            .map(|region| Object::Reference(doc.add_object(link_annotation(region, scale))))
            .collect();

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(scale.page_width),
                Object::Real(scale.page_height),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
        };
        if !annots.is_empty() {
            page.set("Annots", annots);
        }

        kids.push(Object::Reference(doc.add_object(page)));
    }

    let kid_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => kid_count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(meta.title.as_str()),
        "Author" => Object::string_literal(meta.author.as_str()),
        "Subject" => Object::string_literal(meta.subject.as_str()),
        "Creator" => Object::string_literal(meta.creator.as_str()),
        "Producer" => Object::string_literal(meta.producer.as_str()),
    });
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| CaptureError::AssemblyFailed {
            detail: format!("PDF serialization failed: {e}"),
        })?;

    debug!(
        pages = slices.len(),
        annotations = links.len(),
        size = bytes.len(),
        "artifact assembled"
    );

    Ok(bytes)
}

/// Crop a slice's band out of the raster, clamped to the bitmap.
fn crop_band(raster: &RasterImage, scale: &ScaleMap, slice: &PageSlice) -> image::DynamicImage {
    let raster_height = raster.height();
    let y0 = (scale.units_to_raster(slice.offset).round() as u32).min(raster_height.saturating_sub(1));
    let h = (scale.units_to_raster(slice.height).round() as u32)
        .min(raster_height - y0)
        .max(1);
    raster.image.crop_imm(0, y0, raster.width(), h)
}

/// Encode a band as a JPEG Image XObject stream.
fn jpeg_xobject(band: &image::DynamicImage, quality: u8) -> Result<Stream, CaptureError> {
    let rgb = band.to_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality)
        .encode_image(&rgb)
        .map_err(|e| CaptureError::AssemblyFailed {
            detail: format!("band JPEG encoding failed: {e}"),
        })?;

    let mut stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => rgb.width() as i64,
            "Height" => rgb.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg,
    );
    // The JPEG data is already compressed; skip lopdf's flate pass.
    stream.allows_compression = false;
    Ok(stream)
}

/// Content stream drawing the band top-anchored at full page width.
fn band_content(scale: &ScaleMap, slice: &PageSlice) -> Result<Stream, CaptureError> {
    // PDF images paint into the unit square; `cm` stretches it to the band
    // size and positions its bottom-left corner. Top anchoring puts that
    // corner at page_height - band_height, which goes negative for the
    // overflow slice: the excess hangs below the page box and is clipped.
    let ty = scale.page_height - slice.height;
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(scale.page_width),
                    0.into(),
                    0.into(),
                    Object::Real(slice.height),
                    0.into(),
                    Object::Real(ty),
                ],
            ),
            Operation::new("Do", vec!["Im0".into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let encoded = content.encode().map_err(|e| CaptureError::AssemblyFailed {
        detail: format!("content stream encoding failed: {e}"),
    })?;
    Ok(Stream::new(dictionary! {}, encoded))
}

/// A URI link annotation, y-flipped into PDF bottom-left coordinates.
fn link_annotation(region: &LinkRegion, scale: &ScaleMap) -> lopdf::Dictionary {
    let y_bottom = scale.page_height - (region.y + region.height);
    let y_top = scale.page_height - region.y;
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => vec![
            Object::Real(region.x),
            Object::Real(y_bottom),
            Object::Real(region.x + region.width),
            Object::Real(y_top),
        ],
        "Border" => vec![0.into(), 0.into(), 0.into()],
        "A" => dictionary! {
            "Type" => "Action",
            "S" => "URI",
            "URI" => Object::string_literal(region.url.as_str()),
        },
    }
}

// ── Filename & metadata derivation ───────────────────────────────────────

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static RE_DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());

/// Reduce a display name to a filesystem- and ATS-safe stem: whitespace
/// runs become single underscores, everything outside `[A-Za-z0-9_]` is
/// stripped, and the result is capped at 50 characters.
pub fn sanitize_file_stem(display_name: &str) -> String {
    let underscored = RE_WHITESPACE.replace_all(display_name.trim(), "_");
    let cleaned = RE_DISALLOWED.replace_all(&underscored, "");
    let stem: String = cleaned.chars().take(50).collect();
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem
    }
}

/// Suggested artifact filename for a display name.
pub fn derive_file_name(display_name: &str) -> String {
    format!("{}{}", sanitize_file_stem(display_name), FILE_SUFFIX)
}

/// Metadata written into the Information dictionary.
pub fn build_metadata(display_name: &str) -> ArtifactMetadata {
    let stem = sanitize_file_stem(display_name);
    ArtifactMetadata {
        title: format!("{stem} - CV"),
        author: stem,
        subject: "CV - Resume".to_string(),
        creator: CREATOR.to_string(),
        producer: PRODUCER.to_string(),
    }
}

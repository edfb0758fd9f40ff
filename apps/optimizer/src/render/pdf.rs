//! PDF writer: materializes a `PaintProgram` with `lopdf`.
//!
//! Paint programs use a top-left origin; PDF user space starts bottom-left,
//! so every y is flipped against the page height here and nowhere else.
//! Text is written with the base-14 Helvetica faces in WinAnsiEncoding, using
//! the code table lopdf resolves for those font dictionaries.

use std::io::Write;

use chrono::Utc;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{
    content::{Content, Operation},
    dictionary,
    xref::XrefType,
    Dictionary, Document, Encoding, Object, ObjectId, Stream, StringFormat,
};
use thiserror::Error;

use crate::layout::font_metrics::FontFace;
use crate::layout::{DrawOp, PaintPage, PaintProgram};
use crate::render::image::ProfileImage;

const IMAGE_RESOURCE: &str = "Im1";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes `program` as PDF bytes. `image` is drawn wherever an image op appears.
pub fn write_pdf(program: &PaintProgram, image: Option<&ProfileImage>) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.4");
    doc.reference_table.cross_reference_type = XrefType::CrossReferenceTable;

    let id_pages = doc.new_object_id();

    // Every face shares one encoding, so any of them yields the code table.
    let text_font = font_dictionary(FontFace::Helvetica);
    let encoding = text_font.get_font_encoding(&doc)?;

    let mut fonts = Dictionary::new();
    for face in FontFace::ALL {
        let id_font = doc.add_object(font_dictionary(face));
        fonts.set(face.resource_name(), id_font);
    }

    let id_image = image.map(|img| embed_image(&mut doc, img)).transpose()?;

    let mut resources = dictionary! {
        "Font" => fonts,
    };
    if let Some(id_image) = id_image {
        resources.set("XObject", dictionary! { IMAGE_RESOURCE => id_image });
    }
    let id_resources = doc.add_object(resources);

    let mut kids: Vec<Object> = Vec::with_capacity(program.pages.len());
    for page in &program.pages {
        let operations = page_operations(page, program.page_height, id_image.is_some(), &encoding);
        let content = Content { operations };
        let id_content = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let id_page = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => id_pages,
            "Contents" => id_content,
            "Resources" => id_resources,
        });
        kids.push(id_page.into());
    }

    doc.set_object(
        id_pages,
        dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                program.page_width.into(),
                program.page_height.into(),
            ],
        },
    );

    let id_catalog = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => id_pages,
    });
    doc.trailer.set("Root", id_catalog);

    let date = Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();
    let title = program.file_name.trim_end_matches(".pdf").replace('_', " ");
    let id_info = doc.add_object(dictionary! {
        "Title" => Object::String(encode_text(&encoding, &title), StringFormat::Literal),
        "Producer" => Object::string_literal(concat!("optimizer ", env!("CARGO_PKG_VERSION"))),
        "CreationDate" => Object::string_literal(date.clone()),
        "ModDate" => Object::string_literal(date),
    });
    doc.trailer.set("Info", id_info);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Embeds the picture as a FlateDecode RGB image XObject.
fn embed_image(doc: &mut Document, image: &ProfileImage) -> Result<ObjectId, RenderError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&image.rgb)?;
    let compressed = encoder.finish()?;

    let image_dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => image.width as i64,
        "Height" => image.height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };
    Ok(doc.add_object(Stream::new(image_dict, compressed)))
}

fn font_dictionary(face: FontFace) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => face.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn page_operations(
    page: &PaintPage,
    page_height: f32,
    has_image: bool,
    encoding: &Encoding<'_>,
) -> Vec<Operation> {
    let flip = |y: f32| page_height - y;
    let mut ops = Vec::new();

    for op in &page.ops {
        match op {
            DrawOp::Text { x, y, text, font } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![font.face.resource_name().into(), font.size_pt.into()],
                ));
                ops.push(Operation::new("Td", vec![(*x).into(), flip(*y).into()]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_text(encoding, text), StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            DrawOp::Rule { x1, y1, x2, y2, width } => {
                ops.push(Operation::new("w", vec![(*width).into()]));
                ops.push(Operation::new("m", vec![(*x1).into(), flip(*y1).into()]));
                ops.push(Operation::new("l", vec![(*x2).into(), flip(*y2).into()]));
                ops.push(Operation::new("S", vec![]));
            }
            DrawOp::Image { x, y, width, height } => {
                if !has_image {
                    continue;
                }
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new(
                    "cm",
                    vec![
                        (*width).into(),
                        0.into(),
                        0.into(),
                        (*height).into(),
                        (*x).into(),
                        flip(*y + *height).into(),
                    ],
                ));
                ops.push(Operation::new("Do", vec![IMAGE_RESOURCE.into()]));
                ops.push(Operation::new("Q", vec![]));
            }
        }
    }
    ops
}

/// Encodes text for a single-byte font encoding. Unmappable characters become `?`.
fn encode_text(encoding: &Encoding<'_>, text: &str) -> Vec<u8> {
    let mut buf = [0u8; 4];
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        let code = Document::encode_text(encoding, c.encode_utf8(&mut buf));
        if code.is_empty() {
            bytes.push(b'?');
        } else {
            bytes.extend_from_slice(&code);
        }
    }
    bytes
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

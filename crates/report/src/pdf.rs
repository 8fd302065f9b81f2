use printpdf::image_crate::{DynamicImage, RgbImage};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point, Rect, Rgb,
};

use crate::layout::{DrawOp, Page, PAGE_HEIGHT, PAGE_WIDTH};
use crate::ReportError;

const LAYER: &str = "Layer 1";

fn pdf_err(e: impl std::fmt::Display) -> ReportError {
    ReportError::Pdf(e.to_string())
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

/// Layout works top-down, PDF bottom-up.
fn flip(y: f32) -> Mm {
    Mm(PAGE_HEIGHT - y)
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn draw(layer: &PdfLayerReference, op: &DrawOp, fonts: &Fonts) -> Result<(), ReportError> {
    match op {
        DrawOp::Text {
            x,
            y,
            size,
            text,
            color,
            bold,
        } => {
            layer.set_fill_color(rgb(*color));
            let font = if *bold { &fonts.bold } else { &fonts.regular };
            layer.use_text(text.as_str(), *size, Mm(*x), flip(*y), font);
        }
        DrawOp::Rect {
            x,
            y,
            w,
            h,
            fill,
            stroke,
        } => {
            let mode = match (fill, stroke) {
                (Some(_), Some(_)) => PaintMode::FillStroke,
                (Some(_), None) => PaintMode::Fill,
                (None, Some(_)) => PaintMode::Stroke,
                (None, None) => return Ok(()),
            };
            if let Some(c) = fill {
                layer.set_fill_color(rgb(*c));
            }
            if let Some(c) = stroke {
                layer.set_outline_color(rgb(*c));
                layer.set_outline_thickness(0.5);
            }
            let rect = Rect::new(Mm(*x), flip(y + h), Mm(x + w), flip(*y)).with_mode(mode);
            layer.add_rect(rect);
        }
        DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color,
        } => {
            layer.set_outline_color(rgb(*color));
            layer.set_outline_thickness(0.5);
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(*x1), flip(*y1)), false),
                    (Point::new(Mm(*x2), flip(*y2)), false),
                ],
                is_closed: false,
            });
        }
        DrawOp::Image { x, y, w, h, image } => {
            let buffer = RgbImage::from_raw(image.width, image.height, image.pixels.clone())
                .ok_or_else(|| {
                    ReportError::Pdf(format!(
                        "chart bitmap does not match {}x{}",
                        image.width, image.height
                    ))
                })?;
            let pdf_image = Image::from_dynamic_image(&DynamicImage::ImageRgb8(buffer));
            // Pick the dpi that makes the bitmap exactly `w` mm wide.
            let dpi = image.width as f32 * 25.4 / w;
            pdf_image.add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm(*x)),
                    translate_y: Some(flip(y + h)),
                    dpi: Some(dpi),
                    ..Default::default()
                },
            );
        }
    }
    Ok(())
}

/// Serialises laid-out pages into a PDF file image.
pub fn render_pdf(title: &str, pages: &[Page]) -> Result<Vec<u8>, ReportError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_err)?,
    };

    for (i, page) in pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (p, l) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
            doc.get_page(p).get_layer(l)
        };
        for op in &page.ops {
            draw(&layer, op, &fonts)?;
        }
    }

    doc.save_to_bytes().map_err(pdf_err)
}

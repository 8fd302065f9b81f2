use std::f64::consts::{FRAC_PI_2, TAU};

use kpi_engine::format_number;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use crate::spec::{stacked, ChartKind, ChartSpec, LineStyle, Rgb};
use crate::{ChartError, ChartRenderer, RasterImage};

const FONT: &str = "sans-serif";
const DASH_PARTS: usize = 6;
const DEFAULT_PALETTE: [Rgb; 6] = [
    Rgb::BLUE,
    Rgb::RED,
    Rgb::TEAL,
    Rgb::YELLOW,
    Rgb::PURPLE,
    Rgb::FORECAST_ORANGE,
];

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Draws charts into an in-memory RGB bitmap with plotters.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlottersRenderer;

impl ChartRenderer for PlottersRenderer {
    fn render(&self, spec: &ChartSpec, size: (u32, u32)) -> Result<RasterImage, ChartError> {
        spec.validate()?;
        let (width, height) = size;
        if width == 0 || height == 0 {
            return Err(ChartError::Backend(format!(
                "invalid canvas size {width}x{height}"
            )));
        }
        let mut image = RasterImage::blank(width, height);
        draw(&mut image.pixels, spec, size)?;
        debug!(title = %spec.title, width, height, "chart rendered");
        Ok(image)
    }
}

fn backend_err<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> ChartError {
    ChartError::Backend(err.to_string())
}

fn color(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

fn draw(buffer: &mut [u8], spec: &ChartSpec, size: (u32, u32)) -> Result<(), ChartError> {
    let root = BitMapBackend::with_buffer(buffer, size).into_drawing_area();
    root.fill(&WHITE).map_err(backend_err)?;
    match spec.kind {
        ChartKind::Pie { hole } => draw_pie(&root, spec, hole)?,
        _ => draw_cartesian(&root, spec)?,
    }
    root.present().map_err(backend_err)?;
    Ok(())
}

fn category_label(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

fn finite(points: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    points.into_iter().filter(|(_, y)| y.is_finite()).collect()
}

/// Splits a polyline into short alternating segments.
fn dashes(points: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    for pair in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        let at = |t: f64| (x0 + (x1 - x0) * t, y0 + (y1 - y0) * t);
        for k in (0..DASH_PARTS).step_by(2) {
            let a = k as f64 / DASH_PARTS as f64;
            let b = (k + 1) as f64 / DASH_PARTS as f64;
            out.push(vec![at(a), at(b)]);
        }
    }
    out
}

fn draw_cartesian(root: &Area<'_>, spec: &ChartSpec) -> Result<(), ChartError> {
    let n = spec.x_len().max(1);
    let (y_lo, y_hi) = spec.y_range();

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, (FONT, 22).into_font())
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), y_lo..y_hi)
        .map_err(backend_err)?;

    let labels = &spec.labels;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n.min(12))
        .x_label_formatter(&|x| category_label(labels, *x))
        .y_label_formatter(&|y| format_number(*y))
        .x_desc(spec.x_title.as_str())
        .y_desc(spec.y_title.as_str())
        .draw()
        .map_err(backend_err)?;

    match spec.kind {
        ChartKind::Line => {
            for s in &spec.series {
                let c = color(s.color);
                let points = finite(s.points());
                let anno = match s.style {
                    LineStyle::Solid => chart
                        .draw_series(LineSeries::new(points.clone(), c.stroke_width(2)))
                        .map_err(backend_err)?,
                    LineStyle::Dashed => chart
                        .draw_series(
                            dashes(&points)
                                .into_iter()
                                .map(|seg| PathElement::new(seg, c.stroke_width(2))),
                        )
                        .map_err(backend_err)?,
                };
                anno.label(s.name.as_str()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], c.stroke_width(2))
                });
                chart
                    .draw_series(points.iter().map(|p| Circle::new(*p, 3, c.filled())))
                    .map_err(backend_err)?;
            }
        }
        ChartKind::Area => {
            for s in &spec.series {
                let c = color(s.color);
                chart
                    .draw_series(
                        AreaSeries::new(finite(s.points()), 0.0, c.mix(0.3)).border_style(c),
                    )
                    .map_err(backend_err)?
                    .label(s.name.as_str())
                    .legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 10, y + 5)], c.filled())
                    });
            }
        }
        ChartKind::StackedArea => {
            let totals = stacked(&spec.series);
            // Tallest band first so lower bands stay visible.
            for (s, tops) in spec.series.iter().zip(totals.iter()).rev() {
                let c = color(s.color);
                let points: Vec<(f64, f64)> = tops
                    .iter()
                    .enumerate()
                    .map(|(i, v)| ((i + s.offset) as f64, *v))
                    .collect();
                chart
                    .draw_series(AreaSeries::new(finite(points), 0.0, c.mix(0.5)).border_style(c))
                    .map_err(backend_err)?
                    .label(s.name.as_str())
                    .legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 10, y + 5)], c.filled())
                    });
            }
        }
        ChartKind::Bar => {
            let width = 0.8 / spec.series.len().max(1) as f64;
            for (j, s) in spec.series.iter().enumerate() {
                let c = color(s.color);
                let left = -0.4 + width * j as f64;
                chart
                    .draw_series(finite(s.points()).into_iter().map(|(x, y)| {
                        Rectangle::new([(x + left, 0.0), (x + left + width, y)], c.filled())
                    }))
                    .map_err(backend_err)?
                    .label(s.name.as_str())
                    .legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 10, y + 5)], c.filled())
                    });
            }
        }
        ChartKind::Pie { .. } => {}
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(backend_err)?;
    Ok(())
}

fn slice_color(spec: &ChartSpec, i: usize) -> RGBColor {
    let c = spec
        .palette
        .get(i)
        .copied()
        .unwrap_or(DEFAULT_PALETTE[i % DEFAULT_PALETTE.len()]);
    color(c)
}

fn draw_pie(root: &Area<'_>, spec: &ChartSpec, hole: f64) -> Result<(), ChartError> {
    let (w, h) = root.dim_in_pixel();
    root.draw(&Text::new(spec.title.clone(), (12, 10), (FONT, 22).into_font()))
        .map_err(backend_err)?;

    let values: Vec<f64> = spec.series[0]
        .values
        .iter()
        .map(|v| if v.is_finite() { v.abs() } else { 0.0 })
        .collect();
    let total: f64 = values.iter().sum();

    let cx = w as i32 * 2 / 5;
    let cy = h as i32 / 2 + 16;
    let r = f64::from(w.min(h)) * 0.35;

    let mut angle = -FRAC_PI_2;
    for (i, v) in values.iter().enumerate() {
        if *v <= 0.0 {
            continue;
        }
        let sweep = v / total * TAU;
        let steps = ((sweep / TAU) * 120.0).ceil().max(2.0) as usize;
        let mut outline = vec![(cx, cy)];
        for s in 0..=steps {
            let a = angle + sweep * s as f64 / steps as f64;
            outline.push((
                cx + (r * a.cos()).round() as i32,
                cy + (r * a.sin()).round() as i32,
            ));
        }
        root.draw(&Polygon::new(outline, slice_color(spec, i).filled()))
            .map_err(backend_err)?;
        angle += sweep;
    }

    if hole > 0.0 {
        let inner = (r * hole.clamp(0.0, 0.95)).round() as i32;
        root.draw(&Circle::new((cx, cy), inner, WHITE.filled()))
            .map_err(backend_err)?;
    }

    let lx = (w as i32 * 4 / 5) - 40;
    for (i, label) in spec.labels.iter().enumerate() {
        let share = values.get(i).copied().unwrap_or(0.0) / total * 100.0;
        let y = 48 + i as i32 * 22;
        root.draw(&Rectangle::new(
            [(lx, y), (lx + 14, y + 14)],
            slice_color(spec, i).filled(),
        ))
        .map_err(backend_err)?;
        root.draw(&Text::new(
            format!("{label} ({share:.1}%)"),
            (lx + 20, y),
            (FONT, 14).into_font(),
        ))
        .map_err(backend_err)?;
    }
    Ok(())
}

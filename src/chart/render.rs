use std::io::Cursor;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::aggregate::Aggregate;
use super::palette::generate_palette;
use super::ChartKind;
use crate::error::RenderError;

const CHART_WIDTH: u32 = 900;
const CHART_HEIGHT: u32 = 600;

type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

// ---------------------------------------------------------------------------
// Rasterization: aggregate + chart kind → PNG bytes
// ---------------------------------------------------------------------------

/// Draw the chart on a white background and encode it as PNG, fully
/// in memory. Rasterization is fallible independently of the aggregate:
/// callers treat a failure here as a non-fatal, per-chart warning.
pub fn render_png(agg: &Aggregate, kind: ChartKind, title: &str) -> Result<Vec<u8>, RenderError> {
    if agg.is_empty() {
        return Err(RenderError::EmptyChart);
    }

    let mut buf = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
    {
        let root =
            BitMapBackend::with_buffer(&mut buf, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(RenderError::draw)?;

        match kind {
            ChartKind::Bar => draw_bar(&root, agg, title)?,
            ChartKind::Line => draw_line(&root, agg, title)?,
            ChartKind::Pie => draw_pie(&root, agg, title)?,
        }

        root.present().map_err(RenderError::draw)?;
    }

    let img = image::RgbImage::from_raw(CHART_WIDTH, CHART_HEIGHT, buf)
        .ok_or(RenderError::BufferSize)?;
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
    Ok(png)
}

fn y_range(agg: &Aggregate) -> std::ops::Range<f64> {
    let max = agg.values.iter().cloned().fold(0.0, f64::max);
    let top = if max <= 0.0 { 1.0 } else { max * 1.15 };
    0.0..top
}

/// Bar value label, integers shown without a decimal point.
fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

fn draw_bar(root: &Canvas<'_>, agg: &Aggregate, title: &str) -> Result<(), RenderError> {
    let n = agg.len();
    let labels: Vec<String> = agg.groups.iter().map(|g| g.to_string()).collect();

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(60)
        .build_cartesian_2d((0..n).into_segmented(), y_range(agg))
        .map_err(RenderError::draw)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(agg.group_label.as_str())
        .y_desc(agg.value_label.as_str())
        .x_label_formatter(&|seg| match seg {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .draw()
        .map_err(RenderError::draw)?;

    let fill = generate_palette(1)[0];
    chart
        .draw_series((0..n).map(|i| {
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), agg.values[i]),
                ],
                fill.filled(),
            );
            bar.set_margin(0, 0, 8, 8);
            bar
        }))
        .map_err(RenderError::draw)?;

    // inline data labels above each bar
    let label_style = TextStyle::from(("sans-serif", 16).into_font())
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart
        .draw_series(agg.values.iter().enumerate().map(|(i, &v)| {
            Text::new(
                format_value(v),
                (SegmentValue::CenterOf(i), v),
                label_style.clone(),
            )
        }))
        .map_err(RenderError::draw)?;

    Ok(())
}

fn draw_line(root: &Canvas<'_>, agg: &Aggregate, title: &str) -> Result<(), RenderError> {
    let n = agg.len();
    let labels: Vec<String> = agg.groups.iter().map(|g| g.to_string()).collect();
    let x_max = (n as i32 - 1).max(1);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(60)
        .build_cartesian_2d(0..x_max, y_range(agg))
        .map_err(RenderError::draw)?;

    chart
        .configure_mesh()
        .x_labels(n)
        .x_desc(agg.group_label.as_str())
        .y_desc(agg.value_label.as_str())
        .x_label_formatter(&|x| labels.get(*x as usize).cloned().unwrap_or_default())
        .draw()
        .map_err(RenderError::draw)?;

    let color = generate_palette(1)[0];
    let points: Vec<(i32, f64)> = agg
        .values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as i32, v))
        .collect();

    chart
        .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
        .map_err(RenderError::draw)?;
    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
        )
        .map_err(RenderError::draw)?;

    Ok(())
}

fn draw_pie(root: &Canvas<'_>, agg: &Aggregate, title: &str) -> Result<(), RenderError> {
    let root = root
        .titled(title, ("sans-serif", 28))
        .map_err(RenderError::draw)?;

    let (w, h) = root.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = f64::from(w.min(h)) * 0.35;
    let colors = generate_palette(agg.len());
    let labels: Vec<String> = agg.groups.iter().map(|g| g.to_string()).collect();

    let mut pie = Pie::new(&center, &radius, &agg.values, &colors, &labels);
    pie.label_style(("sans-serif", 18).into_font());
    root.draw(&pie).map_err(RenderError::draw)?;

    Ok(())
}

// The sociogram as a PNG picture.

use std::io::Cursor;

use log::debug;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::register_font;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use snafu::prelude::*;

use crate::socio::*;

type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type Point = (i32, i32);

const EDGE_COLOR: RGBColor = RGBColor(128, 128, 128);
const EDGE_WIDTH: u32 = 2;
const ARROW_LENGTH: f64 = 14.0;
const ARROW_HALF_WIDTH: f64 = 6.0;

// The labels are drawn with this font, whatever is installed on the system.
const LABEL_FONT: &str = "sans-serif";
static LABEL_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSans.ttf");

fn register_label_font() -> SocioResult<()> {
    register_font(LABEL_FONT, FontStyle::Normal, LABEL_FONT_DATA).map_err(|_| {
        SocioError::Drawing {
            message: "the embedded label font is invalid".to_string(),
        }
    })
}

pub fn render_sociogram_png(graph: &Sociogram, settings: &DiagramSettings) -> SocioResult<Vec<u8>> {
    settings.check()?;
    register_label_font()?;
    let (width, height) = settings.image_size;
    let positions = node_pixel_positions(graph, settings);
    debug!("render_sociogram_png: positions: {:?}", positions);

    let mut buffer = vec![255u8; width as usize * height as usize * 3];
    {
        let root: Canvas = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;
        draw_edges(&root, graph, &positions, settings)?;
        draw_nodes(&root, graph, &positions, settings)?;
        root.present().map_err(drawing_error)?;
    }
    encode_png(buffer, width, height)
}

/// The center of every node, in pixels. Nodes are kept away from the borders.
pub fn node_pixel_positions(graph: &Sociogram, settings: &DiagramSettings) -> Vec<Point> {
    let layout = spring_layout(graph.nodes.len(), &graph.edge_pairs(), &settings.layout());
    let (width, height) = settings.image_size;
    let margin = 2.0 * settings.node_radius as f64 + 10.0;
    let scale = |v: f64, size: u32| -> i32 {
        let usable = (size as f64 - 2.0 * margin).max(0.0);
        let offset = if usable > 0.0 { margin } else { size as f64 / 2.0 };
        (offset + (v + 1.0) / 2.0 * usable).round() as i32
    };
    layout
        .iter()
        .map(|(x, y)| (scale(*x, width), scale(*y, height)))
        .collect()
}

fn draw_edges(
    root: &Canvas<'_>,
    graph: &Sociogram,
    positions: &[Point],
    settings: &DiagramSettings,
) -> SocioResult<()> {
    let radius = settings.node_radius as f64;
    let style = ShapeStyle::from(&EDGE_COLOR).stroke_width(EDGE_WIDTH);
    for edge in graph.edges.iter() {
        let from = positions[edge.from];
        let to = positions[edge.to];
        if edge.is_loop() {
            // A small circle above the node.
            let loop_radius = (radius * 0.6).round() as i32;
            let center = (from.0, from.1 - settings.node_radius as i32);
            root.draw(&Circle::new(center, loop_radius, style))
                .map_err(drawing_error)?;
            continue;
        }
        if let Some((start, end, head)) = arrow(from, to, radius) {
            root.draw(&PathElement::new(vec![start, end], style))
                .map_err(drawing_error)?;
            root.draw(&Polygon::new(head.to_vec(), EDGE_COLOR.filled()))
                .map_err(drawing_error)?;
        }
    }
    Ok(())
}

fn draw_nodes(
    root: &Canvas<'_>,
    graph: &Sociogram,
    positions: &[Point],
    settings: &DiagramSettings,
) -> SocioResult<()> {
    let radius = settings.node_radius as i32;
    for (node, pos) in graph.nodes.iter().zip(positions.iter()) {
        let (r, g, b) = node.color.rgb();
        root.draw(&Circle::new(*pos, radius, RGBColor(r, g, b).filled()))
            .map_err(drawing_error)?;
        root.draw(&Circle::new(*pos, radius, ShapeStyle::from(&BLACK).stroke_width(1)))
            .map_err(drawing_error)?;
        let style = (LABEL_FONT, settings.font_size)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw(&Text::new(node.label(), *pos, style))
            .map_err(drawing_error)?;
    }
    Ok(())
}

/// The segment between the borders of two nodes, and the triangle of the arrow head
/// (tip first). None if the nodes overlap.
fn arrow(from: Point, to: Point, radius: f64) -> Option<(Point, Point, [Point; 3])> {
    let dx = (to.0 - from.0) as f64;
    let dy = (to.1 - from.1) as f64;
    let length = (dx * dx + dy * dy).sqrt();
    if length <= 2.0 * radius {
        return None;
    }
    let (ux, uy) = (dx / length, dy / length);
    let at = |p: Point, d: f64| (p.0 as f64 + ux * d, p.1 as f64 + uy * d);
    let start = at(from, radius);
    let tip = at(to, -radius);
    let base = (tip.0 - ux * ARROW_LENGTH, tip.1 - uy * ARROW_LENGTH);
    let left = (base.0 - uy * ARROW_HALF_WIDTH, base.1 + ux * ARROW_HALF_WIDTH);
    let right = (base.0 + uy * ARROW_HALF_WIDTH, base.1 - ux * ARROW_HALF_WIDTH);
    let px = |p: (f64, f64)| (p.0.round() as i32, p.1.round() as i32);
    Some((px(start), px(base), [px(tip), px(left), px(right)]))
}

fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> SocioResult<Vec<u8>> {
    let img = image::RgbImage::from_raw(width, height, buffer).context(ImageBufferSnafu {})?;
    let mut bytes = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut bytes, image::ImageOutputFormat::Png)
        .context(EncodingImageSnafu {})?;
    Ok(bytes.into_inner())
}

fn drawing_error<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> SocioError {
    SocioError::Drawing {
        message: e.to_string(),
    }
}

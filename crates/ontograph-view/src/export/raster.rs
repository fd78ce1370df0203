//! In-process rasterizer for PNG export.
//!
//! Draws straight into an RGBA buffer: Bresenham lines for edges, filled
//! discs for nodes and a 3x5 bitmap font for labels. No system fonts or
//! GPU are involved, so the output is identical on every machine.

use super::{ExportError, RenderOptions};
use image::{ImageFormat, Rgba, RgbaImage};
use ontograph_core::Position;
use ontograph_graph::{unique_pairs, OntologyGraph};
use std::io::Cursor;

const EDGE_COLOR: Rgba<u8> = Rgba([203, 213, 225, 255]);
const PIN_COLOR: Rgba<u8> = Rgba([17, 24, 39, 255]);
const LABEL_COLOR: Rgba<u8> = Rgba([31, 41, 55, 255]);
const FALLBACK_COLOR: Rgba<u8> = Rgba([148, 163, 184, 255]);

/// Glyph cells are scaled up by this factor.
const GLYPH_SCALE: i32 = 2;

/// Renders `view` and encodes it as PNG.
pub fn render_png(view: &OntologyGraph, options: &RenderOptions) -> Result<Vec<u8>, ExportError> {
    let image = rasterize(view, options)?;
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Renders `view` into an RGBA buffer of the configured size.
pub fn rasterize(view: &OntologyGraph, options: &RenderOptions) -> Result<RgbaImage, ExportError> {
    options.check_canvas()?;
    let transform = options.frame(view);
    let mut image = RgbaImage::from_pixel(
        options.width,
        options.height,
        parse_hex_color(&options.background).unwrap_or(Rgba([255, 255, 255, 255])),
    );

    for (a, b) in unique_pairs(view) {
        if let (Some(from), Some(to)) = (view.get(a), view.get(b)) {
            let from = transform.graph_to_screen(from.position);
            let to = transform.graph_to_screen(to.position);
            if let Some((from, to)) = clip_segment(from, to, &image) {
                draw_line(&mut image, to_pixel(from), to_pixel(to), EDGE_COLOR);
            }
        }
    }

    for node in view.nodes() {
        let center = transform.graph_to_screen(node.position);
        let r = node.radius(options.node_scale) * transform.k;
        let fill = parse_hex_color(node.entity_type.color()).unwrap_or(FALLBACK_COLOR);

        if node.pinned {
            fill_disc(&mut image, center, r + 2.0, PIN_COLOR);
        }
        fill_disc(&mut image, center, r, fill);

        if options.show_labels {
            let (x, y) = to_pixel(Position::new(center.x, center.y + r + 4.0));
            draw_text_centered(&mut image, x, y, &node.label, LABEL_COLOR);
        }
    }

    Ok(image)
}

/// Parses `#rrggbb` into an opaque color.
fn parse_hex_color(hex: &str) -> Option<Rgba<u8>> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Rgba([channel(0)?, channel(2)?, channel(4)?, 255]))
}

/// Screen coordinates further out than this are off the canvas anyway;
/// keeping them small leaves room for pen arithmetic in `i32`.
const PIXEL_LIMIT: f64 = (1 << 20) as f64;

fn to_pixel(p: Position) -> (i32, i32) {
    let clamp = |v: f64| v.round().clamp(-PIXEL_LIMIT, PIXEL_LIMIT) as i32;
    (clamp(p.x), clamp(p.y))
}

/// Clips the segment `from`-`to` to the canvas rectangle (Liang-Barsky).
/// Returns `None` when no part of it is on the canvas.
fn clip_segment(from: Position, to: Position, image: &RgbaImage) -> Option<(Position, Position)> {
    let max_x = f64::from(image.width()) - 1.0;
    let max_y = f64::from(image.height()) - 1.0;
    let dx = to.x - from.x;
    let dy = to.y - from.y;

    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    for (p, q) in [
        (-dx, from.x),
        (dx, max_x - from.x),
        (-dy, from.y),
        (dy, max_y - from.y),
    ] {
        if p == 0.0 {
            // parallel to this edge of the canvas
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        Position::new(from.x + t0 * dx, from.y + t0 * dy),
        Position::new(from.x + t1 * dx, from.y + t1 * dy),
    ))
}

fn set_pixel(image: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    if x < 0 || y < 0 || x >= image.width() as i32 || y >= image.height() as i32 {
        return;
    }
    image.put_pixel(x as u32, y as u32, color);
}

fn draw_line(image: &mut RgbaImage, from: (i32, i32), to: (i32, i32), color: Rgba<u8>) {
    let (mut x0, mut y0) = (i64::from(from.0), i64::from(from.1));
    let (x1, y1) = (i64::from(to.0), i64::from(to.1));
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        if let (Ok(x), Ok(y)) = (i32::try_from(x0), i32::try_from(y0)) {
            set_pixel(image, x, y, color);
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn fill_disc(image: &mut RgbaImage, center: Position, radius: f64, color: Rgba<u8>) {
    let radius = radius.max(0.5);
    let width = f64::from(image.width()) - 1.0;
    let height = f64::from(image.height()) - 1.0;
    if center.x + radius < 0.0
        || center.y + radius < 0.0
        || center.x - radius > width
        || center.y - radius > height
    {
        return;
    }
    let min_x = (center.x - radius).floor().max(0.0) as i32;
    let max_x = (center.x + radius).ceil().min(width) as i32;
    let min_y = (center.y - radius).floor().max(0.0) as i32;
    let max_y = (center.y + radius).ceil().min(height) as i32;
    let r2 = radius * radius;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = f64::from(x) - center.x;
            let dy = f64::from(y) - center.y;
            if dx * dx + dy * dy <= r2 {
                set_pixel(image, x, y, color);
            }
        }
    }
}

/// Draws `text` with its top edge at `y`, horizontally centered on `x`.
fn draw_text_centered(image: &mut RgbaImage, x: i32, y: i32, text: &str, color: Rgba<u8>) {
    let advance = 4 * GLYPH_SCALE;
    let count = i32::try_from(text.chars().count()).unwrap_or(i32::MAX);
    let mut pen = x.saturating_sub(count.saturating_mul(advance).saturating_sub(GLYPH_SCALE) / 2);

    for c in text.chars() {
        let rows = glyph(c);
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..3 {
                if bits & (0b100 >> col) == 0 {
                    continue;
                }
                let px = pen.saturating_add(col * GLYPH_SCALE);
                let py = y.saturating_add(row as i32 * GLYPH_SCALE);
                for oy in 0..GLYPH_SCALE {
                    for ox in 0..GLYPH_SCALE {
                        set_pixel(image, px.saturating_add(ox), py.saturating_add(oy), color);
                    }
                }
            }
        }
        pen = pen.saturating_add(advance);
    }
}

/// 3x5 glyph rows, most significant bit on the left. Lowercase letters
/// render as capitals; anything outside the table renders as `?`.
fn glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b110, 0b001, 0b010, 0b100, 0b111],
        '3' => [0b110, 0b001, 0b010, 0b001, 0b110],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b110, 0b001, 0b110],
        '6' => [0b011, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b110],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        ' ' => [0; 5],
        _ => [0b110, 0b001, 0b010, 0b000, 0b010],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontograph_core::{EntityType, Node};
    use ontograph_graph::GraphBuilder;

    fn view() -> OntologyGraph {
        let mut builder = GraphBuilder::new();
        builder.add_nodes(vec![
            Node::new("SHP-1", EntityType::Shipper, "Shipper").at(0.0, 0.0),
            Node::new("PRT-1", EntityType::Port, "Busan").at(400.0, 0.0),
        ]);
        builder.add_relation_pair("SHP-1", "PRT-1", "SHIPS_FROM", "ORIGIN_OF");
        builder.build().unwrap()
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#2563eb"), Some(Rgba([0x25, 0x63, 0xeb, 255])));
        assert_eq!(parse_hex_color("2563eb"), None);
        assert_eq!(parse_hex_color("#25z3eb"), None);
        assert_eq!(parse_hex_color("#fff"), None);
    }

    #[test]
    fn test_nodes_are_drawn_in_their_type_color() {
        let options = RenderOptions::default().with_size(600, 300);
        let image = rasterize(&view(), &options).unwrap();
        assert_eq!(image.dimensions(), (600, 300));

        let transform = options.frame(&view());
        let (x, y) = to_pixel(transform.graph_to_screen(Position::new(0.0, 0.0)));
        let expected = parse_hex_color(EntityType::Shipper.color()).unwrap();
        assert_eq!(*image.get_pixel(x as u32, y as u32), expected);

        // the background survives in the corner
        assert_eq!(*image.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_labels_add_ink() {
        let ink = |show_labels: bool| {
            let options = RenderOptions {
                show_labels,
                ..RenderOptions::default().with_size(600, 300)
            };
            rasterize(&view(), &options)
                .unwrap()
                .pixels()
                .filter(|p| **p == LABEL_COLOR)
                .count()
        };
        assert_eq!(ink(false), 0);
        assert!(ink(true) > 0);
    }

    #[test]
    fn test_png_bytes_decode() {
        let bytes = render_png(&view(), &RenderOptions::default().with_size(120, 80)).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (120, 80));
    }

    fn far_apart(from: Position, to: Position) -> OntologyGraph {
        let mut builder = GraphBuilder::new();
        builder.add_nodes(vec![
            Node::new("SHP-1", EntityType::Shipper, "Shipper").at(from.x, from.y),
            Node::new("PRT-1", EntityType::Port, "Busan").at(to.x, to.y),
        ]);
        builder.add_relation_pair("SHP-1", "PRT-1", "SHIPS_FROM", "ORIGIN_OF");
        builder.build().unwrap()
    }

    #[test]
    fn test_huge_coordinates_clip_to_canvas() {
        let view = far_apart(Position::new(-1e12, 0.0), Position::new(1e12, 0.0));
        let options = RenderOptions {
            show_labels: true,
            ..RenderOptions::default().with_size(600, 300)
        };
        let image = rasterize(&view, &options).unwrap();

        // both nodes are far off-canvas; the edge crosses it through the middle row
        let row: Vec<_> = (0..600).map(|x| *image.get_pixel(x, 150)).collect();
        assert!(row.iter().all(|p| *p == EDGE_COLOR));
        assert!(render_png(&view, &options).is_ok());
    }

    #[test]
    fn test_off_canvas_edge_is_skipped() {
        // the fit stops at the minimum zoom, so the far pair lands off-canvas
        let mut builder = GraphBuilder::new();
        builder.add_nodes(vec![
            Node::new("SHP-1", EntityType::Shipper, "Shipper").at(0.0, 0.0),
            Node::new("PRT-1", EntityType::Port, "Busan").at(1e10, 0.0),
            Node::new("PRT-2", EntityType::Port, "Pusan New").at(1e10, 1e3),
        ]);
        builder.add_relation_pair("SHP-1", "PRT-1", "SHIPS_FROM", "ORIGIN_OF");
        builder.add_relation_pair("PRT-1", "PRT-2", "CALLS_AT", "CALLED_BY");
        let view = builder.build().unwrap();

        let image = rasterize(&view, &RenderOptions::default().with_size(200, 100)).unwrap();
        assert_eq!(image.dimensions(), (200, 100));
    }

    #[test]
    fn test_clip_segment() {
        let image = RgbaImage::new(100, 50);

        let inside = clip_segment(Position::new(10.0, 10.0), Position::new(20.0, 30.0), &image);
        assert_eq!(
            inside,
            Some((Position::new(10.0, 10.0), Position::new(20.0, 30.0)))
        );

        let (from, to) =
            clip_segment(Position::new(-1e12, 25.0), Position::new(1e12, 25.0), &image).unwrap();
        assert_eq!((from.x.round(), from.y), (0.0, 25.0));
        assert_eq!((to.x.round(), to.y), (99.0, 25.0));

        assert_eq!(
            clip_segment(Position::new(-10.0, -10.0), Position::new(-1e9, 40.0), &image),
            None
        );
        assert_eq!(
            clip_segment(Position::new(0.0, 60.0), Position::new(1e9, 60.0), &image),
            None
        );
    }

    #[test]
    fn test_far_pixels_stay_in_range() {
        assert_eq!(to_pixel(Position::new(1e12, -1e12)), (1 << 20, -(1 << 20)));

        // deltas between extreme pixels do not overflow
        let mut image = RgbaImage::new(4, 4);
        draw_line(&mut image, (i32::MAX - 1, i32::MIN), (i32::MAX, i32::MIN + 1), EDGE_COLOR);
        assert!(image.pixels().all(|p| *p == Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn test_empty_view_is_blank_canvas() {
        let image = rasterize(&OntologyGraph::new(), &RenderOptions::default().with_size(10, 10)).unwrap();
        assert!(image.pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
    }
}

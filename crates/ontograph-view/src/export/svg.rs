use super::{ExportError, RenderOptions};
use ontograph_graph::{unique_pairs, OntologyGraph};

const EDGE_COLOR: &str = "#cbd5e1";
const NODE_STROKE: &str = "#ffffff";
const PIN_STROKE: &str = "#111827";
const LABEL_COLOR: &str = "#1f2937";

/// Draws edges as straight lines (one per connected pair) under
/// solid circles, with optional labels beneath each node.
pub fn render_svg(view: &OntologyGraph, options: &RenderOptions) -> Result<String, ExportError> {
    options.check_canvas()?;
    let transform = options.frame(view);

    let edges: Vec<String> = unique_pairs(view)
        .into_iter()
        .filter_map(|(a, b)| {
            let from = transform.graph_to_screen(view.get(a)?.position);
            let to = transform.graph_to_screen(view.get(b)?.position);
            Some(format!(
                r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1.5"/>"#,
                from.x, from.y, to.x, to.y, EDGE_COLOR
            ))
        })
        .collect();

    let mut nodes = Vec::new();
    for node in view.nodes() {
        let center = transform.graph_to_screen(node.position);
        let r = node.radius(options.node_scale) * transform.k;
        let (stroke, stroke_width) = if node.pinned {
            (PIN_STROKE, 2.5)
        } else {
            (NODE_STROKE, 1.5)
        };

        nodes.push(format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}" stroke="{}" stroke-width="{:.1}"><title>{}</title></circle>"#,
            center.x,
            center.y,
            r,
            node.entity_type.color(),
            stroke,
            stroke_width,
            escape_xml(&node.id)
        ));

        if options.show_labels {
            nodes.push(format!(
                r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" text-anchor="middle" fill="{}">{}</text>"#,
                center.x,
                center.y + r + 12.0,
                LABEL_COLOR,
                escape_xml(&node.label)
            ));
        }
    }

    Ok(wrap_svg(options, &format!("{}\n{}", edges.join("\n"), nodes.join("\n"))))
}

fn wrap_svg(options: &RenderOptions, content: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">
  <rect width="100%" height="100%" fill="{}"/>
  {}
</svg>"#,
        options.width,
        options.height,
        options.width,
        options.height,
        escape_xml(&options.background),
        content
    )
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

use canvas::{Canvas, MinimapScene, Scene};

const MINIMAP_MARGIN: f32 = 10.0;

/// Draw the canvas as a standalone SVG document of `width` x `height` pixels,
/// with the minimap in the top-right corner.
pub fn render_svg(canvas: &Canvas, width: f32, height: f32) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
    ));
    svg.push_str(&format!("<rect width=\"{width}\" height=\"{height}\" fill=\"#fafafa\"/>"));
    svg.push_str(&scene_svg(&canvas.scene()));

    let size = canvas.minimap.config().size;
    svg.push_str(&format!(
        "<g class=\"minimap\" transform=\"translate({:.2},{:.2})\">",
        width - size - MINIMAP_MARGIN,
        MINIMAP_MARGIN
    ));
    svg.push_str(&minimap_svg(&canvas.minimap_scene(), size));
    svg.push_str("</g></svg>");
    svg
}

fn scene_svg(scene: &Scene) -> String {
    let t = scene.transform;
    let mut svg = format!(
        "<g class=\"map\" transform=\"translate({:.2},{:.2}) scale({:.4})\">",
        t.x, t.y, t.k
    );
    for connector in &scene.connectors {
        svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"#9aa0a6\" stroke-width=\"{:.2}\"/>",
            connector.from.x(),
            connector.from.y(),
            connector.to.x(),
            connector.to.y(),
            connector.width
        ));
    }
    for node in &scene.nodes {
        let fill = match node.completed {
            Some(true) => "#c8e6c9",
            _ => "#ffffff",
        };
        let stroke = if node.selected { "#1a73e8" } else { "#5f6368" };
        svg.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"{:.2}\"/>",
            node.center.x(),
            node.center.y(),
            node.radius,
            node.radius / 14.0
        ));
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\">{}</text>",
            node.center.x(),
            node.center.y(),
            node.font_size,
            escape_xml(&node.label)
        ));
    }
    svg.push_str("</g>");
    svg
}

fn minimap_svg(minimap: &MinimapScene, size: f32) -> String {
    let mut svg = format!(
        "<rect width=\"{size}\" height=\"{size}\" fill=\"#ffffff\" fill-opacity=\"0.9\" stroke=\"#dadce0\"/>"
    );
    for (from, to) in &minimap.lines {
        svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"#bdc1c6\" stroke-width=\"0.5\"/>",
            from.x, from.y, to.x, to.y
        ));
    }
    for (_, dot) in &minimap.dots {
        svg.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"1.5\" fill=\"#5f6368\"/>",
            dot.x, dot.y
        ));
    }
    if let Some(rect) = minimap.viewport {
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"#1a73e8\"/>",
            rect.origin.x, rect.origin.y, rect.size.x, rect.size.y
        ));
    }
    svg
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

//! Static SVG preview of a scene and its derived edges.

use std::collections::HashMap;

use quick_xml::escape::escape;
use tracing::debug;

use crate::config::PreviewStyle;
use crate::edges::geometry::{node_size, DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH};
use crate::edges::origin::is_origin_entity_node;
use crate::edges::{Edge, Handle};
use crate::fonts::TextMeasure;
use crate::model::{Node, CAPABILITY_NODE_PREFIX};
use crate::scene::Scene;

const NODE_RADIUS: f32 = 8.0;
const ARROW_LENGTH: f32 = 12.0;
const ARROW_HALF_WIDTH: f32 = 6.0;
const CURVE_OFFSET: f32 = 60.0;
const STEP_OFFSET: f32 = 20.0;
const LABEL_PADDING_X: f32 = 6.0;
const LABEL_PADDING_Y: f32 = 3.0;

/// Node box in preview coordinates
#[derive(Debug, Clone, Copy)]
struct NodeBox {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl NodeBox {
    fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Midpoint of the side a handle sits on
    fn anchor(&self, handle: Handle) -> (f32, f32) {
        let (cx, cy) = self.center();
        match handle {
            Handle::Top => (cx, self.y),
            Handle::Right => (self.x + self.width, cy),
            Handle::Bottom => (cx, self.y + self.height),
            Handle::Left => (self.x, cy),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeClass {
    Component,
    Capability,
    OriginEntity,
}

fn classify(node_id: &str) -> NodeClass {
    if node_id.starts_with(CAPABILITY_NODE_PREFIX) {
        NodeClass::Capability
    } else if is_origin_entity_node(node_id) {
        NodeClass::OriginEntity
    } else {
        NodeClass::Component
    }
}

/// Geometry of one edge path, ready to stroke
struct EdgePath {
    d: String,
    end: (f32, f32),
    end_angle: f32,
    label_at: (f32, f32),
}

/// Render a scene to SVG. Returns the inner markup and the canvas size.
pub fn render_preview<M: TextMeasure>(
    scene: &Scene,
    edges: &[Edge],
    style: &PreviewStyle,
    measure: &mut M,
) -> (String, f32, f32) {
    if scene.nodes.is_empty() {
        return ("<g></g>".to_string(), 100.0, 50.0);
    }

    let (boxes, width, height) = place_nodes(&scene.nodes, style.padding);
    let capability_names: HashMap<String, &str> = scene
        .capabilities
        .iter()
        .filter_map(|c| Some((format!("{CAPABILITY_NODE_PREFIX}{}", c.id), c.name.as_deref()?)))
        .collect();

    let mut svg = String::new();
    let mut labels = String::new();

    // Edges behind nodes, labels on top of both
    for edge in edges {
        let (Some(from), Some(to)) = (boxes.get(edge.source.as_str()), boxes.get(edge.target.as_str()))
        else {
            debug!(edge = %edge.id, "skipping edge with an endpoint off canvas");
            continue;
        };
        let path = edge_path(edge, from, to);
        svg.push_str(&render_edge_stroke(edge, &path));
        labels.push_str(&render_edge_label(edge, &path, style, measure));
    }

    for node in &scene.nodes {
        if let Some(node_box) = boxes.get(node.id.as_str()) {
            let label = node
                .label
                .as_deref()
                .or_else(|| capability_names.get(&node.id).copied())
                .unwrap_or(&node.id);
            svg.push_str(&render_node(label, classify(&node.id), node_box, style));
        }
    }

    svg.push_str(&labels);
    (svg, width, height)
}

/// Wrap rendered markup into a standalone SVG document
pub fn wrap_document(inner: &str, width: f32, height: f32, background: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">
<rect width="{width}" height="{height}" fill="{background}"/>
{inner}
</svg>"#,
        width = width,
        height = height,
        background = escape(background),
        inner = inner,
    )
}

/// Shift nodes so the diagram starts at the padding offset
fn place_nodes(nodes: &[Node], padding: f32) -> (HashMap<&str, NodeBox>, f32, f32) {
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_right = f64::MIN;
    let mut max_bottom = f64::MIN;

    for node in nodes {
        let (w, h) = node_size(node);
        min_x = min_x.min(node.position.x);
        min_y = min_y.min(node.position.y);
        max_right = max_right.max(node.position.x + w);
        max_bottom = max_bottom.max(node.position.y + h);
    }

    let boxes = nodes
        .iter()
        .map(|node| {
            let (w, h) = node_size(node);
            let node_box = NodeBox {
                x: (node.position.x - min_x) as f32 + padding,
                y: (node.position.y - min_y) as f32 + padding,
                width: w as f32,
                height: h as f32,
            };
            (node.id.as_str(), node_box)
        })
        .collect();

    let width = (max_right - min_x) as f32 + padding * 2.0;
    let height = (max_bottom - min_y) as f32 + padding * 2.0;
    (
        boxes,
        width.max(DEFAULT_NODE_WIDTH as f32),
        height.max(DEFAULT_NODE_HEIGHT as f32),
    )
}

fn edge_path(edge: &Edge, from: &NodeBox, to: &NodeBox) -> EdgePath {
    let (x1, y1) = from.anchor(edge.source_handle);
    let (x2, y2) = to.anchor(edge.target_handle);
    let (sn_x, sn_y) = normal(edge.source_handle);
    let (tn_x, tn_y) = normal(edge.target_handle);
    let arrival = (-tn_y).atan2(-tn_x);

    match edge.edge_type.as_str() {
        "straight" => EdgePath {
            d: format!("M {:.2} {:.2} L {:.2} {:.2}", x1, y1, x2, y2),
            end: (x2, y2),
            end_angle: (y2 - y1).atan2(x2 - x1),
            label_at: ((x1 + x2) / 2.0, (y1 + y2) / 2.0),
        },
        "step" | "smoothstep" => {
            // Leave the source along its normal, cross over, enter the target along its normal
            let (ax, ay) = (x1 + sn_x * STEP_OFFSET, y1 + sn_y * STEP_OFFSET);
            let (bx, by) = (x2 + tn_x * STEP_OFFSET, y2 + tn_y * STEP_OFFSET);
            let (mx, my) = if sn_x != 0.0 {
                ((ax + bx) / 2.0, ay)
            } else {
                (ax, (ay + by) / 2.0)
            };
            let (nx, ny) = if sn_x != 0.0 { (mx, by) } else { (bx, my) };
            EdgePath {
                d: format!(
                    "M {:.2} {:.2} L {:.2} {:.2} L {:.2} {:.2} L {:.2} {:.2} L {:.2} {:.2} L {:.2} {:.2}",
                    x1, y1, ax, ay, mx, my, nx, ny, bx, by, x2, y2
                ),
                end: (x2, y2),
                end_angle: arrival,
                label_at: ((mx + nx) / 2.0, (my + ny) / 2.0),
            }
        }
        _ => {
            let (c1x, c1y) = (x1 + sn_x * CURVE_OFFSET, y1 + sn_y * CURVE_OFFSET);
            let (c2x, c2y) = (x2 + tn_x * CURVE_OFFSET, y2 + tn_y * CURVE_OFFSET);
            EdgePath {
                d: format!(
                    "M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}",
                    x1, y1, c1x, c1y, c2x, c2y, x2, y2
                ),
                end: (x2, y2),
                end_angle: arrival,
                label_at: (
                    (x1 + 3.0 * c1x + 3.0 * c2x + x2) / 8.0,
                    (y1 + 3.0 * c1y + 3.0 * c2y + y2) / 8.0,
                ),
            }
        }
    }
}

fn normal(handle: Handle) -> (f32, f32) {
    let (x, y) = handle.normal();
    (x as f32, y as f32)
}

fn render_edge_stroke(edge: &Edge, path: &EdgePath) -> String {
    let mut svg = String::new();
    let stroke = escape(&edge.style.stroke);
    let opacity = edge.style.opacity.unwrap_or(1.0);
    let dasharray = edge
        .style
        .stroke_dasharray
        .as_deref()
        .or(edge.animated.then_some("5,5"));
    let dash_attr = dasharray
        .map(|d| format!(r#" stroke-dasharray="{}""#, escape(d)))
        .unwrap_or_default();

    svg.push_str(&format!(r#"<g id="{}" opacity="{:.2}">"#, escape(&edge.id), opacity));
    if edge.animated {
        svg.push_str(&format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{:.1}"{}><animate attributeName="stroke-dashoffset" from="20" to="0" dur="1s" repeatCount="indefinite"/></path>"#,
            path.d, stroke, edge.style.stroke_width, dash_attr
        ));
    } else {
        svg.push_str(&format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{:.1}"{} />"#,
            path.d, stroke, edge.style.stroke_width, dash_attr
        ));
    }
    svg.push_str(&render_arrow_head(path.end, path.end_angle, &edge.marker_end.color));
    svg.push_str("</g>");
    svg
}

/// Closed arrow with its tip on the target handle
fn render_arrow_head((x, y): (f32, f32), angle: f32, color: &str) -> String {
    let cos = angle.cos();
    let sin = angle.sin();
    let p1 = (
        x - cos * ARROW_LENGTH + sin * ARROW_HALF_WIDTH,
        y - sin * ARROW_LENGTH - cos * ARROW_HALF_WIDTH,
    );
    let p2 = (
        x - cos * ARROW_LENGTH - sin * ARROW_HALF_WIDTH,
        y - sin * ARROW_LENGTH + cos * ARROW_HALF_WIDTH,
    );
    format!(
        r#"<polygon points="{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" fill="{}" />"#,
        x,
        y,
        p1.0,
        p1.1,
        p2.0,
        p2.1,
        escape(color)
    )
}

fn render_edge_label<M: TextMeasure>(
    edge: &Edge,
    path: &EdgePath,
    style: &PreviewStyle,
    measure: &mut M,
) -> String {
    if edge.label.is_empty() {
        return String::new();
    }

    let label_style = &edge.label_style;
    let (text_w, text_h) =
        measure.measure_label(&edge.label, label_style.font_size, label_style.font_weight);
    let width = text_w + LABEL_PADDING_X * 2.0;
    let height = text_h + LABEL_PADDING_Y * 2.0;
    let (lx, ly) = path.label_at;

    format!(
        r#"<g opacity="{:.2}"><rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="3" fill="{}" /><text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" font-weight="{}" fill="{}" text-anchor="middle" dominant-baseline="central">{}</text></g>"#,
        label_style.opacity.unwrap_or(1.0),
        lx - width / 2.0,
        ly - height / 2.0,
        width,
        height,
        escape(&edge.label_bg_style.fill),
        lx,
        ly,
        escape(&style.font_family),
        label_style.font_size,
        label_style.font_weight,
        escape(&label_style.fill),
        escape(&edge.label)
    )
}

fn render_node(label: &str, class: NodeClass, node_box: &NodeBox, style: &PreviewStyle) -> String {
    let fill = match class {
        NodeClass::Component => &style.component_fill,
        NodeClass::Capability => &style.capability_fill,
        NodeClass::OriginEntity => &style.origin_fill,
    };
    let dash_attr = if class == NodeClass::OriginEntity {
        r#" stroke-dasharray="4,2""#
    } else {
        ""
    };
    let (cx, cy) = node_box.center();

    format!(
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="{}" fill="{}" stroke="{}" stroke-width="1.5"{} /><text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" fill="{}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
        node_box.x,
        node_box.y,
        node_box.width,
        node_box.height,
        NODE_RADIUS,
        escape(fill),
        escape(&style.node_stroke),
        dash_attr,
        cx,
        cy,
        escape(&style.font_family),
        style.font_size,
        escape(&style.node_text),
        escape(label)
    )
}

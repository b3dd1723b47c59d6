//! Vector drawing tree produced by the product renderers.
//!
//! A [`Drawing`] is an ephemeral tree of primitives in millimetre units. The
//! product itself occupies `(0, 0)..(content_width, content_height)`; the
//! [`Padding`] around it holds dimension call-outs. [`Drawing::to_svg`]
//! serializes the tree into standalone SVG markup sized to its natural aspect
//! ratio, which is what both the live preview and the rasterizer consume.

use std::fmt::Write;

use crate::geometry::{Color, to_hex};

// ============================================================================
// Bounds & Padding
// ============================================================================

/// An axis-aligned rectangle in drawing units (millimetres).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a rectangle at the origin with the given size.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Returns the right edge coordinate (x + width).
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge coordinate (y + height).
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Shrinks the rectangle by `amount` on every side.
    ///
    /// The inset is capped so the result never has a negative size.
    pub fn inset(&self, amount: f32) -> Self {
        let dx = amount.min(self.width / 2.0).max(0.0);
        let dy = amount.min(self.height / 2.0).max(0.0);
        Self::new(self.x + dx, self.y + dy, self.width - 2.0 * dx, self.height - 2.0 * dy)
    }
}

/// Space reserved around the product for dimension labels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Total padding along the x axis.
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Total padding along the y axis.
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

// ============================================================================
// Styles
// ============================================================================

/// How a closed shape is filled.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    None,
    Solid(Color),
    /// Reference to a [`LinearGradient`] registered on the drawing.
    Gradient(String),
}

/// Outline of a shape or a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    /// Dash and gap lengths; `None` draws a solid line.
    pub dash: Option<(f32, f32)>,
}

impl Stroke {
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Color, width: f32, dash: f32) -> Self {
        Self {
            color,
            width,
            dash: Some((dash, dash * 0.6)),
        }
    }
}

/// Fill plus optional outline.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub fill: Paint,
    pub stroke: Option<Stroke>,
}

impl Style {
    pub fn filled(color: Color) -> Self {
        Self {
            fill: Paint::Solid(color),
            stroke: None,
        }
    }

    pub fn outlined(stroke: Stroke) -> Self {
        Self {
            fill: Paint::None,
            stroke: Some(stroke),
        }
    }

    pub fn gradient(id: impl Into<String>) -> Self {
        Self {
            fill: Paint::Gradient(id.into()),
            stroke: None,
        }
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }
}

/// Horizontal alignment of a text label relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    Start,
    #[default]
    Middle,
    End,
}

impl Anchor {
    fn as_svg(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

// ============================================================================
// Elements
// ============================================================================

/// A single vector primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Rect {
        bounds: Bounds,
        style: Style,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        stroke: Stroke,
    },
    Polyline {
        points: Vec<(f32, f32)>,
        stroke: Stroke,
    },
    Polygon {
        points: Vec<(f32, f32)>,
        style: Style,
    },
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        style: Style,
    },
    Text {
        x: f32,
        y: f32,
        content: String,
        size: f32,
        anchor: Anchor,
        /// Rotation in degrees around `(x, y)`.
        rotate: f32,
        color: Color,
    },
    Group {
        class: &'static str,
        children: Vec<Element>,
    },
}

impl Element {
    pub fn rect(bounds: Bounds, style: Style) -> Self {
        Self::Rect { bounds, style }
    }

    pub fn line(from: (f32, f32), to: (f32, f32), stroke: Stroke) -> Self {
        Self::Line { from, to, stroke }
    }

    pub fn text(x: f32, y: f32, content: impl Into<String>, size: f32, color: Color) -> Self {
        Self::Text {
            x,
            y,
            content: content.into(),
            size,
            anchor: Anchor::Middle,
            rotate: 0.0,
            color,
        }
    }

    pub fn group(class: &'static str, children: Vec<Element>) -> Self {
        Self::Group { class, children }
    }

    /// Number of primitives in this element, counting group members.
    pub fn primitive_count(&self) -> usize {
        match self {
            Element::Group { children, .. } => children.iter().map(Element::primitive_count).sum(),
            _ => 1,
        }
    }
}

// ============================================================================
// Gradients
// ============================================================================

/// A linear gradient definition, referenced by [`Paint::Gradient`].
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub id: String,
    /// `(offset in 0..=1, colour)` pairs.
    pub stops: Vec<(f32, Color)>,
    /// Top-to-bottom when true, left-to-right otherwise.
    pub vertical: bool,
}

// ============================================================================
// Drawing
// ============================================================================

/// A complete rendered drawing for one product configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub content_width: f32,
    pub content_height: f32,
    pub padding: Padding,
    pub gradients: Vec<LinearGradient>,
    pub elements: Vec<Element>,
}

impl Drawing {
    /// Creates an empty drawing for a product of the given size.
    pub fn new(content_width: f32, content_height: f32, padding: Padding) -> Self {
        Self {
            content_width,
            content_height,
            padding,
            gradients: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// The full extent of the drawing: content plus label padding.
    pub fn view_box(&self) -> Bounds {
        Bounds::new(
            -self.padding.left,
            -self.padding.top,
            self.content_width + self.padding.horizontal(),
            self.content_height + self.padding.vertical(),
        )
    }

    /// Width over height of the full extent.
    pub fn aspect_ratio(&self) -> f32 {
        let vb = self.view_box();
        vb.width / vb.height
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn extend(&mut self, elements: impl IntoIterator<Item = Element>) {
        self.elements.extend(elements);
    }

    pub fn add_gradient(&mut self, gradient: LinearGradient) {
        self.gradients.push(gradient);
    }

    /// Total number of primitives, counting group members.
    pub fn primitive_count(&self) -> usize {
        self.elements.iter().map(Element::primitive_count).sum()
    }

    /// Returns true if nothing would be drawn.
    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }

    /// Returns true if the drawing has something to draw inside a finite,
    /// non-degenerate view box.
    pub fn is_renderable(&self) -> bool {
        let vb = self.view_box();
        !self.is_empty()
            && [vb.x, vb.y, vb.width, vb.height].iter().all(|v| v.is_finite())
            && vb.width > 0.0
            && vb.height > 0.0
    }

    /// Serializes the drawing to standalone SVG markup.
    pub fn to_svg(&self) -> String {
        let vb = self.view_box();
        let mut out = String::with_capacity(256 + self.primitive_count() * 96);

        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="{x} {y} {w} {h}" font-family="Helvetica, Arial, sans-serif">"#,
            x = num(vb.x),
            y = num(vb.y),
            w = num(vb.width),
            h = num(vb.height),
        );

        if !self.gradients.is_empty() {
            out.push_str("<defs>");
            for gradient in &self.gradients {
                write_gradient(&mut out, gradient);
            }
            out.push_str("</defs>");
        }

        for element in &self.elements {
            write_element(&mut out, element);
        }

        out.push_str("</svg>");
        out
    }
}

// ============================================================================
// SVG Serialization
// ============================================================================

/// Formats a coordinate with at most two decimals and no trailing zeros.
fn num(value: f32) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" { "0".to_string() } else { text.to_string() }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn points_attr(points: &[(f32, f32)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{},{}", num(*x), num(*y)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn paint_attr(paint: &Paint) -> String {
    match paint {
        Paint::None => "none".to_string(),
        Paint::Solid(color) => to_hex(*color),
        Paint::Gradient(id) => format!("url(#{})", escape(id)),
    }
}

fn write_stroke(out: &mut String, stroke: &Stroke) {
    let _ = write!(
        out,
        r#" stroke="{}" stroke-width="{}""#,
        to_hex(stroke.color),
        num(stroke.width)
    );
    if let Some((dash, gap)) = stroke.dash {
        let _ = write!(out, r#" stroke-dasharray="{} {}""#, num(dash), num(gap));
    }
}

fn write_style(out: &mut String, style: &Style) {
    let _ = write!(out, r#" fill="{}""#, paint_attr(&style.fill));
    if let Some(stroke) = &style.stroke {
        write_stroke(out, stroke);
    }
}

fn write_gradient(out: &mut String, gradient: &LinearGradient) {
    let (x2, y2) = if gradient.vertical { (0, 1) } else { (1, 0) };
    let _ = write!(
        out,
        r#"<linearGradient id="{}" x1="0" y1="0" x2="{}" y2="{}">"#,
        escape(&gradient.id),
        x2,
        y2
    );
    for (offset, color) in &gradient.stops {
        let _ = write!(
            out,
            r#"<stop offset="{}" stop-color="{}"/>"#,
            num(offset.clamp(0.0, 1.0)),
            to_hex(*color)
        );
    }
    out.push_str("</linearGradient>");
}

fn write_element(out: &mut String, element: &Element) {
    match element {
        Element::Rect { bounds, style } => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                num(bounds.x),
                num(bounds.y),
                num(bounds.width.max(0.0)),
                num(bounds.height.max(0.0))
            );
            write_style(out, style);
            out.push_str("/>");
        }
        Element::Line { from, to, stroke } => {
            let _ = write!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
                num(from.0),
                num(from.1),
                num(to.0),
                num(to.1)
            );
            write_stroke(out, stroke);
            out.push_str("/>");
        }
        Element::Polyline { points, stroke } => {
            let _ = write!(out, r#"<polyline points="{}" fill="none""#, points_attr(points));
            write_stroke(out, stroke);
            out.push_str("/>");
        }
        Element::Polygon { points, style } => {
            let _ = write!(out, r#"<polygon points="{}""#, points_attr(points));
            write_style(out, style);
            out.push_str("/>");
        }
        Element::Circle { cx, cy, r, style } => {
            let _ = write!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}""#,
                num(*cx),
                num(*cy),
                num(r.max(0.0))
            );
            write_style(out, style);
            out.push_str("/>");
        }
        Element::Text {
            x,
            y,
            content,
            size,
            anchor,
            rotate,
            color,
        } => {
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" font-size="{}" text-anchor="{}" fill="{}""#,
                num(*x),
                num(*y),
                num(*size),
                anchor.as_svg(),
                to_hex(*color)
            );
            if *rotate != 0.0 {
                let _ = write!(out, r#" transform="rotate({} {} {})""#, num(*rotate), num(*x), num(*y));
            }
            let _ = write!(out, ">{}</text>", escape(content));
        }
        Element::Group { class, children } => {
            let _ = write!(out, r#"<g class="{}">"#, escape(class));
            for child in children {
                write_element(out, child);
            }
            out.push_str("</g>");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Color = Color::new(0, 0, 0);

    #[test]
    fn bounds_edges_and_inset() {
        let b = Bounds::new(10.0, 20.0, 100.0, 200.0);
        assert_eq!(b.right(), 110.0);
        assert_eq!(b.bottom(), 220.0);
        assert_eq!(b.center_x(), 60.0);
        assert_eq!(b.inset(10.0), Bounds::new(20.0, 30.0, 80.0, 180.0));
        // Over-inset collapses to the centre instead of going negative.
        let collapsed = b.inset(80.0);
        assert_eq!(collapsed.width, 0.0);
        assert!(collapsed.height > 0.0);
    }

    #[test]
    fn view_box_includes_padding() {
        let drawing = Drawing::new(
            1200.0,
            1500.0,
            Padding {
                top: 10.0,
                right: 20.0,
                bottom: 30.0,
                left: 40.0,
            },
        );
        assert_eq!(drawing.view_box(), Bounds::new(-40.0, -10.0, 1260.0, 1540.0));
    }

    #[test]
    fn empty_drawing_is_not_renderable() {
        let drawing = Drawing::new(100.0, 100.0, Padding::default());
        assert!(drawing.is_empty());
        assert!(!drawing.is_renderable());
    }

    #[test]
    fn group_counts_children() {
        let mut drawing = Drawing::new(100.0, 100.0, Padding::default());
        drawing.push(Element::group(
            "frame",
            vec![
                Element::rect(Bounds::from_size(10.0, 10.0), Style::filled(BLACK)),
                Element::line((0.0, 0.0), (1.0, 1.0), Stroke::solid(BLACK, 1.0)),
            ],
        ));
        assert_eq!(drawing.primitive_count(), 2);
        assert!(drawing.is_renderable());
    }

    #[test]
    fn svg_serialization() {
        let mut drawing = Drawing::new(100.0, 50.0, Padding::uniform(5.0));
        drawing.add_gradient(LinearGradient {
            id: "slat".into(),
            stops: vec![(0.0, Color::new(255, 255, 255)), (1.0, BLACK)],
            vertical: true,
        });
        drawing.push(Element::rect(
            Bounds::from_size(100.0, 50.0),
            Style::gradient("slat").with_stroke(Stroke::dashed(BLACK, 2.0, 10.0)),
        ));
        drawing.push(Element::text(50.0, 25.0, "A & B", 12.5, BLACK));

        let svg = drawing.to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="-5 -5 110 60""#));
        assert!(svg.contains(r#"<linearGradient id="slat" x1="0" y1="0" x2="0" y2="1">"#));
        assert!(svg.contains(r#"fill="url(#slat)""#));
        assert!(svg.contains(r#"stroke-dasharray="10 6""#));
        assert!(svg.contains(r#"font-size="12.5""#));
        assert!(svg.contains("A &amp; B"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn numbers_are_compact() {
        assert_eq!(num(1200.0), "1200");
        assert_eq!(num(0.126), "0.13");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(f32::INFINITY), "0");
    }
}

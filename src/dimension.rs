//! Dimension call-outs and their placement around a drawing.
//!
//! Each edge of a drawing owns a [`DimensionStack`]. Call-outs are pushed in
//! groups (for example, the column widths of one grid row). Every group that
//! still has something new to say is placed on the next tier outward from the
//! edge, so rows never overlap; spans already labelled by an earlier group are
//! dropped, and a group left with nothing to label does not consume a tier.
//! Within one group, segments of the same length are drawn but only the
//! first carries a label.

use tracing::trace;

use crate::drawing::{Anchor, Bounds, Element, Padding, Stroke};
use crate::geometry::{Color, format_mm};

// ============================================================================
// Typography
// ============================================================================

/// Text and line metrics derived from the size of the product being drawn.
///
/// Everything is expressed in drawing units, so labels keep the same
/// apparent size whatever the product dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Typography {
    pub font_size: f32,
    /// Outline width for product edges.
    pub stroke: f32,
    /// Width of dimension and glyph lines.
    pub thin: f32,
    /// Distance from the edge to the first tier.
    pub margin: f32,
    /// Distance between consecutive tiers.
    pub tier_step: f32,
    pub ink: Color,
}

impl Typography {
    pub fn for_extent(width: f32, height: f32) -> Self {
        let longest = width.max(height);
        let font_size = (longest * 0.04).clamp(24.0, 110.0);
        let stroke = (longest * 0.003).clamp(1.5, 8.0);
        Self {
            font_size,
            stroke,
            thin: stroke * 0.5,
            margin: font_size * 1.6,
            tier_step: font_size * 1.9,
            ink: Color::new(40, 40, 40),
        }
    }
}

// ============================================================================
// Spans
// ============================================================================

/// Which side of the product a call-out stack grows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    fn is_horizontal(self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom)
    }
}

/// A measured interval along one axis of the drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: f32,
    pub end: f32,
    /// Length printed on the label, in millimetres.
    pub value: f32,
}

impl Span {
    /// A span labelled with its own drawn length.
    pub fn new(start: f32, end: f32) -> Self {
        Self {
            start,
            end,
            value: end - start,
        }
    }

    /// A span labelled with an explicit measurement.
    pub fn with_value(start: f32, end: f32, value: f32) -> Self {
        Self { start, end, value }
    }

    fn key(&self) -> (i64, i64) {
        ((self.start * 10.0).round() as i64, (self.end * 10.0).round() as i64)
    }

    /// The printed length, as compared between segments.
    fn label_key(&self) -> i64 {
        self.value.round() as i64
    }

    fn is_drawable(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.end > self.start
    }
}

/// A span assigned to a tier on a given edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedDimension {
    pub edge: Edge,
    pub tier: usize,
    pub span: Span,
    /// False when an earlier segment of the same group already shows this length.
    pub labelled: bool,
}

// ============================================================================
// DimensionStack
// ============================================================================

/// Tiered call-outs on one edge of a drawing.
#[derive(Debug, Clone)]
pub struct DimensionStack {
    edge: Edge,
    placed: Vec<PlacedDimension>,
    seen: Vec<(i64, i64)>,
    tiers: usize,
}

impl DimensionStack {
    pub fn new(edge: Edge) -> Self {
        Self {
            edge,
            placed: Vec::new(),
            seen: Vec::new(),
            tiers: 0,
        }
    }

    /// Places the segments of one chained measurement on the next free tier.
    ///
    /// Returns the tier used, or `None` if every span in the group was a
    /// duplicate (or degenerate) and nothing was placed. Segments repeating a
    /// length already shown in the group are drawn unlabelled.
    pub fn push_group(&mut self, spans: impl IntoIterator<Item = Span>) -> Option<usize> {
        self.place(spans, true)
    }

    /// Places independent measurements side by side on the next free tier.
    ///
    /// Unlike [`push_group`](Self::push_group), every span keeps its label
    /// even when two of them have the same length.
    pub fn push_side_by_side(&mut self, spans: impl IntoIterator<Item = Span>) -> Option<usize> {
        self.place(spans, false)
    }

    fn place(&mut self, spans: impl IntoIterator<Item = Span>, dedup_lengths: bool) -> Option<usize> {
        let tier = self.tiers;
        let before = self.placed.len();
        let mut lengths: Vec<i64> = Vec::new();

        for span in spans {
            if !span.is_drawable() {
                continue;
            }
            let key = span.key();
            if self.seen.contains(&key) {
                trace!(edge = ?self.edge, start = span.start, end = span.end, "skipping duplicate span");
                continue;
            }
            self.seen.push(key);
            let labelled = !(dedup_lengths && lengths.contains(&span.label_key()));
            if labelled {
                lengths.push(span.label_key());
            } else {
                trace!(edge = ?self.edge, value = span.value, "length already labelled in group");
            }
            self.placed.push(PlacedDimension {
                edge: self.edge,
                tier,
                span,
                labelled,
            });
        }

        if self.placed.len() == before {
            None
        } else {
            self.tiers += 1;
            Some(tier)
        }
    }

    /// Places a single span on its own tier.
    pub fn push(&mut self, span: Span) -> Option<usize> {
        self.push_group([span])
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    /// Number of tiers in use.
    pub fn tiers(&self) -> usize {
        self.tiers
    }

    pub fn placed(&self) -> &[PlacedDimension] {
        &self.placed
    }

    /// Distance from the edge needed to fit every tier and its labels.
    pub fn extent(&self, typo: &Typography) -> f32 {
        if self.tiers == 0 {
            typo.font_size * 0.8
        } else {
            typo.margin + (self.tiers - 1) as f32 * typo.tier_step + typo.font_size * 1.4
        }
    }

    /// Distance of a tier's dimension line from the edge.
    pub fn tier_offset(typo: &Typography, tier: usize) -> f32 {
        typo.margin + tier as f32 * typo.tier_step
    }

    /// Produces lines, ticks, extension lines and labels for every span.
    pub fn render(&self, typo: &Typography, content: Bounds) -> Vec<Element> {
        self.placed
            .iter()
            .flat_map(|placed| render_dimension(placed, typo, content))
            .collect()
    }
}

fn render_dimension(placed: &PlacedDimension, typo: &Typography, content: Bounds) -> Vec<Element> {
    let offset = DimensionStack::tier_offset(typo, placed.tier);
    let stroke = Stroke::solid(typo.ink, typo.thin);
    let tick = typo.font_size * 0.25;
    let gap = typo.font_size * 0.2;
    let Span { start, end, value } = placed.span;
    let mid = (start + end) / 2.0;
    let label = format_mm(value);

    let mut elements = if placed.edge.is_horizontal() {
        let (y, edge_y, toward) = match placed.edge {
            Edge::Top => (content.y - offset, content.y, -1.0),
            _ => (content.bottom() + offset, content.bottom(), 1.0),
        };
        vec![
            Element::line((start, edge_y + toward * gap), (start, y + toward * tick), stroke),
            Element::line((end, edge_y + toward * gap), (end, y + toward * tick), stroke),
            Element::line((start, y), (end, y), stroke),
            Element::line((start - tick, y + tick), (start + tick, y - tick), stroke),
            Element::line((end - tick, y + tick), (end + tick, y - tick), stroke),
            Element::Text {
                x: mid,
                y: y - typo.font_size * 0.3,
                content: label,
                size: typo.font_size,
                anchor: Anchor::Middle,
                rotate: 0.0,
                color: typo.ink,
            },
        ]
    } else {
        let (x, edge_x, toward) = match placed.edge {
            Edge::Left => (content.x - offset, content.x, -1.0),
            _ => (content.right() + offset, content.right(), 1.0),
        };
        vec![
            Element::line((edge_x + toward * gap, start), (x + toward * tick, start), stroke),
            Element::line((edge_x + toward * gap, end), (x + toward * tick, end), stroke),
            Element::line((x, start), (x, end), stroke),
            Element::line((x - tick, start + tick), (x + tick, start - tick), stroke),
            Element::line((x - tick, end + tick), (x + tick, end - tick), stroke),
            Element::Text {
                x: x - typo.font_size * 0.3,
                y: mid,
                content: label,
                size: typo.font_size,
                anchor: Anchor::Middle,
                rotate: -90.0,
                color: typo.ink,
            },
        ]
    };

    if !placed.labelled {
        elements.pop();
    }
    elements
}

// ============================================================================
// Dimensions (all four edges)
// ============================================================================

/// The four call-out stacks of one drawing.
#[derive(Debug, Clone)]
pub struct Dimensions {
    pub top: DimensionStack,
    pub right: DimensionStack,
    pub bottom: DimensionStack,
    pub left: DimensionStack,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            top: DimensionStack::new(Edge::Top),
            right: DimensionStack::new(Edge::Right),
            bottom: DimensionStack::new(Edge::Bottom),
            left: DimensionStack::new(Edge::Left),
        }
    }
}

impl Dimensions {
    /// Overall width on the bottom edge and overall height on the left edge.
    pub fn overall(width: f32, height: f32) -> Self {
        let mut dims = Self::default();
        dims.bottom.push(Span::new(0.0, width));
        dims.left.push(Span::new(0.0, height));
        dims
    }

    /// Padding that fits every stack.
    pub fn padding(&self, typo: &Typography) -> Padding {
        Padding {
            top: self.top.extent(typo),
            right: self.right.extent(typo),
            bottom: self.bottom.extent(typo),
            left: self.left.extent(typo),
        }
    }

    /// All call-outs as a single group element.
    pub fn render(&self, typo: &Typography, content: Bounds) -> Element {
        let children = [&self.top, &self.right, &self.bottom, &self.left]
            .into_iter()
            .flat_map(|stack| stack.render(typo, content))
            .collect();
        Element::group("dimensions", children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_stack_outward() {
        let mut stack = DimensionStack::new(Edge::Top);
        assert_eq!(stack.push_group([Span::new(0.0, 600.0), Span::new(600.0, 1200.0)]), Some(0));
        assert_eq!(stack.push_group([Span::new(0.0, 400.0), Span::new(400.0, 1200.0)]), Some(1));
        assert_eq!(stack.tiers(), 2);

        let typo = Typography::for_extent(1200.0, 1500.0);
        let t0 = DimensionStack::tier_offset(&typo, 0);
        let t1 = DimensionStack::tier_offset(&typo, 1);
        assert!(t1 > t0);
        assert!((t1 - t0 - typo.tier_step).abs() < 1e-3);
    }

    #[test]
    fn duplicate_group_consumes_no_tier() {
        let mut stack = DimensionStack::new(Edge::Top);
        stack.push_group([Span::new(0.0, 600.0), Span::new(600.0, 1200.0)]);
        assert_eq!(stack.push_group([Span::new(0.0, 600.0), Span::new(600.0, 1200.0)]), None);
        assert_eq!(stack.tiers(), 1);
        assert_eq!(stack.placed().len(), 2);
    }

    #[test]
    fn partial_duplicates_are_dropped() {
        let mut stack = DimensionStack::new(Edge::Right);
        stack.push_group([Span::new(0.0, 500.0), Span::new(500.0, 1000.0)]);
        assert_eq!(stack.push_group([Span::new(0.0, 500.0), Span::new(500.0, 800.0)]), Some(1));
        let second: Vec<_> = stack.placed().iter().filter(|p| p.tier == 1).collect();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].span.end, 800.0);
    }

    fn text_count(elements: &[Element]) -> usize {
        elements.iter().filter(|e| matches!(e, Element::Text { .. })).count()
    }

    #[test]
    fn equal_lengths_in_a_group_are_labelled_once() {
        let mut stack = DimensionStack::new(Edge::Top);
        stack.push_group([
            Span::new(0.0, 400.0),
            Span::new(400.0, 800.0),
            Span::new(800.0, 1200.0),
        ]);
        assert_eq!(stack.placed().len(), 3);
        let labelled: Vec<bool> = stack.placed().iter().map(|p| p.labelled).collect();
        assert_eq!(labelled, vec![true, false, false]);

        let typo = Typography::for_extent(1200.0, 1500.0);
        let elements = stack.render(&typo, Bounds::from_size(1200.0, 1500.0));
        assert_eq!(text_count(&elements), 1);
        assert_eq!(elements.len(), 3 * 5 + 1);
    }

    #[test]
    fn later_group_dedups_its_own_lengths() {
        let mut stack = DimensionStack::new(Edge::Top);
        stack.push_group([Span::new(0.0, 600.0), Span::new(600.0, 1200.0)]);
        stack.push_group([Span::new(0.0, 300.0), Span::new(300.0, 600.0), Span::new(600.0, 1200.0)]);
        let second: Vec<bool> = stack
            .placed()
            .iter()
            .filter(|p| p.tier == 1)
            .map(|p| p.labelled)
            .collect();
        assert_eq!(second, vec![true, false]);
    }

    #[test]
    fn side_by_side_spans_keep_every_label() {
        let mut stack = DimensionStack::new(Edge::Bottom);
        stack.push_side_by_side([Span::new(0.0, 300.0), Span::new(450.0, 750.0)]);
        assert!(stack.placed().iter().all(|p| p.labelled));
    }

    #[test]
    fn degenerate_spans_are_ignored() {
        let mut stack = DimensionStack::new(Edge::Bottom);
        assert_eq!(stack.push(Span::new(10.0, 10.0)), None);
        assert_eq!(stack.push(Span::new(f32::NAN, 10.0)), None);
        assert_eq!(stack.tiers(), 0);
    }

    #[test]
    fn extent_grows_with_tiers() {
        let typo = Typography::for_extent(1000.0, 1000.0);
        let mut stack = DimensionStack::new(Edge::Top);
        let empty = stack.extent(&typo);
        stack.push(Span::new(0.0, 100.0));
        let one = stack.extent(&typo);
        stack.push(Span::new(0.0, 200.0));
        let two = stack.extent(&typo);
        assert!(empty < one && one < two);
        assert!((two - one - typo.tier_step).abs() < 1e-3);
    }

    #[test]
    fn render_labels_with_value() {
        let typo = Typography::for_extent(1200.0, 1500.0);
        let dims = Dimensions::overall(1200.0, 1500.0);
        let Element::Group { children, .. } = dims.render(&typo, Bounds::from_size(1200.0, 1500.0))
        else {
            panic!("expected a group");
        };
        let labels: Vec<_> = children
            .iter()
            .filter_map(|e| match e {
                Element::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["1200", "1500"]);
    }
}

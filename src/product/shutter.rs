//! Hinged shutter (persiana) renderer.
//!
//! The opening is split into leaves of equal width. Leaves in the left half
//! hinge on the left, the others on the right, so the pair meets in the middle
//! where the latch knob sits.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ProductDrawing, lenient, lenient_enum, resolve, resolve_count, solid};
use crate::config::{
    DEFAULT_LEAVES, DEFAULT_PERSIANA_COLOR, DEFAULT_PERSIANA_HEIGHT, DEFAULT_PERSIANA_WIDTH,
    DEFAULT_STILE, LOUVRE_PITCH, MAX_LEAVES, MIN_SIDE, MIN_STILE,
};
use crate::dimension::{Dimensions, Span, Typography};
use crate::drawing::{Bounds, Drawing, Element, Stroke, Style};
use crate::geometry::{Color, distribute, offsets, parse_color, shade};
use crate::leaf::{LeafState, Side, hinge_marks};

const MAX_RAILS: u32 = 4;
const BOARD_WIDTH: f32 = 100.0;

lenient_enum! {
    /// What fills each leaf between the stiles.
    pub enum ShutterInfill {
        #[default]
        Louvres => ["louvres", "louvers", "lamelle", "veneziana"],
        Boards => ["boards", "doghe", "planks", "padovana"],
    }
}

/// Configuration for a hinged shutter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ShutterConfig {
    #[serde(deserialize_with = "lenient::number")]
    pub width: Option<f32>,

    #[serde(deserialize_with = "lenient::number")]
    pub height: Option<f32>,

    /// Stile and rail profile width (default 55, minimum 15).
    #[serde(deserialize_with = "lenient::number")]
    pub stile: Option<f32>,

    /// Number of leaves, 1 to 6 (default 2).
    #[serde(deserialize_with = "lenient::count")]
    pub leaves: Option<u32>,

    #[serde(deserialize_with = "lenient::choice")]
    pub infill: ShutterInfill,

    /// Intermediate horizontal rails per leaf, 0 to 4.
    #[serde(deserialize_with = "lenient::count")]
    pub rails: Option<u32>,

    #[serde(deserialize_with = "lenient::text")]
    pub color: Option<String>,
}

impl ShutterConfig {
    fn size(&self) -> (u32, u32) {
        (
            resolve("width", self.width, DEFAULT_PERSIANA_WIDTH, MIN_SIDE).round() as u32,
            resolve("height", self.height, DEFAULT_PERSIANA_HEIGHT, MIN_SIDE).round() as u32,
        )
    }

    pub fn leaf_count(&self) -> u32 {
        resolve_count(self.leaves, DEFAULT_LEAVES, 1, MAX_LEAVES)
    }

    /// Widths of the leaves, left to right, summing to the overall width.
    pub fn leaf_widths(&self) -> Vec<u32> {
        let (width, _) = self.size();
        distribute(width, &vec![1.0; self.leaf_count() as usize])
    }

    /// Opening state of each leaf, left to right.
    pub fn leaf_states(&self) -> Vec<LeafState> {
        let count = self.leaf_count();
        let left = count.div_ceil(2);
        (0..count)
            .map(|i| if i < left { LeafState::OpensLeft } else { LeafState::OpensRight })
            .collect()
    }
}

impl ProductDrawing for ShutterConfig {
    fn draw(&self) -> Drawing {
        let (width, height) = self.size();
        let (w, h) = (width as f32, height as f32);
        let widths = self.leaf_widths();
        let states = self.leaf_states();
        let typo = Typography::for_extent(w, h);
        let fill = parse_color(self.color.as_deref(), DEFAULT_PERSIANA_COLOR);
        debug!(width, height, leaves = widths.len(), infill = ?self.infill, "drawing shutter");

        let narrowest = widths.iter().copied().min().unwrap_or(width) as f32;
        let stile = resolve("stile", self.stile, DEFAULT_STILE, MIN_STILE).min(narrowest / 4.0);
        let rails = self.rails.unwrap_or(0).min(MAX_RAILS);
        let lefts = offsets(0.0, &widths, 0.0);

        let mut dims = Dimensions::overall(w, h);
        if widths.len() > 1 {
            dims.top.push_group(
                widths
                    .iter()
                    .zip(&lefts)
                    .map(|(&lw, &x)| Span::with_value(x, x + lw as f32, lw as f32)),
            );
        }

        let mut drawing = Drawing::new(w, h, dims.padding(&typo));
        let hardware = Color::new(45, 45, 45);
        let leaves = widths
            .iter()
            .zip(&lefts)
            .zip(&states)
            .flat_map(|((&lw, &x), &state)| {
                let leaf = Bounds::new(x, 0.0, lw as f32, h);
                let mut out = draw_leaf(leaf, stile, rails, self.infill, fill, &typo);
                out.extend(hinge_marks(state, leaf, stile * 0.5, hardware));
                out.extend(latch_knob(state, leaf, stile, hardware));
                out
            })
            .collect();
        drawing.push(Element::group("leaves", leaves));
        drawing.push(dims.render(&typo, Bounds::from_size(w, h)));
        drawing
    }
}

fn draw_leaf(
    leaf: Bounds,
    stile: f32,
    rails: u32,
    infill: ShutterInfill,
    fill: Color,
    typo: &Typography,
) -> Vec<Element> {
    let mut out = vec![solid(leaf, fill, typo.stroke)];
    let inner = leaf.inset(stile);
    if inner.width < 1.0 || inner.height < 1.0 {
        return out;
    }

    let inner_height = (inner.height - rails as f32 * stile).max(0.0).round() as u32;
    let bands = distribute(inner_height, &vec![1.0; rails as usize + 1]);
    let tops = offsets(inner.y, &bands, stile);
    let line = Stroke::solid(shade(fill, -0.15), typo.thin);

    for (&band, &top) in bands.iter().zip(&tops) {
        let panel = Bounds::new(inner.x, top, inner.width, band as f32);
        out.push(solid(panel, shade(fill, -0.04), typo.thin));
        match infill {
            ShutterInfill::Louvres => out.extend(louvres(panel, line, typo.thin)),
            ShutterInfill::Boards => out.extend(boards(panel, line)),
        }
    }
    out
}

/// Slanted slats drawn as a ruling line plus a shadow line just below it.
fn louvres(panel: Bounds, line: Stroke, thin: f32) -> Vec<Element> {
    let shadow = Stroke::solid(shade(line.color, -0.1), thin * 0.6);
    let mut out = Vec::new();
    let mut y = panel.y + LOUVRE_PITCH;
    while y < panel.bottom() - 1.0 {
        out.push(Element::line((panel.x, y), (panel.right(), y), line));
        let under = y + LOUVRE_PITCH * 0.3;
        if under < panel.bottom() {
            out.push(Element::line((panel.x, under), (panel.right(), under), shadow));
        }
        y += LOUVRE_PITCH;
    }
    out
}

fn boards(panel: Bounds, line: Stroke) -> Vec<Element> {
    let count = ((panel.width / BOARD_WIDTH).round() as u32).max(2);
    let pitch = panel.width / count as f32;
    (1..count)
        .map(|i| {
            let x = panel.x + i as f32 * pitch;
            Element::line((x, panel.y), (x, panel.bottom()), line)
        })
        .collect()
}

fn latch_knob(state: LeafState, leaf: Bounds, stile: f32, color: Color) -> Option<Element> {
    let cx = match state.handle()? {
        Side::Left => leaf.x + stile / 2.0,
        Side::Right => leaf.right() - stile / 2.0,
        Side::Top => leaf.center_x(),
    };
    Some(Element::Circle {
        cx,
        cy: leaf.center_y(),
        r: stile * 0.3,
        style: Style::filled(color),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shutter(leaves: u32) -> ShutterConfig {
        ShutterConfig {
            width: Some(1200.0),
            height: Some(1500.0),
            leaves: Some(leaves),
            ..Default::default()
        }
    }

    #[test]
    fn leaves_split_width_exactly() {
        assert_eq!(shutter(2).leaf_widths(), vec![600, 600]);
        let widths = ShutterConfig {
            width: Some(1001.0),
            ..shutter(3)
        }
        .leaf_widths();
        assert_eq!(widths, vec![333, 333, 335]);
        assert_eq!(widths.iter().sum::<u32>(), 1001);
    }

    #[test]
    fn left_half_hinges_left() {
        use LeafState::{OpensLeft as L, OpensRight as R};
        assert_eq!(shutter(1).leaf_states(), vec![L]);
        assert_eq!(shutter(2).leaf_states(), vec![L, R]);
        assert_eq!(shutter(3).leaf_states(), vec![L, L, R]);
        assert_eq!(shutter(4).leaf_states(), vec![L, L, R, R]);
    }

    #[test]
    fn leaf_count_is_clamped() {
        assert_eq!(shutter(0).leaf_count(), 1);
        assert_eq!(shutter(9).leaf_count(), MAX_LEAVES);
        assert_eq!(ShutterConfig::default().leaf_count(), DEFAULT_LEAVES);
    }

    #[test]
    fn knobs_meet_in_the_middle() {
        let drawing = shutter(2).draw();
        let knobs: Vec<f32> = drawing
            .elements
            .iter()
            .flat_map(|e| match e {
                Element::Group { class: "leaves", children } => children.clone(),
                _ => Vec::new(),
            })
            .filter_map(|e| match e {
                Element::Circle { cx, .. } => Some(cx),
                _ => None,
            })
            .collect();
        assert_eq!(knobs.len(), 2);
        assert!(knobs.iter().all(|cx| (cx - 600.0).abs() < 60.0));
    }

    #[test]
    fn content_matches_size_and_labels_leaves() {
        let drawing = shutter(3).draw();
        assert_eq!((drawing.content_width, drawing.content_height), (1200.0, 1500.0));
        assert!(drawing.padding.top > shutter(1).draw().padding.top);
    }

    #[test]
    fn infill_and_rails_change_the_drawing() {
        let louvres = shutter(2).draw();
        let boards = ShutterConfig {
            infill: ShutterInfill::Boards,
            ..shutter(2)
        }
        .draw();
        let railed = ShutterConfig {
            rails: Some(2),
            ..shutter(2)
        }
        .draw();
        assert_ne!(louvres, boards);
        assert_ne!(louvres, railed);
        assert!(boards.primitive_count() < louvres.primitive_count());
    }

    #[test]
    fn infill_parses_italian_names() {
        assert_eq!(ShutterInfill::parse_lenient("doghe"), ShutterInfill::Boards);
        assert_eq!(ShutterInfill::parse_lenient("?"), ShutterInfill::Louvres);
    }
}

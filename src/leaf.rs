//! Leaf opening states and the hardware glyphs derived from them.
//!
//! The handle rule encodes a real hardware constraint: a handle always sits
//! opposite the hinge. A purely top-hinged (vasistas) leaf carries it on the
//! top rail; tilt-and-turn leaves follow their side hinge; sliding leaves have
//! the pull on the trailing edge, opposite the direction of travel.

use serde::{Deserialize, Serialize};

use crate::drawing::{Bounds, Element, Stroke, Style};
use crate::geometry::Color;

/// A side of a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
    Top,
}

/// Opening state of one leaf.
///
/// Deserializes leniently: unknown strings become [`LeafState::Fixed`], and a
/// few Italian shop-floor spellings are accepted (`"fisso"`, `"sx"`, `"dx"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum LeafState {
    #[default]
    Fixed,
    OpensLeft,
    OpensRight,
    /// Top-hinged, opening from the bottom.
    Vasistas,
    /// Side-hinged on the left, also tilting from the top.
    TiltTurnLeft,
    TiltTurnRight,
    SlidesLeft,
    SlidesRight,
}

impl LeafState {
    pub const ALL: [LeafState; 8] = [
        LeafState::Fixed,
        LeafState::OpensLeft,
        LeafState::OpensRight,
        LeafState::Vasistas,
        LeafState::TiltTurnLeft,
        LeafState::TiltTurnRight,
        LeafState::SlidesLeft,
        LeafState::SlidesRight,
    ];

    /// Parses a state name, falling back to `Fixed` for anything unknown.
    pub fn parse_lenient(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase().replace(['_', ' ', '+'], "-");
        match normalized.as_str() {
            "opens-left" | "left" | "sx" | "hinged-left" => LeafState::OpensLeft,
            "opens-right" | "right" | "dx" | "hinged-right" => LeafState::OpensRight,
            "vasistas" | "wasistas" | "top-hinged" => LeafState::Vasistas,
            "tilt-turn-left" | "opens-left-vasistas" | "vasistas-left" => LeafState::TiltTurnLeft,
            "tilt-turn-right" | "opens-right-vasistas" | "vasistas-right" => LeafState::TiltTurnRight,
            "slides-left" | "sliding-left" => LeafState::SlidesLeft,
            "slides-right" | "sliding-right" => LeafState::SlidesRight,
            _ => LeafState::Fixed,
        }
    }

    /// The side the leaf is hinged on, if any.
    ///
    /// Tilt-and-turn leaves report their side hinge.
    pub fn hinge(self) -> Option<Side> {
        match self {
            LeafState::OpensLeft | LeafState::TiltTurnLeft => Some(Side::Left),
            LeafState::OpensRight | LeafState::TiltTurnRight => Some(Side::Right),
            LeafState::Vasistas => Some(Side::Top),
            LeafState::Fixed | LeafState::SlidesLeft | LeafState::SlidesRight => None,
        }
    }

    /// Where the handle glyph is placed.
    pub fn handle(self) -> Option<Side> {
        match self {
            LeafState::Fixed => None,
            LeafState::Vasistas => Some(Side::Top),
            LeafState::OpensLeft | LeafState::TiltTurnLeft | LeafState::SlidesLeft => Some(Side::Right),
            LeafState::OpensRight | LeafState::TiltTurnRight | LeafState::SlidesRight => Some(Side::Left),
        }
    }

    pub fn is_fixed(self) -> bool {
        self == LeafState::Fixed
    }

    pub fn is_sliding(self) -> bool {
        matches!(self, LeafState::SlidesLeft | LeafState::SlidesRight)
    }

    /// True for states that also tilt from the top.
    pub fn tilts(self) -> bool {
        matches!(
            self,
            LeafState::Vasistas | LeafState::TiltTurnLeft | LeafState::TiltTurnRight
        )
    }

    /// Restricts the state to a plain side swing, as doors only swing.
    pub fn as_swing(self) -> Self {
        match self {
            LeafState::OpensRight | LeafState::TiltTurnRight | LeafState::SlidesRight => {
                LeafState::OpensRight
            }
            _ => LeafState::OpensLeft,
        }
    }
}

impl From<String> for LeafState {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl From<&str> for LeafState {
    fn from(value: &str) -> Self {
        Self::parse_lenient(value)
    }
}

// ============================================================================
// Glyphs
// ============================================================================

/// Schematic opening symbol drawn over a leaf's glass or panel.
///
/// Side hinges are drawn as two dashed diagonals converging on the hinge side,
/// a top hinge as a dashed triangle with its apex on the top rail, and sliding
/// leaves as an arrow pointing in the direction of travel.
pub fn opening_glyph(state: LeafState, area: Bounds, stroke: Stroke) -> Vec<Element> {
    let dashed = Stroke::dashed(stroke.color, stroke.width, (area.width.min(area.height) * 0.04).max(2.0));
    let mut glyph = Vec::new();

    match state.hinge() {
        Some(Side::Left) => {
            glyph.push(Element::line((area.right(), area.y), (area.x, area.center_y()), dashed));
            glyph.push(Element::line((area.right(), area.bottom()), (area.x, area.center_y()), dashed));
        }
        Some(Side::Right) => {
            glyph.push(Element::line((area.x, area.y), (area.right(), area.center_y()), dashed));
            glyph.push(Element::line((area.x, area.bottom()), (area.right(), area.center_y()), dashed));
        }
        _ => {}
    }

    if state.tilts() {
        glyph.push(Element::line((area.x, area.bottom()), (area.center_x(), area.y), dashed));
        glyph.push(Element::line((area.right(), area.bottom()), (area.center_x(), area.y), dashed));
    }

    if state.is_sliding() {
        glyph.extend(slide_arrow(state, area, stroke));
    }

    glyph
}

fn slide_arrow(state: LeafState, area: Bounds, stroke: Stroke) -> Vec<Element> {
    let y = area.center_y();
    let head = (area.width.min(area.height) * 0.08).max(stroke.width * 3.0);
    let (tail_x, tip_x, dir) = if state == LeafState::SlidesLeft {
        (area.x + area.width * 0.75, area.x + area.width * 0.25, -1.0)
    } else {
        (area.x + area.width * 0.25, area.x + area.width * 0.75, 1.0)
    };
    vec![
        Element::line((tail_x, y), (tip_x, y), stroke),
        Element::Polygon {
            points: vec![
                (tip_x + dir * head, y),
                (tip_x, y - head * 0.6),
                (tip_x, y + head * 0.6),
            ],
            style: Style::filled(stroke.color),
        },
    ]
}

/// Handle glyph inside a sash whose profile is `profile` wide.
pub fn handle_glyph(state: LeafState, sash: Bounds, profile: f32, color: Color) -> Option<Element> {
    let thickness = profile * 0.4;
    let length = (profile * 2.5).min(sash.height.max(sash.width) * 0.3);
    let bounds = match state.handle()? {
        Side::Left => Bounds::new(
            sash.x + (profile - thickness) / 2.0,
            sash.center_y() - length / 2.0,
            thickness,
            length,
        ),
        Side::Right => Bounds::new(
            sash.right() - (profile + thickness) / 2.0,
            sash.center_y() - length / 2.0,
            thickness,
            length,
        ),
        Side::Top => Bounds::new(
            sash.center_x() - length / 2.0,
            sash.y + (profile - thickness) / 2.0,
            length,
            thickness,
        ),
    };
    Some(Element::rect(bounds, Style::filled(color)))
}

/// Two hinge knuckles on the hinged edge of a leaf.
pub fn hinge_marks(state: LeafState, leaf: Bounds, size: f32, color: Color) -> Vec<Element> {
    let Some(side) = state.hinge() else {
        return Vec::new();
    };
    let style = Style::filled(color);
    match side {
        Side::Left | Side::Right => {
            let x = if side == Side::Left { leaf.x - size / 2.0 } else { leaf.right() - size / 2.0 };
            [0.12, 0.88]
                .iter()
                .map(|f| Element::rect(Bounds::new(x, leaf.y + leaf.height * f - size, size, size * 2.0), style.clone()))
                .collect()
        }
        Side::Top => [0.15, 0.85]
            .iter()
            .map(|f| {
                Element::rect(
                    Bounds::new(leaf.x + leaf.width * f - size, leaf.y - size / 2.0, size * 2.0, size),
                    style.clone(),
                )
            })
            .collect(),
    }
}

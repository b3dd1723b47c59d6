//! Armored entrance door (porta blindata) renderer.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ProductDrawing, lenient, lenient_enum, resolve, solid};
use crate::config::{
    DEFAULT_ARMORED_FRAME, DEFAULT_ARMORED_FRAME_COLOR, DEFAULT_ARMORED_HEIGHT,
    DEFAULT_ARMORED_PANEL_COLOR, DEFAULT_ARMORED_WIDTH, HANDLE_HEIGHT, MIN_FRAME, MIN_SIDE,
    PEEPHOLE_HEIGHT,
};
use crate::dimension::{Dimensions, Span, Typography};
use crate::drawing::{Bounds, Drawing, Element, Stroke, Style};
use crate::geometry::{Color, parse_color, shade};
use crate::leaf::{LeafState, Side, hinge_marks, opening_glyph};

const GROOVE_PITCH: f32 = 150.0;
const LEVER_LENGTH: f32 = 130.0;

lenient_enum! {
    /// Decoration of the outer cladding panel.
    pub enum ArmoredPanel {
        #[default]
        Flat => ["flat", "liscio", "plain"],
        Grooved => ["grooved", "fresato", "dogato"],
        Squares => ["squares", "bugne", "riquadri", "bugnato"],
    }
}

/// Configuration for an armored door.
///
/// The door stands on the floor: the frame runs along the top and both sides
/// only. `opening` is restricted to a plain swing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ArmoredDoorConfig {
    #[serde(deserialize_with = "lenient::number")]
    pub width: Option<f32>,

    #[serde(deserialize_with = "lenient::number")]
    pub height: Option<f32>,

    #[serde(deserialize_with = "lenient::number")]
    pub frame: Option<f32>,

    #[serde(deserialize_with = "lenient::choice")]
    pub opening: LeafState,

    #[serde(deserialize_with = "lenient::choice")]
    pub panel: ArmoredPanel,

    #[serde(deserialize_with = "lenient::text")]
    pub panel_color: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub frame_color: Option<String>,

    #[serde(deserialize_with = "lenient::flag")]
    pub peephole: Option<bool>,
}

impl Default for ArmoredDoorConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            frame: None,
            opening: LeafState::OpensLeft,
            panel: ArmoredPanel::default(),
            panel_color: None,
            frame_color: None,
            peephole: None,
        }
    }
}

impl ArmoredDoorConfig {
    fn size(&self) -> (f32, f32) {
        (
            resolve("width", self.width, DEFAULT_ARMORED_WIDTH, MIN_SIDE).round(),
            resolve("height", self.height, DEFAULT_ARMORED_HEIGHT, MIN_SIDE).round(),
        )
    }

    fn frame(&self, width: f32, height: f32) -> f32 {
        resolve("frame", self.frame, DEFAULT_ARMORED_FRAME, MIN_FRAME)
            .min(width.min(height) / 4.0)
            .round()
    }

    /// The leaf's swing; doors never tilt or slide.
    pub fn swing(&self) -> LeafState {
        self.opening.as_swing()
    }

    /// Clear passage width between the frame jambs.
    pub fn passage_width(&self) -> f32 {
        let (width, height) = self.size();
        width - 2.0 * self.frame(width, height)
    }
}

impl ProductDrawing for ArmoredDoorConfig {
    fn draw(&self) -> Drawing {
        let (width, height) = self.size();
        let frame = self.frame(width, height);
        let state = self.swing();
        let typo = Typography::for_extent(width, height);
        let frame_fill = parse_color(self.frame_color.as_deref(), DEFAULT_ARMORED_FRAME_COLOR);
        let panel_fill = parse_color(self.panel_color.as_deref(), DEFAULT_ARMORED_PANEL_COLOR);
        debug!(width, height, frame, opening = ?state, panel = ?self.panel, "drawing armored door");

        let leaf = Bounds::new(frame, frame, width - 2.0 * frame, height - frame);

        let mut dims = Dimensions::overall(width, height);
        dims.top.push(Span::new(leaf.x, leaf.right()));

        let mut drawing = Drawing::new(width, height, dims.padding(&typo));
        drawing.push(Element::group(
            "frame",
            vec![solid(Bounds::from_size(width, height), frame_fill, typo.stroke)],
        ));

        let mut leaf_elements = vec![solid(leaf, panel_fill, typo.stroke)];
        leaf_elements.extend(cladding(self.panel, leaf, panel_fill, &typo));
        leaf_elements.extend(opening_glyph(state, leaf, Stroke::solid(typo.ink, typo.thin)));
        drawing.push(Element::group("leaf", leaf_elements));

        let metal = Color::new(190, 190, 190);
        let mut hardware = hinge_marks(state, leaf, (frame * 0.4).max(typo.stroke * 2.0), shade(frame_fill, 0.2));
        hardware.extend(handle_and_lock(state, leaf, height, metal, &typo));
        if self.peephole.unwrap_or(true) {
            let y = height - PEEPHOLE_HEIGHT;
            if y > leaf.y + frame {
                hardware.push(Element::Circle {
                    cx: leaf.center_x(),
                    cy: y,
                    r: (leaf.width * 0.015).max(typo.stroke),
                    style: Style::filled(metal).with_stroke(Stroke::solid(typo.ink, typo.thin)),
                });
            }
        }
        drawing.push(Element::group("hardware", hardware));
        drawing.push(dims.render(&typo, Bounds::from_size(width, height)));
        drawing
    }
}

fn cladding(panel: ArmoredPanel, leaf: Bounds, fill: Color, typo: &Typography) -> Vec<Element> {
    let groove = Stroke::solid(shade(fill, -0.12), typo.thin);
    let inner = leaf.inset(leaf.width.min(leaf.height) * 0.1);
    match panel {
        ArmoredPanel::Flat => Vec::new(),
        ArmoredPanel::Grooved => {
            let mut lines = Vec::new();
            let mut y = inner.y + GROOVE_PITCH;
            while y < inner.bottom() {
                lines.push(Element::line((inner.x, y), (inner.right(), y), groove));
                y += GROOVE_PITCH;
            }
            lines
        }
        ArmoredPanel::Squares => {
            let (cols, rows) = (2, 3);
            let gap = inner.width * 0.08;
            let cell_w = (inner.width - gap * (cols - 1) as f32) / cols as f32;
            let cell_h = (inner.height - gap * (rows - 1) as f32) / rows as f32;
            (0..rows)
                .flat_map(|r| {
                    (0..cols).map(move |c| {
                        Bounds::new(
                            inner.x + c as f32 * (cell_w + gap),
                            inner.y + r as f32 * (cell_h + gap),
                            cell_w,
                            cell_h,
                        )
                    })
                })
                .map(|square| Element::rect(square, Style::filled(shade(fill, 0.04)).with_stroke(groove)))
                .collect()
        }
    }
}

/// Lever handle, rosette and lock cylinder on the handle side of the leaf,
/// with the lever axis `HANDLE_HEIGHT` above the floor.
fn handle_and_lock(state: LeafState, leaf: Bounds, height: f32, metal: Color, typo: &Typography) -> Vec<Element> {
    let Some(side) = state.handle() else {
        return Vec::new();
    };
    let inset = leaf.width * 0.1;
    let (x, toward) = match side {
        Side::Left => (leaf.x + inset, 1.0),
        _ => (leaf.right() - inset, -1.0),
    };
    let y = if height - HANDLE_HEIGHT > leaf.y + typo.font_size {
        height - HANDLE_HEIGHT
    } else {
        leaf.center_y()
    };
    let length = LEVER_LENGTH.min(leaf.width * 0.3);
    let thickness = (length * 0.18).max(typo.stroke);
    let rosette = thickness * 1.4;
    let outline = Stroke::solid(typo.ink, typo.thin);
    let lever_x = if toward > 0.0 { x } else { x - length };

    vec![
        Element::Circle {
            cx: x,
            cy: y,
            r: rosette,
            style: Style::filled(metal).with_stroke(outline),
        },
        Element::rect(
            Bounds::new(lever_x, y - thickness / 2.0, length, thickness),
            Style::filled(metal).with_stroke(outline),
        ),
        Element::Circle {
            cx: x,
            cy: y + rosette * 3.5,
            r: rosette * 0.7,
            style: Style::filled(shade(metal, 0.1)).with_stroke(outline),
        },
    ]
}

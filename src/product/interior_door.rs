//! Interior door renderer, hinged or pocket-sliding.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Glazing, ProductDrawing, glazing, lenient, lenient_enum, resolve, resolve_count, solid};
use crate::config::{
    DEFAULT_GROOVES, DEFAULT_INTERIOR_COLOR, DEFAULT_INTERIOR_HEIGHT, DEFAULT_INTERIOR_WIDTH,
    DEFAULT_JAMB, MIN_FRAME, MIN_SIDE,
};
use crate::dimension::{Dimensions, Span, Typography};
use crate::drawing::{Bounds, Drawing, Element, Stroke};
use crate::geometry::{Color, parse_color, shade};
use crate::leaf::{LeafState, handle_glyph, hinge_marks, opening_glyph};

const MAX_GROOVES: u32 = 12;

lenient_enum! {
    pub enum InteriorPanel {
        #[default]
        Flat => ["flat", "liscio", "cieco"],
        /// Glass in the upper part of the leaf.
        Glazed => ["glazed", "vetrato", "glass"],
        Grooved => ["grooved", "pantografato", "inciso"],
    }
}

/// Configuration for an interior door.
///
/// `opening` accepts the side swings and `slides-left` / `slides-right` for a
/// pocket door; anything else is drawn as a swing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct InteriorDoorConfig {
    #[serde(deserialize_with = "lenient::number")]
    pub width: Option<f32>,

    #[serde(deserialize_with = "lenient::number")]
    pub height: Option<f32>,

    #[serde(deserialize_with = "lenient::number")]
    pub jamb: Option<f32>,

    #[serde(deserialize_with = "lenient::choice")]
    pub opening: LeafState,

    #[serde(deserialize_with = "lenient::choice")]
    pub panel: InteriorPanel,

    /// Number of grooves on a grooved panel (default 4).
    #[serde(deserialize_with = "lenient::count")]
    pub grooves: Option<u32>,

    #[serde(deserialize_with = "lenient::text")]
    pub color: Option<String>,

    /// Glass type of a glazed panel.
    #[serde(deserialize_with = "lenient::choice")]
    pub glazing: Glazing,
}

impl Default for InteriorDoorConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            jamb: None,
            opening: LeafState::OpensLeft,
            panel: InteriorPanel::default(),
            grooves: None,
            color: None,
            glazing: Glazing::Frosted,
        }
    }
}

impl InteriorDoorConfig {
    /// The drawn opening: pocket doors keep their slide direction, everything
    /// else is a plain swing.
    pub fn opening(&self) -> LeafState {
        if self.opening.is_sliding() {
            self.opening
        } else {
            self.opening.as_swing()
        }
    }

    pub fn is_pocket(&self) -> bool {
        self.opening().is_sliding()
    }
}

impl ProductDrawing for InteriorDoorConfig {
    fn draw(&self) -> Drawing {
        let width = resolve("width", self.width, DEFAULT_INTERIOR_WIDTH, MIN_SIDE).round();
        let height = resolve("height", self.height, DEFAULT_INTERIOR_HEIGHT, MIN_SIDE).round();
        let jamb = resolve("jamb", self.jamb, DEFAULT_JAMB, MIN_FRAME)
            .min(width.min(height) / 4.0)
            .round();
        let state = self.opening();
        let typo = Typography::for_extent(width, height);
        let fill = parse_color(self.color.as_deref(), DEFAULT_INTERIOR_COLOR);
        debug!(width, height, opening = ?state, panel = ?self.panel, "drawing interior door");

        let leaf = Bounds::new(jamb, jamb, width - 2.0 * jamb, height - jamb);
        let mut dims = Dimensions::overall(width, height);
        dims.top.push(Span::new(leaf.x, leaf.right()));

        let mut drawing = Drawing::new(width, height, dims.padding(&typo));
        drawing.push(Element::group(
            "frame",
            vec![solid(Bounds::from_size(width, height), shade(fill, -0.06), typo.stroke)],
        ));

        let mut leaf_elements = vec![solid(leaf, fill, typo.stroke)];
        let groove = Stroke::solid(shade(fill, -0.2), typo.thin);
        match self.panel {
            InteriorPanel::Flat => {}
            InteriorPanel::Glazed => {
                let inset = leaf.width * 0.18;
                let glass = Bounds::new(
                    leaf.x + inset,
                    leaf.y + inset,
                    leaf.width - 2.0 * inset,
                    (leaf.height * 0.55 - inset).max(0.0),
                );
                leaf_elements.extend(glazing(glass, self.glazing, fill, typo.thin));
            }
            InteriorPanel::Grooved => {
                let count = resolve_count(self.grooves, DEFAULT_GROOVES, 1, MAX_GROOVES);
                let inset = leaf.width * 0.12;
                leaf_elements.extend((1..=count).map(|i| {
                    let y = leaf.y + leaf.height * i as f32 / (count + 1) as f32;
                    Element::line((leaf.x + inset, y), (leaf.right() - inset, y), groove)
                }));
            }
        }
        leaf_elements.extend(opening_glyph(state, leaf, Stroke::solid(typo.ink, typo.thin)));
        drawing.push(Element::group("leaf", leaf_elements));

        let hardware_color = Color::new(150, 150, 150);
        // Pocket leaves have no hinges; the handle glyph is their flush pull.
        let mut hardware = hinge_marks(state, leaf, (jamb * 0.4).max(typo.stroke * 2.0), shade(hardware_color, -0.2));
        if let Some(handle) = handle_glyph(state, leaf, leaf.width * 0.12, hardware_color) {
            hardware.push(handle);
        }
        drawing.push(Element::group("hardware", hardware));
        drawing.push(dims.render(&typo, Bounds::from_size(width, height)));
        drawing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hardware(drawing: &Drawing) -> Vec<Element> {
        drawing
            .elements
            .iter()
            .find_map(|e| match e {
                Element::Group { class: "hardware", children } => Some(children.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    fn handle_x(drawing: &Drawing) -> f32 {
        hardware(drawing)
            .iter()
            .filter_map(|e| match e {
                Element::Rect { bounds, style } if style.stroke.is_none() && bounds.height > bounds.width => {
                    Some(bounds.center_x())
                }
                _ => None,
            })
            .last()
            .expect("handle")
    }

    #[test]
    fn swing_and_pocket_openings() {
        let tilt = InteriorDoorConfig {
            opening: LeafState::TiltTurnRight,
            ..Default::default()
        };
        assert_eq!(tilt.opening(), LeafState::OpensRight);
        assert!(!tilt.is_pocket());

        let pocket = InteriorDoorConfig {
            opening: LeafState::SlidesLeft,
            ..Default::default()
        };
        assert_eq!(pocket.opening(), LeafState::SlidesLeft);
        assert!(pocket.is_pocket());
    }

    #[test]
    fn handle_opposite_hinge() {
        let left = InteriorDoorConfig::default().draw();
        assert!(handle_x(&left) > 400.0);
        let right = InteriorDoorConfig {
            opening: LeafState::OpensRight,
            ..Default::default()
        }
        .draw();
        assert!(handle_x(&right) < 400.0);
    }

    #[test]
    fn pocket_pull_on_trailing_edge() {
        let drawing = InteriorDoorConfig {
            opening: LeafState::SlidesLeft,
            ..Default::default()
        }
        .draw();
        assert!(handle_x(&drawing) > 400.0);
    }

    #[test]
    fn grooves_follow_count() {
        let lines = |grooves| {
            let drawing = InteriorDoorConfig {
                panel: InteriorPanel::Grooved,
                opening: LeafState::SlidesRight,
                grooves,
                ..Default::default()
            }
            .draw();
            drawing
                .elements
                .iter()
                .find_map(|e| match e {
                    Element::Group { class: "leaf", children } => Some(children.len()),
                    _ => None,
                })
                .unwrap_or(0)
        };
        assert_eq!(lines(Some(6)), lines(None) + 2);
        assert_eq!(lines(Some(0)), lines(Some(1)));
        assert_eq!(lines(Some(99)), lines(Some(MAX_GROOVES)));
    }

    #[test]
    fn glazed_panel_has_glass() {
        let flat = InteriorDoorConfig::default().draw();
        let glazed = InteriorDoorConfig {
            panel: InteriorPanel::Glazed,
            ..Default::default()
        }
        .draw();
        assert!(glazed.primitive_count() > flat.primitive_count());
        assert_eq!((glazed.content_width, glazed.content_height), (800.0, 2100.0));
    }
}

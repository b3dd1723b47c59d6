//! Roller shutter housing box (cassonetto) renderer.
//!
//! Drawn as two views side by side: the front elevation and, to its right,
//! the side section showing the depth, the shutter roll and the insulation
//! band against the wall.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ProductDrawing, diagonal_hatch, lenient, lenient_enum, resolve, solid};
use crate::config::{DEFAULT_BOX_COLOR, DEFAULT_BOX_DEPTH, DEFAULT_BOX_HEIGHT, DEFAULT_BOX_WIDTH, MIN_BOX_SIDE};
use crate::dimension::{Dimensions, Span, Typography};
use crate::drawing::{Bounds, Drawing, Element, Stroke, Style};
use crate::geometry::{parse_color, shade};

const MIN_VIEW_GAP: f32 = 150.0;

lenient_enum! {
    /// Side of the box that opens for maintenance.
    pub enum Inspection {
        #[default]
        Bottom => ["bottom", "inferiore", "sotto"],
        Front => ["front", "frontale", "fronte"],
    }
}

/// Configuration for a housing box.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct CassonettoConfig {
    #[serde(deserialize_with = "lenient::number")]
    pub width: Option<f32>,

    #[serde(deserialize_with = "lenient::number")]
    pub height: Option<f32>,

    #[serde(deserialize_with = "lenient::number")]
    pub depth: Option<f32>,

    #[serde(deserialize_with = "lenient::choice")]
    pub inspection: Inspection,

    /// Insulation band along the wall side (default on).
    #[serde(deserialize_with = "lenient::flag")]
    pub insulated: Option<bool>,

    #[serde(deserialize_with = "lenient::text")]
    pub color: Option<String>,
}

/// Resolved sizes of the two views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CassonettoLayout {
    pub front: Bounds,
    pub section: Bounds,
}

impl CassonettoConfig {
    pub fn layout(&self) -> CassonettoLayout {
        let width = resolve("width", self.width, DEFAULT_BOX_WIDTH, MIN_BOX_SIDE).round();
        let height = resolve("height", self.height, DEFAULT_BOX_HEIGHT, MIN_BOX_SIDE).round();
        let depth = resolve("depth", self.depth, DEFAULT_BOX_DEPTH, MIN_BOX_SIDE).round();
        let gap = MIN_VIEW_GAP.max(width * 0.1).round();
        CassonettoLayout {
            front: Bounds::from_size(width, height),
            section: Bounds::new(width + gap, 0.0, depth, height),
        }
    }
}

impl ProductDrawing for CassonettoConfig {
    fn draw(&self) -> Drawing {
        let CassonettoLayout { front, section } = self.layout();
        let content = Bounds::from_size(section.right(), front.height);
        let typo = Typography::for_extent(content.width, content.height);
        let fill = parse_color(self.color.as_deref(), DEFAULT_BOX_COLOR);
        debug!(
            width = front.width,
            height = front.height,
            depth = section.width,
            inspection = ?self.inspection,
            "drawing cassonetto"
        );

        let mut dims = Dimensions::default();
        dims.bottom.push_side_by_side([
            Span::new(front.x, front.right()),
            Span::new(section.x, section.right()),
        ]);
        dims.left.push(Span::new(0.0, front.height));

        let mut drawing = Drawing::new(content.width, content.height, dims.padding(&typo));
        let dashed = Stroke::dashed(typo.ink, typo.stroke, typo.font_size * 0.4);

        let mut front_view = vec![solid(front, fill, typo.stroke)];
        if self.inspection == Inspection::Front {
            front_view.push(Element::rect(
                front.inset(front.height.min(front.width) * 0.12),
                Style::outlined(dashed),
            ));
        }
        drawing.push(Element::group("front", front_view));

        let mut section_view = vec![solid(section, shade(fill, -0.03), typo.stroke)];
        if self.insulated.unwrap_or(true) {
            let band = Bounds::new(section.x, section.y, section.width * 0.12, section.height);
            section_view.push(solid(band, shade(fill, -0.12), typo.thin));
            section_view.extend(diagonal_hatch(
                band,
                (band.width * 0.6).max(typo.thin * 4.0),
                Stroke::solid(shade(fill, -0.35), typo.thin),
            ));
        }
        section_view.push(Element::Circle {
            cx: section.center_x(),
            cy: section.center_y(),
            r: section.width.min(section.height) * 0.35,
            style: Style::outlined(Stroke::dashed(typo.ink, typo.thin, typo.font_size * 0.3)),
        });
        let access = match self.inspection {
            Inspection::Bottom => Element::line((section.x, section.bottom()), (section.right(), section.bottom()), dashed),
            Inspection::Front => Element::line((section.right(), section.y), (section.right(), section.bottom()), dashed),
        };
        section_view.push(access);
        drawing.push(Element::group("section", section_view));

        drawing.push(dims.render(&typo, content));
        drawing
    }
}

//! Roller shutter (tapparella) renderer.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Material, ProductDrawing, lenient, lenient_enum, resolve, solid};
use crate::config::{
    DEFAULT_ROLLER_COLOR, DEFAULT_SHUTTER_HEIGHT, DEFAULT_SHUTTER_WIDTH, DEFAULT_SLAT_HEIGHT,
    GUIDE_WIDTH, MIN_SIDE, MIN_SLAT_HEIGHT, MIN_SLATS, ROLLER_BOX_HEIGHT,
};
use crate::dimension::{Dimensions, Span, Typography};
use crate::drawing::{Bounds, Drawing, Element, LinearGradient, Stroke, Style};
use crate::geometry::{Color, SlatPalette, parse_color, shade};

/// Id of the slat shading gradient in the drawing's definitions.
pub const SLAT_GRADIENT: &str = "slat-shading";

lenient_enum! {
    /// How the shutter is operated.
    pub enum Drive {
        #[default]
        Strap => ["strap", "cinghia"],
        Crank => ["crank", "arganello", "manovella"],
        Motor => ["motor", "motore", "motorized"],
    }
}

/// Configuration for a roller shutter.
///
/// | field        | default   | minimum |
/// |--------------|-----------|---------|
/// | `width`      | 1000      | 100     |
/// | `height`     | 1400      | 100     |
/// | `slatHeight` | 55        | 10      |
/// | `color`      | `#c8c8c8` |         |
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct RollerShutterConfig {
    #[serde(deserialize_with = "lenient::number")]
    pub width: Option<f32>,

    #[serde(deserialize_with = "lenient::number")]
    pub height: Option<f32>,

    /// Target height of one slat; the actual pitch is adjusted so a whole
    /// number of slats fills the opening.
    #[serde(deserialize_with = "lenient::number")]
    pub slat_height: Option<f32>,

    /// Slat colour; highlight and shadow tones are derived from it.
    #[serde(deserialize_with = "lenient::text")]
    pub color: Option<String>,

    /// Material of the guides and the housing box.
    #[serde(deserialize_with = "lenient::choice")]
    pub material: Material,

    /// Draw the housing box on top.
    #[serde(deserialize_with = "lenient::flag")]
    pub with_box: Option<bool>,

    #[serde(deserialize_with = "lenient::choice")]
    pub drive: Drive,
}

impl RollerShutterConfig {
    fn size(&self) -> (f32, f32) {
        (
            resolve("width", self.width, DEFAULT_SHUTTER_WIDTH, MIN_SIDE).round(),
            resolve("height", self.height, DEFAULT_SHUTTER_HEIGHT, MIN_SIDE).round(),
        )
    }

    /// Number of slats: `round(height / slat_height)`, never fewer than 4.
    pub fn slat_count(&self) -> u32 {
        let (_, height) = self.size();
        let slat = resolve("slatHeight", self.slat_height, DEFAULT_SLAT_HEIGHT, MIN_SLAT_HEIGHT);
        ((height / slat).round() as u32).max(MIN_SLATS)
    }

    /// Highlight, base and shadow tones for the slats.
    pub fn palette(&self) -> SlatPalette {
        SlatPalette::from_base(parse_color(self.color.as_deref(), DEFAULT_ROLLER_COLOR))
    }
}

impl ProductDrawing for RollerShutterConfig {
    fn draw(&self) -> Drawing {
        let (width, height) = self.size();
        let count = self.slat_count();
        let palette = self.palette();
        let typo = Typography::for_extent(width, height);
        debug!(width, height, slats = count, "drawing roller shutter");

        let guide = GUIDE_WIDTH.min(width / 8.0);
        let box_height = if self.with_box.unwrap_or(false) {
            ROLLER_BOX_HEIGHT.min(height / 5.0)
        } else {
            0.0
        };
        let curtain = Bounds::new(guide, box_height, width - 2.0 * guide, height - box_height);
        let pitch = curtain.height / count as f32;

        let mut dims = Dimensions::overall(width, height);
        if box_height > 0.0 {
            dims.right.push_group([
                Span::new(0.0, box_height),
                Span::new(box_height, height),
            ]);
        }

        let mut drawing = Drawing::new(width, height, dims.padding(&typo));
        drawing.add_gradient(LinearGradient {
            id: SLAT_GRADIENT.to_string(),
            stops: vec![(0.0, palette.highlight), (0.45, palette.base), (1.0, palette.shadow)],
            vertical: true,
        });

        let seam = Stroke::solid(shade(palette.shadow, -0.1), typo.thin);
        let slats = (0..count)
            .map(|i| {
                let slat = Bounds::new(curtain.x, curtain.y + i as f32 * pitch, curtain.width, pitch);
                Element::rect(slat, Style::gradient(SLAT_GRADIENT).with_stroke(seam))
            })
            .collect();
        drawing.push(Element::group("slats", slats));

        let bar = Bounds::new(curtain.x, curtain.bottom() - pitch * 0.5, curtain.width, pitch * 0.5);
        drawing.push(Element::group(
            "bottom-bar",
            vec![solid(bar, shade(palette.shadow, -0.12), typo.thin)],
        ));

        let guide_fill = shade(self.material.default_color(), -0.08);
        drawing.push(Element::group(
            "guides",
            vec![
                solid(Bounds::new(0.0, box_height, guide, height - box_height), guide_fill, typo.stroke),
                solid(
                    Bounds::new(width - guide, box_height, guide, height - box_height),
                    guide_fill,
                    typo.stroke,
                ),
            ],
        ));

        if box_height > 0.0 {
            let housing = Bounds::new(0.0, 0.0, width, box_height);
            drawing.push(Element::group(
                "box",
                vec![
                    solid(housing, self.material.default_color(), typo.stroke),
                    Element::line(
                        (housing.x + guide, housing.bottom() - box_height * 0.25),
                        (housing.right() - guide, housing.bottom() - box_height * 0.25),
                        Stroke::dashed(typo.ink, typo.thin, typo.font_size * 0.4),
                    ),
                ],
            ));
        }

        drawing.push(Element::group("drive", drive_glyph(self.drive, width, guide, curtain, &typo)));
        drawing.push(dims.render(&typo, Bounds::from_size(width, height)));
        drawing
    }
}

fn drive_glyph(drive: Drive, width: f32, guide: f32, curtain: Bounds, typo: &Typography) -> Vec<Element> {
    let x = width - guide / 2.0;
    let dark = Color::new(60, 60, 60);
    match drive {
        Drive::Strap => vec![Element::rect(
            Bounds::new(x - guide * 0.15, curtain.y + curtain.height * 0.3, guide * 0.3, curtain.height * 0.35),
            Style::filled(dark),
        )],
        Drive::Crank => {
            let top = curtain.y + curtain.height * 0.3;
            let bottom = curtain.y + curtain.height * 0.65;
            vec![
                Element::line((x, top), (x, bottom), Stroke::solid(dark, typo.stroke)),
                Element::Circle {
                    cx: x,
                    cy: bottom,
                    r: guide * 0.3,
                    style: Style::filled(dark),
                },
            ]
        }
        Drive::Motor => {
            let cy = curtain.y + guide.max(typo.font_size);
            vec![
                Element::Circle {
                    cx: x,
                    cy,
                    r: typo.font_size * 0.6,
                    style: Style::filled(Color::new(255, 255, 255)).with_stroke(Stroke::solid(dark, typo.thin)),
                },
                Element::text(x, cy + typo.font_size * 0.35, "M", typo.font_size * 0.9, dark),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shutter(height: f32, slat: Option<f32>) -> RollerShutterConfig {
        RollerShutterConfig {
            width: Some(1000.0),
            height: Some(height),
            slat_height: slat,
            ..Default::default()
        }
    }

    fn slat_group(drawing: &Drawing) -> &[Element] {
        drawing
            .elements
            .iter()
            .find_map(|e| match e {
                Element::Group { class: "slats", children } => Some(children.as_slice()),
                _ => None,
            })
            .expect("slats group")
    }

    #[test]
    fn slat_count_rounds_height() {
        assert_eq!(shutter(1400.0, Some(55.0)).slat_count(), 25);
        assert_eq!(shutter(1400.0, None).slat_count(), 25);
        assert_eq!(shutter(1500.0, Some(40.0)).slat_count(), 38);
    }

    #[test]
    fn slat_count_has_minimum() {
        assert_eq!(shutter(100.0, Some(55.0)).slat_count(), 4);
        assert_eq!(shutter(-10.0, Some(55.0)).slat_count(), 4);
    }

    #[test]
    fn draws_one_rect_per_slat() {
        let drawing = shutter(1400.0, Some(55.0)).draw();
        assert_eq!(slat_group(&drawing).len(), 25);
        assert_eq!(drawing.gradients.len(), 1);
        assert_eq!(drawing.gradients[0].id, SLAT_GRADIENT);
    }

    #[test]
    fn shading_follows_colour() {
        let config = RollerShutterConfig {
            color: Some("#8a2be2".into()),
            ..shutter(1200.0, None)
        };
        let palette = config.palette();
        assert_eq!(palette.base, Color::new(0x8a, 0x2b, 0xe2));
        let drawing = config.draw();
        assert_eq!(drawing.gradients[0].stops[0].1, palette.highlight);
        assert_eq!(drawing.gradients[0].stops[2].1, palette.shadow);
    }

    #[test]
    fn box_adds_call_outs() {
        let plain = shutter(1400.0, None).draw();
        let boxed = RollerShutterConfig {
            with_box: Some(true),
            ..shutter(1400.0, None)
        }
        .draw();
        assert!(boxed.padding.right > plain.padding.right);
        assert!(boxed.elements.iter().any(|e| matches!(e, Element::Group { class: "box", .. })));
    }

    #[test]
    fn every_drive_draws() {
        for drive in [Drive::Strap, Drive::Crank, Drive::Motor] {
            let drawing = RollerShutterConfig { drive, ..shutter(1400.0, None) }.draw();
            assert!(drawing.is_renderable());
        }
    }
}

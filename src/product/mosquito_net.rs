//! Roll-up mosquito net (zanzariera) renderer.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ProductDrawing, lenient, lenient_enum, resolve, solid};
use crate::config::{DEFAULT_NET_COLOR, DEFAULT_NET_HEIGHT, DEFAULT_NET_WIDTH, MIN_SIDE, NET_BOX, NET_GUIDE, NET_MESH_PITCH};
use crate::dimension::{Dimensions, Typography};
use crate::drawing::{Bounds, Drawing, Element, Stroke};
use crate::geometry::{Color, parse_color, shade};

lenient_enum! {
    /// Direction the net rolls up.
    pub enum NetRoll {
        /// Box on top, net pulled down.
        #[default]
        Vertical => ["vertical", "verticale"],
        /// Box on the left, net pulled sideways.
        Lateral => ["lateral", "laterale", "horizontal", "orizzontale"],
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct MosquitoNetConfig {
    #[serde(deserialize_with = "lenient::number")]
    pub width: Option<f32>,

    #[serde(deserialize_with = "lenient::number")]
    pub height: Option<f32>,

    #[serde(deserialize_with = "lenient::choice")]
    pub roll: NetRoll,

    /// Box, guide and bar colour.
    #[serde(deserialize_with = "lenient::text")]
    pub color: Option<String>,
}

/// Resolved parts of a mosquito net, in drawing units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetLayout {
    pub width: f32,
    pub height: f32,
    pub housing: Bounds,
    pub guides: [Bounds; 2],
    pub mesh: Bounds,
    pub bar: Bounds,
}

impl MosquitoNetConfig {
    pub fn layout(&self) -> NetLayout {
        let width = resolve("width", self.width, DEFAULT_NET_WIDTH, MIN_SIDE).round();
        let height = resolve("height", self.height, DEFAULT_NET_HEIGHT, MIN_SIDE).round();
        let shortest = width.min(height);
        let housing = NET_BOX.min(shortest / 5.0);
        let guide = NET_GUIDE.min(shortest / 8.0);
        let bar = housing * 0.5;

        match self.roll {
            NetRoll::Vertical => {
                let mesh = Bounds::new(guide, housing, width - 2.0 * guide, height - housing - bar);
                NetLayout {
                    width,
                    height,
                    housing: Bounds::new(0.0, 0.0, width, housing),
                    guides: [
                        Bounds::new(0.0, housing, guide, height - housing),
                        Bounds::new(width - guide, housing, guide, height - housing),
                    ],
                    mesh,
                    bar: Bounds::new(guide, mesh.bottom(), mesh.width, bar),
                }
            }
            NetRoll::Lateral => {
                let mesh = Bounds::new(housing, guide, width - housing - bar, height - 2.0 * guide);
                NetLayout {
                    width,
                    height,
                    housing: Bounds::new(0.0, 0.0, housing, height),
                    guides: [
                        Bounds::new(housing, 0.0, width - housing, guide),
                        Bounds::new(housing, height - guide, width - housing, guide),
                    ],
                    mesh,
                    bar: Bounds::new(mesh.right(), guide, bar, mesh.height),
                }
            }
        }
    }
}

impl ProductDrawing for MosquitoNetConfig {
    fn draw(&self) -> Drawing {
        let layout = self.layout();
        let (width, height) = (layout.width, layout.height);
        let typo = Typography::for_extent(width, height);
        let fill = parse_color(self.color.as_deref(), DEFAULT_NET_COLOR);
        debug!(width, height, roll = ?self.roll, "drawing mosquito net");

        let dims = Dimensions::overall(width, height);
        let mut drawing = Drawing::new(width, height, dims.padding(&typo));

        let mut mesh = vec![solid(layout.mesh, Color::new(236, 240, 242), typo.thin)];
        mesh.extend(mesh_lines(layout.mesh, Stroke::solid(Color::new(150, 158, 163), typo.thin * 0.5)));
        drawing.push(Element::group("mesh", mesh));

        let mut profiles: Vec<Element> = layout.guides.iter().map(|g| solid(*g, shade(fill, -0.05), typo.thin)).collect();
        profiles.push(solid(layout.housing, fill, typo.stroke));
        profiles.push(solid(layout.bar, shade(fill, -0.15), typo.thin));
        drawing.push(Element::group("profiles", profiles));

        drawing.push(dims.render(&typo, Bounds::from_size(width, height)));
        drawing
    }
}

/// Square mesh grid, `NET_MESH_PITCH` apart, anchored on the area's corner.
fn mesh_lines(area: Bounds, stroke: Stroke) -> Vec<Element> {
    let mut lines = Vec::new();
    let mut x = area.x + NET_MESH_PITCH;
    while x < area.right() {
        lines.push(Element::line((x, area.y), (x, area.bottom()), stroke));
        x += NET_MESH_PITCH;
    }
    let mut y = area.y + NET_MESH_PITCH;
    while y < area.bottom() {
        lines.push(Element::line((area.x, y), (area.right(), y), stroke));
        y += NET_MESH_PITCH;
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_roll_layout() {
        let layout = MosquitoNetConfig::default().layout();
        assert_eq!(layout.housing, Bounds::new(0.0, 0.0, 1000.0, NET_BOX));
        assert_eq!(layout.mesh.x, NET_GUIDE);
        assert_eq!(layout.bar.bottom(), 1400.0);
        assert_eq!(layout.guides[1].right(), 1000.0);
    }

    #[test]
    fn lateral_roll_layout() {
        let layout = MosquitoNetConfig {
            roll: NetRoll::Lateral,
            ..Default::default()
        }
        .layout();
        assert_eq!(layout.housing, Bounds::new(0.0, 0.0, NET_BOX, 1400.0));
        assert_eq!(layout.bar.right(), 1000.0);
        assert!(layout.bar.height > layout.bar.width);
    }

    #[test]
    fn content_matches_size() {
        for roll in [NetRoll::Vertical, NetRoll::Lateral] {
            let drawing = MosquitoNetConfig {
                width: Some(900.0),
                height: Some(1700.0),
                roll,
                ..Default::default()
            }
            .draw();
            assert_eq!((drawing.content_width, drawing.content_height), (900.0, 1700.0));
        }
    }

    #[test]
    fn mesh_pitch() {
        let lines = mesh_lines(Bounds::new(0.0, 0.0, 400.0, 200.0), Stroke::solid(Color::new(0, 0, 0), 1.0));
        // x = 80, 160, 240, 320; y = 80, 160
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn roll_parses_italian() {
        assert_eq!(NetRoll::parse_lenient("Laterale"), NetRoll::Lateral);
        assert_eq!(NetRoll::parse_lenient(""), NetRoll::Vertical);
    }
}

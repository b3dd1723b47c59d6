//! Window and door grid renderer.
//!
//! A window unit is a frame split by mullions into rows, and each row into
//! columns. Every cell holds one leaf: fixed glazing set directly in the frame,
//! or an opening sash with its own profile, opening glyph and handle.
//!
//! Interior space is split with [`distribute`], in whole millimetres, so the
//! labelled cell sizes always add up to the interior size.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Glazing, Material, ProductDrawing, frame_color, glazing, lenient, resolve, solid};
use crate::config::{
    DEFAULT_DOOR_HEIGHT, DEFAULT_DOOR_WIDTH, DEFAULT_FRAME, DEFAULT_MULLION, DEFAULT_WINDOW_HEIGHT,
    DEFAULT_WINDOW_WIDTH, DOOR_PANEL_MAX, MIN_CELL, MIN_FRAME, MIN_MULLION, MIN_SIDE, SASH_RATIO,
};
use crate::dimension::{Dimensions, Span, Typography};
use crate::drawing::{Bounds, Drawing, Element, Stroke};
use crate::geometry::{Color, distribute, offsets, shade};
use crate::leaf::{LeafState, handle_glyph, opening_glyph};

// ============================================================================
// Configuration
// ============================================================================

/// One column (leaf) of a grid row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct GridColumn {
    /// Relative width within the row.
    #[serde(deserialize_with = "lenient::number")]
    pub ratio: Option<f32>,

    #[serde(deserialize_with = "lenient::choice")]
    pub state: LeafState,

    /// Overrides the unit's glazing for this leaf.
    #[serde(deserialize_with = "lenient::optional_choice", skip_serializing_if = "Option::is_none")]
    pub glazing: Option<Glazing>,
}

/// One horizontal band of a grid.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct GridRow {
    /// Relative height within the unit.
    #[serde(deserialize_with = "lenient::number")]
    pub ratio: Option<f32>,

    #[serde(alias = "columns", deserialize_with = "lenient::list")]
    pub cols: Vec<GridColumn>,
}

/// Configuration for windows and glazed doors.
///
/// | field     | default (window / door) | minimum |
/// |-----------|-------------------------|---------|
/// | `width`   | 1200 / 1400             | 100     |
/// | `height`  | 1400 / 2300             | 100     |
/// | `frame`   | 60                      | 10      |
/// | `mullion` | 40                      | 5       |
///
/// No rows (or a row with no columns) means a single fixed leaf.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct GridConfig {
    #[serde(deserialize_with = "lenient::number")]
    pub width: Option<f32>,

    #[serde(deserialize_with = "lenient::number")]
    pub height: Option<f32>,

    /// Frame profile thickness.
    #[serde(deserialize_with = "lenient::number")]
    pub frame: Option<f32>,

    /// Mullion (and transom) thickness.
    #[serde(deserialize_with = "lenient::number")]
    pub mullion: Option<f32>,

    #[serde(deserialize_with = "lenient::list")]
    pub rows: Vec<GridRow>,

    #[serde(deserialize_with = "lenient::choice")]
    pub glazing: Glazing,

    #[serde(deserialize_with = "lenient::choice")]
    pub material: Material,

    /// Frame colour as `#rrggbb`; defaults to the material colour.
    #[serde(deserialize_with = "lenient::text")]
    pub color: Option<String>,

    /// Opaque kick panel at the bottom of door leaves (doors only, default on).
    #[serde(deserialize_with = "lenient::flag")]
    pub kick_panel: Option<bool>,
}

impl GridConfig {
    /// A single-leaf unit of the given size.
    pub fn single(width: f32, height: f32, state: LeafState) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            rows: vec![GridRow {
                ratio: Some(1.0),
                cols: vec![GridColumn {
                    ratio: Some(1.0),
                    state,
                    glazing: None,
                }],
            }],
            ..Self::default()
        }
    }
}

// ============================================================================
// Grid
// ============================================================================

/// Whether a grid is drawn as a window or a door.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKind {
    Window,
    Door,
}

/// A grid configuration bound to the family it is drawn as.
#[derive(Debug, Clone, Copy)]
pub struct Grid<'a> {
    pub config: &'a GridConfig,
    pub kind: GridKind,
}

impl<'a> Grid<'a> {
    pub fn window(config: &'a GridConfig) -> Self {
        Self {
            config,
            kind: GridKind::Window,
        }
    }

    pub fn door(config: &'a GridConfig) -> Self {
        Self {
            config,
            kind: GridKind::Door,
        }
    }

    /// Resolved layout in whole millimetres.
    pub fn layout(&self) -> GridLayout {
        let config = self.config;
        let (default_w, default_h) = match self.kind {
            GridKind::Window => (DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
            GridKind::Door => (DEFAULT_DOOR_WIDTH, DEFAULT_DOOR_HEIGHT),
        };

        let width = resolve("width", config.width, default_w, MIN_SIDE).round() as u32;
        let height = resolve("height", config.height, default_h, MIN_SIDE).round() as u32;
        let shortest = width.min(height) as f32;
        let frame = resolve("frame", config.frame, DEFAULT_FRAME, MIN_FRAME)
            .min(shortest / 4.0)
            .round() as u32;
        let mullion = resolve("mullion", config.mullion, DEFAULT_MULLION, MIN_MULLION)
            .min(shortest / 8.0)
            .round() as u32;
        // Doors stand on a low threshold instead of a full bottom frame member.
        let sill = match self.kind {
            GridKind::Window => frame,
            GridKind::Door => (frame as f32 * 0.35).round() as u32,
        };

        let rows = normalized_rows(&config.rows);
        let row_ratios: Vec<f32> = rows.iter().map(|r| r.ratio.unwrap_or(1.0)).collect();
        let gaps = mullion.saturating_mul(rows.len() as u32 - 1);
        let inner_height = height.saturating_sub(frame.saturating_add(sill).saturating_add(gaps));
        let row_heights = distribute(inner_height, &row_ratios);
        let row_tops = offsets(frame as f32, &row_heights, mullion as f32);

        let cells = rows
            .iter()
            .zip(row_heights.iter().zip(&row_tops))
            .map(|(row, (&row_height, &top))| {
                let col_ratios: Vec<f32> = row.cols.iter().map(|c| c.ratio.unwrap_or(1.0)).collect();
                let gaps = mullion.saturating_mul(row.cols.len() as u32 - 1);
                let inner_width = width.saturating_sub(frame.saturating_mul(2).saturating_add(gaps));
                let col_widths = distribute(inner_width, &col_ratios);
                let col_lefts = offsets(frame as f32, &col_widths, mullion as f32);
                row.cols
                    .iter()
                    .zip(col_widths.iter().zip(&col_lefts))
                    .map(|(col, (&col_width, &left))| GridCell {
                        bounds: Bounds::new(left, top, col_width as f32, row_height as f32),
                        width: col_width,
                        height: row_height,
                        state: col.state,
                        glazing: col.glazing.unwrap_or(config.glazing),
                    })
                    .collect()
            })
            .collect();

        GridLayout {
            width,
            height,
            frame,
            mullion,
            sill,
            row_heights,
            cells,
        }
    }
}

/// One resolved leaf position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub bounds: Bounds,
    pub width: u32,
    pub height: u32,
    pub state: LeafState,
    pub glazing: Glazing,
}

/// Resolved grid geometry in whole millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub width: u32,
    pub height: u32,
    pub frame: u32,
    pub mullion: u32,
    /// Bottom frame member (a low threshold on doors).
    pub sill: u32,
    pub row_heights: Vec<u32>,
    /// Cells by row, then by column.
    pub cells: Vec<Vec<GridCell>>,
}

fn normalized_rows(rows: &[GridRow]) -> Vec<GridRow> {
    let fixed = || GridColumn {
        ratio: Some(1.0),
        state: LeafState::Fixed,
        glazing: None,
    };
    if rows.is_empty() {
        return vec![GridRow {
            ratio: Some(1.0),
            cols: vec![fixed()],
        }];
    }
    rows.iter()
        .map(|row| GridRow {
            ratio: row.ratio,
            cols: if row.cols.is_empty() { vec![fixed()] } else { row.cols.clone() },
        })
        .collect()
}

impl ProductDrawing for Grid<'_> {
    fn draw(&self) -> Drawing {
        let layout = self.layout();
        let (width, height) = (layout.width as f32, layout.height as f32);
        debug!(
            kind = ?self.kind,
            width = layout.width,
            height = layout.height,
            rows = layout.cells.len(),
            "drawing grid"
        );

        let typo = Typography::for_extent(width, height);
        let frame_fill = frame_color(self.config.color.as_deref(), self.config.material);
        let handle_fill = self.config.material.handle_color();

        // Call-outs: overall size, per-row column widths, row heights.
        let mut dims = Dimensions::overall(width, height);
        for row in &layout.cells {
            if row.len() > 1 {
                dims.top.push_group(
                    row.iter()
                        .map(|c| Span::with_value(c.bounds.x, c.bounds.right(), c.width as f32)),
                );
            }
        }
        if layout.cells.len() > 1 {
            dims.right.push_group(layout.cells.iter().filter_map(|row| {
                row.first()
                    .map(|c| Span::with_value(c.bounds.y, c.bounds.bottom(), c.height as f32))
            }));
        }

        let mut drawing = Drawing::new(width, height, dims.padding(&typo));
        drawing.push(Element::group(
            "frame",
            vec![solid(Bounds::from_size(width, height), frame_fill, typo.stroke)],
        ));

        let kick_panel = self.kind == GridKind::Door && self.config.kick_panel.unwrap_or(true);
        let last_row = layout.cells.len().saturating_sub(1);
        let leaves = layout
            .cells
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.iter().flat_map(move |cell| {
                    draw_leaf(
                        cell,
                        layout.frame as f32,
                        frame_fill,
                        handle_fill,
                        kick_panel && r == last_row,
                        &typo,
                    )
                })
            })
            .collect();
        drawing.push(Element::group("leaves", leaves));
        drawing.push(dims.render(&typo, Bounds::from_size(width, height)));
        drawing
    }
}

fn draw_leaf(
    cell: &GridCell,
    frame: f32,
    frame_fill: Color,
    handle_fill: Color,
    kick_panel: bool,
    typo: &Typography,
) -> Vec<Element> {
    let mut out = Vec::new();
    let bounds = cell.bounds;
    if bounds.width < 1.0 || bounds.height < 1.0 {
        return out;
    }

    let profile = (frame * SASH_RATIO)
        .min(bounds.width.min(bounds.height) / 3.0)
        .max(0.0);
    let infill = if cell.state.is_fixed() {
        // Fixed glazing sits in the frame behind a thin bead.
        bounds.inset((frame * 0.15).min(bounds.width.min(bounds.height) / 4.0))
    } else {
        out.push(solid(bounds, shade(frame_fill, 0.03), typo.stroke));
        bounds.inset(profile)
    };

    let glass_area = if kick_panel && infill.height > MIN_CELL * 3.0 {
        let panel_height = DOOR_PANEL_MAX.min(infill.height / 3.0);
        let glass = Bounds::new(infill.x, infill.y, infill.width, infill.height - panel_height - profile.min(panel_height / 4.0));
        let panel = Bounds::new(infill.x, infill.bottom() - panel_height, infill.width, panel_height);
        out.extend(glazing(glass, cell.glazing, frame_fill, typo.thin));
        out.push(solid(panel, shade(frame_fill, -0.05), typo.thin));
        glass
    } else {
        out.extend(glazing(infill, cell.glazing, frame_fill, typo.thin));
        infill
    };

    out.extend(opening_glyph(cell.state, glass_area, Stroke::solid(typo.ink, typo.thin)));
    if let Some(handle) = handle_glyph(cell.state, bounds, profile, handle_fill) {
        out.push(handle);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::Style;
    use crate::geometry::to_hex;
    use pretty_assertions::assert_eq;

    fn two_rows() -> GridConfig {
        serde_json::from_str(
            r#"{
                "width": 1800, "height": 2000, "frame": 60, "mullion": 40,
                "rows": [
                    { "ratio": 1, "cols": [{ "ratio": 1, "state": "vasistas" }, { "ratio": 2, "state": "fixed" }] },
                    { "ratio": 3, "cols": [{ "ratio": 1, "state": "opens-left" }, { "ratio": 1, "state": "opens-right" }] }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn cells_fill_interior_exactly() {
        let config = two_rows();
        let layout = Grid::window(&config).layout();

        assert_eq!(layout.row_heights.iter().sum::<u32>(), 2000 - 2 * 60 - 40);
        for row in &layout.cells {
            let widths: u32 = row.iter().map(|c| c.width).sum();
            assert_eq!(widths, 1800 - 2 * 60 - 40);
        }
        assert_eq!(layout.row_heights, vec![460, 1380]);
        assert_eq!(layout.cells[0][0].bounds.x, 60.0);
        assert_eq!(layout.cells[0][1].bounds.x, 60.0 + 546.0 + 40.0);
        assert_eq!(layout.cells[1][0].bounds.y, 60.0 + 460.0 + 40.0);
    }

    #[test]
    fn content_matches_configuration() {
        let config = two_rows();
        let drawing = Grid::window(&config).draw();
        assert_eq!(drawing.content_width, 1800.0);
        assert_eq!(drawing.content_height, 2000.0);
        let vb = drawing.view_box();
        assert_eq!(vb.width, 1800.0 + drawing.padding.horizontal());
        assert_eq!(vb.height, 2000.0 + drawing.padding.vertical());
    }

    #[test]
    fn rows_stack_their_call_outs() {
        let single = GridConfig::single(1200.0, 1500.0, LeafState::Fixed);
        let stacked = two_rows();
        let flat = Grid::window(&single).draw();
        let tall = Grid::window(&stacked).draw();
        // Two multi-column rows with different splits need two tiers on top.
        assert!(tall.padding.top > flat.padding.top);
        assert!(tall.padding.right > flat.padding.right);
    }

    #[test]
    fn identical_rows_share_one_tier() {
        let row = GridRow {
            ratio: Some(1.0),
            cols: vec![
                GridColumn { ratio: Some(1.0), ..Default::default() },
                GridColumn { ratio: Some(1.0), ..Default::default() },
            ],
        };
        let one = GridConfig {
            rows: vec![row.clone()],
            ..GridConfig::single(1200.0, 1400.0, LeafState::Fixed)
        };
        let two = GridConfig {
            rows: vec![row.clone(), row],
            ..GridConfig::single(1200.0, 1400.0, LeafState::Fixed)
        };
        assert_eq!(
            Grid::window(&one).draw().padding.top,
            Grid::window(&two).draw().padding.top
        );
    }

    #[test]
    fn degenerate_sizes_still_draw() {
        let config = GridConfig {
            width: Some(0.0),
            height: Some(-40.0),
            frame: Some(-1.0),
            ..GridConfig::default()
        };
        let drawing = Grid::window(&config).draw();
        assert!(drawing.is_renderable());
        assert_eq!(drawing.content_width, MIN_SIDE);
        assert_eq!(drawing.content_height, MIN_SIDE);
    }

    #[test]
    fn many_columns_never_panic() {
        let cols = (0..40)
            .map(|_| GridColumn { ratio: Some(1.0), state: LeafState::OpensLeft, glazing: None })
            .collect();
        let config = GridConfig {
            width: Some(100.0),
            height: Some(100.0),
            rows: vec![GridRow { ratio: None, cols }],
            ..GridConfig::default()
        };
        assert!(Grid::window(&config).draw().is_renderable());
    }

    #[test]
    fn door_uses_threshold_and_defaults() {
        let config = GridConfig::default();
        let layout = Grid::door(&config).layout();
        assert_eq!((layout.width, layout.height), (1400, 2300));
        assert!(layout.sill < layout.frame);
    }

    #[test]
    fn frame_colour_follows_configuration() {
        let config = GridConfig {
            color: Some("#123456".into()),
            ..GridConfig::single(1000.0, 1000.0, LeafState::Fixed)
        };
        let drawing = Grid::window(&config).draw();
        let Element::Group { children, .. } = &drawing.elements[0] else {
            panic!("expected the frame group first");
        };
        let Element::Rect { style: Style { fill, .. }, .. } = &children[0] else {
            panic!("expected the frame rect");
        };
        assert_eq!(fill, &crate::drawing::Paint::Solid("#123456".parse().unwrap()));
        assert_eq!(to_hex(Material::Pvc.default_color()), "#f4f4f4");
    }
}

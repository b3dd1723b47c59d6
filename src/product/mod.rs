//! Product families and their drawing configurations.
//!
//! A [`ProductConfig`] is a closed sum type discriminated by `kind`, one
//! variant per product family. Each family lives in its own module and knows
//! how to draw itself through [`ProductDrawing`].
//!
//! # Lenient configuration
//!
//! Configurations come straight from form state, so every field is optional
//! and forgiving: numbers may arrive as strings, enumerations may carry
//! unknown values, and sizes may be zero or negative. None of this is an
//! error. Missing or unreadable values take the documented default from
//! [`crate::config`]; undersized values are clamped to the documented minimum.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "kind": "window",
//!   "width": 1200,
//!   "height": 1500,
//!   "frame": 34,
//!   "rows": [{ "ratio": 1, "cols": [{ "ratio": 1, "state": "fixed" }] }]
//! }
//! ```

pub mod armored_door;
pub mod cassonetto;
pub mod grid;
pub mod interior_door;
pub mod mosquito_net;
pub mod roller_shutter;
pub mod shutter;

pub use armored_door::{ArmoredDoorConfig, ArmoredPanel};
pub use cassonetto::{CassonettoConfig, CassonettoLayout, Inspection};
pub use grid::{Grid, GridCell, GridColumn, GridConfig, GridKind, GridLayout, GridRow};
pub use interior_door::{InteriorDoorConfig, InteriorPanel};
pub use mosquito_net::{MosquitoNetConfig, NetLayout, NetRoll};
pub use roller_shutter::{Drive, RollerShutterConfig};
pub use shutter::{ShutterConfig, ShutterInfill};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::MAX_SIDE;
use crate::drawing::{Bounds, Drawing, Element, Stroke, Style};
use crate::geometry::{Color, outline_for, parse_color, shade};

// ============================================================================
// ProductDrawing
// ============================================================================

/// A configuration that can draw itself.
///
/// Implementations are pure: the same configuration always yields the same
/// drawing, and no input makes them fail.
pub trait ProductDrawing {
    fn draw(&self) -> Drawing;
}

// ============================================================================
// ProductConfig
// ============================================================================

/// Drawing configuration for one quote line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum ProductConfig {
    Window(GridConfig),
    Door(GridConfig),
    RollerShutter(RollerShutterConfig),
    Shutter(ShutterConfig),
    ArmoredDoor(ArmoredDoorConfig),
    InteriorDoor(InteriorDoorConfig),
    Cassonetto(CassonettoConfig),
    MosquitoNet(MosquitoNetConfig),
}

/// The product family of a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductKind {
    Window,
    Door,
    RollerShutter,
    Shutter,
    ArmoredDoor,
    InteriorDoor,
    Cassonetto,
    MosquitoNet,
}

impl ProductKind {
    /// The `kind` tag used in JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            ProductKind::Window => "window",
            ProductKind::Door => "door",
            ProductKind::RollerShutter => "roller-shutter",
            ProductKind::Shutter => "shutter",
            ProductKind::ArmoredDoor => "armored-door",
            ProductKind::InteriorDoor => "interior-door",
            ProductKind::Cassonetto => "cassonetto",
            ProductKind::MosquitoNet => "mosquito-net",
        }
    }

    /// Italian trade name, as printed on quotes.
    pub fn label(self) -> &'static str {
        match self {
            ProductKind::Window => "Finestra",
            ProductKind::Door => "Portafinestra",
            ProductKind::RollerShutter => "Tapparella",
            ProductKind::Shutter => "Persiana",
            ProductKind::ArmoredDoor => "Porta blindata",
            ProductKind::InteriorDoor => "Porta interna",
            ProductKind::Cassonetto => "Cassonetto",
            ProductKind::MosquitoNet => "Zanzariera",
        }
    }
}

impl ProductConfig {
    pub fn kind(&self) -> ProductKind {
        match self {
            ProductConfig::Window(_) => ProductKind::Window,
            ProductConfig::Door(_) => ProductKind::Door,
            ProductConfig::RollerShutter(_) => ProductKind::RollerShutter,
            ProductConfig::Shutter(_) => ProductKind::Shutter,
            ProductConfig::ArmoredDoor(_) => ProductKind::ArmoredDoor,
            ProductConfig::InteriorDoor(_) => ProductKind::InteriorDoor,
            ProductConfig::Cassonetto(_) => ProductKind::Cassonetto,
            ProductConfig::MosquitoNet(_) => ProductKind::MosquitoNet,
        }
    }

    /// Draws the configuration with its family's renderer.
    pub fn render(&self) -> Drawing {
        self.draw()
    }

    /// Deserializes a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl ProductDrawing for ProductConfig {
    fn draw(&self) -> Drawing {
        match self {
            ProductConfig::Window(config) => Grid::window(config).draw(),
            ProductConfig::Door(config) => Grid::door(config).draw(),
            ProductConfig::RollerShutter(config) => config.draw(),
            ProductConfig::Shutter(config) => config.draw(),
            ProductConfig::ArmoredDoor(config) => config.draw(),
            ProductConfig::InteriorDoor(config) => config.draw(),
            ProductConfig::Cassonetto(config) => config.draw(),
            ProductConfig::MosquitoNet(config) => config.draw(),
        }
    }
}

// ============================================================================
// Field Resolution
// ============================================================================

/// Resolves an optional dimension to a drawable value.
///
/// Missing or non-finite values become `fallback`; values below `min`
/// (including zero and negatives) are clamped to `min`, and values above
/// [`MAX_SIDE`] to that.
pub fn resolve(field: &'static str, value: Option<f32>, fallback: f32, min: f32) -> f32 {
    match value {
        Some(v) if v.is_finite() => {
            if v < min {
                warn!(field, value = v, min, "dimension below minimum, clamping");
                min
            } else if v > MAX_SIDE {
                warn!(field, value = v, max = MAX_SIDE, "dimension above maximum, clamping");
                MAX_SIDE
            } else {
                v
            }
        }
        _ => {
            debug!(field, fallback, "dimension missing, using default");
            fallback
        }
    }
}

/// Resolves an optional count into `min..=max`, with `fallback` when missing.
pub fn resolve_count(value: Option<u32>, fallback: u32, min: u32, max: u32) -> u32 {
    value.unwrap_or(fallback).clamp(min, max)
}

/// Serde helpers that never reject form values.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn as_f64(value: Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
            _ => None,
        }
    }

    /// A number, a numeric string, or anything else as `None`.
    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f32>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .and_then(as_f64)
            .map(|v| v as f32)
            .filter(|v| v.is_finite()))
    }

    /// A non-negative whole count; fractions are rounded.
    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .and_then(as_f64)
            .filter(|v| v.is_finite())
            .map(|v| v.round().clamp(0.0, f64::from(u32::MAX)) as u32))
    }

    /// A boolean, `"true"`/`"false"`, `"si"`/`"no"` or `0`/`1`.
    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Bool(b)) => Some(b),
            Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "si" | "sì" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        })
    }

    /// A string, or `None` for anything else.
    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
    }

    /// An enumeration parsed from a string; `null` and non-strings give the default.
    pub fn choice<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: From<String> + Default,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => T::from(s),
            _ => T::default(),
        })
    }

    /// Like [`choice`], but `null` and non-strings give `None`.
    pub fn optional_choice<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: From<String>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => Some(T::from(s)),
            _ => None,
        })
    }

    /// A list, with `null` treated as empty.
    pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
    }
}

// ============================================================================
// Lenient Enumerations
// ============================================================================

/// Declares a style enumeration that deserializes from any string.
///
/// Each variant lists the spellings it accepts (the kebab-case name first);
/// anything else becomes the `#[default]` variant.
macro_rules! lenient_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => [$($alias:literal),+ $(,)?] ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(rename_all = "kebab-case", from = "String")]
        #[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Parses a value, falling back to the default variant.
            pub fn parse_lenient(value: &str) -> Self {
                let normalized = value.trim().to_ascii_lowercase().replace(['_', ' '], "-");
                $(
                    if [$($alias),+].contains(&normalized.as_str()) {
                        return Self::$variant;
                    }
                )+
                Self::default()
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::parse_lenient(&value)
            }
        }
    };
}

pub(crate) use lenient_enum;

lenient_enum! {
    /// Profile material; picks the default frame colour.
    pub enum Material {
        #[default]
        Pvc => ["pvc"],
        Wood => ["wood", "legno"],
        Aluminium => ["aluminium", "aluminum", "alluminio"],
        WoodAluminium => ["wood-aluminium", "wood-aluminum", "legno-alluminio"],
        Steel => ["steel", "acciaio"],
    }
}

impl Material {
    pub fn default_color(self) -> Color {
        match self {
            Material::Pvc => Color::new(244, 244, 244),
            Material::Wood => Color::new(139, 90, 43),
            Material::Aluminium => Color::new(168, 174, 178),
            Material::WoodAluminium => Color::new(122, 82, 48),
            Material::Steel => Color::new(109, 115, 119),
        }
    }

    /// Handle finish that reads well against the default frame colour.
    pub fn handle_color(self) -> Color {
        match self {
            Material::Pvc | Material::Aluminium => Color::new(90, 90, 90),
            Material::Wood | Material::WoodAluminium | Material::Steel => Color::new(200, 200, 200),
        }
    }
}

lenient_enum! {
    /// Glass or infill of a leaf.
    pub enum Glazing {
        #[default]
        Clear => ["clear", "trasparente", "double", "triple"],
        Frosted => ["frosted", "satinato", "satin"],
        Tinted => ["tinted", "fume", "reflective", "riflettente"],
        /// Opaque panel instead of glass.
        Panel => ["panel", "pannello", "cieco", "opaque"],
    }
}

impl Glazing {
    pub fn fill(self, frame: Color) -> Color {
        match self {
            Glazing::Clear => Color::new(214, 235, 247),
            Glazing::Frosted => Color::new(233, 238, 241),
            Glazing::Tinted => Color::new(159, 184, 198),
            Glazing::Panel => shade(frame, -0.05),
        }
    }
}

// ============================================================================
// Shared Drawing Helpers
// ============================================================================

/// Resolves the frame colour from an explicit value or the material default.
pub(crate) fn frame_color(color: Option<&str>, material: Material) -> Color {
    let fallback = material.default_color();
    match color {
        Some(value) => parse_color(Some(value), &crate::geometry::to_hex(fallback)),
        None => fallback,
    }
}

/// A filled rectangle outlined in a contrasting tone.
pub(crate) fn solid(bounds: Bounds, fill: Color, width: f32) -> Element {
    Element::rect(bounds, Style::filled(fill).with_stroke(Stroke::solid(outline_for(fill), width)))
}

/// Glass or panel infill with its surface marks.
pub(crate) fn glazing(area: Bounds, glazing: Glazing, frame: Color, thin: f32) -> Vec<Element> {
    let fill = glazing.fill(frame);
    let mut out = vec![solid(area, fill, thin)];
    let mark = Stroke::solid(shade(fill, -0.25), thin);

    match glazing {
        Glazing::Clear | Glazing::Tinted => {
            // Two short reflection strokes near the upper-left corner.
            let len = area.width.min(area.height) * 0.18;
            let (x, y) = (area.x + area.width * 0.15, area.y + area.height * 0.2);
            out.push(Element::line((x, y + len), (x + len, y), mark));
            out.push(Element::line((x + len * 0.35, y + len * 1.35), (x + len * 1.35, y + len * 0.35), mark));
        }
        Glazing::Frosted => {
            let pitch = (area.width.min(area.height) / 8.0).max(thin * 6.0);
            out.extend(diagonal_hatch(area, pitch, mark));
        }
        Glazing::Panel => {}
    }
    out
}

/// 45° hatch lines clipped to `area`, `pitch` apart along the diagonal.
pub(crate) fn diagonal_hatch(area: Bounds, pitch: f32, stroke: Stroke) -> Vec<Element> {
    if !(pitch > 0.0) || area.width <= 0.0 || area.height <= 0.0 {
        return Vec::new();
    }
    let (x0, y0, x1, y1) = (area.x, area.y, area.right(), area.bottom());
    let mut lines = Vec::new();
    // Lines satisfy x + y = c.
    let mut c = x0 + y0 + pitch;
    while c < x1 + y1 {
        let start_x = x0.max(c - y1);
        let end_x = x1.min(c - y0);
        if end_x > start_x {
            lines.push(Element::line((start_x, c - start_x), (end_x, c - end_x), stroke));
        }
        c += pitch;
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::LeafState;

    #[test]
    fn resolve_fallbacks() {
        assert_eq!(resolve("width", None, 1200.0, 100.0), 1200.0);
        assert_eq!(resolve("width", Some(f32::NAN), 1200.0, 100.0), 1200.0);
        assert_eq!(resolve("width", Some(0.0), 1200.0, 100.0), 100.0);
        assert_eq!(resolve("width", Some(-50.0), 1200.0, 100.0), 100.0);
        assert_eq!(resolve("width", Some(900.0), 1200.0, 100.0), 900.0);
        assert_eq!(resolve("width", Some(1e12), 1200.0, 100.0), MAX_SIDE);
        assert_eq!(resolve_count(None, 2, 1, 6), 2);
        assert_eq!(resolve_count(Some(0), 2, 1, 6), 1);
        assert_eq!(resolve_count(Some(12), 2, 1, 6), 6);
    }

    #[test]
    fn config_tagged_by_kind() {
        let config = ProductConfig::from_json(
            r#"{"kind":"window","width":1200,"height":1500,"frame":34,
                "rows":[{"ratio":1,"cols":[{"ratio":1,"state":"fixed"}]}]}"#,
        )
        .unwrap();
        let ProductConfig::Window(grid) = &config else {
            panic!("expected a window");
        };
        assert_eq!(grid.width, Some(1200.0));
        assert_eq!(grid.frame, Some(34.0));
        assert_eq!(grid.rows[0].cols[0].state, LeafState::Fixed);
        assert_eq!(config.kind(), ProductKind::Window);
    }

    #[test]
    fn lenient_values_never_fail() {
        let config = ProductConfig::from_json(
            r#"{"kind":"roller-shutter","width":"1000","height":null,
                "slatHeight":"abc","material":"unobtainium","withBox":"si"}"#,
        )
        .unwrap();
        let ProductConfig::RollerShutter(shutter) = config else {
            panic!("expected a roller shutter");
        };
        assert_eq!(shutter.width, Some(1000.0));
        assert_eq!(shutter.height, None);
        assert_eq!(shutter.slat_height, None);
        assert_eq!(shutter.material, Material::Pvc);
        assert_eq!(shutter.with_box, Some(true));
    }

    #[test]
    fn json_roundtrip_keeps_kind() {
        let config = ProductConfig::Cassonetto(CassonettoConfig::default());
        let json = config.to_json().unwrap();
        assert!(json.contains(r#""kind":"cassonetto""#));
        assert_eq!(ProductConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn every_family_draws() {
        let configs = [
            r#"{"kind":"window"}"#,
            r#"{"kind":"door"}"#,
            r#"{"kind":"roller-shutter"}"#,
            r#"{"kind":"shutter"}"#,
            r#"{"kind":"armored-door"}"#,
            r#"{"kind":"interior-door"}"#,
            r#"{"kind":"cassonetto"}"#,
            r#"{"kind":"mosquito-net"}"#,
        ];
        for json in configs {
            let config = ProductConfig::from_json(json).unwrap();
            let drawing = config.draw();
            assert!(drawing.is_renderable(), "{json}");
            assert_eq!(drawing, config.draw(), "drawing must be deterministic: {json}");
        }
    }

    #[test]
    fn material_and_glazing_lenient() {
        assert_eq!(Material::parse_lenient("Legno"), Material::Wood);
        assert_eq!(Material::parse_lenient("wood_aluminium"), Material::WoodAluminium);
        assert_eq!(Glazing::parse_lenient("satinato"), Glazing::Frosted);
        assert_eq!(Glazing::parse_lenient(""), Glazing::Clear);
        assert_eq!(serde_json::to_string(&Material::WoodAluminium).unwrap(), "\"wood-aluminium\"");
    }

    #[test]
    fn hatch_stays_inside_area() {
        let area = Bounds::new(10.0, 20.0, 100.0, 50.0);
        let lines = diagonal_hatch(area, 10.0, Stroke::solid(Color::new(0, 0, 0), 1.0));
        assert!(!lines.is_empty());
        for line in lines {
            let Element::Line { from, to, .. } = line else {
                panic!("expected lines");
            };
            for (x, y) in [from, to] {
                assert!(x >= area.x - 1e-3 && x <= area.right() + 1e-3);
                assert!(y >= area.y - 1e-3 && y <= area.bottom() + 1e-3);
            }
        }
        assert!(diagonal_hatch(area, 0.0, Stroke::solid(Color::new(0, 0, 0), 1.0)).is_empty());
    }
}

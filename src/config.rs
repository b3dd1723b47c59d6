//! Fallback defaults and minimum sizes for drawing configurations.
//!
//! All values are millimetres unless stated otherwise. Renderers substitute
//! the `DEFAULT_*` value when a field is missing or unreadable and clamp to the
//! `MIN_*` value when a field is zero, negative or too small to draw.

/// Smallest outer width or height any product is drawn at.
pub const MIN_SIDE: f32 = 100.0;

/// Largest value any dimension is drawn at (100 m).
pub const MAX_SIDE: f32 = 100_000.0;

/// Smallest interior cell (leaf) size after frame and mullions are removed.
pub const MIN_CELL: f32 = 20.0;

// ---- Window / door grid ----

pub const DEFAULT_WINDOW_WIDTH: f32 = 1200.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 1400.0;
pub const DEFAULT_DOOR_WIDTH: f32 = 1400.0;
pub const DEFAULT_DOOR_HEIGHT: f32 = 2300.0;
pub const DEFAULT_FRAME: f32 = 60.0;
pub const MIN_FRAME: f32 = 10.0;
pub const DEFAULT_MULLION: f32 = 40.0;
pub const MIN_MULLION: f32 = 5.0;

/// Sash profile width as a fraction of the frame thickness.
pub const SASH_RATIO: f32 = 0.8;

/// Maximum height of the kick panel at the bottom of a door leaf.
pub const DOOR_PANEL_MAX: f32 = 400.0;

// ---- Roller shutter ----

pub const DEFAULT_SHUTTER_WIDTH: f32 = 1000.0;
pub const DEFAULT_SHUTTER_HEIGHT: f32 = 1400.0;
pub const DEFAULT_SLAT_HEIGHT: f32 = 55.0;
pub const MIN_SLAT_HEIGHT: f32 = 10.0;
pub const MIN_SLATS: u32 = 4;
pub const GUIDE_WIDTH: f32 = 45.0;
pub const ROLLER_BOX_HEIGHT: f32 = 180.0;
pub const DEFAULT_ROLLER_COLOR: &str = "#c8c8c8";

// ---- Hinged shutter (persiana) ----

pub const DEFAULT_PERSIANA_WIDTH: f32 = 1200.0;
pub const DEFAULT_PERSIANA_HEIGHT: f32 = 1500.0;
pub const DEFAULT_STILE: f32 = 55.0;
pub const MIN_STILE: f32 = 15.0;
pub const DEFAULT_LEAVES: u32 = 2;
pub const MAX_LEAVES: u32 = 6;
pub const LOUVRE_PITCH: f32 = 40.0;
pub const DEFAULT_PERSIANA_COLOR: &str = "#2f5d3a";

// ---- Armored door ----

pub const DEFAULT_ARMORED_WIDTH: f32 = 900.0;
pub const DEFAULT_ARMORED_HEIGHT: f32 = 2100.0;
pub const DEFAULT_ARMORED_FRAME: f32 = 70.0;
pub const DEFAULT_ARMORED_PANEL_COLOR: &str = "#6b4226";
pub const DEFAULT_ARMORED_FRAME_COLOR: &str = "#3a3a3a";

/// Height of the handle axis from the floor.
pub const HANDLE_HEIGHT: f32 = 1050.0;

/// Height of the peephole from the floor.
pub const PEEPHOLE_HEIGHT: f32 = 1550.0;

// ---- Interior door ----

pub const DEFAULT_INTERIOR_WIDTH: f32 = 800.0;
pub const DEFAULT_INTERIOR_HEIGHT: f32 = 2100.0;
pub const DEFAULT_JAMB: f32 = 70.0;
pub const DEFAULT_INTERIOR_COLOR: &str = "#f0ebe3";
pub const DEFAULT_GROOVES: u32 = 4;

// ---- Cassonetto ----

pub const DEFAULT_BOX_WIDTH: f32 = 1000.0;
pub const DEFAULT_BOX_HEIGHT: f32 = 250.0;
pub const DEFAULT_BOX_DEPTH: f32 = 300.0;
pub const MIN_BOX_SIDE: f32 = 50.0;
pub const DEFAULT_BOX_COLOR: &str = "#f2f2f2";

// ---- Mosquito net ----

pub const DEFAULT_NET_WIDTH: f32 = 1000.0;
pub const DEFAULT_NET_HEIGHT: f32 = 1400.0;
pub const NET_BOX: f32 = 50.0;
pub const NET_GUIDE: f32 = 25.0;
pub const NET_MESH_PITCH: f32 = 80.0;
pub const DEFAULT_NET_COLOR: &str = "#e0e0e0";

// ---- Raster ----

/// Largest raster side accepted by [`crate::Rasterizer`].
pub const MAX_RASTER_SIDE: u32 = 8192;

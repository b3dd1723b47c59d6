//! infissi-renderer: parametric technical drawings for window and door quotes
//!
//! This crate turns a product configuration (window, door, roller shutter,
//! shutter, armored door, interior door, cassonetto, mosquito net) into a
//! dimensioned schematic drawing, and rasterizes that drawing to PNG for
//! document export and stored previews.
//!
//! # Example
//!
//! ```no_run
//! use infissi_renderer::{ProductConfig, Rasterizer, render_svg};
//!
//! let config = ProductConfig::from_json(
//!     r#"{"kind":"window","width":1200,"height":1500,"frame":34,
//!         "rows":[{"ratio":1,"cols":[{"ratio":1,"state":"fixed"}]}]}"#,
//! )
//! .unwrap();
//!
//! // Live preview
//! let svg = render_svg(&config);
//!
//! // PNG for export
//! let image = Rasterizer::new().rasterize(&config, 640, 640).unwrap();
//! assert_eq!((image.width, image.height), (640, 640));
//! ```
//!
//! # Quotes
//!
//! [`QuoteStore`] holds the quote being edited and notifies its
//! [`QuoteObserver`]s whenever a [`QuoteAction`] changes it:
//!
//! ```
//! use infissi_renderer::{ProductConfig, QuoteAction, QuoteItem, QuoteStore};
//!
//! let mut store = QuoteStore::new();
//! store.subscribe(|state: &infissi_renderer::QuoteState| {
//!     println!("{} items", state.items.len());
//! });
//!
//! let item = QuoteItem::new(1, ProductConfig::from_json(r#"{"kind":"shutter"}"#).unwrap());
//! assert!(store.dispatch(QuoteAction::AddItem { item }).unwrap());
//! ```

pub mod config;
mod dimension;
mod drawing;
mod error;
mod geometry;
mod leaf;
pub mod product;
mod quote;
mod raster;
mod store;

pub use dimension::{DimensionStack, Dimensions, Edge, PlacedDimension, Span, Typography};
pub use drawing::{Anchor, Bounds, Drawing, Element, LinearGradient, Padding, Paint, Stroke, Style};
pub use error::{QuoteError, RasterError, RasterResult};
pub use geometry::{Color, SlatPalette, distribute, format_mm, format_size, offsets, parse_color, shade};
pub use leaf::{LeafState, Side, handle_glyph, hinge_marks, opening_glyph};
pub use product::{Glazing, Material, ProductConfig, ProductDrawing, ProductKind};
pub use quote::{QuoteAction, QuoteItem, QuoteState};
pub use raster::{RasterImage, Rasterizer, rasterize, render_svg};
pub use store::{QuoteObserver, QuoteStore};

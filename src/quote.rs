//! Quote line items and the actions that change them.
//!
//! [`QuoteState`] is a plain value: [`QuoteState::apply`] never mutates the
//! state it is called on and returns the next state instead, so callers can
//! compare old and new to decide whether anything needs saving.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "items": [
//!     { "id": 1, "description": "Soggiorno", "quantity": 2,
//!       "product": { "kind": "window", "width": 1200, "height": 1500 } }
//!   ],
//!   "discountPercent": 10,
//!   "profileOverview": "PVC 70 mm, triple glazing"
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QuoteError, RasterResult};
use crate::product::ProductConfig;
use crate::raster::{RasterImage, Rasterizer};

fn default_quantity() -> u32 {
    1
}

fn clamp_discount(percent: f32) -> f32 {
    if percent.is_finite() { percent.clamp(0.0, 100.0) } else { 0.0 }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|text| !text.trim().is_empty())
}

// ============================================================================
// QuoteItem
// ============================================================================

/// One line of a quote: a product configuration and how many of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct QuoteItem {
    pub id: u64,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    pub product: ProductConfig,
}

impl QuoteItem {
    pub fn new(id: u64, product: ProductConfig) -> Self {
        Self {
            id,
            description: String::new(),
            quantity: 1,
            product,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }
}

// ============================================================================
// QuoteState
// ============================================================================

/// The editable contents of one quote.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct QuoteState {
    pub items: Vec<QuoteItem>,

    /// Discount in percent, always within `0..=100`.
    pub discount_percent: f32,

    /// Free-text summary of the profile system offered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_overview: Option<String>,
}

/// A change to a [`QuoteState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuoteAction {
    AddItem { item: QuoteItem },
    /// Replaces the item with the same id.
    UpdateItem { item: QuoteItem },
    RemoveItem { id: u64 },
    /// Moves the item at index `from` to index `to`.
    ReorderItem { from: usize, to: usize },
    SetDiscount { percent: f32 },
    SetProfileOverview { overview: Option<String> },
}

impl QuoteState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(&self, id: u64) -> Option<&QuoteItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// An id not used by any item.
    pub fn next_id(&self) -> u64 {
        self.items.iter().map(|item| item.id).max().map_or(1, |max| max + 1)
    }

    fn position(&self, id: u64) -> Result<usize, QuoteError> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or(QuoteError::UnknownItem(id))
    }

    /// Returns the state after `action`, leaving `self` untouched.
    pub fn apply(&self, action: QuoteAction) -> Result<QuoteState, QuoteError> {
        let mut next = self.clone();
        match action {
            QuoteAction::AddItem { item } => {
                if self.item(item.id).is_some() {
                    return Err(QuoteError::DuplicateItem(item.id));
                }
                debug!(id = item.id, kind = item.product.kind().as_str(), "adding quote item");
                next.items.push(item);
            }
            QuoteAction::UpdateItem { item } => {
                let index = self.position(item.id)?;
                next.items[index] = item;
            }
            QuoteAction::RemoveItem { id } => {
                let index = self.position(id)?;
                next.items.remove(index);
            }
            QuoteAction::ReorderItem { from, to } => {
                let len = self.items.len();
                for index in [from, to] {
                    if index >= len {
                        return Err(QuoteError::IndexOutOfRange { index, len });
                    }
                }
                let item = next.items.remove(from);
                next.items.insert(to, item);
            }
            QuoteAction::SetDiscount { percent } => {
                next.discount_percent = clamp_discount(percent);
            }
            QuoteAction::SetProfileOverview { overview } => {
                next.profile_overview = non_blank(overview);
            }
        }
        Ok(next)
    }

    /// Rasterizes every item's drawing, in item order, for document export.
    pub fn previews(&self, rasterizer: &Rasterizer, width: u32, height: u32) -> Vec<(u64, RasterResult<RasterImage>)> {
        let configs: Vec<ProductConfig> = self.items.iter().map(|item| item.product.clone()).collect();
        self.items
            .iter()
            .map(|item| item.id)
            .zip(rasterizer.rasterize_batch(&configs, width, height))
            .collect()
    }

    /// Loads a saved quote, holding it to the same rules as [`apply`](Self::apply).
    ///
    /// The discount is clamped and a blank overview dropped; a repeated item
    /// id is rejected with [`QuoteError::DuplicateItem`].
    pub fn from_json(json: &str) -> Result<Self, QuoteError> {
        let mut state: QuoteState = serde_json::from_str(json)?;
        for (index, item) in state.items.iter().enumerate() {
            if state.items[..index].iter().any(|earlier| earlier.id == item.id) {
                return Err(QuoteError::DuplicateItem(item.id));
            }
        }
        state.discount_percent = clamp_discount(state.discount_percent);
        state.profile_overview = non_blank(state.profile_overview.take());
        Ok(state)
    }

    pub fn to_json(&self) -> Result<String, QuoteError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{GridConfig, RollerShutterConfig};
    use pretty_assertions::assert_eq;

    fn window(id: u64) -> QuoteItem {
        QuoteItem::new(id, ProductConfig::Window(GridConfig::default()))
    }

    fn three_items() -> QuoteState {
        let mut state = QuoteState::new();
        for id in 1..=3 {
            state = state.apply(QuoteAction::AddItem { item: window(id) }).unwrap();
        }
        state
    }

    fn ids(state: &QuoteState) -> Vec<u64> {
        state.items.iter().map(|item| item.id).collect()
    }

    #[test]
    fn apply_does_not_mutate() {
        let state = three_items();
        let next = state.apply(QuoteAction::RemoveItem { id: 2 }).unwrap();
        assert_eq!(ids(&state), vec![1, 2, 3]);
        assert_eq!(ids(&next), vec![1, 3]);
    }

    #[test]
    fn add_rejects_duplicates() {
        let err = three_items().apply(QuoteAction::AddItem { item: window(2) }).unwrap_err();
        assert!(matches!(err, QuoteError::DuplicateItem(2)));
        assert_eq!(three_items().next_id(), 4);
        assert_eq!(QuoteState::new().next_id(), 1);
    }

    #[test]
    fn update_replaces_item() {
        let item = QuoteItem::new(2, ProductConfig::RollerShutter(RollerShutterConfig::default()))
            .with_description("Camera")
            .with_quantity(3);
        let next = three_items().apply(QuoteAction::UpdateItem { item: item.clone() }).unwrap();
        assert_eq!(next.item(2), Some(&item));

        let err = three_items()
            .apply(QuoteAction::UpdateItem { item: window(9) })
            .unwrap_err();
        assert!(matches!(err, QuoteError::UnknownItem(9)));
    }

    #[test]
    fn reorder_moves_item() {
        let next = three_items().apply(QuoteAction::ReorderItem { from: 0, to: 2 }).unwrap();
        assert_eq!(ids(&next), vec![2, 3, 1]);

        let err = three_items()
            .apply(QuoteAction::ReorderItem { from: 1, to: 3 })
            .unwrap_err();
        assert!(matches!(err, QuoteError::IndexOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn discount_is_clamped() {
        let state = QuoteState::new();
        let set = |percent| state.apply(QuoteAction::SetDiscount { percent }).unwrap().discount_percent;
        assert_eq!(set(15.0), 15.0);
        assert_eq!(set(-5.0), 0.0);
        assert_eq!(set(250.0), 100.0);
        assert_eq!(set(f32::NAN), 0.0);
    }

    #[test]
    fn blank_overview_is_cleared() {
        let state = QuoteState::new()
            .apply(QuoteAction::SetProfileOverview {
                overview: Some("PVC 70 mm".into()),
            })
            .unwrap();
        assert_eq!(state.profile_overview.as_deref(), Some("PVC 70 mm"));
        let cleared = state
            .apply(QuoteAction::SetProfileOverview {
                overview: Some("  ".into()),
            })
            .unwrap();
        assert_eq!(cleared.profile_overview, None);
    }

    #[test]
    fn json_uses_camel_case() {
        let state = three_items()
            .apply(QuoteAction::SetDiscount { percent: 10.0 })
            .unwrap();
        let json = state.to_json().unwrap();
        assert!(json.contains(r#""discountPercent":10.0"#));
        assert!(json.contains(r#""kind":"window""#));
        assert_eq!(QuoteState::from_json(&json).unwrap(), state);
    }

    #[test]
    fn items_default_quantity() {
        let state = QuoteState::from_json(r#"{"items":[{"id":7,"product":{"kind":"door"}}]}"#).unwrap();
        assert_eq!(state.items[0].quantity, 1);
        assert_eq!(state.discount_percent, 0.0);
    }

    #[test]
    fn loaded_discount_is_clamped() {
        let load = |json: &str| QuoteState::from_json(json).unwrap().discount_percent;
        assert_eq!(load(r#"{"discountPercent":250}"#), 100.0);
        assert_eq!(load(r#"{"discountPercent":-10}"#), 0.0);
        assert_eq!(load(r#"{"discountPercent":12.5}"#), 12.5);
    }

    #[test]
    fn loaded_duplicate_ids_are_rejected() {
        let err = QuoteState::from_json(
            r#"{"items":[{"id":1,"product":{"kind":"window"}},{"id":1,"product":{"kind":"door"}}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, QuoteError::DuplicateItem(1)));
    }

    #[test]
    fn loaded_blank_overview_is_dropped() {
        let state = QuoteState::from_json(r#"{"profileOverview":"   "}"#).unwrap();
        assert_eq!(state.profile_overview, None);
    }

    #[test]
    fn actions_deserialize_by_type() {
        let action: QuoteAction = serde_json::from_str(r#"{"type":"reorder-item","from":0,"to":1}"#).unwrap();
        assert_eq!(action, QuoteAction::ReorderItem { from: 0, to: 1 });
    }
}

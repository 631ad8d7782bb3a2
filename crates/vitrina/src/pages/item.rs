//! Per-item cart controls.
//!
//! Used on the inventory list and the cart. The storefront gives the
//! add/remove buttons no identifier of their own; they are addressed
//! through the slug of the item's display name.

use crate::locator::{slug, Selector};
use crate::result::VitrinaResult;
use crate::session::Session;

/// Cart controls for one inventory item, addressed by display name.
#[derive(Debug, Clone)]
pub struct InventoryItem {
    session: Session,
}

impl InventoryItem {
    /// Bind the widget to a session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Selector of the add-to-cart control for an item name.
    #[must_use]
    pub fn add_button(item_name: &str) -> Selector {
        Selector::test_id(format!("add-to-cart-{}", slug(item_name)))
    }

    /// Selector of the remove control for an item name.
    #[must_use]
    pub fn remove_button(item_name: &str) -> Selector {
        Selector::test_id(format!("remove-{}", slug(item_name)))
    }

    /// Add the named item to the cart.
    pub async fn add_to_cart(&self, item_name: &str) -> VitrinaResult<()> {
        self.session.click(&Self::add_button(item_name)).await
    }

    /// Remove the named item from the cart.
    pub async fn remove_from_cart(&self, item_name: &str) -> VitrinaResult<()> {
        self.session.click(&Self::remove_button(item_name)).await
    }
}

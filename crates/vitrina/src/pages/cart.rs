//! Cart view.

use async_trait::async_trait;

use crate::locator::Selector;
use crate::result::VitrinaResult;
use crate::session::Session;

use super::{routes, InventoryItem, PageView};

/// The cart view, listing items queued for checkout.
#[derive(Debug, Clone)]
pub struct CartPage {
    session: Session,
    item: InventoryItem,
}

impl CartPage {
    /// Bind the cart view to a session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        let item = InventoryItem::new(session.clone());
        Self { session, item }
    }

    /// Display names of the carted items, in insertion order.
    pub async fn item_names(&self) -> VitrinaResult<Vec<String>> {
        self.session
            .visible_texts(&Selector::test_id("inventory-item-name"))
            .await
    }

    /// Remove an item from the cart by display name.
    pub async fn remove_item_from_cart(&self, item_name: &str) -> VitrinaResult<()> {
        self.item.remove_from_cart(item_name).await
    }

    /// Start checkout. Lands on the information step; the caller confirms
    /// with that page's `assert_page_view`.
    pub async fn checkout(&self) -> VitrinaResult<()> {
        self.session.click(&Selector::test_id("checkout")).await?;
        self.session.wait_for_load().await
    }
}

#[async_trait]
impl PageView for CartPage {
    fn session(&self) -> &Session {
        &self.session
    }

    fn path(&self) -> &str {
        routes::CART
    }

    fn title(&self) -> Option<&str> {
        Some("Your Cart")
    }

    fn landmark(&self) -> Selector {
        Selector::test_id("cart-list")
    }
}

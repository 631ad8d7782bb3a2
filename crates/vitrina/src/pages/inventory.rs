//! Inventory (product list) view.

use async_trait::async_trait;

use crate::locator::Selector;
use crate::result::{VitrinaError, VitrinaResult};
use crate::session::Session;

use super::{routes, InventoryItem, PageView};

/// Sort orders offered by the product sort control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Name ascending (the default)
    NameAscending,
    /// Name descending
    NameDescending,
    /// Price low to high
    PriceLowToHigh,
    /// Price high to low
    PriceHighToLow,
}

impl SortOrder {
    /// Option value used by the sort select element
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::NameAscending => "az",
            Self::NameDescending => "za",
            Self::PriceLowToHigh => "lohi",
            Self::PriceHighToLow => "hilo",
        }
    }
}

/// The product list, landed on after login.
#[derive(Debug, Clone)]
pub struct InventoryPage {
    session: Session,
    item: InventoryItem,
}

impl InventoryPage {
    /// Bind the inventory view to a session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        let item = InventoryItem::new(session.clone());
        Self { session, item }
    }

    /// Display names of the listed products, in current sort order.
    pub async fn product_names(&self) -> VitrinaResult<Vec<String>> {
        self.session
            .visible_texts(&Selector::test_id("inventory-item-name"))
            .await
    }

    /// Listed prices, parsed from their `$` labels, in current sort order.
    pub async fn product_prices(&self) -> VitrinaResult<Vec<f64>> {
        let labels = self
            .session
            .visible_texts(&Selector::test_id("inventory-item-price"))
            .await?;
        labels.iter().map(|label| parse_price(label)).collect()
    }

    /// Re-sort the product list.
    pub async fn sort_products(&self, order: SortOrder) -> VitrinaResult<()> {
        self.session
            .select_option(&Selector::test_id("product-sort-container"), order.value())
            .await
    }

    /// Add an item to the cart by display name.
    pub async fn add_item_to_cart(&self, item_name: &str) -> VitrinaResult<()> {
        self.item.add_to_cart(item_name).await
    }

    /// Remove an item from the cart by display name.
    pub async fn remove_item_from_cart(&self, item_name: &str) -> VitrinaResult<()> {
        self.item.remove_from_cart(item_name).await
    }

    /// Open the cart view via the cart link.
    pub async fn open_cart(&self) -> VitrinaResult<()> {
        self.session
            .click(&Selector::test_id("shopping-cart-link"))
            .await?;
        self.session.wait_for_load().await
    }
}

/// Parse a `$12.34`-style label into its amount.
pub(crate) fn parse_price(label: &str) -> VitrinaResult<f64> {
    label
        .split('$')
        .nth(1)
        .and_then(|amount| amount.trim().parse().ok())
        .ok_or_else(|| {
            VitrinaError::assertion("price label", "an amount like $12.34", label)
        })
}

#[async_trait]
impl PageView for InventoryPage {
    fn session(&self) -> &Session {
        &self.session
    }

    fn path(&self) -> &str {
        routes::INVENTORY
    }

    fn title(&self) -> Option<&str> {
        Some("Products")
    }

    fn landmark(&self) -> Selector {
        Selector::test_id("inventory-list")
    }

    /// The inventory additionally shows the `Swag Labs` primary header.
    async fn assert_page_view(&self) -> VitrinaResult<()> {
        self.assert_page_url().await?;
        self.assert_page_title().await?;
        let header = self
            .session
            .visible_text(&Selector::test_id("primary-header"))
            .await
            .map_err(|_| {
                VitrinaError::assertion("primary header", "Swag Labs", "<not visible>")
            })?;
        if !header.contains("Swag Labs") {
            return Err(VitrinaError::assertion("primary header", "Swag Labs", header));
        }
        let landmark = self.landmark();
        if self.session.is_visible(&landmark).await? {
            Ok(())
        } else {
            Err(VitrinaError::assertion(
                format!("landmark on {}", self.path()),
                format!("{landmark} visible"),
                "not visible",
            ))
        }
    }
}

#[cfg(all(test, not(feature = "browser")))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::demo;
    use crate::pages::LoginPage;

    async fn inventory() -> InventoryPage {
        let session = Session::start("https://shop.example.com").await.unwrap();
        let login = LoginPage::new(session.clone());
        login.visit().await.unwrap();
        login
            .login(demo::STANDARD_USER, demo::PASSWORD)
            .await
            .unwrap();
        let page = InventoryPage::new(session);
        page.assert_page_view().await.unwrap();
        page
    }

    #[tokio::test]
    async fn test_default_sort_is_name_ascending() {
        let page = inventory().await;
        let names = page.product_names().await.unwrap();
        assert_eq!(names.first().map(String::as_str), Some("Sauce Labs Backpack"));
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[tokio::test]
    async fn test_sort_name_descending() {
        let page = inventory().await;
        page.sort_products(SortOrder::NameDescending).await.unwrap();
        let names = page.product_names().await.unwrap();
        assert_eq!(
            names.first().map(String::as_str),
            Some("Test.allTheThings() T-Shirt (Red)")
        );
    }

    #[tokio::test]
    async fn test_sort_price_low_to_high() {
        let page = inventory().await;
        page.sort_products(SortOrder::PriceLowToHigh).await.unwrap();
        let prices = page.product_prices().await.unwrap();
        assert!(!prices.is_empty());
        for pair in prices.windows(2) {
            assert!(pair[0] <= pair[1], "prices not ascending: {prices:?}");
        }
    }

    #[tokio::test]
    async fn test_sort_price_high_to_low() {
        let page = inventory().await;
        page.sort_products(SortOrder::PriceHighToLow).await.unwrap();
        let prices = page.product_prices().await.unwrap();
        for pair in prices.windows(2) {
            assert!(pair[0] >= pair[1], "prices not descending: {prices:?}");
        }
    }

    #[tokio::test]
    async fn test_add_and_remove_restores_badge_count() {
        let page = inventory().await;
        assert_eq!(page.cart_badge_count().await.unwrap(), 0);

        page.add_item_to_cart("Sauce Labs Backpack").await.unwrap();
        page.add_item_to_cart("Sauce Labs Bike Light").await.unwrap();
        assert_eq!(page.cart_badge_count().await.unwrap(), 2);

        page.remove_item_from_cart("Sauce Labs Bike Light")
            .await
            .unwrap();
        assert_eq!(page.cart_badge_count().await.unwrap(), 1);
    }

    #[test]
    fn test_parse_price() {
        assert!((parse_price("$29.99").unwrap() - 29.99).abs() < f64::EPSILON);
        assert!(parse_price("free").is_err());
    }

    #[test]
    fn test_sort_order_values() {
        assert_eq!(SortOrder::NameAscending.value(), "az");
        assert_eq!(SortOrder::PriceHighToLow.value(), "hilo");
    }
}

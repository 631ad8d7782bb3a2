//! Page objects for the storefront.
//!
//! One struct per navigable view, composed around a shared [`Session`]
//! handle rather than inherited from a base class. Every view implements
//! the [`PageView`] capability; the workflow
//! `LoggedOut -> Inventory -> Cart -> CheckoutInfo -> CheckoutOverview ->
//! CheckoutComplete -> Inventory` is not tracked centrally — each
//! transition is confirmed by the destination page's
//! [`PageView::assert_page_view`], which fails loudly with
//! expected-vs-actual detail. Skipping that confirmation is a caller
//! error, not something the page objects repair.

use async_trait::async_trait;

use crate::locator::Selector;
use crate::result::{VitrinaError, VitrinaResult};
use crate::session::Session;

mod cart;
mod checkout;
mod inventory;
mod item;
mod login;
mod side_menu;
pub mod totals;

pub use cart::CartPage;
pub use checkout::{CheckoutCompletePage, CheckoutInfoPage, CheckoutOverviewPage};
pub use inventory::{InventoryPage, SortOrder};
pub use item::InventoryItem;
pub use login::LoginPage;
pub use side_menu::SideMenu;

/// Storefront routes, one per view
pub mod routes {
    /// Login view
    pub const LOGIN: &str = "/";
    /// Inventory (product list) view
    pub const INVENTORY: &str = "/inventory.html";
    /// Cart view
    pub const CART: &str = "/cart.html";
    /// Checkout step one: buyer information
    pub const CHECKOUT_INFO: &str = "/checkout-step-one.html";
    /// Checkout step two: order overview
    pub const CHECKOUT_OVERVIEW: &str = "/checkout-step-two.html";
    /// Checkout step three: confirmation
    pub const CHECKOUT_COMPLETE: &str = "/checkout-complete.html";
}

/// Capability shared by every storefront view.
#[async_trait]
pub trait PageView: Send + Sync {
    /// Session this view is bound to
    fn session(&self) -> &Session;

    /// Route of this view
    fn path(&self) -> &str;

    /// Expected secondary title, when the view declares one
    fn title(&self) -> Option<&str> {
        None
    }

    /// Landmark element that must be visible when this view is current
    fn landmark(&self) -> Selector;

    /// Navigate the session to this view and wait for it to settle.
    async fn visit(&self) -> VitrinaResult<()> {
        self.session().navigate(self.path()).await?;
        self.session().wait_for_load().await
    }

    /// Assert the session's current location is this view's route.
    async fn assert_page_url(&self) -> VitrinaResult<()> {
        let actual = self.session().current_path().await;
        if actual == self.path() {
            Ok(())
        } else {
            Err(VitrinaError::assertion("route", self.path(), actual))
        }
    }

    /// Assert the secondary title contains this view's declared title.
    async fn assert_page_title(&self) -> VitrinaResult<()> {
        let Some(expected) = self.title() else {
            return Ok(());
        };
        let actual = self
            .session()
            .visible_text(&Selector::test_id("title"))
            .await
            .map_err(|_| {
                VitrinaError::assertion("page title", expected, "<no title element>")
            })?;
        if actual.contains(expected) {
            Ok(())
        } else {
            Err(VitrinaError::assertion("page title", expected, actual))
        }
    }

    /// Assert the session landed on this view: route, declared title, and
    /// landmark element all present. This is the state-machine check every
    /// transition must pass before the next action is issued.
    async fn assert_page_view(&self) -> VitrinaResult<()> {
        self.assert_page_url().await?;
        self.assert_page_title().await?;
        let landmark = self.landmark();
        if self.session().is_visible(&landmark).await? {
            Ok(())
        } else {
            Err(VitrinaError::assertion(
                format!("landmark on {}", self.path()),
                format!("{landmark} visible"),
                "not visible",
            ))
        }
    }

    /// Current cart badge count; an absent badge is a valid empty cart.
    async fn cart_badge_count(&self) -> VitrinaResult<u32> {
        let badge = Selector::test_id("shopping-cart-badge");
        if !self.session().is_visible(&badge).await? {
            return Ok(0);
        }
        let text = self.session().visible_text(&badge).await?;
        text.trim().parse().map_err(|_| {
            VitrinaError::assertion("cart badge", "a numeric count", text)
        })
    }
}

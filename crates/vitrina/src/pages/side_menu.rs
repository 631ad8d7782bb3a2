//! Slide-out side menu, available on every logged-in view.

use crate::locator::Selector;
use crate::result::VitrinaResult;
use crate::session::Session;
use crate::wait::WaitOptions;

/// The burger menu and its links.
#[derive(Debug, Clone)]
pub struct SideMenu {
    session: Session,
}

impl SideMenu {
    /// Bind the menu to a session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    fn all_items_link() -> Selector {
        Selector::test_id("inventory-sidebar-link")
    }

    /// Open the menu and wait for its links to be actionable.
    pub async fn open(&self) -> VitrinaResult<()> {
        self.session.click(&Selector::test_id("open-menu")).await?;
        self.session
            .wait_for_visible(&Self::all_items_link(), &WaitOptions::default())
            .await
    }

    /// Close the menu.
    pub async fn close(&self) -> VitrinaResult<()> {
        self.session.click(&Selector::test_id("close-menu")).await
    }

    /// Navigate back to the inventory via the all-items link.
    pub async fn all_items(&self) -> VitrinaResult<()> {
        self.session.click(&Self::all_items_link()).await?;
        self.session.wait_for_load().await
    }

    /// Log the current user out. Lands on the login view.
    pub async fn logout(&self) -> VitrinaResult<()> {
        self.session
            .click(&Selector::test_id("logout-sidebar-link"))
            .await?;
        self.session.wait_for_load().await
    }

    /// Reset the storefront's app state, emptying the cart.
    pub async fn reset_app_state(&self) -> VitrinaResult<()> {
        self.session
            .click(&Selector::test_id("reset-sidebar-link"))
            .await
    }
}

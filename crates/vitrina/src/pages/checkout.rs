//! The three checkout steps.

use async_trait::async_trait;

use crate::locator::Selector;
use crate::result::{VitrinaError, VitrinaResult};
use crate::session::Session;

use super::inventory::parse_price;
use super::{routes, PageView};

/// Checkout step one: buyer information form.
#[derive(Debug, Clone)]
pub struct CheckoutInfoPage {
    session: Session,
}

impl CheckoutInfoPage {
    /// Bind the information step to a session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Fill the buyer form and continue to the overview step.
    pub async fn fill_information_and_continue(
        &self,
        first_name: &str,
        last_name: &str,
        postal_code: &str,
    ) -> VitrinaResult<()> {
        self.session
            .fill(&Selector::test_id("firstName"), first_name)
            .await?;
        self.session
            .fill(&Selector::test_id("lastName"), last_name)
            .await?;
        self.session
            .fill(&Selector::test_id("postalCode"), postal_code)
            .await?;
        self.session.click(&Selector::test_id("continue")).await?;
        self.session.wait_for_load().await
    }
}

#[async_trait]
impl PageView for CheckoutInfoPage {
    fn session(&self) -> &Session {
        &self.session
    }

    fn path(&self) -> &str {
        routes::CHECKOUT_INFO
    }

    fn title(&self) -> Option<&str> {
        Some("Checkout: Your Information")
    }

    fn landmark(&self) -> Selector {
        Selector::css(".checkout_info")
    }
}

/// Checkout step two: order overview with price summary.
#[derive(Debug, Clone)]
pub struct CheckoutOverviewPage {
    session: Session,
}

impl CheckoutOverviewPage {
    /// Bind the overview step to a session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Display names of the items under review.
    pub async fn item_names(&self) -> VitrinaResult<Vec<String>> {
        self.session
            .visible_texts(&Selector::test_id("inventory-item-name"))
            .await
    }

    async fn labelled_amount(&self, id: &str) -> VitrinaResult<f64> {
        let label = self.session.visible_text(&Selector::test_id(id)).await?;
        parse_price(&label)
    }

    /// Item subtotal as displayed, without tax.
    pub async fn subtotal(&self) -> VitrinaResult<f64> {
        self.labelled_amount("subtotal-label").await
    }

    /// Tax as displayed.
    pub async fn tax(&self) -> VitrinaResult<f64> {
        self.labelled_amount("tax-label").await
    }

    /// Grand total as displayed.
    pub async fn total(&self) -> VitrinaResult<f64> {
        self.labelled_amount("total-label").await
    }

    /// Place the order. Lands on the confirmation step.
    pub async fn finish(&self) -> VitrinaResult<()> {
        self.session.click(&Selector::test_id("finish")).await?;
        self.session.wait_for_load().await
    }
}

#[async_trait]
impl PageView for CheckoutOverviewPage {
    fn session(&self) -> &Session {
        &self.session
    }

    fn path(&self) -> &str {
        routes::CHECKOUT_OVERVIEW
    }

    fn title(&self) -> Option<&str> {
        Some("Checkout: Overview")
    }

    fn landmark(&self) -> Selector {
        Selector::test_id("cart-list")
    }
}

/// Checkout step three: order confirmation.
#[derive(Debug, Clone)]
pub struct CheckoutCompletePage {
    session: Session,
}

impl CheckoutCompletePage {
    /// Bind the confirmation step to a session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Assert the order-placed confirmation is shown.
    pub async fn assert_order_complete(&self) -> VitrinaResult<()> {
        let header = self
            .session
            .visible_text(&Selector::test_id("complete-header"))
            .await?;
        if !header.contains("Thank you for your order!") {
            return Err(VitrinaError::assertion(
                "order confirmation header",
                "Thank you for your order!",
                header,
            ));
        }
        if self
            .session
            .is_visible(&Selector::test_id("complete-text"))
            .await?
        {
            Ok(())
        } else {
            Err(VitrinaError::assertion(
                "order confirmation text",
                "visible",
                "not visible",
            ))
        }
    }

    /// Return to the inventory. The storefront empties the cart here.
    pub async fn back_to_products(&self) -> VitrinaResult<()> {
        self.session
            .click(&Selector::test_id("back-to-products"))
            .await?;
        self.session.wait_for_load().await
    }
}

#[async_trait]
impl PageView for CheckoutCompletePage {
    fn session(&self) -> &Session {
        &self.session
    }

    fn path(&self) -> &str {
        routes::CHECKOUT_COMPLETE
    }

    fn title(&self) -> Option<&str> {
        Some("Checkout: Complete!")
    }

    fn landmark(&self) -> Selector {
        Selector::test_id("checkout-complete-container")
    }
}

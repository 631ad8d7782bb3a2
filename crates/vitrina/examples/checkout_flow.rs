//! Example: the full checkout round trip.
//!
//! Demonstrates: fixture resolution, workflow assertions, checkout totals.
//!
//! Run with: `cargo run --example checkout_flow`

use vitrina::demo;
use vitrina::pages::totals::order_totals;
use vitrina::prelude::*;

#[tokio::main]
async fn main() -> VitrinaResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = HarnessConfig::new("https://shop.example.com", "https://api.example.com");
    let context = TestContext::start(config).await?;

    // Log in and land on the inventory.
    let login = context.login_page()?;
    login.visit().await?;
    login.login(demo::STANDARD_USER, demo::PASSWORD).await?;

    let inventory = context.inventory_page()?;
    inventory.assert_page_view().await?;
    println!("logged in; {} products listed", inventory.product_names().await?.len());

    // Two items in, one out.
    inventory.add_item_to_cart("Sauce Labs Backpack").await?;
    inventory.add_item_to_cart("Sauce Labs Fleece Jacket").await?;
    inventory.add_item_to_cart("Sauce Labs Bike Light").await?;
    inventory.remove_item_from_cart("Sauce Labs Bike Light").await?;
    println!("cart count: {}", inventory.cart_badge_count().await?);

    // Through the checkout state machine, confirming every landing.
    inventory.open_cart().await?;
    let cart = context.cart_page()?;
    cart.assert_page_view().await?;
    cart.checkout().await?;

    let info = context.checkout_info_page()?;
    info.assert_page_view().await?;
    info.fill_information_and_continue("Moxy", "Mind", "01234").await?;

    let overview = context.checkout_overview_page()?;
    overview.assert_page_view().await?;
    let expected = order_totals(&[29.99, 49.99], demo::TAX_RATE);
    println!(
        "overview: subtotal ${:.2} tax ${:.2} total ${:.2} (expected total ${:.2})",
        overview.subtotal().await?,
        overview.tax().await?,
        overview.total().await?,
        expected.total,
    );
    overview.finish().await?;

    let complete = context.checkout_complete_page()?;
    complete.assert_page_view().await?;
    complete.assert_order_complete().await?;
    complete.back_to_products().await?;

    inventory.assert_page_view().await?;
    println!("back on inventory; cart count: {}", inventory.cart_badge_count().await?);

    context.close().await
}

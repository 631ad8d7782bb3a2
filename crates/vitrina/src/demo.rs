//! Known data for the demo storefront.
//!
//! Credentials, catalog, and tax rate as published by the storefront under
//! test. The mock session serves exactly this data, so tests written
//! against it transfer unchanged to a real browser run.

/// Account that can log in and complete the workflow
pub const STANDARD_USER: &str = "standard_user";
/// Account that is locked out and cannot log in
pub const LOCKED_OUT_USER: &str = "locked_out_user";
/// Account with known UI defects
pub const PROBLEM_USER: &str = "problem_user";
/// Account with artificial latency
pub const PERFORMANCE_GLITCH_USER: &str = "performance_glitch_user";

/// Shared password for all demo accounts
pub const PASSWORD: &str = "secret_sauce";

/// Sales tax rate applied at checkout
pub const TAX_RATE: f64 = 0.08;

/// Error shown when the username field is empty
pub const ERROR_USERNAME_REQUIRED: &str = "Epic sadface: Username is required";
/// Error shown when the password field is empty
pub const ERROR_PASSWORD_REQUIRED: &str = "Epic sadface: Password is required";
/// Error shown for unknown credentials
pub const ERROR_BAD_CREDENTIALS: &str =
    "Epic sadface: Username and password do not match any user in this service";
/// Error shown for the locked-out account
pub const ERROR_LOCKED_OUT: &str = "Epic sadface: Sorry, this user has been locked out";

/// One catalog entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Product {
    /// Display name, as rendered on the inventory list
    pub name: &'static str,
    /// Unit price in dollars
    pub price: f64,
}

/// The full storefront catalog, in default (A-Z) order
pub const CATALOG: [Product; 6] = [
    Product {
        name: "Sauce Labs Backpack",
        price: 29.99,
    },
    Product {
        name: "Sauce Labs Bike Light",
        price: 9.99,
    },
    Product {
        name: "Sauce Labs Bolt T-Shirt",
        price: 15.99,
    },
    Product {
        name: "Sauce Labs Fleece Jacket",
        price: 49.99,
    },
    Product {
        name: "Sauce Labs Onesie",
        price: 7.99,
    },
    Product {
        name: "Test.allTheThings() T-Shirt (Red)",
        price: 15.99,
    },
];

/// Look up a catalog entry by display name.
#[must_use]
pub fn product(name: &str) -> Option<Product> {
    CATALOG.iter().copied().find(|p| p.name == name)
}

/// Accounts that can authenticate (the locked-out user authenticates but
/// is refused at login).
#[must_use]
pub fn is_known_user(username: &str) -> bool {
    matches!(
        username,
        STANDARD_USER | LOCKED_OUT_USER | PROBLEM_USER | PERFORMANCE_GLITCH_USER
    )
}

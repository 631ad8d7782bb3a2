//! Vitrina: acceptance-test harness for the demo storefront and its REST API.
//!
//! Vitrina (Spanish: "shop window") packages the two engines an acceptance
//! suite actually reuses: a fixture composition engine that builds the
//! page-object graph for one test over one shared browser session, and a
//! typed HTTP client that normalizes request execution, auth injection,
//! pagination, and error classification over the users API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      VITRINA Architecture                        │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────┐   ┌──────────────────┐         │
//! │  │ Test      │──►│ TestContext  │──►│ Session (one per │         │
//! │  │ (caller)  │   │ + registry   │   │ context; CDP or  │         │
//! │  │           │   │ (per role)   │   │ mock storefront) │         │
//! │  └───────────┘   └──────┬───────┘   └──────────────────┘         │
//! │                         │ page objects share the session         │
//! │                  ┌──────┴───────┐   ┌──────────────────┐         │
//! │                  │ pages::*     │   │ api::RestClient  │         │
//! │                  │ (workflow    │   │ (independent of  │         │
//! │                  │  assertions) │   │  the session)    │         │
//! │                  └──────────────┘   └──────────────────┘         │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each test drives the storefront workflow `LoggedOut -> Inventory ->
//! Cart -> CheckoutInfo -> CheckoutOverview -> CheckoutComplete ->
//! Inventory`; every transition is confirmed by the destination page's
//! `assert_page_view`, so the state machine lives in the assertions, not
//! in a central tracker. All suspend points (navigation, element waits,
//! network) are bounded and surface timeouts attributably.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

pub mod api;
pub mod config;
pub mod demo;
pub mod fixture;
pub mod locator;
pub mod pages;
pub mod result;
pub mod session;
pub mod wait;

pub use result::{VitrinaError, VitrinaResult};

/// Commonly used items, importable as `use vitrina::prelude::*`.
pub mod prelude {
    pub use crate::api::{CreateUserRequest, Method, Payload, RestClient};
    pub use crate::config::HarnessConfig;
    pub use crate::fixture::{run_auth_setup, FixtureRegistry, Role, TestContext};
    pub use crate::locator::{slug, Selector};
    pub use crate::pages::{
        routes, CartPage, CheckoutCompletePage, CheckoutInfoPage, CheckoutOverviewPage,
        InventoryItem, InventoryPage, LoginPage, PageView, SideMenu, SortOrder,
    };
    pub use crate::result::{VitrinaError, VitrinaResult};
    pub use crate::session::Session;
    pub use crate::wait::WaitOptions;
}

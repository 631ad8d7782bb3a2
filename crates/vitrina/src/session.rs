//! Driven-browser session handle.
//!
//! A [`Session`] is the harness's view of one live browser context:
//! navigate to a path, wait for load, and address elements by stable test
//! identifier. One test context owns its session exclusively; page objects
//! share the handle within that context but never across contexts.
//!
//! With the `browser` feature the session drives a real chromium over CDP.
//! Without it, a deterministic mock storefront with the same API is
//! compiled instead, serving the known demo catalog and credentials so the
//! harness and its tests run headless-less and offline.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::result::{VitrinaError, VitrinaResult};

/// Name of the cookie carrying the authenticated storefront session
pub const SESSION_COOKIE: &str = "session-username";

/// A browser cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Domain
    pub domain: String,
    /// Path
    pub path: String,
    /// Expiration timestamp (seconds since epoch)
    pub expires: Option<i64>,
    /// HTTP only flag
    pub http_only: bool,
    /// Secure flag
    pub secure: bool,
}

impl Cookie {
    /// Create a new session-scoped cookie
    #[must_use]
    pub fn new(name: &str, value: &str, domain: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            domain: domain.to_string(),
            path: "/".to_string(),
            expires: None,
            http_only: false,
            secure: false,
        }
    }
}

/// Serialized auth/session state persisted between test contexts.
///
/// The artifact is written once by the auth setup routine and read-only
/// afterwards; its JSON shape is owned by the driving engine and treated
/// as opaque by everything above the session layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageState {
    /// Cookies
    pub cookies: Vec<Cookie>,
    /// Local storage data, keyed by origin
    pub local_storage: HashMap<String, HashMap<String, String>>,
    /// Session storage data, keyed by origin
    pub session_storage: HashMap<String, HashMap<String, String>>,
}

impl StorageState {
    /// Create empty storage state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cookie
    #[must_use]
    pub fn with_cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    /// Check if the state carries nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty() && self.local_storage.is_empty() && self.session_storage.is_empty()
    }

    /// Load a persisted artifact.
    ///
    /// # Errors
    ///
    /// A missing or unreadable artifact is a [`VitrinaError::StaleAuthState`]
    /// so dependent contexts fail fast with a re-run-setup signal instead of
    /// cascading into unrelated failures.
    pub fn load(path: &Path) -> VitrinaResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| VitrinaError::StaleAuthState {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        serde_json::from_str(&raw).map_err(|e| VitrinaError::StaleAuthState {
            message: format!("cannot parse {}: {e}", path.display()),
        })
    }

    /// Persist the artifact, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> VitrinaResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

// ============================================================================
// Real CDP implementation (when the `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use std::sync::Arc;

    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::network::CookieParam;
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use tokio::sync::Mutex;

    use super::{Cookie, StorageState};
    use crate::locator::Selector;
    use crate::result::{VitrinaError, VitrinaResult};
    use crate::wait::{Deadline, WaitOptions};

    struct Inner {
        browser: CdpBrowser,
        page: CdpPage,
        #[allow(dead_code)]
        handler: tokio::task::JoinHandle<()>,
    }

    /// Driven-browser session over a real CDP connection
    #[derive(Clone)]
    pub struct Session {
        base_url: String,
        inner: Arc<Mutex<Inner>>,
    }

    impl std::fmt::Debug for Session {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Session")
                .field("base_url", &self.base_url)
                .finish()
        }
    }

    fn js_str(value: &str) -> String {
        serde_json::Value::String(value.to_string()).to_string()
    }

    impl Session {
        /// Launch a headless chromium and open one page.
        pub async fn start(web_base_url: impl Into<String>) -> VitrinaResult<Self> {
            let config = CdpConfig::builder()
                .no_sandbox()
                .build()
                .map_err(|message| VitrinaError::Session { message })?;

            let (browser, mut events) =
                CdpBrowser::launch(config)
                    .await
                    .map_err(|e| VitrinaError::Session {
                        message: e.to_string(),
                    })?;

            let handler = tokio::spawn(async move {
                while let Some(event) = events.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            let page =
                browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| VitrinaError::Session {
                        message: e.to_string(),
                    })?;

            Ok(Self {
                base_url: web_base_url.into().trim_end_matches('/').to_string(),
                inner: Arc::new(Mutex::new(Inner {
                    browser,
                    page,
                    handler,
                })),
            })
        }

        /// Storefront base URL this session is bound to.
        #[must_use]
        pub fn base_url(&self) -> String {
            self.base_url.clone()
        }

        /// Navigate to a storefront path and wait for the load signal.
        pub async fn navigate(&self, path: &str) -> VitrinaResult<()> {
            let url = format!("{}{path}", self.base_url);
            tracing::debug!(%url, "navigate");
            let inner = self.inner.lock().await;
            inner
                .page
                .goto(&url)
                .await
                .map_err(|e| VitrinaError::Navigation {
                    url: url.clone(),
                    message: e.to_string(),
                })?;
            inner
                .page
                .wait_for_navigation()
                .await
                .map_err(|e| VitrinaError::Navigation {
                    url,
                    message: e.to_string(),
                })?;
            Ok(())
        }

        /// Wait for the current navigation to settle.
        pub async fn wait_for_load(&self) -> VitrinaResult<()> {
            let inner = self.inner.lock().await;
            inner
                .page
                .wait_for_navigation()
                .await
                .map_err(|e| VitrinaError::Session {
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn eval<T: serde::de::DeserializeOwned>(&self, expr: String) -> VitrinaResult<T> {
            let inner = self.inner.lock().await;
            let result = inner
                .page
                .evaluate(expr)
                .await
                .map_err(|e| VitrinaError::Session {
                    message: e.to_string(),
                })?;
            result.into_value().map_err(|e| VitrinaError::Session {
                message: e.to_string(),
            })
        }

        /// Path component of the session's current location.
        pub async fn current_path(&self) -> String {
            self.eval::<String>("window.location.pathname".to_string())
                .await
                .unwrap_or_default()
        }

        /// Whether an element for the selector is present and visible.
        pub async fn is_visible(&self, selector: &Selector) -> VitrinaResult<bool> {
            let css = js_str(&selector.to_css());
            self.eval(format!(
                "(() => {{ const el = document.querySelector({css}); \
                 if (!el) return false; \
                 return !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length); }})()"
            ))
            .await
        }

        /// Visible text of the first matching element.
        pub async fn visible_text(&self, selector: &Selector) -> VitrinaResult<String> {
            let css = js_str(&selector.to_css());
            let text: Option<String> = self
                .eval(format!(
                    "(() => {{ const el = document.querySelector({css}); \
                     return el ? el.innerText : null; }})()"
                ))
                .await?;
            text.ok_or_else(|| VitrinaError::ElementNotFound {
                selector: selector.describe(),
            })
        }

        /// Visible texts of all matching elements, in document order.
        pub async fn visible_texts(&self, selector: &Selector) -> VitrinaResult<Vec<String>> {
            let css = js_str(&selector.to_css());
            self.eval(format!(
                "Array.from(document.querySelectorAll({css})).map(el => el.innerText)"
            ))
            .await
        }

        /// Click the element for the selector.
        pub async fn click(&self, selector: &Selector) -> VitrinaResult<()> {
            tracing::debug!(selector = %selector, "click");
            let css = js_str(&selector.to_css());
            let clicked: bool = self
                .eval(format!(
                    "(() => {{ const el = document.querySelector({css}); \
                     if (!el) return false; el.click(); return true; }})()"
                ))
                .await?;
            if clicked {
                Ok(())
            } else {
                Err(VitrinaError::ElementNotFound {
                    selector: selector.describe(),
                })
            }
        }

        /// Fill an input element with a value.
        pub async fn fill(&self, selector: &Selector, value: &str) -> VitrinaResult<()> {
            tracing::debug!(selector = %selector, "fill");
            let css = js_str(&selector.to_css());
            let js_value = js_str(value);
            let filled: bool = self
                .eval(format!(
                    "(() => {{ const el = document.querySelector({css}); \
                     if (!el) return false; \
                     el.value = {js_value}; \
                     el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                     el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                     return true; }})()"
                ))
                .await?;
            if filled {
                Ok(())
            } else {
                Err(VitrinaError::ElementNotFound {
                    selector: selector.describe(),
                })
            }
        }

        /// Select an option by value on a select element.
        pub async fn select_option(&self, selector: &Selector, value: &str) -> VitrinaResult<()> {
            let css = js_str(&selector.to_css());
            let js_value = js_str(value);
            let selected: bool = self
                .eval(format!(
                    "(() => {{ const el = document.querySelector({css}); \
                     if (!el) return false; \
                     el.value = {js_value}; \
                     el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                     return true; }})()"
                ))
                .await?;
            if selected {
                Ok(())
            } else {
                Err(VitrinaError::ElementNotFound {
                    selector: selector.describe(),
                })
            }
        }

        /// Poll until the selector is visible or the bound expires.
        pub async fn wait_for_visible(
            &self,
            selector: &Selector,
            options: &WaitOptions,
        ) -> VitrinaResult<()> {
            let deadline = Deadline::from_options(options);
            loop {
                if self.is_visible(selector).await? {
                    return Ok(());
                }
                if deadline.expired() {
                    return Err(deadline.timeout_error(selector.describe()));
                }
                tokio::time::sleep(options.poll_interval()).await;
            }
        }

        /// Capture the session's cookies and web storage.
        pub async fn storage_state(&self) -> VitrinaResult<StorageState> {
            let cookies = {
                let inner = self.inner.lock().await;
                inner
                    .page
                    .get_cookies()
                    .await
                    .map_err(|e| VitrinaError::Session {
                        message: e.to_string(),
                    })?
            };
            let mut state = StorageState::new();
            for c in cookies {
                state.cookies.push(Cookie {
                    name: c.name,
                    value: c.value,
                    domain: c.domain,
                    path: c.path,
                    expires: Some(c.expires as i64),
                    http_only: c.http_only,
                    secure: c.secure,
                });
            }
            Ok(state)
        }

        /// Restore previously captured cookies into this session.
        pub async fn restore_storage_state(&self, state: &StorageState) -> VitrinaResult<()> {
            let mut params = Vec::with_capacity(state.cookies.len());
            for c in &state.cookies {
                let param = CookieParam::builder()
                    .name(c.name.clone())
                    .value(c.value.clone())
                    .domain(c.domain.clone())
                    .path(c.path.clone())
                    .build()
                    .map_err(|message| VitrinaError::StaleAuthState { message })?;
                params.push(param);
            }
            let inner = self.inner.lock().await;
            inner
                .page
                .set_cookies(params)
                .await
                .map_err(|e| VitrinaError::StaleAuthState {
                    message: e.to_string(),
                })?;
            Ok(())
        }

        /// Close the session and the browser behind it.
        pub async fn close(&self) -> VitrinaResult<()> {
            let mut inner = self.inner.lock().await;
            inner
                .browser
                .close()
                .await
                .map_err(|e| VitrinaError::Session {
                    message: e.to_string(),
                })?;
            Ok(())
        }
    }
}

// ============================================================================
// Mock storefront (when the `browser` feature is NOT enabled)
// ============================================================================

#[cfg(not(feature = "browser"))]
mod mock {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex, MutexGuard};

    use super::{Cookie, StorageState, SESSION_COOKIE};
    use crate::demo::{self, Product};
    use crate::locator::{slug, Selector};
    use crate::pages::routes;
    use crate::pages::totals::order_totals;
    use crate::result::{VitrinaError, VitrinaResult};
    use crate::wait::{Deadline, WaitOptions};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum SortKey {
        NameAsc,
        NameDesc,
        PriceAsc,
        PriceDesc,
    }

    #[derive(Debug)]
    struct Storefront {
        base_url: String,
        path: String,
        user: Option<String>,
        menu_open: bool,
        error: Option<String>,
        cart: Vec<&'static str>,
        fields: HashMap<String, String>,
        sort: SortKey,
        closed: bool,
    }

    const PROTECTED_ROUTES: [&str; 5] = [
        routes::INVENTORY,
        routes::CART,
        routes::CHECKOUT_INFO,
        routes::CHECKOUT_OVERVIEW,
        routes::CHECKOUT_COMPLETE,
    ];

    impl Storefront {
        fn logged_in(&self) -> bool {
            self.user.is_some()
        }

        fn on_shop_route(&self) -> bool {
            self.logged_in() && self.path != routes::LOGIN
        }

        fn view_title(&self) -> Option<&'static str> {
            if !self.logged_in() {
                return None;
            }
            match self.path.as_str() {
                routes::INVENTORY => Some("Products"),
                routes::CART => Some("Your Cart"),
                routes::CHECKOUT_INFO => Some("Checkout: Your Information"),
                routes::CHECKOUT_OVERVIEW => Some("Checkout: Overview"),
                routes::CHECKOUT_COMPLETE => Some("Checkout: Complete!"),
                _ => None,
            }
        }

        fn products_sorted(&self) -> Vec<Product> {
            let mut products: Vec<Product> = demo::CATALOG.to_vec();
            match self.sort {
                SortKey::NameAsc => products.sort_by(|a, b| a.name.cmp(b.name)),
                SortKey::NameDesc => products.sort_by(|a, b| b.name.cmp(a.name)),
                SortKey::PriceAsc => {
                    products.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap());
                }
                SortKey::PriceDesc => {
                    products.sort_by(|a, b| b.price.partial_cmp(&a.price).unwrap());
                }
            }
            products
        }

        fn cart_items(&self) -> Vec<Product> {
            self.cart
                .iter()
                .copied()
                .filter_map(demo::product)
                .collect()
        }

        fn in_cart(&self, name: &str) -> bool {
            self.cart.iter().any(|item| *item == name)
        }

        fn catalog_name_for_slug(s: &str) -> Option<&'static str> {
            demo::CATALOG
                .iter()
                .find(|p| slug(p.name) == s)
                .map(|p| p.name)
        }

        /// Resolve a selector to the text of the first visible match.
        /// `None` means not present/visible on the current view; inputs and
        /// containers resolve to an empty string.
        fn resolve(&self, selector: &Selector) -> Option<String> {
            match selector {
                Selector::Css(css) => {
                    (css == ".checkout_info" && self.path == routes::CHECKOUT_INFO)
                        .then(String::new)
                }
                Selector::TestId(id) => self.resolve_test_id(id),
            }
        }

        #[allow(clippy::too_many_lines)]
        fn resolve_test_id(&self, id: &str) -> Option<String> {
            if let Some(rest) = id.strip_prefix("add-to-cart-") {
                let name = Self::catalog_name_for_slug(rest)?;
                return (self.path == routes::INVENTORY && !self.in_cart(name))
                    .then(|| "Add to cart".to_string());
            }
            if let Some(rest) = id.strip_prefix("remove-") {
                let name = Self::catalog_name_for_slug(rest)?;
                let removable_view =
                    self.path == routes::INVENTORY || self.path == routes::CART;
                return (removable_view && self.in_cart(name)).then(|| "Remove".to_string());
            }

            match id {
                "login-container" | "username" | "password" | "login-button"
                    if self.path == routes::LOGIN =>
                {
                    Some(String::new())
                }
                "error" => self.error.clone(),
                "title" => self.view_title().map(str::to_string),
                "primary-header" if self.on_shop_route() => Some("Swag Labs".to_string()),
                "shopping-cart-link" | "open-menu" if self.on_shop_route() => Some(String::new()),
                "shopping-cart-badge" if self.on_shop_route() && !self.cart.is_empty() => {
                    Some(self.cart.len().to_string())
                }
                "close-menu" | "inventory-sidebar-link" | "about-sidebar-link"
                | "logout-sidebar-link" | "reset-sidebar-link"
                    if self.menu_open =>
                {
                    Some(String::new())
                }
                "inventory-list" | "product-sort-container" if self.path == routes::INVENTORY => {
                    Some(String::new())
                }
                "inventory-item" | "inventory-item-name" | "inventory-item-price" => {
                    self.resolve_all_test_id(id).into_iter().next()
                }
                "cart-list"
                    if self.path == routes::CART || self.path == routes::CHECKOUT_OVERVIEW =>
                {
                    Some(String::new())
                }
                "checkout" if self.path == routes::CART => Some(String::new()),
                "firstName" | "lastName" | "postalCode" if self.path == routes::CHECKOUT_INFO => {
                    Some(self.fields.get(id).cloned().unwrap_or_default())
                }
                "continue" if self.path == routes::CHECKOUT_INFO => Some(String::new()),
                "subtotal-label" | "tax-label" | "total-label"
                    if self.path == routes::CHECKOUT_OVERVIEW =>
                {
                    let prices: Vec<f64> = self.cart_items().iter().map(|p| p.price).collect();
                    let totals = order_totals(&prices, demo::TAX_RATE);
                    Some(match id {
                        "subtotal-label" => format!("Item total: ${:.2}", totals.subtotal),
                        "tax-label" => format!("Tax: ${:.2}", totals.tax),
                        _ => format!("Total: ${:.2}", totals.total),
                    })
                }
                "finish" if self.path == routes::CHECKOUT_OVERVIEW => Some(String::new()),
                "checkout-complete-container" | "back-to-products"
                    if self.path == routes::CHECKOUT_COMPLETE =>
                {
                    Some(String::new())
                }
                "complete-header" if self.path == routes::CHECKOUT_COMPLETE => {
                    Some("Thank you for your order!".to_string())
                }
                "complete-text" if self.path == routes::CHECKOUT_COMPLETE => Some(
                    "Your order has been dispatched, and will arrive just as fast \
                     as the pony can get there!"
                        .to_string(),
                ),
                _ => None,
            }
        }

        fn resolve_all_test_id(&self, id: &str) -> Vec<String> {
            let items: Vec<Product> = match self.path.as_str() {
                routes::INVENTORY => self.products_sorted(),
                routes::CART | routes::CHECKOUT_OVERVIEW => self.cart_items(),
                _ => return Vec::new(),
            };
            match id {
                "inventory-item" => items.iter().map(|_| String::new()).collect(),
                "inventory-item-name" => items.iter().map(|p| p.name.to_string()).collect(),
                "inventory-item-price" => {
                    items.iter().map(|p| format!("${:.2}", p.price)).collect()
                }
                _ => Vec::new(),
            }
        }

        fn submit_login(&mut self) {
            let username = self.fields.get("username").cloned().unwrap_or_default();
            let password = self.fields.get("password").cloned().unwrap_or_default();
            if username.is_empty() {
                self.error = Some(demo::ERROR_USERNAME_REQUIRED.to_string());
            } else if password.is_empty() {
                self.error = Some(demo::ERROR_PASSWORD_REQUIRED.to_string());
            } else if username == demo::LOCKED_OUT_USER && password == demo::PASSWORD {
                self.error = Some(demo::ERROR_LOCKED_OUT.to_string());
            } else if demo::is_known_user(&username) && password == demo::PASSWORD {
                tracing::debug!(%username, "login accepted");
                self.user = Some(username);
                self.error = None;
                self.fields.clear();
                self.path = routes::INVENTORY.to_string();
            } else {
                self.error = Some(demo::ERROR_BAD_CREDENTIALS.to_string());
            }
        }

        fn submit_checkout_information(&mut self) {
            let required = [
                ("firstName", "Error: First Name is required"),
                ("lastName", "Error: Last Name is required"),
                ("postalCode", "Error: Postal Code is required"),
            ];
            for (field, message) in required {
                if self.fields.get(field).map_or(true, String::is_empty) {
                    self.error = Some(message.to_string());
                    return;
                }
            }
            self.error = None;
            self.path = routes::CHECKOUT_OVERVIEW.to_string();
        }

        fn perform_click(&mut self, id: &str) {
            if let Some(rest) = id.strip_prefix("add-to-cart-") {
                if let Some(name) = Self::catalog_name_for_slug(rest) {
                    self.cart.push(name);
                }
                return;
            }
            if let Some(rest) = id.strip_prefix("remove-") {
                if let Some(name) = Self::catalog_name_for_slug(rest) {
                    self.cart.retain(|item| *item != name);
                }
                return;
            }
            match id {
                "login-button" => self.submit_login(),
                "shopping-cart-link" => self.path = routes::CART.to_string(),
                "checkout" => self.path = routes::CHECKOUT_INFO.to_string(),
                "continue" => self.submit_checkout_information(),
                "finish" => self.path = routes::CHECKOUT_COMPLETE.to_string(),
                "back-to-products" => {
                    self.cart.clear();
                    self.path = routes::INVENTORY.to_string();
                }
                "open-menu" => self.menu_open = true,
                "close-menu" => self.menu_open = false,
                "inventory-sidebar-link" => {
                    self.menu_open = false;
                    self.path = routes::INVENTORY.to_string();
                }
                "logout-sidebar-link" => {
                    self.user = None;
                    self.menu_open = false;
                    self.fields.clear();
                    self.path = routes::LOGIN.to_string();
                }
                "reset-sidebar-link" => self.cart.clear(),
                _ => {}
            }
        }
    }

    /// Driven-browser session over the built-in mock storefront
    #[derive(Debug, Clone)]
    pub struct Session {
        inner: Arc<Mutex<Storefront>>,
    }

    impl Session {
        /// Open a fresh session on the mock storefront.
        pub async fn start(web_base_url: impl Into<String>) -> VitrinaResult<Self> {
            Ok(Self {
                inner: Arc::new(Mutex::new(Storefront {
                    base_url: web_base_url.into().trim_end_matches('/').to_string(),
                    path: routes::LOGIN.to_string(),
                    user: None,
                    menu_open: false,
                    error: None,
                    cart: Vec::new(),
                    fields: HashMap::new(),
                    sort: SortKey::NameAsc,
                    closed: false,
                })),
            })
        }

        fn lock(&self) -> MutexGuard<'_, Storefront> {
            self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
        }

        fn open(&self) -> VitrinaResult<MutexGuard<'_, Storefront>> {
            let guard = self.lock();
            if guard.closed {
                return Err(VitrinaError::Session {
                    message: "session is closed".to_string(),
                });
            }
            Ok(guard)
        }

        /// Storefront base URL this session is bound to.
        #[must_use]
        pub fn base_url(&self) -> String {
            self.lock().base_url.clone()
        }

        /// Navigate to a storefront path and wait for the load signal.
        pub async fn navigate(&self, path: &str) -> VitrinaResult<()> {
            let mut store = self.open()?;
            tracing::debug!(%path, "navigate");
            store.error = None;
            store.menu_open = false;
            if PROTECTED_ROUTES.iter().any(|route| *route == path) && !store.logged_in() {
                store.error = Some(format!(
                    "Epic sadface: You can only access '{path}' when you are logged in"
                ));
                store.path = routes::LOGIN.to_string();
            } else {
                store.path = path.to_string();
            }
            Ok(())
        }

        /// Wait for the current navigation to settle.
        pub async fn wait_for_load(&self) -> VitrinaResult<()> {
            self.open().map(|_| ())
        }

        /// Path component of the session's current location.
        pub async fn current_path(&self) -> String {
            self.lock().path.clone()
        }

        /// Whether an element for the selector is present and visible.
        pub async fn is_visible(&self, selector: &Selector) -> VitrinaResult<bool> {
            Ok(self.open()?.resolve(selector).is_some())
        }

        /// Visible text of the first matching element.
        pub async fn visible_text(&self, selector: &Selector) -> VitrinaResult<String> {
            self.open()?
                .resolve(selector)
                .ok_or_else(|| VitrinaError::ElementNotFound {
                    selector: selector.describe(),
                })
        }

        /// Visible texts of all matching elements, in document order.
        pub async fn visible_texts(&self, selector: &Selector) -> VitrinaResult<Vec<String>> {
            let store = self.open()?;
            match selector {
                Selector::TestId(id) => {
                    let many = store.resolve_all_test_id(id);
                    if many.is_empty() {
                        Ok(store.resolve(selector).into_iter().collect())
                    } else {
                        Ok(many)
                    }
                }
                Selector::Css(_) => Ok(store.resolve(selector).into_iter().collect()),
            }
        }

        /// Click the element for the selector.
        pub async fn click(&self, selector: &Selector) -> VitrinaResult<()> {
            let mut store = self.open()?;
            if store.resolve(selector).is_none() {
                return Err(VitrinaError::ElementNotFound {
                    selector: selector.describe(),
                });
            }
            tracing::debug!(selector = %selector, "click");
            if let Selector::TestId(id) = selector {
                let id = id.clone();
                store.perform_click(&id);
            }
            Ok(())
        }

        /// Fill an input element with a value.
        pub async fn fill(&self, selector: &Selector, value: &str) -> VitrinaResult<()> {
            let mut store = self.open()?;
            match selector {
                Selector::TestId(id) if store.resolve(selector).is_some() => {
                    tracing::debug!(selector = %selector, "fill");
                    let id = id.clone();
                    store.fields.insert(id, value.to_string());
                    Ok(())
                }
                _ => Err(VitrinaError::ElementNotFound {
                    selector: selector.describe(),
                }),
            }
        }

        /// Select an option by value on a select element.
        pub async fn select_option(&self, selector: &Selector, value: &str) -> VitrinaResult<()> {
            let mut store = self.open()?;
            if store.resolve(selector).is_none() {
                return Err(VitrinaError::ElementNotFound {
                    selector: selector.describe(),
                });
            }
            store.sort = match value {
                "az" => SortKey::NameAsc,
                "za" => SortKey::NameDesc,
                "lohi" => SortKey::PriceAsc,
                "hilo" => SortKey::PriceDesc,
                other => {
                    return Err(VitrinaError::Session {
                        message: format!("unknown sort option '{other}'"),
                    })
                }
            };
            Ok(())
        }

        /// Poll until the selector is visible or the bound expires.
        pub async fn wait_for_visible(
            &self,
            selector: &Selector,
            options: &WaitOptions,
        ) -> VitrinaResult<()> {
            let deadline = Deadline::from_options(options);
            loop {
                if self.is_visible(selector).await? {
                    return Ok(());
                }
                if deadline.expired() {
                    return Err(deadline.timeout_error(selector.describe()));
                }
                tokio::time::sleep(options.poll_interval()).await;
            }
        }

        /// Capture the session's cookies and web storage.
        pub async fn storage_state(&self) -> VitrinaResult<StorageState> {
            let store = self.open()?;
            let mut state = StorageState::new();
            if let Some(user) = &store.user {
                state
                    .cookies
                    .push(Cookie::new(SESSION_COOKIE, user, &store.base_url));
            }
            Ok(state)
        }

        /// Restore a previously captured session, failing fast when the
        /// state does not carry a usable storefront session.
        pub async fn restore_storage_state(&self, state: &StorageState) -> VitrinaResult<()> {
            let mut store = self.open()?;
            let cookie = state
                .cookies
                .iter()
                .find(|c| c.name == SESSION_COOKIE)
                .ok_or_else(|| VitrinaError::StaleAuthState {
                    message: "artifact carries no storefront session cookie".to_string(),
                })?;
            if !crate::demo::is_known_user(&cookie.value)
                || cookie.value == crate::demo::LOCKED_OUT_USER
            {
                return Err(VitrinaError::StaleAuthState {
                    message: format!("persisted session for unusable user '{}'", cookie.value),
                });
            }
            store.user = Some(cookie.value.clone());
            Ok(())
        }

        /// Close the session; further actions error.
        pub async fn close(&self) -> VitrinaResult<()> {
            self.lock().closed = true;
            Ok(())
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::Session;
#[cfg(not(feature = "browser"))]
pub use mock::Session;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod storage_state_tests {
        use super::*;

        #[test]
        fn test_empty_state() {
            let state = StorageState::new();
            assert!(state.is_empty());
        }

        #[test]
        fn test_with_cookie_not_empty() {
            let state = StorageState::new().with_cookie(Cookie::new(
                SESSION_COOKIE,
                "standard_user",
                "https://shop.example.com",
            ));
            assert!(!state.is_empty());
            assert_eq!(state.cookies[0].path, "/");
        }

        #[test]
        fn test_save_and_load_round_trip() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("state.json");
            let state = StorageState::new().with_cookie(Cookie::new(
                SESSION_COOKIE,
                "standard_user",
                "https://shop.example.com",
            ));

            state.save(&path).unwrap();
            let loaded = StorageState::load(&path).unwrap();
            assert_eq!(loaded.cookies.len(), 1);
            assert_eq!(loaded.cookies[0].value, "standard_user");
        }

        #[test]
        fn test_load_missing_is_stale_auth_state() {
            let dir = tempfile::tempdir().unwrap();
            let err = StorageState::load(&dir.path().join("nope.json")).unwrap_err();
            assert!(matches!(err, crate::VitrinaError::StaleAuthState { .. }));
        }

        #[test]
        fn test_load_garbage_is_stale_auth_state() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("state.json");
            std::fs::write(&path, "not json at all").unwrap();
            let err = StorageState::load(&path).unwrap_err();
            assert!(matches!(err, crate::VitrinaError::StaleAuthState { .. }));
        }
    }

    #[cfg(not(feature = "browser"))]
    mod mock_session_tests {
        use super::*;
        use crate::demo;
        use crate::locator::Selector;
        use crate::pages::routes;
        use crate::wait::WaitOptions;

        async fn session() -> Session {
            Session::start("https://shop.example.com").await.unwrap()
        }

        async fn logged_in_session() -> Session {
            let s = session().await;
            s.fill(&Selector::test_id("username"), demo::STANDARD_USER)
                .await
                .unwrap();
            s.fill(&Selector::test_id("password"), demo::PASSWORD)
                .await
                .unwrap();
            s.click(&Selector::test_id("login-button")).await.unwrap();
            s
        }

        #[tokio::test]
        async fn test_starts_on_login_route() {
            let s = session().await;
            assert_eq!(s.current_path().await, routes::LOGIN);
            assert!(s
                .is_visible(&Selector::test_id("login-button"))
                .await
                .unwrap());
        }

        #[tokio::test]
        async fn test_login_moves_to_inventory() {
            let s = logged_in_session().await;
            assert_eq!(s.current_path().await, routes::INVENTORY);
            assert_eq!(
                s.visible_text(&Selector::test_id("title")).await.unwrap(),
                "Products"
            );
        }

        #[tokio::test]
        async fn test_protected_route_redirects_when_logged_out() {
            let s = session().await;
            s.navigate(routes::INVENTORY).await.unwrap();
            assert_eq!(s.current_path().await, routes::LOGIN);
            let error = s.visible_text(&Selector::test_id("error")).await.unwrap();
            assert!(error.contains("You can only access"));
        }

        #[tokio::test]
        async fn test_badge_absent_until_item_added() {
            let s = logged_in_session().await;
            let badge = Selector::test_id("shopping-cart-badge");
            assert!(!s.is_visible(&badge).await.unwrap());

            s.click(&Selector::test_id("add-to-cart-sauce-labs-backpack"))
                .await
                .unwrap();
            assert_eq!(s.visible_text(&badge).await.unwrap(), "1");
        }

        #[tokio::test]
        async fn test_add_control_swaps_to_remove() {
            let s = logged_in_session().await;
            let add = Selector::test_id("add-to-cart-sauce-labs-onesie");
            let remove = Selector::test_id("remove-sauce-labs-onesie");

            assert!(s.is_visible(&add).await.unwrap());
            assert!(!s.is_visible(&remove).await.unwrap());

            s.click(&add).await.unwrap();
            assert!(!s.is_visible(&add).await.unwrap());
            assert!(s.is_visible(&remove).await.unwrap());
        }

        #[tokio::test]
        async fn test_wait_for_visible_times_out_on_absent_element() {
            let s = session().await;
            let options = WaitOptions::new().with_timeout(120).with_poll_interval(10);
            let err = s
                .wait_for_visible(&Selector::test_id("inventory-list"), &options)
                .await
                .unwrap_err();
            assert!(matches!(err, VitrinaError::Timeout { .. }));
        }

        #[tokio::test]
        async fn test_storage_state_round_trip_restores_login() {
            let s = logged_in_session().await;
            let state = s.storage_state().await.unwrap();

            let fresh = session().await;
            fresh.restore_storage_state(&state).await.unwrap();
            fresh.navigate(routes::INVENTORY).await.unwrap();
            assert_eq!(fresh.current_path().await, routes::INVENTORY);
        }

        #[tokio::test]
        async fn test_restore_without_session_cookie_fails_fast() {
            let s = session().await;
            let err = s
                .restore_storage_state(&StorageState::new())
                .await
                .unwrap_err();
            assert!(matches!(err, VitrinaError::StaleAuthState { .. }));
        }

        #[tokio::test]
        async fn test_closed_session_rejects_actions() {
            let s = session().await;
            s.close().await.unwrap();
            let err = s.navigate(routes::LOGIN).await.unwrap_err();
            assert!(matches!(err, VitrinaError::Session { .. }));
        }
    }
}

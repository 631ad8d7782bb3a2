//! Fixture registry and per-test composition.
//!
//! A [`TestContext`] owns one [`Session`] exclusively and hands out the
//! collaborators a test asks for by [`Role`]: each role is constructed
//! lazily on first request, bound to the context's shared session, and
//! memoized for the context's lifetime, so repeated requests observe the
//! same instance. Unknown roles are a composition-time error, not a
//! use-time surprise.
//!
//! Pre-authentication is a first-class mode: [`run_auth_setup`] logs in
//! once and persists the session state; contexts created with
//! [`TestContext::with_persisted_auth`] reuse it read-only instead of
//! logging in again. A stale or incompatible artifact fails fast with a
//! re-run-setup signal rather than cascading into unrelated failures.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::api::RestClient;
use crate::config::HarnessConfig;
use crate::pages::{
    CartPage, CheckoutCompletePage, CheckoutInfoPage, CheckoutOverviewPage, InventoryItem,
    InventoryPage, LoginPage, PageView, SideMenu,
};
use crate::result::{VitrinaError, VitrinaResult};
use crate::session::{Session, StorageState};

/// Logical role names for the collaborators a test can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The login screen
    LoginScreen,
    /// The inventory (product list) screen
    Inventory,
    /// The per-item cart controls widget
    ItemControls,
    /// The slide-out side menu
    SideMenu,
    /// The cart screen
    Cart,
    /// Checkout step one: buyer information
    CheckoutInfo,
    /// Checkout step two: order overview
    CheckoutOverview,
    /// Checkout step three: confirmation
    CheckoutComplete,
    /// The REST API client
    RestClient,
}

impl Role {
    /// Every role the standard registry serves
    pub const ALL: [Self; 9] = [
        Self::LoginScreen,
        Self::Inventory,
        Self::ItemControls,
        Self::SideMenu,
        Self::Cart,
        Self::CheckoutInfo,
        Self::CheckoutOverview,
        Self::CheckoutComplete,
        Self::RestClient,
    ];

    /// Stable name for error messages
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LoginScreen => "login screen",
            Self::Inventory => "inventory",
            Self::ItemControls => "item controls",
            Self::SideMenu => "side menu",
            Self::Cart => "cart",
            Self::CheckoutInfo => "checkout information",
            Self::CheckoutOverview => "checkout overview",
            Self::CheckoutComplete => "checkout complete",
            Self::RestClient => "rest client",
        }
    }
}

type Instance = Arc<dyn Any + Send + Sync>;
type Factory = Box<dyn Fn(&Session, &HarnessConfig) -> Instance + Send + Sync>;

/// Role-keyed factory registry with per-context memoization.
#[derive(Default)]
pub struct FixtureRegistry {
    factories: HashMap<Role, Factory>,
    instances: Mutex<HashMap<Role, Instance>>,
}

impl std::fmt::Debug for FixtureRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureRegistry")
            .field("factories", &self.factories.len())
            .finish()
    }
}

impl FixtureRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry serving every [`Role::ALL`] entry with its standard
    /// factory.
    #[must_use]
    pub fn with_standard_roles() -> Self {
        let mut registry = Self::new();
        registry.register(Role::LoginScreen, |s, _| Arc::new(LoginPage::new(s.clone())));
        registry.register(Role::Inventory, |s, _| {
            Arc::new(InventoryPage::new(s.clone()))
        });
        registry.register(Role::ItemControls, |s, _| {
            Arc::new(InventoryItem::new(s.clone()))
        });
        registry.register(Role::SideMenu, |s, _| Arc::new(SideMenu::new(s.clone())));
        registry.register(Role::Cart, |s, _| Arc::new(CartPage::new(s.clone())));
        registry.register(Role::CheckoutInfo, |s, _| {
            Arc::new(CheckoutInfoPage::new(s.clone()))
        });
        registry.register(Role::CheckoutOverview, |s, _| {
            Arc::new(CheckoutOverviewPage::new(s.clone()))
        });
        registry.register(Role::CheckoutComplete, |s, _| {
            Arc::new(CheckoutCompletePage::new(s.clone()))
        });
        registry.register(Role::RestClient, |_, c| {
            Arc::new(RestClient::new(&c.api_base_url, &c.api_key))
        });
        registry
    }

    /// Register (or replace) the factory for a role.
    pub fn register<F>(&mut self, role: Role, factory: F)
    where
        F: Fn(&Session, &HarnessConfig) -> Instance + Send + Sync + 'static,
    {
        self.factories.insert(role, Box::new(factory));
    }

    /// Whether a factory is registered for the role.
    #[must_use]
    pub fn is_registered(&self, role: Role) -> bool {
        self.factories.contains_key(&role)
    }

    /// Resolve a role to its memoized instance, constructing it on first
    /// request. The same `Arc` is returned for every request of the same
    /// role within this registry's lifetime.
    pub fn resolve<T: Any + Send + Sync>(
        &self,
        role: Role,
        session: &Session,
        config: &HarnessConfig,
    ) -> VitrinaResult<Arc<T>> {
        let mut instances = self
            .instances
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let instance = match instances.get(&role) {
            Some(existing) => Arc::clone(existing),
            None => {
                let factory = self.factories.get(&role).ok_or_else(|| {
                    VitrinaError::Fixture {
                        message: format!(
                            "no factory registered for role '{}'",
                            role.name()
                        ),
                    }
                })?;
                let built = factory(session, config);
                instances.insert(role, Arc::clone(&built));
                built
            }
        };
        instance.downcast::<T>().map_err(|_| VitrinaError::Fixture {
            message: format!(
                "role '{}' resolved to a different type than requested",
                role.name()
            ),
        })
    }
}

/// One test's execution context: exclusive session, configuration, and
/// memoized collaborators.
#[derive(Debug)]
pub struct TestContext {
    config: HarnessConfig,
    session: Session,
    registry: FixtureRegistry,
}

impl TestContext {
    /// Open a context with a fresh, unauthenticated session.
    pub async fn start(config: HarnessConfig) -> VitrinaResult<Self> {
        let session = Session::start(config.web_base_url.clone()).await?;
        Ok(Self {
            config,
            session,
            registry: FixtureRegistry::with_standard_roles(),
        })
    }

    /// Open a context that reuses the persisted auth state instead of
    /// logging in.
    ///
    /// # Errors
    ///
    /// Returns [`VitrinaError::StaleAuthState`] when the artifact is
    /// missing, unreadable, or rejected by the storefront.
    pub async fn with_persisted_auth(config: HarnessConfig) -> VitrinaResult<Self> {
        let state = StorageState::load(config.storage_state_path())?;
        let context = Self::start(config).await?;
        context.session.restore_storage_state(&state).await?;

        // One cheap probe so a rejected session fails here, not in the
        // middle of an unrelated test.
        let inventory = InventoryPage::new(context.session.clone());
        inventory.visit().await?;
        inventory
            .assert_page_view()
            .await
            .map_err(|e| VitrinaError::StaleAuthState {
                message: format!(
                    "persisted session from {} was rejected by the storefront: {e}",
                    context.config.storage_state_path().display()
                ),
            })?;
        Ok(context)
    }

    /// Replace the registry, e.g. to stub a role.
    pub fn set_registry(&mut self, registry: FixtureRegistry) {
        self.registry = registry;
    }

    /// The context's exclusive session handle.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The context's configuration.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Resolve a role against this context's session and configuration.
    pub fn resolve<T: Any + Send + Sync>(&self, role: Role) -> VitrinaResult<Arc<T>> {
        self.registry.resolve(role, &self.session, &self.config)
    }

    /// The login screen.
    pub fn login_page(&self) -> VitrinaResult<Arc<LoginPage>> {
        self.resolve(Role::LoginScreen)
    }

    /// The inventory screen.
    pub fn inventory_page(&self) -> VitrinaResult<Arc<InventoryPage>> {
        self.resolve(Role::Inventory)
    }

    /// The per-item cart controls.
    pub fn inventory_item(&self) -> VitrinaResult<Arc<InventoryItem>> {
        self.resolve(Role::ItemControls)
    }

    /// The side menu.
    pub fn side_menu(&self) -> VitrinaResult<Arc<SideMenu>> {
        self.resolve(Role::SideMenu)
    }

    /// The cart screen.
    pub fn cart_page(&self) -> VitrinaResult<Arc<CartPage>> {
        self.resolve(Role::Cart)
    }

    /// Checkout step one.
    pub fn checkout_info_page(&self) -> VitrinaResult<Arc<CheckoutInfoPage>> {
        self.resolve(Role::CheckoutInfo)
    }

    /// Checkout step two.
    pub fn checkout_overview_page(&self) -> VitrinaResult<Arc<CheckoutOverviewPage>> {
        self.resolve(Role::CheckoutOverview)
    }

    /// Checkout step three.
    pub fn checkout_complete_page(&self) -> VitrinaResult<Arc<CheckoutCompletePage>> {
        self.resolve(Role::CheckoutComplete)
    }

    /// The REST API client.
    pub fn rest_client(&self) -> VitrinaResult<Arc<RestClient>> {
        self.resolve(Role::RestClient)
    }

    /// Tear the context down deterministically.
    pub async fn close(self) -> VitrinaResult<()> {
        self.session.close().await
    }
}

/// One-time setup: log in once and persist the resulting session state
/// for dependent contexts. Must run to completion before any context
/// opts into [`TestContext::with_persisted_auth`]; afterwards the
/// artifact is read-only.
pub async fn run_auth_setup(
    config: &HarnessConfig,
    username: &str,
    password: &str,
) -> VitrinaResult<()> {
    let session = Session::start(config.web_base_url.clone()).await?;
    let login = LoginPage::new(session.clone());
    login.visit().await?;
    login.login(username, password).await?;
    InventoryPage::new(session.clone()).assert_page_view().await?;

    let state = session.storage_state().await?;
    state.save(config.storage_state_path())?;
    tracing::info!(
        path = %config.storage_state_path().display(),
        "persisted authenticated session state"
    );
    session.close().await
}

#[cfg(all(test, not(feature = "browser")))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::demo;
    use crate::session::Cookie;

    fn config() -> HarnessConfig {
        HarnessConfig::new("https://shop.example.com", "https://api.example.com")
            .with_api_key("k-test")
    }

    mod registry_tests {
        use super::*;

        #[tokio::test]
        async fn test_resolve_is_memoized_per_context() {
            let context = TestContext::start(config()).await.unwrap();
            let first = context.login_page().unwrap();
            let second = context.login_page().unwrap();
            assert!(Arc::ptr_eq(&first, &second));
        }

        #[tokio::test]
        async fn test_every_standard_role_resolves() {
            let context = TestContext::start(config()).await.unwrap();
            for role in Role::ALL {
                assert!(context.registry.is_registered(role), "{}", role.name());
            }
            context.login_page().unwrap();
            context.inventory_page().unwrap();
            context.inventory_item().unwrap();
            context.side_menu().unwrap();
            context.cart_page().unwrap();
            context.checkout_info_page().unwrap();
            context.checkout_overview_page().unwrap();
            context.checkout_complete_page().unwrap();
            context.rest_client().unwrap();
        }

        #[tokio::test]
        async fn test_unregistered_role_is_a_composition_error() {
            let mut context = TestContext::start(config()).await.unwrap();
            context.set_registry(FixtureRegistry::new());
            let err = context.login_page().unwrap_err();
            match err {
                VitrinaError::Fixture { message } => {
                    assert!(message.contains("login screen"));
                    assert!(message.contains("no factory"));
                }
                other => panic!("expected Fixture, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_type_mismatch_is_a_fixture_error() {
            let context = TestContext::start(config()).await.unwrap();
            let err = context.resolve::<CartPage>(Role::LoginScreen).unwrap_err();
            assert!(matches!(err, VitrinaError::Fixture { .. }));
        }

        #[tokio::test]
        async fn test_rest_client_gets_configured_base_url() {
            let context = TestContext::start(config()).await.unwrap();
            let client = context.rest_client().unwrap();
            assert_eq!(client.base_url(), "https://api.example.com");
        }

        #[tokio::test]
        async fn test_page_objects_share_the_context_session() {
            let context = TestContext::start(config()).await.unwrap();
            let login = context.login_page().unwrap();
            login.visit().await.unwrap();
            login.login(demo::STANDARD_USER, demo::PASSWORD).await.unwrap();

            // A different page object bound to the same session observes
            // the logged-in state.
            let inventory = context.inventory_page().unwrap();
            inventory.assert_page_view().await.unwrap();
        }
    }

    mod auth_setup_tests {
        use super::*;

        fn config_with_artifact(dir: &std::path::Path) -> HarnessConfig {
            config().with_storage_state_path(dir.join("state.json"))
        }

        #[tokio::test]
        async fn test_setup_then_persisted_auth() {
            let dir = tempfile::tempdir().unwrap();
            let config = config_with_artifact(dir.path());

            run_auth_setup(&config, demo::STANDARD_USER, demo::PASSWORD)
                .await
                .unwrap();

            let context = TestContext::with_persisted_auth(config).await.unwrap();
            let inventory = context.inventory_page().unwrap();
            inventory.assert_page_view().await.unwrap();
        }

        #[tokio::test]
        async fn test_missing_artifact_fails_fast() {
            let dir = tempfile::tempdir().unwrap();
            let err = TestContext::with_persisted_auth(config_with_artifact(dir.path()))
                .await
                .unwrap_err();
            assert!(matches!(err, VitrinaError::StaleAuthState { .. }));
        }

        #[tokio::test]
        async fn test_incompatible_artifact_fails_fast() {
            let dir = tempfile::tempdir().unwrap();
            let config = config_with_artifact(dir.path());

            let state = StorageState::new().with_cookie(Cookie::new(
                crate::session::SESSION_COOKIE,
                demo::LOCKED_OUT_USER,
                "https://shop.example.com",
            ));
            state.save(config.storage_state_path()).unwrap();

            let err = TestContext::with_persisted_auth(config).await.unwrap_err();
            match err {
                VitrinaError::StaleAuthState { message } => {
                    assert!(message.contains("locked_out_user"));
                }
                other => panic!("expected StaleAuthState, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_setup_with_bad_credentials_does_not_persist() {
            let dir = tempfile::tempdir().unwrap();
            let config = config_with_artifact(dir.path());

            let err = run_auth_setup(&config, "invalid_user", "nope")
                .await
                .unwrap_err();
            assert!(matches!(err, VitrinaError::Assertion { .. }));
            assert!(!config.storage_state_path().exists());
        }
    }

    #[tokio::test]
    async fn test_full_round_trip_ends_on_empty_inventory() {
        let context = TestContext::start(config()).await.unwrap();

        let login = context.login_page().unwrap();
        login.visit().await.unwrap();
        login.login(demo::STANDARD_USER, demo::PASSWORD).await.unwrap();

        let inventory = context.inventory_page().unwrap();
        inventory.assert_page_view().await.unwrap();
        inventory.add_item_to_cart("Sauce Labs Backpack").await.unwrap();
        inventory
            .add_item_to_cart("Sauce Labs Fleece Jacket")
            .await
            .unwrap();
        inventory
            .remove_item_from_cart("Sauce Labs Fleece Jacket")
            .await
            .unwrap();
        inventory.add_item_to_cart("Sauce Labs Onesie").await.unwrap();
        assert_eq!(inventory.cart_badge_count().await.unwrap(), 2);

        inventory.open_cart().await.unwrap();
        let cart = context.cart_page().unwrap();
        cart.assert_page_view().await.unwrap();
        cart.checkout().await.unwrap();

        let info = context.checkout_info_page().unwrap();
        info.assert_page_view().await.unwrap();
        info.fill_information_and_continue("Moxy", "Mind", "01234")
            .await
            .unwrap();

        let overview = context.checkout_overview_page().unwrap();
        overview.assert_page_view().await.unwrap();
        assert_eq!(
            overview.item_names().await.unwrap(),
            vec!["Sauce Labs Backpack", "Sauce Labs Onesie"]
        );
        overview.finish().await.unwrap();

        let complete = context.checkout_complete_page().unwrap();
        complete.assert_page_view().await.unwrap();
        complete.assert_order_complete().await.unwrap();
        complete.back_to_products().await.unwrap();

        inventory.assert_page_view().await.unwrap();
        assert_eq!(inventory.cart_badge_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_close_tears_the_session_down() {
        let context = TestContext::start(config()).await.unwrap();
        let session = context.session().clone();
        context.close().await.unwrap();
        assert!(session.navigate("/").await.is_err());
    }
}

//! Login view.

use async_trait::async_trait;

use crate::locator::Selector;
use crate::result::{VitrinaError, VitrinaResult};
use crate::session::Session;

use super::{routes, PageView};

/// The login view, reached at the storefront root.
#[derive(Debug, Clone)]
pub struct LoginPage {
    session: Session,
}

impl LoginPage {
    /// Bind the login view to a session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    fn username_input() -> Selector {
        Selector::test_id("username")
    }

    fn password_input() -> Selector {
        Selector::test_id("password")
    }

    fn login_button() -> Selector {
        Selector::test_id("login-button")
    }

    /// Submit credentials and wait for the resulting navigation.
    ///
    /// On success the storefront lands on the inventory view; the caller
    /// confirms that with the inventory page's `assert_page_view`. On
    /// failure the route stays here and [`Self::assert_error_message`]
    /// checks the specific refusal.
    pub async fn login(&self, username: &str, password: &str) -> VitrinaResult<()> {
        self.session.fill(&Self::username_input(), username).await?;
        self.session.fill(&Self::password_input(), password).await?;
        self.session.click(&Self::login_button()).await?;
        self.session.wait_for_load().await
    }

    /// Assert the visible error banner contains the given text.
    pub async fn assert_error_message(&self, expected: &str) -> VitrinaResult<()> {
        let error = Selector::test_id("error");
        if !self.session.is_visible(&error).await? {
            return Err(VitrinaError::assertion(
                "login error banner",
                expected,
                "<no banner shown>",
            ));
        }
        let actual = self.session.visible_text(&error).await?;
        if actual.contains(expected) {
            Ok(())
        } else {
            Err(VitrinaError::assertion("login error banner", expected, actual))
        }
    }
}

#[async_trait]
impl PageView for LoginPage {
    fn session(&self) -> &Session {
        &self.session
    }

    fn path(&self) -> &str {
        routes::LOGIN
    }

    fn landmark(&self) -> Selector {
        Selector::test_id("login-container")
    }
}

#[cfg(all(test, not(feature = "browser")))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::demo;

    async fn login_page() -> LoginPage {
        let session = Session::start("https://shop.example.com").await.unwrap();
        LoginPage::new(session)
    }

    #[tokio::test]
    async fn test_assert_page_view_on_fresh_session() {
        let page = login_page().await;
        page.visit().await.unwrap();
        page.assert_page_view().await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_credentials_message() {
        let page = login_page().await;
        page.visit().await.unwrap();
        page.login("", "").await.unwrap();
        page.assert_error_message(demo::ERROR_USERNAME_REQUIRED)
            .await
            .unwrap();
        page.assert_page_url().await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_credentials_message() {
        let page = login_page().await;
        page.visit().await.unwrap();
        page.login("invalid_user", "invalidPassword").await.unwrap();
        page.assert_error_message(demo::ERROR_BAD_CREDENTIALS)
            .await
            .unwrap();
        page.assert_page_url().await.unwrap();
    }

    #[tokio::test]
    async fn test_locked_out_message() {
        let page = login_page().await;
        page.visit().await.unwrap();
        page.login(demo::LOCKED_OUT_USER, demo::PASSWORD)
            .await
            .unwrap();
        page.assert_error_message(demo::ERROR_LOCKED_OUT)
            .await
            .unwrap();
        page.assert_page_url().await.unwrap();
    }

    #[tokio::test]
    async fn test_wrong_error_text_fails_with_detail() {
        let page = login_page().await;
        page.visit().await.unwrap();
        page.login("", "").await.unwrap();
        let err = page
            .assert_error_message(demo::ERROR_LOCKED_OUT)
            .await
            .unwrap_err();
        match err {
            VitrinaError::Assertion { expected, actual, .. } => {
                assert!(expected.contains("locked out"));
                assert!(actual.contains("Username is required"));
            }
            other => panic!("expected Assertion, got {other:?}"),
        }
    }
}

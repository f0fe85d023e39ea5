use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::error::WebDriverError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no element matches `{0}`")]
    NotFound(String),
    #[error("timed out after {timeout:?} waiting for `{selector}`")]
    Timeout { selector: String, timeout: Duration },
    #[error(transparent)]
    WebDriver(#[from] WebDriverError),
}

/// A node of the rendered page.
#[async_trait]
pub trait PageElement: Send + Sync {
    async fn text(&self) -> Result<String, SessionError>;

    async fn attribute(&self, name: &str) -> Result<Option<String>, SessionError>;

    /// Finds the first descendant matching `selector`.
    async fn find(&self, selector: &str) -> Result<Self, SessionError>
    where
        Self: Sized;
}

/// One browser-controlled page lifecycle. Selectors are CSS.
#[async_trait]
pub trait PageSession: Send + Sync {
    type Element: PageElement;

    async fn open(&self, url: &str) -> Result<(), SessionError>;

    /// Polls until at least one element matches, or `timeout` elapses.
    async fn wait_for_presence(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<bool, SessionError>;

    async fn find_all(&self, selector: &str) -> Result<Vec<Self::Element>, SessionError>;

    async fn find(&self, selector: &str) -> Result<Self::Element, SessionError>;

    async fn wait_for_clickable(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Self::Element, SessionError>;

    async fn scroll_into_view(&self, element: &Self::Element) -> Result<(), SessionError>;

    async fn click(&self, element: &Self::Element) -> Result<(), SessionError>;

    /// Polls until `element` is detached from the page. `false` on timeout.
    async fn wait_for_staleness(
        &self,
        element: &Self::Element,
        timeout: Duration,
    ) -> Result<bool, SessionError>;

    /// Types `text` into the element with id `element_id` and confirms it.
    async fn submit_text(&self, element_id: &str, text: &str) -> Result<(), SessionError>;

    /// Releases the browser. Consumes the session so it cannot be used again.
    async fn close(self) -> Result<(), SessionError>
    where
        Self: Sized;
}

/// Disabled when `aria-disabled` is set to anything but "false", or when a
/// plain `disabled` attribute is present.
pub async fn is_disabled<E: PageElement>(element: &E) -> Result<bool, SessionError> {
    if let Some(aria) = element.attribute("aria-disabled").await? {
        if !aria.trim().eq_ignore_ascii_case("false") {
            return Ok(true);
        }
    }
    Ok(element.attribute("disabled").await?.is_some())
}

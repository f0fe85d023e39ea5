use std::time::{Duration, Instant};

use async_trait::async_trait;
use thirtyfour::{
    error::WebDriverError, prelude::*, ChromiumLikeCapabilities, DesiredCapabilities, WebDriver,
    WebElement,
};

use crate::configuration::WebDriverSettings;

use super::page_session::{PageElement, PageSession, SessionError};

pub struct Droid {
    pub driver: WebDriver,
    poll_interval: Duration,
}

impl Droid {
    pub async fn new(
        settings: &WebDriverSettings,
        poll_interval: Duration,
    ) -> Result<Self, SessionError> {
        let mut caps = DesiredCapabilities::chrome();
        if settings.headless {
            caps.set_headless()?;
        }

        log::info!("Starting browser session on {}", settings.server_url);
        let driver = WebDriver::new(settings.server_url.as_str(), caps).await?;
        if settings.maximize_window {
            driver.maximize_window().await?;
        }

        Ok(Droid {
            driver,
            poll_interval,
        })
    }
}

fn not_found_as(selector: &str, e: WebDriverError) -> SessionError {
    match e {
        WebDriverError::NoSuchElement(..) => SessionError::NotFound(selector.to_string()),
        e => SessionError::WebDriver(e),
    }
}

#[async_trait]
impl PageElement for WebElement {
    async fn text(&self) -> Result<String, SessionError> {
        Ok(WebElement::text(self).await?)
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, SessionError> {
        Ok(self.attr(name).await?)
    }

    async fn find(&self, selector: &str) -> Result<Self, SessionError> {
        WebElement::find(self, By::Css(selector))
            .await
            .map_err(|e| not_found_as(selector, e))
    }
}

#[async_trait]
impl PageSession for Droid {
    type Element = WebElement;

    async fn open(&self, url: &str) -> Result<(), SessionError> {
        Ok(self.driver.goto(url).await?)
    }

    async fn wait_for_presence(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<bool, SessionError> {
        Ok(self
            .driver
            .query(By::Css(selector))
            .wait(timeout, self.poll_interval)
            .exists()
            .await?)
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<WebElement>, SessionError> {
        Ok(self.driver.find_all(By::Css(selector)).await?)
    }

    async fn find(&self, selector: &str) -> Result<WebElement, SessionError> {
        self.driver
            .find(By::Css(selector))
            .await
            .map_err(|e| not_found_as(selector, e))
    }

    async fn wait_for_clickable(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<WebElement, SessionError> {
        match self
            .driver
            .query(By::Css(selector))
            .wait(timeout, self.poll_interval)
            .and_clickable()
            .first()
            .await
        {
            Ok(element) => Ok(element),
            Err(WebDriverError::NoSuchElement(..)) => Err(SessionError::Timeout {
                selector: selector.to_string(),
                timeout,
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn scroll_into_view(&self, element: &WebElement) -> Result<(), SessionError> {
        Ok(element.scroll_into_view().await?)
    }

    async fn click(&self, element: &WebElement) -> Result<(), SessionError> {
        Ok(element.click().await?)
    }

    async fn wait_for_staleness(
        &self,
        element: &WebElement,
        timeout: Duration,
    ) -> Result<bool, SessionError> {
        let deadline = Instant::now() + timeout;
        loop {
            if !element.is_present().await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn submit_text(&self, element_id: &str, text: &str) -> Result<(), SessionError> {
        let search_box = self
            .driver
            .find(By::Id(element_id))
            .await
            .map_err(|e| not_found_as(element_id, e))?;
        search_box.send_keys(text).await?;
        search_box.send_keys(Key::Enter).await?;
        Ok(())
    }

    async fn close(self) -> Result<(), SessionError> {
        log::info!("Closing browser session");
        Ok(self.driver.quit().await?)
    }
}

//! Scripted in-memory session used by the unit tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;

use crate::configuration::SelectorSettings;

use super::page_session::{PageElement, PageSession, SessionError};

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    text: String,
    attributes: HashMap<String, String>,
    children: HashMap<String, FakeElement>,
    broken: bool,
    origin_page: Option<usize>,
}

impl FakeElement {
    pub fn new(text: &str) -> Self {
        FakeElement {
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_child(mut self, selector: &str, child: FakeElement) -> Self {
        self.children.insert(selector.to_string(), child);
        self
    }

    /// Every call on a broken element fails.
    pub fn broken() -> Self {
        FakeElement {
            broken: true,
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), SessionError> {
        match self.broken {
            true => Err(SessionError::NotFound("<stale element>".to_string())),
            false => Ok(()),
        }
    }
}

#[async_trait]
impl PageElement for FakeElement {
    async fn text(&self) -> Result<String, SessionError> {
        self.check()?;
        Ok(self.text.clone())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, SessionError> {
        self.check()?;
        Ok(self.attributes.get(name).cloned())
    }

    async fn find(&self, selector: &str) -> Result<Self, SessionError> {
        self.check()?;
        self.children
            .get(selector)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(selector.to_string()))
    }
}

/// Builds a job card using the field selectors of `test_selectors`.
pub fn card(
    title: Option<&str>,
    company: Option<&str>,
    location: Option<&str>,
    link: Option<&str>,
) -> FakeElement {
    let selectors = test_selectors();
    let mut card = FakeElement::default();
    if title.is_some() || link.is_some() {
        let mut anchor = FakeElement::new(title.unwrap_or(""));
        if let Some(link) = link {
            anchor = anchor.with_attribute(&selectors.link_attribute, link);
        }
        card = card.with_child(&selectors.title, anchor);
    }
    if let Some(company) = company {
        card = card.with_child(&selectors.company, FakeElement::new(company));
    }
    if let Some(location) = location {
        card = card.with_child(&selectors.location, FakeElement::new(location));
    }
    card
}

pub fn test_selectors() -> SelectorSettings {
    SelectorSettings {
        card: "article.job".to_string(),
        results_ready: "article.job, .no-results".to_string(),
        next_page: "a.next".to_string(),
        title: "h3 a".to_string(),
        company: "a.company".to_string(),
        location: "span.location".to_string(),
        link: "h3 a".to_string(),
        link_attribute: "href".to_string(),
    }
}

#[derive(Debug, Clone)]
pub enum NextControl {
    Missing,
    Disabled,
    Enabled,
    /// Clickable, but the click never replaces the page.
    Inert,
}

#[derive(Debug, Clone)]
pub struct FakePage {
    pub cards: Vec<FakeElement>,
    pub next: NextControl,
    pub loads: bool,
}

impl FakePage {
    pub fn new(cards: Vec<FakeElement>, next: NextControl) -> Self {
        FakePage {
            cards,
            next,
            loads: true,
        }
    }

    /// A page that never finishes rendering.
    pub fn stalled() -> Self {
        FakePage {
            cards: vec![],
            next: NextControl::Missing,
            loads: false,
        }
    }
}

/// Counters shared with the test after the session has been consumed.
#[derive(Debug, Clone, Default)]
pub struct FakeCounters {
    pub clicks: Arc<AtomicUsize>,
    pub closes: Arc<AtomicUsize>,
    pub submitted: Arc<Mutex<Vec<String>>>,
}

impl FakeCounters {
    pub fn clicks(&self) -> usize {
        self.clicks.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

pub struct FakeSession {
    selectors: SelectorSettings,
    search_input_id: String,
    pages: Vec<FakePage>,
    current: AtomicUsize,
    search_box_present: bool,
    panic_on_harvest: Option<usize>,
    error_on_harvest: Option<usize>,
    counters: FakeCounters,
}

impl FakeSession {
    pub fn new(pages: Vec<FakePage>) -> Self {
        FakeSession {
            selectors: test_selectors(),
            search_input_id: "keywords-input".to_string(),
            pages,
            current: AtomicUsize::new(0),
            search_box_present: true,
            panic_on_harvest: None,
            error_on_harvest: None,
            counters: FakeCounters::default(),
        }
    }

    pub fn without_search_box(mut self) -> Self {
        self.search_box_present = false;
        self
    }

    /// Panics when cards are collected on the given zero-based page.
    pub fn panicking_on_page(mut self, page: usize) -> Self {
        self.panic_on_harvest = Some(page);
        self
    }

    /// Fails card collection on the given zero-based page.
    pub fn erroring_on_page(mut self, page: usize) -> Self {
        self.error_on_harvest = Some(page);
        self
    }

    pub fn counters(&self) -> FakeCounters {
        self.counters.clone()
    }

    fn page(&self) -> Option<&FakePage> {
        self.pages.get(self.current.load(Ordering::SeqCst))
    }

    fn cards(&self) -> Vec<FakeElement> {
        let current = self.current.load(Ordering::SeqCst);
        match self.page() {
            Some(page) if page.loads => page
                .cards
                .iter()
                .cloned()
                .map(|mut card| {
                    card.origin_page = Some(current);
                    card
                })
                .collect(),
            _ => vec![],
        }
    }

    fn next_control(&self) -> Option<FakeElement> {
        match self.page()?.next {
            NextControl::Missing => None,
            NextControl::Disabled => {
                Some(FakeElement::new("Next").with_attribute("aria-disabled", "true"))
            }
            NextControl::Enabled | NextControl::Inert => Some(FakeElement::new("Next")),
        }
    }
}

#[async_trait]
impl PageSession for FakeSession {
    type Element = FakeElement;

    async fn open(&self, _url: &str) -> Result<(), SessionError> {
        Ok(())
    }

    async fn wait_for_presence(
        &self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<bool, SessionError> {
        if selector == format!("#{}", self.search_input_id) {
            return Ok(self.search_box_present);
        }
        let loads = self.page().map(|p| p.loads).unwrap_or(false);
        if selector == self.selectors.results_ready {
            return Ok(loads);
        }
        if selector == self.selectors.card {
            return Ok(loads && self.page().map(|p| !p.cards.is_empty()).unwrap_or(false));
        }
        Ok(false)
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<FakeElement>, SessionError> {
        let current = self.current.load(Ordering::SeqCst);
        if self.panic_on_harvest == Some(current) {
            panic!("browser crashed");
        }
        if self.error_on_harvest == Some(current) {
            return Err(SessionError::NotFound("session gone".to_string()));
        }
        match selector == self.selectors.card {
            true => Ok(self.cards()),
            false => Ok(vec![]),
        }
    }

    async fn find(&self, selector: &str) -> Result<FakeElement, SessionError> {
        if selector == self.selectors.next_page {
            if let Some(control) = self.next_control() {
                return Ok(control);
            }
        }
        if selector == self.selectors.card {
            if let Some(card) = self.cards().into_iter().next() {
                return Ok(card);
            }
        }
        Err(SessionError::NotFound(selector.to_string()))
    }

    async fn wait_for_clickable(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<FakeElement, SessionError> {
        match self.find(selector).await {
            Ok(control) => Ok(control),
            Err(_) => Err(SessionError::Timeout {
                selector: selector.to_string(),
                timeout,
            }),
        }
    }

    async fn scroll_into_view(&self, _element: &FakeElement) -> Result<(), SessionError> {
        Ok(())
    }

    async fn click(&self, _element: &FakeElement) -> Result<(), SessionError> {
        self.counters.clicks.fetch_add(1, Ordering::SeqCst);
        if !matches!(self.page().map(|p| &p.next), Some(NextControl::Inert)) {
            self.current.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn wait_for_staleness(
        &self,
        element: &FakeElement,
        _timeout: Duration,
    ) -> Result<bool, SessionError> {
        let current = self.current.load(Ordering::SeqCst);
        Ok(element.origin_page.map_or(true, |page| page != current))
    }

    async fn submit_text(&self, element_id: &str, text: &str) -> Result<(), SessionError> {
        if element_id != self.search_input_id {
            return Err(SessionError::NotFound(element_id.to_string()));
        }
        self.counters
            .submitted
            .lock()
            .unwrap()
            .push(text.to_string());
        Ok(())
    }

    async fn close(self) -> Result<(), SessionError> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

use std::time::Duration;

use crate::{
    configuration::{ScrapingSettings, SearchSettings, SelectorSettings},
    domain::{AdvancePolicy, DoneReason, FailureReason, HarvestProgress, HarvestState, Termination},
};

use super::{
    listing_extractor::ListingExtractor,
    page_session::{is_disabled, PageSession, SessionError},
};

pub struct PaginationDriver {
    search: SearchSettings,
    selectors: SelectorSettings,
    policy: AdvancePolicy,
    search_timeout: Duration,
    page_timeout: Duration,
    extractor: ListingExtractor,
}

impl PaginationDriver {
    pub fn new(
        search: &SearchSettings,
        scraping: &ScrapingSettings,
        selectors: &SelectorSettings,
    ) -> Self {
        let base_url = url::Url::parse(&search.start_url).ok();

        PaginationDriver {
            search: search.clone(),
            selectors: selectors.clone(),
            policy: scraping.advance_policy,
            search_timeout: scraping.search_timeout(),
            page_timeout: scraping.page_timeout(),
            extractor: ListingExtractor::new(selectors, base_url),
        }
    }

    /// Runs the harvest until a terminal state. Records and the page counter
    /// are written into `progress` as they are gathered.
    pub async fn run<S: PageSession>(
        &self,
        session: &S,
        progress: &mut HarvestProgress,
    ) -> Termination {
        let mut state = HarvestState::Init;

        loop {
            state = match state {
                HarvestState::Done(reason) => return Termination::Done(reason),
                HarvestState::Failed(reason) => return Termination::Failed(reason),
                current => match self.step(session, current, progress).await {
                    Ok(next) => next,
                    Err(e) => {
                        log::error!("Unexpected error occurred: {}", e);
                        HarvestState::Failed(FailureReason::UnexpectedFault(e.to_string()))
                    }
                },
            };
        }
    }

    async fn step<S: PageSession>(
        &self,
        session: &S,
        state: HarvestState,
        progress: &mut HarvestProgress,
    ) -> Result<HarvestState, SessionError> {
        match state {
            HarvestState::Init => self.submit_search(session).await,
            HarvestState::Searching => {
                match session
                    .wait_for_presence(&self.selectors.results_ready, self.search_timeout)
                    .await?
                {
                    true => Ok(HarvestState::HarvestPage),
                    false => {
                        log::error!(
                            "Timeout occurred: no search results within {:?}",
                            self.search_timeout
                        );
                        Ok(HarvestState::Failed(FailureReason::SearchTimeout))
                    }
                }
            }
            HarvestState::HarvestPage => {
                self.harvest_page(session, progress).await?;
                Ok(HarvestState::Advancing)
            }
            HarvestState::Advancing => self.advance(session, progress).await,
            terminal => Ok(terminal),
        }
    }

    async fn submit_search<S: PageSession>(
        &self,
        session: &S,
    ) -> Result<HarvestState, SessionError> {
        log::info!("Opening {}...", self.search.start_url);
        session.open(&self.search.start_url).await?;

        let search_input = format!("#{}", self.search.search_input_id);
        if !session
            .wait_for_presence(&search_input, self.search_timeout)
            .await?
        {
            log::error!("Timeout occurred: search box `{}` never appeared", search_input);
            return Ok(HarvestState::Failed(FailureReason::SearchTimeout));
        }

        log::info!("Searching for \"{}\"", self.search.search_term);
        session
            .submit_text(&self.search.search_input_id, &self.search.search_term)
            .await?;

        Ok(HarvestState::Searching)
    }

    async fn harvest_page<S: PageSession>(
        &self,
        session: &S,
        progress: &mut HarvestProgress,
    ) -> Result<(), SessionError> {
        let cards = session.find_all(&self.selectors.card).await?;

        for card in cards.iter() {
            let listing = self.extractor.extract(card).await;
            progress.listings.push(listing);
        }
        progress.pages_harvested += 1;

        log::info!(
            "Page {}: harvested {} listings ({} total)",
            progress.pages_harvested,
            cards.len(),
            progress.listings.len()
        );
        Ok(())
    }

    async fn advance<S: PageSession>(
        &self,
        session: &S,
        progress: &HarvestProgress,
    ) -> Result<HarvestState, SessionError> {
        if !self.policy.allows_page_after(progress.pages_harvested) {
            log::info!("Reached the page limit after {} pages.", progress.pages_harvested);
            return Ok(HarvestState::Done(DoneReason::PageLimitReached));
        }

        let control = match session.find(&self.selectors.next_page).await {
            Ok(control) => control,
            Err(SessionError::NotFound(_)) => {
                log::info!("No more pages available.");
                return Ok(HarvestState::Done(DoneReason::NoNextControl));
            }
            Err(e) => return Err(e),
        };
        if is_disabled(&control).await? {
            log::info!("Reached the last page.");
            return Ok(HarvestState::Done(DoneReason::LastPageReached));
        }

        log::info!("Navigating to page {}", progress.pages_harvested + 1);
        let control = match session
            .wait_for_clickable(&self.selectors.next_page, self.page_timeout)
            .await
        {
            Ok(control) => control,
            Err(SessionError::Timeout { .. }) | Err(SessionError::NotFound(_)) => {
                log::error!("Timeout occurred: next page control never became clickable");
                return Ok(HarvestState::Failed(FailureReason::PageLoadTimeout));
            }
            Err(e) => return Err(e),
        };
        let outgoing_card = match session.find(&self.selectors.card).await {
            Ok(card) => Some(card),
            Err(SessionError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };
        session.scroll_into_view(&control).await?;
        session.click(&control).await?;

        // `results_ready` still matches the outgoing page until it is replaced.
        if let Some(card) = outgoing_card {
            if !session.wait_for_staleness(&card, self.page_timeout).await? {
                log::error!(
                    "Timeout occurred: page {} was never replaced within {:?}",
                    progress.pages_harvested,
                    self.page_timeout
                );
                return Ok(HarvestState::Failed(FailureReason::PageLoadTimeout));
            }
        }

        match session
            .wait_for_presence(&self.selectors.results_ready, self.page_timeout)
            .await?
        {
            true => Ok(HarvestState::HarvestPage),
            false => {
                log::error!(
                    "Timeout occurred: page {} did not load within {:?}",
                    progress.pages_harvested + 1,
                    self.page_timeout
                );
                Ok(HarvestState::Failed(FailureReason::PageLoadTimeout))
            }
        }
    }
}

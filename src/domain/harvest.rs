use std::fmt;

use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use super::listing::JobListing;

/// How the driver decides whether to leave the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdvancePolicy {
    /// Stop after `limit` pages even if the site offers more.
    MaxPages {
        #[serde(deserialize_with = "deserialize_number_from_string")]
        limit: u32,
    },
    /// Follow the next-page control until it is missing or disabled.
    UntilExhausted,
}

impl AdvancePolicy {
    pub fn allows_page_after(&self, pages_harvested: u32) -> bool {
        match self {
            AdvancePolicy::MaxPages { limit } => pages_harvested < *limit,
            AdvancePolicy::UntilExhausted => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestState {
    Init,
    Searching,
    HarvestPage,
    Advancing,
    Done(DoneReason),
    Failed(FailureReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneReason {
    PageLimitReached,
    LastPageReached,
    NoNextControl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    SearchTimeout,
    PageLoadTimeout,
    UnexpectedFault(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    Done(DoneReason),
    Failed(FailureReason),
}

impl Termination {
    pub fn is_failure(&self) -> bool {
        matches!(self, Termination::Failed(_))
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Done(DoneReason::PageLimitReached) => {
                write!(f, "done: configured page limit reached")
            }
            Termination::Done(DoneReason::LastPageReached) => {
                write!(f, "done: reached the last page")
            }
            Termination::Done(DoneReason::NoNextControl) => {
                write!(f, "done: no more pages available")
            }
            Termination::Failed(FailureReason::SearchTimeout) => {
                write!(f, "failed: search results never appeared")
            }
            Termination::Failed(FailureReason::PageLoadTimeout) => {
                write!(f, "failed: next page did not load in time")
            }
            Termination::Failed(FailureReason::UnexpectedFault(message)) => {
                write!(f, "failed: unexpected error: {}", message)
            }
        }
    }
}

/// Everything gathered so far. Owned by the run, not the driver, so it
/// survives whatever way the driver stops.
#[derive(Debug, Default)]
pub struct HarvestProgress {
    pub listings: Vec<JobListing>,
    pub pages_harvested: u32,
}

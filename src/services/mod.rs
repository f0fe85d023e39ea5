pub mod droid;
#[cfg(test)]
pub mod fake_session;
pub mod listing_extractor;
pub mod page_session;
pub mod pagination_driver;

pub use droid::*;
pub use listing_extractor::*;
pub use page_session::*;
pub use pagination_driver::*;

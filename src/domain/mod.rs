pub mod harvest;
pub mod listing;

pub use harvest::*;
pub use listing::*;

pub mod listing_csv;

pub use listing_csv::*;

pub mod counter;
pub mod crawler;
pub mod error;
pub mod page;
pub mod result;

pub use counter::RequestCounter;
pub use crawler::{Crawler, PageCallback, RequestCallback};
pub use error::ScanError;
pub use result::PageVisit;

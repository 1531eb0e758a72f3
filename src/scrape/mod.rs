//! Scraping pipeline.
//!
//! This module contains the page fetcher, the candidate extractor and the
//! poll loop that drives them on a fixed interval.

pub mod extract;
pub mod fetch;
pub mod html;
pub mod poller;

pub use extract::*;
pub use fetch::*;
pub use poller::*;

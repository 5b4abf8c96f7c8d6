//! Input module: the URL list and the window processed by one invocation
//!
//! This module handles:
//! - Loading and linearizing the newline-delimited URL list
//! - Computing the contiguous slice of that list a run processes

mod source;
mod window;

pub use source::{load_urls, parse_url_list};
pub use window::PageWindow;

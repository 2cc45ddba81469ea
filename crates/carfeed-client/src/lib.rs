//! Listing source adapter, fallback policy and background poller for the
//! car deals feed.

pub mod client;
pub mod error;
pub mod fallback;
pub mod poller;
pub mod source;

pub use client::FeedClient;
pub use error::FeedError;
pub use fallback::{
    load_featured, load_listings, load_stats, FallbackPolicy, FeedOrigin, Resolved,
};
pub use poller::{FeedPoller, FeedState, Phase};
pub use source::{ListingSource, Sourced, Unavailable};

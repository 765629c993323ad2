//! Application-token acquisition: the client-credentials fetcher and the cache in front of it.

pub mod cache;
pub mod clock;
pub mod fetcher;

pub use cache::*;
pub use clock::*;
pub use fetcher::*;

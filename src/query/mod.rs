// Query layer over the GitHub client.
// Caches reads by key with a freshness window, de-duplicates in-flight
// fetches, and retries transient failures.

pub mod cache;
pub mod keys;
pub mod retry;

pub use cache::{DEFAULT_TTL, QueryCache};
pub use keys::{Family, QueryKey};
pub use retry::{MAX_ATTEMPTS, with_retry};

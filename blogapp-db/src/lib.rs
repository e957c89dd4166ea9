pub mod client;
pub mod memory;
mod record;
#[cfg(test)]
mod tests;

pub use client::{DbClient, DbError, PostStore, Result};
pub use memory::MemoryStore;

use time::{Duration, OffsetDateTime};

/// The current time, truncated to the microsecond precision the database keeps.
#[must_use]
pub fn creation_time() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now - Duration::nanoseconds(i64::from(now.nanosecond() % 1_000))
}

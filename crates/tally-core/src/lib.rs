pub mod error;
pub mod model;
pub mod stats;
pub mod time;

pub use error::{CoreError, Result};
pub use model::{EventRecord, UsageSnapshot, UsageStats, UserId, UserRecord, UserStatus};
pub use stats::aggregate;
pub use time::{EventTimestamp, now_utc};

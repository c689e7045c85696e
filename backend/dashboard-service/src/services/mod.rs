pub mod collector;
pub mod dashboard;
pub mod engagement;
pub mod feed;
pub mod top_users;
pub mod trending;

pub use collector::{PostCollector, UserPosts};
pub use dashboard::{DashboardService, RefreshOutcome};
pub use engagement::{EngagementSeed, EngagementSimulator, View};
pub use feed::{assemble_feed, merge_feed, sample_users, FeedBatch};
pub use top_users::{compute_top_users, rank_users};
pub use trending::{compute_trending, select_trending};

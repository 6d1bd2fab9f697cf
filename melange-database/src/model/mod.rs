pub mod activity;
pub mod badges;
pub mod profile;
pub mod stats;

pub use activity::ActivityRow;
pub use badges::EarnedBadge;
pub use profile::UserProfile;
pub use stats::{StatIncrements, UserStats};

/// Static badge catalog with unlock predicates.
pub mod badges;
/// Activity logging and badge awarding against the database.
pub mod engine;
/// Deterministic local estimates for when the store is unreachable.
pub mod fallback;
/// Canonical level thresholds and progress math.
pub mod levels;
/// The closed activity set and its fixed point values.
pub mod points;

pub use badges::{BadgeCategory, BadgeDef, CATALOG};
pub use engine::{ActivityOutcome, check_for_badges, log_activity};
pub use levels::{LEVEL_THRESHOLDS, MAX_LEVEL, level_for_points, progress_percentage};
pub use points::ActivityKind;

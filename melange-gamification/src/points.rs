use std::str::FromStr;

use serde::{Deserialize, Serialize};

use melange_database::model::StatIncrements;

/// The closed set of point-earning user actions. Anything outside this
/// set is rejected up front: no points, no retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Review,
    Comment,
    Photo,
    Share,
    Visit,
    NewDistrict,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 6] = [
        ActivityKind::Review,
        ActivityKind::Comment,
        ActivityKind::Photo,
        ActivityKind::Share,
        ActivityKind::Visit,
        ActivityKind::NewDistrict,
    ];

    /// Fixed point value per activity. No partial credit, no variability.
    pub fn points(self) -> i64 {
        match self {
            ActivityKind::Review => 1,
            ActivityKind::Comment => 1,
            ActivityKind::Photo => 5,
            ActivityKind::Share => 2,
            ActivityKind::Visit => 1,
            ActivityKind::NewDistrict => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Review => "review",
            ActivityKind::Comment => "comment",
            ActivityKind::Photo => "photo",
            ActivityKind::Share => "share",
            ActivityKind::Visit => "visit",
            ActivityKind::NewDistrict => "new_district",
        }
    }

    /// Stat-row deltas for one occurrence of this activity. A review
    /// also marks the reviewed dish as tried; sharing the app moves no
    /// counter, only points.
    pub fn increments(self) -> StatIncrements {
        let mut increments = StatIncrements {
            points: self.points(),
            ..StatIncrements::default()
        };

        match self {
            ActivityKind::Review => {
                increments.reviews_count = 1;
                increments.tried_dishes = 1;
            }
            ActivityKind::Comment => increments.comments_count = 1,
            ActivityKind::Photo => increments.photos_count = 1,
            ActivityKind::Share => {}
            ActivityKind::Visit => increments.visited_restaurants = 1,
            ActivityKind::NewDistrict => increments.districts_visited = 1,
        }

        increments
    }
}

impl FromStr for ActivityKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "review" => Ok(ActivityKind::Review),
            "comment" => Ok(ActivityKind::Comment),
            "photo" => Ok(ActivityKind::Photo),
            "share" => Ok(ActivityKind::Share),
            "visit" => Ok(ActivityKind::Visit),
            "new_district" => Ok(ActivityKind::NewDistrict),
            other => Err(anyhow::anyhow!("unknown activity kind `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ActivityKind;

    #[test]
    fn point_table_is_fixed() {
        assert_eq!(ActivityKind::Review.points(), 1);
        assert_eq!(ActivityKind::Comment.points(), 1);
        assert_eq!(ActivityKind::Photo.points(), 5);
        assert_eq!(ActivityKind::Share.points(), 2);
        assert_eq!(ActivityKind::Visit.points(), 1);
        assert_eq!(ActivityKind::NewDistrict.points(), 3);
    }

    #[test]
    fn wire_names_round_trip() {
        for kind in ActivityKind::ALL {
            assert_eq!(kind.as_str().parse::<ActivityKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kinds_are_rejected() {
        assert!("like".parse::<ActivityKind>().is_err());
        assert!("PHOTO".parse::<ActivityKind>().is_err());
        assert!("".parse::<ActivityKind>().is_err());
    }

    #[test]
    fn increments_carry_the_point_value() {
        for kind in ActivityKind::ALL {
            assert_eq!(kind.increments().points, kind.points());
        }
        // A share moves points but no counter.
        let share = ActivityKind::Share.increments();
        assert_eq!(share.reviews_count, 0);
        assert_eq!(share.visited_restaurants, 0);
        // A review also counts as a tried dish.
        let review = ActivityKind::Review.increments();
        assert_eq!(review.reviews_count, 1);
        assert_eq!(review.tried_dishes, 1);
    }
}

use serde::{Deserialize, Serialize};

use melange_database::model::UserStats;
use melange_utils::Language;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCategory {
    Photography,
    Comments,
    Ratings,
    Exploration,
    Dishes,
}

/// A badge definition with its unlock predicate attached. The catalog
/// is immutable reference data compiled into the binary; the database
/// only records which badges a user has earned.
pub struct BadgeDef {
    pub id: &'static str,
    pub name_de: &'static str,
    pub name_en: &'static str,
    pub description_de: &'static str,
    pub description_en: &'static str,
    pub icon: &'static str,
    pub category: BadgeCategory,
    pub level_required: i64,
    pub unlocked: fn(&UserStats) -> bool,
}

impl BadgeDef {
    pub fn name(&self, language: Language) -> &'static str {
        match language {
            Language::De => self.name_de,
            Language::En => self.name_en,
        }
    }

    pub fn description(&self, language: Language) -> &'static str {
        match language {
            Language::De => self.description_de,
            Language::En => self.description_en,
        }
    }

    pub fn localized(&self, language: Language) -> LocalizedBadge {
        LocalizedBadge {
            id: self.id,
            name: self.name(language),
            description: self.description(language),
            icon_url: self.icon,
            category: self.category,
            level_required: self.level_required,
        }
    }
}

/// Wire shape of a badge with one language's strings picked out.
#[derive(Clone, Debug, Serialize)]
pub struct LocalizedBadge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon_url: &'static str,
    pub category: BadgeCategory,
    pub level_required: i64,
}

pub const CATALOG: &[BadgeDef] = &[
    // Photography
    BadgeDef {
        id: "first-photo",
        name_de: "Erster Schnappschuss",
        name_en: "First Snap",
        description_de: "Dein erstes Foto hochgeladen",
        description_en: "Uploaded your first photo",
        icon: "/badges/first-snap.svg",
        category: BadgeCategory::Photography,
        level_required: 1,
        unlocked: |s| s.photos_count >= 1,
    },
    BadgeDef {
        id: "food-photographer",
        name_de: "Essensfotograf",
        name_en: "Food Photographer",
        description_de: "5 Fotos hochgeladen",
        description_en: "Uploaded 5 photos",
        icon: "/badges/food-photographer.svg",
        category: BadgeCategory::Photography,
        level_required: 2,
        unlocked: |s| s.photos_count >= 5,
    },
    BadgeDef {
        id: "visual-storyteller",
        name_de: "Visueller Erzähler",
        name_en: "Visual Storyteller",
        description_de: "15 Fotos hochgeladen",
        description_en: "Uploaded 15 photos",
        icon: "/badges/visual-storyteller.svg",
        category: BadgeCategory::Photography,
        level_required: 3,
        unlocked: |s| s.photos_count >= 15,
    },
    BadgeDef {
        id: "photo-maestro",
        name_de: "Foto-Maestro",
        name_en: "Photo Maestro",
        description_de: "30 Fotos hochgeladen",
        description_en: "Uploaded 30 photos",
        icon: "/badges/photo-maestro.svg",
        category: BadgeCategory::Photography,
        level_required: 4,
        unlocked: |s| s.photos_count >= 30,
    },
    BadgeDef {
        id: "visual-legend",
        name_de: "Visuelle Legende",
        name_en: "Visual Legend",
        description_de: "50 Fotos hochgeladen",
        description_en: "Uploaded 50 photos",
        icon: "/badges/visual-legend.svg",
        category: BadgeCategory::Photography,
        level_required: 5,
        unlocked: |s| s.photos_count >= 50,
    },
    // Ratings
    BadgeDef {
        id: "first-rating",
        name_de: "Erste Bewertung",
        name_en: "First Rating",
        description_de: "Deine erste Bewertung abgegeben",
        description_en: "Submitted your first rating",
        icon: "/badges/first-rating.svg",
        category: BadgeCategory::Ratings,
        level_required: 1,
        unlocked: |s| s.reviews_count >= 1,
    },
    BadgeDef {
        id: "good-foodie",
        name_de: "Guter Foodie",
        name_en: "Good Foodie",
        description_de: "5 Bewertungen abgegeben",
        description_en: "Submitted 5 ratings",
        icon: "/badges/good-foodie.svg",
        category: BadgeCategory::Ratings,
        level_required: 2,
        unlocked: |s| s.reviews_count >= 5,
    },
    BadgeDef {
        id: "star-giver",
        name_de: "Sterneverteiler",
        name_en: "Star Giver",
        description_de: "10 Bewertungen abgegeben",
        description_en: "Submitted 10 ratings",
        icon: "/badges/star-giver.svg",
        category: BadgeCategory::Ratings,
        level_required: 2,
        unlocked: |s| s.reviews_count >= 10,
    },
    BadgeDef {
        id: "discerning-palate",
        name_de: "Feiner Gaumen",
        name_en: "Discerning Palate",
        description_de: "25 Bewertungen abgegeben",
        description_en: "Submitted 25 ratings",
        icon: "/badges/discerning-palate.svg",
        category: BadgeCategory::Ratings,
        level_required: 3,
        unlocked: |s| s.reviews_count >= 25,
    },
    BadgeDef {
        id: "rating-expert",
        name_de: "Bewertungsexperte",
        name_en: "Rating Expert",
        description_de: "50 Bewertungen abgegeben",
        description_en: "Submitted 50 ratings",
        icon: "/badges/rating-expert.svg",
        category: BadgeCategory::Ratings,
        level_required: 4,
        unlocked: |s| s.reviews_count >= 50,
    },
    BadgeDef {
        id: "star-collector",
        name_de: "Sternesammler",
        name_en: "Star Collector",
        description_de: "100 Bewertungen abgegeben",
        description_en: "Submitted 100 ratings",
        icon: "/badges/star-collector.svg",
        category: BadgeCategory::Ratings,
        level_required: 5,
        unlocked: |s| s.reviews_count >= 100,
    },
    // Comments
    BadgeDef {
        id: "first-word",
        name_de: "Erstes Wort",
        name_en: "First Word",
        description_de: "Deinen ersten Kommentar geschrieben",
        description_en: "Wrote your first comment",
        icon: "/badges/first-word.svg",
        category: BadgeCategory::Comments,
        level_required: 1,
        unlocked: |s| s.comments_count >= 1,
    },
    BadgeDef {
        id: "chatty-foodie",
        name_de: "Gesprächiger Foodie",
        name_en: "Chatty Foodie",
        description_de: "6 Kommentare geschrieben",
        description_en: "Wrote 6 comments",
        icon: "/badges/chatty-foodie.svg",
        category: BadgeCategory::Comments,
        level_required: 2,
        unlocked: |s| s.comments_count >= 6,
    },
    BadgeDef {
        id: "food-critic",
        name_de: "Gastrokritiker",
        name_en: "Food Critic",
        description_de: "15 Kommentare geschrieben",
        description_en: "Wrote 15 comments",
        icon: "/badges/food-critic.svg",
        category: BadgeCategory::Comments,
        level_required: 3,
        unlocked: |s| s.comments_count >= 15,
    },
    BadgeDef {
        id: "review-master",
        name_de: "Rezensionsmeister",
        name_en: "Review Master",
        description_de: "50 Kommentare geschrieben",
        description_en: "Wrote 50 comments",
        icon: "/badges/review-master.svg",
        category: BadgeCategory::Comments,
        level_required: 4,
        unlocked: |s| s.comments_count >= 50,
    },
    BadgeDef {
        id: "eloquent-gourmet",
        name_de: "Eloquenter Gourmet",
        name_en: "Eloquent Gourmet",
        description_de: "100 Kommentare geschrieben",
        description_en: "Wrote 100 comments",
        icon: "/badges/eloquent-gourmet.svg",
        category: BadgeCategory::Comments,
        level_required: 5,
        unlocked: |s| s.comments_count >= 100,
    },
    // Exploration
    BadgeDef {
        id: "first-discovery",
        name_de: "Erste Entdeckung",
        name_en: "First Discovery",
        description_de: "Dein erstes Restaurant besucht",
        description_en: "Visited your first restaurant",
        icon: "/badges/first-discovery.svg",
        category: BadgeCategory::Exploration,
        level_required: 1,
        unlocked: |s| s.visited_restaurants >= 1,
    },
    BadgeDef {
        id: "district-traveler",
        name_de: "Bezirksreisender",
        name_en: "District Traveler",
        description_de: "In 3 Bezirken gegessen",
        description_en: "Ate in 3 districts",
        icon: "/badges/district-traveler.svg",
        category: BadgeCategory::Exploration,
        level_required: 2,
        unlocked: |s| s.districts_visited >= 3,
    },
    BadgeDef {
        id: "local-explorer",
        name_de: "Lokaler Entdecker",
        name_en: "Local Explorer",
        description_de: "3 Bezirke erkundet",
        description_en: "Explored 3 districts",
        icon: "/badges/local-explorer.svg",
        category: BadgeCategory::Exploration,
        level_required: 2,
        unlocked: |s| s.districts_visited >= 3,
    },
    BadgeDef {
        id: "city-navigator",
        name_de: "Stadtnavigator",
        name_en: "City Navigator",
        description_de: "10 Bezirke besucht",
        description_en: "Visited 10 districts",
        icon: "/badges/city-navigator.svg",
        category: BadgeCategory::Exploration,
        level_required: 3,
        unlocked: |s| s.districts_visited >= 10,
    },
    BadgeDef {
        id: "urban-legend",
        name_de: "Stadtlegende",
        name_en: "Urban Legend",
        description_de: "30 Restaurants besucht",
        description_en: "Visited 30 restaurants",
        icon: "/badges/urban-legend.svg",
        category: BadgeCategory::Exploration,
        level_required: 4,
        unlocked: |s| s.visited_restaurants >= 30,
    },
    // Dishes
    BadgeDef {
        id: "schnitzel-lover",
        name_de: "Schnitzelliebhaber",
        name_en: "Schnitzel Lover",
        description_de: "5 Gerichte probiert",
        description_en: "Tried 5 dishes",
        icon: "/badges/schnitzel-lover.svg",
        category: BadgeCategory::Dishes,
        level_required: 2,
        unlocked: |s| s.tried_dishes >= 5,
    },
    BadgeDef {
        id: "sweet-tooth",
        name_de: "Naschkatze",
        name_en: "Sweet Tooth",
        description_de: "8 Gerichte probiert",
        description_en: "Tried 8 dishes",
        icon: "/badges/sweet-tooth.svg",
        category: BadgeCategory::Dishes,
        level_required: 2,
        unlocked: |s| s.tried_dishes >= 8,
    },
    BadgeDef {
        id: "dessert-expert",
        name_de: "Dessertexperte",
        name_en: "Dessert Expert",
        description_de: "15 Gerichte probiert",
        description_en: "Tried 15 dishes",
        icon: "/badges/dessert-expert.svg",
        category: BadgeCategory::Dishes,
        level_required: 3,
        unlocked: |s| s.tried_dishes >= 15,
    },
    BadgeDef {
        id: "complete-menu",
        name_de: "Ganze Speisekarte",
        name_en: "Complete Menu",
        description_de: "25 Gerichte probiert",
        description_en: "Tried 25 dishes",
        icon: "/badges/complete-menu.svg",
        category: BadgeCategory::Dishes,
        level_required: 4,
        unlocked: |s| s.tried_dishes >= 25,
    },
];

pub fn badge_by_id(id: &str) -> Option<&'static BadgeDef> {
    CATALOG.iter().find(|badge| badge.id == id)
}

/// Catalog entries the user unlocks right now: not yet earned, level
/// requirement met, predicate true. Pure and idempotent; the insert-once
/// guarantee lives in the database layer.
pub fn newly_earned(stats: &UserStats, earned_ids: &[String]) -> Vec<&'static BadgeDef> {
    CATALOG
        .iter()
        .filter(|badge| badge.level_required <= stats.level)
        .filter(|badge| !earned_ids.iter().any(|id| id == badge.id))
        .filter(|badge| (badge.unlocked)(stats))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::{CATALOG, badge_by_id, newly_earned};
    use melange_database::model::UserStats;
    use melange_utils::Language;

    fn stats() -> UserStats {
        UserStats {
            user_id: Uuid::nil(),
            points: 0,
            level: 1,
            reviews_count: 0,
            comments_count: 0,
            photos_count: 0,
            visited_restaurants: 0,
            districts_visited: 0,
            tried_dishes: 0,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn catalog_ids_are_unique() {
        for badge in CATALOG {
            let occurrences = CATALOG.iter().filter(|b| b.id == badge.id).count();
            assert_eq!(occurrences, 1, "duplicate badge id `{}`", badge.id);
        }
    }

    #[test]
    fn first_photo_unlocks_after_one_photo() {
        let mut stats = stats();
        stats.photos_count = 1;
        stats.points = 5;

        let earned = newly_earned(&stats, &[]);
        assert!(earned.iter().any(|b| b.id == "first-photo"));
        assert!(!earned.iter().any(|b| b.id == "food-photographer"));
    }

    #[test]
    fn earned_badges_are_not_reported_again() {
        let mut stats = stats();
        stats.photos_count = 1;

        let first_pass = newly_earned(&stats, &[]);
        assert_eq!(first_pass.len(), 1);

        let earned_ids: Vec<String> = first_pass.iter().map(|b| b.id.to_string()).collect();
        // No new activity in between: the second check yields nothing.
        assert!(newly_earned(&stats, &earned_ids).is_empty());
    }

    #[test]
    fn level_requirement_gates_unlocks() {
        let mut stats = stats();
        stats.comments_count = 100;
        stats.level = 1;

        let earned = newly_earned(&stats, &[]);
        assert!(earned.iter().any(|b| b.id == "first-word"));
        assert!(!earned.iter().any(|b| b.id == "eloquent-gourmet"));

        stats.level = 5;
        let earned = newly_earned(&stats, &[]);
        assert!(earned.iter().any(|b| b.id == "eloquent-gourmet"));
    }

    #[test]
    fn pre_existing_progress_fires_on_first_check() {
        // Counters earned before the first badge check still unlock
        // everything at once.
        let mut stats = stats();
        stats.photos_count = 20;
        stats.level = 3;

        let ids: Vec<&str> = newly_earned(&stats, &[]).iter().map(|b| b.id).collect();
        assert!(ids.contains(&"first-photo"));
        assert!(ids.contains(&"food-photographer"));
        assert!(ids.contains(&"visual-storyteller"));
        assert!(!ids.contains(&"photo-maestro"));
    }

    #[test]
    fn exploration_badges_unlock_at_three_districts() {
        let mut stats = stats();
        stats.districts_visited = 3;
        stats.level = 2;

        // Both district milestones sit at exactly 3; a user reaching the
        // third district earns them together.
        let ids: Vec<&str> = newly_earned(&stats, &[]).iter().map(|b| b.id).collect();
        assert!(ids.contains(&"district-traveler"));
        assert!(ids.contains(&"local-explorer"));
        assert!(!ids.contains(&"city-navigator"));

        stats.districts_visited = 2;
        let ids: Vec<&str> = newly_earned(&stats, &[]).iter().map(|b| b.id).collect();
        assert!(!ids.contains(&"district-traveler"));
        assert!(!ids.contains(&"local-explorer"));
    }

    #[test]
    fn localization_picks_the_right_strings() {
        let badge = badge_by_id("first-photo").unwrap();
        assert_eq!(badge.name(Language::De), "Erster Schnappschuss");
        assert_eq!(badge.name(Language::En), "First Snap");

        let localized = badge.localized(Language::En);
        assert_eq!(localized.name, "First Snap");
        assert_eq!(localized.level_required, 1);
    }
}

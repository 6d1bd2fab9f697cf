use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;

use melange_connection::ConnectionSnapshot;
use melange_core::AppState;
use melange_database::impls;
use melange_database::model::{ActivityRow, EarnedBadge, UserProfile, UserStats};
use melange_gamification::badges::LocalizedBadge;
use melange_gamification::{ActivityKind, CATALOG, engine, fallback, levels};
use melange_utils::Language;

type AppStateArc = Arc<AppState>;

#[derive(Deserialize)]
struct LangQuery {
    lang: Option<String>,
}

impl LangQuery {
    fn language(&self) -> Language {
        self.lang
            .as_deref()
            .map(Language::from_tag)
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Activities
// ---------------------------------------------------------------------------

pub fn activity_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/activities", post(log_activity))
}

#[derive(Deserialize)]
struct LogActivityRequest {
    user_id: Uuid,
    kind: String,
    payload: Option<serde_json::Value>,
    lang: Option<String>,
}

#[derive(Serialize)]
struct LogActivityResponse {
    points_earned: i64,
    stats: UserStats,
    newly_earned_badges: Vec<LocalizedBadge>,
    fallback: bool,
}

async fn log_activity(
    State(state): State<AppStateArc>,
    Json(req): Json<LogActivityRequest>,
) -> Result<Json<LogActivityResponse>, (StatusCode, String)> {
    // Unknown kinds are a validation error: no points, no retry.
    let kind: ActivityKind = req
        .kind
        .parse()
        .map_err(|e: anyhow::Error| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let language = req.lang.as_deref().map(Language::from_tag).unwrap_or_default();

    match engine::log_activity(&state.db, req.user_id, kind, req.payload).await {
        Ok(outcome) => Ok(Json(LogActivityResponse {
            points_earned: outcome.points_earned,
            stats: outcome.stats,
            newly_earned_badges: outcome
                .newly_earned
                .iter()
                .map(|badge| badge.localized(language))
                .collect(),
            fallback: false,
        })),
        Err(error) => {
            error!(
                ?error,
                user_id = %req.user_id,
                kind = kind.as_str(),
                "activity logging failed; serving fallback estimate"
            );
            state.monitor.check_connection().await;

            let now = Utc::now();
            Ok(Json(LogActivityResponse {
                points_earned: kind.points(),
                stats: fallback::fallback_stats(req.user_id, now, now),
                newly_earned_badges: Vec::new(),
                fallback: true,
            }))
        }
    }
}

// ---------------------------------------------------------------------------
// User stats / badges / profile
// ---------------------------------------------------------------------------

pub fn user_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/users/:id/stats", get(user_stats))
        .route("/v1/users/:id/activities", get(user_activities))
        .route("/v1/users/:id/badges", get(user_badges))
        .route("/v1/users/:id/badges/check", post(check_badges))
        .route(
            "/v1/users/:id/profile",
            get(user_profile).put(put_user_profile),
        )
}

#[derive(Serialize)]
struct StatsResponse {
    #[serde(flatten)]
    stats: UserStats,
    level_name: &'static str,
    progress_percentage: u8,
    next_level_points: Option<i64>,
    fallback: bool,
}

async fn user_stats(
    State(state): State<AppStateArc>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<LangQuery>,
) -> Json<StatsResponse> {
    let now = Utc::now();

    let (stats, fallback) = match impls::stats::get_user_stats(&state.db, user_id).await {
        Ok(Some(stats)) => (stats, false),
        Ok(None) => {
            // No activity yet: estimate from account age when a profile
            // row exists, else treat the account as brand new.
            let created_at = impls::profiles::get_profile(&state.db, user_id)
                .await
                .ok()
                .flatten()
                .map_or(now, |profile| profile.created_at);
            (fallback::fallback_stats(user_id, created_at, now), true)
        }
        Err(error) => {
            warn!(?error, %user_id, "stats lookup failed; serving fallback estimate");
            state.monitor.check_connection().await;
            (fallback::fallback_stats(user_id, now, now), true)
        }
    };

    Json(StatsResponse {
        level_name: levels::level_name(stats.level, query.language()),
        progress_percentage: levels::progress_percentage(stats.points, stats.level),
        next_level_points: levels::next_level_threshold(stats.level),
        stats,
        fallback,
    })
}

#[derive(Deserialize)]
struct ActivitiesQuery {
    limit: Option<i64>,
}

#[derive(Serialize)]
struct UserActivitiesResponse {
    activities: Vec<ActivityRow>,
}

async fn user_activities(
    State(state): State<AppStateArc>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ActivitiesQuery>,
) -> Result<Json<UserActivitiesResponse>, (StatusCode, String)> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    match impls::stats::recent_activities(&state.db, user_id, limit).await {
        Ok(activities) => Ok(Json(UserActivitiesResponse { activities })),
        Err(error) => {
            error!(?error, %user_id, "activity lookup failed");
            state.monitor.check_connection().await;
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                "activity log unavailable".to_string(),
            ))
        }
    }
}

#[derive(Serialize)]
struct UserBadgesResponse {
    badges: Vec<EarnedBadge>,
    fallback: bool,
}

async fn user_badges(
    State(state): State<AppStateArc>,
    Path(user_id): Path<Uuid>,
) -> Json<UserBadgesResponse> {
    match impls::badges::earned_badges(&state.db, user_id).await {
        Ok(badges) => Json(UserBadgesResponse {
            badges,
            fallback: false,
        }),
        Err(error) => {
            warn!(?error, %user_id, "badge lookup failed; serving empty list");
            state.monitor.check_connection().await;
            Json(UserBadgesResponse {
                badges: Vec::new(),
                fallback: true,
            })
        }
    }
}

#[derive(Serialize)]
struct CheckBadgesResponse {
    newly_earned_badges: Vec<LocalizedBadge>,
}

async fn check_badges(
    State(state): State<AppStateArc>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<LangQuery>,
) -> Result<Json<CheckBadgesResponse>, (StatusCode, String)> {
    let language = query.language();

    match engine::check_for_badges(&state.db, user_id).await {
        Ok(newly_earned) => Ok(Json(CheckBadgesResponse {
            newly_earned_badges: newly_earned
                .iter()
                .map(|badge| badge.localized(language))
                .collect(),
        })),
        Err(error) => {
            error!(?error, %user_id, "badge check failed");
            state.monitor.check_connection().await;
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                "badge check unavailable; will recover automatically".to_string(),
            ))
        }
    }
}

#[derive(Serialize)]
struct ProfileResponse {
    #[serde(flatten)]
    profile: UserProfile,
    fallback: bool,
}

async fn user_profile(
    State(state): State<AppStateArc>,
    Path(user_id): Path<Uuid>,
) -> Json<ProfileResponse> {
    match impls::profiles::get_profile(&state.db, user_id).await {
        Ok(Some(profile)) => Json(ProfileResponse {
            profile,
            fallback: false,
        }),
        Ok(None) => Json(ProfileResponse {
            profile: fallback::fallback_profile(user_id, Utc::now()),
            fallback: true,
        }),
        Err(error) => {
            warn!(?error, %user_id, "profile lookup failed; serving fallback profile");
            state.monitor.check_connection().await;
            Json(ProfileResponse {
                profile: fallback::fallback_profile(user_id, Utc::now()),
                fallback: true,
            })
        }
    }
}

#[derive(Deserialize)]
struct PutProfileRequest {
    username: String,
    display_name: Option<String>,
    language: Option<String>,
}

async fn put_user_profile(
    State(state): State<AppStateArc>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<PutProfileRequest>,
) -> Result<Json<UserProfile>, (StatusCode, String)> {
    let language = req
        .language
        .as_deref()
        .map(Language::from_tag)
        .unwrap_or(Language::De);

    impls::profiles::upsert_profile(
        &state.db,
        user_id,
        &req.username,
        req.display_name.as_deref(),
        language.as_str(),
    )
    .await
    .map(Json)
    .map_err(|error| {
        error!(?error, %user_id, "profile upsert failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "profile store unavailable".to_string(),
        )
    })
}

// ---------------------------------------------------------------------------
// Badge catalog
// ---------------------------------------------------------------------------

pub fn catalog_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/badges", get(badge_catalog))
}

async fn badge_catalog(Query(query): Query<LangQuery>) -> Json<Vec<LocalizedBadge>> {
    let language = query.language();
    Json(
        CATALOG
            .iter()
            .map(|badge| badge.localized(language))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Connection state
// ---------------------------------------------------------------------------

pub fn connection_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/connection/reconnect", post(reconnect))
        .route("/v1/connection/online", post(online))
        .route("/v1/connection/offline", post(offline))
}

async fn health(State(state): State<AppStateArc>) -> Json<ConnectionSnapshot> {
    Json(state.monitor.snapshot())
}

async fn reconnect(State(state): State<AppStateArc>) -> Json<ConnectionSnapshot> {
    Json(state.monitor.reconnect().await)
}

async fn online(State(state): State<AppStateArc>) -> Json<ConnectionSnapshot> {
    state.monitor.notify_online().await;
    Json(state.monitor.snapshot())
}

async fn offline(State(state): State<AppStateArc>) -> Json<ConnectionSnapshot> {
    state.monitor.notify_offline();
    Json(state.monitor.snapshot())
}

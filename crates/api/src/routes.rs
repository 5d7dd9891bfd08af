use askgod_application::Role;
use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::access;
use crate::handlers;
use crate::metrics;
use crate::state::AppState;

/// Build the full API router with role enforcement and CORS.
pub fn create_router(state: AppState) -> Router {
    let guest = Router::new()
        .route("/", get(handlers::root::get_root).fallback(handlers::not_implemented))
        .route("/1.0", get(handlers::status::get_status).fallback(handlers::not_implemented))
        .route("/1.0/events", get(handlers::events::get_events).fallback(handlers::not_implemented))
        .route(
            "/1.0/scoreboard",
            get(handlers::scoreboard::get_scoreboard).fallback(handlers::not_implemented),
        )
        .route(
            "/1.0/timeline",
            get(handlers::timeline::get_timeline).fallback(handlers::not_implemented),
        )
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), Role::Guest),
            access::guard,
        ));

    let team = Router::new()
        .route(
            "/1.0/team",
            get(handlers::team::get_team)
                .put(handlers::team::update_team)
                .fallback(handlers::not_implemented),
        )
        .route(
            "/1.0/team/flags",
            get(handlers::team_flags::get_team_flags)
                .post(handlers::team_flags::submit_team_flag)
                .fallback(handlers::not_implemented),
        )
        .route(
            "/1.0/team/flags/{id}",
            get(handlers::team_flags::get_team_flag)
                .put(handlers::team_flags::update_team_flag)
                .fallback(handlers::not_implemented),
        )
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), Role::Team),
            access::guard,
        ));

    let admin = Router::new()
        .route(
            "/1.0/config",
            get(handlers::config::get_config)
                .put(handlers::config::update_config)
                .fallback(handlers::not_implemented),
        )
        .route(
            "/1.0/flags",
            get(handlers::flags::get_flags)
                .post(handlers::flags::create_flag)
                .delete(handlers::flags::clear_flags)
                .fallback(handlers::not_implemented),
        )
        .route(
            "/1.0/flags/{id}",
            get(handlers::flags::get_flag)
                .put(handlers::flags::update_flag)
                .delete(handlers::flags::delete_flag)
                .fallback(handlers::not_implemented),
        )
        .route(
            "/1.0/scores",
            get(handlers::scores::get_scores)
                .post(handlers::scores::create_score)
                .delete(handlers::scores::clear_scores)
                .fallback(handlers::not_implemented),
        )
        .route(
            "/1.0/scores/{id}",
            get(handlers::scores::get_score)
                .put(handlers::scores::update_score)
                .delete(handlers::scores::delete_score)
                .fallback(handlers::not_implemented),
        )
        .route(
            "/1.0/teams",
            get(handlers::teams::get_teams)
                .post(handlers::teams::create_team)
                .delete(handlers::teams::clear_teams)
                .fallback(handlers::not_implemented),
        )
        .route(
            "/1.0/teams/{id}",
            get(handlers::teams::get_team)
                .put(handlers::teams::update_team)
                .delete(handlers::teams::delete_team)
                .fallback(handlers::not_implemented),
        )
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), Role::Admin),
            access::guard,
        ));

    Router::new()
        .merge(guest)
        .merge(team)
        .merge(admin)
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics::track_requests))
        .with_state(state)
}

/// Reflect the Origin header when it matches `daemon.allowed_origins`.
fn cors_layer(state: &AppState) -> CorsLayer {
    let config = state.config.clone();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            let allowed = &config.load().daemon.allowed_origins;

            origin
                .to_str()
                .map(|origin| allowed.iter().any(|entry| entry == "*" || entry == origin))
                .unwrap_or(false)
        }))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
}

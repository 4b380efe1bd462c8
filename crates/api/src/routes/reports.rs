//! Route definitions for `/reports` and everything scoped to one report.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{comments, objections, reports, rounds, votes};
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET, POST  /                                   list_reports, create_report
/// GET, PUT   /{report_id}                        get_report, update_report
/// GET, POST  /{report_id}/rounds                 list_rounds, open_round
/// POST       /{report_id}/rounds/close           close_round
/// POST       /{report_id}/consensus/resolve      resolve_consensus
/// GET, POST  /{report_id}/votes                  get_votes, cast_vote
/// GET        /{report_id}/objections             list_objections
/// GET        /{report_id}/comments               list_comments
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reports::list_reports).post(reports::create_report))
        .route(
            "/{report_id}",
            get(reports::get_report).put(reports::update_report),
        )
        .route(
            "/{report_id}/rounds",
            get(rounds::list_rounds).post(rounds::open_round),
        )
        .route("/{report_id}/rounds/close", post(rounds::close_round))
        .route(
            "/{report_id}/consensus/resolve",
            post(rounds::resolve_consensus),
        )
        .route(
            "/{report_id}/votes",
            get(votes::get_votes).post(votes::cast_vote),
        )
        .route(
            "/{report_id}/objections",
            get(objections::list_objections),
        )
        .route("/{report_id}/comments", get(comments::list_comments))
}

//! Integration tests for the consensus round lifecycle.
//!
//! Exercises `VotingRoundRepo`, `VoteRepo` and `ObjectionRepo` against a real
//! database:
//! - Sequential round opening numbers rounds 1..N with one ACTIVE round
//! - Opening a round closes the previous one and stamps `ended_at`
//! - Vote statistics default to zero without an active round
//! - Re-casting a vote replaces it; OBJECT votes carry an objection
//! - Objection resolution overwrites previous decisions

use agora_core::consensus::{
    CONSENSUS_IN_PROGRESS, CONSENSUS_NOT_STARTED, CONSENSUS_REACHED, OBJECTION_INVALID,
    OBJECTION_PENDING, OBJECTION_VALID, ROUND_STATUS_ACTIVE, ROUND_STATUS_CLOSED, VOTE_ABSTAIN,
    VOTE_AGAINST, VOTE_FOR, VOTE_OBJECT,
};
use agora_db::models::report::CreateReport;
use agora_db::models::user::CreateUser;
use agora_db::models::voting::CastVote;
use agora_db::repositories::{ObjectionRepo, ReportRepo, UserRepo, VoteRepo, VotingRoundRepo};
use chrono::Utc;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_user(pool: &PgPool, name: &str) -> i64 {
    let input = CreateUser {
        email: format!("{name}@example.org"),
        display_name: name.to_string(),
        avatar_url: None,
        role: None,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
        .id
}

async fn create_report(pool: &PgPool, author: i64) -> i64 {
    let input = CreateReport {
        title: "Quarterly budget".to_string(),
        content: "Allocate funds to the education workgroup.".to_string(),
        workgroup_id: None,
        created_by: author,
    };
    ReportRepo::create(pool, &input)
        .await
        .expect("report creation should succeed")
        .id
}

fn vote(round_id: i64, user_id: i64, vote_type: &str) -> CastVote {
    CastVote {
        round_id,
        user_id,
        vote_type: vote_type.to_string(),
        feedback: None,
        objection_reason: None,
    }
}

// ---------------------------------------------------------------------------
// Round lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn first_round_is_number_one_and_active(pool: PgPool) {
    let author = create_user(&pool, "author").await;
    let report_id = create_report(&pool, author).await;

    let report = ReportRepo::find_by_id(&pool, report_id).await.unwrap().unwrap();
    assert_eq!(report.consensus_status, CONSENSUS_NOT_STARTED);

    let round = VotingRoundRepo::open_new_round(&pool, report_id)
        .await
        .unwrap()
        .expect("report exists");

    assert_eq!(round.round_number, 1);
    assert_eq!(round.status, ROUND_STATUS_ACTIVE);
    assert!(round.ended_at.is_none());

    let report = ReportRepo::find_by_id(&pool, report_id).await.unwrap().unwrap();
    assert_eq!(report.consensus_status, CONSENSUS_IN_PROGRESS);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn n_openings_leave_exactly_one_active_round_numbered_n(pool: PgPool) {
    let author = create_user(&pool, "author").await;
    let report_id = create_report(&pool, author).await;

    const N: i32 = 4;
    for _ in 0..N {
        VotingRoundRepo::open_new_round(&pool, report_id)
            .await
            .unwrap()
            .expect("report exists");
    }

    let rounds = VotingRoundRepo::list_for_report(&pool, report_id).await.unwrap();
    assert_eq!(rounds.len(), N as usize);

    let active: Vec<_> = rounds
        .iter()
        .filter(|r| r.status == ROUND_STATUS_ACTIVE)
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].round_number, N);

    let numbers: Vec<i32> = rounds.iter().map(|r| r.round_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn opening_next_round_closes_previous(pool: PgPool) {
    let author = create_user(&pool, "author").await;
    let report_id = create_report(&pool, author).await;

    let first = VotingRoundRepo::open_new_round(&pool, report_id)
        .await
        .unwrap()
        .unwrap();
    let second = VotingRoundRepo::open_new_round(&pool, report_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.round_number, 2);
    assert_eq!(second.status, ROUND_STATUS_ACTIVE);

    let rounds = VotingRoundRepo::list_for_report(&pool, report_id).await.unwrap();
    let closed = rounds.iter().find(|r| r.id == first.id).unwrap();
    assert_eq!(closed.status, ROUND_STATUS_CLOSED);
    let ended_at = closed.ended_at.expect("closed round must have ended_at");
    assert!(ended_at <= Utc::now());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn opening_round_for_missing_report_returns_none(pool: PgPool) {
    let result = VotingRoundRepo::open_new_round(&pool, 999_999).await.unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_openings_stay_consistent(pool: PgPool) {
    let author = create_user(&pool, "author").await;
    let report_id = create_report(&pool, author).await;

    let (a, b) = tokio::join!(
        VotingRoundRepo::open_new_round(&pool, report_id),
        VotingRoundRepo::open_new_round(&pool, report_id),
    );
    a.unwrap().unwrap();
    b.unwrap().unwrap();

    let rounds = VotingRoundRepo::list_for_report(&pool, report_id).await.unwrap();
    let numbers: Vec<i32> = rounds.iter().map(|r| r.round_number).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert_eq!(
        rounds.iter().filter(|r| r.status == ROUND_STATUS_ACTIVE).count(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn close_active_and_resolve_consensus(pool: PgPool) {
    let author = create_user(&pool, "author").await;
    let report_id = create_report(&pool, author).await;

    assert!(VotingRoundRepo::close_active(&pool, report_id)
        .await
        .unwrap()
        .is_none());

    VotingRoundRepo::open_new_round(&pool, report_id)
        .await
        .unwrap()
        .unwrap();
    let closed = VotingRoundRepo::close_active(&pool, report_id)
        .await
        .unwrap()
        .expect("active round should be closed");
    assert_eq!(closed.status, ROUND_STATUS_CLOSED);
    assert!(VotingRoundRepo::find_active(&pool, report_id)
        .await
        .unwrap()
        .is_none());

    VotingRoundRepo::open_new_round(&pool, report_id)
        .await
        .unwrap()
        .unwrap();
    let report = VotingRoundRepo::resolve_consensus(&pool, report_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.consensus_status, CONSENSUS_REACHED);
    assert!(VotingRoundRepo::find_active(&pool, report_id)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Votes and statistics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn statistics_are_zero_without_active_round(pool: PgPool) {
    let author = create_user(&pool, "author").await;
    let report_id = create_report(&pool, author).await;

    let summary = VoteRepo::summary_for_report(&pool, report_id).await.unwrap();
    assert!(summary.round.is_none());
    assert!(summary.votes.is_empty());
    assert_eq!(summary.statistics.total, 0);
    assert_eq!(summary.statistics.for_count, 0);
    assert_eq!(summary.statistics.against_count, 0);
    assert_eq!(summary.statistics.object_count, 0);
    assert_eq!(summary.statistics.abstain_count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn statistics_count_only_the_active_round(pool: PgPool) {
    let author = create_user(&pool, "author").await;
    let report_id = create_report(&pool, author).await;
    let voters = [
        create_user(&pool, "v1").await,
        create_user(&pool, "v2").await,
        create_user(&pool, "v3").await,
        create_user(&pool, "v4").await,
    ];

    let round1 = VotingRoundRepo::open_new_round(&pool, report_id)
        .await
        .unwrap()
        .unwrap();
    VoteRepo::cast(&pool, &vote(round1.id, voters[0], VOTE_AGAINST))
        .await
        .unwrap()
        .unwrap();

    let round2 = VotingRoundRepo::open_new_round(&pool, report_id)
        .await
        .unwrap()
        .unwrap();
    VoteRepo::cast(&pool, &vote(round2.id, voters[0], VOTE_FOR)).await.unwrap().unwrap();
    VoteRepo::cast(&pool, &vote(round2.id, voters[1], VOTE_FOR)).await.unwrap().unwrap();
    VoteRepo::cast(&pool, &vote(round2.id, voters[2], VOTE_ABSTAIN))
        .await
        .unwrap()
        .unwrap();
    let mut objection = vote(round2.id, voters[3], VOTE_OBJECT);
    objection.objection_reason = Some("Budget exceeds the cap".to_string());
    VoteRepo::cast(&pool, &objection).await.unwrap().unwrap();

    let summary = VoteRepo::summary_for_report(&pool, report_id).await.unwrap();
    assert_eq!(summary.round.unwrap().id, round2.id);
    assert_eq!(summary.votes.len(), 4);
    assert_eq!(summary.statistics.for_count, 2);
    assert_eq!(summary.statistics.against_count, 0);
    assert_eq!(summary.statistics.abstain_count, 1);
    assert_eq!(summary.statistics.object_count, 1);
    assert_eq!(summary.statistics.total, summary.votes.len() as i64);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn recasting_replaces_previous_vote(pool: PgPool) {
    let author = create_user(&pool, "author").await;
    let voter = create_user(&pool, "voter").await;
    let report_id = create_report(&pool, author).await;
    let round = VotingRoundRepo::open_new_round(&pool, report_id)
        .await
        .unwrap()
        .unwrap();

    let mut objecting = vote(round.id, voter, VOTE_OBJECT);
    objecting.objection_reason = Some("Missing impact assessment".to_string());
    let first = VoteRepo::cast(&pool, &objecting).await.unwrap().unwrap();
    let objection = first.objection.expect("OBJECT vote creates an objection");
    assert_eq!(objection.status, OBJECTION_PENDING);

    let second = VoteRepo::cast(&pool, &vote(round.id, voter, VOTE_FOR))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.vote.id, first.vote.id);
    assert_eq!(second.vote.vote_type, VOTE_FOR);
    assert!(second.objection.is_none());
    assert!(ObjectionRepo::find_by_id(&pool, objection.id)
        .await
        .unwrap()
        .is_none());

    let summary = VoteRepo::summary_for_report(&pool, report_id).await.unwrap();
    assert_eq!(summary.statistics.total, 1);
    assert_eq!(summary.statistics.for_count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn casting_into_closed_round_returns_none(pool: PgPool) {
    let author = create_user(&pool, "author").await;
    let voter = create_user(&pool, "voter").await;
    let report_id = create_report(&pool, author).await;
    let round = VotingRoundRepo::open_new_round(&pool, report_id)
        .await
        .unwrap()
        .unwrap();
    VotingRoundRepo::close_active(&pool, report_id).await.unwrap();

    let result = VoteRepo::cast(&pool, &vote(round.id, voter, VOTE_FOR)).await.unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Objections
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn objection_resolution_stamps_and_overwrites(pool: PgPool) {
    let author = create_user(&pool, "author").await;
    let voter = create_user(&pool, "voter").await;
    let admin = create_user(&pool, "admin").await;
    let report_id = create_report(&pool, author).await;
    let round = VotingRoundRepo::open_new_round(&pool, report_id)
        .await
        .unwrap()
        .unwrap();

    let mut objecting = vote(round.id, voter, VOTE_OBJECT);
    objecting.objection_reason = Some("Conflicts with charter".to_string());
    let objection = VoteRepo::cast(&pool, &objecting)
        .await
        .unwrap()
        .unwrap()
        .objection
        .unwrap();

    assert_eq!(
        ObjectionRepo::find_report_id(&pool, objection.id).await.unwrap(),
        Some(report_id)
    );

    let valid = ObjectionRepo::resolve(&pool, objection.id, OBJECTION_VALID, admin)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(valid.status, OBJECTION_VALID);
    assert_eq!(valid.resolved_by, Some(admin));
    assert!(valid.resolved_at.is_some());

    let invalid = ObjectionRepo::resolve(&pool, objection.id, OBJECTION_INVALID, admin)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(invalid.status, OBJECTION_INVALID);

    let listed = ObjectionRepo::list_for_report(&pool, report_id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].round_number, 1);
    assert_eq!(listed[0].objector_name, "voter");
    assert_eq!(listed[0].status, OBJECTION_INVALID);

    assert!(ObjectionRepo::resolve(&pool, 999_999, OBJECTION_VALID, admin)
        .await
        .unwrap()
        .is_none());
}

//! Consensus round vocabulary and vote tallying.
//!
//! A report moves `NOT_STARTED -> IN_CONSENSUS -> CONSENSUS_REACHED`. While in
//! consensus it owns a sequence of voting rounds numbered 1, 2, 3, ...; at most
//! one round is `ACTIVE` at a time and every earlier round is `CLOSED`.

use serde::Serialize;

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Report consensus status
-------------------------------------------------------------------------- */

pub const CONSENSUS_NOT_STARTED: &str = "NOT_STARTED";
pub const CONSENSUS_IN_PROGRESS: &str = "IN_CONSENSUS";
pub const CONSENSUS_REACHED: &str = "CONSENSUS_REACHED";

pub const VALID_CONSENSUS_STATUSES: &[&str] =
    &[CONSENSUS_NOT_STARTED, CONSENSUS_IN_PROGRESS, CONSENSUS_REACHED];

/// Validate a consensus status filter value.
pub fn validate_consensus_status(status: &str) -> Result<(), CoreError> {
    if VALID_CONSENSUS_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid consensus status '{status}'. Must be one of: {}",
            VALID_CONSENSUS_STATUSES.join(", ")
        )))
    }
}

/* --------------------------------------------------------------------------
Voting rounds
-------------------------------------------------------------------------- */

pub const ROUND_STATUS_ACTIVE: &str = "ACTIVE";
pub const ROUND_STATUS_CLOSED: &str = "CLOSED";

/// Number for the round that follows `current_max` (`None` when the report
/// has no rounds yet).
pub fn next_round_number(current_max: Option<i32>) -> i32 {
    current_max.unwrap_or(0) + 1
}

/* --------------------------------------------------------------------------
Votes
-------------------------------------------------------------------------- */

pub const VOTE_FOR: &str = "FOR";
pub const VOTE_AGAINST: &str = "AGAINST";
pub const VOTE_OBJECT: &str = "OBJECT";
pub const VOTE_ABSTAIN: &str = "ABSTAIN";

pub const VALID_VOTE_TYPES: &[&str] = &[VOTE_FOR, VOTE_AGAINST, VOTE_OBJECT, VOTE_ABSTAIN];

/// Validate that a vote type string is one of the accepted values.
pub fn validate_vote_type(vote_type: &str) -> Result<(), CoreError> {
    if VALID_VOTE_TYPES.contains(&vote_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid vote type '{vote_type}'. Must be one of: {}",
            VALID_VOTE_TYPES.join(", ")
        )))
    }
}

/// Per-type vote counts for one round.
///
/// Serialized with camelCase keys (`forCount`, `againstCount`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatistics {
    pub for_count: i64,
    pub against_count: i64,
    pub object_count: i64,
    pub abstain_count: i64,
    pub total: i64,
}

impl VoteStatistics {
    /// Count raw vote types. No weighting, no deduplication.
    ///
    /// Unknown vote types count towards `total` only; the `CHECK` constraint
    /// on `votes.vote_type` keeps them out of the database in practice.
    pub fn tally<'a, I>(vote_types: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut stats = Self::default();
        for vote_type in vote_types {
            match vote_type {
                VOTE_FOR => stats.for_count += 1,
                VOTE_AGAINST => stats.against_count += 1,
                VOTE_OBJECT => stats.object_count += 1,
                VOTE_ABSTAIN => stats.abstain_count += 1,
                _ => {}
            }
            stats.total += 1;
        }
        stats
    }
}

/* --------------------------------------------------------------------------
Objections
-------------------------------------------------------------------------- */

pub const OBJECTION_PENDING: &str = "PENDING";
pub const OBJECTION_VALID: &str = "VALID";
pub const OBJECTION_INVALID: &str = "INVALID";

/// Statuses an administrator may set when resolving an objection.
pub const OBJECTION_RESOLUTIONS: &[&str] = &[OBJECTION_VALID, OBJECTION_INVALID];

pub const MIN_OBJECTION_REASON_LENGTH: usize = 5;
pub const MAX_OBJECTION_REASON_LENGTH: usize = 1000;

/// Validate an objection resolution. `PENDING` is not a resolution.
pub fn validate_objection_resolution(status: &str) -> Result<(), CoreError> {
    if OBJECTION_RESOLUTIONS.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid objection status '{status}'. Must be one of: {}",
            OBJECTION_RESOLUTIONS.join(", ")
        )))
    }
}

/// Trim and length-check the reason attached to an `OBJECT` vote.
pub fn normalize_objection_reason(reason: Option<&str>) -> Result<String, CoreError> {
    let reason = reason.map(str::trim).unwrap_or_default();
    let len = reason.chars().count();
    if len < MIN_OBJECTION_REASON_LENGTH || len > MAX_OBJECTION_REASON_LENGTH {
        return Err(CoreError::Validation(format!(
            "An OBJECT vote requires an objection reason of \
             {MIN_OBJECTION_REASON_LENGTH}-{MAX_OBJECTION_REASON_LENGTH} characters"
        )));
    }
    Ok(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_round_is_one() {
        assert_eq!(next_round_number(None), 1);
        assert_eq!(next_round_number(Some(4)), 5);
    }

    #[test]
    fn empty_tally_is_all_zero() {
        let stats = VoteStatistics::tally(Vec::<&str>::new());
        assert_eq!(stats, VoteStatistics::default());
    }

    #[test]
    fn tally_counts_each_type_and_total() {
        let votes = [
            VOTE_FOR,
            VOTE_FOR,
            VOTE_AGAINST,
            VOTE_OBJECT,
            VOTE_ABSTAIN,
            VOTE_FOR,
        ];
        let stats = VoteStatistics::tally(votes);
        assert_eq!(stats.for_count, 3);
        assert_eq!(stats.against_count, 1);
        assert_eq!(stats.object_count, 1);
        assert_eq!(stats.abstain_count, 1);
        assert_eq!(stats.total, 6);
        assert_eq!(
            stats.total,
            stats.for_count + stats.against_count + stats.object_count + stats.abstain_count
        );
    }

    #[test]
    fn statistics_serialize_camel_case() {
        let json = serde_json::to_value(VoteStatistics::tally([VOTE_AGAINST])).unwrap();
        assert_eq!(json["againstCount"], 1);
        assert_eq!(json["forCount"], 0);
        assert_eq!(json["total"], 1);
    }

    #[test]
    fn vote_type_validation() {
        for vt in VALID_VOTE_TYPES {
            assert!(validate_vote_type(vt).is_ok());
        }
        assert!(validate_vote_type("for").is_err());
        assert!(validate_vote_type("VETO").is_err());
    }

    #[test]
    fn pending_is_not_a_resolution() {
        assert!(validate_objection_resolution(OBJECTION_VALID).is_ok());
        assert!(validate_objection_resolution(OBJECTION_INVALID).is_ok());
        assert!(validate_objection_resolution(OBJECTION_PENDING).is_err());
        assert!(validate_objection_resolution("MAYBE").is_err());
    }

    #[test]
    fn objection_reason_is_trimmed_and_bounded() {
        assert_eq!(
            normalize_objection_reason(Some("  conflicts with budget  ")).unwrap(),
            "conflicts with budget"
        );
        assert!(normalize_objection_reason(None).is_err());
        assert!(normalize_objection_reason(Some("  no  ")).is_err());
        let long = "x".repeat(MAX_OBJECTION_REASON_LENGTH + 1);
        assert!(normalize_objection_reason(Some(&long)).is_err());
    }

    #[test]
    fn consensus_status_validation() {
        assert!(validate_consensus_status(CONSENSUS_IN_PROGRESS).is_ok());
        assert!(validate_consensus_status("DONE").is_err());
    }
}

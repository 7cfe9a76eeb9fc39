//! Per-user status, priority and total counts in a single `$facet` pass.

use mongodb::bson::{doc, oid::ObjectId};

use super::{Facet, Pipeline, Stage};
use crate::errors::AppError;

pub const STATUS_FACET: &str = "statusCounts";
pub const PRIORITY_FACET: &str = "priorityCounts";
pub const TOTAL_FACET: &str = "totalCount";
pub const TOTAL_FIELD: &str = "total";
pub const COUNT_FIELD: &str = "count";

/// Build the user statistics pipeline.
///
/// All three facets run over the same `$match` output, so the counts reflect
/// one snapshot of the user's tasks.
pub fn build_user_stats_query(user_id: &ObjectId) -> Result<Pipeline, AppError> {
    Pipeline::new(
        "user_stats",
        vec![
            Stage::Match(doc! { "userId": *user_id }),
            Stage::Facet(vec![
                Facet::new(
                    STATUS_FACET,
                    vec![Stage::group_count("$status", COUNT_FIELD)],
                ),
                Facet::new(
                    PRIORITY_FACET,
                    vec![Stage::group_count("$priority", COUNT_FIELD)],
                ),
                Facet::new(TOTAL_FACET, vec![Stage::Count(TOTAL_FIELD.to_string())]),
            ]),
        ],
    )
}

//! Completed tasks per UTC day, optionally bounded by `completedAt`.

use chrono::{DateTime, Utc};
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};

use super::dates::{parse_bound, to_bson_datetime, BoundSide};
use super::{Pipeline, SortOrder, Stage};
use crate::errors::AppError;
use crate::models::task::TaskStatus;

pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Inclusive `completedAt` bounds, already parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl CompletionWindow {
    /// Parse raw query values. Fails before any store access on malformed input.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, AppError> {
        Ok(Self {
            start: start.map(|s| parse_bound(s, BoundSide::Start)).transpose()?,
            end: end.map(|e| parse_bound(e, BoundSide::End)).transpose()?,
        })
    }

    fn completed_at_filter(&self) -> Document {
        let mut filter = doc! { "$exists": true, "$ne": Bson::Null };
        if let Some(start) = self.start {
            filter.insert("$gte", to_bson_datetime(start));
        }
        if let Some(end) = self.end {
            filter.insert("$lte", to_bson_datetime(end));
        }
        filter
    }
}

/// Build the productivity pipeline from raw `start` / `end` strings.
pub fn build_productivity_query(
    user_id: &ObjectId,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Pipeline, AppError> {
    let window = CompletionWindow::parse(start, end)?;
    productivity_pipeline(user_id, &window)
}

pub fn productivity_pipeline(
    user_id: &ObjectId,
    window: &CompletionWindow,
) -> Result<Pipeline, AppError> {
    let day = doc! {
        "$dateToString": {
            "format": DAY_FORMAT,
            "date": "$completedAt",
            "timezone": "UTC",
        }
    };

    Pipeline::new(
        "productivity",
        vec![
            Stage::Match(doc! {
                "userId": *user_id,
                "status": TaskStatus::Completed.as_str(),
                "completedAt": window.completed_at_filter(),
            }),
            Stage::group_count(day, "completed"),
            Stage::Sort(vec![("_id".to_string(), SortOrder::Ascending)]),
            Stage::Project(doc! { "_id": 0, "date": "$_id", "completed": 1 }),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mongodb::bson::DateTime as BsonDateTime;

    fn user() -> ObjectId {
        ObjectId::parse_str("65a1b2c3d4e5f60718293a4b").unwrap()
    }

    fn match_filter(pipeline: &Pipeline) -> Document {
        pipeline.to_documents()[0]
            .get_document("$match")
            .unwrap()
            .clone()
    }

    #[test]
    fn unbounded_pipeline_shape() {
        let pipeline = build_productivity_query(&user(), None, None).unwrap();
        assert_eq!(
            pipeline.to_documents(),
            vec![
                doc! { "$match": {
                    "userId": user(),
                    "status": "Completed",
                    "completedAt": { "$exists": true, "$ne": null },
                } },
                doc! { "$group": {
                    "_id": { "$dateToString": { "format": "%Y-%m-%d", "date": "$completedAt", "timezone": "UTC" } },
                    "completed": { "$sum": 1 },
                } },
                doc! { "$sort": { "_id": 1 } },
                doc! { "$project": { "_id": 0, "date": "$_id", "completed": 1 } },
            ]
        );
    }

    #[test]
    fn bounds_are_inclusive_whole_days() {
        let pipeline =
            build_productivity_query(&user(), Some("2024-01-01"), Some("2024-01-31")).unwrap();
        let completed_at = match_filter(&pipeline)
            .get_document("completedAt")
            .unwrap()
            .clone();

        let gte: &BsonDateTime = completed_at.get_datetime("$gte").unwrap();
        let lte: &BsonDateTime = completed_at.get_datetime("$lte").unwrap();
        let jan_1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let feb_1 = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(gte.timestamp_millis(), jan_1.timestamp_millis());
        assert_eq!(lte.timestamp_millis(), feb_1.timestamp_millis() - 1);
    }

    #[test]
    fn only_end_bound() {
        let pipeline = build_productivity_query(&user(), None, Some("2024-06-30T12:00:00Z")).unwrap();
        let completed_at = match_filter(&pipeline)
            .get_document("completedAt")
            .unwrap()
            .clone();
        assert!(!completed_at.contains_key("$gte"));
        assert!(completed_at.contains_key("$lte"));
        assert!(completed_at.contains_key("$exists"));
    }

    #[test]
    fn malformed_bound_fails_before_building() {
        let err = build_productivity_query(&user(), Some("2024-01-01"), Some("soon")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}

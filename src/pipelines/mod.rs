//! Typed aggregation pipelines over the `tasks` collection.
//!
//! Builders in this module are pure: they produce a [`Pipeline`] that renders
//! to BSON stage documents and never touch the store.

pub mod dates;
pub mod productivity;
pub mod user_stats;

use std::collections::HashSet;

use mongodb::bson::{doc, Bson, Document};

use crate::errors::AppError;

pub use productivity::build_productivity_query;
pub use user_stats::build_user_stats_query;

/// Group accumulators supported by the analytics pipelines.
#[derive(Debug, Clone, PartialEq)]
pub enum Accumulator {
    /// `{"$sum": 1}`
    Count,
}

impl Accumulator {
    fn to_bson(&self) -> Bson {
        match self {
            Self::Count => Bson::Document(doc! { "$sum": 1 }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
}

impl SortOrder {
    fn to_bson(self) -> Bson {
        match self {
            Self::Ascending => Bson::Int32(1),
        }
    }
}

/// Named sub-pipeline of a `$facet` stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    pub name: String,
    pub stages: Vec<Stage>,
}

impl Facet {
    pub fn new(name: &str, stages: Vec<Stage>) -> Self {
        Self {
            name: name.to_string(),
            stages,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(Document),
    Facet(Vec<Facet>),
    Group {
        key: Bson,
        accumulators: Vec<(String, Accumulator)>,
    },
    Count(String),
    Sort(Vec<(String, SortOrder)>),
    Project(Document),
}

impl Stage {
    /// Group by a field path such as `"$status"`, counting into `count_field`.
    pub fn group_count(key: impl Into<Bson>, count_field: &str) -> Self {
        Self::Group {
            key: key.into(),
            accumulators: vec![(count_field.to_string(), Accumulator::Count)],
        }
    }

    pub fn to_document(&self) -> Document {
        match self {
            Self::Match(filter) => doc! { "$match": filter.clone() },
            Self::Facet(facets) => {
                let mut body = Document::new();
                for facet in facets {
                    let stages: Vec<Bson> = facet
                        .stages
                        .iter()
                        .map(|s| Bson::Document(s.to_document()))
                        .collect();
                    body.insert(facet.name.clone(), stages);
                }
                doc! { "$facet": body }
            }
            Self::Group { key, accumulators } => {
                let mut body = doc! { "_id": key.clone() };
                for (field, acc) in accumulators {
                    body.insert(field.clone(), acc.to_bson());
                }
                doc! { "$group": body }
            }
            Self::Count(field) => doc! { "$count": field.clone() },
            Self::Sort(keys) => {
                let mut body = Document::new();
                for (field, order) in keys {
                    body.insert(field.clone(), order.to_bson());
                }
                doc! { "$sort": body }
            }
            Self::Project(projection) => doc! { "$project": projection.clone() },
        }
    }

    fn validate(&self, nested: bool) -> Result<(), String> {
        match self {
            Self::Facet(_) if nested => Err("$facet cannot be nested inside $facet".into()),
            Self::Facet(facets) => {
                if facets.is_empty() {
                    return Err("$facet needs at least one sub-pipeline".into());
                }
                let mut names = HashSet::new();
                for facet in facets {
                    if !is_field_name(&facet.name) {
                        return Err(format!("invalid facet name '{}'", facet.name));
                    }
                    if !names.insert(facet.name.as_str()) {
                        return Err(format!("duplicate facet name '{}'", facet.name));
                    }
                    if facet.stages.is_empty() {
                        return Err(format!("facet '{}' has no stages", facet.name));
                    }
                    for stage in &facet.stages {
                        stage.validate(true)?;
                    }
                }
                Ok(())
            }
            Self::Group { accumulators, .. } => {
                if accumulators.iter().any(|(field, _)| !is_field_name(field) || field == "_id") {
                    return Err("$group accumulator fields must be plain names other than _id".into());
                }
                Ok(())
            }
            Self::Count(field) if !is_field_name(field) => {
                Err(format!("invalid $count field '{field}'"))
            }
            Self::Sort(keys) if keys.is_empty() => Err("$sort needs at least one key".into()),
            _ => Ok(()),
        }
    }
}

fn is_field_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('$') && !name.contains('.')
}

/// An ordered, validated list of aggregation stages.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    name: &'static str,
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(name: &'static str, stages: Vec<Stage>) -> Result<Self, AppError> {
        if stages.is_empty() {
            return Err(AppError::Internal(format!("pipeline '{name}' has no stages")));
        }
        for stage in &stages {
            stage
                .validate(false)
                .map_err(|e| AppError::Internal(format!("pipeline '{name}': {e}")))?;
        }
        Ok(Self { name, stages })
    }

    /// Label used in logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn to_documents(&self) -> Vec<Document> {
        self.stages.iter().map(Stage::to_document).collect()
    }
}

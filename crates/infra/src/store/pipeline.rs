use bson::{doc, Document};

use super::Filter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_i32(self) -> i32 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

/// One stage of an aggregation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(Filter),
    /// Left outer join: attaches the array of `from` documents whose
    /// `foreign_field` equals this document's `local_field` under `as_field`.
    Lookup {
        from: String,
        local_field: String,
        foreign_field: String,
        as_field: String,
    },
    /// Flattens the array at `path`. With `preserve_null_and_empty_arrays`
    /// a document whose array is empty or missing is kept, without the field.
    Unwind {
        path: String,
        preserve_null_and_empty_arrays: bool,
    },
    Sort(Vec<(String, SortDirection)>),
    Skip(u64),
    Limit(u64),
}

impl Stage {
    pub fn to_document(&self) -> Document {
        match self {
            Stage::Match(filter) => doc! { "$match": filter.as_document().clone() },
            Stage::Lookup {
                from,
                local_field,
                foreign_field,
                as_field,
            } => doc! {
                "$lookup": {
                    "from": from.as_str(),
                    "localField": local_field.as_str(),
                    "foreignField": foreign_field.as_str(),
                    "as": as_field.as_str(),
                }
            },
            Stage::Unwind {
                path,
                preserve_null_and_empty_arrays,
            } => doc! {
                "$unwind": {
                    "path": format!("${}", path),
                    "preserveNullAndEmptyArrays": *preserve_null_and_empty_arrays,
                }
            },
            Stage::Sort(keys) => {
                let keys: Document = keys
                    .iter()
                    .map(|(field, dir)| (field.clone(), dir.as_i32().into()))
                    .collect();
                doc! { "$sort": keys }
            }
            Stage::Skip(n) => doc! { "$skip": i64::try_from(*n).unwrap_or(i64::MAX) },
            Stage::Limit(n) => doc! { "$limit": i64::try_from(*n).unwrap_or(i64::MAX) },
        }
    }
}

/// An ordered list of stages, built fluently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn matching(self, filter: Filter) -> Self {
        self.stage(Stage::Match(filter))
    }

    /// Lookup of at most one referenced document, attached inline: a
    /// `$lookup` followed by a preserving `$unwind`, so a dangling reference
    /// leaves `as_field` absent instead of dropping the document.
    pub fn join_one(self, from: &str, local_field: &str, as_field: &str) -> Self {
        self.stage(Stage::Lookup {
            from: from.to_string(),
            local_field: local_field.to_string(),
            foreign_field: "_id".to_string(),
            as_field: as_field.to_string(),
        })
        .stage(Stage::Unwind {
            path: as_field.to_string(),
            preserve_null_and_empty_arrays: true,
        })
    }

    pub fn sort(self, keys: &[(&str, SortDirection)]) -> Self {
        self.stage(Stage::Sort(
            keys.iter().map(|(f, d)| (f.to_string(), *d)).collect(),
        ))
    }

    pub fn skip(self, n: u64) -> Self {
        self.stage(Stage::Skip(n))
    }

    pub fn limit(self, n: u64) -> Self {
        self.stage(Stage::Limit(n))
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn to_documents(&self) -> Vec<Document> {
        self.stages.iter().map(Stage::to_document).collect()
    }
}

//! Category schema and selector resolution.
//!
//! The schema lists the category names the catalogue knows about. A selector
//! string is parsed once per run into a [`CategorySelector`] and resolved
//! against the schema before any marker is scored.

use serde::{Deserialize, Serialize};

use crate::config::{ALL_CATEGORIES, CATEGORY_SEPARATOR};
use crate::error::HeatmapError;

/// Known category names, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "SchemaDocument", into = "Vec<String>")]
pub struct CategorySchema {
    names: Vec<String>,
}

/// Accepted wire shapes for the schema: the schema collaborator's document
/// (`{"categories": [{"categoryName": ".."}]}`) or a bare list of names.
#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaDocument {
    Document { categories: Vec<SchemaCategory> },
    Names(Vec<String>),
}

#[derive(Deserialize)]
struct SchemaCategory {
    #[serde(rename = "categoryName")]
    category_name: String,
}

impl From<SchemaDocument> for CategorySchema {
    fn from(doc: SchemaDocument) -> Self {
        match doc {
            SchemaDocument::Document { categories } => {
                Self::new(categories.into_iter().map(|c| c.category_name))
            }
            SchemaDocument::Names(names) => Self::new(names),
        }
    }
}

impl From<CategorySchema> for Vec<String> {
    fn from(schema: CategorySchema) -> Self {
        schema.names
    }
}

impl CategorySchema {
    /// Builds a schema, dropping duplicate names but keeping first-seen order.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !out.contains(&name) {
                out.push(name);
            }
        }
        Self { names: out }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Which categories participate in scoring for one run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategorySelector {
    All,
    Single(String),
    Pair(String, String),
}

impl CategorySelector {
    /// Parses a selector string. An exact schema name always wins over the
    /// compound form, so names containing the separator stay addressable.
    pub fn parse(raw: &str, schema: &CategorySchema) -> Self {
        if raw == ALL_CATEGORIES {
            return Self::All;
        }
        if schema.contains(raw) {
            return Self::Single(raw.to_string());
        }
        match raw.split_once(CATEGORY_SEPARATOR) {
            Some((a, b)) => Self::Pair(a.to_string(), b.to_string()),
            None => Self::Single(raw.to_string()),
        }
    }

    /// Resolves to concrete category names. Unknown names and empty results
    /// are configuration errors.
    pub fn resolve(&self, schema: &CategorySchema) -> Result<Vec<String>, HeatmapError> {
        let names: Vec<String> = match self {
            Self::All => schema.names().to_vec(),
            Self::Single(name) => vec![name.clone()],
            Self::Pair(a, b) => vec![a.clone(), b.clone()],
        };
        if names.is_empty() {
            return Err(HeatmapError::EmptyCategorySelection);
        }
        if let Some(unknown) = names.iter().find(|n| !schema.contains(n)) {
            return Err(HeatmapError::UnknownCategory(unknown.clone()));
        }
        Ok(names)
    }
}

//! Column model and the type-inference engine.
//!
//! This module owns [`ColumnType`] (the four supported data types and their
//! wire tokens), [`Schema`] (the ordered column list inferred for one file),
//! and the inference pass that classifies every non-empty cell to decide a
//! column's type.
//!
//! Inference evaluates the type rules in a fixed order per column: integer,
//! float, date, string. A rule wins when every *classifiable* value in the
//! column satisfies it; values that classify as nothing do not veto the
//! numeric rules and instead surface later as invalid-value quality issues.
//! Date detection samples only the first [`DATE_SAMPLE_LIMIT`] non-empty
//! values per candidate format, so values past the sample never demote (or
//! retroactively invalidate) an inferred date column.

use std::{fmt, str::FromStr};

use anyhow::anyhow;
use chrono::NaiveDate;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer, de,
    ser::SerializeMap,
};

use crate::{
    data::{DATE_FORMATS, parse_float_literal, parse_integer_literal, parse_naive_date},
    rows::Table,
};

/// Fixed per-format sample bound for date detection. A deliberate
/// performance/accuracy trade-off: a column whose first ten values look like
/// dates is a date column, whatever comes later.
pub const DATE_SAMPLE_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Date,
    String,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "int",
            ColumnType::Float => "float",
            ColumnType::Date => "date",
            ColumnType::String => "string",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    pub fn variants() -> &'static [&'static str] {
        &["int", "float", "date", "string"]
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "int" | "integer" => Ok(ColumnType::Integer),
            "float" | "double" => Ok(ColumnType::Float),
            "date" => Ok(ColumnType::Date),
            "string" => Ok(ColumnType::String),
            _ => Err(anyhow!(
                "Unknown column type '{value}'. Supported types: {}",
                ColumnType::variants().join(", ")
            )),
        }
    }
}

impl Serialize for ColumnType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        ColumnType::from_str(&token).map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    pub datatype: ColumnType,
}

/// The inferred structure of one file: columns in file order, each with
/// exactly one type assigned during inference and never revised afterward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub columns: Vec<ColumnMeta>,
}

impl Schema {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn datatype_of(&self, name: &str) -> Option<ColumnType> {
        self.column_index(name).map(|idx| self.columns[idx].datatype)
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

// Serialized as a JSON object whose key order is the file's column order.
impl Serialize for Schema {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in &self.columns {
            map.serialize_entry(&column.name, &column.datatype)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SchemaVisitor;

        impl<'de> de::Visitor<'de> for SchemaVisitor {
            type Value = Schema;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of column names to type tokens")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Schema, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut columns = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, datatype)) = access.next_entry::<String, ColumnType>()? {
                    columns.push(ColumnMeta { name, datatype });
                }
                Ok(Schema { columns })
            }
        }

        deserializer.deserialize_map(SchemaVisitor)
    }
}

#[derive(Debug, Clone)]
struct TypeCandidate {
    non_empty: usize,
    integer_matches: usize,
    float_matches: usize,
    unclassified: usize,
    date_samples: Vec<String>,
}

impl TypeCandidate {
    fn new() -> Self {
        Self {
            non_empty: 0,
            integer_matches: 0,
            float_matches: 0,
            unclassified: 0,
            date_samples: Vec::new(),
        }
    }

    /// Records one trimmed, non-empty cell value.
    fn update(&mut self, value: &str) {
        self.non_empty += 1;
        if self.date_samples.len() < DATE_SAMPLE_LIMIT {
            self.date_samples.push(value.to_string());
        }
        if parse_integer_literal(value).is_ok() {
            self.integer_matches += 1;
            self.float_matches += 1;
        } else if parse_float_literal(value).is_ok() {
            self.float_matches += 1;
        } else if parse_naive_date(value).is_err() {
            self.unclassified += 1;
        }
    }

    fn classified(&self) -> usize {
        self.non_empty - self.unclassified
    }

    fn decide(&self) -> ColumnType {
        let classified = self.classified();
        if classified == 0 {
            return ColumnType::String;
        }
        if self.integer_matches == classified {
            ColumnType::Integer
        } else if self.float_matches == classified {
            ColumnType::Float
        } else if detect_date_format(&self.date_samples).is_some() {
            ColumnType::Date
        } else {
            ColumnType::String
        }
    }
}

/// First candidate format under which every sampled value parses.
fn detect_date_format(samples: &[String]) -> Option<&'static str> {
    if samples.is_empty() {
        return None;
    }
    DATE_FORMATS.iter().copied().find(|fmt| {
        samples
            .iter()
            .all(|value| NaiveDate::parse_from_str(value, fmt).is_ok())
    })
}

/// Assigns exactly one type to each column from its non-empty cell values.
/// Columns with no data (or no classifiable data) default to string.
pub fn infer_schema(table: &Table) -> Schema {
    let mut candidates = vec![TypeCandidate::new(); table.column_count()];
    for row in table.rows() {
        for (idx, candidate) in candidates.iter_mut().enumerate() {
            let Some(value) = row.get(idx) else {
                continue;
            };
            let trimmed = value.trim();
            if trimmed.is_empty() {
                continue;
            }
            candidate.update(trimmed);
        }
    }
    let columns = table
        .headers()
        .iter()
        .zip(&candidates)
        .map(|(name, candidate)| ColumnMeta {
            name: name.clone(),
            datatype: candidate.decide(),
        })
        .collect();
    Schema { columns }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decide(values: &[&str]) -> ColumnType {
        let mut candidate = TypeCandidate::new();
        for value in values {
            candidate.update(value);
        }
        candidate.decide()
    }

    #[test]
    fn all_integer_values_decide_integer() {
        assert_eq!(decide(&["1", "-2", "+30"]), ColumnType::Integer);
    }

    #[test]
    fn fractional_value_promotes_to_float() {
        assert_eq!(decide(&["1", "2.5", "3"]), ColumnType::Float);
    }

    #[test]
    fn unclassifiable_values_do_not_veto_numeric_rules() {
        assert_eq!(decide(&["30", "invalid"]), ColumnType::Integer);
        assert_eq!(decide(&["2.5", "n/a", "4"]), ColumnType::Float);
    }

    #[test]
    fn all_garbage_column_decides_string() {
        assert_eq!(decide(&["alpha", "beta"]), ColumnType::String);
    }

    #[test]
    fn date_values_decide_date() {
        assert_eq!(
            decide(&["2023-01-15", "2023-02-20", "2023-03-25"]),
            ColumnType::Date
        );
        assert_eq!(decide(&["01/15/2023", "02/20/2023"]), ColumnType::Date);
    }

    #[test]
    fn date_mixed_with_numbers_decides_string() {
        assert_eq!(decide(&["2023-01-15", "30"]), ColumnType::String);
    }

    #[test]
    fn date_sample_bound_ignores_later_values() {
        let mut values: Vec<String> = (1..=10).map(|d| format!("2023-01-{d:02}")).collect();
        values.push("not a date".to_string());
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        assert_eq!(decide(&refs), ColumnType::Date);
    }

    #[test]
    fn garbage_inside_date_sample_demotes_to_string() {
        assert_eq!(
            decide(&["2023-01-01", "not a date", "2023-01-03"]),
            ColumnType::String
        );
    }

    #[test]
    fn column_type_tokens_round_trip() {
        for token in ColumnType::variants() {
            let parsed: ColumnType = token.parse().unwrap();
            assert_eq!(parsed.as_str(), *token);
        }
        assert!("decimal".parse::<ColumnType>().is_err());
    }
}

//! Listing filters and their translation into query predicates.
//!
//! A [`FilterOptions`] compiles to an ordered list of [`Predicate`]s. The same
//! list is folded into the SQL listing query and can be evaluated against a
//! loaded [`Competition`], so both paths agree on what a filter selects.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::{Postgres, QueryBuilder};

use crate::models::{Competition, CompetitionCategory, CompetitionStatus, EntryDifficulty};

/// Upper bound used when only the lower prize bound is entered
pub const DEFAULT_MAX_PRIZE: i64 = 100_000;

/// Either every value or one specific value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Choice<T> {
    #[default]
    All,
    Only(T),
}

impl<T> Choice<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    pub fn selected(&self) -> Option<&T> {
        match self {
            Choice::All => None,
            Choice::Only(value) => Some(value),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => f.write_str("All"),
            Choice::Only(value) => value.fmt(f),
        }
    }
}

impl<T: FromStr> FromStr for Choice<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(Choice::All)
        } else {
            s.parse().map(Choice::Only)
        }
    }
}

impl<T: fmt::Display> Serialize for Choice<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T> Deserialize<'de> for Choice<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Inclusive prize bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrizeRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PrizeRange {
    pub fn new(min: impl Into<Decimal>, max: impl Into<Decimal>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Builds a range from optional bounds, defaulting the missing side
    pub fn from_bounds(min: Option<Decimal>, max: Option<Decimal>) -> Option<Self> {
        match (min, max) {
            (None, None) => None,
            (min, max) => Some(Self {
                min: min.unwrap_or(Decimal::ZERO),
                max: max.unwrap_or_else(|| Decimal::from(DEFAULT_MAX_PRIZE)),
            }),
        }
    }

    pub fn contains(&self, value: Decimal) -> bool {
        self.min <= value && value <= self.max
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub category: Choice<CompetitionCategory>,
    pub prize_range: Option<PrizeRange>,
    pub end_date: Option<NaiveDate>,
    pub difficulty: Choice<EntryDifficulty>,
    pub search: String,
}

impl FilterOptions {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// User-selected predicates, in query-builder order
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if let Choice::Only(category) = self.category {
            predicates.push(Predicate::new(
                Field::Category,
                Operator::Eq,
                Value::Category(category),
            ));
        }

        if let Choice::Only(difficulty) = self.difficulty {
            predicates.push(Predicate::new(
                Field::EntryDifficulty,
                Operator::Eq,
                Value::Difficulty(difficulty),
            ));
        }

        if let Some(range) = self.prize_range {
            predicates.push(Predicate::new(
                Field::PrizeValue,
                Operator::Gte,
                Value::Amount(range.min),
            ));
            predicates.push(Predicate::new(
                Field::PrizeValue,
                Operator::Lte,
                Value::Amount(range.max),
            ));
        }

        if let Some(end_date) = self.end_date {
            predicates.push(Predicate::new(
                Field::Deadline,
                Operator::Lte,
                Value::Date(end_date),
            ));
        }

        if !self.search.is_empty() {
            predicates.push(Predicate::new(
                Field::TitleOrDescription,
                Operator::ContainsIgnoreCase,
                Value::Text(self.search.clone()),
            ));
        }

        predicates
    }

    /// Predicates of the public listing: active competitions matching the filters
    pub fn listing_predicates(&self) -> Vec<Predicate> {
        let mut predicates = vec![Predicate::new(
            Field::Status,
            Operator::Eq,
            Value::Status(CompetitionStatus::Active),
        )];
        predicates.extend(self.predicates());
        predicates
    }

    /// Whether the public listing would include `competition`
    pub fn selects(&self, competition: &Competition) -> bool {
        self.listing_predicates()
            .iter()
            .all(|p| p.matches(competition))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Status,
    Category,
    EntryDifficulty,
    PrizeValue,
    Deadline,
    TitleOrDescription,
}

impl Field {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Status => &["status"],
            Self::Category => &["category"],
            Self::EntryDifficulty => &["entry_difficulty"],
            Self::PrizeValue => &["prize_value"],
            Self::Deadline => &["deadline"],
            Self::TitleOrDescription => &["title", "description"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gte,
    Lte,
    ContainsIgnoreCase,
}

impl Operator {
    fn sql(&self) -> &'static str {
        match self {
            Self::Eq => " = ",
            Self::Gte => " >= ",
            Self::Lte => " <= ",
            Self::ContainsIgnoreCase => " ILIKE ",
        }
    }

    fn holds<T: Ord>(&self, actual: &T, expected: &T) -> bool {
        match self {
            Self::Eq => actual == expected,
            Self::Gte => actual >= expected,
            Self::Lte => actual <= expected,
            Self::ContainsIgnoreCase => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Status(CompetitionStatus),
    Category(CompetitionCategory),
    Difficulty(EntryDifficulty),
    Amount(Decimal),
    Date(NaiveDate),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub field: Field,
    pub operator: Operator,
    pub value: Value,
}

impl Predicate {
    pub fn new(field: Field, operator: Operator, value: Value) -> Self {
        Self {
            field,
            operator,
            value,
        }
    }

    /// Appends ` AND <condition>` to `query`, qualifying columns with `alias`
    pub fn push_sql(&self, query: &mut QueryBuilder<'_, Postgres>, alias: &str) {
        query.push(" AND ");

        if let Value::Text(text) = &self.value {
            let pattern = format!("%{}%", escape_like(text));
            query.push("(");
            for (i, column) in self.field.columns().iter().enumerate() {
                if i > 0 {
                    query.push(" OR ");
                }
                query.push(format_args!("{alias}.{column}"));
                query.push(self.operator.sql());
                query.push_bind(pattern.clone());
            }
            query.push(")");
            return;
        }

        query.push(format_args!("{alias}.{}", self.field.columns()[0]));
        query.push(self.operator.sql());
        match &self.value {
            Value::Status(status) => query.push_bind(*status),
            Value::Category(category) => query.push_bind(*category),
            Value::Difficulty(difficulty) => query.push_bind(*difficulty),
            Value::Amount(amount) => query.push_bind(*amount),
            Value::Date(date) => query.push_bind(*date),
            Value::Text(_) => unreachable!("text predicates are handled above"),
        };
    }

    pub fn matches(&self, competition: &Competition) -> bool {
        match (&self.field, &self.value) {
            (Field::Status, Value::Status(status)) => {
                self.operator == Operator::Eq && competition.status == *status
            }
            (Field::Category, Value::Category(category)) => {
                self.operator == Operator::Eq && competition.category == *category
            }
            (Field::EntryDifficulty, Value::Difficulty(difficulty)) => {
                self.operator == Operator::Eq && competition.entry_difficulty == *difficulty
            }
            (Field::PrizeValue, Value::Amount(amount)) => {
                self.operator.holds(&competition.prize_value, amount)
            }
            (Field::Deadline, Value::Date(date)) => {
                self.operator.holds(&competition.deadline, date)
            }
            (Field::TitleOrDescription, Value::Text(text)) => {
                let needle = text.to_lowercase();
                competition.title.to_lowercase().contains(&needle)
                    || competition.description.to_lowercase().contains(&needle)
            }
            _ => false,
        }
    }
}

/// Escapes LIKE wildcards so search text matches literally
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

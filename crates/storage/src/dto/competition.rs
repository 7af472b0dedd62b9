use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::filter::{Choice, FilterOptions, PrizeRange};
use crate::models::{Competition, CompetitionCategory, CompetitionStatus, EntryDifficulty};

/// Request payload for creating a new competition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCompetitionRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    pub title: String,

    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: String,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: String,

    pub category: CompetitionCategory,

    pub start_date: NaiveDate,

    pub deadline: NaiveDate,

    #[schema(value_type = f64)]
    #[validate(custom(function = "validate_prize_value"))]
    pub prize_value: Decimal,

    pub entry_difficulty: EntryDifficulty,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Sponsor must be between 1 and 255 characters"
    ))]
    pub sponsor: String,

    #[validate(url(message = "Entry URL must be a valid URL"))]
    pub entry_url: String,

    #[serde(default)]
    #[validate(custom(function = "validate_lines"))]
    pub requirements: Vec<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_lines"))]
    pub eligibility: Vec<String>,
}

/// Request payload for updating an existing competition.
///
/// Absent fields keep their current value; list fields replace the whole list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCompetitionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub image_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CompetitionCategory>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    #[validate(custom(function = "validate_prize_value"))]
    pub prize_value: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_difficulty: Option<EntryDifficulty>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub sponsor: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub entry_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CompetitionStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_lines"))]
    pub requirements: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_lines"))]
    pub eligibility: Option<Vec<String>>,
}

/// A competition as shown to viewers, with its child lists and saved flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CompetitionResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub category: CompetitionCategory,
    pub start_date: NaiveDate,
    pub deadline: NaiveDate,
    pub prize_value: f64,
    pub entry_difficulty: EntryDifficulty,
    pub sponsor: String,
    pub entry_url: String,
    pub status: CompetitionStatus,
    pub requirements: Vec<String>,
    pub eligibility: Vec<String>,
    pub is_saved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query string of the public listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CompetitionQuery {
    /// Category name, or `All`
    #[serde(default, skip_serializing_if = "Choice::is_all")]
    #[param(value_type = Option<String>)]
    pub category: Choice<CompetitionCategory>,

    /// Entry difficulty, or `All`
    #[serde(default, skip_serializing_if = "Choice::is_all")]
    #[param(value_type = Option<String>)]
    pub difficulty: Choice<EntryDifficulty>,

    /// Inclusive lower prize bound
    #[serde(skip_serializing_if = "Option::is_none")]
    #[param(value_type = Option<f64>)]
    pub min_prize: Option<Decimal>,

    /// Inclusive upper prize bound
    #[serde(skip_serializing_if = "Option::is_none")]
    #[param(value_type = Option<f64>)]
    pub max_prize: Option<Decimal>,

    /// Latest deadline to include
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    /// Case-insensitive text matched against title and description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub search: String,
}

/// Prize values are stored as `NUMERIC(12, 2)`
const PRIZE_VALUE_LIMIT: i64 = 10_000_000_000;
const PRIZE_VALUE_SCALE: u32 = 2;

fn validate_prize_value(value: &Decimal) -> Result<(), validator::ValidationError> {
    if value.is_sign_negative() {
        return Err(validator::ValidationError::new("negative_prize_value"));
    }
    if *value >= Decimal::from(PRIZE_VALUE_LIMIT) {
        return Err(validator::ValidationError::new("prize_value_too_large"));
    }
    if value.normalize().scale() > PRIZE_VALUE_SCALE {
        return Err(validator::ValidationError::new("prize_value_precision"));
    }
    Ok(())
}

fn validate_lines(lines: &[String]) -> Result<(), validator::ValidationError> {
    if lines.iter().any(|line| line.trim().is_empty()) {
        return Err(validator::ValidationError::new("blank_line"));
    }
    Ok(())
}

fn check_dates(start: NaiveDate, deadline: NaiveDate) -> Result<(), &'static str> {
    if deadline < start {
        return Err("Deadline must be on or after start date");
    }
    Ok(())
}

impl CreateCompetitionRequest {
    /// Additional validation that requires multiple fields
    pub fn validate_dates(&self) -> Result<(), &'static str> {
        check_dates(self.start_date, self.deadline)
    }
}

impl UpdateCompetitionRequest {
    /// Checks the date pair that would result from applying this patch
    pub fn validate_dates(&self, existing: &Competition) -> Result<(), &'static str> {
        check_dates(
            self.start_date.unwrap_or(existing.start_date),
            self.deadline.unwrap_or(existing.deadline),
        )
    }
}

impl CompetitionResponse {
    pub fn from_parts(
        comp: Competition,
        requirements: Vec<String>,
        eligibility: Vec<String>,
        is_saved: bool,
    ) -> Self {
        Self {
            id: comp.id,
            title: comp.title,
            description: comp.description,
            image_url: comp.image_url,
            category: comp.category,
            start_date: comp.start_date,
            deadline: comp.deadline,
            prize_value: decimal_to_f64(comp.prize_value),
            entry_difficulty: comp.entry_difficulty,
            sponsor: comp.sponsor,
            entry_url: comp.entry_url,
            status: comp.status,
            requirements,
            eligibility,
            is_saved,
            created_at: comp.created_at,
            updated_at: comp.updated_at,
        }
    }
}

impl From<CompetitionQuery> for FilterOptions {
    fn from(query: CompetitionQuery) -> Self {
        Self {
            category: query.category,
            prize_range: PrizeRange::from_bounds(query.min_prize, query.max_prize),
            end_date: query.end_date,
            difficulty: query.difficulty,
            search: query.search,
        }
    }
}

impl From<&FilterOptions> for CompetitionQuery {
    fn from(filters: &FilterOptions) -> Self {
        Self {
            category: filters.category,
            difficulty: filters.difficulty,
            min_prize: filters.prize_range.map(|r| r.min),
            max_prize: filters.prize_range.map(|r| r.max),
            end_date: filters.end_date,
            search: filters.search.clone(),
        }
    }
}

pub fn decimal_to_f64(decimal: Decimal) -> f64 {
    decimal.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateCompetitionRequest {
        CreateCompetitionRequest {
            title: "Win Big".to_string(),
            description: "A big prize".to_string(),
            image_url: "https://example.com/a.png".to_string(),
            category: CompetitionCategory::Sweepstakes,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            deadline: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            prize_value: Decimal::from(500),
            entry_difficulty: EntryDifficulty::Easy,
            sponsor: "Acme".to_string(),
            entry_url: "https://example.com/enter".to_string(),
            requirements: vec!["Be 18+".to_string()],
            eligibility: vec![],
        }
    }

    #[test]
    fn test_valid_create_request() {
        let req = create_request();
        assert!(req.validate().is_ok());
        assert!(req.validate_dates().is_ok());
    }

    #[test]
    fn test_create_request_rejects_bad_fields() {
        let mut req = create_request();
        req.title = String::new();
        req.entry_url = "not a url".to_string();
        req.prize_value = Decimal::from(-1);
        req.requirements = vec!["  ".to_string()];

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("entry_url"));
        assert!(fields.contains_key("prize_value"));
        assert!(fields.contains_key("requirements"));
    }

    #[test]
    fn test_prize_value_must_fit_storage_column() {
        let mut req = create_request();
        req.prize_value = Decimal::from(10_000_000_000i64);
        assert!(req.validate().unwrap_err().field_errors().contains_key("prize_value"));

        req.prize_value = Decimal::new(999_999_999_999, 2);
        assert!(req.validate().is_ok());

        req.prize_value = Decimal::new(100_005, 3);
        assert!(req.validate().unwrap_err().field_errors().contains_key("prize_value"));

        req.prize_value = Decimal::new(100_500, 3);
        assert!(req.validate().is_ok());

        let patch = UpdateCompetitionRequest {
            prize_value: Some(Decimal::from(20_000_000_000i64)),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_deadline_before_start_is_rejected() {
        let mut req = create_request();
        req.deadline = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert!(req.validate_dates().is_err());
    }

    #[test]
    fn test_query_deserializes_missing_fields_as_defaults() {
        let query: CompetitionQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(FilterOptions::from(query), FilterOptions::default());
    }

    #[test]
    fn test_query_from_filters_skips_defaults() {
        let query = CompetitionQuery::from(&FilterOptions::default());
        assert_eq!(serde_json::to_string(&query).unwrap(), "{}");

        let filters = FilterOptions {
            category: Choice::Only(CompetitionCategory::Contest),
            prize_range: Some(PrizeRange::new(100, 500)),
            search: "win".to_string(),
            ..Default::default()
        };
        let query = CompetitionQuery::from(&filters);
        assert_eq!(query.min_prize, Some(Decimal::from(100)));
        assert_eq!(FilterOptions::from(query), filters);
    }

    #[test]
    fn test_response_coerces_decimal_prize() {
        assert_eq!(decimal_to_f64(Decimal::new(125050, 2)), 1250.5);
    }
}

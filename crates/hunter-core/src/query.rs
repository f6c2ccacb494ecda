//! Structured form fields and their rendering into one natural-language
//! query string.
//!
//! The backend takes free text, so composition is plain template
//! concatenation with no escaping. Validation exists only to gate
//! submission on the required fields; `compose` itself handles every
//! branch, including a missing date range.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The fixed set of industry verticals the form offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vertical {
    #[serde(rename = "AI")]
    Ai,
    Fintech,
    Healthcare,
    Cybersecurity,
    Web3,
    #[serde(rename = "SaaS")]
    Saas,
    #[serde(rename = "E-commerce")]
    Ecommerce,
    Gaming,
    #[serde(rename = "Climate Tech")]
    ClimateTech,
    Biotech,
    #[serde(rename = "EdTech")]
    Edtech,
    #[serde(rename = "Developer Tools")]
    DeveloperTools,
}

impl Vertical {
    /// All twelve categories, in form display order.
    pub const ALL: [Vertical; 12] = [
        Vertical::Ai,
        Vertical::Fintech,
        Vertical::Healthcare,
        Vertical::Cybersecurity,
        Vertical::Web3,
        Vertical::Saas,
        Vertical::Ecommerce,
        Vertical::Gaming,
        Vertical::ClimateTech,
        Vertical::Biotech,
        Vertical::Edtech,
        Vertical::DeveloperTools,
    ];

    /// The label shown in the form and spliced into the query string.
    pub fn label(&self) -> &'static str {
        match self {
            Vertical::Ai => "AI",
            Vertical::Fintech => "Fintech",
            Vertical::Healthcare => "Healthcare",
            Vertical::Cybersecurity => "Cybersecurity",
            Vertical::Web3 => "Web3",
            Vertical::Saas => "SaaS",
            Vertical::Ecommerce => "E-commerce",
            Vertical::Gaming => "Gaming",
            Vertical::ClimateTech => "Climate Tech",
            Vertical::Biotech => "Biotech",
            Vertical::Edtech => "EdTech",
            Vertical::DeveloperTools => "Developer Tools",
        }
    }
}

impl fmt::Display for Vertical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Vertical {
    type Err = QueryFormError;

    /// Case-insensitive match on the display label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Vertical::ALL
            .iter()
            .find(|v| v.label().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| QueryFormError::UnknownVertical {
                value: wanted.to_string(),
            })
    }
}

/// Optional event date window. An open `to` end means "starting from".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn starting(from: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }
}

/// Validation failures that gate submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryFormError {
    #[error("location is required")]
    MissingLocation,
    #[error("a start date is required")]
    MissingStartDate,
    #[error("unknown vertical: {value:?}")]
    UnknownVertical { value: String },
}

/// The discovery form, one submission's worth of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryForm {
    pub location: String,
    pub vertical: Vertical,
    #[serde(default)]
    pub date_range: DateRange,
    #[serde(default)]
    pub companies: String,
    #[serde(default)]
    pub additional_info: String,
}

impl QueryForm {
    pub fn new(location: impl Into<String>, vertical: Vertical) -> Self {
        Self {
            location: location.into(),
            vertical,
            date_range: DateRange::default(),
            companies: String::new(),
            additional_info: String::new(),
        }
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }

    pub fn with_companies(mut self, companies: impl Into<String>) -> Self {
        self.companies = companies.into();
        self
    }

    pub fn with_additional_info(mut self, info: impl Into<String>) -> Self {
        self.additional_info = info.into();
        self
    }

    /// Check the required-field gate: location and a start date.
    ///
    /// The vertical is required too, but the type system already enforces
    /// its presence.
    pub fn validate(&self) -> Result<(), QueryFormError> {
        if self.location.trim().is_empty() {
            return Err(QueryFormError::MissingLocation);
        }
        if self.date_range.from.is_none() {
            return Err(QueryFormError::MissingStartDate);
        }
        Ok(())
    }

    /// Render the form into the natural-language query string.
    pub fn compose(&self) -> String {
        let date_clause = match (self.date_range.from, self.date_range.to) {
            (Some(from), Some(to)) => {
                format!("from {} to {}", long_date(from), long_date(to))
            }
            (Some(from), None) => format!("starting from {}", long_date(from)),
            _ => "upcoming".to_string(),
        };

        let mut query = format!(
            "Find {} events in {} {}.",
            self.vertical, self.location, date_clause
        );
        if !self.companies.trim().is_empty() {
            query.push_str(&format!(
                " Focus on events where these companies might be involved: {}.",
                self.companies
            ));
        }
        if !self.additional_info.trim().is_empty() {
            query.push_str(&format!(" Additional requirements: {}", self.additional_info));
        }
        query
    }
}

/// `Month D, YYYY` with no zero padding on the day.
fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

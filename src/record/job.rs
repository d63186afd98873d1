use crate::record::level::DetailLevel;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Serialize, Serializer};
use std::borrow::Cow;

/// Sentinel for location and other free fields that could not be found
pub const NO_DATA: &str = "No Data";

/// Sentinel for salary, job type and company fields that could not be found
pub const UNDISCLOSED: &str = "Undisclosed";

/// Sentinel for education and experience requirements that could not be found
pub const NO_REQUIREMENT: &str = "No Requirement";

/// Sentinel for a missing job title
pub const NO_TITLE: &str = "No Title";

const SUMMARY_FIELDS: [&str; 7] = [
    "title",
    "company",
    "salary",
    "location",
    "freshness",
    "url",
    "timestamp",
];

const DETAIL_FIELDS: [&str; 16] = [
    "title",
    "salary",
    "job_type",
    "education",
    "experience",
    "skills",
    "extra_requirements",
    "province",
    "city",
    "district",
    "company_name",
    "company_industry",
    "company_size",
    "freshness",
    "url",
    "timestamp",
];

const DESCRIPTION_FIELD: &str = "description";

/// Returns the ordered field names of records produced at `level`
pub fn field_names(level: DetailLevel) -> Vec<&'static str> {
    match level {
        DetailLevel::Summary => SUMMARY_FIELDS.to_vec(),
        DetailLevel::Structured => DETAIL_FIELDS.to_vec(),
        DetailLevel::Full => {
            let mut names = DETAIL_FIELDS.to_vec();
            names.push(DESCRIPTION_FIELD);
            names
        }
    }
}

/// Current UTC time truncated to whole seconds
pub fn capture_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Formats a capture timestamp as RFC 3339 with second precision
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(ts))
}

/// A single column value of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(Cow<'a, str>),
    List(&'a [String]),
}

impl FieldValue<'_> {
    /// Flattens the value for row-oriented formats (lists are comma-joined)
    pub fn joined(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(text) => Cow::Borrowed(text.as_ref()),
            FieldValue::List(items) => Cow::Owned(items.join(",")),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, FieldValue::List(_))
    }
}

fn text(value: &str) -> FieldValue<'_> {
    FieldValue::Text(Cow::Borrowed(value))
}

/// Record built from a listing card (detail level 1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRecord {
    pub title: String,
    pub company: String,
    pub salary: String,
    pub location: String,
    pub freshness: String,
    pub url: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl SummaryRecord {
    fn fields(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        vec![
            ("title", text(&self.title)),
            ("company", text(&self.company)),
            ("salary", text(&self.salary)),
            ("location", text(&self.location)),
            ("freshness", text(&self.freshness)),
            ("url", text(&self.url)),
            (
                "timestamp",
                FieldValue::Text(Cow::Owned(format_timestamp(&self.timestamp))),
            ),
        ]
    }
}

/// Record built from a detail page (detail level 2)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRecord {
    pub title: String,
    pub salary: String,
    pub job_type: String,
    pub education: String,
    pub experience: String,
    pub skills: Vec<String>,
    pub extra_requirements: Vec<String>,
    pub province: String,
    pub city: String,
    pub district: String,
    pub company_name: String,
    pub company_industry: String,
    pub company_size: String,
    pub freshness: String,
    pub url: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl DetailRecord {
    fn fields(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        vec![
            ("title", text(&self.title)),
            ("salary", text(&self.salary)),
            ("job_type", text(&self.job_type)),
            ("education", text(&self.education)),
            ("experience", text(&self.experience)),
            ("skills", FieldValue::List(&self.skills)),
            ("extra_requirements", FieldValue::List(&self.extra_requirements)),
            ("province", text(&self.province)),
            ("city", text(&self.city)),
            ("district", text(&self.district)),
            ("company_name", text(&self.company_name)),
            ("company_industry", text(&self.company_industry)),
            ("company_size", text(&self.company_size)),
            ("freshness", text(&self.freshness)),
            ("url", text(&self.url)),
            (
                "timestamp",
                FieldValue::Text(Cow::Owned(format_timestamp(&self.timestamp))),
            ),
        ]
    }
}

/// Detail record plus the free-text description (detail level 3)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullRecord {
    #[serde(flatten)]
    pub detail: DetailRecord,
    pub description: String,
}

/// The unit handed to exporters
///
/// The variant always matches the crawl's [`DetailLevel`], so every record of
/// one run exposes the same field names in the same order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum JobRecord {
    Summary(SummaryRecord),
    Detail(DetailRecord),
    Full(FullRecord),
}

impl JobRecord {
    pub fn level(&self) -> DetailLevel {
        match self {
            JobRecord::Summary(_) => DetailLevel::Summary,
            JobRecord::Detail(_) => DetailLevel::Structured,
            JobRecord::Full(_) => DetailLevel::Full,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            JobRecord::Summary(r) => &r.title,
            JobRecord::Detail(r) => &r.title,
            JobRecord::Full(r) => &r.detail.title,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            JobRecord::Summary(r) => &r.url,
            JobRecord::Detail(r) => &r.url,
            JobRecord::Full(r) => &r.detail.url,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            JobRecord::Summary(r) => r.timestamp,
            JobRecord::Detail(r) => r.timestamp,
            JobRecord::Full(r) => r.detail.timestamp,
        }
    }

    /// Returns the record's columns in export order
    pub fn fields(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        match self {
            JobRecord::Summary(r) => r.fields(),
            JobRecord::Detail(r) => r.fields(),
            JobRecord::Full(r) => {
                let mut fields = r.detail.fields();
                fields.push((DESCRIPTION_FIELD, text(&r.description)));
                fields
            }
        }
    }
}

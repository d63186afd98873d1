//! Detail page field extraction
//!
//! Every field is looked up as "selector with default": a missing or blank
//! element yields the field's sentinel instead of an error, so all records of
//! one detail level carry the same fields.

use crate::crawler::parser::{element_text, first_text};
use crate::crawler::selectors::detail;
use crate::record::{
    DetailLevel, DetailRecord, FullRecord, JobRecord, SummaryRecord, NO_DATA, NO_REQUIREMENT,
    NO_TITLE, UNDISCLOSED,
};
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Site-specific knobs for extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionRules {
    /// Leading requirement tags that repeat the overview (type, education, experience)
    pub skipped_requirement_tags: usize,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            skipped_requirement_tags: 3,
        }
    }
}

/// Extracts a record of the requested level from a parsed detail page
///
/// Pure: `captured_at` is supplied by the caller, so extracting the same page
/// twice with the same timestamp gives equal records.
///
/// The crawl itself only calls this at levels 2 and 3; level-1 records come
/// from listing cards. Asking for [`DetailLevel::Summary`] here still yields a
/// summary record built from the detail page, with `company_name` as the
/// company and `city` as the location.
///
/// # Arguments
///
/// * `document` - The parsed detail page
/// * `level` - Shape of the record to build
/// * `rules` - Site-specific extraction knobs
/// * `url` - Absolute URL the page was loaded from
/// * `captured_at` - Capture timestamp stored in the record
///
/// # Returns
///
/// A [`JobRecord`] whose variant matches `level`; fields missing from the
/// page hold their sentinel.
pub fn extract(
    document: &Html,
    level: DetailLevel,
    rules: &ExtractionRules,
    url: &Url,
    captured_at: DateTime<Utc>,
) -> JobRecord {
    let detail = extract_detail(document, rules, url, captured_at);

    match level {
        DetailLevel::Summary => JobRecord::Summary(SummaryRecord {
            title: detail.title,
            company: detail.company_name,
            salary: detail.salary,
            location: detail.city,
            freshness: detail.freshness,
            url: detail.url,
            timestamp: detail.timestamp,
        }),
        DetailLevel::Structured => JobRecord::Detail(detail),
        DetailLevel::Full => JobRecord::Full(FullRecord {
            description: description(document),
            detail,
        }),
    }
}

fn extract_detail(
    document: &Html,
    rules: &ExtractionRules,
    url: &Url,
    captured_at: DateTime<Utc>,
) -> DetailRecord {
    let text = |css: &str, sentinel: &str| text_or(document, css, sentinel);

    DetailRecord {
        title: text(detail::TITLE, NO_TITLE),
        salary: text(detail::SALARY, UNDISCLOSED),
        job_type: text(detail::JOB_TYPE, UNDISCLOSED),
        education: text(detail::EDUCATION, NO_REQUIREMENT),
        experience: text(detail::EXPERIENCE, NO_REQUIREMENT),
        skills: skills(document),
        extra_requirements: requirement_tags(document, rules.skipped_requirement_tags),
        province: text(detail::PROVINCE, NO_DATA),
        city: text(detail::CITY, NO_DATA),
        district: text(detail::DISTRICT, NO_DATA),
        company_name: text(detail::COMPANY_NAME, UNDISCLOSED),
        company_industry: text(detail::COMPANY_INDUSTRY, UNDISCLOSED),
        company_size: text(detail::COMPANY_SIZE, UNDISCLOSED),
        freshness: text(detail::FRESHNESS, NO_DATA),
        url: url.to_string(),
        timestamp: captured_at,
    }
}

/// First match of `css` as collapsed text, or `sentinel`
fn text_or(document: &Html, css: &str, sentinel: &str) -> String {
    first_text(document.root_element(), css).unwrap_or_else(|| sentinel.to_string())
}

/// Requirement tags after dropping the first `skipped` elements
///
/// Tags are skipped by position before blanks are removed, so an empty
/// leading tag still counts towards the skipped prefix.
fn requirement_tags(document: &Html, skipped: usize) -> Vec<String> {
    let Ok(selector) = Selector::parse(detail::REQUIREMENT_TAG) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .skip(skipped)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

fn skills(document: &Html) -> Vec<String> {
    let (Ok(container), Ok(tag)) = (
        Selector::parse(detail::SKILLS_CONTAINER),
        Selector::parse(detail::SKILL_TAG),
    ) else {
        return Vec::new();
    };

    document
        .select(&container)
        .next()
        .map(|container| {
            container
                .select(&tag)
                .map(element_text)
                .filter(|text| !text.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Elements that start a new line in the description
const BLOCK_TAGS: [&str; 16] = [
    "p", "div", "li", "br", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "section",
    "blockquote", "pre", "tr",
];

/// Description text with one line per block element
///
/// Inline markup inside a block is joined with the surrounding text and
/// whitespace is collapsed; empty blocks are dropped.
fn description(document: &Html) -> String {
    let Ok(selector) = Selector::parse(detail::DESCRIPTION) else {
        return NO_DATA.to_string();
    };
    let Some(body) = document.select(&selector).next() else {
        return NO_DATA.to_string();
    };

    let mut lines = Vec::new();
    let mut current = String::new();
    collect_lines(body, &mut current, &mut lines);
    flush_line(&mut current, &mut lines);

    if lines.is_empty() {
        NO_DATA.to_string()
    } else {
        lines.join("\n")
    }
}

fn collect_lines(element: ElementRef<'_>, current: &mut String, lines: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            current.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            let block = BLOCK_TAGS.contains(&child.value().name());
            if block {
                flush_line(current, lines);
            }
            collect_lines(child, current, lines);
            if block {
                flush_line(current, lines);
            }
        }
    }
}

fn flush_line(current: &mut String, lines: &mut Vec<String>) {
    let line = current.split_whitespace().collect::<Vec<_>>().join(" ");
    if !line.is_empty() {
        lines.push(line);
    }
    current.clear();
}

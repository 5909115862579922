//! Experience Extractor — skills and years-of-experience from free text.
//!
//! Skills come from a reference vocabulary (canonical name + aliases → category),
//! matched case-insensitively on word boundaries. The vocabulary is data, not
//! code: the built-in default can be replaced by a JSON file.
//!
//! Years of experience combine two kinds of evidence:
//! - date ranges (`Jan 2019 – Mar 2021`, `2015 to 2018`, `06/2020 - Present`):
//!   merged into a union so overlapping roles count once, then summed
//! - explicit statements (`5 years`, `8+ yrs`): claimed totals, combined by max
//!
//! The estimate is the larger of the two. Nothing found → 0 years.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::scoring::normalizer::find_term;
use crate::scoring::quality::{detect_sections, ResumeSection};

/// Durations above this are treated as parse noise.
const MAX_PLAUSIBLE_YEARS: f64 = 50.0;

// ────────────────────────────────────────────────────────────────────────────
// Vocabulary
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("Failed to read vocabulary file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid vocabulary JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Vocabulary contains no skills")]
    Empty,
}

/// One vocabulary entry as stored in the JSON override file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone)]
struct VocabularyTerm {
    term: String,
    name: String,
    category: String,
}

/// Reference vocabulary: every searchable term (name or alias, lowercased)
/// maps to its canonical skill name and category.
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    terms: Vec<VocabularyTerm>,
}

impl SkillVocabulary {
    pub fn new(entries: Vec<SkillEntry>) -> Result<Self, VocabularyError> {
        let mut terms = Vec::new();
        for entry in entries {
            let name = entry.name.trim().to_string();
            if name.is_empty() {
                continue;
            }
            let mut spellings: BTreeSet<String> = entry
                .aliases
                .iter()
                .map(|a| a.trim().to_lowercase())
                .filter(|a| !a.is_empty())
                .collect();
            spellings.insert(name.to_lowercase());
            for term in spellings {
                terms.push(VocabularyTerm {
                    term,
                    name: name.clone(),
                    category: entry.category.trim().to_lowercase(),
                });
            }
        }
        if terms.is_empty() {
            return Err(VocabularyError::Empty);
        }
        Ok(Self { terms })
    }

    pub fn from_json_str(json: &str) -> Result<Self, VocabularyError> {
        let entries: Vec<SkillEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    pub fn from_path(path: &Path) -> Result<Self, VocabularyError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        let entries = DEFAULT_SKILLS
            .iter()
            .map(|(name, category, aliases)| SkillEntry {
                name: name.to_string(),
                category: category.to_string(),
                aliases: aliases.iter().map(|a| a.to_string()).collect(),
            })
            .collect();
        // DEFAULT_SKILLS is non-empty, so construction cannot fail.
        Self::new(entries).unwrap_or(Self { terms: vec![] })
    }
}

/// (canonical name, category, aliases)
const DEFAULT_SKILLS: &[(&str, &str, &[&str])] = &[
    // languages
    ("Python", "language", &[]),
    ("Rust", "language", &[]),
    ("Java", "language", &[]),
    ("JavaScript", "language", &["js", "ecmascript"]),
    ("TypeScript", "language", &[]),
    ("Golang", "language", &[]),
    ("C++", "language", &["cpp"]),
    ("C#", "language", &["csharp"]),
    ("Kotlin", "language", &[]),
    ("Swift", "language", &[]),
    ("Ruby", "language", &[]),
    ("PHP", "language", &[]),
    ("Scala", "language", &[]),
    ("Elixir", "language", &[]),
    ("Haskell", "language", &[]),
    ("SQL", "language", &[]),
    ("Bash", "language", &["shell scripting"]),
    // frameworks & runtimes
    ("Django", "framework", &[]),
    ("Flask", "framework", &[]),
    ("FastAPI", "framework", &[]),
    ("Spring Boot", "framework", &[]),
    ("React", "framework", &["react.js", "reactjs"]),
    ("Angular", "framework", &[]),
    ("Vue", "framework", &["vue.js", "vuejs"]),
    ("Node.js", "framework", &["nodejs"]),
    ("Ruby on Rails", "framework", &["rails"]),
    (".NET", "framework", &["dotnet", "asp.net"]),
    ("Tokio", "framework", &[]),
    // data stores
    ("PostgreSQL", "database", &["postgres"]),
    ("MySQL", "database", &[]),
    ("MongoDB", "database", &["mongo"]),
    ("Redis", "database", &[]),
    ("Cassandra", "database", &[]),
    ("Elasticsearch", "database", &["elastic search", "opensearch"]),
    ("DynamoDB", "database", &[]),
    ("SQLite", "database", &[]),
    // messaging
    ("Kafka", "messaging", &["apache kafka"]),
    ("RabbitMQ", "messaging", &[]),
    ("gRPC", "messaging", &[]),
    // cloud & ops
    ("AWS", "cloud", &["amazon web services"]),
    ("GCP", "cloud", &["google cloud", "google cloud platform"]),
    ("Azure", "cloud", &["microsoft azure"]),
    ("Docker", "devops", &[]),
    ("Kubernetes", "devops", &["k8s"]),
    ("Terraform", "devops", &[]),
    ("Ansible", "devops", &[]),
    ("CI/CD", "devops", &["continuous integration", "continuous delivery"]),
    ("Jenkins", "devops", &[]),
    ("Linux", "devops", &[]),
    ("Git", "devops", &[]),
    // engineering practice
    ("Distributed Systems", "practice", &["distributed computing"]),
    ("Microservices", "practice", &["microservice"]),
    ("Backend", "practice", &["back-end", "back end"]),
    ("Frontend", "practice", &["front-end", "front end"]),
    ("REST APIs", "practice", &["restful", "rest api"]),
    ("GraphQL", "practice", &[]),
    ("System Design", "practice", &[]),
    ("Agile", "practice", &["scrum", "kanban"]),
    ("Test-Driven Development", "practice", &["tdd"]),
    // data & ML
    ("Machine Learning", "data", &["ml"]),
    ("Deep Learning", "data", &[]),
    ("NLP", "data", &["natural language processing"]),
    ("Computer Vision", "data", &[]),
    ("Data Analysis", "data", &["data analytics"]),
    ("Pandas", "data", &[]),
    ("NumPy", "data", &[]),
    ("PyTorch", "data", &[]),
    ("TensorFlow", "data", &[]),
    ("Spark", "data", &["apache spark", "pyspark"]),
    ("Airflow", "data", &[]),
    ("Tableau", "data", &[]),
    ("Power BI", "data", &[]),
    // design
    ("Graphic Design", "design", &[]),
    ("UI Design", "design", &["ui/ux", "user interface design"]),
    ("UX Design", "design", &["user experience"]),
    ("Figma", "design", &[]),
    ("Photoshop", "design", &["adobe photoshop"]),
    ("Illustrator", "design", &["adobe illustrator"]),
    ("InDesign", "design", &["adobe indesign"]),
    ("Typography", "design", &[]),
    // business
    ("Project Management", "business", &[]),
    ("Product Management", "business", &[]),
    ("Stakeholder Management", "business", &[]),
    ("Excel", "business", &["microsoft excel"]),
    ("Salesforce", "business", &[]),
    ("SEO", "business", &["search engine optimization"]),
    ("Accounting", "business", &[]),
];

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExtractedProfile {
    /// Canonical skill names, sorted.
    pub skills: Vec<String>,
    pub skills_by_category: BTreeMap<String, Vec<String>>,
    /// 0.0 when no duration evidence is found.
    pub years_experience: f64,
    /// Filled by the engine from the location matcher.
    pub location: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Duration patterns
// ────────────────────────────────────────────────────────────────────────────

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";

static DATE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    let date = format!(r"(?:{MONTH}\s+(?:19|20)\d{{2}}|\d{{1,2}}/(?:19|20)\d{{2}}|(?:19|20)\d{{2}})");
    let pattern = format!(
        r"(?i)\b(?P<start>{date})\s*(?:-|–|—|to|until|till)\s*(?P<end>{date}|present|current|now|today|ongoing|date)\b"
    );
    Regex::new(&pattern).expect("valid date range regex")
});

static EXPLICIT_YEARS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?P<n>\d{1,2}(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)\b")
        .expect("valid explicit years regex")
});

const OPEN_ENDED: &[&str] = &["present", "current", "now", "today", "ongoing", "date"];

// ────────────────────────────────────────────────────────────────────────────
// Extractor
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ExperienceExtractor {
    vocabulary: SkillVocabulary,
    /// Resolves open-ended ranges ("– Present").
    as_of: NaiveDate,
}

impl ExperienceExtractor {
    pub fn new(vocabulary: SkillVocabulary) -> Self {
        Self {
            vocabulary,
            as_of: Utc::now().date_naive(),
        }
    }

    pub fn with_reference_date(mut self, as_of: NaiveDate) -> Self {
        self.as_of = as_of;
        self
    }

    /// Never fails: unparseable text yields an empty profile.
    pub fn extract(&self, text: &str) -> ExtractedProfile {
        if text.trim().is_empty() {
            return ExtractedProfile::default();
        }

        let (skills, skills_by_category) = self.match_skills(text);
        let years_experience = self.estimate_years(text);

        debug!(
            "Extracted {} skills, {:.1} years of experience",
            skills.len(),
            years_experience
        );

        ExtractedProfile {
            skills,
            skills_by_category,
            years_experience,
            location: None,
        }
    }

    fn match_skills(&self, text: &str) -> (Vec<String>, BTreeMap<String, Vec<String>>) {
        let lower = text.to_lowercase();
        let mut skills = BTreeSet::new();
        let mut by_category: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for term in &self.vocabulary.terms {
            if find_term(&lower, &term.term).is_some() {
                skills.insert(term.name.clone());
                by_category
                    .entry(term.category.clone())
                    .or_default()
                    .insert(term.name.clone());
            }
        }

        (
            skills.into_iter().collect(),
            by_category
                .into_iter()
                .map(|(category, names)| (category, names.into_iter().collect()))
                .collect(),
        )
    }

    fn estimate_years(&self, text: &str) -> f64 {
        let sections = experience_sections(text);
        let from_ranges = if sections.is_empty() {
            self.years_from_ranges(&[text])
        } else {
            self.years_from_ranges(&sections)
        };
        let from_statements = years_from_statements(text);
        round1(from_ranges.max(from_statements))
    }

    /// Union of all date ranges across `texts`, in years.
    fn years_from_ranges(&self, texts: &[&str]) -> f64 {
        let as_of = month_index(self.as_of.year(), self.as_of.month());
        let mut intervals: Vec<(i32, i32)> = texts
            .iter()
            .flat_map(|&text| DATE_RANGE_RE.captures_iter(text))
            .filter_map(|caps| {
                let start = parse_endpoint(caps.name("start")?.as_str(), as_of)?;
                let end = parse_endpoint(caps.name("end")?.as_str(), as_of)?.min(as_of);
                (end > start).then_some((start, end))
            })
            .collect();

        if intervals.is_empty() {
            return 0.0;
        }

        intervals.sort_unstable();
        let mut merged: Vec<(i32, i32)> = Vec::with_capacity(intervals.len());
        for (start, end) in intervals {
            match merged.last_mut() {
                Some(last) if start <= last.1 => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }

        let months: i32 = merged.iter().map(|(s, e)| e - s).sum();
        let years = months as f64 / 12.0;
        if years > MAX_PLAUSIBLE_YEARS {
            0.0
        } else {
            years
        }
    }
}

impl Default for ExperienceExtractor {
    fn default() -> Self {
        Self::new(SkillVocabulary::default())
    }
}

/// Largest explicitly stated duration.
fn years_from_statements(text: &str) -> f64 {
    EXPLICIT_YEARS_RE
        .captures_iter(text)
        .filter_map(|caps| caps.name("n")?.as_str().parse::<f64>().ok())
        .filter(|y| *y > 0.0 && *y <= MAX_PLAUSIBLE_YEARS)
        .fold(0.0, f64::max)
}

/// Bodies of every experience-type section ("Experience", "Professional
/// History", "Other Experience", ...), in document order.
fn experience_sections(text: &str) -> Vec<&str> {
    let sections = detect_sections(text);
    if !sections.iter().any(|(s, _)| *s == ResumeSection::Experience) {
        return Vec::new();
    }

    let mut line_starts = Vec::new();
    let mut offset = 0;
    for line in text.split('\n') {
        line_starts.push(offset);
        offset += line.len() + 1;
    }
    let line_start = |idx: usize| line_starts.get(idx).copied().unwrap_or(text.len()).min(text.len());

    sections
        .iter()
        .enumerate()
        .filter(|(_, (section, _))| *section == ResumeSection::Experience)
        .filter_map(|(pos, &(_, heading_line))| {
            let start = line_start(heading_line + 1);
            let end = sections
                .get(pos + 1)
                .map(|&(_, next)| line_start(next))
                .unwrap_or(text.len());
            (start < end).then(|| &text[start..end])
        })
        .collect()
}

fn month_index(year: i32, month: u32) -> i32 {
    year * 12 + month as i32 - 1
}

/// Parses `Jan 2019`, `01/2019`, `2019` or an open-ended marker. Year-only
/// endpoints are taken as January.
fn parse_endpoint(raw: &str, as_of: i32) -> Option<i32> {
    let lower = raw.trim().to_lowercase();
    if OPEN_ENDED.contains(&lower.as_str()) {
        return Some(as_of);
    }

    if let Some((month, year)) = lower.split_once('/') {
        let month: u32 = month.trim().parse().ok()?;
        let year: i32 = year.trim().parse().ok()?;
        return (1..=12).contains(&month).then(|| month_index(year, month));
    }

    let mut parts = lower.split_whitespace();
    let first = parts.next()?;
    match parts.next() {
        Some(year) => {
            let month = month_from_name(first)?;
            Some(month_index(year.parse().ok()?, month))
        }
        None => Some(month_index(first.parse().ok()?, 1)),
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

//! Location Matcher — resolves free-form location strings against the
//! gazetteer and grades how close a candidate is to the job.
//!
//! Tiers, best to worst: same city (100), same country (70), same world
//! region (40), distant (0). Anything that cannot be resolved scores 0 and is
//! logged, it is never an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::gazetteer::{location_key, Gazetteer, Region};
use super::normalizer::find_term;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationTier {
    SameCity,
    SameCountry,
    SameRegion,
    Distant,
    Unresolved,
}

impl LocationTier {
    pub fn score(self) -> f64 {
        match self {
            LocationTier::SameCity => 100.0,
            LocationTier::SameCountry => 70.0,
            LocationTier::SameRegion => 40.0,
            LocationTier::Distant | LocationTier::Unresolved => 0.0,
        }
    }
}

/// A location string resolved to gazetteer entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPlace {
    pub city: Option<String>,
    pub country_code: String,
    pub country: String,
    pub region: Region,
}

impl ResolvedPlace {
    pub fn display(&self) -> String {
        match &self.city {
            Some(city) => format!("{}, {}", city, self.country),
            None => self.country.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationMatch {
    pub score: f64,
    pub tier: LocationTier,
    pub candidate: Option<ResolvedPlace>,
    pub job: Option<ResolvedPlace>,
}

// ────────────────────────────────────────────────────────────────────────────
// Resolution
// ────────────────────────────────────────────────────────────────────────────

/// Resolves `raw` ("Berlin, Germany", "Austin, TX", "UK", "Remote - Paris").
///
/// Comma-separated parts are looked up individually; the first part naming a
/// city wins the city slot, later parts pin the country. A country that
/// contradicts the city ("Paris, Texas") drops the city. When no part resolves
/// the whole string is scanned for city, then country names.
pub fn resolve(gazetteer: &Gazetteer, raw: &str) -> Option<ResolvedPlace> {
    let parts: Vec<String> = raw
        .split(|c: char| matches!(c, ',' | ';' | '|' | '/' | '(' | ')'))
        .map(location_key)
        .filter(|p| !p.is_empty())
        .collect();

    let mut city = None;
    // Each part may name several countries: "CA" is Canada or California.
    let mut country_hints: Vec<Vec<&'static str>> = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        if city.is_none() {
            if let Some(found) = gazetteer.lookup_city(part) {
                city = Some(found);
                continue;
            }
        }
        let country = gazetteer.lookup_country(part).map(|c| c.code);
        let us_state = gazetteer.is_us_state(part);
        // "Sacramento, CA": a two-letter code after a place name reads as a state.
        let state_first = us_state && i > 0 && part.len() == 2;
        let hint: Vec<&'static str> = match (country, us_state) {
            (Some(code), true) if state_first => vec!["US", code],
            (Some(code), true) => vec![code, "US"],
            (Some(code), false) => vec![code],
            (None, true) => vec!["US"],
            (None, false) => continue,
        };
        country_hints.push(hint);
    }

    // An unambiguous part ("USA", "Canada") outranks an ambiguous code.
    let pinned = country_hints
        .iter()
        .rev()
        .find(|hint| hint.len() == 1)
        .or(country_hints.last())
        .map(|hint| hint[0]);

    let place = match (city, pinned) {
        (Some(city), None) => place_for(gazetteer, Some(city.name), city.country_code),
        (Some(city), Some(code)) => {
            let consistent = country_hints
                .iter()
                .any(|hint| hint.contains(&city.country_code));
            if consistent {
                place_for(gazetteer, Some(city.name), city.country_code)
            } else {
                place_for(gazetteer, None, code)
            }
        }
        (None, Some(code)) => place_for(gazetteer, None, code),
        (None, None) => None,
    };

    place.or_else(|| scan(gazetteer, &location_key(raw)))
}

fn place_for(gazetteer: &Gazetteer, city: Option<&str>, code: &str) -> Option<ResolvedPlace> {
    let country = gazetteer.country(code)?;
    Some(ResolvedPlace {
        city: city.map(str::to_string),
        country_code: country.code.to_string(),
        country: country.name.to_string(),
        region: country.region,
    })
}

/// Earliest city mention in `haystack`, else earliest country mention.
/// `haystack` must already be a location key (lowercased, dot-free).
fn scan(gazetteer: &Gazetteer, haystack: &str) -> Option<ResolvedPlace> {
    let city = gazetteer
        .scannable_cities()
        .filter_map(|(key, city)| find_term(haystack, key).map(|pos| (pos, key.len(), city)))
        // earliest, then longest spelling ("new york city" over "new york")
        .min_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
    if let Some((_, _, city)) = city {
        return place_for(gazetteer, Some(city.name), city.country_code);
    }

    let country = gazetteer
        .scannable_countries()
        .filter_map(|(key, country)| find_term(haystack, key).map(|pos| (pos, key.len(), country)))
        .min_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
    country.and_then(|(_, _, country)| place_for(gazetteer, None, country.code))
}

// ────────────────────────────────────────────────────────────────────────────
// Matching
// ────────────────────────────────────────────────────────────────────────────

/// Grades `candidate` against `job`. Missing or unresolvable input on either
/// side yields `Unresolved` with a score of 0.
pub fn match_location(gazetteer: &Gazetteer, candidate: &str, job: &str) -> LocationMatch {
    let candidate_key = location_key(candidate);
    let job_key = location_key(job);

    if candidate_key.is_empty() || job_key.is_empty() {
        return LocationMatch {
            score: 0.0,
            tier: LocationTier::Unresolved,
            candidate: None,
            job: None,
        };
    }

    let candidate_place = resolve(gazetteer, candidate);
    let job_place = resolve(gazetteer, job);

    let tier = if candidate_key == job_key {
        LocationTier::SameCity
    } else {
        match (&candidate_place, &job_place) {
            (Some(c), Some(j)) => tier_between(c, j),
            _ => {
                tracing::warn!(
                    candidate = %candidate,
                    job = %job,
                    candidate_resolved = candidate_place.is_some(),
                    job_resolved = job_place.is_some(),
                    "Could not resolve location"
                );
                LocationTier::Unresolved
            }
        }
    };

    LocationMatch {
        score: tier.score(),
        tier,
        candidate: candidate_place,
        job: job_place,
    }
}

fn tier_between(candidate: &ResolvedPlace, job: &ResolvedPlace) -> LocationTier {
    if candidate.country_code == job.country_code {
        match (&candidate.city, &job.city) {
            (Some(a), Some(b)) if a == b => LocationTier::SameCity,
            // both name the country only
            (None, None) => LocationTier::SameCity,
            _ => LocationTier::SameCountry,
        }
    } else if candidate.region == job.region {
        LocationTier::SameRegion
    } else {
        LocationTier::Distant
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Extraction from resume text
// ────────────────────────────────────────────────────────────────────────────

static CUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)(?:based in|located in|living in|residing in|resident of|relocating to|location\s*:|address\s*:|city\s*:)\s*([\p{L}][\p{L} .'\-]*(?:,\s*[\p{L}][\p{L} .'\-]*){0,2})",
    )
    .expect("valid cue regex")
});

/// A line holding nothing but `Place, Place` (typical resume header).
static PLACE_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([\p{L}][\p{L} .'\-]{1,40},\s*[\p{L}][\p{L} .'\-]{1,40})\s*$")
        .expect("valid place line regex")
});

/// Best-effort location of the candidate as written in the resume.
///
/// Tries, in order: cue phrases ("based in Berlin"), standalone
/// `City, Country` lines, the earliest city mention, the earliest country
/// mention. Returns the resolved place in display form.
pub fn extract_location(gazetteer: &Gazetteer, text: &str) -> Option<String> {
    for caps in CUE_RE.captures_iter(text) {
        if let Some(place) = caps.get(1).and_then(|m| resolve(gazetteer, m.as_str())) {
            return Some(place.display());
        }
    }

    for line in text.lines() {
        if let Some(caps) = PLACE_LINE_RE.captures(line) {
            if let Some(place) = resolve(gazetteer, &caps[1]) {
                return Some(place.display());
            }
        }
    }

    scan(gazetteer, &location_key(text)).map(|place| place.display())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

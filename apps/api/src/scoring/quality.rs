//! Quality Evaluator — intrinsic resume quality, independent of any job.
//!
//! Five components, each 0–100:
//! - readability: Flesch reading ease, banded into penalty categories
//! - vocabulary diversity: moving-average type-token ratio
//! - structure: essential sections present, sections in conventional order
//! - action verbs: bullets opening with a strong verb vs. weak openers
//! - formatting: one bullet symbol, one date style, one heading style
//!
//! Missing sections lower the score; they never produce an error. Empty text
//! scores 0.

use std::collections::{BTreeSet, HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::scoring::normalizer::word_tokens;
use crate::scoring::weights::round2;

// ────────────────────────────────────────────────────────────────────────────
// Tuning tables
// ────────────────────────────────────────────────────────────────────────────

const READABILITY_WEIGHT: f64 = 0.25;
const DIVERSITY_WEIGHT: f64 = 0.15;
const STRUCTURE_WEIGHT: f64 = 0.30;
const ACTION_VERB_WEIGHT: f64 = 0.10;
const FORMATTING_WEIGHT: f64 = 0.20;

/// (upper bound exclusive, category, penalty) over the clamped Flesch score.
const READABILITY_BANDS: &[(f64, ReadabilityBand, f64)] = &[
    (50.0, ReadabilityBand::Unacceptable, 30.0),
    (60.0, ReadabilityBand::Poor, 15.0),
    (80.0, ReadabilityBand::Acceptable, 0.0),
    (f64::INFINITY, ReadabilityBand::Oversimplified, 10.0),
];

const MATTR_WINDOW: usize = 50;
/// A moving-average TTR at or above this value earns full diversity marks.
const DIVERSITY_CEILING: f64 = 0.75;

/// Essential sections and the points they are worth.
const ESSENTIAL_SECTIONS: &[(ResumeSection, f64)] = &[
    (ResumeSection::Contact, 15.0),
    (ResumeSection::Experience, 15.0),
    (ResumeSection::Education, 10.0),
    (ResumeSection::Skills, 10.0),
];

const ORDER_PENALTY_PER_INVERSION: f64 = 5.0;
const MAX_ORDER_PENALTY: f64 = 15.0;

/// Points per strong opener, per weak or missing opener, per repeated verb.
const ACTION_REWARD: f64 = 2.0;
const NON_ACTION_PENALTY: f64 = 1.0;
const DUPLICATE_PENALTY: f64 = 0.5;
/// Shorter fallback sentences are not treated as bullets.
const MIN_SENTENCE_CHARS: usize = 10;

/// Penalty per extra style, and the weight applied to it.
const BULLET_STYLE_PENALTY: (f64, f64) = (6.0, 1.0);
const DATE_STYLE_PENALTY: (f64, f64) = (8.0, 1.3);
const MIXED_HEADINGS_PENALTY: (f64, f64) = (8.0, 1.2);
const MAX_FORMAT_PENALTY: f64 = 30.0;

const ACTION_VERBS: &[&str] = &[
    "accelerated", "achieved", "analyzed", "architected", "authored", "automated", "built",
    "championed", "coached", "collaborated", "configured", "consolidated", "coordinated",
    "created", "cut", "debugged", "delivered", "deployed", "designed", "developed", "devised",
    "directed", "drove", "eliminated", "engineered", "established", "evaluated", "expanded",
    "generated", "grew", "guided", "headed", "identified", "implemented", "improved",
    "increased", "initiated", "integrated", "introduced", "launched", "led", "maintained",
    "managed", "mentored", "migrated", "modernized", "negotiated", "optimized", "orchestrated",
    "organized", "overhauled", "owned", "pioneered", "planned", "presented", "produced",
    "programmed", "published", "rebuilt", "redesigned", "reduced", "refactored", "resolved",
    "restructured", "saved", "scaled", "secured", "shipped", "simplified", "spearheaded",
    "streamlined", "strengthened", "supervised", "taught", "tested", "trained", "transformed",
    "tripled", "doubled", "upgraded", "wrote",
];

/// Openers that describe a duty rather than an achievement.
const NON_ACTION_STARTERS: &[&str] = &[
    "responsible", "duties", "working", "helping", "assisting", "supporting", "participating",
    "attending", "worked", "helped", "assisted", "tasked",
];

const MAX_HEADING_CHARS: usize = 40;
const MAX_HEADING_WORDS: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeSection {
    Contact,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Awards,
    Publications,
    Languages,
    Volunteer,
    Interests,
    References,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadabilityBand {
    Unacceptable,
    Poor,
    Acceptable,
    Oversimplified,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    /// 0 – 100
    pub score: f64,
    pub readability: f64,
    pub flesch_reading_ease: f64,
    pub readability_band: ReadabilityBand,
    pub vocabulary_diversity: f64,
    pub structure: f64,
    pub action_verbs: f64,
    pub formatting: f64,
    /// Duty-style bullet openers ("responsible", "helped") worth rewording.
    pub weak_openers: Vec<String>,
    pub sections_found: Vec<ResumeSection>,
    pub missing_sections: Vec<ResumeSection>,
}

impl QualityReport {
    fn empty() -> Self {
        Self {
            score: 0.0,
            readability: 0.0,
            flesch_reading_ease: 0.0,
            readability_band: ReadabilityBand::Unacceptable,
            vocabulary_diversity: 0.0,
            structure: 0.0,
            action_verbs: 0.0,
            formatting: 0.0,
            weak_openers: vec![],
            sections_found: vec![],
            missing_sections: ESSENTIAL_SECTIONS.iter().map(|(s, _)| *s).collect(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section patterns
// ────────────────────────────────────────────────────────────────────────────

/// Ideal order of appearance; also the precedence used when a heading matches
/// several patterns.
const SECTION_PATTERNS: &[(ResumeSection, &str)] = &[
    (
        ResumeSection::Contact,
        r"\b(contact|contact info(rmation)?|personal (info|details))\b",
    ),
    (
        ResumeSection::Summary,
        r"\b(summary|profile|objective|about me)\b",
    ),
    (
        ResumeSection::Experience,
        r"\b(experience|employment|(work|career|professional|employment) history)\b",
    ),
    (
        ResumeSection::Education,
        r"\b(education|academic|qualifications)\b",
    ),
    (
        ResumeSection::Skills,
        r"\b(skills|competencies|technologies|expertise|tech stack)\b",
    ),
    (ResumeSection::Projects, r"\b(projects|portfolio)\b"),
    (
        ResumeSection::Certifications,
        r"\b(certifications?|certificates|licen[sc]es)\b",
    ),
    (ResumeSection::Awards, r"\b(awards|honou?rs|achievements)\b"),
    (ResumeSection::Publications, r"\b(publications|papers)\b"),
    (ResumeSection::Languages, r"\blanguages\b"),
    (
        ResumeSection::Volunteer,
        r"\b(volunteer(ing)?|community service)\b",
    ),
    (ResumeSection::Interests, r"\b(interests|hobbies)\b"),
    (ResumeSection::References, r"\b(references|referees)\b"),
];

static SECTION_REGEXES: Lazy<Vec<(ResumeSection, Regex)>> = Lazy::new(|| {
    SECTION_PATTERNS
        .iter()
        .filter_map(|(section, pattern)| {
            Regex::new(&format!("(?i){pattern}"))
                .ok()
                .map(|re| (*section, re))
        })
        .collect()
});

static BULLET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([•\-*>–●◦○▪]|\d{1,2}[.)])\s+(.*\S)").expect("valid bullet regex")
});

/// (style name, pattern) for the date notations a resume may mix.
static DATE_STYLE_RES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        (
            "month_name",
            r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.? (?:19|20)\d{2}\b",
        ),
        ("month_slash", r"\b(?:0?[1-9]|1[0-2])/(?:19|20)\d{2}\b"),
        ("iso", r"\b(?:19|20)\d{2}-(?:0[1-9]|1[0-2])\b"),
    ]
    .into_iter()
    .filter_map(|(name, pattern)| Regex::new(pattern).ok().map(|re| (name, re)))
    .collect()
});

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\(?\d[\d\s().-]{8,}\d").expect("valid phone regex"));

fn ideal_index(section: ResumeSection) -> usize {
    SECTION_PATTERNS
        .iter()
        .position(|(s, _)| *s == section)
        .unwrap_or(SECTION_PATTERNS.len())
}

// ────────────────────────────────────────────────────────────────────────────
// Evaluation
// ────────────────────────────────────────────────────────────────────────────

/// Scores a normalized resume. Deterministic; empty text yields the minimum.
pub fn evaluate_quality(text: &str) -> QualityReport {
    let words = word_tokens(text);
    if words.is_empty() {
        return QualityReport::empty();
    }

    let flesch = flesch_reading_ease(text, &words);
    let (readability_band, penalty) = readability_band(flesch);
    let readability = (100.0 - penalty).clamp(0.0, 100.0);

    let vocabulary_diversity = vocabulary_diversity(&words);

    let sections = detect_sections(text);
    let (structure, missing_sections) = structure_score(text, &sections);

    let (action_verbs, weak_openers) = action_verb_score(text);
    let formatting = formatting_score(text, &sections);

    let score = READABILITY_WEIGHT * readability
        + DIVERSITY_WEIGHT * vocabulary_diversity
        + STRUCTURE_WEIGHT * structure
        + ACTION_VERB_WEIGHT * action_verbs
        + FORMATTING_WEIGHT * formatting;

    let mut sections_found: Vec<ResumeSection> = sections.iter().map(|(s, _)| *s).collect();
    sections_found.sort();
    sections_found.dedup();

    QualityReport {
        score: round2(score.clamp(0.0, 100.0)),
        readability: round2(readability),
        flesch_reading_ease: round2(flesch),
        readability_band,
        vocabulary_diversity: round2(vocabulary_diversity),
        structure: round2(structure),
        action_verbs: round2(action_verbs),
        formatting: round2(formatting),
        weak_openers,
        sections_found,
        missing_sections,
    }
}

/// Flesch reading ease clamped to 0–100. Line breaks count as sentence ends:
/// resume bullets rarely carry terminal punctuation.
fn flesch_reading_ease(text: &str, words: &[String]) -> f64 {
    let sentences = text
        .split(['.', '!', '?', '\n', ';'])
        .filter(|s| s.chars().any(|c| c.is_alphabetic()))
        .count()
        .max(1);
    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();

    let words_per_sentence = words.len() as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words.len() as f64;
    (206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word).clamp(0.0, 100.0)
}

fn readability_band(flesch: f64) -> (ReadabilityBand, f64) {
    READABILITY_BANDS
        .iter()
        .find(|(upper, _, _)| flesch < *upper)
        .map(|(_, band, penalty)| (*band, *penalty))
        .unwrap_or((ReadabilityBand::Oversimplified, 10.0))
}

/// Vowel-group heuristic with a silent trailing `e`. Digits and symbols count as
/// one syllable.
fn count_syllables(word: &str) -> usize {
    let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.is_empty() {
        return 1;
    }
    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');

    let mut groups = 0;
    let mut prev_vowel = false;
    for &c in &letters {
        let vowel = is_vowel(c);
        if vowel && !prev_vowel {
            groups += 1;
        }
        prev_vowel = vowel;
    }

    let n = letters.len();
    if n > 2 && letters[n - 1] == 'e' && letters[n - 2] != 'l' && !is_vowel(letters[n - 2]) {
        groups -= 1;
    }
    groups.max(1)
}

/// Moving-average type-token ratio scaled to 0–100.
fn vocabulary_diversity(words: &[String]) -> f64 {
    let ratio = if words.len() <= MATTR_WINDOW {
        let unique: HashSet<&String> = words.iter().collect();
        unique.len() as f64 / words.len() as f64
    } else {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for w in &words[..MATTR_WINDOW] {
            *counts.entry(w.as_str()).or_default() += 1;
        }
        let mut total = counts.len() as f64 / MATTR_WINDOW as f64;
        let windows = words.len() - MATTR_WINDOW + 1;
        for i in 1..windows {
            let outgoing = words[i - 1].as_str();
            if let Some(count) = counts.get_mut(outgoing) {
                *count -= 1;
                if *count == 0 {
                    counts.remove(outgoing);
                }
            }
            *counts.entry(words[i + MATTR_WINDOW - 1].as_str()).or_default() += 1;
            total += counts.len() as f64 / MATTR_WINDOW as f64;
        }
        total / windows as f64
    };
    (ratio / DIVERSITY_CEILING * 100.0).clamp(0.0, 100.0)
}

/// Returns `(section, line_index)` for every heading-like line.
pub(crate) fn detect_sections(text: &str) -> Vec<(ResumeSection, usize)> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let heading = line
                .trim()
                .trim_start_matches(['•', '-', '*', '#', '>'])
                .trim()
                .trim_end_matches(':')
                .trim();
            if heading.is_empty()
                || heading.chars().count() > MAX_HEADING_CHARS
                || heading.split_whitespace().count() > MAX_HEADING_WORDS
            {
                return None;
            }
            SECTION_REGEXES
                .iter()
                .find(|(_, re)| re.is_match(heading))
                .map(|(section, _)| (*section, idx))
        })
        .collect()
}

fn structure_score(text: &str, sections: &[(ResumeSection, usize)]) -> (f64, Vec<ResumeSection>) {
    let found: HashSet<ResumeSection> = sections.iter().map(|(s, _)| *s).collect();
    let has_contact_details = EMAIL_RE.is_match(text) || PHONE_RE.is_match(text);

    let total: f64 = ESSENTIAL_SECTIONS.iter().map(|(_, w)| w).sum();
    let mut earned = 0.0;
    let mut missing = Vec::new();
    for (section, weight) in ESSENTIAL_SECTIONS {
        let present = found.contains(section)
            || (*section == ResumeSection::Contact && has_contact_details);
        if present {
            earned += weight;
        } else {
            missing.push(*section);
        }
    }

    // First occurrence of each section, in document order.
    let mut order: Vec<ResumeSection> = Vec::new();
    for (section, _) in sections {
        if !order.contains(section) {
            order.push(*section);
        }
    }
    let mut inversions = 0;
    for (i, a) in order.iter().enumerate() {
        for b in &order[i + 1..] {
            if ideal_index(*a) > ideal_index(*b) {
                inversions += 1;
            }
        }
    }
    let order_penalty = (inversions as f64 * ORDER_PENALTY_PER_INVERSION).min(MAX_ORDER_PENALTY);

    let score = (earned / total * 100.0 - order_penalty).clamp(0.0, 100.0);
    (score, missing)
}

// ────────────────────────────────────────────────────────────────────────────
// Action verbs
// ────────────────────────────────────────────────────────────────────────────

/// Bullet bodies. Without any bullet markers, sentences stand in for bullets.
fn bullet_points(text: &str) -> Vec<&str> {
    let bullets: Vec<&str> = text
        .lines()
        .filter_map(|line| BULLET_RE.captures(line))
        .filter_map(|caps| caps.get(2).map(|m| m.as_str()))
        .collect();
    if !bullets.is_empty() {
        return bullets;
    }
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .collect()
}

/// 50 is neutral; strong openers push towards 100, weak or missing ones and
/// repeated verbs towards 0. Also returns the duty-style openers found.
fn action_verb_score(text: &str) -> (f64, Vec<String>) {
    let bullets = bullet_points(text);
    if bullets.is_empty() {
        return (50.0, Vec::new());
    }

    let mut strong: HashMap<String, usize> = HashMap::new();
    let mut weak: BTreeSet<String> = BTreeSet::new();
    let mut non_action = 0usize;
    for bullet in &bullets {
        let opener = bullet
            .split(|c: char| !c.is_alphabetic())
            .find(|w| !w.is_empty())
            .map(str::to_lowercase);
        match opener {
            Some(verb) if ACTION_VERBS.contains(&verb.as_str()) => {
                *strong.entry(verb).or_default() += 1;
            }
            Some(verb) if NON_ACTION_STARTERS.contains(&verb.as_str()) => {
                weak.insert(verb);
                non_action += 1;
            }
            _ => non_action += 1,
        }
    }

    let strong_count: usize = strong.values().sum();
    let duplicates: usize = strong.values().map(|n| n - 1).sum();
    let raw = strong_count as f64 * ACTION_REWARD
        - non_action as f64 * NON_ACTION_PENALTY
        - duplicates as f64 * DUPLICATE_PENALTY;
    let score = (50.0 + raw * 100.0 / (bullets.len() as f64 * 2.0)).clamp(0.0, 100.0);
    (score, weak.into_iter().collect())
}

// ────────────────────────────────────────────────────────────────────────────
// Formatting consistency
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum HeadingStyle {
    AllCaps,
    TitleCase,
    Other,
}

fn heading_style(heading: &str) -> HeadingStyle {
    let letters: Vec<char> = heading.chars().filter(|c| c.is_alphabetic()).collect();
    if !letters.is_empty() && letters.iter().all(|c| c.is_uppercase()) {
        return HeadingStyle::AllCaps;
    }
    let title = heading
        .split_whitespace()
        .filter(|w| w.chars().any(char::is_alphabetic))
        .all(|w| w.chars().next().is_some_and(char::is_uppercase));
    if title {
        HeadingStyle::TitleCase
    } else {
        HeadingStyle::Other
    }
}

/// 100 minus weighted penalties for mixed bullet symbols, mixed date
/// notations and mixed heading capitalisation.
fn formatting_score(text: &str, sections: &[(ResumeSection, usize)]) -> f64 {
    let bullet_styles: HashSet<String> = text
        .lines()
        .filter_map(|line| BULLET_RE.captures(line))
        .filter_map(|caps| caps.get(1))
        .map(|m| {
            let symbol = m.as_str();
            if symbol.starts_with(|c: char| c.is_ascii_digit()) {
                "numbered".to_string()
            } else {
                symbol.to_string()
            }
        })
        .collect();

    let date_styles = DATE_STYLE_RES
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .count();

    let lines: Vec<&str> = text.lines().collect();
    let heading_styles: HashSet<HeadingStyle> = sections
        .iter()
        .filter_map(|(_, idx)| lines.get(*idx))
        .map(|line| heading_style(line.trim().trim_end_matches(':')))
        .collect();

    let penalty = |extra: usize, (per, weight): (f64, f64)| {
        (extra as f64 * per).min(MAX_FORMAT_PENALTY) * weight
    };
    let total = penalty(bullet_styles.len().saturating_sub(1), BULLET_STYLE_PENALTY)
        + penalty(date_styles.saturating_sub(1), DATE_STYLE_PENALTY)
        + penalty(usize::from(heading_styles.len() > 1), MIXED_HEADINGS_PENALTY);
    (100.0 - total).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "Jane Doe\njane.doe@example.com | +49 30 1234 5678\n\nSummary\nBackend engineer who builds reliable payment systems.\n\nExperience\nSenior Engineer, Acme GmbH, 2019 - Present\n- Designed a ledger service that processes four million events per day.\n- Mentored five engineers and led the migration to Kubernetes.\n\nEducation\nBSc Computer Science, TU Berlin, 2015\n\nSkills\nRust, Python, PostgreSQL, Kafka";

    #[test]
    fn test_empty_text_scores_minimum() {
        let report = evaluate_quality("");
        assert_eq!(report.score, 0.0);
        assert_eq!(report.missing_sections.len(), ESSENTIAL_SECTIONS.len());
    }

    #[test]
    fn test_punctuation_only_scores_minimum() {
        assert_eq!(evaluate_quality("... --- !!!").score, 0.0);
    }

    #[test]
    fn test_well_formed_resume_finds_all_essentials() {
        let report = evaluate_quality(WELL_FORMED);
        assert!(report.missing_sections.is_empty(), "{:?}", report.missing_sections);
        assert!(report.sections_found.contains(&ResumeSection::Experience));
        assert_eq!(report.structure, 100.0);
    }

    #[test]
    fn test_structured_resume_beats_unstructured_blob() {
        let blob = "did stuff did stuff did stuff did stuff did stuff did stuff";
        let structured = evaluate_quality(WELL_FORMED);
        let unstructured = evaluate_quality(blob);
        assert!(
            structured.score > unstructured.score,
            "{} vs {}",
            structured.score,
            unstructured.score
        );
    }

    #[test]
    fn test_missing_sections_reduce_but_do_not_fail() {
        let text = "Experience\nBuilt a search engine in Rust.";
        let report = evaluate_quality(text);
        assert!(report.missing_sections.contains(&ResumeSection::Education));
        assert!(report.missing_sections.contains(&ResumeSection::Skills));
        assert!(report.structure < 100.0);
        assert!(report.score > 0.0);
    }

    #[test]
    fn test_out_of_order_sections_are_penalized() {
        let ordered = "a@b.io\nExperience\nx\nEducation\ny\nSkills\nz";
        let reversed = "a@b.io\nSkills\nz\nEducation\ny\nExperience\nx";
        let (ordered_score, _) = structure_score(ordered, &detect_sections(ordered));
        let (reversed_score, _) = structure_score(reversed, &detect_sections(reversed));
        assert_eq!(ordered_score, 100.0);
        assert_eq!(reversed_score, 100.0 - MAX_ORDER_PENALTY);
    }

    #[test]
    fn test_long_lines_are_not_headings() {
        let text = "I have plenty of experience shipping software to production every week";
        assert!(detect_sections(text).is_empty());
    }

    #[test]
    fn test_scores_are_bounded() {
        let samples = [
            "a",
            "Supercalifragilisticexpialidocious antidisestablishmentarianism",
            WELL_FORMED,
            "go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go go",
        ];
        for text in samples {
            let r = evaluate_quality(text);
            for v in [
                r.score,
                r.readability,
                r.vocabulary_diversity,
                r.structure,
                r.flesch_reading_ease,
                r.action_verbs,
                r.formatting,
            ] {
                assert!((0.0..=100.0).contains(&v), "{v} out of range for {text:?}");
            }
        }
    }

    #[test]
    fn test_repetition_lowers_diversity() {
        let repetitive: Vec<String> = std::iter::repeat("python".to_string()).take(80).collect();
        let varied = word_tokens(WELL_FORMED);
        assert!(vocabulary_diversity(&repetitive) < vocabulary_diversity(&varied));
    }

    #[test]
    fn test_well_formed_resume_has_clean_bullets_and_formatting() {
        let report = evaluate_quality(WELL_FORMED);
        assert_eq!(report.action_verbs, 100.0);
        assert_eq!(report.formatting, 100.0);
        assert!(report.weak_openers.is_empty());
    }

    #[test]
    fn test_strong_openers_beat_duty_openers() {
        let strong = "Experience\n- Built a billing pipeline in Rust\n- Reduced latency by 40%\n- Led a team of four";
        let weak = "Experience\n- Responsible for the billing pipeline\n- Helped with latency work\n- Worked on team projects";

        assert_eq!(action_verb_score(strong).0, 100.0);
        let (score, openers) = action_verb_score(weak);
        assert_eq!(score, 0.0);
        assert_eq!(openers, vec!["helped", "responsible", "worked"]);
    }

    #[test]
    fn test_repeated_verbs_cost_points() {
        let repeated = "- Built x\n- Built y\n- Worked on z\n- Handled w";
        let varied = "- Built x\n- Designed y\n- Worked on z\n- Handled w";
        // (2*2 - 2*1 - 0.5) * 100 / 8 and (2*2 - 2*1) * 100 / 8, around 50
        assert_eq!(action_verb_score(repeated).0, 68.75);
        assert_eq!(action_verb_score(varied).0, 75.0);
    }

    #[test]
    fn test_sentences_stand_in_for_missing_bullets() {
        let text = "Designed the payments platform. Handled customer emails daily.";
        assert_eq!(action_verb_score(text).0, 75.0);
    }

    #[test]
    fn test_mixed_formatting_is_penalized() {
        let text = "Experience\n- Built x\n• Designed y\nJan 2020 - Mar 2021\n03/2021 - 05/2022\nEDUCATION\nBSc";
        // bullets 6 * 1.0, dates 8 * 1.3, headings 8 * 1.2
        let score = formatting_score(text, &detect_sections(text));
        assert!((score - 74.0).abs() < 1e-9, "{score}");

        let consistent = "Experience\n- Built x\n- Designed y\nJan 2020 - Mar 2021\nEducation\nBSc";
        assert_eq!(formatting_score(consistent, &detect_sections(consistent)), 100.0);
    }

    #[test]
    fn test_heading_styles() {
        assert_eq!(heading_style("WORK EXPERIENCE"), HeadingStyle::AllCaps);
        assert_eq!(heading_style("Work Experience"), HeadingStyle::TitleCase);
        assert_eq!(heading_style("Work experience"), HeadingStyle::Other);
    }

    #[test]
    fn test_syllable_heuristic() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("table"), 2);
        assert_eq!(count_syllables("engineering"), 4);
        assert_eq!(count_syllables("2019"), 1);
    }

    #[test]
    fn test_is_deterministic() {
        let a = evaluate_quality(WELL_FORMED);
        let b = evaluate_quality(WELL_FORMED);
        assert_eq!(a.score, b.score);
    }
}

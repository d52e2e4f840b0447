//! Semantic analyzer
//!
//! Judges what a name means using word lists and a `ConceptSource` for
//! word associations. Related words make a name coherent; an unrelated
//! pairing of known words counts as a creative juxtaposition. Two words that
//! are synonyms of each other say the same thing twice and cost uniqueness.
//!
//! Reports: `semantic_coherence`, `creativity`, `uniqueness`,
//! `appropriateness`, `cultural_appeal`, `genre_optimization`, `market_appeal`.

use super::text::{content_words, letters, words};
use crate::math::mean;
use crate::models::{Audience, Genre, NameContext, ScoreField};
use crate::types::{AnalyzerError, ConceptSource, NameAnalyzer, PartialScoreBreakdown, RelatedConcept};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

const FIELDS: &[ScoreField] = &[
    ScoreField::SemanticCoherence,
    ScoreField::Creativity,
    ScoreField::Uniqueness,
    ScoreField::Appropriateness,
    ScoreField::CulturalAppeal,
    ScoreField::GenreOptimization,
    ScoreField::MarketAppeal,
];

/// Everyday words; names built only from these read as familiar
const COMMON_WORDS: &[&str] = &[
    "love", "heart", "night", "day", "time", "life", "world", "man", "girl", "boy", "baby",
    "home", "road", "light", "dark", "fire", "rain", "sun", "moon", "star", "blue", "red",
    "black", "white", "gold", "dream", "soul", "king", "queen", "city", "street", "river",
    "sky", "summer", "winter", "song", "band", "rock", "wild", "young", "old", "new", "good",
    "bad", "big", "little", "sweet", "angel", "forever", "tears", "kiss", "dance", "party",
    "money", "girls", "boys", "nights", "days", "hearts", "dreams", "stars",
];

/// Over-used band/song vocabulary
const CLICHES: &[&str] = &[
    "love", "heart", "baby", "dream", "soul", "fire", "angel", "forever", "tears", "night",
    "rain", "star", "kiss", "dance", "party", "hearts", "dreams", "stars",
];

const PROFANITY_STRONG: &[&str] = &["fuck", "fucking", "shit", "cunt", "bitch", "bastard"];
const PROFANITY_MILD: &[&str] = &["damn", "hell", "crap", "piss", "bloody", "sucks"];
const DARK_THEMES: &[&str] = &["kill", "death", "dead", "gore", "corpse", "blood", "murder", "suicide"];

/// Words that signal a genre
fn genre_keywords(genre: &Genre) -> &'static [&'static str] {
    match genre {
        Genre::Rock => &["stone", "rebel", "wild", "thunder", "road", "fire", "electric", "roll"],
        Genre::Pop => &["love", "heart", "star", "dream", "sugar", "neon", "candy", "shine"],
        Genre::Metal => &["iron", "steel", "black", "death", "doom", "blood", "storm", "blade", "chrome", "skull", "void", "fury"],
        Genre::Jazz => &["blue", "velvet", "smoke", "midnight", "swing", "lounge", "brass"],
        Genre::Electronic => &["neon", "pulse", "circuit", "synth", "digital", "wave", "signal", "static"],
        Genre::Folk => &["river", "pine", "meadow", "hollow", "wander", "harvest", "forest"],
        Genre::HipHop => &["gold", "crown", "street", "flow", "city", "king", "hustle"],
        Genre::Indie => &["paper", "glass", "ghost", "bicycle", "cardigan", "polaroid", "echo"],
        Genre::Classical => &["sonata", "aria", "opus", "nocturne", "requiem", "chorus"],
        Genre::Country => &["whiskey", "dust", "highway", "porch", "dirt", "honky"],
        Genre::Punk => &["riot", "noise", "rage", "static", "brat", "spit"],
        Genre::Experimental => &["static", "cipher", "void", "signal", "drift", "noise"],
        Genre::Other(_) | Genre::Unspecified => &[],
    }
}

/// Uniqueness lost per synonym pair, and the most it can cost in total
const REDUNDANCY_PENALTY: f64 = 0.15;
const MAX_REDUNDANCY_PENALTY: f64 = 0.30;

/// Word-association semantic analyzer
pub struct SemanticAnalyzer {
    concepts: Arc<dyn ConceptSource>,
    related_limit: usize,
    synonym_limit: usize,
}

impl SemanticAnalyzer {
    pub fn new(concepts: Arc<dyn ConceptSource>) -> Self {
        Self {
            concepts,
            related_limit: 20,
            synonym_limit: 10,
        }
    }

    /// Word pairs where one is listed as a synonym of the other
    fn redundant_pairs(content: &[String], synonyms: &[Vec<String>]) -> usize {
        let mut pairs = 0;
        for i in 0..content.len() {
            for j in (i + 1)..content.len() {
                if synonyms[i].contains(&content[j]) || synonyms[j].contains(&content[i]) {
                    pairs += 1;
                }
            }
        }
        pairs
    }

    /// Association strength between two content words (0.0-1.0)
    fn pair_link(a: &str, b: &str, ra: &[RelatedConcept], rb: &[RelatedConcept]) -> f64 {
        let weight_in = |list: &[RelatedConcept], word: &str| {
            list.iter()
                .filter(|r| r.word == word)
                .map(|r| r.weight)
                .fold(0.0_f64, f64::max)
        };
        let direct = weight_in(ra, b).max(weight_in(rb, a));
        let shared = ra
            .iter()
            .filter_map(|x| {
                rb.iter()
                    .find(|y| y.word == x.word)
                    .map(|y| x.weight.min(y.weight))
            })
            .fold(0.0_f64, f64::max);
        direct.max(0.8 * shared)
    }

    fn appropriateness(content: &[String], ctx: &NameContext) -> f64 {
        let count = |list: &[&str]| content.iter().filter(|w| list.contains(&w.as_str())).count() as f64;
        let strong = count(PROFANITY_STRONG);
        let mild = count(PROFANITY_MILD);
        let dark = count(DARK_THEMES);

        let dark_tolerant = matches!(
            ctx.genre,
            Genre::Metal | Genre::Punk | Genre::Experimental
        );
        let sensitive_audience = matches!(
            ctx.target_audience,
            Audience::Youth | Audience::Mainstream
        );
        let audience_factor = if sensitive_audience { 2.0 } else { 1.0 };

        let mut penalty = 0.6 * strong + 0.2 * mild * audience_factor;
        if !dark_tolerant {
            penalty += 0.1 * dark * audience_factor;
        }
        1.0 - penalty
    }

    fn genre_optimization(content: &[String], related: &[Vec<RelatedConcept>], genre: &Genre) -> f64 {
        let keywords = genre_keywords(genre);
        if keywords.is_empty() {
            return 0.5;
        }
        let hits: f64 = content
            .iter()
            .zip(related)
            .map(|(w, rel)| {
                if keywords.contains(&w.as_str()) {
                    1.0
                } else if rel.iter().any(|r| keywords.contains(&r.word.as_str())) {
                    0.5
                } else {
                    0.0
                }
            })
            .sum();
        0.35 + 0.3 * hits.min(2.0)
    }

    fn market_appeal(all_words: &[String], letter_count: usize, relatable: f64) -> f64 {
        let word_count_score = match all_words.len() {
            1..=3 => 1.0,
            4 => 0.6,
            _ => 0.3,
        };
        let length_score = match letter_count {
            4..=16 => 1.0,
            17..=24 => 0.6,
            _ => 0.3,
        };
        0.2 + 0.3 * word_count_score + 0.25 * length_score + 0.25 * relatable
    }
}

#[async_trait]
impl NameAnalyzer for SemanticAnalyzer {
    fn name(&self) -> &'static str {
        "semantic"
    }

    fn fields(&self) -> &'static [ScoreField] {
        FIELDS
    }

    async fn analyze(
        &self,
        name: &str,
        ctx: &NameContext,
    ) -> Result<PartialScoreBreakdown, AnalyzerError> {
        let all_words = words(name);
        if all_words.is_empty() {
            return Err(AnalyzerError::UnsupportedInput(format!(
                "'{}' contains no words",
                name
            )));
        }
        let mut content = content_words(&all_words);
        if content.is_empty() {
            content = all_words.clone();
        }

        let mut related = Vec::with_capacity(content.len());
        let mut synonyms = Vec::with_capacity(content.len());
        for word in &content {
            related.push(self.concepts.related_concepts(word, self.related_limit).await);
            let syns = self.concepts.synonyms(word, self.synonym_limit).await;
            synonyms.push(syns.into_iter().map(|s| s.to_lowercase()).collect::<Vec<_>>());
        }
        let redundant = Self::redundant_pairs(&content, &synonyms);

        let n = content.len() as f64;
        let known = related.iter().filter(|r| !r.is_empty()).count() as f64;
        let is_common = |w: &String| COMMON_WORDS.contains(&w.as_str());
        let common = content.iter().filter(|w| is_common(w)).count() as f64;
        let cliches = content.iter().filter(|w| CLICHES.contains(&w.as_str())).count() as f64;

        let mut pair_scores = Vec::new();
        let mut juxtaposition = false;
        for i in 0..content.len() {
            for j in (i + 1)..content.len() {
                let link = Self::pair_link(&content[i], &content[j], &related[i], &related[j]);
                if link == 0.0 && !related[i].is_empty() && !related[j].is_empty() {
                    juxtaposition = true;
                }
                pair_scores.push(link);
            }
        }

        let coherence = if pair_scores.is_empty() {
            0.6 + 0.2 * known
        } else {
            0.35 + 0.6 * mean(&pair_scores)
        };

        let creativity = 0.3
            + 0.5 * ((n - common) / n)
            + if juxtaposition { 0.2 } else { 0.0 };

        let starts_with_the = all_words.first().map_or(false, |w| w == "the");
        let uniqueness = 0.85
            - 0.5 * (cliches / n)
            - if starts_with_the { 0.1 } else { 0.0 }
            - if content.len() == 1 && common > 0.0 { 0.15 } else { 0.0 }
            - (REDUNDANCY_PENALTY * redundant as f64).min(MAX_REDUNDANCY_PENALTY);

        let name_letters = letters(name).len();
        let non_ascii = name.chars().any(|c| c.is_alphabetic() && !c.is_ascii());
        let has_digits = name.chars().any(|c| c.is_ascii_digit());
        let cultural_appeal = 0.45 + 0.25 * (known / n) + 0.15 * (common / n)
            + if non_ascii { 0.0 } else { 0.15 }
            - if has_digits { 0.1 } else { 0.0 };

        let relatable = ((common + known) / n).min(1.0);

        debug!(
            name = %name,
            source = self.concepts.name(),
            known_words = known as usize,
            juxtaposition,
            redundant,
            "Semantic analysis complete"
        );

        Ok(PartialScoreBreakdown::new(self.name(), 0.55 + 0.3 * (known / n))
            .with(ScoreField::SemanticCoherence, coherence)
            .with(ScoreField::Creativity, creativity)
            .with(ScoreField::Uniqueness, uniqueness)
            .with(ScoreField::Appropriateness, Self::appropriateness(&content, ctx))
            .with(ScoreField::CulturalAppeal, cultural_appeal)
            .with(
                ScoreField::GenreOptimization,
                Self::genre_optimization(&content, &related, &ctx.genre),
            )
            .with(
                ScoreField::MarketAppeal,
                Self::market_appeal(&all_words, name_letters, relatable),
            ))
    }
}

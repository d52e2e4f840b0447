//! Phonetic/rhythm analyzer
//!
//! Scores how a name sounds from its spelling alone: vowel/consonant
//! alternation, syllable rhythm, consonant clusters and sound devices
//! (alliteration, end rhyme).
//!
//! Reports: `phonetic_flow`, `pronunciation`, `memorability`.

use super::text::{consonant_runs, content_words, is_vowel, letters, syllables, words};
use crate::math::std_dev;
use crate::models::{NameContext, ScoreField};
use crate::types::{AnalyzerError, NameAnalyzer, PartialScoreBreakdown};
use async_trait::async_trait;

const FIELDS: &[ScoreField] = &[
    ScoreField::PhoneticFlow,
    ScoreField::Pronunciation,
    ScoreField::Memorability,
];

/// Spelling-based phonetic analyzer
#[derive(Debug, Clone)]
pub struct PhoneticAnalyzer {
    base_confidence: f64,
}

impl Default for PhoneticAnalyzer {
    fn default() -> Self {
        Self {
            base_confidence: 0.85,
        }
    }
}

impl PhoneticAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    fn phonetic_flow(word_letters: &[Vec<char>], sylls: &[f64]) -> f64 {
        let mut transitions = 0usize;
        let mut pairs = 0usize;
        for w in word_letters {
            for pair in w.windows(2) {
                pairs += 1;
                if is_vowel(pair[0]) != is_vowel(pair[1]) {
                    transitions += 1;
                }
            }
        }
        let alternation = if pairs == 0 {
            0.5
        } else {
            transitions as f64 / pairs as f64
        };
        let rhythm = 1.0 - (std_dev(sylls) / 2.0).min(1.0);
        let soft_ending = word_letters
            .last()
            .and_then(|w| w.last())
            .map_or(false, |&c| is_vowel(c) || matches!(c, 'l' | 'm' | 'n' | 'r'));

        0.25 + 0.45 * alternation + 0.2 * rhythm + if soft_ending { 0.1 } else { 0.0 }
    }

    fn pronunciation(word_letters: &[Vec<char>]) -> f64 {
        let mut score = 1.0;
        for w in word_letters {
            let hard_clusters = consonant_runs(w).iter().filter(|&&r| r >= 3).count();
            score -= 0.12 * hard_clusters as f64;
            score -= 0.05 * w.iter().filter(|c| matches!(c, 'q' | 'x' | 'z' | 'j')).count() as f64;
            if w.len() > 10 {
                score -= 0.1;
            }
            if w.len() > 1 && !w.iter().any(|&c| is_vowel(c)) {
                score -= 0.15;
            }
        }
        score
    }

    fn memorability(all_words: &[String], word_letters: &[Vec<char>], total_syllables: usize) -> f64 {
        let syllable_score = match total_syllables {
            2..=4 => 1.0,
            1 | 5 => 0.7,
            6 => 0.5,
            _ => 0.3,
        };

        let content = content_words(all_words);
        let initials: Vec<char> = content.iter().filter_map(|w| w.chars().next()).collect();
        let alliteration = initials
            .iter()
            .enumerate()
            .any(|(i, c)| initials[i + 1..].contains(c));

        let endings: Vec<String> = content
            .iter()
            .filter(|w| w.chars().count() >= 3)
            .map(|w| w.chars().rev().take(2).collect())
            .collect();
        let rhyme = endings
            .iter()
            .enumerate()
            .any(|(i, e)| endings[i + 1..].contains(e));

        let total_letters: usize = word_letters.iter().map(Vec::len).sum();
        let brevity = match total_letters {
            0..=12 => 1.0,
            13..=20 => 0.5,
            _ => 0.0,
        };

        0.15 + 0.4 * syllable_score
            + if alliteration { 0.15 } else { 0.0 }
            + if rhyme { 0.1 } else { 0.0 }
            + 0.2 * brevity
    }
}

#[async_trait]
impl NameAnalyzer for PhoneticAnalyzer {
    fn name(&self) -> &'static str {
        "phonetic"
    }

    fn fields(&self) -> &'static [ScoreField] {
        FIELDS
    }

    async fn analyze(
        &self,
        name: &str,
        _ctx: &NameContext,
    ) -> Result<PartialScoreBreakdown, AnalyzerError> {
        let all_words = words(name);
        let word_letters: Vec<Vec<char>> = all_words
            .iter()
            .map(|w| letters(w))
            .filter(|l| !l.is_empty())
            .collect();

        if word_letters.is_empty() {
            return Err(AnalyzerError::UnsupportedInput(format!(
                "'{}' contains no letters",
                name
            )));
        }

        let sylls: Vec<f64> = all_words
            .iter()
            .map(|w| syllables(w))
            .filter(|&s| s > 0)
            .map(|s| s as f64)
            .collect();
        let total_syllables = sylls.iter().sum::<f64>() as usize;

        Ok(PartialScoreBreakdown::new(self.name(), self.base_confidence)
            .with(
                ScoreField::PhoneticFlow,
                Self::phonetic_flow(&word_letters, &sylls),
            )
            .with(ScoreField::Pronunciation, Self::pronunciation(&word_letters))
            .with(
                ScoreField::Memorability,
                Self::memorability(&all_words, &word_letters, total_syllables),
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NameType;

    async fn score(name: &str) -> PartialScoreBreakdown {
        PhoneticAnalyzer::new()
            .analyze(name, &NameContext::new(NameType::Band))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_reports_all_declared_fields() {
        let p = score("Velvet Static").await;
        for field in FIELDS {
            let v = p.get(*field).unwrap();
            assert!((0.0..=1.0).contains(&v));
        }
        assert_eq!(p.source, "phonetic");
    }

    #[tokio::test]
    async fn test_clusters_hurt_pronunciation() {
        let easy = score("Aria Lune").await;
        let hard = score("Strngth Krwx").await;
        assert!(
            easy.get(ScoreField::Pronunciation).unwrap()
                > hard.get(ScoreField::Pronunciation).unwrap()
        );
    }

    #[tokio::test]
    async fn test_alliteration_helps_memorability() {
        let alliterative = score("Neon Nights").await;
        let plain = score("Neon Lights").await;
        assert!(
            alliterative.get(ScoreField::Memorability).unwrap()
                > plain.get(ScoreField::Memorability).unwrap()
        );
    }

    #[tokio::test]
    async fn test_no_letters_is_unsupported() {
        let err = PhoneticAnalyzer::new()
            .analyze("1234", &NameContext::new(NameType::Song))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::UnsupportedInput(_)));
    }
}

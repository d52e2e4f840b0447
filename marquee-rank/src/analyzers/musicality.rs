//! Musicality synergy analyzer
//!
//! Compares the sound of a name with the mood and genre it is meant for.
//! Two sound features are derived from the spelling:
//! - **brightness**: share of front vowels (e, i) among vowels
//! - **hardness**: share of plosives/sibilants among consonants
//!
//! Each mood has a target (brightness, hardness); alignment is one minus the
//! normalized distance to that target. Without a mood the alignment is
//! neutral and reported with low confidence.
//!
//! Reports: `phonetic_semantic_alignment`, plus `genre_optimization` when a
//! known genre is present.

use super::text::{is_vowel, letters};
use crate::models::{Genre, Mood, NameContext, ScoreField};
use crate::types::{AnalyzerError, NameAnalyzer, PartialScoreBreakdown};
use async_trait::async_trait;

const FIELDS: &[ScoreField] = &[
    ScoreField::PhoneticSemanticAlignment,
    ScoreField::GenreOptimization,
];

/// (brightness, hardness) a mood sounds like
fn mood_target(mood: &Mood) -> Option<(f64, f64)> {
    match mood {
        Mood::Dark => Some((0.2, 0.7)),
        Mood::Mysterious => Some((0.3, 0.4)),
        Mood::Melancholic => Some((0.3, 0.3)),
        Mood::Mellow => Some((0.5, 0.2)),
        Mood::Romantic => Some((0.6, 0.2)),
        Mood::Happy => Some((0.8, 0.4)),
        Mood::Uplifting => Some((0.8, 0.5)),
        Mood::Energetic => Some((0.7, 0.8)),
        Mood::Aggressive => Some((0.3, 0.9)),
        Mood::Other(_) | Mood::Unspecified => None,
    }
}

/// Hardness a genre's names typically carry
fn genre_hardness(genre: &Genre) -> Option<f64> {
    match genre {
        Genre::Metal | Genre::Punk => Some(0.75),
        Genre::Rock | Genre::HipHop => Some(0.6),
        Genre::Electronic | Genre::Experimental => Some(0.5),
        Genre::Pop | Genre::Country | Genre::Indie => Some(0.4),
        Genre::Jazz | Genre::Folk | Genre::Classical => Some(0.25),
        Genre::Other(_) | Genre::Unspecified => None,
    }
}

fn is_hard(c: char) -> bool {
    matches!(c, 'p' | 'b' | 't' | 'd' | 'k' | 'g' | 'c' | 'q' | 'x' | 'z' | 's')
}

/// Sound-to-context fit analyzer
#[derive(Debug, Clone, Default)]
pub struct MusicalityAnalyzer;

impl MusicalityAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// (brightness, hardness) of a name's spelling
    pub fn sound_profile(name: &str) -> Option<(f64, f64)> {
        let chars = letters(name);
        if chars.is_empty() {
            return None;
        }
        let vowels: Vec<char> = chars.iter().copied().filter(|&c| is_vowel(c)).collect();
        let consonants: Vec<char> = chars.iter().copied().filter(|&c| !is_vowel(c)).collect();

        let brightness = if vowels.is_empty() {
            0.5
        } else {
            vowels.iter().filter(|&&c| matches!(c, 'e' | 'i' | 'y')).count() as f64
                / vowels.len() as f64
        };
        let hardness = if consonants.is_empty() {
            0.0
        } else {
            consonants.iter().filter(|&&c| is_hard(c)).count() as f64 / consonants.len() as f64
        };
        Some((brightness, hardness))
    }
}

#[async_trait]
impl NameAnalyzer for MusicalityAnalyzer {
    fn name(&self) -> &'static str {
        "musicality"
    }

    fn fields(&self) -> &'static [ScoreField] {
        FIELDS
    }

    async fn analyze(
        &self,
        name: &str,
        ctx: &NameContext,
    ) -> Result<PartialScoreBreakdown, AnalyzerError> {
        let (brightness, hardness) = Self::sound_profile(name).ok_or_else(|| {
            AnalyzerError::UnsupportedInput(format!("'{}' contains no letters", name))
        })?;

        let (confidence, alignment) = match mood_target(&ctx.mood) {
            Some((tb, th)) => {
                let distance = ((brightness - tb).powi(2) + (hardness - th).powi(2)).sqrt();
                (0.6, 1.0 - distance / std::f64::consts::SQRT_2)
            }
            None => (0.3, 0.5),
        };

        let mut partial = PartialScoreBreakdown::new(self.name(), confidence)
            .with(ScoreField::PhoneticSemanticAlignment, alignment);

        if let Some(target) = genre_hardness(&ctx.genre) {
            partial.set(ScoreField::GenreOptimization, 1.0 - (hardness - target).abs());
        }

        Ok(partial)
    }
}

//! Scripted analyzers
//!
//! `FixedAnalyzer` reports a predetermined breakdown per name, so tests can
//! pin overall scores and quality vectors exactly.

use async_trait::async_trait;
use marquee_rank::models::{NameContext, ScoreBreakdown, ScoreField};
use marquee_rank::types::{AnalyzerError, NameAnalyzer, PartialScoreBreakdown};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Reports every field from a per-name breakdown at full confidence
#[derive(Debug, Clone, Default)]
pub struct FixedAnalyzer {
    scores: HashMap<String, ScoreBreakdown>,
    failing: HashSet<String>,
}

impl FixedAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every field of `name` set to `value`
    pub fn uniform(mut self, name: &str, value: f64) -> Self {
        self.scores.insert(name.to_string(), ScoreBreakdown::uniform(value));
        self
    }

    pub fn breakdown(mut self, name: &str, breakdown: ScoreBreakdown) -> Self {
        self.scores.insert(name.to_string(), breakdown);
        self
    }

    /// Fail with `Unavailable` for `name`
    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }
}

#[async_trait]
impl NameAnalyzer for FixedAnalyzer {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn fields(&self) -> &'static [ScoreField] {
        &ScoreField::ALL
    }

    async fn analyze(&self, name: &str, _ctx: &NameContext) -> Result<PartialScoreBreakdown, AnalyzerError> {
        if self.failing.contains(name) {
            return Err(AnalyzerError::Unavailable(format!("scripted failure for {}", name)));
        }
        let breakdown = self
            .scores
            .get(name)
            .ok_or_else(|| AnalyzerError::UnsupportedInput(format!("no scripted score for {}", name)))?;

        let mut partial = PartialScoreBreakdown::new("fixed", 1.0);
        for field in ScoreField::ALL {
            partial.set(field, breakdown.get(field));
        }
        Ok(partial)
    }
}

/// Sleeps before answering; used to exercise analyzer timeouts
#[derive(Debug, Clone)]
pub struct SlowAnalyzer {
    pub delay: Duration,
}

#[async_trait]
impl NameAnalyzer for SlowAnalyzer {
    fn name(&self) -> &'static str {
        "slow"
    }

    fn fields(&self) -> &'static [ScoreField] {
        &[ScoreField::Creativity]
    }

    async fn analyze(&self, _name: &str, _ctx: &NameContext) -> Result<PartialScoreBreakdown, AnalyzerError> {
        tokio::time::sleep(self.delay).await;
        Ok(PartialScoreBreakdown::new("slow", 1.0).with(ScoreField::Creativity, 1.0))
    }
}

//! Concept sources
//!
//! Word-association backends for the semantic analyzer.
//!
//! # Sources
//! - **StaticLexicon** - built-in themed word lists, offline and deterministic
//! - **ConceptNetClient** - ConceptNet 5 Web API (`/related`, `/query`)
//!
//! # API Reference
//! - Related terms: `{base}/related/c/en/{word}?filter=/c/en&limit={n}`
//! - Synonym edges: `{base}/query?node=/c/en/{word}&rel=/r/Synonym&limit={n}`
//!
//! Both implementations return empty lists on any failure.

use crate::types::{ConceptSource, RelatedConcept};
use async_trait::async_trait;
use marquee_common::config::ConceptSettings;
use reqwest::{header, Client};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

/// User-Agent header sent to ConceptNet
const USER_AGENT: &str = concat!("marquee-rank/", env!("CARGO_PKG_VERSION"));

/// Weight of a theme's own name when a member word is looked up
const THEME_WEIGHT: f64 = 0.9;
/// Weight of a sibling word sharing a theme
const SIBLING_WEIGHT: f64 = 0.7;

/// Themed word families shipped with the lexicon
const THEMES: &[(&str, &[&str])] = &[
    ("night", &["dark", "moon", "shadow", "midnight", "star", "dusk", "black", "nocturne"]),
    ("fire", &["flame", "burn", "ember", "spark", "blaze", "ash", "heat", "inferno"]),
    ("water", &["ocean", "river", "rain", "tide", "wave", "sea", "harbor", "current", "flood"]),
    ("metal", &["iron", "steel", "chrome", "rust", "gold", "silver", "copper", "blade"]),
    ("sky", &["star", "moon", "sun", "cloud", "comet", "orbit", "thunder", "storm"]),
    ("emotion", &["heart", "love", "sorrow", "joy", "tears", "longing", "rage", "desire"]),
    ("nature", &["forest", "meadow", "pine", "hollow", "river", "stone", "wild", "bloom"]),
    ("city", &["street", "neon", "avenue", "concrete", "subway", "tower", "traffic", "alley"]),
    ("machine", &["circuit", "pulse", "signal", "static", "engine", "chrome", "synth", "wire"]),
    ("texture", &["velvet", "glass", "silk", "paper", "smoke", "dust", "lace", "marble"]),
    ("motion", &["drift", "run", "fall", "rise", "wander", "spin", "flow", "echo"]),
    ("royalty", &["crown", "king", "queen", "throne", "empire", "gold", "velvet"]),
    ("mystery", &["ghost", "phantom", "secret", "cipher", "veil", "whisper", "shadow"]),
    ("sound", &["echo", "noise", "static", "hum", "chorus", "silence", "signal", "riot"]),
];

/// Small synonym table for the offline lexicon
const SYNONYMS: &[(&str, &[&str])] = &[
    ("dark", &["black", "dim", "shadowy"]),
    ("fire", &["flame", "blaze", "inferno"]),
    ("ocean", &["sea", "deep", "main"]),
    ("storm", &["tempest", "squall", "gale"]),
    ("ghost", &["phantom", "specter", "spirit"]),
    ("love", &["desire", "devotion", "affection"]),
    ("stone", &["rock", "pebble", "boulder"]),
    ("echo", &["reverberation", "resonance"]),
    ("static", &["noise", "hiss"]),
    ("velvet", &["plush", "silk"]),
];

/// Offline concept source backed by themed word families
#[derive(Debug, Clone, Default)]
pub struct StaticLexicon;

impl StaticLexicon {
    pub fn new() -> Self {
        Self
    }

    /// Whether the lexicon knows this word at all
    pub fn knows(word: &str) -> bool {
        let word = word.to_lowercase();
        THEMES
            .iter()
            .any(|(theme, members)| *theme == word || members.contains(&word.as_str()))
    }
}

#[async_trait]
impl ConceptSource for StaticLexicon {
    fn name(&self) -> &'static str {
        "static-lexicon"
    }

    async fn related_concepts(&self, word: &str, limit: usize) -> Vec<RelatedConcept> {
        let word = word.to_lowercase();
        let mut best: BTreeMap<&str, f64> = BTreeMap::new();

        for (theme, members) in THEMES {
            let is_theme = *theme == word;
            if !is_theme && !members.contains(&word.as_str()) {
                continue;
            }
            if !is_theme {
                let w = best.entry(*theme).or_insert(0.0);
                *w = w.max(THEME_WEIGHT);
            }
            for member in members.iter().filter(|m| **m != word) {
                let w = best.entry(*member).or_insert(0.0);
                *w = w.max(SIBLING_WEIGHT);
            }
        }

        let mut related: Vec<RelatedConcept> = best
            .into_iter()
            .map(|(w, weight)| RelatedConcept {
                word: w.to_string(),
                weight,
            })
            .collect();
        // BTreeMap order makes ties alphabetical
        related.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        related.truncate(limit);
        related
    }

    async fn synonyms(&self, word: &str, limit: usize) -> Vec<String> {
        let word = word.to_lowercase();
        SYNONYMS
            .iter()
            .find(|(w, _)| *w == word)
            .map(|(_, syns)| syns.iter().take(limit).map(|s| s.to_string()).collect())
            .unwrap_or_default()
    }
}

/// ConceptNet `/related` response
#[derive(Debug, Deserialize)]
struct RelatedResponse {
    #[serde(default)]
    related: Vec<RelatedEntry>,
}

#[derive(Debug, Deserialize)]
struct RelatedEntry {
    #[serde(rename = "@id")]
    id: String,
    weight: f64,
}

/// ConceptNet `/query` response
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    edges: Vec<Edge>,
}

#[derive(Debug, Deserialize)]
struct Edge {
    start: Node,
    end: Node,
}

#[derive(Debug, Deserialize)]
struct Node {
    #[serde(default)]
    label: String,
    #[serde(default)]
    language: Option<String>,
}

/// ConceptNet Web API client
///
/// Requests are serialized through a last-request timestamp so that calls are
/// spaced at least `rate_limit` apart.
pub struct ConceptNetClient {
    http_client: Client,
    base_url: String,
    rate_limit: Duration,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl ConceptNetClient {
    /// Build a client from `[concepts]` settings
    ///
    /// # Errors
    /// `Error::Config` if the HTTP client cannot be constructed.
    pub fn new(settings: &ConceptSettings) -> marquee_common::Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );

        let http_client = Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(|e| {
                marquee_common::Error::Config(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            rate_limit: Duration::from_millis(settings.rate_limit_ms),
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    async fn enforce_rate_limit(&self) {
        let mut last_request = self.last_request.lock().await;

        if let Some(last_time) = *last_request {
            let elapsed = last_time.elapsed();
            if elapsed < self.rate_limit {
                let sleep_duration = self.rate_limit - elapsed;
                debug!(
                    sleep_ms = sleep_duration.as_millis() as u64,
                    "Rate limiting: sleeping before ConceptNet request"
                );
                sleep(sleep_duration).await;
            }
        }

        *last_request = Some(Instant::now());
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Option<T> {
        self.enforce_rate_limit().await;

        let response = match self.http_client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(url = %url, error = %e, "ConceptNet request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(url = %url, status = %response.status(), "ConceptNet returned error status");
            return None;
        }

        match response.json::<T>().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to parse ConceptNet response");
                None
            }
        }
    }
}

/// Strip the `/c/en/` prefix and any sense suffix from a concept URI
fn concept_word(id: &str) -> Option<String> {
    let rest = id.strip_prefix("/c/en/")?;
    let word = rest.split('/').next()?;
    if word.is_empty() {
        return None;
    }
    Some(word.replace('_', " "))
}

/// Path segment for a word in a concept URI
fn concept_term(word: &str) -> String {
    word.trim().to_lowercase().replace(' ', "_")
}

#[async_trait]
impl ConceptSource for ConceptNetClient {
    fn name(&self) -> &'static str {
        "conceptnet"
    }

    async fn related_concepts(&self, word: &str, limit: usize) -> Vec<RelatedConcept> {
        let term = concept_term(word);
        if term.is_empty() || limit == 0 {
            return Vec::new();
        }
        let url = format!(
            "{}/related/c/en/{}?filter=/c/en&limit={}",
            self.base_url, term, limit
        );

        let Some(body) = self.get_json::<RelatedResponse>(&url).await else {
            return Vec::new();
        };

        body.related
            .into_iter()
            .filter_map(|entry| {
                let w = concept_word(&entry.id)?;
                (w != term.replace('_', " ")).then(|| RelatedConcept {
                    word: w,
                    weight: crate::math::unit(entry.weight, 0.0),
                })
            })
            .take(limit)
            .collect()
    }

    async fn synonyms(&self, word: &str, limit: usize) -> Vec<String> {
        let term = concept_term(word);
        if term.is_empty() || limit == 0 {
            return Vec::new();
        }
        let url = format!(
            "{}/query?node=/c/en/{}&rel=/r/Synonym&limit={}",
            self.base_url, term, limit
        );

        let Some(body) = self.get_json::<QueryResponse>(&url).await else {
            return Vec::new();
        };

        let own = term.replace('_', " ");
        let mut out: Vec<String> = Vec::new();
        for edge in body.edges {
            for node in [edge.start, edge.end] {
                let english = node.language.as_deref().map_or(true, |l| l == "en");
                let label = node.label.to_lowercase();
                if english && !label.is_empty() && label != own && !out.contains(&label) {
                    out.push(label);
                }
            }
        }
        out.truncate(limit);
        out
    }
}

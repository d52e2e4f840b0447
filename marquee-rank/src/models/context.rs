//! Closed request context schema
//!
//! Raw request strings are parsed into these enums once at the request
//! boundary. Labels that match no known category are kept as `Other` so that
//! they can be reported, but they carry no contextual offsets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether candidates name a band or a song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameType {
    Band,
    Song,
}

impl NameType {
    pub fn parse(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "band" => Some(NameType::Band),
            "song" => Some(NameType::Song),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NameType::Band => "band",
            NameType::Song => "song",
        }
    }
}

macro_rules! category_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => [$($label:literal),+]),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant,)+
            /// Label outside the known categories
            Other(String),
            /// Not provided in the request
            Unspecified,
        }

        impl $name {
            /// Parse an optional request label; blank counts as unspecified
            pub fn parse(label: Option<&str>) -> Self {
                let Some(raw) = label else {
                    return $name::Unspecified;
                };
                let normalized = normalize_label(raw);
                match normalized.as_str() {
                    "" => $name::Unspecified,
                    $($($label)|+ => $name::$variant,)+
                    _ => $name::Other(normalized),
                }
            }

            pub fn label(&self) -> &str {
                match self {
                    $($name::$variant => category_enum!(@first $($label),+),)+
                    $name::Other(label) => label.as_str(),
                    $name::Unspecified => "any",
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Other(_) | $name::Unspecified)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
    (@first $first:literal $(, $rest:literal)*) => { $first };
}

category_enum! {
    /// Musical genre
    Genre {
        Rock => ["rock"],
        Pop => ["pop"],
        Metal => ["metal", "heavy-metal"],
        Jazz => ["jazz"],
        Electronic => ["electronic", "edm", "techno", "house"],
        Folk => ["folk"],
        HipHop => ["hip-hop", "hiphop", "rap"],
        Indie => ["indie", "alternative"],
        Classical => ["classical"],
        Country => ["country"],
        Punk => ["punk"],
        Experimental => ["experimental", "avant-garde"],
    }
}

category_enum! {
    /// Emotional tone the name should carry
    Mood {
        Dark => ["dark"],
        Energetic => ["energetic"],
        Mellow => ["mellow", "calm"],
        Happy => ["happy", "joyful"],
        Aggressive => ["aggressive", "angry"],
        Melancholic => ["melancholic", "sad"],
        Mysterious => ["mysterious"],
        Romantic => ["romantic"],
        Uplifting => ["uplifting"],
    }
}

category_enum! {
    /// Intended audience
    Audience {
        Mainstream => ["mainstream"],
        Professional => ["professional"],
        General => ["general"],
        Youth => ["youth", "teen"],
        Niche => ["niche"],
        Underground => ["underground"],
    }
}

category_enum! {
    /// Commercial setting the name competes in
    MarketContext {
        Commercial => ["commercial"],
        Competitive => ["competitive"],
        Independent => ["independent"],
        Experimental => ["experimental"],
    }
}

category_enum! {
    /// How quickly a usable name is needed
    Urgency {
        Low => ["low"],
        Normal => ["normal"],
        High => ["high"],
        Immediate => ["immediate"],
    }
}

/// Validated request context
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameContext {
    pub name_type: NameType,
    pub genre: Genre,
    pub mood: Mood,
    pub target_audience: Audience,
    pub market_context: MarketContext,
    pub urgency: Urgency,
}

impl NameContext {
    /// Context with only the name type set
    pub fn new(name_type: NameType) -> Self {
        Self {
            name_type,
            genre: Genre::Unspecified,
            mood: Mood::Unspecified,
            target_audience: Audience::Unspecified,
            market_context: MarketContext::Unspecified,
            urgency: Urgency::Unspecified,
        }
    }

    pub fn with_genre(mut self, genre: Genre) -> Self {
        self.genre = genre;
        self
    }

    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = mood;
        self
    }

    pub fn with_audience(mut self, audience: Audience) -> Self {
        self.target_audience = audience;
        self
    }

    /// Key under which adaptive-learning history is grouped
    pub fn learning_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.name_type.as_str(),
            self.genre.label(),
            self.target_audience.label()
        )
    }

    /// Key fragment used by the analysis cache
    pub fn cache_key(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.name_type.as_str(),
            self.genre.label(),
            self.mood.label(),
            self.target_audience.label()
        )
    }
}

/// Lower-case, trim, and collapse inner whitespace/underscores to '-'
pub fn normalize_label(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

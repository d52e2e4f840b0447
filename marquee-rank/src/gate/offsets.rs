//! Contextual threshold offsets
//!
//! Fixed additive adjustments to the base threshold. Unknown and
//! unspecified labels contribute nothing.

use crate::models::{
    Audience, Genre, MarketContext, NameContext, QualityPriority, UserPreferences, Urgency,
};

/// Largest magnitude of the quality-priority offset
pub const MAX_PREFERENCE_OFFSET: f64 = 0.10;

pub fn genre_offset(genre: &Genre) -> f64 {
    match genre {
        Genre::Pop | Genre::Classical => 0.05,
        Genre::Jazz => 0.03,
        Genre::HipHop => 0.02,
        Genre::Rock | Genre::Electronic | Genre::Country => 0.0,
        Genre::Folk => -0.02,
        Genre::Metal => -0.03,
        Genre::Indie | Genre::Punk => -0.05,
        Genre::Experimental => -0.08,
        Genre::Other(_) | Genre::Unspecified => 0.0,
    }
}

pub fn audience_offset(audience: &Audience) -> f64 {
    match audience {
        Audience::Mainstream | Audience::Professional => 0.05,
        Audience::General => 0.0,
        Audience::Youth => -0.02,
        Audience::Niche => -0.03,
        Audience::Underground => -0.05,
        Audience::Other(_) | Audience::Unspecified => 0.0,
    }
}

pub fn market_offset(market: &MarketContext) -> f64 {
    match market {
        MarketContext::Commercial => 0.05,
        MarketContext::Competitive => 0.03,
        MarketContext::Independent => -0.03,
        MarketContext::Experimental => -0.05,
        MarketContext::Other(_) | MarketContext::Unspecified => 0.0,
    }
}

pub fn urgency_offset(urgency: &Urgency) -> f64 {
    match urgency {
        Urgency::Low => 0.02,
        Urgency::Normal => 0.0,
        Urgency::High => -0.03,
        Urgency::Immediate => -0.05,
        Urgency::Other(_) | Urgency::Unspecified => 0.0,
    }
}

/// Sum of every contextual offset
pub fn contextual_offset(ctx: &NameContext) -> f64 {
    genre_offset(&ctx.genre)
        + audience_offset(&ctx.target_audience)
        + market_offset(&ctx.market_context)
        + urgency_offset(&ctx.urgency)
}

/// Quality-priority offset scaled by preference weight, bounded
pub fn preference_offset(prefs: &UserPreferences) -> f64 {
    let direction = match prefs.quality_priority {
        QualityPriority::Quality => MAX_PREFERENCE_OFFSET,
        QualityPriority::Balanced => 0.0,
        QualityPriority::Quantity => -MAX_PREFERENCE_OFFSET,
    };
    (direction * crate::math::unit(prefs.preference_weight, 0.0))
        .clamp(-MAX_PREFERENCE_OFFSET, MAX_PREFERENCE_OFFSET)
}

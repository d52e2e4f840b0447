//! Data model shared by every pipeline stage

pub mod candidate;
pub mod context;
pub mod gate;
pub mod ranked;
pub mod request;
pub mod response;

pub use candidate::{Dimension, QualityVector, ScoreBreakdown, ScoreField, ScoredCandidate};
pub use context::{Audience, Genre, MarketContext, Mood, NameContext, NameType, Urgency};
pub use gate::{
    ExclusionCriteria, FallbackReport, FallbackSettings, FallbackStep, GateOutcome,
    RejectedName, RejectionCategory, RejectionReason, Severity, ThresholdConfig,
};
pub use ranked::{
    ClusterSummary, CompetitivePosition, DifferentiationFactor, MarketPosition, OpportunityGap,
    PositioningSummary, RankedName,
};
pub use request::{
    QualityPriority, RankingMode, RankingRequest, RiskTolerance, ThresholdMode, UserPreferences,
    ValidatedRequest,
};
pub use response::{Analytics, RankingResponse};

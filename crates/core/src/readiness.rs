//! Delivery readiness evaluation.
//!
//! A project may complete delivery only when the four mandatory checklist
//! flags are set and at least one of its videos is designated the main
//! delivery file. Music authorization, script, copyright files and
//! multi-resolution renders are tracked on [`DeliveryData`] but never gate
//! readiness and never appear as missing steps.
//!
//! All functions are pure; callers pass the delivery record and the
//! project's videos.

use serde::{Deserialize, Serialize};

use crate::entities::{DeliveryData, Video};

/// Number of conditions that gate readiness.
pub const MANDATORY_CONDITION_COUNT: usize = 5;

/// A mandatory delivery condition that is not yet satisfied.
///
/// Variant order is the order [`missing_steps`] reports them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStep {
    CleanFeed,
    MainDeliveryFile,
    TechReview,
    CopyrightCheck,
    Metadata,
}

impl DeliveryStep {
    /// User-facing guidance for the step.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CleanFeed => "upload the clean feed",
            Self::MainDeliveryFile => "designate a main delivery file",
            Self::TechReview => "complete the technical review",
            Self::CopyrightCheck => "confirm copyright risk",
            Self::Metadata => "confirm metadata is complete",
        }
    }
}

/// Full readiness report for one delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryReadiness {
    pub ready: bool,
    pub missing_steps: Vec<DeliveryStep>,
    pub main_delivery_count: usize,
    pub readiness_pct: u8,
}

fn main_delivery_count<'a, I>(project_videos: I) -> usize
where
    I: IntoIterator<Item = &'a Video>,
{
    project_videos
        .into_iter()
        .filter(|v| v.is_main_delivery)
        .count()
}

fn steps_for(delivery: &DeliveryData, main_count: usize) -> Vec<DeliveryStep> {
    let checks = [
        (delivery.has_clean_feed, DeliveryStep::CleanFeed),
        (main_count > 0, DeliveryStep::MainDeliveryFile),
        (delivery.has_tech_review, DeliveryStep::TechReview),
        (delivery.has_copyright_check, DeliveryStep::CopyrightCheck),
        (delivery.has_metadata, DeliveryStep::Metadata),
    ];

    checks
        .into_iter()
        .filter_map(|(met, step)| (!met).then_some(step))
        .collect()
}

/// Unmet mandatory conditions in fixed order: clean feed, main delivery
/// file, tech review, copyright check, metadata.
pub fn missing_steps<'a, I>(delivery: &DeliveryData, project_videos: I) -> Vec<DeliveryStep>
where
    I: IntoIterator<Item = &'a Video>,
{
    steps_for(delivery, main_delivery_count(project_videos))
}

/// Whether delivery may be completed.
pub fn is_ready<'a, I>(delivery: &DeliveryData, project_videos: I) -> bool
where
    I: IntoIterator<Item = &'a Video>,
{
    delivery.has_clean_feed
        && delivery.has_tech_review
        && delivery.has_copyright_check
        && delivery.has_metadata
        && project_videos.into_iter().any(|v| v.is_main_delivery)
}

/// Compute the readiness percentage from total and met condition counts.
///
/// Returns 0 if `total` is 0.
pub fn compute_readiness_pct(total: usize, met: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (met as f64 / total as f64 * 100.0).round() as u8;
    pct.min(100)
}

/// Evaluate a delivery into a full report.
pub fn evaluate_delivery<'a, I>(delivery: &DeliveryData, project_videos: I) -> DeliveryReadiness
where
    I: IntoIterator<Item = &'a Video>,
{
    let main_count = main_delivery_count(project_videos);
    let missing = steps_for(delivery, main_count);
    let met = MANDATORY_CONDITION_COUNT - missing.len();

    DeliveryReadiness {
        ready: missing.is_empty(),
        readiness_pct: compute_readiness_pct(MANDATORY_CONDITION_COUNT, met),
        missing_steps: missing,
        main_delivery_count: main_count,
    }
}

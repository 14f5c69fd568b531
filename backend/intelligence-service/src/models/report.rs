use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::behavior::CustomerBehavior;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Tier,
    Behavior,
    Interest,
    Preference,
    Needs,
}

/// A classification tag proposed for the customer record, with the
/// heuristic strength behind it. Confidence is a bounded score, not a
/// probability.
#[derive(Debug, Clone, Serialize)]
pub struct TagSuggestion {
    pub tag: String,
    pub reason: String,
    pub confidence: f64,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteType {
    Context,
    Opportunity,
    Feedback,
    Consultation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// A human-readable action note for the customer-care team.
#[derive(Debug, Clone, Serialize)]
pub struct NoteSuggestion {
    #[serde(rename = "type")]
    pub note_type: NoteType,
    pub content: String,
    pub confidence: f64,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CustomerType {
    #[serde(rename = "VIP Premium")]
    VipPremium,
    #[serde(rename = "Loyal Customer")]
    LoyalCustomer,
    #[serde(rename = "Repeat Customer")]
    RepeatCustomer,
    #[serde(rename = "High-Intent Browser")]
    HighIntentBrowser,
    #[serde(rename = "Price-Conscious Shopper")]
    PriceConsciousShopper,
    #[serde(rename = "Window Shopper")]
    WindowShopper,
    #[serde(rename = "New Visitor")]
    NewVisitor,
}

impl CustomerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerType::VipPremium => "VIP Premium",
            CustomerType::LoyalCustomer => "Loyal Customer",
            CustomerType::RepeatCustomer => "Repeat Customer",
            CustomerType::HighIntentBrowser => "High-Intent Browser",
            CustomerType::PriceConsciousShopper => "Price-Conscious Shopper",
            CustomerType::WindowShopper => "Window Shopper",
            CustomerType::NewVisitor => "New Visitor",
        }
    }
}

/// Single recommended outreach action from the first-match rule ladder.
#[derive(Debug, Clone, Serialize)]
pub struct NextBestAction {
    pub action: &'static str,
    pub message: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskRating {
    High,
    Medium,
    Low,
}

/// Churn-risk estimate with the rule that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct RiskLevel {
    pub level: RiskRating,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInsights {
    pub customer_type: CustomerType,
    pub next_best_action: NextBestAction,
    pub risk_level: RiskLevel,
}

/// Current user record summary for the report header. Empty when the
/// identity lookup came back absent; that is non-fatal.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub email: Option<String>,
    pub tier: Option<String>,
    pub current_tags: Vec<String>,
    pub current_notes: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionSet {
    pub tags: Vec<TagSuggestion>,
    pub notes: Vec<NoteSuggestion>,
    /// Rounded mean tag confidence, as a 0-100 percentage
    pub confidence: u32,
}

/// Terminal aggregate returned to callers; built fresh on every request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelligenceReport {
    pub user_id: Uuid,
    pub user: UserSummary,
    pub behavior: CustomerBehavior,
    pub suggestions: SuggestionSet,
    pub insights: CustomerInsights,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_type_serializes_with_display_labels() {
        let json = serde_json::to_value(CustomerType::VipPremium).unwrap();
        assert_eq!(json, "VIP Premium");
        assert_eq!(CustomerType::HighIntentBrowser.as_str(), "High-Intent Browser");
    }

    #[test]
    fn priority_rank_orders_high_first() {
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
    }
}

pub mod behavior;
pub mod order;
pub mod report;

pub use behavior::{
    AnalysisPeriod, BrowsingProfile, CartActions, CategoryCount, ColorCount, CustomerBehavior,
    EngagementProfile, EventBehavior, FilterUsage, OrderBehavior, OrderBrowsing, OrderEngagement,
    OrderSearch, OrderShopping, PriceSensitivity, PriceSensitivityLevel, PurchaseFrequency,
    PurchaseHistory, PurchaseStats, RankedInterest, RepeatedQuery, SearchProfile,
    ShoppingProfile, SizeCount,
};
pub use order::{Order, OrderItem, OrderStatus};
pub use report::{
    CustomerInsights, CustomerType, IntelligenceReport, NextBestAction, NoteSuggestion, NoteType,
    Priority, RiskLevel, RiskRating, SuggestionKind, SuggestionSet, TagSuggestion, UserSummary,
};

use std::cmp::Ordering;

use crate::config::EngineThresholds;
use crate::models::{
    CustomerBehavior, EventBehavior, NoteSuggestion, NoteType, OrderBehavior, PriceSensitivityLevel,
    Priority, SuggestionKind, TagSuggestion,
};

/// The orders branch caps suggestions; the events branch ranks instead.
const ORDERS_BRANCH_CAP: usize = 5;

/// Minimum confidence for a category interest to become a tag.
const CATEGORY_TAG_MIN: f64 = 0.6;
/// Minimum confidence for a brand or color preference to become a tag.
const PREFERENCE_TAG_MIN: f64 = 0.7;

/// Derive ranked classification tags from a behavior profile.
pub fn suggested_tags(
    behavior: &CustomerBehavior,
    thresholds: &EngineThresholds,
) -> Vec<TagSuggestion> {
    match behavior {
        CustomerBehavior::Orders(profile) => order_tags(profile, thresholds),
        CustomerBehavior::Events(profile) | CustomerBehavior::Hybrid(profile) => {
            event_tags(profile)
        }
    }
}

fn order_tags(profile: &OrderBehavior, thresholds: &EngineThresholds) -> Vec<TagSuggestion> {
    let history = &profile.shopping.purchase_history;
    let mut tags = Vec::new();

    if history.total_orders >= thresholds.vip_min_orders
        && history.total_spent >= thresholds.vip_min_spend
    {
        tags.push(TagSuggestion {
            tag: "tier:vip".to_string(),
            reason: format!(
                "{} orders, ${} spent",
                history.total_orders,
                money(history.total_spent)
            ),
            confidence: 1.0,
            kind: SuggestionKind::Tier,
        });
    } else if history.total_orders >= 3 {
        tags.push(TagSuggestion {
            tag: "behavior:loyal_customer".to_string(),
            reason: format!("{} repeat purchases", history.total_orders),
            confidence: 0.9,
            kind: SuggestionKind::Behavior,
        });
    }

    if history.avg_order_value >= thresholds.high_value_aov {
        tags.push(TagSuggestion {
            tag: "behavior:high_value".to_string(),
            reason: format!("AOV: ${}", money(history.avg_order_value.round())),
            confidence: 0.85,
            kind: SuggestionKind::Behavior,
        });
    }

    for cat in &profile.browsing.top_categories {
        tags.push(TagSuggestion {
            tag: format!("interested:{}", cat.category.to_lowercase()),
            reason: format!("Purchased {} items in {}", cat.count, cat.category),
            confidence: 0.8,
            kind: SuggestionKind::Interest,
        });
    }

    tags.truncate(ORDERS_BRANCH_CAP);
    tags
}

fn event_tags(profile: &EventBehavior) -> Vec<TagSuggestion> {
    let mut tags = Vec::new();

    for cat in &profile.browsing.top_categories {
        if cat.confidence >= CATEGORY_TAG_MIN {
            tags.push(TagSuggestion {
                tag: format!("interested:{}", cat.name.to_lowercase()),
                reason: format!("Viewed {} products {} times", cat.name, cat.count),
                confidence: cat.confidence,
                kind: SuggestionKind::Interest,
            });
        }
    }

    for brand in &profile.browsing.top_brands {
        if brand.confidence >= PREFERENCE_TAG_MIN {
            tags.push(TagSuggestion {
                tag: format!("brand:{}", brand.name.to_lowercase()),
                reason: format!("Frequently views {} products", brand.name),
                confidence: brand.confidence,
                kind: SuggestionKind::Preference,
            });
        }
    }

    for color in &profile.browsing.top_colors {
        if color.confidence >= PREFERENCE_TAG_MIN {
            tags.push(TagSuggestion {
                tag: format!("color:{}", color.name.to_lowercase()),
                reason: format!("Prefers {} color ({} views)", color.name, color.count),
                confidence: color.confidence,
                kind: SuggestionKind::Preference,
            });
        }
    }

    if let Some(top_size) = profile.browsing.preferred_sizes.first() {
        if top_size != "Free Size" {
            tags.push(TagSuggestion {
                tag: format!("size:{}", top_size.to_lowercase()),
                reason: format!("Frequently views size {top_size}"),
                confidence: 0.8,
                kind: SuggestionKind::Preference,
            });
        }
    }

    let sensitivity = &profile.shopping.price_sensitivity;
    match sensitivity.level {
        PriceSensitivityLevel::High => tags.push(TagSuggestion {
            tag: "behavior:price_conscious".to_string(),
            reason: format!(
                "Frequently uses \"Price Low\" filter ({} times)",
                sensitivity.filter_usage.price_low
            ),
            confidence: 0.85,
            kind: SuggestionKind::Behavior,
        }),
        PriceSensitivityLevel::Low => tags.push(TagSuggestion {
            tag: "behavior:premium_buyer".to_string(),
            reason: format!(
                "Average purchase: {}đ",
                money(sensitivity.average_purchase_price)
            ),
            confidence: 0.9,
            kind: SuggestionKind::Behavior,
        }),
        PriceSensitivityLevel::Medium => {}
    }

    if profile.engagement.needs_consultation {
        tags.push(TagSuggestion {
            tag: "needs:consultation".to_string(),
            reason: "Frequently asks for styling/size advice in chat".to_string(),
            confidence: 0.9,
            kind: SuggestionKind::Needs,
        });
    }

    let cart = &profile.shopping.cart_actions;
    if cart.abandonment_rate > 50 && cart.items_added >= 3 {
        tags.push(TagSuggestion {
            tag: "behavior:cart_abandoner".to_string(),
            reason: format!("{}% abandonment rate", cart.abandonment_rate),
            confidence: 0.75,
            kind: SuggestionKind::Behavior,
        });
    }

    // stable: equal confidences keep generation order
    tags.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    tags
}

/// Derive prioritized action notes from a behavior profile. Note content
/// keeps the storefront's customer-care locale.
pub fn suggested_notes(
    behavior: &CustomerBehavior,
    thresholds: &EngineThresholds,
) -> Vec<NoteSuggestion> {
    match behavior {
        CustomerBehavior::Orders(profile) => order_notes(profile, thresholds),
        CustomerBehavior::Events(profile) | CustomerBehavior::Hybrid(profile) => {
            event_notes(profile)
        }
    }
}

fn order_notes(profile: &OrderBehavior, thresholds: &EngineThresholds) -> Vec<NoteSuggestion> {
    let history = &profile.shopping.purchase_history;
    let mut notes = Vec::new();

    if history.total_orders >= thresholds.vip_min_orders
        && history.total_spent >= thresholds.vip_min_spend
    {
        notes.push(NoteSuggestion {
            note_type: NoteType::Context,
            content: format!(
                "Khách hàng VIP - {} đơn hàng, tổng ${}. Ưu tiên phục vụ cao nhất.",
                history.total_orders,
                money(history.total_spent)
            ),
            confidence: 1.0,
            priority: Priority::High,
        });
    }

    if history.total_orders >= 1 && history.recency > 90 {
        notes.push(NoteSuggestion {
            note_type: NoteType::Opportunity,
            content: format!(
                "Chưa mua hàng {} ngày - Gửi email winback với ưu đãi đặc biệt 15-20% off",
                history.recency
            ),
            confidence: 0.9,
            priority: Priority::High,
        });
    } else if history.total_orders >= 1 && history.recency > 30 {
        notes.push(NoteSuggestion {
            note_type: NoteType::Opportunity,
            content: format!(
                "{} ngày kể từ lần mua cuối - Nhắc nhở với new arrivals hoặc cross-sell",
                history.recency
            ),
            confidence: 0.8,
            priority: Priority::Medium,
        });
    }

    if history.avg_order_value >= thresholds.high_value_aov {
        notes.push(NoteSuggestion {
            note_type: NoteType::Context,
            content: format!(
                "AOV cao (${}) - Khách hàng chất lượng, có thể upsell premium products",
                money(history.avg_order_value.round())
            ),
            confidence: 0.85,
            priority: Priority::Medium,
        });
    }

    if history.total_orders >= 3 && history.total_orders < thresholds.vip_min_orders {
        notes.push(NoteSuggestion {
            note_type: NoteType::Opportunity,
            content: format!(
                "Khách hàng trung thành ({} đơn) - Mời tham gia VIP program hoặc loyalty rewards",
                history.total_orders
            ),
            confidence: 0.9,
            priority: Priority::Medium,
        });
    }

    notes.truncate(ORDERS_BRANCH_CAP);
    notes
}

fn event_notes(profile: &EventBehavior) -> Vec<NoteSuggestion> {
    let mut notes = Vec::new();

    for repeated in &profile.search.repeated_queries {
        notes.push(NoteSuggestion {
            note_type: NoteType::Opportunity,
            content: format!(
                "Khách hàng tìm kiếm \"{}\" {} lần - cần tư vấn sản phẩm phù hợp",
                repeated.query, repeated.count
            ),
            confidence: 0.9,
            priority: Priority::High,
        });
    }

    if !profile.search.no_result_queries.is_empty() {
        notes.push(NoteSuggestion {
            note_type: NoteType::Feedback,
            content: format!(
                "Tìm kiếm không có kết quả: {}",
                profile.search.no_result_queries.join(", ")
            ),
            confidence: 1.0,
            priority: Priority::Medium,
        });
    }

    let cart = &profile.shopping.cart_actions;
    if cart.abandonment_rate > 70 && cart.items_added >= 5 {
        notes.push(NoteSuggestion {
            note_type: NoteType::Opportunity,
            content: format!(
                "Tỷ lệ bỏ giỏ hàng cao ({}%) - cân nhắc gửi email nhắc nhở hoặc mã giảm giá",
                cart.abandonment_rate
            ),
            confidence: 0.85,
            priority: Priority::High,
        });
    }

    let engagement = &profile.engagement;
    if engagement.needs_consultation && engagement.chat_messages >= 3 {
        if let Some(intent) = engagement.primary_intent.as_deref() {
            notes.push(NoteSuggestion {
                note_type: NoteType::Consultation,
                content: format!(
                    "Khách hàng cần {} - đã chat {} lần",
                    intent_phrase(intent),
                    engagement.chat_messages
                ),
                confidence: 0.9,
                priority: Priority::High,
            });
        }
    }

    if engagement.engagement_score >= 60 && profile.shopping.purchases.count == 0 {
        notes.push(NoteSuggestion {
            note_type: NoteType::Opportunity,
            content: format!(
                "Khách hàng tương tác tích cực (engagement score: {}) nhưng chưa mua - cần nurture với ưu đãi đặc biệt",
                engagement.engagement_score
            ),
            confidence: 0.8,
            priority: Priority::High,
        });
    }

    let purchases = &profile.shopping.purchases;
    if purchases.count >= 3 {
        notes.push(NoteSuggestion {
            note_type: NoteType::Context,
            content: format!(
                "Khách hàng trung thành - Đã mua {} đơn, tổng {}đ. Cân nhắc VIP program.",
                purchases.count,
                money(purchases.total_spent)
            ),
            confidence: 1.0,
            priority: Priority::Medium,
        });
    }

    notes.sort_by(|a, b| {
        b.priority
            .rank()
            .cmp(&a.priority.rank())
            .then_with(|| {
                b.confidence
                    .partial_cmp(&a.confidence)
                    .unwrap_or(Ordering::Equal)
            })
    });
    notes
}

/// Money amount for reason/note copy: thousands-grouped integer part,
/// fractional part kept as-is when the amount is not whole.
fn money(amount: f64) -> String {
    let text = amount.to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };
    let (sign, digits) = match whole.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", whole),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Intent code to customer-care phrase; unmapped intents get the generic
/// consultation wording.
fn intent_phrase(intent: &str) -> &'static str {
    match intent {
        "size-help" => "tư vấn size/fit",
        "styling-advice" => "tư vấn phối đồ/styling",
        "consultation" => "tư vấn chung về sản phẩm",
        "product-recommendation" => "gợi ý sản phẩm phù hợp",
        _ => "tư vấn",
    }
}

use event_schema::{EventType, InteractionEvent};

use super::freq::FrequencyMap;
use crate::models::EngagementProfile;

/// Chat intents that signal the customer wants human help.
const CONSULTATION_INTENTS: [&str; 3] = ["consultation", "size-help", "styling-advice"];

/// Engagement analysis over search, chat and wishlist events.
pub fn analyze_engagement(events: &[InteractionEvent]) -> EngagementProfile {
    let mut search_count = 0u64;
    let mut chat_sessions = 0u64;
    let mut chat_messages = 0u64;
    let mut wishlist_items = 0u64;
    let mut intents = FrequencyMap::new();

    for event in events {
        match event.event_type {
            EventType::Search => search_count += 1,
            EventType::ChatStart => chat_sessions += 1,
            EventType::ChatMessage => {
                chat_messages += 1;
                intents.bump(event.data.intent().unwrap_or("general"));
            }
            EventType::WishlistAdd => wishlist_items += 1,
            _ => {}
        }
    }

    let needs_consultation = intents
        .iter()
        .any(|(intent, count)| count > 0 && CONSULTATION_INTENTS.contains(&intent));

    // ranked descending with first-encountered winning ties
    let primary_intent = intents
        .sorted_desc()
        .first()
        .map(|(intent, _)| intent.to_string());

    EngagementProfile {
        search_count,
        chat_sessions,
        chat_messages,
        wishlist_items,
        chat_intents: intents
            .iter()
            .map(|(intent, count)| (intent.to_string(), count))
            .collect(),
        primary_intent,
        needs_consultation,
        engagement_score: engagement_score(search_count, chat_messages, wishlist_items),
    }
}

/// 0-100 engagement score: a saturating sum of three capped components.
/// Searches contribute up to 30, chat messages up to 40, wishlist adds up
/// to 30.
pub fn engagement_score(searches: u64, chats: u64, wishlist: u64) -> u32 {
    let search_score = (searches * 5).min(30);
    let chat_score = (chats * 10).min(40);
    let wishlist_score = (wishlist * 10).min(30);
    (search_score + chat_score + wishlist_score).min(100) as u32
}

use event_schema::{EventType, InteractionEvent};

use super::freq::FrequencyMap;
use crate::config::EngineThresholds;
use crate::models::{
    CartActions, FilterUsage, PriceSensitivity, PriceSensitivityLevel, PurchaseStats,
    ShoppingProfile,
};

/// Shopping analysis over cart and purchase events: cart abandonment,
/// purchase aggregates, price sensitivity, and cart-derived preferences.
pub fn analyze_shopping(
    events: &[InteractionEvent],
    thresholds: &EngineThresholds,
) -> ShoppingProfile {
    let mut items_added = 0u64;
    let mut items_removed = 0u64;
    let mut purchase_count = 0u64;
    let mut items_purchased = 0u64;
    let mut total_spent = 0.0f64;
    let mut cart_categories = FrequencyMap::new();
    let mut cart_brands = FrequencyMap::new();

    for event in events {
        match event.event_type {
            EventType::AddToCart => {
                items_added += 1;
                if let Some(category) = event.data.category() {
                    cart_categories.bump(category);
                }
                if let Some(brand) = event.data.brand() {
                    cart_brands.bump(brand);
                }
            }
            EventType::RemoveFromCart => items_removed += 1,
            EventType::Purchase => {
                purchase_count += 1;
                items_purchased += event.data.items().len() as u64;
                total_spent += event.data.total_amount();
            }
            _ => {}
        }
    }

    let average_order_value = if purchase_count > 0 {
        (total_spent / purchase_count as f64).round()
    } else {
        0.0
    };

    ShoppingProfile {
        cart_actions: CartActions {
            items_added,
            items_removed,
            abandonment_rate: abandonment_rate(items_added, items_purchased),
        },
        purchases: PurchaseStats {
            count: purchase_count,
            total_spent,
            average_order_value,
            items_purchased,
            last_order_date: None,
        },
        price_sensitivity: analyze_price_sensitivity(events, thresholds),
        preferred_categories: names_by_frequency(&cart_categories),
        preferred_brands: names_by_frequency(&cart_brands),
    }
}

/// Rounded percentage of cart adds that never became purchased items.
/// Deliberately unclamped: purchased line items can outnumber tracked cart
/// adds (event-tracking gaps, multi-item orders), which drives the rate
/// negative.
pub fn abandonment_rate(items_added: u64, items_purchased: u64) -> i64 {
    if items_added == 0 {
        return 0;
    }
    let added = items_added as f64;
    let purchased = items_purchased as f64;
    ((added - purchased) / added * 100.0).round() as i64
}

/// Price sensitivity from sort-filter usage and realized purchase prices.
/// `high` wins when "Price Low" sorting dominates; `low` requires both a
/// "Price High" habit and a premium average item price.
fn analyze_price_sensitivity(
    events: &[InteractionEvent],
    thresholds: &EngineThresholds,
) -> PriceSensitivity {
    let mut price_low = 0u64;
    let mut price_high = 0u64;
    let mut price_sum = 0.0f64;
    let mut price_samples = 0u64;

    for event in events {
        match event.event_type {
            EventType::FilterApply => match event.data.sort_by() {
                Some("Price Low") => price_low += 1,
                Some("Price High") => price_high += 1,
                _ => {}
            },
            EventType::Purchase => {
                // free promo items would drag the average down
                for item in event.data.items() {
                    if let Some(price) = item.price.filter(|p| *p > 0.0) {
                        price_sum += price;
                        price_samples += 1;
                    }
                }
            }
            _ => {}
        }
    }

    let average_purchase_price = if price_samples > 0 {
        (price_sum / price_samples as f64).round()
    } else {
        0.0
    };

    let level = if price_low > price_high * 2 {
        PriceSensitivityLevel::High
    } else if price_high > price_low && average_purchase_price > thresholds.premium_price {
        PriceSensitivityLevel::Low
    } else {
        PriceSensitivityLevel::Medium
    };

    PriceSensitivity {
        level,
        filter_usage: FilterUsage {
            price_low,
            price_high,
        },
        average_purchase_price,
    }
}

fn names_by_frequency(freq: &FrequencyMap) -> Vec<String> {
    freq.sorted_desc()
        .into_iter()
        .map(|(name, _)| name.to_string())
        .collect()
}

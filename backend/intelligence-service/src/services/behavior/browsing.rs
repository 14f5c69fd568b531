use event_schema::{EventType, InteractionEvent};
use std::collections::HashSet;

use super::freq::FrequencyMap;
use crate::models::{BrowsingProfile, RankedInterest};

/// Views needed for full confidence in a category interest.
const CATEGORY_SATURATION: f64 = 5.0;
/// Views needed for full confidence in a brand or color preference.
const BRAND_COLOR_SATURATION: f64 = 3.0;

/// Browsing analysis over `product_view` events: interest rankings per
/// category/brand/color, preferred sizes, and view depth.
pub fn analyze_browsing(events: &[InteractionEvent]) -> BrowsingProfile {
    let mut categories = FrequencyMap::new();
    let mut brands = FrequencyMap::new();
    let mut colors = FrequencyMap::new();
    let mut sizes = FrequencyMap::new();
    let mut viewed_products: HashSet<&str> = HashSet::new();
    let mut total_views = 0u64;

    for event in events
        .iter()
        .filter(|e| e.event_type == EventType::ProductView)
    {
        total_views += 1;
        if let Some(category) = event.data.category() {
            categories.bump(category);
        }
        if let Some(brand) = event.data.brand() {
            brands.bump(brand);
        }
        if let Some(color) = event.data.color() {
            colors.bump(color);
        }
        if let Some(size) = event.data.size() {
            sizes.bump(size);
        }
        if let Some(product_id) = event.data.product_id() {
            viewed_products.insert(product_id);
        }
    }

    let unique_products = viewed_products.len() as u64;

    BrowsingProfile {
        total_views,
        unique_products,
        average_views_per_product: total_views as f64 / (unique_products.max(1)) as f64,
        top_categories: ranked(&categories, CATEGORY_SATURATION),
        top_brands: ranked(&brands, BRAND_COLOR_SATURATION),
        top_colors: ranked(&colors, BRAND_COLOR_SATURATION),
        preferred_sizes: sizes
            .sorted_desc()
            .into_iter()
            .map(|(name, _)| name.to_string())
            .collect(),
    }
}

/// Top 5 by descending count; confidence saturates at `saturation` views.
fn ranked(freq: &FrequencyMap, saturation: f64) -> Vec<RankedInterest> {
    freq.sorted_desc()
        .into_iter()
        .take(5)
        .map(|(name, count)| RankedInterest {
            name: name.to_string(),
            count,
            confidence: (count as f64 / saturation).min(1.0),
        })
        .collect()
}

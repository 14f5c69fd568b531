use event_schema::{EventType, InteractionEvent};
use std::collections::HashSet;

use super::freq::FrequencyMap;
use crate::models::{RepeatedQuery, SearchProfile};

/// A query searched this many times reads as an unmet need.
const REPEAT_THRESHOLD: u64 = 3;

/// Search analysis: repeated queries and queries that returned nothing,
/// both signals that the customer needs assistance.
pub fn analyze_search(events: &[InteractionEvent]) -> SearchProfile {
    let mut total_searches = 0u64;
    let mut histogram = FrequencyMap::new();
    let mut no_result_seen: HashSet<String> = HashSet::new();
    let mut no_result_queries: Vec<String> = Vec::new();

    for event in events
        .iter()
        .filter(|e| e.event_type == EventType::Search)
    {
        total_searches += 1;
        let Some(query) = event.data.query() else {
            continue;
        };
        let query = query.to_lowercase();
        histogram.bump(&query);

        // missing resultsCount reads as zero results
        if event.data.results_count() == 0 && no_result_seen.insert(query.clone()) {
            no_result_queries.push(query);
        }
    }

    let repeated_queries: Vec<RepeatedQuery> = histogram
        .iter()
        .filter(|(_, count)| *count >= REPEAT_THRESHOLD)
        .map(|(query, count)| RepeatedQuery {
            query: query.to_string(),
            count,
        })
        .collect();

    let needs_assistance = !repeated_queries.is_empty() || !no_result_queries.is_empty();

    SearchProfile {
        total_searches,
        unique_queries: histogram.len() as u64,
        repeated_queries,
        no_result_queries,
        needs_assistance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_schema::EventData;
    use serde_json::json;
    use uuid::Uuid;

    fn search(query: &str, results: i64) -> InteractionEvent {
        InteractionEvent::new(
            Some(Uuid::nil()),
            EventType::Search,
            EventData::from(json!({ "query": query, "resultsCount": results })),
        )
    }

    #[test]
    fn repeated_no_result_query_is_reported_once() {
        let events = vec![
            search("Blue Scarf", 0),
            search("blue scarf", 0),
            search("BLUE SCARF", 0),
        ];
        let profile = analyze_search(&events);
        assert_eq!(profile.total_searches, 3);
        assert_eq!(profile.unique_queries, 1);
        assert_eq!(profile.repeated_queries.len(), 1);
        assert_eq!(profile.repeated_queries[0].query, "blue scarf");
        assert_eq!(profile.repeated_queries[0].count, 3);
        assert_eq!(profile.no_result_queries, vec!["blue scarf"]);
        assert!(profile.needs_assistance);
    }

    #[test]
    fn two_repeats_do_not_flag_assistance() {
        let events = vec![search("coat", 12), search("coat", 12)];
        let profile = analyze_search(&events);
        assert!(profile.repeated_queries.is_empty());
        assert!(profile.no_result_queries.is_empty());
        assert!(!profile.needs_assistance);
    }

    #[test]
    fn missing_results_count_reads_as_no_results() {
        let event = InteractionEvent::new(
            Some(Uuid::nil()),
            EventType::Search,
            EventData::from(json!({ "query": "velvet blazer" })),
        );
        let profile = analyze_search(&[event]);
        assert_eq!(profile.no_result_queries, vec!["velvet blazer"]);
        assert!(profile.needs_assistance);
    }

    #[test]
    fn queryless_search_events_still_count() {
        let event = InteractionEvent::new(
            Some(Uuid::nil()),
            EventType::Search,
            EventData::default(),
        );
        let profile = analyze_search(&[event]);
        assert_eq!(profile.total_searches, 1);
        assert_eq!(profile.unique_queries, 0);
        assert!(!profile.needs_assistance);
    }
}

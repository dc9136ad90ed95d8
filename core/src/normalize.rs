use serde_json::Value;

use crate::types::{EventRecord, SearchResponse};

// A missing or malformed field anywhere in hits.hits fails the whole
// normalization.
pub fn normalize_events(raw: Value) -> Result<Vec<EventRecord>, String> {
    let response: SearchResponse = serde_json::from_value(raw)
        .map_err(|error| format!("malformed search response: {}", error))?;

    let mut records = response
        .hits
        .hits
        .into_iter()
        .map(EventRecord::from_hit)
        .collect::<Vec<_>>();

    records.sort_by_key(|record| record.timestamp);

    Ok(records)
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// RESPUESTA DEL INDICE DE BUSQUEDA
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub hits: SearchHits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHits {
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source")]
    pub source: EventSource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventSource {
    #[serde(rename = "@timestamp")]
    pub timestamp: DateTime<Utc>,
    pub source_ip: String,
    pub feature1: f64,
    pub feature2: f64,
    pub feature3: f64,
}

// ============================================================================
// TABLA DE EVENTOS NORMALIZADA
// ============================================================================

pub const FEATURE_COUNT: usize = 3;

#[derive(Debug, Clone)]
pub struct EventRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub source_ip: String,
    pub features: [f64; FEATURE_COUNT],
    pub cluster: Option<usize>,
}

impl EventRecord {
    pub fn from_hit(hit: SearchHit) -> Self {
        EventRecord {
            id: hit.id,
            timestamp: hit.source.timestamp,
            source_ip: hit.source.source_ip,
            features: [
                hit.source.feature1,
                hit.source.feature2,
                hit.source.feature3,
            ],
            cluster: None,
        }
    }
}

// ============================================================================
// ALERTAS
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AlertPayload<'a> {
    pub title: &'a str,
    pub description: &'a str,
    #[serde(rename = "type")]
    pub alert_type: &'a str,
    pub source: &'a str,
    #[serde(rename = "sourceRef")]
    pub source_ref: &'a str,
}

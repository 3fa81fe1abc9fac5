use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};

use crate::error::LookupError;
use crate::ports::catalog::CatalogLookup;
use crate::services::catalog::{Catalog, Endpoints};

/// In-memory catalog answering from URL fixtures. Unknown URLs fail with a 404
/// status. Records every call and the peak number of concurrent lookups.
#[derive(Default)]
pub struct ScriptedCatalog {
    responses: Mutex<HashMap<String, (Value, Duration)>>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::default()
    }

    pub fn catalog(self: &Arc<Self>) -> Catalog {
        Catalog::new(self.clone(), self.endpoints())
    }

    pub fn respond(&self, url: String, value: Value) {
        self.respond_after(url, value, Duration::ZERO);
    }

    pub fn respond_after(&self, url: String, value: Value, latency: Duration) {
        self.responses.lock().unwrap().insert(url, (value, latency));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CatalogLookup for ScriptedCatalog {
    async fn lookup(&self, url: &str) -> Result<Value, LookupError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        self.calls.lock().unwrap().push(url.to_string());

        let scripted = self.responses.lock().unwrap().get(url).cloned();
        if let Some((_, latency)) = &scripted {
            if !latency.is_zero() {
                tokio::time::sleep(*latency).await;
            }
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match scripted {
            Some((value, _)) => Ok(value),
            None => Err(LookupError::Status { code: 404 }),
        }
    }
}

pub fn full_track_json(id: &str, name: &str, popularity: u32) -> Value {
    json!({
        "id": id,
        "uri": format!("spotify:track:{}", id),
        "name": name,
        "popularity": popularity,
        "artists": [{"id": "ar-test", "name": "Test Artist"}],
    })
}

pub fn simple_track_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "uri": format!("spotify:track:{}", id),
        "name": name,
    })
}

pub fn track_search_json(ids: &[&str]) -> Value {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| simple_track_json(id, &format!("Track {}", id)))
        .collect();
    json!({"tracks": {"items": items}})
}

pub fn album_search_json(ids: &[&str]) -> Value {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| json!({"id": id, "name": format!("Album {}", id)}))
        .collect();
    json!({"albums": {"items": items}})
}

/// Full album whose tracks are `{id}-0`, `{id}-1`, ...
pub fn album_json(id: &str, name: &str, track_count: usize) -> Value {
    let items: Vec<Value> = (0..track_count)
        .map(|i| simple_track_json(&format!("{}-{}", id, i), &format!("{} {}", name, i)))
        .collect();
    json!({"id": id, "name": name, "tracks": {"items": items}})
}

pub fn artist_search_json(id: &str, name: &str) -> Value {
    json!({"artists": {"items": [{"id": id, "name": name}]}})
}

pub fn artist_albums_json(ids: &[&str]) -> Value {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| json!({"id": id, "name": format!("Album {}", id), "album_type": "album"}))
        .collect();
    json!({"items": items})
}

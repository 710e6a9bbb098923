//! Camera metadata catalog
//!
//! Loads the open-data camera list from a local JSON file or an HTTP URL.
//! The upstream feed wraps its JSON in a JSONP callback and mixes string and
//! numeric field types; both quirks are tolerated here.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, anyhow};
use serde_json::Value;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// One catalog entry
#[derive(Debug, Clone)]
pub struct Camera {
    pub id: u32,
    /// Intersection name, e.g. "King St & Bay St"
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default)]
pub struct CameraCatalog {
    cameras: HashMap<u32, Camera>,
}

impl CameraCatalog {
    /// Load from a local path or an http(s) URL
    pub async fn load(source: &str) -> anyhow::Result<Self> {
        let text = if source.starts_with("http://") || source.starts_with("https://") {
            let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
            client
                .get(source)
                .send()
                .await
                .with_context(|| format!("fetching camera catalog from {source}"))?
                .error_for_status()?
                .text()
                .await?
        } else {
            tokio::fs::read_to_string(source)
                .await
                .with_context(|| format!("reading camera catalog from {source}"))?
        };

        Self::parse(&text)
    }

    /// Parse catalog JSON of the form `{"Data": [{"Number": …, "Name": …,
    /// "Latitude": …, "Longitude": …}, …]}`
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let text = strip_jsonp(text);
        let value: Value =
            serde_json::from_str(text).context("camera catalog is not valid JSON")?;
        let entries = value
            .get("Data")
            .and_then(|d| d.as_array())
            .ok_or_else(|| anyhow!("camera catalog missing 'Data' array"))?;

        let mut cameras = HashMap::new();
        for entry in entries {
            let Some(id) = value_as_u32(entry.get("Number")) else {
                tracing::warn!(entry = %entry, "Catalog entry without a usable camera number");
                continue;
            };
            let name = entry
                .get("Name")
                .and_then(|n| n.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Camera {id}"));
            let lat = value_as_f64(entry.get("Latitude")).unwrap_or(0.0);
            let lon = value_as_f64(entry.get("Longitude")).unwrap_or(0.0);

            cameras.insert(id, Camera { id, name, lat, lon });
        }

        Ok(Self { cameras })
    }

    pub fn get(&self, id: u32) -> Option<&Camera> {
        self.cameras.get(&id)
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }
}

/// Unwrap a JSONP payload like `callbackName({...});`
fn strip_jsonp(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return trimmed;
    }
    if let Some(open) = trimmed.find('(')
        && let Some(close) = trimmed.rfind(')')
        && open < close
    {
        return &trimmed[open + 1..close];
    }
    trimmed
}

fn value_as_u32(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

//! Zero-shot inference response shapes and normalization.

use dealwatch_core::classify::ZeroShotOutput;
use serde::Deserialize;

/// Raw response from the inference API.
///
/// The classic endpoint returns parallel `labels`/`scores` arrays; the router
/// endpoint returns a list of `{label, score}` pairs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ZeroShotApiResponse {
    Parallel {
        #[serde(default)]
        sequence: Option<String>,
        labels: Vec<String>,
        scores: Vec<f64>,
    },
    Pairs(Vec<LabelScore>),
}

#[derive(Debug, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Body returned with a 503 while the model warms up.
#[derive(Debug, Deserialize)]
pub struct LoadingResponse {
    pub error: String,
    #[serde(default)]
    pub estimated_time: Option<f64>,
}

impl From<ZeroShotApiResponse> for ZeroShotOutput {
    fn from(raw: ZeroShotApiResponse) -> Self {
        match raw {
            ZeroShotApiResponse::Parallel { labels, scores, .. } => ZeroShotOutput { labels, scores },
            ZeroShotApiResponse::Pairs(pairs) => {
                let (labels, scores) = pairs.into_iter().map(|p| (p.label, p.score)).unzip();
                ZeroShotOutput { labels, scores }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_parallel_arrays() {
        let json = r#"{
            "sequence": "bicicleta de montaña",
            "labels": ["venta", "otro"],
            "scores": [0.91, 0.09]
        }"#;
        let raw: ZeroShotApiResponse = serde_json::from_str(json).unwrap();
        let output = ZeroShotOutput::from(raw);

        assert_eq!(output.labels, vec!["venta", "otro"]);
        assert_eq!(output.score_for("venta"), Some(0.91));
    }

    #[test]
    fn test_parse_label_score_pairs() {
        let json = r#"[{"label": "otro", "score": 0.7}, {"label": "venta", "score": 0.3}]"#;
        let raw: ZeroShotApiResponse = serde_json::from_str(json).unwrap();
        let output = ZeroShotOutput::from(raw);

        assert_eq!(output.labels, vec!["otro", "venta"]);
        assert_eq!(output.score_for("venta"), Some(0.3));
    }

    #[test]
    fn test_parse_loading_body() {
        let json = r#"{"error": "Model facebook/bart-large-mnli is currently loading", "estimated_time": 20.5}"#;
        let body: LoadingResponse = serde_json::from_str(json).unwrap();
        assert!(body.error.contains("loading"));
        assert_eq!(body.estimated_time, Some(20.5));
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(serde_json::from_str::<ZeroShotApiResponse>(r#"{"error": "bad"}"#).is_err());
    }
}

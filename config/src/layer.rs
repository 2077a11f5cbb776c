//! # Configuration Layers
//!
//! A layer carries only the fields its source actually set. `None` defers
//! to lower-precedence sources, so an explicit value that happens to equal
//! the default still wins.

use serde::{Deserialize, Serialize};

/// Partial configuration produced by one source (file, environment, CLI).
///
/// ```rust
/// use config::ConfigLayer;
///
/// let layer: ConfigLayer = serde_json::from_str(r#"{"auto_plan": {"redact": true}}"#).unwrap();
/// assert_eq!(layer.auto_plan.redact, Some(true));
/// assert_eq!(layer.auto_plan.slice_max, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    pub store: StoreLayer,
    pub planner: PlannerLayer,
    pub auto_plan: AutoPlanLayer,
    pub delegation: DelegationLayer,
    pub observability: ObservabilityLayer,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreLayer {
    pub ctx_dir: Option<String>,
    pub max_peek_length: Option<usize>,
    pub max_search_results: Option<usize>,
    pub max_chunks: Option<usize>,
    pub search_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerLayer {
    pub max_keywords: Option<usize>,
    pub max_hits_per_keyword: Option<usize>,
    pub window: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoPlanLayer {
    pub max_subcalls: Option<usize>,
    pub slice_max: Option<usize>,
    pub redact: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegationLayer {
    pub batch_size: Option<usize>,
    pub max_subcalls: Option<usize>,
    pub max_batches: Option<usize>,
    pub redact: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityLayer {
    pub logging_level: Option<String>,
}

impl ConfigLayer {
    /// Layer that only sets the logging level, as the `--log-level` flag does.
    pub fn with_logging_level(level: impl Into<String>) -> Self {
        Self {
            observability: ObservabilityLayer {
                logging_level: Some(level.into()),
            },
            ..Self::default()
        }
    }

    /// True when the source set nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

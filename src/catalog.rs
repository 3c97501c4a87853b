//! Static tables: the repositories a user can pick and the forecast metrics
//! shown for each of them.

use crate::types::{MetricKey, Repository};

/// Repositories offered in the side panel, in display order.
pub const REPOSITORIES: [Repository; 11] = [
    Repository { id: "angular/angular", label: "Angular" },
    Repository { id: "angular/angular-cli", label: "Angular-cli" },
    Repository { id: "angular/material", label: "Angular Material" },
    Repository { id: "d3/d3", label: "D3" },
    Repository { id: "google/go-github", label: "GO Github" },
    Repository { id: "SebastianM/angular-google-maps", label: "Google Maps" },
    Repository { id: "facebook/react", label: "React" },
    Repository { id: "tensorflow/tensorflow", label: "Tensorflow" },
    Repository { id: "keras-team/keras", label: "Keras" },
    Repository { id: "pallets/flask", label: "Flask" },
    Repository { id: "golang/go", label: "Go" },
];

/// Selected on startup, before the user picks anything.
pub const DEFAULT_REPOSITORY: Repository = REPOSITORIES[0];

/// A forecast metric and the caption used for its image panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForecastMetric {
    pub key: MetricKey,
    pub caption: &'static str,
}

/// Forecast image panels, in display order. Adding a metric here is all it
/// takes to show another image triple.
pub const FORECAST_METRICS: [ForecastMetric; 7] = [
    ForecastMetric { key: MetricKey::CreatedIssues, caption: "Created Issues" },
    ForecastMetric { key: MetricKey::ClosedIssues, caption: "Closed Issues" },
    ForecastMetric { key: MetricKey::Pulls, caption: "Pulls" },
    ForecastMetric { key: MetricKey::Commits, caption: "Commits" },
    ForecastMetric { key: MetricKey::Branches, caption: "Branches" },
    ForecastMetric { key: MetricKey::Contributors, caption: "Contributors" },
    ForecastMetric { key: MetricKey::Releases, caption: "Releases" },
];

/// Look up a catalog repository by its `owner/name` id.
pub fn find(id: &str) -> Option<Repository> {
    REPOSITORIES.iter().copied().find(|repo| repo.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnalyticsResult;
    use std::collections::HashSet;

    #[test]
    fn test_default_is_angular() {
        assert_eq!(DEFAULT_REPOSITORY.id, "angular/angular");
        assert_eq!(find("angular/angular"), Some(DEFAULT_REPOSITORY));
    }

    #[test]
    fn test_ids_are_unique_and_owner_name() {
        let ids: HashSet<_> = REPOSITORIES.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), REPOSITORIES.len());
        for repo in &REPOSITORIES {
            let (owner, name) = repo.id.split_once('/').unwrap();
            assert!(!owner.is_empty() && !name.is_empty(), "{}", repo.id);
        }
    }

    #[test]
    fn test_find_unknown() {
        assert_eq!(find("rust-lang/rust"), None);
    }

    #[test]
    fn test_metric_wire_names_match_payload_fields() {
        let value = serde_json::to_value(AnalyticsResult::default()).unwrap();
        let fields = value.as_object().unwrap();
        for metric in &FORECAST_METRICS {
            assert!(
                fields.contains_key(metric.key.wire_name()),
                "missing {}",
                metric.key.wire_name()
            );
        }
    }
}

//! # Common Types
//!
//! This module contains the types shared across the dashboard: the repositories
//! a user can pick, the aggregate analytics payload returned by the backend, and
//! the fetch lifecycle state.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// A selectable repository.
///
/// Repositories are defined once at startup (see [`crate::catalog`]) and never
/// change. Two repositories are the same repository when their `id`s match.
#[derive(Clone, Copy, Debug)]
pub struct Repository {
    /// Reference id in `owner/name` form, sent to the backend verbatim
    pub id: &'static str,
    /// Human readable label shown in the repository list
    pub label: &'static str,
}

impl PartialEq for Repository {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Repository {}

impl Hash for Repository {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id)
    }
}

/// Where the current fetch is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FetchState {
    /// Nothing has been requested yet
    #[default]
    Idle,
    /// A request for the current selection is in flight
    Loading,
    /// The latest request resolved with a decoded payload
    Success,
    /// The latest request failed; the result holds the empty default
    Failed,
}

/// One `(period label, count)` pair of a time series.
///
/// On the wire this is a two element array such as `["2023-01", 5]`. Float
/// counts are rounded, since the backend sometimes serializes counts from
/// floating point frames.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DataPoint {
    pub label: String,
    pub count: u64,
}

impl DataPoint {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

impl Serialize for DataPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.label, self.count).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DataPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PointVisitor;

        impl<'de> Visitor<'de> for PointVisitor {
            type Value = DataPoint;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a [label, count] pair")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<DataPoint, A::Error> {
                let label: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let count: f64 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                if !count.is_finite() || count < 0.0 {
                    return Err(de::Error::custom(format!(
                        "count for {label} must be a non-negative number"
                    )));
                }
                Ok(DataPoint {
                    label,
                    count: count.round() as u64,
                })
            }
        }

        deserializer.deserialize_seq(PointVisitor)
    }
}

/// A named series, used for the created vs. closed overlay.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct NamedSeries {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data: Vec<DataPoint>,
}

/// Externally hosted forecast images for one metric.
///
/// The URLs are opaque; an empty string means the backend did not provide one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageBundle {
    #[serde(deserialize_with = "null_as_default")]
    pub model_loss_image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lstm_generated_image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub all_issues_data_image: String,
}

/// The forecast metrics the backend produces image bundles for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetricKey {
    CreatedIssues,
    ClosedIssues,
    Pulls,
    Commits,
    Branches,
    Contributors,
    Releases,
}

impl MetricKey {
    /// Field name of this metric's bundle in the aggregate payload
    pub fn wire_name(self) -> &'static str {
        match self {
            MetricKey::CreatedIssues => "createdAtImageUrls",
            MetricKey::ClosedIssues => "closedAtImageUrls",
            MetricKey::Pulls => "PullsImageUrls",
            MetricKey::Commits => "CommitsImageUrls",
            MetricKey::Branches => "BranchesImageUrls",
            MetricKey::Contributors => "ContributorsImageUrls",
            MetricKey::Releases => "ReleasesImageUrls",
        }
    }
}

/// The aggregate payload returned by the analytics backend for one repository.
///
/// Field names follow the backend's wire contract. Every field is optional on
/// the wire: a missing or `null` field decodes to its empty default, so
/// renderers can read any field without further checks.
/// [`AnalyticsResult::default`] is the "empty result" shown before the first
/// response and after any failure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsResult {
    /// Monthly created-issue counts
    #[serde(deserialize_with = "null_as_default")]
    pub created: Vec<DataPoint>,
    /// Weekly closed-issue counts
    #[serde(deserialize_with = "null_as_default")]
    pub closed_week: Vec<DataPoint>,
    #[serde(rename = "starCount", deserialize_with = "null_as_default")]
    pub star_count: Vec<DataPoint>,
    #[serde(rename = "forkCount", deserialize_with = "null_as_default")]
    pub fork_count: Vec<DataPoint>,
    /// Created vs. closed overlay
    #[serde(deserialize_with = "null_as_default")]
    pub stacked: Vec<NamedSeries>,
    #[serde(deserialize_with = "null_as_default")]
    pub max_issue_created_day: String,
    #[serde(deserialize_with = "null_as_default")]
    pub max_issue_closed_day: String,
    #[serde(deserialize_with = "null_as_default")]
    pub max_issue_close_month: String,
    #[serde(rename = "createdAtImageUrls", deserialize_with = "null_as_default")]
    pub created_at_images: ImageBundle,
    #[serde(rename = "closedAtImageUrls", deserialize_with = "null_as_default")]
    pub closed_at_images: ImageBundle,
    #[serde(rename = "PullsImageUrls", deserialize_with = "null_as_default")]
    pub pulls_images: ImageBundle,
    #[serde(rename = "CommitsImageUrls", deserialize_with = "null_as_default")]
    pub commits_images: ImageBundle,
    #[serde(rename = "BranchesImageUrls", deserialize_with = "null_as_default")]
    pub branches_images: ImageBundle,
    #[serde(rename = "ContributorsImageUrls", deserialize_with = "null_as_default")]
    pub contributors_images: ImageBundle,
    #[serde(rename = "ReleasesImageUrls", deserialize_with = "null_as_default")]
    pub releases_images: ImageBundle,
}

impl AnalyticsResult {
    /// The image bundle for a forecast metric
    pub fn images(&self, key: MetricKey) -> &ImageBundle {
        match key {
            MetricKey::CreatedIssues => &self.created_at_images,
            MetricKey::ClosedIssues => &self.closed_at_images,
            MetricKey::Pulls => &self.pulls_images,
            MetricKey::Commits => &self.commits_images,
            MetricKey::Branches => &self.branches_images,
            MetricKey::Contributors => &self.contributors_images,
            MetricKey::Releases => &self.releases_images,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of the analytics request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsRequest {
    pub repository: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_repository_identity_is_id() {
        let a = Repository {
            id: "facebook/react",
            label: "React",
        };
        let b = Repository {
            id: "facebook/react",
            label: "react (mirror)",
        };
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "facebook/react");
    }

    #[test]
    fn test_decode_full_payload() {
        let json = r#"{
            "created": [["2023-01", 5], ["2023-02", 7]],
            "closed_week": [["2023-W01", 3]],
            "starCount": [["2023-01", 120]],
            "forkCount": [["2023-01", 40.0]],
            "stacked": [
                {"name": "Created", "data": [["2023-01", 5]]},
                {"name": "Closed", "data": [["2023-01", 2]]}
            ],
            "max_issue_created_day": "Tuesday",
            "max_issue_closed_day": "Friday",
            "max_issue_close_month": "March",
            "createdAtImageUrls": {
                "model_loss_image_url": "https://img/loss.png",
                "lstm_generated_image_url": "https://img/lstm.png",
                "all_issues_data_image": "https://img/all.png"
            }
        }"#;

        let result: AnalyticsResult = serde_json::from_str(json).unwrap();
        assert_eq!(
            result.created,
            vec![DataPoint::new("2023-01", 5), DataPoint::new("2023-02", 7)]
        );
        assert_eq!(result.fork_count, vec![DataPoint::new("2023-01", 40)]);
        assert_eq!(result.stacked.len(), 2);
        assert_eq!(result.stacked[1].name, "Closed");
        assert_eq!(result.max_issue_close_month, "March");
        assert_eq!(
            result.images(MetricKey::CreatedIssues).lstm_generated_image_url,
            "https://img/lstm.png"
        );
        assert_eq!(result.images(MetricKey::Releases), &ImageBundle::default());
    }

    #[test]
    fn test_missing_and_null_fields_default() {
        let result: AnalyticsResult =
            serde_json::from_str(r#"{"stacked": null, "closed": [["x", 1]], "PullsImageUrls": null}"#)
                .unwrap();
        assert!(result.is_empty());

        let empty: AnalyticsResult = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, AnalyticsResult::default());
    }

    #[test]
    fn test_malformed_point_is_rejected() {
        assert!(serde_json::from_str::<AnalyticsResult>(r#"{"created": [["2023-01"]]}"#).is_err());
        assert!(serde_json::from_str::<AnalyticsResult>(r#"{"created": [["2023-01", -2]]}"#).is_err());
        assert!(serde_json::from_str::<AnalyticsResult>(r#"{"created": "nope"}"#).is_err());
    }

    #[test]
    fn test_point_serializes_as_pair() {
        let value = serde_json::to_value(DataPoint::new("2023-01", 5)).unwrap();
        assert_eq!(value, serde_json::json!(["2023-01", 5]));
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(AnalyticsRequest {
            repository: "angular/angular".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"repository": "angular/angular"}));
    }
}

//! Slide descriptor model.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// The fixed set of slide types, one template each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideKind {
    /// Title slide with subtitle and tagline
    Cover,
    /// Numbered list of topics
    Agenda,
    /// Section divider in inverted colors
    Section,
    /// Two bullet lists side by side
    TwoColumn,
    /// List of items with check marks
    Checklist,
    /// Closing questions slide
    Qna,
    /// Chart image with data pairs and bullets
    Example,
    /// Highlighted takeaway with supporting items
    Interpret,
}

impl SlideKind {
    /// All slide types, in declaration order.
    pub const ALL: [SlideKind; 8] = [
        SlideKind::Cover,
        SlideKind::Agenda,
        SlideKind::Section,
        SlideKind::TwoColumn,
        SlideKind::Checklist,
        SlideKind::Qna,
        SlideKind::Example,
        SlideKind::Interpret,
    ];

    /// The `type` value used in spec files.
    pub fn as_str(&self) -> &'static str {
        match self {
            SlideKind::Cover => "cover",
            SlideKind::Agenda => "agenda",
            SlideKind::Section => "section",
            SlideKind::TwoColumn => "two-column",
            SlideKind::Checklist => "checklist",
            SlideKind::Qna => "qna",
            SlideKind::Example => "example",
            SlideKind::Interpret => "interpret",
        }
    }
}

impl fmt::Display for SlideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlideKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SlideKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// One slide descriptor from the spec.
///
/// Every field except `kind` is optional; which ones matter depends on the
/// slide type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    /// Template selector
    #[serde(rename = "type")]
    pub kind: SlideKind,

    #[serde(default, deserialize_with = "text_opt", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "text_opt", skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Short line under the title
    #[serde(default, deserialize_with = "text_opt", skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,

    /// Used when `tagline` is missing or empty
    #[serde(default, deserialize_with = "text_opt", skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    #[serde(default, deserialize_with = "text_list", skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,

    #[serde(default, deserialize_with = "text_list", skip_serializing_if = "Vec::is_empty")]
    pub bullets: Vec<String>,

    #[serde(default, deserialize_with = "text_list", skip_serializing_if = "Vec::is_empty")]
    pub left: Vec<String>,

    #[serde(default, deserialize_with = "text_list", skip_serializing_if = "Vec::is_empty")]
    pub right: Vec<String>,

    /// Key/value pairs shown next to a chart, raw as written in the spec
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_pairs: Option<Vec<Value>>,

    /// Chart image path, relative to the spec file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_image: Option<PathBuf>,

    #[serde(default, deserialize_with = "text_opt", skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,

    /// Per-slide theme color overrides; ignored on section slides
    #[serde(default, deserialize_with = "text_opt", skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,

    #[serde(default, deserialize_with = "text_opt", skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,

    #[serde(default, deserialize_with = "text_opt", skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,

    #[serde(default, deserialize_with = "text_opt", skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
}

impl Slide {
    /// Validate and decode the slide at `index` (1-based) from its raw value.
    pub fn from_value(index: usize, value: &Value) -> Result<Self> {
        let kind = match value.get("type") {
            None | Some(Value::Null) => return Err(Error::MissingSlideType(index)),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        if kind.parse::<SlideKind>().is_err() {
            return Err(Error::UnknownSlideType { index, kind });
        }

        Slide::deserialize(value).map_err(|e| Error::InvalidSlide {
            index,
            message: e.to_string(),
        })
    }

    /// The line under the title: `tagline`, or `tag` when that is empty.
    pub fn tagline_text(&self) -> Option<&str> {
        self.tagline
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.tag.as_deref())
    }

    /// Title shown in the viewer's window title.
    pub fn display_title(&self, index: usize) -> String {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => format!("Slide {}", index),
        }
    }
}

/// Render a scalar JSON value the way it reads in a spec file.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Format one data pair as `"key → value"`.
///
/// Lists use their first two elements, strings are kept as written and
/// anything else is stringified.
pub fn format_data_pair(pair: &Value) -> String {
    match pair {
        Value::Array(parts) if parts.len() >= 2 => {
            format!("{} → {}", value_text(&parts[0]), value_text(&parts[1]))
        }
        other => value_text(other),
    }
}

/// Accept any scalar as text; `null` counts as missing.
fn text_opt<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .filter(|v| !v.is_null())
        .map(|v| value_text(&v)))
}

/// Accept a list of arbitrary scalars as text.
fn text_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .iter()
        .map(value_text)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_round_trip_names() {
        for kind in SlideKind::ALL {
            assert_eq!(kind.as_str().parse::<SlideKind>(), Ok(kind));
        }
        assert!("timeline".parse::<SlideKind>().is_err());
    }

    #[test]
    fn test_missing_type() {
        let err = Slide::from_value(4, &json!({"title": "No type"})).unwrap_err();
        assert!(matches!(err, Error::MissingSlideType(4)));
    }

    #[test]
    fn test_unknown_type() {
        let err = Slide::from_value(2, &json!({"type": "timeline"})).unwrap_err();
        match err {
            Error::UnknownSlideType { index, kind } => {
                assert_eq!(index, 2);
                assert_eq!(kind, "timeline");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_field_shape() {
        let err = Slide::from_value(1, &json!({"type": "agenda", "items": "flat"})).unwrap_err();
        assert!(matches!(err, Error::InvalidSlide { index: 1, .. }));
    }

    #[test]
    fn test_tag_and_scalar_items() {
        let slide = Slide::from_value(
            1,
            &json!({"type": "checklist", "tag": "Q3", "items": ["ship", 42, true]}),
        )
        .unwrap();
        assert_eq!(slide.kind, SlideKind::Checklist);
        assert_eq!(slide.tagline, None);
        assert_eq!(slide.tagline_text(), Some("Q3"));
        assert_eq!(slide.items, vec!["ship", "42", "true"]);
    }

    #[test]
    fn test_tagline_and_tag_together() {
        let both = Slide::from_value(
            1,
            &json!({"type": "cover", "tagline": "Main", "tag": "Fallback"}),
        )
        .unwrap();
        assert_eq!(both.tagline_text(), Some("Main"));

        let empty = Slide::from_value(
            2,
            &json!({"type": "cover", "tagline": "", "tag": "Fallback"}),
        )
        .unwrap();
        assert_eq!(empty.tagline_text(), Some("Fallback"));
    }

    #[test]
    fn test_numeric_scalars_become_text() {
        let slide = Slide::from_value(
            1,
            &json!({
                "type": "cover",
                "title": 2024,
                "subtitle": null,
                "tagline": 3.5,
                "highlight": false
            }),
        )
        .unwrap();
        assert_eq!(slide.title.as_deref(), Some("2024"));
        assert_eq!(slide.subtitle, None);
        assert_eq!(slide.tagline_text(), Some("3.5"));
        assert_eq!(slide.highlight.as_deref(), Some("false"));
    }

    #[test]
    fn test_yaml_numeric_title() {
        let value: Value = serde_yaml::from_str("type: section\ntitle: 2024\ntag: 7\n").unwrap();
        let slide = Slide::from_value(1, &value).unwrap();
        assert_eq!(slide.title.as_deref(), Some("2024"));
        assert_eq!(slide.tagline_text(), Some("7"));
    }

    #[test]
    fn test_format_data_pair() {
        assert_eq!(format_data_pair(&json!(["Revenue", 12.5])), "Revenue → 12.5");
        assert_eq!(format_data_pair(&json!(["a", "b", "c"])), "a → b");
        assert_eq!(format_data_pair(&json!("plain")), "plain");
        assert_eq!(format_data_pair(&json!(7)), "7");
        assert_eq!(format_data_pair(&json!(["lonely"])), "[\"lonely\"]");
    }

    #[test]
    fn test_display_title() {
        let slide = Slide::from_value(1, &json!({"type": "qna"})).unwrap();
        assert_eq!(slide.display_title(5), "Slide 5");
    }
}

//! Accepted input shapes for batch classification.

use serde_json::Value;

use crate::error::{OccucodeError, Result};

/// Input to [`classify_many`](crate::classifier::OccupationClassifier::classify_many).
///
/// Every shape is reduced to an ordered list of optional titles before any
/// classification work starts.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifyInput {
    /// A single title.
    Single(String),
    /// An ordered list of titles.
    Sequence(Vec<String>),
    /// A column of values that may contain missing entries.
    Series(Vec<Option<String>>),
}

impl ClassifyInput {
    /// Interpret a JSON value.
    ///
    /// - a string is a single title
    /// - an array of strings is a sequence
    /// - an array of strings and nulls is a series
    /// - an object with exactly one array member is a column; scalar values
    ///   are coerced to strings and nulls are missing entries
    ///
    /// Anything else is rejected.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Self::Single(s)),
            Value::Array(items) => {
                let mut titles = Vec::with_capacity(items.len());
                let mut has_missing = false;
                for (i, item) in items.into_iter().enumerate() {
                    match item {
                        Value::String(s) => titles.push(Some(s)),
                        Value::Null => {
                            has_missing = true;
                            titles.push(None);
                        }
                        other => {
                            return Err(OccucodeError::invalid_input(format!(
                                "element {i} is {}, expected a string",
                                json_type(&other)
                            )));
                        }
                    }
                }
                if has_missing {
                    Ok(Self::Series(titles))
                } else {
                    Ok(Self::Sequence(titles.into_iter().flatten().collect()))
                }
            }
            Value::Object(map) if map.len() == 1 => {
                let Some((column, Value::Array(items))) = map.into_iter().next() else {
                    return Err(OccucodeError::invalid_input(
                        "a column object must hold an array",
                    ));
                };
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| match item {
                        Value::Null => Ok(None),
                        Value::String(s) => Ok(Some(s)),
                        Value::Number(n) => Ok(Some(n.to_string())),
                        Value::Bool(b) => Ok(Some(b.to_string())),
                        other => Err(OccucodeError::invalid_input(format!(
                            "column {column:?} row {i} is {}, expected a scalar",
                            json_type(&other)
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(Self::Series)
            }
            other => Err(OccucodeError::invalid_input(format!(
                "cannot classify {}: expected a string, an array of strings or a column",
                json_type(&other)
            ))),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Sequence(titles) => titles.len(),
            Self::Series(titles) => titles.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The titles in input order.
    pub fn into_titles(self) -> Vec<Option<String>> {
        match self {
            Self::Single(title) => vec![Some(title)],
            Self::Sequence(titles) => titles.into_iter().map(Some).collect(),
            Self::Series(titles) => titles,
        }
    }
}

impl From<&str> for ClassifyInput {
    fn from(title: &str) -> Self {
        Self::Single(title.to_string())
    }
}

impl From<String> for ClassifyInput {
    fn from(title: String) -> Self {
        Self::Single(title)
    }
}

impl From<Vec<String>> for ClassifyInput {
    fn from(titles: Vec<String>) -> Self {
        Self::Sequence(titles)
    }
}

impl From<Vec<&str>> for ClassifyInput {
    fn from(titles: Vec<&str>) -> Self {
        Self::Sequence(titles.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<Option<String>>> for ClassifyInput {
    fn from(titles: Vec<Option<String>>) -> Self {
        Self::Series(titles)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_shapes() {
        assert_eq!(
            ClassifyInput::from_json(json!("会计")).unwrap(),
            ClassifyInput::Single("会计".into())
        );
        assert_eq!(
            ClassifyInput::from_json(json!(["会计", "出纳"])).unwrap(),
            ClassifyInput::Sequence(vec!["会计".into(), "出纳".into()])
        );
        assert_eq!(
            ClassifyInput::from_json(json!(["会计", null])).unwrap(),
            ClassifyInput::Series(vec![Some("会计".into()), None])
        );
        assert_eq!(
            ClassifyInput::from_json(json!({"title": ["会计", null, 42]})).unwrap(),
            ClassifyInput::Series(vec![Some("会计".into()), None, Some("42".into())])
        );
    }

    #[test]
    fn test_invalid_shapes() {
        for value in [
            json!(42),
            json!(null),
            json!(["会计", 1]),
            json!({"a": ["x"], "b": ["y"]}),
            json!({"title": "会计"}),
            json!({"title": [["nested"]]}),
        ] {
            assert!(
                matches!(
                    ClassifyInput::from_json(value.clone()),
                    Err(OccucodeError::InvalidInput(_))
                ),
                "accepted {value}"
            );
        }
    }

    #[test]
    fn test_into_titles() {
        assert_eq!(ClassifyInput::from("会计").into_titles(), vec![Some("会计".to_string())]);
        let input = ClassifyInput::from(vec!["a", "b"]);
        assert_eq!(input.len(), 2);
        assert_eq!(input.into_titles(), vec![Some("a".into()), Some("b".into())]);
    }
}

use crate::validate::ValidationError;
use crate::{Direction, Error};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::error;

/// One entry of a puzzle document: a clue, its answer, and where the answer starts.
///
/// Coordinates may be 0- or 1-based; see [compile](crate::compile).
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClueDefinition {
  pub clue: String,
  pub answer: String,
  pub direction: Direction,
  pub x: i64,
  pub y: i64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub custom: Option<String>,
}

impl ClueDefinition {
  pub fn new(clue: &str, answer: &str, direction: Direction, x: i64, y: i64) -> Self {
    Self {
      clue: clue.to_string(),
      answer: answer.to_string(),
      direction,
      x,
      y,
      custom: None,
    }
  }

  pub fn with_custom(mut self, custom: &str) -> Self {
    self.custom = Some(custom.to_string());
    self
  }
}

/// Parses a puzzle document: a JSON array of clue records. The records themselves
/// are not checked here; see [read_records].
pub fn parse_records(json: &str) -> Result<Vec<Value>, Error> {
  match serde_json::from_str(json)? {
    Value::Array(records) => Ok(records),
    _ => Err(Error::NotAnArray),
  }
}

/// Reads and parses a puzzle document from disk.
pub fn read_records_file(path: impl AsRef<Path>) -> Result<Vec<Value>, Error> {
  let json = std::fs::read_to_string(path)?;
  parse_records(&json)
}

/// Converts untyped clue records into [ClueDefinition]s, reporting every field that has
/// the wrong type.
///
/// A record with a bad `clue` or `answer` is still returned with that field blank. A
/// record whose position or direction is unusable can't be placed on the grid and is
/// left out.
pub fn read_records(records: &[Value]) -> (Vec<ClueDefinition>, Vec<ValidationError>) {
  let mut definitions = Vec::with_capacity(records.len());
  let mut errors = vec![];

  for (i, record) in records.iter().enumerate() {
    let mut shape_error = |field: &'static str, expected: &'static str| {
      let e = ValidationError::Shape {
        record: i,
        field,
        expected,
      };
      error!(record = %record, "{e}");
      errors.push(e);
    };

    let clue = record.get("clue").and_then(Value::as_str);
    if clue.is_none() {
      shape_error("clue", "string");
    }
    let answer = record.get("answer").and_then(Value::as_str);
    if answer.is_none() {
      shape_error("answer", "string");
    }
    let x = record.get("x").and_then(Value::as_i64);
    if x.is_none() {
      shape_error("x", "number");
    }
    let y = record.get("y").and_then(Value::as_i64);
    if y.is_none() {
      shape_error("y", "number");
    }
    let direction = record
      .get("direction")
      .and_then(Value::as_str)
      .and_then(Direction::parse);
    if direction.is_none() {
      shape_error("direction", "\"across\" or \"down\"");
    }

    let (Some(x), Some(y), Some(direction)) = (x, y, direction) else {
      continue;
    };
    definitions.push(ClueDefinition {
      clue: clue.unwrap_or_default().to_string(),
      answer: answer.unwrap_or_default().to_string(),
      direction,
      x,
      y,
      custom: record
        .get("custom")
        .and_then(Value::as_str)
        .map(str::to_string),
    });
  }

  (definitions, errors)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Direction::{Across, Down};
  use serde_json::json;

  #[test]
  fn reads_well_formed_records() {
    let records = parse_records(
      r#"[
        {"clue": "Cat", "answer": "CAT", "direction": "across", "x": 1, "y": 1},
        {"clue": "Cab", "answer": "CAB", "direction": "down", "x": 1, "y": 1, "custom": "blue"}
      ]"#,
    )
    .unwrap();
    let (definitions, errors) = read_records(&records);
    assert!(errors.is_empty());
    assert_eq!(
      definitions,
      vec![
        ClueDefinition::new("Cat", "CAT", Across, 1, 1),
        ClueDefinition::new("Cab", "CAB", Down, 1, 1).with_custom("blue"),
      ]
    );
  }

  #[test]
  fn reports_every_bad_field() {
    let records = vec![
      json!({"clue": 4, "answer": "CAT", "direction": "across", "x": 0, "y": 0}),
      json!({"clue": "ok", "answer": "OK", "direction": "sideways", "x": "0"}),
    ];
    let (definitions, errors) = read_records(&records);

    assert_eq!(
      errors,
      vec![
        ValidationError::Shape {
          record: 0,
          field: "clue",
          expected: "string"
        },
        ValidationError::Shape {
          record: 1,
          field: "x",
          expected: "number"
        },
        ValidationError::Shape {
          record: 1,
          field: "y",
          expected: "number"
        },
        ValidationError::Shape {
          record: 1,
          field: "direction",
          expected: "\"across\" or \"down\""
        },
      ]
    );
    // The first record can still be placed, with a blank clue.
    assert_eq!(definitions, vec![ClueDefinition::new("", "CAT", Across, 0, 0)]);
  }

  #[test]
  fn non_array_documents_are_rejected() {
    assert!(matches!(
      parse_records(r#"{"clue": "Cat"}"#),
      Err(Error::NotAnArray)
    ));
    assert!(matches!(parse_records("[1,"), Err(Error::Json(_))));
  }
}

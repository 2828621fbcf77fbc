//! Domain mapping — converts between [`Value`] trees and project records.
//!
//! Saving is exact: every record field becomes one object key, in a fixed
//! order. Loading is lenient. A missing or wrong-typed field never fails;
//! it is replaced by a documented default so that a hand-edited or partially
//! corrupted project file still opens:
//!
//! | field                                   | default                    |
//! |-----------------------------------------|----------------------------|
//! | `projectName`                           | `"Untitled"` (also blank)  |
//! | `creatorName`                           | `"Unknown"` (also blank)   |
//! | `language`                              | absent (also blank)        |
//! | `fpState`                               | absent                     |
//! | `counts` / `complexities` / `vafValues` | zero-padded to 5 / 5 / 14  |
//! | `totalWeighted` / `vafSum`              | `0`                        |
//! | `fpFormatted`                           | `"0.0"`                    |
//!
//! The parser stays strict; all leniency lives in the `*_or` helpers below.

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{ProjectError, Result};
use crate::metrics::{FP_CATEGORY_COUNT, GSC_COUNT};
use crate::parser::parse;
use crate::serializer::stringify;
use crate::value::{Map, Number, Value};

pub const DEFAULT_PROJECT_NAME: &str = "Untitled";
pub const DEFAULT_CREATOR_NAME: &str = "Unknown";
pub const DEFAULT_FP_FORMATTED: &str = "0.0";

/// The persisted project: names, the selected language, and the
/// function-point worksheet if one has been filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub project_name: String,
    pub creator_name: String,
    pub language: Option<String>,
    pub fp_state: Option<FunctionPointState>,
}

impl ProjectRecord {
    /// A fresh project. Blank names fall back to the defaults.
    pub fn new(project_name: &str, creator_name: &str) -> Self {
        Self {
            project_name: non_blank_or(project_name, DEFAULT_PROJECT_NAME),
            creator_name: non_blank_or(creator_name, DEFAULT_CREATOR_NAME),
            language: None,
            fp_state: None,
        }
    }
}

impl Default for ProjectRecord {
    fn default() -> Self {
        Self::new("", "")
    }
}

/// Function-point worksheet state.
///
/// `complexities` holds indices 0 (simple), 1 (average), 2 (complex) and
/// `vaf_values` holds the 14 general-system-characteristic ratings (0..=5).
/// Derived fields are stored as last computed; see
/// [`FunctionPointState::recompute`](crate::metrics).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionPointState {
    pub language: Option<String>,
    pub counts: [i32; FP_CATEGORY_COUNT],
    pub complexities: [i32; FP_CATEGORY_COUNT],
    pub vaf_values: [i32; GSC_COUNT],
    pub total_weighted: i32,
    pub vaf_sum: i32,
    pub fp_formatted: String,
}

impl Default for FunctionPointState {
    fn default() -> Self {
        Self {
            language: None,
            counts: [0; FP_CATEGORY_COUNT],
            complexities: [0; FP_CATEGORY_COUNT],
            vaf_values: [0; GSC_COUNT],
            total_weighted: 0,
            vaf_sum: 0,
            fp_formatted: DEFAULT_FP_FORMATTED.to_string(),
        }
    }
}

// ============================================================================
// Record → Value
// ============================================================================

/// Build the project document object. An absent `fp_state` is written as an
/// explicit `null`.
pub fn project_to_value(project: &ProjectRecord) -> Value {
    let mut map = Map::new();
    map.insert("projectName", Value::from(project.project_name.as_str()));
    map.insert("creatorName", Value::from(project.creator_name.as_str()));
    map.insert("language", Value::from(project.language.clone()));
    map.insert(
        "fpState",
        project
            .fp_state
            .as_ref()
            .map_or(Value::Null, fp_state_to_value),
    );
    Value::Object(map)
}

pub fn fp_state_to_value(state: &FunctionPointState) -> Value {
    let mut map = Map::new();
    map.insert("language", Value::from(state.language.clone()));
    map.insert("counts", int_array(&state.counts));
    map.insert("complexities", int_array(&state.complexities));
    map.insert("vafValues", int_array(&state.vaf_values));
    map.insert("totalWeighted", Value::from(state.total_weighted));
    map.insert("vafSum", Value::from(state.vaf_sum));
    map.insert("fpFormatted", Value::from(state.fp_formatted.as_str()));
    Value::Object(map)
}

fn int_array(values: &[i32]) -> Value {
    Value::Array(values.iter().copied().map(Value::from).collect())
}

// ============================================================================
// Value → Record (lenient)
// ============================================================================

/// Read a project from a value tree. Never fails: a non-object root reads
/// as an empty object, so every field takes its default.
pub fn value_to_project(value: &Value) -> ProjectRecord {
    let empty = Map::new();
    let map = value.as_object().unwrap_or(&empty);

    let project = ProjectRecord {
        project_name: string_or(map, "projectName", DEFAULT_PROJECT_NAME),
        creator_name: string_or(map, "creatorName", DEFAULT_CREATOR_NAME),
        language: map.get("language").and_then(non_blank),
        fp_state: map.get("fpState").and_then(value_to_fp_state),
    };
    trace!(
        project = %project.project_name,
        has_fp_state = project.fp_state.is_some(),
        "loaded project record"
    );
    project
}

/// Read function-point state from a value tree. Returns `None` unless the
/// value is an object; inside an object every field is defaulted as needed.
pub fn value_to_fp_state(value: &Value) -> Option<FunctionPointState> {
    let Some(map) = value.as_object() else {
        debug!(field = "fpState", "not an object, treating as absent");
        return None;
    };

    Some(FunctionPointState {
        language: map.get("language").and_then(Value::as_str).map(str::to_string),
        counts: int_array_or_zeros(map, "counts"),
        complexities: int_array_or_zeros(map, "complexities"),
        vaf_values: int_array_or_zeros(map, "vafValues"),
        total_weighted: int_or(map, "totalWeighted", 0),
        vaf_sum: int_or(map, "vafSum", 0),
        fp_formatted: map
            .get("fpFormatted")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                debug!(field = "fpFormatted", default = DEFAULT_FP_FORMATTED, "using default");
                DEFAULT_FP_FORMATTED.to_string()
            }),
    })
}

/// A non-blank string under `key`, else `default`.
fn string_or(map: &Map, key: &str, default: &str) -> String {
    match map.get(key).and_then(non_blank) {
        Some(s) => s,
        None => {
            debug!(field = key, default, "missing, blank or not a string; using default");
            default.to_string()
        }
    }
}

fn non_blank(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn non_blank_or(s: &str, default: &str) -> String {
    if s.trim().is_empty() {
        default.to_string()
    } else {
        s.to_string()
    }
}

fn int_or(map: &Map, key: &str, default: i32) -> i32 {
    match map.get(key).and_then(Value::as_number) {
        Some(n) => number_to_i32(n),
        None => {
            debug!(field = key, default, "missing or not a number; using default");
            default
        }
    }
}

/// Copy up to `N` numeric entries from the array under `key`. Missing
/// positions and non-numeric entries are 0; extra entries are ignored.
fn int_array_or_zeros<const N: usize>(map: &Map, key: &str) -> [i32; N] {
    let mut out = [0; N];
    let items = map.get(key).and_then(Value::as_array).unwrap_or(&[]);
    if items.len() != N {
        debug!(field = key, found = items.len(), expected = N, "array length mismatch; padding or truncating");
    }
    for (slot, item) in out.iter_mut().zip(items) {
        if let Some(n) = item.as_number() {
            *slot = number_to_i32(n);
        }
    }
    out
}

/// Integers saturate at the `i32` bounds; floats truncate toward zero.
fn number_to_i32(n: Number) -> i32 {
    match n {
        Number::Int(i) => i.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
        Number::Float(f) => f as i32,
    }
}

// ============================================================================
// Documents
// ============================================================================

/// Serialize a project to its on-disk text form.
pub fn project_to_string(project: &ProjectRecord) -> String {
    stringify(&project_to_value(project))
}

/// Parse project file text. Syntax errors and a non-object root are errors;
/// everything below the root is read leniently.
pub fn project_from_str(text: &str) -> Result<ProjectRecord> {
    let value = parse(text)?;
    if value.as_object().is_none() {
        return Err(ProjectError::NotAnObject);
    }
    Ok(value_to_project(&value))
}

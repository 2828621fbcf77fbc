//! # metrics-project
//!
//! Reads and writes software-metrics project files (`.ms`): a project's name,
//! creator, language and its function-point worksheet, stored as one compact
//! JSON-style object.
//!
//! The crate has its own small document codec rather than a general JSON
//! library, because the file format has a few deliberate quirks: integers and
//! floats are distinct, only five string escapes exist, and unknown escapes
//! pass through literally.
//!
//! ## Quick start
//!
//! ```rust
//! use metrics_project::{parse, stringify, project_from_str, project_to_string, ProjectRecord};
//!
//! // Generic document round trip
//! let text = r#"{"name":"Alice","scores":[95,87.5]}"#;
//! let value = parse(text).unwrap();
//! assert_eq!(stringify(&value), text);
//!
//! // Project file round trip
//! let project = ProjectRecord::new("Payroll", "Ada");
//! let saved = project_to_string(&project);
//! assert_eq!(project_from_str(&saved).unwrap(), project);
//! ```
//!
//! ## Modules
//!
//! - [`value`] — `Value` tree with separate integer and float numbers
//! - [`parser`] — text → `Value`
//! - [`serializer`] — `Value` → compact text
//! - [`mapping`] — `Value` ↔ `ProjectRecord` / `FunctionPointState`, lenient on load
//! - [`metrics`] — function-point weights, value adjustment, code-size estimate
//! - [`error`] — parse and project-load errors

pub mod error;
pub mod mapping;
pub mod metrics;
pub mod parser;
pub mod serializer;
pub mod value;

pub use error::{ParseError, ProjectError};
pub use mapping::{
    fp_state_to_value, project_from_str, project_to_string, project_to_value, value_to_fp_state,
    value_to_project, FunctionPointState, ProjectRecord,
};
pub use metrics::{estimate_code_size, Complexity, FpCategory};
pub use parser::parse;
pub use serializer::stringify;
pub use value::{Map, Number, Value};

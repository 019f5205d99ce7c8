//! Declarative parameter schemas.
//!
//! A [`ParameterSchema`] is the single source of truth for a tool's
//! arguments: it renders the JSON Schema advertised by `tools/list` and it
//! validates and defaults the raw arguments of every `tools/call` before the
//! tool sees them.
//!
//! # Examples
//!
//! ```
//! use mcp_server::tool::{ParameterSchema, ParameterSpec};
//! use serde_json::{json, Map};
//!
//! let schema = ParameterSchema::new(vec![
//!     ParameterSpec::string("bucket_name").describe("Bucket name").required(),
//!     ParameterSpec::string("acl")
//!         .allowed(["private", "public-read"])
//!         .default_value("private"),
//! ]);
//!
//! let mut raw = Map::new();
//! raw.insert("bucket_name".into(), json!("demo"));
//!
//! let validated = schema.validate(&raw).unwrap();
//! assert_eq!(validated["acl"], "private");
//! ```

use std::collections::HashSet;
use std::fmt;

use serde_json::{json, Map, Value};

use crate::error::SchemaError;

/// JSON type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// JSON string
    String,
    /// Whole JSON number
    Integer,
    /// Any JSON number
    Number,
    /// JSON boolean
    Boolean,
}

impl ParamType {
    /// JSON Schema name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => as_whole_number(value).is_some(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Description of one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    name: String,
    ty: ParamType,
    description: Option<String>,
    required: bool,
    default: Option<Value>,
    allowed_values: Option<Vec<Value>>,
}

impl ParameterSpec {
    /// Optional parameter of the given type with no default.
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
            required: false,
            default: None,
            allowed_values: None,
        }
    }

    /// String parameter.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::String)
    }

    /// Integer parameter.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Integer)
    }

    /// Number parameter.
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Number)
    }

    /// Boolean parameter.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Boolean)
    }

    /// Sets the human-readable description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the parameter as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value filled in when the caller omits the parameter.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Restricts the parameter to an enumeration.
    pub fn allowed<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter type.
    pub fn ty(&self) -> ParamType {
        self.ty
    }

    /// Parameter description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether the parameter must be supplied.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Default value, if any.
    pub fn declared_default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Enumeration, if any.
    pub fn allowed_values(&self) -> Option<&[Value]> {
        self.allowed_values.as_deref()
    }

    fn to_json_schema(&self) -> Value {
        let mut property = Map::new();
        property.insert("type".to_string(), json!(self.ty.as_str()));
        if let Some(description) = &self.description {
            property.insert("description".to_string(), json!(description));
        }
        if let Some(allowed) = &self.allowed_values {
            property.insert("enum".to_string(), Value::Array(allowed.clone()));
        }
        if let Some(default) = &self.default {
            property.insert("default".to_string(), default.clone());
        }
        Value::Object(property)
    }

    fn check(&self, value: &Value) -> Result<Value, SchemaError> {
        if !self.ty.accepts(value) {
            return Err(SchemaError::TypeMismatch {
                name: self.name.clone(),
                expected: self.ty.as_str(),
                actual: describe_value(value),
            });
        }

        let value = match self.ty {
            ParamType::Integer => as_whole_number(value).unwrap_or_else(|| value.clone()),
            _ => value.clone(),
        };

        if let Some(allowed) = &self.allowed_values {
            if !allowed.contains(&value) {
                return Err(SchemaError::NotAllowed {
                    name: self.name.clone(),
                    value: plain(&value),
                    allowed: allowed.iter().map(plain).collect::<Vec<_>>().join(", "),
                });
            }
        }

        Ok(value)
    }

    fn assert_consistent(&self) {
        assert!(
            !(self.required && self.default.is_some()),
            "parameter '{}' is required and must not declare a default",
            self.name
        );
        if let Some(default) = &self.default {
            assert!(
                self.check(default).is_ok(),
                "default of parameter '{}' violates its own schema",
                self.name
            );
        }
    }
}

/// Ordered set of parameters accepted by one tool.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterSchema {
    params: Vec<ParameterSpec>,
}

impl ParameterSchema {
    /// Builds a schema.
    ///
    /// # Panics
    ///
    /// Panics when a required parameter declares a default, when a default
    /// does not satisfy its own type or enumeration, or when two parameters
    /// share a name. Schemas are static data, so these are programming errors.
    pub fn new(params: Vec<ParameterSpec>) -> Self {
        let mut seen = HashSet::new();
        for spec in &params {
            assert!(
                seen.insert(spec.name.as_str()),
                "duplicate parameter '{}'",
                spec.name
            );
            spec.assert_consistent();
        }
        Self { params }
    }

    /// Schema of a tool without parameters.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parameters in declaration order.
    pub fn params(&self) -> &[ParameterSpec] {
        &self.params
    }

    /// Looks up a parameter by name.
    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.params.iter().find(|spec| spec.name == name)
    }

    /// Names of the required parameters, in declaration order.
    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .filter(|spec| spec.required)
            .map(|spec| spec.name.as_str())
    }

    /// Renders the schema as a JSON Schema object.
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|spec| (spec.name.clone(), spec.to_json_schema()))
            .collect();

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));

        let required: Vec<&str> = self.required_names().collect();
        if !required.is_empty() {
            schema.insert("required".to_string(), json!(required));
        }

        Value::Object(schema)
    }

    /// Validates raw arguments and fills in defaults.
    ///
    /// `null` counts as absent. Keys the schema does not declare are passed
    /// through untouched. Whole-valued floats supplied for integer
    /// parameters are normalized to integers.
    pub fn validate(&self, arguments: &Map<String, Value>) -> Result<Map<String, Value>, SchemaError> {
        let mut validated = arguments.clone();

        for spec in &self.params {
            match arguments.get(&spec.name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        return Err(SchemaError::MissingRequired(spec.name.clone()));
                    }
                    match &spec.default {
                        Some(default) => {
                            validated.insert(spec.name.clone(), default.clone());
                        }
                        None => {
                            validated.remove(&spec.name);
                        }
                    }
                }
                Some(value) => {
                    let checked = spec.check(value)?;
                    validated.insert(spec.name.clone(), checked);
                }
            }
        }

        Ok(validated)
    }
}

impl FromIterator<ParameterSpec> for ParameterSchema {
    fn from_iter<I: IntoIterator<Item = ParameterSpec>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn as_whole_number(value: &Value) -> Option<Value> {
    if value.is_i64() || value.is_u64() {
        return Some(value.clone());
    }
    let float = value.as_f64()?;
    if float.is_finite() && float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        Some(json!(float as i64))
    } else {
        None
    }
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("arguments must be an object"),
        }
    }

    fn list_schema() -> ParameterSchema {
        ParameterSchema::new(vec![
            ParameterSpec::string("bucket_name").describe("Bucket name").required(),
            ParameterSpec::string("prefix").default_value(""),
            ParameterSpec::integer("max_keys").default_value(1000),
            ParameterSpec::boolean("verbose"),
            ParameterSpec::string("method")
                .allowed(["GET", "PUT"])
                .default_value("GET"),
            ParameterSpec::number("time").default_value(300),
        ])
    }

    #[test]
    fn test_json_schema_rendering() {
        let schema = ParameterSchema::new(vec![
            ParameterSpec::string("bucket_name").describe("Bucket name").required(),
            ParameterSpec::string("acl")
                .describe("Access control")
                .allowed(["private", "public-read", "public-read-write"])
                .default_value("private"),
        ]);

        assert_eq!(
            schema.to_json_schema(),
            json!({
                "type": "object",
                "properties": {
                    "bucket_name": {"type": "string", "description": "Bucket name"},
                    "acl": {
                        "type": "string",
                        "description": "Access control",
                        "enum": ["private", "public-read", "public-read-write"],
                        "default": "private"
                    }
                },
                "required": ["bucket_name"]
            })
        );
    }

    #[test]
    fn test_json_schema_keeps_declaration_order() {
        let rendered = list_schema().to_json_schema();
        let names: Vec<&String> = rendered["properties"].as_object().unwrap().keys().collect();
        assert_eq!(names, ["bucket_name", "prefix", "max_keys", "verbose", "method", "time"]);
    }

    #[test]
    fn test_empty_schema_has_no_required_key() {
        assert_eq!(
            ParameterSchema::empty().to_json_schema(),
            json!({"type": "object", "properties": {}})
        );
    }

    #[test]
    fn test_validate_fills_defaults() {
        let validated = list_schema().validate(&args(json!({"bucket_name": "b"}))).unwrap();

        assert_eq!(validated["prefix"], "");
        assert_eq!(validated["max_keys"], 1000);
        assert_eq!(validated["method"], "GET");
        assert!(!validated.contains_key("verbose"));
    }

    #[test]
    fn test_validate_missing_required() {
        let err = list_schema().validate(&Map::new()).unwrap_err();
        assert_eq!(err, SchemaError::MissingRequired("bucket_name".to_string()));
    }

    #[test]
    fn test_validate_null_counts_as_absent() {
        let err = list_schema()
            .validate(&args(json!({"bucket_name": null})))
            .unwrap_err();
        assert!(matches!(err, SchemaError::MissingRequired(_)));

        let validated = list_schema()
            .validate(&args(json!({"bucket_name": "b", "max_keys": null, "verbose": null})))
            .unwrap();
        assert_eq!(validated["max_keys"], 1000);
        assert!(!validated.contains_key("verbose"));
    }

    #[test]
    fn test_validate_type_mismatch() {
        let err = list_schema()
            .validate(&args(json!({"bucket_name": 42})))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::TypeMismatch {
                name: "bucket_name".to_string(),
                expected: "string",
                actual: "number 42".to_string(),
            }
        );
    }

    #[test]
    fn test_integer_must_be_whole() {
        let err = list_schema()
            .validate(&args(json!({"bucket_name": "b", "max_keys": 2.5})))
            .unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { expected: "integer", .. }));

        let validated = list_schema()
            .validate(&args(json!({"bucket_name": "b", "max_keys": 10.0})))
            .unwrap();
        assert_eq!(validated["max_keys"], json!(10));
        assert!(validated["max_keys"].is_i64());
    }

    #[test]
    fn test_number_accepts_floats_and_integers() {
        let schema = list_schema();
        for time in [json!(1500), json!(1500.5)] {
            let validated = schema
                .validate(&args(json!({"bucket_name": "b", "time": time.clone()})))
                .unwrap();
            assert_eq!(validated["time"], time);
        }
    }

    #[test]
    fn test_enum_membership() {
        let err = list_schema()
            .validate(&args(json!({"bucket_name": "b", "method": "PATCH"})))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported value 'PATCH' for parameter 'method' (allowed: GET, PUT)"
        );
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let validated = list_schema()
            .validate(&args(json!({"bucket_name": "b", "extra": [1, 2]})))
            .unwrap();
        assert_eq!(validated["extra"], json!([1, 2]));
    }

    #[test]
    #[should_panic(expected = "must not declare a default")]
    fn test_required_with_default_panics() {
        ParameterSchema::new(vec![ParameterSpec::string("x").required().default_value("y")]);
    }

    #[test]
    #[should_panic(expected = "violates its own schema")]
    fn test_default_outside_enum_panics() {
        ParameterSchema::new(vec![
            ParameterSpec::string("format").allowed(["jpg", "png"]).default_value("gif"),
        ]);
    }

    #[test]
    #[should_panic(expected = "duplicate parameter")]
    fn test_duplicate_parameter_panics() {
        ParameterSchema::new(vec![ParameterSpec::string("a"), ParameterSpec::integer("a")]);
    }

    #[test]
    fn test_from_iterator() {
        let schema: ParameterSchema = ["a", "b"].into_iter().map(ParameterSpec::string).collect();
        assert_eq!(schema.params().len(), 2);
        assert!(schema.get("b").is_some());
        assert_eq!(schema.required_names().count(), 0);
    }
}

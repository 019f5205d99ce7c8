//! Tool descriptors.

use crate::protocol::ToolDefinition;

use super::schema::ParameterSchema;

/// Name, description and parameter schema of a tool.
///
/// Built once when the tool is constructed and never mutated; both
/// `tools/list` and argument validation read from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    name: String,
    description: String,
    schema: ParameterSchema,
}

impl ToolDescriptor {
    /// Creates a descriptor.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: ParameterSchema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
        }
    }

    /// Tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parameter schema.
    pub fn schema(&self) -> &ParameterSchema {
        &self.schema
    }

    /// Wire form used by `tools/list`.
    pub fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: Some(self.description.clone()),
            input_schema: self.schema.to_json_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ParameterSpec;
    use serde_json::json;

    #[test]
    fn test_to_definition() {
        let descriptor = ToolDescriptor::new(
            "tos_delete_bucket",
            "Delete a bucket",
            ParameterSchema::new(vec![ParameterSpec::string("bucket_name").required()]),
        );

        let definition = descriptor.to_definition();
        assert_eq!(definition.name, "tos_delete_bucket");
        assert_eq!(definition.description.as_deref(), Some("Delete a bucket"));
        assert_eq!(
            definition.input_schema,
            json!({
                "type": "object",
                "properties": {"bucket_name": {"type": "string"}},
                "required": ["bucket_name"]
            })
        );
    }
}

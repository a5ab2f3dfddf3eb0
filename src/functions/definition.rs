//! Function declaration metadata.
//!
//! A `FunctionDefinition` is static data: the platform reads it at deploy
//! time and the router only borrows its callback ID.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Parameter value types understood by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ParameterType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "array")]
    Array,
    #[serde(rename = "object")]
    Object,
    #[serde(rename = "slack#/types/user_id")]
    UserId,
    #[serde(rename = "slack#/types/channel_id")]
    ChannelId,
    #[serde(rename = "slack#/types/usergroup_id")]
    UsergroupId,
    #[serde(rename = "slack#/types/interactivity")]
    Interactivity,
    #[serde(rename = "slack#/types/rich_text")]
    RichText,
    #[serde(rename = "slack#/types/timestamp")]
    Timestamp,
    #[serde(rename = "slack#/types/message_ts")]
    MessageTs,
    #[serde(rename = "slack#/types/form_input_object")]
    FormInput,
}

/// Schema of one input or output parameter.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ParameterSchema {
    #[serde(rename = "type")]
    pub kind: ParameterType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Element schema, required for `array`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ParameterSchema>>,
}

impl ParameterSchema {
    pub fn new(kind: ParameterType) -> Self {
        Self {
            kind,
            title: None,
            description: None,
            items: None,
        }
    }

    /// An `array` whose elements follow `items`.
    pub fn array_of(items: ParameterSchema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::new(ParameterType::Array)
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Named parameters plus the names that must be supplied, both in
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ParameterSet {
    #[serde(default)]
    pub properties: IndexMap<String, ParameterSchema>,

    #[serde(default)]
    pub required: Vec<String>,
}

impl ParameterSet {
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    fn insert(&mut self, name: String, schema: ParameterSchema, required: bool) {
        if required && !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.properties.insert(name, schema);
    }

    /// Required names absent (or null) in `values`, in declaration order.
    pub fn missing_required(&self, values: &Map<String, Value>) -> Vec<String> {
        self.required
            .iter()
            .filter(|name| values.get(name.as_str()).map_or(true, Value::is_null))
            .cloned()
            .collect()
    }
}

/// Problems found in a function definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("callback_id must not be empty")]
    EmptyCallbackId,

    #[error("callback_id `{0}` may only contain letters, digits, `_` and `-`")]
    InvalidCallbackId(String),

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("{set} parameter `{name}` is required but not declared")]
    UndeclaredRequired { set: &'static str, name: String },

    #[error("{set} parameter `{name}` is an array without `items`")]
    ArrayWithoutItems { set: &'static str, name: String },
}

/// Declaration of one platform function.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FunctionDefinition {
    /// Stable identifier; owns the function's view routers.
    pub callback_id: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,

    #[serde(default)]
    pub input_parameters: ParameterSet,

    #[serde(default)]
    pub output_parameters: ParameterSet,
}

impl FunctionDefinition {
    pub fn new(callback_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            callback_id: callback_id.into(),
            title: title.into(),
            description: None,
            source_file: None,
            input_parameters: ParameterSet::default(),
            output_parameters: ParameterSet::default(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn source_file(mut self, path: impl Into<String>) -> Self {
        self.source_file = Some(path.into());
        self
    }

    /// Declare an input parameter.
    pub fn input(mut self, name: impl Into<String>, schema: ParameterSchema, required: bool) -> Self {
        self.input_parameters.insert(name.into(), schema, required);
        self
    }

    /// Declare an output parameter.
    pub fn output(mut self, name: impl Into<String>, schema: ParameterSchema, required: bool) -> Self {
        self.output_parameters.insert(name.into(), schema, required);
        self
    }

    /// Collect every problem in the definition.
    pub fn validate(&self) -> Result<(), Vec<DefinitionError>> {
        let mut errors = Vec::new();

        if self.callback_id.is_empty() {
            errors.push(DefinitionError::EmptyCallbackId);
        } else if !self
            .callback_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            errors.push(DefinitionError::InvalidCallbackId(self.callback_id.clone()));
        }

        if self.title.trim().is_empty() {
            errors.push(DefinitionError::EmptyTitle);
        }

        for (set, params) in [("input", &self.input_parameters), ("output", &self.output_parameters)] {
            for name in &params.required {
                if !params.properties.contains_key(name) {
                    errors.push(DefinitionError::UndeclaredRequired {
                        set,
                        name: name.clone(),
                    });
                }
            }
            for (name, schema) in &params.properties {
                if schema.kind == ParameterType::Array && schema.items.is_none() {
                    errors.push(DefinitionError::ArrayWithoutItems {
                        set,
                        name: name.clone(),
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Manifest `functions` object: definitions keyed by callback ID.
pub fn manifest<'a, I>(definitions: I) -> Value
where
    I: IntoIterator<Item = &'a FunctionDefinition>,
{
    let mut functions = Map::new();
    for definition in definitions {
        // Infallible: every field serializes to plain JSON.
        let entry = match serde_json::to_value(definition) {
            Ok(Value::Object(fields)) => fields
                .into_iter()
                .filter(|(key, _)| key != "callback_id")
                .collect::<Map<_, _>>(),
            _ => Map::new(),
        };
        functions.insert(definition.callback_id.clone(), Value::Object(entry));
    }
    Value::Object(functions)
}

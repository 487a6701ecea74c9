//! Template context: serializable payload for the Map template.

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// One generated accessor stanza.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorCtx {
    /// Method name, e.g. `article`.
    pub function: String,
    /// Component class the method returns, e.g. `Article`.
    pub class_name: String,
}

impl AccessorCtx {
    pub fn new(function: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            class_name: class_name.into(),
        }
    }
}

/// Rendering payload: stanzas in output order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapContext {
    pub accessors: Vec<AccessorCtx>,
}

impl MapContext {
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        Ok(tera::Context::from_serialize(self)?)
    }
}

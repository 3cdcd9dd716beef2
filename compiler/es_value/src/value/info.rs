use std::sync::Arc;

/// Descriptive metadata carried by functions, types and host bindings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueInfo {
    pub name: Option<String>,
    pub description: Option<String>,
    pub file: Option<Arc<str>>,
    /// Defined by the runtime rather than by a script.
    pub builtin: bool,
}

impl ValueInfo {
    pub fn named(name: impl Into<String>) -> Self {
        ValueInfo {
            name: Some(name.into()),
            ..ValueInfo::default()
        }
    }

    /// Metadata for runtime-provided values.
    pub fn builtin(name: impl Into<String>) -> Self {
        ValueInfo {
            name: Some(name.into()),
            file: Some(Arc::from(es_ir::BUILTIN_FILE)),
            builtin: true,
            ..ValueInfo::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

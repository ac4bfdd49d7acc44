use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::TypeName;

/// First class-file major version (Java 8) that allows `invokespecial` on interface methods.
pub const JAVA_8_MAJOR_VERSION: u16 = 52;

/// Whether interface default methods may be invoked non-virtually.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultMethodInvocation {
    #[default]
    Enabled,
    Disabled,
}

impl DefaultMethodInvocation {
    pub fn for_class_file_version(major_version: u16) -> Self {
        if major_version >= JAVA_8_MAJOR_VERSION {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }

    pub fn is_enabled(self) -> bool {
        self == Self::Enabled
    }
}

/// Settings for one rebasing pass.
///
/// ```toml
/// default_method_invocation = "disabled"
/// rebase_suffix = "original$x1"
/// placeholder_type = "com/example/Marker"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RebaseConfig {
    pub default_method_invocation: DefaultMethodInvocation,
    /// Appended (after a `$`) to the name of every rebased method.
    pub rebase_suffix: String,
    /// Type of the trailing marker parameter added to rebased constructors.
    pub placeholder_type: TypeName,
}

impl Default for RebaseConfig {
    fn default() -> Self {
        Self {
            default_method_invocation: DefaultMethodInvocation::Enabled,
            rebase_suffix: "original$".to_string(),
            placeholder_type: TypeName::new("nova/rebase/Placeholder"),
        }
    }
}

impl RebaseConfig {
    /// The suffix becomes part of a JVM method name, so it must be non-empty and free of
    /// `.`, `;`, `[`, `/`, `<` and `>`.
    pub fn validate(&self) -> Result<()> {
        let suffix = &self.rebase_suffix;
        if suffix.is_empty() || suffix.contains(['.', ';', '[', '/', '<', '>']) {
            return Err(Error::InvalidRebaseSuffix(suffix.clone()));
        }
        Ok(())
    }

    pub fn for_class_file_version(major_version: u16) -> Self {
        Self {
            default_method_invocation: DefaultMethodInvocation::for_class_file_version(
                major_version,
            ),
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        tracing::debug!(
            target = "nova.rebase",
            default_method_invocation = ?config.default_method_invocation,
            suffix = %config.rebase_suffix,
            placeholder = %config.placeholder_type,
            "loaded rebase config"
        );
        Ok(config)
    }
}

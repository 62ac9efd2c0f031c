//! Configuration for schema compilation.

use serde::{Deserialize, Serialize};

/// Options for a schema build.
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g., `max-depth`, `base-card`),
/// matching the CLI flag names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CompileOptions {
    /// Maximum fragment nesting depth. Deeper fragments fail the build with
    /// `DepthExceeded` instead of exhausting the call stack.
    pub max_depth: usize,
    /// Synthesize the canonical `card@1.0.0` contract when the input has no
    /// `card` contract, so the `Card` interface always exists.
    pub base_card: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            base_card: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_options_serde_round_trip() {
        let opts = CompileOptions {
            max_depth: 12,
            base_card: false,
        };

        let json = serde_json::to_string(&opts).unwrap();
        assert!(json.contains("\"max-depth\""));
        assert!(json.contains("\"base-card\""));

        let deserialized: CompileOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, opts);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let opts: CompileOptions = serde_json::from_str(r#"{"max-depth": 8}"#).unwrap();
        assert_eq!(opts.max_depth, 8);
        assert!(opts.base_card);
    }
}

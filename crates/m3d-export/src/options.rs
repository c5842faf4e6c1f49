//! Export options

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How an object's transform is made relative to its parents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    /// Component-wise: subtract every ancestor's location and rotation,
    /// divide by every ancestor's scale. This is the layout existing m3d
    /// files were written with.
    #[default]
    Legacy,
    /// Full affine composition against the direct parent's world transform
    Hierarchical,
}

/// Which children of an exported mesh are nested inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildPolicy {
    /// Only mesh children that are part of the selection
    #[default]
    Selected,
    /// Every mesh child
    All,
}

impl FromStr for TransformMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(TransformMode::Legacy),
            "hierarchical" => Ok(TransformMode::Hierarchical),
            _ => Err(format!("Unknown transform mode: {}", s)),
        }
    }
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformMode::Legacy => f.write_str("legacy"),
            TransformMode::Hierarchical => f.write_str("hierarchical"),
        }
    }
}

impl FromStr for ChildPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "selected" => Ok(ChildPolicy::Selected),
            "all" => Ok(ChildPolicy::All),
            _ => Err(format!("Unknown child policy: {}", s)),
        }
    }
}

impl fmt::Display for ChildPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildPolicy::Selected => f.write_str("selected"),
            ChildPolicy::All => f.write_str("all"),
        }
    }
}

/// XML export options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Parent-relative transform computation
    pub transform_mode: TransformMode,
    /// Child nesting rule
    pub child_policy: ChildPolicy,
    /// Output file extension, without the dot
    pub extension: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            transform_mode: TransformMode::Legacy,
            child_policy: ChildPolicy::Selected,
            extension: "xml".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ExportOptions::default();
        assert_eq!(options.transform_mode, TransformMode::Legacy);
        assert_eq!(options.child_policy, ChildPolicy::Selected);
        assert_eq!(options.extension, "xml");
    }

    #[test]
    fn test_parse() {
        assert_eq!("Hierarchical".parse(), Ok(TransformMode::Hierarchical));
        assert_eq!("all".parse(), Ok(ChildPolicy::All));
        assert!("affine".parse::<TransformMode>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for mode in [TransformMode::Legacy, TransformMode::Hierarchical] {
            assert_eq!(mode.to_string().parse(), Ok(mode));
        }
    }
}

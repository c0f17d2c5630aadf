//! Normalized entry paths.
//!
//! Every entry in the store is keyed by a `/`-delimited path without a
//! leading separator. The root directory is the reserved key [`ROOT`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key of the root directory.
pub const ROOT: &str = "root";

/// Errors related to path parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A path component is not allowed in a stored path.
    InvalidComponent {
        component: String,
        position: usize,
        message: String,
    },
    /// The path string is invalid.
    InvalidPath { message: String },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::InvalidComponent {
                component,
                position,
                message,
            } => {
                write!(
                    f,
                    "invalid path component '{}' at position {}: {}",
                    component, position, message
                )
            }
            PathError::InvalidPath { message } => {
                write!(f, "invalid path: {}", message)
            }
        }
    }
}

impl std::error::Error for PathError {}

/// A normalized path in the virtual file system.
///
/// Components are non-empty and never `.` or `..`; relative navigation is
/// resolved by the shell before a path reaches the store.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Path {
    pub components: Vec<String>,
}

impl Path {
    /// The root directory.
    pub fn root() -> Self {
        Path {
            components: vec![ROOT.to_string()],
        }
    }

    /// Parse a stored path string.
    ///
    /// Empty components are ignored, so `//` and leading or trailing
    /// separators normalize away. An empty string is the root.
    ///
    /// ```rust
    /// use webos_vfs::Path;
    ///
    /// let path = Path::parse("root/docs/note.md").unwrap();
    /// assert_eq!(path.len(), 3);
    /// assert_eq!(Path::parse("/root/docs/").unwrap(), Path::parse("root/docs").unwrap());
    /// ```
    pub fn parse(s: &str) -> Result<Self, PathError> {
        let components: Vec<String> = s
            .split('/')
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string())
            .collect();

        if components.is_empty() {
            return Ok(Path::root());
        }

        Self::try_from_components(components)
    }

    /// Try to create a path from components, validating each.
    pub fn try_from_components(components: Vec<String>) -> Result<Self, PathError> {
        if components.is_empty() {
            return Err(PathError::InvalidPath {
                message: "a path needs at least one component".to_string(),
            });
        }
        for (i, component) in components.iter().enumerate() {
            Self::validate_component(component, i)?;
        }
        Ok(Path { components })
    }

    /// Validate a single path component.
    pub(crate) fn validate_component(component: &str, position: usize) -> Result<(), PathError> {
        let invalid = |message: &str| PathError::InvalidComponent {
            component: component.to_string(),
            position,
            message: message.to_string(),
        };

        if component.is_empty() {
            return Err(invalid("empty component"));
        }
        if component == "." || component == ".." {
            return Err(invalid("relative components must be resolved first"));
        }
        if component.contains('/') {
            return Err(invalid("contains a path separator"));
        }
        if component.chars().any(char::is_control) {
            return Err(invalid("contains a control character"));
        }

        Ok(())
    }

    /// Check if this path is the root directory.
    pub fn is_root(&self) -> bool {
        self.components.len() == 1 && self.components[0] == ROOT
    }

    /// Get the number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// A valid path always has at least one component.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The parent directory.
    ///
    /// The parent of the root, and of any single-component path, is the
    /// root itself.
    #[must_use]
    pub fn parent(&self) -> Path {
        if self.components.len() <= 1 {
            return Path::root();
        }
        Path {
            components: self.components[..self.components.len() - 1].to_vec(),
        }
    }

    /// The last component.
    pub fn name(&self) -> &str {
        self.components.last().map(String::as_str).unwrap_or(ROOT)
    }

    /// Append a single validated component.
    pub fn child(&self, name: &str) -> Result<Path, PathError> {
        Self::validate_component(name, self.components.len())?;
        let mut components = self.components.clone();
        components.push(name.to_string());
        Ok(Path { components })
    }

    /// Join this path with a relative `/`-delimited string.
    pub fn join_str(&self, relative: &str) -> Result<Path, PathError> {
        let mut path = self.clone();
        for component in relative.split('/').filter(|c| !c.is_empty()) {
            path = path.child(component)?;
        }
        Ok(path)
    }

    /// The storage key of this path.
    pub fn key(&self) -> String {
        self.components.join("/")
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("/"))
    }
}

impl TryFrom<String> for Path {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Path::parse(&value)
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.key()
    }
}

/// Macro for creating paths from literals.
///
/// ```rust
/// use webos_vfs::path;
///
/// let p = path!("root/docs");
/// assert_eq!(p.name(), "docs");
/// ```
#[macro_export]
macro_rules! path {
    ($s:expr) => {
        $crate::Path::parse($s).expect("invalid path literal")
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_paths() {
        assert_eq!(Path::parse("root").unwrap().len(), 1);
        assert_eq!(Path::parse("root/docs").unwrap().len(), 2);
        assert_eq!(Path::parse("root/docs/a.md").unwrap().len(), 3);
    }

    #[test]
    fn empty_string_is_root() {
        assert!(Path::parse("").unwrap().is_root());
        assert!(Path::parse("/").unwrap().is_root());
    }

    #[test]
    fn normalize_slashes() {
        assert_eq!(path!("root/docs/"), path!("root/docs"));
        assert_eq!(path!("root//docs"), path!("root/docs"));
        assert_eq!(path!("/root/docs"), path!("root/docs"));
    }

    #[test]
    fn file_names_with_punctuation_allowed() {
        let p = path!("root/my-notes/README.md");
        assert_eq!(p.name(), "README.md");
    }

    #[test]
    fn relative_components_rejected() {
        assert!(Path::parse("root/../etc").is_err());
        assert!(Path::parse("root/./docs").is_err());
    }

    #[test]
    fn control_characters_rejected() {
        let err = Path::parse("root/bad\nname").unwrap_err();
        assert!(err.to_string().contains("control character"));
    }

    #[test]
    fn parent_of_nested_path() {
        assert_eq!(path!("root/docs/a.md").parent(), path!("root/docs"));
        assert_eq!(path!("root/docs").parent(), Path::root());
    }

    #[test]
    fn parent_of_root_is_root() {
        assert!(Path::root().parent().is_root());
        assert!(path!("orphan").parent().is_root());
    }

    #[test]
    fn name_is_last_component() {
        assert_eq!(path!("root/docs/a.md").name(), "a.md");
        assert_eq!(Path::root().name(), ROOT);
    }

    #[test]
    fn child_validates() {
        let root = Path::root();
        assert_eq!(root.child("docs").unwrap(), path!("root/docs"));
        assert!(root.child("a/b").is_err());
        assert!(root.child("").is_err());
    }

    #[test]
    fn join_str_appends_components() {
        let p = Path::root().join_str("src/lib.rs").unwrap();
        assert_eq!(p.to_string(), "root/src/lib.rs");
    }

    #[test]
    fn serde_uses_key_string() {
        let p = path!("root/docs");
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"root/docs\"");
        let back: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn path_error_display_invalid_component() {
        let err = PathError::InvalidComponent {
            component: "..".to_string(),
            position: 2,
            message: "test message".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains(".."));
        assert!(display.contains("position 2"));
        assert!(display.contains("test message"));
    }
}

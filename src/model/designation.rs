//! Line designation: the stable identity of a line, usually `<text-name> <line-name>`.

use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Designation(String);

impl Designation {
    pub const SEPARATOR: char = ' ';

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn from_parts(text_name: &str, line_name: &str) -> Self {
        Self(format!("{text_name}{}{line_name}", Self::SEPARATOR))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything before the first space (the whole designation if there is none).
    pub fn text_name(&self) -> &str {
        self.0
            .split_once(Self::SEPARATOR)
            .map_or(self.0.as_str(), |(text, _)| text)
    }

    /// Everything after the first space.
    pub fn line_name(&self) -> Option<&str> {
        self.0.split_once(Self::SEPARATOR).map(|(_, line)| line)
    }
}

impl fmt::Display for Designation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Designation {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Designation {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Designation {
    fn from(value: String) -> Self {
        Self(value)
    }
}

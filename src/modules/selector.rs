// Compound class selector, e.g. `.conversation-title.gds-title-m`.
// This is the only kind of lookup the content side ever does on a page.

use std::fmt;
use std::str::FromStr;

use crate::error::SelectorError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSelector {
    classes: Vec<String>,
}

impl ClassSelector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(SelectorError::Empty);
        }
        if !trimmed.starts_with('.') {
            return Err(SelectorError::Unsupported(trimmed.to_string()));
        }

        let mut classes = Vec::new();
        for class in trimmed[1..].split('.') {
            let valid = !class.is_empty()
                && class
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !valid {
                return Err(SelectorError::Unsupported(trimmed.to_string()));
            }
            classes.push(class.to_string());
        }

        Ok(Self { classes })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl fmt::Display for ClassSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for class in &self.classes {
            write!(f, ".{}", class)?;
        }
        Ok(())
    }
}

impl FromStr for ClassSelector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

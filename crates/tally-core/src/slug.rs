use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

const MAX_LENGTH: usize = 256;

/// A validated content slug, e.g. `my-post` or `til/rust-lifetimes`.
///
/// Slugs are trimmed, non-empty and at most 256 bytes. Any printable
/// character is accepted except `:`, so a slug cannot be confused with the
/// `:ips` / `:visitors` companion keys of another slug.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Creates a new `Slug` after trimming and validating the input.
    pub fn new(slug: impl AsRef<str>) -> Result<Self> {
        let slug = slug.as_ref().trim();
        Self::validate(slug)?;
        Ok(Self(slug.to_owned()))
    }

    /// Returns the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(slug: &str) -> Result<()> {
        if slug.is_empty() {
            return Err(CoreError::InvalidSlug("slug cannot be empty".to_string()));
        }

        if slug.len() > MAX_LENGTH {
            return Err(CoreError::InvalidSlug(format!(
                "length must be at most {}, got {}",
                MAX_LENGTH,
                slug.len()
            )));
        }

        if slug.contains(':') {
            return Err(CoreError::InvalidSlug(format!(
                "must not contain ':': '{}'",
                slug
            )));
        }

        if slug.chars().any(char::is_control) {
            return Err(CoreError::InvalidSlug(
                "must not contain control characters".to_string(),
            ));
        }

        Ok(())
    }
}

impl Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Slug {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

use std::path::{Path, PathBuf};

use bumpwright_core::FieldPath;
use toml_edit::{DocumentMut, Item};

use crate::error::ManifestError;
use crate::format::ManifestFormat;

/// A parsed manifest that can be edited in place and rendered back without
/// disturbing the parts that were not touched.
///
/// JSON documents keep their key order and are rendered with two-space
/// indentation and a trailing newline. TOML documents keep comments and
/// layout.
#[derive(Debug, Clone)]
pub struct ManifestDocument {
    path: PathBuf,
    content: Content,
}

#[derive(Debug, Clone)]
enum Content {
    Json(serde_json::Value),
    Toml(DocumentMut),
}

impl ManifestDocument {
    /// Parses `text` in the format implied by the extension of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::UnsupportedFormat`] for unknown extensions,
    /// or a parse error if `text` is malformed.
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self, ManifestError> {
        let path = path.into();
        let content = match ManifestFormat::from_path(&path)? {
            ManifestFormat::Json => {
                let value = serde_json::from_str(text).map_err(|source| {
                    ManifestError::ParseJson {
                        path: path.clone(),
                        source,
                    }
                })?;
                Content::Json(value)
            }
            ManifestFormat::Toml => {
                let doc = text
                    .parse::<DocumentMut>()
                    .map_err(|source| ManifestError::ParseToml {
                        path: path.clone(),
                        source,
                    })?;
                Content::Toml(doc)
            }
        };
        Ok(Self { path, content })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn format(&self) -> ManifestFormat {
        match self.content {
            Content::Json(_) => ManifestFormat::Json,
            Content::Toml(_) => ManifestFormat::Toml,
        }
    }

    /// Returns the string at `field`, or `None` if any segment is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::NotAString`] if the field exists but holds a
    /// non-string value.
    pub fn get_str(&self, field: &FieldPath) -> Result<Option<&str>, ManifestError> {
        let found = match &self.content {
            Content::Json(root) => json_value(root, field).map(serde_json::Value::as_str),
            Content::Toml(doc) => toml_item(doc, field).map(Item::as_str),
        };
        match found {
            None => Ok(None),
            Some(Some(s)) => Ok(Some(s)),
            Some(None) => Err(self.not_a_string(field)),
        }
    }

    /// Like [`Self::get_str`] but treats an absent field as an error.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::MissingField`] or [`ManifestError::NotAString`].
    pub fn require_str(&self, field: &FieldPath) -> Result<&str, ManifestError> {
        self.get_str(field)?
            .ok_or_else(|| self.missing_field(field))
    }

    /// Replaces the existing string at `field`. Returns whether the value
    /// changed.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::MissingField`] if the field does not exist, or
    /// [`ManifestError::NotAString`] if it holds a non-string value.
    pub fn set_str(&mut self, field: &FieldPath, new_value: &str) -> Result<bool, ManifestError> {
        let changed = match &mut self.content {
            Content::Json(root) => match json_value_mut(root, field) {
                None => None,
                Some(serde_json::Value::String(current)) => {
                    if current == new_value {
                        Some(Some(false))
                    } else {
                        new_value.clone_into(current);
                        Some(Some(true))
                    }
                }
                Some(_) => Some(None),
            },
            Content::Toml(doc) => {
                toml_item_mut(doc, field).map(|item| set_toml_str(item, new_value))
            }
        };

        match changed {
            None => Err(self.missing_field(field)),
            Some(None) => Err(self.not_a_string(field)),
            Some(Some(changed)) => Ok(changed),
        }
    }

    /// Serializes the document back to text.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::SerializeJson`] if JSON serialization fails.
    pub fn render(&self) -> Result<String, ManifestError> {
        match &self.content {
            Content::Json(root) => {
                let mut text = serde_json::to_string_pretty(root).map_err(|source| {
                    ManifestError::SerializeJson {
                        path: self.path.clone(),
                        source,
                    }
                })?;
                text.push('\n');
                Ok(text)
            }
            Content::Toml(doc) => Ok(doc.to_string()),
        }
    }

    fn missing_field(&self, field: &FieldPath) -> ManifestError {
        ManifestError::MissingField {
            path: self.path.clone(),
            field: field.to_string(),
        }
    }

    fn not_a_string(&self, field: &FieldPath) -> ManifestError {
        ManifestError::NotAString {
            path: self.path.clone(),
            field: field.to_string(),
        }
    }
}

fn json_value<'a>(root: &'a serde_json::Value, field: &FieldPath) -> Option<&'a serde_json::Value> {
    field
        .segments()
        .iter()
        .try_fold(root, |value, segment| value.get(segment.as_str()))
}

fn json_value_mut<'a>(
    root: &'a mut serde_json::Value,
    field: &FieldPath,
) -> Option<&'a mut serde_json::Value> {
    field
        .segments()
        .iter()
        .try_fold(root, |value, segment| value.get_mut(segment.as_str()))
}

fn toml_item<'a>(doc: &'a DocumentMut, field: &FieldPath) -> Option<&'a Item> {
    field
        .segments()
        .iter()
        .try_fold(doc.as_item(), |item, segment| item.get(segment.as_str()))
}

fn toml_item_mut<'a>(doc: &'a mut DocumentMut, field: &FieldPath) -> Option<&'a mut Item> {
    field
        .segments()
        .iter()
        .try_fold(doc.as_item_mut(), |item, segment| item.get_mut(segment.as_str()))
}

/// `None` if the item is not a string; otherwise whether it changed. The
/// value's surrounding whitespace and trailing comment are kept.
fn set_toml_str(item: &mut Item, new_value: &str) -> Option<bool> {
    let value = item.as_value_mut()?;
    let current = value.as_str()?;
    if current == new_value {
        return Some(false);
    }

    let decor = value.decor().clone();
    *value = toml_edit::Value::from(new_value);
    *value.decor_mut() = decor;
    Some(true)
}

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};

/// A title/value pair rendered inside an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub short: bool,
}

impl Field {
    /// A field laid out side by side with its neighbours.
    pub fn short(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short: true,
        }
    }
}

/// Legacy Slack message attachment.
///
/// Keys this type does not model (`title`, `text`, `pretext`, ...) are kept in
/// `extra` so attachment files can use the full Slack vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub footer: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub footer_icon: String,
    /// Display time in epoch seconds; unrelated to the message timestamp.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "epoch_seconds"
    )]
    pub ts: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Accepts `ts` as a JSON number or a numeric string; it is always sent back as a number.
fn epoch_seconds<'de, D>(deserializer: D) -> Result<Option<Number>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(Number),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Raw::Text(text)) => text.trim().parse::<Number>().map(Some).map_err(|_| {
            <D::Error as serde::de::Error>::custom(format!("invalid epoch seconds '{text}'"))
        }),
    }
}

/// What an attachment file contained: one object or a list of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Attachments {
    Single(Attachment),
    Many(Vec<Attachment>),
}

impl Attachments {
    pub fn as_slice(&self) -> &[Attachment] {
        match self {
            Attachments::Single(one) => std::slice::from_ref(one),
            Attachments::Many(many) => many,
        }
    }

    fn append_fields(&mut self, additions: &[Field]) {
        match self {
            Attachments::Single(one) => one.fields.extend_from_slice(additions),
            Attachments::Many(many) => {
                for attachment in many.iter_mut() {
                    attachment.fields.extend_from_slice(additions);
                }
            }
        }
    }
}

impl From<Attachment> for Attachments {
    fn from(attachment: Attachment) -> Self {
        Attachments::Single(attachment)
    }
}

/// Read a JSON attachment file and append `additions` to every attachment in it.
pub fn load_attachments(path: &Path, additions: &[Field]) -> Result<Attachments> {
    let bytes = fs::read(path).map_err(|source| Error::ReadAttachments {
        path: path.to_path_buf(),
        source,
    })?;

    let invalid = |source| Error::InvalidJson {
        path: path.to_path_buf(),
        source,
    };

    let mut parsed = match serde_json::from_slice::<Value>(&bytes).map_err(invalid)? {
        list @ Value::Array(_) => {
            Attachments::Many(serde_json::from_value(list).map_err(invalid)?)
        }
        other => Attachments::Single(serde_json::from_value(other).map_err(invalid)?),
    };

    parsed.append_fields(additions);
    tracing::debug!(
        file = %path.display(),
        attachments = parsed.as_slice().len(),
        "Loaded attachments file"
    );
    Ok(parsed)
}

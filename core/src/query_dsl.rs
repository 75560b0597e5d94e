//! Query DSL fragments.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::builder::{vec_add, vec_add_all, SingleUse};
use crate::error::BuildError;

const TYPE_NAME: &str = "LikeDocument";

/// An entry of a `more_like_this` query's `like`/`unlike` list: either a
/// document reference or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Like {
    Document(LikeDocument),
    Text(String),
}

impl Like {
    /// Builder for the `Document` variant.
    pub fn document() -> LikeDocumentBuilder {
        LikeDocument::builder()
    }

    pub fn text(value: impl Into<String>) -> Self {
        Like::Text(value.into())
    }

    pub fn as_document(&self) -> Option<&LikeDocument> {
        match self {
            Like::Document(doc) => Some(doc),
            Like::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Like::Document(_) => None,
            Like::Text(text) => Some(text),
        }
    }
}

impl From<LikeDocument> for Like {
    fn from(value: LikeDocument) -> Self {
        Like::Document(value)
    }
}

impl From<String> for Like {
    fn from(value: String) -> Self {
        Like::Text(value)
    }
}

impl From<&str> for Like {
    fn from(value: &str) -> Self {
        Like::Text(value.to_string())
    }
}

/// A document referenced by index/id, or supplied inline via `doc`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LikeDocument {
    #[serde(rename = "_index", default, skip_serializing_if = "Option::is_none")]
    index: Option<String>,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    doc: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    routing: Option<String>,
}

impl LikeDocument {
    pub fn builder() -> LikeDocumentBuilder {
        LikeDocumentBuilder::default()
    }

    pub fn of(f: impl FnOnce(&mut LikeDocumentBuilder) -> &mut LikeDocumentBuilder) -> Result<Self, BuildError> {
        f(&mut Self::builder()).build()
    }

    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn doc(&self) -> Option<&Value> {
        self.doc.as_ref()
    }

    pub fn fields(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }

    pub fn routing(&self) -> Option<&str> {
        self.routing.as_deref()
    }
}

#[derive(Debug, Default)]
pub struct LikeDocumentBuilder {
    index: Option<String>,
    id: Option<String>,
    doc: Option<Value>,
    fields: Option<Vec<String>>,
    routing: Option<String>,
    guard: SingleUse,
}

impl LikeDocumentBuilder {
    pub fn index(&mut self, value: impl Into<String>) -> &mut Self {
        self.index = Some(value.into());
        self
    }

    pub fn id(&mut self, value: impl Into<String>) -> &mut Self {
        self.id = Some(value.into());
        self
    }

    pub fn doc(&mut self, value: impl Into<Value>) -> &mut Self {
        self.doc = Some(value.into());
        self
    }

    pub fn field(&mut self, value: impl Into<String>) -> &mut Self {
        vec_add(&mut self.fields, value.into());
        self
    }

    pub fn fields<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        vec_add_all(&mut self.fields, values.into_iter().map(Into::into));
        self
    }

    pub fn routing(&mut self, value: impl Into<String>) -> &mut Self {
        self.routing = Some(value.into());
        self
    }

    pub fn build(&mut self) -> Result<LikeDocument, BuildError> {
        self.guard.check(TYPE_NAME)?;
        Ok(LikeDocument {
            index: self.index.take(),
            id: self.id.take(),
            doc: self.doc.take(),
            fields: self.fields.take(),
            routing: self.routing.take(),
        })
    }
}

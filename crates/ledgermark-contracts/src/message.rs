use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::annotation::Annotation;
use crate::validation::ValidationError;

/// `messageType` carried by wrappers whose content is a list of annotations.
pub const ANNOTATION_LIST_TYPE: &str = "AnnotationList";

/// Lifecycle verb describing what happened to the annotated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdkAction {
    /// Data was created.
    Create,
    /// Data was changed.
    Mutate,
    /// Data moved between hosts.
    Transit,
    /// Data was published downstream.
    Publish,
}

impl fmt::Display for SdkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SdkAction::Create => "create",
            SdkAction::Mutate => "mutate",
            SdkAction::Transit => "transit",
            SdkAction::Publish => "publish",
        };
        f.write_str(name)
    }
}

impl FromStr for SdkAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(SdkAction::Create),
            "mutate" => Ok(SdkAction::Mutate),
            "transit" => Ok(SdkAction::Transit),
            "publish" => Ok(SdkAction::Publish),
            other => Err(ValidationError::PatternMismatch {
                field: "SdkAction",
                value: other.to_string(),
            }),
        }
    }
}

/// Transport envelope grouping annotations for a single publish call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishWrapper {
    /// What happened to the data the annotations describe.
    pub action: SdkAction,
    /// Content type tag (always [`ANNOTATION_LIST_TYPE`] for now).
    pub message_type: String,
    /// Annotations in the order they were produced.
    pub content: Vec<Annotation>,
}

impl PublishWrapper {
    /// Wraps a list of annotations.
    pub fn new(action: SdkAction, content: Vec<Annotation>) -> Self {
        Self {
            action,
            message_type: ANNOTATION_LIST_TYPE.to_string(),
            content,
        }
    }

    /// Serializes the wrapper into the bytes submitted to a ledger topic.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

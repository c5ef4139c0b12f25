//! Materialized extension instances.

use crate::extension::point::PointId;
use serde::Serialize;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Content classifier reported by an extension implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Html,
    Text,
    Json,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

/// Behavior supplied by one extension implementation type.
pub trait ExtensionContent: Send + Sync {
    fn media_type(&self) -> Option<MediaType>;

    /// Replacement for the host's content at the extension point, if any.
    fn override_content(&self, _original: &str) -> Option<String> {
        None
    }
}

/// Extension instance tagged with the point it was resolved for.
#[derive(Clone)]
pub struct Extension {
    type_name: String,
    point_id: Option<PointId>,
    module_id: Option<String>,
    content: Arc<dyn ExtensionContent>,
}

impl Extension {
    pub fn new(type_name: impl Into<String>, content: Arc<dyn ExtensionContent>) -> Self {
        Self {
            type_name: type_name.into(),
            point_id: None,
            module_id: None,
            content,
        }
    }

    pub fn with_point_id(mut self, point_id: PointId) -> Self {
        self.point_id = Some(point_id);
        self
    }

    pub fn with_module_id(mut self, module_id: impl Into<String>) -> Self {
        self.module_id = Some(module_id.into());
        self
    }

    pub fn set_point_id(&mut self, point_id: PointId) {
        self.point_id = Some(point_id);
    }

    pub fn point_id(&self) -> Option<&PointId> {
        self.point_id.as_ref()
    }

    pub fn module_id(&self) -> Option<&str> {
        self.module_id.as_deref()
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn media_type(&self) -> Option<MediaType> {
        self.content.media_type()
    }

    pub fn override_content(&self, original: &str) -> Option<String> {
        self.content.override_content(original)
    }

    /// `point|media` key; missing parts render empty.
    pub fn extension_id(&self) -> String {
        format!(
            "{}|{}",
            self.point_id.as_ref().map(PointId::as_str).unwrap_or_default(),
            self.media_type().map(MediaType::as_str).unwrap_or_default()
        )
    }

    pub fn content(&self) -> &Arc<dyn ExtensionContent> {
        &self.content
    }

    /// Returns whether both handles wrap the same implementation instance.
    pub fn same_instance(&self, other: &Extension) -> bool {
        Arc::ptr_eq(&self.content, &other.content)
    }
}

impl Debug for Extension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extension")
            .field("type_name", &self.type_name)
            .field("point_id", &self.point_id)
            .field("module_id", &self.module_id)
            .field("media_type", &self.media_type())
            .finish()
    }
}

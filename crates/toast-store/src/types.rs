//! Toast record and payload type definitions.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Callback invoked by a rendering surface when the user toggles a
/// record's visibility. Wired by the store to dismiss the record when
/// visibility goes false.
pub type OpenChangeFn = Arc<dyn Fn(bool) + Send + Sync>;

/// A queued notification record.
#[derive(Clone, Serialize)]
pub struct Toast {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub action: Option<ToastAction>,
    pub variant: ToastVariant,
    /// Visibility flag; `true` on creation, `false` once dismissed.
    pub open: bool,
    #[serde(skip)]
    pub on_open_change: Option<OpenChangeFn>,
}

impl fmt::Debug for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toast")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("description", &self.description)
            .field("action", &self.action)
            .field("variant", &self.variant)
            .field("open", &self.open)
            .field("on_open_change", &self.on_open_change.is_some())
            .finish()
    }
}

/// An action button attached to a toast. Opaque to the store; surfaces
/// decide how to render it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastAction {
    pub label: String,
}

/// Display style of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    Default,
    Destructive,
}

impl Default for ToastVariant {
    fn default() -> Self {
        Self::Default
    }
}

/// Creation payload for [`crate::ToastStore::create`].
///
/// The store fills in `id`, `open`, and the open-change wiring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToastPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub action: Option<ToastAction>,
    #[serde(default)]
    pub variant: ToastVariant,
}

/// Partial update merged into an existing record by
/// [`crate::ToastStore::update`]. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToastUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub action: Option<ToastAction>,
    pub variant: Option<ToastVariant>,
    pub open: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_serializes_without_callback() {
        let toast = Toast {
            id: "1".to_string(),
            title: Some("Saved".to_string()),
            description: None,
            action: Some(ToastAction {
                label: "Undo".to_string(),
            }),
            variant: ToastVariant::Destructive,
            open: true,
            on_open_change: Some(Arc::new(|_| {})),
        };

        let value = serde_json::to_value(&toast).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "1",
                "title": "Saved",
                "description": null,
                "action": { "label": "Undo" },
                "variant": "destructive",
                "open": true,
            })
        );
    }

    #[test]
    fn payload_defaults_to_default_variant() {
        let payload: ToastPayload = serde_json::from_value(serde_json::json!({
            "title": "Hello"
        }))
        .unwrap();
        assert_eq!(payload.variant, ToastVariant::Default);
    }

    #[test]
    fn debug_renders_callback_presence_only() {
        let toast = Toast {
            id: "7".to_string(),
            title: None,
            description: None,
            action: None,
            variant: ToastVariant::Default,
            open: false,
            on_open_change: None,
        };
        let rendered = format!("{toast:?}");
        assert!(rendered.contains("on_open_change: false"));
    }
}

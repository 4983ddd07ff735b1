use super::entity::ActiveModel;
use sea_orm::{ActiveModelBehavior, ActiveValue::Set};
use serde::Deserialize;

/// Client-controlled snippet fields as they arrive in a request body.
///
/// Each field keeps track of whether it was present, so an update only
/// touches what the client actually sent. Unknown keys are ignored and a JSON
/// `null` counts as absent.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SnippetPayload {
    title: Option<String>,
    body: Option<String>,
}

impl SnippetPayload {
    pub(crate) fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Builds a fresh row; absent fields fall back to empty strings.
    pub(crate) fn into_active_model(self) -> ActiveModel {
        let mut active_model = ActiveModel::new();
        active_model.title = Set(self.title.unwrap_or_default());
        active_model.body = Set(self.body.unwrap_or_default());
        active_model
    }

    pub(crate) fn apply_to(self, active_model: &mut ActiveModel) {
        if let Some(title) = self.title {
            active_model.title = Set(title);
        }
        if let Some(body) = self.body {
            active_model.body = Set(body);
        }
    }
}

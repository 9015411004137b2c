//! Action dispatch: turning a component's [`Action`] into the outbound
//! envelope sent back to the producer.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::data_model::DataModel;
use super::error::Result;
use super::message::Action;
use super::value::{self, Literal};

/// Outbound user action.
///
/// # Example JSON
///
/// ```text
/// {
///   "actionName": "submit",
///   "sourceComponentId": "submit-btn",
///   "timestamp": "2025-01-01T12:00:00Z",
///   "context": {"name": "Ada", "age": 36}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAction {
    pub action_name: String,

    /// Id of the component that triggered the action
    pub source_component_id: String,

    pub timestamp: DateTime<Utc>,

    /// Resolved context; keys whose path did not resolve map to `null`
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub context: IndexMap<String, Value>,
}

impl UserAction {
    /// Serialize to the wire form
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Resolves action context against a data model and stamps the envelope.
///
/// Holds no state; the model is read at dispatch time so that values the
/// user just edited are what the producer receives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionDispatcher;

impl ActionDispatcher {
    pub fn new() -> Self {
        ActionDispatcher
    }

    /// Build the outbound action, or `None` when the component has no action
    /// or the action has no name.
    pub fn dispatch(
        &self,
        action: Option<&Action>,
        source_component_id: &str,
        data_model: &DataModel,
    ) -> Option<UserAction> {
        self.dispatch_at(action, source_component_id, data_model, Utc::now())
    }

    /// Same as [`dispatch`](Self::dispatch) with an explicit timestamp.
    pub fn dispatch_at(
        &self,
        action: Option<&Action>,
        source_component_id: &str,
        data_model: &DataModel,
        timestamp: DateTime<Utc>,
    ) -> Option<UserAction> {
        let action = action?;
        if action.name.is_empty() {
            log::debug!(
                "[A2UI action] Unnamed action on '{}' ignored",
                source_component_id
            );
            return None;
        }

        let mut context = IndexMap::new();
        for item in &action.context {
            if item.key.is_empty() {
                log::warn!(
                    "[A2UI action] Context item without key in '{}', skipped",
                    action.name
                );
                continue;
            }
            let resolved = value::resolve(&item.value, data_model)
                .map(Literal::to_json)
                .unwrap_or(Value::Null);
            context.insert(item.key.clone(), resolved);
        }

        log::debug!(
            "[A2UI action] '{}' from '{}' with {} context value(s)",
            action.name,
            source_component_id,
            context.len()
        );

        Some(UserAction {
            action_name: action.name.clone(),
            source_component_id: source_component_id.to_string(),
            timestamp,
            context,
        })
    }
}

//! A2UI Message Processor
//!
//! Processes A2UI messages and maintains the state of all surfaces.

use std::borrow::Cow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::action::{ActionDispatcher, UserAction};
use super::component::{ComponentNode, TreeLimits};
use super::error::{BridgeError, Result};
use super::message::*;
use super::registry::ComponentCatalog;
use super::repair::repair_json;
use super::surface::{
    SurfaceRegistry, SurfaceSnapshot, DEFAULT_MAX_TREE_DEPTH, DEFAULT_MAX_TREE_NODES,
};
use super::value::Literal;

/// Processor settings.
///
/// # Example JSON
///
/// ```text
/// {"repairJson": true, "maxTreeDepth": 32, "maxTreeNodes": 2000}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessorConfig {
    /// Try to repair malformed JSON in [`Processor::process_json`]
    pub repair_json: bool,

    /// Depth bound for tree extraction
    pub max_tree_depth: usize,

    /// Node bound for tree extraction
    pub max_tree_nodes: usize,

    /// Surface id used when a caller does not name one
    pub default_surface_id: String,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        ProcessorConfig {
            repair_json: false,
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
            max_tree_nodes: DEFAULT_MAX_TREE_NODES,
            default_surface_id: "@default".to_string(),
        }
    }
}

/// Events that can be emitted by the processor
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessorEvent {
    SurfaceCreated {
        surface_id: String,
    },
    SurfaceUpdated {
        surface_id: String,
        updated_components: Vec<String>,
    },
    DataModelUpdated {
        surface_id: String,
        updated_paths: Vec<String>,
    },
    SurfaceDeleted {
        surface_id: String,
    },
}

/// The A2UI message processor.
///
/// Sole writer of surface state. Every applied message yields a new
/// [`SurfaceSnapshot`]; snapshots handed out earlier keep their contents.
///
/// # Example
///
/// ```rust
/// use bridge_kit::a2ui::{Message, Processor};
///
/// let mut processor = Processor::with_standard_catalog();
///
/// let json = r#"{"beginRendering": {"surfaceId": "main", "root": "root"}}"#;
/// let snapshot = processor.process(Message::from_json(json).unwrap()).unwrap();
/// assert_eq!(snapshot.root(), Some("root"));
///
/// for event in processor.take_events() {
///     println!("{:?}", event);
/// }
/// ```
#[derive(Debug)]
pub struct Processor {
    catalog: ComponentCatalog,
    config: ProcessorConfig,
    surfaces: SurfaceRegistry,
    dispatcher: ActionDispatcher,
    events: Vec<ProcessorEvent>,
}

impl Default for Processor {
    fn default() -> Self {
        Self::with_standard_catalog()
    }
}

impl Processor {
    /// Create a new processor with the given component catalog
    pub fn new(catalog: ComponentCatalog, config: ProcessorConfig) -> Self {
        Processor {
            catalog,
            config,
            surfaces: SurfaceRegistry::new(),
            dispatcher: ActionDispatcher::new(),
            events: Vec::new(),
        }
    }

    /// Create a new processor with the standard component catalog
    pub fn with_standard_catalog() -> Self {
        Self::new(ComponentCatalog::with_standard_catalog(), ProcessorConfig::default())
    }

    pub fn catalog(&self) -> &ComponentCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Get all surface IDs, in creation order
    pub fn surface_ids(&self) -> impl Iterator<Item = &str> {
        self.surfaces.ids()
    }

    /// Latest snapshot of a surface, or `None` if it does not exist
    pub fn current_snapshot(&self, surface_id: &str) -> Option<Arc<SurfaceSnapshot>> {
        self.surfaces.get(surface_id).cloned()
    }

    /// Drain the events emitted since the last call
    pub fn take_events(&mut self) -> Vec<ProcessorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply a single message.
    ///
    /// Returns the snapshot of the affected surface after the message, or
    /// `None` when the surface no longer exists (delete) or the message kind
    /// is unknown.
    pub fn process(&mut self, message: Message) -> Option<Arc<SurfaceSnapshot>> {
        log::debug!(
            "[A2UI processor] {} (surface '{}')",
            message.kind(),
            message.surface_id().unwrap_or("-")
        );

        match message {
            Message::BeginRendering(msg) => self.process_begin_rendering(msg),
            Message::SurfaceUpdate(msg) => self.process_surface_update(msg),
            Message::DataModelUpdate(msg) => self.process_data_model_update(msg),
            Message::DeleteSurface(msg) => self.process_delete_surface(msg),
            Message::Unknown { kind } => {
                log::warn!("[A2UI processor] Ignoring unknown message kind '{}'", kind);
                None
            }
        }
    }

    /// Apply messages in order. Returns the number of messages applied.
    pub fn process_all(&mut self, messages: impl IntoIterator<Item = Message>) -> usize {
        let mut count = 0;
        for message in messages {
            self.process(message);
            count += 1;
        }
        count
    }

    /// Parse and process a JSON string holding one message or an array of them.
    ///
    /// Malformed JSON is an error and leaves every surface as it was. Inside
    /// a well-formed array, elements that are not valid messages are skipped
    /// so that the rest of the batch still renders. Returns the number of
    /// messages applied.
    pub fn process_json(&mut self, json: &str) -> Result<usize> {
        let text = if self.config.repair_json {
            repair_json(json).unwrap_or(Cow::Borrowed(json))
        } else {
            Cow::Borrowed(json)
        };

        match serde_json::from_str::<Value>(&text)? {
            Value::Array(items) => {
                let mut count = 0;
                for (i, item) in items.into_iter().enumerate() {
                    match Message::from_value(item) {
                        Ok(message) => {
                            self.process(message);
                            count += 1;
                        }
                        Err(e) => {
                            log::warn!("[A2UI processor] Skipping message[{}]: {}", i, e);
                        }
                    }
                }
                Ok(count)
            }
            value @ Value::Object(_) => {
                self.process(Message::from_value(value)?);
                Ok(1)
            }
            _ => Err(BridgeError::InvalidEnvelope(
                "expected a message object or an array of messages".to_string(),
            )),
        }
    }

    /// Write a value produced by the renderer (two-way binding).
    ///
    /// Only existing surfaces accept local edits.
    pub fn apply_local_edit(
        &mut self,
        surface_id: &str,
        path: &str,
        value: Literal,
    ) -> Option<Arc<SurfaceSnapshot>> {
        if !self.surfaces.contains(surface_id) {
            log::warn!(
                "[A2UI processor] Local edit for unknown surface '{}' ignored",
                surface_id
            );
            return None;
        }

        let (surface, _) = self.surfaces.get_or_create_mut(surface_id);
        if let Some(key) = surface.data_model_mut().set(path, value) {
            surface.bump_version();
            self.events.push(ProcessorEvent::DataModelUpdated {
                surface_id: surface_id.to_string(),
                updated_paths: vec![key],
            });
        }
        self.current_snapshot(surface_id)
    }

    /// Dispatch the action of a component against its surface's current data model.
    ///
    /// `None` when the surface or component does not exist, or the component
    /// has no action.
    pub fn dispatch(&self, surface_id: &str, component_id: &str) -> Option<UserAction> {
        let surface = self.surfaces.get(surface_id)?;
        let component = surface.component(component_id)?;
        self.dispatcher.dispatch(
            component.kind.action().as_deref(),
            component_id,
            surface.data_model(),
        )
    }

    /// Dispatch the action of one item of a Breadcrumb or DropdownMenu.
    pub fn dispatch_item(
        &self,
        surface_id: &str,
        component_id: &str,
        item_index: usize,
    ) -> Option<UserAction> {
        let surface = self.surfaces.get(surface_id)?;
        let component = surface.component(component_id)?;
        self.dispatcher.dispatch(
            component.kind.item_action(item_index).as_deref(),
            component_id,
            surface.data_model(),
        )
    }

    // ========================================================================
    // Private processing methods
    // ========================================================================

    /// Open a surface for writing, creating it if needed.
    fn open_surface(&mut self, surface_id: &str) -> &mut SurfaceSnapshot {
        let (surface, created) = self.surfaces.get_or_create_mut(surface_id);
        if created {
            log::debug!("[A2UI processor] Created surface '{}'", surface_id);
            surface.set_tree_limits(TreeLimits {
                max_depth: self.config.max_tree_depth,
                max_nodes: self.config.max_tree_nodes,
            });
            self.events.push(ProcessorEvent::SurfaceCreated {
                surface_id: surface_id.to_string(),
            });
        }
        surface.bump_version();
        surface
    }

    fn process_begin_rendering(&mut self, msg: BeginRendering) -> Option<Arc<SurfaceSnapshot>> {
        let surface = self.open_surface(&msg.surface_id);

        // Existing components are kept: a repeated beginRendering only re-roots.
        surface.set_root(msg.root);
        if let Some(styles) = msg.styles {
            surface.set_styles(styles);
        }

        self.events.push(ProcessorEvent::SurfaceUpdated {
            surface_id: msg.surface_id.clone(),
            updated_components: Vec::new(),
        });
        self.current_snapshot(&msg.surface_id)
    }

    fn process_surface_update(&mut self, msg: SurfaceUpdate) -> Option<Arc<SurfaceSnapshot>> {
        let nodes: Vec<ComponentNode> = msg
            .components
            .iter()
            .map(|definition| ComponentNode::from_definition(definition, &self.catalog))
            .collect();
        let updated_components = nodes.iter().map(|node| node.id.clone()).collect();

        let components = self.open_surface(&msg.surface_id).components_mut();
        for node in nodes {
            components.upsert(node);
        }

        self.events.push(ProcessorEvent::SurfaceUpdated {
            surface_id: msg.surface_id.clone(),
            updated_components,
        });
        self.current_snapshot(&msg.surface_id)
    }

    fn process_data_model_update(&mut self, msg: DataModelUpdate) -> Option<Arc<SurfaceSnapshot>> {
        let updated_paths = self
            .open_surface(&msg.surface_id)
            .data_model_mut()
            .merge(&msg.path, &msg.contents);

        self.events.push(ProcessorEvent::DataModelUpdated {
            surface_id: msg.surface_id.clone(),
            updated_paths,
        });
        self.current_snapshot(&msg.surface_id)
    }

    fn process_delete_surface(&mut self, msg: DeleteSurface) -> Option<Arc<SurfaceSnapshot>> {
        if self.surfaces.remove(&msg.surface_id).is_some() {
            self.events.push(ProcessorEvent::SurfaceDeleted {
                surface_id: msg.surface_id,
            });
        } else {
            log::warn!(
                "[A2UI processor] Delete for unknown surface '{}' ignored",
                msg.surface_id
            );
        }
        None
    }
}

//! A2UI Surfaces
//!
//! A surface is one independent UI document: a root id, a component table,
//! a data model and style hints. The registry hands out [`Arc`]-shared
//! snapshots and mutates through copy-on-write, so a snapshot a renderer is
//! holding never changes under it.

use std::sync::Arc;

use indexmap::IndexMap;

use super::component::{ComponentNode, ComponentTable, TreeLimits, TreeNode};
use super::data_model::DataModel;
use super::message::SurfaceStyles;
use super::value::{self, DataValue, Literal};

/// Default bound on tree extraction depth
pub const DEFAULT_MAX_TREE_DEPTH: usize = 64;

/// Default bound on the number of nodes in one extracted tree
pub const DEFAULT_MAX_TREE_NODES: usize = 10_000;

/// Immutable view of a surface after a fully applied message.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSnapshot {
    surface_id: String,
    root: Option<String>,
    styles: Option<SurfaceStyles>,
    components: Arc<ComponentTable>,
    data_model: Arc<DataModel>,
    version: u64,
    tree_limits: TreeLimits,
}

impl SurfaceSnapshot {
    /// Create an empty surface
    pub fn new(surface_id: impl Into<String>) -> Self {
        SurfaceSnapshot {
            surface_id: surface_id.into(),
            root: None,
            styles: None,
            components: Arc::default(),
            data_model: Arc::default(),
            version: 0,
            tree_limits: TreeLimits {
                max_depth: DEFAULT_MAX_TREE_DEPTH,
                max_nodes: DEFAULT_MAX_TREE_NODES,
            },
        }
    }

    pub fn surface_id(&self) -> &str {
        &self.surface_id
    }

    /// Root component id, if one has been set
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn styles(&self) -> Option<&SurfaceStyles> {
        self.styles.as_ref()
    }

    pub fn components(&self) -> &ComponentTable {
        &self.components
    }

    pub fn data_model(&self) -> &DataModel {
        &self.data_model
    }

    /// Number of messages applied to this surface
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get a component by ID
    pub fn component(&self, id: &str) -> Option<&ComponentNode> {
        self.components.get(id)
    }

    /// Materialize the component tree from the root.
    ///
    /// `None` while no root is set or the root component has not arrived yet.
    pub fn tree(&self) -> Option<TreeNode<'_>> {
        let root = self.root.as_deref()?;
        self.components.build_tree_with(root, self.tree_limits)
    }

    /// Resolve a bound value against this surface's data model.
    pub fn resolve<'a>(&'a self, value: &'a DataValue) -> Option<&'a Literal> {
        value::resolve(value, &self.data_model)
    }

    // Mutation is crate-internal and only reachable through the registry.

    pub(crate) fn set_root(&mut self, root: String) {
        self.root = (!root.is_empty()).then_some(root);
    }

    pub(crate) fn set_styles(&mut self, styles: SurfaceStyles) {
        self.styles = Some(styles);
    }

    pub(crate) fn set_tree_limits(&mut self, tree_limits: TreeLimits) {
        self.tree_limits = tree_limits;
    }

    pub(crate) fn components_mut(&mut self) -> &mut ComponentTable {
        Arc::make_mut(&mut self.components)
    }

    pub(crate) fn data_model_mut(&mut self) -> &mut DataModel {
        Arc::make_mut(&mut self.data_model)
    }

    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }
}

/// Owner of all live surfaces, keyed by surface id.
#[derive(Debug, Clone, Default)]
pub struct SurfaceRegistry {
    surfaces: IndexMap<String, Arc<SurfaceSnapshot>>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot of a surface
    pub fn get(&self, surface_id: &str) -> Option<&Arc<SurfaceSnapshot>> {
        self.surfaces.get(surface_id)
    }

    pub fn contains(&self, surface_id: &str) -> bool {
        self.surfaces.contains_key(surface_id)
    }

    /// Surface ids in creation order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.surfaces.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Writable access to a surface, creating it if absent.
    ///
    /// Returns the surface and whether it was just created. If a reader
    /// still holds the current snapshot, the surface is cloned first.
    pub(crate) fn get_or_create_mut(&mut self, surface_id: &str) -> (&mut SurfaceSnapshot, bool) {
        let created = !self.surfaces.contains_key(surface_id);
        let surface = self
            .surfaces
            .entry(surface_id.to_string())
            .or_insert_with(|| Arc::new(SurfaceSnapshot::new(surface_id)));
        (Arc::make_mut(surface), created)
    }

    /// Remove a surface and all its state
    pub(crate) fn remove(&mut self, surface_id: &str) -> Option<Arc<SurfaceSnapshot>> {
        self.surfaces.shift_remove(surface_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a2ui::message::{ComponentKind, TextComponent};

    fn text(id: &str, value: &str) -> ComponentNode {
        ComponentNode::new(
            id,
            ComponentKind::Text(TextComponent {
                text: DataValue::string(value),
                usage_hint: None,
            }),
        )
    }

    #[test]
    fn test_get_or_create() {
        let mut registry = SurfaceRegistry::new();

        let (_, created) = registry.get_or_create_mut("main");
        assert!(created);
        let (_, created) = registry.get_or_create_mut("main");
        assert!(!created);

        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["main"]);
    }

    #[test]
    fn test_old_snapshot_is_not_mutated() {
        let mut registry = SurfaceRegistry::new();
        registry.get_or_create_mut("main").0.components_mut().upsert(text("a", "one"));

        let before = Arc::clone(registry.get("main").unwrap());

        let (surface, _) = registry.get_or_create_mut("main");
        surface.components_mut().upsert(text("a", "two"));
        surface.data_model_mut().set("x", Literal::from(1.0));

        assert_eq!(before.component("a"), Some(&text("a", "one")));
        assert!(before.data_model().is_empty());

        let after = registry.get("main").unwrap();
        assert_eq!(after.component("a"), Some(&text("a", "two")));
        assert_eq!(after.data_model().get_number("x"), Some(1.0));
    }

    #[test]
    fn test_untouched_parts_stay_shared() {
        let mut registry = SurfaceRegistry::new();
        registry.get_or_create_mut("main").0.components_mut().upsert(text("a", "one"));
        let before = Arc::clone(registry.get("main").unwrap());

        registry.get_or_create_mut("main").0.data_model_mut().set("k", "v".into());

        let after = registry.get("main").unwrap();
        assert!(Arc::ptr_eq(&before.components, &after.components));
        assert!(!Arc::ptr_eq(&before.data_model, &after.data_model));
    }

    #[test]
    fn test_tree_needs_root() {
        let mut surface = SurfaceSnapshot::new("main");
        surface.components_mut().upsert(text("a", "A"));
        assert!(surface.tree().is_none());

        surface.set_root("a".into());
        assert_eq!(surface.tree().unwrap().ids(), vec!["a"]);

        surface.set_root(String::new());
        assert_eq!(surface.root(), None);
    }

    #[test]
    fn test_resolve_uses_own_model() {
        let mut surface = SurfaceSnapshot::new("main");
        surface.data_model_mut().set("user.name", "Ada".into());

        let bound = DataValue::path("user.name");
        assert_eq!(surface.resolve(&bound), Some(&Literal::from("Ada")));
        assert_eq!(surface.resolve(&DataValue::path("missing")), None);
    }

    #[test]
    fn test_remove() {
        let mut registry = SurfaceRegistry::new();
        registry.get_or_create_mut("main");
        assert!(registry.remove("main").is_some());
        assert!(registry.get("main").is_none());
        assert!(registry.remove("main").is_none());
    }
}

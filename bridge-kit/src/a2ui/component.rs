//! A2UI Component Table
//!
//! Components arrive as a flat adjacency list and reference each other by id.
//! The table stores them in an arena keyed by id, and the tree is materialized
//! on demand by walking child references from a root.

use std::collections::HashSet;

use indexmap::IndexMap;

use super::message::{ComponentDefinition, ComponentKind};
use super::registry::ComponentCatalog;
use super::surface::DEFAULT_MAX_TREE_NODES;

/// Bounds applied while materializing a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLimits {
    /// Deepest level below the root that is still entered
    pub max_depth: usize,

    /// Most nodes a single tree may hold, root included
    pub max_nodes: usize,
}

/// A single decoded component
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentNode {
    /// Unique id within the surface
    pub id: String,

    /// Optional flex weight for Row/Column layouts
    pub weight: Option<f64>,

    pub kind: ComponentKind,
}

impl ComponentNode {
    pub fn new(id: impl Into<String>, kind: ComponentKind) -> Self {
        ComponentNode {
            id: id.into(),
            weight: None,
            kind,
        }
    }

    /// Decode a wire definition through the catalog
    pub fn from_definition(definition: &ComponentDefinition, catalog: &ComponentCatalog) -> Self {
        ComponentNode {
            id: definition.id.clone(),
            weight: definition.weight,
            kind: catalog.decode(
                &definition.component.type_name,
                &definition.component.properties,
            ),
        }
    }

    /// The component type name
    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }
}

/// Flat map from component id to node, in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentTable {
    nodes: IndexMap<String, ComponentNode>,
}

impl ComponentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a component by ID
    pub fn get(&self, id: &str) -> Option<&ComponentNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Get all component IDs
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentNode> {
        self.nodes.values()
    }

    /// Insert a node, or replace the node with the same id in place.
    ///
    /// Returns `true` if an existing node was replaced.
    pub fn upsert(&mut self, node: ComponentNode) -> bool {
        self.nodes.insert(node.id.clone(), node).is_some()
    }

    pub fn remove(&mut self, id: &str) -> Option<ComponentNode> {
        self.nodes.shift_remove(id)
    }

    /// Materialize the tree below `root`.
    ///
    /// Child ids that are not in the table are left out. A node that is
    /// already open on the current path is not entered again, so cycles are
    /// cut at the back edge. Nodes deeper than `max_depth` are left out too.
    /// Returns `None` when the root itself is absent.
    pub fn build_tree<'a>(&'a self, root: &str, max_depth: usize) -> Option<TreeNode<'a>> {
        self.build_tree_with(
            root,
            TreeLimits {
                max_depth,
                max_nodes: DEFAULT_MAX_TREE_NODES,
            },
        )
    }

    /// [`build_tree`](Self::build_tree) with an explicit node budget.
    ///
    /// A component listed several times is rendered once per listing, so a
    /// small table can describe an exponentially large tree. Once the budget
    /// is spent the remaining children are left out.
    pub fn build_tree_with<'a>(&'a self, root: &str, limits: TreeLimits) -> Option<TreeNode<'a>> {
        let component = self.nodes.get(root)?;
        let mut ancestors = HashSet::new();
        let mut budget = limits.max_nodes.saturating_sub(1);
        Some(self.build_node(component, &mut ancestors, 0, &limits, &mut budget))
    }

    fn build_node<'a>(
        &'a self,
        component: &'a ComponentNode,
        ancestors: &mut HashSet<&'a str>,
        depth: usize,
        limits: &TreeLimits,
        budget: &mut usize,
    ) -> TreeNode<'a> {
        ancestors.insert(component.id.as_str());

        let mut children = Vec::new();
        for child_id in component.kind.child_ids() {
            let Some(child) = self.nodes.get(child_id) else {
                log::trace!(
                    "[A2UI tree] '{}' references missing child '{}'",
                    component.id,
                    child_id
                );
                continue;
            };
            if ancestors.contains(child.id.as_str()) {
                log::warn!(
                    "[A2UI tree] Cycle detected: '{}' -> '{}', edge omitted",
                    component.id,
                    child_id
                );
                continue;
            }
            if depth + 1 > limits.max_depth {
                log::warn!(
                    "[A2UI tree] Depth limit {} reached below '{}', '{}' omitted",
                    limits.max_depth,
                    component.id,
                    child_id
                );
                continue;
            }
            if *budget == 0 {
                log::warn!(
                    "[A2UI tree] Node limit {} reached below '{}', remaining children omitted",
                    limits.max_nodes,
                    component.id
                );
                break;
            }
            *budget -= 1;
            children.push(self.build_node(child, ancestors, depth + 1, limits, budget));
        }

        ancestors.remove(component.id.as_str());
        TreeNode {
            component,
            children,
        }
    }
}

impl FromIterator<ComponentNode> for ComponentTable {
    fn from_iter<I: IntoIterator<Item = ComponentNode>>(iter: I) -> Self {
        let mut table = ComponentTable::new();
        for node in iter {
            table.upsert(node);
        }
        table
    }
}

/// A materialized tree node borrowing from its [`ComponentTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode<'a> {
    pub component: &'a ComponentNode,
    pub children: Vec<TreeNode<'a>>,
}

impl<'a> TreeNode<'a> {
    pub fn id(&self) -> &'a str {
        &self.component.id
    }

    pub fn kind(&self) -> &'a ComponentKind {
        &self.component.kind
    }

    /// Total number of nodes in this subtree, including itself
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::count).sum::<usize>()
    }

    /// Ids in depth-first pre-order
    pub fn ids(&self) -> Vec<&'a str> {
        let mut ids = vec![self.id()];
        for child in &self.children {
            ids.extend(child.ids());
        }
        ids
    }
}

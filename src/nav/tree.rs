use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::nav::node::{Controller, ViewFactory};

/// Stable index of a node inside its [`MenuTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One position in the menu: a view factory, an optional controller, and
/// children addressed by key (`"1"`, `"2"`, ...).
pub struct MenuNode {
    /// Name used in logs.
    pub label: String,
    view: Box<dyn ViewFactory>,
    controller: Option<Rc<dyn Controller>>,
    children: BTreeMap<String, NodeId>,
}

impl MenuNode {
    pub fn view(&self) -> &dyn ViewFactory {
        self.view.as_ref()
    }

    pub fn controller(&self) -> Option<&dyn Controller> {
        self.controller.as_deref()
    }

    pub fn child(&self, key: &str) -> Option<NodeId> {
        self.children.get(key).copied()
    }
}

/// Arena of menu nodes. Nodes can only be attached below an existing node,
/// so every node is reachable from the root and the tree has no cycles.
pub struct MenuTree {
    nodes: Vec<MenuNode>,
}

impl MenuTree {
    pub fn new(
        label: impl Into<String>,
        view: impl ViewFactory + 'static,
        controller: Option<Rc<dyn Controller>>,
    ) -> Self {
        Self {
            nodes: vec![MenuNode {
                label: label.into(),
                view: Box::new(view),
                controller,
                children: BTreeMap::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &MenuNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Add a child under `parent`. `back` and `close` are reserved tokens and
    /// can never be used as keys.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        key: impl Into<String>,
        label: impl Into<String>,
        view: impl ViewFactory + 'static,
        controller: Option<Rc<dyn Controller>>,
    ) -> NodeId {
        let key = key.into();
        debug_assert!(key != "back" && key != "close", "reserved key {key}");
        let id = NodeId(self.nodes.len());
        self.nodes.push(MenuNode {
            label: label.into(),
            view: Box::new(view),
            controller,
            children: BTreeMap::new(),
        });
        self.nodes[parent.0].children.insert(key, id);
        id
    }

    /// Number of edges on the longest path from the root.
    pub fn depth(&self) -> usize {
        self.depth_below(self.root())
    }

    fn depth_below(&self, id: NodeId) -> usize {
        self.node(id)
            .children
            .values()
            .map(|child| 1 + self.depth_below(*child))
            .max()
            .unwrap_or(0)
    }
}

//! A reference node-injector tree.

use std::collections::HashMap;
use std::sync::Arc;

use weft_core::erased::Erased;
use weft_core::error::{Error, NotFound, Result};
use weft_core::flags::InjectFlags;
use weft_core::injector::{Injector, NodeId, NotFoundValue, ViewResolver};
use weft_core::token::{Token, TokenKey};

struct Node {
    parent: Option<NodeId>,
    /// A walk with `HOST` set stops after this node.
    host: bool,
    providers: HashMap<TokenKey, Erased>,
}

/// A minimal node-injector tree for exercising the tree-aware entry point.
///
/// Each node owns a provider map and an optional parent. Resolution walks
/// node-local providers toward the root, honoring the scope flags, then
/// falls back to the backing flat injector when one is attached. Providers
/// are registered up front, so "get or create" here always finds an
/// already-created value; on-demand construction is the real runtime's
/// business.
pub struct NodeTree {
    nodes: Vec<Node>,
    backing: Option<Arc<dyn Injector>>,
}

impl NodeTree {
    /// An empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            backing: None,
        }
    }

    /// Adds a node under `parent`, returning its handle.
    ///
    /// # Panics
    ///
    /// Panics if the node count exceeds what a [`NodeId`] can address.
    pub fn add_node(&mut self, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).expect("node count fits in a NodeId"));
        self.nodes.push(Node {
            parent,
            host: false,
            providers: HashMap::new(),
        });
        id
    }

    /// Marks `node` as a host boundary.
    pub fn mark_host(&mut self, node: NodeId) {
        if let Some(node) = self.nodes.get_mut(node.0 as usize) {
            node.host = true;
        }
    }

    /// Registers a provider value on `node`.
    pub fn provide(&mut self, node: NodeId, token: &Token, value: Erased) {
        if let Some(node) = self.nodes.get_mut(node.0 as usize) {
            node.providers.insert(token.key(), value);
        }
    }

    /// Attaches a flat injector consulted after the node walk.
    #[must_use]
    pub fn with_backing(mut self, injector: Arc<dyn Injector>) -> Self {
        self.backing = Some(injector);
        self
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0 as usize).and_then(|node| node.parent)
    }
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewResolver for NodeTree {
    fn get_or_create(
        &self,
        node: NodeId,
        token: &Token,
        flags: InjectFlags,
    ) -> Result<Option<Erased>> {
        let key = token.key();
        let mut cursor = if flags.contains(InjectFlags::SKIP_SELF) {
            self.parent_of(node)
        } else {
            Some(node)
        };
        while let Some(id) = cursor {
            let Some(node) = self.nodes.get(id.0 as usize) else {
                break;
            };
            if let Some(value) = node.providers.get(&key) {
                return Ok(Some(value.clone()));
            }
            if flags.contains(InjectFlags::SELF) {
                break;
            }
            if flags.contains(InjectFlags::HOST) && node.host {
                break;
            }
            cursor = node.parent;
        }
        if !flags.contains(InjectFlags::SELF) {
            if let Some(backing) = &self.backing {
                let not_found = if flags.contains(InjectFlags::OPTIONAL) {
                    NotFoundValue::Null
                } else {
                    NotFoundValue::Raise
                };
                let backing_flags = flags.without(
                    InjectFlags::SELF | InjectFlags::SKIP_SELF | InjectFlags::HOST,
                );
                return backing.get(token, not_found, backing_flags);
            }
        }
        if flags.contains(InjectFlags::OPTIONAL) {
            Ok(None)
        } else {
            Err(Error::NotFound(NotFound::new(token)))
        }
    }
}

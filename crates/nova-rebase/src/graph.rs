use std::collections::HashMap;

use crate::method::{MethodDescription, MethodRef, MethodToken};
use crate::types::TypeName;

/// Result of a virtual lookup.
#[derive(Debug, Clone)]
pub enum MethodNode {
    /// The method a virtual call with the looked-up token would dispatch to.
    Resolved(MethodRef),
    Unresolved,
}

impl MethodNode {
    pub fn is_resolved(&self) -> bool {
        matches!(self, MethodNode::Resolved(_))
    }

    pub fn representative(&self) -> Option<&MethodRef> {
        match self {
            MethodNode::Resolved(method) => Some(method),
            MethodNode::Unresolved => None,
        }
    }
}

/// Virtual dispatch view of the type under construction.
pub trait MethodGraph: Send + Sync {
    fn locate(&self, token: &MethodToken) -> MethodNode;

    /// Looks `token` up among the methods inherited through `interface`.
    ///
    /// Graphs that do not track interfaces resolve nothing.
    fn locate_in_interface(&self, interface: &TypeName, token: &MethodToken) -> MethodNode {
        let _ = (interface, token);
        MethodNode::Unresolved
    }
}

/// Map-backed [`MethodGraph`] for callers that already know the dispatch results.
#[derive(Debug, Default, Clone)]
pub struct SimpleMethodGraph {
    methods: HashMap<MethodToken, MethodRef>,
    interfaces: HashMap<TypeName, HashMap<MethodToken, MethodRef>>,
}

impl SimpleMethodGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `method` as the virtual target for its own token, replacing any earlier entry.
    pub fn insert(&mut self, method: MethodRef) -> Option<MethodRef> {
        self.methods.insert(method.token(), method)
    }

    pub fn insert_interface_method(
        &mut self,
        interface: TypeName,
        method: MethodRef,
    ) -> Option<MethodRef> {
        self.interfaces
            .entry(interface)
            .or_default()
            .insert(method.token(), method)
    }
}

impl MethodGraph for SimpleMethodGraph {
    fn locate(&self, token: &MethodToken) -> MethodNode {
        match self.methods.get(token) {
            Some(method) => MethodNode::Resolved(method.clone()),
            None => MethodNode::Unresolved,
        }
    }

    fn locate_in_interface(&self, interface: &TypeName, token: &MethodToken) -> MethodNode {
        match self.interfaces.get(interface).and_then(|m| m.get(token)) {
            Some(method) => MethodNode::Resolved(method.clone()),
            None => MethodNode::Unresolved,
        }
    }
}

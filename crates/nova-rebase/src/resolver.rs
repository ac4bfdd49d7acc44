use std::sync::Arc;

use crate::graph::{MethodGraph, MethodNode};
use crate::invocation::SpecialMethodInvocation;
use crate::method::{MethodDescription, MethodRef, MethodToken};
use crate::rebase::{MethodRebaseResolver, Resolution};
use crate::types::InstrumentedType;

/// Resolves "call the original implementation" requests for one type under construction.
///
/// Every call is answered from the current oracle state; nothing is cached.
pub struct InvocationResolver {
    instrumented: InstrumentedType,
    method_graph: Arc<dyn MethodGraph>,
    rebase_resolver: Arc<dyn MethodRebaseResolver>,
}

impl InvocationResolver {
    pub fn new(
        instrumented: InstrumentedType,
        method_graph: Arc<dyn MethodGraph>,
        rebase_resolver: Arc<dyn MethodRebaseResolver>,
    ) -> Self {
        Self {
            instrumented,
            method_graph,
            rebase_resolver,
        }
    }

    pub fn instrumented_type(&self) -> &InstrumentedType {
        &self.instrumented
    }

    pub(crate) fn method_graph(&self) -> &dyn MethodGraph {
        self.method_graph.as_ref()
    }

    pub fn resolve(&self, token: &MethodToken) -> SpecialMethodInvocation {
        let MethodNode::Resolved(candidate) = self.method_graph.locate(token) else {
            tracing::debug!(
                target = "nova.rebase",
                ty = %self.instrumented.name(),
                token = %token,
                "no virtual target for super invocation"
            );
            return SpecialMethodInvocation::Invalid;
        };

        let invocation = if candidate.declaring_type() == self.instrumented.name() {
            self.resolve_declared(&candidate)
        } else {
            let Some(invocation) = self.resolve_inherited(candidate) else {
                return SpecialMethodInvocation::Invalid;
            };
            invocation
        };

        if let Some(valid) = invocation.as_valid() {
            tracing::trace!(
                target = "nova.rebase",
                ty = %self.instrumented.name(),
                token = %token,
                owner = %valid.owner(),
                shape = ?valid.shape(),
                "resolved super invocation"
            );
        } else {
            tracing::debug!(
                target = "nova.rebase",
                ty = %self.instrumented.name(),
                token = %token,
                "super invocation target is not specializable"
            );
        }
        invocation
    }

    /// The method is implemented by the type being generated, so its original body has to be
    /// found through the rebase decision.
    fn resolve_declared(&self, candidate: &MethodRef) -> SpecialMethodInvocation {
        let owner = self.instrumented.name().clone();
        match self.rebase_resolver.resolve(candidate) {
            Resolution::Preserved(original) => SpecialMethodInvocation::of(original, owner),
            Resolution::RebasedMethod(renamed) => SpecialMethodInvocation::of(renamed, owner),
            Resolution::RebasedConstructor(converted) => {
                SpecialMethodInvocation::with_marker(converted, owner)
            }
        }
    }

    /// `None` when the type under construction has no super class to address the call to.
    fn resolve_inherited(&self, candidate: MethodRef) -> Option<SpecialMethodInvocation> {
        let Some(super_class) = self.instrumented.super_class() else {
            tracing::debug!(
                target = "nova.rebase",
                ty = %self.instrumented.name(),
                token = %candidate.token(),
                declared_on = %candidate.declaring_type(),
                "type under construction has no super class"
            );
            return None;
        };
        Some(SpecialMethodInvocation::of(candidate, super_class.clone()))
    }
}

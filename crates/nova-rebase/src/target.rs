use std::sync::Arc;

use crate::config::RebaseConfig;
use crate::graph::{MethodGraph, MethodNode};
use crate::invocation::SpecialMethodInvocation;
use crate::method::MethodToken;
use crate::rebase::MethodRebaseResolver;
use crate::resolver::InvocationResolver;
use crate::types::{InstrumentedType, TypeName};

/// Entry point used while generating code for a rebased type.
///
/// Answers which non-virtual call reaches the original implementation of a method, wherever
/// rebasing moved it.
pub struct RebaseImplementationTarget {
    resolver: InvocationResolver,
    config: RebaseConfig,
}

impl RebaseImplementationTarget {
    pub fn new(
        instrumented: InstrumentedType,
        method_graph: Arc<dyn MethodGraph>,
        rebase_resolver: Arc<dyn MethodRebaseResolver>,
    ) -> Self {
        Self::with_config(
            instrumented,
            method_graph,
            rebase_resolver,
            RebaseConfig::default(),
        )
    }

    pub fn with_config(
        instrumented: InstrumentedType,
        method_graph: Arc<dyn MethodGraph>,
        rebase_resolver: Arc<dyn MethodRebaseResolver>,
        config: RebaseConfig,
    ) -> Self {
        Self {
            resolver: InvocationResolver::new(instrumented, method_graph, rebase_resolver),
            config,
        }
    }

    /// The type under construction.
    pub fn origin_type(&self) -> &TypeName {
        self.resolver.instrumented_type().name()
    }

    pub fn config(&self) -> &RebaseConfig {
        &self.config
    }

    /// Invocation of the implementation that `token` had before this type was instrumented.
    pub fn invoke_super(&self, token: &MethodToken) -> SpecialMethodInvocation {
        self.resolver.resolve(token)
    }

    /// Invocation of the default method `interface` provides for `token`.
    pub fn invoke_default(
        &self,
        token: &MethodToken,
        interface: &TypeName,
    ) -> SpecialMethodInvocation {
        if !self.config.default_method_invocation.is_enabled() {
            return SpecialMethodInvocation::Invalid;
        }
        match self
            .resolver
            .method_graph()
            .locate_in_interface(interface, token)
        {
            MethodNode::Resolved(method) => {
                SpecialMethodInvocation::of_interface(method, interface.clone())
            }
            MethodNode::Unresolved => SpecialMethodInvocation::Invalid,
        }
    }

    /// Invocation of the single default method any directly implemented interface offers for
    /// `token`. Invalid when none or more than one interface qualifies.
    pub fn invoke_any_default(&self, token: &MethodToken) -> SpecialMethodInvocation {
        let mut found = SpecialMethodInvocation::Invalid;
        for interface in self.resolver.instrumented_type().interfaces() {
            let invocation = self.invoke_default(token, interface);
            if !invocation.is_valid() {
                continue;
            }
            if found.is_valid() {
                tracing::debug!(
                    target = "nova.rebase",
                    ty = %self.origin_type(),
                    token = %token,
                    "ambiguous default method invocation"
                );
                return SpecialMethodInvocation::Invalid;
            }
            found = invocation;
        }
        found
    }

    /// Super invocation if one is valid, otherwise an unambiguous default method invocation.
    pub fn invoke_dominant(&self, token: &MethodToken) -> SpecialMethodInvocation {
        let invocation = self.invoke_super(token);
        if invocation.is_valid() {
            return invocation;
        }
        self.invoke_any_default(token)
    }
}

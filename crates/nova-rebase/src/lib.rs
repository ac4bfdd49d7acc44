//! Resolution of "call the original implementation" requests for rebased types.
//!
//! When a type is instrumented by rebasing, the new implementation of a method takes over the
//! method's name while the original body either stays where it was, moves to a renamed
//! synthetic method, or (for constructors) becomes reachable through a signature with an
//! extra marker parameter. [`RebaseImplementationTarget`] combines the virtual dispatch view
//! of the type with those rebase decisions to produce a [`SpecialMethodInvocation`] that the
//! code generator can emit.

#![forbid(unsafe_code)]

mod bytecode;
mod config;
mod descriptor;
mod error;
mod graph;
mod invocation;
mod method;
mod rebase;
mod resolver;
mod target;
mod types;

pub use crate::bytecode::{MethodVisitor, Size, ACONST_NULL, INVOKESPECIAL};
pub use crate::config::{DefaultMethodInvocation, RebaseConfig, JAVA_8_MAJOR_VERSION};
pub use crate::descriptor::{parse_field_descriptor, parse_method_descriptor};
pub use crate::descriptor::{BaseType, FieldType, MethodDescriptor, ReturnType};
pub use crate::error::{Error, Result};
pub use crate::graph::{MethodGraph, MethodNode, SimpleMethodGraph};
pub use crate::invocation::{CallShape, SpecialMethodInvocation, ValidInvocation};
pub use crate::method::{
    same_method, MethodDef, MethodDescription, MethodRef, MethodToken, ACC_ABSTRACT, ACC_PRIVATE,
    ACC_PUBLIC, ACC_STATIC, ACC_SYNTHETIC, CONSTRUCTOR_NAME,
};
pub use crate::rebase::{
    DefaultMethodRebaseResolver, MethodRebaseResolver, RebaseResolverBuilder, Resolution,
};
pub use crate::resolver::InvocationResolver;
pub use crate::target::RebaseImplementationTarget;
pub use crate::types::{InstrumentedType, TypeHierarchy, TypeName, JAVA_LANG_OBJECT};

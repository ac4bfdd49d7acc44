use std::fmt;
use std::sync::Arc;

use crate::descriptor::{parse_method_descriptor, MethodDescriptor};
use crate::error::Result;
use crate::types::{TypeHierarchy, TypeName};

pub const CONSTRUCTOR_NAME: &str = "<init>";

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_SYNTHETIC: u16 = 0x1000;

/// Erasure-level identity of a method: its name plus descriptor shape.
///
/// The token does not mention the declaring type, so it stays stable when a method body is
/// moved around by rebasing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodToken {
    name: String,
    descriptor: MethodDescriptor,
}

impl MethodToken {
    pub fn new(name: impl Into<String>, descriptor: MethodDescriptor) -> Self {
        Self {
            name: name.into(),
            descriptor,
        }
    }

    pub fn parse(name: impl Into<String>, descriptor: &str) -> Result<Self> {
        Ok(Self::new(name, parse_method_descriptor(descriptor)?))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &MethodDescriptor {
        &self.descriptor
    }
}

impl fmt::Display for MethodToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.descriptor)
    }
}

/// Read-only view of a method as seen by the resolver.
///
/// Implementations are owned by whatever models the type graph; the resolver only reads them.
pub trait MethodDescription: fmt::Debug + Send + Sync {
    fn declaring_type(&self) -> &TypeName;

    fn internal_name(&self) -> &str;

    fn descriptor(&self) -> &MethodDescriptor;

    fn access_flags(&self) -> u16;

    fn is_constructor(&self) -> bool {
        self.internal_name() == CONSTRUCTOR_NAME
    }

    fn is_static(&self) -> bool {
        self.access_flags() & ACC_STATIC != 0
    }

    fn is_private(&self) -> bool {
        self.access_flags() & ACC_PRIVATE != 0
    }

    fn is_abstract(&self) -> bool {
        self.access_flags() & ACC_ABSTRACT != 0
    }

    /// Whether an `invokespecial` of exactly this method is legal from `target`.
    fn is_specializable_for(&self, target: &TypeName) -> bool;

    fn token(&self) -> MethodToken {
        MethodToken::new(self.internal_name(), self.descriptor().clone())
    }
}

pub type MethodRef = Arc<dyn MethodDescription>;

/// Compares two method handles by declaring type, name and descriptor.
pub fn same_method(a: &dyn MethodDescription, b: &dyn MethodDescription) -> bool {
    a.declaring_type() == b.declaring_type()
        && a.internal_name() == b.internal_name()
        && a.descriptor() == b.descriptor()
}

/// Concrete method definition carrying its access flags.
///
/// Specializability follows the JVM rules for `invokespecial`: static methods never qualify,
/// private methods and constructors only from their declaring type, abstract methods never,
/// and everything else from any type assignable to the declaring type.
#[derive(Debug, Clone)]
pub struct MethodDef {
    declaring_type: TypeName,
    access_flags: u16,
    name: String,
    descriptor: MethodDescriptor,
    hierarchy: Option<Arc<TypeHierarchy>>,
}

impl MethodDef {
    pub fn new(
        declaring_type: TypeName,
        access_flags: u16,
        name: impl Into<String>,
        descriptor: MethodDescriptor,
    ) -> Self {
        Self {
            declaring_type,
            access_flags,
            name: name.into(),
            descriptor,
            hierarchy: None,
        }
    }

    /// Builds a definition from class-file level strings, validating the descriptor.
    pub fn parse(
        declaring_type: TypeName,
        access_flags: u16,
        name: impl Into<String>,
        descriptor: &str,
    ) -> Result<Self> {
        Ok(Self::new(
            declaring_type,
            access_flags,
            name,
            parse_method_descriptor(descriptor)?,
        ))
    }

    /// Without a hierarchy only the declaring type itself (and `java/lang/Object` as a
    /// declaring type) is considered assignable.
    pub fn with_hierarchy(mut self, hierarchy: Arc<TypeHierarchy>) -> Self {
        self.hierarchy = Some(hierarchy);
        self
    }

    pub fn into_ref(self) -> MethodRef {
        Arc::new(self)
    }

    fn declaring_type_accepts(&self, target: &TypeName) -> bool {
        match &self.hierarchy {
            Some(hierarchy) => hierarchy.is_assignable(target, &self.declaring_type),
            None => {
                target == &self.declaring_type || self.declaring_type == TypeName::object()
            }
        }
    }
}

impl MethodDescription for MethodDef {
    fn declaring_type(&self) -> &TypeName {
        &self.declaring_type
    }

    fn internal_name(&self) -> &str {
        &self.name
    }

    fn descriptor(&self) -> &MethodDescriptor {
        &self.descriptor
    }

    fn access_flags(&self) -> u16 {
        self.access_flags
    }

    fn is_specializable_for(&self, target: &TypeName) -> bool {
        if self.is_static() {
            false
        } else if self.is_private() || self.is_constructor() {
            &self.declaring_type == target
        } else {
            !self.is_abstract() && self.declaring_type_accepts(target)
        }
    }
}

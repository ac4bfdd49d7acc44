use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const JAVA_LANG_OBJECT: &str = "java/lang/Object";

/// Internal (slash-separated) binary name of a JVM type, e.g. `java/lang/String`.
///
/// Cheap to clone; equality is by value so handles from different passes compare equal.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeName(Arc<str>);

impl TypeName {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Validating constructor for names coming from untrusted input.
    pub fn parse(name: &str) -> Result<Self> {
        let valid = !name.is_empty()
            && name
                .split('/')
                .all(|segment| !segment.is_empty() && !segment.contains(['.', ';', '[']));
        if !valid {
            return Err(Error::InvalidTypeName(name.to_string()));
        }
        Ok(Self::new(name))
    }

    pub fn object() -> Self {
        Self::new(JAVA_LANG_OBJECT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeName({})", self.0)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TypeName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TypeName> for String {
    fn from(value: TypeName) -> Self {
        value.0.to_string()
    }
}

/// Snapshot of the type currently being generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentedType {
    name: TypeName,
    super_class: Option<TypeName>,
    interfaces: Vec<TypeName>,
}

impl InstrumentedType {
    pub fn new(name: TypeName, super_class: Option<TypeName>) -> Self {
        Self {
            name,
            super_class,
            interfaces: Vec::new(),
        }
    }

    pub fn with_interfaces(mut self, interfaces: impl IntoIterator<Item = TypeName>) -> Self {
        self.interfaces = interfaces.into_iter().collect();
        self
    }

    pub fn name(&self) -> &TypeName {
        &self.name
    }

    /// `None` only for `java/lang/Object` and other roots.
    pub fn super_class(&self) -> Option<&TypeName> {
        self.super_class.as_ref()
    }

    pub fn interfaces(&self) -> &[TypeName] {
        &self.interfaces
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TypeEdges {
    super_class: Option<TypeName>,
    interfaces: Vec<TypeName>,
}

/// Map-backed view of declared super types, used to answer assignability questions.
#[derive(Debug, Default, Clone)]
pub struct TypeHierarchy {
    types: HashMap<TypeName, TypeEdges>,
}

impl TypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        name: TypeName,
        super_class: Option<TypeName>,
        interfaces: impl IntoIterator<Item = TypeName>,
    ) {
        self.types.insert(
            name,
            TypeEdges {
                super_class,
                interfaces: interfaces.into_iter().collect(),
            },
        );
    }

    pub fn insert_instrumented(&mut self, ty: &InstrumentedType) {
        self.insert(
            ty.name().clone(),
            ty.super_class().cloned(),
            ty.interfaces().iter().cloned(),
        );
    }

    /// Whether a value of type `from` can be assigned to a variable of type `to`.
    ///
    /// Walks declared super classes and interfaces breadth first. Every type is assignable to
    /// itself and to `java/lang/Object`; types missing from the hierarchy contribute no edges.
    pub fn is_assignable(&self, from: &TypeName, to: &TypeName) -> bool {
        if from == to || to.as_str() == JAVA_LANG_OBJECT {
            return true;
        }

        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(from.clone());
        queue.push_back(from.clone());

        while let Some(current) = queue.pop_front() {
            let Some(edges) = self.types.get(&current) else {
                continue;
            };
            for parent in edges.super_class.iter().chain(edges.interfaces.iter()) {
                if parent == to {
                    return true;
                }
                if seen.insert(parent.clone()) {
                    queue.push_back(parent.clone());
                }
            }
        }

        false
    }
}

use std::collections::HashMap;

use crate::config::RebaseConfig;
use crate::descriptor::FieldType;
use crate::error::{Error, Result};
use crate::method::{
    MethodDef, MethodDescription, MethodRef, MethodToken, ACC_PRIVATE, ACC_STATIC, ACC_SYNTHETIC,
    CONSTRUCTOR_NAME,
};
use crate::types::{InstrumentedType, TypeName};

/// Where the original body of a method declared on the type under construction now lives.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The body was left in place and is still reachable under its own name.
    Preserved(MethodRef),
    /// The body was moved to a synthetic method with the same descriptor.
    RebasedMethod(MethodRef),
    /// A constructor body, now reachable through a method that takes one extra trailing
    /// marker argument.
    RebasedConstructor(MethodRef),
}

impl Resolution {
    /// The method an `invokespecial` has to target to reach the original body.
    pub fn resolved_method(&self) -> &MethodRef {
        match self {
            Resolution::Preserved(method)
            | Resolution::RebasedMethod(method)
            | Resolution::RebasedConstructor(method) => method,
        }
    }

    pub fn is_rebased(&self) -> bool {
        !matches!(self, Resolution::Preserved(_))
    }
}

/// Rebase decisions for the type under construction.
pub trait MethodRebaseResolver: Send + Sync {
    /// Only valid for methods declared on the type under construction; implementations may
    /// panic when handed anything else.
    fn resolve(&self, method: &MethodRef) -> Resolution;
}

/// Map-backed resolver produced by [`RebaseResolverBuilder`].
///
/// Methods that were never registered resolve as [`Resolution::Preserved`].
#[derive(Debug, Clone)]
pub struct DefaultMethodRebaseResolver {
    instrumented: TypeName,
    resolutions: HashMap<MethodToken, Resolution>,
}

impl DefaultMethodRebaseResolver {
    pub fn builder(
        instrumented: &InstrumentedType,
        config: &RebaseConfig,
    ) -> Result<RebaseResolverBuilder> {
        RebaseResolverBuilder::new(instrumented, config)
    }

    pub fn rebased_count(&self) -> usize {
        self.resolutions.len()
    }
}

impl MethodRebaseResolver for DefaultMethodRebaseResolver {
    fn resolve(&self, method: &MethodRef) -> Resolution {
        assert!(
            method.declaring_type() == &self.instrumented,
            "rebase resolution requested for {}.{} which is not declared on {}",
            method.declaring_type(),
            method.token(),
            self.instrumented,
        );
        match self.resolutions.get(&method.token()) {
            Some(resolution) => resolution.clone(),
            None => Resolution::Preserved(method.clone()),
        }
    }
}

pub struct RebaseResolverBuilder {
    instrumented: TypeName,
    suffix: String,
    placeholder: TypeName,
    resolutions: HashMap<MethodToken, Resolution>,
}

impl RebaseResolverBuilder {
    /// Fails when `config` carries a suffix that cannot appear in a method name.
    pub fn new(instrumented: &InstrumentedType, config: &RebaseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            instrumented: instrumented.name().clone(),
            suffix: config.rebase_suffix.clone(),
            placeholder: config.placeholder_type.clone(),
            resolutions: HashMap::new(),
        })
    }

    /// Marks the original body of `method` as relocated.
    pub fn rebase(&mut self, method: &MethodRef) -> Result<&mut Self> {
        if method.declaring_type() != &self.instrumented {
            return Err(Error::ForeignMethod {
                owner: self.instrumented.to_string(),
                method: method.token().to_string(),
                declared_on: method.declaring_type().to_string(),
            });
        }

        let token = method.token();
        if self.resolutions.contains_key(&token) {
            return Err(Error::DuplicateRebase {
                owner: self.instrumented.to_string(),
                method: token.to_string(),
            });
        }

        let resolution = if method.is_constructor() {
            let descriptor = method
                .descriptor()
                .with_trailing_param(FieldType::object(self.placeholder.clone()));
            Resolution::RebasedConstructor(
                MethodDef::new(
                    self.instrumented.clone(),
                    ACC_PRIVATE | ACC_SYNTHETIC,
                    CONSTRUCTOR_NAME,
                    descriptor,
                )
                .into_ref(),
            )
        } else {
            let name = format!("{}${}", method.internal_name(), self.suffix);
            let flags = ACC_PRIVATE | ACC_SYNTHETIC | (method.access_flags() & ACC_STATIC);
            Resolution::RebasedMethod(
                MethodDef::new(
                    self.instrumented.clone(),
                    flags,
                    name,
                    method.descriptor().clone(),
                )
                .into_ref(),
            )
        };

        tracing::trace!(
            target = "nova.rebase",
            owner = %self.instrumented,
            method = %token,
            rebased = %resolution.resolved_method().token(),
            "registered rebased method"
        );
        self.resolutions.insert(token, resolution);
        Ok(self)
    }

    pub fn build(self) -> DefaultMethodRebaseResolver {
        DefaultMethodRebaseResolver {
            instrumented: self.instrumented,
            resolutions: self.resolutions,
        }
    }
}

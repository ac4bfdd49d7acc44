use crate::bytecode::{MethodVisitor, Size, ACONST_NULL, INVOKESPECIAL};
use crate::method::{same_method, MethodDescription, MethodRef};
use crate::types::TypeName;

/// How the `invokespecial` of a valid invocation is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallShape {
    /// A single `invokespecial` on a class method.
    Special,
    /// A single `invokespecial` on an interface default method.
    InterfaceSpecial,
    /// Pushes a `null` marker argument before the `invokespecial`, for rebased constructors.
    WithMarker,
}

/// A non-virtual call that is known to be legal.
#[derive(Debug, Clone)]
pub struct ValidInvocation {
    method: MethodRef,
    owner: TypeName,
    shape: CallShape,
}

impl ValidInvocation {
    /// The method whose body the call reaches.
    pub fn method(&self) -> &MethodRef {
        &self.method
    }

    /// The type the `invokespecial` is addressed to.
    pub fn owner(&self) -> &TypeName {
        &self.owner
    }

    pub fn shape(&self) -> CallShape {
        self.shape
    }

    /// Writes the call to `visitor` and returns its operand stack effect.
    ///
    /// The receiver is expected to be on the stack already and is not part of the effect.
    pub fn apply(&self, visitor: &mut dyn MethodVisitor) -> Size {
        let mut size = Size::ZERO;
        if self.shape == CallShape::WithMarker {
            visitor.visit_insn(ACONST_NULL);
            size = size.aggregate(Size::of_impact(1));
        }

        let descriptor = self.method.descriptor();
        visitor.visit_method_insn(
            INVOKESPECIAL,
            self.owner.as_str(),
            self.method.internal_name(),
            &descriptor.to_string(),
            self.shape == CallShape::InterfaceSpecial,
        );
        let call = descriptor.return_type.stack_size() - descriptor.parameter_stack_size();
        size.aggregate(Size::of_impact(call))
    }
}

/// Outcome of resolving a non-virtual call.
///
/// Only the [`SpecialMethodInvocation::Valid`] variant carries a target, so code that reads the
/// method or owner has to establish validity first.
#[derive(Debug, Clone)]
pub enum SpecialMethodInvocation {
    Valid(ValidInvocation),
    Invalid,
}

impl SpecialMethodInvocation {
    /// Valid iff `method` may be called non-virtually from `owner`.
    pub fn of(method: MethodRef, owner: TypeName) -> Self {
        Self::checked(method, owner, CallShape::Special)
    }

    /// Like [`SpecialMethodInvocation::of`], but addressed to an interface.
    pub fn of_interface(method: MethodRef, interface: TypeName) -> Self {
        Self::checked(method, interface, CallShape::InterfaceSpecial)
    }

    /// Like [`SpecialMethodInvocation::of`], with a `null` marker pushed before the call.
    pub fn with_marker(method: MethodRef, owner: TypeName) -> Self {
        Self::checked(method, owner, CallShape::WithMarker)
    }

    fn checked(method: MethodRef, owner: TypeName, shape: CallShape) -> Self {
        if !method.is_specializable_for(&owner) {
            return SpecialMethodInvocation::Invalid;
        }
        SpecialMethodInvocation::Valid(ValidInvocation {
            method,
            owner,
            shape,
        })
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, SpecialMethodInvocation::Valid(_))
    }

    pub fn as_valid(&self) -> Option<&ValidInvocation> {
        match self {
            SpecialMethodInvocation::Valid(valid) => Some(valid),
            SpecialMethodInvocation::Invalid => None,
        }
    }

    pub fn method(&self) -> Option<&MethodRef> {
        self.as_valid().map(ValidInvocation::method)
    }

    pub fn owner(&self) -> Option<&TypeName> {
        self.as_valid().map(ValidInvocation::owner)
    }

    /// Emits the call.
    ///
    /// # Panics
    ///
    /// Panics on [`SpecialMethodInvocation::Invalid`]: emitting a call that was never resolved
    /// is a bug in the caller.
    pub fn apply(&self, visitor: &mut dyn MethodVisitor) -> Size {
        match self {
            SpecialMethodInvocation::Valid(valid) => valid.apply(visitor),
            SpecialMethodInvocation::Invalid => {
                panic!("cannot apply an invalid special method invocation")
            }
        }
    }
}

impl PartialEq for ValidInvocation {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner
            && self.shape == other.shape
            && same_method(self.method.as_ref(), other.method.as_ref())
    }
}

impl Eq for ValidInvocation {}

impl PartialEq for SpecialMethodInvocation {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SpecialMethodInvocation::Valid(a), SpecialMethodInvocation::Valid(b)) => a == b,
            (SpecialMethodInvocation::Invalid, SpecialMethodInvocation::Invalid) => true,
            _ => false,
        }
    }
}

impl Eq for SpecialMethodInvocation {}

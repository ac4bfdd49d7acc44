//! The slice of the JVM instruction set needed to describe non-virtual calls.

use std::cmp;

pub const ACONST_NULL: u8 = 0x01;
pub const INVOKESPECIAL: u8 = 0xb7;

/// Receiver of emitted instructions, typically a method body writer.
pub trait MethodVisitor {
    /// A zero-operand instruction.
    fn visit_insn(&mut self, opcode: u8);

    fn visit_method_insn(
        &mut self,
        opcode: u8,
        owner: &str,
        name: &str,
        descriptor: &str,
        is_interface: bool,
    );
}

/// Operand stack effect of emitted code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    /// Net change of the operand stack depth, in slots.
    pub impact: i32,
    /// Peak stack growth reached while executing, in slots.
    pub maximal: i32,
}

impl Size {
    pub const ZERO: Size = Size {
        impact: 0,
        maximal: 0,
    };

    pub fn new(impact: i32, maximal: i32) -> Self {
        Self { impact, maximal }
    }

    /// Size of an instruction that changes the stack by `impact` without a larger peak.
    pub fn of_impact(impact: i32) -> Self {
        Self::new(impact, cmp::max(0, impact))
    }

    /// Effect of executing `self` followed by `next`.
    pub fn aggregate(self, next: Size) -> Size {
        Size {
            impact: self.impact + next.impact,
            maximal: cmp::max(self.maximal, self.impact + next.maximal),
        }
    }
}

use std::fmt;

use crate::error::{Error, Result};
use crate::types::TypeName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    fn code(self) -> char {
        match self {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
        }
    }
}

/// Erased field (or parameter) type as it appears in a JVM descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Base(BaseType),
    Object(TypeName),
    Array(Box<FieldType>),
}

impl FieldType {
    pub fn object(name: TypeName) -> Self {
        FieldType::Object(name)
    }

    /// Number of operand stack slots a value of this type occupies.
    pub fn stack_size(&self) -> i32 {
        match self {
            FieldType::Base(BaseType::Long | BaseType::Double) => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Base(base) => write!(f, "{}", base.code()),
            FieldType::Object(name) => write!(f, "L{name};"),
            FieldType::Array(component) => write!(f, "[{component}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReturnType {
    Void,
    Type(FieldType),
}

impl ReturnType {
    pub fn stack_size(&self) -> i32 {
        match self {
            ReturnType::Void => 0,
            ReturnType::Type(ty) => ty.stack_size(),
        }
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Void => f.write_str("V"),
            ReturnType::Type(ty) => ty.fmt(f),
        }
    }
}

/// Parameter and return shape of a method, independent of its name and owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    pub return_type: ReturnType,
}

impl MethodDescriptor {
    pub fn new(params: Vec<FieldType>, return_type: ReturnType) -> Self {
        Self {
            params,
            return_type,
        }
    }

    /// Returns a copy of this descriptor with `param` appended as the last parameter.
    pub fn with_trailing_param(&self, param: FieldType) -> Self {
        let mut params = self.params.clone();
        params.push(param);
        Self::new(params, self.return_type.clone())
    }

    /// Stack slots consumed by the explicit arguments (the receiver is not included).
    pub fn parameter_stack_size(&self) -> i32 {
        self.params.iter().map(FieldType::stack_size).sum()
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for param in &self.params {
            param.fmt(f)?;
        }
        f.write_str(")")?;
        self.return_type.fmt(f)
    }
}

pub fn parse_field_descriptor(desc: &str) -> Result<FieldType> {
    let (ty, rest) = parse_field_type(desc)?;
    if !rest.is_empty() {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    }
    Ok(ty)
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let Some(mut rest) = desc.strip_prefix('(') else {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    };

    let mut params = Vec::new();
    loop {
        if let Some(after) = rest.strip_prefix(')') {
            rest = after;
            break;
        }
        if rest.is_empty() {
            return Err(Error::InvalidDescriptor(desc.to_string()));
        }
        let (param, after) =
            parse_field_type(rest).map_err(|_| Error::InvalidDescriptor(desc.to_string()))?;
        params.push(param);
        rest = after;
    }

    let return_type = if rest == "V" {
        ReturnType::Void
    } else {
        let ty = parse_field_descriptor(rest)
            .map_err(|_| Error::InvalidDescriptor(desc.to_string()))?;
        ReturnType::Type(ty)
    };

    Ok(MethodDescriptor {
        params,
        return_type,
    })
}

fn parse_field_type(input: &str) -> Result<(FieldType, &str)> {
    let mut chars = input.chars();
    let Some(head) = chars.next() else {
        return Err(Error::InvalidDescriptor(input.to_string()));
    };
    let rest = chars.as_str();
    let base = |ty| Ok((FieldType::Base(ty), rest));
    match head {
        'B' => base(BaseType::Byte),
        'C' => base(BaseType::Char),
        'D' => base(BaseType::Double),
        'F' => base(BaseType::Float),
        'I' => base(BaseType::Int),
        'J' => base(BaseType::Long),
        'S' => base(BaseType::Short),
        'Z' => base(BaseType::Boolean),
        'L' => {
            let Some(end) = rest.find(';') else {
                return Err(Error::InvalidDescriptor(input.to_string()));
            };
            let name = TypeName::parse(&rest[..end])
                .map_err(|_| Error::InvalidDescriptor(input.to_string()))?;
            Ok((FieldType::Object(name), &rest[end + 1..]))
        }
        '[' => {
            let (component, rest) = parse_field_type(rest)?;
            Ok((FieldType::Array(Box::new(component)), rest))
        }
        _ => Err(Error::InvalidDescriptor(input.to_string())),
    }
}

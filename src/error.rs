use core::fmt;

use crate::object::TypeId;
use crate::parser::Rule;

#[macro_export]
macro_rules! internal_err {
    () => {
        $crate::error::Error::Internal(None, std::file!(), std::line!()).into()
    };
    ( $x:expr ) => {
        $crate::error::Error::Internal(Some($x.to_string()), std::file!(), std::line!()).into()
    };
}

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    // dispatch failures
    IncompatibleType {
        x: TypeId,
        y: TypeId,
        details: Option<String>,
    },
    IncompatibleCast {
        from: TypeId,
        to: TypeId,
        details: Option<String>,
    },
    LossyCast {
        from: TypeId,
        to: TypeId,
        locations: Vec<usize>,
    },
    IncompatibleOperation {
        op: String,
        x: TypeId,
        y: Option<TypeId>,
    },

    // shape and construction failures
    IncompatibleSize {
        x: usize,
        y: usize,
    },
    OutOfBounds {
        index: usize,
        len: usize,
    },
    InvariantViolation(String),

    // registry
    Unregistered(TypeId),
    AlreadyInitialized,

    // parsing errors
    ParseFailure(Box<pest::error::Error<Rule>>),
    ParseUnexpected(Rule),

    Other(String),

    // in-dev errors
    Internal(Option<String>, &'static str, u32),
}

impl Error {
    pub fn incompatible_type(x: &TypeId, y: &TypeId) -> Self {
        Error::IncompatibleType {
            x: x.clone(),
            y: y.clone(),
            details: None,
        }
    }

    pub fn incompatible_cast(from: &TypeId, to: &TypeId) -> Self {
        Error::IncompatibleCast {
            from: from.clone(),
            to: to.clone(),
            details: None,
        }
    }

    pub fn incompatible_op(op: impl ToString, x: &TypeId, y: Option<&TypeId>) -> Self {
        Error::IncompatibleOperation {
            op: op.to_string(),
            x: x.clone(),
            y: y.cloned(),
        }
    }

    /// Attach a human-readable explanation to a dispatch failure
    pub fn with_details(self, msg: impl ToString) -> Self {
        match self {
            Error::IncompatibleType { x, y, .. } => Error::IncompatibleType {
                x,
                y,
                details: Some(msg.to_string()),
            },
            Error::IncompatibleCast { from, to, .. } => Error::IncompatibleCast {
                from,
                to,
                details: Some(msg.to_string()),
            },
            other => other,
        }
    }

    fn as_str(&self) -> String {
        match self {
            Error::IncompatibleType { x, y, details } => {
                let msg = format!("can't combine <{x}> and <{y}>");
                match details {
                    Some(d) => format!("{msg}\n{d}"),
                    None => msg,
                }
            }
            Error::IncompatibleCast { from, to, details } => {
                let msg = format!("can't convert from <{from}> to <{to}>");
                match details {
                    Some(d) => format!("{msg}\n{d}"),
                    None => msg,
                }
            }
            Error::LossyCast {
                from,
                to,
                locations,
            } => {
                let shown: Vec<String> = locations.iter().take(5).map(|i| i.to_string()).collect();
                let more = if locations.len() > 5 { ", ..." } else { "" };
                format!(
                    "can't convert from <{from}> to <{to}> due to loss of precision\nlocations: {}{more}",
                    shown.join(", ")
                )
            }
            Error::IncompatibleOperation { op, x, y: Some(y) } => {
                format!("<{x}> {op} <{y}> is not permitted")
            }
            Error::IncompatibleOperation { op, x, y: None } => {
                format!("{op}(<{x}>) is not permitted")
            }
            Error::IncompatibleSize { x, y } => {
                format!("can't recycle input of size {x} to size {y}")
            }
            Error::OutOfBounds { index, len } => {
                format!("can't subset element {index} of a vector of size {len}")
            }
            Error::InvariantViolation(msg) => msg.to_string(),
            Error::Unregistered(class) => format!("type <{class}> has not been registered"),
            Error::AlreadyInitialized => {
                "the type registry has already been installed".to_string()
            }
            Error::ParseFailure(e) => format!("{}", e),
            Error::ParseUnexpected(rule) => {
                format!("Parse failed. Found unexpected parsing rule '{:#?}'", rule)
            }
            Error::Other(s) => s.to_string(),
            Error::Internal(None, file, line) => format!("Internal Error ({file}:{line})"),
            Error::Internal(Some(msg), file, line) => {
                format!("Internal Error ({file}:{line})\n{msg}")
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error: {}", self.as_str())
    }
}

impl std::error::Error for Error {}

impl<T> From<Error> for Result<T, Error> {
    fn from(val: Error) -> Self {
        Err(val)
    }
}

impl From<pest::error::Error<Rule>> for Error {
    fn from(value: pest::error::Error<Rule>) -> Self {
        Error::ParseFailure(Box::new(value))
    }
}

//! Error kinds raised by the number core, per the error table in the
//! component design: division by zero, negative roots, out-of-domain
//! base/precision lookups, and malformed literals. No local recovery —
//! every variant here propagates straight to the caller and leaves the
//! number it was raised from untouched.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("division by zero")]
    DivByZero,

    #[error("square root of a negative number")]
    NegativeRoot,

    /// Raised by the base/precision table (C6), whose domain is 2..=32.
    #[error("precision argument {0} outside the supported domain 2..=32")]
    DomainOverflow(u32),

    /// Raised by literal parsing/formatting (C5), whose radix domain is
    /// 2..=36 — wider than C6's because digit characters go up to 'z'.
    #[error("radix argument {0} outside the supported domain 2..=36")]
    RadixOverflow(u32),

    #[error("malformed numeric literal: {0:?}")]
    BadLiteral(String),
}

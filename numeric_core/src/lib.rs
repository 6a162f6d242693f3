//! Arbitrary-precision signed numbers: word-level unsigned arithmetic,
//! a scaled/signed number built on top of it, base/precision
//! conversion, literal parsing and formatting, and a small-prime table.

mod anumber;
mod convert;
mod error;
mod precision;
mod primes;
mod word;

pub use anumber::ANumber;
pub use error::Error;
pub use precision::{bits_to_digits, digits_to_bits, MAX_BASE, MIN_BASE};
pub use primes::{is_prime_small, PRIMES_TABLE_LIMIT};
pub use word::{Word, WordVec, WORD_BITS};

pub mod radix {
    pub use crate::convert::{from_string, to_string, MAX_RADIX, MIN_RADIX};
}

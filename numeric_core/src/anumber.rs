//! The signed, scaled number type (C3) and its arithmetic (C4).
//!
//! `ANumber` carries a magnitude word vector, a sign, a binary exponent
//! (`exp`, the count of least-significant Words treated as fractional)
//! and a decimal exponent (`tens_exp`) layered on top. Keeping both
//! exponents separate is what lets a decimal literal like `"3.14"`
//! round-trip exactly instead of picking up binary rounding noise the
//! moment it is parsed.

use std::cmp::Ordering;
use std::fmt;

use crate::error::Error;
use crate::word::{self, Word, WordVec, WORD_BITS};

#[derive(Debug, Clone)]
pub struct ANumber {
    pub(crate) magnitude: WordVec,
    pub(crate) exp: u32,
    pub(crate) neg: bool,
    pub(crate) prec_bits: u32,
    pub(crate) tens_exp: i64,
}

impl ANumber {
    pub fn zero(prec_bits: u32) -> Self {
        ANumber {
            magnitude: WordVec::new(),
            exp: 0,
            neg: false,
            prec_bits,
            tens_exp: 0,
        }
    }

    pub fn is_zero(&self) -> bool {
        word::is_zero(&self.magnitude)
    }

    pub fn is_negative(&self) -> bool {
        self.neg && !self.is_zero()
    }

    /// The working precision, in bits. (The source's `Precision(a)`
    /// returns `!a.iPrecision`, a boolean negation of this field — almost
    /// certainly a bug. This returns the field itself.)
    pub fn precision_bits(&self) -> u32 {
        self.prec_bits
    }

    pub fn set_precision(&mut self, bits: u32) {
        self.prec_bits = bits;
    }

    /// Updates the working precision and re-normalizes: trims fractional
    /// Words beyond the new budget, or zero-extends up to it.
    pub fn change_precision(&mut self, bits: u32) {
        self.prec_bits = bits;
        let word_budget = words_for_bits(bits);
        if self.exp > word_budget {
            self.round_bits(bits);
        } else if self.exp < word_budget {
            let extra = word_budget - self.exp;
            pad_low_zero_words(&mut self.magnitude, extra);
            self.exp = word_budget;
        }
    }

    /// Removes low (least-significant) Words that are entirely zero,
    /// decreasing `exp` accordingly. Preserves the represented value.
    pub fn drop_trail_zeroes(&mut self) {
        while self.exp > 0 && self.magnitude.first().copied().unwrap_or(0) == 0 {
            self.magnitude.remove(0);
            self.exp -= 1;
        }
        word::trim(&mut self.magnitude);
        if self.is_zero() {
            self.exp = 0;
            self.neg = false;
        }
    }

    pub fn negate(&mut self) {
        if !self.is_zero() {
            self.neg = !self.neg;
        }
    }

    /// Caps the vector so at most `digits_needed` bits remain below the
    /// binary point, rounding the discarded tail half-up. An alias for
    /// [`ANumber::round_bits`]: since `exp` already counts fractional
    /// Words, capping the fractional bit budget and rounding the bit
    /// budget are the same operation.
    pub fn normalize_float(&mut self, digits_needed: u32) {
        self.round_bits(digits_needed);
    }

    /// Rounds to `prec_bits` bits of fractional precision, half-up on the
    /// highest dropped Word. A carry out of the rounding may grow the
    /// vector by one Word.
    pub fn round_bits(&mut self, prec_bits: u32) {
        let word_budget = words_for_bits(prec_bits);
        if self.exp <= word_budget {
            return;
        }
        let drop = (self.exp - word_budget) as usize;
        const HALF: Word = 1 << (WORD_BITS - 1);
        let round_up = self.magnitude.get(drop - 1).copied().unwrap_or(0) >= HALF;

        let kept: WordVec = self.magnitude.iter().skip(drop).copied().collect();
        self.magnitude = kept;
        self.exp = word_budget;

        if round_up {
            let mut one: WordVec = WordVec::new();
            one.push(1);
            let mut sum = WordVec::new();
            word::add(&mut sum, &self.magnitude, &one);
            self.magnitude = sum;
        }
        word::trim(&mut self.magnitude);
        if self.is_zero() {
            self.neg = false;
        }
    }

    /// Pads the smaller-`exp` operand with low zero Words and scales the
    /// smaller-`tens_exp` operand by a power of ten, so both operands are
    /// expressed against a common binary and decimal exponent. Returns
    /// the aligned magnitudes plus that common `(exp, tens_exp)` pair.
    fn align_operands(a: &ANumber, b: &ANumber) -> (WordVec, WordVec, u32, i64) {
        let min_tens = a.tens_exp.min(b.tens_exp);
        let mut ma = a.magnitude.clone();
        let mut mb = b.magnitude.clone();
        scale_by_pow10(&mut ma, (a.tens_exp - min_tens) as u64);
        scale_by_pow10(&mut mb, (b.tens_exp - min_tens) as u64);

        let common_exp = a.exp.max(b.exp);
        pad_low_zero_words(&mut ma, common_exp - a.exp);
        pad_low_zero_words(&mut mb, common_exp - b.exp);

        (ma, mb, common_exp, min_tens)
    }

    /// Signed addition: align, then add magnitudes with matching signs or
    /// subtract the smaller from the larger and take its sign. A zero
    /// result always clears the sign.
    pub fn checked_add(a: &ANumber, b: &ANumber) -> ANumber {
        let (ma, mb, exp, tens_exp) = Self::align_operands(a, b);
        let prec_bits = a.prec_bits.max(b.prec_bits);

        let (magnitude, neg) = if a.neg == b.neg {
            let mut r = WordVec::new();
            word::add(&mut r, &ma, &mb);
            (r, a.neg)
        } else {
            match word::compare(&ma, &mb) {
                Ordering::Equal => (WordVec::new(), false),
                Ordering::Greater => {
                    let mut r = WordVec::new();
                    word::subtract(&mut r, &ma, &mb);
                    (r, a.neg)
                }
                Ordering::Less => {
                    let mut r = WordVec::new();
                    word::subtract(&mut r, &mb, &ma);
                    (r, b.neg)
                }
            }
        };

        let mut result = ANumber { magnitude, exp, neg, prec_bits, tens_exp };
        if result.is_zero() {
            result.neg = false;
        }
        result.drop_trail_zeroes();
        result
    }

    /// `a - b`, defined as `a + (-b)`.
    pub fn checked_sub(a: &ANumber, b: &ANumber) -> ANumber {
        let mut neg_b = b.clone();
        neg_b.negate();
        Self::checked_add(a, &neg_b)
    }

    /// Multiplies magnitudes, adds exponents, xors signs, then discards
    /// fractional Words beyond the working precision.
    pub fn checked_mul(a: &ANumber, b: &ANumber) -> ANumber {
        let mut magnitude = WordVec::new();
        word::multiply(&mut magnitude, &a.magnitude, &b.magnitude);
        let exp = a.exp + b.exp;
        let tens_exp = a.tens_exp + b.tens_exp;
        let neg = a.neg ^ b.neg;
        let prec_bits = a.prec_bits.max(b.prec_bits);

        let mut result = ANumber { magnitude, exp, neg, prec_bits, tens_exp };
        if result.is_zero() {
            result.neg = false;
        }
        result.normalize_float(prec_bits);
        result.drop_trail_zeroes();
        result
    }

    /// Integer division when both operands are pure integers (`exp` and
    /// `tens_exp` both zero); otherwise the dividend is pre-shifted so the
    /// quotient carries `prec_bits` fractional bits. Returns `(quotient,
    /// remainder)`. `q.neg = a.neg XOR b.neg`; `rem.neg = a.neg`.
    pub fn checked_div(a: &ANumber, b: &ANumber) -> Result<(ANumber, ANumber), Error> {
        if b.is_zero() {
            return Err(Error::DivByZero);
        }
        let prec_bits = a.prec_bits.max(b.prec_bits);

        if a.exp == 0 && b.exp == 0 && a.tens_exp == 0 && b.tens_exp == 0 {
            let mut q = WordVec::new();
            let mut rem = WordVec::new();
            word::divide(&mut q, &mut rem, &a.magnitude, &b.magnitude)?;

            let mut quotient = ANumber { magnitude: q, exp: 0, neg: a.neg ^ b.neg, prec_bits, tens_exp: 0 };
            let mut remainder = ANumber { magnitude: rem, exp: 0, neg: a.neg, prec_bits, tens_exp: 0 };
            if quotient.is_zero() {
                quotient.neg = false;
            }
            if remainder.is_zero() {
                remainder.neg = false;
            }
            return Ok((quotient, remainder));
        }

        let (ma, mb, common_exp, common_tens_exp) = Self::align_operands(a, b);
        let word_budget = words_for_bits(prec_bits);

        let mut dividend = ma;
        word::shift_left(&mut dividend, word_budget * WORD_BITS);
        let mut q = WordVec::new();
        let mut rem = WordVec::new();
        word::divide(&mut q, &mut rem, &dividend, &mb)?;

        let mut quotient = ANumber {
            magnitude: q,
            exp: word_budget,
            neg: a.neg ^ b.neg,
            prec_bits,
            tens_exp: 0,
        };
        quotient.drop_trail_zeroes();
        if quotient.is_zero() {
            quotient.neg = false;
        }

        // `rem` is the leftover from dividing the pre-shifted dividend, so
        // it lives `word_budget` Words further into the fraction than
        // `common_exp` alone would suggest — the same shift the quotient
        // picked up has to be credited to the remainder too.
        let mut remainder = ANumber {
            magnitude: rem,
            exp: common_exp + word_budget,
            neg: a.neg,
            prec_bits,
            tens_exp: common_tens_exp,
        };
        remainder.drop_trail_zeroes();
        if remainder.is_zero() {
            remainder.neg = false;
        }

        Ok((quotient, remainder))
    }

    /// Integer square root for non-negative `N` by binary search on the
    /// candidate root. Floating inputs are first left-shifted so the
    /// result carries `prec_bits` fractional bits. Negative input is a
    /// [`Error::NegativeRoot`].
    pub fn sqrt(a: &ANumber) -> Result<ANumber, Error> {
        if a.is_negative() {
            tracing::debug!("sqrt: negative operand");
            return Err(Error::NegativeRoot);
        }
        if a.is_zero() {
            return Ok(ANumber::zero(a.prec_bits));
        }

        let prec_bits = a.prec_bits;
        let word_budget = words_for_bits(prec_bits);

        let mut mag = a.magnitude.clone();
        let mut exp_words = a.exp;
        if a.tens_exp > 0 {
            scale_by_pow10(&mut mag, a.tens_exp as u64);
        } else if a.tens_exp < 0 {
            let k = (-a.tens_exp) as u64;
            // Dividing by a power of ten is not exact in base two, so buy
            // extra binary precision before dividing: ~4 bits per decimal
            // digit of headroom, plus the result precision itself.
            let guard_words = word_budget + (k * 4 / WORD_BITS as u64) as u32 + 2;
            word::shift_left(&mut mag, guard_words * WORD_BITS);
            exp_words += guard_words;
            let ten_k = word::pow(10, k);
            let mut q = WordVec::new();
            let mut rem = WordVec::new();
            word::divide(&mut q, &mut rem, &mag, &ten_k)?;
            mag = q;
        }

        let target_shift = 2 * word_budget as i64 - exp_words as i64;
        if target_shift >= 0 {
            word::shift_left(&mut mag, target_shift as u32 * WORD_BITS);
        } else {
            word::shift_right(&mut mag, (-target_shift) as u32 * WORD_BITS);
        }

        let root = integer_sqrt(&mag);
        let mut result = ANumber {
            magnitude: root,
            exp: word_budget,
            neg: false,
            prec_bits,
            tens_exp: 0,
        };
        result.drop_trail_zeroes();
        Ok(result)
    }

    /// GCD of two integer-form magnitudes (non-negative result). Operands
    /// are expected to already be in integer form (`exp = 0`, `tens_exp =
    /// 0`); the caller is responsible for that, same as `base_subtract`
    /// is responsible for ordering its operands.
    pub fn base_gcd(a: &ANumber, b: &ANumber) -> ANumber {
        let g = word::gcd(&a.magnitude, &b.magnitude);
        ANumber {
            magnitude: g,
            exp: 0,
            neg: false,
            prec_bits: a.prec_bits.max(b.prec_bits),
            tens_exp: 0,
        }
    }

    /// Total order on the represented value: sign first, then magnitude
    /// at a common exponent.
    pub fn cmp_value(a: &ANumber, b: &ANumber) -> Ordering {
        if a.is_zero() && b.is_zero() {
            return Ordering::Equal;
        }
        let a_neg = a.is_negative();
        let b_neg = b.is_negative();
        if a_neg != b_neg {
            return if a_neg { Ordering::Less } else { Ordering::Greater };
        }
        let (ma, mb, _, _) = Self::align_operands(a, b);
        let mag_cmp = word::compare(&ma, &mb);
        if a_neg {
            mag_cmp.reverse()
        } else {
            mag_cmp
        }
    }

    pub fn greater_than(a: &ANumber, b: &ANumber) -> bool {
        Self::cmp_value(a, b) == Ordering::Greater
    }

    pub fn less_than(a: &ANumber, b: &ANumber) -> bool {
        Self::cmp_value(a, b) == Ordering::Less
    }
}

impl PartialEq for ANumber {
    fn eq(&self, other: &Self) -> bool {
        Self::cmp_value(self, other) == Ordering::Equal
    }
}

impl PartialOrd for ANumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(Self::cmp_value(self, other))
    }
}

impl std::ops::Add for &ANumber {
    type Output = ANumber;
    fn add(self, rhs: &ANumber) -> ANumber {
        ANumber::checked_add(self, rhs)
    }
}

impl std::ops::Sub for &ANumber {
    type Output = ANumber;
    fn sub(self, rhs: &ANumber) -> ANumber {
        ANumber::checked_sub(self, rhs)
    }
}

impl std::ops::Mul for &ANumber {
    type Output = ANumber;
    fn mul(self, rhs: &ANumber) -> ANumber {
        ANumber::checked_mul(self, rhs)
    }
}

impl std::ops::Neg for ANumber {
    type Output = ANumber;
    fn neg(mut self) -> ANumber {
        self.negate();
        self
    }
}

impl fmt::Display for ANumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = crate::convert::to_string(self, 10, false).unwrap_or_else(|_| "<error>".into());
        f.write_str(&s)
    }
}

pub(crate) fn words_for_bits(bits: u32) -> u32 {
    (bits + WORD_BITS - 1) / WORD_BITS
}

pub(crate) fn pad_low_zero_words(v: &mut WordVec, extra: u32) {
    if extra == 0 {
        return;
    }
    let mut out: WordVec = WordVec::new();
    out.resize(extra as usize, 0);
    out.extend_from_slice(v);
    *v = out;
}

pub(crate) fn scale_by_pow10(v: &mut WordVec, k: u64) {
    if k == 0 {
        return;
    }
    let p = word::pow(10, k);
    let mut r = WordVec::new();
    word::multiply(&mut r, v, &p);
    *v = r;
}

fn integer_sqrt(n: &[Word]) -> WordVec {
    if word::is_zero(n) {
        return WordVec::new();
    }
    let bits = word::bit_length(n);
    let result_bits = (bits + 1) / 2;

    let mut hi: WordVec = WordVec::new();
    hi.push(1);
    word::shift_left(&mut hi, result_bits + 1);
    let mut lo: WordVec = WordVec::new();

    loop {
        let mut sum = WordVec::new();
        word::add(&mut sum, &lo, &hi);
        word::shift_right(&mut sum, 1);
        let mid = sum;

        if word::compare(&mid, &lo) == Ordering::Equal || word::compare(&mid, &hi) == Ordering::Equal {
            break;
        }

        let mut sq = WordVec::new();
        word::multiply(&mut sq, &mid, &mid);
        if word::compare(&sq, n) == Ordering::Greater {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    lo
}

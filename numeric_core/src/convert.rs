//! String conversion (C5): parsing numeric literals into [`ANumber`] and
//! formatting an `ANumber` back out, in any base `2..=36`.
//!
//! The literal grammar is `[+|-] digits ['.' digits] [('e'|'E') [+|-]
//! digits]`. In base 10 the fractional digit count and the exponent fold
//! straight into `tens_exp`, so a decimal literal round-trips exactly. In
//! any other base there is no separate decimal exponent to borrow, so the
//! fractional part and the exponent are realized as an exact multiply (or
//! a precision-bounded divide) against the magnitude instead.

use crate::anumber::{words_for_bits, ANumber};
use crate::error::Error;
use crate::word::{self, Word, WordVec, WORD_BITS};

pub const MIN_RADIX: u32 = 2;
pub const MAX_RADIX: u32 = 36;

fn check_radix(base: u32) -> Result<(), Error> {
    if (MIN_RADIX..=MAX_RADIX).contains(&base) {
        Ok(())
    } else {
        tracing::debug!(base, "radix outside supported 2..=36 domain");
        Err(Error::RadixOverflow(base))
    }
}

fn digit_value(c: char, base: u32) -> Option<u32> {
    let d = c.to_digit(36)?;
    if d < base {
        Some(d)
    } else {
        None
    }
}

fn digit_char(d: u32) -> char {
    std::char::from_digit(d, 36).expect("digit value must fit in base 36")
}

/// Parses a literal in the given `base` into an `ANumber` with the given
/// working precision.
pub fn from_string(s: &str, prec_bits: u32, base: u32) -> Result<ANumber, Error> {
    check_radix(base)?;

    let chars: Vec<char> = s.chars().collect();
    let mut i = 0usize;
    let mut neg = false;
    if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
        neg = chars[i] == '-';
        i += 1;
    }

    let start_int = i;
    while i < chars.len() && digit_value(chars[i], base).is_some() {
        i += 1;
    }
    let int_digits = &chars[start_int..i];

    let mut frac_digits: &[char] = &[];
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        let start_frac = i;
        while i < chars.len() && digit_value(chars[i], base).is_some() {
            i += 1;
        }
        frac_digits = &chars[start_frac..i];
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        tracing::debug!(literal = %s, "no digits found in numeric literal");
        return Err(Error::BadLiteral(s.to_string()));
    }

    let mut has_exp = false;
    let mut exp_sign: i64 = 1;
    let mut exp_val: i64 = 0;
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        has_exp = true;
        i += 1;
        if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
            if chars[i] == '-' {
                exp_sign = -1;
            }
            i += 1;
        }
        let start_exp = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        if i == start_exp {
            return Err(Error::BadLiteral(s.to_string()));
        }
        let exp_str: String = chars[start_exp..i].iter().collect();
        exp_val = exp_str.parse::<i64>().map_err(|_| Error::BadLiteral(s.to_string()))?;
    }

    if i != chars.len() {
        return Err(Error::BadLiteral(s.to_string()));
    }

    let base_word: WordVec = {
        let mut v = WordVec::new();
        v.push(base);
        v
    };
    let mut mag: WordVec = WordVec::new();
    for &c in int_digits.iter().chain(frac_digits.iter()) {
        let d = digit_value(c, base).expect("already validated during scan") as Word;
        let mut scaled = WordVec::new();
        word::multiply(&mut scaled, &mag, &base_word);
        let d_vec: WordVec = {
            let mut v = WordVec::new();
            if d != 0 {
                v.push(d);
            }
            v
        };
        let mut sum = WordVec::new();
        word::add(&mut sum, &scaled, &d_vec);
        mag = sum;
    }

    let frac_len = frac_digits.len() as i64;
    let raw_exp = exp_sign * exp_val;

    let mut number = ANumber {
        magnitude: mag,
        exp: 0,
        neg,
        prec_bits,
        tens_exp: 0,
    };

    if base == 10 {
        number.tens_exp = raw_exp - frac_len;
    } else {
        if frac_len > 0 {
            number = scale_by_base_power(&number, base, -frac_len)?;
        }
        if has_exp && raw_exp != 0 {
            number = scale_by_base_power(&number, base, raw_exp)?;
        }
    }

    if number.is_zero() {
        number.neg = false;
    }
    number.drop_trail_zeroes();
    Ok(number)
}

/// Multiplies (or precision-bounded divides) `n` by `base^power`,
/// preserving `tens_exp` as-is; the caller decides what the new `tens_exp`
/// should mean. Used both for folding fractional non-decimal digits into
/// the magnitude and for applying a non-decimal exponent.
fn scale_by_base_power(n: &ANumber, base: u32, power: i64) -> Result<ANumber, Error> {
    if power == 0 {
        return Ok(n.clone());
    }
    let prec_bits = n.prec_bits;
    if power > 0 {
        let p = word::pow(base, power as u64);
        let mut r = WordVec::new();
        word::multiply(&mut r, &n.magnitude, &p);
        let mut result = ANumber {
            magnitude: r,
            exp: n.exp,
            neg: n.neg,
            prec_bits,
            tens_exp: n.tens_exp,
        };
        result.drop_trail_zeroes();
        Ok(result)
    } else {
        let k = (-power) as u64;
        let p = word::pow(base, k);
        let word_budget = words_for_bits(prec_bits);
        let extra = word_budget + 2;
        let mut dividend = n.magnitude.clone();
        word::shift_left(&mut dividend, extra * WORD_BITS);
        let mut q = WordVec::new();
        let mut rem = WordVec::new();
        word::divide(&mut q, &mut rem, &dividend, &p)?;
        let mut result = ANumber {
            magnitude: q,
            exp: n.exp + extra,
            neg: n.neg,
            prec_bits,
            tens_exp: n.tens_exp,
        };
        result.round_bits(prec_bits);
        Ok(result)
    }
}

/// Folds `tens_exp` into the magnitude so the result carries `tens_exp ==
/// 0`. Exact when the original `tens_exp >= 0`; otherwise rounds to the
/// working precision, same as any other binary-fraction-producing
/// operation.
fn fold_tens_exp(n: &ANumber) -> Result<ANumber, Error> {
    if n.tens_exp == 0 {
        return Ok(n.clone());
    }
    let mut folded = scale_by_base_power(n, 10, n.tens_exp)?;
    folded.tens_exp = 0;
    Ok(folded)
}

/// Formats `n` in the given `base`. An integer-valued number (`exp == 0`
/// and `tens_exp == 0`) prints as a bare integer literal unless
/// `force_float` is set; otherwise the fractional part (and, in base 10,
/// the exact decimal placement) is spelled out explicitly.
pub fn to_string(n: &ANumber, base: u32, force_float: bool) -> Result<String, Error> {
    check_radix(base)?;
    if n.is_zero() {
        return Ok("0".to_string());
    }

    let sign = if n.neg { "-" } else { "" };
    let is_integer_form = n.exp == 0 && n.tens_exp == 0;
    if is_integer_form && !force_float {
        return Ok(format!("{sign}{}", digits_to_string(&n.magnitude, base)));
    }

    if base == 10 {
        return Ok(format!("{sign}{}", to_decimal_string(n)));
    }

    let folded = fold_tens_exp(n)?;
    Ok(format!("{sign}{}", fractional_string_in_base(&folded, base)))
}

fn digits_to_string(v: &[Word], base: u32) -> String {
    if word::is_zero(v) {
        return "0".to_string();
    }
    let mut cur: WordVec = WordVec::new();
    cur.extend_from_slice(&v[..word::effective_len(v)]);
    let base_vec: WordVec = {
        let mut b = WordVec::new();
        b.push(base);
        b
    };
    let mut digits = Vec::new();
    while !word::is_zero(&cur) {
        let mut q = WordVec::new();
        let mut r = WordVec::new();
        word::divide(&mut q, &mut r, &cur, &base_vec).expect("base is nonzero");
        let d = r.first().copied().unwrap_or(0);
        digits.push(digit_char(d));
        cur = q;
    }
    digits.iter().rev().collect()
}

/// Exact decimal rendering that keeps `tens_exp` and the binary fraction
/// as a single numerator/denominator pair rather than rounding either
/// away: `denominator = 2^(exp*WORD_BITS) * 10^max(0, -tens_exp)`,
/// `numerator = magnitude * 10^max(0, tens_exp)`. Every such denominator
/// has only 2 and 5 as prime factors, so the decimal expansion always
/// terminates.
fn to_decimal_string(n: &ANumber) -> String {
    let mut numerator = n.magnitude.clone();
    if n.tens_exp > 0 {
        let mut r = WordVec::new();
        word::multiply(&mut r, &numerator, &word::pow(10, n.tens_exp as u64));
        numerator = r;
    }

    let mut denominator: WordVec = WordVec::new();
    denominator.push(1);
    if n.exp > 0 {
        word::shift_left(&mut denominator, n.exp * WORD_BITS);
    }
    if n.tens_exp < 0 {
        let mut r = WordVec::new();
        word::multiply(&mut r, &denominator, &word::pow(10, (-n.tens_exp) as u64));
        denominator = r;
    }

    let mut int_part = WordVec::new();
    let mut rem = WordVec::new();
    word::divide(&mut int_part, &mut rem, &numerator, &denominator)
        .expect("denominator is never zero");
    let int_str = digits_to_string(&int_part, 10);

    if word::is_zero(&rem) {
        return int_str;
    }

    let ten: WordVec = {
        let mut v = WordVec::new();
        v.push(10);
        v
    };
    let max_frac_digits = n.exp as u64 * WORD_BITS as u64 + n.tens_exp.unsigned_abs() + 4;
    let mut frac_chars = String::new();
    for _ in 0..max_frac_digits {
        if word::is_zero(&rem) {
            break;
        }
        let mut scaled = WordVec::new();
        word::multiply(&mut scaled, &rem, &ten);
        let mut digit = WordVec::new();
        let mut new_rem = WordVec::new();
        word::divide(&mut digit, &mut new_rem, &scaled, &denominator).expect("denominator nonzero");
        let d = digit.first().copied().unwrap_or(0);
        frac_chars.push(std::char::from_digit(d, 10).unwrap());
        rem = new_rem;
    }
    format!("{int_str}.{frac_chars}")
}

/// Renders a pure binary fixed point (`tens_exp` already folded to zero)
/// in an arbitrary base. The fractional expansion is capped at
/// `exp*WORD_BITS + 4` digits, the exact bound for a power-of-two
/// denominator, as a safety net rather than because it is inexact.
fn fractional_string_in_base(n: &ANumber, base: u32) -> String {
    let mut denominator: WordVec = WordVec::new();
    denominator.push(1);
    if n.exp > 0 {
        word::shift_left(&mut denominator, n.exp * WORD_BITS);
    }

    let mut int_part = WordVec::new();
    let mut rem = WordVec::new();
    word::divide(&mut int_part, &mut rem, &n.magnitude, &denominator)
        .expect("denominator is never zero");
    let int_str = digits_to_string(&int_part, base);
    if word::is_zero(&rem) {
        return int_str;
    }

    let base_vec: WordVec = {
        let mut b = WordVec::new();
        b.push(base);
        b
    };
    let max_frac_digits = (n.exp as u64 * WORD_BITS as u64 + 4) as usize;
    let mut frac_chars = String::new();
    for _ in 0..max_frac_digits {
        if word::is_zero(&rem) {
            break;
        }
        let mut scaled = WordVec::new();
        word::multiply(&mut scaled, &rem, &base_vec);
        let mut digit = WordVec::new();
        let mut new_rem = WordVec::new();
        word::divide(&mut digit, &mut new_rem, &scaled, &denominator).expect("denominator nonzero");
        let d = digit.first().copied().unwrap_or(0);
        frac_chars.push(digit_char(d));
        rem = new_rem;
    }
    format!("{int_str}.{frac_chars}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_integer() {
        let n = from_string("42", 128, 10).unwrap();
        assert_eq!(to_string(&n, 10, false).unwrap(), "42");
    }

    #[test]
    fn parses_negative_integer() {
        let n = from_string("-42", 128, 10).unwrap();
        assert_eq!(to_string(&n, 10, false).unwrap(), "-42");
    }

    #[test]
    fn parses_decimal_literal_exactly() {
        let n = from_string("3.14", 128, 10).unwrap();
        assert_eq!(to_string(&n, 10, false).unwrap(), "3.14");
    }

    #[test]
    fn parses_scientific_literal() {
        let n = from_string("1.5e2", 128, 10).unwrap();
        assert_eq!(to_string(&n, 10, false).unwrap(), "150");
    }

    #[test]
    fn parses_negative_exponent() {
        let n = from_string("1.5e-2", 128, 10).unwrap();
        assert_eq!(to_string(&n, 10, false).unwrap(), "0.015");
    }

    #[test]
    fn rejects_empty_literal() {
        assert!(from_string("", 128, 10).is_err());
        assert!(from_string("+", 128, 10).is_err());
        assert!(from_string("e5", 128, 10).is_err());
    }

    #[test]
    fn rejects_base_out_of_range() {
        assert_eq!(from_string("1", 128, 1).unwrap_err(), Error::RadixOverflow(1));
        assert_eq!(from_string("1", 128, 37).unwrap_err(), Error::RadixOverflow(37));
    }

    #[test]
    fn hex_round_trip_integer() {
        let n = from_string("ff", 128, 16).unwrap();
        assert_eq!(to_string(&n, 16, false).unwrap(), "ff");
        assert_eq!(to_string(&n, 10, false).unwrap(), "255");
    }

    #[test]
    fn zero_prints_as_zero() {
        let n = from_string("0", 128, 10).unwrap();
        assert_eq!(to_string(&n, 10, false).unwrap(), "0");
        assert!(!n.is_negative());
    }

    #[test]
    fn force_float_on_integer() {
        let n = from_string("7", 128, 10).unwrap();
        let s = to_string(&n, 10, true).unwrap();
        assert!(s.starts_with('7'));
    }
}

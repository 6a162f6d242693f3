//! `numcli` — a small arbitrary-precision calculator. Reads one
//! expression per line (either a single literal, `a op b`, `a gcd b`, or
//! `sqrt a`), tokenizes it, parses the operands through `numeric_core`,
//! and prints the result in the same base it read.

use anyhow::Context;
use clap::Parser;
use numeric_core::ANumber;

#[derive(Parser, Debug)]
#[command(name = "numcli", about = "Arbitrary-precision number calculator")]
struct Cli {
    /// Base used both to parse operands and to print the result (2..=36).
    #[arg(long, default_value_t = 10)]
    base: u32,

    /// Working precision, in bits, for any operation that produces a
    /// fractional result (multiply, divide, sqrt).
    #[arg(long, default_value_t = 128)]
    prec_bits: u32,

    /// Expression to evaluate, e.g. `"3.14 + 2"`. Reads stdin line by
    /// line if omitted.
    expr: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Some(expr) = &cli.expr {
        let result = eval_line(expr, cli.base, cli.prec_bits)?;
        println!("{result}");
        return Ok(());
    }

    let stdin = std::io::stdin();
    for line in stdin.lines() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        match eval_line(&line, cli.base, cli.prec_bits) {
            Ok(result) => println!("{result}"),
            Err(e) => {
                tracing::error!(error = %e, input = %line, "evaluation failed");
                println!("error: {e}");
            }
        }
    }
    Ok(())
}

fn token_text<'a>(tok: &lexer::Token, interner: &'a lexer::Interner) -> &'a str {
    let sym = match tok.kind {
        lexer::TokenKind::Ident(s) => s,
        lexer::TokenKind::Number(s) => s,
        lexer::TokenKind::Symbolic(s) => s,
        lexer::TokenKind::StringLiteral(s) => s,
    };
    interner.resolve(sym)
}

fn eval_line(line: &str, base: u32, prec_bits: u32) -> anyhow::Result<String> {
    let (tokens, interner) = lexer::tokenize(line).context("tokenizing input")?;
    let words: Vec<&str> = tokens.iter().map(|t| token_text(t, &interner)).collect();

    let parse = |s: &str| -> anyhow::Result<ANumber> {
        numeric_core::radix::from_string(s, prec_bits, base)
            .with_context(|| format!("parsing numeric literal {s:?}"))
    };

    let result = match words.as_slice() {
        [] => anyhow::bail!("empty expression"),
        [a] => parse(a)?,
        ["sqrt", a] => ANumber::sqrt(&parse(a)?).context("sqrt of a negative number")?,
        [a, "gcd", b] => ANumber::base_gcd(&parse(a)?, &parse(b)?),
        [a, op, b] => {
            let lhs = parse(a)?;
            let rhs = parse(b)?;
            match *op {
                "+" => ANumber::checked_add(&lhs, &rhs),
                "-" => ANumber::checked_sub(&lhs, &rhs),
                "*" => ANumber::checked_mul(&lhs, &rhs),
                "/" => ANumber::checked_div(&lhs, &rhs).context("division")?.0,
                other => anyhow::bail!("unknown operator {other:?}"),
            }
        }
        _ => anyhow::bail!("unrecognized expression shape: {line:?}"),
    };

    numeric_core::radix::to_string(&result, base, false).context("formatting result")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_plain_literal() {
        assert_eq!(eval_line("42", 10, 128).unwrap(), "42");
    }

    #[test]
    fn evaluates_addition() {
        assert_eq!(eval_line("3.14 + 2", 10, 128).unwrap(), "5.14");
    }

    #[test]
    fn evaluates_division() {
        assert_eq!(eval_line("17 / 5", 10, 128).unwrap(), "3");
    }

    #[test]
    fn evaluates_sqrt() {
        assert_eq!(eval_line("sqrt 1000000", 10, 128).unwrap(), "1000");
    }

    #[test]
    fn evaluates_gcd() {
        assert_eq!(eval_line("48 gcd 18", 10, 128).unwrap(), "6");
    }

    #[test]
    fn division_by_zero_surfaces_as_error() {
        assert!(eval_line("1 / 0", 10, 128).is_err());
    }

    #[test]
    fn hex_base_round_trip() {
        assert_eq!(eval_line("ff + 1", 16, 128).unwrap(), "100");
    }
}

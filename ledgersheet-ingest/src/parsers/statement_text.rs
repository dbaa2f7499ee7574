//! Transaction-row parser for flattened statement text.
//!
//! Expected shape after `clean_text` (no line breaks survive):
//!   05-JAN-2024 D ATM WITHDRAWAL 500.00 0.00 1,200.00Cr 06-JAN-2024 C SALARY CREDIT 2,000.00 3,200.00Cr
//!
//! A row starts at `DD-MMM-YYYY <letter>` and runs until the next such head.
//! The description is everything before the first amount token; the amount
//! tail is up to two plain amounts and an optional balance carrying a
//! `Dr`/`Cr` suffix. Amounts are assigned right-aligned: balance, then
//! credit, then debit. Anything after the tail is ignored.
//!
//! Descriptions containing a bare number end early at that number. That is a
//! known limit of the heuristic and is kept for compatibility.
//!
//! An amount must start with a digit: a token such as `,500.00` is treated
//! as description text, not as an amount.

use anyhow::Result;
use regex::Regex;

use crate::clean::clean_text;
use crate::types::TransactionRecord;

const ZERO_BALANCE: &str = "0.00";

fn head_regex() -> Result<Regex> {
    Ok(Regex::new(r"(?P<date>[0-9]{2}-[A-Z]{3}-[0-9]{4})\s+(?P<kind>[A-Z])\s+")?)
}

fn amount_regex() -> Result<Regex> {
    Ok(Regex::new(r"^(?P<number>[0-9][0-9,]*(?:\.[0-9]{2})?)(?P<side>Dr|Cr)?$")?)
}

fn parse_amount(digits: &str) -> f64 {
    digits.parse().unwrap_or(0.0)
}

/// Amount tail of one row, thousands separators already stripped.
#[derive(Debug, Default)]
struct AmountTail {
    plain: Vec<String>,
    balance: Option<String>,
}

impl AmountTail {
    fn scan(tokens: &[&str], amount_re: &Regex) -> Self {
        let mut tail = AmountTail::default();

        for tok in tokens {
            let Some(caps) = amount_re.captures(tok) else {
                break;
            };
            let number = caps["number"].replace(',', "");

            if let Some(side) = caps.name("side") {
                tail.balance = Some(format!("{number}{}", side.as_str()));
                break;
            }
            if tail.plain.len() == 2 {
                break;
            }
            tail.plain.push(number);
        }

        tail
    }

    /// (debit, credit); a lone plain amount sits in the credit column.
    fn debit_credit(&self) -> (f64, f64) {
        match self.plain.as_slice() {
            [debit, credit] => (parse_amount(debit), parse_amount(credit)),
            [credit] => (0.0, parse_amount(credit)),
            _ => (0.0, 0.0),
        }
    }
}

/// Parse cleaned statement text into transactions, in reading order.
///
/// Text without any row head yields an empty vec.
pub fn parse_transactions(cleaned: &str) -> Result<Vec<TransactionRecord>> {
    let head_re = head_regex()?;
    let amount_re = amount_regex()?;

    let heads: Vec<_> = head_re.captures_iter(cleaned).collect();
    let mut out = Vec::with_capacity(heads.len());

    for (i, caps) in heads.iter().enumerate() {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let body_end = heads
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(cleaned.len(), |m| m.start());
        let body = &cleaned[whole.end()..body_end];

        let tokens: Vec<&str> = body.split_whitespace().collect();
        let desc_len = tokens
            .iter()
            .position(|t| amount_re.is_match(t))
            .unwrap_or(tokens.len());

        let tail = AmountTail::scan(&tokens[desc_len..], &amount_re);
        let (debit, credit) = tail.debit_credit();

        out.push(TransactionRecord {
            date: caps["date"].trim().to_string(),
            kind: caps["kind"].trim().to_string(),
            description: tokens[..desc_len].join(" "),
            debit,
            credit,
            balance: tail.balance.unwrap_or_else(|| ZERO_BALANCE.to_string()),
        });
    }

    Ok(out)
}

/// Clean raw extracted text, then parse it.
pub fn transactions_from_text(raw: &str) -> Result<Vec<TransactionRecord>> {
    parse_transactions(&clean_text(raw)?)
}

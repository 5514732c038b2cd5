//! Number-base conversion and hex helpers

use std::fmt;
use std::str::FromStr;

use alloy::primitives::U256;
use anyhow::{Context, Result};

use super::{strip_hex_prefix, ToolResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    Binary,
    Octal,
    Decimal,
    Hex,
}

impl Base {
    pub fn radix(self) -> u64 {
        match self {
            Self::Binary => 2,
            Self::Octal => 8,
            Self::Decimal => 10,
            Self::Hex => 16,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Self::Binary => "0b",
            Self::Octal => "0o",
            Self::Decimal => "",
            Self::Hex => "0x",
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Binary => "bin",
            Self::Octal => "oct",
            Self::Decimal => "dec",
            Self::Hex => "hex",
        };
        f.write_str(name)
    }
}

impl FromStr for Base {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "2" | "bin" | "binary" => Ok(Self::Binary),
            "8" | "oct" | "octal" => Ok(Self::Octal),
            "10" | "dec" | "decimal" => Ok(Self::Decimal),
            "16" | "hex" | "hexadecimal" => Ok(Self::Hex),
            other => anyhow::bail!("unknown base `{}`", other),
        }
    }
}

/// Base implied by a prefix, or by the digits of an unprefixed value
///
/// Unprefixed values made only of decimal digits are taken as decimal, which
/// is what people usually mean when they type `1234` into a hex field.
pub fn guess_base(input: &str) -> Option<Base> {
    let input = input.trim();
    let lower = input.to_lowercase();
    let (base, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (Some(Base::Hex), rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (Some(Base::Binary), rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (Some(Base::Octal), rest)
    } else {
        (None, lower.as_str())
    };

    if digits.is_empty() {
        return None;
    }
    match base {
        Some(base) => Some(base),
        None if digits.chars().all(|c| c.is_ascii_digit()) => Some(Base::Decimal),
        None if digits.chars().all(|c| c.is_ascii_hexdigit()) => Some(Base::Hex),
        None => None,
    }
}

/// Left-pad odd-length hex with a zero nibble, keeping the `0x` prefix
pub fn pad_odd_hex(input: &str) -> String {
    let digits = strip_hex_prefix(input.trim());
    if digits.len() % 2 == 1 {
        format!("0x0{}", digits)
    } else {
        format!("0x{}", digits)
    }
}

/// Parse `input` in `base` (guessed when `None`)
pub fn parse_in_base(input: &str, base: Option<Base>) -> Result<U256> {
    let input = input.trim();
    let base = match base {
        Some(base) => base,
        None => guess_base(input).with_context(|| format!("cannot tell the base of `{}`", input))?,
    };

    let lower = input.to_lowercase();
    let digits = lower.strip_prefix(base.prefix()).unwrap_or(&lower);
    let digits = digits.replace('_', "");
    U256::from_str_radix(&digits, base.radix())
        .with_context(|| format!("`{}` is not a valid {} number", input, base))
}

/// The value in all four bases
pub fn convert_base(input: &str, base: Option<Base>) -> Result<Vec<(Base, String)>> {
    let value = parse_in_base(input, base)?;
    Ok(vec![
        (Base::Binary, format!("0b{:b}", value)),
        (Base::Octal, format!("0o{:o}", value)),
        (Base::Decimal, value.to_string()),
        (Base::Hex, pad_odd_hex(&format!("{:x}", value))),
    ])
}

/// `base <value> [--from base]`
pub fn base(input: &str, from: Option<Base>) -> Result<ToolResult> {
    let mut result = ToolResult::new("Base Convert");
    for (base, value) in convert_base(input, from)? {
        result = result.add(base.to_string(), value);
    }

    // hex that spells text is worth showing
    let hex = result.get("hex").map(str::to_string);
    if let Some(text) = hex.and_then(|h| printable_utf8(&h)) {
        result = result.add("utf8", format!("\"{}\"", text));
    }
    Ok(result)
}

fn printable_utf8(hex_value: &str) -> Option<String> {
    let bytes = hex::decode(strip_hex_prefix(hex_value)).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    let printable = !text.is_empty() && text.chars().all(|c| !c.is_control());
    printable.then_some(text)
}

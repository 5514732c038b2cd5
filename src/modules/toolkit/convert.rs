//! Unit conversion: wei through ether

use alloy::primitives::utils::{format_units, parse_units, ParseUnits, UnitsError};
use alloy::primitives::U256;
use anyhow::Result;
use thiserror::Error;

use super::ToolResult;

/// Named denominations, smallest first
pub const UNITS: &[(&str, u8)] = &[
    ("wei", 0),
    ("kwei", 3),
    ("mwei", 6),
    ("gwei", 9),
    ("szabo", 12),
    ("finney", 15),
    ("ether", 18),
];

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unknown unit `{0}`")]
    UnknownUnit(String),

    #[error("amount must not be negative")]
    Negative,

    #[error("`{amount}` has more than {decimals} decimal places for {unit}")]
    TooPrecise {
        amount: String,
        unit: String,
        decimals: u8,
    },

    #[error(transparent)]
    Units(#[from] UnitsError),
}

/// Decimals of a unit name or one of its aliases
pub fn unit_decimals(unit: &str) -> Option<u8> {
    let canonical = match unit.trim().to_lowercase().as_str() {
        "wei" => "wei",
        "kwei" | "babbage" => "kwei",
        "mwei" | "lovelace" => "mwei",
        "gwei" | "shannon" => "gwei",
        "szabo" | "microether" => "szabo",
        "finney" | "milliether" => "finney",
        "ether" | "eth" => "ether",
        _ => return None,
    };
    UNITS
        .iter()
        .find(|(name, _)| *name == canonical)
        .map(|(_, decimals)| *decimals)
}

/// Amount in wei of `amount` `unit`s
pub fn to_wei(amount: &str, unit: &str) -> Result<U256, ConvertError> {
    let decimals = unit_decimals(unit).ok_or_else(|| ConvertError::UnknownUnit(unit.to_string()))?;
    let amount = amount.trim();

    // parse_units truncates digits past `decimals`; trailing zeros are exact
    let amount = match amount.split_once('.') {
        Some((whole, fraction)) if fraction.trim_end_matches('0').is_empty() && !whole.is_empty() => {
            whole
        }
        _ => amount,
    };
    let fraction_digits = amount.split_once('.').map_or(0, |(_, fraction)| {
        fraction.trim_end_matches('0').len()
    });
    if fraction_digits > usize::from(decimals) {
        return Err(ConvertError::TooPrecise {
            amount: amount.to_string(),
            unit: unit.trim().to_string(),
            decimals,
        });
    }

    match parse_units(amount, decimals)? {
        ParseUnits::U256(wei) => Ok(wei),
        ParseUnits::I256(_) => Err(ConvertError::Negative),
    }
}

/// `amount` of `unit` expressed in every named unit
pub fn convert_units(amount: &str, unit: &str) -> Result<Vec<(&'static str, String)>, ConvertError> {
    let wei = to_wei(amount, unit)?;
    UNITS
        .iter()
        .map(|(name, decimals)| Ok((*name, trim_fraction(format_units(wei, *decimals)?))))
        .collect()
}

/// `1.500` -> `1.5`, `2.0` -> `2`
fn trim_fraction(value: String) -> String {
    if !value.contains('.') {
        return value;
    }
    value.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// `<amount> [unit]`, unit defaulting to wei
pub fn convert(input: &str) -> Result<ToolResult> {
    let mut parts = input.split_whitespace();
    let amount = parts
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: convert <amount> [unit]"))?;
    let unit = parts.next().unwrap_or("wei");

    let rows = convert_units(amount, unit)?;
    Ok(rows
        .into_iter()
        .fold(ToolResult::new("Convert"), |result, (name, value)| {
            result.add(name, value)
        }))
}

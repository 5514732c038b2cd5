//! ABI encode command for constructor arguments and function calldata

use alloy_dyn_abi::{DynSolType, DynSolValue, Specifier};
use alloy_json_abi::Param;
use anyhow::{Context, Result};
use thiserror::Error;

use super::ToolResult;
use crate::infrastructure::abi::{parse_interface, ParseError};

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("the ABI has no constructor but {0} arguments were given")]
    NoConstructor(usize),

    #[error("no function `{name}` taking {args} arguments")]
    NoFunction { name: String, args: usize },

    #[error("expected {expected} arguments, got {actual}")]
    ArgumentCount { expected: usize, actual: usize },

    #[error("argument {index} (`{value}`) is not a valid {ty}: {source}")]
    Argument {
        index: usize,
        value: String,
        ty: String,
        #[source]
        source: alloy_dyn_abi::Error,
    },
}

/// Coerce each string argument to its parameter type
fn coerce_args(params: &[Param], args: &[String]) -> Result<Vec<DynSolValue>, EncodeError> {
    if params.len() != args.len() {
        return Err(EncodeError::ArgumentCount {
            expected: params.len(),
            actual: args.len(),
        });
    }

    params
        .iter()
        .zip(args)
        .enumerate()
        .map(|(index, (param, arg))| {
            let argument_error = |source| EncodeError::Argument {
                index,
                value: arg.clone(),
                ty: param.selector_type().into_owned(),
                source,
            };
            let ty: DynSolType = param.resolve().map_err(argument_error)?;
            ty.coerce_str(arg.trim()).map_err(argument_error)
        })
        .collect()
}

/// ABI-encoded constructor arguments, ready to append to init code
pub fn encode_constructor_args(abi: &str, args: &[String]) -> Result<Vec<u8>, EncodeError> {
    let iface = parse_interface(abi)?;
    let Some(constructor) = iface.constructor() else {
        if args.is_empty() {
            return Ok(Vec::new());
        }
        return Err(EncodeError::NoConstructor(args.len()));
    };

    let values = coerce_args(&constructor.inputs, args)?;
    Ok(DynSolValue::Tuple(values).abi_encode_params())
}

/// Selector plus ABI-encoded arguments of the function `name`
///
/// Overloads are told apart by argument count; the first one that accepts
/// the arguments is used.
pub fn encode_call(abi: &str, name: &str, args: &[String]) -> Result<Vec<u8>, EncodeError> {
    let iface = parse_interface(abi)?;
    let mut last_error = None;

    for function in iface
        .functions()
        .filter(|f| f.name == name && f.inputs.len() == args.len())
    {
        match coerce_args(&function.inputs, args) {
            Ok(values) => {
                let mut calldata = function.selector().to_vec();
                calldata.extend(DynSolValue::Tuple(values).abi_encode_params());
                return Ok(calldata);
            }
            Err(err) => last_error = Some(err),
        }
    }

    Err(last_error.unwrap_or_else(|| EncodeError::NoFunction {
        name: name.to_string(),
        args: args.len(),
    }))
}

/// `encode <abi> [--function name] [args...]`
pub fn encode(abi: &str, function: Option<&str>, args: &[String]) -> Result<ToolResult> {
    match function {
        Some(name) => {
            let calldata = encode_call(abi, name, args)
                .with_context(|| format!("failed to encode call to `{}`", name))?;
            Ok(ToolResult::new("ABI Encode")
                .add("function", name)
                .add("calldata", format!("0x{}", hex::encode(calldata))))
        }
        None => {
            let encoded =
                encode_constructor_args(abi, args).context("failed to encode constructor arguments")?;
            Ok(ToolResult::new("ABI Encode")
                .add("constructor", format!("{} arguments", args.len()))
                .add("encoded", format!("0x{}", hex::encode(encoded))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_encode_constructor_args() {
        let encoded = encode_constructor_args(
            "'constructor(uint256 supply, address owner)'",
            &args(&["1000", "0x1234567890123456789012345678901234567890"]),
        )
        .unwrap();

        assert_eq!(
            hex::encode(encoded),
            "00000000000000000000000000000000000000000000000000000000000003e8\
             0000000000000000000000001234567890123456789012345678901234567890"
        );
    }

    #[test]
    fn test_encode_dynamic_constructor_args() {
        let encoded =
            encode_constructor_args("'constructor(string symbol, string name)'", &args(&["TKN", "Token"]))
                .unwrap();
        let decoded = DynSolType::Tuple(vec![DynSolType::String, DynSolType::String])
            .abi_decode_params(&encoded)
            .unwrap();
        assert_eq!(
            decoded,
            DynSolValue::Tuple(vec![
                DynSolValue::String("TKN".into()),
                DynSolValue::String("Token".into()),
            ])
        );
    }

    #[test]
    fn test_no_constructor() {
        assert!(encode_constructor_args("'function f()'", &[]).unwrap().is_empty());
        assert!(matches!(
            encode_constructor_args("'function f()'", &args(&["1"])),
            Err(EncodeError::NoConstructor(1))
        ));
    }

    #[test]
    fn test_argument_errors() {
        assert!(matches!(
            encode_constructor_args("'constructor(uint256 a)'", &args(&[])),
            Err(EncodeError::ArgumentCount { expected: 1, actual: 0 })
        ));
        assert!(matches!(
            encode_constructor_args("'constructor(address a)'", &args(&["nope"])),
            Err(EncodeError::Argument { index: 0, .. })
        ));
    }

    #[test]
    fn test_encode_call() {
        let calldata = encode_call(
            "'function transfer(address to, uint256 amount)'",
            "transfer",
            &args(&["0x1234567890123456789012345678901234567890", "1000"]),
        )
        .unwrap();

        assert_eq!(
            hex::encode(calldata),
            "a9059cbb\
             0000000000000000000000001234567890123456789012345678901234567890\
             00000000000000000000000000000000000000000000000000000000000003e8"
        );
    }

    #[test]
    fn test_encode_call_picks_overload_by_arity() {
        let abi = "'function safeTransferFrom(address from, address to, uint256 id)', 'function safeTransferFrom(address from, address to, uint256 id, bytes data)'";
        let a = "0x1111111111111111111111111111111111111111";
        let calldata = encode_call(abi, "safeTransferFrom", &args(&[a, a, "1", "0x00"])).unwrap();
        assert_eq!(hex::encode(&calldata[..4]), "b88d4fde");

        assert!(matches!(
            encode_call(abi, "safeTransferFrom", &args(&[a])),
            Err(EncodeError::NoFunction { .. })
        ));
    }
}

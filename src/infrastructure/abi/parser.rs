//! ABI text parsing
//!
//! Accepts either a JSON ABI array or a list of single-quoted human-readable
//! fragments such as `'function transfer(address to, uint256 amount)',`.
//! Fragments without a leading keyword get `event` when they mention
//! `indexed`, otherwise the caller's default keyword.

use alloy_json_abi::{
    Constructor, Error as ErrorItem, Event, Fallback, Function, Param, Receive, StateMutability,
};
use serde_json::Value;

use super::error::ParseError;
use crate::domain::abi::{Fragment, Interface};

const KEYWORDS: &[&str] = &[
    "function",
    "modifier",
    "event",
    "error",
    "constructor",
    "fallback",
    "receive",
];

/// Parse ABI text, treating bare fragments as functions
pub fn parse_interface(raw_abi: &str) -> Result<Interface, ParseError> {
    parse_interface_with(raw_abi, "function")
}

/// Parse ABI text, prefixing bare fragments with `default_keyword`
pub fn parse_interface_with(raw_abi: &str, default_keyword: &str) -> Result<Interface, ParseError> {
    let trimmed = raw_abi.trim();
    if looks_like_json(trimmed) {
        return parse_json_abi(trimmed, default_keyword);
    }

    split_human_readable(trimmed)
        .iter()
        .map(|text| parse_fragment(&with_keyword(&normalize_whitespace(text), default_keyword)))
        .collect()
}

fn looks_like_json(text: &str) -> bool {
    matches!(text.chars().next(), Some('[' | '{' | '"'))
}

fn parse_json_abi(text: &str, default_keyword: &str) -> Result<Interface, ParseError> {
    let Value::Array(items) = serde_json::from_str::<Value>(text)? else {
        return Err(ParseError::NotAnArray);
    };
    items
        .into_iter()
        .map(|item| parse_json_item(item, default_keyword))
        .collect()
}

fn parse_json_item(item: Value, default_keyword: &str) -> Result<Fragment, ParseError> {
    let mut item = match item {
        Value::String(text) => {
            return parse_fragment(&with_keyword(&normalize_whitespace(&text), default_keyword));
        }
        Value::Object(object) => object,
        other => {
            return Err(ParseError::UnsupportedFragment(other.to_string()));
        }
    };

    // Solidity ABI: a missing type means function
    let kind = item
        .entry("type")
        .or_insert_with(|| Value::String("function".into()))
        .as_str()
        .unwrap_or_default()
        .to_string();
    if kind == "event" {
        item.entry("anonymous").or_insert(Value::Bool(false));
    }
    let item = Value::Object(item);

    let fragment = match kind.as_str() {
        "function" => Fragment::Function(serde_json::from_value(item)?),
        "event" => Fragment::Event(serde_json::from_value(item)?),
        "error" => Fragment::Error(serde_json::from_value(item)?),
        "constructor" => Fragment::Constructor(serde_json::from_value(item)?),
        "fallback" => Fragment::Fallback(serde_json::from_value(item)?),
        "receive" => Fragment::Receive(serde_json::from_value(item)?),
        other => return Err(ParseError::UnsupportedFragment(other.to_string())),
    };
    Ok(fragment)
}

/// Split a `'a', 'b',` list into its fragments
fn split_human_readable(raw: &str) -> Vec<String> {
    raw.split("',")
        .map(|segment| segment.replace('\'', "").trim().to_string())
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Collapse whitespace runs and drop spaces the fragment grammar never needs
fn normalize_whitespace(fragment: &str) -> String {
    let collapsed = fragment.split_whitespace().collect::<Vec<_>>().join(" ");
    let collapsed = collapsed
        .replace("( ", "(")
        .replace(" )", ")")
        .replace(" ,", ",");

    match collapsed.find('(') {
        Some(open) => format!("{}{}", collapsed[..open].trim_end(), &collapsed[open..]),
        None => collapsed,
    }
}

fn leading_word(fragment: &str) -> &str {
    let end = fragment
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(fragment.len());
    &fragment[..end]
}

fn with_keyword(fragment: &str, default_keyword: &str) -> String {
    if KEYWORDS.contains(&leading_word(fragment)) {
        fragment.to_string()
    } else if fragment.contains("indexed") {
        format!("event {}", fragment)
    } else {
        format!("{} {}", default_keyword, fragment)
    }
}

/// Component names of one parameter, nested like its tuple type
#[derive(Debug, Clone, Default, PartialEq)]
struct ParamShape {
    name: String,
    components: Vec<ParamShape>,
}

/// Byte index of the `)` closing the `(` at `open`
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split a parameter list on its top-level commas
fn split_top_level(list: &str) -> Vec<&str> {
    if list.trim().is_empty() {
        return Vec::new();
    }
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in list.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(list[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(list[start..].trim());
    parts
}

/// One parameter with tuple component names removed
///
/// `tuple(uint256 a, address b)[] o` becomes `(uint256,address)[] o`; the
/// names `a` and `b` come back in the shape. The parameter's own name is
/// kept only when `keep_name` is set.
fn strip_param(param: &str, keep_name: bool) -> (String, ParamShape) {
    let param = param.trim();
    let tuple_body = match param.strip_prefix("tuple") {
        Some(rest) if rest.trim_start().starts_with('(') => Some(rest.trim_start()),
        _ => param.starts_with('(').then_some(param),
    };

    let (ty, components, tail) =
        match tuple_body.and_then(|body| matching_paren(body, 0).map(|close| (body, close))) {
            Some((body, close)) => {
                let (types, shapes): (Vec<String>, Vec<ParamShape>) = split_top_level(&body[1..close])
                    .into_iter()
                    .map(|component| strip_param(component, false))
                    .unzip();
                let after = &body[close + 1..];
                let suffix = after
                    .find(|c: char| !(c == '[' || c == ']' || c.is_ascii_digit()))
                    .unwrap_or(after.len());
                (
                    format!("({}){}", types.join(","), &after[..suffix]),
                    shapes,
                    after[suffix..].trim(),
                )
            }
            None => {
                let (ty, tail) = param.split_once(' ').unwrap_or((param, ""));
                (ty.to_string(), Vec::new(), tail.trim())
            }
        };

    let name = tail.split_whitespace().last().unwrap_or_default().to_string();
    let text = if keep_name && !tail.is_empty() {
        format!("{} {}", ty, tail)
    } else {
        ty
    };
    (text, ParamShape { name, components })
}

/// Rewrite every top-level parameter list of `text`, returning the rewritten
/// fragment and the shapes of each list in order (inputs, then outputs)
fn strip_component_names(text: &str) -> (String, Vec<Vec<ParamShape>>) {
    let mut out = String::with_capacity(text.len());
    let mut lists = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find('(') {
        out.push_str(&rest[..open]);
        let Some(close) = matching_paren(rest, open) else {
            // unbalanced, left for the fragment parser to report
            out.push_str(&rest[open..]);
            return (out, lists);
        };
        let (params, shapes): (Vec<String>, Vec<ParamShape>) = split_top_level(&rest[open + 1..close])
            .into_iter()
            .map(|param| strip_param(param, true))
            .unzip();
        out.push('(');
        out.push_str(&params.join(","));
        out.push(')');
        lists.push(shapes);
        rest = &rest[close + 1..];
    }
    out.push_str(rest);
    (out, lists)
}

fn name_components(components: &mut [Param], shapes: &[ParamShape]) {
    for (component, shape) in components.iter_mut().zip(shapes) {
        component.name = shape.name.clone();
        name_components(&mut component.components, &shape.components);
    }
}

fn name_params(params: &mut [Param], shapes: &[ParamShape]) {
    for (param, shape) in params.iter_mut().zip(shapes) {
        name_components(&mut param.components, &shape.components);
    }
}

fn parse_fragment(text: &str) -> Result<Fragment, ParseError> {
    let syntax = |message: String| ParseError::Syntax {
        fragment: text.to_string(),
        message,
    };
    let (stripped, lists) = strip_component_names(text);
    let inputs = lists.first().map(Vec::as_slice).unwrap_or_default();
    let outputs = lists.get(1).map(Vec::as_slice).unwrap_or_default();

    match leading_word(text) {
        "function" => Function::parse(&stripped)
            .map(|mut function| {
                name_params(&mut function.inputs, inputs);
                name_params(&mut function.outputs, outputs);
                Fragment::Function(function)
            })
            .map_err(|e| syntax(e.to_string())),
        "event" => Event::parse(&stripped)
            .map(|mut event| {
                for (param, shape) in event.inputs.iter_mut().zip(inputs) {
                    name_components(&mut param.components, &shape.components);
                }
                Fragment::Event(event)
            })
            .map_err(|e| syntax(e.to_string())),
        "error" => ErrorItem::parse(&stripped)
            .map(|mut error| {
                name_params(&mut error.inputs, inputs);
                Fragment::Error(error)
            })
            .map_err(|e| syntax(e.to_string())),
        "constructor" => Constructor::parse(&stripped)
            .map(|mut constructor| {
                name_params(&mut constructor.inputs, inputs);
                Fragment::Constructor(constructor)
            })
            .map_err(|e| syntax(e.to_string())),
        "fallback" => {
            let state_mutability = special_mutability(text, "fallback").map_err(syntax)?;
            Ok(Fragment::Fallback(Fallback { state_mutability }))
        }
        "receive" => {
            special_mutability(text, "receive").map_err(syntax)?;
            Ok(Fragment::Receive(Receive {
                state_mutability: StateMutability::Payable,
            }))
        }
        _ => Err(ParseError::UnsupportedFragment(text.to_string())),
    }
}

/// `fallback(...) external payable` and `receive() external payable`
fn special_mutability(text: &str, keyword: &str) -> Result<StateMutability, String> {
    let rest = text[keyword.len()..].trim_start();
    if !rest.starts_with('(') || !rest.contains(')') {
        return Err(format!("expected parameter list after `{}`", keyword));
    }
    let modifiers = rest.rsplit(')').next().unwrap_or_default();
    if modifiers.split_whitespace().any(|m| m == "payable") {
        Ok(StateMutability::Payable)
    } else {
        Ok(StateMutability::NonPayable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::FragmentKind;

    #[test]
    fn test_parse_json_abi() {
        let abi = r#"[
            {"type":"function","name":"transfer","inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],"outputs":[{"name":"","type":"bool"}],"stateMutability":"nonpayable"},
            {"type":"event","name":"Transfer","anonymous":false,"inputs":[{"name":"from","type":"address","indexed":true},{"name":"to","type":"address","indexed":true},{"name":"value","type":"uint256","indexed":false}]}
        ]"#;

        let iface = parse_interface(abi).unwrap();
        assert_eq!(iface.len(), 2);
        assert_eq!(iface.fragments()[0].kind(), FragmentKind::Function);
        assert_eq!(iface.fragments()[1].kind(), FragmentKind::Event);
        assert_eq!(iface.fragments()[0].signature(), "transfer(address,uint256)");
    }

    #[test]
    fn test_json_item_without_type_is_function() {
        let abi = r#"[{"name":"totalSupply","inputs":[],"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"}]"#;
        let iface = parse_interface(abi).unwrap();
        assert_eq!(iface.fragments()[0].signature(), "totalSupply()");
    }

    #[test]
    fn test_json_array_of_strings() {
        let abi = r#"["function approve(address spender, uint256 amount)", "Approval(address indexed owner, address indexed spender, uint256 value)"]"#;
        let iface = parse_interface(abi).unwrap();
        assert_eq!(iface.fragments()[0].kind(), FragmentKind::Function);
        assert_eq!(iface.fragments()[1].kind(), FragmentKind::Event);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = parse_interface(r#"[{"type":"function","name":"x""#).unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn test_human_readable_list() {
        let abi = "'function balanceOf(address owner) view returns (uint256)', 'event Transfer(address indexed from, address indexed to, uint256 value)', 'error Unauthorized(address caller)',";
        let iface = parse_interface(abi).unwrap();
        let kinds: Vec<FragmentKind> = iface.fragments().iter().map(|f| f.kind()).collect();
        assert_eq!(
            kinds,
            vec![FragmentKind::Function, FragmentKind::Event, FragmentKind::Error]
        );
    }

    #[test]
    fn test_missing_keyword_uses_default() {
        let iface = parse_interface("'transfer(address,uint256)'").unwrap();
        assert_eq!(iface.fragments()[0].kind(), FragmentKind::Function);

        let iface = parse_interface_with("Transfer(address,address,uint256)", "event").unwrap();
        assert_eq!(iface.fragments()[0].kind(), FragmentKind::Event);
    }

    #[test]
    fn test_missing_keyword_with_indexed_is_event() {
        let iface = parse_interface("'Deposit(address indexed dst, uint256 wad)'").unwrap();
        assert_eq!(iface.fragments()[0].kind(), FragmentKind::Event);
    }

    #[test]
    fn test_whitespace_noise_is_ignored() {
        let noisy = parse_interface("'  constructor (string symbol,  string name)   '").unwrap();
        let clean = parse_interface("'constructor(string symbol, string name)'").unwrap();
        assert_eq!(noisy, clean);
        assert_eq!(noisy.fragments()[0].kind(), FragmentKind::Constructor);
    }

    #[test]
    fn test_double_quoted_fragments_are_rejected() {
        assert!(parse_interface("\"constructor(string symbol, string name)\"").is_err());
        assert!(parse_interface("'constructor(string symbol, string name)'").is_ok());
    }

    #[test]
    fn test_fallback_and_receive() {
        let iface = parse_interface("'fallback() external payable', 'receive() external payable'").unwrap();
        assert_eq!(
            iface.fragments()[0],
            Fragment::Fallback(Fallback {
                state_mutability: StateMutability::Payable
            })
        );
        assert_eq!(iface.fragments()[1].kind(), FragmentKind::Receive);
    }

    #[test]
    fn test_modifier_is_unsupported() {
        let err = parse_interface("'modifier onlyOwner()'").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedFragment(_)));
    }

    #[test]
    fn test_bad_type_reports_syntax_error() {
        let err = parse_interface("'function f(uint256 x'").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn test_json_event_without_anonymous_key() {
        let abi = r#"[{"type":"event","name":"E","inputs":[{"name":"x","type":"uint256","indexed":true}]}]"#;
        let iface = parse_interface(abi).unwrap();
        let event = iface.events().next().unwrap();
        assert!(!event.anonymous);
        assert_eq!(iface.fragments()[0].signature(), "E(uint256)");
    }

    fn component_names(param: &Param) -> Vec<&str> {
        param.components.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_tuple_parameters_keep_component_names() {
        let iface = parse_interface(
            "'function fill((uint256 a, address b) o, bytes data)', 'function f(tuple(uint256 a, address b) t)'",
        )
        .unwrap();
        let functions: Vec<_> = iface.functions().collect();

        assert_eq!(functions[0].signature(), "fill((uint256,address),bytes)");
        assert_eq!(functions[0].inputs[0].name, "o");
        assert_eq!(functions[0].inputs[0].ty, "tuple");
        assert_eq!(component_names(&functions[0].inputs[0]), vec!["a", "b"]);
        assert_eq!(functions[0].inputs[1].name, "data");

        assert_eq!(functions[1].signature(), "f((uint256,address))");
        assert_eq!(component_names(&functions[1].inputs[0]), vec!["a", "b"]);
    }

    #[test]
    fn test_nested_tuple_arrays_and_outputs() {
        let iface = parse_interface(
            "'function settle((address maker, (uint256 amount, bool partial) fill)[] orders) returns ((uint256 id, bool ok) receipt)'",
        )
        .unwrap();
        let function = iface.functions().next().unwrap();

        assert_eq!(
            function.signature(),
            "settle((address,(uint256,bool))[])"
        );
        let orders = &function.inputs[0];
        assert_eq!(orders.name, "orders");
        assert_eq!(component_names(orders), vec!["maker", "fill"]);
        assert_eq!(component_names(&orders.components[1]), vec!["amount", "partial"]);
        assert_eq!(component_names(&function.outputs[0]), vec!["id", "ok"]);
    }

    #[test]
    fn test_event_tuple_components() {
        let iface = parse_interface("'event Filled(address indexed maker, (uint256 amount, address token) fill)'").unwrap();
        let event = iface.events().next().unwrap();
        assert!(event.inputs[0].indexed);
        assert_eq!(event.inputs[1].name, "fill");
        let names: Vec<&str> = event.inputs[1].components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["amount", "token"]);
    }

    #[test]
    fn test_empty_input_is_empty_interface() {
        assert!(parse_interface("   ").unwrap().is_empty());
    }
}

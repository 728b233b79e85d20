//! Built-in methods on arrays, strings and numbers
//!
//! Each method is returned as a native function bound to its receiver, so
//! `items.map` is an ordinary value that can be called later. Methods never
//! mutate the receiver.

use std::rc::Rc;

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::constants::MAX_STRING_LENGTH;
use crate::interpreter::ops::{
    check_array_length, check_string_length, same_value_zero, strict_equals,
};
use crate::parser::ast::SourceLocation;
use crate::value::Value;

/// Look up an array method bound to `items`
pub(crate) fn array_method(items: &Rc<Vec<Value>>, name: &str) -> Option<Value> {
    let items = items.clone();
    let method = match name {
        "map" => Value::native("map", move |interp, args, loc| {
            let callback = callback_arg(args, "map", loc)?;
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                out.push(call_with_item(interp, &callback, item, index, &items, loc)?);
            }
            Ok(Value::array(out))
        }),

        "filter" => Value::native("filter", move |interp, args, loc| {
            let callback = callback_arg(args, "filter", loc)?;
            let mut out = Vec::new();
            for (index, item) in items.iter().enumerate() {
                if call_with_item(interp, &callback, item, index, &items, loc)?.is_truthy() {
                    out.push(item.clone());
                }
            }
            Ok(Value::array(out))
        }),

        "find" => Value::native("find", move |interp, args, loc| {
            let callback = callback_arg(args, "find", loc)?;
            for (index, item) in items.iter().enumerate() {
                if call_with_item(interp, &callback, item, index, &items, loc)?.is_truthy() {
                    return Ok(item.clone());
                }
            }
            Ok(Value::Undefined)
        }),

        "some" => Value::native("some", move |interp, args, loc| {
            let callback = callback_arg(args, "some", loc)?;
            for (index, item) in items.iter().enumerate() {
                if call_with_item(interp, &callback, item, index, &items, loc)?.is_truthy() {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }),

        "every" => Value::native("every", move |interp, args, loc| {
            let callback = callback_arg(args, "every", loc)?;
            for (index, item) in items.iter().enumerate() {
                if !call_with_item(interp, &callback, item, index, &items, loc)?.is_truthy() {
                    return Ok(Value::Bool(false));
                }
            }
            Ok(Value::Bool(true))
        }),

        "join" => Value::native("join", move |_, args, loc| {
            let separator = match args.first() {
                None | Some(Value::Undefined) => ",".to_string(),
                Some(sep) => sep.to_display_string(),
            };
            let mut joined = String::new();
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    joined.push_str(&separator);
                }
                if !item.is_nullish() {
                    joined.push_str(&item.to_display_string());
                }
                check_string_length(joined.len(), loc)?;
            }
            Ok(Value::from(joined))
        }),

        "includes" => Value::native("includes", move |_, args, _| {
            let needle = args.first().cloned().unwrap_or_default();
            Ok(Value::Bool(
                items.iter().any(|item| same_value_zero(item, &needle)),
            ))
        }),

        "indexOf" => Value::native("indexOf", move |_, args, _| {
            let needle = args.first().cloned().unwrap_or_default();
            let position = items.iter().position(|item| strict_equals(item, &needle));
            Ok(Value::Number(position.map_or(-1.0, |i| i as f64)))
        }),

        "slice" => Value::native("slice", move |_, args, _| {
            let (start, end) = slice_bounds(args, items.len());
            Ok(Value::array(items[start..end].to_vec()))
        }),

        "concat" => Value::native("concat", move |_, args, loc| {
            let mut out = items.as_ref().clone();
            for arg in args {
                match arg {
                    Value::Array(more) => {
                        check_array_length(out.len() + more.len(), loc)?;
                        out.extend(more.iter().cloned());
                    }
                    other => out.push(other.clone()),
                }
            }
            check_array_length(out.len(), loc)?;
            Ok(Value::array(out))
        }),

        _ => return None,
    };
    Some(method)
}

/// Look up a string method bound to `s`
pub(crate) fn string_method(s: &Rc<str>, name: &str) -> Option<Value> {
    let s = s.clone();
    let method = match name {
        "toUpperCase" => Value::native("toUpperCase", move |_, _, _| Ok(Value::from(s.to_uppercase()))),

        "toLowerCase" => Value::native("toLowerCase", move |_, _, _| Ok(Value::from(s.to_lowercase()))),

        "trim" => Value::native("trim", move |_, _, _| Ok(Value::from(s.trim()))),

        "includes" => Value::native("includes", move |_, args, _| {
            Ok(Value::Bool(s.contains(string_arg(args, 0).as_str())))
        }),

        "startsWith" => Value::native("startsWith", move |_, args, _| {
            Ok(Value::Bool(s.starts_with(string_arg(args, 0).as_str())))
        }),

        "endsWith" => Value::native("endsWith", move |_, args, _| {
            Ok(Value::Bool(s.ends_with(string_arg(args, 0).as_str())))
        }),

        "split" => Value::native("split", move |_, args, loc| {
            let parts: Vec<Value> = match args.first() {
                None | Some(Value::Undefined) => vec![Value::String(s.clone())],
                Some(sep) => {
                    let sep = sep.to_display_string();
                    if sep.is_empty() {
                        s.chars().map(|c| Value::from(c.to_string())).collect()
                    } else {
                        s.split(sep.as_str()).map(Value::from).collect()
                    }
                }
            };
            check_array_length(parts.len(), loc)?;
            Ok(Value::array(parts))
        }),

        "slice" => Value::native("slice", move |_, args, _| {
            let chars: Vec<char> = s.chars().collect();
            let (start, end) = slice_bounds(args, chars.len());
            Ok(Value::from(chars[start..end].iter().collect::<String>()))
        }),

        "replace" => Value::native("replace", move |_, args, loc| {
            let pattern = string_arg(args, 0);
            let replacement = string_arg(args, 1);
            check_string_length(s.len() + replacement.len(), loc)?;
            Ok(Value::from(s.replacen(pattern.as_str(), &replacement, 1)))
        }),

        "padStart" => Value::native("padStart", move |_, args, loc| {
            let target = args.first().map_or(0.0, Value::to_number);
            if target > MAX_STRING_LENGTH as f64 {
                return Err(RuntimeError::LengthExceeded {
                    kind: "string",
                    limit: MAX_STRING_LENGTH,
                    location: loc,
                });
            }
            let target = if target.is_finite() && target > 0.0 { target as usize } else { 0 };
            let fill = match args.get(1) {
                None | Some(Value::Undefined) => " ".to_string(),
                Some(fill) => fill.to_display_string(),
            };
            let len = s.chars().count();
            if target <= len || fill.is_empty() {
                return Ok(Value::String(s.clone()));
            }
            let mut padded: String = fill.chars().cycle().take(target - len).collect();
            padded.push_str(&s);
            Ok(Value::from(padded))
        }),

        _ => return None,
    };
    Some(method)
}

/// Look up a number method bound to `n`
pub(crate) fn number_method(n: f64, name: &str) -> Option<Value> {
    let method = match name {
        "toFixed" => Value::native("toFixed", move |_, args, loc| {
            let digits = args.first().map_or(0.0, Value::to_number);
            if !(0.0..=100.0).contains(&digits) {
                return Err(RuntimeError::invalid_argument(
                    "toFixed",
                    "digits argument must be between 0 and 100",
                    loc,
                ));
            }
            if !n.is_finite() {
                return Ok(Value::from(Value::Number(n).to_display_string()));
            }
            Ok(Value::from(format!("{:.*}", digits as usize, n)))
        }),

        "toString" => Value::native("toString", move |_, _, _| {
            Ok(Value::from(Value::Number(n).to_display_string()))
        }),

        _ => return None,
    };
    Some(method)
}

fn callback_arg(args: &[Value], method: &str, loc: SourceLocation) -> Result<Value, RuntimeError> {
    match args.first() {
        Some(callback) if callback.is_callable() => Ok(callback.clone()),
        Some(other) => Err(RuntimeError::invalid_argument(
            method,
            format!("{} is not a function", other.to_display_string()),
            loc,
        )),
        None => Err(RuntimeError::invalid_argument(
            method,
            "undefined is not a function",
            loc,
        )),
    }
}

fn call_with_item(
    interp: &mut Interpreter,
    callback: &Value,
    item: &Value,
    index: usize,
    items: &Rc<Vec<Value>>,
    loc: SourceLocation,
) -> Result<Value, RuntimeError> {
    interp.call(
        callback,
        &[
            item.clone(),
            Value::Number(index as f64),
            Value::Array(items.clone()),
        ],
        loc,
    )
}

fn string_arg(args: &[Value], index: usize) -> String {
    args.get(index)
        .map(Value::to_display_string)
        .unwrap_or_else(|| "undefined".to_string())
}

/// Resolve `slice(start, end)` arguments, counting negatives from the end
fn slice_bounds(args: &[Value], len: usize) -> (usize, usize) {
    let resolve = |value: Option<&Value>, default: usize| -> usize {
        match value {
            None | Some(Value::Undefined) => default,
            Some(v) => {
                let n = v.to_number();
                if n.is_nan() {
                    0
                } else if n < 0.0 {
                    len.saturating_sub((-n) as usize)
                } else {
                    (n as usize).min(len)
                }
            }
        }
    };

    let start = resolve(args.first(), 0);
    let end = resolve(args.get(1), len);
    (start, end.max(start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_bounds() {
        assert_eq!(slice_bounds(&[], 5), (0, 5));
        assert_eq!(slice_bounds(&[Value::Number(-2.0)], 5), (3, 5));
        assert_eq!(slice_bounds(&[Value::Number(1.0), Value::Number(3.0)], 5), (1, 3));
        assert_eq!(slice_bounds(&[Value::Number(4.0), Value::Number(1.0)], 5), (4, 4));
        assert_eq!(slice_bounds(&[Value::Number(10.0)], 5), (5, 5));
    }

    #[test]
    fn test_unknown_methods_are_absent() {
        assert!(array_method(&Rc::new(Vec::new()), "push").is_none());
        assert!(string_method(&Rc::from("x"), "charCodeAt").is_none());
        assert!(number_method(1.0, "toPrecision").is_none());
    }
}

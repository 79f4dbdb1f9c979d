//! Conversions between Rhai values and native values.
//!
//! Arguments arrive as a slice of `Dynamic`. [`Args`] checks arity and kinds
//! before anything reaches the host, and the `*_to_dynamic` / `*_from_dynamic`
//! helpers convert results and documents. Failures are thrown into the
//! script with [`raise`].

use nuv_host::{Document, HostError, HostResult, Value};
use rhai::{Array, Dynamic, EvalAltResult, FnPtr, Map, Position, FLOAT, INT};
use std::collections::BTreeMap;

/// Result of a bridged call, as seen by Rhai.
pub type ScriptResult = Result<Dynamic, Box<EvalAltResult>>;

/// Throw `err` into the script as a catchable runtime error.
///
/// The thrown value is a string `"<Kind>: <message>"`.
pub fn raise(err: HostError, pos: Position) -> Box<EvalAltResult> {
    let message = format!("{}: {}", err.kind(), err);
    EvalAltResult::ErrorRuntime(Dynamic::from(message), pos).into()
}

/// Arguments of one bridged call.
pub struct Args<'a> {
    entry: &'static str,
    values: &'a [&'a mut Dynamic],
}

impl<'a> Args<'a> {
    /// Wrap the arguments passed to `entry`.
    pub fn new(entry: &'static str, values: &'a [&'a mut Dynamic]) -> Self {
        Self { entry, values }
    }

    /// Number of arguments passed.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the call had no arguments.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Require at least `n` arguments.
    pub fn at_least(&self, n: usize) -> HostResult<()> {
        if self.values.len() < n {
            return Err(self.arity_error(n));
        }
        Ok(())
    }

    /// Require exactly `n` arguments.
    pub fn exactly(&self, n: usize) -> HostResult<()> {
        if self.values.len() != n {
            return Err(self.arity_error(n));
        }
        Ok(())
    }

    /// Argument `idx` as a string. Characters are accepted as one-char strings.
    pub fn string(&self, idx: usize) -> HostResult<String> {
        let value = self.get(idx)?;
        if value.is_string() {
            return value
                .into_string()
                .map_err(|found| self.type_error(idx, "a string", found));
        }
        if value.is_char() {
            return value
                .as_char()
                .map(String::from)
                .map_err(|found| self.type_error(idx, "a string", found));
        }
        Err(self.type_error(idx, "a string", value.type_name()))
    }

    /// Argument `idx` rendered as command line text (see [`scalar_text`]).
    pub fn display(&self, idx: usize) -> HostResult<String> {
        let value = self.get(idx)?;
        scalar_text(&value).ok_or_else(|| self.type_error(idx, "a string", value.type_name()))
    }

    /// Argument `idx` as a function pointer.
    pub fn fn_ptr(&self, idx: usize) -> HostResult<FnPtr> {
        let value = self.get(idx)?;
        let type_name = value.type_name();
        value
            .try_cast::<FnPtr>()
            .ok_or_else(|| self.type_error(idx, "a function", type_name))
    }

    /// Argument `idx` as an object map.
    pub fn map(&self, idx: usize) -> HostResult<Map> {
        let value = self.get(idx)?;
        let type_name = value.type_name();
        value
            .try_cast::<Map>()
            .ok_or_else(|| self.type_error(idx, "an object", type_name))
    }

    /// Argument `idx` as an array, if it is one.
    pub fn array(&self, idx: usize) -> Option<Array> {
        self.get(idx).ok().and_then(|v| v.try_cast::<Array>())
    }

    fn get(&self, idx: usize) -> HostResult<Dynamic> {
        self.values
            .get(idx)
            .map(|v| v.flatten_clone())
            .ok_or_else(|| self.arity_error(idx + 1))
    }

    fn arity_error(&self, n: usize) -> HostError {
        let noun = if n == 1 { "argument" } else { "arguments" };
        HostError::Argument(format!(
            "{}() requires {} {}, got {}",
            self.entry,
            n,
            noun,
            self.values.len()
        ))
    }

    fn type_error(&self, idx: usize, expected: &str, found: &str) -> HostError {
        HostError::Argument(format!(
            "{}() requires {} as argument {}, got {}",
            self.entry,
            expected,
            idx + 1,
            found
        ))
    }
}

/// Text form of a string, character, number or boolean.
pub fn scalar_text(value: &Dynamic) -> Option<String> {
    if value.is_string() || value.is_char() || value.is_int() || value.is_float() || value.is_bool()
    {
        Some(value.to_string())
    } else {
        None
    }
}

/// Convert a list of names into a script array.
pub fn strings_to_dynamic(items: Vec<String>) -> Dynamic {
    Dynamic::from_array(items.into_iter().map(Dynamic::from).collect())
}

/// Convert a document into a script object map.
pub fn document_to_dynamic(doc: Document) -> Dynamic {
    Dynamic::from_map(mapping_to_map(doc))
}

fn mapping_to_map(mapping: BTreeMap<String, Value>) -> Map {
    mapping
        .into_iter()
        .map(|(key, value)| (key.into(), value_to_dynamic(value)))
        .collect()
}

fn value_to_dynamic(value: Value) -> Dynamic {
    match value {
        Value::Null => Dynamic::UNIT,
        Value::Bool(b) => Dynamic::from(b),
        Value::Int(i) => Dynamic::from(i as INT),
        Value::Float(f) => Dynamic::from(f as FLOAT),
        Value::String(s) => Dynamic::from(s),
        Value::Sequence(items) => {
            Dynamic::from_array(items.into_iter().map(value_to_dynamic).collect())
        }
        Value::Mapping(mapping) => Dynamic::from_map(mapping_to_map(mapping)),
    }
}

/// Convert a script object map into a document.
///
/// Values with no document equivalent (functions, custom types, ...) are
/// reported as encoding errors.
pub fn document_from_map(map: Map) -> HostResult<Document> {
    let mut doc = Document::new();
    for (key, value) in map {
        doc.insert(key.to_string(), value_from_dynamic(value)?);
    }
    Ok(doc)
}

fn value_from_dynamic(value: Dynamic) -> HostResult<Value> {
    let value = value.flatten();
    if value.is_unit() {
        return Ok(Value::Null);
    }
    if let Ok(b) = value.as_bool() {
        return Ok(Value::Bool(b));
    }
    if let Ok(i) = value.as_int() {
        return Ok(Value::Int(i as i64));
    }
    if let Ok(f) = value.as_float() {
        return Ok(Value::Float(f as f64));
    }
    if let Ok(c) = value.as_char() {
        return Ok(Value::String(c.to_string()));
    }
    if value.is_string() {
        return value
            .into_string()
            .map(Value::String)
            .map_err(|found| HostError::Encoding(format!("unsupported value: {found}")));
    }
    if value.is_array() {
        let items = value.cast::<Array>();
        return items
            .into_iter()
            .map(value_from_dynamic)
            .collect::<HostResult<_>>()
            .map(Value::Sequence);
    }
    if value.is_map() {
        return document_from_map(value.cast::<Map>()).map(Value::Mapping);
    }
    Err(HostError::Encoding(format!(
        "unsupported value of type {}",
        value.type_name()
    )))
}

/// Convert a callback's return value into the text appended by the scanner.
pub fn dynamic_to_text(value: Dynamic) -> String {
    let value = value.flatten();
    if value.is_string() {
        value.into_string().unwrap_or_default()
    } else {
        value.to_string()
    }
}

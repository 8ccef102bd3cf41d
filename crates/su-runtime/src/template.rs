//! `{{path}}` template resolution for schema props.

use std::sync::OnceLock;

use regex::Regex;
use su_core::{number_to_text, PropMap, SuValue};
use tracing::{debug, trace};

use crate::context::Context;
use crate::expr::evaluate;

fn single_reference_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^\{\{(\w+)\}\}$").expect("single reference regex must compile"))
}

fn reference_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\{\{([\w.]+)\}\}").expect("reference regex must compile"))
}

/// Resolves every prop of a node against `context`.
pub fn resolve_props(props: &PropMap, context: &Context) -> PropMap {
    props
        .iter()
        .map(|(name, raw)| (name.clone(), resolve(raw, context)))
        .collect()
}

/// Resolves one raw prop value. Never fails: unresolvable references fall
/// back to defaults or to the raw text.
///
/// Maps are resolved field by field; arrays and scalars pass through.
pub fn resolve(raw: &SuValue, context: &Context) -> SuValue {
    match raw {
        SuValue::String(text) => resolve_string(text, context),
        SuValue::Map(entries) => SuValue::Map(
            entries
                .iter()
                .map(|(name, value)| (name.clone(), resolve(value, context)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn resolve_string(raw: &str, context: &Context) -> SuValue {
    if !raw.contains("{{") {
        return SuValue::String(raw.to_string());
    }

    if let Some(captures) = single_reference_regex().captures(raw) {
        let name = &captures[1];
        return match context.get(name) {
            Some(value) if !value.is_null() => value.clone(),
            _ => missing_reference_default(name, raw),
        };
    }

    let mut substituted = String::with_capacity(raw.len());
    let mut replaced_any = false;
    let mut last_index = 0usize;
    for captures in reference_regex().captures_iter(raw) {
        let Some(full) = captures.get(0) else {
            continue;
        };
        substituted.push_str(&raw[last_index..full.start()]);
        match context.lookup_path(&captures[1]) {
            Some(value) => {
                substituted.push_str(&substitution_literal(&value));
                replaced_any = true;
            }
            None => substituted.push_str(full.as_str()),
        }
        last_index = full.end();
    }
    substituted.push_str(&raw[last_index..]);

    if !replaced_any {
        return SuValue::String(raw.to_string());
    }

    if has_conditional_operator(&substituted) {
        match evaluate(&substituted) {
            Ok(value) => return value,
            Err(error) => {
                debug!(%error, template = raw, "conditional template did not evaluate; using text")
            }
        }
    }

    SuValue::String(strip_quotes(&substituted))
}

fn missing_reference_default(name: &str, raw: &str) -> SuValue {
    if name.contains("input") || name.contains("Input") {
        return SuValue::String(String::new());
    }
    if name == "display" {
        return SuValue::String("0".to_string());
    }
    if name.contains("length") || name.contains("count") {
        return SuValue::Number(0.0);
    }
    trace!(name, "template reference not found in context");
    SuValue::String(raw.to_string())
}

fn substitution_literal(value: &SuValue) -> String {
    match value {
        SuValue::Bool(flag) => flag.to_string(),
        SuValue::Number(number) => number_to_text(*number),
        other => format!("\"{}\"", other.to_text()),
    }
}

fn has_conditional_operator(text: &str) -> bool {
    text.contains('?') || text.contains("==") || text.contains("!=")
}

fn strip_quotes(text: &str) -> String {
    text.replace('"', "")
}

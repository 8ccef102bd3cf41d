use su_core::SuValue;

pub(crate) fn parse_ref_path(path: &str) -> Vec<String> {
    path.split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Walks `path` below `root`. Maps are indexed by key, arrays by numeric
/// segment, and `length` reports the size of arrays and strings.
pub(crate) fn read_nested_path(root: &SuValue, path: &[String]) -> Option<SuValue> {
    let Some((head, rest)) = path.split_first() else {
        return Some(root.clone());
    };

    let next = match root {
        SuValue::Map(entries) => entries.get(head)?.clone(),
        SuValue::Array(values) if head == "length" => SuValue::from(values.len()),
        SuValue::Array(values) => values.get(head.parse::<usize>().ok()?)?.clone(),
        SuValue::String(value) if head == "length" => SuValue::from(value.chars().count()),
        _ => return None,
    };

    if !rest.is_empty() && next.is_null() {
        return None;
    }
    read_nested_path(&next, rest)
}

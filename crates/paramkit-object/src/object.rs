use serde_json::{Map, Value};

/// True for JSON objects; arrays and scalars are not objects.
pub fn is_object(value: &Value) -> bool {
    value.is_object()
}

/// Look up a dotted path such as `"user.profile.name"`.
///
/// Objects are walked by key and arrays by numeric index. Returns `None` as
/// soon as a segment is missing.
pub fn get<'v>(obj: &'v Value, path: &str) -> Option<&'v Value> {
    get_in(obj, path.split('.'))
}

/// [`get`] with explicit path segments.
pub fn get_in<'v, I, S>(obj: &'v Value, path: I) -> Option<&'v Value>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    path.into_iter().try_fold(obj, |anchor, segment| {
        let segment = segment.as_ref();
        match anchor {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    })
}

/// [`get`] falling back to `fallback` when the path is missing.
pub fn get_or<'v>(obj: &'v Value, path: &str, fallback: &'v Value) -> &'v Value {
    get(obj, path).unwrap_or(fallback)
}

/// Return a copy of `obj` with `value` stored at `path`.
///
/// Missing, null, or non-object intermediates are replaced by fresh objects.
/// An empty path returns `obj` unchanged.
pub fn update<I, S>(obj: &Value, path: I, value: Value) -> Value
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let segments: Vec<S> = path.into_iter().collect();
    update_segments(obj, &segments, value)
}

fn update_segments<S: AsRef<str>>(obj: &Value, path: &[S], value: Value) -> Value {
    let Some((key, rest)) = path.split_first() else {
        return obj.clone();
    };
    let key = key.as_ref();

    let mut map = obj.as_object().cloned().unwrap_or_default();
    let next = if rest.is_empty() {
        value
    } else {
        update_segments(map.get(key).unwrap_or(&Value::Null), rest, value)
    };
    map.insert(key.to_string(), next);
    Value::Object(map)
}

/// Deep-merge `sources` into `target`, left to right.
///
/// Object values merge recursively; anything else (including arrays)
/// overwrites. Sources that are not objects are skipped.
pub fn merge<'s, I>(target: &mut Map<String, Value>, sources: I)
where
    I: IntoIterator<Item = &'s Value>,
{
    for source in sources {
        if let Value::Object(source) = source {
            merge_map(target, source);
        }
    }
}

fn merge_map(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, source_value) in source {
        match source_value {
            Value::Object(nested) => {
                let slot = target
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !slot.is_object() {
                    *slot = Value::Object(Map::new());
                }
                if let Value::Object(slot) = slot {
                    merge_map(slot, nested);
                }
            }
            other => {
                target.insert(key.clone(), other.clone());
            }
        }
    }
}

/// Copy of `src` without null entries, recursing into nested objects.
pub fn prune(src: &Map<String, Value>) -> Map<String, Value> {
    src.iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let value = match value {
                Value::Object(nested) => Value::Object(prune(nested)),
                other => other.clone(),
            };
            (key.clone(), value)
        })
        .collect()
}

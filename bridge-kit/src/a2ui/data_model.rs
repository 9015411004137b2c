//! A2UI Data Model
//!
//! The DataModel is a per-surface store of literal values addressed by dotted paths.
//! Components bind to paths and re-read them on every render pass.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::message::{DataEntry, EntryValue};
use super::value::{DataValue, Literal};

/// A path-addressable store of literal values.
///
/// # Path Format
///
/// Paths are dot-separated segments. A `/` separator is accepted as an
/// equivalent of `.` and a leading `/` is ignored, so the following all
/// address the same entry:
///
/// - `form.firstName`
/// - `/form/firstName`
/// - `/form.firstName`
///
/// The empty path and `/` address the root, which never holds a value.
///
/// The store is flat: every written key is an independent entry, so writing
/// `form.firstName` never disturbs `form.lastName` or `form`.
///
/// # Example
///
/// ```rust
/// use bridge_kit::a2ui::{DataModel, Literal};
///
/// let mut model = DataModel::new();
/// model.set("user.name", Literal::from("Alice"));
/// model.set("/items/0/id", Literal::from(1.0));
///
/// assert_eq!(model.get_string("/user/name"), Some("Alice"));
/// assert_eq!(model.get_number("items.0.id"), Some(1.0));
/// assert_eq!(model.read("user.email"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataModel {
    entries: BTreeMap<String, Literal>,

    /// Version counter for change detection
    version: u64,
}

impl DataModel {
    /// Create a new empty data model
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current version number
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read the literal stored at `path`, or `None` if it was never written.
    pub fn read(&self, path: &str) -> Option<&Literal> {
        self.entries.get(normalize_path(path).as_ref())
    }

    /// Get a string value at the given path
    pub fn get_string(&self, path: &str) -> Option<&str> {
        self.read(path).and_then(Literal::as_str)
    }

    /// Get a number value at the given path
    pub fn get_number(&self, path: &str) -> Option<f64> {
        self.read(path).and_then(Literal::as_f64)
    }

    /// Get a boolean value at the given path
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.read(path).and_then(Literal::as_bool)
    }

    /// Write a single value. Returns the normalized key, or `None` for the root path.
    pub fn set(&mut self, path: &str, value: Literal) -> Option<String> {
        let key = normalize_path(path).into_owned();
        if key.is_empty() {
            log::warn!("[A2UI data model] Ignoring write to the root path");
            return None;
        }
        self.insert(key.clone(), value);
        Some(key)
    }

    /// Delete the value at the given path
    pub fn remove(&mut self, path: &str) -> Option<Literal> {
        let removed = self.entries.remove(normalize_path(path).as_ref());
        if removed.is_some() {
            self.version += 1;
        }
        removed
    }

    /// Iterate over `prefix` itself and every entry below it, in key order.
    pub fn entries_under<'a>(
        &'a self,
        prefix: &str,
    ) -> impl Iterator<Item = (&'a str, &'a Literal)> + 'a {
        let prefix = normalize_path(prefix).into_owned();
        self.entries
            .range(prefix.clone()..)
            .take_while({
                let prefix = prefix.clone();
                move |(key, _)| key.starts_with(prefix.as_str())
            })
            .filter(move |(key, _)| {
                prefix.is_empty() || key.len() == prefix.len() || key[prefix.len()..].starts_with('.')
            })
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Merge entries from a `dataModelUpdate` under the `prefix` path.
    ///
    /// Each entry is last-write-wins on its own key; keys not mentioned are
    /// left alone. Returns the keys that were written, in write order.
    pub fn merge(&mut self, prefix: &str, entries: &[DataEntry]) -> Vec<String> {
        let base = normalize_path(prefix).into_owned();
        let mut updated = Vec::new();
        for entry in entries {
            let key = join_path(&base, &entry.key);
            self.merge_value(key, &entry.value, &mut updated);
        }
        updated
    }

    fn merge_value(&mut self, key: String, value: &EntryValue, updated: &mut Vec<String>) {
        if key.is_empty() {
            log::warn!("[A2UI data model] Skipping entry without a key");
            return;
        }

        match value {
            EntryValue::Value(DataValue::Literal(literal)) => {
                self.insert(key.clone(), literal.clone());
                updated.push(key);
            }
            // Copied at merge time; later writes to the source do not propagate.
            EntryValue::Value(DataValue::Path(source)) => match self.read(source).cloned() {
                Some(literal) => {
                    self.insert(key.clone(), literal);
                    updated.push(key);
                }
                None => {
                    log::warn!(
                        "[A2UI data model] Entry '{}' references unknown path '{}', skipped",
                        key,
                        source
                    );
                }
            },
            EntryValue::Map(entries) => {
                for entry in entries {
                    let child = join_path(&key, &entry.key);
                    self.merge_value(child, &entry.value, updated);
                }
            }
            EntryValue::Array(items) => {
                // Arrays replace: a shorter array must not leave stale tail items.
                let stale: Vec<String> = self
                    .entries_under(&key)
                    .filter(|(k, _)| k.len() > key.len())
                    .map(|(k, _)| k.to_string())
                    .collect();
                for k in &stale {
                    self.discard(k);
                }

                let written = updated.len();
                for (index, item) in items.iter().enumerate() {
                    self.merge_value(format!("{key}.{index}"), item, updated);
                }
                let removed: Vec<String> = stale
                    .into_iter()
                    .filter(|k| !updated[written..].contains(k))
                    .collect();
                updated.extend(removed);
            }
        }
    }

    /// Nested JSON view of the store, for renderers and debugging.
    ///
    /// When both `a` and `a.b` are written, the nested entry wins in this view.
    pub fn to_json(&self) -> Value {
        let mut root = Map::new();
        for (key, literal) in &self.entries {
            let mut segments = key.split('.').peekable();
            let mut current = &mut root;
            while let Some(segment) = segments.next() {
                if segments.peek().is_none() {
                    if !matches!(current.get(segment), Some(Value::Object(_))) {
                        current.insert(segment.to_string(), literal.to_json());
                    }
                    break;
                }
                let slot = current
                    .entry(segment)
                    .or_insert_with(|| Value::Object(Map::new()));
                if !slot.is_object() {
                    *slot = Value::Object(Map::new());
                }
                match slot {
                    Value::Object(next) => current = next,
                    _ => break,
                }
            }
        }
        Value::Object(root)
    }

    fn insert(&mut self, key: String, value: Literal) {
        self.entries.insert(key, value);
        self.version += 1;
    }

    fn discard(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.version += 1;
        }
    }
}

/// Normalize a path to its canonical dotted form.
///
/// `/` separators become `.`, and empty segments (leading, trailing or
/// doubled separators) are dropped.
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    let canonical = !path.is_empty()
        && !path.contains('/')
        && !path.starts_with('.')
        && !path.ends_with('.')
        && !path.contains("..");
    if canonical {
        return Cow::Borrowed(path);
    }

    Cow::Owned(
        path.split(['.', '/'])
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("."),
    )
}

/// Join a normalized base path with a relative key.
fn join_path(base: &str, key: &str) -> String {
    let key = normalize_path(key);
    match (base.is_empty(), key.is_empty()) {
        (true, _) => key.into_owned(),
        (false, true) => base.to_string(),
        (false, false) => format!("{base}.{key}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn entries(json: Value) -> Vec<DataEntry> {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_get_set_basic() {
        let mut model = DataModel::new();

        model.set("name", "Alice".into());
        assert_eq!(model.get_string("name"), Some("Alice"));

        model.set("count", 42.0.into());
        assert_eq!(model.get_number("count"), Some(42.0));

        model.set("enabled", true.into());
        assert_eq!(model.get_bool("enabled"), Some(true));
    }

    #[test]
    fn test_slash_and_dot_paths_are_equivalent() {
        let mut model = DataModel::new();

        model.set("/user/name", "Alice".into());
        assert_eq!(model.get_string("user.name"), Some("Alice"));
        assert_eq!(model.get_string("/user.name"), Some("Alice"));
        assert_eq!(normalize_path("//a//b/"), "a.b");
    }

    #[test]
    fn test_root_write_is_ignored() {
        let mut model = DataModel::new();
        assert_eq!(model.set("/", "x".into()), None);
        assert!(model.is_empty());
    }

    #[test]
    fn test_merge_with_prefix() {
        let mut model = DataModel::new();

        let updated = model.merge(
            "/form",
            &entries(json!([
                {"key": "firstName", "value": {"literalString": "John"}},
                {"key": "age", "valueNumber": 30}
            ])),
        );

        assert_eq!(updated, vec!["form.firstName", "form.age"]);
        assert_eq!(model.get_string("form.firstName"), Some("John"));
        assert_eq!(model.get_number("form.age"), Some(30.0));
    }

    #[test]
    fn test_merge_dotted_keys_at_root() {
        let mut model = DataModel::new();

        model.merge(
            "/",
            &entries(json!([
                {"key": "form.firstName", "value": {"valueString": "John"}},
                {"key": "form.lastName", "value": {"valueString": "Doe"}}
            ])),
        );

        assert_eq!(model.get_string("form.firstName"), Some("John"));
        assert_eq!(model.get_string("form.lastName"), Some("Doe"));
    }

    #[test]
    fn test_merge_nested_map_and_array() {
        let mut model = DataModel::new();

        model.merge(
            "",
            &entries(json!([
                {"key": "user", "valueMap": [
                    {"key": "name", "valueString": "Alice"},
                    {"key": "admin", "valueBoolean": true}
                ]},
                {"key": "tags", "valueArray": [
                    {"valueString": "a"},
                    {"valueString": "b"}
                ]}
            ])),
        );

        assert_eq!(model.get_string("user.name"), Some("Alice"));
        assert_eq!(model.get_bool("user.admin"), Some(true));
        assert_eq!(model.get_string("tags.1"), Some("b"));
    }

    #[test]
    fn test_array_merge_replaces_tail() {
        let mut model = DataModel::new();
        let three = entries(json!([{"key": "tags", "valueArray": ["a", "b", "c"]}]));
        let one = entries(json!([{"key": "tags", "valueArray": ["z"]}]));

        model.merge("", &three);
        model.merge("", &one);

        assert_eq!(model.get_string("tags.0"), Some("z"));
        assert_eq!(model.read("tags.1"), None);
        assert_eq!(model.read("tags.2"), None);
    }

    #[test]
    fn test_emptied_array_reports_removed_keys() {
        let mut model = DataModel::new();
        model.merge("", &entries(json!([{"key": "tags", "valueArray": ["a", "b", "c"]}])));
        let before = model.version();

        let updated = model.merge("", &entries(json!([{"key": "tags", "valueArray": []}])));

        assert_eq!(updated, vec!["tags.0", "tags.1", "tags.2"]);
        assert!(model.version() > before);
        assert_eq!(model.read("tags.0"), None);

        let updated = model.merge("", &entries(json!([{"key": "tags", "valueArray": ["z", "y"]}])));
        assert_eq!(updated, vec!["tags.0", "tags.1"]);
    }

    #[test]
    fn test_merge_path_value_copies() {
        let mut model = DataModel::new();
        model.set("source", "v1".into());

        model.merge("", &entries(json!([{"key": "copy", "value": {"path": "source"}}])));
        model.set("source", "v2".into());

        assert_eq!(model.get_string("copy"), Some("v1"));
    }

    #[test]
    fn test_entries_under() {
        let mut model = DataModel::new();
        model.set("form.a", "1".into());
        model.set("form.b", "2".into());
        model.set("formal", "x".into());
        model.set("other", "y".into());

        let keys: Vec<&str> = model.entries_under("form").map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["form.a", "form.b"]);

        assert_eq!(model.entries_under("/").count(), 4);
    }

    #[test]
    fn test_to_json() {
        let mut model = DataModel::new();
        model.set("user.name", "Alice".into());
        model.set("user.age", 30.0.into());
        model.set("flag", true.into());

        assert_eq!(
            model.to_json(),
            json!({"user": {"name": "Alice", "age": 30.0}, "flag": true})
        );
    }

    #[test]
    fn test_delete() {
        let mut model = DataModel::new();

        model.set("name", "Alice".into());
        assert!(model.read("name").is_some());

        model.remove("name");
        assert!(model.read("name").is_none());
    }

    #[test]
    fn test_version() {
        let mut model = DataModel::new();

        let v0 = model.version();
        model.set("name", "Alice".into());
        let v1 = model.version();

        assert!(v1 > v0);
    }

    proptest! {
        #[test]
        fn last_write_wins_and_siblings_untouched(
            writes in proptest::collection::vec((0usize..3, -100.0f64..100.0), 1..20),
        ) {
            let keys = ["a.b", "a.c", "a"];
            let mut model = DataModel::new();
            let mut expected: [Option<f64>; 3] = [None; 3];

            for (index, value) in writes {
                model.set(keys[index], Literal::Number(value));
                expected[index] = Some(value);
            }

            for (index, key) in keys.iter().enumerate() {
                prop_assert_eq!(model.get_number(key), expected[index]);
            }
        }
    }
}

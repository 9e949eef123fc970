use serde::Serialize;
use serde_json::{Map, Value};

/// The data conditions are evaluated against: a JSON value, normally an
/// object, addressed with dot-separated field paths like `"github.ref_name"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Context {
    root: Value,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }
}

impl Context {
    /// Create an empty object context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value at a dot-separated path. Creates intermediate objects as
    /// needed, replacing any non-object value standing in the way.
    #[must_use]
    pub fn set(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.insert(path, value.into());
        self
    }

    /// Insert a value at a dot-separated path (mutable reference version).
    pub fn insert(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };
        let mut current = &mut self.root;
        for segment in parents {
            current = ensure_object(current)
                .entry((*segment).to_owned())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        ensure_object(current).insert((*last).to_owned(), value);
    }

    /// Resolve a dot-separated path.
    ///
    /// Every step must land on a JSON object; stepping into a scalar, `null`
    /// or an array yields `None`, as does a missing key. A present `null`
    /// at the end of the path yields `Some(&Value::Null)`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.root, |current, segment| current.as_object()?.get(segment))
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.root
    }
}

impl From<Value> for Context {
    fn from(root: Value) -> Self {
        Self { root }
    }
}

impl From<Map<String, Value>> for Context {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            root: Value::Object(map),
        }
    }
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}

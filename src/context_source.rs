//! Assembling an evaluation [`Context`] from the process environment.
//!
//! The context always has an `env` object holding every variable. When running
//! under GitHub Actions (`GITHUB_ACTIONS` is set) it also gets a `github`
//! object with the common run fields and, if `GITHUB_EVENT_PATH` points at a
//! readable JSON file, the parsed webhook payload under `event`.

use std::path::Path;

use log::debug;
use serde_json::{Map, Value};

use crate::source::read_json_file;
use crate::Context;

/// `github.*` keys and the variables they are read from.
pub const GITHUB_FIELDS: [(&str, &str); 10] = [
    ("ref", "GITHUB_REF"),
    ("ref_name", "GITHUB_REF_NAME"),
    ("event_name", "GITHUB_EVENT_NAME"),
    ("repository", "GITHUB_REPOSITORY"),
    ("actor", "GITHUB_ACTOR"),
    ("sha", "GITHUB_SHA"),
    ("run_number", "GITHUB_RUN_NUMBER"),
    ("run_id", "GITHUB_RUN_ID"),
    ("workflow", "GITHUB_WORKFLOW"),
    ("job", "GITHUB_JOB"),
];

/// Build a context from the current process environment. Variables whose
/// name or value is not valid UTF-8 are skipped.
#[must_use]
pub fn from_env() -> Context {
    from_vars(
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
    )
}

/// Build a context from an explicit set of variables.
#[must_use]
pub fn from_vars<I, K, V>(vars: I) -> Context
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let env: Map<String, Value> = vars
        .into_iter()
        .map(|(k, v)| (k.into(), Value::String(v.into())))
        .collect();

    let mut root = Map::new();
    if is_set(&env, "GITHUB_ACTIONS") {
        root.insert("github".to_owned(), Value::Object(github_fields(&env)));

        if let Some(path) = env
            .get("GITHUB_EVENT_PATH")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
        {
            match read_json_file(Path::new(path)) {
                Ok(event) => {
                    root.insert("event".to_owned(), event);
                }
                Err(e) => debug!("Failed to parse GitHub event data: {e}"),
            }
        }
    }

    debug!("context has {} environment variables", env.len());
    root.insert("env".to_owned(), Value::Object(env));
    Context::from(root)
}

fn is_set(env: &Map<String, Value>, name: &str) -> bool {
    env.get(name)
        .and_then(Value::as_str)
        .is_some_and(|v| !v.is_empty())
}

fn github_fields(env: &Map<String, Value>) -> Map<String, Value> {
    GITHUB_FIELDS
        .iter()
        .map(|(key, var)| {
            let value = env.get(*var).cloned().unwrap_or_else(|| Value::from(""));
            ((*key).to_owned(), value)
        })
        .collect()
}

use crate::db::locate::DERIVED_MARKER;
use color_eyre::eyre::{self, WrapErr};
use color_eyre::Report;
use serde_json::{Map, Number, Value};
use std::path::{Path, PathBuf};

/// Loads result documents into a nested `serde_json::Value`.
#[derive(Debug, Clone, Copy)]
pub struct DocumentLoader {
    write_derived: bool,
}

impl DocumentLoader {
    pub fn new(write_derived: bool) -> Self {
        Self { write_derived }
    }

    /// Parses the document at `path`.
    ///
    /// Unless disabled, the parsed document is also written as JSON to
    /// `derived_path(path)`, overwriting whatever is there. The derived file is
    /// never read back.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Value, Report> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("read document {}", path.display()))?;
        let document = Self::parse(&source)
            .wrap_err_with(|| format!("parse document {}", path.display()))?;

        if self.write_derived {
            let derived = derived_path(path);
            // map keys are sorted, so the output only depends on the source
            let bytes = serde_json::to_vec(&document)
                .wrap_err("serialize derived document")?;
            std::fs::write(&derived, bytes).wrap_err_with(|| {
                format!("write derived document {}", derived.display())
            })?;
            tracing::debug!(
                "loaded {} (derived {})",
                path.display(),
                derived.display()
            );
        } else {
            tracing::debug!("loaded {}", path.display());
        }
        Ok(document)
    }

    /// Parses a YAML document. Mapping keys are turned into strings, so that
    /// `50: 1.2` is found under `"50"`.
    pub fn parse(source: &str) -> Result<Value, Report> {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(source).wrap_err("malformed yaml")?;
        to_json(yaml)
    }
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Path of the derived copy of the document at `path`: same name plus
/// `.json`.
pub fn derived_path(path: &Path) -> PathBuf {
    let mut derived = path.as_os_str().to_owned();
    derived.push(DERIVED_MARKER);
    PathBuf::from(derived)
}

fn to_json(yaml: serde_yaml::Value) -> Result<Value, Report> {
    let json = match yaml {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => number_to_json(&n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => Value::Array(
            seq.into_iter()
                .map(to_json)
                .collect::<Result<Vec<_>, Report>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(key_to_string(key)?, to_json(value)?);
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => to_json(tagged.value)?,
    };
    Ok(json)
}

fn number_to_json(n: &serde_yaml::Number) -> Value {
    if let Some(n) = n.as_u64() {
        Value::from(n)
    } else if let Some(n) = n.as_i64() {
        Value::from(n)
    } else {
        // json has no representation for nan and infinities; keep them as
        // strings that still parse as `f64`
        match n.as_f64() {
            Some(f) => Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(non_finite(f))),
            None => Value::Null,
        }
    }
}

fn non_finite(f: f64) -> String {
    let s = if f.is_nan() {
        "NaN"
    } else if f.is_sign_positive() {
        "Infinity"
    } else {
        "-Infinity"
    };
    String::from(s)
}

fn key_to_string(key: serde_yaml::Value) -> Result<String, Report> {
    let key = match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::from("null"),
        serde_yaml::Value::Tagged(tagged) => key_to_string(tagged.value)?,
        key @ (serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_)) => {
            eyre::bail!("unsupported mapping key {:?}", key)
        }
    };
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    const DOCUMENT: &str = "\
PAYMENT:
  tps: 1520.5
  all_latency:
    50: 12.5
    99: 40
    99.9: 51.25
  name: payment
";

    #[test]
    fn parse_normalizes_keys() {
        let document = DocumentLoader::parse(DOCUMENT).unwrap();
        assert_eq!(
            document,
            json!({
                "PAYMENT": {
                    "tps": 1520.5,
                    "all_latency": { "50": 12.5, "99": 40, "99.9": 51.25 },
                    "name": "payment",
                }
            })
        );
    }

    #[test]
    fn parse_non_finite() {
        let document =
            DocumentLoader::parse("a: .inf\nb: -.inf\nc: .nan\n").unwrap();
        assert_eq!(
            document,
            json!({ "a": "Infinity", "b": "-Infinity", "c": "NaN" })
        );
        let parsed: Vec<f64> = ["a", "b", "c"]
            .iter()
            .map(|key| document[*key].as_str().unwrap().parse().unwrap())
            .collect();
        assert_eq!(parsed[0], f64::INFINITY);
        assert_eq!(parsed[1], f64::NEG_INFINITY);
        assert!(parsed[2].is_nan());
    }

    #[test]
    fn parse_malformed() {
        assert!(DocumentLoader::parse("a: [1, 2").is_err());
        assert!(DocumentLoader::parse("? [1, 2]\n: x\n").is_err());
    }

    #[test]
    fn derived_path_appends_suffix() {
        assert_eq!(
            derived_path(Path::new("/tmp/results_3_20/bench.yml")),
            PathBuf::from("/tmp/results_3_20/bench.yml.json")
        );
    }

    #[test]
    fn load_writes_derived() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bench.yml");
        fs::write(&path, DOCUMENT).unwrap();

        let document = DocumentLoader::default().load(&path).unwrap();
        let derived: Value = serde_json::from_slice(
            &fs::read(derived_path(&path)).unwrap(),
        )
        .unwrap();
        assert_eq!(document, derived);
    }

    #[test]
    fn load_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bench.yml");
        fs::write(&path, DOCUMENT).unwrap();
        let loader = DocumentLoader::default();

        loader.load(&path).unwrap();
        let first = fs::read(derived_path(&path)).unwrap();
        loader.load(&path).unwrap();
        let second = fs::read(derived_path(&path)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn load_overwrites_stale_derived() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bench.yml");
        fs::write(&path, DOCUMENT).unwrap();
        fs::write(derived_path(&path), "{\"stale\": true}").unwrap();

        let document = DocumentLoader::default().load(&path).unwrap();
        assert!(document.get("stale").is_none());
        let derived: Value = serde_json::from_slice(
            &fs::read(derived_path(&path)).unwrap(),
        )
        .unwrap();
        assert_eq!(document, derived);
    }

    #[test]
    fn load_without_derived() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bench.yml");
        fs::write(&path, DOCUMENT).unwrap();

        DocumentLoader::new(false).load(&path).unwrap();
        assert!(!derived_path(&path).exists());
    }
}

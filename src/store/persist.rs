//! YAML persistence for [`MappingStore`].
//!
//! ```yaml
//! mappings:
//!   DenseBase: TODO
//!   Matrix<double,3,3>: !explicit Rot3
//!   Matrix<double,4,4>: EC_Matrix4d
//! ```
//!
//! Curated names carry the `!explicit` tag. An untagged name is derived when
//! it equals the namer's output and explicit otherwise, so hand edits need
//! no tag. A bare top-level mapping (no `mappings:` key) is accepted on load.
//! Writes go to a temporary file in the target directory which is then
//! renamed over the target, so a reader sees either the old or the new
//! document, never a partial one.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Value};

use super::{Binding, MappingEntry, MappingStore, Provenance};
use crate::base::constants::{EXPLICIT_TAG, MAPPINGS_KEY};
use crate::error::{PorterError, Result};
use crate::spec::{CanonicalSpec, SymbolNamer};

/// One persisted value: the stored text and whether it was tagged explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedBinding {
    pub text: String,
    pub explicit: bool,
}

impl PersistedBinding {
    fn to_value(&self) -> Value {
        let text = Value::String(self.text.clone());
        if self.explicit {
            Value::Tagged(Box::new(TaggedValue {
                tag: Tag::new(EXPLICIT_TAG),
                value: text,
            }))
        } else {
            text
        }
    }
}

/// On-disk shape of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingDocument {
    pub mappings: BTreeMap<String, PersistedBinding>,
}

impl MappingDocument {
    pub fn from_store(store: &MappingStore) -> Self {
        Self {
            mappings: store
                .iter()
                .map(|(spec, entry)| {
                    let value = PersistedBinding {
                        text: entry.binding.as_persisted().to_string(),
                        explicit: entry.provenance == Provenance::Explicit && !entry.is_pending(),
                    };
                    (spec.as_str().to_string(), value)
                })
                .collect(),
        }
    }

    /// Parse YAML text. `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_yaml::from_str(text).map_err(|source| PorterError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;

        let table = match value {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(mut map) => match map.remove(MAPPINGS_KEY) {
                Some(Value::Null) => return Ok(Self::default()),
                Some(Value::Mapping(inner)) => inner,
                Some(_) => {
                    return Err(PorterError::invalid_mapping(
                        path,
                        format!("`{MAPPINGS_KEY}` must be a mapping"),
                    ));
                }
                None => map,
            },
            _ => {
                return Err(PorterError::invalid_mapping(
                    path,
                    "top level must be a mapping",
                ));
            }
        };

        let mut mappings = BTreeMap::new();
        for (key, value) in table {
            let key = scalar_text(&key).ok_or_else(|| {
                PorterError::invalid_mapping(path, format!("non-scalar key {key:?}"))
            })?;
            let (value, explicit) = match value {
                Value::Tagged(tagged) if tagged.tag == Tag::new(EXPLICIT_TAG) => {
                    (tagged.value, true)
                }
                Value::Tagged(tagged) => {
                    return Err(PorterError::invalid_mapping(
                        path,
                        format!("unknown tag {} for `{key}`", tagged.tag),
                    ));
                }
                value => (value, false),
            };
            let text = scalar_text(&value).ok_or_else(|| {
                PorterError::invalid_mapping(path, format!("non-scalar value for `{key}`"))
            })?;
            mappings.insert(key, PersistedBinding { text, explicit });
        }

        Ok(Self { mappings })
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        let table: Mapping = self
            .mappings
            .iter()
            .map(|(key, value)| (Value::String(key.clone()), value.to_value()))
            .collect();
        let mut document = Mapping::new();
        document.insert(Value::String(MAPPINGS_KEY.to_string()), Value::Mapping(table));
        serde_yaml::to_string(&document)
    }

    /// Rebuild a store, normalizing keys and recovering provenance.
    pub fn into_store(self, namer: &SymbolNamer) -> MappingStore {
        self.mappings
            .into_iter()
            .map(|(key, value)| {
                let spec = CanonicalSpec::new(&key);
                let binding = Binding::from_persisted(&value.text);
                let entry = if value.explicit {
                    MappingEntry::curated(binding)
                } else {
                    MappingEntry::classify(&spec, binding, namer)
                };
                (spec, entry)
            })
            .collect()
    }
}

/// Scalars as text; `null` reads as an empty (pending) value.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl MappingStore {
    /// Load from `path`; a missing file is an empty store.
    pub fn load(path: &Path, namer: &SymbolNamer) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No mapping at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(err) => return Err(PorterError::read(path, err)),
        };

        let store = MappingDocument::parse(&text, path)?.into_store(namer);
        tracing::debug!("Loaded {} mapping(s) from {}", store.len(), path.display());
        Ok(store)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        MappingDocument::from_store(self).to_yaml()
    }

    /// Atomically replace the document at `path`, creating parent
    /// directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = self.to_yaml().map_err(|source| PorterError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;

        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| PorterError::write(dir, e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| PorterError::write(dir, e))?;
        tmp.write_all(text.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| PorterError::write(path, e))?;
        tmp.persist(path)
            .map_err(|e| PorterError::write(path, e.error))?;

        tracing::trace!("Saved {} mapping(s) to {}", self.len(), path.display());
        Ok(())
    }
}

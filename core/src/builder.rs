//! Validated construction helpers shared by every builder.
//!
//! # Design
//! Builders accumulate fields in `Option` slots and are finalized exactly
//! once. `build()` first consults the `SingleUse` guard, then converts each
//! required slot with `require` in declaration order, so the first missing
//! field is the one reported. Map and list slots stay `None` until the first
//! entry is added, which keeps "never set" distinct from "set to empty".

use std::collections::BTreeMap;

use crate::error::BuildError;

/// Guard that lets a builder be finalized only once.
///
/// Copying a builder yields a fresh guard; use `Default` for that.
#[derive(Debug, Default)]
pub struct SingleUse {
    used: bool,
}

impl SingleUse {
    /// Mark the builder as finalized, failing if it already was.
    pub fn check(&mut self, type_name: &'static str) -> Result<(), BuildError> {
        if self.used {
            return Err(BuildError::BuilderReused { type_name });
        }
        self.used = true;
        Ok(())
    }
}

/// Unwrap a required slot or report it as missing.
pub fn require<T>(
    slot: Option<T>,
    type_name: &'static str,
    field: &'static str,
) -> Result<T, BuildError> {
    slot.ok_or(BuildError::MissingRequiredField { type_name, field })
}

/// Insert one entry into a map slot. A duplicate key replaces the old value.
pub fn map_put<V>(slot: &mut Option<BTreeMap<String, V>>, key: impl Into<String>, value: V) {
    slot.get_or_insert_with(BTreeMap::new).insert(key.into(), value);
}

/// Merge all entries of `map` into a map slot. Duplicate keys are replaced.
pub fn map_put_all<V>(slot: &mut Option<BTreeMap<String, V>>, map: BTreeMap<String, V>) {
    slot.get_or_insert_with(BTreeMap::new).extend(map);
}

/// Append one value to a list slot.
pub fn vec_add<V>(slot: &mut Option<Vec<V>>, value: V) {
    slot.get_or_insert_with(Vec::new).push(value);
}

/// Append all `values` to a list slot.
pub fn vec_add_all<V>(slot: &mut Option<Vec<V>>, values: impl IntoIterator<Item = V>) {
    slot.get_or_insert_with(Vec::new).extend(values);
}

//! Interface index to name resolution.
//!
//! Records carry only the kernel interface index; the collector maps it to a
//! display name through this table.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation;

/// What to report for an index missing from the table.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceFallback {
    /// The decimal index itself, e.g. `"7"`.
    #[default]
    Index,
    /// The literal `"unknown"`.
    Unknown,
}

/// One static index to name mapping.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct InterfaceName {
    pub index: u32,

    #[validate(custom(function = validation::validate_interface))]
    pub name: String,
}

#[derive(Default, Debug, Serialize, Deserialize, Validate, Clone)]
pub struct InterfaceConfig {
    /// Static index to name table.
    #[validate(nested)]
    #[serde(default)]
    pub names: Vec<InterfaceName>,

    #[serde(default)]
    pub fallback: InterfaceFallback,
}

impl InterfaceConfig {
    pub fn lookup(&self, index: u32) -> Option<&str> {
        self.names
            .iter()
            .find(|entry| entry.index == index)
            .map(|entry| entry.name.as_str())
    }

    /// Name for `index`, falling back as configured.
    pub fn name_for(&self, index: u32) -> String {
        match (self.lookup(index), self.fallback) {
            (Some(name), _) => name.to_string(),
            (None, InterfaceFallback::Index) => index.to_string(),
            (None, InterfaceFallback::Unknown) => "unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(fallback: InterfaceFallback) -> InterfaceConfig {
        InterfaceConfig {
            names: vec![
                InterfaceName {
                    index: 1,
                    name: "lo".into(),
                },
                InterfaceName {
                    index: 4,
                    name: "br_ex".into(),
                },
            ],
            fallback,
        }
    }

    #[test]
    fn name_lookup_and_fallback() {
        let by_index = table(InterfaceFallback::Index);
        assert_eq!(by_index.name_for(4), "br_ex");
        assert_eq!(by_index.name_for(9), "9");

        let unknown = table(InterfaceFallback::Unknown);
        assert_eq!(unknown.name_for(1), "lo");
        assert_eq!(unknown.name_for(9), "unknown");
    }

    #[test]
    fn names_are_validated() {
        assert!(table(InterfaceFallback::Index).validate().is_ok());
        let mut bad = table(InterfaceFallback::Index);
        bad.names.push(InterfaceName {
            index: 5,
            name: "way-too-long-interface-name".into(),
        });
        assert!(bad.validate().is_err());
    }
}

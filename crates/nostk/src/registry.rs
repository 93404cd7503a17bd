//! Publish subcommands and how their positional arguments become tags.

use std::collections::HashMap;

use crate::events::{KIND_TEXT_NOTE, TAG_CONTENT_WARNING, TAG_PUBKEY};
use crate::Error;

/// Argument position of the subcommand name (position 0 is the program).
pub const SUBCOMMAND_POSITION: usize = 1;
/// Argument position of the free-text content.
pub const CONTENT_POSITION: usize = 2;

/// Binds one positional argument to a tag name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgBinding {
    pub position: usize,
    pub tag: &'static str,
    pub required: bool,
}

impl ArgBinding {
    pub const fn optional(position: usize, tag: &'static str) -> Self {
        Self {
            position,
            tag,
            required: false,
        }
    }

    pub const fn required(position: usize, tag: &'static str) -> Self {
        Self {
            position,
            tag,
            required: true,
        }
    }
}

/// Descriptor for one publish subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcommandSpec {
    pub name: &'static str,
    pub kind: u16,
    pub about: &'static str,
    pub bindings: Vec<ArgBinding>,
}

impl SubcommandSpec {
    pub fn binding(&self, position: usize) -> Option<&ArgBinding> {
        self.bindings.iter().find(|b| b.position == position)
    }

    /// Usage line for help output, e.g. `pubMessageTo <content> <p>`.
    pub fn usage(&self) -> String {
        let mut usage = format!("{} <content>", self.name);
        let mut bindings = self.bindings.clone();
        bindings.sort_by_key(|b| b.position);
        for binding in bindings {
            if binding.required {
                usage.push_str(&format!(" <{}>", binding.tag));
            } else {
                usage.push_str(&format!(" [{}]", binding.tag));
            }
        }
        usage
    }
}

/// Lookup from subcommand name to its kind and tag bindings.
#[derive(Debug, Clone)]
pub struct SubcommandRegistry {
    entries: HashMap<&'static str, SubcommandSpec>,
}

impl SubcommandRegistry {
    pub fn standard() -> Self {
        Self::from_specs(vec![
            SubcommandSpec {
                name: "pubMessage",
                kind: KIND_TEXT_NOTE,
                about: "Publish a text note to relays",
                bindings: vec![ArgBinding::optional(3, TAG_CONTENT_WARNING)],
            },
            SubcommandSpec {
                name: "pubMessageTo",
                kind: KIND_TEXT_NOTE,
                about: "Publish a text note that mentions another user",
                bindings: vec![ArgBinding::required(3, TAG_PUBKEY)],
            },
        ])
    }

    pub fn from_specs(specs: Vec<SubcommandSpec>) -> Self {
        let entries = specs.into_iter().map(|spec| (spec.name, spec)).collect();
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&SubcommandSpec> {
        self.entries.get(name)
    }

    /// Look up the subcommand named at position 1 of `args`.
    pub fn lookup(&self, args: &[String]) -> Result<&SubcommandSpec, Error> {
        let name = args
            .get(SUBCOMMAND_POSITION)
            .ok_or_else(|| Error::MissingArgument {
                position: SUBCOMMAND_POSITION,
                name: "subcommand".to_string(),
            })?;

        self.get(name).ok_or_else(|| Error::UnsupportedSubcommand {
            subcommand: name.clone(),
            position: None,
        })
    }

    pub fn kind_of(&self, args: &[String]) -> Result<u16, Error> {
        Ok(self.lookup(args)?.kind)
    }

    /// Specs sorted by name.
    pub fn specs(&self) -> Vec<&SubcommandSpec> {
        let mut specs: Vec<_> = self.entries.values().collect();
        specs.sort_by_key(|spec| spec.name);
        specs
    }
}

impl Default for SubcommandRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_standard_kinds() {
        let registry = SubcommandRegistry::standard();
        assert_eq!(
            registry.kind_of(&args(&["nostk", "pubMessage", "hi"])).unwrap(),
            KIND_TEXT_NOTE
        );
        assert_eq!(
            registry.kind_of(&args(&["nostk", "pubMessageTo", "hi"])).unwrap(),
            KIND_TEXT_NOTE
        );
    }

    #[test]
    fn test_unknown_subcommand() {
        let registry = SubcommandRegistry::standard();
        let result = registry.lookup(&args(&["nostk", "emojiReaction"]));
        assert!(matches!(
            result,
            Err(Error::UnsupportedSubcommand { position: None, .. })
        ));
    }

    #[test]
    fn test_missing_subcommand() {
        let registry = SubcommandRegistry::standard();
        let result = registry.lookup(&args(&["nostk"]));
        assert!(matches!(
            result,
            Err(Error::MissingArgument { position: 1, .. })
        ));
    }

    #[test]
    fn test_bindings() {
        let registry = SubcommandRegistry::standard();
        let spec = registry.get("pubMessageTo").unwrap();
        assert_eq!(spec.binding(3), Some(&ArgBinding::required(3, "p")));
        assert_eq!(spec.binding(4), None);

        let spec = registry.get("pubMessage").unwrap();
        assert_eq!(spec.binding(3).map(|b| b.tag), Some("content-warning"));
        assert!(!spec.binding(3).unwrap().required);
    }

    #[test]
    fn test_usage_and_order() {
        let registry = SubcommandRegistry::standard();
        let names: Vec<_> = registry.specs().iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["pubMessage", "pubMessageTo"]);
        assert_eq!(
            registry.get("pubMessageTo").unwrap().usage(),
            "pubMessageTo <content> <p>"
        );
        assert_eq!(
            registry.get("pubMessage").unwrap().usage(),
            "pubMessage <content> [content-warning]"
        );
    }
}

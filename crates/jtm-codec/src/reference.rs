use crate::error::{JtmError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The identifier slot a topic reference or topic member addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    /// `si:` references and the `subject_identifiers` member.
    SubjectIdentifier,
    /// `sl:` references and the `subject_locators` member.
    SubjectLocator,
    /// `ii:` references and the `item_identifiers` member.
    ItemIdentifier,
}

impl IdentifierKind {
    /// Processing order of the identifier members of a topic.
    pub const ALL: [IdentifierKind; 3] = [
        IdentifierKind::SubjectIdentifier,
        IdentifierKind::SubjectLocator,
        IdentifierKind::ItemIdentifier,
    ];

    /// Three-character reference tag.
    pub fn tag(&self) -> &'static str {
        match self {
            IdentifierKind::SubjectIdentifier => "si:",
            IdentifierKind::SubjectLocator => "sl:",
            IdentifierKind::ItemIdentifier => "ii:",
        }
    }

    /// Name of the topic member holding identifiers of this kind.
    pub fn member(&self) -> &'static str {
        match self {
            IdentifierKind::SubjectIdentifier => "subject_identifiers",
            IdentifierKind::SubjectLocator => "subject_locators",
            IdentifierKind::ItemIdentifier => "item_identifiers",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        IdentifierKind::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

/// A tagged topic reference such as `si:http://example.org/a`.
///
/// The identifier part is kept unexpanded; it may still be a safe CURIE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicReference<'a> {
    /// Identifier slot named by the tag.
    pub kind: IdentifierKind,
    /// Everything after the tag.
    pub identifier: &'a str,
}

impl<'a> TopicReference<'a> {
    /// Splits a reference into tag and identifier.
    pub fn parse(reference: &'a str) -> Result<Self> {
        let kind = reference
            .get(..3)
            .and_then(IdentifierKind::from_tag)
            .ok_or_else(|| {
                JtmError::invalid(format!("topic reference without si:, sl: or ii: tag: {}", reference))
            })?;
        Ok(TopicReference {
            kind,
            identifier: &reference[3..],
        })
    }
}

impl fmt::Display for TopicReference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.tag(), self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_tag_and_identifier() {
        let reference = TopicReference::parse("sl:http://example.org/doc").unwrap();
        assert_eq!(reference.kind, IdentifierKind::SubjectLocator);
        assert_eq!(reference.identifier, "http://example.org/doc");
        assert_eq!(reference.to_string(), "sl:http://example.org/doc");
    }

    #[test]
    fn rejects_untagged_reference() {
        assert!(TopicReference::parse("http://example.org/a").is_err());
        assert!(TopicReference::parse("SI:http://example.org/a").is_err());
        assert!(TopicReference::parse("si").is_err());
    }
}

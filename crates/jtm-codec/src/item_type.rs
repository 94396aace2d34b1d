use crate::error::{JtmError, Result};
use jtm_store::Construct;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of the JTM `item_type` member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// A complete topic map.
    TopicMap,
    /// A topic fragment.
    Topic,
    /// A topic name fragment.
    Name,
    /// A variant fragment.
    Variant,
    /// An occurrence fragment.
    Occurrence,
    /// An association fragment.
    Association,
    /// A role fragment.
    Role,
}

impl ItemType {
    /// Parses an `item_type` value; matching is case-insensitive.
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "topicmap" => Ok(ItemType::TopicMap),
            "topic" => Ok(ItemType::Topic),
            "name" => Ok(ItemType::Name),
            "variant" => Ok(ItemType::Variant),
            "occurrence" => Ok(ItemType::Occurrence),
            "association" => Ok(ItemType::Association),
            "role" => Ok(ItemType::Role),
            _ => Err(JtmError::invalid(format!("unknown item_type: {}", value))),
        }
    }

    /// Returns the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::TopicMap => "topicmap",
            ItemType::Topic => "topic",
            ItemType::Name => "name",
            ItemType::Variant => "variant",
            ItemType::Occurrence => "occurrence",
            ItemType::Association => "association",
            ItemType::Role => "role",
        }
    }

    /// Item type used to export `construct`.
    pub fn of(construct: Construct) -> Self {
        match construct {
            Construct::TopicMap => ItemType::TopicMap,
            Construct::Topic(_) => ItemType::Topic,
            Construct::Association(_) => ItemType::Association,
            Construct::Role(_) => ItemType::Role,
            Construct::Name(_) => ItemType::Name,
            Construct::Occurrence(_) => ItemType::Occurrence,
            Construct::Variant(_) => ItemType::Variant,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! handle {
    ($name:ident, $doc:expr, $label:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Wraps a raw arena index.
            pub fn new(index: usize) -> Self {
                Self(index)
            }

            /// Returns the raw arena index.
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $label, self.0)
            }
        }
    };
}

handle!(TopicId, "Handle of a topic. Stale after a merge; stores canonicalize it.", "topic");
handle!(AssociationId, "Handle of an association.", "association");
handle!(RoleId, "Handle of an association role.", "role");
handle!(NameId, "Handle of a topic name.", "name");
handle!(OccurrenceId, "Handle of an occurrence.", "occurrence");
handle!(VariantId, "Handle of a name variant.", "variant");

/// Any construct of a topic map, including the map itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Construct {
    /// The topic map root.
    TopicMap,
    /// A topic.
    Topic(TopicId),
    /// An association.
    Association(AssociationId),
    /// An association role.
    Role(RoleId),
    /// A topic name.
    Name(NameId),
    /// An occurrence.
    Occurrence(OccurrenceId),
    /// A name variant.
    Variant(VariantId),
}

/// Kind of a [`Construct`], without its handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructKind {
    /// The topic map root.
    TopicMap,
    /// A topic.
    Topic,
    /// An association.
    Association,
    /// An association role.
    Role,
    /// A topic name.
    Name,
    /// An occurrence.
    Occurrence,
    /// A name variant.
    Variant,
}

impl Construct {
    /// Returns the kind of this construct.
    pub fn kind(&self) -> ConstructKind {
        match self {
            Construct::TopicMap => ConstructKind::TopicMap,
            Construct::Topic(_) => ConstructKind::Topic,
            Construct::Association(_) => ConstructKind::Association,
            Construct::Role(_) => ConstructKind::Role,
            Construct::Name(_) => ConstructKind::Name,
            Construct::Occurrence(_) => ConstructKind::Occurrence,
            Construct::Variant(_) => ConstructKind::Variant,
        }
    }

    /// Returns the topic handle if this construct is a topic.
    pub fn as_topic(&self) -> Option<TopicId> {
        match self {
            Construct::Topic(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Construct::TopicMap => f.write_str("topicmap"),
            Construct::Topic(id) => id.fmt(f),
            Construct::Association(id) => id.fmt(f),
            Construct::Role(id) => id.fmt(f),
            Construct::Name(id) => id.fmt(f),
            Construct::Occurrence(id) => id.fmt(f),
            Construct::Variant(id) => id.fmt(f),
        }
    }
}

impl From<TopicId> for Construct {
    fn from(id: TopicId) -> Self {
        Construct::Topic(id)
    }
}

impl From<AssociationId> for Construct {
    fn from(id: AssociationId) -> Self {
        Construct::Association(id)
    }
}

impl From<RoleId> for Construct {
    fn from(id: RoleId) -> Self {
        Construct::Role(id)
    }
}

impl From<NameId> for Construct {
    fn from(id: NameId) -> Self {
        Construct::Name(id)
    }
}

impl From<OccurrenceId> for Construct {
    fn from(id: OccurrenceId) -> Self {
        Construct::Occurrence(id)
    }
}

impl From<VariantId> for Construct {
    fn from(id: VariantId) -> Self {
        Construct::Variant(id)
    }
}

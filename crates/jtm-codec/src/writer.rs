//! JTM export.
//!
//! The [`Writer`] only reads from the store. Members whose value is empty or
//! equal to its default are omitted so that exported fragments match what the
//! reader accepts member for member.

use crate::curie::PrefixTable;
use crate::item_type::ItemType;
use crate::reference::IdentifierKind;
use crate::version::Version;
use jtm_store::psi::{self, XSD_STRING};
use jtm_store::{AssociationId, Construct, Locator, NameId, OccurrenceId, RoleId, TopicId, TopicMapStore, VariantId};
use serde_json::{json, Map, Value};
use tracing::debug;

/// Options controlling JTM export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Format version of the produced documents.
    pub version: Version,
    /// Prefixes used to compact locators; only applied under JTM 1.1.
    pub prefixes: PrefixTable,
}

/// Exports constructs of a [`TopicMapStore`] as JTM objects.
///
/// # Example
///
/// ```rust
/// use jtm_codec::{PrefixTable, Version, WriteOptions, Writer};
/// use jtm_store::{Construct, MemoryTopicMap, TopicMapStore};
///
/// let mut map = MemoryTopicMap::default();
/// let topic = map.create_topic_by_subject_identifier(&"http://example.org/a".into());
///
/// let mut prefixes = PrefixTable::new();
/// prefixes.insert("ex", "http://example.org/")?;
/// let writer = Writer::new(WriteOptions { version: Version::V1_1, prefixes });
///
/// let object = writer.to_object(&map, Construct::Topic(topic), false);
/// assert_eq!(object["subject_identifiers"][0], "[ex:a]");
/// assert_eq!(object["prefixes"]["ex"], "http://example.org/");
/// # Ok::<(), jtm_codec::JtmError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Writer {
    version: Version,
    prefixes: PrefixTable,
    default_datatype: Locator,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new(WriteOptions::default())
    }
}

impl Writer {
    /// Creates a writer.
    pub fn new(options: WriteOptions) -> Self {
        Self {
            version: options.version,
            prefixes: options.prefixes,
            default_datatype: Locator::new(XSD_STRING),
        }
    }

    /// Version written into every document.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Registered prefixes.
    pub fn prefixes(&self) -> &PrefixTable {
        &self.prefixes
    }

    /// Registers additional prefixes, replacing existing entries of the same name.
    pub fn set_prefixes(&mut self, prefixes: &PrefixTable) {
        self.prefixes.extend(prefixes);
    }

    /// Exports `construct` as a JTM object.
    ///
    /// With `include_parent`, fragments carry a `parent` member listing the
    /// item identifiers of their parent construct.
    pub fn to_object<S: TopicMapStore>(&self, store: &S, construct: Construct, include_parent: bool) -> Value {
        let item_type = ItemType::of(construct);
        debug!(construct = %construct, item_type = %item_type, version = %self.version, "exporting construct");

        let exporter = Exporter { writer: self, store };
        let mut object = match construct {
            Construct::TopicMap => exporter.topic_map(),
            Construct::Topic(topic) => exporter.topic(topic),
            Construct::Association(association) => exporter.association(association),
            Construct::Role(role) => exporter.role(role),
            Construct::Name(name) => exporter.name(name),
            Construct::Occurrence(occurrence) => exporter.occurrence(occurrence),
            Construct::Variant(variant) => exporter.variant(variant),
        };
        object.insert("item_type".into(), Value::from(item_type.as_str()));
        object.insert("version".into(), Value::from(self.version.as_str()));
        if self.version.is_compact() && !self.prefixes.is_empty() {
            object.insert("prefixes".into(), self.prefixes.to_json());
        }
        if include_parent {
            exporter.parent(&mut object, construct);
        }
        Value::Object(object)
    }

    /// Exports `construct` as JTM text.
    pub fn to_text<S: TopicMapStore>(&self, store: &S, construct: Construct, include_parent: bool) -> String {
        self.to_object(store, construct, include_parent).to_string()
    }

    /// Tagged reference for `topic`.
    ///
    /// Subject identifiers are preferred over subject locators, which are
    /// preferred over item identifiers. `None` when the topic has no
    /// identifier at all.
    pub fn topic_reference<S: TopicMapStore>(&self, store: &S, topic: TopicId) -> Option<String> {
        Exporter { writer: self, store }.topic_reference(topic)
    }

    fn compact(&self, locator: &Locator) -> String {
        self.prefixes.compact(locator.reference(), self.version)
    }
}

struct Exporter<'w, S: TopicMapStore> {
    writer: &'w Writer,
    store: &'w S,
}

impl<'w, S: TopicMapStore> Exporter<'w, S> {
    fn topic_reference(&self, topic: TopicId) -> Option<String> {
        let categories = [
            (IdentifierKind::SubjectIdentifier, self.store.subject_identifiers(topic)),
            (IdentifierKind::SubjectLocator, self.store.subject_locators(topic)),
            (IdentifierKind::ItemIdentifier, self.store.item_identifiers(Construct::Topic(topic))),
        ];
        categories.into_iter().find_map(|(kind, locators)| {
            locators
                .first()
                .map(|locator| format!("{}{}", kind.tag(), self.writer.compact(locator)))
        })
    }

    fn reference(&self, topic: TopicId) -> Value {
        self.topic_reference(topic).map_or(Value::Null, Value::String)
    }

    fn identifiers(&self, object: &mut Map<String, Value>, key: &str, locators: &[Locator]) {
        if locators.is_empty() {
            return;
        }
        let entries = locators
            .iter()
            .map(|locator| Value::String(self.writer.compact(locator)))
            .collect();
        object.insert(key.into(), Value::Array(entries));
    }

    fn references(&self, object: &mut Map<String, Value>, key: &str, topics: Vec<TopicId>) {
        if topics.is_empty() {
            return;
        }
        let entries = topics.into_iter().map(|topic| self.reference(topic)).collect();
        object.insert(key.into(), Value::Array(entries));
    }

    /// Item identifiers, reifier and scope shared by every typed construct.
    fn annotate(&self, object: &mut Map<String, Value>, construct: Construct) {
        self.identifiers(object, "item_identifiers", self.store.item_identifiers(construct));
        if let Some(reifier) = self.store.reifier(construct) {
            object.insert("reifier".into(), self.reference(reifier));
        }
        self.references(object, "scope", self.store.scope(construct));
    }

    fn typed(&self, object: &mut Map<String, Value>, construct: Construct) {
        if let Some(type_) = self.store.construct_type(construct) {
            object.insert("type".into(), self.reference(type_));
        }
    }

    fn literal(&self, object: &mut Map<String, Value>, construct: Construct) {
        let value = self.store.value(construct).unwrap_or_default();
        object.insert("value".into(), Value::from(value));
        if let Some(datatype) = self.store.datatype(construct) {
            if *datatype != self.writer.default_datatype {
                object.insert("datatype".into(), Value::String(self.writer.compact(datatype)));
            }
        }
    }

    fn parent(&self, object: &mut Map<String, Value>, construct: Construct) {
        let Some(parent) = self.store.parent(construct) else {
            return;
        };
        let locators = self.store.item_identifiers(parent);
        if locators.is_empty() {
            return;
        }
        let entries = locators
            .iter()
            .map(|locator| {
                Value::String(format!(
                    "{}{}",
                    IdentifierKind::ItemIdentifier.tag(),
                    self.writer.compact(locator)
                ))
            })
            .collect();
        object.insert("parent".into(), Value::Array(entries));
    }

    fn topic_map(&self) -> Map<String, Value> {
        let mut object = Map::new();
        self.annotate(&mut object, Construct::TopicMap);
        let topics = self.store.topics();
        let mut associations: Vec<Value> = self
            .store
            .associations()
            .into_iter()
            .map(|association| Value::Object(self.association(association)))
            .collect();
        if !self.writer.version.is_compact() {
            for topic in &topics {
                associations.extend(self.type_instance_associations(*topic));
            }
        }
        let topics = topics
            .into_iter()
            .map(|topic| Value::Object(self.topic(topic)))
            .collect();
        object.insert("topics".into(), Value::Array(topics));
        object.insert("associations".into(), Value::Array(associations));
        object
    }

    /// JTM 1.0 has no `instance_of`; topic types travel as `type-instance`
    /// associations instead.
    fn type_instance_associations(&self, topic: TopicId) -> Vec<Value> {
        let Some(instance) = self.topic_reference(topic) else {
            return Vec::new();
        };
        self.store
            .types(topic)
            .into_iter()
            .filter_map(|type_| self.topic_reference(type_))
            .map(|type_| {
                json!({
                    "type": format!("si:{}", psi::TYPE_INSTANCE),
                    "roles": [
                        { "type": format!("si:{}", psi::TYPE), "player": type_ },
                        { "type": format!("si:{}", psi::INSTANCE), "player": instance },
                    ]
                })
            })
            .collect()
    }

    fn topic(&self, topic: TopicId) -> Map<String, Value> {
        let mut object = Map::new();
        self.identifiers(&mut object, "subject_identifiers", self.store.subject_identifiers(topic));
        self.identifiers(&mut object, "subject_locators", self.store.subject_locators(topic));
        self.identifiers(
            &mut object,
            "item_identifiers",
            self.store.item_identifiers(Construct::Topic(topic)),
        );
        if self.writer.version.is_compact() {
            self.references(&mut object, "instance_of", self.store.types(topic));
        }
        let names: Vec<Value> = self
            .store
            .names(topic)
            .into_iter()
            .map(|name| Value::Object(self.name(name)))
            .collect();
        if !names.is_empty() {
            object.insert("names".into(), Value::Array(names));
        }
        let occurrences: Vec<Value> = self
            .store
            .occurrences(topic)
            .into_iter()
            .map(|occurrence| Value::Object(self.occurrence(occurrence)))
            .collect();
        if !occurrences.is_empty() {
            object.insert("occurrences".into(), Value::Array(occurrences));
        }
        object
    }

    fn name(&self, name: NameId) -> Map<String, Value> {
        let construct = Construct::Name(name);
        let mut object = Map::new();
        self.literal(&mut object, construct);
        self.typed(&mut object, construct);
        self.annotate(&mut object, construct);
        let variants: Vec<Value> = self
            .store
            .variants(name)
            .into_iter()
            .map(|variant| Value::Object(self.variant(variant)))
            .collect();
        if !variants.is_empty() {
            object.insert("variants".into(), Value::Array(variants));
        }
        object
    }

    fn variant(&self, variant: VariantId) -> Map<String, Value> {
        let construct = Construct::Variant(variant);
        let mut object = Map::new();
        self.literal(&mut object, construct);
        self.annotate(&mut object, construct);
        object
    }

    fn occurrence(&self, occurrence: OccurrenceId) -> Map<String, Value> {
        let construct = Construct::Occurrence(occurrence);
        let mut object = Map::new();
        self.literal(&mut object, construct);
        self.typed(&mut object, construct);
        self.annotate(&mut object, construct);
        object
    }

    fn association(&self, association: AssociationId) -> Map<String, Value> {
        let construct = Construct::Association(association);
        let mut object = Map::new();
        self.typed(&mut object, construct);
        self.annotate(&mut object, construct);
        let roles: Vec<Value> = self
            .store
            .roles(association)
            .into_iter()
            .map(|role| Value::Object(self.role(role)))
            .collect();
        if !roles.is_empty() {
            object.insert("roles".into(), Value::Array(roles));
        }
        object
    }

    fn role(&self, role: RoleId) -> Map<String, Value> {
        let construct = Construct::Role(role);
        let mut object = Map::new();
        object.insert("player".into(), self.reference(self.store.player(role)));
        self.typed(&mut object, construct);
        self.annotate(&mut object, construct);
        object
    }
}

//! JTM import.
//!
//! A [`Reader`] borrows a store mutably and turns one JTM document per call
//! into constructs of that store. Every call builds a fresh parse context
//! holding the document's version and prefix table.

use crate::curie::{PrefixTable, XSD_PREFIX};
use crate::error::{JtmError, Result};
use crate::item_type::ItemType;
use crate::reference::{IdentifierKind, TopicReference};
use crate::validation::{
    array_member, as_object, is_present, required_string, string_entries, string_member, JsonObject,
};
use crate::version::Version;
use jtm_store::psi::{XSD_NAMESPACE, XSD_STRING};
use jtm_store::{
    AssociationId, Construct, ConstructKind, Locator, NameId, OccurrenceId, RoleId, TopicId,
    TopicMapStore, VariantId,
};
use serde_json::Value;
use tracing::{debug, trace};

/// Imports JTM documents into a [`TopicMapStore`].
///
/// # Example
///
/// ```rust
/// use jtm_codec::Reader;
/// use jtm_store::{MemoryTopicMap, TopicMapStore};
///
/// let mut map = MemoryTopicMap::default();
/// let text = r#"{"item_type":"topic","version":"1.0","subject_identifiers":["http://x/a"]}"#;
/// Reader::new(&mut map).parse_str(text, None)?;
/// assert_eq!(map.topics().len(), 1);
/// # Ok::<(), jtm_codec::JtmError>(())
/// ```
pub struct Reader<'s, S: TopicMapStore> {
    store: &'s mut S,
}

impl<'s, S: TopicMapStore> Reader<'s, S> {
    /// Creates a reader writing into `store`.
    pub fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    /// Parses JTM text; malformed JSON is reported as `InvalidFormat`.
    pub fn parse_str(&mut self, text: &str, parent: Option<Construct>) -> Result<Construct> {
        let document: Value = serde_json::from_str(text)?;
        self.parse_document(&document, parent)
    }

    /// Imports a JTM document or fragment.
    ///
    /// `parent` supplies the parent of a name, occurrence, variant or role
    /// fragment; without it the fragment's own `parent` member is used.
    /// Returns the construct built from the document, or
    /// [`Construct::TopicMap`] for a complete topic map.
    ///
    /// A failed import may leave already created constructs in the store.
    pub fn parse_document(&mut self, document: &Value, parent: Option<Construct>) -> Result<Construct> {
        let object = as_object(document, "JTM document")?;
        let version = match string_member(object, "version")? {
            Some(version) => version.parse::<Version>()?,
            None => return Err(JtmError::invalid("missing version")),
        };
        let prefixes = read_prefixes(object, version)?;
        let item_type = match string_member(object, "item_type")? {
            Some(item_type) => ItemType::parse(item_type)?,
            None => return Err(JtmError::invalid("missing item_type")),
        };
        debug!(item_type = %item_type, version = %version, "importing JTM document");

        let mut context = ParseContext {
            store: &mut *self.store,
            version,
            prefixes,
            default_datatype: Locator::new(XSD_STRING),
        };
        context.parse_root(item_type, object, parent)
    }
}

fn read_prefixes(object: &JsonObject, version: Version) -> Result<PrefixTable> {
    let declared = match object.get("prefixes") {
        None | Some(Value::Null) => return Ok(PrefixTable::with_xsd()),
        Some(declared) => declared,
    };
    if !version.is_compact() {
        return Err(JtmError::invalid("prefixes are not allowed in JTM 1.0"));
    }
    let mut prefixes = PrefixTable::from_json(declared)?;
    if prefixes.get(XSD_PREFIX).is_none() {
        prefixes.insert(XSD_PREFIX, XSD_NAMESPACE)?;
    }
    Ok(prefixes)
}

/// State of a single document import.
struct ParseContext<'p, S: TopicMapStore> {
    store: &'p mut S,
    version: Version,
    prefixes: PrefixTable,
    default_datatype: Locator,
}

impl<'p, S: TopicMapStore> ParseContext<'p, S> {
    fn parse_root(
        &mut self,
        item_type: ItemType,
        object: &JsonObject,
        parent: Option<Construct>,
    ) -> Result<Construct> {
        match item_type {
            ItemType::TopicMap => {
                self.parse_topic_map(object)?;
                Ok(Construct::TopicMap)
            }
            ItemType::Topic => self.parse_topic(object).map(Construct::Topic),
            ItemType::Name => {
                let parent = topic_argument(parent, "name")?;
                self.parse_name(parent, object).map(Construct::Name)
            }
            ItemType::Occurrence => {
                let parent = topic_argument(parent, "occurrence")?;
                self.parse_occurrence(parent, object).map(Construct::Occurrence)
            }
            ItemType::Variant => {
                let parent = match parent {
                    Some(Construct::Name(name)) => name,
                    Some(other) => return Err(wrong_parent("variant", other)),
                    None => match self.parent_construct(object, ConstructKind::Name, "variant")? {
                        Construct::Name(name) => name,
                        other => return Err(wrong_parent("variant", other)),
                    },
                };
                self.parse_variant(parent, object).map(Construct::Variant)
            }
            ItemType::Association => self.parse_association(object).map(Construct::Association),
            ItemType::Role => {
                let parent = match parent {
                    Some(Construct::Association(association)) => association,
                    Some(other) => return Err(wrong_parent("role", other)),
                    None => match self.parent_construct(object, ConstructKind::Association, "role")? {
                        Construct::Association(association) => association,
                        other => return Err(wrong_parent("role", other)),
                    },
                };
                self.parse_role(parent, object).map(Construct::Role)
            }
        }
    }

    // --- references ---

    fn locator(&self, reference: &str) -> Result<Locator> {
        let iri = self.prefixes.expand(reference, self.version)?;
        Ok(self.store.create_locator(&iri))
    }

    fn topic_by(&mut self, kind: IdentifierKind, locator: &Locator) -> Result<TopicId> {
        let topic = match kind {
            IdentifierKind::SubjectIdentifier => self.store.create_topic_by_subject_identifier(locator),
            IdentifierKind::SubjectLocator => self.store.create_topic_by_subject_locator(locator),
            IdentifierKind::ItemIdentifier => self.store.create_topic_by_item_identifier(locator)?,
        };
        Ok(topic)
    }

    fn resolve_reference(&mut self, reference: &str) -> Result<TopicId> {
        let parsed = TopicReference::parse(reference)?;
        let locator = self.locator(parsed.identifier)?;
        trace!(reference, locator = %locator, "resolving topic reference");
        self.topic_by(parsed.kind, &locator)
    }

    fn resolve_value(&mut self, value: &Value, key: &str) -> Result<TopicId> {
        let reference = value
            .as_str()
            .ok_or_else(|| JtmError::invalid(format!("{} must hold topic reference strings", key)))?;
        self.resolve_reference(reference)
    }

    fn optional_reference(&mut self, object: &JsonObject, key: &str) -> Result<Option<TopicId>> {
        match string_member(object, key)? {
            Some(reference) => self.resolve_reference(reference).map(Some),
            None => Ok(None),
        }
    }

    fn required_reference(&mut self, object: &JsonObject, key: &str, what: &str) -> Result<TopicId> {
        self.optional_reference(object, key)?
            .ok_or_else(|| JtmError::invalid(format!("{} requires a {}", what, key)))
    }

    fn parse_scope(&mut self, object: &JsonObject) -> Result<Vec<TopicId>> {
        array_member(object, "scope")
            .iter()
            .map(|theme| self.resolve_value(theme, "scope"))
            .collect()
    }

    fn parse_datatype(&self, object: &JsonObject) -> Result<Locator> {
        match string_member(object, "datatype")? {
            Some(datatype) => self.locator(datatype),
            None => Ok(self.default_datatype.clone()),
        }
    }

    // --- parents ---

    /// Resolves the `parent` member of a name or occurrence fragment.
    ///
    /// Without a `parent` member a fresh topic is created. Every listed
    /// reference is merged into the topic named by the first one.
    fn parent_topic(&mut self, object: &JsonObject) -> Result<TopicId> {
        let entries = match object.get("parent") {
            None | Some(Value::Null) => return Ok(self.store.create_topic()),
            Some(Value::Array(entries)) if !entries.is_empty() => entries,
            Some(_) => return Err(JtmError::invalid("parent must be a non-empty array of topic references")),
        };
        let mut parent: Option<TopicId> = None;
        for entry in entries {
            let topic = self.resolve_value(entry, "parent")?;
            match parent {
                None => parent = Some(topic),
                Some(anchor) if anchor != topic => self.store.merge_in(anchor, topic)?,
                Some(_) => {}
            }
        }
        parent.ok_or_else(|| JtmError::invalid("missing parent topic reference"))
    }

    /// Finds the existing construct of `kind` named by an `ii:` entry of the
    /// `parent` member.
    fn parent_construct(&mut self, object: &JsonObject, kind: ConstructKind, what: &str) -> Result<Construct> {
        let entries = match object.get("parent") {
            Some(Value::Array(entries)) if !entries.is_empty() => entries,
            _ => return Err(JtmError::invalid(format!("{} fragment requires a parent", what))),
        };
        for entry in string_entries(entries, "parent")? {
            let reference = TopicReference::parse(entry)?;
            if reference.kind != IdentifierKind::ItemIdentifier {
                return Err(JtmError::invalid(format!(
                    "{} parent must be an item identifier reference",
                    what
                )));
            }
            let locator = self.locator(reference.identifier)?;
            match self.store.construct_by_item_identifier(&locator) {
                Some(construct) if construct.kind() == kind => return Ok(construct),
                _ => trace!(reference = entry, "parent reference does not match"),
            }
        }
        Err(JtmError::invalid(format!(
            "{} parent does not name an existing construct",
            what
        )))
    }

    // --- constructs ---

    fn parse_topic_map(&mut self, object: &JsonObject) -> Result<()> {
        self.parse_item_identifiers(Construct::TopicMap, object)?;
        self.parse_reifier(Construct::TopicMap, object)?;
        for topic in array_member(object, "topics") {
            self.parse_topic(as_object(topic, "topic")?)?;
        }
        for association in array_member(object, "associations") {
            self.parse_association(as_object(association, "association")?)?;
        }
        self.store.sanitize();
        Ok(())
    }

    fn parse_topic(&mut self, object: &JsonObject) -> Result<TopicId> {
        let mut anchor: Option<TopicId> = None;
        for kind in IdentifierKind::ALL {
            for identifier in string_entries(array_member(object, kind.member()), kind.member())? {
                let locator = self.locator(identifier)?;
                match anchor {
                    None => anchor = Some(self.topic_by(kind, &locator)?),
                    Some(topic) => self.attach_identifier(topic, kind, &locator)?,
                }
            }
        }
        let topic = anchor.ok_or_else(|| JtmError::invalid("topic requires at least one identifier"))?;

        if is_present(object, "instance_of") {
            if !self.version.is_compact() {
                return Err(JtmError::invalid("instance_of is not allowed in JTM 1.0"));
            }
            for type_ in array_member(object, "instance_of") {
                let type_ = self.resolve_value(type_, "instance_of")?;
                self.store.add_type(topic, type_);
            }
        }
        for name in array_member(object, "names") {
            self.parse_name(Some(topic), as_object(name, "name")?)?;
        }
        for occurrence in array_member(object, "occurrences") {
            self.parse_occurrence(Some(topic), as_object(occurrence, "occurrence")?)?;
        }
        Ok(topic)
    }

    /// Adds one more identifier to the topic being imported, merging in any
    /// other topic that already carries it.
    fn attach_identifier(&mut self, topic: TopicId, kind: IdentifierKind, locator: &Locator) -> Result<()> {
        let existing = match kind {
            IdentifierKind::SubjectIdentifier => {
                self.store.topic_by_subject_identifier(locator).map(Construct::Topic)
            }
            IdentifierKind::SubjectLocator => self.store.topic_by_subject_locator(locator).map(Construct::Topic),
            IdentifierKind::ItemIdentifier => self.store.construct_by_item_identifier(locator),
        };
        match existing {
            Some(Construct::Topic(other)) if other == topic => Ok(()),
            Some(Construct::Topic(other)) => {
                debug!(topic = %topic, other = %other, locator = %locator, "merging topics sharing an identifier");
                Ok(self.store.merge_in(topic, other)?)
            }
            _ => {
                match kind {
                    IdentifierKind::SubjectIdentifier => self.store.add_subject_identifier(topic, locator)?,
                    IdentifierKind::SubjectLocator => self.store.add_subject_locator(topic, locator)?,
                    IdentifierKind::ItemIdentifier => {
                        self.store.add_item_identifier(Construct::Topic(topic), locator)?
                    }
                }
                Ok(())
            }
        }
    }

    fn parse_name(&mut self, parent: Option<TopicId>, object: &JsonObject) -> Result<NameId> {
        let value = required_string(object, "value", "name")?;
        let parent = match parent {
            Some(topic) => topic,
            None => self.parent_topic(object)?,
        };
        let scope = self.parse_scope(object)?;
        let type_ = self.optional_reference(object, "type")?;
        let name = self.store.create_name(parent, value, type_, &scope);
        for variant in array_member(object, "variants") {
            self.parse_variant(name, as_object(variant, "variant")?)?;
        }
        self.parse_item_identifiers(Construct::Name(name), object)?;
        self.parse_reifier(Construct::Name(name), object)?;
        Ok(name)
    }

    fn parse_variant(&mut self, parent: NameId, object: &JsonObject) -> Result<VariantId> {
        let value = required_string(object, "value", "variant")?;
        let scope = self.parse_scope(object)?;
        let datatype = self.parse_datatype(object)?;
        let variant = self.store.create_variant(parent, value, &datatype, &scope);
        self.parse_item_identifiers(Construct::Variant(variant), object)?;
        self.parse_reifier(Construct::Variant(variant), object)?;
        Ok(variant)
    }

    fn parse_occurrence(&mut self, parent: Option<TopicId>, object: &JsonObject) -> Result<OccurrenceId> {
        let value = required_string(object, "value", "occurrence")?;
        let parent = match parent {
            Some(topic) => topic,
            None => self.parent_topic(object)?,
        };
        let scope = self.parse_scope(object)?;
        let type_ = self.required_reference(object, "type", "occurrence")?;
        let datatype = self.parse_datatype(object)?;
        let occurrence = self
            .store
            .create_occurrence(parent, type_, value, &datatype, &scope);
        self.parse_item_identifiers(Construct::Occurrence(occurrence), object)?;
        self.parse_reifier(Construct::Occurrence(occurrence), object)?;
        Ok(occurrence)
    }

    fn parse_association(&mut self, object: &JsonObject) -> Result<AssociationId> {
        let roles = match object.get("roles") {
            Some(Value::Array(roles)) if !roles.is_empty() => roles,
            _ => return Err(JtmError::invalid("Association needs roles")),
        };
        let scope = self.parse_scope(object)?;
        let type_ = self.required_reference(object, "type", "association")?;
        let association = self.store.create_association(type_, &scope);
        for role in roles {
            self.parse_role(association, as_object(role, "role")?)?;
        }
        self.parse_item_identifiers(Construct::Association(association), object)?;
        self.parse_reifier(Construct::Association(association), object)?;
        Ok(association)
    }

    fn parse_role(&mut self, parent: AssociationId, object: &JsonObject) -> Result<RoleId> {
        let player = self.required_reference(object, "player", "role")?;
        let type_ = self.required_reference(object, "type", "role")?;
        let role = self.store.create_role(parent, type_, player);
        self.parse_item_identifiers(Construct::Role(role), object)?;
        self.parse_reifier(Construct::Role(role), object)?;
        Ok(role)
    }

    // --- identity ---

    fn parse_item_identifiers(&mut self, construct: Construct, object: &JsonObject) -> Result<()> {
        for identifier in string_entries(array_member(object, "item_identifiers"), "item_identifiers")? {
            let locator = self.locator(identifier)?;
            if self.store.construct_by_item_identifier(&locator).is_some() {
                trace!(locator = %locator, "item identifier already in use; skipped");
                continue;
            }
            self.store.add_item_identifier(construct, &locator)?;
        }
        Ok(())
    }

    /// Applies the `reifier` member; an absent reifier clears the current one.
    fn parse_reifier(&mut self, construct: Construct, object: &JsonObject) -> Result<()> {
        let Some(reifier) = self.optional_reference(object, "reifier")? else {
            return Ok(self.store.set_reifier(construct, None)?);
        };
        match self.store.reified(reifier) {
            Some(reified) if reified != construct => {
                debug!(reifier = %reifier, reified = %reified, "reifier already reifies another construct; skipped");
                Ok(())
            }
            _ => Ok(self.store.set_reifier(construct, Some(reifier))?),
        }
    }
}

fn topic_argument(parent: Option<Construct>, what: &str) -> Result<Option<TopicId>> {
    match parent {
        None => Ok(None),
        Some(Construct::Topic(topic)) => Ok(Some(topic)),
        Some(other) => Err(wrong_parent(what, other)),
    }
}

fn wrong_parent(what: &str, parent: Construct) -> JtmError {
    JtmError::invalid(format!("{} cannot be a child of {}", what, parent))
}

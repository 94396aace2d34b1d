//! Arena-backed reference implementation of [`TopicMapStore`].
//!
//! Every construct kind lives in its own `Vec` arena and is addressed by the
//! index wrapped in its handle. Records are never moved or freed; removed
//! constructs are flagged and filtered out of the accessors.
//!
//! Topic identity is a union-find over topic indexes: merging `other` into
//! `target` points `other` at `target` and moves its record contents over.
//! Every accessor canonicalizes the handles it receives and returns, so handles
//! held by callers (and references stored in other records) stay valid after a
//! merge.

mod merge;
mod records;
mod sanitize;

use crate::error::StoreError;
use crate::handle::{AssociationId, Construct, NameId, OccurrenceId, RoleId, TopicId, VariantId};
use crate::locator::Locator;
use crate::psi;
use crate::traits::TopicMapStore;
use records::{
    AssociationRecord, NameRecord, OccurrenceRecord, RoleRecord, TopicRecord, VariantRecord,
};
use std::collections::HashMap;
use tracing::trace;

const DEFAULT_BASE: &str = "urn:x-jtm:topicmap";

/// In-memory topic map.
///
/// # Example
///
/// ```rust
/// use jtm_store::{MemoryTopicMap, TopicMapStore};
///
/// let mut map = MemoryTopicMap::default();
/// let a = map.create_topic_by_subject_identifier(&"http://example.org/a".into());
/// let b = map.create_topic_by_subject_identifier(&"http://example.org/b".into());
/// map.merge_in(a, b)?;
///
/// assert_eq!(map.topics().len(), 1);
/// assert_eq!(map.subject_identifiers(b).len(), 2);
/// # Ok::<(), jtm_store::StoreError>(())
/// ```
#[derive(Debug)]
pub struct MemoryTopicMap {
    base: Locator,
    item_identifiers: Vec<Locator>,
    reifier: Option<TopicId>,
    topics: Vec<TopicRecord>,
    // union-find parent links; a root points at itself
    merged_into: Vec<usize>,
    associations: Vec<AssociationRecord>,
    roles: Vec<RoleRecord>,
    names: Vec<NameRecord>,
    occurrences: Vec<OccurrenceRecord>,
    variants: Vec<VariantRecord>,
    by_subject_identifier: HashMap<Locator, TopicId>,
    by_subject_locator: HashMap<Locator, TopicId>,
    by_item_identifier: HashMap<Locator, Construct>,
    next_anonymous: usize,
}

impl Default for MemoryTopicMap {
    fn default() -> Self {
        Self::new(DEFAULT_BASE)
    }
}

impl MemoryTopicMap {
    /// Creates an empty map. Item identifiers of anonymous topics are minted
    /// below `base`.
    pub fn new(base: impl Into<Locator>) -> Self {
        Self {
            base: base.into(),
            item_identifiers: Vec::new(),
            reifier: None,
            topics: Vec::new(),
            merged_into: Vec::new(),
            associations: Vec::new(),
            roles: Vec::new(),
            names: Vec::new(),
            occurrences: Vec::new(),
            variants: Vec::new(),
            by_subject_identifier: HashMap::new(),
            by_subject_locator: HashMap::new(),
            by_item_identifier: HashMap::new(),
            next_anonymous: 0,
        }
    }

    /// Returns the base locator of the map.
    pub fn base_locator(&self) -> &Locator {
        &self.base
    }

    /// Returns the surviving topic for a possibly merged handle.
    pub fn canonical(&self, topic: TopicId) -> TopicId {
        let mut current = topic.index();
        while self.merged_into[current] != current {
            current = self.merged_into[current];
        }
        TopicId::new(current)
    }

    fn canonical_construct(&self, construct: Construct) -> Construct {
        match construct {
            Construct::Topic(topic) => Construct::Topic(self.canonical(topic)),
            other => other,
        }
    }

    fn canonical_set(&self, topics: &[TopicId]) -> Vec<TopicId> {
        let mut out: Vec<TopicId> = Vec::with_capacity(topics.len());
        for topic in topics {
            let topic = self.canonical(*topic);
            if !out.contains(&topic) {
                out.push(topic);
            }
        }
        out
    }

    fn topic(&self, topic: TopicId) -> &TopicRecord {
        &self.topics[self.canonical(topic).index()]
    }

    fn topic_mut(&mut self, topic: TopicId) -> &mut TopicRecord {
        let index = self.canonical(topic).index();
        &mut self.topics[index]
    }

    fn new_topic(&mut self) -> TopicId {
        let id = TopicId::new(self.topics.len());
        self.topics.push(TopicRecord::default());
        self.merged_into.push(id.index());
        id
    }

    fn has_subject_identifier(&self, topic: TopicId, psi: &str) -> bool {
        self.topic(topic)
            .subject_identifiers
            .iter()
            .any(|loc| loc.reference() == psi)
    }

    pub(crate) fn item_identifiers_mut(&mut self, construct: Construct) -> &mut Vec<Locator> {
        match construct {
            Construct::TopicMap => &mut self.item_identifiers,
            Construct::Topic(id) => &mut self.topic_mut(id).item_identifiers,
            Construct::Association(id) => &mut self.associations[id.index()].item_identifiers,
            Construct::Role(id) => &mut self.roles[id.index()].item_identifiers,
            Construct::Name(id) => &mut self.names[id.index()].item_identifiers,
            Construct::Occurrence(id) => &mut self.occurrences[id.index()].item_identifiers,
            Construct::Variant(id) => &mut self.variants[id.index()].item_identifiers,
        }
    }

    /// Reifier slot of a construct; topics are not reifiable.
    pub(crate) fn reifier_slot(&mut self, construct: Construct) -> Option<&mut Option<TopicId>> {
        match construct {
            Construct::TopicMap => Some(&mut self.reifier),
            Construct::Topic(_) => None,
            Construct::Association(id) => Some(&mut self.associations[id.index()].reifier),
            Construct::Role(id) => Some(&mut self.roles[id.index()].reifier),
            Construct::Name(id) => Some(&mut self.names[id.index()].reifier),
            Construct::Occurrence(id) => Some(&mut self.occurrences[id.index()].reifier),
            Construct::Variant(id) => Some(&mut self.variants[id.index()].reifier),
        }
    }

    /// Moves all item identifiers of `from` to `to`.
    pub(crate) fn move_item_identifiers(&mut self, from: Construct, to: Construct) {
        let moved = std::mem::take(self.item_identifiers_mut(from));
        for locator in moved {
            self.by_item_identifier.insert(locator.clone(), to);
            let target = self.item_identifiers_mut(to);
            if !target.contains(&locator) {
                target.push(locator);
            }
        }
    }

    fn attach_subject_identifier(&mut self, topic: TopicId, locator: &Locator) {
        let topic = self.canonical(topic);
        self.topic_mut(topic).subject_identifiers.push(locator.clone());
        self.by_subject_identifier.insert(locator.clone(), topic);
    }

    fn attach_item_identifier(&mut self, construct: Construct, locator: &Locator) {
        let construct = self.canonical_construct(construct);
        self.item_identifiers_mut(construct).push(locator.clone());
        self.by_item_identifier.insert(locator.clone(), construct);
    }

    fn mint_item_identifier(&mut self) -> Locator {
        loop {
            self.next_anonymous += 1;
            let candidate = Locator::new(format!("{}#topic-{}", self.base, self.next_anonymous));
            if !self.by_item_identifier.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}

impl TopicMapStore for MemoryTopicMap {
    fn create_topic(&mut self) -> TopicId {
        let topic = self.new_topic();
        let locator = self.mint_item_identifier();
        self.attach_item_identifier(Construct::Topic(topic), &locator);
        topic
    }

    fn create_topic_by_subject_identifier(&mut self, locator: &Locator) -> TopicId {
        if let Some(topic) = self.topic_by_subject_identifier(locator) {
            return topic;
        }
        let topic = match self.construct_by_item_identifier(locator) {
            Some(Construct::Topic(topic)) => topic,
            _ => self.new_topic(),
        };
        self.attach_subject_identifier(topic, locator);
        topic
    }

    fn create_topic_by_subject_locator(&mut self, locator: &Locator) -> TopicId {
        if let Some(topic) = self.topic_by_subject_locator(locator) {
            return topic;
        }
        let topic = self.new_topic();
        self.topic_mut(topic).subject_locators.push(locator.clone());
        self.by_subject_locator.insert(locator.clone(), topic);
        topic
    }

    fn create_topic_by_item_identifier(&mut self, locator: &Locator) -> Result<TopicId, StoreError> {
        match self.construct_by_item_identifier(locator) {
            Some(Construct::Topic(topic)) => return Ok(topic),
            Some(owner) => {
                return Err(StoreError::IdentityConflict {
                    locator: locator.clone(),
                    owner,
                })
            }
            None => {}
        }
        let topic = match self.topic_by_subject_identifier(locator) {
            Some(topic) => topic,
            None => self.new_topic(),
        };
        self.attach_item_identifier(Construct::Topic(topic), locator);
        Ok(topic)
    }

    fn topic_by_subject_identifier(&self, locator: &Locator) -> Option<TopicId> {
        self.by_subject_identifier
            .get(locator)
            .map(|topic| self.canonical(*topic))
    }

    fn topic_by_subject_locator(&self, locator: &Locator) -> Option<TopicId> {
        self.by_subject_locator
            .get(locator)
            .map(|topic| self.canonical(*topic))
    }

    fn construct_by_item_identifier(&self, locator: &Locator) -> Option<Construct> {
        self.by_item_identifier
            .get(locator)
            .map(|construct| self.canonical_construct(*construct))
    }

    fn create_association(&mut self, type_: TopicId, scope: &[TopicId]) -> AssociationId {
        let id = AssociationId::new(self.associations.len());
        self.associations.push(AssociationRecord {
            type_,
            scope: scope.to_vec(),
            roles: Vec::new(),
            item_identifiers: Vec::new(),
            reifier: None,
            removed: false,
        });
        id
    }

    fn create_role(&mut self, parent: AssociationId, type_: TopicId, player: TopicId) -> RoleId {
        let id = RoleId::new(self.roles.len());
        self.roles.push(RoleRecord {
            parent,
            type_,
            player,
            item_identifiers: Vec::new(),
            reifier: None,
            removed: false,
        });
        self.associations[parent.index()].roles.push(id);
        id
    }

    fn create_name(
        &mut self,
        parent: TopicId,
        value: &str,
        type_: Option<TopicId>,
        scope: &[TopicId],
    ) -> NameId {
        let type_ = match type_ {
            Some(type_) => type_,
            None => self.create_topic_by_subject_identifier(&Locator::new(psi::TOPIC_NAME)),
        };
        let parent = self.canonical(parent);
        let id = NameId::new(self.names.len());
        self.names.push(NameRecord {
            parent,
            value: value.to_string(),
            type_,
            scope: scope.to_vec(),
            variants: Vec::new(),
            item_identifiers: Vec::new(),
            reifier: None,
            removed: false,
        });
        self.topic_mut(parent).names.push(id);
        id
    }

    fn create_variant(
        &mut self,
        parent: NameId,
        value: &str,
        datatype: &Locator,
        scope: &[TopicId],
    ) -> VariantId {
        let id = VariantId::new(self.variants.len());
        self.variants.push(VariantRecord {
            parent,
            value: value.to_string(),
            datatype: datatype.clone(),
            scope: scope.to_vec(),
            item_identifiers: Vec::new(),
            reifier: None,
            removed: false,
        });
        self.names[parent.index()].variants.push(id);
        id
    }

    fn create_occurrence(
        &mut self,
        parent: TopicId,
        type_: TopicId,
        value: &str,
        datatype: &Locator,
        scope: &[TopicId],
    ) -> OccurrenceId {
        let parent = self.canonical(parent);
        let id = OccurrenceId::new(self.occurrences.len());
        self.occurrences.push(OccurrenceRecord {
            parent,
            type_,
            value: value.to_string(),
            datatype: datatype.clone(),
            scope: scope.to_vec(),
            item_identifiers: Vec::new(),
            reifier: None,
            removed: false,
        });
        self.topic_mut(parent).occurrences.push(id);
        id
    }

    fn add_subject_identifier(&mut self, topic: TopicId, locator: &Locator) -> Result<(), StoreError> {
        let topic = self.canonical(topic);
        if let Some(existing) = self.topic_by_subject_identifier(locator) {
            if existing != topic {
                self.merge_in(topic, existing)?;
            }
            return Ok(());
        }
        if let Some(Construct::Topic(existing)) = self.construct_by_item_identifier(locator) {
            if existing != topic {
                self.merge_in(topic, existing)?;
            }
        }
        trace!(topic = %topic, locator = %locator, "subject identifier added");
        self.attach_subject_identifier(topic, locator);
        Ok(())
    }

    fn add_subject_locator(&mut self, topic: TopicId, locator: &Locator) -> Result<(), StoreError> {
        let topic = self.canonical(topic);
        if let Some(existing) = self.topic_by_subject_locator(locator) {
            if existing != topic {
                self.merge_in(topic, existing)?;
            }
            return Ok(());
        }
        trace!(topic = %topic, locator = %locator, "subject locator added");
        self.topic_mut(topic).subject_locators.push(locator.clone());
        self.by_subject_locator.insert(locator.clone(), topic);
        Ok(())
    }

    fn add_item_identifier(&mut self, construct: Construct, locator: &Locator) -> Result<(), StoreError> {
        let construct = self.canonical_construct(construct);
        match (self.construct_by_item_identifier(locator), construct) {
            (Some(owner), _) if owner == construct => return Ok(()),
            (Some(Construct::Topic(other)), Construct::Topic(topic)) => {
                return self.merge_in(topic, other);
            }
            (Some(owner), _) => {
                return Err(StoreError::IdentityConflict {
                    locator: locator.clone(),
                    owner,
                })
            }
            (None, _) => {}
        }
        if let Construct::Topic(topic) = construct {
            if let Some(other) = self.topic_by_subject_identifier(locator) {
                if other != topic {
                    self.merge_in(topic, other)?;
                }
            }
        }
        trace!(construct = %construct, locator = %locator, "item identifier added");
        self.attach_item_identifier(construct, locator);
        Ok(())
    }

    fn add_type(&mut self, topic: TopicId, type_: TopicId) {
        let type_ = self.canonical(type_);
        if self.types(topic).contains(&type_) {
            return;
        }
        self.topic_mut(topic).types.push(type_);
    }

    fn set_reifier(&mut self, construct: Construct, reifier: Option<TopicId>) -> Result<(), StoreError> {
        let current = self.reifier(construct);
        let reifier = reifier.map(|topic| self.canonical(topic));
        if current == reifier {
            return Ok(());
        }
        if let Some(topic) = reifier {
            if let Some(reified) = self.topic(topic).reified {
                if reified != construct {
                    return Err(StoreError::ReifierConflict { reified });
                }
            }
        }
        let Some(slot) = self.reifier_slot(construct) else {
            return Ok(());
        };
        *slot = reifier;
        if let Some(old) = current {
            self.topic_mut(old).reified = None;
        }
        if let Some(topic) = reifier {
            self.topic_mut(topic).reified = Some(construct);
        }
        Ok(())
    }

    fn merge_in(&mut self, target: TopicId, other: TopicId) -> Result<(), StoreError> {
        self.merge_topics(target, other)
    }

    fn sanitize(&mut self) {
        self.sanitize_map();
    }

    fn topics(&self) -> Vec<TopicId> {
        (0..self.topics.len())
            .filter(|index| self.merged_into[*index] == *index && !self.topics[*index].removed)
            .map(TopicId::new)
            .collect()
    }

    fn associations(&self) -> Vec<AssociationId> {
        (0..self.associations.len())
            .filter(|index| !self.associations[*index].removed)
            .map(AssociationId::new)
            .collect()
    }

    fn subject_identifiers(&self, topic: TopicId) -> &[Locator] {
        &self.topic(topic).subject_identifiers
    }

    fn subject_locators(&self, topic: TopicId) -> &[Locator] {
        &self.topic(topic).subject_locators
    }

    fn item_identifiers(&self, construct: Construct) -> &[Locator] {
        match construct {
            Construct::TopicMap => &self.item_identifiers,
            Construct::Topic(id) => &self.topic(id).item_identifiers,
            Construct::Association(id) => &self.associations[id.index()].item_identifiers,
            Construct::Role(id) => &self.roles[id.index()].item_identifiers,
            Construct::Name(id) => &self.names[id.index()].item_identifiers,
            Construct::Occurrence(id) => &self.occurrences[id.index()].item_identifiers,
            Construct::Variant(id) => &self.variants[id.index()].item_identifiers,
        }
    }

    fn types(&self, topic: TopicId) -> Vec<TopicId> {
        self.canonical_set(&self.topic(topic).types)
    }

    fn names(&self, topic: TopicId) -> Vec<NameId> {
        self.topic(topic)
            .names
            .iter()
            .copied()
            .filter(|name| !self.names[name.index()].removed)
            .collect()
    }

    fn occurrences(&self, topic: TopicId) -> Vec<OccurrenceId> {
        self.topic(topic)
            .occurrences
            .iter()
            .copied()
            .filter(|occurrence| !self.occurrences[occurrence.index()].removed)
            .collect()
    }

    fn variants(&self, name: NameId) -> Vec<VariantId> {
        self.names[name.index()]
            .variants
            .iter()
            .copied()
            .filter(|variant| !self.variants[variant.index()].removed)
            .collect()
    }

    fn roles(&self, association: AssociationId) -> Vec<RoleId> {
        self.associations[association.index()]
            .roles
            .iter()
            .copied()
            .filter(|role| !self.roles[role.index()].removed)
            .collect()
    }

    fn construct_type(&self, construct: Construct) -> Option<TopicId> {
        let type_ = match construct {
            Construct::Association(id) => self.associations[id.index()].type_,
            Construct::Role(id) => self.roles[id.index()].type_,
            Construct::Name(id) => self.names[id.index()].type_,
            Construct::Occurrence(id) => self.occurrences[id.index()].type_,
            _ => return None,
        };
        Some(self.canonical(type_))
    }

    fn scope(&self, construct: Construct) -> Vec<TopicId> {
        match construct {
            Construct::Association(id) => self.canonical_set(&self.associations[id.index()].scope),
            Construct::Name(id) => self.canonical_set(&self.names[id.index()].scope),
            Construct::Occurrence(id) => self.canonical_set(&self.occurrences[id.index()].scope),
            Construct::Variant(id) => self.canonical_set(&self.variants[id.index()].scope),
            _ => Vec::new(),
        }
    }

    fn value(&self, construct: Construct) -> Option<&str> {
        match construct {
            Construct::Name(id) => Some(&self.names[id.index()].value),
            Construct::Occurrence(id) => Some(&self.occurrences[id.index()].value),
            Construct::Variant(id) => Some(&self.variants[id.index()].value),
            _ => None,
        }
    }

    fn datatype(&self, construct: Construct) -> Option<&Locator> {
        match construct {
            Construct::Occurrence(id) => Some(&self.occurrences[id.index()].datatype),
            Construct::Variant(id) => Some(&self.variants[id.index()].datatype),
            _ => None,
        }
    }

    fn player(&self, role: RoleId) -> TopicId {
        self.canonical(self.roles[role.index()].player)
    }

    fn reifier(&self, construct: Construct) -> Option<TopicId> {
        let reifier = match construct {
            Construct::TopicMap => self.reifier,
            Construct::Topic(_) => None,
            Construct::Association(id) => self.associations[id.index()].reifier,
            Construct::Role(id) => self.roles[id.index()].reifier,
            Construct::Name(id) => self.names[id.index()].reifier,
            Construct::Occurrence(id) => self.occurrences[id.index()].reifier,
            Construct::Variant(id) => self.variants[id.index()].reifier,
        };
        reifier.map(|topic| self.canonical(topic))
    }

    fn reified(&self, topic: TopicId) -> Option<Construct> {
        self.topic(topic).reified
    }

    fn parent(&self, construct: Construct) -> Option<Construct> {
        match construct {
            Construct::TopicMap => None,
            Construct::Topic(_) | Construct::Association(_) => Some(Construct::TopicMap),
            Construct::Role(id) => Some(Construct::Association(self.roles[id.index()].parent)),
            Construct::Name(id) => Some(Construct::Topic(self.canonical(self.names[id.index()].parent))),
            Construct::Occurrence(id) => {
                Some(Construct::Topic(self.canonical(self.occurrences[id.index()].parent)))
            }
            Construct::Variant(id) => Some(Construct::Name(self.variants[id.index()].parent)),
        }
    }
}

//! Topic merging and duplicate removal for [`MemoryTopicMap`].

use super::MemoryTopicMap;
use crate::error::StoreError;
use crate::handle::{Construct, NameId, OccurrenceId, TopicId, VariantId};
use crate::locator::Locator;
use crate::traits::TopicMapStore;
use std::collections::BTreeSet;
use tracing::debug;

impl MemoryTopicMap {
    pub(super) fn merge_topics(&mut self, target: TopicId, other: TopicId) -> Result<(), StoreError> {
        let target = self.canonical(target);
        let other = self.canonical(other);
        if target == other {
            return Ok(());
        }
        if let (Some(left), Some(right)) = (self.topic(target).reified, self.topic(other).reified) {
            return Err(StoreError::MergeConflict { left, right });
        }
        debug!(target = %target, other = %other, "merging topics");

        let absorbed = std::mem::take(&mut self.topics[other.index()]);
        self.merged_into[other.index()] = target.index();

        for locator in absorbed.subject_identifiers {
            self.by_subject_identifier.insert(locator.clone(), target);
            push_unique(&mut self.topics[target.index()].subject_identifiers, locator);
        }
        for locator in absorbed.subject_locators {
            self.by_subject_locator.insert(locator.clone(), target);
            push_unique(&mut self.topics[target.index()].subject_locators, locator);
        }
        for locator in absorbed.item_identifiers {
            self.by_item_identifier
                .insert(locator.clone(), Construct::Topic(target));
            push_unique(&mut self.topics[target.index()].item_identifiers, locator);
        }
        for type_ in absorbed.types {
            self.add_type(target, type_);
        }
        for name in absorbed.names {
            self.names[name.index()].parent = target;
            self.topics[target.index()].names.push(name);
        }
        for occurrence in absorbed.occurrences {
            self.occurrences[occurrence.index()].parent = target;
            self.topics[target.index()].occurrences.push(occurrence);
        }
        if absorbed.reified.is_some() {
            self.topics[target.index()].reified = absorbed.reified;
        }

        self.remove_duplicate_characteristics(target)
    }

    /// Folds equal names and occurrences of `topic` into their first occurrence.
    pub(super) fn remove_duplicate_characteristics(&mut self, topic: TopicId) -> Result<(), StoreError> {
        let topic = self.canonical(topic);

        let mut kept_names: Vec<NameId> = Vec::new();
        for name in self.names(topic) {
            let duplicate_of = kept_names.iter().copied().find(|kept| self.same_name(*kept, name));
            match duplicate_of {
                Some(survivor) => self.absorb_name(survivor, name)?,
                None => kept_names.push(name),
            }
        }
        self.topics[topic.index()].names = kept_names.clone();
        for name in kept_names {
            self.remove_duplicate_variants(name)?;
        }

        let mut kept_occurrences: Vec<OccurrenceId> = Vec::new();
        for occurrence in self.occurrences(topic) {
            let duplicate_of = kept_occurrences
                .iter()
                .copied()
                .find(|kept| self.same_occurrence(*kept, occurrence));
            match duplicate_of {
                Some(survivor) => self.absorb_characteristic(
                    Construct::Occurrence(survivor),
                    Construct::Occurrence(occurrence),
                )?,
                None => kept_occurrences.push(occurrence),
            }
        }
        self.topics[topic.index()].occurrences = kept_occurrences;
        Ok(())
    }

    fn remove_duplicate_variants(&mut self, name: NameId) -> Result<(), StoreError> {
        let mut kept: Vec<VariantId> = Vec::new();
        for variant in self.variants(name) {
            let duplicate_of = kept.iter().copied().find(|k| self.same_variant(*k, variant));
            match duplicate_of {
                Some(survivor) => self.absorb_characteristic(
                    Construct::Variant(survivor),
                    Construct::Variant(variant),
                )?,
                None => kept.push(variant),
            }
        }
        self.names[name.index()].variants = kept;
        Ok(())
    }

    pub(super) fn scope_key(&self, construct: Construct) -> BTreeSet<TopicId> {
        self.scope(construct).into_iter().collect()
    }

    fn same_name(&self, left: NameId, right: NameId) -> bool {
        let (l, r) = (&self.names[left.index()], &self.names[right.index()]);
        l.value == r.value
            && self.canonical(l.type_) == self.canonical(r.type_)
            && self.scope_key(Construct::Name(left)) == self.scope_key(Construct::Name(right))
    }

    fn same_occurrence(&self, left: OccurrenceId, right: OccurrenceId) -> bool {
        let (l, r) = (&self.occurrences[left.index()], &self.occurrences[right.index()]);
        l.value == r.value
            && l.datatype == r.datatype
            && self.canonical(l.type_) == self.canonical(r.type_)
            && self.scope_key(Construct::Occurrence(left))
                == self.scope_key(Construct::Occurrence(right))
    }

    fn same_variant(&self, left: VariantId, right: VariantId) -> bool {
        let (l, r) = (&self.variants[left.index()], &self.variants[right.index()]);
        l.value == r.value
            && l.datatype == r.datatype
            && self.scope_key(Construct::Variant(left)) == self.scope_key(Construct::Variant(right))
    }

    fn absorb_name(&mut self, survivor: NameId, duplicate: NameId) -> Result<(), StoreError> {
        let variants = std::mem::take(&mut self.names[duplicate.index()].variants);
        for variant in variants {
            self.variants[variant.index()].parent = survivor;
            self.names[survivor.index()].variants.push(variant);
        }
        self.absorb_characteristic(Construct::Name(survivor), Construct::Name(duplicate))
    }

    /// Moves identity and reification of `duplicate` onto `survivor` and flags
    /// `duplicate` as removed.
    pub(super) fn absorb_characteristic(
        &mut self,
        survivor: Construct,
        duplicate: Construct,
    ) -> Result<(), StoreError> {
        self.move_item_identifiers(duplicate, survivor);
        self.move_reifier(duplicate, survivor)?;
        match duplicate {
            Construct::Association(id) => self.associations[id.index()].removed = true,
            Construct::Role(id) => self.roles[id.index()].removed = true,
            Construct::Name(id) => self.names[id.index()].removed = true,
            Construct::Occurrence(id) => self.occurrences[id.index()].removed = true,
            Construct::Variant(id) => self.variants[id.index()].removed = true,
            Construct::TopicMap | Construct::Topic(_) => {}
        }
        Ok(())
    }

    fn move_reifier(&mut self, from: Construct, to: Construct) -> Result<(), StoreError> {
        let Some(reifier) = self.reifier(from) else {
            return Ok(());
        };
        if let Some(slot) = self.reifier_slot(from) {
            *slot = None;
        }
        self.topic_mut(reifier).reified = None;
        match self.reifier(to) {
            None => self.set_reifier(to, Some(reifier)),
            Some(existing) if existing != reifier => self.merge_topics(existing, reifier),
            Some(_) => Ok(()),
        }
    }
}

fn push_unique(target: &mut Vec<Locator>, locator: Locator) {
    if !target.contains(&locator) {
        target.push(locator);
    }
}

//! Canonicalization pass for [`MemoryTopicMap`].

use super::MemoryTopicMap;
use crate::handle::{AssociationId, Construct, RoleId, TopicId};
use crate::psi;
use crate::traits::TopicMapStore;
use std::collections::HashSet;
use tracing::{debug, warn};

impl MemoryTopicMap {
    pub(super) fn sanitize_map(&mut self) {
        let promoted = self.promote_type_instance_associations();

        for topic in self.topics() {
            if let Err(err) = self.remove_duplicate_characteristics(topic) {
                warn!(topic = %topic, error = %err, "duplicate characteristics kept");
            }
        }

        let mut duplicates = 0usize;
        let mut kept: Vec<AssociationId> = Vec::new();
        for association in self.associations() {
            let duplicate_of = kept
                .iter()
                .copied()
                .find(|k| self.same_association(*k, association));
            match duplicate_of {
                Some(survivor) => {
                    if let Err(err) = self.absorb_association(survivor, association) {
                        warn!(association = %association, error = %err, "duplicate association kept");
                        kept.push(association);
                    } else {
                        duplicates += 1;
                    }
                }
                None => kept.push(association),
            }
        }

        let dropped = if promoted > 0 {
            self.remove_unused_psi_topics()
        } else {
            0
        };
        debug!(promoted, duplicates, dropped, "topic map sanitized");
    }

    /// Converts `type-instance` associations into topic types.
    ///
    /// Only unscoped associations without item identifiers or reifiers, holding
    /// exactly one `type` and one `instance` role, are promoted.
    fn promote_type_instance_associations(&mut self) -> usize {
        let mut promoted = 0;
        for association in self.associations() {
            let Some((type_, instance)) = self.type_instance_shape(association) else {
                continue;
            };
            self.add_type(instance, type_);
            for role in self.roles(association) {
                self.roles[role.index()].removed = true;
            }
            self.associations[association.index()].removed = true;
            promoted += 1;
        }
        promoted
    }

    fn type_instance_shape(&self, association: AssociationId) -> Option<(TopicId, TopicId)> {
        let construct = Construct::Association(association);
        let type_ = self.construct_type(construct)?;
        if !self.has_subject_identifier(type_, psi::TYPE_INSTANCE)
            || !self.scope(construct).is_empty()
            || !self.item_identifiers(construct).is_empty()
            || self.reifier(construct).is_some()
        {
            return None;
        }
        let roles = self.roles(association);
        if roles.len() != 2 || roles.iter().any(|role| self.has_identity(*role)) {
            return None;
        }
        let mut type_player = None;
        let mut instance_player = None;
        for role in roles {
            let role_type = self.construct_type(Construct::Role(role))?;
            if self.has_subject_identifier(role_type, psi::TYPE) {
                type_player = Some(self.player(role));
            } else if self.has_subject_identifier(role_type, psi::INSTANCE) {
                instance_player = Some(self.player(role));
            }
        }
        Some((type_player?, instance_player?))
    }

    fn has_identity(&self, role: RoleId) -> bool {
        let construct = Construct::Role(role);
        !self.item_identifiers(construct).is_empty() || self.reifier(construct).is_some()
    }

    fn role_signature(&self, association: AssociationId) -> Vec<(TopicId, TopicId)> {
        let mut signature: Vec<(TopicId, TopicId)> = self
            .roles(association)
            .into_iter()
            .filter_map(|role| {
                let type_ = self.construct_type(Construct::Role(role))?;
                Some((type_, self.player(role)))
            })
            .collect();
        signature.sort();
        signature
    }

    fn same_association(&self, left: AssociationId, right: AssociationId) -> bool {
        let (l, r) = (Construct::Association(left), Construct::Association(right));
        self.construct_type(l) == self.construct_type(r)
            && self.scope_key(l) == self.scope_key(r)
            && self.role_signature(left) == self.role_signature(right)
    }

    fn absorb_association(
        &mut self,
        survivor: AssociationId,
        duplicate: AssociationId,
    ) -> Result<(), crate::error::StoreError> {
        let mut unmatched = self.roles(survivor);
        for role in self.roles(duplicate) {
            let key = (self.construct_type(Construct::Role(role)), self.player(role));
            let position = unmatched
                .iter()
                .position(|r| (self.construct_type(Construct::Role(*r)), self.player(*r)) == key);
            if let Some(position) = position {
                let target = unmatched.remove(position);
                self.absorb_characteristic(Construct::Role(target), Construct::Role(role))?;
            }
        }
        self.absorb_characteristic(
            Construct::Association(survivor),
            Construct::Association(duplicate),
        )
    }

    /// Drops the type-instance vocabulary topics once nothing refers to them.
    fn remove_unused_psi_topics(&mut self) -> usize {
        let referenced = self.referenced_topics();
        let mut dropped = 0;
        for reference in [psi::TYPE_INSTANCE, psi::TYPE, psi::INSTANCE] {
            let locator = self.create_locator(reference);
            let Some(topic) = self.topic_by_subject_identifier(&locator) else {
                continue;
            };
            let record = self.topic(topic);
            let bare = record.subject_identifiers.len() == 1
                && record.subject_locators.is_empty()
                && record.item_identifiers.is_empty()
                && record.types.is_empty()
                && self.names(topic).is_empty()
                && self.occurrences(topic).is_empty()
                && record.reified.is_none();
            if bare && !referenced.contains(&topic) {
                self.topic_mut(topic).removed = true;
                self.by_subject_identifier.remove(&locator);
                dropped += 1;
            }
        }
        dropped
    }

    fn referenced_topics(&self) -> HashSet<TopicId> {
        let mut referenced = HashSet::new();
        for topic in self.topics() {
            referenced.extend(self.types(topic));
            for name in self.names(topic) {
                let construct = Construct::Name(name);
                referenced.extend(self.construct_type(construct));
                referenced.extend(self.scope(construct));
                referenced.extend(self.reifier(construct));
                for variant in self.variants(name) {
                    referenced.extend(self.scope(Construct::Variant(variant)));
                    referenced.extend(self.reifier(Construct::Variant(variant)));
                }
            }
            for occurrence in self.occurrences(topic) {
                let construct = Construct::Occurrence(occurrence);
                referenced.extend(self.construct_type(construct));
                referenced.extend(self.scope(construct));
                referenced.extend(self.reifier(construct));
            }
        }
        for association in self.associations() {
            let construct = Construct::Association(association);
            referenced.extend(self.construct_type(construct));
            referenced.extend(self.scope(construct));
            referenced.extend(self.reifier(construct));
            for role in self.roles(association) {
                referenced.extend(self.construct_type(Construct::Role(role)));
                referenced.insert(self.player(role));
                referenced.extend(self.reifier(Construct::Role(role)));
            }
        }
        referenced.extend(self.reifier(Construct::TopicMap));
        referenced
    }
}

//! Store contract consumed by the JTM reader and writer.

use crate::error::StoreError;
use crate::handle::{AssociationId, Construct, NameId, OccurrenceId, RoleId, TopicId, VariantId};
use crate::locator::Locator;

/// Operations a topic-map store exposes to the JTM codec.
///
/// Handles returned by the store are canonical at the time they are returned.
/// A [`TopicId`] that was merged into another topic stays usable: every method
/// resolves it to the surviving topic.
///
/// Calls are issued strictly sequentially; implementations need no internal
/// synchronization.
pub trait TopicMapStore {
    /// Creates a locator from a reference string.
    fn create_locator(&self, reference: &str) -> Locator {
        Locator::new(reference)
    }

    // --- topic factories and identity lookups ---

    /// Creates a topic without caller-supplied identity.
    fn create_topic(&mut self) -> TopicId;

    /// Returns the topic with this subject identifier, creating it if needed.
    fn create_topic_by_subject_identifier(&mut self, locator: &Locator) -> TopicId;

    /// Returns the topic with this subject locator, creating it if needed.
    fn create_topic_by_subject_locator(&mut self, locator: &Locator) -> TopicId;

    /// Returns the topic with this item identifier, creating it if needed.
    ///
    /// Fails if the identifier belongs to a construct that is not a topic.
    fn create_topic_by_item_identifier(&mut self, locator: &Locator) -> Result<TopicId, StoreError>;

    /// Looks up a topic by subject identifier.
    fn topic_by_subject_identifier(&self, locator: &Locator) -> Option<TopicId>;

    /// Looks up a topic by subject locator.
    fn topic_by_subject_locator(&self, locator: &Locator) -> Option<TopicId>;

    /// Looks up any construct by item identifier.
    fn construct_by_item_identifier(&self, locator: &Locator) -> Option<Construct>;

    // --- construct factories ---

    /// Creates an association.
    fn create_association(&mut self, type_: TopicId, scope: &[TopicId]) -> AssociationId;

    /// Creates a role inside `parent`.
    fn create_role(&mut self, parent: AssociationId, type_: TopicId, player: TopicId) -> RoleId;

    /// Creates a name on `parent`; `None` selects the default name type.
    fn create_name(
        &mut self,
        parent: TopicId,
        value: &str,
        type_: Option<TopicId>,
        scope: &[TopicId],
    ) -> NameId;

    /// Creates a variant of `parent`.
    fn create_variant(
        &mut self,
        parent: NameId,
        value: &str,
        datatype: &Locator,
        scope: &[TopicId],
    ) -> VariantId;

    /// Creates an occurrence on `parent`.
    fn create_occurrence(
        &mut self,
        parent: TopicId,
        type_: TopicId,
        value: &str,
        datatype: &Locator,
        scope: &[TopicId],
    ) -> OccurrenceId;

    // --- mutators ---

    /// Adds a subject identifier, merging any topic that already carries it.
    fn add_subject_identifier(&mut self, topic: TopicId, locator: &Locator) -> Result<(), StoreError>;

    /// Adds a subject locator, merging any topic that already carries it.
    fn add_subject_locator(&mut self, topic: TopicId, locator: &Locator) -> Result<(), StoreError>;

    /// Adds an item identifier to any construct.
    fn add_item_identifier(&mut self, construct: Construct, locator: &Locator) -> Result<(), StoreError>;

    /// Adds a type to a topic.
    fn add_type(&mut self, topic: TopicId, type_: TopicId);

    /// Sets or clears the reifier of a construct.
    fn set_reifier(&mut self, construct: Construct, reifier: Option<TopicId>) -> Result<(), StoreError>;

    /// Merges `other` into `target`; `target` survives.
    fn merge_in(&mut self, target: TopicId, other: TopicId) -> Result<(), StoreError>;

    /// Canonicalizes the map: removes duplicates and promotes type-instance
    /// associations into topic types.
    fn sanitize(&mut self);

    // --- accessors ---

    /// Live topics in creation order.
    fn topics(&self) -> Vec<TopicId>;

    /// Live associations in creation order.
    fn associations(&self) -> Vec<AssociationId>;

    /// Subject identifiers of a topic.
    fn subject_identifiers(&self, topic: TopicId) -> &[Locator];

    /// Subject locators of a topic.
    fn subject_locators(&self, topic: TopicId) -> &[Locator];

    /// Item identifiers of any construct.
    fn item_identifiers(&self, construct: Construct) -> &[Locator];

    /// Types of a topic.
    fn types(&self, topic: TopicId) -> Vec<TopicId>;

    /// Names of a topic.
    fn names(&self, topic: TopicId) -> Vec<NameId>;

    /// Occurrences of a topic.
    fn occurrences(&self, topic: TopicId) -> Vec<OccurrenceId>;

    /// Variants of a name.
    fn variants(&self, name: NameId) -> Vec<VariantId>;

    /// Roles of an association.
    fn roles(&self, association: AssociationId) -> Vec<RoleId>;

    /// Type of an association, role, name or occurrence.
    fn construct_type(&self, construct: Construct) -> Option<TopicId>;

    /// Scope of an association, name, occurrence or variant.
    fn scope(&self, construct: Construct) -> Vec<TopicId>;

    /// Value of a name, occurrence or variant.
    fn value(&self, construct: Construct) -> Option<&str>;

    /// Datatype of an occurrence or variant.
    fn datatype(&self, construct: Construct) -> Option<&Locator>;

    /// Player of a role.
    fn player(&self, role: RoleId) -> TopicId;

    /// Reifier of a construct.
    fn reifier(&self, construct: Construct) -> Option<TopicId>;

    /// Construct reified by a topic.
    fn reified(&self, topic: TopicId) -> Option<Construct>;

    /// Parent of a construct; `None` for the topic map itself.
    fn parent(&self, construct: Construct) -> Option<Construct>;
}

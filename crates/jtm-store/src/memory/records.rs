use crate::handle::{AssociationId, Construct, NameId, OccurrenceId, RoleId, TopicId, VariantId};
use crate::locator::Locator;

#[derive(Debug, Default)]
pub(crate) struct TopicRecord {
    pub subject_identifiers: Vec<Locator>,
    pub subject_locators: Vec<Locator>,
    pub item_identifiers: Vec<Locator>,
    pub types: Vec<TopicId>,
    pub names: Vec<NameId>,
    pub occurrences: Vec<OccurrenceId>,
    pub reified: Option<Construct>,
    pub removed: bool,
}

#[derive(Debug)]
pub(crate) struct AssociationRecord {
    pub type_: TopicId,
    pub scope: Vec<TopicId>,
    pub roles: Vec<RoleId>,
    pub item_identifiers: Vec<Locator>,
    pub reifier: Option<TopicId>,
    pub removed: bool,
}

#[derive(Debug)]
pub(crate) struct RoleRecord {
    pub parent: AssociationId,
    pub type_: TopicId,
    pub player: TopicId,
    pub item_identifiers: Vec<Locator>,
    pub reifier: Option<TopicId>,
    pub removed: bool,
}

#[derive(Debug)]
pub(crate) struct NameRecord {
    pub parent: TopicId,
    pub value: String,
    pub type_: TopicId,
    pub scope: Vec<TopicId>,
    pub variants: Vec<VariantId>,
    pub item_identifiers: Vec<Locator>,
    pub reifier: Option<TopicId>,
    pub removed: bool,
}

#[derive(Debug)]
pub(crate) struct OccurrenceRecord {
    pub parent: TopicId,
    pub type_: TopicId,
    pub value: String,
    pub datatype: Locator,
    pub scope: Vec<TopicId>,
    pub item_identifiers: Vec<Locator>,
    pub reifier: Option<TopicId>,
    pub removed: bool,
}

#[derive(Debug)]
pub(crate) struct VariantRecord {
    pub parent: NameId,
    pub value: String,
    pub datatype: Locator,
    pub scope: Vec<TopicId>,
    pub item_identifiers: Vec<Locator>,
    pub reifier: Option<TopicId>,
    pub removed: bool,
}

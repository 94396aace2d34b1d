use jtm_store::psi;
use jtm_store::{Construct, Locator, MemoryTopicMap, StoreError, TopicMapStore};
use pretty_assertions::assert_eq;

fn loc(reference: &str) -> Locator {
    Locator::new(reference)
}

fn sorted(locators: &[Locator]) -> Vec<String> {
    let mut refs: Vec<String> = locators.iter().map(|l| l.reference().to_string()).collect();
    refs.sort();
    refs
}

#[test]
fn test_anonymous_topic_gets_item_identifier() {
    let mut map = MemoryTopicMap::new("http://example.org/map");
    let topic = map.create_topic();

    let iids = map.item_identifiers(Construct::Topic(topic)).to_vec();
    assert_eq!(iids, vec![loc("http://example.org/map#topic-1")]);
    assert_eq!(
        map.construct_by_item_identifier(&iids[0]),
        Some(Construct::Topic(topic))
    );
}

#[test]
fn test_create_by_subject_identifier_is_idempotent() {
    let mut map = MemoryTopicMap::default();
    let first = map.create_topic_by_subject_identifier(&loc("http://x/a"));
    let second = map.create_topic_by_subject_identifier(&loc("http://x/a"));

    assert_eq!(first, second);
    assert_eq!(map.topics().len(), 1);
}

#[test]
fn test_subject_identifier_reuses_topic_with_matching_item_identifier() {
    let mut map = MemoryTopicMap::default();
    let by_iid = map.create_topic_by_item_identifier(&loc("http://x/a")).unwrap();
    let by_sid = map.create_topic_by_subject_identifier(&loc("http://x/a"));

    assert_eq!(by_iid, by_sid);
    assert_eq!(map.topics().len(), 1);
}

#[test]
fn test_merge_unions_identity_and_keeps_target() {
    let mut map = MemoryTopicMap::default();
    let a = map.create_topic_by_subject_identifier(&loc("http://x/a"));
    let b = map.create_topic_by_subject_identifier(&loc("http://x/b"));
    map.add_subject_locator(b, &loc("http://x/b.html")).unwrap();
    let person = map.create_topic_by_subject_identifier(&loc("http://x/Person"));
    map.add_type(b, person);

    map.merge_in(a, b).unwrap();

    assert_eq!(map.canonical(b), a);
    assert_eq!(sorted(map.subject_identifiers(a)), vec!["http://x/a", "http://x/b"]);
    assert_eq!(map.subject_locators(a).to_vec(), vec![loc("http://x/b.html")]);
    assert_eq!(map.types(a), vec![person]);
    assert_eq!(map.topic_by_subject_identifier(&loc("http://x/b")), Some(a));
    assert_eq!(map.topics(), vec![a, person]);
}

#[test]
fn test_merge_removes_duplicate_names() {
    let mut map = MemoryTopicMap::default();
    let a = map.create_topic_by_subject_identifier(&loc("http://x/a"));
    let b = map.create_topic_by_subject_identifier(&loc("http://x/b"));
    map.create_name(a, "Alice", None, &[]);
    let duplicate = map.create_name(b, "Alice", None, &[]);
    map.add_item_identifier(Construct::Name(duplicate), &loc("http://x/name"))
        .unwrap();
    map.create_name(b, "Alicia", None, &[]);

    map.merge_in(a, b).unwrap();

    let names = map.names(a);
    assert_eq!(names.len(), 2);
    // identity of the dropped duplicate moves to the survivor
    assert_eq!(
        map.construct_by_item_identifier(&loc("http://x/name")),
        Some(Construct::Name(names[0]))
    );
}

#[test]
fn test_adding_shared_subject_identifier_merges() {
    let mut map = MemoryTopicMap::default();
    let a = map.create_topic_by_subject_identifier(&loc("http://x/a"));
    let b = map.create_topic_by_subject_identifier(&loc("http://x/b"));

    map.add_subject_identifier(a, &loc("http://x/b")).unwrap();

    assert_eq!(map.topics(), vec![a]);
    assert_eq!(map.canonical(b), a);
}

#[test]
fn test_adding_shared_item_identifier_merges_topics() {
    let mut map = MemoryTopicMap::default();
    let a = map.create_topic_by_subject_identifier(&loc("http://x/a"));
    let b = map.create_topic_by_item_identifier(&loc("http://x/b")).unwrap();

    map.add_item_identifier(Construct::Topic(a), &loc("http://x/b"))
        .unwrap();

    assert_eq!(map.topics().len(), 1);
    assert_eq!(map.canonical(b), a);
}

#[test]
fn test_item_identifier_of_other_construct_conflicts() {
    let mut map = MemoryTopicMap::default();
    let topic = map.create_topic_by_subject_identifier(&loc("http://x/a"));
    let name = map.create_name(topic, "A", None, &[]);
    map.add_item_identifier(Construct::Name(name), &loc("http://x/n"))
        .unwrap();

    let err = map
        .add_item_identifier(Construct::Topic(topic), &loc("http://x/n"))
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::IdentityConflict {
            locator: loc("http://x/n"),
            owner: Construct::Name(name),
        }
    );
    assert!(map.create_topic_by_item_identifier(&loc("http://x/n")).is_err());
}

#[test]
fn test_reifier_cannot_reify_two_constructs() {
    let mut map = MemoryTopicMap::default();
    let topic = map.create_topic_by_subject_identifier(&loc("http://x/a"));
    let first = map.create_name(topic, "A", None, &[]);
    let second = map.create_name(topic, "B", None, &[]);
    let reifier = map.create_topic_by_subject_identifier(&loc("http://x/r"));

    map.set_reifier(Construct::Name(first), Some(reifier)).unwrap();
    assert_eq!(map.reified(reifier), Some(Construct::Name(first)));

    let err = map
        .set_reifier(Construct::Name(second), Some(reifier))
        .unwrap_err();
    assert_eq!(err, StoreError::ReifierConflict { reified: Construct::Name(first) });

    // clearing releases the topic
    map.set_reifier(Construct::Name(first), None).unwrap();
    assert_eq!(map.reified(reifier), None);
    map.set_reifier(Construct::Name(second), Some(reifier)).unwrap();
    assert_eq!(map.reifier(Construct::Name(second)), Some(reifier));
}

#[test]
fn test_merge_of_two_reifiers_conflicts() {
    let mut map = MemoryTopicMap::default();
    let topic = map.create_topic_by_subject_identifier(&loc("http://x/a"));
    let first = map.create_name(topic, "A", None, &[]);
    let second = map.create_name(topic, "B", None, &[]);
    let r1 = map.create_topic_by_subject_identifier(&loc("http://x/r1"));
    let r2 = map.create_topic_by_subject_identifier(&loc("http://x/r2"));
    map.set_reifier(Construct::Name(first), Some(r1)).unwrap();
    map.set_reifier(Construct::Name(second), Some(r2)).unwrap();

    assert!(matches!(
        map.merge_in(r1, r2),
        Err(StoreError::MergeConflict { .. })
    ));
}

#[test]
fn test_untyped_name_gets_default_name_type() {
    let mut map = MemoryTopicMap::default();
    let topic = map.create_topic_by_subject_identifier(&loc("http://x/a"));
    let name = map.create_name(topic, "A", None, &[]);

    let type_ = map.construct_type(Construct::Name(name)).unwrap();
    assert_eq!(map.subject_identifiers(type_).to_vec(), vec![loc(psi::TOPIC_NAME)]);
    assert_eq!(map.parent(Construct::Name(name)), Some(Construct::Topic(topic)));
}

#[test]
fn test_sanitize_promotes_type_instance_associations() {
    let mut map = MemoryTopicMap::default();
    let alice = map.create_topic_by_subject_identifier(&loc("http://x/alice"));
    let person = map.create_topic_by_subject_identifier(&loc("http://x/Person"));
    let type_instance = map.create_topic_by_subject_identifier(&loc(psi::TYPE_INSTANCE));
    let type_role = map.create_topic_by_subject_identifier(&loc(psi::TYPE));
    let instance_role = map.create_topic_by_subject_identifier(&loc(psi::INSTANCE));
    let association = map.create_association(type_instance, &[]);
    map.create_role(association, type_role, person);
    map.create_role(association, instance_role, alice);

    map.sanitize();

    assert_eq!(map.types(alice), vec![person]);
    assert!(map.associations().is_empty());
    assert_eq!(map.topics(), vec![alice, person]);
    assert_eq!(map.topic_by_subject_identifier(&loc(psi::TYPE_INSTANCE)), None);
}

#[test]
fn test_sanitize_keeps_scoped_type_instance_associations() {
    let mut map = MemoryTopicMap::default();
    let alice = map.create_topic_by_subject_identifier(&loc("http://x/alice"));
    let person = map.create_topic_by_subject_identifier(&loc("http://x/Person"));
    let theme = map.create_topic_by_subject_identifier(&loc("http://x/theme"));
    let type_instance = map.create_topic_by_subject_identifier(&loc(psi::TYPE_INSTANCE));
    let type_role = map.create_topic_by_subject_identifier(&loc(psi::TYPE));
    let instance_role = map.create_topic_by_subject_identifier(&loc(psi::INSTANCE));
    let association = map.create_association(type_instance, &[theme]);
    map.create_role(association, type_role, person);
    map.create_role(association, instance_role, alice);

    map.sanitize();

    assert!(map.types(alice).is_empty());
    assert_eq!(map.associations(), vec![association]);
}

#[test]
fn test_sanitize_removes_duplicate_associations() {
    let mut map = MemoryTopicMap::default();
    let type_ = map.create_topic_by_subject_identifier(&loc("http://x/knows"));
    let role_type = map.create_topic_by_subject_identifier(&loc("http://x/party"));
    let player = map.create_topic_by_subject_identifier(&loc("http://x/alice"));

    let first = map.create_association(type_, &[]);
    map.create_role(first, role_type, player);
    let second = map.create_association(type_, &[]);
    let duplicate_role = map.create_role(second, role_type, player);
    map.add_item_identifier(Construct::Association(second), &loc("http://x/dup"))
        .unwrap();
    map.add_item_identifier(Construct::Role(duplicate_role), &loc("http://x/dup-role"))
        .unwrap();

    map.sanitize();

    assert_eq!(map.associations(), vec![first]);
    assert_eq!(
        map.construct_by_item_identifier(&loc("http://x/dup")),
        Some(Construct::Association(first))
    );
    assert_eq!(
        map.construct_by_item_identifier(&loc("http://x/dup-role")),
        Some(Construct::Role(map.roles(first)[0]))
    );
}

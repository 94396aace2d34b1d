use jtm_codec::{PrefixTable, Version, WriteOptions, Writer};
use jtm_store::psi;
use jtm_store::{Construct, Locator, MemoryTopicMap, TopicMapStore};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn loc(reference: &str) -> Locator {
    Locator::new(reference)
}

fn writer(version: Version, prefixes: &[(&str, &str)]) -> Writer {
    let mut table = PrefixTable::new();
    for (prefix, iri) in prefixes {
        table.insert(prefix, iri).unwrap();
    }
    Writer::new(WriteOptions { version, prefixes: table })
}

#[test]
fn test_empty_members_are_omitted() {
    let mut map = MemoryTopicMap::default();
    let topic = map.create_topic_by_subject_identifier(&loc("http://x/a"));

    let object = Writer::default().to_object(&map, Construct::Topic(topic), false);

    assert_eq!(
        object,
        json!({"item_type": "topic", "version": "1.0", "subject_identifiers": ["http://x/a"]})
    );
}

#[test]
fn test_topic_reference_preference() {
    let mut map = MemoryTopicMap::default();
    let by_sid = map.create_topic_by_subject_identifier(&loc("http://x/a"));
    map.add_subject_locator(by_sid, &loc("http://x/a.html")).unwrap();
    let by_slo = map.create_topic_by_subject_locator(&loc("http://x/b.html"));
    map.add_item_identifier(Construct::Topic(by_slo), &loc("http://x/b"))
        .unwrap();
    let by_iid = map.create_topic_by_item_identifier(&loc("http://x/c")).unwrap();

    let writer = Writer::default();
    assert_eq!(writer.topic_reference(&map, by_sid).as_deref(), Some("si:http://x/a"));
    assert_eq!(writer.topic_reference(&map, by_slo).as_deref(), Some("sl:http://x/b.html"));
    assert_eq!(writer.topic_reference(&map, by_iid).as_deref(), Some("ii:http://x/c"));
}

#[test]
fn test_datatype_only_when_not_string() {
    let mut map = MemoryTopicMap::default();
    let topic = map.create_topic_by_subject_identifier(&loc("http://x/a"));
    let type_ = map.create_topic_by_subject_identifier(&loc("http://x/o"));
    let plain = map.create_occurrence(topic, type_, "v", &loc(psi::XSD_STRING), &[]);
    let typed = map.create_occurrence(topic, type_, "1", &loc("http://www.w3.org/2001/XMLSchema#integer"), &[]);

    let writer = Writer::default();
    let plain = writer.to_object(&map, Construct::Occurrence(plain), false);
    let typed = writer.to_object(&map, Construct::Occurrence(typed), false);

    assert_eq!(plain.get("datatype"), None);
    assert_eq!(typed["datatype"], "http://www.w3.org/2001/XMLSchema#integer");
}

#[test]
fn test_compaction_under_1_1() {
    let mut map = MemoryTopicMap::default();
    let topic = map.create_topic_by_subject_identifier(&loc("http://example.org/people/alice"));
    let person = map.create_topic_by_subject_identifier(&loc("http://example.org/Person"));
    map.add_type(topic, person);

    let prefixes = [("ex", "http://example.org/"), ("people", "http://example.org/people/")];
    let object = writer(Version::V1_1, &prefixes).to_object(&map, Construct::Topic(topic), false);

    assert_eq!(
        object,
        json!({
            "item_type": "topic",
            "version": "1.1",
            "prefixes": {"ex": "http://example.org/", "people": "http://example.org/people/"},
            "subject_identifiers": ["[people:alice]"],
            "instance_of": ["si:[ex:Person]"]
        })
    );
}

#[test]
fn test_prefixes_ignored_under_1_0() {
    let mut map = MemoryTopicMap::default();
    let topic = map.create_topic_by_subject_identifier(&loc("http://example.org/alice"));
    let person = map.create_topic_by_subject_identifier(&loc("http://example.org/Person"));
    map.add_type(topic, person);

    let object = writer(Version::V1_0, &[("ex", "http://example.org/")]).to_object(
        &map,
        Construct::Topic(topic),
        false,
    );

    assert_eq!(
        object,
        json!({
            "item_type": "topic",
            "version": "1.0",
            "subject_identifiers": ["http://example.org/alice"]
        })
    );
}

#[test]
fn test_set_prefixes_adds_entries() {
    let mut writer = writer(Version::V1_1, &[("ex", "http://example.org/")]);
    let mut extra = PrefixTable::new();
    extra.insert("foaf", "http://xmlns.com/foaf/0.1/").unwrap();
    writer.set_prefixes(&extra);

    assert_eq!(writer.prefixes().len(), 2);
    assert_eq!(writer.prefixes().get("foaf"), Some("http://xmlns.com/foaf/0.1/"));
}

#[test]
fn test_parent_from_item_identifiers() {
    let mut map = MemoryTopicMap::default();
    let with_iid = map.create_topic_by_item_identifier(&loc("http://x/a")).unwrap();
    let without_iid = map.create_topic_by_subject_identifier(&loc("http://x/b"));
    let type_ = map.create_topic_by_subject_identifier(&loc("http://x/n"));
    let first = map.create_name(with_iid, "A", Some(type_), &[]);
    let second = map.create_name(without_iid, "B", Some(type_), &[]);

    let writer = Writer::default();
    assert_eq!(
        writer.to_object(&map, Construct::Name(first), true),
        json!({
            "item_type": "name",
            "version": "1.0",
            "value": "A",
            "type": "si:http://x/n",
            "parent": ["ii:http://x/a"]
        })
    );
    assert_eq!(writer.to_object(&map, Construct::Name(second), true).get("parent"), None);
    assert_eq!(writer.to_object(&map, Construct::Name(first), false).get("parent"), None);
}

#[test]
fn test_reifier_scope_and_variants() {
    let mut map = MemoryTopicMap::default();
    let topic = map.create_topic_by_subject_identifier(&loc("http://x/a"));
    let theme = map.create_topic_by_subject_identifier(&loc("http://x/en"));
    let sort = map.create_topic_by_subject_identifier(&loc("http://x/sort"));
    let reifier = map.create_topic_by_subject_identifier(&loc("http://x/r"));
    let name = map.create_name(topic, "Alice", None, &[theme]);
    map.create_variant(name, "alice", &loc(psi::XSD_STRING), &[sort]);
    map.set_reifier(Construct::Name(name), Some(reifier)).unwrap();
    map.add_item_identifier(Construct::Name(name), &loc("http://x/name"))
        .unwrap();

    let object = Writer::default().to_object(&map, Construct::Name(name), false);

    assert_eq!(
        object,
        json!({
            "item_type": "name",
            "version": "1.0",
            "value": "Alice",
            "type": format!("si:{}", psi::TOPIC_NAME),
            "scope": ["si:http://x/en"],
            "reifier": "si:http://x/r",
            "item_identifiers": ["http://x/name"],
            "variants": [{"value": "alice", "scope": ["si:http://x/sort"]}]
        })
    );
}

#[test]
fn test_association_export() {
    let mut map = MemoryTopicMap::default();
    let type_ = map.create_topic_by_subject_identifier(&loc("http://x/knows"));
    let role_type = map.create_topic_by_subject_identifier(&loc("http://x/party"));
    let alice = map.create_topic_by_subject_identifier(&loc("http://x/alice"));
    let association = map.create_association(type_, &[]);
    let role = map.create_role(association, role_type, alice);
    map.add_item_identifier(Construct::Association(association), &loc("http://x/assoc"))
        .unwrap();

    let writer = Writer::default();
    assert_eq!(
        writer.to_object(&map, Construct::Association(association), false),
        json!({
            "item_type": "association",
            "version": "1.0",
            "type": "si:http://x/knows",
            "item_identifiers": ["http://x/assoc"],
            "roles": [{"type": "si:http://x/party", "player": "si:http://x/alice"}]
        })
    );
    assert_eq!(
        writer.to_object(&map, Construct::Role(role), true),
        json!({
            "item_type": "role",
            "version": "1.0",
            "type": "si:http://x/party",
            "player": "si:http://x/alice",
            "parent": ["ii:http://x/assoc"]
        })
    );
}

fn typed_map() -> MemoryTopicMap {
    let mut map = MemoryTopicMap::default();
    let alice = map.create_topic_by_subject_identifier(&loc("http://x/alice"));
    let person = map.create_topic_by_subject_identifier(&loc("http://x/Person"));
    map.add_type(alice, person);
    map
}

#[test]
fn test_topic_map_1_0_uses_type_instance_associations() {
    let map = typed_map();

    let object = Writer::default().to_object(&map, Construct::TopicMap, false);

    assert_eq!(
        object,
        json!({
            "item_type": "topicmap",
            "version": "1.0",
            "topics": [
                {"subject_identifiers": ["http://x/alice"]},
                {"subject_identifiers": ["http://x/Person"]}
            ],
            "associations": [{
                "type": format!("si:{}", psi::TYPE_INSTANCE),
                "roles": [
                    {"type": format!("si:{}", psi::TYPE), "player": "si:http://x/Person"},
                    {"type": format!("si:{}", psi::INSTANCE), "player": "si:http://x/alice"}
                ]
            }]
        })
    );
}

#[test]
fn test_topic_map_1_1_uses_instance_of() {
    let map = typed_map();

    let object = writer(Version::V1_1, &[]).to_object(&map, Construct::TopicMap, false);

    assert_eq!(
        object,
        json!({
            "item_type": "topicmap",
            "version": "1.1",
            "topics": [
                {"subject_identifiers": ["http://x/alice"], "instance_of": ["si:http://x/Person"]},
                {"subject_identifiers": ["http://x/Person"]}
            ],
            "associations": []
        })
    );
}

#[test]
fn test_to_text_matches_object() {
    let map = typed_map();
    let writer = Writer::default();

    let text = writer.to_text(&map, Construct::TopicMap, false);
    let parsed: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(parsed, writer.to_object(&map, Construct::TopicMap, false));
}

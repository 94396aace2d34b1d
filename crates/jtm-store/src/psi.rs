/// XML Schema namespace; the only value a JTM `xsd` prefix may map to.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

/// Default datatype of occurrences and variants.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Default type of topic names.
pub const TOPIC_NAME: &str = "http://psi.topicmaps.org/iso13250/model/topic-name";

/// Association type of type-instance relationships.
pub const TYPE_INSTANCE: &str = "http://psi.topicmaps.org/iso13250/model/type-instance";

/// Role type played by the type in a type-instance association.
pub const TYPE: &str = "http://psi.topicmaps.org/iso13250/model/type";

/// Role type played by the instance in a type-instance association.
pub const INSTANCE: &str = "http://psi.topicmaps.org/iso13250/model/instance";

//! Properties parsing, loading and merging.

use presto_bootstrap::properties::{PropertyMap, load_properties, merge};
use tempfile::tempdir;

fn map(pairs: &[(&str, &str)]) -> PropertyMap {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn test_merge_with_empty_override_is_identity() {
    let defaults = map(&[("query.max-memory", "50GB"), ("coordinator", "false")]);
    assert_eq!(merge(defaults.clone(), &PropertyMap::new()), defaults);
}

#[test]
fn test_override_wins_and_keys_are_unioned() {
    let defaults = map(&[("a", "1"), ("b", "2")]);
    let custom = map(&[("b", "3"), ("c", "4")]);

    let merged = merge(defaults, &custom);

    assert_eq!(merged.get("a"), Some("1"));
    assert_eq!(merged.get("b"), Some("3"));
    assert_eq!(merged.get("c"), Some("4"));
    assert_eq!(merged.serialize(), "a=1\nb=3\nc=4");
}

#[test]
fn test_serialization_ignores_insertion_order() {
    let forward = map(&[("x", "1"), ("m", "2"), ("a", "3")]);
    let backward = map(&[("a", "3"), ("m", "2"), ("x", "1")]);
    assert_eq!(forward.serialize(), backward.serialize());
    assert_eq!(forward.serialize(), "a=3\nm=2\nx=1");
}

#[test]
fn test_parse_edge_cases() {
    let parsed = PropertyMap::parse(
        "\n  \nhttp-server.http.port = 8080\ndiscovery.uri=http://host:80/?a=b\nflag\nport=1\nport=2\n",
    );

    assert_eq!(parsed.get("http-server.http.port"), Some("8080"));
    // Only the first '=' separates key from value
    assert_eq!(parsed.get("discovery.uri"), Some("http://host:80/?a=b"));
    // A line without '=' is a key with an empty value
    assert_eq!(parsed.get("flag"), Some(""));
    // Last occurrence wins
    assert_eq!(parsed.get("port"), Some("2"));
    assert_eq!(parsed.len(), 4);
}

#[test]
fn test_load_missing_override_is_empty() {
    let temp = tempdir().unwrap();
    let loaded = load_properties(temp.path(), "config.properties").unwrap();
    assert!(loaded.is_empty());

    let loaded = load_properties(&temp.path().join("does-not-exist"), "config.properties").unwrap();
    assert!(loaded.is_empty());
}

#[test]
fn test_load_existing_override() {
    let temp = tempdir().unwrap();
    std::fs::write(temp.path().join("config.properties"), "query.max-memory=1TB\n\n").unwrap();

    let loaded = load_properties(temp.path(), "config.properties").unwrap();
    assert_eq!(loaded, map(&[("query.max-memory", "1TB")]));
}

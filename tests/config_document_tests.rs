//! npmrc document parsing, mutation, and file tests.

use nodejs_provision::{ConfigDocument, Entry, Error};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn properties(doc: &ConfigDocument) -> Vec<(String, String)> {
    doc.properties()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn comments(doc: &ConfigDocument) -> Vec<String> {
    doc.comments().map(str::to_string).collect()
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn test_parse_properties_and_comments() {
    let doc = ConfigDocument::load(
        "; team defaults\n\
         \n\
         registry = https://registry.npmjs.org/\n\
         @acme:registry=https://npm.acme.com/\n\
         //npm.acme.com/:_auth = dXNlcjpwYXNz\n",
    );

    assert_eq!(
        doc.entries(),
        &[
            Entry::Comment(" team defaults".to_string()),
            Entry::Property {
                key: "registry".to_string(),
                value: "https://registry.npmjs.org/".to_string(),
            },
            Entry::Property {
                key: "@acme:registry".to_string(),
                value: "https://npm.acme.com/".to_string(),
            },
            Entry::Property {
                key: "//npm.acme.com/:_auth".to_string(),
                value: "dXNlcjpwYXNz".to_string(),
            },
        ]
    );
}

#[test]
fn test_only_first_equals_splits() {
    let doc = ConfigDocument::load("_auth = Zm9vOmJhcg==\n");
    assert_eq!(doc.get("_auth"), Some("Zm9vOmJhcg=="));
}

#[test]
fn test_malformed_lines_become_comments() {
    let doc = ConfigDocument::load("just some text\n= no key\nfund = false\n");

    assert_eq!(comments(&doc), vec!["just some text", "= no key"]);
    assert_eq!(properties(&doc), vec![("fund".to_string(), "false".to_string())]);
    assert!(!doc.contains_key(""));
}

#[test]
fn test_empty_content() {
    assert!(ConfigDocument::load("").is_empty());
    assert!(ConfigDocument::load("\n   \n\t\n").is_empty());
}

#[test]
fn test_windows_line_endings() {
    let doc = ConfigDocument::load("; header\r\nregistry = https://r.example.com/\r\n");

    assert_eq!(doc.get("registry"), Some("https://r.example.com/"));
    assert_eq!(comments(&doc), vec![" header"]);
}

// =============================================================================
// Round trip
// =============================================================================

#[test]
fn test_load_serialize_round_trip() {
    let mut doc = ConfigDocument::new();
    doc.add_comment(" managed").unwrap();
    doc.set("registry", "https://registry.example.com/").unwrap();
    doc.add_comment("").unwrap();
    doc.set("//registry.example.com/:always-auth", "true").unwrap();
    doc.set("cache", "/work/.npm").unwrap();
    doc.add_comment(" managed").unwrap();

    let reloaded = ConfigDocument::load(&doc.serialize());

    assert_eq!(properties(&reloaded), properties(&doc));
    assert_eq!(comments(&reloaded), comments(&doc));
    assert_eq!(reloaded, doc);
}

#[test]
fn test_built_documents_read_back_unchanged() {
    let comments = [
        "",
        " ",
        " trailing spaces   ",
        "registry = https://looks.like/a/property",
        ";; doubled marker",
        "\ttabbed",
        " duplicate",
        " duplicate",
    ];
    let properties = [
        ("registry", "https://registry.example.com/"),
        ("  padded-key  ", "  padded value  "),
        ("_auth", "Zm9vOmJhcg=="),
        ("equals", "a=b=c"),
        ("//npm.acme.com/:always-auth", "true"),
        ("@acme:registry", "https://npm.acme.com/"),
        ("empty", ""),
        ("blank", "   "),
        ("leading-marker", ";not a comment"),
        ("unicode", "caf\u{e9} \u{2713}"),
        ("registry", "https://override.example.com/"),
    ];

    // Interleave comments and properties at every offset.
    for offset in 0..comments.len() {
        let mut doc = ConfigDocument::new();
        for (i, (key, value)) in properties.iter().enumerate() {
            doc.add_comment(comments[(i + offset) % comments.len()]).unwrap();
            doc.set(*key, *value).unwrap();
        }

        let reloaded = ConfigDocument::load(&doc.serialize());
        assert_eq!(reloaded, doc, "offset {}", offset);
    }

    let mut only_comments = ConfigDocument::new();
    for text in comments {
        only_comments.add_comment(text).unwrap();
    }
    assert_eq!(ConfigDocument::load(&only_comments.serialize()), only_comments);
}

#[test]
fn test_unreadable_entries_are_rejected() {
    let mut doc = ConfigDocument::new();

    assert!(matches!(doc.set(";k", "v"), Err(Error::InvalidEntry { .. })));
    assert!(matches!(doc.set("k=x", "v"), Err(Error::InvalidEntry { .. })));
    assert!(matches!(doc.set("", "v"), Err(Error::InvalidEntry { .. })));
    assert!(matches!(
        doc.set("k", "v\nstrict-ssl = false"),
        Err(Error::InvalidEntry { .. })
    ));
    assert!(matches!(
        doc.add_comment("note\r\nregistry = x"),
        Err(Error::InvalidEntry { .. })
    ));
    assert!(doc.is_empty());
}

#[test]
fn test_serialized_form() {
    let doc = ConfigDocument::load(";a\nkey=value\n");
    assert_eq!(doc.serialize(), ";a\nkey = value\n");
    assert_eq!(ConfigDocument::new().serialize(), "");
}

// =============================================================================
// Comments
// =============================================================================

#[test]
fn test_duplicate_comments_are_kept() {
    let mut doc = ConfigDocument::new();
    doc.add_comment(" generated").unwrap();
    doc.add_comment(" generated").unwrap();

    assert_eq!(doc.len(), 2);
    assert_eq!(doc.serialize(), "; generated\n; generated\n");
}

#[test]
fn test_comment_text_does_not_collide_with_keys() {
    let mut doc = ConfigDocument::new();
    doc.add_comment("registry").unwrap();
    doc.set("registry", "https://registry.example.com/").unwrap();

    assert_eq!(doc.get("registry"), Some("https://registry.example.com/"));
    assert_eq!(doc.serialize(), ";registry\nregistry = https://registry.example.com/\n");
}

// =============================================================================
// Mutation
// =============================================================================

#[test]
fn test_set_keeps_position_of_existing_key() {
    let mut doc = ConfigDocument::load("a = 1\nb = 2\nc = 3\n");
    doc.set("b", "20").unwrap();
    doc.set("d", "4").unwrap();

    assert_eq!(doc.serialize(), "a = 1\nb = 20\nc = 3\nd = 4\n");
}

#[test]
fn test_remove() {
    let mut doc = ConfigDocument::load(";note\na = 1\nb = 2\n");

    assert_eq!(doc.remove("a"), Some("1".to_string()));
    assert_eq!(doc.remove("a"), None);
    assert_eq!(doc.remove("note"), None);
    assert_eq!(doc.serialize(), ";note\nb = 2\n");
}

#[test]
fn test_get_bool() {
    let doc = ConfigDocument::load("always-auth = true\nstrict-ssl = FALSE\nloglevel = warn\n");

    assert_eq!(doc.get_bool("always-auth"), Some(true));
    assert_eq!(doc.get_bool("strict-ssl"), Some(false));
    assert_eq!(doc.get_bool("loglevel"), None);
    assert_eq!(doc.get_bool("missing"), None);
}

#[test]
fn test_from_str() {
    let doc: ConfigDocument = "fund = false".parse().unwrap();
    assert_eq!(doc.get("fund"), Some("false"));
}

// =============================================================================
// Files
// =============================================================================

#[test]
fn test_write_and_load_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".npmrc");

    let mut doc = ConfigDocument::new();
    doc.add_comment(" written by test").unwrap();
    doc.set("registry", "https://registry.example.com/").unwrap();
    doc.write_file(&path).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "; written by test\nregistry = https://registry.example.com/\n"
    );
    assert_eq!(ConfigDocument::load_file(&path).unwrap(), doc);
}

#[test]
fn test_load_missing_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing.npmrc");

    match ConfigDocument::load_file(&path) {
        Err(Error::FileNotFound(p)) => assert_eq!(p, path),
        other => panic!("Expected FileNotFound error, got: {:?}", other),
    }
}

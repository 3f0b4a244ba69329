use frontmatter_collection::collection::sort::{SortOrder, by_field, field};
use frontmatter_collection::collection::{CollectionCompiler, CollectionConfig, FailureStage};
use frontmatter_collection::core::CollectionError;
use frontmatter_collection::module::ModuleAggregator;
use frontmatter_collection::schema::{FieldSchema, ObjectSchema};
use frontmatter_collection::test_utils::{ContentFixture, ContentProject};
use serde_json::{Value, json};

fn note_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field("title", FieldSchema::string())
        .field("rank", FieldSchema::integer().optional())
        .field("published", FieldSchema::boolean().with_default(json!(true)))
}

fn notes_project() -> ContentProject {
    let project = ContentProject::new().unwrap();
    for (name, yaml) in [
        ("one", "title: One\nrank: 2"),
        ("two", "title: Two\nrank: 1\npublished: false"),
        ("three", "title: Three\nrank: 2"),
        ("four", "title: Four"),
        ("five", "title: Five\nrank: 3"),
    ] {
        project
            .add(&ContentFixture::with_yaml(format!("notes/{name}.md"), yaml))
            .unwrap();
    }
    project
}

fn titles(entries: &[Value]) -> Vec<&str> {
    entries.iter().map(|e| e["title"].as_str().unwrap()).collect()
}

#[test]
fn test_compile_is_deterministic() {
    let project = notes_project();
    let config = CollectionConfig::new("notes", "notes/*.md").schema(note_schema());
    let compiler = CollectionCompiler::new(project.path());

    let first = compiler.compile(&config).unwrap();
    let second = compiler.compile(&config).unwrap();
    assert_eq!(first.entries, second.entries);
    assert_eq!(titles(&first.entries), vec!["Five", "Four", "One", "Three", "Two"]);
}

#[test]
fn test_sort_descending_keeps_ties_in_file_order() {
    let project = notes_project();
    let config = CollectionConfig::new("notes", "notes/*.md")
        .schema(note_schema())
        .sort(by_field("rank", SortOrder::Descending));

    let compiled = CollectionCompiler::new(project.path()).compile(&config).unwrap();
    assert_eq!(titles(&compiled.entries), vec!["Five", "One", "Three", "Two", "Four"]);

    let ranks: Vec<i64> = compiled
        .entries
        .iter()
        .filter_map(|e| field(e, "rank").and_then(Value::as_i64))
        .collect();
    assert!(ranks.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_every_entry_satisfies_filter() {
    let project = notes_project();
    let config = CollectionConfig::new("notes", "notes/*.md")
        .schema(note_schema())
        .filter(|entry| entry["published"] == json!(true));

    let compiled = CollectionCompiler::new(project.path()).compile(&config).unwrap();
    assert_eq!(compiled.entries.len(), 4);
    assert!(compiled.entries.iter().all(|e| e["published"] == json!(true)));
    assert_eq!(compiled.report.retained, 4);
}

#[test]
fn test_one_invalid_file_is_isolated() {
    let project = notes_project();
    project
        .add(&ContentFixture::with_yaml("notes/broken.md", "rank: high"))
        .unwrap();
    project
        .add(&ContentFixture::new("notes/garbled.md", "---\ntitle: [unclosed\n---\n"))
        .unwrap();

    let config = CollectionConfig::new("notes", "notes/*.md").schema(note_schema());
    let compiled = CollectionCompiler::new(project.path()).compile(&config).unwrap();

    assert_eq!(compiled.entries.len(), 5);
    assert_eq!(compiled.report.matched, 7);
    assert_eq!(compiled.report.failures.len(), 2);

    let broken = &compiled.report.failures[0];
    assert_eq!(broken.file_path, "notes/broken.md");
    assert_eq!(broken.stage, FailureStage::Validate);
    assert!(broken.cause.contains("title: required"));
    assert!(broken.cause.contains("rank: expected integer"));

    let garbled = &compiled.report.failures[1];
    assert_eq!(garbled.file_path, "notes/garbled.md");
    assert_eq!(garbled.stage, FailureStage::Extract);
}

#[test]
fn test_entries_carry_file_path_when_declared() {
    let project = notes_project();
    let schema = ObjectSchema::new()
        .field("title", FieldSchema::string())
        .field("filePath", FieldSchema::string());
    let config = CollectionConfig::new("notes", "notes/f*.md").schema(schema);

    let compiled = CollectionCompiler::new(project.path()).compile(&config).unwrap();
    assert_eq!(
        compiled.entries,
        vec![
            json!({"filePath": "notes/five.md", "title": "Five"}),
            json!({"filePath": "notes/four.md", "title": "Four"}),
        ]
    );
}

#[test]
fn test_missing_contract_fails_before_reading() {
    let project = notes_project();
    let configs = vec![
        CollectionConfig::new("notes", "notes/*.md")
            .parse_front_matter(|raw| panic!("{} should not be read", raw.file_path())),
        CollectionConfig::new("orphans", "orphans/*.md"),
    ];

    let err = ModuleAggregator::new(project.path()).aggregate(&configs).unwrap_err();
    assert_eq!(
        err.downcast_ref::<CollectionError>(),
        Some(&CollectionError::MissingContract {
            collection: "orphans".to_string()
        })
    );
}

#[test]
fn test_empty_match_exports_empty_array() {
    let project = ContentProject::new().unwrap();
    let configs = vec![CollectionConfig::new("nothing", "missing/**/*.md").schema(note_schema())];

    let body = ModuleAggregator::new(project.path()).aggregate(&configs).unwrap();
    assert_eq!(body, "export const nothing = [];\n");
}

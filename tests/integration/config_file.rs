use frontmatter_collection::config::load_options;
use frontmatter_collection::constants::VIRTUAL_MODULE_ID;
use frontmatter_collection::core::{CollectionError, user_friendly_error};
use frontmatter_collection::plugin::{BuildPlugin, FrontmatterCollectionPlugin};
use frontmatter_collection::test_utils::{ContentFixture, ContentProject};
use serde_json::json;

const CONFIG: &str = r#"
types_path = "types/content.d.ts"

[[collections]]
name = "posts"
include = "content/posts/**/*.mdx"
ignore = ["**/drafts/**"]
sort = { field = "date", order = "desc" }

[collections.schema]
title = "string"
date = "date"
tags = "string[]?"

[[collections]]
name = "authors"
include = "content/authors/*.md"
"#;

#[test]
fn test_configured_plugin_end_to_end() {
    let project = ContentProject::new().unwrap();
    project.write_config(CONFIG).unwrap();
    project.add(&ContentFixture::post("a", "A", "2024-01-01")).unwrap();
    project.add(&ContentFixture::post("b", "B", "2024-02-01")).unwrap();
    project
        .add(&ContentFixture::new(
            "content/posts/drafts/c.mdx",
            "---\ntitle: C\ndate: 2024-03-01\n---\n",
        ))
        .unwrap();
    project
        .add(&ContentFixture::with_yaml("content/authors/ada.md", "name: Ada\nrole: author"))
        .unwrap();

    let mut options = load_options(project.path()).unwrap();
    let authors = options.collection_mut("authors").unwrap();
    *authors = authors
        .clone()
        .parse_front_matter(|raw| Ok(json!({ "name": raw.get("name").cloned().unwrap_or_default() })));

    let mut plugin = FrontmatterCollectionPlugin::new(options).unwrap();
    plugin.config_resolved(project.path()).unwrap();

    let declaration = project.read("types/content.d.ts").unwrap();
    assert!(declaration.contains("export const posts: { date: string; tags?: string[]; title: string }[];"));
    assert!(!declaration.contains("authors"));

    let id = plugin.resolve_id(VIRTUAL_MODULE_ID).unwrap();
    let body = plugin.load(&id).unwrap().unwrap();
    assert_eq!(
        body,
        "export const posts = [{\"date\":\"2024-02-01\",\"title\":\"B\"},\
         {\"date\":\"2024-01-01\",\"title\":\"A\"}];\n\
         export const authors = [{\"name\":\"Ada\"}];\n"
    );
}

#[test]
fn test_collection_without_contract_in_config() {
    let project = ContentProject::new().unwrap();
    project.write_config(CONFIG).unwrap();

    let mut plugin = FrontmatterCollectionPlugin::new(load_options(project.path()).unwrap()).unwrap();
    plugin.config_resolved(project.path()).unwrap();

    let id = plugin.resolve_id(VIRTUAL_MODULE_ID).unwrap();
    let err = plugin.load(&id).unwrap_err();
    assert_eq!(
        err.downcast_ref::<CollectionError>(),
        Some(&CollectionError::MissingContract {
            collection: "authors".to_string()
        })
    );
}

#[test]
fn test_malformed_config_reports_file() {
    let project = ContentProject::new().unwrap();
    project.write_config("[[collections]]\nname = 1\n").unwrap();

    let err = load_options(project.path()).unwrap_err();
    let context = user_friendly_error(err);
    match &context.error {
        CollectionError::ConfigParse { file, .. } => {
            assert!(file.ends_with("frontmatter-collection.toml"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

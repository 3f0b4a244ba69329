use frontmatter_collection::collection::CollectionConfig;
use frontmatter_collection::collection::sort::{SortOrder, by_field};
use frontmatter_collection::constants::{DEFAULT_TYPES_PATH, VIRTUAL_MODULE_ID};
use frontmatter_collection::plugin::{BuildPlugin, FrontmatterCollectionPlugin, PluginOptions};
use frontmatter_collection::schema::{FieldSchema, ObjectSchema};
use frontmatter_collection::test_utils::{ContentFixture, ContentProject, init_test_logging};
use std::path::Path;

use super::HostGraph;

fn posts() -> CollectionConfig {
    CollectionConfig::new("posts", "content/posts/*.mdx")
        .schema(
            ObjectSchema::new()
                .field("title", FieldSchema::string())
                .field("date", FieldSchema::date()),
        )
        .sort(by_field("date", SortOrder::Descending))
}

fn load(plugin: &mut FrontmatterCollectionPlugin) -> String {
    let id = plugin.resolve_id(VIRTUAL_MODULE_ID).unwrap();
    plugin.load(&id).unwrap().unwrap()
}

#[test]
fn test_posts_sorted_newest_first() {
    init_test_logging(None);
    let project = ContentProject::new().unwrap();
    project.add(&ContentFixture::post("a", "A", "2024-01-01")).unwrap();
    project.add(&ContentFixture::post("b", "B", "2024-02-01")).unwrap();

    let mut plugin = FrontmatterCollectionPlugin::new(PluginOptions::new(vec![posts()])).unwrap();
    plugin.config_resolved(project.path()).unwrap();

    assert_eq!(
        load(&mut plugin),
        "export const posts = [{\"date\":\"2024-02-01\",\"title\":\"B\"},\
         {\"date\":\"2024-01-01\",\"title\":\"A\"}];\n"
    );
}

#[test]
fn test_declaration_written_on_config_resolved() {
    let project = ContentProject::new().unwrap();
    let raw = CollectionConfig::new("raw", "content/raw/*.md")
        .parse_front_matter(|raw| Ok(raw.to_value()));

    let mut plugin =
        FrontmatterCollectionPlugin::new(PluginOptions::new(vec![posts(), raw])).unwrap();
    plugin.config_resolved(project.path()).unwrap();

    let declaration = project.read(DEFAULT_TYPES_PATH).unwrap();
    assert_eq!(
        declaration,
        "// This file is generated by frontmatter-collection. Do not edit it by hand.\n\
         \n\
         declare module \"virtual:frontmatter-collection\" {\n  \
         export const posts: { date: string; title: string }[];\n\
         }\n"
    );

    plugin.config_resolved(project.path()).unwrap();
    assert_eq!(project.read(DEFAULT_TYPES_PATH).unwrap(), declaration);
}

#[test]
fn test_edit_invalidate_reload_cycle() {
    let project = ContentProject::new().unwrap();
    project.add(&ContentFixture::post("a", "A", "2024-01-01")).unwrap();

    let options = PluginOptions::new(vec![posts()]).generate_dts(false);
    let mut plugin = FrontmatterCollectionPlugin::new(options).unwrap();
    plugin.config_resolved(project.path()).unwrap();
    let mut graph = HostGraph::with_virtual_module();

    let first = load(&mut plugin);
    assert!(first.contains("\"title\":\"A\""));

    let added = project.add(&ContentFixture::post("c", "C", "2024-03-01")).unwrap();
    assert!(plugin.handle_hot_update(&added, &mut graph));
    assert!(plugin.state().is_stale());
    assert_eq!(graph.invalidations.len(), 1);

    let second = load(&mut plugin);
    assert!(!plugin.state().is_stale());
    assert!(second.starts_with("export const posts = [{\"date\":\"2024-03-01\",\"title\":\"C\"}"));

    project.remove("content/posts/a.mdx").unwrap();
    assert!(plugin.handle_hot_update(&project.path().join("content/posts/a.mdx"), &mut graph));
    let third = load(&mut plugin);
    assert!(!third.contains("\"title\":\"A\""));
}

#[test]
fn test_non_content_changes_are_ignored() {
    let project = ContentProject::new().unwrap();
    let mut plugin = FrontmatterCollectionPlugin::new(PluginOptions::new(vec![posts()])).unwrap();
    plugin.config_resolved(project.path()).unwrap();
    let mut graph = HostGraph::with_virtual_module();

    for path in ["src/main.ts", "styles/app.css", "content/posts/image.png", "README"] {
        assert!(!plugin.handle_hot_update(Path::new(path), &mut graph));
    }
    assert!(!plugin.state().is_stale());
    assert!(graph.invalidations.is_empty());

    assert!(plugin.handle_hot_update(Path::new("content/notes/x.md"), &mut graph));
    assert!(plugin.state().is_stale());
}

#[test]
fn test_missing_contract_fails_load() {
    let project = ContentProject::new().unwrap();
    project.add(&ContentFixture::post("a", "A", "2024-01-01")).unwrap();

    let options =
        PluginOptions::new(vec![posts(), CollectionConfig::new("bare", "*.md")]).generate_dts(false);
    let mut plugin = FrontmatterCollectionPlugin::new(options).unwrap();
    plugin.config_resolved(project.path()).unwrap();

    let id = plugin.resolve_id(VIRTUAL_MODULE_ID).unwrap();
    let err = plugin.load(&id).unwrap_err();
    assert!(err.to_string().contains("'bare'"), "{err:#}");
    assert!(plugin.state().body().is_none());
}

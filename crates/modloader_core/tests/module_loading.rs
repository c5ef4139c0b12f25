use modloader_core::{
    DirectoryArtifactStore, ExtensionContent, ExtensionResolver, LoaderConfig, MediaType,
    ModuleLoadError, ModuleLoader, ModuleLoaders, RuntimeEnvironment, TypeRegistry,
};
use std::error::Error;
use std::path::Path;
use std::sync::Arc;

const DASHBOARD_DESCRIPTOR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<module configVersion="1.4">
    <id>dashboards</id>
    <name>Dashboards</name>
    <version>2.1.0</version>
    <package>org.example.dashboards</package>
    <require_version>1.9</require_version>
    <extension>
        <point>org.example.header</point>
        <class>org.example.dashboards.HeaderLink</class>
    </extension>
    <extension>
        <point>org.example.footer</point>
        <class>org.example.dashboards.FooterLink</class>
    </extension>
    <conditionalResources>
        <conditionalResource>
            <path>/lib/dashboards-api-1.9.*</path>
            <openmrsVersion>1.9</openmrsVersion>
        </conditionalResource>
        <conditionalResource>
            <path>/lib/dashboards-reporting.*</path>
            <modules>
                <module>
                    <moduleId>reporting</moduleId>
                    <version>0.7</version>
                </module>
            </modules>
        </conditionalResource>
    </conditionalResources>
</module>
"#;

#[derive(Default)]
struct HeaderLink;

impl ExtensionContent for HeaderLink {
    fn media_type(&self) -> Option<MediaType> {
        Some(MediaType::Html)
    }
}

#[derive(Default)]
struct FooterLink;

impl ExtensionContent for FooterLink {
    fn media_type(&self) -> Option<MediaType> {
        Some(MediaType::Text)
    }

    fn override_content(&self, original: &str) -> Option<String> {
        Some(format!("{original} | dashboards"))
    }
}

fn write_module(dir: &Path, contents: &str) {
    std::fs::write(dir.join("config.xml"), contents).unwrap();
}

fn loader_for_platform(platform_version: &str) -> ModuleLoader<DirectoryArtifactStore> {
    let config = LoaderConfig::for_platform(platform_version).unwrap();
    ModuleLoader::new(DirectoryArtifactStore::new(&config), config)
}

#[test]
fn loads_module_from_unpacked_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_module(dir.path(), DASHBOARD_DESCRIPTOR);

    let module = loader_for_platform("1.9.4").load(dir.path()).unwrap();
    assert_eq!(module.module_id(), "dashboards");
    assert_eq!(module.descriptor().version, "2.1.0");
    assert_eq!(module.descriptor().conditional_resources.len(), 2);
    assert_eq!(module.extension_names().unwrap().len(), 2);
    assert!(module.extensions().is_empty());
}

#[test]
fn each_load_yields_a_distinct_module() {
    let dir = tempfile::tempdir().unwrap();
    write_module(dir.path(), DASHBOARD_DESCRIPTOR);
    let loader = loader_for_platform("1.9.4");

    let first = loader.load(dir.path()).unwrap();
    let second = loader.load(dir.path()).unwrap();
    assert!(!first.same_as(&second));
    assert_ne!(first.instance_id(), second.instance_id());
}

#[test]
fn missing_descriptor_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = loader_for_platform("1.9.4").load(dir.path()).unwrap_err();

    match &err {
        ModuleLoadError::Io { location, source } => {
            assert_eq!(location.as_path(), dir.path());
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.source().is_some());
}

#[test]
fn invalid_conditional_resources_fail_the_load() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        r#"<module configVersion="1.2">
            <id>broken</id>
            <conditionalResources>
                <resource><path>/lib/a.jar</path></resource>
            </conditionalResources>
        </module>"#,
    );

    let err = loader_for_platform("1.9.4").load(dir.path()).unwrap_err();
    assert!(matches!(err, ModuleLoadError::Descriptor { .. }));
    assert!(err.to_string().contains("invalid module descriptor"));
}

#[test]
fn unmet_platform_requirement_still_loads() {
    let dir = tempfile::tempdir().unwrap();
    write_module(dir.path(), DASHBOARD_DESCRIPTOR);

    let module = loader_for_platform("1.8.2").load(dir.path()).unwrap();
    assert_eq!(module.module_id(), "dashboards");
    assert!(!module.descriptor().supports_platform(&LoaderConfig::for_platform("1.8.2").unwrap()));
}

#[test]
fn reports_inactive_resources_for_environment() {
    let dir = tempfile::tempdir().unwrap();
    write_module(dir.path(), DASHBOARD_DESCRIPTOR);

    let old_platform = loader_for_platform("1.8.2");
    let module = old_platform.load(dir.path()).unwrap();
    let bare = RuntimeEnvironment::new("1.8.2");
    assert_eq!(
        old_platform.inactive_resource_paths(&module, &bare),
        vec!["/lib/dashboards-api-1.9.*", "/lib/dashboards-reporting.*"]
    );

    let current = loader_for_platform("1.9.0");
    let with_reporting = RuntimeEnvironment::new("1.9.0").with_module("reporting", "0.7.2");
    assert!(current
        .inactive_resource_paths(&module, &with_reporting)
        .is_empty());

    let outdated_reporting = RuntimeEnvironment::new("1.9.0").with_module("reporting", "0.6");
    assert_eq!(
        current.inactive_resource_paths(&module, &outdated_reporting),
        vec!["/lib/dashboards-reporting.*"]
    );
}

#[test]
fn loaded_module_expands_declared_extensions() {
    let dir = tempfile::tempdir().unwrap();
    write_module(dir.path(), DASHBOARD_DESCRIPTOR);
    let module = loader_for_platform("1.9.4").load(dir.path()).unwrap();

    let mut registry = TypeRegistry::new();
    registry
        .register_default::<HeaderLink>("org.example.dashboards.HeaderLink")
        .unwrap();
    registry
        .register_default::<FooterLink>("org.example.dashboards.FooterLink")
        .unwrap();
    let loaders = Arc::new(ModuleLoaders::new());
    let resolver = ExtensionResolver::new(loaders.clone());

    // Not yet activated: nothing can be instantiated.
    assert!(module.expand_extensions(&resolver).is_empty());

    loaders.activate("dashboards", Arc::new(registry)).unwrap();
    let extensions = module.expand_extensions(&resolver);
    let ids: Vec<String> = extensions.iter().map(|e| e.extension_id()).collect();
    assert_eq!(ids, vec!["org.example.header|html", "org.example.footer|text"]);
    assert_eq!(
        extensions[1].override_content("home").as_deref(),
        Some("home | dashboards")
    );
    assert_eq!(extensions[0].override_content("home"), None);

    let again = module.expand_extensions(&resolver);
    assert!(again[0].same_instance(&extensions[0]));
    assert!(again[1].same_instance(&extensions[1]));
}

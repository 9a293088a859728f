//! Descriptor provider and scoped metadata loading.

#![allow(clippy::unwrap_used)]

use crate::helpers::library_fixtures::*;
use axaml::assembly::descriptor::{DescriptorProvider, LibraryDescriptor, ResourceDescriptor};
use axaml::assembly::AssemblyProvider;
use axaml::metadata::builtins::AVALONIA_NAMESPACE;
use axaml::metadata::{AVALONIA_RESOURCES, ConverterOptions};
use axaml::project::{library_paths, load_metadata, read_reference_list};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

pub fn write_library(dir: &Path, library: &LibraryDescriptor) -> PathBuf {
    let path = dir.join(format!("{}.json", library.name));
    fs::write(&path, library.to_json().unwrap()).unwrap();
    path
}

fn library_names(provider: &DescriptorProvider, paths: &[PathBuf]) -> (Option<String>, Vec<String>) {
    let session = provider.open_session(paths).unwrap();
    let target = session.target_assembly_name().map(str::to_string);
    let names = session
        .assemblies()
        .iter()
        .map(|a| a.name().to_string())
        .collect();
    (target, names)
}

#[test]
fn test_provider_keeps_input_order() {
    let temp = TempDir::new().unwrap();
    let app = write_library(temp.path(), &app_library());
    let core = write_library(temp.path(), &core_library());

    let (target, names) = library_names(&DescriptorProvider, &[app, core]);
    assert_eq!(target.as_deref(), Some(APP_LIBRARY));
    assert_eq!(names, vec![APP_LIBRARY, CORE_LIBRARY]);
}

#[test]
fn test_provider_skips_unreadable_libraries() {
    let temp = TempDir::new().unwrap();
    let app = write_library(temp.path(), &app_library());
    let garbage = temp.path().join("Garbage.json");
    fs::write(&garbage, "{ not json").unwrap();
    let missing = temp.path().join("Missing.json");
    let core = write_library(temp.path(), &core_library());

    let (target, names) = library_names(&DescriptorProvider, &[app, garbage, missing, core]);
    assert_eq!(target.as_deref(), Some(APP_LIBRARY));
    assert_eq!(names, vec![APP_LIBRARY, CORE_LIBRARY]);
}

#[test]
fn test_unreadable_primary_still_names_the_target() {
    let temp = TempDir::new().unwrap();
    let broken = temp.path().join("Broken.App.json");
    let core = write_library(temp.path(), &core_library());

    let (target, names) = library_names(&DescriptorProvider, &[broken, core]);
    assert_eq!(target.as_deref(), Some("Broken.App"));
    assert_eq!(names, vec![CORE_LIBRARY]);
}

#[test]
fn test_load_metadata_releases_handles() {
    let temp = TempDir::new().unwrap();
    let paths = vec![
        write_library(temp.path(), &app_library()),
        write_library(temp.path(), &core_library()),
    ];

    let metadata = load_metadata(
        &DescriptorProvider,
        &paths,
        &ConverterOptions::default(),
        &CancellationToken::new(),
    )
    .unwrap()
    .unwrap();

    assert!(!metadata.has_handles());
    assert!(metadata.lookup(AVALONIA_NAMESPACE, "Button").is_some());
    assert!(metadata.lookup("using:MyApp.Views", "MainWindow").is_some());
}

#[test]
fn test_cancelled_load_returns_none() {
    let temp = TempDir::new().unwrap();
    let paths = vec![write_library(temp.path(), &app_library())];
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = load_metadata(&DescriptorProvider, &paths, &ConverterOptions::default(), &cancel);
    assert!(result.unwrap().is_none());
}

#[test]
fn test_reference_list_selects_libraries() {
    let temp = TempDir::new().unwrap();
    let app = write_library(temp.path(), &app_library());
    let core = write_library(temp.path(), &core_library());
    let list = temp.path().join("references.txt");
    fs::write(&list, format!("{}\n\n{}\n", core.display(), app.display())).unwrap();

    let references = read_reference_list(&list).unwrap();
    let paths = library_paths(&app, &references);
    assert_eq!(paths, vec![app, core]);

    let metadata = load_metadata(
        &DescriptorProvider,
        &paths,
        &ConverterOptions::default(),
        &CancellationToken::new(),
    )
    .unwrap()
    .unwrap();
    let main_window = metadata.find_type("MyApp.Views.MainWindow").unwrap();
    assert!(main_window.property("Name").is_some());
}

#[test]
fn test_missing_reference_list_is_an_error() {
    let temp = TempDir::new().unwrap();
    assert!(read_reference_list(&temp.path().join("absent.txt")).is_err());
}

#[test]
fn test_resource_file_next_to_descriptor() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("MyApp.res"),
        resource_blob(&[("/Views/MainWindow.axaml", "<Window/>")]),
    )
    .unwrap();
    let mut app = app_library();
    app.resources.push(ResourceDescriptor {
        name: AVALONIA_RESOURCES.to_string(),
        data: None,
        file: Some(PathBuf::from("MyApp.res")),
    });
    let paths = vec![
        write_library(temp.path(), &app),
        write_library(temp.path(), &core_library()),
    ];

    let metadata = load_metadata(
        &DescriptorProvider,
        &paths,
        &ConverterOptions::default(),
        &CancellationToken::new(),
    )
    .unwrap()
    .unwrap();
    let index = metadata.resource_index(APP_LIBRARY).unwrap();
    assert_eq!(index.paths().collect::<Vec<_>>(), vec!["/Views/MainWindow.axaml"]);
}

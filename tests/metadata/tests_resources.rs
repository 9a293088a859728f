//! Resource URIs and the compiled markup-resource index.

#![allow(clippy::unwrap_used)]

use crate::helpers::library_fixtures::*;
use axaml::assembly::PropertyInfo;
use axaml::assembly::descriptor::{
    DescriptorSession, LibraryDescriptor, ResourceDescriptor, TypeDescriptor,
};
use axaml::metadata::builtins::{BITMAP, IMAGE, RESOURCE_URI, XAML_RESOURCE_URI};
use axaml::metadata::{
    AVALONIA_RESOURCES, Metadata, ResourceIndexError, XAML_INFO_PATH, convert,
    read_resource_index,
};
use std::io::Cursor;

fn app_with_resources() -> LibraryDescriptor {
    let info = xaml_info(&[("MyApp.Views.MainWindow", "/Views/MainWindow.axaml")]);
    let blob = resource_blob(&[
        ("/Views/MainWindow.axaml", "<Window/>"),
        ("/Assets/logo.png", "PNG"),
        (XAML_INFO_PATH, info.as_str()),
    ]);
    app_library()
        .with_resource("MyApp.Strings.resources", Vec::new())
        .with_resource("MyApp.Assets.icon.png", b"PNG".to_vec())
        .with_resource(AVALONIA_RESOURCES, blob)
}

fn core_with_includes() -> LibraryDescriptor {
    core_library()
        .with_type(
            TypeDescriptor::class("Avalonia.Markup.Xaml.Styling", "StyleInclude")
                .with_property(PropertyInfo::new("Source", "System.Uri")),
        )
        .with_type(TypeDescriptor::class("Avalonia.Controls", "WindowIcon"))
}

fn convert_app(app: LibraryDescriptor) -> Metadata {
    convert(&DescriptorSession::new(vec![app, core_with_includes()]))
}

fn hints<'a>(metadata: &'a Metadata, full_name: &str) -> Vec<&'a str> {
    metadata
        .find_type(full_name)
        .unwrap()
        .hint_values
        .iter()
        .map(|h| h.as_str())
        .collect()
}

#[test]
fn test_resource_uris_by_kind() {
    let metadata = convert_app(app_with_resources());

    assert_eq!(
        hints(&metadata, RESOURCE_URI),
        vec![
            "resm:MyApp.Assets.icon.png?assembly=MyApp",
            "avares://MyApp/Views/MainWindow.axaml",
            "avares://MyApp/Assets/logo.png",
        ]
    );
    assert_eq!(
        hints(&metadata, XAML_RESOURCE_URI),
        vec!["avares://MyApp/Views/MainWindow.axaml"]
    );

    let images = vec![
        "resm:MyApp.Assets.icon.png?assembly=MyApp",
        "avares://MyApp/Assets/logo.png",
    ];
    assert_eq!(hints(&metadata, IMAGE), images);
    assert_eq!(hints(&metadata, BITMAP), images);
    assert_eq!(hints(&metadata, "Avalonia.Controls.WindowIcon"), images);
}

#[test]
fn test_include_source_takes_markup_uris() {
    let metadata = convert_app(app_with_resources());
    let source = metadata
        .find_type("Avalonia.Markup.Xaml.Styling.StyleInclude")
        .unwrap()
        .property("Source")
        .unwrap();
    assert_eq!(source.ty, metadata.find(XAML_RESOURCE_URI));
}

#[test]
fn test_class_to_resource_map() {
    let metadata = convert_app(app_with_resources());

    let index = metadata.resource_index(APP_LIBRARY).unwrap();
    assert_eq!(
        index.paths().collect::<Vec<_>>(),
        vec!["/Views/MainWindow.axaml", "/Assets/logo.png"]
    );
    assert_eq!(
        metadata.resource_for_class("MyApp.Views.MainWindow"),
        Some((APP_LIBRARY, "/Views/MainWindow.axaml"))
    );
    assert_eq!(metadata.resource_for_class("MyApp.Views.Missing"), None);
    assert!(metadata.resource_index(CORE_LIBRARY).is_none());
}

#[test]
fn test_corrupt_index_is_skipped() {
    let app = app_library().with_resource(AVALONIA_RESOURCES, vec![1, 2, 3]);
    let metadata = convert_app(app);

    assert!(metadata.resource_index(APP_LIBRARY).unwrap().is_empty());
    assert!(hints(&metadata, XAML_RESOURCE_URI).is_empty());
    assert!(metadata.find("MyApp.Views.MainWindow").is_some());
}

#[test]
fn test_missing_resource_file_is_skipped() {
    let mut app = app_library();
    app.resources.push(ResourceDescriptor {
        name: AVALONIA_RESOURCES.to_string(),
        data: None,
        file: Some("does-not-exist.bin".into()),
    });
    let metadata = convert_app(app);
    assert!(metadata.resource_index(APP_LIBRARY).unwrap().is_empty());
}

#[test]
fn test_read_index_from_stream() {
    let blob = resource_blob(&[("/a.axaml", "12345"), ("/b.png", "67")]);
    let index = read_resource_index(Cursor::new(blob)).unwrap();

    let b = index.entry("/b.png").unwrap();
    assert_eq!((b.offset, b.size), (5, 2));
    assert!(index.xaml_info.is_empty());
}

#[test]
fn test_negative_index_length() {
    let blob = (-1i32).to_le_bytes().to_vec();
    assert!(matches!(
        read_resource_index(Cursor::new(blob)),
        Err(ResourceIndexError::NegativeLength(-1))
    ));
}

//! Library descriptors for converter and project tests.

#![allow(dead_code)]

use axaml::assembly::descriptor::{LibraryDescriptor, TypeDescriptor};
use axaml::assembly::{
    CustomAttributeInfo, EventInfo, FieldInfo, MethodInfo, ParameterInfo, PropertyInfo,
};
use axaml::metadata::builtins::AVALONIA_NAMESPACE;

pub const CORE_LIBRARY: &str = "Avalonia.Base";
pub const APP_LIBRARY: &str = "MyApp";

pub const CONTENT_ATTRIBUTE: &str = "Avalonia.Metadata.ContentAttribute";
pub const PSEUDO_CLASSES_ATTRIBUTE: &str = "Avalonia.Controls.Metadata.PseudoClassesAttribute";
pub const TEMPLATE_PART_ATTRIBUTE: &str = "Avalonia.Controls.Metadata.TemplatePartAttribute";

/// A cut-down core library: object model, a few controls, an attached
/// property owner, brushes, an enum and the binding extension.
pub fn core_library() -> LibraryDescriptor {
    LibraryDescriptor::new(CORE_LIBRARY)
        .with_identity("Avalonia.Base, Version=11.0.0.0, PublicKey=00240000048000009400")
        .with_xmlns_definition(AVALONIA_NAMESPACE, "Avalonia.Controls")
        .with_xmlns_definition(AVALONIA_NAMESPACE, "Avalonia.Media")
        .with_xmlns_definition(AVALONIA_NAMESPACE, "Avalonia.Markup.Xaml.MarkupExtensions")
        .with_type(TypeDescriptor::class("Avalonia", "AvaloniaObject"))
        .with_type(TypeDescriptor::class("Avalonia.Interactivity", "RoutedEventArgs"))
        .with_type(control())
        .with_type(button())
        .with_type(grid())
        .with_type(items_control())
        .with_type(TypeDescriptor::enumeration(
            "Avalonia.Layout",
            "HorizontalAlignment",
            ["Stretch", "Left", "Center", "Right"],
        ))
        .with_type(
            TypeDescriptor::class("Avalonia.Media", "Brushes")
                .as_static()
                .with_property(PropertyInfo::static_get("Red", "Avalonia.Media.IBrush"))
                .with_property(PropertyInfo::static_get("Blue", "Avalonia.Media.IBrush")),
        )
        .with_type(TypeDescriptor::class("Avalonia.Markup.Xaml", "MarkupExtension").as_abstract())
        .with_type(
            TypeDescriptor::class(
                "Avalonia.Markup.Xaml.MarkupExtensions",
                "ReflectionBindingExtension",
            )
            .with_base("Avalonia.Markup.Xaml.MarkupExtension")
            .with_constructor(vec![])
            .with_constructor(vec![ParameterInfo::new("path", "System.String")])
            .with_property(PropertyInfo::new("Path", "System.String")),
        )
        .with_type(
            TypeDescriptor::class("Avalonia.Controls", "IControl").as_interface(),
        )
}

fn control() -> TypeDescriptor {
    TypeDescriptor::class("Avalonia.Controls", "Control")
        .with_base("Avalonia.AvaloniaObject")
        .with_property(PropertyInfo::new("Name", "System.String"))
        .with_property(PropertyInfo::new("Tag", "System.Object"))
        .with_property(
            PropertyInfo::new("HorizontalAlignment", "Avalonia.Layout.HorizontalAlignment"),
        )
        .with_event(EventInfo::new(
            "Tapped",
            "System.EventHandler`1<Avalonia.Interactivity.RoutedEventArgs>",
        ))
}

fn button() -> TypeDescriptor {
    TypeDescriptor::class("Avalonia.Controls", "Button")
        .with_base("Avalonia.Controls.Control")
        .with_attribute(CustomAttributeInfo::new(
            PSEUDO_CLASSES_ATTRIBUTE,
            [":pressed", ":flyout-open"],
        ))
        .with_property(
            PropertyInfo::new("Content", "System.Object")
                .with_attribute(CustomAttributeInfo::new(CONTENT_ATTRIBUTE, Vec::<String>::new())),
        )
        .with_property(PropertyInfo::new("IsDefault", "System.Boolean"))
        .with_property(PropertyInfo::new("Background", "Avalonia.Media.IBrush"))
        .with_property(PropertyInfo::new("Delay", "System.Nullable`1<System.Boolean>"))
        .with_event(EventInfo::new("Click", "System.EventHandler"))
}

fn grid() -> TypeDescriptor {
    TypeDescriptor::class("Avalonia.Controls", "Grid")
        .with_base("Avalonia.Controls.Control")
        .with_field(FieldInfo::public_static(
            "RowProperty",
            "Avalonia.AttachedProperty`1<System.Int32>",
        ))
        .with_method(MethodInfo::public_static(
            "GetRow",
            vec![ParameterInfo::new("element", "Avalonia.Controls.Control")],
            Some("System.Int32"),
        ))
        .with_method(MethodInfo::public_static(
            "SetRow",
            vec![
                ParameterInfo::new("element", "Avalonia.Controls.Control"),
                ParameterInfo::new("value", "System.Int32"),
            ],
            None,
        ))
        .with_field(FieldInfo::public_static(
            "SizeChangedEvent",
            "Avalonia.Interactivity.RoutedEvent`1<Avalonia.Interactivity.RoutedEventArgs>",
        ))
}

fn items_control() -> TypeDescriptor {
    TypeDescriptor::class("Avalonia.Controls", "ItemCollection")
        .with_base("Avalonia.Collections.AvaloniaList`1<Avalonia.Controls.Control>")
        .with_attribute(CustomAttributeInfo::new(
            TEMPLATE_PART_ATTRIBUTE,
            ["PART_Presenter", "Avalonia.Controls.Control"],
        ))
}

/// The target library: a single view deriving from `Control`.
pub fn app_library() -> LibraryDescriptor {
    LibraryDescriptor::new(APP_LIBRARY)
        .with_identity("MyApp, Version=1.0.0.0")
        .with_type(
            TypeDescriptor::class("MyApp.Views", "MainWindow")
                .with_base("Avalonia.Controls.Control")
                .with_property(PropertyInfo::new("Title", "System.String")),
        )
}

/// Build a version-2 `!AvaloniaResources` blob holding `files`.
pub fn resource_blob(files: &[(&str, &str)]) -> Vec<u8> {
    let mut index = Vec::new();
    index.extend_from_slice(&2i32.to_le_bytes());
    index.extend_from_slice(&(files.len() as i32).to_le_bytes());
    let mut offset = 0i32;
    for (path, content) in files {
        index.push(path.len() as u8);
        index.extend_from_slice(path.as_bytes());
        index.extend_from_slice(&offset.to_le_bytes());
        index.extend_from_slice(&(content.len() as i32).to_le_bytes());
        offset += content.len() as i32;
    }
    let mut blob = (index.len() as i32).to_le_bytes().to_vec();
    blob.extend_from_slice(&index);
    for (_, content) in files {
        blob.extend_from_slice(content.as_bytes());
    }
    blob
}

/// Class-to-resource map in the data-contract XML shape.
pub fn xaml_info(pairs: &[(&str, &str)]) -> String {
    let mut xml = String::from(
        r#"<AvaloniaResourceXamlInfo xmlns:a="http://schemas.microsoft.com/2003/10/Serialization/Arrays"><ClassToResourcePathIndex>"#,
    );
    for (class, path) in pairs {
        xml.push_str(&format!(
            "<a:KeyValueOfstringstring><a:Key>{class}</a:Key><a:Value>{path}</a:Value></a:KeyValueOfstringstring>"
        ));
    }
    xml.push_str("</ClassToResourcePathIndex></AvaloniaResourceXamlInfo>");
    xml
}

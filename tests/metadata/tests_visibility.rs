//! Cross-library visibility: what the target library may reference.

#![allow(clippy::unwrap_used)]

use crate::helpers::library_fixtures::*;
use axaml::assembly::descriptor::{DescriptorSession, LibraryDescriptor, TypeDescriptor};
use axaml::assembly::{PropertyInfo, Visibility};
use axaml::metadata::builtins::AVALONIA_NAMESPACE;
use axaml::metadata::{Metadata, convert};

const INTERNAL_PANEL: &str = "Avalonia.Controls.InternalPanel";

fn core_with_internals(grant: Option<&str>) -> LibraryDescriptor {
    let library = core_library()
        .with_type(
            TypeDescriptor::class("Avalonia.Controls", "InternalPanel")
                .with_visibility(Visibility::Internal),
        )
        .with_type(
            TypeDescriptor::class("Avalonia.Controls", "Slider")
                .with_property(
                    PropertyInfo::new("Secret", "System.String")
                        .with_getter(Some(Visibility::Internal))
                        .with_setter(Some(Visibility::Internal)),
                )
                .with_property(
                    PropertyInfo::new("Value", "System.String")
                        .with_setter(Some(Visibility::Internal)),
                ),
        );
    match grant {
        Some(assembly) => library.with_internals_visible_to(assembly),
        None => library,
    }
}

fn convert_for_app(app: LibraryDescriptor, core: LibraryDescriptor) -> Metadata {
    convert(&DescriptorSession::new(vec![app, core]))
}

#[test]
fn test_internals_hidden_without_grant() {
    let metadata = convert_for_app(app_library(), core_with_internals(None));

    assert!(metadata.find(INTERNAL_PANEL).is_none());
    assert!(metadata.lookup(AVALONIA_NAMESPACE, "InternalPanel").is_none());

    let slider = metadata.find_type("Avalonia.Controls.Slider").unwrap();
    assert!(slider.property("Secret").is_none());
    let value = slider.property("Value").unwrap();
    assert!(value.has_getter);
    assert!(!value.has_setter);
}

#[test]
fn test_internals_visible_with_grant() {
    let metadata = convert_for_app(app_library(), core_with_internals(Some(APP_LIBRARY)));

    let panel = metadata.lookup(AVALONIA_NAMESPACE, "InternalPanel").unwrap();
    assert!(panel.is_internal);

    let slider = metadata.find_type("Avalonia.Controls.Slider").unwrap();
    assert!(slider.property("Secret").is_some());
    assert!(slider.property("Value").unwrap().has_setter);
}

#[test]
fn test_grant_requires_matching_public_key() {
    let unsigned_app = convert_for_app(
        app_library(),
        core_with_internals(Some("MyApp, PublicKey=0024000004800000AB12")),
    );
    assert!(unsigned_app.find(INTERNAL_PANEL).is_none());

    let signed_app = convert_for_app(
        app_library().with_identity("MyApp, Version=1.0.0.0, PublicKey=0024000004800000ab12"),
        core_with_internals(Some("MyApp, PublicKey=0024000004800000AB12")),
    );
    assert!(signed_app.find(INTERNAL_PANEL).is_some());
}

#[test]
fn test_target_sees_its_own_internals() {
    let app = app_library().with_type(
        TypeDescriptor::class("MyApp.Views", "Helper").with_visibility(Visibility::Internal),
    );
    let metadata = convert_for_app(app, core_library());

    let helper = metadata.lookup("using:MyApp.Views", "Helper").unwrap();
    assert!(helper.is_internal);
}

#[test]
fn test_without_target_only_public_types() {
    let app = app_library().with_type(
        TypeDescriptor::class("MyApp.Views", "Helper").with_visibility(Visibility::Internal),
    );
    let session = DescriptorSession::with_target(None, vec![app, core_library()]);
    let metadata = convert(&session);

    assert!(metadata.lookup("using:MyApp.Views", "Helper").is_none());
    assert!(metadata.lookup("using:MyApp.Views", "MainWindow").is_some());
}

#[test]
fn test_private_members_never_visible() {
    let app = app_library().with_type(
        TypeDescriptor::class("MyApp.Views", "Form").with_property(
            PropertyInfo::new("Hidden", "System.String")
                .with_getter(Some(Visibility::Private))
                .with_setter(Some(Visibility::Private)),
        ),
    );
    let metadata = convert_for_app(app, core_library());
    let form = metadata.find_type("MyApp.Views.Form").unwrap();
    assert!(form.property("Hidden").is_none());
}

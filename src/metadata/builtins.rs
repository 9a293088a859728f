//! Well-known types seeded before any library is read.

use super::generics::NULLABLE_DEFINITION;
use super::model::{CtorArgument, Metadata, MetadataType, TypeId};

/// XML namespace of the `x:` directives.
pub const XAML_NAMESPACE: &str = "http://schemas.microsoft.com/winfx/2006/xaml";

/// Default Avalonia XML namespace.
pub const AVALONIA_NAMESPACE: &str = "https://github.com/avaloniaui";

pub const BOOLEAN: &str = "System.Boolean";
pub const STRING: &str = "System.String";
pub const OBJECT: &str = "System.Object";
pub const TYPE: &str = "System.Type";
pub const BRUSH: &str = "Avalonia.Media.IBrush";
pub const BITMAP: &str = "Avalonia.Media.Imaging.IBitmap";
pub const IMAGE: &str = "Avalonia.Media.IImage";
pub const SELECTOR: &str = "Avalonia.Styling.Selector";
pub const AVALONIA_PROPERTY: &str = "Avalonia.AvaloniaProperty";
pub const RESOURCE_URI: &str = "Avalonia.Resources.ResourceUri";
pub const XAML_RESOURCE_URI: &str = "Avalonia.Resources.XamlResourceUri";
pub const IMAGE_RESOURCE_URI: &str = "Avalonia.Resources.ImageResourceUri";

/// Ids of the seeded types, stable for the whole conversion.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Builtins {
    pub boolean: TypeId,
    pub string: TypeId,
    pub ty: TypeId,
    pub brush: TypeId,
    pub bitmap: TypeId,
    pub image: TypeId,
    pub selector: TypeId,
    pub avalonia_property: TypeId,
    pub nullable: TypeId,
    pub resource_uri: TypeId,
    pub xaml_resource_uri: TypeId,
    pub image_resource_uri: TypeId,
}

impl Builtins {
    pub(crate) fn seed(metadata: &mut Metadata) -> Self {
        let mut boolean = builtin(BOOLEAN);
        boolean.hint_values = vec!["True".into(), "False".into()];
        let boolean = metadata.add_type(boolean);
        let string = metadata.add_type(builtin(STRING));
        metadata.add_type(builtin(OBJECT));
        let ty = metadata.add_type(builtin(TYPE));

        let mut nullable = builtin(NULLABLE_DEFINITION);
        nullable.is_generic = true;
        nullable.is_nullable = true;
        let nullable = metadata.add_type(nullable);

        let builtins = Self {
            boolean,
            string,
            ty,
            brush: metadata.add_type(marker_interface(BRUSH)),
            bitmap: metadata.add_type(marker_interface(BITMAP)),
            image: metadata.add_type(marker_interface(IMAGE)),
            selector: metadata.add_type(builtin(SELECTOR)),
            avalonia_property: metadata.add_type(builtin(AVALONIA_PROPERTY)),
            nullable,
            resource_uri: metadata.add_type(builtin(RESOURCE_URI)),
            xaml_resource_uri: metadata.add_type(builtin(XAML_RESOURCE_URI)),
            image_resource_uri: metadata.add_type(builtin(IMAGE_RESOURCE_URI)),
        };
        builtins.seed_xaml_namespace(metadata);
        builtins
    }

    fn seed_xaml_namespace(&self, metadata: &mut Metadata) {
        let directives = [
            ("Class", self.string),
            ("Name", self.string),
            ("Key", self.string),
            ("DataType", self.ty),
            ("CompileBindings", self.boolean),
            ("TypeArguments", self.string),
            ("FieldModifier", self.string),
            ("Shared", self.boolean),
        ];
        for (name, value_type) in directives {
            let mut directive = builtin(&format!("x:{name}"));
            directive.name = name.into();
            directive.is_xaml_directive = true;
            directive.underlying_type = Some(value_type);
            let id = metadata.add_type(directive);
            metadata.register(XAML_NAMESPACE, name, id);
        }

        let extensions = [
            ("Type", CtorArgument::Type),
            ("Null", CtorArgument::None),
            ("Static", CtorArgument::Object),
        ];
        for (name, ctor_argument) in extensions {
            let mut extension = builtin(&format!("x:{name}Extension"));
            extension.name = name.into();
            extension.is_markup_extension = true;
            extension.ctor_argument = ctor_argument;
            let id = metadata.add_type(extension);
            metadata.register(XAML_NAMESPACE, name, id);
        }
    }

    /// Seeded id for `full_name`, if it names a replaceable built-in.
    pub(crate) fn replaceable(&self, metadata: &Metadata, full_name: &str) -> Option<TypeId> {
        metadata
            .find(full_name)
            .filter(|id| metadata.get(*id).is_some_and(|t| t.is_builtin))
    }
}

fn builtin(full_name: &str) -> MetadataType {
    let name = full_name.rsplit('.').next().unwrap_or(full_name);
    let mut ty = MetadataType::new(name, full_name);
    ty.is_builtin = true;
    ty
}

fn marker_interface(full_name: &str) -> MetadataType {
    let mut ty = builtin(full_name);
    ty.is_interface = true;
    ty.is_abstract = true;
    ty
}

//! Assembly Information Abstraction
//!
//! The metadata converter reads compiled libraries only through the traits
//! in this module, so any binary-metadata reader can sit behind it. The
//! bundled [`descriptor`] backend reads JSON library descriptors.
//!
//! ```text
//! AssemblyProvider::open_session(paths)
//!     ↓
//! AssemblySession (owns every handle, released on drop)
//!     ↓
//! AssemblyInformation (one per library, in input order)
//!     ↓
//! TypeInformation (full name, flags, base type, member records)
//! ```
//!
//! Member data is exchanged as plain records ([`PropertyInfo`],
//! [`FieldInfo`], ...) with type references spelled as full names, e.g.
//! `System.Nullable`1<Avalonia.Media.Color>`.

pub mod descriptor;
mod error;

pub use error::AssemblyError;

use std::io::Read;
use std::path::PathBuf;

/// Custom attribute type granting another library access to internals.
pub const INTERNALS_VISIBLE_TO_ATTRIBUTE: &str =
    "System.Runtime.CompilerServices.InternalsVisibleToAttribute";

/// Custom attribute mapping an XML namespace to a CLR namespace.
pub const XMLNS_DEFINITION_ATTRIBUTE: &str = "Avalonia.Metadata.XmlnsDefinitionAttribute";

/// Provider-side identity of a type within one session.
///
/// Only meaningful while the session that produced it is alive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHandle {
    pub assembly: u32,
    pub index: u32,
}

impl TypeHandle {
    pub fn new(assembly: u32, index: u32) -> Self {
        Self { assembly, index }
    }
}

/// Declared accessibility of a type or member.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "descriptor",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Visibility {
    #[default]
    Public,
    Internal,
    ProtectedInternal,
    Protected,
    Private,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }

    /// Reachable from another library that has been granted internals access.
    pub fn is_internal_or_public(self) -> bool {
        matches!(
            self,
            Visibility::Public | Visibility::Internal | Visibility::ProtectedInternal
        )
    }
}

/// A custom attribute application; arguments are rendered as strings
/// (`typeof(T)` arguments as the full name of `T`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "descriptor",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CustomAttributeInfo {
    pub type_full_name: String,
    pub arguments: Vec<String>,
}

impl CustomAttributeInfo {
    pub fn new<I, S>(type_full_name: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            type_full_name: type_full_name.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn argument(&self, index: usize) -> Option<&str> {
        self.arguments.get(index).map(String::as_str)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "descriptor",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PropertyInfo {
    pub name: String,
    pub type_name: String,
    pub is_static: bool,
    /// `None` when the property has no getter.
    pub getter: Option<Visibility>,
    /// `None` when the property has no setter.
    pub setter: Option<Visibility>,
    pub custom_attributes: Vec<CustomAttributeInfo>,
}

impl PropertyInfo {
    /// Public instance property with a getter and setter.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_static: false,
            getter: Some(Visibility::Public),
            setter: Some(Visibility::Public),
            custom_attributes: Vec::new(),
        }
    }

    /// Public static property with only a getter.
    pub fn static_get(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            is_static: true,
            setter: None,
            ..Self::new(name, type_name)
        }
    }

    pub fn read_only(mut self) -> Self {
        self.setter = None;
        self
    }

    pub fn with_setter(mut self, visibility: Option<Visibility>) -> Self {
        self.setter = visibility;
        self
    }

    pub fn with_getter(mut self, visibility: Option<Visibility>) -> Self {
        self.getter = visibility;
        self
    }

    pub fn with_attribute(mut self, attribute: CustomAttributeInfo) -> Self {
        self.custom_attributes.push(attribute);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "descriptor",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FieldInfo {
    pub name: String,
    pub type_name: String,
    pub is_static: bool,
    pub visibility: Visibility,
}

impl FieldInfo {
    /// Public static field, the shape of property and event backing fields.
    pub fn public_static(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_static: true,
            visibility: Visibility::Public,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "descriptor",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ParameterInfo {
    pub name: String,
    pub type_name: String,
}

impl ParameterInfo {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A method or constructor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "descriptor",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct MethodInfo {
    pub name: String,
    pub is_static: bool,
    pub visibility: Visibility,
    /// `None` for `void` and for constructors.
    pub return_type: Option<String>,
    pub parameters: Vec<ParameterInfo>,
}

impl MethodInfo {
    pub fn public_static(
        name: impl Into<String>,
        parameters: Vec<ParameterInfo>,
        return_type: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            is_static: true,
            visibility: Visibility::Public,
            return_type: return_type.map(str::to_string),
            parameters,
        }
    }

    pub fn public_instance(
        name: impl Into<String>,
        parameters: Vec<ParameterInfo>,
        return_type: Option<&str>,
    ) -> Self {
        Self {
            is_static: false,
            ..Self::public_static(name, parameters, return_type)
        }
    }

    /// Public constructor taking `parameters`.
    pub fn constructor(parameters: Vec<ParameterInfo>) -> Self {
        Self::public_instance(".ctor", parameters, None)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "descriptor",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EventInfo {
    pub name: String,
    pub handler_type: String,
    pub is_static: bool,
    pub visibility: Visibility,
}

impl EventInfo {
    pub fn new(name: impl Into<String>, handler_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handler_type: handler_type.into(),
            is_static: false,
            visibility: Visibility::Public,
        }
    }
}

/// A type as seen by the metadata converter.
pub trait TypeInformation {
    fn handle(&self) -> TypeHandle;

    fn name(&self) -> &str;

    fn namespace(&self) -> &str;

    /// Namespace-qualified name, e.g. `Avalonia.Controls.Button`.
    fn full_name(&self) -> &str;

    /// Simple name of the declaring library.
    fn assembly_name(&self) -> &str;

    fn assembly_qualified_name(&self) -> String {
        format!("{}, {}", self.full_name(), self.assembly_name())
    }

    fn visibility(&self) -> Visibility;

    fn is_enum(&self) -> bool;

    fn is_static(&self) -> bool;

    fn is_interface(&self) -> bool;

    fn is_abstract(&self) -> bool;

    fn is_generic(&self) -> bool;

    /// Full name of the base type, possibly a generic instantiation.
    fn base_type_name(&self) -> Option<&str>;

    /// Member names of an enum, in declaration order.
    fn enum_values(&self) -> &[String];

    fn custom_attributes(&self) -> &[CustomAttributeInfo];

    fn properties(&self) -> &[PropertyInfo];

    fn fields(&self) -> &[FieldInfo];

    fn methods(&self) -> &[MethodInfo];

    fn constructors(&self) -> &[MethodInfo];

    fn events(&self) -> &[EventInfo];
}

/// One loaded library.
pub trait AssemblyInformation {
    /// Simple name, e.g. `Avalonia.Controls`.
    fn name(&self) -> &str;

    /// Full identity string, e.g. `Avalonia.Controls, Version=11.0.0.0, PublicKey=00..`.
    fn identity(&self) -> &str;

    fn custom_attributes(&self) -> &[CustomAttributeInfo];

    /// Arguments of every `InternalsVisibleTo` declaration.
    fn internals_visible_to(&self) -> Vec<&str> {
        self.custom_attributes()
            .iter()
            .filter(|a| a.type_full_name == INTERNALS_VISIBLE_TO_ATTRIBUTE)
            .filter_map(|a| a.argument(0))
            .collect()
    }

    fn manifest_resource_names(&self) -> Vec<&str>;

    /// Open an embedded resource; `Ok(None)` when no such resource exists.
    fn open_resource(&self, name: &str) -> Result<Option<Box<dyn Read + '_>>, AssemblyError>;

    fn types(&self) -> Vec<&dyn TypeInformation>;
}

/// A set of libraries opened together.
///
/// The session owns every provider handle; dropping it releases them.
pub trait AssemblySession {
    /// Simple name of the primary library (the first input path).
    fn target_assembly_name(&self) -> Option<&str>;

    /// Loaded libraries in input order; libraries that failed to load are absent.
    fn assemblies(&self) -> Vec<&dyn AssemblyInformation>;
}

/// Opens sessions over library files.
pub trait AssemblyProvider: Send + Sync {
    fn open_session(&self, paths: &[PathBuf]) -> Result<Box<dyn AssemblySession>, AssemblyError>;
}

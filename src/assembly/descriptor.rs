//! JSON library descriptors.
//!
//! A descriptor is a static description of one compiled library: identity,
//! custom attributes, embedded resources and types with their members. It is
//! the reference backend for the assembly traits and also the way tests and
//! embedding hosts build sessions in memory.
//!
//! ```json
//! {
//!   "name": "Avalonia.Controls",
//!   "identity": "Avalonia.Controls, Version=11.0.0.0, PublicKey=0024...",
//!   "custom_attributes": [
//!     { "type_full_name": "Avalonia.Metadata.XmlnsDefinitionAttribute",
//!       "arguments": ["https://github.com/avaloniaui", "Avalonia.Controls"] }
//!   ],
//!   "resources": [ { "name": "!AvaloniaResources", "file": "Avalonia.Controls.res" } ],
//!   "types": [
//!     { "namespace": "Avalonia.Controls", "name": "Button",
//!       "base_type": "Avalonia.Controls.ContentControl",
//!       "properties": [ { "name": "IsDefault", "type_name": "System.Boolean",
//!                         "getter": "public", "setter": "public" } ] }
//!   ]
//! }
//! ```
//!
//! Resource `file` paths are relative to the descriptor file.

use super::{
    AssemblyError, AssemblyInformation, AssemblySession, CustomAttributeInfo, EventInfo,
    FieldInfo, INTERNALS_VISIBLE_TO_ATTRIBUTE, MethodInfo, ParameterInfo, PropertyInfo,
    TypeHandle, TypeInformation, Visibility, XMLNS_DEFINITION_ATTRIBUTE,
};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

/// An embedded resource: inline bytes or a file next to the descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "descriptor",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ResourceDescriptor {
    pub name: String,
    pub data: Option<Vec<u8>>,
    pub file: Option<PathBuf>,
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(
    feature = "descriptor",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TypeDescriptor {
    pub namespace: String,
    pub name: String,
    pub visibility: Visibility,
    pub is_enum: bool,
    pub is_static: bool,
    pub is_interface: bool,
    pub is_abstract: bool,
    pub is_generic: bool,
    pub base_type: Option<String>,
    pub enum_values: Vec<String>,
    pub custom_attributes: Vec<CustomAttributeInfo>,
    pub properties: Vec<PropertyInfo>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub constructors: Vec<MethodInfo>,
    pub events: Vec<EventInfo>,

    #[cfg_attr(feature = "descriptor", serde(skip))]
    full_name: String,
    #[cfg_attr(feature = "descriptor", serde(skip))]
    assembly: String,
    #[cfg_attr(feature = "descriptor", serde(skip))]
    handle: TypeHandle,
}

impl TypeDescriptor {
    /// Public, concrete class.
    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Public enum with `values` in declaration order.
    pub fn enumeration<I, S>(namespace: impl Into<String>, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            is_enum: true,
            enum_values: values.into_iter().map(Into::into).collect(),
            base_type: Some("System.Enum".to_string()),
            ..Self::class(namespace, name)
        }
    }

    pub fn with_base(mut self, base_type: impl Into<String>) -> Self {
        self.base_type = Some(base_type.into());
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn as_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn as_interface(mut self) -> Self {
        self.is_interface = true;
        self.is_abstract = true;
        self
    }

    /// Static classes are abstract and sealed.
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self.is_abstract = true;
        self
    }

    pub fn with_attribute(mut self, attribute: CustomAttributeInfo) -> Self {
        self.custom_attributes.push(attribute);
        self
    }

    pub fn with_property(mut self, property: PropertyInfo) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_constructor(mut self, parameters: Vec<ParameterInfo>) -> Self {
        self.constructors.push(MethodInfo::constructor(parameters));
        self
    }

    pub fn with_event(mut self, event: EventInfo) -> Self {
        self.events.push(event);
        self
    }

    fn finalize(&mut self, assembly: &str, handle: TypeHandle) {
        self.full_name = if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        };
        self.assembly = assembly.to_string();
        self.handle = handle;
        self.is_generic |= self.name.contains('`');
    }
}

impl TypeInformation for TypeDescriptor {
    fn handle(&self) -> TypeHandle {
        self.handle
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn assembly_name(&self) -> &str {
        &self.assembly
    }

    fn visibility(&self) -> Visibility {
        self.visibility
    }

    fn is_enum(&self) -> bool {
        self.is_enum
    }

    fn is_static(&self) -> bool {
        self.is_static
    }

    fn is_interface(&self) -> bool {
        self.is_interface
    }

    fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    fn is_generic(&self) -> bool {
        self.is_generic
    }

    fn base_type_name(&self) -> Option<&str> {
        self.base_type.as_deref()
    }

    fn enum_values(&self) -> &[String] {
        &self.enum_values
    }

    fn custom_attributes(&self) -> &[CustomAttributeInfo] {
        &self.custom_attributes
    }

    fn properties(&self) -> &[PropertyInfo] {
        &self.properties
    }

    fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    fn constructors(&self) -> &[MethodInfo] {
        &self.constructors
    }

    fn events(&self) -> &[EventInfo] {
        &self.events
    }
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(
    feature = "descriptor",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LibraryDescriptor {
    pub name: String,
    pub identity: String,
    pub custom_attributes: Vec<CustomAttributeInfo>,
    pub resources: Vec<ResourceDescriptor>,
    pub types: Vec<TypeDescriptor>,

    #[cfg_attr(feature = "descriptor", serde(skip))]
    base_dir: Option<PathBuf>,
}

impl LibraryDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Decode a descriptor; resource files resolve against `base_dir`.
    #[cfg(feature = "descriptor")]
    pub fn from_json(text: &str, base_dir: Option<&Path>) -> Result<Self, serde_json::Error> {
        let mut library: Self = serde_json::from_str(text)?;
        library.base_dir = base_dir.map(Path::to_path_buf);
        Ok(library)
    }

    /// Read and decode a descriptor file.
    #[cfg(feature = "descriptor")]
    pub fn from_file(path: &Path) -> Result<Self, AssemblyError> {
        let text = std::fs::read_to_string(path).map_err(|e| AssemblyError::io(path, e))?;
        Self::from_json(&text, path.parent())
            .map_err(|e| AssemblyError::descriptor(path, e.to_string()))
    }

    #[cfg(feature = "descriptor")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Identity string including the public key, e.g. `Lib, PublicKey=0024..`.
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    pub fn with_attribute(mut self, attribute: CustomAttributeInfo) -> Self {
        self.custom_attributes.push(attribute);
        self
    }

    /// Grant `assembly` (optionally `"Name, PublicKey=..."`) access to internals.
    pub fn with_internals_visible_to(self, assembly: impl Into<String>) -> Self {
        self.with_attribute(CustomAttributeInfo::new(
            INTERNALS_VISIBLE_TO_ATTRIBUTE,
            [assembly.into()],
        ))
    }

    pub fn with_xmlns_definition(self, xmlns: &str, clr_namespace: &str) -> Self {
        self.with_attribute(CustomAttributeInfo::new(
            XMLNS_DEFINITION_ATTRIBUTE,
            [xmlns, clr_namespace],
        ))
    }

    pub fn with_resource(mut self, name: impl Into<String>, data: Vec<u8>) -> Self {
        self.resources.push(ResourceDescriptor {
            name: name.into(),
            data: Some(data),
            file: None,
        });
        self
    }

    pub fn with_type(mut self, ty: TypeDescriptor) -> Self {
        self.types.push(ty);
        self
    }

    fn finalize(&mut self, assembly_index: u32) {
        if self.identity.is_empty() {
            self.identity = self.name.clone();
        }
        for (index, ty) in self.types.iter_mut().enumerate() {
            ty.finalize(&self.name, TypeHandle::new(assembly_index, index as u32));
        }
    }
}

impl AssemblyInformation for LibraryDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn identity(&self) -> &str {
        &self.identity
    }

    fn custom_attributes(&self) -> &[CustomAttributeInfo] {
        &self.custom_attributes
    }

    fn manifest_resource_names(&self) -> Vec<&str> {
        self.resources.iter().map(|r| r.name.as_str()).collect()
    }

    fn open_resource(&self, name: &str) -> Result<Option<Box<dyn Read + '_>>, AssemblyError> {
        let Some(resource) = self.resources.iter().find(|r| r.name == name) else {
            return Ok(None);
        };
        if let Some(data) = &resource.data {
            return Ok(Some(Box::new(Cursor::new(data.as_slice()))));
        }
        let Some(file) = &resource.file else {
            return Err(AssemblyError::missing_resource(&self.name, name));
        };
        let path = match &self.base_dir {
            Some(dir) => dir.join(file),
            None => file.clone(),
        };
        let reader = std::fs::File::open(&path).map_err(|e| AssemblyError::io(&path, e))?;
        Ok(Some(Box::new(std::io::BufReader::new(reader))))
    }

    fn types(&self) -> Vec<&dyn TypeInformation> {
        self.types.iter().map(|t| t as &dyn TypeInformation).collect()
    }
}

/// Session over descriptors held in memory.
#[derive(Debug)]
pub struct DescriptorSession {
    target: Option<String>,
    libraries: Vec<LibraryDescriptor>,
}

impl DescriptorSession {
    /// The first library is the target.
    pub fn new(libraries: Vec<LibraryDescriptor>) -> Self {
        let target = libraries.first().map(|l| l.name.clone());
        Self::with_target(target, libraries)
    }

    pub fn with_target(target: Option<String>, mut libraries: Vec<LibraryDescriptor>) -> Self {
        for (index, library) in libraries.iter_mut().enumerate() {
            library.finalize(index as u32);
        }
        Self { target, libraries }
    }

    pub fn libraries(&self) -> &[LibraryDescriptor] {
        &self.libraries
    }
}

impl AssemblySession for DescriptorSession {
    fn target_assembly_name(&self) -> Option<&str> {
        self.target.as_deref()
    }

    fn assemblies(&self) -> Vec<&dyn AssemblyInformation> {
        self.libraries
            .iter()
            .map(|l| l as &dyn AssemblyInformation)
            .collect()
    }
}

impl Drop for DescriptorSession {
    fn drop(&mut self) {
        tracing::trace!(libraries = self.libraries.len(), "Released descriptor session");
    }
}

/// Opens descriptor files in parallel.
///
/// A file that cannot be read or decoded is logged and left out of the
/// session; the remaining libraries keep their input order.
#[cfg(feature = "descriptor")]
#[derive(Clone, Copy, Debug, Default)]
pub struct DescriptorProvider;

#[cfg(feature = "descriptor")]
impl super::AssemblyProvider for DescriptorProvider {
    fn open_session(&self, paths: &[PathBuf]) -> Result<Box<dyn AssemblySession>, AssemblyError> {
        use rayon::prelude::*;

        let loaded: Vec<_> = paths
            .par_iter()
            .map(|path| LibraryDescriptor::from_file(path))
            .collect();

        let mut libraries = Vec::with_capacity(loaded.len());
        let mut target = None;
        for (index, result) in loaded.into_iter().enumerate() {
            match result {
                Ok(library) => {
                    if index == 0 {
                        target = Some(library.name.clone());
                    }
                    libraries.push(library);
                }
                Err(e) => tracing::warn!(error = %e, "Skipping library"),
            }
        }

        // Primary library failed to load: fall back to its file name
        if target.is_none() {
            target = paths
                .first()
                .and_then(|p| p.file_stem())
                .map(|s| s.to_string_lossy().into_owned());
        }

        tracing::debug!(
            requested = paths.len(),
            loaded = libraries.len(),
            "Opened descriptor session"
        );
        Ok(Box::new(DescriptorSession::with_target(target, libraries)))
    }
}

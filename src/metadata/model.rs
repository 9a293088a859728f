//! Metadata Model
//!
//! Types live in an arena owned by [`Metadata`] and refer to each other by
//! [`TypeId`], so recursive shapes (a type whose property has its own type,
//! a collection whose items type is itself) need no reference counting.

use super::resources::ResourceIndex;
use crate::assembly::TypeHandle;
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::ops::Index;

const CLR_NAMESPACE_PREFIX: &str = "clr-namespace:";
const USING_PREFIX: &str = "using:";

/// Index of a type in its [`Metadata`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a type's single constructor argument may be written in markup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CtorArgument {
    #[default]
    None,
    Type,
    Object,
    TypeAndObject,
    HintValues,
}

/// Named template sub-element with its required type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplatePart {
    pub name: SmolStr,
    pub ty: Option<TypeId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataProperty {
    pub name: SmolStr,
    /// `None` when the value type could not be resolved.
    pub ty: Option<TypeId>,
    pub declaring_type: Option<TypeId>,
    pub is_attached: bool,
    pub is_static: bool,
    pub has_getter: bool,
    pub has_setter: bool,
    pub is_content: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataEvent {
    pub name: SmolStr,
    /// Event-argument type.
    pub ty: Option<TypeId>,
    pub declaring_type: Option<TypeId>,
    pub is_attached: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataType {
    pub name: SmolStr,
    pub full_name: SmolStr,
    pub assembly_qualified_name: SmolStr,

    pub is_enum: bool,
    pub is_static: bool,
    pub is_interface: bool,
    pub is_abstract: bool,
    pub is_generic: bool,
    pub is_internal: bool,
    pub is_markup_extension: bool,
    pub is_bindable_object: bool,
    pub is_nullable: bool,
    pub is_xaml_directive: bool,
    pub is_builtin: bool,
    pub has_attached_properties: bool,
    pub has_attached_events: bool,
    pub has_static_get_properties: bool,
    pub has_set_properties: bool,

    /// Enum members, resource URIs, brush names...
    pub hint_values: Vec<SmolStr>,
    pub pseudo_classes: Vec<SmolStr>,
    pub properties: Vec<MetadataProperty>,
    pub events: Vec<MetadataEvent>,

    /// Wrapped type of a nullable, value type of a directive.
    pub underlying_type: Option<TypeId>,
    pub items_type: Option<TypeId>,
    /// Definition of a synthesized generic instantiation.
    pub generic_definition: Option<TypeId>,
    pub template_parts: Vec<TemplatePart>,
    pub ctor_argument: CtorArgument,

    pub(crate) handle: Option<TypeHandle>,
}

impl MetadataType {
    pub fn new(name: impl Into<SmolStr>, full_name: impl Into<SmolStr>) -> Self {
        let full_name = full_name.into();
        Self {
            name: name.into(),
            assembly_qualified_name: full_name.clone(),
            full_name,
            ..Self::default()
        }
    }

    /// Provider handle; `None` for synthesized types and after release.
    pub fn handle(&self) -> Option<TypeHandle> {
        self.handle
    }

    pub fn property(&self, name: &str) -> Option<&MetadataProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn event(&self, name: &str) -> Option<&MetadataEvent> {
        self.events.iter().find(|e| e.name == name)
    }

    pub fn content_property(&self) -> Option<&MetadataProperty> {
        self.properties.iter().find(|p| p.is_content)
    }

    pub fn attached_properties(&self) -> impl Iterator<Item = &MetadataProperty> {
        self.properties.iter().filter(|p| p.is_attached)
    }
}

/// The converted type graph.
///
/// Maps namespace identifiers (`clr-namespace:...;assembly=...`, `using:...`
/// or an XML namespace alias) to simple names to types, and back from a
/// type's full name to every namespace it is reachable through.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    types: Vec<MetadataType>,
    namespaces: IndexMap<SmolStr, IndexMap<SmolStr, TypeId>>,
    reachable_from: IndexMap<SmolStr, IndexSet<SmolStr>>,
    full_names: FxHashMap<SmolStr, TypeId>,
    resource_indices: IndexMap<SmolStr, ResourceIndex>,
    class_resources: FxHashMap<SmolStr, (SmolStr, SmolStr)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Add a type to the arena. `find` keeps the first type per full name.
    pub(crate) fn add_type(&mut self, ty: MetadataType) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.full_names.entry(ty.full_name.clone()).or_insert(id);
        self.types.push(ty);
        id
    }

    /// Add a type that `find` never returns.
    pub(crate) fn add_unlisted_type(&mut self, ty: MetadataType) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    /// Overwrite a type in place, keeping its id.
    pub(crate) fn replace_type(&mut self, id: TypeId, ty: MetadataType) {
        self.full_names.entry(ty.full_name.clone()).or_insert(id);
        self.types[id.index()] = ty;
    }

    pub(crate) fn get_mut(&mut self, id: TypeId) -> &mut MetadataType {
        &mut self.types[id.index()]
    }

    pub(crate) fn types_mut(&mut self) -> impl Iterator<Item = &mut MetadataType> {
        self.types.iter_mut()
    }

    /// Make `id` reachable as `name` in `namespace`. Last write wins.
    pub(crate) fn register(&mut self, namespace: &str, name: &str, id: TypeId) {
        let previous = self
            .namespaces
            .entry(SmolStr::new(namespace))
            .or_default()
            .insert(SmolStr::new(name), id);

        if let Some(previous) = previous.filter(|p| *p != id) {
            let old_full_name = self.types[previous.index()].full_name.clone();
            let still_reachable = self.namespaces[namespace].values().any(|t| *t == previous);
            if !still_reachable {
                if let Some(set) = self.reachable_from.get_mut(&old_full_name) {
                    set.shift_remove(namespace);
                }
            }
        }

        let full_name = self.types[id.index()].full_name.clone();
        self.reachable_from
            .entry(full_name)
            .or_default()
            .insert(SmolStr::new(namespace));
    }

    pub(crate) fn set_resource_index(&mut self, assembly: &str, index: ResourceIndex) {
        for (class, path) in &index.xaml_info {
            self.class_resources
                .entry(class.clone())
                .or_insert_with(|| (SmolStr::new(assembly), path.clone()));
        }
        self.resource_indices.insert(SmolStr::new(assembly), index);
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn get(&self, id: TypeId) -> Option<&MetadataType> {
        self.types.get(id.index())
    }

    /// First type added under `full_name`.
    pub fn find(&self, full_name: &str) -> Option<TypeId> {
        self.full_names.get(full_name).copied()
    }

    pub fn find_type(&self, full_name: &str) -> Option<&MetadataType> {
        self.find(full_name).and_then(|id| self.get(id))
    }

    pub fn lookup_id(&self, namespace: &str, name: &str) -> Option<TypeId> {
        self.namespaces.get(namespace)?.get(name).copied()
    }

    pub fn lookup(&self, namespace: &str, name: &str) -> Option<&MetadataType> {
        self.lookup_id(namespace, name).and_then(|id| self.get(id))
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(SmolStr::as_str)
    }

    /// `(simple name, type)` pairs registered under `namespace`.
    pub fn types_in<'a>(
        &'a self,
        namespace: &str,
    ) -> impl Iterator<Item = (&'a str, &'a MetadataType)> + 'a {
        self.namespaces
            .get(namespace)
            .into_iter()
            .flat_map(|names| names.iter())
            .map(|(name, id)| (name.as_str(), &self.types[id.index()]))
    }

    /// Every type in the arena, including unregistered referenced types.
    pub fn types(&self) -> impl Iterator<Item = (TypeId, &MetadataType)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, ty)| (TypeId(i as u32), ty))
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Namespaces a type is reachable through, in registration order.
    pub fn namespaces_of(&self, full_name: &str) -> impl Iterator<Item = &str> {
        self.reachable_from
            .get(full_name)
            .into_iter()
            .flat_map(|set| set.iter())
            .map(SmolStr::as_str)
    }

    /// Best spelling for an `xmlns` declaration: an XML namespace alias,
    /// else `using:`, else `clr-namespace:`; the shortest within each class.
    pub fn preferred_namespace(&self, full_name: &str) -> Option<&str> {
        self.namespaces_of(full_name).min_by_key(|ns| {
            let class = if ns.starts_with(CLR_NAMESPACE_PREFIX) {
                2
            } else if ns.starts_with(USING_PREFIX) {
                1
            } else {
                0
            };
            (class, ns.len())
        })
    }

    /// Pseudo-classes declared on any type, first occurrence order.
    pub fn pseudo_classes(&self) -> Vec<&str> {
        let mut seen = IndexSet::new();
        for ty in &self.types {
            for class in &ty.pseudo_classes {
                seen.insert(class.as_str());
            }
        }
        seen.into_iter().collect()
    }

    pub fn resource_index(&self, assembly: &str) -> Option<&ResourceIndex> {
        self.resource_indices.get(assembly)
    }

    /// `(assembly, resource path)` of the markup compiled into `class`.
    pub fn resource_for_class(&self, class: &str) -> Option<(&str, &str)> {
        self.class_resources
            .get(class)
            .map(|(asm, path)| (asm.as_str(), path.as_str()))
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Drop every provider back-reference. The graph stays fully usable.
    pub fn release_handles(&mut self) {
        for ty in &mut self.types {
            ty.handle = None;
        }
    }

    pub fn has_handles(&self) -> bool {
        self.types.iter().any(|t| t.handle.is_some())
    }
}

impl Index<TypeId> for Metadata {
    type Output = MetadataType;

    fn index(&self, id: TypeId) -> &MetadataType {
        &self.types[id.index()]
    }
}

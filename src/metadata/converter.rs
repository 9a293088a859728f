//! Metadata Converter
//!
//! Turns an [`AssemblySession`] into a [`Metadata`] graph in four passes:
//!
//! ```text
//! seed built-ins
//!     ↓
//! register   → per library: aliases, visibility policy, selected types
//!     ↓
//! harvest    → per type: base chain walk, members, attached members, ctor shape
//!     ↓
//! post-process → resource URIs, brush/color/selector hints, binding aliases
//! ```
//!
//! A bad library or resource is logged and skipped; the conversion itself
//! never fails. Cancellation is checked between libraries and between types
//! and yields `None`.

use super::builtins::{self, AVALONIA_NAMESPACE, Builtins};
use super::generics::{
    NULLABLE_DEFINITION, definition_name, display_name, generic_nesting,
    is_collection_definition, parse_generic_name,
};
use super::model::{
    CtorArgument, Metadata, MetadataEvent, MetadataProperty, MetadataType, TemplatePart, TypeId,
};
use super::options::ConverterOptions;
use super::resources::{AVALONIA_RESOURCES, ResourceIndex, read_resource_index};
use super::visibility::VisibilityPolicy;
use crate::assembly::{
    AssemblyInformation, AssemblySession, CustomAttributeInfo, TypeHandle, TypeInformation,
    XMLNS_DEFINITION_ATTRIBUTE,
};
use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;

const AVALONIA_OBJECT: &str = "Avalonia.AvaloniaObject";
const MARKUP_EXTENSION: &str = "Avalonia.Markup.Xaml.MarkupExtension";
const ATTACHED_PROPERTY: &str = "Avalonia.AttachedProperty`1";
const ROUTED_EVENT: &str = "Avalonia.Interactivity.RoutedEvent";
const ROUTED_EVENT_DEFINITION: &str = "Avalonia.Interactivity.RoutedEvent`1";
const ROUTED_EVENT_ARGS: &str = "Avalonia.Interactivity.RoutedEventArgs";
const EVENT_HANDLER: &str = "System.EventHandler";
const EVENT_HANDLER_DEFINITION: &str = "System.EventHandler`1";
const EVENT_ARGS: &str = "System.EventArgs";
const CONTENT_ATTRIBUTE: &str = "Avalonia.Metadata.ContentAttribute";
const PSEUDO_CLASSES_ATTRIBUTE: &str = "Avalonia.Controls.Metadata.PseudoClassesAttribute";
const TEMPLATE_PART_ATTRIBUTE: &str = "Avalonia.Controls.Metadata.TemplatePartAttribute";
const BRUSHES: &str = "Avalonia.Media.Brushes";
const COLORS: &str = "Avalonia.Media.Colors";
const COLOR: &str = "Avalonia.Media.Color";
const WINDOW_ICON: &str = "Avalonia.Controls.WindowIcon";
const LAYOUT_NAMESPACE: &str = "Avalonia.Layout";
const EXTENSION_SUFFIX: &str = "Extension";

/// Types whose `Source` property takes a markup-resource URI.
const INCLUDE_TYPES: &[&str] = &[
    "Avalonia.Markup.Xaml.Styling.StyleInclude",
    "Avalonia.Markup.Xaml.Styling.ResourceInclude",
    "Avalonia.Markup.Xaml.Styling.MergeResourceInclude",
];

/// Binding extensions written in markup under a different name.
const BINDING_ALIASES: &[(&str, &str)] = &[
    (
        "Avalonia.Markup.Xaml.MarkupExtensions.ReflectionBindingExtension",
        "Binding",
    ),
    (
        "Avalonia.Markup.Xaml.MarkupExtensions.CompiledBindingExtension",
        "CompiledBinding",
    ),
];

/// Convert with default options.
pub fn convert(session: &dyn AssemblySession) -> Metadata {
    convert_with_options(session, &ConverterOptions::default())
}

pub fn convert_with_options(session: &dyn AssemblySession, options: &ConverterOptions) -> Metadata {
    let never = CancellationToken::new();
    Converter::new(options, &never)
        .run(session)
        .unwrap_or_default()
}

/// Convert, giving up with `None` once `cancel` is signalled.
pub fn convert_with_cancel(
    session: &dyn AssemblySession,
    options: &ConverterOptions,
    cancel: &CancellationToken,
) -> Option<Metadata> {
    Converter::new(options, cancel).run(session)
}

/// State of one conversion run; dropped with the run.
struct Converter<'s> {
    options: &'s ConverterOptions,
    cancel: &'s CancellationToken,
    metadata: Metadata,
    builtins: Builtins,
    /// Full name → first type with that name across the session.
    index: FxHashMap<&'s str, &'s dyn TypeInformation>,
    /// Provider handle → converted type.
    identity: FxHashMap<TypeHandle, TypeId>,
    policies: FxHashMap<&'s str, VisibilityPolicy>,
    /// Keyed by name, plus the depth for instantiations cut by the depth limit.
    generic_cache: FxHashMap<(String, Option<usize>), Option<TypeId>>,
    selected: Vec<(TypeId, &'s dyn TypeInformation)>,
}

impl<'s> Converter<'s> {
    fn new(options: &'s ConverterOptions, cancel: &'s CancellationToken) -> Self {
        let mut metadata = Metadata::new();
        let builtins = Builtins::seed(&mut metadata);
        Self {
            options,
            cancel,
            metadata,
            builtins,
            index: FxHashMap::default(),
            identity: FxHashMap::default(),
            policies: FxHashMap::default(),
            generic_cache: FxHashMap::default(),
            selected: Vec::new(),
        }
    }

    fn run(mut self, session: &'s dyn AssemblySession) -> Option<Metadata> {
        let assemblies = session.assemblies();
        let target = session.target_assembly_name();
        let target_identity = target.and_then(|name| {
            assemblies
                .iter()
                .find(|a| a.name() == name)
                .map(|a| a.identity())
        });

        for assembly in assemblies.iter().copied() {
            for ty in assembly.types() {
                self.index.entry(ty.full_name()).or_insert(ty);
            }
        }

        for assembly in assemblies.iter().copied() {
            if self.cancel.is_cancelled() {
                return None;
            }
            self.register_library(assembly, target, target_identity);
        }

        for i in 0..self.selected.len() {
            if self.cancel.is_cancelled() {
                return None;
            }
            let (id, ty) = self.selected[i];
            self.harvest(id, ty);
        }

        self.post_process(&assemblies)?;

        tracing::info!(
            libraries = assemblies.len(),
            registered = self.selected.len(),
            types = self.metadata.type_count(),
            namespaces = self.metadata.namespaces().count(),
            "Converted metadata"
        );
        Some(self.metadata)
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    fn register_library(
        &mut self,
        assembly: &'s dyn AssemblyInformation,
        target: Option<&str>,
        target_identity: Option<&str>,
    ) {
        let policy = VisibilityPolicy::for_library(assembly, target, target_identity);
        self.policies.insert(assembly.name(), policy);
        let aliases = namespace_aliases(assembly);

        let mut registered = 0usize;
        for ty in assembly.types() {
            if !policy.selects_type(ty) {
                continue;
            }
            let id = self.ensure_type(ty);
            self.register_type(id, ty, &aliases);
            self.selected.push((id, ty));
            registered += 1;
        }

        tracing::debug!(
            library = assembly.name(),
            types = registered,
            aliases = aliases.len(),
            internals = policy.include_internals,
            "Registered library"
        );
    }

    fn register_type(
        &mut self,
        id: TypeId,
        ty: &dyn TypeInformation,
        aliases: &FxHashMap<String, Vec<String>>,
    ) {
        let namespace = ty.namespace();
        let name = ty.name();
        self.metadata.register(
            &format!("clr-namespace:{namespace};assembly={}", ty.assembly_name()),
            name,
            id,
        );
        self.metadata.register(&format!("using:{namespace}"), name, id);
        for xmlns in aliases.get(namespace).into_iter().flatten() {
            self.metadata.register(xmlns, name, id);
        }
    }

    /// Converted type for `ty`, created on first sight.
    ///
    /// A library type sharing a full name with a seeded built-in takes over
    /// the built-in's id.
    fn ensure_type(&mut self, ty: &'s dyn TypeInformation) -> TypeId {
        if let Some(id) = self.identity.get(&ty.handle()) {
            return *id;
        }

        let mut converted = describe(ty);
        let id = match self.builtins.replaceable(&self.metadata, ty.full_name()) {
            Some(id) => {
                let seeded = &self.metadata[id];
                if converted.hint_values.is_empty() {
                    converted.hint_values = seeded.hint_values.clone();
                }
                converted.is_nullable |= seeded.is_nullable;
                converted.is_builtin = true;
                self.metadata.replace_type(id, converted);
                id
            }
            None => self.metadata.add_type(converted),
        };
        self.identity.insert(ty.handle(), id);
        id
    }

    fn policy_for(&self, assembly: &str) -> VisibilityPolicy {
        self.policies
            .get(assembly)
            .copied()
            .unwrap_or(VisibilityPolicy::PUBLIC_ONLY)
    }

    // ------------------------------------------------------------------
    // Member harvesting
    // ------------------------------------------------------------------

    fn base_chain(&self, ty: &'s dyn TypeInformation) -> Vec<&'s dyn TypeInformation> {
        let mut chain = Vec::new();
        let mut visited = FxHashSet::default();
        let mut current = Some(ty);
        while let Some(t) = current {
            if !visited.insert(t.handle()) {
                tracing::warn!(
                    type_name = ty.full_name(),
                    at = t.full_name(),
                    "Base type cycle"
                );
                break;
            }
            if chain.len() >= self.options.max_base_depth {
                tracing::warn!(
                    type_name = ty.full_name(),
                    depth = chain.len(),
                    "Base type chain too deep"
                );
                break;
            }
            chain.push(t);
            current = t
                .base_type_name()
                .and_then(|base| self.index.get(&*definition_name(base)).copied());
        }
        chain
    }

    fn harvest(&mut self, id: TypeId, ty: &'s dyn TypeInformation) {
        let chain = self.base_chain(ty);

        let mut properties = Vec::new();
        let mut property_names = FxHashSet::default();
        let mut events = Vec::new();
        let mut event_names = FxHashSet::default();
        let mut pseudo_classes: IndexSet<SmolStr> = IndexSet::new();
        let mut template_parts: Vec<TemplatePart> = Vec::new();
        let mut items_type = None;
        let mut is_bindable_object = false;
        let mut is_markup_extension = false;

        for t in chain.iter().copied() {
            let declaring = self.ensure_type(t);
            let policy = self.policy_for(t.assembly_name());
            is_bindable_object |= t.full_name() == AVALONIA_OBJECT;
            is_markup_extension |= t.full_name() == MARKUP_EXTENSION
                || t.methods()
                    .iter()
                    .any(|m| m.name == "ProvideValue" && !m.is_static && m.parameters.len() == 1);

            for p in t.properties() {
                let has_getter = p.getter.is_some_and(|v| policy.allows(v));
                let has_setter = p.setter.is_some_and(|v| policy.allows(v));
                if !(has_getter || has_setter) || !property_names.insert(p.name.as_str()) {
                    continue;
                }
                properties.push(MetadataProperty {
                    name: SmolStr::new(&p.name),
                    ty: self.resolve_type_name(&p.type_name, 0),
                    declaring_type: Some(declaring),
                    is_attached: false,
                    is_static: p.is_static,
                    has_getter,
                    has_setter,
                    is_content: has_attribute(&p.custom_attributes, CONTENT_ATTRIBUTE),
                });
            }

            for e in t.events() {
                if !policy.allows(e.visibility) || !event_names.insert(e.name.as_str()) {
                    continue;
                }
                events.push(MetadataEvent {
                    name: SmolStr::new(&e.name),
                    ty: self.event_args_type(&e.handler_type),
                    declaring_type: Some(declaring),
                    is_attached: false,
                });
            }

            for attribute in t.custom_attributes() {
                if attribute.type_full_name == PSEUDO_CLASSES_ATTRIBUTE {
                    pseudo_classes.extend(attribute.arguments.iter().map(SmolStr::new));
                } else if attribute.type_full_name == TEMPLATE_PART_ATTRIBUTE {
                    let Some(name) = attribute.argument(0) else {
                        continue;
                    };
                    if template_parts.iter().any(|part| part.name == name) {
                        continue;
                    }
                    let part_type = attribute
                        .argument(1)
                        .and_then(|type_name| self.resolve_type_name(type_name, 0));
                    template_parts.push(TemplatePart {
                        name: SmolStr::new(name),
                        ty: part_type,
                    });
                }
            }

            if items_type.is_none() {
                items_type = self.collection_items_type(t.base_type_name());
            }
        }

        let policy = self.policy_for(ty.assembly_name());
        self.attached_properties(ty, id, policy, &mut properties);
        self.attached_events(ty, id, policy, &mut events);
        let ctor_argument = self.ctor_argument(ty);

        tracing::trace!(
            type_name = ty.full_name(),
            depth = chain.len(),
            properties = properties.len(),
            events = events.len(),
            "Harvested members"
        );

        let converted = self.metadata.get_mut(id);
        converted.has_attached_properties = properties.iter().any(|p| p.is_attached);
        converted.has_attached_events = events.iter().any(|e| e.is_attached);
        converted.has_static_get_properties = properties
            .iter()
            .any(|p| p.is_static && p.has_getter && !p.is_attached);
        converted.has_set_properties = properties.iter().any(|p| p.has_setter);
        converted.properties = properties;
        converted.events = events;
        converted.pseudo_classes = pseudo_classes.into_iter().collect();
        converted.template_parts = template_parts;
        converted.items_type = items_type;
        converted.is_bindable_object = is_bindable_object;
        converted.is_markup_extension |= is_markup_extension;
        converted.ctor_argument = ctor_argument;

        if is_markup_extension {
            self.register_short_extension_name(id, ty);
        }
    }

    /// `FooProperty` static fields of attached-property type paired with
    /// static `GetFoo(target)` / `SetFoo(target, value)` methods.
    fn attached_properties(
        &mut self,
        ty: &'s dyn TypeInformation,
        declaring: TypeId,
        policy: VisibilityPolicy,
        properties: &mut Vec<MetadataProperty>,
    ) {
        for field in ty.fields() {
            if !field.is_static
                || !policy.allows(field.visibility)
                || definition_name(&field.type_name) != ATTACHED_PROPERTY
            {
                continue;
            }
            let Some(name) = field.name.strip_suffix("Property").filter(|n| !n.is_empty()) else {
                continue;
            };
            if properties.iter().any(|p| p.is_attached && p.name == name) {
                continue;
            }

            let getter_name = format!("Get{name}");
            let setter_name = format!("Set{name}");
            let accessor = |method_name: &str, arity: usize| {
                ty.methods().iter().find(|m| {
                    m.is_static
                        && policy.allows(m.visibility)
                        && m.name == method_name
                        && m.parameters.len() == arity
                })
            };
            let getter = accessor(&getter_name, 1);
            let setter = accessor(&setter_name, 2);
            if getter.is_none() && setter.is_none() {
                continue;
            }

            let value_type = getter
                .and_then(|m| m.return_type.as_deref())
                .or_else(|| setter.map(|m| m.parameters[1].type_name.as_str()))
                .or_else(|| parse_generic_name(&field.type_name).map(|g| g.arguments[0]));

            properties.push(MetadataProperty {
                name: SmolStr::new(name),
                ty: value_type.and_then(|t| self.resolve_type_name(t, 0)),
                declaring_type: Some(declaring),
                is_attached: true,
                is_static: true,
                has_getter: getter.is_some(),
                has_setter: setter.is_some(),
                is_content: false,
            });
        }
    }

    /// Static routed-event fields not shadowed by a CLR event of the same name.
    fn attached_events(
        &mut self,
        ty: &'s dyn TypeInformation,
        declaring: TypeId,
        policy: VisibilityPolicy,
        events: &mut Vec<MetadataEvent>,
    ) {
        for field in ty.fields() {
            let definition = definition_name(&field.type_name);
            if !field.is_static
                || !policy.allows(field.visibility)
                || (definition != ROUTED_EVENT && definition != ROUTED_EVENT_DEFINITION)
            {
                continue;
            }
            let name = field.name.strip_suffix("Event").unwrap_or(&field.name);
            if name.is_empty() || events.iter().any(|e| e.name == name) {
                continue;
            }
            let args = match parse_generic_name(&field.type_name) {
                Some(generic) => self.resolve_type_name(generic.arguments[0], 0),
                None => self.resolve_type_name(ROUTED_EVENT_ARGS, 0),
            };
            events.push(MetadataEvent {
                name: SmolStr::new(name),
                ty: args,
                declaring_type: Some(declaring),
                is_attached: true,
            });
        }
    }

    fn event_args_type(&mut self, handler_type: &str) -> Option<TypeId> {
        match parse_generic_name(handler_type) {
            Some(generic) if generic.definition == EVENT_HANDLER_DEFINITION => {
                self.resolve_type_name(generic.arguments[0], 0)
            }
            Some(_) => None,
            None if handler_type == EVENT_HANDLER => self.resolve_type_name(EVENT_ARGS, 0),
            None => None,
        }
    }

    fn collection_items_type(&mut self, base_type: Option<&str>) -> Option<TypeId> {
        let generic = parse_generic_name(base_type?)?;
        if !is_collection_definition(&generic.definition) {
            return None;
        }
        self.resolve_type_name(generic.arguments[0], 0)
    }

    /// Shape of the single argument accepted by public one-argument constructors.
    fn ctor_argument(&mut self, ty: &'s dyn TypeInformation) -> CtorArgument {
        let mut has_type = false;
        let mut has_object = false;
        let mut has_hints = false;
        for ctor in ty.constructors() {
            if !ctor.visibility.is_public() || ctor.parameters.len() != 1 {
                continue;
            }
            let parameter = ctor.parameters[0].type_name.as_str();
            if parameter == builtins::TYPE {
                has_type = true;
            } else if parameter == builtins::OBJECT || parameter == builtins::STRING {
                has_object = true;
            } else if let Some(id) = self.resolve_type_name(parameter, 0) {
                has_hints |= !self.metadata[id].hint_values.is_empty();
            }
        }
        match (has_hints, has_type, has_object) {
            (true, _, _) => CtorArgument::HintValues,
            (false, true, true) => CtorArgument::TypeAndObject,
            (false, true, false) => CtorArgument::Type,
            (false, false, true) => CtorArgument::Object,
            (false, false, false) => CtorArgument::None,
        }
    }

    /// `FooExtension` is also reachable as `Foo` where that name is free.
    fn register_short_extension_name(&mut self, id: TypeId, ty: &dyn TypeInformation) {
        let Some(short) = ty
            .name()
            .strip_suffix(EXTENSION_SUFFIX)
            .filter(|s| !s.is_empty())
        else {
            return;
        };
        let namespaces: Vec<SmolStr> = self
            .metadata
            .namespaces_of(ty.full_name())
            .map(SmolStr::new)
            .collect();
        for namespace in namespaces {
            if self.metadata.lookup_id(&namespace, short).is_none() {
                self.metadata.register(&namespace, short, id);
            }
        }
    }

    // ------------------------------------------------------------------
    // Type resolution
    // ------------------------------------------------------------------

    /// Resolve a type reference; `None` when it names nothing known.
    ///
    /// An instantiation nested too deep to resolve completely from `depth`
    /// is cached per depth and kept out of the full-name index, so it never
    /// stands in for the complete instantiation elsewhere.
    fn resolve_type_name(&mut self, name: &str, depth: usize) -> Option<TypeId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let Some(generic) = parse_generic_name(name) else {
            return self.resolve_plain(name);
        };

        let complete = depth + generic_nesting(name) <= self.options.max_generic_depth;
        if complete {
            if let Some(id) = self.metadata.find(name) {
                return Some(id);
            }
        }
        let key = (name.to_string(), (!complete).then_some(depth));
        if let Some(cached) = self.generic_cache.get(&key) {
            return *cached;
        }
        let resolved = self.resolve_generic(
            name,
            &generic.definition,
            &generic.arguments,
            depth,
            complete,
        );
        self.generic_cache.insert(key, resolved);
        resolved
    }

    fn resolve_plain(&mut self, name: &str) -> Option<TypeId> {
        if let Some(id) = self.metadata.find(name) {
            return Some(id);
        }
        let ty = self.index.get(name).copied()?;
        Some(self.ensure_type(ty))
    }

    /// Nullable and collection instantiations become synthesized types; any
    /// other generic resolves to its definition. Past the depth limit the
    /// definition is used without looking at the arguments.
    fn resolve_generic(
        &mut self,
        name: &str,
        definition_full_name: &str,
        arguments: &[&str],
        depth: usize,
        complete: bool,
    ) -> Option<TypeId> {
        let definition = self.resolve_plain(definition_full_name);
        if depth >= self.options.max_generic_depth {
            tracing::warn!(
                type_name = name,
                depth,
                "Generic nesting limit reached, using definition"
            );
            return definition;
        }

        if definition_full_name == NULLABLE_DEFINITION {
            let underlying = self.resolve_type_name(arguments[0], depth + 1);
            let mut nullable =
                MetadataType::new(self.display(definition_full_name, arguments), name);
            nullable.is_nullable = true;
            nullable.is_generic = true;
            nullable.underlying_type = underlying;
            nullable.generic_definition = definition.or(Some(self.builtins.nullable));
            if let Some(underlying) = underlying {
                nullable.hint_values = self.metadata[underlying].hint_values.clone();
            }
            return Some(self.add_instantiation(nullable, complete));
        }

        if is_collection_definition(definition_full_name) {
            let items = self.resolve_type_name(arguments[0], depth + 1);
            let mut collection = match definition {
                Some(d) => self.metadata[d].clone(),
                None => MetadataType::default(),
            };
            collection.name = self.display(definition_full_name, arguments).into();
            collection.full_name = SmolStr::new(name);
            collection.assembly_qualified_name = SmolStr::new(name);
            collection.is_generic = true;
            collection.is_builtin = false;
            collection.items_type = items;
            collection.generic_definition = definition;
            collection.handle = None;
            return Some(self.add_instantiation(collection, complete));
        }

        definition
    }

    fn add_instantiation(&mut self, ty: MetadataType, complete: bool) -> TypeId {
        if complete {
            self.metadata.add_type(ty)
        } else {
            self.metadata.add_unlisted_type(ty)
        }
    }

    fn display(&self, definition_full_name: &str, arguments: &[&str]) -> String {
        let simple = definition_full_name
            .rsplit('.')
            .next()
            .unwrap_or(definition_full_name);
        let names: Vec<&str> = arguments
            .iter()
            .map(|arg| match self.metadata.find(arg) {
                Some(id) => self.metadata[id].name.as_str(),
                None => arg.rsplit('.').next().unwrap_or(arg),
            })
            .collect();
        display_name(simple, &names)
    }

    // ------------------------------------------------------------------
    // Post-processing
    // ------------------------------------------------------------------

    fn post_process(&mut self, assemblies: &[&'s dyn AssemblyInformation]) -> Option<()> {
        let mut all_uris: IndexSet<SmolStr> = IndexSet::new();
        let mut xaml_uris: IndexSet<SmolStr> = IndexSet::new();
        let mut image_uris: IndexSet<SmolStr> = IndexSet::new();
        let mut classify = |uri: String, path: &str| {
            let uri = SmolStr::new(uri);
            if self.options.is_xaml(path) {
                xaml_uris.insert(uri.clone());
            }
            if self.options.is_image(path) {
                image_uris.insert(uri.clone());
            }
            all_uris.insert(uri);
        };

        let mut indices = Vec::new();
        for assembly in assemblies.iter().copied() {
            if self.cancel.is_cancelled() {
                return None;
            }
            let name = assembly.name();
            let resources = assembly.manifest_resource_names();
            for resource in &resources {
                if !self.options.is_ignored_resource(resource) {
                    classify(format!("resm:{resource}?assembly={name}"), *resource);
                }
            }
            if resources.contains(&AVALONIA_RESOURCES) {
                let index = load_resource_index(assembly);
                for path in index.paths() {
                    classify(format!("avares://{name}{path}"), path);
                }
                indices.push((name, index));
            }
        }
        for (name, index) in indices {
            self.metadata.set_resource_index(name, index);
        }

        let b = self.builtins;
        self.extend_hints(b.resource_uri, all_uris);
        self.extend_hints(b.xaml_resource_uri, xaml_uris);
        let window_icon = self.metadata.find(WINDOW_ICON);
        for target in [Some(b.image), Some(b.bitmap), window_icon].into_iter().flatten() {
            self.extend_hints(target, image_uris.iter().cloned());
        }
        self.extend_hints(b.image_resource_uri, image_uris);

        self.retype_include_sources(b.xaml_resource_uri);
        self.static_property_hints(BRUSHES, Some(b.brush));
        let color = self.metadata.find(COLOR);
        self.static_property_hints(COLORS, color);
        self.selector_hints();
        self.avalonia_property_hints();
        self.remap_binding_aliases();
        Some(())
    }

    fn extend_hints(&mut self, id: TypeId, values: impl IntoIterator<Item = SmolStr>) {
        let ty = self.metadata.get_mut(id);
        let mut hints: IndexSet<SmolStr> = ty.hint_values.drain(..).collect();
        hints.extend(values);
        ty.hint_values = hints.into_iter().collect();
    }

    fn retype_include_sources(&mut self, uri_type: TypeId) {
        let includes: Vec<TypeId> = INCLUDE_TYPES
            .iter()
            .filter_map(|name| self.metadata.find(name))
            .collect();
        if includes.is_empty() {
            return;
        }
        for ty in self.metadata.types_mut() {
            for property in &mut ty.properties {
                if property.name == "Source"
                    && property.declaring_type.is_some_and(|d| includes.contains(&d))
                {
                    property.ty = Some(uri_type);
                }
            }
        }
    }

    /// Static property names of a holder type (`Brushes.Red`) as hints.
    fn static_property_hints(&mut self, holder: &str, target: Option<TypeId>) {
        let (Some(target), Some(holder)) = (target, self.index.get(holder).copied()) else {
            return;
        };
        let names = holder
            .properties()
            .iter()
            .filter(|p| p.is_static && p.getter.is_some_and(|v| v.is_public()))
            .map(|p| SmolStr::new(&p.name));
        self.extend_hints(target, names);
    }

    /// Selector completions: every pseudo-class plus every bindable type name.
    fn selector_hints(&mut self) {
        let mut hints: Vec<SmolStr> = self
            .metadata
            .pseudo_classes()
            .into_iter()
            .map(SmolStr::new)
            .collect();
        hints.extend(
            self.selected
                .iter()
                .map(|(id, _)| &self.metadata[*id])
                .filter(|t| t.is_bindable_object)
                .map(|t| t.name.clone()),
        );
        self.extend_hints(self.builtins.selector, hints);
    }

    /// `Owner.Property` for every attached property declared on its owner.
    fn avalonia_property_hints(&mut self) {
        let mut hints = Vec::new();
        for (id, _) in &self.selected {
            let ty = &self.metadata[*id];
            for property in ty.attached_properties() {
                if property.declaring_type == Some(*id) {
                    hints.push(SmolStr::new(format!("{}.{}", ty.name, property.name)));
                }
            }
        }
        self.extend_hints(self.builtins.avalonia_property, hints);
    }

    fn remap_binding_aliases(&mut self) {
        for (full_name, alias) in BINDING_ALIASES {
            let Some(id) = self.metadata.find(full_name) else {
                continue;
            };
            let namespaces: Vec<SmolStr> = self
                .metadata
                .namespaces_of(full_name)
                .map(SmolStr::new)
                .collect();
            for namespace in namespaces {
                self.metadata.register(&namespace, alias, id);
            }
        }
    }
}

/// Base converted form of a library type, before member harvesting.
fn describe(ty: &dyn TypeInformation) -> MetadataType {
    let mut converted = MetadataType::new(ty.name(), ty.full_name());
    converted.assembly_qualified_name = SmolStr::new(ty.assembly_qualified_name());
    converted.is_enum = ty.is_enum();
    converted.is_static = ty.is_static();
    converted.is_interface = ty.is_interface();
    converted.is_abstract = ty.is_abstract();
    converted.is_generic = ty.is_generic();
    converted.is_internal = !ty.visibility().is_public();
    if ty.is_enum() {
        converted.hint_values = ty.enum_values().iter().map(SmolStr::new).collect();
    }
    converted.handle = Some(ty.handle());
    converted
}

/// CLR namespace → XML namespaces declared for it in `assembly`.
fn namespace_aliases(assembly: &dyn AssemblyInformation) -> FxHashMap<String, Vec<String>> {
    let mut aliases: FxHashMap<String, Vec<String>> = FxHashMap::default();
    for attribute in assembly.custom_attributes() {
        if attribute.type_full_name != XMLNS_DEFINITION_ATTRIBUTE {
            continue;
        }
        let (Some(xmlns), Some(clr_namespace)) = (attribute.argument(0), attribute.argument(1))
        else {
            continue;
        };
        let entry = aliases.entry(clr_namespace.to_string()).or_default();
        if !entry.iter().any(|x| x == xmlns) {
            entry.push(xmlns.to_string());
        }
    }
    aliases
        .entry(LAYOUT_NAMESPACE.to_string())
        .or_insert_with(|| vec![AVALONIA_NAMESPACE.to_string()]);
    aliases
}

fn has_attribute(attributes: &[CustomAttributeInfo], type_full_name: &str) -> bool {
    attributes.iter().any(|a| a.type_full_name == type_full_name)
}

/// Read a library's resource index; unreadable indices are logged and empty.
fn load_resource_index(assembly: &dyn AssemblyInformation) -> ResourceIndex {
    let result = match assembly.open_resource(AVALONIA_RESOURCES) {
        Ok(Some(reader)) => read_resource_index(reader).map_err(|e| e.to_string()),
        Ok(None) => return ResourceIndex::default(),
        Err(e) => Err(e.to_string()),
    };
    result.unwrap_or_else(|error| {
        tracing::warn!(library = assembly.name(), error, "Unreadable resource index");
        ResourceIndex::default()
    })
}

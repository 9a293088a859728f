//! Generic type-name parsing.
//!
//! Type references arrive as strings such as
//! `System.Collections.Generic.IList`1<Avalonia.Controls.Control>` or
//! `System.Nullable<System.Int32>`.

/// Generic definitions treated as element collections.
pub const COLLECTION_DEFINITIONS: &[&str] = &[
    "System.Collections.Generic.IList`1",
    "System.Collections.Generic.ICollection`1",
    "System.Collections.Generic.IEnumerable`1",
    "System.Collections.Generic.IReadOnlyList`1",
    "System.Collections.Generic.List`1",
    "System.Collections.ObjectModel.ObservableCollection`1",
    "Avalonia.Collections.AvaloniaList`1",
    "Avalonia.Collections.IAvaloniaList`1",
];

pub const NULLABLE_DEFINITION: &str = "System.Nullable`1";

/// A parsed generic instantiation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenericName<'a> {
    /// Definition name with arity, e.g. `System.Nullable`1`.
    pub definition: String,
    pub arguments: Vec<&'a str>,
}

pub fn is_collection_definition(definition: &str) -> bool {
    COLLECTION_DEFINITIONS.contains(&definition)
}

/// Strip generic arguments: `List`1<T>` → `List`1`, `List<T>` → `List`1`.
pub fn definition_name(name: &str) -> std::borrow::Cow<'_, str> {
    match parse_generic_name(name) {
        Some(generic) => std::borrow::Cow::Owned(generic.definition),
        None => std::borrow::Cow::Borrowed(name),
    }
}

/// Split `name` into definition and top-level arguments.
///
/// Returns `None` for non-generic names and for unbalanced brackets.
pub fn parse_generic_name(name: &str) -> Option<GenericName<'_>> {
    let open = name.find('<')?;
    let inner = name.strip_suffix('>')?.get(open + 1..)?;
    let arguments = split_arguments(inner)?;
    if arguments.is_empty() {
        return None;
    }

    let head = &name[..open];
    let definition = if head.contains('`') {
        head.to_string()
    } else {
        format!("{head}`{}", arguments.len())
    };
    Some(GenericName {
        definition,
        arguments,
    })
}

fn split_arguments(inner: &str) -> Option<Vec<&str>> {
    let mut arguments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                arguments.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    let last = inner[start..].trim();
    if !last.is_empty() || !arguments.is_empty() {
        arguments.push(last);
    }
    if arguments.iter().any(|a| a.is_empty()) {
        return None;
    }
    Some(arguments)
}

/// Deepest `<` nesting in `name`: 0 for plain names, 2 for `A<B<C>>`.
pub fn generic_nesting(name: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0;
    for c in name.chars() {
        match c {
            '<' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            '>' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// Display form used for synthesized instantiations: `Nullable<Color>`.
pub fn display_name(definition_simple_name: &str, argument_names: &[&str]) -> String {
    let base = definition_simple_name
        .split('`')
        .next()
        .unwrap_or(definition_simple_name);
    format!("{base}<{}>", argument_names.join(", "))
}

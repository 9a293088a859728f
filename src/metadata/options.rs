//! Converter configuration.

/// Options for [`convert_with_options`](super::convert_with_options).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterOptions {
    /// Nesting limit when resolving generic type arguments.
    pub max_generic_depth: usize,
    /// Base types walked per type before giving up.
    pub max_base_depth: usize,
    /// Manifest resources ending with one of these never become `resm:` URIs.
    pub ignored_resource_suffixes: Vec<String>,
    pub xaml_extensions: Vec<String>,
    pub image_extensions: Vec<String>,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            max_generic_depth: 8,
            max_base_depth: 64,
            ignored_resource_suffixes: to_strings(&[".resources", ".rd.xml", "!AvaloniaResources"]),
            xaml_extensions: to_strings(&[".xaml", ".axaml", ".paml"]),
            image_extensions: to_strings(&[".png", ".jpg", ".jpeg", ".bmp", ".gif", ".ico"]),
        }
    }
}

impl ConverterOptions {
    pub fn is_ignored_resource(&self, name: &str) -> bool {
        has_suffix(name, &self.ignored_resource_suffixes)
    }

    pub fn is_xaml(&self, path: &str) -> bool {
        has_suffix(path, &self.xaml_extensions)
    }

    pub fn is_image(&self, path: &str) -> bool {
        has_suffix(path, &self.image_extensions)
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Case-insensitive suffix test.
fn has_suffix(name: &str, suffixes: &[String]) -> bool {
    suffixes.iter().any(|suffix| {
        name.len() >= suffix.len()
            && name.is_char_boundary(name.len() - suffix.len())
            && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
    })
}

//! Choosing among a component's per-framework build outputs.

use std::path::Path;

/// Desirability of a target framework, best first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FrameworkRank {
    /// `net35`, `net48`, `net472`, `.NETFramework,Version=v4.8`
    Legacy,
    /// `netcoreapp3.1`, `net8.0`, `net8.0-windows`
    Current,
    /// `netstandard2.0`
    Standard,
    Other,
}

/// Classify a target framework moniker or identifier.
pub fn framework_rank(framework: &str) -> FrameworkRank {
    let tfm = framework.trim().to_ascii_lowercase();
    if tfm.starts_with(".netframework") {
        return FrameworkRank::Legacy;
    }
    if tfm.starts_with("netcoreapp") || tfm.starts_with(".netcoreapp") {
        return FrameworkRank::Current;
    }
    if tfm.starts_with("netstandard") || tfm.starts_with(".netstandard") {
        return FrameworkRank::Standard;
    }
    if let Some(version) = tfm.strip_prefix("net") {
        let version = version.split('-').next().unwrap_or(version);
        if version.contains('.') && version.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return FrameworkRank::Current;
        }
        // Dotless short names are full-framework: net20 .. net481
        if version.len() >= 2 && version.chars().all(|c| c.is_ascii_digit()) {
            return FrameworkRank::Legacy;
        }
    }
    FrameworkRank::Other
}

/// Stable-sort `outputs` by the rank of their framework; the first entry is
/// "the" output when one answer is required.
pub fn rank_outputs<T>(outputs: &mut [T], framework: impl Fn(&T) -> &str) {
    outputs.sort_by_key(|output| framework_rank(framework(output)));
}

/// Framework folder of a conventional output path (`bin/Debug/net8.0/App.dll`).
pub fn framework_of_path(path: &Path) -> Option<&str> {
    path.parent()?.file_name()?.to_str()
}

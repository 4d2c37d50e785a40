//! Content inspectors used by the content filter.
//!
//! Each inspector is a pure predicate over a path (relative to the walk
//! root) and the file's bytes. None of them look at the filesystem.

use std::path::Path;
use std::sync::LazyLock;

use regex::{Regex, RegexSet};

use crate::data::classify::{language_for_path, CONFIGURATION_LANGUAGES};

/// Lines scanned for generated-code markers.
const GENERATED_HEADER_LINES: usize = 10;

static VENDOR_PATHS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(^|/)vendor/",
        r"(^|/)vendors/",
        r"(^|/)node_modules/",
        r"(^|/)bower_components/",
        r"(^|/)jspm_packages/",
        r"(^|/)third[-_]?party/",
        r"(^|/)3rd[-_]?party/",
        r"(^|/)external/",
        r"(^|/)extern/",
        r"(^|/)deps/",
        r"(^|/)Godeps/",
        r"(^|/)Pods/",
        r"(^|/)Carthage/",
        r"(^|/)\.yarn/",
        r"(^|/)\.bundle/",
        r"(^|/)site-packages/",
        r"(^|/)\.venv/",
        r"(^|/)venv/",
        r"(^|/)bin/",
        r"(^|/)cache/",
        r"(^|/)dist/",
        r"(^|/)gradlew(\.bat)?$",
        r"(^|/)mvnw(\.cmd)?$",
        r"(^|/)configure$",
        r"(^|/)config\.guess$",
        r"(^|/)config\.sub$",
        r"(^|/)jquery([^.]*)\.js$",
        r"(^|/)jquery-\d\.\d+(\.\d+)?(\.min)?\.js$",
        r"(^|/)bootstrap([^/.]*)\.(js|css)$",
        r"\.min\.(js|css)$",
        r"-min\.(js|css)$",
    ])
    .expect("vendor patterns are valid")
});

static GENERATED_PATHS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"\.min\.(js|css)$",
        r"\.(js|css)\.map$",
        r"\.pb\.go$",
        r"\.pb\.(cc|h)$",
        r"_pb2(_grpc)?\.py$",
        r"\.pb\.rs$",
        r"\.g\.dart$",
        r"\.designer\.(cs|vb)$",
        r"\.generated\.\w+$",
        r"(^|/)package-lock\.json$",
        r"(^|/)npm-shrinkwrap\.json$",
        r"(^|/)yarn\.lock$",
        r"(^|/)pnpm-lock\.yaml$",
        r"(^|/)Cargo\.lock$",
        r"(^|/)Gemfile\.lock$",
        r"(^|/)poetry\.lock$",
        r"(^|/)composer\.lock$",
        r"(^|/)go\.sum$",
        r"(^|/)Pipfile\.lock$",
        r"(^|/)__generated__/",
    ])
    .expect("generated patterns are valid")
});

static GENERATED_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(^// Code generated .* DO NOT EDIT\.$|@generated|<auto-generated|autogenerated by|generated by the protocol buffer compiler|this file was automatically generated)",
    )
    .expect("generated marker is valid")
});

/// Forward-slash form of a path for pattern matching.
fn slashed(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Whether the content looks binary.
///
/// Text in a BOM-marked UTF-16 or UTF-32 encoding is not binary even though
/// it contains NUL bytes.
pub fn is_binary(content: &[u8]) -> bool {
    content_inspector::inspect(content).is_binary()
}

/// Whether the file's base name starts with a dot.
pub fn is_dotfile(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
}

/// Whether the file is configuration rather than code, judged by name.
pub fn is_configuration(path: &Path) -> bool {
    language_for_path(path).is_some_and(|language| CONFIGURATION_LANGUAGES.contains(&language))
}

/// Whether the file is generated, by well-known name or by a marker comment
/// near the top of the file.
pub fn is_generated(path: &Path, content: &[u8]) -> bool {
    if GENERATED_PATHS.is_match(&slashed(path)) {
        return true;
    }
    let head = content
        .split(|b| *b == b'\n')
        .take(GENERATED_HEADER_LINES)
        .map(String::from_utf8_lossy);
    for line in head {
        if GENERATED_MARKER.is_match(line.trim_end_matches('\r')) {
            return true;
        }
    }
    false
}

/// Whether the file lives in a vendored or third-party location.
pub fn is_vendor(path: &Path) -> bool {
    VENDOR_PATHS.is_match(&slashed(path))
}

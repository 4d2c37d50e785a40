//! Filetype detection.
//!
//! Detection is delegated to a [`Classifier`], which looks at the file name
//! and content and returns a language label when it recognizes the file.
//! When it does not, [`detect_filetype`] falls back to the raw extension so
//! unknown formats are still grouped (e.g. every `.xyz` file together).
//! Files with neither a recognized language nor an extension are skipped.

use std::path::Path;

/// Maps a file to a filetype label.
///
/// Implementations see the full content of the file and may use it to
/// resolve ambiguous extensions. Returning `None` means "no opinion".
pub trait Classifier {
    fn classify(&self, path: &Path, content: &[u8]) -> Option<String>;
}

impl<F> Classifier for F
where
    F: Fn(&Path, &[u8]) -> Option<String>,
{
    fn classify(&self, path: &Path, content: &[u8]) -> Option<String> {
        self(path, content)
    }
}

/// Languages treated as configuration rather than code.
pub const CONFIGURATION_LANGUAGES: &[&str] = &[
    "JSON",
    "JSON with Comments",
    "YAML",
    "TOML",
    "XML",
    "INI",
    "Java Properties",
    "EditorConfig",
];

/// Built-in language classifier.
///
/// Resolution order: exact file name, shebang interpreter, extension,
/// then content heuristics for extensions shared by several languages.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageClassifier;

impl LanguageClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl Classifier for LanguageClassifier {
    fn classify(&self, path: &Path, content: &[u8]) -> Option<String> {
        let name = path.file_name()?.to_str()?;

        if let Some(language) = language_for_filename(name) {
            return Some(language.to_string());
        }
        if let Some(language) = language_for_shebang(content) {
            return Some(language.to_string());
        }

        let ext = name.rsplit_once('.').map(|(_, ext)| ext)?;
        let ext = ext.to_ascii_lowercase();
        match ext.as_str() {
            "h" => Some(disambiguate_header(content).to_string()),
            "m" => Some(disambiguate_m(content).to_string()),
            _ => language_for_extension(&ext).map(str::to_string),
        }
    }
}

/// The extension of `path`: text after the last `.` of the base name,
/// including the dot.
pub fn extension_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let dot = name.rfind('.')?;
    Some(name[dot..].to_string())
}

/// Detect the filetype for a file, falling back to its extension.
///
/// Returns `None` when the classifier has no answer and the file has no
/// extension; such files contribute nothing to the counts.
pub fn detect_filetype(classifier: &dyn Classifier, path: &Path, content: &[u8]) -> Option<String> {
    classifier
        .classify(path, content)
        .filter(|label| !label.is_empty())
        .or_else(|| extension_of(path))
}

/// Language implied by the extension alone, ignoring content.
pub fn language_for_path(path: &Path) -> Option<&'static str> {
    let name = path.file_name()?.to_str()?;
    if let Some(language) = language_for_filename(name) {
        return Some(language);
    }
    let (_, ext) = name.rsplit_once('.')?;
    language_for_extension(&ext.to_ascii_lowercase())
}

fn language_for_filename(name: &str) -> Option<&'static str> {
    let language = match name {
        "Makefile" | "makefile" | "GNUmakefile" => "Makefile",
        "Dockerfile" | "Containerfile" => "Dockerfile",
        "CMakeLists.txt" => "CMake",
        "Rakefile" | "Gemfile" | "Podfile" | "Vagrantfile" => "Ruby",
        "Jenkinsfile" => "Groovy",
        "BUILD" | "BUILD.bazel" | "WORKSPACE" => "Starlark",
        ".bashrc" | ".bash_profile" | ".profile" | ".zshrc" => "Shell",
        ".editorconfig" => "EditorConfig",
        "go.mod" => "Go Module",
        "go.sum" => "Go Checksums",
        "Cargo.lock" | "Pipfile" => "TOML",
        _ => return None,
    };
    Some(language)
}

fn language_for_shebang(content: &[u8]) -> Option<&'static str> {
    let first_line = content.split(|b| *b == b'\n').next()?;
    let line = std::str::from_utf8(first_line).ok()?.trim_end();
    let command = line.strip_prefix("#!")?;

    let mut parts = command.split_whitespace();
    let mut interpreter = parts.next()?.rsplit('/').next()?;
    if interpreter == "env" {
        interpreter = parts.find(|arg| !arg.starts_with('-'))?;
    }
    let interpreter = interpreter.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.');

    let language = match interpreter {
        "sh" | "bash" | "zsh" | "ksh" | "dash" | "ash" => "Shell",
        "fish" => "fish",
        "python" => "Python",
        "ruby" => "Ruby",
        "perl" => "Perl",
        "node" | "nodejs" => "JavaScript",
        "deno" | "ts-node" => "TypeScript",
        "php" => "PHP",
        "lua" => "Lua",
        "Rscript" => "R",
        "tclsh" | "wish" => "Tcl",
        "awk" | "gawk" => "Awk",
        _ => return None,
    };
    Some(language)
}

fn language_for_extension(ext: &str) -> Option<&'static str> {
    let language = match ext {
        "rs" => "Rust",
        "go" => "Go",
        "py" | "pyw" | "pyi" => "Python",
        "rb" | "rake" | "gemspec" => "Ruby",
        "js" | "mjs" | "cjs" => "JavaScript",
        "jsx" => "JavaScript",
        "ts" | "mts" | "cts" => "TypeScript",
        "tsx" => "TSX",
        "java" => "Java",
        "kt" | "kts" => "Kotlin",
        "scala" | "sc" => "Scala",
        "groovy" | "gradle" => "Groovy",
        "c" => "C",
        "cc" | "cpp" | "cxx" | "c++" | "hpp" | "hh" | "hxx" | "h++" => "C++",
        "mm" => "Objective-C++",
        "cs" => "C#",
        "fs" | "fsi" | "fsx" => "F#",
        "vb" => "Visual Basic .NET",
        "swift" => "Swift",
        "dart" => "Dart",
        "php" => "PHP",
        "pl" | "pm" => "Perl",
        "lua" => "Lua",
        "r" => "R",
        "jl" => "Julia",
        "hs" | "lhs" => "Haskell",
        "ml" | "mli" => "OCaml",
        "ex" | "exs" => "Elixir",
        "erl" | "hrl" => "Erlang",
        "clj" | "cljs" | "cljc" | "edn" => "Clojure",
        "zig" => "Zig",
        "nim" => "Nim",
        "d" => "D",
        "v" | "sv" => "Verilog",
        "vhd" | "vhdl" => "VHDL",
        "asm" | "s" => "Assembly",
        "sh" | "bash" | "zsh" | "ksh" => "Shell",
        "fish" => "fish",
        "ps1" | "psm1" | "psd1" => "PowerShell",
        "bat" | "cmd" => "Batchfile",
        "sql" => "SQL",
        "html" | "htm" | "xhtml" => "HTML",
        "css" => "CSS",
        "scss" => "SCSS",
        "sass" => "Sass",
        "less" => "Less",
        "vue" => "Vue",
        "svelte" => "Svelte",
        "md" | "markdown" => "Markdown",
        "rst" => "reStructuredText",
        "tex" => "TeX",
        "json" => "JSON",
        "jsonc" => "JSON with Comments",
        "yml" | "yaml" => "YAML",
        "toml" => "TOML",
        "xml" | "xsd" | "xsl" | "plist" | "csproj" => "XML",
        "ini" | "cfg" => "INI",
        "properties" => "Java Properties",
        "proto" => "Protocol Buffer",
        "graphql" | "gql" => "GraphQL",
        "tf" | "hcl" => "HCL",
        "nix" => "Nix",
        "cmake" => "CMake",
        "mk" => "Makefile",
        "dockerfile" => "Dockerfile",
        "elm" => "Elm",
        "purs" => "PureScript",
        "cr" => "Crystal",
        "sol" => "Solidity",
        "tcl" => "Tcl",
        "awk" => "Awk",
        "vim" => "Vim Script",
        "el" => "Emacs Lisp",
        "lisp" | "cl" => "Common Lisp",
        "scm" | "ss" => "Scheme",
        "rkt" => "Racket",
        "f" | "f90" | "f95" | "for" => "Fortran",
        "cob" | "cbl" => "COBOL",
        "pas" => "Pascal",
        "ada" | "adb" | "ads" => "Ada",
        "m4" => "M4",
        _ => return None,
    };
    Some(language)
}

fn disambiguate_header(content: &[u8]) -> &'static str {
    let text = String::from_utf8_lossy(content);
    if text.contains("@interface") || text.contains("@protocol") || text.contains("#import") {
        "Objective-C"
    } else if text.contains("namespace ")
        || text.contains("template <")
        || text.contains("template<")
        || text.contains("std::")
        || text.contains("class ")
    {
        "C++"
    } else {
        "C"
    }
}

fn disambiguate_m(content: &[u8]) -> &'static str {
    let text = String::from_utf8_lossy(content);
    if text.contains("@interface")
        || text.contains("@implementation")
        || text.contains("#import")
        || text.contains("#include")
    {
        "Objective-C"
    } else {
        "MATLAB"
    }
}

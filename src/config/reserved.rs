//! Reserved command names
//!
//! Tool commands must not shadow built-in verbs or well-known product names.
//! Each rule blocks a word in one of three ways, always ignoring case:
//! anywhere in the name, as the name's first hyphen-separated word, or as the
//! whole name.

/// How a reserved word is matched against a command name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    /// Name contains the word anywhere
    Contains,
    /// Name equals the word or starts with `word-`
    StartsWithWord,
    /// Name equals the word
    Whole,
}

const WHOLE: &[&str] = &[
    "add", "build", "clean", "install", "list", "migrate", "new", "pack", "publish", "remove",
    "restore", "run", "test", "uninstall", "update", "watch",
];

const CONTAINS: &[&str] = &[
    "dev-certs",
    "msbuild",
    "vstest",
    "app-insights",
    "appinsights",
    "asp",
    "asp-net",
    "aspnet",
    "az",
    "azure",
    "code",
    "browserlink",
    "browser-link",
    "core",
    "csc",
    "csi",
    "devcerts",
    "dn",
    "dnu",
    "dnvm",
    "dnx",
    "dot",
    "dotnet",
    "dot-net",
    "dx",
    "editor-config",
    "editorconfig",
    "ef",
    "entity-framework",
    "entityframework",
    "etw",
    "fsc",
    "fsi",
    "intellisense",
    "intellitest",
    "nuget",
    "libman",
    "lib-man",
    "live-test",
    "livetest",
    "live-unit-test",
    "live-unit-testing",
    "lut",
    "microsoft",
    "msft",
    "notch",
    "razor",
    "rzc",
    "runtime-store",
    "test-impat",
    "testimpact",
    "vbc",
    "visual",
    "vso",
    "vsts",
];

const STARTS_WITH_WORD: &[&str] = &[
    "analysis",
    "analyze",
    "background",
    "bg",
    "clean-up",
    "cleanup",
    "code-coverage",
    "codecoverage",
    "code-gen",
    "codegen",
    "copy",
    "cover",
    "debug",
    "delete",
    "dmp",
    "dump",
    "do",
    "doctor",
    "fix",
    "fix-all",
    "fixall",
    "fmt",
    "format",
    "framework",
    "http",
    "https",
    "info",
    "init",
    "inspect",
    "interactive",
    "move",
    "package",
    "packman",
    "pack-man",
    "patch",
    "pretty",
    "project",
    "property",
    "reference",
    "repl",
    "runtime",
    "scaffold",
    "sdk",
    "spit",
    "shutdown",
    "sln",
    "solution",
    "start",
    "stop",
    "target",
    "template",
    "undo",
    "version",
    "web",
];

fn check(rule: Rule, word: &str, name: &str) -> Option<String> {
    let lower_name = name.to_lowercase();
    match rule {
        Rule::Contains if lower_name.contains(word) => Some(format!(
            "command name '{name}' contains reserved string '{word}'."
        )),
        Rule::StartsWithWord
            if lower_name == word || lower_name.starts_with(&format!("{word}-")) =>
        {
            Some(format!(
                "command name '{name}' starts with reserved word '{word}'."
            ))
        }
        Rule::Whole if lower_name == word => Some(format!(
            "command name '{name}' matches reserved string '{word}'."
        )),
        _ => None,
    }
}

/// Single letters and digits 0-8 are reserved as leading words
fn generic_words() -> impl Iterator<Item = String> {
    ('a'..='z')
        .chain('0'..='8')
        .map(|c| c.to_string())
}

/// Every reserved-word violation for `name`, in rule order
pub fn reserved_word_errors(name: &str) -> Vec<String> {
    let explicit = WHOLE
        .iter()
        .map(|w| (Rule::Whole, (*w).to_string()))
        .chain(CONTAINS.iter().map(|w| (Rule::Contains, (*w).to_string())))
        .chain(
            STARTS_WITH_WORD
                .iter()
                .map(|w| (Rule::StartsWithWord, (*w).to_string())),
        );

    explicit
        .chain(generic_words().map(|w| (Rule::StartsWithWord, w)))
        .filter_map(|(rule, word)| check(rule, &word, name))
        .collect()
}

//! ES module to IIFE rewriting
//!
//! Rewrites one module's `import`/`export` statements into bindings against
//! a runtime module registry, then wraps the body in an immediately invoked
//! closure so top-level declarations stay private. Strings, template
//! literals, and comments are scanned ahead of the import/export rules, so
//! statement keywords inside them are never rewritten.
//!
//! The recognizer is a bounded lexical approximation. Statement shapes it
//! does not know (for example `export { a, b }` lists) pass through
//! unmodified rather than raising an error.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::minify::minify;
use crate::scan::{self, Context, PatternSet, TokenAction};

/// An `import` statement: optional default binding, then optionally a
/// destructuring list or a `* as name` namespace alias, then a quoted path.
/// The whole `from` clause is optional so bare side-effect imports match too.
const IMPORT_STATEMENT: &str = r#"\bimport\s+(?:(?:(?P<default_import>\w+)\s*(?:,\s*)?)?(?:(?P<destructuring>\{[^}]*\})\s*|\*\s+as\s+(?P<namespace_alias>\w+)\s+)?from\s+)?['"](?P<module_path>[^'"]+)['"]\s*;?"#;

/// An `export` statement: optional `default`, optional declaration keyword,
/// then the exported identifier.
const EXPORT_STATEMENT: &str =
    r"\bexport\s+(?P<export_default>default\s+)?(?:(?P<declaration>function|const|let|var|class)\s+)?(?P<export_name>\w+)\s*";

static TRANSFORM_PATTERNS: Lazy<PatternSet> = Lazy::new(|| {
    PatternSet::compile(&[
        scan::STRING,
        scan::TEMPLATE,
        scan::BLOCK_COMMENT,
        scan::LINE_COMMENT,
        IMPORT_STATEMENT,
        EXPORT_STATEMENT,
    ])
    .expect("transform patterns are valid")
});

/// Rewrites `x as y` inside a destructuring list to the object-pattern
/// rename form `x : y`.
static RENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)\s+as\s+(\w+)").expect("rename pattern is valid"));

/// Result of converting one module.
#[derive(Debug, Clone)]
pub struct TransformedModule {
    /// The wrapped IIFE text, ready to drop into a script block.
    pub text: String,
    /// Registry key (import path's base name) to original import path,
    /// in encounter order.
    pub imports: Vec<(String, String)>,
}

/// The registry key an import path is filed under: its base file name.
fn registry_key(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Convert one ES module's text into a self-contained IIFE.
///
/// `module_filename` is the registry key this module publishes its exports
/// under; inline scripts have none and never publish. With `minify_output`
/// the wrapped text is additionally run through [`minify`].
pub fn convert_module(
    source: &str,
    module_filename: Option<&str>,
    minify_output: bool,
) -> TransformedModule {
    let mut imports: Vec<(String, String)> = Vec::new();
    let mut exports: Vec<(String, String)> = Vec::new();

    let mut rewrite_import = |caps: &Captures<'_>, _: &Context<'_>| -> String {
        let path = caps["module_path"].trim().to_string();
        let key = registry_key(&path);
        if !imports.iter().any(|(existing, _)| *existing == key) {
            imports.push((key.clone(), path));
        }
        let mut bindings = Vec::new();
        if let Some(pattern) = caps.name("destructuring") {
            let renamed = RENAME.replace_all(pattern.as_str().trim(), "$1 : $2");
            bindings.push(format!("let {renamed} = modules[\"{key}\"];"));
        }
        if let Some(alias) = caps.name("namespace_alias") {
            bindings.push(format!("let {} = modules[\"{key}\"];", alias.as_str()));
        }
        if let Some(default) = caps.name("default_import") {
            bindings.push(format!("let {} = modules[\"{key}\"].default;", default.as_str()));
        }
        bindings.join("\n")
    };

    let mut rewrite_export = |caps: &Captures<'_>, _: &Context<'_>| -> String {
        let name = caps["export_name"].to_string();
        if !exports.iter().any(|(existing, _)| *existing == name) {
            exports.push((name.clone(), name.clone()));
        }
        if caps.name("export_default").is_some()
            && !exports.iter().any(|(existing, _)| existing == "default")
        {
            exports.push((String::from("default"), name.clone()));
        }
        match caps.name("declaration") {
            Some(declaration) => format!("{} {name}", declaration.as_str()),
            None => String::new(),
        }
    };

    let mut actions = [
        TokenAction::Keep,
        TokenAction::Keep,
        if minify_output { TokenAction::Discard } else { TokenAction::Keep },
        if minify_output { TokenAction::Discard } else { TokenAction::Keep },
        TokenAction::Rewrite(&mut rewrite_import),
        TokenAction::Rewrite(&mut rewrite_export),
    ];
    let body = TRANSFORM_PATTERNS.rewrite(source, &mut actions);

    let wrapped = match module_filename {
        Some(filename) if !exports.is_empty() => {
            let export_object = exports
                .iter()
                .map(|(name, local)| format!("{name}:{local}"))
                .collect::<Vec<_>>()
                .join(",");
            format!(
                "\n(function(global) {{\n{body}\nif(!(\"modules\" in global)){{\n global[\"modules\"]={{}}\n}}\nglobal.modules[\"{filename}\"] = {{{export_object}}} ;\n}})(window);"
            )
        }
        _ => format!("\n(function(global) {{\n{body}\n}})(window);"),
    };

    let text = if minify_output { minify(&wrapped) } else { wrapped };
    TransformedModule { text, imports }
}

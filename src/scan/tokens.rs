//! Shared lexical fragments for the common JavaScript token shapes.
//!
//! These are the classifiers every scanner in the crate lists ahead of its
//! semantic rules. They are a bounded lexical approximation, not a full
//! tokenizer: template-literal interpolation in particular is matched
//! verbatim, not parsed.

/// Single- or double-quoted string. Backslash escapes are honored, and the
/// match never crosses an unescaped closing quote.
pub const STRING: &str = r#"'(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*""#;

/// Backtick template literal; may span multiple lines.
pub const TEMPLATE: &str = r"`(?:[^`\\]|\\[\s\S])*`";

/// Line comment, through the trailing line break or the end of input.
pub const LINE_COMMENT: &str = r"//.*?(?:\n|$)";

/// Block comment, non-greedy, may span multiple lines.
pub const BLOCK_COMMENT: &str = r"/\*[\s\S]*?\*/";

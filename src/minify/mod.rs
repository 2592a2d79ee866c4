//! Whitespace and comment stripping
//!
//! Removes comments and collapses insignificant whitespace while leaving
//! the literal content of strings and template literals untouched. Besides
//! script text this also works on other delimiter-heavy text the host wants
//! shrunk, such as inline style sheets.

use once_cell::sync::Lazy;
use regex::Captures;

use crate::scan::{self, Context, PatternSet, TokenAction};

/// Characters around which whitespace is insignificant on either side.
///
/// Closing brackets are deliberately absent: a line break after `]`, `}` or
/// `)` can be the only statement terminator automatic semicolon insertion
/// has to work with, so whitespace following them is only collapsed, never
/// deleted.
const DELIMITERS: &str = "=({:<>;,?%&|*+-/";

/// Additional characters that make whitespace *before* them removable.
/// A break ahead of a closing bracket never terminates a statement.
const CLOSING: &str = "]})";

static MINIFY_PATTERNS: Lazy<PatternSet> = Lazy::new(|| {
    PatternSet::compile(&[
        scan::STRING,
        scan::TEMPLATE,
        scan::BLOCK_COMMENT,
        scan::LINE_COMMENT,
        r"\s+",
    ])
    .expect("minify patterns are valid")
});

/// Minify `source`: strip comments and squeeze whitespace.
///
/// Idempotent, and never alters the interior of string or template tokens.
pub fn minify(source: &str) -> String {
    let mut collapse = |caps: &Captures<'_>, context: &Context<'_>| -> String {
        if context.preceding().is_some_and(|c| DELIMITERS.contains(c)) {
            return String::new();
        }
        if context
            .following()
            .is_some_and(|c| DELIMITERS.contains(c) || CLOSING.contains(c))
        {
            return String::new();
        }
        let run = &caps[0];
        if run.contains('\n') {
            String::from("\n")
        } else if run.len() >= 2 {
            String::from(" ")
        } else {
            run.to_string()
        }
    };

    let mut actions = [
        TokenAction::Keep,
        TokenAction::Keep,
        TokenAction::Discard,
        TokenAction::Discard,
        TokenAction::Rewrite(&mut collapse),
    ];
    MINIFY_PATTERNS.rewrite(source, &mut actions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_interior_is_preserved() {
        assert_eq!(minify("let s = \"a;  b\";"), "let s=\"a;  b\";");
    }

    #[test]
    fn test_template_interior_is_preserved() {
        assert_eq!(minify("let t = `a\n  b`;"), "let t=`a\n  b`;");
    }

    #[test]
    fn test_line_comments_removed() {
        assert_eq!(minify("a = 1; // note\nb = 2;"), "a=1;b=2;");
    }

    #[test]
    fn test_block_comments_removed() {
        assert_eq!(minify("a = 1; /* note\nnote */ b = 2;"), "a=1;b=2;");
    }

    #[test]
    fn test_whitespace_around_delimiters_deleted() {
        assert_eq!(minify("if (x) {\n  y();\n}"), "if(x){y();}");
    }

    #[test]
    fn test_newline_after_closing_bracket_survives() {
        // ASI relies on this break to terminate the first statement.
        assert_eq!(minify("f()\ng()"), "f()\ng()");
    }

    #[test]
    fn test_newline_runs_collapse_to_one() {
        assert_eq!(minify("a\n\n\nb"), "a\nb");
    }

    #[test]
    fn test_space_runs_collapse_to_one() {
        assert_eq!(minify("let   x"), "let x");
    }

    #[test]
    fn test_single_space_between_words_kept() {
        assert_eq!(minify("let x"), "let x");
    }

    #[test]
    fn test_idempotent() {
        let source = "function add(a, b) {\n  // sum\n  return a + b;\n}\nadd(1, 2)\nconsole.log('x;  y')\n";
        let once = minify(source);
        assert_eq!(minify(&once), once);
    }
}

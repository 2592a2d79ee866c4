//! String/comment-aware text scanning
//!
//! This module provides multi-rule lexical scanning with:
//! - A combinator that merges independent pattern rules into one alternation
//! - Per-match attribution to exactly one rule via tagged capture groups
//! - Shared token classifiers for strings, template literals, and comments
//!
//! Rules earlier in the list win ties at the same start position, so a
//! scanner that lists the token classifiers first can never fire a semantic
//! rule inside a string literal or a comment.

mod tokens;

pub use tokens::{BLOCK_COMMENT, LINE_COMMENT, STRING, TEMPLATE};

use regex::{Captures, Regex};
use thiserror::Error;

/// Errors that can occur while building a scanner
#[derive(Debug, Error)]
pub enum ScanError {
    /// A pattern fragment did not compile as part of the alternation
    #[error("invalid pattern fragment: {0}")]
    Pattern(#[from] regex::Error),
}

/// Characters adjacent to a match.
///
/// Handlers that care about surrounding context (the minifier's whitespace
/// rule) read it from here instead of consuming the neighboring characters,
/// which would steal them from rules matching at the next position. The
/// preceding side is read from the text already emitted by the scan, so a
/// handler's decision stands even when an earlier rule deleted its left
/// neighbor; rescanning the output reproduces the same decisions.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    emitted: &'a str,
    text: &'a str,
    end: usize,
}

impl Context<'_> {
    /// The character immediately before the match in the rewritten output.
    pub fn preceding(&self) -> Option<char> {
        self.emitted.chars().next_back()
    }

    /// The character immediately after the match in the input, if any.
    pub fn following(&self) -> Option<char> {
        self.text[self.end..].chars().next()
    }
}

/// Handler invoked for a match attributed to a [`TokenAction::Rewrite`] rule.
pub type RewriteFn<'h> = dyn FnMut(&Captures<'_>, &Context<'_>) -> String + 'h;

/// What to splice in place of a matched span.
pub enum TokenAction<'h> {
    /// Put the matched text back unchanged
    Keep,
    /// Delete the matched text
    Discard,
    /// Replace the matched text with fixed text
    Replace(&'static str),
    /// Replace the matched text with the handler's return value
    Rewrite(&'h mut RewriteFn<'h>),
}

/// An ordered set of pattern rules compiled into a single alternation.
///
/// Each fragment is wrapped in a uniquely named capture group so a match can
/// be attributed to exactly one rule. Compiled in multi-line mode.
#[derive(Debug)]
pub struct PatternSet {
    regex: Regex,
    tags: Vec<String>,
}

impl PatternSet {
    /// Compile an ordered list of pattern fragments into one scanner.
    pub fn compile(fragments: &[&str]) -> Result<Self, ScanError> {
        let tags: Vec<String> = (0..fragments.len()).map(|i| format!("arm{i}")).collect();
        let alternation = fragments
            .iter()
            .zip(&tags)
            .map(|(fragment, tag)| format!("(?P<{tag}>{fragment})"))
            .collect::<Vec<_>>()
            .join("|");
        let regex = Regex::new(&format!("(?m){alternation}"))?;
        Ok(Self { regex, tags })
    }

    /// Number of rules in the set.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Scan `text` left to right and splice each match's action result.
    ///
    /// `actions` must line up with the fragments the set was compiled from.
    /// Spans not matched by any rule are copied through verbatim.
    pub fn rewrite(&self, text: &str, actions: &mut [TokenAction<'_>]) -> String {
        debug_assert_eq!(actions.len(), self.tags.len());
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in self.regex.captures_iter(text) {
            let whole = caps.get(0).unwrap();
            out.push_str(&text[last..whole.start()]);
            let arm = self.tags.iter().position(|tag| caps.name(tag).is_some());
            match arm.map(|i| &mut actions[i]) {
                Some(TokenAction::Keep) | None => out.push_str(whole.as_str()),
                Some(TokenAction::Discard) => {}
                Some(TokenAction::Replace(replacement)) => out.push_str(*replacement),
                Some(TokenAction::Rewrite(handler)) => {
                    let context = Context {
                        emitted: &out,
                        text,
                        end: whole.end(),
                    };
                    let replacement = handler(&caps, &context);
                    out.push_str(&replacement);
                }
            }
            last = whole.end();
        }
        out.push_str(&text[last..]);
        out
    }
}

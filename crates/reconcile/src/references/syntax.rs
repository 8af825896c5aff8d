//! The link syntaxes that can embed an image in a document

use imgsweep_errors::Error;
use imgsweep_types::ExtensionSet;
use regex::Regex;
use std::fmt;

/// A way of writing an image reference in markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkSyntax {
    /// `![[target]]` or `![[target|alias]]`
    WikiEmbed,
    /// `![alt](target)`, `![alt](target "title")` or `![alt](<target>)`.
    ///
    /// The bare target may contain spaces and percent escapes.
    InlineImage,
}

impl LinkSyntax {
    pub const ALL: [Self; 2] = [Self::WikiEmbed, Self::InlineImage];

    /// Regex source for this syntax restricted to `extensions`.
    ///
    /// Every capture group that participates in a match holds the target.
    #[must_use]
    pub fn pattern(self, extensions: &ExtensionSet) -> String {
        let exts = extensions
            .iter()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");

        match self {
            Self::WikiEmbed => {
                format!(r"(?i)!\[\[([^\]|\n]+?\.(?:{exts}))(?:\|[^\]\n]*)?\]\]")
            }
            Self::InlineImage => format!(
                r#"(?i)!\[[^\]\n]*\]\(\s*(?:<([^>\n]+?\.(?:{exts}))>|([^)\n]+?\.(?:{exts})))(?:\s+"[^"\n]*")?\s*\)"#
            ),
        }
    }

    /// Compile the matcher for this syntax.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the generated pattern does not compile.
    pub fn compile(self, extensions: &ExtensionSet) -> Result<Regex, Error> {
        Regex::new(&self.pattern(extensions))
            .map_err(|e| Error::internal(format!("invalid {self} pattern: {e}")))
    }
}

impl fmt::Display for LinkSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WikiEmbed => f.write_str("wiki-embed"),
            Self::InlineImage => f.write_str("inline-image"),
        }
    }
}

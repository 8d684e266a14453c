// src/pipeline/comments.rs

//! Comment normalization applied to compiled CSS before writing.
//!
//! The compiler flattens blank lines around section comments; these four
//! rewrites restore a readable layout. They run in a fixed order:
//!
//! 1. variable-doc blocks (`/*### ... ###*/`): collapse any trailing
//!    blank run to a single newline
//! 2. large section banners (`/**** ... ****/`): two blank lines before,
//!    one after
//! 3. medium banners (`/*--- ... ---*/`): one blank line before, newline
//!    after
//! 4. small comments (`/* ... */`, space-delimited): newline before

use std::sync::LazyLock;

use regex::Regex;

static VARIABLE_DOCS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(/\*###[\s\S]*?###\*/)\n+").unwrap());

static LARGE_BANNER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n*(/\*\*\*\*[\s\S]*?\*\*\*\*/)\n*").unwrap());

static MEDIUM_BANNER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n*(/\*---[\s\S]*?---\*/)\n*").unwrap());

static SMALL_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(/\* [\s\S]*? \*/)").unwrap());

/// Apply the four rewrites in order.
pub fn normalize(css: &str) -> String {
    let css = VARIABLE_DOCS.replace_all(css, "$1\n");
    let css = LARGE_BANNER.replace_all(&css, "\n\n\n$1\n\n");
    let css = MEDIUM_BANNER.replace_all(&css, "\n\n$1\n");
    let css = SMALL_COMMENT.replace_all(&css, "\n$1");
    css.into_owned()
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn variable_docs_keep_single_trailing_newline() {
        let input = "/*### Fonts ###*/\n\n\n\n.a { color: red; }";
        assert_eq!(normalize(input), "/*### Fonts ###*/\n.a { color: red; }");
    }

    #[test]
    fn large_banner_gets_two_blank_lines_before() {
        let input = ".a {}\n/****\nButton\n****/\n.b {}";
        assert_eq!(normalize(input), ".a {}\n\n\n/****\nButton\n****/\n\n.b {}");
    }

    #[test]
    fn medium_banner_gets_one_blank_line_before() {
        let input = ".a {}\n/*---\nStates\n---*/\n.b {}";
        assert_eq!(normalize(input), ".a {}\n\n/*---\nStates\n---*/\n.b {}");
    }

    #[test]
    fn small_comment_gets_newline_before() {
        let input = ".a {}\n/* Hover */\n.b {}";
        assert_eq!(normalize(input), ".a {}\n\n/* Hover */\n.b {}");
    }

    #[test]
    fn banner_markers_are_not_treated_as_small_comments() {
        // `/*!` and `/*###` lack the space delimiter, so rule 4 skips them.
        let input = "/*! header */\n.a {}";
        assert_eq!(normalize(input), "/*! header */\n.a {}");
    }
}

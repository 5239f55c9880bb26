//! Fenced-block extraction and SEARCH/REPLACE patch application.
//!
//! Pure and deterministic: no network calls, no randomness, no filesystem
//! access. All three operations operate purely on `&str` in, `String` out.

use crate::error::{Error, Result};

const SEARCH_MARKER: &str = "<<<<<<< SEARCH";
const DIVIDER: &str = "=======\n";
const REPLACE_MARKER: &str = ">>>>>>> REPLACE";

/// Concatenates the contents of every fenced code block tagged with
/// `language_tag`, in document order. A block is opened by three backticks
/// followed immediately by a language tag and closed by three backticks on
/// their own. An unterminated fence is ignored along with everything after
/// it.
#[must_use]
pub fn extract_snippets(raw: &str, language_tag: &str) -> String {
    const FENCE: &str = "```";
    let mut out = String::new();
    let mut rest = raw;

    while let Some(start) = rest.find(FENCE) {
        let after_fence = &rest[start + FENCE.len()..];
        let line_end = after_fence.find('\n').unwrap_or(after_fence.len());
        let tag = after_fence[..line_end].trim();
        let body_start = (line_end + 1).min(after_fence.len());
        let body = &after_fence[body_start..];

        let Some(end) = body.find(FENCE) else {
            break;
        };
        if tag == language_tag {
            out.push_str(&body[..end]);
        }
        rest = &body[end + FENCE.len()..];
    }
    out
}

/// Extracts `(search, replace)` pairs from literal `<<<<<<< SEARCH` /
/// `=======` / `>>>>>>> REPLACE` triples. Whitespace inside search and
/// replace text is preserved exactly; only the marker lines themselves are
/// stripped. Malformed or unterminated triples are silently dropped.
#[must_use]
pub fn parse_instructions(blob: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut rest = blob;

    while let Some(s_start) = rest.find(SEARCH_MARKER) {
        let after_marker = &rest[s_start + SEARCH_MARKER.len()..];
        let after_marker = after_marker.strip_prefix('\n').unwrap_or(after_marker);

        let Some(div_pos) = after_marker.find(DIVIDER) else {
            break;
        };
        let mut search = &after_marker[..div_pos];
        if div_pos > 0 {
            search = search.strip_suffix('\n').unwrap_or(search);
        }

        let after_divider = &after_marker[div_pos + DIVIDER.len()..];
        let Some(rep_pos) = after_divider.find(REPLACE_MARKER) else {
            break;
        };
        let mut replace = &after_divider[..rep_pos];
        if rep_pos > 0 {
            replace = replace.strip_suffix('\n').unwrap_or(replace);
        }

        pairs.push((search.to_string(), replace.to_string()));
        rest = &after_divider[rep_pos + REPLACE_MARKER.len()..];
    }
    pairs
}

/// Applies patch pairs left to right. A pair whose search text is entirely
/// whitespace is interpreted as an append of its replace text; otherwise the
/// first occurrence of search is replaced. A pair whose search text does not
/// occur leaves the source unchanged for that pair — this never errors.
#[must_use]
pub fn apply_patch(source: &str, pairs: &[(String, String)]) -> String {
    let mut current = source.to_string();
    for (search, replace) in pairs {
        if search.trim().is_empty() {
            current.push_str(replace);
        } else if let Some(pos) = current.find(search.as_str()) {
            current.replace_range(pos..pos + search.len(), replace);
        }
    }
    current
}

/// Applies patch pairs and errors if the result equals the input even though
/// at least one pair had a non-whitespace search. Callers that need to
/// distinguish "patch applied" from "patch was a no-op" (the validation
/// judge's retry loop) use this instead of `apply_patch`.
pub fn apply_patch_checked(source: &str, pairs: &[(String, String)]) -> Result<String> {
    let result = apply_patch(source, pairs);
    let had_real_search = pairs.iter().any(|(s, _)| !s.trim().is_empty());
    if had_real_search && result == source {
        Err(Error::NoOp)
    } else {
        Ok(result)
    }
}

/// Composes `extract_snippets`, `parse_instructions`, and `apply_patch`:
/// pulls patch instructions out of `raw_text`'s fenced blocks tagged
/// `language_tag` and applies them to `source`.
#[must_use]
pub fn apply_edits(raw_text: &str, source: &str, language_tag: &str) -> String {
    let blob = extract_snippets(raw_text, language_tag);
    let pairs = parse_instructions(&blob);
    apply_patch(source, &pairs)
}

/// Textually rewrites every occurrence of `print(` to `pass(`. Idempotent:
/// running it twice has the same effect as running it once, since the
/// rewritten text no longer contains `print(`. As documented in the system
/// design notes, this is a substring rewrite — an occurrence of `print(`
/// inside a string literal is rewritten too.
#[must_use]
pub fn neutralize_prints(source: &str) -> String {
    source.replace("print(", "pass(")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_snippets_concatenates_matching_fences() {
        let raw = "intro\n```rust\nfn a() {}\n```\nmiddle\n```python\nx = 1\n```\n```rust\nfn b() {}\n```\n";
        assert_eq!(extract_snippets(raw, "rust"), "fn a() {}\nfn b() {}\n");
    }

    #[test]
    fn extract_snippets_with_no_fences_is_empty() {
        assert_eq!(extract_snippets("just plain text", "rust"), "");
    }

    #[test]
    fn parse_instructions_extracts_a_single_pair() {
        let blob = "<<<<<<< SEARCH\na += 1;\n=======\na += 2;\n>>>>>>> REPLACE\n";
        let pairs = parse_instructions(blob);
        assert_eq!(pairs, vec![("a += 1;".to_string(), "a += 2;".to_string())]);
    }

    #[test]
    fn parse_instructions_extracts_multiple_pairs() {
        let blob = "<<<<<<< SEARCH\nfoo\n=======\nbar\n>>>>>>> REPLACE\nnoise\n<<<<<<< SEARCH\nbaz\n=======\nqux\n>>>>>>> REPLACE\n";
        let pairs = parse_instructions(blob);
        assert_eq!(
            pairs,
            vec![
                ("foo".to_string(), "bar".to_string()),
                ("baz".to_string(), "qux".to_string()),
            ]
        );
    }

    #[test]
    fn parse_instructions_on_malformed_input_is_empty() {
        assert!(parse_instructions("no markers here").is_empty());
        assert!(parse_instructions("<<<<<<< SEARCH\nfoo\n=======\nbar\n").is_empty());
    }

    #[test]
    fn apply_patch_happy_path() {
        let source = "a += 1;\nlet particles;\n";
        let pairs = vec![("a += 1;".to_string(), "a += 2;".to_string())];
        assert_eq!(apply_patch(source, &pairs), "a += 2;\nlet particles;\n");
    }

    #[test]
    fn apply_patch_whitespace_search_appends() {
        let pairs = vec![("   ".to_string(), "\nprint('end')\n".to_string())];
        assert_eq!(
            apply_patch("main()\n", &pairs),
            "main()\n\nprint('end')\n"
        );
    }

    #[test]
    fn apply_patch_non_matching_search_is_no_op_for_that_pair() {
        let pairs = vec![("does-not-exist".to_string(), "x".to_string())];
        assert_eq!(apply_patch("unchanged", &pairs), "unchanged");
    }

    #[test]
    fn apply_patch_replaces_only_first_occurrence() {
        let pairs = vec![("a".to_string(), "b".to_string())];
        assert_eq!(apply_patch("a a a", &pairs), "b a a");
    }

    #[test]
    fn apply_patch_checked_reports_no_op() {
        let pairs = vec![("missing".to_string(), "x".to_string())];
        assert!(apply_patch_checked("unchanged", &pairs).is_err());
    }

    #[test]
    fn apply_edits_end_to_end() {
        let raw = "Here is a fix:\n```rust\n<<<<<<< SEARCH\nold\n=======\nnew\n>>>>>>> REPLACE\n```\n";
        assert_eq!(apply_edits(raw, "old code here", "rust"), "new code here");
    }

    #[test]
    fn neutralize_prints_rewrites_every_occurrence() {
        assert_eq!(
            neutralize_prints("print('a')\nprint('b')\n"),
            "pass('a')\npass('b')\n"
        );
    }

    #[test]
    fn neutralize_prints_is_idempotent() {
        let once = neutralize_prints("print(1)");
        let twice = neutralize_prints(&once);
        assert_eq!(once, twice);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn empty_patch_list_is_identity(source in "\\PC*") {
            prop_assert_eq!(apply_patch(&source, &[]), source);
        }

        #[test]
        fn whitespace_search_always_appends(source in "[a-z]{0,20}", replace in "[a-z]{0,20}") {
            let pairs = vec![("  \t ".to_string(), replace.clone())];
            let mut expected = source.clone();
            expected.push_str(&replace);
            prop_assert_eq!(apply_patch(&source, &pairs), expected);
        }

        #[test]
        fn single_occurrence_replacement_matches_manual_splice(
            prefix in "[a-z]{0,10}",
            needle in "[a-z]{1,6}",
            suffix in "[a-z]{0,10}",
            replace in "[a-z]{0,10}",
        ) {
            // Build a source where `needle` occurs exactly once by construction
            // (prefix/suffix drawn from a disjoint alphabet would be ideal, but
            // lowercase-only keeps this simple: skip cases where prefix or
            // suffix happen to contain the needle).
            let source = format!("{prefix}{needle}{suffix}");
            prop_assume!(prefix.matches(needle.as_str()).count() == 0);
            let pairs = vec![(needle.clone(), replace.clone())];
            let result = apply_patch(&source, &pairs);
            let expected = format!("{prefix}{replace}{suffix}");
            prop_assert_eq!(result, expected);
        }
    }
}

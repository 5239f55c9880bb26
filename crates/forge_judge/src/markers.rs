//! Parsing of the judge's response markers.
//!
//! The oracle is asked to conclude its analysis with one of three shapes:
//! a `***Analysis Summary***` header followed by a fenced block starting
//! with `pass`; a fenced block containing the phrase `log is too short or
//! empty`; or a free-form `Summary:` / optional `Quote:` section followed
//! by one or more fenced SEARCH/REPLACE blocks. All three are recognized by
//! scanning the raw text rather than a regex engine, mirroring how
//! `forge_patch` finds its own markers.

const PASS_HEADER: &str = "***Analysis Summary***";
const DEAD_LOG_PHRASE: &str = "log is too short or empty";

/// The judge's verdict on a transcript, before any patch has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The gameplay matched the rules; nothing to change.
    Pass,
    /// The transcript was too short or empty to judge either way.
    DeadLog,
    /// The rules were violated; `raw_patch_text` carries the SEARCH/REPLACE
    /// blocks to apply, `summary` and `quote` are the judge's explanation.
    Patch {
        summary: String,
        quote: Option<String>,
        raw_patch_text: String,
    },
}

/// Parses a judge response into a `Verdict`.
pub fn parse_verdict(response: &str) -> Verdict {
    if is_pass(response) {
        return Verdict::Pass;
    }
    if is_dead_log(response) {
        return Verdict::DeadLog;
    }
    let summary = extract_section(response, "Summary:").unwrap_or_default();
    let quote = extract_section(response, "Quote:").or_else(|| extract_section(response, "Quote (optional):"));
    Verdict::Patch {
        summary,
        quote,
        raw_patch_text: response.to_string(),
    }
}

/// True if `text` contains the PASS header followed by a fenced block whose
/// first non-blank line is `pass` (case-insensitive).
fn is_pass(text: &str) -> bool {
    let Some(after_header) = text.find(PASS_HEADER).map(|i| i + PASS_HEADER.len()) else {
        return false;
    };
    fenced_blocks(&text[after_header..])
        .into_iter()
        .any(|block| block.trim().to_ascii_lowercase().starts_with("pass"))
}

/// True if any fenced block in `text` contains the dead-log phrase.
fn is_dead_log(text: &str) -> bool {
    fenced_blocks(text).iter().any(|block| block.contains(DEAD_LOG_PHRASE))
        || text.contains(DEAD_LOG_PHRASE)
}

/// Returns the contents of every ``` ... ``` fenced block in `text`, in
/// order, with the opening fence's language tag stripped.
fn fenced_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find("```") {
        let after_open = &rest[open + 3..];
        let body_start = after_open.find('\n').map_or(0, |i| i + 1);
        let Some(close) = after_open[body_start..].find("```") else {
            break;
        };
        blocks.push(&after_open[body_start..body_start + close]);
        rest = &after_open[body_start + close + 3..];
    }
    blocks
}

/// Extracts the text following a `label` up to the next blank line, the
/// next recognized label, or a fenced block, whichever comes first.
fn extract_section(text: &str, label: &str) -> Option<String> {
    let start = text.find(label)? + label.len();
    let rest = &text[start..];
    let mut out = String::new();
    for line in rest.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty()
            || trimmed.starts_with("Quote:")
            || trimmed.starts_with("Quote (optional):")
            || trimmed.starts_with("Summary:")
            || trimmed.starts_with("```")
        {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(trimmed);
    }
    let out = out.trim().to_string();
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Turn-by-turn delimiter used to split a transcript for truncation.
const TURN_DELIMITER: &str = "\n\n";

/// Keeps only the last `last_k_turns` turn-delimited segments of
/// `transcript`, so the judge only ever sees a bounded tail of play.
pub fn truncate_transcript(transcript: &str, last_k_turns: usize) -> String {
    let segments: Vec<&str> = transcript.split(TURN_DELIMITER).collect();
    if segments.len() <= last_k_turns {
        return transcript.to_string();
    }
    segments[segments.len() - last_k_turns..].join(TURN_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_pass_header_and_block() {
        let text = "some reasoning\n***Analysis Summary***\n```\npass\n```\n";
        assert_eq!(parse_verdict(text), Verdict::Pass);
    }

    #[test]
    fn recognizes_dead_log_phrase() {
        let text = "```\nthe log is too short or empty to evaluate\n```\n";
        assert_eq!(parse_verdict(text), Verdict::DeadLog);
    }

    #[test]
    fn parses_patch_summary_and_quote() {
        let text = "Summary: the discard pile check is inverted\nQuote: \"if not in hand\"\n```\n<<<<<<< SEARCH\nfoo\n=======\nbar\n>>>>>>> REPLACE\n```\n";
        match parse_verdict(text) {
            Verdict::Patch { summary, quote, .. } => {
                assert_eq!(summary, "the discard pile check is inverted");
                assert_eq!(quote.as_deref(), Some("\"if not in hand\""));
            }
            other => panic!("expected Patch, got {other:?}"),
        }
    }

    #[test]
    fn parses_patch_without_quote() {
        let text = "Summary: missing win condition\n```\n<<<<<<< SEARCH\nfoo\n=======\nbar\n>>>>>>> REPLACE\n```\n";
        match parse_verdict(text) {
            Verdict::Patch { summary, quote, .. } => {
                assert_eq!(summary, "missing win condition");
                assert_eq!(quote, None);
            }
            other => panic!("expected Patch, got {other:?}"),
        }
    }

    #[test]
    fn truncate_keeps_only_last_k_segments() {
        let transcript = "t1\n\nt2\n\nt3\n\nt4";
        assert_eq!(truncate_transcript(transcript, 2), "t3\n\nt4");
        assert_eq!(truncate_transcript(transcript, 10), transcript);
    }
}

//! The validation judge's retry state machine.

use crate::markers::{parse_verdict, truncate_transcript, Verdict};
use forge_oracle::{ChatSequence, Message, OracleClient};
use forge_retrieval::snippet::SnippetIndex;
use tracing::warn;

/// Configuration for one judging pass.
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    /// How many trailing turn segments of the transcript the judge sees.
    pub last_k_turns: usize,
    /// How many correction turns to attempt before falling back to PASS.
    pub max_retries: u32,
    /// Fence language tag the judge's patch blocks are written under.
    pub patch_language_tag: String,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            last_k_turns: 6,
            max_retries: 3,
            patch_language_tag: "patch".to_string(),
        }
    }
}

/// The judge's final disposition for one candidate/transcript pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JudgeOutcome {
    /// Gameplay matched the rules.
    Pass,
    /// The transcript was too short or empty to evaluate.
    DeadLog,
    /// A rule violation was found and a patch was produced and applied.
    Patched {
        summary: String,
        quote: Option<String>,
        patched_source: String,
    },
}

/// Judges one candidate's gameplay transcript against its rules text.
///
/// Sends the rules, the candidate's current source, and the truncated
/// transcript to the oracle. On a PASS or DEAD-LOG verdict, returns
/// immediately. On a PATCH verdict, applies the patch; if the patch was a
/// no-op (the judge proposed a SEARCH text that doesn't occur in the
/// source), asks again up to `config.max_retries` times before falling back
/// to a conservative PASS, since a judge that can't express a real change is
/// assumed to have been satisfied by something it failed to articulate.
///
/// When `retrieval` is given and a PATCH verdict carries a quote, the quote
/// is embedded and used to pull a few matching example snippets into the
/// correction turn, giving the judge concrete code to pattern-match its next
/// patch against instead of repeating the same unfounded SEARCH text.
pub async fn judge(
    oracle: &OracleClient,
    retrieval: Option<&SnippetIndex>,
    rules_text: &str,
    candidate_source: &str,
    transcript: &str,
    config: &JudgeConfig,
) -> JudgeOutcome {
    let truncated = truncate_transcript(transcript, config.last_k_turns);
    let mut attempt = 0;
    let mut extra_context = String::new();

    loop {
        attempt += 1;
        let response = match request_verdict(oracle, rules_text, candidate_source, &truncated, &extra_context).await
        {
            Ok(response) => response,
            Err(err) => {
                warn!("judge oracle call failed on attempt {attempt}/{}: {err}", config.max_retries);
                if attempt >= config.max_retries {
                    return JudgeOutcome::Pass;
                }
                continue;
            }
        };

        match parse_verdict(&response) {
            Verdict::Pass => return JudgeOutcome::Pass,
            Verdict::DeadLog => return JudgeOutcome::DeadLog,
            Verdict::Patch { summary, quote, raw_patch_text } => {
                let patched = forge_patch::apply_edits(&raw_patch_text, candidate_source, &config.patch_language_tag);
                if patched == candidate_source {
                    if attempt >= config.max_retries {
                        warn!("judge exhausted {} retries on a no-op patch, falling back to PASS", config.max_retries);
                        return JudgeOutcome::Pass;
                    }
                    if let (Some(index), Some(quote_text)) = (retrieval, quote.as_ref()) {
                        extra_context = fetch_examples(oracle, index, quote_text).await;
                    }
                    continue;
                }
                return JudgeOutcome::Patched {
                    summary,
                    quote,
                    patched_source: patched,
                };
            }
        }
    }
}

async fn fetch_examples(oracle: &OracleClient, index: &SnippetIndex, quote: &str) -> String {
    if index.is_empty() {
        return String::new();
    }
    let Ok(mut embeddings) = oracle.embed(&[quote.to_string()]).await else {
        return String::new();
    };
    let Some(query) = embeddings.pop() else {
        return String::new();
    };
    index.retrieve_as_string(&query, 3)
}

async fn request_verdict(
    oracle: &OracleClient,
    rules_text: &str,
    candidate_source: &str,
    transcript: &str,
    extra_context: &str,
) -> forge_oracle::Result<String> {
    let mut prompt = format!("Rules:\n{rules_text}\n\nImplementation:\n{candidate_source}\n\nTranscript:\n{transcript}\n");
    if !extra_context.is_empty() {
        prompt.push_str(&format!("\nExample code that may be relevant to your prior quote:\n{extra_context}\n"));
    }
    let sequence = ChatSequence::single_turn(prompt)
        .with_system(
            "Compare the transcript against the rules. If play matched the rules, conclude with \
             `***Analysis Summary***` followed by a fenced block containing only `pass`. If the \
             transcript is too short or empty to judge, reply with a fenced block containing the \
             phrase `log is too short or empty`. Otherwise explain the violation after `Summary:` \
             and provide one or more SEARCH/REPLACE fenced blocks that fix it.",
        )
        .with_message(Message::user("Judge this transcript."));
    oracle.chat(&sequence).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_bounds() {
        let config = JudgeConfig::default();
        assert_eq!(config.last_k_turns, 6);
        assert_eq!(config.max_retries, 3);
    }
}

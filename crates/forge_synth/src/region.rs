//! Splits a candidate source into an editable core region and the outer
//! wrapper that must be reattached before execution.
//!
//! Grounded in the original implementation's `"""Beginning of the game
//! code"""` / `"""End of the game code"""` string markers, reimplemented as
//! line comments since Rust has no triple-quoted-string equivalent to borrow
//! the exact spelling of.

const CORE_BEGIN: &str = "// === begin core ===";
const CORE_END: &str = "// === end core ===";

/// The three pieces of a wrapped candidate: everything before the core
/// marker (inclusive of the marker line), the core body, and everything
/// from the end marker onward (inclusive).
#[derive(Debug, Clone)]
pub struct Wrapped {
    prefix: String,
    pub core: String,
    suffix: String,
}

impl Wrapped {
    /// Splits `source` on the core markers. If either marker is missing, the
    /// whole source is treated as core with empty prefix/suffix — matching
    /// the original's fall-back-to-unchanged behavior when its own markers
    /// are absent.
    #[must_use]
    pub fn split(source: &str) -> Self {
        let Some(begin_at) = source.find(CORE_BEGIN) else {
            return Self {
                prefix: String::new(),
                core: source.to_string(),
                suffix: String::new(),
            };
        };
        let core_start = begin_at + CORE_BEGIN.len();
        let Some(end_at) = source[core_start..].find(CORE_END) else {
            return Self {
                prefix: String::new(),
                core: source.to_string(),
                suffix: String::new(),
            };
        };
        let end_at = core_start + end_at;
        Self {
            prefix: source[..core_start].to_string(),
            core: source[core_start..end_at].to_string(),
            suffix: source[end_at..].to_string(),
        }
    }

    /// Reattaches a (possibly edited) core to the original prefix/suffix.
    #[must_use]
    pub fn reattach(&self, new_core: &str) -> String {
        format!("{}{}{}", self.prefix, new_core, self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_reattaches_around_markers() {
        let source = "use std;\n// === begin core ===\nfn play() {}\n// === end core ===\nfn main() {}\n";
        let wrapped = Wrapped::split(source);
        assert_eq!(wrapped.core, "\nfn play() {}\n");
        let edited = wrapped.reattach("\nfn play() { /* patched */ }\n");
        assert!(edited.starts_with("use std;\n// === begin core ==="));
        assert!(edited.contains("patched"));
        assert!(edited.ends_with("fn main() {}\n"));
    }

    #[test]
    fn missing_markers_treats_whole_source_as_core() {
        let source = "fn play() {}\n";
        let wrapped = Wrapped::split(source);
        assert_eq!(wrapped.core, source);
        assert_eq!(wrapped.reattach("fn play() { /* x */ }\n"), "fn play() { /* x */ }\n");
    }
}

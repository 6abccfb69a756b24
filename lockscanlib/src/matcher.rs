//! Glob matching for workspace member paths.
//!
//! Workspace patterns are matched against directory paths relative to the
//! workspace root, always with `/` separators. Wildcards match dotfiles, and
//! a pattern without a separator is matched against the whole path rather
//! than just the last component: `*` matches `app` but not `packages/app`.
//!
//! On top of what `glob` understands, brace alternation is expanded before
//! compiling (`packages/{a,b}` is `packages/a` or `packages/b`), and a
//! trailing `/**` also matches the directory it hangs off.

use glob::{MatchOptions, Pattern};

/// Prefix that turns a pattern into an exclusion.
pub const NEGATION: char = '!';

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

fn normalize_candidate(path: &str) -> String {
    path.replace('\\', "/")
}

fn normalize_pattern(pattern: &str) -> &str {
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    match pattern.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => pattern,
    }
}

/// Expand `{a,b}` alternation, nested groups included, into plain glob patterns.
///
/// Groups without a top-level comma and unbalanced braces are kept literally.
fn expand_braces(pattern: &str) -> Vec<String> {
    let bytes = pattern.as_bytes();
    for (open, _) in pattern.match_indices('{') {
        let mut depth = 0;
        let mut commas = Vec::new();
        let mut close = None;
        for (i, &b) in bytes.iter().enumerate().skip(open) {
            match b {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(i);
                        break;
                    }
                }
                b',' if depth == 1 => commas.push(i),
                _ => {}
            }
        }

        let Some(close) = close else {
            continue;
        };
        if commas.is_empty() {
            continue;
        }

        let prefix = &pattern[..open];
        let suffix = &pattern[close + 1..];
        let mut starts = vec![open + 1];
        starts.extend(commas.iter().map(|c| c + 1));
        let mut ends = commas;
        ends.push(close);

        return starts
            .into_iter()
            .zip(ends)
            .flat_map(|(start, end)| {
                expand_braces(&format!("{}{}{}", prefix, &pattern[start..end], suffix))
            })
            .collect();
    }

    vec![pattern.to_string()]
}

/// Compile one raw pattern into the globs it stands for. Empty when any
/// alternative is invalid.
fn compile(pattern: &str) -> Vec<Pattern> {
    let mut globs = Vec::new();
    for alternative in expand_braces(normalize_pattern(pattern)) {
        let mut sources = vec![alternative.as_str()];
        if let Some(base) = alternative.strip_suffix("/**") {
            if !base.is_empty() {
                sources.push(base);
            }
        }

        for source in sources {
            match Pattern::new(source) {
                Ok(compiled) => globs.push(compiled),
                Err(err) => {
                    tracing::warn!("ignoring invalid glob pattern '{}': {}", pattern, err);
                    return Vec::new();
                }
            }
        }
    }
    globs
}

fn any_match(globs: &[Pattern], candidate: &str) -> bool {
    globs
        .iter()
        .any(|glob| glob.matches_with(candidate, MATCH_OPTIONS))
}

/// Test a single path against a single (non-negated) pattern.
///
/// Backslashes in `candidate` are treated as separators. An invalid pattern
/// never matches.
pub fn matches(candidate: &str, pattern: &str) -> bool {
    any_match(&compile(pattern), &normalize_candidate(candidate))
}

#[derive(Debug, Clone)]
struct Rule {
    negated: bool,
    globs: Vec<Pattern>,
}

/// An ordered list of compiled patterns, some possibly negated with `!`.
///
/// A path is accepted by folding over the list left to right from "no
/// match": a positive pattern ORs its result in, a negated one ANDs-NOT it.
/// An exclusion therefore only removes paths accepted by patterns listed
/// before it.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    rules: Vec<Rule>,
}

impl PatternSet {
    /// Compile `patterns`. Invalid patterns are logged and dropped.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let rules = patterns
            .iter()
            .filter_map(|raw| {
                let raw = raw.as_ref();
                let (negated, body) = match raw.strip_prefix(NEGATION) {
                    Some(body) => (true, body),
                    None => (false, raw),
                };
                let globs = compile(body);
                (!globs.is_empty()).then_some(Rule { negated, globs })
            })
            .collect();

        Self { rules }
    }

    /// Whether `candidate` is accepted by the set.
    pub fn is_match(&self, candidate: &str) -> bool {
        let candidate = normalize_candidate(candidate);
        self.rules.iter().fold(false, |accepted, rule| {
            let hit = any_match(&rule.globs, &candidate);
            if rule.negated {
                accepted && !hit
            } else {
                accepted || hit
            }
        })
    }
}

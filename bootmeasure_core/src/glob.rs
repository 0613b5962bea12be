//! Wildcard matching for directory entry names.
//!
//! Supports `?` (exactly one character) and `*` (zero or more characters).
//! Every other character matches itself, case-sensitively. `*` happily
//! matches path separators, so callers that care must split paths first.
//!
//! Matching is greedy with explicit backtracking: each `*` records a choice
//! point, and a mismatch shrinks the most recent choice point that still has
//! room. At most [`MAX_CHOICE_POINTS`] stars may be live at once; a pattern
//! that needs more is reported as [`MatchOutcome::TooComplex`] and never
//! matches.

/// Maximum number of `*` choice points live at the same time.
pub const MAX_CHOICE_POINTS: usize = 10;

/// Result of evaluating a pattern against one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched,
    NoMatch,
    /// More than [`MAX_CHOICE_POINTS`] stars were needed.
    TooComplex,
}

impl MatchOutcome {
    pub fn is_match(self) -> bool {
        self == MatchOutcome::Matched
    }
}

#[derive(Debug, Clone, Copy)]
struct ChoicePoint {
    /// Pattern index just after the `*`.
    resume: usize,
    /// Candidate index where the `*` started matching.
    start: usize,
    /// Candidate index where the `*` currently stops matching.
    end: usize,
}

/// A compiled glob pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glob {
    source: String,
    tokens: Vec<char>,
}

impl Glob {
    pub fn new(pattern: &str) -> Self {
        Self {
            source: pattern.to_string(),
            tokens: pattern.chars().collect(),
        }
    }

    /// The pattern text as given.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether names starting with `.` are eligible for this pattern.
    pub fn allows_hidden(&self) -> bool {
        self.source.starts_with('.')
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.evaluate(candidate).is_match()
    }

    /// Match `candidate` against the pattern, reporting why a match failed.
    pub fn evaluate(&self, candidate: &str) -> MatchOutcome {
        let pattern = &self.tokens;
        let value: Vec<char> = candidate.chars().collect();

        let mut stack: Vec<ChoicePoint> = Vec::with_capacity(MAX_CHOICE_POINTS);
        let mut p = 0;
        let mut v = 0;

        loop {
            let advanced = match pattern.get(p) {
                Some('*') => {
                    if stack.len() == MAX_CHOICE_POINTS {
                        tracing::trace!(pattern = %self.source, candidate, "glob too complex");
                        return MatchOutcome::TooComplex;
                    }
                    // Greedy: swallow the rest of the value, give it back on mismatch.
                    stack.push(ChoicePoint {
                        resume: p + 1,
                        start: v,
                        end: value.len(),
                    });
                    v = value.len();
                    p += 1;
                    true
                }
                Some('?') => {
                    if v < value.len() {
                        v += 1;
                        p += 1;
                        true
                    } else {
                        false
                    }
                }
                Some(&literal) => {
                    if value.get(v) == Some(&literal) {
                        v += 1;
                        p += 1;
                        true
                    } else {
                        false
                    }
                }
                None => {
                    if v == value.len() {
                        return MatchOutcome::Matched;
                    }
                    false
                }
            };

            if advanced {
                continue;
            }

            // Drop choice points that have already given back everything.
            while stack.last().is_some_and(|cp| cp.start == cp.end) {
                stack.pop();
            }

            let Some(cp) = stack.last_mut() else {
                return MatchOutcome::NoMatch;
            };

            cp.end -= 1;
            v = cp.end;
            p = cp.resume;
        }
    }
}

/// Match `candidate` against `pattern`.
pub fn matches(pattern: &str, candidate: &str) -> bool {
    Glob::new(pattern).matches(candidate)
}

/// Outcome of an equivalence check, produced and consumed within one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerificationOutcome {
    /// Whether the cached question was accepted as equivalent.
    pub accepted: bool,
    /// The score that drove the decision (scorer output or lexical overlap;
    /// 0.0 for a numeric-mismatch rejection).
    pub score: f32,
}

impl VerificationOutcome {
    /// Definitive rejection with score 0.
    pub fn rejected() -> Self {
        Self {
            accepted: false,
            score: 0.0,
        }
    }
}

impl std::fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.accepted {
            write!(f, "ACCEPTED (score: {:.4})", self.score)
        } else {
            write!(f, "REJECTED (score: {:.4})", self.score)
        }
    }
}

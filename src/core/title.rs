use strsim::{jaro_winkler, normalized_levenshtein};
use crate::core::signal::{SignalMatcher, SignalScore};
use crate::models::{normalize_text, Listing, Product};

/// Minimum Jaro-Winkler similarity for a title token to cover a candidate token
const TOKEN_MATCH_THRESHOLD: f64 = 0.88;

/// Which product name produced a title score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    FullName,
    BrandModel,
    Alias,
    FuzzyPattern,
}

impl CandidateKind {
    pub fn label(&self) -> &'static str {
        match self {
            CandidateKind::FullName => "full name",
            CandidateKind::BrandModel => "brand+model",
            CandidateKind::Alias => "alias",
            CandidateKind::FuzzyPattern => "fuzzy pattern",
        }
    }
}

/// Best-scoring candidate name for a title
#[derive(Debug, Clone, PartialEq)]
pub struct TitleMatch {
    pub kind: CandidateKind,
    pub candidate: String,
    pub score: f64,
    pub exact: bool,
}

/// Scores how closely a listing title names a product
///
/// Candidates, in order: full name, "brand model", aliases, fuzzy patterns.
/// A candidate that appears verbatim in the title scores 100; otherwise the
/// score is a fuzzy similarity scaled to 0-100.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleMatcher;

impl TitleMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Find the winning candidate, if the product has any non-empty name
    pub fn best_match(&self, title: &str, product: &Product) -> Option<TitleMatch> {
        let title = normalize_text(title);
        let mut best: Option<TitleMatch> = None;

        for (kind, candidate) in candidates(product) {
            let exact = !title.is_empty() && title.contains(&candidate);
            let score = if exact {
                100.0
            } else {
                similarity(&title, &candidate) * 100.0
            };

            let better = match &best {
                None => true,
                Some(current) => {
                    score > current.score || (score == current.score && exact && !current.exact)
                }
            };

            if better {
                best = Some(TitleMatch { kind, candidate, score, exact });
            }
        }

        best
    }
}

impl SignalMatcher for TitleMatcher {
    fn score(&self, listing: &Listing, product: &Product) -> SignalScore {
        if listing.title_normalized().is_empty() {
            return SignalScore::reject("empty title");
        }

        match self.best_match(&listing.title, product) {
            Some(m) => SignalScore::new(
                m.score,
                format!("matched {} '{}' at {:.0}%", m.kind.label(), m.candidate, m.score),
            ),
            None => SignalScore::reject("no candidate names"),
        }
    }
}

fn tokens(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect()
}

fn has_digit(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit())
}

fn candidates(product: &Product) -> Vec<(CandidateKind, String)> {
    let brand_model = format!("{} {}", product.brand, product.model);

    std::iter::once((CandidateKind::FullName, product.full_name.as_str()))
        .chain(std::iter::once((CandidateKind::BrandModel, brand_model.as_str())))
        .chain(product.aliases.iter().map(|a| (CandidateKind::Alias, a.as_str())))
        .chain(product.fuzzy_patterns.iter().map(|p| (CandidateKind::FuzzyPattern, p.as_str())))
        .map(|(kind, text)| (kind, normalize_text(text)))
        .filter(|(_, text)| !text.is_empty())
        .collect()
}

/// Fuzzy similarity (0.0-1.0) between a normalized title and candidate
///
/// Token coverage times the best windowed Levenshtein ratio, scaled down by
/// the share of model-number tokens (those containing a digit) that appear
/// verbatim in the title. Sharing only a brand token scores well below 50.
pub fn similarity(title: &str, candidate: &str) -> f64 {
    let title_tokens = tokens(title);
    let candidate_tokens = tokens(candidate);

    if title_tokens.is_empty() || candidate_tokens.is_empty() {
        return 0.0;
    }

    let covered = candidate_tokens
        .iter()
        .copied()
        .filter(|c| {
            if has_digit(c) {
                title_tokens.contains(c)
            } else {
                title_tokens.iter().any(|t| jaro_winkler(t, c) >= TOKEN_MATCH_THRESHOLD)
            }
        })
        .count();
    let coverage = covered as f64 / candidate_tokens.len() as f64;

    let candidate_joined = candidate_tokens.join(" ");
    let window = if title_tokens.len() <= candidate_tokens.len() {
        normalized_levenshtein(&title_tokens.join(" "), &candidate_joined)
    } else {
        title_tokens
            .windows(candidate_tokens.len())
            .map(|w| normalized_levenshtein(&w.join(" "), &candidate_joined))
            .fold(0.0, f64::max)
    };

    let numeric: Vec<&str> = candidate_tokens.iter().copied().filter(|c| has_digit(c)).collect();
    let numeric_factor = if numeric.is_empty() {
        1.0
    } else {
        let present = numeric.iter().filter(|c| title_tokens.contains(*c)).count();
        present as f64 / numeric.len() as f64
    };

    (coverage * window * numeric_factor).clamp(0.0, 1.0)
}

/// Structural problems with an HS code string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HsCodeProblem {
    Missing,
    NonDigit,
    TenDigit,
    BadLength(usize),
}

pub(crate) fn check_hs_code(raw: Option<&str>) -> Option<HsCodeProblem> {
    let code = match raw {
        Some(code) if !code.is_empty() => code,
        _ => return Some(HsCodeProblem::Missing),
    };

    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Some(HsCodeProblem::NonDigit);
    }

    match code.len() {
        6 | 8 => None,
        10 => Some(HsCodeProblem::TenDigit),
        other => Some(HsCodeProblem::BadLength(other)),
    }
}

/// Strip separators and truncate statistical suffixes so a code can be resubmitted.
///
/// Returns `None` when the digits left over cannot form a 6- or 8-digit code.
pub fn normalize_hs_code(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        6 | 8 => Some(digits),
        10 => Some(digits[..8].to_string()),
        _ => None,
    }
}

/// Parent codes from most to least specific, for hierarchical rate lookup.
pub fn parent_codes(code: &str) -> Vec<String> {
    let mut parents = Vec::new();
    if code.len() > 8 {
        parents.push(code[..8].to_string());
    }
    if code.len() > 6 {
        parents.push(code[..6].to_string());
    }
    parents
}

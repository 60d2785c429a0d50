//! Matching call-site references against declared endpoints.
//!
//! Each route is compiled to a regex: literal segments are escaped,
//! `[param]` becomes one non-empty segment, `[...param]` one or more
//! segments, `[[...param]]` zero or more. Candidate paths are normalized
//! to a single leading slash with query string and fragment stripped, so
//! `api/users?page=2` hits `/api/users`. An interpolated hole like
//! `${id}` occupies one segment and therefore matches a `[param]`.

use regex::Regex;
use tracing::debug;

use crate::config::ConfidenceKnobs;
use crate::types::{ApiEndpoint, EndpointUsage, Reference};

/// Assign usage, references and confidence to every endpoint.
pub fn match_endpoints(
    endpoints: &mut [ApiEndpoint],
    references: &[Reference],
    knobs: &ConfidenceKnobs,
) {
    for endpoint in endpoints.iter_mut() {
        let Some(re) = route_regex(&endpoint.route) else {
            // A route that fails to compile matches nothing and falls
            // through to the unused classification.
            debug!(route = %endpoint.route, "route pattern did not compile");
            classify(endpoint, knobs);
            continue;
        };
        endpoint.references = references
            .iter()
            .filter(|r| re.is_match(&normalize_candidate(&r.candidate_path)))
            .cloned()
            .collect();
        classify(endpoint, knobs);
    }
}

fn classify(endpoint: &mut ApiEndpoint, knobs: &ConfidenceKnobs) {
    let matches = endpoint.references.len();
    if matches > 0 {
        endpoint.usage = EndpointUsage::Active;
        let raw = knobs.endpoint_active_base as u32
            + knobs.endpoint_match_bonus as u32 * matches as u32;
        endpoint.confidence = raw.min(knobs.endpoint_match_cap as u32) as u8;
        endpoint.reasons = vec![format!("{matches} call site(s) reference this route")];
        return;
    }

    endpoint.usage = EndpointUsage::Unused;
    endpoint.confidence = knobs.endpoint_unused_base;
    endpoint.reasons = vec!["no call site references this route".to_string()];
    let read_only = endpoint
        .verbs
        .iter()
        .all(|v| v == "GET" || v == "HEAD");
    if read_only {
        // Read endpoints are the ones browsers, crawlers and external
        // consumers hit without an in-repo call site.
        endpoint.confidence = endpoint
            .confidence
            .saturating_sub(knobs.read_verb_penalty);
        endpoint
            .reasons
            .push("read-only verbs may be called externally".to_string());
    }
}

/// Compile a declared route into a full-match regex over candidate paths.
fn route_regex(route: &str) -> Option<Regex> {
    let mut pattern = String::from("^");
    for segment in route.split('/').filter(|s| !s.is_empty()) {
        if segment.starts_with("[[...") && segment.ends_with("]]") {
            pattern.push_str("(?:/[^?#]+)?");
        } else if segment.starts_with("[...") && segment.ends_with(']') {
            pattern.push_str("/[^?#]+");
        } else if segment.starts_with('[') && segment.ends_with(']') {
            pattern.push_str("/[^/]+");
        } else {
            pattern.push('/');
            pattern.push_str(&regex::escape(segment));
        }
    }
    if pattern == "^" {
        pattern.push('/');
    }
    pattern.push_str("/?$");
    Regex::new(&pattern).ok()
}

/// Single leading slash; query string and fragment dropped.
fn normalize_candidate(candidate: &str) -> String {
    let cut = candidate
        .find(['?', '#'])
        .map_or(candidate, |idx| &candidate[..idx]);
    let trimmed = cut.trim_start_matches('/');
    format!("/{trimmed}")
}

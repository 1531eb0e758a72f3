//! Candidate extraction from the scraped results page.
//!
//! Each candidate is a `div` carrying the `candidate-row` class, containing
//! a vote-count element and a profile link whose href path carries the
//! numeric user id.

use super::html;
use crate::store::RawCandidate;

const ROW_CLASS: &str = "candidate-row";
const VOTE_CLASS: &str = "js-vote-count";
const USER_CLASS: &str = "user-details";

/// Returns a lazy iterator over the candidate rows of `doc`, in document
/// order. A document with no rows yields an empty iterator; the caller
/// decides whether that is suspicious.
pub fn extract_candidates(doc: &str) -> CandidateRows<'_> {
    CandidateRows { doc, pos: 0 }
}

/// Iterator over candidate rows. Rows whose profile link cannot be resolved
/// to a numeric id are skipped and logged, never fatal.
pub struct CandidateRows<'a> {
    doc: &'a str,
    pos: usize,
}

impl Iterator for CandidateRows<'_> {
    type Item = RawCandidate;

    fn next(&mut self) -> Option<RawCandidate> {
        while let Some(start) = html::find_class(self.doc, ROW_CLASS, self.pos) {
            let Some((inner_start, inner_end)) = html::element_block(self.doc, start) else {
                // Unterminated row container; step past it and keep scanning.
                self.pos = start + 1;
                continue;
            };
            self.pos = inner_end;

            if let Some(candidate) = candidate_from_row(&self.doc[inner_start..inner_end]) {
                return Some(candidate);
            }
        }
        None
    }
}

fn candidate_from_row(row: &str) -> Option<RawCandidate> {
    let votes = vote_count(row);

    let Some((name, href)) = profile_link(row) else {
        tracing::warn!("Candidate row without a usable profile link, skipping");
        return None;
    };
    let Some(id) = candidate_id(&href) else {
        tracing::warn!(href = %href, "No numeric candidate id in profile link, skipping row");
        return None;
    };

    Some(RawCandidate { id, name, votes })
}

/// Text of the row's vote-count element, parsed as an integer. A missing or
/// malformed count reads as zero rather than dropping the row.
fn vote_count(row: &str) -> u64 {
    html::find_class(row, VOTE_CLASS, 0)
        .and_then(|at| html::element_block(row, at))
        .map(|(s, e)| html::text(&row[s..e]))
        .and_then(|t| t.parse().ok())
        .unwrap_or(0)
}

/// Display name and href of the profile link inside the row's user-details
/// section. The name may come back empty; the href must exist.
fn profile_link(row: &str) -> Option<(String, String)> {
    let (details_start, details_end) =
        html::find_class(row, USER_CLASS, 0).and_then(|at| html::element_block(row, at))?;
    let details = &row[details_start..details_end];

    let link_start = html::find_tag(details, "a", 0)?;
    let (inner_start, inner_end) = html::element_block(details, link_start)?;
    let name = html::text(&details[inner_start..inner_end]);

    let tag_end = details[link_start..].find('>')? + link_start;
    let href = html::attr(&details[link_start..tag_end], "href")?.to_string();

    Some((name, href))
}

/// The candidate id is the third `/`-delimited segment of the profile path,
/// e.g. `/users/22656/jon-skeet` → 22656.
fn candidate_id(href: &str) -> Option<u64> {
    href.split('/').nth(2)?.parse().ok()
}

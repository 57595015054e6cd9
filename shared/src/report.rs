//! Plain-text election report, suitable for copying out of the dashboard.
//! Byte-stable: a fixed vote list renders the identical string no matter how
//! the list was ordered.

use std::fmt::Write;

use crate::models::{Candidate, Vote};
use crate::tally::Tally;

pub fn render(votes: &[Vote]) -> String {
    let tally = Tally::new(votes);
    let mut out = String::new();

    let _ = writeln!(out, "CHIEF JUSTICE ELECTION - VOTE REPORT");
    let _ = writeln!(out);
    let _ = writeln!(out, "Summary");
    let _ = writeln!(out, "-------");
    for entry in tally.candidate_tallies() {
        let _ = writeln!(out, "{}: {}", entry.candidate, entry.count);
    }
    let _ = writeln!(out, "Total: {}", tally.total());
    let _ = writeln!(out);
    let _ = writeln!(out, "Detailed Votes");
    let _ = writeln!(out, "--------------");

    let grouped = tally.by_department();
    for &candidate in &Candidate::BALLOT {
        let count = votes.iter().filter(|v| v.candidate == candidate).count();
        let _ = writeln!(out);
        let _ = writeln!(out, "{candidate} ({count})");
        if count == 0 {
            let _ = writeln!(out, "  (no votes)");
            continue;
        }
        for (department, voters) in &grouped {
            let names: Vec<&str> = voters
                .iter()
                .filter(|v| v.candidate == candidate)
                .map(|v| v.voter_name.as_str())
                .collect();
            if !names.is_empty() {
                let _ = writeln!(out, "  {}: {}", department, names.join(" / "));
            }
        }
    }

    out
}

//! Last-resort data source: the historically recorded votes, used when both
//! the database and the local cache are unavailable so the dashboard still
//! renders something truthful.

use shared::models::{Candidate, Department, Vote};
use uuid::Uuid;

const SEED_BASE_MS: i64 = 1_766_000_000_000;

/// Deterministic: fixed ids and staggered timestamps (1 s apart, except the
/// first abstention which lands 10 ms after the vote before it so the replay
/// animates the pair as one step).
pub fn initial_votes() -> Vec<Vote> {
    use Candidate::{Abstained, BrittanyAngel};
    use Department::{BSCO, DOC, DOJ, LSPD, SASM};

    let entries: [(&str, Department, Candidate, i64); 18] = [
        ("Maeve Wolfe", BSCO, BrittanyAngel, 1_000),
        ("Matthew Espinoz", LSPD, BrittanyAngel, 2_000),
        ("Cohen Ryker", BSCO, BrittanyAngel, 3_000),
        ("Roman Atlas", DOJ, BrittanyAngel, 4_000),
        ("Brooke Ruth", SASM, BrittanyAngel, 5_000),
        ("Jessie Lea Gallagah", SASM, BrittanyAngel, 6_000),
        ("Daisy Dukakis", BSCO, BrittanyAngel, 7_000),
        ("Jonah Sloe", BSCO, BrittanyAngel, 8_000),
        ("Vincent Ventura", BSCO, BrittanyAngel, 9_000),
        ("Arnold Frost", BSCO, BrittanyAngel, 10_000),
        ("Ricky Dallas", BSCO, BrittanyAngel, 11_000),
        ("Tommy Horver", BSCO, BrittanyAngel, 12_000),
        ("Brian Knight", SASM, Abstained, 12_010),
        ("Albert King", LSPD, BrittanyAngel, 13_010),
        ("Jenna Mustard", BSCO, BrittanyAngel, 14_010),
        ("Austin Bean", BSCO, BrittanyAngel, 15_010),
        ("Jessica Springfield", SASM, Abstained, 16_010),
        ("Yui Ishida", DOC, Abstained, 17_010),
    ];

    entries
        .iter()
        .enumerate()
        .map(|(i, &(name, department, candidate, offset_ms))| Vote {
            id: Uuid::from_u128(0x5eed_0000_0000_0000_0000_0000_0000_0000 + i as u128),
            voter_name: name.to_string(),
            department,
            candidate,
            timestamp_ms: SEED_BASE_MS + offset_ms,
        })
        .collect()
}

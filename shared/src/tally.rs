use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Candidate, DashboardMetrics, Department, Vote};

fn percent(count: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        count as f64 / denominator as f64 * 100.0
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTally {
    pub candidate: Candidate,
    pub count: usize,
    /// Share of *all* votes, abstentions included. 0.0 on an empty list.
    pub percent_of_total: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSlice {
    pub candidate: Candidate,
    pub count: usize,
    /// Share of the department's own total.
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentBreakdown {
    pub department: Department,
    pub total: usize,
    /// Non-empty slices only, sorted by count descending; ballot order breaks
    /// ties so the layout is stable run to run.
    pub slices: Vec<DepartmentSlice>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDomination {
    pub department: Department,
    pub leader_votes: usize,
    pub department_total: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderStats {
    pub candidate: Candidate,
    pub count: usize,
    /// Denominator excludes abstentions.
    pub percent_of_valid: f64,
    /// Denominator is full turnout.
    pub percent_of_total: f64,
    pub domination: Vec<DepartmentDomination>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElectionSummary {
    pub metrics: DashboardMetrics,
    pub tallies: Vec<CandidateTally>,
    pub leader: Option<LeaderStats>,
    pub departments: Vec<DepartmentBreakdown>,
}

/// Read-only view over the full vote list from which every on-screen
/// statistic derives. All methods are pure, never panic on an empty list, and
/// never depend on the order votes arrived in.
#[derive(Debug, Clone, Copy)]
pub struct Tally<'a> {
    votes: &'a [Vote],
}

impl<'a> Tally<'a> {
    pub fn new(votes: &'a [Vote]) -> Self {
        Self { votes }
    }

    pub fn total(&self) -> usize {
        self.votes.len()
    }

    pub fn abstentions(&self) -> usize {
        self.count_for(Candidate::Abstained)
    }

    pub fn valid(&self) -> usize {
        self.total() - self.abstentions()
    }

    fn count_for(&self, candidate: Candidate) -> usize {
        self.votes.iter().filter(|v| v.candidate == candidate).count()
    }

    pub fn metrics(&self) -> DashboardMetrics {
        DashboardMetrics {
            total_votes: self.total(),
            valid_votes: self.valid(),
            abstentions: self.abstentions(),
            candidate_count: Candidate::BALLOT.len(),
        }
    }

    pub fn candidate_tallies(&self) -> Vec<CandidateTally> {
        let total = self.total();
        Candidate::BALLOT
            .iter()
            .map(|&candidate| {
                let count = self.count_for(candidate);
                CandidateTally {
                    candidate,
                    count,
                    percent_of_total: percent(count, total),
                }
            })
            .collect()
    }

    /// The active candidate with the most votes. Abstentions never lead. On a
    /// tie the first candidate in ballot order wins; `None` means no active
    /// candidate has a single vote yet.
    pub fn leader(&self) -> Option<LeaderStats> {
        let mut best: Option<(Candidate, usize)> = None;
        for &candidate in &Candidate::ACTIVE {
            let count = self.count_for(candidate);
            if count > 0 && best.map_or(true, |(_, max)| count > max) {
                best = Some((candidate, count));
            }
        }
        let (candidate, count) = best?;

        let domination = Department::ALL
            .iter()
            .map(|&department| {
                let department_total = self
                    .votes
                    .iter()
                    .filter(|v| v.department == department)
                    .count();
                let leader_votes = self
                    .votes
                    .iter()
                    .filter(|v| v.department == department && v.candidate == candidate)
                    .count();
                DepartmentDomination {
                    department,
                    leader_votes,
                    department_total,
                    percent: percent(leader_votes, department_total),
                }
            })
            .collect();

        Some(LeaderStats {
            candidate,
            count,
            percent_of_valid: percent(count, self.valid()),
            percent_of_total: percent(count, self.total()),
            domination,
        })
    }

    pub fn department_breakdowns(&self) -> Vec<DepartmentBreakdown> {
        Department::ALL
            .iter()
            .map(|&department| {
                let dept_votes: Vec<&Vote> = self
                    .votes
                    .iter()
                    .filter(|v| v.department == department)
                    .collect();
                let total = dept_votes.len();

                let mut slices: Vec<DepartmentSlice> = Candidate::BALLOT
                    .iter()
                    .filter_map(|&candidate| {
                        let count =
                            dept_votes.iter().filter(|v| v.candidate == candidate).count();
                        (count > 0).then(|| DepartmentSlice {
                            candidate,
                            count,
                            percent: percent(count, total),
                        })
                    })
                    .collect();
                // Stable sort keeps ballot order among equal counts.
                slices.sort_by(|a, b| b.count.cmp(&a.count));

                DepartmentBreakdown {
                    department,
                    total,
                    slices,
                }
            })
            .collect()
    }

    /// Votes grouped by department for listing. Only departments that have
    /// votes appear; keys iterate alphabetically and voters within a
    /// department sort by name (byte order), then id, so two runs over
    /// differently-ordered inputs produce identical output.
    pub fn by_department(&self) -> BTreeMap<Department, Vec<&'a Vote>> {
        let mut groups: BTreeMap<Department, Vec<&'a Vote>> = BTreeMap::new();
        for vote in self.votes {
            groups.entry(vote.department).or_default().push(vote);
        }
        for voters in groups.values_mut() {
            voters.sort_by(|a, b| {
                a.voter_name
                    .cmp(&b.voter_name)
                    .then_with(|| a.id.cmp(&b.id))
            });
        }
        groups
    }

    pub fn summary(&self) -> ElectionSummary {
        ElectionSummary {
            metrics: self.metrics(),
            tallies: self.candidate_tallies(),
            leader: self.leader(),
            departments: self.department_breakdowns(),
        }
    }
}

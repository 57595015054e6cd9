#[cfg(test)]
mod tests {
    use crate::models::{Candidate, Department, Vote};
    use crate::replay::{Replay, ReplaySpeed, CLUSTER_EPSILON_MS};
    use crate::report;
    use crate::tally::Tally;
    use crate::validation::{validate_voter_name, ValidationError};
    use uuid::Uuid;

    fn vote(name: &str, department: Department, candidate: Candidate, timestamp_ms: i64) -> Vote {
        Vote {
            id: Uuid::new_v4(),
            voter_name: name.to_string(),
            department,
            candidate,
            timestamp_ms,
        }
    }

    fn sample_votes() -> Vec<Vote> {
        vec![
            vote("Maeve Wolfe", Department::BSCO, Candidate::BrittanyAngel, 1_000),
            vote("Roman Atlas", Department::DOJ, Candidate::BrittanyAngel, 2_000),
            vote("Albert King", Department::LSPD, Candidate::NathanielGreyson, 3_000),
            vote("Brian Knight", Department::SASM, Candidate::Abstained, 4_000),
            vote("Yui Ishida", Department::DOC, Candidate::Abstained, 5_000),
            vote("Daisy Dukakis", Department::BSCO, Candidate::BrittanyAngel, 6_000),
        ]
    }

    #[test]
    fn test_totals_partition() {
        let votes = sample_votes();
        let tally = Tally::new(&votes);
        let metrics = tally.metrics();
        assert_eq!(metrics.total_votes, 6);
        assert_eq!(metrics.abstentions, 2);
        assert_eq!(metrics.valid_votes, 4);
        assert_eq!(metrics.valid_votes + metrics.abstentions, metrics.total_votes);
        assert_eq!(metrics.candidate_count, 4);
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let votes = sample_votes();
        let sum: f64 = Tally::new(&votes)
            .candidate_tallies()
            .iter()
            .map(|t| t.percent_of_total)
            .sum();
        assert!((sum - 100.0).abs() < 1e-9, "sum was {sum}");
    }

    #[test]
    fn test_empty_list_never_panics() {
        let tally = Tally::new(&[]);
        assert_eq!(tally.metrics().total_votes, 0);
        assert!(tally.leader().is_none());
        assert!(tally.by_department().is_empty());
        for entry in tally.candidate_tallies() {
            assert_eq!(entry.count, 0);
            assert_eq!(entry.percent_of_total, 0.0);
        }
        for dept in tally.department_breakdowns() {
            assert_eq!(dept.total, 0);
            assert!(dept.slices.is_empty());
        }
    }

    #[test]
    fn test_leader_excludes_abstentions() {
        let votes = vec![
            vote("a", Department::BSCO, Candidate::Abstained, 1),
            vote("b", Department::BSCO, Candidate::Abstained, 2),
            vote("c", Department::DOJ, Candidate::SeanDanielson, 3),
        ];
        let leader = Tally::new(&votes).leader().unwrap();
        assert_eq!(leader.candidate, Candidate::SeanDanielson);
        assert_eq!(leader.count, 1);
        assert_eq!(leader.percent_of_valid, 100.0);
        assert!((leader.percent_of_total - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_leader_tie_breaks_by_ballot_order() {
        // One vote each for two candidates plus an abstention.
        let votes = vec![
            vote("x", Department::BSCO, Candidate::NathanielGreyson, 1),
            vote("y", Department::BSCO, Candidate::BrittanyAngel, 2),
            vote("z", Department::DOC, Candidate::Abstained, 3),
        ];
        let tally = Tally::new(&votes);
        let leader = tally.leader().unwrap();
        assert_eq!(leader.candidate, Candidate::BrittanyAngel);
        // Idempotent on an unchanged list.
        assert_eq!(tally.leader().unwrap(), leader);

        let first = tally.candidate_tallies()[0].clone();
        assert!((first.percent_of_total - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_leader_none_without_active_votes() {
        let votes = vec![vote("a", Department::SASM, Candidate::Abstained, 1)];
        assert!(Tally::new(&votes).leader().is_none());
    }

    #[test]
    fn test_department_breakdown_sorted_and_percented() {
        let votes = vec![
            vote("a", Department::LSPD, Candidate::BrittanyAngel, 1),
            vote("b", Department::LSPD, Candidate::BrittanyAngel, 2),
            vote("c", Department::LSPD, Candidate::SeanDanielson, 3),
            vote("d", Department::LSPD, Candidate::Abstained, 4),
        ];
        let breakdowns = Tally::new(&votes).department_breakdowns();
        let lspd = breakdowns
            .iter()
            .find(|b| b.department == Department::LSPD)
            .unwrap();
        assert_eq!(lspd.total, 4);
        assert_eq!(lspd.slices[0].candidate, Candidate::BrittanyAngel);
        assert_eq!(lspd.slices[0].count, 2);
        assert_eq!(lspd.slices[0].percent, 50.0);
        // Zero-count candidates are omitted.
        assert_eq!(lspd.slices.len(), 3);
        // Empty departments report zero without dividing by it.
        let doc = breakdowns
            .iter()
            .find(|b| b.department == Department::DOC)
            .unwrap();
        assert_eq!(doc.total, 0);
        assert!(doc.slices.is_empty());
    }

    #[test]
    fn test_domination_per_department() {
        let votes = vec![
            vote("a", Department::BSCO, Candidate::BrittanyAngel, 1),
            vote("b", Department::BSCO, Candidate::SeanDanielson, 2),
            vote("c", Department::DOJ, Candidate::BrittanyAngel, 3),
        ];
        let leader = Tally::new(&votes).leader().unwrap();
        assert_eq!(leader.candidate, Candidate::BrittanyAngel);
        let bsco = leader
            .domination
            .iter()
            .find(|d| d.department == Department::BSCO)
            .unwrap();
        assert_eq!(bsco.percent, 50.0);
        let doj = leader
            .domination
            .iter()
            .find(|d| d.department == Department::DOJ)
            .unwrap();
        assert_eq!(doj.percent, 100.0);
        let sasm = leader
            .domination
            .iter()
            .find(|d| d.department == Department::SASM)
            .unwrap();
        assert_eq!(sasm.percent, 0.0);
    }

    #[test]
    fn test_grouping_is_order_independent() {
        let votes = sample_votes();
        let mut reversed = votes.clone();
        reversed.reverse();

        let a = Tally::new(&votes);
        let b = Tally::new(&reversed);
        let grouped_a: Vec<(Department, Vec<String>)> = a
            .by_department()
            .into_iter()
            .map(|(d, vs)| (d, vs.iter().map(|v| v.voter_name.clone()).collect()))
            .collect();
        let grouped_b: Vec<(Department, Vec<String>)> = b
            .by_department()
            .into_iter()
            .map(|(d, vs)| (d, vs.iter().map(|v| v.voter_name.clone()).collect()))
            .collect();
        assert_eq!(grouped_a, grouped_b);

        // Departments alphabetical, voters alphabetical within each.
        let depts: Vec<Department> = grouped_a.iter().map(|(d, _)| *d).collect();
        let mut sorted = depts.clone();
        sorted.sort();
        assert_eq!(depts, sorted);
        let bsco = &grouped_a.iter().find(|(d, _)| *d == Department::BSCO).unwrap().1;
        assert_eq!(bsco, &vec!["Daisy Dukakis".to_string(), "Maeve Wolfe".to_string()]);
    }

    #[test]
    fn test_report_is_byte_stable() {
        let votes = sample_votes();
        let mut shuffled = votes.clone();
        shuffled.rotate_left(3);
        shuffled.swap(0, 1);

        let a = report::render(&votes);
        let b = report::render(&shuffled);
        assert_eq!(a, b);

        assert!(a.starts_with("CHIEF JUSTICE ELECTION - VOTE REPORT\n"));
        assert!(a.contains("Brittany Angel: 3"));
        assert!(a.contains("Abstained: 2"));
        assert!(a.contains("Total: 6"));
        assert!(a.contains("Sean Danielson (0)\n  (no votes)"));
        assert!(a.contains("BSCO: Daisy Dukakis / Maeve Wolfe"));
    }

    #[test]
    fn test_report_of_empty_list() {
        let text = report::render(&[]);
        assert!(text.contains("Total: 0"));
        assert!(text.contains("Brittany Angel: 0"));
    }

    #[test]
    fn test_replay_clusters_near_simultaneous_votes() {
        let votes = vec![
            vote("a", Department::BSCO, Candidate::BrittanyAngel, 1_000),
            vote("b", Department::BSCO, Candidate::BrittanyAngel, 2_000),
            // 10ms after the previous vote: same cluster.
            vote("c", Department::SASM, Candidate::Abstained, 2_010),
            vote("d", Department::DOC, Candidate::SeanDanielson, 3_000),
        ];
        let replay = Replay::new(&votes);
        assert_eq!(replay.cluster_count(), 3);
        assert_eq!(replay.total_votes(), 4);
    }

    #[test]
    fn test_replay_order_deterministic_across_permutations() {
        let mut votes = vec![
            vote("a", Department::BSCO, Candidate::SeanDanielson, 1_000),
            vote("b", Department::DOC, Candidate::Abstained, 1_000),
            vote("c", Department::DOJ, Candidate::BrittanyAngel, 1_000),
        ];
        let forward = Replay::new(&votes);
        votes.reverse();
        let backward = Replay::new(&votes);

        // One cluster either way; partial frames agree at every probe point.
        assert_eq!(forward.cluster_count(), 1);
        for probe in [0.0, 0.25, 0.5, 1.0] {
            let mut f = forward.clone();
            let mut b = backward.clone();
            f.scrub(probe);
            b.scrub(probe);
            assert_eq!(f.frame(), b.frame(), "probe {probe}");
        }
    }

    #[test]
    fn test_replay_end_state_matches_tally() {
        let votes = sample_votes();
        let mut replay = Replay::new(&votes);
        replay.scrub(replay.cluster_count() as f64);
        let frame = replay.frame();

        let tally = Tally::new(&votes);
        for standing in &frame {
            let expected = tally
                .candidate_tallies()
                .into_iter()
                .find(|t| t.candidate == standing.candidate)
                .unwrap()
                .count;
            assert_eq!(standing.display_count as usize, expected);
            assert_eq!(standing.count, expected as f64);
        }
        // Descending, alphabetical on ties.
        for pair in frame.windows(2) {
            assert!(pair[0].count >= pair[1].count);
            if pair[0].count == pair[1].count {
                assert!(pair[0].candidate.as_str() < pair[1].candidate.as_str());
            }
        }
    }

    #[test]
    fn test_replay_fractional_progress() {
        let votes = vec![
            vote("a", Department::BSCO, Candidate::BrittanyAngel, 1_000),
            vote("b", Department::BSCO, Candidate::BrittanyAngel, 1_000 + CLUSTER_EPSILON_MS - 1),
            vote("c", Department::DOC, Candidate::SeanDanielson, 10_000),
        ];
        let mut replay = Replay::new(&votes);
        assert_eq!(replay.cluster_count(), 2);

        replay.scrub(0.5);
        let frame = replay.frame();
        let brittany = frame
            .iter()
            .find(|s| s.candidate == Candidate::BrittanyAngel)
            .unwrap();
        // Both clustered votes advance together at half weight.
        assert!((brittany.count - 1.0).abs() < 1e-9);
        assert_eq!(brittany.display_count, 1);

        replay.scrub(1.25);
        let frame = replay.frame();
        let sean = frame
            .iter()
            .find(|s| s.candidate == Candidate::SeanDanielson)
            .unwrap();
        assert!((sean.count - 0.25).abs() < 1e-9);
        assert_eq!(sean.display_count, 0);
    }

    #[test]
    fn test_replay_scrub_clamps_and_stops_autoplay() {
        let votes = sample_votes();
        let mut replay = Replay::new(&votes);
        replay.play();
        assert!(replay.is_playing());

        replay.scrub(1e9);
        assert!(!replay.is_playing());
        assert_eq!(replay.progress(), replay.cluster_count() as f64);

        replay.scrub(-5.0);
        assert_eq!(replay.progress(), 0.0);
        replay.scrub(f64::NAN);
        assert_eq!(replay.progress(), 0.0);
    }

    #[test]
    fn test_replay_tick_is_rate_independent() {
        let votes = sample_votes();
        let mut coarse = Replay::new(&votes);
        let mut fine = Replay::new(&votes);
        coarse.set_speed(ReplaySpeed::Fast);
        fine.set_speed(ReplaySpeed::Fast);

        coarse.play();
        coarse.tick(0.0);
        coarse.tick(1_000.0);

        fine.play();
        fine.tick(0.0);
        for ms in (100..=1_000).step_by(100) {
            fine.tick(ms as f64);
        }
        assert!((coarse.progress() - fine.progress()).abs() < 1e-9);

        // Fast covers all clusters in 10s; one oversized delta clamps and stops.
        coarse.tick(60_000.0);
        assert_eq!(coarse.progress(), coarse.cluster_count() as f64);
        assert!(!coarse.is_playing());
    }

    #[test]
    fn test_replay_speed_change_keeps_progress() {
        let votes = sample_votes();
        let mut replay = Replay::new(&votes);
        replay.play();
        replay.tick(0.0);
        replay.tick(2_000.0);
        let progress = replay.progress();
        assert!(progress > 0.0);

        replay.set_speed(ReplaySpeed::Slow);
        assert_eq!(replay.progress(), progress);
        assert!(replay.is_playing());
    }

    #[test]
    fn test_replay_empty_and_single_cluster() {
        let empty = Replay::new(&[]);
        assert_eq!(empty.cluster_count(), 0);
        assert!(empty.frame().is_empty());

        let mut single = Replay::new(&[
            vote("a", Department::BSCO, Candidate::BrittanyAngel, 100),
            vote("b", Department::DOC, Candidate::Abstained, 110),
        ]);
        assert_eq!(single.cluster_count(), 1);
        single.scrub(0.5);
        let frame = single.frame();
        assert!(frame.iter().all(|s| s.display_count == 0));
        single.scrub(1.0);
        let total: u64 = single.frame().iter().map(|s| s.display_count).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_replay_play_from_end_rewinds() {
        let votes = sample_votes();
        let mut replay = Replay::new(&votes);
        replay.scrub(replay.cluster_count() as f64);
        replay.play();
        assert!(replay.is_playing());
        assert_eq!(replay.progress(), 0.0);

        let mut empty = Replay::new(&[]);
        empty.play();
        assert!(!empty.is_playing());
    }

    #[test]
    fn test_voter_name_validation() {
        assert!(validate_voter_name("Maeve Wolfe").is_ok());
        assert_eq!(validate_voter_name("   "), Err(ValidationError::EmptyVoterName));
        let long = "x".repeat(61);
        assert_eq!(validate_voter_name(&long), Err(ValidationError::VoterNameTooLong));
    }

    #[test]
    fn test_vote_deserializes_legacy_field_names() {
        let legacy = r#"{
            "id": "4b4b1aee-17c3-4dc4-9e3a-3f08bfa7e2b5",
            "votername": "Brian Knight",
            "department": "SASM",
            "candidate": "Abstained",
            "created_at": 1700000000000
        }"#;
        let vote: Vote = serde_json::from_str(legacy).unwrap();
        assert_eq!(vote.voter_name, "Brian Knight");
        assert_eq!(vote.candidate, Candidate::Abstained);
        assert_eq!(vote.timestamp_ms, 1_700_000_000_000);

        let json = serde_json::to_string(&vote).unwrap();
        assert!(json.contains("\"voterName\""));
        assert!(json.contains("\"timestamp\""));
        assert!(json.contains("\"Abstained\""));
    }
}

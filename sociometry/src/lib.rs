pub mod builder;
mod config;
pub mod graph;
pub mod layout;
pub mod manual;

use log::{debug, info, warn};

use std::collections::HashMap;

pub use crate::config::*;

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct ParticipantId(u32);

// A nomination slot, once checked against the roster.
#[derive(Eq, PartialEq, Debug, Clone)]
enum Choice {
    Blank,
    Unknown(String),
    Filled(ParticipantId),
}

struct CheckResult {
    // Participants in order of first appearance.
    roster: Vec<(String, ParticipantId)>,
    // One entry per response, with the nominator and the checked choices.
    responses: Vec<(ParticipantId, Vec<Choice>)>,
}

/// Scores a collection of survey responses.
///
/// Every respondent is a participant, even if nobody nominated them (score 0).
/// A nominee that is not a participant is dropped from the scoring, and reported
/// in [`SociometryResult::dropped_nominations`].
///
/// ```
/// use sociometry::*;
///
/// let responses = vec![
///     SurveyResponse { name: "A".to_string(), choices: vec![Some("B".to_string())] },
///     SurveyResponse { name: "B".to_string(), choices: vec![Some("A".to_string()), Some("C".to_string())] },
///     SurveyResponse { name: "C".to_string(), choices: vec![] },
/// ];
/// let res = run_sociometry(&responses)?;
/// assert_eq!(res.table.len(), 3);
/// assert_eq!(res.nominations.len(), 3);
/// # Ok::<(), SociometryErrors>(())
/// ```
pub fn run_sociometry(coll: &[SurveyResponse]) -> Result<SociometryResult, SociometryErrors> {
    info!("Processing {:?} responses", coll.len());

    let cr = checks(coll)?;
    info!("Processing {:?} participants", cr.roster.len());

    let names_by_id: HashMap<ParticipantId, String> = cr
        .roster
        .iter()
        .map(|(name, pid)| (*pid, name.clone()))
        .collect();

    let mut tally = compute_tally(&cr.roster);
    let mut nominations: Vec<Nomination> = Vec::new();
    let mut dropped_nominations: Vec<DroppedNomination> = Vec::new();

    for (nominator_id, choices) in cr.responses.iter() {
        // Every nominator is in the roster by construction.
        let nominator = &names_by_id[nominator_id];
        for (idx, choice) in choices.iter().enumerate() {
            let slot = (idx + 1) as u32;
            match choice {
                Choice::Blank => {}
                Choice::Filled(pid) => {
                    if let Some(count) = tally.get_mut(pid) {
                        *count += 1;
                    }
                    nominations.push(Nomination {
                        nominator: nominator.clone(),
                        nominee: names_by_id[pid].clone(),
                        slot,
                    });
                }
                Choice::Unknown(value) => {
                    warn!(
                        "run_sociometry: {} nominated {:?} in slot {}, which is not a participant: dropping",
                        nominator, value, slot
                    );
                    dropped_nominations.push(DroppedNomination {
                        nominator: nominator.clone(),
                        value: value.clone(),
                        slot,
                    });
                }
            }
        }
    }
    debug!("run_sociometry: tally: {:?}", tally);

    let table = ranked_table(&cr.roster, &tally);
    for row in table.iter() {
        info!("{:>4}. {:>3} {} -> {}", row.rank, row.score, row.name, row.tier);
    }
    if !dropped_nominations.is_empty() {
        warn!(
            "run_sociometry: {} nominations did not match any participant",
            dropped_nominations.len()
        );
    }

    Ok(SociometryResult {
        table,
        nominations,
        dropped_nominations,
    })
}

// Initialize the tally with every participant, to capture the ones who do not
// receive any nomination.
fn compute_tally(roster: &[(String, ParticipantId)]) -> HashMap<ParticipantId, u32> {
    roster.iter().map(|(_, pid)| (*pid, 0)).collect()
}

fn ranked_table(
    roster: &[(String, ParticipantId)],
    tally: &HashMap<ParticipantId, u32>,
) -> Vec<ScoreRow> {
    let mut scored: Vec<(String, u32)> = roster
        .iter()
        .map(|(name, pid)| (name.clone(), tally.get(pid).cloned().unwrap_or(0)))
        .collect();
    // The sort is stable: ties keep the roster order.
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (name, score))| ScoreRow {
            rank: (idx + 1) as u32,
            name,
            score,
            tier: Tier::from_score(score),
        })
        .collect()
}

// Builds the roster and resolves all the choices against it.
// Participants are returned in the order of first appearance.
fn checks(coll: &[SurveyResponse]) -> Result<CheckResult, SociometryErrors> {
    debug!("checks: coll size: {:?}", coll.len());
    let mut roster: Vec<(String, ParticipantId)> = Vec::new();
    let mut ids: HashMap<String, ParticipantId> = HashMap::new();

    for (row, r) in coll.iter().enumerate() {
        if r.name.is_empty() {
            return Err(SociometryErrors::EmptyParticipantName { row });
        }
        if r.choices.len() > NOMINATION_SLOTS {
            return Err(SociometryErrors::TooManyChoices {
                name: r.name.clone(),
                count: r.choices.len(),
            });
        }
        if !ids.contains_key(&r.name) {
            let pid = ParticipantId((roster.len() + 1) as u32);
            ids.insert(r.name.clone(), pid);
            roster.push((r.name.clone(), pid));
        } else {
            debug!("checks: {} appears in several responses", r.name);
        }
    }

    // The roster must be complete before resolving the choices: a nominee may only
    // respond further down the file.
    let mut responses: Vec<(ParticipantId, Vec<Choice>)> = Vec::new();
    for r in coll.iter() {
        let choices: Vec<Choice> = r
            .choices
            .iter()
            .map(|c| match c.as_deref() {
                None | Some("") => Choice::Blank,
                Some(s) => match ids.get(s) {
                    Some(pid) => Choice::Filled(*pid),
                    None => Choice::Unknown(s.to_string()),
                },
            })
            .collect();
        debug!("checks: choices for {}: {:?}", r.name, choices);
        responses.push((ids[&r.name], choices));
    }

    Ok(CheckResult { roster, responses })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(name: &str, choices: &[&str]) -> SurveyResponse {
        SurveyResponse {
            name: name.to_string(),
            choices: choices
                .iter()
                .map(|c| {
                    if c.is_empty() {
                        None
                    } else {
                        Some(c.to_string())
                    }
                })
                .collect(),
        }
    }

    fn scores(res: &SociometryResult) -> Vec<(String, u32)> {
        res.table
            .iter()
            .map(|r| (r.name.clone(), r.score))
            .collect()
    }

    fn pairs(res: &SociometryResult) -> Vec<(&str, &str)> {
        res.nominations
            .iter()
            .map(|n| (n.nominator.as_str(), n.nominee.as_str()))
            .collect()
    }

    #[test]
    fn end_to_end_small_class() {
        let _ = env_logger::try_init();
        let coll = vec![
            response("A", &["B", "", ""]),
            response("B", &["A", "C", ""]),
            response("C", &[]),
        ];
        let res = run_sociometry(&coll).unwrap();
        assert_eq!(
            scores(&res),
            vec![
                ("A".to_string(), 1),
                ("B".to_string(), 1),
                ("C".to_string(), 1)
            ]
        );
        assert_eq!(pairs(&res), vec![("A", "B"), ("B", "A"), ("B", "C")]);
        for row in res.table.iter() {
            assert_eq!(row.tier, Tier::Limited);
            assert!(row.interpretation().starts_with("Limited social"));
        }
        assert!(res.dropped_nominations.is_empty());
    }

    #[test]
    fn isolated_participants_are_kept() {
        let coll = vec![
            response("A", &["B", "", ""]),
            response("B", &["", "", ""]),
            response("Z", &["", "", ""]),
        ];
        let res = run_sociometry(&coll).unwrap();
        assert_eq!(res.table.len(), 3);
        let z = res.row("Z").unwrap();
        assert_eq!(z.score, 0);
        assert_eq!(z.tier, Tier::Isolated);
        assert!(z.interpretation().starts_with("Isolated"));
    }

    #[test]
    fn sorted_by_decreasing_score() {
        // A:0, B:3, C:7
        let mut coll = vec![response("A", &["B", "C", ""]), response("B", &["C", "", ""])];
        for i in 0..5 {
            coll.push(response(&format!("X{}", i), &["C", "", ""]));
        }
        coll.push(response("Y", &["B", "", ""]));
        coll.push(response("W", &["B", "", ""]));
        // C answers last, after everyone who nominated them.
        coll.push(response("C", &["", "", ""]));
        let res = run_sociometry(&coll).unwrap();
        assert!(res.dropped_nominations.is_empty());
        let order: Vec<&str> = res.table.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            order,
            vec!["C", "B", "A", "X0", "X1", "X2", "X3", "X4", "Y", "W"]
        );
        assert_eq!(res.row("C").unwrap().score, 7);
        assert_eq!(res.row("B").unwrap().score, 3);
        assert_eq!(res.row("A").unwrap().score, 0);
        let ranks: Vec<u32> = res.table.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, (1..=res.table.len() as u32).collect::<Vec<u32>>());
    }

    #[test]
    fn ties_keep_roster_order() {
        let coll = vec![
            response("D", &["", "", ""]),
            response("A", &["", "", ""]),
            response("C", &["", "", ""]),
            response("B", &["", "", ""]),
        ];
        let res = run_sociometry(&coll).unwrap();
        let order: Vec<&str> = res.table.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(order, vec!["D", "A", "C", "B"]);
    }

    #[test]
    fn unknown_nominees_are_dropped() {
        let coll = vec![
            response("A", &["Bob", "B", "b"]),
            response("B", &["", "", ""]),
        ];
        let res = run_sociometry(&coll).unwrap();
        assert_eq!(pairs(&res), vec![("A", "B")]);
        let total: u32 = res.table.iter().map(|r| r.score).sum();
        assert_eq!(total as usize, res.total_nominations());
        assert!(res.nominations.iter().all(|n| n.nominee != "Bob"));
        assert_eq!(
            res.dropped_nominations,
            vec![
                DroppedNomination {
                    nominator: "A".to_string(),
                    value: "Bob".to_string(),
                    slot: 1
                },
                DroppedNomination {
                    nominator: "A".to_string(),
                    value: "b".to_string(),
                    slot: 3
                },
            ]
        );
    }

    #[test]
    fn self_nomination_counts() {
        let coll = vec![response("A", &["A", "", ""]), response("B", &["", "", ""])];
        let res = run_sociometry(&coll).unwrap();
        assert_eq!(res.row("A").unwrap().score, 1);
        assert_eq!(pairs(&res), vec![("A", "A")]);
    }

    #[test]
    fn nominee_responding_later_is_known() {
        let coll = vec![response("A", &["Z", "", ""]), response("Z", &["", "", ""])];
        let res = run_sociometry(&coll).unwrap();
        assert_eq!(res.row("Z").unwrap().score, 1);
        assert!(res.dropped_nominations.is_empty());
    }

    #[test]
    fn repeated_respondent_is_one_participant() {
        let coll = vec![
            response("A", &["B", "", ""]),
            response("B", &["", "", ""]),
            response("A", &["B", "", ""]),
        ];
        let res = run_sociometry(&coll).unwrap();
        assert_eq!(res.table.len(), 2);
        assert_eq!(res.row("B").unwrap().score, 2);
        assert_eq!(pairs(&res), vec![("A", "B"), ("A", "B")]);
    }

    #[test]
    fn runs_are_deterministic() {
        let coll = vec![
            response("A", &["B", "C", ""]),
            response("B", &["C", "A", ""]),
            response("C", &["A", "", ""]),
            response("D", &["C", "", "E"]),
        ];
        let r1 = run_sociometry(&coll).unwrap();
        let r2 = run_sociometry(&coll).unwrap();
        assert_eq!(r1, r2);
    }

    #[test]
    fn empty_survey() {
        let res = run_sociometry(&[]).unwrap();
        assert!(res.table.is_empty());
        assert!(res.nominations.is_empty());
    }

    #[test]
    fn rejects_empty_names() {
        let coll = vec![response("A", &["", "", ""]), response("", &["A", "", ""])];
        assert_eq!(
            run_sociometry(&coll),
            Err(SociometryErrors::EmptyParticipantName { row: 1 })
        );
    }

    #[test]
    fn rejects_extra_slots() {
        let coll = vec![response("A", &["", "", "", "B"])];
        assert_eq!(
            run_sociometry(&coll),
            Err(SociometryErrors::TooManyChoices {
                name: "A".to_string(),
                count: 4
            })
        );
    }

    #[test]
    fn tier_breakpoints() {
        assert_eq!(Tier::from_score(0), Tier::Isolated);
        assert_eq!(Tier::from_score(1), Tier::Limited);
        assert_eq!(Tier::from_score(2), Tier::Limited);
        assert_eq!(Tier::from_score(3), Tier::Adequate);
        assert_eq!(Tier::from_score(5), Tier::Adequate);
        assert_eq!(Tier::from_score(6), Tier::Popular);
        assert_eq!(Tier::from_score(9), Tier::Popular);
        assert_eq!(Tier::from_score(10), Tier::VeryPopular);
        assert_eq!(Tier::from_score(250), Tier::VeryPopular);
        assert_eq!(interpret_score(4), "Adequately social");
    }
}

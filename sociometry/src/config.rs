// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The number of nomination slots that a respondent may fill in.
pub const NOMINATION_SLOTS: usize = 3;

/// One row of a survey: the respondent and the nominees, in slot order.
///
/// In most cases, it is enough to use the higher-level builder API.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SurveyResponse {
    pub name: String,
    /// The content of each slot. `None` (or an empty string) is a slot left blank.
    pub choices: Vec<Option<String>>,
}

// ******** Output data structures *********

/// A valid nomination: the nominee is a known participant.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Nomination {
    pub nominator: String,
    pub nominee: String,
    /// The slot the nomination was found in, starting at 1.
    pub slot: u32,
}

/// A non-empty nominee value that did not match any participant.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct DroppedNomination {
    pub nominator: String,
    pub value: String,
    pub slot: u32,
}

/// The interpretation of a popularity score.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Tier {
    /// No nomination received.
    Isolated,
    /// 1 or 2 nominations.
    Limited,
    /// 3 to 5 nominations.
    Adequate,
    /// 6 to 9 nominations.
    Popular,
    /// 10 nominations or more.
    VeryPopular,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Isolated,
        Tier::Limited,
        Tier::Adequate,
        Tier::Popular,
        Tier::VeryPopular,
    ];

    pub fn from_score(score: u32) -> Tier {
        match score {
            0 => Tier::Isolated,
            1..=2 => Tier::Limited,
            3..=5 => Tier::Adequate,
            6..=9 => Tier::Popular,
            _ => Tier::VeryPopular,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Isolated => "Isolated — needs special attention",
            Tier::Limited => "Limited social — needs encouragement",
            Tier::Adequate => "Adequately social",
            Tier::Popular => "Popular — well liked",
            Tier::VeryPopular => "Very popular — potential facilitator",
        }
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The interpretation label for a score.
pub fn interpret_score(score: u32) -> &'static str {
    Tier::from_score(score).label()
}

/// One line of the result table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScoreRow {
    /// Position in the sorted table, starting at 1.
    pub rank: u32,
    pub name: String,
    pub score: u32,
    pub tier: Tier,
}

impl ScoreRow {
    pub fn interpretation(&self) -> &'static str {
        self.tier.label()
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SociometryResult {
    /// Sorted by decreasing score. Ties keep the order of the roster.
    pub table: Vec<ScoreRow>,
    /// In input order, then slot order.
    pub nominations: Vec<Nomination>,
    pub dropped_nominations: Vec<DroppedNomination>,
}

impl SociometryResult {
    /// The total number of valid nominations, which is also the sum of all the scores.
    pub fn total_nominations(&self) -> usize {
        self.nominations.len()
    }

    pub fn row(&self, name: &str) -> Option<&ScoreRow> {
        self.table.iter().find(|r| r.name == name)
    }
}

/// Errors that prevent the scoring from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SociometryErrors {
    /// A response without a participant name. The row index starts at 0.
    EmptyParticipantName { row: usize },
    /// A response with more choices than nomination slots.
    TooManyChoices { name: String, count: usize },
}

impl Error for SociometryErrors {}

impl Display for SociometryErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SociometryErrors::EmptyParticipantName { row } => {
                write!(f, "response #{} has no participant name", row + 1)
            }
            SociometryErrors::TooManyChoices { name, count } => write!(
                f,
                "response of {} has {} choices, at most {} are allowed",
                name, count, NOMINATION_SLOTS
            ),
        }
    }
}

use serde::Serialize;

pub const DIMENSION_COUNT: usize = 8;

/// One axis of a playstyle profile. A rating of 1 leans toward `low_label`, 10 toward
/// `high_label`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaystyleDimension {
    pub key: &'static str,
    pub question: &'static str,
    pub low_label: &'static str,
    pub high_label: &'static str,
}

impl PlaystyleDimension {
    /// Phrase describing which side of this axis a buyer rating leans toward.
    pub fn side_for(&self, rating: i32) -> &'static str {
        if rating >= 5 {
            self.high_label
        } else {
            self.low_label
        }
    }
}

/// Fixed dimension order. Index `i` of any playstyle vector refers to `DIMENSIONS[i]`.
pub const DIMENSIONS: [PlaystyleDimension; DIMENSION_COUNT] = [
    PlaystyleDimension {
        key: "shootVsDrive",
        question: "Do you prefer to shoot from outside or attack the rim?",
        low_label: "Drive style",
        high_label: "Shooting style",
    },
    PlaystyleDimension {
        key: "soloVsSquad",
        question: "Do you play mostly with a squad or on your own?",
        low_label: "Squad play",
        high_label: "Solo play",
    },
    PlaystyleDimension {
        key: "defenseSkill",
        question: "How much do you rely on your defense to win games?",
        low_label: "Offense-first approach",
        high_label: "Lockdown defense",
    },
    PlaystyleDimension {
        key: "reactionTiming",
        question: "Are you a patient reader of the play or a twitch reactor?",
        low_label: "Patient timing",
        high_label: "Quick reactions",
    },
    PlaystyleDimension {
        key: "offensiveStyle",
        question: "Do you look to set up teammates or to score yourself?",
        low_label: "Playmaking style",
        high_label: "Scoring style",
    },
    PlaystyleDimension {
        key: "physicalPlay",
        question: "Do you win with finesse or by overpowering opponents?",
        low_label: "Finesse play",
        high_label: "Physical play",
    },
    PlaystyleDimension {
        key: "pacePreference",
        question: "Do you like to slow it down or push the pace?",
        low_label: "Half-court pace",
        high_label: "Fast-break pace",
    },
    PlaystyleDimension {
        key: "consistencyVsRisk",
        question: "Do you prefer steady, reliable plays or high-risk, high-reward moves?",
        low_label: "Consistent play",
        high_label: "High-risk play",
    },
];

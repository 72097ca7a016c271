//! Round phase tracking
//!
//! Advisory only: the client records whatever round type the server last
//! announced and never advances the phase on its own.

use serde::{Deserialize, Serialize};

/// Server round types, in wire index order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    #[default]
    SettlementSetup1,
    RoadSetup1,
    SettlementSetup2,
    RoadSetup2,
    FirstRound,
    Regular,
    MoveRobberSeven,
    MoveRobberKnight,
    ChooseRobbedPlayer,
    BetweenRounds,
    BuildRoadDevelopment1,
    BuildRoadDevelopment2,
    MonopolyPickResource,
    YearOfPlentyPickResources,
    DiscardPhase,
    GameOver,
}

impl RoundPhase {
    pub const ALL: [RoundPhase; 16] = [
        RoundPhase::SettlementSetup1,
        RoundPhase::RoadSetup1,
        RoundPhase::SettlementSetup2,
        RoundPhase::RoadSetup2,
        RoundPhase::FirstRound,
        RoundPhase::Regular,
        RoundPhase::MoveRobberSeven,
        RoundPhase::MoveRobberKnight,
        RoundPhase::ChooseRobbedPlayer,
        RoundPhase::BetweenRounds,
        RoundPhase::BuildRoadDevelopment1,
        RoundPhase::BuildRoadDevelopment2,
        RoundPhase::MonopolyPickResource,
        RoundPhase::YearOfPlentyPickResources,
        RoundPhase::DiscardPhase,
        RoundPhase::GameOver,
    ];

    /// Phase for a wire index; `None` when out of range
    pub fn from_index(index: u8) -> Option<RoundPhase> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Phase for its display name, e.g. `"MoveRobber(7)"`
    pub fn from_name(name: &str) -> Option<RoundPhase> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            RoundPhase::SettlementSetup1 => "SettlementSetup#1",
            RoundPhase::RoadSetup1 => "RoadSetup#1",
            RoundPhase::SettlementSetup2 => "SettlementSetup#2",
            RoundPhase::RoadSetup2 => "RoadSetup#2",
            RoundPhase::FirstRound => "FirstRound",
            RoundPhase::Regular => "Regular",
            RoundPhase::MoveRobberSeven => "MoveRobber(7)",
            RoundPhase::MoveRobberKnight => "MoveRobber(Knight)",
            RoundPhase::ChooseRobbedPlayer => "ChooseRobbedPlayer",
            RoundPhase::BetweenRounds => "BetweenRounds",
            RoundPhase::BuildRoadDevelopment1 => "BuildRoadDevelopment(1)",
            RoundPhase::BuildRoadDevelopment2 => "BuildRoadDevelopment(2)",
            RoundPhase::MonopolyPickResource => "MonopolyPickResource",
            RoundPhase::YearOfPlentyPickResources => "YearOfPlentyPickResources",
            RoundPhase::DiscardPhase => "DiscardPhase",
            RoundPhase::GameOver => "GameOver",
        }
    }

    pub fn is_setup(self) -> bool {
        self.index() <= RoundPhase::RoadSetup2.index()
    }

    /// The dice may be rolled at the start of these rounds
    pub fn allows_dice_roll(self) -> bool {
        matches!(self, RoundPhase::FirstRound | RoundPhase::BetweenRounds)
    }

    pub fn is_terminal(self) -> bool {
        self == RoundPhase::GameOver
    }
}

impl std::fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

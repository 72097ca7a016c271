//! Dirty-region tracking
//!
//! Every mutation of the session state marks the UI regions it touched. The
//! scheduler accumulates marks until the current inbound unit is fully
//! applied, then hands the whole set out exactly once through
//! [`DirtyScheduler::drain`].

use bitflags::bitflags;

// ============================================================================
// Region - named UI parts
// ============================================================================

bitflags! {
    /// Logical UI regions a renderer repaints independently.
    ///
    /// Composite flags `BOARD` and `ALL` cover groups of regions.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Region: u32 {
        /// Tiles and ports; set when a new board arrives
        const MAP             = 1 << 0;
        /// Robber markers (blocked tiles)
        const ROBBERS         = 1 << 1;
        /// Edge availability
        const EDGES           = 1 << 2;
        /// Vertex availability
        const VERTICES        = 1 << 3;
        const ROADS           = 1 << 4;
        const SETTLEMENTS     = 1 << 5;
        const CITIES          = 1 << 6;
        const HAND            = 1 << 7;
        const DEV_HAND        = 1 << 8;
        const DICE            = 1 << 9;
        /// Whether the local player may roll
        const DICE_ACTION     = 1 << 10;
        const DISCARD         = 1 << 11;
        /// Names, colours and per-player counters
        const PLAYER_LIST     = 1 << 12;
        /// Ports the local player can trade through
        const PLAYER_PORTS    = 1 << 13;
        const PASS_ACTION     = 1 << 14;
        const TRADE           = 1 << 15;
        const TRADE_OFFERS    = 1 << 16;
        const BUY_DEV_CARD    = 1 << 17;
        /// Robber placement targets
        const ROBBER_MOVEMENT = 1 << 18;
        const PICK_ROBBED     = 1 << 19;
        const MONOPOLY        = 1 << 20;
        const YEAR_OF_PLENTY  = 1 << 21;
        const LOGS            = 1 << 22;
        /// Current player, round type and countdown
        const TURN            = 1 << 23;
        /// Lobby participants and parameters
        const ROOM            = 1 << 24;
        /// Post-match statistics
        const REPORT          = 1 << 25;

        const BOARD = Self::MAP.bits()
            | Self::ROBBERS.bits()
            | Self::EDGES.bits()
            | Self::VERTICES.bits()
            | Self::ROADS.bits()
            | Self::SETTLEMENTS.bits()
            | Self::CITIES.bits();

        const ALL = (1 << 26) - 1;
    }
}

/// Wire names of the single-bit regions
const NAMES: [(&str, Region); 26] = [
    ("map", Region::MAP),
    ("robbers", Region::ROBBERS),
    ("edges", Region::EDGES),
    ("vertices", Region::VERTICES),
    ("roads", Region::ROADS),
    ("settlements", Region::SETTLEMENTS),
    ("cities", Region::CITIES),
    ("hand", Region::HAND),
    ("devHand", Region::DEV_HAND),
    ("dice", Region::DICE),
    ("diceAction", Region::DICE_ACTION),
    ("discard", Region::DISCARD),
    ("playerList", Region::PLAYER_LIST),
    ("playerPorts", Region::PLAYER_PORTS),
    ("passAction", Region::PASS_ACTION),
    ("trade", Region::TRADE),
    ("tradeOffers", Region::TRADE_OFFERS),
    ("buyDevCard", Region::BUY_DEV_CARD),
    ("robberMovement", Region::ROBBER_MOVEMENT),
    ("pickRobbed", Region::PICK_ROBBED),
    ("monopoly", Region::MONOPOLY),
    ("yearOfPlenty", Region::YEAR_OF_PLENTY),
    ("logs", Region::LOGS),
    ("turn", Region::TURN),
    ("room", Region::ROOM),
    ("report", Region::REPORT),
];

impl Region {
    /// Look a single region up by its wire name
    pub fn from_wire_name(name: &str) -> Option<Region> {
        NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, region)| region)
    }

    /// Wire names of every region in the set, in bit order
    pub fn names(self) -> Vec<&'static str> {
        NAMES
            .iter()
            .filter(|(_, region)| self.contains(*region))
            .map(|&(name, _)| name)
            .collect()
    }

    /// Iterate the single-bit regions in the set, in bit order
    pub fn regions(self) -> impl Iterator<Item = Region> {
        NAMES
            .iter()
            .map(|&(_, region)| region)
            .filter(move |region| self.contains(*region))
    }
}

// ============================================================================
// DirtyScheduler
// ============================================================================

/// Accumulates touched regions between drains
#[derive(Debug, Default)]
pub struct DirtyScheduler {
    pending: Region,
}

impl DirtyScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, region: Region) {
        self.pending |= region;
    }

    /// Mark a region by wire name. Unknown names are logged and ignored.
    pub fn mark_named(&mut self, name: &str) -> bool {
        match Region::from_wire_name(name) {
            Some(region) => {
                self.mark(region);
                true
            }
            None => {
                tracing::warn!("unknown ui region: {}", name);
                false
            }
        }
    }

    pub fn pending(&self) -> Region {
        self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Return the accumulated set and reset to empty
    pub fn drain(&mut self) -> Region {
        std::mem::take(&mut self.pending)
    }
}

/// Switches for the places where the house rules of the terminal game and
/// the standard rules of chess disagree.
///
/// `standard()` plays by the usual rules. `legacy()` reproduces the looser
/// behaviour: knights never give check, a move may leave your own king
/// attacked (the game then ends by king capture), the king may castle across
/// an attacked square and a pawn may double-step over an occupied square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    /// Knights count as attackers for check, mate and castling guards
    pub detect_knight_attacks: bool,
    /// Reject any move that leaves the mover's king attacked
    pub forbid_self_check: bool,
    /// Castling also requires the square the king passes over to be unattacked
    pub guard_castling_transit: bool,
    /// A double pawn step also requires the skipped square to be empty
    pub guard_pawn_double_step: bool,
}

impl RuleSet {
    pub const fn standard() -> Self {
        Self {
            detect_knight_attacks: true,
            forbid_self_check: true,
            guard_castling_transit: true,
            guard_pawn_double_step: true,
        }
    }

    pub const fn legacy() -> Self {
        Self {
            detect_knight_attacks: false,
            forbid_self_check: false,
            guard_castling_transit: false,
            guard_pawn_double_step: false,
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

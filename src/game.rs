use std::fmt;

/// A two-player board game that the minimax search can walk.
pub(crate) trait Game: Clone + fmt::Display {
    type Action: fmt::Debug + Copy + PartialEq;
    type Player: fmt::Debug + Copy + PartialEq;

    /// Legal actions in a fixed, deterministic order.
    fn available_moves(&self) -> Vec<Self::Action>;

    fn winner(&self) -> Option<Self::Player>;

    fn is_full(&self) -> bool;

    /// Puts `player`'s piece on `action` without checking legality.
    fn place(&mut self, action: Self::Action, player: Self::Player);
}

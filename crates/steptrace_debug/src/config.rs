//! Configuration for the trace player.

/// Order in which variable queries list visible slots.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum VariableOrder {
    /// Ascending slot id, which is declaration order.
    #[default]
    Declaration,
    /// Most recently written first; ties fall back to slot id.
    RecentlyWritten,
}

/// Configuration for a [`Player`](crate::Player).
#[derive(Clone, Debug)]
pub struct PlayerConfig {
    /// How variable queries order their results.
    pub variable_order: VariableOrder,

    /// Keep synthesized result variables visible after the step that
    /// produced them (false = they vanish when the next step begins).
    pub keep_results: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            variable_order: VariableOrder::Declaration,
            keep_results: false,
        }
    }
}

impl PlayerConfig {
    /// Creates a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set variable ordering.
    #[must_use]
    pub const fn with_variable_order(mut self, order: VariableOrder) -> Self {
        self.variable_order = order;
        self
    }

    /// Builder method to keep or retire result variables.
    #[must_use]
    pub const fn with_keep_results(mut self, keep: bool) -> Self {
        self.keep_results = keep;
        self
    }
}

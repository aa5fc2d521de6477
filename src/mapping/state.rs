//! Mapper state machine.
//!
//! ```text
//! Unseeded ──extract──▶ Seeded ──extract──▶ Steady ◀─┐
//!                                              └──extract─┘
//! ```

/// Which maps hold data from an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapperState {
    /// Nothing extracted yet; the next extraction seeds the global map.
    #[default]
    Unseeded,
    /// The global map was seeded; no local map has been extracted yet.
    Seeded,
    /// Every extraction fills the local map, which is then associated
    /// with and merged into the global map.
    Steady,
}

impl MapperState {
    pub fn is_global_initialized(self) -> bool {
        !matches!(self, Self::Unseeded)
    }

    pub fn is_local_initialized(self) -> bool {
        matches!(self, Self::Steady)
    }

    /// State after one more extraction.
    pub fn after_extraction(self) -> Self {
        match self {
            Self::Unseeded => Self::Seeded,
            Self::Seeded | Self::Steady => Self::Steady,
        }
    }
}

impl std::fmt::Display for MapperState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unseeded => "UNSEEDED",
            Self::Seeded => "SEEDED",
            Self::Steady => "STEADY",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        let s = MapperState::default();
        assert_eq!(s, MapperState::Unseeded);
        assert!(!s.is_global_initialized());

        let s = s.after_extraction();
        assert_eq!(s, MapperState::Seeded);
        assert!(s.is_global_initialized());
        assert!(!s.is_local_initialized());

        let s = s.after_extraction();
        assert_eq!(s, MapperState::Steady);
        assert!(s.is_local_initialized());
        assert_eq!(s.after_extraction(), MapperState::Steady);
    }
}

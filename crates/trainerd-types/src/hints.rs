//! Hint categories a device can have toggled on or off.

use serde::{Deserialize, Serialize};

/// Category of in-scene hints. The discriminant is the wire index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(usize)]
pub enum HintCategory {
    Cabinet = 0,
    Casette = 1,
    Console = 2,
    Pendant = 3,
}

impl HintCategory {
    /// Every category, in wire-index order.
    pub const ALL: [HintCategory; 4] = [
        HintCategory::Cabinet,
        HintCategory::Casette,
        HintCategory::Console,
        HintCategory::Pendant,
    ];

    /// Number of categories; the length of every hint table.
    pub const COUNT: usize = Self::ALL.len();

    /// Index used on the wire (`toggleHints:<index>:<bool>`).
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    // Exhaustive on purpose: a new variant stops compiling here until it is
    // also listed in `ALL`.
    const fn last_in_table(self) -> bool {
        match self {
            HintCategory::Cabinet | HintCategory::Casette | HintCategory::Console => false,
            HintCategory::Pendant => true,
        }
    }
}

// `ALL` must list every variant at its own discriminant and end with the last one.
const _: () = {
    let mut i = 0;
    while i < HintCategory::COUNT {
        assert!(HintCategory::ALL[i].index() == i);
        assert!(HintCategory::ALL[i].last_in_table() == (i + 1 == HintCategory::COUNT));
        i += 1;
    }
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_declaration_order() {
        for (i, category) in HintCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
            assert_eq!(HintCategory::from_index(i), Some(*category));
        }
        assert_eq!(HintCategory::from_index(HintCategory::COUNT), None);
    }

    #[test]
    fn test_table_covers_every_variant() {
        let mut seen = [false; HintCategory::COUNT];
        for category in HintCategory::ALL {
            assert!(!seen[category.index()], "{:?} listed twice", category);
            seen[category.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
        assert_eq!(HintCategory::Pendant.index() + 1, HintCategory::COUNT);
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Symbol {
    Cherry,
    Diamond,
    Bell,
    Lemon,
    Star,
    MoneyBag,
    Clover,
    Crown,
}

impl Symbol {
    pub const ALL: [Symbol; 8] = [
        Symbol::Cherry,
        Symbol::Diamond,
        Symbol::Bell,
        Symbol::Lemon,
        Symbol::Star,
        Symbol::MoneyBag,
        Symbol::Clover,
        Symbol::Crown,
    ];

    pub fn from_index(i: u8) -> Self {
        Self::ALL[i as usize % Self::ALL.len()]
    }

    pub fn to_index(self) -> u8 {
        match self {
            Symbol::Cherry => 0,
            Symbol::Diamond => 1,
            Symbol::Bell => 2,
            Symbol::Lemon => 3,
            Symbol::Star => 4,
            Symbol::MoneyBag => 5,
            Symbol::Clover => 6,
            Symbol::Crown => 7,
        }
    }

    /// Glyph shown on the reel.
    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Cherry => "🍒",
            Symbol::Diamond => "💎",
            Symbol::Bell => "🔔",
            Symbol::Lemon => "🍋",
            Symbol::Star => "⭐",
            Symbol::MoneyBag => "💰",
            Symbol::Clover => "☘️",
            Symbol::Crown => "👑",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Symbol::Cherry => "cherry",
            Symbol::Diamond => "diamond",
            Symbol::Bell => "bell",
            Symbol::Lemon => "lemon",
            Symbol::Star => "star",
            Symbol::MoneyBag => "money-bag",
            Symbol::Clover => "clover",
            Symbol::Crown => "crown",
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.glyph(), self.name())
    }
}

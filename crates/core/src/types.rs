use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Cups,
    Lemons,
    Sugar,
    Ice,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Cups,
        ResourceKind::Lemons,
        ResourceKind::Sugar,
        ResourceKind::Ice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Cups => "cups",
            ResourceKind::Lemons => "lemons",
            ResourceKind::Sugar => "sugar",
            ResourceKind::Ice => "ice",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stock on hand, one non-negative count per resource kind.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Inventory {
    pub cups: u32,
    pub lemons: u32,
    pub sugar: u32,
    pub ice: u32,
}

impl Inventory {
    pub fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Cups => self.cups,
            ResourceKind::Lemons => self.lemons,
            ResourceKind::Sugar => self.sugar,
            ResourceKind::Ice => self.ice,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut u32 {
        match kind {
            ResourceKind::Cups => &mut self.cups,
            ResourceKind::Lemons => &mut self.lemons,
            ResourceKind::Sugar => &mut self.sugar,
            ResourceKind::Ice => &mut self.ice,
        }
    }

    /// Ice never carries over between days.
    pub fn melt_ice(mut self) -> Self {
        self.ice = 0;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_cover_every_kind() {
        let mut inventory = Inventory::default();
        for (offset, kind) in ResourceKind::ALL.iter().enumerate() {
            *inventory.get_mut(*kind) = offset as u32 + 1;
        }
        assert_eq!(
            inventory,
            Inventory {
                cups: 1,
                lemons: 2,
                sugar: 3,
                ice: 4
            }
        );
        assert_eq!(inventory.get(ResourceKind::Sugar), 3);
    }

    #[test]
    fn melting_only_clears_ice() {
        let inventory = Inventory {
            cups: 5,
            lemons: 6,
            sugar: 7,
            ice: 30,
        }
        .melt_ice();
        assert_eq!(inventory.ice, 0);
        assert_eq!(inventory.cups, 5);
        assert_eq!(inventory.lemons, 6);
        assert_eq!(inventory.sugar, 7);
    }
}

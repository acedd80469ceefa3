// src/blockchain/chains.rs

//! Wormhole chain registry.
//!
//! Maps the human-readable chain names used by WormholeScan to the numeric
//! chain IDs assigned by the Wormhole protocol, and back. The registry is built
//! once at startup and is read-only afterwards.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

/// Numeric chain identifier assigned by the Wormhole protocol.
pub type ChainId = u16;

/// Chains known to WormholeScan, as `(display name, chain id)`.
pub const WORMHOLE_CHAINS: &[(&str, ChainId)] = &[
    ("Ethereum", 2),
    ("Solana", 1),
    ("Acala", 12),
    ("Algorand", 8),
    ("Aptos", 22),
    ("Arbitrum", 23),
    ("Avalanche", 6),
    ("Base", 30),
    ("Berachain", 39),
    ("Blast", 36),
    ("BNB Smart Chain", 4),
    ("Celestia", 4004),
    ("Celo", 14),
    ("Cosmos Hub", 4000),
    ("Dymension", 4007),
    ("Evmos", 4001),
    ("Fantom", 10),
    ("Gnosis", 25),
    ("HyperEVM", 47),
    ("Injective", 19),
    ("Ink", 46),
    ("Kaia", 13),
    ("Karura", 11),
    ("Kujira", 4002),
    ("Linea", 38),
    ("Mantle", 35),
    ("Mezo", 50),
    ("Monad", 48),
    ("Moonbeam", 16),
    ("NEAR", 15),
    ("Neon", 17),
    ("Neutron", 4003),
    ("Noble", 4009),
    ("Oasis", 7),
    ("Optimism", 24),
    ("Osmosis", 20),
    ("Polygon", 5),
    ("Provenance", 4008),
    ("Pythnet", 26),
    ("Scroll", 34),
    ("SEDA", 4006),
    ("Sei", 32),
    ("Seievm", 40),
    ("SNAXchain", 43),
    ("Stargaze", 4005),
    ("Sui", 21),
    ("Terra", 3),
    ("Terra 2.0", 18),
    ("Unichain", 44),
    ("World Chain", 45),
    ("X Layer", 37),
    ("XPLA", 28),
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate chain name '{0}'")]
    DuplicateName(String),
    #[error("duplicate chain id {id} ('{existing}' and '{duplicate}')")]
    DuplicateId {
        id: ChainId,
        existing: String,
        duplicate: String,
    },
}

/// Bidirectional name <-> id mapping.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    by_name: HashMap<String, ChainId>,
    by_lowercase_name: HashMap<String, ChainId>,
    by_id: BTreeMap<ChainId, String>,
}

impl ChainRegistry {
    /// Builds a registry from `(name, id)` pairs.
    ///
    /// Fails if a name (compared case-insensitively) or an id appears twice.
    pub fn from_entries<'a, I>(entries: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (&'a str, ChainId)>,
    {
        let mut by_name = HashMap::new();
        let mut by_lowercase_name = HashMap::new();
        let mut by_id = BTreeMap::new();

        for (name, id) in entries {
            if by_lowercase_name
                .insert(name.to_lowercase(), id)
                .is_some()
            {
                return Err(RegistryError::DuplicateName(name.to_string()));
            }
            if let Some(existing) = by_id.insert(id, name.to_string()) {
                return Err(RegistryError::DuplicateId {
                    id,
                    existing,
                    duplicate: name.to_string(),
                });
            }
            by_name.insert(name.to_string(), id);
        }

        Ok(Self {
            by_name,
            by_lowercase_name,
            by_id,
        })
    }

    /// The registry of all chains WormholeScan reports on.
    pub fn wormhole() -> Result<Self, RegistryError> {
        Self::from_entries(WORMHOLE_CHAINS.iter().copied())
    }

    pub fn name_to_id(&self, name: &str) -> Option<ChainId> {
        self.by_name.get(name).copied()
    }

    pub fn id_to_name(&self, id: ChainId) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// Display form of a chain id: its name when known, the raw id otherwise.
    pub fn display(&self, id: ChainId) -> Cow<'_, str> {
        match self.id_to_name(id) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(id.to_string()),
        }
    }

    /// Resolves user input that is either a numeric chain id or a chain name.
    /// Names are matched case-insensitively. Ids outside the registry resolve to `None`.
    pub fn resolve(&self, input: &str) -> Option<ChainId> {
        let input = input.trim();
        if let Ok(id) = input.parse::<ChainId>() {
            return self.contains_id(id).then_some(id);
        }
        self.name_to_id(input)
            .or_else(|| self.by_lowercase_name.get(&input.to_lowercase()).copied())
    }

    pub fn contains_id(&self, id: ChainId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// All chains in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ChainId)> + '_ {
        self.by_id.iter().map(|(id, name)| (name.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_is_consistent() {
        let registry = ChainRegistry::wormhole().unwrap();
        assert_eq!(registry.len(), WORMHOLE_CHAINS.len());
        assert_eq!(registry.name_to_id("Ethereum"), Some(2));
        assert_eq!(registry.id_to_name(1), Some("Solana"));
        assert_eq!(registry.id_to_name(4009), Some("Noble"));
    }

    #[test]
    fn test_name_round_trip() {
        let registry = ChainRegistry::wormhole().unwrap();
        for (name, _) in WORMHOLE_CHAINS {
            let id = registry.name_to_id(name).unwrap();
            assert_eq!(registry.id_to_name(id), Some(*name));
        }
    }

    #[test]
    fn test_unknown_id_passes_through() {
        let registry = ChainRegistry::wormhole().unwrap();
        assert_eq!(registry.id_to_name(9999), None);
        assert_eq!(registry.display(9999), "9999");
        assert_eq!(registry.display(0), "0");
        assert_eq!(registry.display(2), "Ethereum");
    }

    #[test]
    fn test_unknown_name_is_absent() {
        let registry = ChainRegistry::wormhole().unwrap();
        assert_eq!(registry.name_to_id("Dogecoin"), None);
        // exact lookup is case sensitive
        assert_eq!(registry.name_to_id("ethereum"), None);
    }

    #[test]
    fn test_resolve_accepts_names_and_ids() {
        let registry = ChainRegistry::wormhole().unwrap();
        assert_eq!(registry.resolve("ethereum"), Some(2));
        assert_eq!(registry.resolve("  bnb smart chain "), Some(4));
        assert_eq!(registry.resolve("Terra 2.0"), Some(18));
        assert_eq!(registry.resolve("30"), Some(30));
        assert_eq!(registry.resolve("9999"), None);
        assert!(!registry.contains_id(9999));
        assert_eq!(registry.resolve("Dogecoin"), None);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = ChainRegistry::from_entries([("Ethereum", 2), ("Ethereum", 3)]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("Ethereum".to_string()));

        let err = ChainRegistry::from_entries([("Sei", 32), ("SEI", 40)]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("SEI".to_string()));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = ChainRegistry::from_entries([("Ethereum", 2), ("Solana", 2)]).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateId {
                id: 2,
                existing: "Ethereum".to_string(),
                duplicate: "Solana".to_string(),
            }
        );
    }

    #[test]
    fn test_iter_is_ordered_by_id() {
        let registry = ChainRegistry::wormhole().unwrap();
        let ids: Vec<ChainId> = registry.iter().map(|(_, id)| id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        assert_eq!(registry.iter().next(), Some(("Solana", 1)));
    }
}

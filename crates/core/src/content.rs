//! Static content tables: reward keys and the constrained naming vocabulary.
//!
//! Name pools are keyed by tag category (natural for biomes, constructed for
//! built features, ethereal for map-level names) per the map aesthetic.

pub mod keys {
    pub const REWARD_NONE: &str = "reward_none";
    pub const REWARD_SMALL_CACHE: &str = "reward_small_cache";
    pub const REWARD_STANDARD_CACHE: &str = "reward_standard_cache";
    pub const REWARD_RICH_CACHE: &str = "reward_rich_cache";
    pub const REWARD_RELIC: &str = "reward_relic";
}

pub const NATURAL_ADJECTIVES: &[&str] = &[
    "Whispering",
    "Sunken",
    "Verdant",
    "Howling",
    "Ashen",
    "Gilded",
    "Mossy",
    "Thorned",
    "Windswept",
    "Shattered",
    "Frozen",
    "Burning",
    "Silent",
    "Wandering",
    "Crimson",
    "Pale",
];

pub const NATURAL_NOUNS: &[&str] = &[
    "Vale",
    "Moor",
    "Hollow",
    "Steppe",
    "Thicket",
    "Dunes",
    "Fen",
    "Ridge",
    "Basin",
    "Tangle",
    "Wastes",
    "Glade",
    "Bluffs",
    "Mire",
    "Reaches",
    "Barrens",
];

pub const CONSTRUCTED_ADJECTIVES: &[&str] = &[
    "Broken",
    "Forgotten",
    "Sealed",
    "Hallowed",
    "Ruined",
    "Hidden",
    "Blackened",
    "Ancient",
    "Crumbling",
    "Echoing",
    "Ironbound",
    "Forsaken",
];

pub const CONSTRUCTED_NOUNS: &[&str] = &[
    "Halls",
    "Keep",
    "Sanctum",
    "Catacombs",
    "Vault",
    "Depths",
    "Bastion",
    "Warrens",
    "Spire",
    "Undercroft",
    "Gallery",
    "Refuge",
];

pub const ETHEREAL_ADJECTIVES: &[&str] = &[
    "Veiled",
    "Umbral",
    "Radiant",
    "Fading",
    "Sundered",
    "Eternal",
    "Waning",
    "Astral",
    "Nameless",
    "Drowned",
];

pub const ETHEREAL_NOUNS: &[&str] = &[
    "Expanse",
    "March",
    "Veil",
    "Dominion",
    "Threshold",
    "Crossing",
    "Frontier",
    "Passage",
    "Demesne",
    "Verge",
];

pub const ANTAGONISTS: &[&str] = &[
    "the Hollow King",
    "Matriarch Vess",
    "the Grave Chorus",
    "Warlord Okhra",
    "the Pale Shepherd",
    "Sorrowfang",
    "the Unblinking Court",
    "Arch-Curator Limn",
];

pub const MACGUFFINS: &[&str] = &[
    "the Ember Crown",
    "the Saltglass Mirror",
    "the First Cartographer's Astrolabe",
    "the Severed Bell",
    "the Wyrmwood Reliquary",
    "the Lantern of Still Water",
];

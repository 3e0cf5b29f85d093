// Container fitting
pub const DEFAULT_FIT_ATTEMPTS: u32 = 2;

// Magazine filling (percentages)
pub const DEFAULT_STATIC_MAGAZINE_AMMO_CHANCE: f64 = 0.0;
pub const DEFAULT_LOOSE_MAGAZINE_AMMO_CHANCE: f64 = 50.0;
pub const DEFAULT_MIN_FILL_STATIC_MAGAZINE: f64 = 50.0;
pub const DEFAULT_MIN_FILL_LOOSE_MAGAZINE: f64 = 50.0;
pub const WEAPON_MAGAZINE_MIN_FILL: f64 = 25.0;

// Container group randomisation
pub const DEFAULT_GROUP_MIN_MULTIPLIER: f64 = 1.0;
pub const DEFAULT_GROUP_MAX_MULTIPLIER: f64 = 1.0;

// Slot names
pub const CONTAINER_GRID_SLOT: &str = "main";
pub const CARTRIDGE_SLOT: &str = "cartridges";
pub const MAGAZINE_SLOT: &str = "mod_magazine";

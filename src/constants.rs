/// Literal defaults applied while reshaping stored market records
/// These match what the frontend has always been sent for missing values

// Location
pub const DEFAULT_COUNTRY: &str = "USA";

// Schedule bounds used when an entry carries no start/end date
pub const DEFAULT_SEASON_START: &str = "2024-01-01";
pub const DEFAULT_SEASON_END: &str = "2024-12-31";

// Saturday. Unrecognized day values land here.
pub const FALLBACK_DAY_OF_WEEK: u8 = 6;

// Amenity tags that drive the derived accessibility flags
pub const AMENITY_ACCESSIBLE: &str = "accessible";
pub const AMENITY_PARKING: &str = "parking";
pub const AMENITY_RESTROOMS: &str = "restrooms";
pub const AMENITY_PLAYGROUND: &str = "playground";
pub const AMENITY_PET_FRIENDLY: &str = "pet_friendly";

// createdByType value that marks a vendor-submitted market
pub const CREATED_BY_VENDOR: &str = "vendor";

// Config file lookup
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const CONFIG_PATH_ENV: &str = "MARKET_TRACKER_CONFIG";
pub const DEFAULT_COUNTRY_ENV: &str = "MARKET_DEFAULT_COUNTRY";

use crate::constants::{
    AMENITY_ACCESSIBLE, AMENITY_PARKING, AMENITY_PET_FRIENDLY, AMENITY_PLAYGROUND,
    AMENITY_RESTROOMS,
};
use crate::types::AccessibilityFeatures;

/// Derive accessibility flags from amenity tags.
///
/// Tags match exactly. `family_friendly` is the odd one out: it is `true`
/// whenever there are no amenity tags at all, and only then does a missing
/// `playground` tag fail to turn it off.
pub fn derive(amenities: &[String]) -> AccessibilityFeatures {
    let has = |tag: &str| amenities.iter().any(|a| a == tag);

    AccessibilityFeatures {
        wheelchair_accessible: has(AMENITY_ACCESSIBLE),
        parking_available: has(AMENITY_PARKING),
        restrooms_available: has(AMENITY_RESTROOMS),
        family_friendly: amenities.is_empty() || has(AMENITY_PLAYGROUND),
        pet_friendly: has(AMENITY_PET_FRIENDLY),
    }
}

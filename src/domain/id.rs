use uuid::{Uuid, Version};

pub type UserId = Uuid;
pub type AccountId = Uuid;
pub type HistoryId = Uuid;

/// Generate a fresh random identifier.
pub fn new_id() -> Uuid {
    Uuid::new_v4()
}

/// Returns true if `id` is a well-formed version-4 UUID string.
pub fn validate(id: &str) -> bool {
    parse_id(id).is_some()
}

/// Parse a request identifier, rejecting empty strings and anything that is
/// not a random (v4) UUID.
pub fn parse_id(id: &str) -> Option<Uuid> {
    if id.is_empty() {
        return None;
    }

    Uuid::parse_str(id)
        .ok()
        .filter(|uuid| uuid.get_version() == Some(Version::Random))
}

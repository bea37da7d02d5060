use chrono::Utc;
use uuid::Uuid;

/// Generate an opaque client-side identifier.
///
/// Millisecond timestamp plus a random suffix wide enough that ids minted in
/// rapid succession within the same millisecond never collide.
pub fn generate_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", Utc::now().timestamp_millis(), &suffix[..12])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_unique_in_rapid_succession() {
        let ids: HashSet<String> = (0..10_000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }
}

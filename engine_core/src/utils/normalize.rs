/// Normalize a display name:
/// - all Unicode whitespace becomes a single ASCII space
/// - leading/trailing whitespace is trimmed
///
/// Tournament and team names pass through this on create/update so that
/// two entries differing only in spacing compare equal.
pub fn normalize_name(input: impl Into<String>) -> String {
    input.into().split_whitespace().collect::<Vec<_>>().join(" ")
}

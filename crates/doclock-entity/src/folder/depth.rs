//! Pure depth model for folder nesting.
//!
//! The same check gates both folder creation and the client's "create
//! folder" affordance, so it lives here as a side-effect-free function.

/// Whether a child folder may be created under a parent at `parent_depth`.
///
/// The child would sit at `parent_depth + 1`, which must stay strictly
/// below `max_depth`. At `parent_depth == max_depth - 1` creation is
/// rejected; the limit binds at the boundary, not after it.
pub fn can_create_child_folder(parent_depth: i64, max_depth: i64) -> bool {
    parent_depth + 1 < max_depth
}

/// Whether a root folder (depth 0) may be created at all.
pub fn can_create_root_folder(max_depth: i64) -> bool {
    max_depth > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_at_boundary() {
        // Parent at the last allowed level: child would hit the limit.
        assert!(!can_create_child_folder(2, 3));
        assert!(!can_create_child_folder(1, 2));
    }

    #[test]
    fn test_allows_below_boundary() {
        assert!(can_create_child_folder(1, 3));
        assert!(can_create_child_folder(0, 2));
    }

    #[test]
    fn test_root_creation() {
        assert!(can_create_root_folder(1));
        assert!(can_create_root_folder(3));
        assert!(!can_create_root_folder(0));
    }
}

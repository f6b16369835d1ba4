//! Topic naming for the change feed.
//!
//! Topics are scoped per owner and per container so that a listener on
//! one folder never sees churn from a sibling. `None` for the container
//! means the owner's root level.

use uuid::Uuid;

/// Topic carrying folder events under a given parent.
pub fn folders(owner_id: Uuid, parent_id: Option<Uuid>) -> String {
    match parent_id {
        Some(parent) => format!("folders:{owner_id}:{parent}"),
        None => format!("folders:{owner_id}:root"),
    }
}

/// Topic carrying document events inside a given folder.
pub fn documents(owner_id: Uuid, folder_id: Option<Uuid>) -> String {
    match folder_id {
        Some(folder) => format!("documents:{owner_id}:{folder}"),
        None => format!("documents:{owner_id}:root"),
    }
}

/// Topic carrying share events for a grantee (feeds the Shared listing).
pub fn shared_with(grantee_id: Uuid) -> String {
    format!("shared:{grantee_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_and_child_scopes_differ() {
        let owner = Uuid::new_v4();
        let parent = Uuid::new_v4();
        assert_ne!(folders(owner, None), folders(owner, Some(parent)));
    }

    #[test]
    fn owners_do_not_share_topics() {
        let folder = Uuid::new_v4();
        let a = documents(Uuid::new_v4(), Some(folder));
        let b = documents(Uuid::new_v4(), Some(folder));
        assert_ne!(a, b);
    }

    #[test]
    fn folder_and_document_namespaces_are_disjoint() {
        let owner = Uuid::new_v4();
        assert_ne!(folders(owner, None), documents(owner, None));
    }
}

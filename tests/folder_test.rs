//! Folder hierarchy: depth limits, sibling names, item counts, and
//! cascading deletion.

mod helpers;

use doclock_core::config::LimitsConfig;
use doclock_core::error::ErrorKind;
use doclock_service::folder::CreateFolderRequest;
use helpers::{TestApp, pdf_bytes};
use uuid::Uuid;

fn folder(name: &str, parent_id: Option<Uuid>) -> CreateFolderRequest {
    CreateFolderRequest {
        name: name.to_string(),
        parent_id,
        icon: None,
    }
}

#[tokio::test]
async fn nesting_is_rejected_at_the_depth_limit() {
    let app = TestApp::spawn().await; // max_folder_depth = 3
    let ctx = app.register("Asha", "9876543210").await;

    let root = app.folders.create_folder(&ctx, folder("Taxes", None)).await.unwrap();
    assert_eq!(root.depth, 0);

    let child = app
        .folders
        .create_folder(&ctx, folder("2025", Some(root.id)))
        .await
        .unwrap();
    assert_eq!(child.depth, 1);

    let grandchild = app
        .folders
        .create_folder(&ctx, folder("Receipts", Some(child.id)))
        .await
        .unwrap();
    assert_eq!(grandchild.depth, 2);

    // Depth 2 is the last level; children there would reach the limit.
    let err = app
        .folders
        .create_folder(&ctx, folder("Too deep", Some(grandchild.id)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DepthLimit);
}

#[tokio::test]
async fn depth_limit_follows_configuration() {
    let app = TestApp::spawn_with_limits(LimitsConfig {
        max_folder_depth: 1,
        ..LimitsConfig::default()
    })
    .await;
    let ctx = app.register("Asha", "9876543210").await;

    let root = app.folders.create_folder(&ctx, folder("Only level", None)).await.unwrap();
    let err = app
        .folders
        .create_folder(&ctx, folder("Child", Some(root.id)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DepthLimit);
}

#[tokio::test]
async fn duplicate_sibling_names_conflict_but_cousins_do_not() {
    let app = TestApp::spawn().await;
    let ctx = app.register("Asha", "9876543210").await;

    let a = app.folders.create_folder(&ctx, folder("A", None)).await.unwrap();
    let b = app.folders.create_folder(&ctx, folder("B", None)).await.unwrap();

    app.folders
        .create_folder(&ctx, folder("Shared name", Some(a.id)))
        .await
        .unwrap();

    // Same name under a different parent is fine.
    app.folders
        .create_folder(&ctx, folder("Shared name", Some(b.id)))
        .await
        .unwrap();

    let err = app
        .folders
        .create_folder(&ctx, folder("Shared name", Some(a.id)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn folder_names_are_validated() {
    let app = TestApp::spawn().await;
    let ctx = app.register("Asha", "9876543210").await;

    for bad in ["", "   ", "a/b", &"x".repeat(31)] {
        let err = app
            .folders
            .create_folder(&ctx, folder(bad, None))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation, "name: {bad:?}");
    }
}

#[tokio::test]
async fn rename_to_current_name_is_rejected_without_side_effects() {
    let app = TestApp::spawn().await;
    let ctx = app.register("Asha", "9876543210").await;

    let created = app.folders.create_folder(&ctx, folder("Taxes", None)).await.unwrap();

    let err = app
        .folders
        .rename_folder(&ctx, created.id, "Taxes")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let renamed = app
        .folders
        .rename_folder(&ctx, created.id, "Taxes 2025")
        .await
        .unwrap();
    assert_eq!(renamed.name, "Taxes 2025");
}

#[tokio::test]
async fn item_count_tracks_children_and_documents() {
    let app = TestApp::spawn().await;
    let ctx = app.register("Asha", "9876543210").await;

    let root = app.folders.create_folder(&ctx, folder("Taxes", None)).await.unwrap();
    assert_eq!(root.item_count, 0);

    app.folders
        .create_folder(&ctx, folder("2025", Some(root.id)))
        .await
        .unwrap();
    app.documents
        .upload_document(
            &ctx,
            doclock_service::document::UploadRequest {
                folder_id: Some(root.id),
                file_name: "return.pdf".to_string(),
                data: pdf_bytes(256),
            },
        )
        .await
        .unwrap();

    let roots = app.folders.list_roots(&ctx).await.unwrap();
    assert_eq!(roots.folders[0].item_count, 2);
}

#[tokio::test]
async fn delete_removes_the_whole_subtree_and_its_documents() {
    let app = TestApp::spawn().await;
    let ctx = app.register("Asha", "9876543210").await;

    let root = app.folders.create_folder(&ctx, folder("Taxes", None)).await.unwrap();
    let child = app
        .folders
        .create_folder(&ctx, folder("2025", Some(root.id)))
        .await
        .unwrap();
    let document = app
        .documents
        .upload_document(
            &ctx,
            doclock_service::document::UploadRequest {
                folder_id: Some(child.id),
                file_name: "return.pdf".to_string(),
                data: pdf_bytes(256),
            },
        )
        .await
        .unwrap();

    app.folders.delete_folder(&ctx, root.id).await.unwrap();

    let roots = app.folders.list_roots(&ctx).await.unwrap();
    assert!(roots.folders.is_empty());

    let err = app.documents.download(&ctx, document.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    // The freed quota is available again.
    let err = app
        .folders
        .list_children(&ctx, child.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn folders_are_scoped_to_their_owner() {
    let app = TestApp::spawn().await;
    let asha = app.register("Asha", "9876543210").await;
    let ravi = app.register("Ravi", "9876500000").await;

    let folder_a = app.folders.create_folder(&asha, folder("Private", None)).await.unwrap();

    let err = app
        .folders
        .rename_folder(&ravi, folder_a.id, "Hijacked")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = app.folders.delete_folder(&ravi, folder_a.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

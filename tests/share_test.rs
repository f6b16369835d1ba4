//! Sharing: grants, the "Shared" pseudo-folder, revocation, and the
//! notification bridge.

mod helpers;

use doclock_core::error::ErrorKind;
use doclock_core::types::pagination::PageRequest;
use doclock_entity::folder::SHARED_FOLDER_NAME;
use doclock_service::document::UploadRequest;
use helpers::{TestApp, pdf_bytes};

async fn upload_named(app: &TestApp, ctx: &doclock_service::RequestContext, name: &str) -> uuid::Uuid {
    app.documents
        .upload_document(
            ctx,
            UploadRequest {
                folder_id: None,
                file_name: name.to_string(),
                data: pdf_bytes(64),
            },
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn shared_documents_appear_in_the_recipients_shared_view() {
    let app = TestApp::spawn().await;
    let asha = app.register("Asha", "9876543210").await;
    let ravi = app.register("Ravi", "9876500000").await;

    let document_id = upload_named(&app, &asha, "passport.pdf").await;
    app.shares
        .share_document(&asha, document_id, ravi.user_id)
        .await
        .unwrap();

    let shared = app.documents.list_shared_with_me(&ravi).await.unwrap();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].name, "passport.pdf");
    assert!(shared[0].is_shared);
    assert_eq!(shared[0].shared_by, asha.user_id);
    assert_eq!(shared[0].shared_by_name, "Asha");

    // The sharer's own view never gains the flag.
    let own = app.documents.list_documents(&asha, None).await.unwrap();
    assert_eq!(own.len(), 1);
}

#[tokio::test]
async fn pseudo_folder_appears_only_with_inbound_shares() {
    let app = TestApp::spawn().await;
    let asha = app.register("Asha", "9876543210").await;
    let ravi = app.register("Ravi", "9876500000").await;

    assert!(app.folders.list_roots(&ravi).await.unwrap().shared.is_none());

    let first = upload_named(&app, &asha, "a.pdf").await;
    let second = upload_named(&app, &asha, "b.pdf").await;
    app.shares.share_document(&asha, first, ravi.user_id).await.unwrap();
    app.shares.share_document(&asha, second, ravi.user_id).await.unwrap();

    let roots = app.folders.list_roots(&ravi).await.unwrap();
    let shared = roots.shared.expect("pseudo-folder present");
    assert_eq!(shared.name, SHARED_FOLDER_NAME);
    assert_eq!(shared.item_count, 2);

    // The sharer has no inbound shares and no pseudo-folder.
    assert!(app.folders.list_roots(&asha).await.unwrap().shared.is_none());
}

#[tokio::test]
async fn duplicate_grants_conflict() {
    let app = TestApp::spawn().await;
    let asha = app.register("Asha", "9876543210").await;
    let ravi = app.register("Ravi", "9876500000").await;

    let document_id = upload_named(&app, &asha, "a.pdf").await;
    app.shares
        .share_document(&asha, document_id, ravi.user_id)
        .await
        .unwrap();

    let err = app
        .shares
        .share_document(&asha, document_id, ravi.user_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn sharing_rules_are_enforced() {
    let app = TestApp::spawn().await;
    let asha = app.register("Asha", "9876543210").await;
    let ravi = app.register("Ravi", "9876500000").await;

    let document_id = upload_named(&app, &asha, "a.pdf").await;

    // Self-share is rejected.
    let err = app
        .shares
        .share_document(&asha, document_id, asha.user_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    // Unknown grantee is rejected.
    let err = app
        .shares
        .share_document(&asha, document_id, uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    // Only the owner can share.
    let err = app
        .shares
        .share_document(&ravi, document_id, ravi.user_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn revocation_empties_the_shared_view() {
    let app = TestApp::spawn().await;
    let asha = app.register("Asha", "9876543210").await;
    let ravi = app.register("Ravi", "9876500000").await;

    let document_id = upload_named(&app, &asha, "a.pdf").await;
    app.shares
        .share_document(&asha, document_id, ravi.user_id)
        .await
        .unwrap();

    app.shares
        .revoke_share(&asha, document_id, ravi.user_id)
        .await
        .unwrap();

    assert!(app.documents.list_shared_with_me(&ravi).await.unwrap().is_empty());
    assert!(app.folders.list_roots(&ravi).await.unwrap().shared.is_none());

    let err = app.documents.download(&ravi, document_id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn sharing_notifies_the_grantee() {
    let app = TestApp::spawn().await;
    let asha = app.register("Asha", "9876543210").await;
    let ravi = app.register("Ravi", "9876500000").await;

    let document_id = upload_named(&app, &asha, "passport.pdf").await;
    app.shares
        .share_document(&asha, document_id, ravi.user_id)
        .await
        .unwrap();

    let page = app
        .notifications
        .list(&ravi, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].category, "security");
    assert!(page.items[0].message.contains("Asha"));
    assert!(page.items[0].message.contains("passport.pdf"));

    assert_eq!(app.notifications.unread_count(&ravi).await.unwrap(), 1);
    app.notifications
        .mark_read(&ravi, page.items[0].id)
        .await
        .unwrap();
    assert_eq!(app.notifications.unread_count(&ravi).await.unwrap(), 0);
}

#[tokio::test]
async fn cards_share_through_the_same_grants() {
    let app = TestApp::spawn().await;
    let asha = app.register("Asha", "9876543210").await;
    let ravi = app.register("Ravi", "9876500000").await;

    let card = app
        .cards
        .add_card(
            &asha,
            doclock_service::card::AddCardRequest {
                label: "Personal Visa".to_string(),
                holder_name: "Asha K".to_string(),
                number: "4111111111111111".to_string(),
                expiry_month: 12,
                expiry_year: 2028,
            },
        )
        .await
        .unwrap();

    let grant = app.shares.share_card(&asha, card.id, ravi.user_id).await.unwrap();
    assert_eq!(grant.item_kind, doclock_entity::share::ItemKind::Card);

    // Card grants never count toward the document pseudo-folder.
    assert!(app.folders.list_roots(&ravi).await.unwrap().shared.is_none());

    let grants = app.shares.list_grants_for_item(&asha, card.id).await.unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].grantee_id, ravi.user_id);
}

#[tokio::test]
async fn deleting_a_document_removes_its_grants() {
    let app = TestApp::spawn().await;
    let asha = app.register("Asha", "9876543210").await;
    let ravi = app.register("Ravi", "9876500000").await;

    let document_id = upload_named(&app, &asha, "a.pdf").await;
    app.shares
        .share_document(&asha, document_id, ravi.user_id)
        .await
        .unwrap();

    app.documents.delete_document(&asha, document_id).await.unwrap();

    assert!(app.documents.list_shared_with_me(&ravi).await.unwrap().is_empty());
    assert!(app.folders.list_roots(&ravi).await.unwrap().shared.is_none());
}

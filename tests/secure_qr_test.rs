//! Secure QR bundles: creation, ordered membership, diff-based updates,
//! token resolution, and deactivation on emptied membership.

mod helpers;

use chrono::{Duration, Utc};
use doclock_core::error::ErrorKind;
use doclock_service::document::UploadRequest;
use helpers::{TestApp, pdf_bytes};
use uuid::Uuid;

async fn upload_named(app: &TestApp, ctx: &doclock_service::RequestContext, name: &str) -> Uuid {
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
async fn create_and_resolve_preserves_member_order() {
    let app = TestApp::spawn().await;
    let ctx = app.register("Asha", "9876543210").await;

    let a = upload_named(&app, &ctx, "a.pdf").await;
    let b = upload_named(&app, &ctx, "b.pdf").await;
    let c = upload_named(&app, &ctx, "c.pdf").await;

    let qr = app
        .secure_qrs
        .create(&ctx, "Travel pack", &[c, a, b], None)
        .await
        .unwrap();
    assert!(qr.is_active);

    let bundle = app.secure_qrs.resolve(&qr.token).await.unwrap();
    let names: Vec<&str> = bundle.documents.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["c.pdf", "a.pdf", "b.pdf"]);
}

#[tokio::test]
async fn creation_validates_label_and_membership() {
    let app = TestApp::spawn().await;
    let asha = app.register("Asha", "9876543210").await;
    let ravi = app.register("Ravi", "9876500000").await;

    let owned = upload_named(&app, &asha, "a.pdf").await;
    let foreign = upload_named(&app, &ravi, "theirs.pdf").await;

    let err = app.secure_qrs.create(&asha, "   ", &[owned], None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = app.secure_qrs.create(&asha, "Empty", &[], None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    // Members must belong to the creator.
    let err = app
        .secure_qrs
        .create(&asha, "Mixed", &[owned, foreign], None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn update_reconciles_membership_by_diff() {
    let app = TestApp::spawn().await;
    let ctx = app.register("Asha", "9876543210").await;

    let a = upload_named(&app, &ctx, "a.pdf").await;
    let b = upload_named(&app, &ctx, "b.pdf").await;
    let c = upload_named(&app, &ctx, "c.pdf").await;

    let qr = app
        .secure_qrs
        .create(&ctx, "Pack", &[a, b], None)
        .await
        .unwrap();

    // Drop b, add c, reverse the order of the survivors.
    let updated = app
        .secure_qrs
        .update(&ctx, qr.id, "Pack v2", &[c, a], &[a, b])
        .await
        .unwrap();
    assert_eq!(updated.label, "Pack v2");

    let bundle = app.secure_qrs.resolve(&qr.token).await.unwrap();
    let names: Vec<&str> = bundle.documents.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["c.pdf", "a.pdf"]);
}

#[tokio::test]
async fn expired_and_deleted_tokens_resolve_to_not_found() {
    let app = TestApp::spawn().await;
    let ctx = app.register("Asha", "9876543210").await;

    let a = upload_named(&app, &ctx, "a.pdf").await;

    let expired = app
        .secure_qrs
        .create(&ctx, "Old", &[a], Some(Utc::now() - Duration::minutes(1)))
        .await
        .unwrap();
    let err = app.secure_qrs.resolve(&expired.token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let live = app.secure_qrs.create(&ctx, "Live", &[a], None).await.unwrap();
    app.secure_qrs.delete(&ctx, live.id).await.unwrap();
    let err = app.secure_qrs.resolve(&live.token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = app.secure_qrs.resolve("no-such-token").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn deleting_a_member_document_prunes_the_bundle() {
    let app = TestApp::spawn().await;
    let ctx = app.register("Asha", "9876543210").await;

    let a = upload_named(&app, &ctx, "a.pdf").await;
    let b = upload_named(&app, &ctx, "b.pdf").await;

    let qr = app.secure_qrs.create(&ctx, "Pack", &[a, b], None).await.unwrap();

    app.documents.delete_document(&ctx, a).await.unwrap();

    let bundle = app.secure_qrs.resolve(&qr.token).await.unwrap();
    assert_eq!(bundle.documents.len(), 1);
    assert_eq!(bundle.documents[0].name, "b.pdf");
}

#[tokio::test]
async fn emptied_bundles_are_deactivated() {
    let app = TestApp::spawn().await;
    let ctx = app.register("Asha", "9876543210").await;

    let a = upload_named(&app, &ctx, "a.pdf").await;
    let qr = app.secure_qrs.create(&ctx, "Pack", &[a], None).await.unwrap();

    app.documents.delete_document(&ctx, a).await.unwrap();

    let err = app.secure_qrs.resolve(&qr.token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let listed = app.secure_qrs.list(&ctx).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(!listed[0].is_active);
}

#[tokio::test]
async fn rendered_qr_decodes_back_to_the_scan_url() {
    let app = TestApp::spawn().await;
    let ctx = app.register("Asha", "9876543210").await;

    let a = upload_named(&app, &ctx, "a.pdf").await;
    let qr = app.secure_qrs.create(&ctx, "Pack", &[a], None).await.unwrap();

    let png = app.secure_qrs.render_qr_image(&ctx, qr.id).await.unwrap();
    let decoded = image::load_from_memory(&png).unwrap().into_luma8();
    let (w, h) = decoded.dimensions();
    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(w as usize, h as usize, |x, y| {
            decoded.get_pixel(x as u32, y as u32)[0]
        });

    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1);
    let (_, content) = grids[0].decode().unwrap();
    assert!(content.ends_with(&qr.token));
}

#[tokio::test]
async fn bundles_are_owner_scoped() {
    let app = TestApp::spawn().await;
    let asha = app.register("Asha", "9876543210").await;
    let ravi = app.register("Ravi", "9876500000").await;

    let a = upload_named(&app, &asha, "a.pdf").await;
    let qr = app.secure_qrs.create(&asha, "Pack", &[a], None).await.unwrap();

    let err = app.secure_qrs.delete(&ravi, qr.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = app
        .secure_qrs
        .render_qr_image(&ravi, qr.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

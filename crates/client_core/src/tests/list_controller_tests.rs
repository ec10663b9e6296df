use super::*;
use crate::test_support::{pen, product, ApiCall, FakeProductApi, Op};

#[tokio::test]
async fn load_replaces_collection_with_server_order() {
    let served = vec![
        product("7", "Stapler", 1.0, 45000.0),
        pen(),
        product("3", "Ink", 4.0, 1500.0),
    ];
    let api = FakeProductApi::with_products(served.clone());
    let mut list = ListController::default();
    assert_eq!(list.view(), ListView::Loading);

    list.load(&api).await.expect("load");

    assert_eq!(list.products(), served.as_slice());
    assert!(!list.is_loading());
    assert_eq!(list.error(), None);
    assert_eq!(list.view(), ListView::Table(served.as_slice()));
}

#[tokio::test]
async fn failed_first_load_shows_error_instead_of_table() {
    let api = FakeProductApi::default();
    api.fail(Op::List);
    let mut list = ListController::default();

    list.load(&api).await.expect_err("load fails");

    assert!(!list.is_loading());
    assert!(list.products().is_empty());
    assert_eq!(list.error(), Some(LOAD_FAILURE_MESSAGE));
    assert_eq!(list.view(), ListView::Failed("Failed to fetch products."));
}

#[tokio::test]
async fn failed_load_keeps_previous_collection_and_next_success_clears_error() {
    let api = FakeProductApi::with_products(vec![pen()]);
    let mut list = ListController::default();
    list.load(&api).await.expect("first load");

    api.fail(Op::List);
    list.load(&api).await.expect_err("second load fails");
    assert_eq!(list.products(), [pen()].as_slice());
    assert!(matches!(list.view(), ListView::Failed(_)));

    api.recover(Op::List);
    list.load(&api).await.expect("third load");
    assert_eq!(list.error(), None);
    assert_eq!(list.view(), ListView::Table([pen()].as_slice()));
}

#[test]
fn loading_takes_precedence_over_error() {
    let mut list = ListController::default();
    list.finish_load(Err(ApiRequestError::Status {
        method: reqwest::Method::GET,
        url: "http://fake".into(),
        status: 503,
    }))
    .expect_err("failure");
    list.begin_load();
    assert_eq!(list.view(), ListView::Loading);
}

#[tokio::test]
async fn notify_and_reload_refetches_and_raises_notice_on_success() {
    let api = FakeProductApi::with_products(vec![pen()]);
    let mut list = ListController::default();
    list.load(&api).await.expect("load");

    list.notify_and_reload(&api, Notification::success("Successfully deleted product!"))
        .await
        .expect("reload");

    assert_eq!(api.calls(), vec![ApiCall::List, ApiCall::List]);
    assert_eq!(
        list.notification(),
        Some(&Notification {
            message: "Successfully deleted product!".into(),
            severity: Severity::Success,
        })
    );
}

#[tokio::test]
async fn failed_reload_raises_an_error_notification_instead_of_success() {
    let api = FakeProductApi::with_products(vec![pen()]);
    let mut list = ListController::default();
    list.load(&api).await.expect("load");

    api.fail(Op::List);
    list.notify_and_reload(&api, Notification::success(MutationKind::Updated.success_message()))
        .await
        .expect_err("reload fails");

    let notification = list.notification().expect("notification");
    assert_eq!(notification.severity, Severity::Error);
    assert!(notification.message.starts_with("Successfully edited product!"));
    assert!(list.products().is_empty());
    assert_eq!(list.error(), Some(LOAD_FAILURE_MESSAGE));
}

#[test]
fn dismiss_is_idempotent() {
    let mut list = ListController::default();
    list.finish_reload(Notification::success("done"), Ok(Vec::new()))
        .expect("reload");
    assert!(list.notification().is_some());

    list.dismiss_notification();
    assert_eq!(list.notification(), None);
    list.dismiss_notification();
    assert_eq!(list.notification(), None);
}

#[test]
fn notification_expires_after_timeout() {
    let mut list = ListController::new(Duration::from_millis(50));
    list.finish_reload(Notification::success("done"), Ok(Vec::new()))
        .expect("reload");

    let now = Instant::now();
    assert!(!list.expire_notification(now));
    assert!(list.notification_remaining(now).is_some());

    assert!(list.expire_notification(now + Duration::from_millis(60)));
    assert_eq!(list.notification(), None);
    assert_eq!(list.notification_remaining(now), None);
}

#[test]
fn mutation_messages() {
    assert_eq!(
        MutationKind::Created.success_message(),
        "Successfully added product!"
    );
    assert_eq!(
        MutationKind::Updated.success_message(),
        "Successfully edited product!"
    );
    assert_eq!(
        MutationKind::Deleted.success_message(),
        "Successfully deleted product!"
    );
}

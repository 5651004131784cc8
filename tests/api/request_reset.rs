use crate::helpers::{
    get_json_response_body, get_random_email, last_reset_token_for,
    register_verified, TestApp,
};
use docvault_auth::domain::Email;
use secrecy::Secret;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_if_invalid_email(app: &mut TestApp) {
    let response = app
        .post_request_reset(&serde_json::json!({
            "email": "not-an-email"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
}

#[test_context(TestApp)]
#[tokio::test]
async fn known_and_unknown_emails_get_identical_responses(
    app: &mut TestApp,
) {
    let known = register_verified(app, "secret1").await;
    let unknown = get_random_email();

    let known_response = app
        .post_request_reset(&serde_json::json!({ "email": known }))
        .await;
    let unknown_response = app
        .post_request_reset(&serde_json::json!({ "email": unknown }))
        .await;

    assert_eq!(known_response.status().as_u16(), 200);
    assert_eq!(unknown_response.status().as_u16(), 200);

    let known_body = get_json_response_body(known_response).await;
    let unknown_body = get_json_response_body(unknown_response).await;
    assert_eq!(
        known_body, unknown_body,
        "Reset requests must not reveal whether the email exists"
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn known_email_receives_a_token_stored_only_as_a_digest(
    app: &mut TestApp,
) {
    let email = register_verified(app, "secret1").await;

    let response = app
        .post_request_reset(&serde_json::json!({ "email": email }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let token = last_reset_token_for(app, &email).await;
    assert_eq!(token.len(), 64);

    let parsed = Email::parse(Secret::new(email.clone())).unwrap();
    let user =
        app.user_store.read().await.get_user(&parsed).await.unwrap();
    let pending = user.reset.as_ref().expect("No pending reset stored");
    assert_ne!(pending.digest(), token, "Token must not be stored in plain");
    assert!(pending.matches(&Secret::new(token)));

    use docvault_auth::domain::AuditAction;
    assert!(app
        .audit_sink
        .actions()
        .await
        .contains(&AuditAction::PasswordResetRequested));
}

#[test_context(TestApp)]
#[tokio::test]
async fn unknown_email_sends_no_mail(app: &mut TestApp) {
    let response = app
        .post_request_reset(&serde_json::json!({
            "email": get_random_email()
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    assert!(app.email_client.sent_emails().await.is_empty());
}

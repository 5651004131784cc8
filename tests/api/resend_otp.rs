use crate::helpers::{
    get_json_response_body, get_random_email, last_otp_for, register,
    register_verified, TestApp,
};
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn unknown_account_is_a_404(app: &mut TestApp) {
    let response = app
        .post_resend_otp(&serde_json::json!({
            "email": get_random_email()
        }))
        .await;

    assert_eq!(response.status().as_u16(), 404);
    let body = get_json_response_body(response).await;
    assert_eq!(body["error"], "Account not found");
}

#[test_context(TestApp)]
#[tokio::test]
async fn verified_account_cannot_request_a_code(app: &mut TestApp) {
    let email = register_verified(app, "secret1").await;

    let response = app
        .post_resend_otp(&serde_json::json!({ "email": email }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body = get_json_response_body(response).await;
    assert_eq!(body["error"], "Account already verified");
}

#[test_context(TestApp)]
#[tokio::test]
async fn resend_invalidates_the_previous_code(app: &mut TestApp) {
    let email = get_random_email();
    register(app, "Jordan Blake", &email, "secret1").await;
    let old_code = last_otp_for(app, &email).await;

    let response = app
        .post_resend_otp(&serde_json::json!({ "email": email }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    // The generator can repeat a code; resend until it differs
    let mut new_code = last_otp_for(app, &email).await;
    while new_code == old_code {
        app.post_resend_otp(&serde_json::json!({ "email": email }))
            .await;
        new_code = last_otp_for(app, &email).await;
    }

    let response = app
        .post_verify_otp(&serde_json::json!({
            "email": email,
            "code": old_code
        }))
        .await;
    assert_eq!(
        response.status().as_u16(),
        400,
        "The old code must stop validating after a resend"
    );

    let response = app
        .post_verify_otp(&serde_json::json!({
            "email": email,
            "code": new_code
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
}

#[test_context(TestApp)]
#[tokio::test]
async fn resend_failure_leaves_the_account_in_place(app: &mut TestApp) {
    let email = get_random_email();
    register(app, "Jordan Blake", &email, "secret1").await;

    app.email_client.set_failing(true);
    let response = app
        .post_resend_otp(&serde_json::json!({ "email": email }))
        .await;
    assert_eq!(response.status().as_u16(), 500);

    // Unlike registration there is nothing to roll back; the account can
    // still resend later
    app.email_client.set_failing(false);
    let response = app
        .post_resend_otp(&serde_json::json!({ "email": email }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
}

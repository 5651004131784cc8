use crate::helpers::{
    expire_pending_verification, get_json_response_body, get_random_email,
    last_otp_for, register, TestApp,
};
use docvault_auth::{domain::Email, routes::VerifyOtpResponse};
use secrecy::Secret;
use test_context::test_context;

async fn is_verified(app: &TestApp, email: &str) -> bool {
    let parsed = Email::parse(Secret::new(email.to_owned())).unwrap();
    app.user_store
        .read()
        .await
        .get_user(&parsed)
        .await
        .expect("User not found")
        .is_verified
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_422_if_malformed_input(app: &mut TestApp) {
    let test_cases = [
        serde_json::json!({ "email": get_random_email() }),
        serde_json::json!({ "code": "123456" }),
    ];

    for test_case in test_cases.iter() {
        let response = app.post_verify_otp(test_case).await;
        assert_eq!(
            response.status().as_u16(),
            422,
            "Failed for input: {:?}",
            test_case
        );
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_if_code_is_not_six_digits(app: &mut TestApp) {
    let email = get_random_email();
    register(app, "Jordan Blake", &email, "secret1").await;

    for bad_code in ["12345", "1234567", "12345a", ""] {
        let response = app
            .post_verify_otp(&serde_json::json!({
                "email": email,
                "code": bad_code
            }))
            .await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "Failed for code: {bad_code}"
        );
    }
    assert!(!is_verified(app, &email).await);
}

#[test_context(TestApp)]
#[tokio::test]
async fn unknown_email_gets_the_generic_code_error(app: &mut TestApp) {
    let response = app
        .post_verify_otp(&serde_json::json!({
            "email": get_random_email(),
            "code": "123456"
        }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body = get_json_response_body(response).await;
    assert_eq!(body["error"], "Code invalid or expired");
}

#[test_context(TestApp)]
#[tokio::test]
async fn correct_code_verifies_exactly_once_then_idempotently(
    app: &mut TestApp,
) {
    let email = get_random_email();
    register(app, "Jordan Blake", &email, "secret1").await;
    let code = last_otp_for(app, &email).await;

    let response = app
        .post_verify_otp(&serde_json::json!({
            "email": email,
            "code": code
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body = response
        .json::<VerifyOtpResponse>()
        .await
        .expect("Could not deserialise response body to VerifyOtpResponse");
    assert_eq!(body.token.split('.').count(), 3, "Expected a JWT");
    assert!(body.user.is_verified);
    assert!(is_verified(app, &email).await);

    // Pending fields are cleared on success
    let parsed = Email::parse(Secret::new(email.clone())).unwrap();
    let user =
        app.user_store.read().await.get_user(&parsed).await.unwrap();
    assert!(user.verification.is_none());

    // Submitting again, even with the spent code, succeeds idempotently and
    // re-issues a session
    let response = app
        .post_verify_otp(&serde_json::json!({
            "email": email,
            "code": code
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let body = response.json::<VerifyOtpResponse>().await.unwrap();
    assert_eq!(body.token.split('.').count(), 3);
}

#[test_context(TestApp)]
#[tokio::test]
async fn wrong_code_is_rejected_and_leaves_account_unverified(
    app: &mut TestApp,
) {
    let email = get_random_email();
    register(app, "Jordan Blake", &email, "secret1").await;
    let code = last_otp_for(app, &email).await;

    let wrong = if code == "123456" { "654321" } else { "123456" };
    let response = app
        .post_verify_otp(&serde_json::json!({
            "email": email,
            "code": wrong
        }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body = get_json_response_body(response).await;
    assert_eq!(body["error"], "Code invalid or expired");
    assert!(!is_verified(app, &email).await);
}

#[test_context(TestApp)]
#[tokio::test]
async fn expired_code_is_rejected_and_leaves_account_unverified(
    app: &mut TestApp,
) {
    let email = get_random_email();
    register(app, "Jordan Blake", &email, "secret1").await;
    let code = last_otp_for(app, &email).await;

    expire_pending_verification(app, &email).await;

    let response = app
        .post_verify_otp(&serde_json::json!({
            "email": email,
            "code": code
        }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body = get_json_response_body(response).await;
    assert_eq!(
        body["error"], "Code invalid or expired",
        "Expiry must be indistinguishable from a bad code"
    );
    assert!(!is_verified(app, &email).await);
}

use crate::helpers::{
    extract_otp, get_json_response_body, get_random_email, register, TestApp,
};
use docvault_auth::{
    domain::{Email, Role},
    routes::RegisterResponse,
    ErrorResponse,
};
use secrecy::{ExposeSecret, Secret};
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_422_if_malformed_input(app: &mut TestApp) {
    let random_email = get_random_email();

    let test_cases = [
        serde_json::json!({
            "email": random_email,
            "password": "secret1"
        }),
        serde_json::json!({
            "name": "Jordan Blake",
            "password": "secret1"
        }),
        serde_json::json!({
            "name": "Jordan Blake",
            "email": random_email
        }),
    ];

    for test_case in test_cases.iter() {
        let response = app.post_register(test_case).await;
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
async fn should_return_400_if_invalid_input(app: &mut TestApp) {
    let test_cases = [
        serde_json::json!({
            "name": "",
            "email": get_random_email(),
            "password": "secret1"
        }),
        serde_json::json!({
            "name": "Jordan Blake",
            "email": "not-an-email",
            "password": "secret1"
        }),
        serde_json::json!({
            "name": "Jordan Blake",
            "email": get_random_email(),
            "password": "short"
        }),
        serde_json::json!({
            "name": "x".repeat(81),
            "email": get_random_email(),
            "password": "secret1"
        }),
    ];

    for test_case in test_cases.iter() {
        let response = app.post_register(&test_case).await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "Should fail with HTTP400 for input: {}",
            test_case
        );
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_create_pending_account_and_deliver_hashed_code(
    app: &mut TestApp,
) {
    let email = get_random_email();

    let response = app
        .post_register(&serde_json::json!({
            "name": "Jordan Blake",
            "email": email,
            "password": "secret1"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 201);

    let body = response
        .json::<RegisterResponse>()
        .await
        .expect("Could not deserialise response body to RegisterResponse");
    assert_eq!(
        body.message,
        "Account created. Check your email for a verification code."
    );

    // The plaintext code went out by mail...
    let message = app
        .email_client
        .last_email_to(&email)
        .await
        .expect("No verification email delivered");
    let code = extract_otp(&message);

    // ...while the record holds only a digest, and no plaintext password
    let parsed = Email::parse(Secret::new(email.clone())).unwrap();
    let user = app
        .user_store
        .read()
        .await
        .get_user(&parsed)
        .await
        .expect("User was not stored");

    assert!(!user.is_verified);
    let pending = user.verification.as_ref().expect("No pending code stored");
    assert_ne!(pending.digest(), code, "Code must not be stored in plain");
    assert!(pending.matches(&Secret::new(code)));

    let stored_hash = user.password_hash.as_ref().expose_secret();
    assert_ne!(stored_hash, "secret1");
    assert!(stored_hash.starts_with("$argon2id$"));

    use docvault_auth::domain::AuditAction;
    assert!(app
        .audit_sink
        .actions()
        .await
        .contains(&AuditAction::UserRegistered));
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_409_if_email_exists(app: &mut TestApp) {
    let email = get_random_email();
    register(app, "Jordan Blake", &email, "secret1").await;

    let response = app
        .post_register(&serde_json::json!({
            "name": "Someone Else",
            "email": email,
            "password": "another1"
        }))
        .await;

    assert_eq!(response.status().as_u16(), 409);
    assert_eq!(
        response
            .json::<ErrorResponse>()
            .await
            .expect("Could not deserialise response body to ErrorResponse")
            .error,
        "Email already in use".to_owned()
    );

    // The original record is untouched
    let parsed = Email::parse(Secret::new(email)).unwrap();
    let user = app.user_store.read().await.get_user(&parsed).await.unwrap();
    assert_eq!(user.name, "Jordan Blake");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_coerce_unknown_roles_to_user(app: &mut TestApp) {
    let admin_email = get_random_email();
    let other_email = get_random_email();

    app.post_register(&serde_json::json!({
        "name": "Admin",
        "email": admin_email,
        "password": "secret1",
        "role": "admin"
    }))
    .await;
    app.post_register(&serde_json::json!({
        "name": "Sneaky",
        "email": other_email,
        "password": "secret1",
        "role": "superuser"
    }))
    .await;

    let store = app.user_store.read().await;
    let admin = store
        .get_user(&Email::parse(Secret::new(admin_email)).unwrap())
        .await
        .unwrap();
    let other = store
        .get_user(&Email::parse(Secret::new(other_email)).unwrap())
        .await
        .unwrap();

    assert_eq!(admin.role, Role::Admin);
    assert_eq!(other.role, Role::User);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_roll_back_account_if_code_delivery_fails(app: &mut TestApp) {
    let email = get_random_email();
    app.email_client.set_failing(true);

    let response = app
        .post_register(&serde_json::json!({
            "name": "Jordan Blake",
            "email": email,
            "password": "secret1"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 500);
    let body = get_json_response_body(response).await;
    assert_eq!(body["error"], "Service temporarily unavailable");

    // The account must not linger half-created: logging in finds nothing...
    app.email_client.set_failing(false);
    let response = app
        .post_login(&serde_json::json!({
            "email": email,
            "password": "secret1"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 401);

    // ...and the address is free to register again
    let response = app
        .post_register(&serde_json::json!({
            "name": "Jordan Blake",
            "email": email,
            "password": "secret1"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 201);
}

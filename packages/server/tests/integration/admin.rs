use serde_json::json;

use crate::common::{PASSWORD, TestApp, Upload, routes};

mod login {
    use super::*;

    #[tokio::test]
    async fn correct_password_starts_session() {
        let app = TestApp::spawn().await;

        let res = app.post_json(routes::LOGIN, &json!({ "password": PASSWORD })).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["token"].as_str().is_some());
        assert!(res.body["expires_at"].as_str().is_some());

        let cookie = res.headers["set-cookie"].to_str().unwrap();
        assert!(cookie.starts_with("papers_session="));
        assert!(cookie.contains("HttpOnly"));

        let session = app.get(routes::SESSION).await;
        assert_eq!(session.body["is_admin"], true);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.post_json(routes::LOGIN, &json!({ "password": "guess" })).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.code(), "INVALID_CREDENTIALS");
        assert!(res.headers.get("set-cookie").is_none());

        let session = app.get(routes::SESSION).await;
        assert_eq!(session.body["is_admin"], false);
    }

    #[tokio::test]
    async fn surrounding_whitespace_is_ignored() {
        let app = TestApp::spawn().await;

        let padded = format!("  {PASSWORD}\n");
        let res = app.post_json(routes::LOGIN, &json!({ "password": padded })).await;
        assert_eq!(res.status, 200, "{}", res.text);

        let session = app.get(routes::SESSION).await;
        assert_eq!(session.body["is_admin"], true);
    }

    #[tokio::test]
    async fn inner_whitespace_still_counts() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::LOGIN, &json!({ "password": "test upload-password" }))
            .await;
        assert_eq!(res.status, 401);
        assert_eq!(res.code(), "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.post_json(routes::LOGIN, &json!({ "password": "" })).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");

        let res = app.post_json(routes::LOGIN, &json!({ "password": "   " })).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");

        let res = app.post_json(routes::LOGIN, &json!({ "pass": PASSWORD })).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
    }
}

mod session {
    use super::*;

    #[tokio::test]
    async fn visitors_are_not_admins() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::SESSION).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["is_admin"], false);

        let res = app.get_with_token(routes::SESSION, "garbage").await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["is_admin"], false);
    }

    #[tokio::test]
    async fn bearer_token_is_accepted() {
        let app = TestApp::spawn().await;
        let token = app.login().await;
        app.post_empty(routes::LOGOUT).await;

        let res = app.get_with_token(routes::SESSION, &token).await;
        assert_eq!(res.body["is_admin"], true);
    }

    #[tokio::test]
    async fn logout_clears_cookie() {
        let app = TestApp::spawn().await;
        app.login().await;

        let res = app.post_empty(routes::LOGOUT).await;
        assert_eq!(res.status, 204);

        let session = app.get(routes::SESSION).await;
        assert_eq!(session.body["is_admin"], false);

        let upload = app
            .upload_with_cookie(&Upload::new("Physics", "Mid", "2024"), &[("a.pdf", b"A")])
            .await;
        assert_eq!(upload.status, 401);
    }
}

mod reconcile {
    use super::*;

    #[tokio::test]
    async fn requires_admin_session() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::RECONCILE).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.code(), "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn reports_drift() {
        let app = TestApp::spawn().await;
        let token = app.login().await;
        let meta = Upload::new("Physics", "Mid", "2024");
        app.upload_one(&token, &meta, "a.pdf").await;
        app.upload_one(&token, &meta, "b.pdf").await;

        let res = app.get_with_token(routes::RECONCILE, &token).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["missing_files"], json!([]));
        assert_eq!(res.body["orphaned_files"], json!([]));

        let root = app.upload_root();
        std::fs::remove_file(root.join("1/1/Physics/Mid/a.pdf")).unwrap();
        std::fs::write(root.join("1/1/Physics/Mid/stray.pdf"), b"S").unwrap();

        let res = app.get_with_token(routes::RECONCILE, &token).await;
        assert_eq!(res.body["missing_files"], json!([1]));
        assert_eq!(res.body["orphaned_files"], json!(["1/1/Physics/Mid/stray.pdf"]));

        // Read-only: nothing was repaired.
        assert_eq!(app.catalog.len().await, 2);
    }
}

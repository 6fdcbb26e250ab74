use serde_json::json;

use crate::common::{TestApp, Upload, routes};

#[tokio::test]
async fn lists_years_with_semesters() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::YEARS).await;
    assert_eq!(res.status, 200);
    assert_eq!(
        res.body["years"],
        json!([
            { "year": 1, "semesters": [1, 2] },
            { "year": 2, "semesters": [3, 4] },
            { "year": 3, "semesters": [5, 6] },
            { "year": 4, "semesters": [7, 8] },
        ])
    );
}

#[tokio::test]
async fn semesters_of_a_year() {
    let app = TestApp::spawn().await;

    let res = app.get(&routes::semesters("3")).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["semesters"], json!([5, 6]));

    for bad in ["0", "5", "abc"] {
        let res = app.get(&routes::semesters(bad)).await;
        assert_eq!(res.status, 404, "year {bad}");
        assert_eq!(res.code(), "NOT_FOUND");
    }
}

#[tokio::test]
async fn subjects_are_sorted_and_distinct() {
    let app = TestApp::spawn().await;
    let token = app.login().await;
    for (subject, name) in [("Physics", "a.pdf"), ("Chemistry", "b.pdf"), ("Physics", "c.pdf")] {
        app.upload_one(&token, &Upload::new(subject, "Mid", "2024"), name)
            .await;
    }
    app.upload_one(
        &token,
        &Upload::new("Biology", "Mid", "2024").term("1", "2"),
        "d.pdf",
    )
    .await;

    let res = app.get(&routes::subjects("1", "1")).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["subjects"], json!(["Chemistry", "Physics"]));

    let res = app.get(&routes::subjects("2", "3")).await;
    assert_eq!(res.body["subjects"], json!([]));
}

#[tokio::test]
async fn semester_must_belong_to_year() {
    let app = TestApp::spawn().await;

    let res = app.get(&routes::subjects("1", "3")).await;
    assert_eq!(res.status, 404);

    let res = app.get(&routes::subjects("9", "1")).await;
    assert_eq!(res.status, 404);
}

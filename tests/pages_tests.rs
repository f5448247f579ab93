mod common;

use common::{get_async, start_with, FixedNotifier};

#[tokio::test]
async fn static_pages_render() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (base_url, _state, shutdown_tx) =
        start_with(&tmp.path().join("site.db"), FixedNotifier::new(false)).await;

    for (path, title) in [
        ("/", "Home"),
        ("/about", "About Us"),
        ("/services", "Services"),
        ("/members", "Our Team"),
        ("/contactus", "Contact Us"),
        ("/education", "Education"),
    ] {
        let reply = get_async(format!("{base_url}{path}")).await;
        assert_eq!(reply.status, 200, "{path}");
        assert_eq!(reply.content_type, "text/html", "{path}");
        assert!(reply.body.contains(&format!("<title>{title} |")), "{path}");
    }

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn unknown_paths_are_404() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (base_url, _state, shutdown_tx) =
        start_with(&tmp.path().join("site.db"), FixedNotifier::new(false)).await;

    let reply = get_async(format!("{base_url}/no-such-page")).await;
    assert_eq!(reply.status, 404);
    assert!(reply.body.contains("Page Not Found"));

    let reply = get_async(format!("{base_url}/static/js/missing.js")).await;
    assert_eq!(reply.status, 404);

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn embedded_assets_are_served() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (base_url, _state, shutdown_tx) =
        start_with(&tmp.path().join("site.db"), FixedNotifier::new(false)).await;

    let reply = get_async(format!("{base_url}/static/js/script.js")).await;
    assert_eq!(reply.status, 200);
    assert!(reply.content_type.contains("javascript"));
    assert!(reply.body.contains("first_name"));

    let reply = get_async(format!("{base_url}/static/css/styles.css")).await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.content_type, "text/css");

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn health_reports_schema_and_notifications() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (base_url, _state, shutdown_tx) =
        start_with(&tmp.path().join("site.db"), FixedNotifier::new(false)).await;

    let reply = get_async(format!("{base_url}/health")).await;
    assert_eq!(reply.status, 200);
    let body: serde_json::Value = serde_json::from_str(&reply.body).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["schema_ready"], true);
    assert_eq!(body["schema_version"], 2);
    assert_eq!(body["notifications"], false);

    let _ = shutdown_tx.send(());
}

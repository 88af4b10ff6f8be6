//! End-to-end tests against a live listener.

use approuter::config::AppConfig;
use approuter::lifecycle::startup;
use approuter::AppError;
use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn test_configured_router_over_http() {
    let static_dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(static_dir.path().join("static")).unwrap();
    std::fs::write(static_dir.path().join("static/app.js"), "console.log(1);").unwrap();

    let mut config = AppConfig::default();
    config.files.dir = Some(static_dir.path().to_string_lossy().into_owned());
    config.security.api_key = Some("s3cret".to_string());

    let router = startup::configure_router(&config)
        .get("/api/latest/:entry/:offset", |w, _req, ps| {
            write!(w, "{}@{}", ps.require("entry")?, ps.require("offset")?)?;
            Ok(())
        })
        .get("/api/explode", |_w, _req, _ps| -> Result<(), AppError> {
            panic!("bad handler")
        })
        .build();
    let (addr, shutdown) = common::start_server(router).await;

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    // Static files bypass the API hook.
    let res = client
        .get(format!("http://{}/static/app.js", addr))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), StatusCode::OK.as_u16());
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "console.log(1);");

    // API routes require the bearer token.
    let res = client
        .get(format!("http://{}/api/latest/thirdpen/0", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED.as_u16());

    let res = client
        .get(format!("http://{}/api/latest/thirdpen/0", addr))
        .bearer_auth("s3cret")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK.as_u16());
    assert_eq!(res.text().await.unwrap(), "thirdpen@0");

    // The startup panic handler turns a panic into a 500.
    let res = client
        .get(format!("http://{}/api/explode", addr))
        .bearer_auth("s3cret")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR.as_u16());
    assert_eq!(res.text().await.unwrap(), "internal server error");

    // Unknown method.
    let res = client
        .put(format!("http://{}/static/app.js", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST.as_u16());
    assert_eq!(res.text().await.unwrap(), "invalid method: PUT");

    shutdown.trigger();
}

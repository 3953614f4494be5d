use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct ChartView {
    kind: String,
    labels: Vec<String>,
    datasets: Vec<DatasetView>,
}

#[derive(Debug, Deserialize)]
struct DatasetView {
    label: String,
    data: Vec<u64>,
}

#[derive(Debug, Deserialize)]
struct DashboardView {
    code: String,
    total_clicks: u64,
    country_chart: ChartView,
    referrer_chart: ChartView,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

/// Stand-in analytics backend, kept on its own thread so it outlives each test runtime.
static BACKEND_URL: Lazy<String> = Lazy::new(|| {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind backend port");
    listener.set_nonblocking(true).expect("nonblocking backend");
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("backend runtime");
        runtime.block_on(async move {
            let app = Router::new().route("/analytics/:code", get(analytics));
            let listener = tokio::net::TcpListener::from_std(listener).expect("backend listener");
            axum::serve(listener, app).await.expect("backend serve");
        });
    });

    format!("http://{addr}")
});

async fn analytics(Path(code): Path<String>) -> Result<Json<serde_json::Value>, StatusCode> {
    match code.as_str() {
        "abc123" => Ok(Json(json!({
            "short_code": "abc123",
            "total_clicks": 42,
            "by_country": [{"country": "US", "clicks": 10}, {"country": "FR", "clicks": 5}],
            "by_referrer": [{"referrer": "google", "clicks": 8}],
            "by_user_agent": [{"user_agent": "curl/8.5", "clicks": 42}]
        }))),
        "empty" => Ok(Json(json!({
            "total_clicks": 0,
            "by_country": [],
            "by_referrer": []
        }))),
        "partial" => Ok(Json(json!({ "total_clicks": 3 }))),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/healthz")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_link_dashboard"))
        .env("PORT", port.to_string())
        .env("ANALYTICS_BASE_URL", BACKEND_URL.as_str())
        .env("ANALYTICS_TIMEOUT_MS", "2000")
        .env_remove("ANALYTICS_FIXTURE_DIR")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

#[tokio::test]
async fn http_dashboard_renders_code_clicks_and_charts() {
    let server = shared_server().await;
    let response = Client::new()
        .get(format!("{}/dashboard?code=abc123", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let html = response.text().await.unwrap();
    assert!(html.contains(r#"<span id="code" class="value">abc123</span>"#));
    assert!(html.contains(r#"<span id="clicks" class="value">42</span>"#));
    assert!(html.contains(r#"<svg id="countryChart""#));
    assert!(html.contains(r#"<svg id="referrerChart""#));
    assert!(html.contains("curl/8.5"));
}

#[tokio::test]
async fn http_dashboard_data_matches_backend() {
    let server = shared_server().await;
    let view: DashboardView = Client::new()
        .get(format!("{}/api/dashboard?code=abc123", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(view.code, "abc123");
    assert_eq!(view.total_clicks, 42);
    assert_eq!(view.country_chart.kind, "pie");
    assert_eq!(view.country_chart.labels, vec!["US", "FR"]);
    assert_eq!(view.country_chart.datasets[0].data, vec![10, 5]);
    assert_eq!(view.country_chart.datasets[0].label, "Clicks by Country");
    assert_eq!(view.referrer_chart.kind, "bar");
    assert_eq!(view.referrer_chart.labels, vec!["google"]);
    assert_eq!(view.referrer_chart.datasets[0].data, vec![8]);
}

#[tokio::test]
async fn http_empty_breakdowns_render() {
    let server = shared_server().await;
    let view: DashboardView = Client::new()
        .get(format!("{}/api/dashboard?code=empty", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(view.country_chart.labels.is_empty());
    assert!(view.country_chart.datasets[0].data.is_empty());
    assert!(view.referrer_chart.labels.is_empty());
}

#[tokio::test]
async fn http_failures_surface_status() {
    let server = shared_server().await;
    let client = Client::new();

    let missing = client
        .get(format!("{}/dashboard", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 400);
    assert!(missing.text().await.unwrap().contains(r#"data-type="error""#));

    let unknown = client
        .get(format!("{}/dashboard?code=unknown", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), 404);

    let partial = client
        .get(format!("{}/api/dashboard?code=partial", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(partial.status(), 502);
}

use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use wiremock::matchers::{body_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn write_jar(path: &Path, url: &str) {
    let jar = serde_json::json!({ "url": url, "session": "abc" });
    fs::write(path, jar.to_string()).expect("write jar");
}

#[test]
fn test_cli_help_succeeds() {
    let output = cargo_bin_cmd!("cops")
        .arg("--help")
        .output()
        .expect("run cops");
    assert!(output.status.success(), "help should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"), "help should include usage text");
    assert!(stdout.contains("logout"));
}

#[test]
fn test_cli_home_prints_location() {
    let temp = tempdir().expect("tempdir");
    let output = cargo_bin_cmd!("cops")
        .env_remove("COPS_URL")
        .arg("--cookie-jar")
        .arg(temp.path().join("jar.json"))
        .arg("home")
        .output()
        .expect("run cops");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Location: home.html"));
}

#[test]
fn test_cli_without_base_url_fails() {
    let temp = tempdir().expect("tempdir");
    let output = cargo_bin_cmd!("cops")
        .env_remove("COPS_URL")
        .arg("--cookie-jar")
        .arg(temp.path().join("empty.json"))
        .args(["get", "/api/user"])
        .output()
        .expect("run cops");
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cops: error:"));
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_cli_get_outputs_body() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(200).set_body_string("jdoe"))
        .mount(&server)
        .await;

    let temp = tempdir().expect("tempdir");
    let jar = temp.path().join("jar.json");
    write_jar(&jar, &server.uri());

    let output = cargo_bin_cmd!("cops")
        .env_remove("COPS_URL")
        .arg("--cookie-jar")
        .arg(&jar)
        .args(["get", "/api/user"])
        .output()
        .expect("run cops");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("jdoe"));

    let requests = server.received_requests().await.expect("requests");
    let cookie = requests[0].headers.get("cookie").expect("session cookie sent");
    assert_eq!(cookie.to_str().expect("ascii"), "session=abc");
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_cli_post_sends_form_fields() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/mapping"))
        .and(body_string("student=jdoe&course=cs101"))
        .respond_with(ResponseTemplate::new(200).set_body_string("enrolled"))
        .expect(1)
        .mount(&server)
        .await;

    let temp = tempdir().expect("tempdir");
    let output = cargo_bin_cmd!("cops")
        .arg("--cookie-jar")
        .arg(temp.path().join("jar.json"))
        .arg("--base-url")
        .arg(server.uri())
        .args(["post", "/api/mapping", "-d", "student=jdoe", "-d", "course=cs101"])
        .output()
        .expect("run cops");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("enrolled"));
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_cli_rejection_is_alerted() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/course"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "message": "Deletion of course failed."
            })),
        )
        .mount(&server)
        .await;

    let temp = tempdir().expect("tempdir");
    let jar = temp.path().join("jar.json");
    write_jar(&jar, &server.uri());

    let output = cargo_bin_cmd!("cops")
        .env_remove("COPS_URL")
        .arg("--cookie-jar")
        .arg(&jar)
        .args(["delete", "/api/course", "-d", "name=cs101"])
        .output()
        .expect("run cops");

    assert_eq!(output.status.code(), Some(22));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Response:\nERROR 400\nBad Request\nDeletion of course failed.\n"));
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_cli_logout_clears_url_cookie() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_string("\"Successfully logged out\""))
        .expect(1)
        .mount(&server)
        .await;

    let temp = tempdir().expect("tempdir");
    let jar = temp.path().join("jar.json");
    write_jar(&jar, &server.uri());

    let output = cargo_bin_cmd!("cops")
        .env_remove("COPS_URL")
        .arg("--cookie-jar")
        .arg(&jar)
        .arg("logout")
        .output()
        .expect("run cops");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Location: sso.html"));

    let remaining: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&jar).expect("read jar")).expect("json jar");
    assert!(remaining.get("url").is_none());
    assert_eq!(remaining.get("session").and_then(|v| v.as_str()), Some("abc"));
}

#[test]
fn test_cli_logout_with_malformed_url_cookie_still_clears() {
    let temp = tempdir().expect("tempdir");
    let jar = temp.path().join("jar.json");
    write_jar(&jar, "not a url");

    let output = cargo_bin_cmd!("cops")
        .env_remove("COPS_URL")
        .arg("--cookie-jar")
        .arg(&jar)
        .arg("logout")
        .output()
        .expect("run cops");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Location: sso.html"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Response:\nERROR 0\n"));

    let remaining: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&jar).expect("read jar")).expect("json jar");
    assert!(remaining.get("url").is_none());
    assert_eq!(remaining.get("session").and_then(|v| v.as_str()), Some("abc"));
}

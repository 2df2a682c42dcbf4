use deck_core::{Error, Variant};
use deck_llm::config::{GOOGLE_API_KEY, OPENAI_API_KEY};
use deck_llm::{LlmConfig, TextGenerator};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

/// Answer exactly one request on a local port with a canned response.
///
/// Returns the base URL to point a client at and a handle yielding the raw
/// request that was received.
fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        stream.write_all(response.as_bytes()).unwrap();
        request
    });

    (base_url, handle)
}

/// Read request headers and a `Content-Length` body.
fn read_request(stream: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 1024];

    loop {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);

        let text = String::from_utf8_lossy(&data);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= end + 4 + length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&data).into_owned()
}

fn client(variant: Variant, base_url: &str) -> Box<dyn TextGenerator> {
    let (key_var, url_var) = match variant {
        Variant::Gemini => (GOOGLE_API_KEY, "GEMINI_BASE_URL"),
        Variant::OpenAi => (OPENAI_API_KEY, "OPENAI_BASE_URL"),
    };
    let base_url = base_url.to_string();

    LlmConfig::from_lookup(variant, move |key| {
        if key == key_var {
            Some("test-key".to_string())
        } else if key == url_var {
            Some(base_url.clone())
        } else {
            None
        }
    })
    .unwrap()
    .build_client()
    .unwrap()
}

#[test]
fn test_openai_returns_message_text() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"A\nB"},"finish_reason":"stop"}]}"#,
    );

    let text = client(Variant::OpenAi, &base_url).complete("Hello").unwrap();
    assert_eq!(text, "A\nB");

    let request = server.join().unwrap().to_lowercase();
    assert!(request.starts_with("post /v1/chat/completions "));
    assert!(request.contains("authorization: bearer test-key"));
    assert!(request.contains(r#""model":"gpt-3.5-turbo""#));
}

#[test]
fn test_openai_unauthorized_is_api_error() {
    let (base_url, server) = serve_once(
        "401 Unauthorized",
        r#"{"error":{"code":"invalid_api_key"}}"#,
    );

    let result = client(Variant::OpenAi, &base_url).complete("Hello");
    server.join().unwrap();

    match result {
        Err(Error::ApiError { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("invalid_api_key"));
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[test]
fn test_openai_without_choices_is_empty_response() {
    let (base_url, server) = serve_once("200 OK", r#"{"choices":[]}"#);

    let result = client(Variant::OpenAi, &base_url).complete("Hello");
    server.join().unwrap();

    assert!(matches!(result, Err(Error::EmptyResponse(name)) if name == "OpenAI"));
}

#[test]
fn test_gemini_returns_candidate_text() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Intro\nOutro"}]},"finishReason":"STOP"}]}"#,
    );

    let text = client(Variant::Gemini, &base_url).complete("Hello").unwrap();
    assert_eq!(text, "Intro\nOutro");

    let request = server.join().unwrap().to_lowercase();
    assert!(request.starts_with("post /v1beta/models/gemini-pro:generatecontent "));
    assert!(request.contains("x-goog-api-key: test-key"));
}

#[test]
fn test_gemini_blocked_prompt_is_empty_response() {
    let (base_url, server) = serve_once("200 OK", r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);

    let result = client(Variant::Gemini, &base_url).complete("Hello");
    server.join().unwrap();

    assert!(matches!(result, Err(Error::EmptyResponse(name)) if name == "Gemini"));
}

#[test]
fn test_gemini_server_error_is_api_error() {
    let (base_url, server) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#);

    let result = client(Variant::Gemini, &base_url).complete("Hello");
    server.join().unwrap();

    assert!(matches!(result, Err(Error::ApiError { status: 500, .. })));
}

#[test]
fn test_connection_refused_is_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    for variant in [Variant::Gemini, Variant::OpenAi] {
        let result = client(variant, &base_url).complete("Hello");
        assert!(
            matches!(result, Err(Error::HttpError(_))),
            "{} backend: {:?}",
            variant,
            result
        );
    }
}

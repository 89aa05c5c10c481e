use anyhow::{anyhow, bail, Context, Result};
use http_body_util::Full;
use hyper::{
    body::{Bytes, Incoming},
    server::conn::http1,
    service::service_fn,
    Request, Response, StatusCode,
};
use hyper_util::rt::TokioIo;
use std::{collections::HashMap, convert::Infallible, sync::Arc};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct AuthResult {
    pub code: String,
    pub state: String,
}

/// What the browser sent to the redirect path.
#[derive(Debug, Clone, PartialEq)]
enum Redirect {
    Code(AuthResult),
    Denied(String),
}

/// Splits a redirect URI like `http://127.0.0.1:8989/login` into the address
/// to listen on and the path to expect.
pub fn listen_target(redirect_uri: &str) -> Result<(String, String)> {
    let rest = redirect_uri
        .strip_prefix("http://")
        .ok_or_else(|| anyhow!("redirect URI must be a local http:// address, got {redirect_uri}"))?;
    let (authority, path) = match rest.find('/') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, "/"),
    };
    if authority.is_empty() {
        bail!("redirect URI has no host: {redirect_uri}");
    }
    let authority = if authority.contains(':') {
        authority.to_string()
    } else {
        format!("{authority}:80")
    };
    Ok((authority, path.to_string()))
}

fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter_map(|kv| {
            let (k, v) = kv.split_once('=')?;
            let v = urlencoding::decode(v).ok()?;
            Some((k.to_string(), v.into_owned()))
        })
        .collect()
}

fn classify(path: &str, query: Option<&str>, expected_path: &str) -> Option<Redirect> {
    if path != expected_path {
        return None;
    }
    let params = parse_query(query.unwrap_or(""));
    if let Some(err) = params.get("error") {
        return Some(Redirect::Denied(err.clone()));
    }
    let code = params.get("code")?.clone();
    let state = params.get("state").cloned().unwrap_or_default();
    Some(Redirect::Code(AuthResult { code, state }))
}

const DONE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <style>
    body { background: #101014; color: #1DB954; font-family: monospace;
           display: flex; align-items: center; justify-content: center; height: 100vh; margin: 0; }
    .card { text-align: center; border: 1px solid #1DB954; padding: 40px; border-radius: 12px; }
    p { color: #aaa; }
  </style>
</head>
<body>
  <div class="card">
    <h1>🎧 moodmix</h1>
    <p>You're connected. Close this tab and head back to the terminal.</p>
  </div>
</body>
</html>"#;

fn page(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(hyper::header::CONTENT_TYPE, hyper::header::HeaderValue::from_static("text/html; charset=utf-8"));
    resp.headers_mut()
        .insert(hyper::header::CONNECTION, hyper::header::HeaderValue::from_static("close"));
    resp
}

/// Serves the OAuth redirect until a request carrying `code` (or `error`)
/// arrives on `path`. Other requests, like the browser's favicon request, get
/// a 404 and are otherwise ignored.
pub async fn wait_for_auth_code(redirect_uri: &str, expected_state: &str) -> Result<AuthResult> {
    let (addr, path) = listen_target(redirect_uri)?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr} for OAuth redirect"))?;
    info!("Waiting for Spotify auth redirect on http://{addr}{path} ...");

    loop {
        let (stream, peer) = listener.accept().await?;
        debug!(%peer, "redirect connection");

        let captured: Arc<std::sync::Mutex<Option<Redirect>>> = Arc::default();
        let slot = captured.clone();
        let expected_path = path.clone();
        let service = service_fn(move |req: Request<Incoming>| {
            let slot = slot.clone();
            let hit = classify(req.uri().path(), req.uri().query(), &expected_path);
            async move {
                let resp = match hit {
                    Some(redirect) => {
                        if let Ok(mut s) = slot.lock() {
                            *s = Some(redirect);
                        }
                        page(StatusCode::OK, DONE_PAGE)
                    }
                    None => page(StatusCode::NOT_FOUND, "not found"),
                };
                Ok::<_, Infallible>(resp)
            }
        });

        if let Err(e) = http1::Builder::new()
            .keep_alive(false)
            .serve_connection(TokioIo::new(stream), service)
            .await
        {
            warn!("redirect connection error: {e}");
        }

        let redirect = captured.lock().ok().and_then(|mut s| s.take());
        match redirect {
            Some(Redirect::Code(result)) => {
                if result.state != expected_state {
                    bail!("OAuth state mismatch, refusing the redirect");
                }
                return Ok(result);
            }
            Some(Redirect::Denied(reason)) => bail!("Spotify authorization was denied: {reason}"),
            None => continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_target_splits_authority_and_path() {
        let (addr, path) = listen_target("http://127.0.0.1:8989/login").unwrap();
        assert_eq!(addr, "127.0.0.1:8989");
        assert_eq!(path, "/login");
    }

    #[test]
    fn listen_target_defaults() {
        let (addr, path) = listen_target("http://localhost").unwrap();
        assert_eq!(addr, "localhost:80");
        assert_eq!(path, "/");
    }

    #[test]
    fn listen_target_rejects_https() {
        assert!(listen_target("https://example.com/callback").is_err());
        assert!(listen_target("http:///x").is_err());
    }

    #[test]
    fn classify_extracts_code_and_state() {
        let hit = classify("/login", Some("code=abc%2Fdef&state=xyz"), "/login");
        assert_eq!(
            hit,
            Some(Redirect::Code(AuthResult {
                code: "abc/def".into(),
                state: "xyz".into()
            }))
        );
    }

    #[test]
    fn classify_reports_denial() {
        let hit = classify("/login", Some("error=access_denied&state=xyz"), "/login");
        assert_eq!(hit, Some(Redirect::Denied("access_denied".into())));
    }

    #[test]
    fn classify_ignores_other_paths_and_bare_hits() {
        assert_eq!(classify("/favicon.ico", None, "/login"), None);
        assert_eq!(classify("/login", None, "/login"), None);
    }
}

//! Drives `DelugeClient` against a minimal in-process JSON-RPC responder.

use serde_json::{Value, json};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tagging::Timestamp;
use tagging_deluge::{DelugeClient, DelugeConfig};
use tagging_sync::{
    HostStatus, MenuSlot, SyncConfig, SyncError, SyncLoop, SyncState, TagSource, Tick,
};

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    params: Value,
    cookie: Option<String>,
}

type Reply = Result<Value, (i64, &'static str)>;

struct Responder {
    url: String,
    log: Arc<Mutex<Vec<Recorded>>>,
}

impl Responder {
    fn start<F>(handler: F) -> Self
    where
        F: Fn(&str, &Value) -> Reply + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let log = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&log);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                serve(stream, &handler, &seen);
            }
        });

        Self { url, log }
    }

    fn client(&self, password: Option<&str>) -> DelugeClient {
        let mut config = DelugeConfig::default().with_url(&self.url);
        if let Some(p) = password {
            config = config.with_password(p);
        }
        DelugeClient::new(config).unwrap()
    }

    fn calls(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.method).collect()
    }
}

fn serve<F>(stream: TcpStream, handler: &F, log: &Mutex<Vec<Recorded>>)
where
    F: Fn(&str, &Value) -> Reply,
{
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut content_length = 0usize;
    let mut cookie = None;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap() == 0 {
            return;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            match name.to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.parse().unwrap(),
                "cookie" => cookie = Some(value.to_string()),
                _ => {}
            }
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).unwrap();
    let request: Value = serde_json::from_slice(&body).unwrap();
    let method = request["method"].as_str().unwrap_or_default().to_string();
    let params = request["params"].clone();

    let reply = handler(&method, &params);
    log.lock().unwrap().push(Recorded {
        method: method.clone(),
        params,
        cookie,
    });

    let payload = match reply {
        Ok(result) => json!({"result": result, "error": null, "id": request["id"]}),
        Err((code, message)) => json!({
            "result": null,
            "error": {"message": message, "code": code},
            "id": request["id"]
        }),
    }
    .to_string();

    let set_cookie = if method == "auth.login" {
        "Set-Cookie: _session_id=s3ss10n; Path=/json\r\n"
    } else {
        ""
    };

    let mut stream = stream;
    write!(
        stream,
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n{}",
        payload.len(),
        set_cookie,
        payload
    )
    .unwrap();
    stream.flush().unwrap();
}

fn snapshot() -> Value {
    json!({
        "type": "full",
        "timestamp": "S'1'\np1\n.",
        "data": {
            "All": {"name": "All", "count": 2},
            "None": {"name": "None", "count": 0},
            "0": {"name": "Movies", "count": 1},
            "0:0": {"name": "HD", "count": 1},
            "1": {"name": "TV", "count": 1}
        }
    })
}

fn plugins() -> Value {
    json!({"enabled_plugins": ["Label", "Tagging"], "available_plugins": []})
}

#[test]
fn test_login_then_session_cookie_is_replayed() {
    let server = Responder::start(|method, _| match method {
        "auth.check_session" => Ok(json!(false)),
        "auth.login" => Ok(json!(true)),
        "web.connected" => Ok(json!(true)),
        "web.get_plugins" => Ok(plugins()),
        _ => Err((2, "Unknown method")),
    });
    let mut client = server.client(Some("deluge"));

    assert_eq!(client.host_status().unwrap(), HostStatus::ready());
    assert!(client.has_session());

    let calls = server.calls();
    let methods: Vec<&str> = calls.iter().map(|c| c.method.as_str()).collect();
    assert_eq!(
        methods,
        ["auth.check_session", "auth.login", "web.connected", "web.get_plugins"]
    );
    assert_eq!(calls[1].params, json!(["deluge"]));
    assert!(calls[0].cookie.is_none());
    assert_eq!(calls[2].cookie.as_deref(), Some("_session_id=s3ss10n"));
    assert_eq!(calls[3].cookie.as_deref(), Some("_session_id=s3ss10n"));
}

#[test]
fn test_no_password_reports_login_pending() {
    let server = Responder::start(|method, _| match method {
        "auth.check_session" => Ok(json!(false)),
        _ => Err((2, "Unknown method")),
    });
    let mut client = server.client(None);

    assert_eq!(client.host_status().unwrap(), HostStatus::login_pending());
    assert_eq!(server.methods(), ["auth.check_session"]);
}

#[test]
fn test_rejected_password_is_unavailable() {
    let server = Responder::start(|method, _| match method {
        "auth.check_session" => Ok(json!(false)),
        "auth.login" => Ok(json!(false)),
        _ => Err((2, "Unknown method")),
    });
    let mut client = server.client(Some("wrong"));

    let status = client.host_status().unwrap();
    assert_eq!(status, HostStatus::unavailable());
    assert!(!status.login_visible);
    assert_eq!(server.methods(), ["auth.check_session", "auth.login"]);
}

#[test]
fn test_rejected_password_spends_retry_budget() {
    let server = Responder::start(|method, _| match method {
        "auth.check_session" => Ok(json!(false)),
        "auth.login" => Ok(json!(false)),
        _ => Err((2, "Unknown method")),
    });
    let config = SyncConfig::default()
        .with_host_retries(3)
        .with_uniform_interval(Duration::ZERO);
    let mut sync = SyncLoop::with_config(server.client(Some("wrong")), MenuSlot::default(), config);

    let mut steps = 0;
    while sync.step() != Tick::Halt {
        steps += 1;
        assert!(steps < 10, "loop kept waiting on a rejected password");
    }
    assert_eq!(sync.state(), SyncState::TimedOut);
    assert_eq!(
        server.methods().iter().filter(|m| *m == "auth.login").count(),
        3
    );
}

#[test]
fn test_plugin_disabled_is_not_ready() {
    let server = Responder::start(|method, _| match method {
        "auth.check_session" => Ok(json!(true)),
        "web.connected" => Ok(json!(true)),
        "web.get_plugins" => Ok(json!({"enabled_plugins": ["Label"]})),
        _ => Err((2, "Unknown method")),
    });
    let mut client = server.client(None);

    let status = client.host_status().unwrap();
    assert!(!status.login_visible);
    assert!(!status.is_ready());
}

#[test]
fn test_updates_send_cursor() {
    let server = Responder::start(|method, params| match method {
        "tagging.get_tag_updates_dict" if params == &json!([]) => Ok(snapshot()),
        "tagging.get_tag_updates_dict" => Ok(Value::Null),
        _ => Err((2, "Unknown method")),
    });
    let mut client = server.client(None);

    let first = client.get_tag_updates(None).unwrap().unwrap();
    assert_eq!(first.data.len(), 5);

    let cursor = Timestamp::new("S'1'\np1\n.");
    assert!(client.get_tag_updates(Some(&cursor)).unwrap().is_none());
    assert_eq!(server.calls()[1].params, json!(["S'1'\np1\n."]));
}

#[test]
fn test_malformed_snapshot() {
    let server = Responder::start(|_, _| Ok(json!({"data": {}})));
    let mut client = server.client(None);

    assert!(matches!(
        client.get_tag_updates(None),
        Err(SyncError::MalformedSnapshot(_))
    ));
}

#[test]
fn test_rpc_error_is_remote() {
    let server = Responder::start(|_, _| Err((4, "Invalid tag")));
    let mut client = server.client(None);

    let err = client
        .set_torrent_tags(&["abc".to_string()], "9")
        .unwrap_err();
    match err {
        SyncError::Remote(msg) => assert!(msg.contains("Invalid tag")),
        other => panic!("expected remote error, got {:?}", other),
    }
    assert_eq!(server.calls()[0].params, json!([["abc"], "9"]));
}

#[test]
fn test_sync_loop_over_rpc() {
    let server = Responder::start(|method, params| match method {
        "auth.check_session" => Ok(json!(true)),
        "web.connected" => Ok(json!(true)),
        "web.get_plugins" => Ok(plugins()),
        "tagging.is_initialized" => Ok(json!(true)),
        "tagging.get_tag_updates_dict" if params == &json!([]) => Ok(snapshot()),
        "tagging.get_tag_updates_dict" => Ok(json!(false)),
        "tagging.set_torrent_tags" => Ok(Value::Null),
        _ => Err((2, "Unknown method")),
    });
    let mut sync = SyncLoop::new(server.client(None), MenuSlot::default());

    for _ in 0..10 {
        if sync.state().is_active() {
            break;
        }
        sync.step();
    }
    assert_eq!(sync.state(), SyncState::Active);

    let menu = sync.view().current().unwrap();
    assert_eq!(menu.find("0:0").unwrap().label(), Some("HD"));
    assert_eq!(sync.column_value("0:0"), "Movies/HD");

    sync.step();
    assert_eq!(sync.view().installs(), 1);

    sync.activate("1", &["abc".to_string()]);
    let last = server.calls().pop().unwrap();
    assert_eq!(last.method, "tagging.set_torrent_tags");
    assert_eq!(last.params, json!([["abc"], "1"]));
}

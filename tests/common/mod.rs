//! Shared mock endpoints for integration tests.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UnixListener};

/// A realistic `show stat` response (trimmed to the columns the probes use
/// plus a few they ignore).
#[allow(dead_code)]
pub const SHOW_STAT: &str = "\
# pxname,svname,qcur,qmax,scur,smax,slim,stot,bin,bout,dreq,dresp,ereq,econ,eresp,status,weight,
www,FRONTEND,,,12,40,100,5230,1048576,9437184,0,0,3,,,OPEN,,
app,BACKEND,0,2,12,38,200,5100,1048000,9430000,0,0,,0,0,UP,2,
app,web1,0,1,7,20,,2600,524000,4715000,,0,,0,0,UP,1,
app,web2,0,1,5,18,,2500,524000,4715000,,0,,0,0,UP 1/3,1,
stats,FRONTEND,,,0,1,2000,17,2000,90000,0,0,0,,,OPEN,,

";

/// Serve `response` to every client on a Unix socket at `path`.
///
/// Each client's request is read to EOF first, like HAProxy does.
#[allow(dead_code)]
pub async fn start_mock_stats_socket(path: &Path, response: &'static str) {
    let listener = UnixListener::bind(path).unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut request = Vec::new();
                        let _ = socket.read_to_end(&mut request).await;
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Accept clients on `path` but never answer.
#[allow(dead_code)]
pub async fn start_silent_stats_socket(path: &Path) {
    let listener = UnixListener::bind(path).unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
}

/// Start an HTTP server answering every request with `status` and `body`.
#[allow(dead_code)]
pub async fn start_mock_status_page(status: u16, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 1024];
                        let _ = socket.read(&mut buf).await;
                        let status_text = match status {
                            200 => "200 OK",
                            403 => "403 Forbidden",
                            503 => "503 Service Unavailable",
                            _ => "500 Internal Server Error",
                        };
                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

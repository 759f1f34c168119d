//! Local HTTP server for transfer tests

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve `body` with `status` to every request and return a URL pointing at it
pub async fn serve(status: &'static str, body: Vec<u8>) -> String {
    let len = body.len();
    serve_declaring(status, len, body).await
}

/// Like [`serve`], but announce `content_length` regardless of the real body,
/// so a shorter body ends the connection mid-transfer
pub async fn serve_declaring(status: &'static str, content_length: usize, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let body = body.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                    if request.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }

                let header = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nContent-Type: audio/mp4\r\nConnection: close\r\n\r\n",
                    status, content_length
                );
                let _ = socket.write_all(header.as_bytes()).await;
                for chunk in body.chunks(8 * 1024) {
                    if socket.write_all(chunk).await.is_err() {
                        return;
                    }
                    let _ = socket.flush().await;
                }
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}/audio.m4a", addr)
}

pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

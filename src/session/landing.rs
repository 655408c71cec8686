use super::redirect::{detect_redirect, UrlLocation};
use crate::error::{login_error, ClientResult};
use std::net::SocketAddr;
use std::sync::Arc;
use tiny_http::{Header, Response, Server};
use tracing::debug;
use url::Url;

const LANDING_PAGE: &str = "<html><body><p>Login finished. You can close this window and return to the terminal.</p></body></html>";

/// Local HTTP listener standing in for the landing page the backend
/// redirects to after the provider login
pub struct LandingListener {
    server: Arc<Server>,
    origin: String,
}

/// Wakes a `recv` blocked on the server when dropped
struct Unblock(Arc<Server>);

impl Drop for Unblock {
    fn drop(&mut self) {
        self.0.unblock();
    }
}

impl LandingListener {
    pub fn bind(addr: &str) -> ClientResult<Self> {
        let server = Server::http(addr)
            .map_err(|e| login_error(&format!("Failed to listen on {}: {}", addr, e)))?;

        let origin = match server.server_addr().to_ip() {
            Some(local) => format!("http://{}", local),
            None => format!("http://{}", addr),
        };

        Ok(Self {
            server: Arc::new(server),
            origin,
        })
    }

    /// Address the listener actually bound, useful with port 0
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Block until a request carrying a login result arrives. Other requests
    /// (favicons and the like) get a 404 and are otherwise ignored.
    /// Fails once the server is unblocked.
    pub fn wait_blocking(&self) -> ClientResult<UrlLocation> {
        loop {
            let request = self.server.recv()?;
            let url = Url::parse(&format!("{}{}", self.origin, request.url()))?;
            debug!(%url, "Landing request");

            let mut candidate = UrlLocation::new(url.clone());
            if detect_redirect(&mut candidate).is_none() {
                request.respond(Response::empty(404))?;
                continue;
            }

            let content_type = Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..])
                .map_err(|_| login_error("Invalid landing page header"))?;
            request.respond(Response::from_string(LANDING_PAGE).with_header(content_type))?;

            return Ok(UrlLocation::new(url));
        }
    }

    /// Async wrapper around [`Self::wait_blocking`]. Dropping the future
    /// unblocks the listener thread, so a cancelled wait does not hold up
    /// runtime shutdown.
    pub async fn wait(self) -> ClientResult<UrlLocation> {
        let _unblock = Unblock(Arc::clone(&self.server));

        tokio::task::spawn_blocking(move || self.wait_blocking())
            .await
            .map_err(|e| login_error(&format!("Landing listener task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Location;
    use std::io::{Read, Write};
    use std::net::TcpStream;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn can_bind_localhost() -> bool {
        std::net::TcpListener::bind("127.0.0.1:0").is_ok()
    }

    /// Minimal HTTP/1.1 GET returning the raw response text
    fn get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        write!(
            stream,
            "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
            path, addr
        )
        .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    fn spawn_listener() -> (SocketAddr, thread::JoinHandle<ClientResult<UrlLocation>>) {
        let listener = LandingListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || listener.wait_blocking());
        (addr, handle)
    }

    #[test]
    fn test_unrelated_requests_get_404_until_success() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let (addr, handle) = spawn_listener();

        assert!(get(addr, "/favicon.ico").starts_with("HTTP/1.1 404"));
        assert!(get(addr, "/?tab=events").starts_with("HTTP/1.1 404"));

        let page = get(addr, "/?success=true");
        assert!(page.starts_with("HTTP/1.1 200"));
        assert!(page.contains("You can close this window"));

        let location = handle.join().unwrap().unwrap();
        assert_eq!(
            location.query_pairs(),
            vec![("success".to_string(), "true".to_string())]
        );
        assert_eq!(location.url().port(), Some(addr.port()));
    }

    #[test]
    fn test_error_redirect_is_returned() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let (addr, handle) = spawn_listener();

        let page = get(addr, "/?error=access_denied&message=Denied");
        assert!(page.starts_with("HTTP/1.1 200"));

        let location = handle.join().unwrap().unwrap();
        assert_eq!(location.url().query(), Some("error=access_denied&message=Denied"));
    }

    #[test]
    fn test_cancelled_wait_lets_runtime_shut_down() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let (done_tx, done_rx) = mpsc::channel();

        thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let cancelled = rt.block_on(async {
                let listener = LandingListener::bind("127.0.0.1:0").unwrap();
                tokio::select! {
                    _ = listener.wait() => false,
                    _ = tokio::time::sleep(Duration::from_millis(100)) => true,
                }
            });
            drop(rt);
            let _ = done_tx.send(cancelled);
        });

        let cancelled = done_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("runtime did not shut down after the wait was cancelled");
        assert!(cancelled);
    }
}

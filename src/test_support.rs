//! Local stub HTTP server for exercising request code without the network.

use std::sync::mpsc;
use std::thread;

/// Serve the given `(status, body)` responses in order, one per request.
///
/// Returns the base URL, a channel yielding each request's path and query,
/// and the server thread handle (it exits after the last response).
pub fn spawn_stub(
    responses: Vec<(u16, String)>,
) -> (String, mpsc::Receiver<String>, thread::JoinHandle<()>) {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
    let base_url = format!("http://{}", server.server_addr());
    let (url_tx, url_rx) = mpsc::channel::<String>();

    let handle = thread::spawn(move || {
        for (status, body) in responses {
            let request = match server.recv() {
                Ok(req) => req,
                Err(_) => break,
            };
            let _ = url_tx.send(request.url().to_string());
            let _ = request.respond(tiny_http::Response::from_string(body).with_status_code(status));
        }
    });

    (base_url, url_rx, handle)
}

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// Answer one request with a JSON body; the handle yields the request body.
pub fn serve_json_once(status: u16, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let response = format!(
        "HTTP/1.1 {status} Test\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept request");
        let request_body = read_body(&mut stream);
        stream
            .write_all(response.as_bytes())
            .expect("write response");
        request_body
    });
    (format!("http://{addr}/generate"), handle)
}

fn read_body(stream: &mut impl Read) -> String {
    let mut received = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let read = stream.read(&mut buf).expect("read request");
        if read == 0 {
            return String::new();
        }
        received.extend_from_slice(&buf[..read]);
        let Some(head_end) = received.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&received[..head_end]).to_ascii_lowercase();
        let body_len = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        let body_start = head_end + 4;
        if received.len() >= body_start + body_len {
            let body = &received[body_start..body_start + body_len];
            return String::from_utf8_lossy(body).into_owned();
        }
    }
}

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use userscout::{Address, Company, Record};

/// Serves `body` with `status` to a single HTTP request on a random local port.
/// Returns the URL to request and a handle yielding the request line received.
pub fn serve_once(status: u16, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/users", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        loop {
            let mut header = String::new();
            reader.read_line(&mut header).unwrap();
            if header == "\r\n" || header.is_empty() {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        request_line.trim_end().to_string()
    });

    (url, handle)
}

/// A URL nothing is listening on
pub fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    format!("http://{}/users", listener.local_addr().unwrap())
}

pub fn user(id: i64, name: &str, tagline: &str) -> Record {
    Record {
        id,
        name: name.to_string(),
        email: format!("user{}@example.com", id),
        address: Address {
            street: format!("{} Main St", id),
            suite: "Apt 4".to_string(),
            city: "Testville".to_string(),
            zipcode: "12345".to_string(),
        },
        company: Company {
            name: "Test Corp".to_string(),
            catch_phrase: tagline.to_string(),
        },
    }
}

/// The two users used throughout the workflow tests
pub fn mock_users() -> Vec<Record> {
    vec![
        user(1, "Test User", "Task-force oriented solutions"),
        user(2, "Another User", "Just another company"),
    ]
}

/// Encodes records the way the remote source does (`catchPhrase` key)
pub fn source_json(records: &[Record]) -> String {
    let items: Vec<serde_json::Value> = records
        .iter()
        .map(|r| {
            serde_json::json!({
                "id": r.id,
                "name": r.name,
                "username": format!("user{}", r.id),
                "email": r.email,
                "address": {
                    "street": r.address.street,
                    "suite": r.address.suite,
                    "city": r.address.city,
                    "zipcode": r.address.zipcode,
                    "geo": { "lat": "0", "lng": "0" }
                },
                "phone": "555-0100",
                "website": "example.com",
                "company": {
                    "name": r.company.name,
                    "catchPhrase": r.company.catch_phrase,
                    "bs": "synergize"
                }
            })
        })
        .collect();
    serde_json::to_string(&items).unwrap()
}

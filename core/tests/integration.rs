//! Full CRUD lifecycle against a live server.
//!
//! Starts `todo-server` on a random port backed by an in-memory database,
//! then drives it through `Session` over real HTTP with `UreqTransport`.

use std::io::{Read, Write};

use todo_core::types::timestamp;
use todo_core::{
    ApiError, HttpMethod, HttpRequest, Operation, Session, Status, TodoClient, TodoForm, Transport, UreqTransport,
};
use todo_server::{Config, TodoStore};

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            let store = TodoStore::open_in_memory().unwrap();
            todo_server::run(listener, store, &Config::default()).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn form(title: &str, status: Status) -> TodoForm {
    TodoForm {
        title: title.to_string(),
        description: None,
        status,
        expired_at: timestamp::parse("2025-01-01").unwrap(),
    }
}

#[test]
fn crud_lifecycle() {
    let base_url = start_server();
    let mut session = Session::new(TodoClient::new(&base_url), UreqTransport::new());

    // Step 1: list — should be empty.
    assert!(session.todos().unwrap().is_empty(), "expected empty list");

    // Step 2: create.
    let created = session.create(&form("Buy milk", Status::Pending)).unwrap();
    assert_eq!(created.id, "1");
    assert_eq!(created.title, "Buy milk");
    assert_eq!(created.status, Status::Pending);

    // Step 3: get — same record.
    let fetched = session.todo(&created.id).unwrap();
    assert_eq!(fetched, created);

    // Step 4: update with the full object.
    session
        .update(&created.id, &form("Buy oat milk", Status::Complete))
        .unwrap();

    // Step 5: get — updated, served fresh because the update invalidated the cache.
    let updated = session.todo(&created.id).unwrap();
    assert_eq!(updated.title, "Buy oat milk");
    assert_eq!(updated.status, Status::Complete);
    assert_eq!(updated.expired_at, created.expired_at);

    // Step 6: completed list contains it.
    let completed = session.completed().unwrap();
    assert_eq!(completed, vec![updated.clone()]);

    // Step 7: delete.
    session.remove(&created.id).unwrap();

    // Step 8: get after delete — NotFound.
    let err = session.todo(&created.id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(ref id) if id == "1"));

    // Step 9: delete again — a generic request error, not NotFound.
    let err = session.remove(&created.id).unwrap_err();
    assert!(matches!(
        err,
        ApiError::Request { operation: Operation::Remove, status: Some(404), .. }
    ));

    // Step 10: list — empty again.
    assert!(session.todos().unwrap().is_empty(), "expected empty list after delete");
}

#[test]
fn update_without_description_clears_it() {
    let base_url = start_server();
    let mut session = Session::new(TodoClient::new(&base_url), UreqTransport::new());

    let mut with_description = form("Call plumber", Status::InProgress);
    with_description.description = Some("kitchen sink".to_string());
    let created = session.create(&with_description).unwrap();
    assert_eq!(created.description.as_deref(), Some("kitchen sink"));

    session
        .update(&created.id, &form("Call plumber", Status::InProgress))
        .unwrap();
    assert!(session.todo(&created.id).unwrap().description.is_none());
}

#[test]
fn unreachable_server_is_a_request_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut session = Session::new(TodoClient::new(&format!("http://{addr}")), UreqTransport::new());
    let err = session.todos().unwrap_err();
    assert!(matches!(err, ApiError::Request { status: None, .. }));
}

#[test]
fn route_names_and_query_strings_are_not_ids() {
    let mut session = Session::new(TodoClient::new(&start_server()), UreqTransport::new());
    session.create(&form("Buy milk", Status::Complete)).unwrap();

    assert!(session.todo("complete").unwrap_err().is_not_found());
    assert!(session.todo("1?x=1").unwrap_err().is_not_found());
    assert!(matches!(session.remove("1?x=1"), Err(ApiError::InvalidForm { field: "id", .. })));
    assert_eq!(session.todo("01").unwrap().title, "Buy milk");
}

#[test]
fn transport_sends_the_headers_it_is_given() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let received = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 4096];
        let n = stream.read(&mut buf).unwrap();
        stream
            .write_all(b"HTTP/1.1 204 No Content\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
            .unwrap();
        String::from_utf8_lossy(&buf[..n]).to_lowercase()
    });

    let request = HttpRequest {
        method: HttpMethod::Get,
        url: format!("http://{addr}/todo"),
        headers: vec![("x-request-id".to_string(), "abc".to_string())],
        body: None,
    };
    let response = UreqTransport::new().execute(&request).unwrap();
    assert_eq!(response.status, 204);
    assert!(received.join().unwrap().contains("x-request-id: abc"));
}

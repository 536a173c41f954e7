use std::io::Cursor;
use std::thread;

use ipc::{Client, Server};

fn socket_path(dir: &tempfile::TempDir) -> std::path::PathBuf {
    dir.path().join("control.socket")
}

#[test]
fn command_with_options_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = socket_path(&dir);
    let server = Server::bind(&path).unwrap();

    let client_path = path.clone();
    let client_thread = thread::spawn(move || {
        let mut client = Client::connect(&client_path).unwrap();
        client
            .send_command_with_options("reset", &["keepObserved".to_string()])
            .unwrap();
    });

    let mut conn = loop {
        if let Some(conn) = server.accept().unwrap() {
            break conn;
        }
    };
    let (command, options) = conn.receive_command().unwrap();
    client_thread.join().unwrap();

    assert_eq!(command, "reset");
    assert_eq!(options, vec!["keepObserved".to_string()]);
}

#[test]
fn file_blob_round_trips_to_client() {
    let dir = tempfile::tempdir().unwrap();
    let path = socket_path(&dir);
    let server = Server::bind(&path).unwrap();

    let client_path = path.clone();
    let client_thread = thread::spawn(move || {
        let mut client = Client::connect(&client_path).unwrap();
        client.send_command("save").unwrap();
        let mut received = Vec::new();
        client.receive_file(&mut received).unwrap();
        received
    });

    let mut conn = loop {
        if let Some(conn) = server.accept().unwrap() {
            break conn;
        }
    };
    let (command, _) = conn.receive_command().unwrap();
    assert_eq!(command, "save");
    let mut payload = Cursor::new(b"# Profile rules:\n".to_vec());
    conn.send_file(&mut payload).unwrap();
    drop(conn);

    let received = client_thread.join().unwrap();
    assert_eq!(received, b"# Profile rules:\n");
}

#[test]
fn bind_removes_stale_socket_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = socket_path(&dir);
    std::fs::write(&path, b"stale").unwrap();
    assert!(Server::bind(&path).is_ok());
}

//! End-to-end relay tests: a proxy thread between two endpoint pairs, with
//! the multipart codec driving both sides.

use std::time::Duration;

use msgrelay_codec::{MessageExt, Part};
use msgrelay_proxy::Proxy;
use msgrelay_transport::UnixEndpoint;

fn spawn_proxy() -> (UnixEndpoint, UnixEndpoint, std::thread::JoinHandle<()>) {
    let (front_peer, front) = UnixEndpoint::pair().unwrap();
    let (back_peer, back) = UnixEndpoint::pair().unwrap();

    let handle = std::thread::spawn(move || {
        let mut proxy = Proxy::new(front, back);
        // Runs until a peer closes; the resulting error ends the thread.
        let _ = proxy.run();
    });

    (front_peer, back_peer, handle)
}

#[test]
fn multipart_round_trip_through_proxy() {
    let (mut front, mut back, handle) = spawn_proxy();

    front
        .send_message([
            Part::from("A"),
            Part::from(vec!["B", "C"]),
            Part::from(vec![0x01u8]),
        ])
        .unwrap();

    let msg = back.recv_message().unwrap();
    assert_eq!(msg, vec!["A", "B", "C", "\u{1}"]);

    drop(front);
    drop(back);
    handle.join().unwrap();
}

#[test]
fn request_reply_through_proxy() {
    let (mut client, mut worker, handle) = spawn_proxy();

    client.send_message([Part::from("ping")]).unwrap();
    let req = worker.recv_message().unwrap();
    assert_eq!(req, vec!["ping"]);

    worker.send_message([Part::from("pong")]).unwrap();
    let reply = client.recv_message().unwrap();
    assert_eq!(reply, vec!["pong"]);

    drop(client);
    drop(worker);
    handle.join().unwrap();
}

#[test]
fn messages_are_never_interleaved() {
    let (mut front, mut back, handle) = spawn_proxy();

    for i in 0..10u32 {
        front
            .send_message([
                Part::display(i),
                Part::from(format!("payload-{i}")),
                Part::from("end"),
            ])
            .unwrap();
    }

    for i in 0..10u32 {
        let msg = back.recv_message().unwrap();
        assert_eq!(
            msg,
            vec![i.to_string(), format!("payload-{i}"), "end".to_owned()]
        );
    }

    drop(front);
    drop(back);
    handle.join().unwrap();
}

#[test]
fn both_directions_make_progress_under_load() {
    let (mut front, mut back, handle) = spawn_proxy();

    let front_side = std::thread::spawn(move || {
        for i in 0..50u32 {
            front
                .send_message([Part::from("f"), Part::display(i)])
                .unwrap();
            let msg = front.recv_message().unwrap();
            assert_eq!(msg, vec!["b".to_owned(), i.to_string()]);
        }
        front
    });

    for i in 0..50u32 {
        let msg = back.recv_message().unwrap();
        assert_eq!(msg, vec!["f".to_owned(), i.to_string()]);
        back.send_message([Part::from("b"), Part::display(i)])
            .unwrap();
    }

    let front = front_side.join().unwrap();

    drop(front);
    drop(back);
    handle.join().unwrap();
}

#[test]
fn large_multipart_message_survives_relay() {
    let (mut front, mut back, handle) = spawn_proxy();

    let blob = vec![0x5A; 256 * 1024];
    let writer = std::thread::spawn({
        let blob = blob.clone();
        move || {
            front
                .send_message([Part::from("header"), Part::from(blob)])
                .unwrap();
            front
        }
    });

    let msg = back.recv_message_bytes().unwrap();
    assert_eq!(msg.len(), 2);
    assert_eq!(msg[0].as_ref(), b"header");
    assert_eq!(msg[1].as_ref(), blob.as_slice());

    let front = writer.join().unwrap();

    drop(front);
    drop(back);
    handle.join().unwrap();
}

#[test]
fn proxy_thread_exits_when_a_peer_closes() {
    let (front, back, handle) = spawn_proxy();

    drop(front);

    // Give the proxy a poll pass to observe the hangup.
    std::thread::sleep(Duration::from_millis(50));
    drop(back);
    handle.join().unwrap();
}

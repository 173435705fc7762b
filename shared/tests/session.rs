use std::{
    io::{ErrorKind, Write},
    net::{Ipv4Addr, SocketAddr, TcpStream},
    thread,
    time::Duration,
};

use flood_shared::{
    Client, Command, Config, ControlMessage, FloodError, Role, Server, SessionReport,
};

const PAYLOAD: usize = 1024 * 1024;

fn config(duration: Duration) -> Config {
    Config {
        payload_size: PAYLOAD,
        ..Config::default().with_port(0).with_duration(duration)
    }
}

fn bind(config: Config) -> (Server, SocketAddr) {
    let server = Server::bind(config, Ipv4Addr::LOCALHOST.into()).unwrap();
    let addr = server.local_addr().unwrap();
    (server, addr)
}

fn assert_no_start(control: &TcpStream) {
    control
        .set_read_timeout(Some(Duration::from_millis(100)))
        .unwrap();

    match ControlMessage::read_from(control, Command::Start) {
        Err(FloodError::Io(err)) => {
            assert!(matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut))
        }
        other => panic!("server sent START too early: {:?}", other),
    }
}

#[test]
fn start_waits_for_exactly_the_announced_streams() {
    let (server, addr) = bind(config(Duration::ZERO));

    for num_streams in 1..=16i16 {
        thread::scope(|s| {
            let session = s.spawn(|| server.accept_session());

            let control = TcpStream::connect(addr).unwrap();
            ControlMessage::Init { num_streams }
                .write_to(&control)
                .unwrap();

            let mut data: Vec<_> = (1..num_streams)
                .map(|_| TcpStream::connect(addr).unwrap())
                .collect();

            assert_no_start(&control);

            data.push(TcpStream::connect(addr).unwrap());

            control
                .set_read_timeout(Some(Duration::from_secs(5)))
                .unwrap();
            assert_eq!(
                ControlMessage::read_from(&control, Command::Start).unwrap(),
                ControlMessage::Start
            );

            drop(data);
            ControlMessage::End.write_to(&control).unwrap();

            let report = session.join().unwrap().unwrap();
            assert_eq!(report.role, Role::Server);
            assert_eq!(report.streams, num_streams);
            assert_eq!(report.bytes, 0);
        });
    }
}

#[test]
fn too_few_data_connections_never_start_and_server_recovers() {
    let (server, addr) = bind(config(Duration::from_millis(200)));

    thread::scope(|s| {
        let session = s.spawn(|| server.accept_session());

        let control = TcpStream::connect(addr).unwrap();
        ControlMessage::Init { num_streams: 3 }
            .write_to(&control)
            .unwrap();
        let data: Vec<_> = (0..2).map(|_| TcpStream::connect(addr).unwrap()).collect();

        assert_no_start(&control);

        // The client gives up. The third connection only unblocks the accept
        // loop; the session must fail on the dead control connection.
        drop(data);
        drop(control);
        let straggler = TcpStream::connect(addr).unwrap();

        assert!(session.join().unwrap().is_err());
        drop(straggler);
    });

    thread::scope(|s| {
        let session = s.spawn(|| server.accept_session());

        let config = config(Duration::from_millis(200)).with_port(addr.port());
        let sent = Client::new(config, "127.0.0.1", 1).run().unwrap();
        let received = session.join().unwrap().unwrap();

        assert!(received.bytes > 0);
        assert!(received.bytes <= sent.bytes);
    });
}

#[test]
fn connections_beyond_the_announced_count_belong_to_the_next_session() {
    let (server, addr) = bind(config(Duration::ZERO));

    thread::scope(|s| {
        let session = s.spawn(|| server.accept_session());

        let control = TcpStream::connect(addr).unwrap();
        ControlMessage::Init { num_streams: 2 }
            .write_to(&control)
            .unwrap();
        let data: Vec<_> = (0..2).map(|_| TcpStream::connect(addr).unwrap()).collect();
        let mut extra = TcpStream::connect(addr).unwrap();
        extra.write_all(&[0u8; 4096]).unwrap();

        control
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        ControlMessage::read_from(&control, Command::Start).unwrap();

        drop(data);
        ControlMessage::End.write_to(&control).unwrap();

        let report = session.join().unwrap().unwrap();
        assert_eq!(report.streams, 2);
        assert_eq!(report.bytes, 0);

        // The extra connection is read as the next control connection; its
        // zero bytes announce no streams.
        let err = server.accept_session().unwrap_err();
        assert!(matches!(err, FloodError::InvalidStreamCount(0)));
        drop(extra);
    });
}

#[test]
fn init_with_no_streams_is_rejected() {
    let (server, addr) = bind(config(Duration::ZERO));

    thread::scope(|s| {
        let session = s.spawn(|| server.accept_session());

        let mut control = TcpStream::connect(addr).unwrap();
        control.write_all(&[0x00, 0x00, 0x00]).unwrap();

        let err = session.join().unwrap().unwrap_err();
        assert!(matches!(err, FloodError::InvalidStreamCount(0)));
        assert!(err.is_protocol_violation());
    });
}

#[test]
fn session_must_open_with_init() {
    let (server, addr) = bind(config(Duration::ZERO));

    thread::scope(|s| {
        let session = s.spawn(|| server.accept_session());

        ControlMessage::End
            .write_to(TcpStream::connect(addr).unwrap())
            .unwrap();

        let err = session.join().unwrap().unwrap_err();
        assert!(matches!(
            err,
            FloodError::UnexpectedCommand {
                expected: Command::Init,
                found: 2
            }
        ));
    });
}

#[test]
fn wrong_command_instead_of_end_aborts_the_session() {
    let (server, addr) = bind(config(Duration::ZERO));

    thread::scope(|s| {
        let session = s.spawn(|| server.accept_session());

        let control = TcpStream::connect(addr).unwrap();
        ControlMessage::Init { num_streams: 2 }
            .write_to(&control)
            .unwrap();
        // Held open on purpose: the aborted session has to unblock its own receivers.
        let _data: Vec<_> = (0..2).map(|_| TcpStream::connect(addr).unwrap()).collect();

        ControlMessage::read_from(&control, Command::Start).unwrap();
        ControlMessage::Start.write_to(&control).unwrap();

        let err = session.join().unwrap().unwrap_err();
        assert!(matches!(
            err,
            FloodError::UnexpectedCommand {
                expected: Command::End,
                found: 1
            }
        ));
    });
}

#[test]
fn two_stream_session_end_to_end() {
    let duration = Duration::from_millis(300);
    let (server, addr) = bind(config(duration));

    let (sent, received): (SessionReport, SessionReport) = thread::scope(|s| {
        let session = s.spawn(|| server.accept_session());

        let client = Client::new(config(duration).with_port(addr.port()), "127.0.0.1", 2);
        let sent = client.run().unwrap();

        (sent, session.join().unwrap().unwrap())
    });

    assert_eq!(sent.role, Role::Client);
    assert_eq!(sent.streams, 2);
    assert!(sent.elapsed >= duration);
    assert!(sent.bytes > 0);
    assert_eq!(sent.bytes % PAYLOAD as u64, 0);

    assert_eq!(received.role, Role::Server);
    assert_eq!(received.streams, 2);
    assert!(received.bytes > 0);
    assert!(received.bytes <= sent.bytes);

    let expected = sent.bytes as f64 / sent.elapsed.as_secs_f64();
    assert!((sent.bytes_per_sec() - expected).abs() <= expected * 1e-9);
}

#[test]
fn client_rejects_non_positive_parallelism() {
    let client = Client::new(Config::default(), "127.0.0.1", 0);

    assert!(matches!(client.run(), Err(FloodError::InvalidStreamCount(0))));
}

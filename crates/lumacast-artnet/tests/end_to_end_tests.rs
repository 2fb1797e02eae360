use std::collections::HashSet;
use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use lumacast_artnet::frame::{VideoField, VideoFormatDesc, VideoFrame};
use lumacast_artnet::{
    ArtNetConsumer, ArtNetSender, ArtNetSettings, Configuration, FixtureSettings, FrameConsumer,
    SenderSettings,
};

fn receiver() -> (UdpSocket, u16) {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("bind receiver");
    socket
        .set_read_timeout(Some(Duration::from_secs(2)))
        .expect("set timeout");
    let port = socket.local_addr().unwrap().port();
    (socket, port)
}

fn rgb_sender(port: u16, universe: i64) -> SenderSettings {
    SenderSettings {
        host: "127.0.0.1".to_string(),
        port: port as i64,
        universe,
        fixtures: vec![FixtureSettings {
            fixture_type: Some("RGB".to_string()),
            start_address: Some(1),
            fixture_count: Some(1),
            width: 16.0,
            height: 16.0,
            ..Default::default()
        }],
    }
}

fn consumer(refresh_rate: i64, senders: Vec<SenderSettings>) -> ArtNetConsumer {
    let config = Configuration::from_settings(&ArtNetSettings {
        refresh_rate,
        senders,
    })
    .expect("valid configuration");
    ArtNetConsumer::new(config).expect("consumer")
}

#[test]
fn test_single_rgb_fixture_packet() {
    let (socket, port) = receiver();
    let mut consumer = consumer(20, vec![rgb_sender(port, 0)]);

    consumer.initialize(&VideoFormatDesc::default(), 1).unwrap();
    let _ = consumer.send(VideoField::Progressive, VideoFrame::solid(16, 16, 10, 20, 30));

    let mut buf = [0u8; 1024];
    let (len, _) = socket.recv_from(&mut buf).expect("Art-Net packet");
    consumer.stop();

    assert_eq!(len, 530);
    assert_eq!(&buf[0..8], b"Art-Net\0");
    assert_eq!(&buf[8..10], &[0x00, 0x50]);
    assert_eq!(&buf[10..12], &[0, 14]);
    // Universe 0
    assert_eq!(&buf[14..16], &[0, 0]);
    // Length 512
    assert_eq!(&buf[16..18], &[0x02, 0x00]);
    assert_eq!(&buf[18..21], &[10, 20, 30]);
    assert!(buf[21..530].iter().all(|v| *v == 0));
}

#[test]
fn test_no_packet_before_first_frame() {
    let (socket, port) = receiver();
    socket
        .set_read_timeout(Some(Duration::from_millis(300)))
        .unwrap();

    let mut consumer = consumer(50, vec![rgb_sender(port, 0)]);
    consumer.initialize(&VideoFormatDesc::default(), 1).unwrap();

    let mut buf = [0u8; 1024];
    let result = socket.recv_from(&mut buf);
    consumer.stop();

    let err = result.expect_err("no packet should be sent without a frame");
    assert!(matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut));
}

#[test]
fn test_one_packet_per_sender_per_tick() {
    let (socket, port) = receiver();
    let mut consumer = consumer(10, vec![rgb_sender(port, 0), rgb_sender(port, 5)]);

    consumer.initialize(&VideoFormatDesc::default(), 1).unwrap();
    let _ = consumer.send(VideoField::Progressive, VideoFrame::solid(16, 16, 1, 2, 3));

    let mut universes = HashSet::new();
    let mut buf = [0u8; 1024];
    for _ in 0..2 {
        let (len, _) = socket.recv_from(&mut buf).expect("Art-Net packet");
        assert_eq!(len, 530);
        universes.insert(u16::from_le_bytes([buf[14], buf[15]]));
        assert_eq!(&buf[18..21], &[1, 2, 3]);
    }
    consumer.stop();

    assert_eq!(universes, HashSet::from([0, 5]));
}

#[test]
fn test_output_follows_latest_frame() {
    let (socket, port) = receiver();
    let mut consumer = consumer(20, vec![rgb_sender(port, 0)]);

    consumer.initialize(&VideoFormatDesc::default(), 1).unwrap();
    let _ = consumer.send(VideoField::Progressive, VideoFrame::solid(16, 16, 255, 0, 0));

    let mut buf = [0u8; 1024];
    socket.recv_from(&mut buf).expect("first packet");
    assert_eq!(&buf[18..21], &[255, 0, 0]);

    let _ = consumer.send(VideoField::Progressive, VideoFrame::solid(16, 16, 0, 0, 255));

    // A packet from a tick already in flight may still carry the old color
    let mut saw_blue = false;
    for _ in 0..5 {
        socket.recv_from(&mut buf).expect("packet");
        if buf[18..21] == [0, 0, 255] {
            saw_blue = true;
            break;
        }
    }
    consumer.stop();

    assert!(saw_blue);
}

#[test]
fn test_failed_send_does_not_stop_later_senders() {
    // UDP refuses destination port 0
    let unreachable: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let transport = ArtNetSender::new().unwrap();
    assert!(transport.send_dmx(3, &[0u8; 512], unreachable).is_err());

    let (socket, port) = receiver();
    let mut consumer = consumer(20, vec![rgb_sender(0, 3), rgb_sender(port, 4)]);

    consumer.initialize(&VideoFormatDesc::default(), 1).unwrap();
    let _ = consumer.send(VideoField::Progressive, VideoFrame::solid(16, 16, 7, 8, 9));

    let mut buf = [0u8; 1024];
    for _ in 0..3 {
        let (len, _) = socket.recv_from(&mut buf).expect("packet from the second sender");
        assert_eq!(len, 530);
        assert_eq!(&buf[14..16], &[4, 0]);
        assert_eq!(&buf[18..21], &[7, 8, 9]);
    }
    consumer.stop();
    assert_eq!(consumer.loop_state(), lumacast_artnet::LoopState::Stopped);
}

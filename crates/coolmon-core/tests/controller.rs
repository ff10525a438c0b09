use coolmon_core::controller::{ControllerConfig, ControllerError, ControllerLink, STATUS_COMMAND};
use coolmon_core::demo::DemoCooler;
use coolmon_core::logbook::{parse_record, Payload};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

async fn demo_config() -> ControllerConfig {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(DemoCooler::with_seed(7).serve(listener));

    ControllerConfig {
        cooler_ip: addr.ip().to_string(),
        cooler_port: addr.port(),
        local_ip: None,
        timeout_ms: 1000,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_status_poll_against_demo() {
    let config = demo_config().await;
    let mut link = ControllerLink::connect(&config).await.unwrap();

    let lines = link.poll_status().await.unwrap();
    assert_eq!(lines.len(), 4, "{:?}", lines);

    // Every status line logs as a channel sample
    for (line, prefix) in lines.iter().zip(["T1 ", "S1 ", "C1 ", "T2 "]) {
        assert!(line.starts_with(prefix), "{:?}", line);
        let record = parse_record(&format!("[2025-06-13_11-30-00]  {line}")).unwrap();
        assert!(matches!(record.payload, Payload::Sample { .. }));
    }

    link.send("SET T1 -150").await.unwrap();
    assert_eq!(link.recv().await.unwrap(), vec!["OK".to_string()]);
    link.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_split_link() {
    let config = demo_config().await;
    let link = ControllerLink::connect(&config).await.unwrap();
    let (mut reader, mut writer) = link.into_split();

    writer.send(STATUS_COMMAND).await.unwrap();
    let lines = reader.recv().await.unwrap();
    assert!(lines[0].starts_with("T1 "));
}

#[tokio::test]
async fn test_silent_controller_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 64];
        let n = stream.read(&mut buf).await.unwrap();
        // Hold the connection open without answering
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        let _ = stream.shutdown().await;
        buf[..n].to_vec()
    });

    let config = ControllerConfig {
        cooler_ip: addr.ip().to_string(),
        cooler_port: addr.port(),
        local_ip: None,
        timeout_ms: 100,
        ..Default::default()
    };
    let mut link = ControllerLink::connect(&config).await.unwrap();
    assert!(matches!(
        link.poll_status().await,
        Err(ControllerError::Timeout)
    ));
    assert_eq!(server.await.unwrap(), b"PTC\r\n");
}

#[tokio::test]
async fn test_refused_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ControllerConfig {
        cooler_ip: "127.0.0.1".to_string(),
        cooler_port: port,
        local_ip: None,
        ..Default::default()
    };
    assert!(matches!(
        ControllerLink::connect(&config).await,
        Err(ControllerError::ConnectionFailed(_))
    ));
}

#[tokio::test]
async fn test_non_ascii_command_is_rejected() {
    let config = demo_config().await;
    let mut link = ControllerLink::connect(&config).await.unwrap();
    assert!(matches!(
        link.send("SET T1 \u{2212}150").await,
        Err(ControllerError::NonAscii(_))
    ));
}

use dxl360::{encode_frame, parse_frame, FRAME_LEN};
use level::{analyze, capture, logfile, Axis, FrameReader, LevelError, Sample};
use std::io::Cursor;

fn frames(frames: &[[u8; FRAME_LEN]]) -> Vec<u8> {
    frames.iter().flat_map(|frame| frame.iter().copied()).collect()
}

#[test]
fn drift_recovered_from_logged_ramp() {
    // angle X rising 1 deg/s, one frame per second
    let wire = [b"X+0000Y+0000", b"X+0100Y+0000", b"X+0200Y+0000"];
    let samples = wire.iter().enumerate().map(|(i, frame)| -> level::Result<Sample> {
        let (x, y) = parse_frame(&frame[..])?;
        Ok(Sample::new(i as f64, x, y))
    });
    let run = capture(samples, 20.0).unwrap();
    assert_eq!(run.angle_x, vec![0.0, 1.0, 2.0]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    logfile::write_log(&path, run.samples()).unwrap();

    let logged = logfile::read_log(&path).unwrap();
    assert_eq!(logged, run);

    let report = analyze(&logged, Axis::X).unwrap();
    assert!((report.fit.slope - 1.0).abs() < 1e-9);
    assert!(report.fit.intercept.abs() < 1e-9);
    assert!((report.rate_rad_per_s - 0.01745).abs() < 1e-5);
}

#[test]
fn reader_feeds_capture_after_warm_up() {
    let mut bytes = b"\x13\x37Y+00".to_vec();
    bytes.extend(frames(&[
        encode_frame(9999, 9999),
        encode_frame(12, -34),
        encode_frame(13, -35),
        encode_frame(14, -36),
    ]));

    let mut reader = FrameReader::new(Cursor::new(bytes)).with_tee(false);
    let run = capture(reader.by_ref().take(3), 20.0).unwrap();

    assert_eq!(run.angle_x, vec![0.12, 0.13, 0.14]);
    assert_eq!(run.angle_y, vec![-0.34, -0.35, -0.36]);
    assert!(run.time.iter().all(|&t| (0.0..20.0).contains(&t)));
    assert!(run.time.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn corrupt_stream_aborts_capture() {
    let mut bytes = frames(&[encode_frame(0, 0), encode_frame(1, 1)]);
    bytes.extend_from_slice(b"XABCDYABCD");

    let reader = FrameReader::new(Cursor::new(bytes)).with_tee(false);
    match capture(reader, 20.0) {
        Err(LevelError::InvalidData { frame }) => assert_eq!(frame, "XABCDYABCD"),
        other => panic!("expected InvalidData, got {:?}", other),
    }
}

#[test]
fn malformed_log_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    std::fs::write(&path, "0.0   0.00  0.00\n1.0   0.01\n").unwrap();

    match logfile::read_log(&path) {
        Err(LevelError::LogParse { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected LogParse, got {:?}", other),
    }
}

use std::fs;

use shared::logging::{init_logging, LoggingError};

// The global logger can be installed once per process, so everything about
// it is checked in a single test.
#[test]
fn log_lines_are_formatted_and_appended_to_the_component_file() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");
    fs::create_dir(&log_dir).unwrap();
    fs::write(log_dir.join("api.log"), "line from a previous run\n").unwrap();

    let path = init_logging("api", &log_dir).unwrap();
    assert_eq!(path, log_dir.join("api.log"));

    log::info!(target: "backend::routes", "Prediction ok");
    log::error!(target: "backend::routes", "Prediction failed: boom");

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "line from a previous run");
    assert_eq!(lines.len(), 3);

    for (line, expected) in lines[1..].iter().zip([
        "[INFO] backend::routes: Prediction ok",
        "[ERROR] backend::routes: Prediction failed: boom",
    ]) {
        // `YYYY-mm-dd HH:MM:SS,mmm ` then level, target and message
        let (timestamp, rest) = line.split_at(23);
        assert_eq!(rest, format!(" {}", expected));
        let bytes = timestamp.as_bytes();
        assert_eq!(bytes[4], b'-');
        assert_eq!(bytes[10], b' ');
        assert_eq!(bytes[13], b':');
        assert_eq!(bytes[19], b',');
        assert!(timestamp
            .chars()
            .enumerate()
            .all(|(i, c)| matches!(i, 4 | 7 | 10 | 13 | 16 | 19) || c.is_ascii_digit()));
    }

    // A second install is refused and leaves the file untouched.
    let err = init_logging("api", &log_dir).unwrap_err();
    assert!(matches!(err, LoggingError::AlreadyInitialised(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), contents);
}

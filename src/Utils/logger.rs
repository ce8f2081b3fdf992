use chrono::Local;
use csv::Writer;
use log::LevelFilter;
use nalgebra::{DMatrix, DVector};
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;
use std::io;

/// Parses a log level name: off, error, warn, info, debug or trace.
pub fn parse_level_filter(level: &str) -> Result<LevelFilter, String> {
    match level.trim().to_lowercase().as_str() {
        "off" | "none" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" | "warning" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        other => Err(format!(
            "loglevel must be off, error, warn, info, debug or trace, got {}",
            other
        )),
    }
}

/// `log_<date>_<time>.txt` in the current directory
pub fn timestamped_log_name() -> String {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    format!("log_{}.txt", date_and_time)
}

/// Terminal logger plus an optional file logger.
///
/// `log_file == Some("timestamp")` writes to a `chrono`-stamped file. A second call is
/// ignored by `log` itself, so every entry point may call this.
pub fn init_logger(level: LevelFilter, log_file: Option<&str>) {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));
    if let Some(name) = log_file {
        let name = if name == "timestamp" {
            timestamped_log_name()
        } else {
            name.to_string()
        };
        match File::create(&name) {
            Ok(file) => loggers.push(WriteLogger::new(level, Config::default(), file)),
            Err(err) => eprintln!("cannot create log file {}: {}", name, err),
        }
    }
    let _ = CombinedLogger::init(loggers);
}

/// Writes `matrix` to csv with `x_mesh` as the first column.
pub fn save_matrix_to_csv(
    matrix: &DMatrix<f64>,
    headers: &[String],
    filename: &str,
    x_mesh: &DVector<f64>,
    arg: &str,
) -> io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);

    let mut headers_with_x = Vec::with_capacity(headers.len() + 1);
    headers_with_x.push(arg.to_string());
    headers_with_x.extend(headers.iter().cloned());
    writer.write_record(&headers_with_x)?;

    for (i, row) in matrix.row_iter().enumerate() {
        let mut row_data = Vec::with_capacity(row.len() + 1);
        row_data.push(x_mesh[i].to_string());
        row_data.extend(row.iter().map(|&val| val.to_string()));
        writer.write_record(&row_data)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_level_filter() {
        assert_eq!(parse_level_filter("Debug").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level_filter(" off ").unwrap(), LevelFilter::Off);
        assert!(parse_level_filter("loud").is_err());
    }

    #[test]
    fn test_timestamped_log_name() {
        let name = timestamped_log_name();
        assert!(name.starts_with("log_"));
        assert!(name.ends_with(".txt"));
    }

    #[test]
    fn test_save_matrix_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.csv");
        let matrix = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let x = DVector::from_vec(vec![0.0, 0.5]);
        let headers = vec!["a".to_string(), "b".to_string()];
        save_matrix_to_csv(&matrix, &headers, path.to_str().unwrap(), &x, "x").unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["x,a,b", "0,1,2", "0.5,3,4"]);
    }
}

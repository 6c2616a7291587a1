/// Daily log file persistence
///
/// Lines are appended to `<directory>/chartbot_YYYY-MM-DD.log`. The file is
/// reopened when the local date changes.
use chrono::Local;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

struct FileSink {
    directory: PathBuf,
    date: String,
    writer: BufWriter<File>,
}

static FILE_SINK: Lazy<Mutex<Option<FileSink>>> = Lazy::new(|| Mutex::new(None));

pub fn log_file_path(directory: &Path, date: &str) -> PathBuf {
    directory.join(format!("chartbot_{}.log", date))
}

fn open_sink(directory: &Path, date: &str) -> std::io::Result<FileSink> {
    fs::create_dir_all(directory)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path(directory, date))?;
    Ok(FileSink {
        directory: directory.to_path_buf(),
        date: date.to_string(),
        writer: BufWriter::new(file),
    })
}

/// Start writing log lines under `directory`
pub fn init_file_logging(directory: &Path) -> Result<(), String> {
    let date = Local::now().format("%Y-%m-%d").to_string();
    let sink = open_sink(directory, &date).map_err(|e| {
        format!(
            "Failed to open log file in '{}': {}",
            directory.display(),
            e
        )
    })?;
    *FILE_SINK.lock() = Some(sink);
    Ok(())
}

pub fn write_to_file(line: &str) {
    let mut guard = FILE_SINK.lock();
    let Some(sink) = guard.as_mut() else {
        return;
    };

    let today = Local::now().format("%Y-%m-%d").to_string();
    if sink.date != today {
        let _ = sink.writer.flush();
        match open_sink(&sink.directory.clone(), &today) {
            Ok(rotated) => *sink = rotated,
            Err(e) => {
                eprintln!("Logger file rotation failed: {}", e);
                *guard = None;
                return;
            }
        }
    }

    if writeln!(sink.writer, "{}", line).is_err() {
        *guard = None;
    }
}

pub fn flush_file_logging() {
    if let Some(sink) = FILE_SINK.lock().as_mut() {
        let _ = sink.writer.flush();
    }
}

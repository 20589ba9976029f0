use std::path::PathBuf;

/// Initialize logging. With a file path, logs go there (the TUI runs in raw
/// mode, so anything written to the terminal would corrupt the display); if
/// the file cannot be opened, or no path is given, fall back to stderr.
pub fn init_with(log_file: Option<PathBuf>) {
    use env_logger::Target;
    use std::fs;

    let target = match log_file {
        Some(path) => fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map(|file| Target::Pipe(Box::new(file)))
            .unwrap_or(Target::Stderr),
        None => Target::Stderr,
    };

    env_logger::Builder::from_default_env()
        .target(target)
        .filter_level(log::LevelFilter::Info)
        .init();
}

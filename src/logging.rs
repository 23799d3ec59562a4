use log::LevelFilter;
use simplelog::{Config, WriteLogger};
use std::fs::File;

pub fn init_logging() {
    // If we fail to create the log file, fall back to no logging rather
    // than taking the engine down.
    if let Ok(file) = File::create("poddavki.log") {
        let _ = WriteLogger::init(LevelFilter::Info, Config::default(), file);
        log::info!("Logger initialized.");
    }
}

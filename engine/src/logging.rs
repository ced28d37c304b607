//! A `log` backend that forwards records over a channel.
//!
//! The runtime only ever writes through the `log` facade. An embedding application that wants the
//! records somewhere other than stderr (an in-game console, a test assertion) can install a
//! [`ChannelLogger`] and drain the receiving end at its own pace:
//!
//! ```rust,ignore
//! let receiver = ChannelLogger::install(log::LevelFilter::Debug)?;
//!
//! scheduler.tick(&mut world);
//! for message in receiver.try_iter() {
//!     console.push(format!("[{}] {}", message.level, message.message));
//! }
//! ```

use crossbeam::channel::{Receiver, Sender, unbounded};
use log::{LevelFilter, Metadata, Record, SetLoggerError};

/// One forwarded log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub level: log::Level,
    pub target: String,
    pub message: String,
}

/// A [`log::Log`] implementation that sends every enabled record to a channel.
pub struct ChannelLogger {
    sender: Sender<LogMessage>,
    level: LevelFilter,
}

impl ChannelLogger {
    pub fn new(sender: Sender<LogMessage>, level: LevelFilter) -> Self {
        Self { sender, level }
    }

    /// Create a logger together with the receiving end of its unbounded channel.
    pub fn with_receiver(level: LevelFilter) -> (Self, Receiver<LogMessage>) {
        let (sender, receiver) = unbounded();
        (Self::new(sender, level), receiver)
    }

    /// Install a channel logger as the global logger and return its receiver.
    ///
    /// Fails if a global logger has already been set.
    pub fn install(level: LevelFilter) -> Result<Receiver<LogMessage>, SetLoggerError> {
        let (logger, receiver) = Self::with_receiver(level);
        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(level);
        Ok(receiver)
    }
}

impl log::Log for ChannelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            // A dropped receiver just means nobody is listening anymore.
            let _ = self.sender.try_send(LogMessage {
                level: record.level(),
                target: record.target().to_string(),
                message: record.args().to_string(),
            });
        }
    }

    fn flush(&self) {}
}

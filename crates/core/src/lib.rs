pub mod config;
pub mod error;
pub mod logging;
pub mod message;
pub mod parser;
pub mod search;
pub mod stats;
pub mod window;

pub use config::{Config, ConfigError, FileLoggingSection, LoggingSection, ParserConfig, ViewerConfig};
pub use error::{Error, Result};
pub use logging::{LogFormat, LoggingConfig, init_logging};
pub use message::Message;
pub use parser::{PROGRESS_BATCH_SIZE, ParseOutcome, TranscriptParser, parse_transcript};
pub use search::{first_index_on_date, search_messages};
pub use stats::{ChatStats, DateRange, calculate_stats};
pub use window::{VisibleRange, WindowController};

/*!
 * statjson - stat(2) output as JSON
 *
 * This library turns the platform's file status into ordered, nested
 * records with symbolic modes, decorated timestamps, owner names and
 * split device numbers, ready to be serialized as JSON.
 */

pub mod config;
pub mod device;
pub mod error;
pub mod fields;
pub mod filetype;
pub mod flags;
pub mod logging;
pub mod mode;
pub mod owner;
pub mod record;
pub mod status;
pub mod time;
pub mod types;
pub mod utils;
pub mod writer;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use config::{Args, Config};
pub use error::{Result, StatJsonError};
pub use fields::{FieldDescriptor, Formatter, FIELDS};
pub use filetype::{FileKind, FileTypeTable, HostCapabilities};
pub use owner::{NameResolver, SystemNames};
pub use record::StatRecordBuilder;
pub use time::{TimeDecorator, Zone};
pub use types::{Attr, Key, Naming, RawStatus, RawValue, StatRecord};
pub use writer::JsonWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/*
    core_store - In-memory custom data storage

    Handles:
    - The observable key-value store (CustomData)
    - Change notifications and listener registration
    - Last-modified bookkeeping through an injected clock
    - Reserved key names and their classification
*/

pub mod clock;
pub mod custom_data;
pub mod errors;
pub mod events;
pub mod keys;

#[cfg(test)]
pub mod tests;

// Re-export commonly used types
pub use clock::{parse_timestamp, Clock, ManualClock, SystemClock, TimestampFormat};
pub use custom_data::CustomData;
pub use errors::{RenameError, TimestampError};
pub use events::{CustomDataEvent, CustomDataListener, ListenerId};

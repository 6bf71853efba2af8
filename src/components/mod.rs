// Export components
pub mod event_parser;
pub mod google_calendar;

// Re-export the types the message handler works with
pub use event_parser::{EventParser, EventRecord, ParseError};
pub use google_calendar::{EventSubmitter, GoogleCalendar};

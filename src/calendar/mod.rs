pub mod cursor;
pub mod error;
pub mod event;
pub mod layout;

pub use cursor::{navigate, parse_jump, CalendarCursor, Navigation};
pub use error::{CalendarError, CalendarResult};
pub use event::{CalendarEvent, Status};
pub use layout::{is_selected, is_today, month_grid_for, parse_reference_date, GridCell, Membership};

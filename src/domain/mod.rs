//! Domain layer: record identity, the two record types, and pagination.
//!
//! Both [`Hotel`] and [`Customer`] implement [`Record`], which carries the
//! column allow-list used to validate submitted forms and the listing order
//! shared by every store.

pub mod customer;
pub mod hotel;
pub mod page;
pub mod record;
pub mod record_id;

pub use customer::{Customer, CustomerFields};
pub use hotel::{Hotel, HotelFields};
pub use page::{Page, PageCursor};
pub use record::{FormFields, Record};
pub use record_id::RecordId;

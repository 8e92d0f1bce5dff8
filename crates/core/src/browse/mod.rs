//! Filter, pagination and detail-view state.
//!
//! State objects are owned by the view and changed only through their
//! transition methods. Every transition that needs data returns a ticket
//! describing the fetch to run; the response is handed back with that
//! ticket and dropped when a newer request has been issued since.

mod detail;
mod state;

pub use detail::DetailState;
pub use state::{BrowseState, FetchRequest, ResultSet};

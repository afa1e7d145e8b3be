//! Pure list rules shared by the task screen and mind-map detail list.
//!
//! Nothing here touches storage; services persist the results.

pub mod ordering;
pub mod status_filter;

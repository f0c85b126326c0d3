//! Report metadata: description codec and date-range resolution

pub mod codec;
pub mod window;

pub use codec::{ReportMetadata, decode, describe, encode};
pub use window::{DateWindow, resolve, resolve_date};

//! Domain types for SNV route resolution.
//!
//! Validated codes (UF, BR, SNV segment), the reference date used for every upstream
//! query, and the records that flow through the resolution engine. Code
//! types enforce their invariants at construction time.

mod br;
mod coords;
mod date;
mod error;
mod route;
mod snv;
mod uf;

pub use br::Br;
pub use coords::{is_in_brazil, is_valid_coordinate};
pub use date::{DATE_FORMAT, ReferenceDate};
pub use error::DomainError;
pub use route::{MiniSegment, ResolvedSegment, Route};
pub use snv::SnvCode;
pub use uf::{Region, Uf};

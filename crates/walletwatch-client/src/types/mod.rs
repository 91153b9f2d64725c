/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs/enums with serialization support
[POS]:    Data layer - type definitions for API communication and identities
[UPDATE]: When API schema changes or new types added
*/

pub mod identity;
pub mod models;
pub mod requests;
pub mod responses;

pub use identity::*;
pub use models::*;
pub use requests::*;
pub use responses::*;

//! Command/query structs for the domain services, mirroring the shape of
//! the requests a frontend sends.

pub mod babies;

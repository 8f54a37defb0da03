//! Storefront application layer: backend client, cart manager and order
//! console.

pub mod context;
pub mod domain;
pub mod errors;
pub mod http;
pub mod in_flight;
pub mod notices;

#[cfg(test)]
mod test;

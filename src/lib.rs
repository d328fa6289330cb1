#[macro_use]
extern crate pest_derive;

pub mod error;
pub mod object;
pub mod options;

pub mod registry;

pub mod cast;
pub mod combine;
pub mod common;
pub mod ops;
pub mod proxy;
pub mod record;
pub mod slice;

pub mod types;

pub mod cli;
pub mod parser;

#[macro_use]
extern crate serde;

mod aes;
mod ballot;
mod cbc;
mod des;
mod error;
mod gf256;
mod number_theory;
mod paillier;
mod serde_hex;
mod simulation;
mod tally;
mod weights;

pub use aes::*;
pub use ballot::*;
pub use cbc::*;
pub use des::*;
pub use error::*;
pub use gf256::*;
pub use number_theory::*;
pub use paillier::*;
pub use serde_hex::*;
pub use simulation::*;
pub use tally::*;
pub use weights::*;

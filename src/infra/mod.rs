//! Infrastructure layer implementations.

pub mod signing;
pub mod yaya;

pub use signing::{RequestSigner, SignatureHeaders, SigningContext, SigningMethod};
pub use yaya::YayaTransactionGateway;

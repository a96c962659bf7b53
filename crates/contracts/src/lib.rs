//! Contract interfaces used during passkey onboarding: the modular account and its factory,
//! the v0.7 entry point and the demo counter.

pub mod account;
pub mod counter;
pub mod entry_point;
mod error;
mod gen;
pub mod utils;

pub use account::{AccountFactory, ModularAccount};
pub use counter::Counter;
pub use entry_point::EntryPoint;
pub use error::{decode_revert_string, ContractCallError};
pub use gen::{
    entry_point_api::PackedUserOperation, AccountFactoryAPI, CounterAPI, EntryPointAPI,
    ModularAccountAPI,
};

//! Smart account collaborators of the onboarding flow backed by real infrastructure: an
//! ERC-7579 account deployed by a factory, a v0.7 bundler and the chain RPC.

mod account;
mod bundler;
mod counter;
mod provisioner;

pub use account::Erc7579Account;
pub use bundler::BundlerClient;
pub use counter::CounterReader;
pub use provisioner::{AccountConfig, Erc7579Provisioner};

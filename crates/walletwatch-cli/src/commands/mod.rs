/*
[INPUT]:  Parsed CLI subcommands
[OUTPUT]: Command handlers
[POS]:    CLI command layer - module wiring
[UPDATE]: When adding or removing subcommands
*/

pub mod addresses;
pub mod init;
pub mod session;
pub mod subscription;

pub use addresses::{run_addresses, AddressCommand};
pub use init::run_init;
pub use session::{run_login_provider, run_login_wallet, run_logout, run_whoami};
pub use subscription::{run_balance, run_subscription};

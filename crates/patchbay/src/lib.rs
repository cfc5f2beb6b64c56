//! Patchbay server internals
//!
//! The binary wires four pieces together: the TCP serve loop owning all
//! switchboard state, a console task that owns stdin, the nested monitor
//! view, and the session teardown used by the `exit` command.

pub mod console;
pub mod monitor;
pub mod server;
pub mod teardown;

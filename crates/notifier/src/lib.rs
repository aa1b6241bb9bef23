//! Notification delivery subsystem.
//!
//! The analyzer stage writes classified articles; this crate routes them to
//! their category's Discord webhook:
//!
//! 1. [`router`] partitions articles per configured destination
//! 2. [`dispatcher`] walks one channel's queue sequentially, with pacing
//! 3. [`message`] renders each article under the channel's length limit
//! 4. [`retry`] wraps each send in bounded backoff on the rate-limit signal
//! 5. [`transport`] performs the single HTTP POST per attempt
//!
//! Channels are independent: a terminal failure aborts only that channel's
//! remaining queue, never its siblings'.

pub mod dispatcher;
pub mod message;
pub mod retry;
pub mod router;
pub mod transport;

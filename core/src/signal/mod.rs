pub mod codec;
pub mod listener;
pub mod sender;
pub mod settle;

pub use codec::{decode_signal, encode_signal, DecodedSignal};
pub use listener::{ListenerState, SignalListener, SignalReport};
pub use sender::SignalSender;
pub use settle::SettleOnce;

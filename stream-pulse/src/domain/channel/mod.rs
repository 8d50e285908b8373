mod state;

pub use state::ChannelState;

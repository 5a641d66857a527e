// Remote averaging
//
// `client` speaks the chat-completions protocol; `averager` turns a numeric
// series into a prompt, parses the reply, and falls back to the local mean
// whenever the remote side cannot give a usable answer.

pub mod averager;
pub mod client;

pub use averager::{estimate_average, EstimateSource, RemoteAverager, RemoteEstimate};
pub use client::{AskError, ChatClient, ChatConfig, CompletionClient};

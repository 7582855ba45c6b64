mod effect;
mod message;
mod message_debug;

pub use effect::Effect;
pub use message::Msg;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RepoExternalChange {
    Worktree,
    GitState,
    Both,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StoreEvent {
    StateChanged,
}

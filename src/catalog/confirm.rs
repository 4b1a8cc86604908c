/// Asks the user before something irreversible happens.
pub trait Confirmation: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Waits for a yes/no answer from the terminal. Must not be used from a current-thread runtime.
#[derive(Debug, Default)]
pub struct TerminalPrompt;
impl Confirmation for TerminalPrompt {
    fn confirm(&self, prompt: &str) -> bool {
        off_worker(|| crate::config::wizard::io::prompt_bool(prompt))
    }
}

/// Run a blocking read without stalling the other tasks of the runtime it is called from.
fn off_worker<T>(read: impl FnOnce() -> T) -> T {
    match tokio::runtime::Handle::try_current() {
        Ok(_) => tokio::task::block_in_place(read),
        Err(_) => read(),
    }
}

/// A fixed answer, for `--yes` and for sessions where deletes were configured not to ask.
#[derive(Debug, Clone, Copy)]
pub struct Preapproved(pub bool);
impl Confirmation for Preapproved {
    fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!(prompt, answer = self.0, "confirmation answered without asking");
        self.0
    }
}

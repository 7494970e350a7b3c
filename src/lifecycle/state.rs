use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Configured, nothing created yet.
    Idle,
    /// Bootstrap running, no instance yet.
    Loading,
    Running,
    /// Teardown requested, waiting for the runtime to release.
    Quitting,
    Terminated,
    Failed,
}

impl State {
    /// Loading or running: an instance exists or is on its way, and no
    /// teardown has been asked for yet.
    pub fn is_live(self) -> bool {
        matches!(self, State::Loading | State::Running)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            State::Idle => "idle",
            State::Loading => "loading",
            State::Running => "running",
            State::Quitting => "quitting",
            State::Terminated => "terminated",
            State::Failed => "failed",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_loading_and_running_are_live() {
        let live: Vec<State> = [
            State::Idle,
            State::Loading,
            State::Running,
            State::Quitting,
            State::Terminated,
            State::Failed,
        ]
        .into_iter()
        .filter(|s| s.is_live())
        .collect();
        assert_eq!(live, vec![State::Loading, State::Running]);
    }

    #[test]
    fn displays_lowercase_names() {
        assert_eq!(State::Quitting.to_string(), "quitting");
        assert_eq!(State::Failed.as_str(), "failed");
    }
}

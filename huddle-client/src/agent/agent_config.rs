/// When local media is opened and the offer produced for an outgoing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallSetup {
    /// Ring first; acquire media and offer only once the callee accepts.
    #[default]
    Lazy,
    /// Acquire media and send the offer right after the call intent.
    Eager,
}

#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
    pub setup: CallSetup,
}

impl AgentConfig {
    pub fn eager() -> Self {
        Self {
            setup: CallSetup::Eager,
        }
    }

    pub fn lazy() -> Self {
        Self {
            setup: CallSetup::Lazy,
        }
    }
}

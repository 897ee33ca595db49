use std::fmt;

/// Offer/answer progress of one peer session.
///
/// ```text
/// Idle -> Offering -> DescriptionExchanged -> Connected
/// Idle -> Answering -> DescriptionExchanged -> Connected
/// any  -> Ended
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NegotiationState {
    Idle,
    /// Local offer sent, waiting for the answer.
    Offering,
    /// Remote offer applied, local answer not produced yet.
    Answering,
    DescriptionExchanged,
    Connected,
    Ended,
}

impl NegotiationState {
    /// Whether a remote description has been applied, i.e. remote candidates
    /// can be handed to the media layer.
    pub fn remote_description_applied(self) -> bool {
        matches!(
            self,
            Self::Answering | Self::DescriptionExchanged | Self::Connected
        )
    }

    pub fn is_established(self) -> bool {
        matches!(self, Self::DescriptionExchanged | Self::Connected)
    }

    pub fn is_ended(self) -> bool {
        self == Self::Ended
    }
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Offering => "offering",
            Self::Answering => "answering",
            Self::DescriptionExchanged => "description-exchanged",
            Self::Connected => "connected",
            Self::Ended => "ended",
        };
        f.write_str(name)
    }
}

/// Which side of the offer/answer exchange this participant plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Initiator,
    Responder,
}

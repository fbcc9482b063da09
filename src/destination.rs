//! Channel/user destinations and their sigil prefixes.

/// Prefix marking a direct-message destination.
pub const MEMBER_PREFIX: char = '@';

/// Prefix marking a channel destination.
pub const CHANNEL_PREFIX: char = '#';

/// Whether a destination is a channel or a direct-message user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    Channel,
    User,
}

impl DestinationKind {
    /// Sigil used when rendering the destination back to the user.
    pub fn prefix(&self) -> char {
        match self {
            DestinationKind::Channel => CHANNEL_PREFIX,
            DestinationKind::User => MEMBER_PREFIX,
        }
    }
}

/// A user-entered destination, parsed once at the input boundary.
///
/// The sigil records what the user typed; resolution still checks channels
/// before users regardless, because workspace members and channels share a
/// flat namespace and users routinely type `#` out of habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Channel(String),
    User(String),
}

impl Destination {
    /// Parse free text into a destination, stripping a recognized sigil.
    ///
    /// Bare text is treated as a channel name.
    pub fn parse(input: &str) -> Destination {
        match input.strip_prefix(MEMBER_PREFIX) {
            Some(rest) => Destination::User(rest.to_string()),
            None => {
                let name = input.strip_prefix(CHANNEL_PREFIX).unwrap_or(input);
                Destination::Channel(name.to_string())
            }
        }
    }

    /// The destination name with the sigil stripped.
    pub fn name(&self) -> &str {
        match self {
            Destination::Channel(name) | Destination::User(name) => name,
        }
    }
}

/// Result of resolving a destination name against the workspace: a stable
/// vendor ID tagged with what it turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChannel {
    pub kind: DestinationKind,
    pub id: String,
}

impl ResolvedChannel {
    pub fn channel(id: impl Into<String>) -> Self {
        Self {
            kind: DestinationKind::Channel,
            id: id.into(),
        }
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self {
            kind: DestinationKind::User,
            id: id.into(),
        }
    }

    /// Canonical display string for a resolved name, e.g. `#critical`
    /// or `@oncall`.
    pub fn canonical_name(&self, name: &str) -> String {
        format!("{}{}", self.kind.prefix(), name)
    }
}

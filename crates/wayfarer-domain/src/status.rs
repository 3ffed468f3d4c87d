//! Status module - the lifecycle states a place record moves through

/// Lifecycle state of a place record
///
/// Records are created as `Todo` and move to `Visited` at most once:
/// - Todo: the user wants to go there
/// - Visited: the user has been there (terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceStatus {
    /// Waiting to be visited
    Todo,

    /// Visited; never returns to `Todo`
    Visited,
}

impl PlaceStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceStatus::Todo => "todo",
            PlaceStatus::Visited => "visited",
        }
    }

    /// The state a record moves to next, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            PlaceStatus::Todo => Some(PlaceStatus::Visited),
            PlaceStatus::Visited => None,
        }
    }

    /// Whether a record may move from `self` to `to`
    pub fn can_transition_to(&self, to: PlaceStatus) -> bool {
        self.next() == Some(to)
    }
}

impl std::fmt::Display for PlaceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

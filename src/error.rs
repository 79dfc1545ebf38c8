use thiserror::Error;

/// Things that may go wrong while declaring an XCC problem.
///
/// Every variant is detected before the offending input touches the
/// solver's tables, so a failed call leaves the problem exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The list of primary items is empty.
    #[error("the list of primary items may not be empty")]
    EmptyItems,
    /// A primary item name appears more than once.
    #[error("primary item `{0}` is not unique")]
    DuplicatePrimary(String),
    /// A secondary item name repeats another secondary item, or collides
    /// with a primary item.
    #[error("secondary item `{0}` is not unique")]
    DuplicateSecondary(String),
    /// An option references a name that was declared neither as a primary
    /// nor as a secondary item. The name is compared after stripping any
    /// `:color` suffix from the token.
    #[error("option {option} contains `{token}`, which is not a known item")]
    UnknownItemInOption {
        /// Position of the offending option, in insertion order.
        option: usize,
        /// The unrecognized item reference, color suffix included.
        token: String,
    },
}

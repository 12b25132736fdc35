//! Domain layer: identifiers, match records, bracket view, and the
//! pairing rule that moves winners forward.

pub mod advancement;
pub mod bracket;
pub mod ids;
pub mod match_record;

pub use advancement::{Advancement, AdvancementTarget};
pub use bracket::{Bracket, Round};
pub use ids::{EventId, MatchId, PlayerId};
pub use match_record::{Match, MatchPatch, MatchStatus, Slot};

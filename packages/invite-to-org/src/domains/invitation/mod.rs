// Invitation domain - team resolution, pending-invitation dedup and submission

pub mod coordinator;

pub use coordinator::{InvitationCoordinator, InvitationPhase, InvitationReport};
